use thiserror::Error;

/// Failure reported by a [`Codec`] primitive.
///
/// `BufferTooSmall` is not a hard failure: it is the signal the adapter uses
/// to grow its output buffer and retry. Every other variant aborts the call.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodecError {
    #[error("output buffer too small")]
    BufferTooSmall,
    #[error("corrupt or truncated input")]
    Data,
    #[error("out of memory")]
    Memory,
    #[error("inconsistent codec state")]
    Stream,
}

impl CodecError {
    /// zlib-compatible numeric code, used when logging failures.
    pub fn code(&self) -> i32 {
        match self {
            CodecError::Stream => -2,
            CodecError::Data => -3,
            CodecError::Memory => -4,
            CodecError::BufferTooSmall => -5,
        }
    }
}

/// Lossless block compression primitive.
///
/// Each `Codec` implementation:
/// - Works on caller-provided buffers and never allocates the output itself,
///   so the caller decides how much space to offer and when to retry.
/// - Is stateless between calls: a failed `decompress_into` can be repeated
///   with a larger buffer.
/// - Reports lack of output space as [`CodecError::BufferTooSmall`] and
///   nothing else.
pub trait Codec: Send + Sync {
    /// Stable codec ID, used for display and registry lookups.
    fn id(&self) -> u16;

    /// Human-readable codec name for CLI display.
    fn name(&self) -> &'static str;

    /// Largest input or output length the codec can address in one call.
    fn max_len(&self) -> usize {
        u32::MAX as usize
    }

    /// Worst-case compressed size for `len` input bytes.
    fn compress_bound(&self, len: usize) -> usize;

    /// Compress `src` into `dst`, returning the number of bytes written.
    fn compress_into(&self, src: &[u8], dst: &mut [u8]) -> Result<usize, CodecError>;

    /// Decompress `src` into `dst`, returning the number of bytes written.
    fn decompress_into(&self, src: &[u8], dst: &mut [u8]) -> Result<usize, CodecError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_codes_match_zlib() {
        assert_eq!(CodecError::BufferTooSmall.code(), -5);
        assert_eq!(CodecError::Data.code(), -3);
        assert_eq!(CodecError::Memory.code(), -4);
        assert_eq!(CodecError::Stream.code(), -2);
    }
}
