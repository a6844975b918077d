use lz4_flex::block::{compress_into, decompress_into, get_maximum_output_size, CompressError, DecompressError};
use zzpack_core::format::CODEC_LZ4;
use zzpack_core::{Codec, CodecError};

/// Raw LZ4 block codec.
///
/// Much faster than zlib at a worse ratio. Blocks carry no size prefix, so the
/// adapter's buffer-growth loop applies exactly as it does for zlib.
pub struct Lz4Codec;

/// Largest input the LZ4 block format accepts.
const LZ4_MAX_INPUT_SIZE: usize = 0x7E00_0000;

impl Codec for Lz4Codec {
    fn id(&self) -> u16 {
        CODEC_LZ4
    }

    fn name(&self) -> &'static str {
        "lz4"
    }

    fn max_len(&self) -> usize {
        LZ4_MAX_INPUT_SIZE
    }

    fn compress_bound(&self, len: usize) -> usize {
        get_maximum_output_size(len)
    }

    fn compress_into(&self, src: &[u8], dst: &mut [u8]) -> Result<usize, CodecError> {
        compress_into(src, dst).map_err(|e| match e {
            CompressError::OutputTooSmall => CodecError::BufferTooSmall,
            #[allow(unreachable_patterns)]
            _ => CodecError::Stream,
        })
    }

    fn decompress_into(&self, src: &[u8], dst: &mut [u8]) -> Result<usize, CodecError> {
        decompress_into(src, dst).map_err(|e| match e {
            DecompressError::OutputTooSmall { .. } => CodecError::BufferTooSmall,
            _ => CodecError::Data,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip_block() {
        let data = b"the quick brown fox jumps over the lazy dog. the quick brown fox.".repeat(8);
        let mut zip = vec![0u8; Lz4Codec.compress_bound(data.len())];
        let n = Lz4Codec.compress_into(&data, &mut zip).unwrap();
        zip.truncate(n);

        let mut out = vec![0u8; data.len()];
        assert_eq!(Lz4Codec.decompress_into(&zip, &mut out), Ok(data.len()));
        assert_eq!(out, data);
    }

    #[test]
    fn short_output_reports_buffer_too_small() {
        let data = vec![9u8; 10_000];
        let mut zip = vec![0u8; Lz4Codec.compress_bound(data.len())];
        let n = Lz4Codec.compress_into(&data, &mut zip).unwrap();
        zip.truncate(n);

        let mut out = vec![0u8; 100];
        assert_eq!(Lz4Codec.decompress_into(&zip, &mut out), Err(CodecError::BufferTooSmall));
    }
}
