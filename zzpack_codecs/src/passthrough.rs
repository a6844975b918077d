use zzpack_core::format::CODEC_PASSTHROUGH;
use zzpack_core::{Codec, CodecError};

/// No-op codec: stores data verbatim, with no compression.
///
/// Useful for:
/// - Verifying framing and image decoding independently of any codec.
/// - Data that is already compressed, where further compression would
///   expand it.
pub struct PassThroughCodec;

impl Codec for PassThroughCodec {
    fn id(&self) -> u16 {
        CODEC_PASSTHROUGH
    }

    fn name(&self) -> &'static str {
        "passthrough"
    }

    fn compress_bound(&self, len: usize) -> usize {
        len
    }

    fn compress_into(&self, src: &[u8], dst: &mut [u8]) -> Result<usize, CodecError> {
        let out = dst.get_mut(..src.len()).ok_or(CodecError::BufferTooSmall)?;
        out.copy_from_slice(src);
        Ok(src.len())
    }

    fn decompress_into(&self, src: &[u8], dst: &mut [u8]) -> Result<usize, CodecError> {
        self.compress_into(src, dst)
    }
}
