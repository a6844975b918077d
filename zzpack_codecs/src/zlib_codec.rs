use flate2::{Compress, Compression as Level, Decompress, FlushCompress, FlushDecompress, Status};
use zzpack_core::format::CODEC_ZLIB;
use zzpack_core::{Codec, CodecError};

/// zlib (DEFLATE with zlib header and adler32 trailer) codec.
///
/// This is the format the game's compressed assets ship in. Each call runs a
/// fresh deflate/inflate stream over the whole buffer, so a decompression that
/// ran out of output space can simply be repeated with a larger buffer.
pub struct ZlibCodec {
    /// Compression level (0 = stored, 9 = smallest).
    pub level: u32,
}

impl Default for ZlibCodec {
    fn default() -> Self {
        Self { level: 6 }
    }
}

impl ZlibCodec {
    pub fn new(level: u32) -> Self {
        Self { level: level.min(9) }
    }
}

impl Codec for ZlibCodec {
    fn id(&self) -> u16 {
        CODEC_ZLIB
    }

    fn name(&self) -> &'static str {
        "zlib"
    }

    /// Same bound as zlib's `compressBound`.
    fn compress_bound(&self, len: usize) -> usize {
        len.saturating_add(len >> 12)
            .saturating_add(len >> 14)
            .saturating_add(len >> 25)
            .saturating_add(13)
    }

    fn compress_into(&self, src: &[u8], dst: &mut [u8]) -> Result<usize, CodecError> {
        let mut deflater = Compress::new(Level::new(self.level), true);
        loop {
            let consumed = deflater.total_in() as usize;
            let produced = deflater.total_out() as usize;
            let status = deflater
                .compress(&src[consumed..], &mut dst[produced..], FlushCompress::Finish)
                .map_err(|_| CodecError::Stream)?;

            let written = deflater.total_out() as usize;
            match status {
                Status::StreamEnd => return Ok(written),
                _ if written == dst.len() => return Err(CodecError::BufferTooSmall),
                _ if written == produced && deflater.total_in() as usize == consumed => {
                    return Err(CodecError::Stream)
                }
                _ => {}
            }
        }
    }

    fn decompress_into(&self, src: &[u8], dst: &mut [u8]) -> Result<usize, CodecError> {
        // One-shot inflate: a stream that stops short of its end with room
        // left in `dst` ran out of input.
        let mut inflater = Decompress::new(true);
        let status = inflater
            .decompress(src, dst, FlushDecompress::Finish)
            .map_err(|_| CodecError::Data)?;

        let written = inflater.total_out() as usize;
        match status {
            Status::StreamEnd => Ok(written),
            _ if written < dst.len() => Err(CodecError::Data),
            _ => Err(CodecError::BufferTooSmall),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compress(codec: &ZlibCodec, data: &[u8]) -> Vec<u8> {
        let mut out = vec![0u8; codec.compress_bound(data.len())];
        let n = codec.compress_into(data, &mut out).unwrap();
        out.truncate(n);
        out
    }

    #[test]
    fn output_is_a_zlib_stream() {
        let zip = compress(&ZlibCodec::default(), b"fheroes");
        // CMF byte: deflate, 32K window.
        assert_eq!(zip[0], 0x78);
        assert_eq!(((zip[0] as u16) << 8 | zip[1] as u16) % 31, 0);
    }

    #[test]
    fn short_output_reports_buffer_too_small() {
        let codec = ZlibCodec::default();
        let data = vec![42u8; 4096];
        let zip = compress(&codec, &data);

        let mut small = vec![0u8; 1000];
        assert_eq!(codec.decompress_into(&zip, &mut small), Err(CodecError::BufferTooSmall));

        let mut exact = vec![0u8; 4096];
        assert_eq!(codec.decompress_into(&zip, &mut exact), Ok(4096));
        assert_eq!(exact, data);
    }

    #[test]
    fn truncated_stream_is_a_data_error() {
        let codec = ZlibCodec::default();
        let data: Vec<u8> = (0..2048u32).map(|i| (i * 7 % 251) as u8).collect();
        let zip = compress(&codec, &data);

        let mut out = vec![0u8; 8192];
        assert_eq!(codec.decompress_into(&zip[..zip.len() / 2], &mut out), Err(CodecError::Data));
    }

    #[test]
    fn garbage_is_a_data_error() {
        let mut out = vec![0u8; 64];
        assert_eq!(
            ZlibCodec::default().decompress_into(b"definitely not zlib", &mut out),
            Err(CodecError::Data)
        );
    }

    #[test]
    fn stored_level_fits_in_bound() {
        let codec = ZlibCodec::new(0);
        let data: Vec<u8> = (0..100_000u32).map(|i| (i.wrapping_mul(2654435761) >> 24) as u8).collect();
        let zip = compress(&codec, &data);
        assert!(zip.len() <= codec.compress_bound(data.len()));
    }

    #[test]
    fn level_is_clamped() {
        assert_eq!(ZlibCodec::new(42).level, 9);
    }
}
