use std::io::{Read, Write};

use crate::compression::Compression;
use crate::error::FrameError;
use crate::format::{FrameHeader, FORMAT_VERSION_0};

/// Framed compression on top of [`Compression`].
///
/// # Format layout
/// ```text
/// [raw_size:u32][zip_size:u32][version:u16][reserved:u16]   ← 12-byte header
/// [payload: zip_size bytes]                                  ← compressed data
/// ```
impl Compression {
    /// Read one frame from `input` and write the decompressed bytes to
    /// `output`.
    ///
    /// Malformed frames (empty payload, unknown version, wrong decompressed
    /// length) are rejected without logging.
    pub fn read_frame<R: Read, W: Write>(&self, input: &mut R, output: &mut W) -> Result<(), FrameError> {
        let header = FrameHeader::read_from(input)?;
        if header.zip_size == 0 {
            return Err(FrameError::EmptyPayload);
        }
        if header.version != FORMAT_VERSION_0 {
            return Err(FrameError::UnsupportedVersion(header.version));
        }

        let mut zip = Vec::new();
        input.by_ref().take(header.zip_size as u64).read_to_end(&mut zip)?;
        if zip.len() != header.zip_size as usize {
            return Err(FrameError::Truncated {
                expected: header.zip_size,
                actual: zip.len(),
            });
        }

        let raw = self.decompress(&zip, header.raw_size as usize)?;
        if raw.len() != header.raw_size as usize {
            return Err(FrameError::SizeMismatch {
                expected: header.raw_size,
                actual: raw.len(),
            });
        }

        output.write_all(&raw)?;
        Ok(())
    }

    /// Compress `data` and write it to `output` as a single frame.
    pub fn write_frame<W: Write>(&self, data: &[u8], output: &mut W) -> Result<(), FrameError> {
        if data.is_empty() {
            return Err(FrameError::EmptyInput);
        }
        let raw_size = u32::try_from(data.len()).map_err(|_| FrameError::TooLarge(data.len()))?;

        let zip = self.compress(data)?;
        let zip_size = u32::try_from(zip.len()).map_err(|_| FrameError::TooLarge(zip.len()))?;

        output.write_all(&FrameHeader::new(raw_size, zip_size).to_bytes())?;
        output.write_all(&zip)?;
        Ok(())
    }
}
