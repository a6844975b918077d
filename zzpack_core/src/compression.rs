use std::fmt;
use std::sync::Arc;

use crate::codec::{Codec, CodecError};
use crate::error::CompressionError;

/// Initial output capacity, as a multiple of the compressed size, when the
/// decompressed size is unknown. Matches typical ratios for indexed images.
pub const INITIAL_SIZE_MULTIPLIER: usize = 7;

/// Factor the output buffer grows by after each "buffer too small" retry.
pub const GROWTH_MULTIPLIER: usize = 2;

/// Buffer-level compression adapter over a [`Codec`] primitive.
///
/// The codec never tells us the decompressed size up front, so
/// [`decompress`](Self::decompress) allocates speculatively and grows the
/// output buffer until the codec stops reporting
/// [`CodecError::BufferTooSmall`].
///
/// Empty input is not an error: both directions return an empty buffer
/// without logging. Size overflows and codec failures are logged at error
/// level and returned as [`CompressionError`].
#[derive(Clone)]
pub struct Compression {
    codec: Arc<dyn Codec>,
    output_limit: usize,
}

impl fmt::Debug for Compression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Compression")
            .field("codec", &self.codec.name())
            .field("output_limit", &self.output_limit)
            .finish()
    }
}

impl Compression {
    pub fn new(codec: Arc<dyn Codec>) -> Self {
        Self {
            codec,
            output_limit: isize::MAX as usize,
        }
    }

    /// Cap the size of any output buffer this adapter allocates.
    ///
    /// Defaults to the largest possible `Vec` allocation.
    pub fn with_output_limit(mut self, limit: usize) -> Self {
        self.output_limit = limit;
        self
    }

    pub fn codec(&self) -> &dyn Codec {
        self.codec.as_ref()
    }

    pub fn output_limit(&self) -> usize {
        self.output_limit
    }

    /// Decompress `src`.
    ///
    /// `real_size` is the expected decompressed size, or 0 when unknown. It is
    /// only a hint: a wrong value costs extra retries or a larger transient
    /// allocation, never a wrong result.
    pub fn decompress(&self, src: &[u8], real_size: usize) -> Result<Vec<u8>, CompressionError> {
        if src.is_empty() {
            return Ok(Vec::new());
        }

        self.guard("compressed data", src.len(), self.codec.max_len())?;

        let initial = if real_size != 0 {
            real_size
        } else if src.len() > self.output_limit / INITIAL_SIZE_MULTIPLIER {
            // Too large to multiply, start from the compressed size and grow.
            src.len()
        } else {
            src.len() * INITIAL_SIZE_MULTIPLIER
        };

        self.guard("decompressed data", initial, self.output_limit)?;
        self.guard("decompressed data", initial, self.codec.max_len())?;
        let mut out = vec![0u8; initial];

        loop {
            match self.codec.decompress_into(src, &mut out) {
                Ok(written) => {
                    out.truncate(written);
                    return Ok(out);
                }
                Err(CodecError::BufferTooSmall) => {
                    if out.len() > self.output_limit / GROWTH_MULTIPLIER {
                        return Err(self.overflow("decompressed data", out.len(), self.output_limit));
                    }
                    let grown = out.len() * GROWTH_MULTIPLIER;
                    self.guard("decompressed data", grown, self.codec.max_len())?;
                    log::debug!("{}: growing output buffer from {} to {} bytes", self.codec.name(), out.len(), grown);
                    out.resize(grown, 0);
                }
                Err(err) => {
                    log::error!("{} error: {}", self.codec.name(), err.code());
                    return Err(CompressionError::Codec(err));
                }
            }
        }
    }

    /// Compress `src` in a single call, sized by the codec's worst-case bound.
    pub fn compress(&self, src: &[u8]) -> Result<Vec<u8>, CompressionError> {
        if src.is_empty() {
            return Ok(Vec::new());
        }

        self.guard("source data", src.len(), self.codec.max_len())?;

        let bound = self.codec.compress_bound(src.len());
        self.guard("compressed data", bound, self.output_limit)?;
        self.guard("compressed data", bound, self.codec.max_len())?;
        let mut out = vec![0u8; bound];

        match self.codec.compress_into(src, &mut out) {
            Ok(written) => {
                out.truncate(written);
                Ok(out)
            }
            Err(err) => {
                log::error!("{} error: {}", self.codec.name(), err.code());
                Err(CompressionError::Codec(err))
            }
        }
    }

    fn guard(&self, what: &'static str, size: usize, max: usize) -> Result<(), CompressionError> {
        if size > max {
            return Err(self.overflow(what, size, max));
        }
        Ok(())
    }

    fn overflow(&self, what: &'static str, size: usize, max: usize) -> CompressionError {
        log::error!("The size of the {what} is too large ({size} > {max})");
        CompressionError::SizeOverflow { what, size, max }
    }
}
