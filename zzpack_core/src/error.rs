use thiserror::Error;

use crate::codec::CodecError;

/// Failure of a buffer-to-buffer compression or decompression call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompressionError {
    #[error("{what} size {size} exceeds the supported maximum of {max} bytes")]
    SizeOverflow {
        what: &'static str,
        size: usize,
        max: usize,
    },
    #[error("codec error {}: {}", .0.code(), .0)]
    Codec(CodecError),
}

/// Failure to read or write a compressed frame.
#[derive(Error, Debug)]
pub enum FrameError {
    #[error("nothing to compress: input is empty")]
    EmptyInput,
    #[error("{0} bytes do not fit in a frame")]
    TooLarge(usize),
    #[error("frame declares an empty payload")]
    EmptyPayload,
    #[error("unsupported frame version {0}")]
    UnsupportedVersion(u16),
    #[error("frame payload truncated: expected {expected} bytes, got {actual}")]
    Truncated { expected: u32, actual: usize },
    #[error("frame decompressed to {actual} bytes but header says {expected}")]
    SizeMismatch { expected: u32, actual: usize },
    #[error(transparent)]
    Compression(#[from] CompressionError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failure to decode or encode a raw image.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ImageError {
    #[error("invalid image input ({width}x{height}, {len} bytes)")]
    InvalidInput { width: i32, height: i32, len: usize },
    #[error("dual-layer image data has odd length {0}")]
    OddLayerSize(usize),
    #[error("image dimensions {width}x{height} do not match layer size {layer_size}")]
    SizeMismatch {
        width: i32,
        height: i32,
        layer_size: usize,
    },
    #[error(transparent)]
    Compression(#[from] CompressionError),
}
