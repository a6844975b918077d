#[cfg(test)]
mod capture;
pub mod codec;
pub mod compression;
pub mod error;
pub mod format;
mod frame;
pub mod image;

pub use codec::{Codec, CodecError};
pub use compression::Compression;
pub use error::{CompressionError, FrameError, ImageError};
pub use format::{FrameHeader, FRAME_HEADER_SIZE};
pub use image::Image;
