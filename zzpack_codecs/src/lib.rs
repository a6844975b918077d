mod lz4_codec;
mod passthrough;
mod zlib_codec;

pub use lz4_codec::Lz4Codec;
pub use passthrough::PassThroughCodec;
pub use zlib_codec::ZlibCodec;

use std::sync::Arc;

use zzpack_core::format::{CODEC_LZ4, CODEC_PASSTHROUGH, CODEC_ZLIB};
use zzpack_core::{Codec, Compression};

/// Resolve a codec from its numeric id.
pub fn codec_by_id(id: u16) -> anyhow::Result<Arc<dyn Codec>> {
    match id {
        CODEC_PASSTHROUGH => Ok(Arc::new(PassThroughCodec)),
        CODEC_ZLIB => Ok(Arc::new(ZlibCodec::default())),
        CODEC_LZ4 => Ok(Arc::new(Lz4Codec)),
        _ => anyhow::bail!("unknown codec id {}; supported: 0 (passthrough), 1 (zlib), 2 (lz4)", id),
    }
}

/// Resolve a codec from a CLI name. `level` only applies to zlib.
pub fn codec_by_name(name: &str, level: u32) -> anyhow::Result<Arc<dyn Codec>> {
    match name {
        "zlib" | "z" | "deflate" => Ok(Arc::new(ZlibCodec::new(level))),
        "lz4" | "l" => Ok(Arc::new(Lz4Codec)),
        "passthrough" | "pass" | "none" => Ok(Arc::new(PassThroughCodec)),
        other => anyhow::bail!("unknown codec '{}'. Valid options: zlib, lz4, passthrough", other),
    }
}

/// The adapter used for game assets: zlib at the default level.
pub fn default_compression() -> Compression {
    Compression::new(Arc::new(ZlibCodec::default()))
}
