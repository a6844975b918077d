use std::io::Read;

/// The only frame layout understood by this crate.
pub const FORMAT_VERSION_0: u16 = 0;

/// Fixed size of a frame header in bytes.
///   raw_size:u32 + zip_size:u32 + version:u16 + reserved:u16
///   = 4 + 4 + 2 + 2 = 12
pub const FRAME_HEADER_SIZE: usize = 12;

// ── Codec IDs ──────────────────────────────────────────────────────────────

pub const CODEC_PASSTHROUGH: u16 = 0;
pub const CODEC_ZLIB: u16 = 1;
pub const CODEC_LZ4: u16 = 2;

// ── Header ─────────────────────────────────────────────────────────────────

/// Decoded representation of the 12-byte frame header.
///
/// All integers are little-endian on the wire. The two trailing reserved
/// bytes are written as zero and ignored on read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHeader {
    /// Length of the data before compression.
    pub raw_size: u32,
    /// Length of the compressed payload following the header.
    pub zip_size: u32,
    /// Frame layout version; only `FORMAT_VERSION_0` is readable.
    pub version: u16,
}

impl FrameHeader {
    pub fn new(raw_size: u32, zip_size: u32) -> Self {
        Self {
            raw_size,
            zip_size,
            version: FORMAT_VERSION_0,
        }
    }

    /// Serialize to exactly `FRAME_HEADER_SIZE` bytes.
    pub fn to_bytes(&self) -> [u8; FRAME_HEADER_SIZE] {
        let mut buf = [0u8; FRAME_HEADER_SIZE];
        buf[0..4].copy_from_slice(&self.raw_size.to_le_bytes());
        buf[4..8].copy_from_slice(&self.zip_size.to_le_bytes());
        buf[8..10].copy_from_slice(&self.version.to_le_bytes());
        // buf[10..12] reserved, stays zero
        buf
    }

    /// Deserialize from `FRAME_HEADER_SIZE` bytes. No validation is done here.
    pub fn from_bytes(buf: &[u8; FRAME_HEADER_SIZE]) -> Self {
        Self {
            raw_size: u32::from_le_bytes([buf[0], buf[1], buf[2], buf[3]]),
            zip_size: u32::from_le_bytes([buf[4], buf[5], buf[6], buf[7]]),
            version: u16::from_le_bytes([buf[8], buf[9]]),
        }
    }

    /// Read a header, consuming the reserved bytes as well.
    pub fn read_from(input: &mut impl Read) -> std::io::Result<Self> {
        let mut buf = [0u8; FRAME_HEADER_SIZE];
        input.read_exact(&mut buf)?;
        Ok(Self::from_bytes(&buf))
    }

    /// Compression ratio (raw / compressed).
    pub fn ratio(&self) -> f64 {
        if self.zip_size == 0 {
            return 1.0;
        }
        self.raw_size as f64 / self.zip_size as f64
    }
}
