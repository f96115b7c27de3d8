#[cfg(feature = "lz4")]
mod lz4_compression;
#[cfg(feature = "snap")]
mod snappy_compression;

#[cfg(feature = "lz4")]
pub use lz4_compression::Lz4;
#[cfg(feature = "snap")]
pub use snappy_compression::Snappy;

use crate::StorageResult;

use serde::{Deserialize, Serialize};

/// A compression algorithm that acts directly on a slice of bytes.
pub trait BytesCompression {
    fn compress_bytes(&self, bytes: &[u8], compressed_bytes: impl std::io::Write) -> std::io::Result<()>;
    fn decompress_bytes(compressed_bytes: &[u8], bytes: &mut impl std::io::Write) -> std::io::Result<()>;
}

/// How the blocks of one dataset are compressed. Stored in the dataset's `compression` attribute, e.g.
/// `{"type": "lz4", "level": 10}`.
///
/// Every variant can be named in attributes, but `Lz4` and `Snappy` only work with the `lz4` and `snap` features enabled.
/// Otherwise reading or writing such a block fails with `StorageError::CompressionUnavailable`.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum BlockCompression {
    Raw,
    Lz4 {
        /// From 0 to 10. 0 is fastest and least aggressive. 10 is slowest and most aggressive.
        #[serde(default = "default_lz4_level")]
        level: u32,
    },
    Snappy,
}

fn default_lz4_level() -> u32 {
    10
}

impl Default for BlockCompression {
    fn default() -> Self {
        BlockCompression::Raw
    }
}

impl BlockCompression {
    pub fn compress(&self, bytes: &[u8]) -> StorageResult<Vec<u8>> {
        match *self {
            BlockCompression::Raw => Ok(bytes.to_vec()),
            #[cfg(feature = "lz4")]
            BlockCompression::Lz4 { level } => {
                let mut compressed = Vec::new();
                Lz4 { level }.compress_bytes(bytes, &mut compressed)?;
                Ok(compressed)
            }
            #[cfg(not(feature = "lz4"))]
            BlockCompression::Lz4 { .. } => Err(crate::StorageError::CompressionUnavailable("lz4")),
            #[cfg(feature = "snap")]
            BlockCompression::Snappy => {
                let mut compressed = Vec::new();
                Snappy.compress_bytes(bytes, &mut compressed)?;
                Ok(compressed)
            }
            #[cfg(not(feature = "snap"))]
            BlockCompression::Snappy => Err(crate::StorageError::CompressionUnavailable("snappy")),
        }
    }

    pub fn decompress(&self, compressed_bytes: &[u8]) -> StorageResult<Vec<u8>> {
        match *self {
            BlockCompression::Raw => Ok(compressed_bytes.to_vec()),
            #[cfg(feature = "lz4")]
            BlockCompression::Lz4 { .. } => {
                let mut bytes = Vec::new();
                Lz4::decompress_bytes(compressed_bytes, &mut bytes)?;
                Ok(bytes)
            }
            #[cfg(not(feature = "lz4"))]
            BlockCompression::Lz4 { .. } => Err(crate::StorageError::CompressionUnavailable("lz4")),
            #[cfg(feature = "snap")]
            BlockCompression::Snappy => {
                let mut bytes = Vec::new();
                Snappy::decompress_bytes(compressed_bytes, &mut bytes)?;
                Ok(bytes)
            }
            #[cfg(not(feature = "snap"))]
            BlockCompression::Snappy => Err(crate::StorageError::CompressionUnavailable("snappy")),
        }
    }
}

// ████████╗███████╗███████╗████████╗
// ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝
//    ██║   █████╗  ███████╗   ██║
//    ██║   ██╔══╝  ╚════██║   ██║
//    ██║   ███████╗███████║   ██║
//    ╚═╝   ╚══════╝╚══════╝   ╚═╝
