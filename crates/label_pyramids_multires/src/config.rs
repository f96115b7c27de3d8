use crate::{DownsamplingStrategy, PyramidError, PyramidResult};

use label_pyramids_core::prelude::*;
use label_pyramids_storage::BlockCompression;

use serde::{Deserialize, Serialize};

/// How to build one pyramid. Can be written as TOML:
///
/// ```toml
/// strategy = "winner-takes-all"
/// block_shape = [64, 64, 64]
/// max_levels = 4
/// compression = { type = "lz4", level = 5 }
/// overwrite_existing = true
/// ```
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct PyramidConfig {
    pub strategy: DownsamplingStrategy,
    /// The block shape of every level. Defaults to the source's block shape.
    pub block_shape: Option<Point3i>,
    /// The most levels to write, counting `s0`. Unlimited by default.
    pub max_levels: Option<usize>,
    pub compression: BlockCompression,
    /// Replace an existing target group instead of failing with `OutputExists`.
    pub overwrite_existing: bool,
    /// Check every finished level's indices against its blocks.
    pub verify_indices: bool,
}

impl Default for PyramidConfig {
    fn default() -> Self {
        Self {
            strategy: DownsamplingStrategy::default(),
            block_shape: None,
            max_levels: None,
            compression: BlockCompression::Raw,
            overwrite_existing: false,
            verify_indices: false,
        }
    }
}

impl PyramidConfig {
    pub fn from_toml_str(s: &str) -> PyramidResult<Self> {
        let config: Self = toml::from_str(s).map_err(|e| PyramidError::InvalidConfig(e.to_string()))?;
        config.validate()?;

        Ok(config)
    }

    pub fn validate(&self) -> PyramidResult<()> {
        if let Some(shape) = self.block_shape {
            if !(shape > Point3i::ZERO) {
                return Err(PyramidError::InvalidConfig(format!(
                    "block shape {:?} is not positive",
                    shape
                )));
            }
        }
        if self.max_levels == Some(0) {
            return Err(PyramidError::InvalidConfig("max_levels must be at least 1".into()));
        }

        Ok(())
    }

    pub fn with_strategy(mut self, strategy: DownsamplingStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_block_shape(mut self, block_shape: Point3i) -> Self {
        self.block_shape = Some(block_shape);
        self
    }

    pub fn with_max_levels(mut self, max_levels: usize) -> Self {
        self.max_levels = Some(max_levels);
        self
    }

    pub fn with_compression(mut self, compression: BlockCompression) -> Self {
        self.compression = compression;
        self
    }

    pub fn with_overwrite_existing(mut self, overwrite_existing: bool) -> Self {
        self.overwrite_existing = overwrite_existing;
        self
    }

    pub fn with_verify_indices(mut self, verify_indices: bool) -> Self {
        self.verify_indices = verify_indices;
        self
    }
}

// ████████╗███████╗███████╗████████╗
// ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝
//    ██║   █████╗  ███████╗   ██║
//    ██║   ██╔══╝  ╚════██║   ██║
//    ██║   ███████╗███████║   ██║
//    ╚═╝   ╚══════╝╚══════╝   ╚═╝
