//! Where a pyramid lives inside its target group, and the names of its attributes.
//!
//! ```text
//! <group>                              painteraData, maxId
//! <group>/data                         multiScale, resolution, offset
//! <group>/data/s<k>                    level k: downsamplingFactors, maxId
//! <group>/unique-labels/s<k>           one sorted label list per block of level k
//! <group>/label-to-block-mapping/s<k>  one block list per label of level k
//! ```

use label_pyramids_storage::join_path;

pub const DATA_GROUP: &str = "data";
pub const UNIQUE_LABELS_GROUP: &str = "unique-labels";
pub const LABEL_TO_BLOCK_GROUP: &str = "label-to-block-mapping";

pub const MAX_ID_ATTRIBUTE: &str = "maxId";
pub const DOWNSAMPLING_FACTORS_ATTRIBUTE: &str = "downsamplingFactors";
pub const PAINTERA_DATA_ATTRIBUTE: &str = "painteraData";
pub const MULTI_SCALE_ATTRIBUTE: &str = "multiScale";
pub const RESOLUTION_ATTRIBUTE: &str = "resolution";
pub const OFFSET_ATTRIBUTE: &str = "offset";

/// The name of level `k` inside each of the per-level groups.
pub fn level_name(level: usize) -> String {
    format!("s{}", level)
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PyramidLayout {
    group: String,
}

impl PyramidLayout {
    pub fn new(group: &str) -> Self {
        Self {
            group: join_path("", group),
        }
    }

    pub fn group(&self) -> &str {
        &self.group
    }

    pub fn data_group(&self) -> String {
        join_path(&self.group, DATA_GROUP)
    }

    pub fn level_data(&self, level: usize) -> String {
        join_path(&self.data_group(), &level_name(level))
    }

    pub fn unique_labels(&self, level: usize) -> String {
        join_path(&join_path(&self.group, UNIQUE_LABELS_GROUP), &level_name(level))
    }

    pub fn label_to_block(&self, level: usize) -> String {
        join_path(&join_path(&self.group, LABEL_TO_BLOCK_GROUP), &level_name(level))
    }

    /// Every path written for `level`.
    pub fn level_paths(&self, level: usize) -> [String; 3] {
        [
            self.level_data(level),
            self.unique_labels(level),
            self.label_to_block(level),
        ]
    }
}

// ████████╗███████╗███████╗████████╗
// ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝
//    ██║   █████╗  ███████╗   ██║
//    ██║   ██╔══╝  ╚════██║   ██║
//    ██║   ███████╗███████║   ██║
//    ╚═╝   ╚══════╝╚══════╝   ╚═╝
