//! Dataset construction settings.

use playbill_core::constants::{
    DEFAULT_MAX_INPUT_LENGTH, DEFAULT_SPLIT_PROPORTION, DEFAULT_TASKNAME, RECORD_EXTENSION,
};
use serde::{Deserialize, Serialize};

/// How records are built and split.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DatasetSettings {
    /// Token budget for a record's context.
    pub max_input_length: usize,
    /// Task name stamped on every record.
    pub taskname: String,
    /// Target share of tokens in the training split (0, 1].
    pub split_proportion: f64,
    /// Extension of scene files.
    pub record_extension: String,
}

impl Default for DatasetSettings {
    fn default() -> Self {
        Self {
            max_input_length: DEFAULT_MAX_INPUT_LENGTH,
            taskname: DEFAULT_TASKNAME.to_string(),
            split_proportion: DEFAULT_SPLIT_PROPORTION,
            record_extension: RECORD_EXTENSION.to_string(),
        }
    }
}
