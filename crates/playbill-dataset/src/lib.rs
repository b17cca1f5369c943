//! # playbill-dataset
//!
//! Turns parsed scenes into a training dataset on disk:
//!
//! - **Windows**: [`ContextWindowBuilder`] pairs each turn with the preceding
//!   dialogue, truncated from the oldest turn to fit a token budget
//! - **JSON Lines**: [`read_json_lines`] / [`write_json_lines`] for scene files
//! - **Splitting**: [`balance_split`] assigns whole works to train/val by
//!   token share; [`create_train_and_val_directories`] materializes it
//! - **Cleanup**: [`clean_up_context_lengths`] strips bookkeeping fields
//! - **Pipeline**: [`run_all`] chains every stage

#![deny(unsafe_code)]

pub mod cleanup;
pub mod errors;
pub mod files;
pub mod jsonl;
pub mod pipeline;
pub mod split;
pub mod stats;
pub mod window;

pub use cleanup::{CleanupReport, clean_up_context_lengths, set_taskname, strip_auxiliary_fields};
pub use errors::{DatasetError, Result, SplitError, WindowError};
pub use jsonl::{read_json_lines, write_json_lines};
pub use pipeline::{
    GroupReport, PipelinePaths, RunSummary, dialogues_to_groups, extract_work, group_work, run_all,
    text_to_dialogues,
};
pub use split::{
    SplitPlan, WorkTotal, balance_split, create_train_and_val_directories, profile_work,
    profile_works,
};
pub use stats::{longest_context, total_dataset_tokens, total_training_tokens};
pub use window::{ContextWindowBuilder, FittedContext, fit_context};
