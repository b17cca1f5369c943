//! Train/validation splitting balanced by token count.
//!
//! Works are ranked by their total context length, largest first, and moved
//! into the training set until it holds at least `proportion` of all tokens.
//! Everything left over is validation. Whole works are assigned, so no play
//! appears in both splits.

use std::path::Path;

use playbill_core::WorkProfile;
use playbill_core::constants::{TRAIN_DIR, VAL_DIR};
use playbill_core::types::DialogueRecord;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::errors::{DatasetError, Result, SplitError};
use crate::files::{collect_files, copy_dir_all, list_subdirs, path_name, reset_dir};
use crate::jsonl::read_json_lines;

/// A work's identifier and token total.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WorkTotal {
    /// Work title.
    pub title: String,
    /// Total tokens attributed to the work.
    pub total: usize,
}

impl From<&WorkProfile> for WorkTotal {
    fn from(profile: &WorkProfile) -> Self {
        Self {
            title: profile.title.clone(),
            total: profile.total(),
        }
    }
}

/// The outcome of balancing: disjoint train and validation titles.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitPlan {
    /// Titles in the training split, in rank order.
    pub train: Vec<String>,
    /// Titles in the validation split, in rank order.
    pub val: Vec<String>,
    /// Token goal for the training split.
    pub goal: usize,
    /// Tokens in the training split.
    pub train_tokens: usize,
    /// Tokens in the validation split.
    pub val_tokens: usize,
}

/// Greedily assign works to train until `proportion` of all tokens is
/// reached.
///
/// The goal is `floor(proportion * grand_total)`. Works are taken largest
/// first (ties by title); each is added to train before the running total is
/// compared with the goal, so a non-empty input always puts at least one
/// work in train.
pub fn balance_split(works: &[WorkTotal], proportion: f64) -> std::result::Result<SplitPlan, SplitError> {
    if !(proportion > 0.0 && proportion <= 1.0) {
        return Err(SplitError::InvalidProportion(proportion));
    }

    let grand_total: usize = works.iter().map(|w| w.total).sum();
    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    let goal = (grand_total as f64 * proportion).floor() as usize;

    let mut ranked: Vec<&WorkTotal> = works.iter().collect();
    ranked.sort_by(|a, b| b.total.cmp(&a.total).then_with(|| a.title.cmp(&b.title)));

    let mut plan = SplitPlan {
        goal,
        ..SplitPlan::default()
    };
    for work in ranked {
        if !plan.train.is_empty() && plan.train_tokens >= goal {
            plan.val.push(work.title.clone());
            plan.val_tokens += work.total;
        } else {
            plan.train.push(work.title.clone());
            plan.train_tokens += work.total;
        }
    }
    Ok(plan)
}

/// Read a work's scene files and record the longest context of each.
///
/// Scene files without records count as 0. Records must still carry
/// `context_length`; profiling a cleaned directory is an error.
pub fn profile_work(work_dir: &Path, extension: &str) -> Result<WorkProfile> {
    let title = path_name(work_dir)?;
    let scene_files = collect_files(work_dir, extension)?;

    let mut context_lengths = Vec::with_capacity(scene_files.len());
    for path in &scene_files {
        let records: Vec<DialogueRecord> = read_json_lines(path)?;
        if records.is_empty() {
            warn!(work = %title, path = %path.display(), "scene file has no records");
        }
        let mut longest = 0;
        for (index, record) in records.iter().enumerate() {
            let length = record
                .context_length
                .ok_or_else(|| DatasetError::MissingContextLength {
                    path: path.clone(),
                    line: index + 1,
                })?;
            longest = longest.max(length);
        }
        debug!(work = %title, path = %path.display(), longest, "profiled scene");
        context_lengths.push(longest);
    }

    Ok(WorkProfile {
        title,
        num_of_scenes: scene_files.len(),
        context_lengths,
    })
}

/// Profile every work directory under `grouped_dir`, sorted by total
/// ascending (ties by title).
pub fn profile_works(grouped_dir: &Path, extension: &str) -> Result<Vec<WorkProfile>> {
    let mut profiles = list_subdirs(grouped_dir)?
        .iter()
        .map(|dir| profile_work(dir, extension))
        .collect::<Result<Vec<_>>>()?;
    profiles.sort_by(|a, b| a.total().cmp(&b.total()).then_with(|| a.title.cmp(&b.title)));
    Ok(profiles)
}

/// Balance the works under `grouped_dir` and copy each into
/// `<splits_dir>/train/<title>` or `<splits_dir>/val/<title>`.
///
/// `train/` and `val/` are emptied first, so a work assigned differently by
/// an earlier run never remains in both.
pub fn create_train_and_val_directories(
    grouped_dir: &Path,
    splits_dir: &Path,
    proportion: f64,
    extension: &str,
) -> Result<SplitPlan> {
    let profiles = profile_works(grouped_dir, extension)?;
    let totals: Vec<WorkTotal> = profiles.iter().map(WorkTotal::from).collect();
    let plan = balance_split(&totals, proportion)?;

    let train_dir = splits_dir.join(TRAIN_DIR);
    let val_dir = splits_dir.join(VAL_DIR);
    for dir in [&train_dir, &val_dir] {
        reset_dir(dir)?;
    }

    for (titles, target) in [(&plan.train, &train_dir), (&plan.val, &val_dir)] {
        for title in titles {
            let copied = copy_dir_all(&grouped_dir.join(title), &target.join(title))?;
            debug!(work = %title, target = %target.display(), files = copied, "copied work");
        }
    }

    info!(
        train = plan.train.len(),
        val = plan.val.len(),
        train_tokens = plan.train_tokens,
        val_tokens = plan.val_tokens,
        goal = plan.goal,
        "split works"
    );
    Ok(plan)
}
