//! Pipeline stages: script text → turn files → record files → splits.
//!
//! ```text
//! texts/hamlet.txt
//!   → dialogues/hamlet/dialogues_<i>.json   (one turn per line)
//!   → grouped/hamlet/dialogues_<i>.json     (one record per line)
//!   → splits/{train,val}/hamlet/...          (auxiliary fields stripped)
//! ```
//!
//! Each stage empties the directories it writes before writing them, so a
//! re-run never leaves files from an earlier run behind.

use std::path::{Path, PathBuf};

use playbill_core::Turn;
use playbill_core::constants::{TEXT_EXTENSION, scene_file_name};
use playbill_script::parse_script;
use playbill_settings::DatasetSettings;
use playbill_tokens::TokenCounter;
use tracing::{debug, info, warn};

use crate::cleanup::{CleanupReport, clean_up_context_lengths};
use crate::errors::{DatasetError, Result, WindowError};
use crate::files::{list_files, list_subdirs, path_name, path_stem, reset_dir};
use crate::jsonl::{read_json_lines, write_json_lines};
use crate::split::{SplitPlan, create_train_and_val_directories};
use crate::window::ContextWindowBuilder;

/// Directories used by a full run.
#[derive(Clone, Debug)]
pub struct PipelinePaths {
    /// Input `*.txt` scripts.
    pub text_dir: PathBuf,
    /// Per-work turn files.
    pub dialogue_dir: PathBuf,
    /// Per-work record files.
    pub grouped_dir: PathBuf,
    /// `train/` and `val/` output.
    pub splits_dir: PathBuf,
}

impl PipelinePaths {
    /// Standard layout under one root: `texts/`, `dialogues/`, `grouped/`
    /// and `splits/`.
    pub fn under(root: &Path) -> Self {
        Self {
            text_dir: root.join("texts"),
            dialogue_dir: root.join("dialogues"),
            grouped_dir: root.join("grouped"),
            splits_dir: root.join("splits"),
        }
    }
}

/// Counts from grouping scenes into records.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GroupReport {
    /// Scene files written.
    pub scenes: usize,
    /// Scene files skipped for having too few turns.
    pub skipped: usize,
    /// Records written.
    pub records: usize,
}

impl GroupReport {
    fn absorb(&mut self, other: Self) {
        self.scenes += other.scenes;
        self.skipped += other.skipped;
        self.records += other.records;
    }
}

/// Outcome of [`run_all`].
#[derive(Clone, Debug, Default)]
pub struct RunSummary {
    /// Works extracted from text.
    pub works: usize,
    /// Scene turn files written.
    pub scenes: usize,
    /// Grouping counts.
    pub grouped: GroupReport,
    /// Train/val assignment.
    pub plan: SplitPlan,
    /// Cleanup counts.
    pub cleanup: CleanupReport,
}

/// Parse one script and write a turn file per scene into `output_dir`.
///
/// `output_dir` is emptied first. Returns the number of scene files written.
pub fn extract_work(text_file: &Path, output_dir: &Path) -> Result<usize> {
    let text = std::fs::read_to_string(text_file).map_err(|e| DatasetError::io(text_file, e))?;
    reset_dir(output_dir)?;

    let scenes = parse_script(&text);
    for scene in &scenes {
        let path = output_dir.join(scene_file_name(scene.index));
        write_json_lines(&path, &scene.turns)?;
        debug!(path = %path.display(), turns = scene.turns.len(), "wrote scene turns");
    }

    info!(
        source = %text_file.display(),
        output = %output_dir.display(),
        scenes = scenes.len(),
        "extracted work"
    );
    Ok(scenes.len())
}

/// Extract every `*.txt` script in `text_dir` into
/// `<dialogue_dir>/<file stem>/`.
///
/// Returns `(works, scenes)`.
pub fn text_to_dialogues(text_dir: &Path, dialogue_dir: &Path) -> Result<(usize, usize)> {
    let text_files = list_files(text_dir, TEXT_EXTENSION)?;
    let mut scenes = 0;
    for text_file in &text_files {
        let title = path_stem(text_file)?;
        scenes += extract_work(text_file, &dialogue_dir.join(title))?;
    }
    Ok((text_files.len(), scenes))
}

/// Build records for every scene file of one work.
///
/// `output_dir` is emptied first. Output files keep the input file's name.
/// Scenes with fewer than two turns produce no file and are counted as
/// skipped.
pub fn group_work<C>(
    work_dir: &Path,
    output_dir: &Path,
    builder: &ContextWindowBuilder,
    counter: &C,
    extension: &str,
) -> Result<GroupReport>
where
    C: TokenCounter + ?Sized,
{
    reset_dir(output_dir)?;

    let mut report = GroupReport::default();
    for scene_file in list_files(work_dir, extension)? {
        let turns: Vec<Turn> = read_json_lines(&scene_file)?;
        let records = match builder.build(&turns, counter) {
            Ok(records) => records,
            Err(WindowError::TooFewTurns { found }) => {
                warn!(path = %scene_file.display(), turns = found, "too few turns, skipping scene");
                report.skipped += 1;
                continue;
            }
            Err(e) => return Err(e.into()),
        };

        let target = output_dir.join(path_name(&scene_file)?);
        write_json_lines(&target, &records)?;
        report.scenes += 1;
        report.records += records.len();
    }

    info!(
        work = %work_dir.display(),
        scenes = report.scenes,
        skipped = report.skipped,
        records = report.records,
        "grouped work"
    );
    Ok(report)
}

/// Run [`group_work`] for every work under `dialogue_dir`, writing into
/// `<grouped_dir>/<work>/`.
pub fn dialogues_to_groups<C>(
    dialogue_dir: &Path,
    grouped_dir: &Path,
    builder: &ContextWindowBuilder,
    counter: &C,
    extension: &str,
) -> Result<GroupReport>
where
    C: TokenCounter + ?Sized,
{
    let mut total = GroupReport::default();
    for work_dir in list_subdirs(dialogue_dir)? {
        let title = path_name(&work_dir)?;
        total.absorb(group_work(
            &work_dir,
            &grouped_dir.join(title),
            builder,
            counter,
            extension,
        )?);
    }
    Ok(total)
}

/// Run every stage: extract, group, split, strip auxiliary fields.
pub fn run_all<C>(paths: &PipelinePaths, settings: &DatasetSettings, counter: &C) -> Result<RunSummary>
where
    C: TokenCounter + ?Sized,
{
    let extension = settings.record_extension.as_str();
    let builder = ContextWindowBuilder::new(settings.max_input_length, settings.taskname.clone());

    let (works, scenes) = text_to_dialogues(&paths.text_dir, &paths.dialogue_dir)?;
    let grouped = dialogues_to_groups(
        &paths.dialogue_dir,
        &paths.grouped_dir,
        &builder,
        counter,
        extension,
    )?;
    let plan = create_train_and_val_directories(
        &paths.grouped_dir,
        &paths.splits_dir,
        settings.split_proportion,
        extension,
    )?;
    let cleanup = clean_up_context_lengths(&paths.splits_dir, extension)?;

    info!(
        works,
        scenes,
        records = grouped.records,
        skipped = grouped.skipped,
        train = plan.train.len(),
        val = plan.val.len(),
        "pipeline complete"
    );
    Ok(RunSummary {
        works,
        scenes,
        grouped,
        plan,
        cleanup,
    })
}
