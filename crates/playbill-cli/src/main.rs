//! # playbill
//!
//! Command-line entry point. Each pipeline stage is a subcommand; `run`
//! chains them all.

#![deny(unsafe_code)]

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use playbill_dataset::{
    ContextWindowBuilder, PipelinePaths, clean_up_context_lengths,
    create_train_and_val_directories, dialogues_to_groups, profile_works, run_all, set_taskname,
    text_to_dialogues, total_dataset_tokens, total_training_tokens,
};
use playbill_settings::PlaybillSettings;
use playbill_tokens::{HfTokenCounter, TokenCounter, WhitespaceCounter};

/// Build dialogue datasets from play scripts.
#[derive(Parser, Debug)]
#[command(name = "playbill", version, about = "Play scripts to context/response datasets")]
struct Cli {
    /// Settings file (defaults to `~/.playbill/settings.json`).
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    /// Log level or filter directive (overrides settings).
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Count whitespace-separated words instead of tokenizer tokens.
    #[arg(long, global = true)]
    whitespace: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Split `*.txt` scripts into per-scene turn files.
    Extract {
        /// Directory of `*.txt` scripts.
        #[arg(long)]
        texts: PathBuf,
        /// Output directory (one subdirectory per work).
        #[arg(long)]
        out: PathBuf,
    },

    /// Build context/response records from turn files.
    Group {
        /// Directory of per-work turn files.
        #[arg(long)]
        dialogues: PathBuf,
        /// Output directory (one subdirectory per work).
        #[arg(long)]
        out: PathBuf,
        /// Context budget in tokens (overrides settings).
        #[arg(long)]
        max_input_length: Option<usize>,
    },

    /// Assign whole works to `train/` and `val/` by token share.
    Split {
        /// Directory of per-work record files.
        #[arg(long)]
        grouped: PathBuf,
        /// Output directory for `train/` and `val/`.
        #[arg(long)]
        out: PathBuf,
        /// Share of tokens for training (overrides settings).
        #[arg(long)]
        proportion: Option<f64>,
    },

    /// Strip `context_length` bookkeeping from every record under a directory.
    Clean {
        /// Directory to rewrite in place.
        dir: PathBuf,
    },

    /// Overwrite the task name of every record under a directory.
    Taskname {
        /// Directory to rewrite in place.
        dir: PathBuf,
        /// New task name (defaults to the configured one).
        #[arg(long)]
        name: Option<String>,
    },

    /// Print per-work token totals and dataset sizes.
    Stats {
        /// Directory of per-work record files (still carrying lengths).
        #[arg(long)]
        grouped: PathBuf,
        /// Also count tokens in a records directory (e.g. `splits/train`).
        #[arg(long)]
        training: Option<PathBuf>,
        /// Also count tokens in a turn-file directory.
        #[arg(long)]
        dialogues: Option<PathBuf>,
    },

    /// Run every stage under one root: `texts/` in, `splits/` out.
    Run {
        /// Root directory holding `texts/`.
        root: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let settings_path = cli
        .settings
        .clone()
        .unwrap_or_else(playbill_settings::settings_path);
    let settings = playbill_settings::load_settings_from_path(&settings_path)
        .with_context(|| format!("Failed to load settings from {}", settings_path.display()))?;

    let level = cli.log_level.as_deref().unwrap_or(&settings.logging.level);
    if settings.logging.json {
        playbill_core::logging::init_json_subscriber(level);
    } else {
        playbill_core::logging::init_subscriber(level);
    }
    tracing::debug!(path = %settings_path.display(), "settings loaded");

    run_command(&cli, &settings)
}

fn run_command(cli: &Cli, settings: &PlaybillSettings) -> Result<()> {
    let dataset = &settings.dataset;
    let extension = dataset.record_extension.as_str();

    match &cli.command {
        Command::Extract { texts, out } => {
            let (works, scenes) = text_to_dialogues(texts, out)
                .with_context(|| format!("Failed to extract scripts from {}", texts.display()))?;
            println!("extracted {works} works, {scenes} scenes into {}", out.display());
        }
        Command::Group {
            dialogues,
            out,
            max_input_length,
        } => {
            let counter = build_counter(cli.whitespace, settings)?;
            let max_tokens = max_input_length.unwrap_or(dataset.max_input_length);
            let builder = ContextWindowBuilder::new(max_tokens, dataset.taskname.clone());
            let report = dialogues_to_groups(dialogues, out, &builder, &*counter, extension)
                .with_context(|| format!("Failed to group dialogues from {}", dialogues.display()))?;
            println!(
                "wrote {} records from {} scenes ({} skipped) into {}",
                report.records,
                report.scenes,
                report.skipped,
                out.display()
            );
        }
        Command::Split {
            grouped,
            out,
            proportion,
        } => {
            let proportion = proportion.unwrap_or(dataset.split_proportion);
            let plan = create_train_and_val_directories(grouped, out, proportion, extension)
                .with_context(|| format!("Failed to split {}", grouped.display()))?;
            println!(
                "train: {} works, {} tokens (goal {})",
                plan.train.len(),
                plan.train_tokens,
                plan.goal
            );
            println!("val: {} works, {} tokens", plan.val.len(), plan.val_tokens);
        }
        Command::Clean { dir } => {
            let report = clean_up_context_lengths(dir, extension)
                .with_context(|| format!("Failed to clean {}", dir.display()))?;
            println!(
                "cleaned {} of {} records in {} files",
                report.modified, report.records, report.files
            );
        }
        Command::Taskname { dir, name } => {
            let name = name.as_deref().unwrap_or(&dataset.taskname);
            let report = set_taskname(dir, name, extension)
                .with_context(|| format!("Failed to set taskname under {}", dir.display()))?;
            println!("set taskname on {} of {} records", report.modified, report.records);
        }
        Command::Stats {
            grouped,
            training,
            dialogues,
        } => print_stats(cli, settings, grouped, training.as_deref(), dialogues.as_deref())?,
        Command::Run { root } => {
            let counter = build_counter(cli.whitespace, settings)?;
            let paths = PipelinePaths::under(root);
            let summary = run_all(&paths, dataset, &*counter)
                .with_context(|| format!("Pipeline failed under {}", root.display()))?;
            println!(
                "{} works, {} scenes, {} records ({} scenes skipped)",
                summary.works, summary.scenes, summary.grouped.records, summary.grouped.skipped
            );
            println!("train: {}", summary.plan.train.join(", "));
            println!("val: {}", summary.plan.val.join(", "));
        }
    }
    Ok(())
}

fn print_stats(
    cli: &Cli,
    settings: &PlaybillSettings,
    grouped: &Path,
    training: Option<&Path>,
    dialogues: Option<&Path>,
) -> Result<()> {
    let extension = settings.dataset.record_extension.as_str();
    let profiles = profile_works(grouped, extension)
        .with_context(|| format!("Failed to profile {}", grouped.display()))?;

    for profile in &profiles {
        println!(
            "{:<32} {:>6} scenes {:>10} tokens",
            profile.title,
            profile.num_of_scenes,
            profile.total()
        );
    }
    let grand_total: usize = profiles.iter().map(playbill_core::WorkProfile::total).sum();
    println!("{:<32} {:>6} works  {:>10} tokens", "total", profiles.len(), grand_total);

    if training.is_none() && dialogues.is_none() {
        return Ok(());
    }
    let counter = build_counter(cli.whitespace, settings)?;
    if let Some(dir) = training {
        let tokens = total_training_tokens(dir, &*counter, extension)
            .with_context(|| format!("Failed to count tokens in {}", dir.display()))?;
        println!("training tokens in {}: {tokens}", dir.display());
    }
    if let Some(dir) = dialogues {
        let tokens = total_dataset_tokens(dir, &*counter, extension)
            .with_context(|| format!("Failed to count tokens in {}", dir.display()))?;
        println!("dialogue tokens in {}: {tokens}", dir.display());
    }
    Ok(())
}

fn build_counter(whitespace: bool, settings: &PlaybillSettings) -> Result<Box<dyn TokenCounter>> {
    if whitespace {
        return Ok(Box::new(WhitespaceCounter));
    }
    let counter = HfTokenCounter::from_settings(&settings.tokenizer)
        .with_context(|| format!("Failed to load tokenizer '{}'", settings.tokenizer.model))?;
    Ok(Box::new(counter))
}
