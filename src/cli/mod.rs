//! # CLI Module
//!
//! Command-line interface for the file sorter.
//!
//! ## Usage
//! ```bash
//! # Sort the current directory into ./out/<year>/<MM Month>
//! file-sorter
//!
//! # Use EXIF dates, preview only
//! file-sorter -i ~/Dump -o ~/Photos --pictures --whatif
//!
//! # Fix timestamps in place across a whole tree
//! file-sorter -i ~/Photos -p -u -n -r -y
//! ```

use clap::Parser;
use console::{style, Key, Term};
use file_sorter::core::pipeline::Pipeline;
use file_sorter::core::relocator::{OperationOutcome, DEFAULT_MAX_ADJUSTMENT_DAYS};
use file_sorter::core::tagging::{VisionClient, VisionConfig, DEFAULT_API_VERSION};
use file_sorter::error::{Result, SorterError};
use file_sorter::events::{
    Event, EventChannel, EventReceiver, FileEvent, RunEvent, RunSummary, ScanEvent,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::thread;

/// File Sorter - file photos and documents into year/month folders
#[derive(Parser, Debug)]
#[command(name = "file-sorter")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// The directory containing the files to process
    #[arg(short, long, default_value = ".")]
    input: PathBuf,

    /// The directory in which to create year/month folders.
    ///
    /// Defaults to `out` inside INPUT, not inside the working directory.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Use embedded (EXIF) dates of pictures and videos where possible
    #[arg(short, long)]
    pictures: bool,

    /// Don't change anything, just show what would happen
    #[arg(long)]
    whatif: bool,

    /// Overwrite files that already exist in the destination
    #[arg(short, long)]
    force: bool,

    /// Update creation/write times and embedded dates to the chosen time
    #[arg(short, long)]
    update_timestamp: bool,

    /// The maximum number of days a filesystem time may be adjusted by
    #[arg(long = "max-adjust", default_value_t = DEFAULT_MAX_ADJUSTMENT_DAYS)]
    max_adjust: u32,

    /// Don't move any files (useful with -u to update times only)
    #[arg(short, long)]
    no_move: bool,

    /// Process all subdirectories too; requires --no-move
    #[arg(short, long)]
    recurse: bool,

    /// Do not prompt before starting
    #[arg(short = 'y', long)]
    confirm: bool,

    /// Ask the vision service for tags for each picture
    #[arg(short, long)]
    tag: bool,

    /// Include hidden files
    #[arg(long)]
    include_hidden: bool,

    /// Show every per-file outcome, not just moves and problems
    #[arg(short, long)]
    verbose: bool,

    /// Print the run summary as JSON
    #[arg(long)]
    json: bool,

    /// Azure OpenAI endpoint for --tag
    #[arg(long, env = "GPT_ENDPOINT", hide_env_values = true)]
    gpt_endpoint: Option<String>,

    /// Azure OpenAI API key for --tag
    #[arg(long, env = "GPT_API_KEY", hide_env_values = true)]
    gpt_api_key: Option<String>,

    /// Vision-capable deployment name for --tag
    #[arg(long, env = "GPT_DEPLOYMENT")]
    gpt_deployment: Option<String>,

    /// API version for --tag
    #[arg(long, env = "GPT_API_VERSION", default_value = DEFAULT_API_VERSION)]
    gpt_api_version: String,
}

/// Run the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let term = Term::stderr();

    term.write_line(&format!(
        "{} {}",
        style("File Sorter").bold().cyan(),
        style(concat!("v", env!("CARGO_PKG_VERSION"))).dim()
    ))
    .ok();

    let output = cli
        .output
        .clone()
        .unwrap_or_else(|| cli.input.join("out"));

    let mut builder = Pipeline::builder()
        .input(cli.input.clone())
        .output(output.clone())
        .pictures(cli.pictures)
        .recursive(cli.recurse)
        .include_hidden(cli.include_hidden)
        .dry_run(cli.whatif)
        .overwrite(cli.force)
        .update_timestamps(cli.update_timestamp)
        .max_adjustment_days(cli.max_adjust)
        .no_move(cli.no_move);

    if cli.tag {
        builder = builder.tagger(Box::new(VisionClient::new(vision_config(&cli)?)?));
    }

    let pipeline = match builder.build() {
        Ok(pipeline) => pipeline,
        Err(e) => {
            term.write_line(&format!("{} {}", style("ERROR:").red().bold(), e))
                .ok();
            return Err(e);
        }
    };

    let (sender, receiver) = EventChannel::new();
    let scanned = pipeline.scan(&sender)?;
    // scan errors were already collected in `scanned`
    let _ = receiver.drain();

    for error in &scanned.errors {
        term.write_line(&format!("{} {}", style("Skipping").yellow(), error))
            .ok();
    }

    if !cli.confirm && !confirm(&term, scanned.files.len(), &cli.input, &output) {
        return Ok(());
    }

    term.write_line("Processing files...").ok();

    let progress = ProgressBar::new(scanned.files.len() as u64);
    if let Ok(bar_style) = ProgressStyle::default_bar()
        .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
    {
        progress.set_style(bar_style.progress_chars("█▓░"));
    }

    let render_progress = progress.clone();
    let verbose = cli.verbose;
    let event_thread = thread::spawn(move || render_events(receiver, render_progress, verbose));

    let summary = pipeline.process(&scanned.files, &sender);

    // Drop sender to signal event thread to finish
    drop(sender);
    event_thread.join().ok();
    progress.finish_and_clear();

    if cli.json {
        print_json_summary(&summary)?;
    } else {
        print_summary(&term, &summary);
    }

    Ok(())
}

fn vision_config(cli: &Cli) -> Result<VisionConfig> {
    let missing = |name: &str| SorterError::Config(format!("--tag requires {} to be set", name));

    let mut config = VisionConfig::new(
        cli.gpt_endpoint.clone().ok_or_else(|| missing("GPT_ENDPOINT"))?,
        cli.gpt_api_key.clone().ok_or_else(|| missing("GPT_API_KEY"))?,
        cli.gpt_deployment
            .clone()
            .ok_or_else(|| missing("GPT_DEPLOYMENT"))?,
    );
    config.api_version = cli.gpt_api_version.clone();
    Ok(config)
}

fn confirm(term: &Term, count: usize, input: &Path, output: &Path) -> bool {
    term.write_line(&format!(
        "About to process {} file(s) from {} into {} ...",
        style(count).cyan(),
        input.display(),
        output.display()
    ))
    .ok();
    term.write_line(&format!(
        "{}",
        style("This operation cannot be undone! Press any key to continue or Esc to cancel")
            .yellow()
    ))
    .ok();

    !matches!(term.read_key(), Ok(Key::Escape))
}

fn render_events(receiver: EventReceiver, progress: ProgressBar, verbose: bool) {
    for event in receiver.iter() {
        let line = match event {
            Event::File(FileEvent::Moving { path, placement }) => {
                Some(format!("{} -> {}", file_name(&path), style(placement).cyan()))
            }
            Event::File(FileEvent::TimestampUpdate { path, to }) => Some(format!(
                "Updating filesystem time on {} -> {}",
                path.display(),
                to.format("%Y-%m-%d %H:%M:%S")
            )),
            Event::File(FileEvent::EmbeddedUpdate { path, to }) => Some(format!(
                "Updating embedded time on {} -> {}",
                path.display(),
                to.format("%Y-%m-%d %H:%M:%S")
            )),
            Event::File(FileEvent::AdjustmentTooLarge {
                path,
                file_time,
                resolved,
                ..
            }) => Some(format!(
                "{} File time on {} is too far off from calculated time ({} vs {}), skipping ...",
                style("WARNING:").yellow().bold(),
                path.display(),
                file_time.format("%Y-%m-%d"),
                resolved.format("%Y-%m-%d")
            )),
            Event::File(FileEvent::MetadataWriteFailed { path, field, .. }) if verbose => {
                Some(format!(
                    "{}",
                    style(format!("Could not write {} to {}", field, path.display())).dim()
                ))
            }
            Event::File(FileEvent::Tagging { description, .. }) => Some(format!(
                "Sending image with description '{}' ...",
                description
            )),
            Event::File(FileEvent::Tagged { path, tags }) => Some(format!(
                "{}: {}",
                file_name(&path),
                style(tags.join("; ")).green()
            )),
            Event::File(FileEvent::TagSkipped { message, .. }) => {
                Some(format!("{}", style(message).yellow()))
            }
            Event::File(FileEvent::Completed { path, outcome }) => {
                progress.inc(1);
                match outcome {
                    OperationOutcome::Error { reason } => Some(format!(
                        "{} {}: {}",
                        style("Error processing").red().bold(),
                        path.display(),
                        reason
                    )),
                    other if verbose => Some(format!(
                        "{}",
                        style(format!("{}: {:?}", file_name(&path), other)).dim()
                    )),
                    _ => None,
                }
            }
            Event::Scan(ScanEvent::Error { message, .. }) => {
                Some(format!("{} {}", style("Skipping").yellow(), message))
            }
            Event::Run(RunEvent::Completed { .. }) => {
                progress.set_message("done");
                None
            }
            _ => None,
        };

        if let Some(line) = line {
            progress.println(line);
        }
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn print_summary(term: &Term, summary: &RunSummary) {
    term.write_line("").ok();
    term.write_line(&format!(
        "{} {}",
        style("✓").green().bold(),
        if summary.dry_run {
            "Dry Run Complete"
        } else {
            "Sort Complete"
        }
    ))
    .ok();
    term.write_line("").ok();

    term.write_line(&format!(
        "  {} files processed in {:.1}s",
        style(summary.total_files).cyan(),
        summary.duration_ms as f64 / 1000.0
    ))
    .ok();
    term.write_line(&format!("  {} moved", style(summary.moved).cyan()))
        .ok();
    if summary.timestamps_updated > 0 {
        term.write_line(&format!(
            "  {} timestamps updated in place",
            style(summary.timestamps_updated).cyan()
        ))
        .ok();
    }
    if summary.skipped > 0 {
        term.write_line(&format!("  {} left in place", style(summary.skipped).dim()))
            .ok();
    }
    if summary.errors > 0 {
        term.write_line(&format!("  {} errors", style(summary.errors).red()))
            .ok();
    }

    if summary.dry_run {
        term.write_line("").ok();
        term.write_line(&format!(
            "{}",
            style("Nothing was changed. Run again without --whatif to apply.").dim()
        ))
        .ok();
    }
}

fn print_json_summary(summary: &RunSummary) -> Result<()> {
    let json = serde_json::to_string_pretty(summary)
        .map_err(|e| SorterError::Config(format!("Failed to serialize summary: {}", e)))?;
    println!("{}", json);
    Ok(())
}
