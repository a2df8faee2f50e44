//! CLI entry point for the zipshelf archive preview tool.
//!
//! This binary scans a folder tree for zip archives, extracts preview
//! thumbnails, and persists the results to a JSON store for later
//! inspection.
//!
//! # Usage
//!
//! ```bash
//! zipshelf [OPTIONS] <COMMAND>
//!
//! # Scan a library and persist previews
//! zipshelf scan /path/to/library
//!
//! # Extract the thumbnail of one archive
//! zipshelf thumbnail /path/to/vol1.zip
//!
//! # Extract every image of one archive
//! zipshelf images /path/to/vol1.zip
//!
//! # Show the persisted result of the last scan
//! zipshelf show
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

use std::io::Write;
use std::sync::Arc;

use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use zs_archive::{generate_thumbnail, load_all_images};
use zs_core::{CacheState, JsonFileStore, KeyValueStore, PreviewRecord};
use zs_scanner::{ScanController, ScanOutcome, ScanSummary, ScanUpdate};

// =============================================================================
// CLI ARGUMENT TYPES
// =============================================================================

/// CLI tool for scanning zip archive libraries and extracting image
/// previews.
///
/// Discovers `.zip` files under a folder, extracts one thumbnail per
/// archive, and persists the preview list to a JSON store.
#[derive(Parser)]
#[command(name = "zipshelf", version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Command to execute.
    #[command(subcommand)]
    command: Commands,

    /// Path to the JSON store file.
    ///
    /// Defaults to `./zipshelf-store.json` if not specified.
    #[arg(short, long, global = true, env = "ZIPSHELF_STORE")]
    store: Option<Utf8PathBuf>,

    /// Enable verbose logging (debug level).
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output.
    #[arg(long, global = true)]
    no_color: bool,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Scan a folder for archives, extract thumbnails, persist previews.
    Scan {
        /// Root folder to scan.
        root: Utf8PathBuf,

        /// Follow symbolic links during discovery.
        #[arg(long)]
        follow_links: bool,

        /// Emit the final result as JSON instead of a text summary.
        #[arg(long)]
        json: bool,
    },

    /// Extract the representative thumbnail of one archive.
    Thumbnail {
        /// Path to the archive.
        archive: Utf8PathBuf,
    },

    /// Extract every qualifying image of one archive, in page order.
    Images {
        /// Path to the archive.
        archive: Utf8PathBuf,

        /// Emit a JSON array instead of one data URL per line.
        #[arg(long)]
        json: bool,
    },

    /// Show the persisted result of the most recent scan.
    Show {
        /// Emit the persisted state as JSON.
        #[arg(long)]
        json: bool,
    },
}

// =============================================================================
// INITIALIZATION FUNCTIONS
// =============================================================================

/// Initializes the tracing subscriber for logging.
///
/// Respects the `RUST_LOG` environment variable if set. Otherwise, uses
/// `debug` level if `--verbose` is set, or `info` level by default.
fn init_tracing(verbose: bool, no_color: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = if verbose { "debug" } else { "info" };
        EnvFilter::new(format!("{level},ignore=warn"))
    });

    // Check if colors should be disabled (flag or NO_COLOR env var)
    let use_ansi = !no_color && std::env::var("NO_COLOR").is_err();

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_ansi(use_ansi))
        .with(filter)
        .init();
}

/// Opens the JSON store named by the CLI arguments.
///
/// # Errors
///
/// Returns an error if an existing store file cannot be read or parsed.
fn open_store(cli: &Cli) -> color_eyre::Result<Arc<JsonFileStore>> {
    let path = cli
        .store
        .clone()
        .unwrap_or_else(|| Utf8PathBuf::from("./zipshelf-store.json"));

    let store = JsonFileStore::open(&path)
        .map_err(|e| color_eyre::eyre::eyre!("Failed to open store {}: {}", path, e))?;
    Ok(Arc::new(store))
}

/// Validates that a path exists and is a directory.
fn validate_dir(path: &Utf8PathBuf) -> color_eyre::Result<()> {
    if !path.exists() {
        return Err(color_eyre::eyre::eyre!("Path does not exist: {}", path));
    }
    if !path.is_dir() {
        return Err(color_eyre::eyre::eyre!("Path is not a directory: {}", path));
    }
    Ok(())
}

/// Validates that a path exists and is a file.
fn validate_file(path: &Utf8PathBuf) -> color_eyre::Result<()> {
    if !path.exists() {
        return Err(color_eyre::eyre::eyre!("Archive does not exist: {}", path));
    }
    if !path.is_file() {
        return Err(color_eyre::eyre::eyre!("Not a file: {}", path));
    }
    Ok(())
}

// =============================================================================
// COMMAND IMPLEMENTATIONS
// =============================================================================

/// Runs a scan, streaming progress to stdout, with Ctrl-C cancellation.
///
/// # Errors
///
/// Returns an error if the store cannot be opened or the root is not a
/// directory.
async fn run_scan(
    cli: &Cli,
    root: Utf8PathBuf,
    follow_links: bool,
    json: bool,
) -> color_eyre::Result<()> {
    validate_dir(&root)?;
    let store = open_store(cli)?;

    info!(root = %root, "Starting scan");

    let controller =
        ScanController::new(store as Arc<dyn KeyValueStore>).with_follow_links(follow_links);
    let mut handle = controller.start(&root).await;

    let mut cancel_requested = false;
    let mut summary = None;
    loop {
        tokio::select! {
            update = handle.updates.recv() => {
                match update {
                    Some(ScanUpdate::Started { progress }) => {
                        if !json {
                            print_line(&format!("Found {} archive(s)", progress.total));
                        }
                    }
                    Some(ScanUpdate::Preview { record, progress }) => {
                        if !json {
                            print_preview_line(&record, progress.processed, progress.total);
                        }
                    }
                    Some(ScanUpdate::Finished(s)) => summary = Some(s),
                    None => break,
                }
            }
            _ = tokio::signal::ctrl_c(), if !cancel_requested => {
                info!("Cancellation requested, finishing current archive");
                handle.cancel();
                cancel_requested = true;
            }
        }
    }

    let Some(summary) = summary else {
        return Err(color_eyre::eyre::eyre!("Scan ended without a result"));
    };

    if json {
        print_line(&summary_json(&summary)?);
    } else {
        print_scan_summary(&summary);
    }

    Ok(())
}

/// Extracts and prints the thumbnail of one archive.
///
/// # Errors
///
/// Returns an error if the path is not an existing file.
fn run_thumbnail(archive: &Utf8PathBuf) -> color_eyre::Result<()> {
    validate_file(archive)?;

    match generate_thumbnail(archive) {
        Some(image) => print_line(image.as_str()),
        None => print_line(&format!("No thumbnail available: {archive}")),
    }

    Ok(())
}

/// Extracts and prints every image of one archive.
///
/// # Errors
///
/// Returns an error if the path is not an existing file.
fn run_images(archive: &Utf8PathBuf, json: bool) -> color_eyre::Result<()> {
    validate_file(archive)?;

    let images = load_all_images(archive);

    if json {
        print_line(&serde_json::to_string_pretty(&images)?);
    } else {
        let stdout = std::io::stdout();
        let mut handle = stdout.lock();
        for image in &images {
            let _ = writeln!(handle, "{image}");
        }
        let _ = writeln!(handle, "{} image(s)", images.len());
    }

    Ok(())
}

/// Shows the persisted result of the most recent scan.
///
/// # Errors
///
/// Returns an error if the store cannot be opened or its contents are
/// malformed.
fn run_show(cli: &Cli, json: bool) -> color_eyre::Result<()> {
    let store = open_store(cli)?;

    let Some(state) = CacheState::load(store.as_ref())? else {
        print_line("No scan has been persisted yet");
        return Ok(());
    };

    if json {
        print_line(&serde_json::to_string_pretty(&state)?);
    } else {
        let stdout = std::io::stdout();
        let mut handle = stdout.lock();
        let _ = writeln!(handle, "Target folder: {}", state.target_folder);
        let _ = writeln!(handle, "Previews: {}", state.previews.len());
        for (i, record) in state.previews.iter().enumerate() {
            let marker = if record.has_thumbnail() { "*" } else { " " };
            let _ = writeln!(handle, "  {} {} {}", i + 1, marker, record.path);
        }
    }

    Ok(())
}

// =============================================================================
// OUTPUT HELPERS
// =============================================================================

/// Writes one line to locked stdout.
fn print_line(line: &str) {
    let stdout = std::io::stdout();
    let mut handle = stdout.lock();
    let _ = writeln!(handle, "{line}");
}

/// Prints one per-archive progress line.
fn print_preview_line(record: &PreviewRecord, processed: usize, total: usize) {
    let marker = if record.has_thumbnail() {
        "thumbnail"
    } else {
        "no thumbnail"
    };
    print_line(&format!("[{processed}/{total}] {} ({marker})", record.name));
}

/// Prints the final scan summary in text form.
fn print_scan_summary(summary: &ScanSummary) {
    let stdout = std::io::stdout();
    let mut handle = stdout.lock();

    let _ = writeln!(handle);
    if summary.no_archives_found() {
        let _ = writeln!(handle, "No archives found");
        return;
    }

    let outcome = match summary.outcome {
        ScanOutcome::Completed => "completed",
        ScanOutcome::Cancelled => "cancelled",
    };
    let with_thumbs = summary
        .previews
        .iter()
        .filter(|r| r.has_thumbnail())
        .count();

    let _ = writeln!(
        handle,
        "Scan {outcome}: {}/{} archive(s) processed",
        summary.progress.processed, summary.progress.total
    );
    let _ = writeln!(
        handle,
        "  With thumbnail:    {with_thumbs}"
    );
    let _ = writeln!(
        handle,
        "  Without thumbnail: {}",
        summary.previews.len() - with_thumbs
    );
}

/// Serializes the final scan summary as JSON.
fn summary_json(summary: &ScanSummary) -> color_eyre::Result<String> {
    #[derive(serde::Serialize)]
    struct Report<'a> {
        outcome: &'a str,
        processed: usize,
        total: usize,
        previews: &'a [PreviewRecord],
    }

    let report = Report {
        outcome: match summary.outcome {
            ScanOutcome::Completed => "completed",
            ScanOutcome::Cancelled => "cancelled",
        },
        processed: summary.progress.processed,
        total: summary.progress.total,
        previews: &summary.previews,
    };

    serde_json::to_string_pretty(&report)
        .map_err(|e| color_eyre::eyre::eyre!("Failed to serialize JSON: {}", e))
}

// =============================================================================
// MAIN ENTRY POINT
// =============================================================================

/// Application entry point.
#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    // 1. Install color-eyre FIRST (before any potential panics)
    color_eyre::install()?;

    // 2. Parse CLI arguments
    let cli = Cli::parse();

    // 3. Initialize tracing (handles --no-color for log output)
    init_tracing(cli.verbose, cli.no_color);

    // 4. Route to appropriate command
    match &cli.command {
        Commands::Scan {
            root,
            follow_links,
            json,
        } => run_scan(&cli, root.clone(), *follow_links, *json).await,
        Commands::Thumbnail { archive } => run_thumbnail(archive),
        Commands::Images { archive, json } => run_images(archive, *json),
        Commands::Show { json } => run_show(&cli, *json),
    }
}
