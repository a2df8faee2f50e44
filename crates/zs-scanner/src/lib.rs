//! Archive discovery and the cancellable scan controller for zipshelf.
//!
//! This crate drives the scan-and-extract pipeline: it discovers `.zip`
//! archives under a root folder, extracts one preview thumbnail per
//! archive, streams incremental progress to observers, and persists the
//! accumulated preview list to the key-value store.
//!
//! # Overview
//!
//! - [`ArchiveWalker`] / [`scan_folder`]: recursive archive discovery
//! - [`ScanController`]: orchestrates the pipeline, one scan at a time
//! - [`ScanUpdate`]: streaming protocol for live UI updates
//!
//! # Streaming protocol
//!
//! Updates arrive over the [`ScanHandle`]'s channel in this order:
//!
//! 1. [`ScanUpdate::Started`] — once, after discovery fixes the total
//! 2. [`ScanUpdate::Preview`] — one per archive, in discovery order,
//!    immediately after that archive is processed
//! 3. [`ScanUpdate::Finished`] — once, after the result is persisted
//!
//! # Cancellation
//!
//! Each scan owns a fresh [`CancellationToken`], consulted once per
//! candidate before its processing starts; an archive that has begun
//! processing always runs to completion. Cancellation is a normal
//! terminal state: the partial preview list is persisted exactly like a
//! completed one. Starting a new scan cancels the in-flight scan and
//! waits for it to terminate first — there is never more than one active
//! scan.
//!
//! # Example
//!
//! ```ignore
//! use zs_core::JsonFileStore;
//! use zs_scanner::{ScanController, ScanUpdate};
//! use camino::Utf8Path;
//! use std::sync::Arc;
//!
//! let store = Arc::new(JsonFileStore::open(Utf8Path::new("store.json"))?);
//! let controller = ScanController::new(store);
//!
//! let mut handle = controller.start(Utf8Path::new("/library")).await;
//! while let Some(update) = handle.updates.recv().await {
//!     match update {
//!         ScanUpdate::Started { progress } => println!("found {}", progress.total),
//!         ScanUpdate::Preview { record, .. } => println!("done {}", record.name),
//!         ScanUpdate::Finished(summary) => println!("{:?}", summary.outcome),
//!     }
//! }
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

mod walker;

pub use walker::{ArchiveWalker, WalkOutcome, scan_folder};

use std::sync::Arc;

use camino::{Utf8Path, Utf8PathBuf};
use serde_json::Value;
use tokio::sync::{Mutex, mpsc};
use tokio::task::{self, JoinHandle};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use zs_archive::generate_thumbnail;
use zs_core::{
    KeyValueStore, PREVIEWS_KEY, PreviewRecord, ScanProgress, StoreError, TARGET_FOLDER_KEY,
};

/// Capacity of the per-scan update channel.
const UPDATE_CHANNEL_CAPACITY: usize = 64;

/// Update sent during a scan.
///
/// These updates let a UI render progress one archive at a time rather
/// than waiting for the whole scan to complete.
#[derive(Debug)]
pub enum ScanUpdate {
    /// Discovery completed; the total is now fixed.
    Started {
        /// Progress with `processed == 0` and the final total.
        progress: ScanProgress,
    },

    /// One archive was processed and appended to the result.
    Preview {
        /// The record just appended, thumbnail or not.
        record: PreviewRecord,
        /// Progress after this archive.
        progress: ScanProgress,
    },

    /// The scan reached a terminal state and its result was persisted.
    Finished(ScanSummary),
}

/// Terminal state of a scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanOutcome {
    /// Every discovered archive was processed.
    Completed,
    /// The scan stopped early; already-processed archives were kept.
    Cancelled,
}

/// Final result of a scan, also the shape that was persisted.
#[derive(Debug, Clone)]
pub struct ScanSummary {
    /// How the scan terminated.
    pub outcome: ScanOutcome,
    /// Final progress counters.
    pub progress: ScanProgress,
    /// Accumulated preview records in discovery order.
    pub previews: Vec<PreviewRecord>,
}

impl ScanSummary {
    /// Returns `true` when the scan completed but discovered nothing;
    /// callers render a "no archives found" status for this case.
    #[must_use]
    pub fn no_archives_found(&self) -> bool {
        self.outcome == ScanOutcome::Completed && self.progress.total == 0
    }
}

/// Handle to one in-flight scan: the update stream plus its cancellation
/// control.
#[derive(Debug)]
pub struct ScanHandle {
    /// Receiver for streaming updates.
    pub updates: mpsc::Receiver<ScanUpdate>,
    /// Token cancelling this scan.
    token: CancellationToken,
}

impl ScanHandle {
    /// Requests cooperative cancellation.
    ///
    /// The scan stops before its next candidate; the candidate currently
    /// being processed still finishes, and the partial result is
    /// persisted before [`ScanUpdate::Finished`] arrives. A scan blocked
    /// publishing an update into a full channel also observes the
    /// cancellation and terminates.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Returns a clone of this scan's cancellation token.
    #[must_use]
    pub fn cancellation_token(&self) -> CancellationToken {
        self.token.clone()
    }
}

/// A running scan owned by the controller.
#[derive(Debug)]
struct ActiveScan {
    token: CancellationToken,
    task: JoinHandle<ScanSummary>,
}

/// Orchestrates archive discovery and thumbnail extraction across a
/// folder, with incremental progress and persistence.
///
/// At most one scan is active per controller. [`start`](Self::start)
/// cancels and awaits any in-flight scan before spawning the next, so
/// observers never see interleaved results from two scans.
pub struct ScanController {
    /// Persisted store receiving `targetFolder` and `previews`.
    store: Arc<dyn KeyValueStore>,
    /// Whether discovery follows symbolic links.
    follow_links: bool,
    /// The in-flight scan, if any.
    active: Mutex<Option<ActiveScan>>,
}

impl ScanController {
    /// Creates a controller persisting results to the given store.
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            follow_links: false,
            active: Mutex::new(None),
        }
    }

    /// Configures whether discovery follows symbolic links.
    #[must_use]
    pub fn with_follow_links(mut self, follow: bool) -> Self {
        self.follow_links = follow;
        self
    }

    /// Starts a scan of `root`, cancelling and awaiting any scan still
    /// in flight first.
    pub async fn start(&self, root: &Utf8Path) -> ScanHandle {
        let mut active = self.active.lock().await;

        if let Some(prev) = active.take() {
            info!("Cancelling in-flight scan before starting a new one");
            prev.token.cancel();
            if let Err(e) = prev.task.await {
                warn!(error = %e, "Previous scan task failed to join");
            }
        }

        let token = CancellationToken::new();
        let (tx, rx) = mpsc::channel(UPDATE_CHANNEL_CAPACITY);
        let task = tokio::spawn(run_scan(
            root.to_owned(),
            Arc::clone(&self.store),
            self.follow_links,
            token.clone(),
            tx,
        ));

        *active = Some(ActiveScan {
            token: token.clone(),
            task,
        });

        ScanHandle { updates: rx, token }
    }
}

/// The scan task body: discover, process one archive at a time, persist.
///
/// Returns the summary it also publishes as [`ScanUpdate::Finished`].
async fn run_scan(
    root: Utf8PathBuf,
    store: Arc<dyn KeyValueStore>,
    follow_links: bool,
    token: CancellationToken,
    tx: mpsc::Sender<ScanUpdate>,
) -> ScanSummary {
    let walk_root = root.clone();
    let archives = match task::spawn_blocking(move || {
        ArchiveWalker::new(&walk_root)
            .with_follow_links(follow_links)
            .collect()
    })
    .await
    {
        Ok(outcome) => {
            if !outcome.skipped.is_empty() {
                warn!(
                    root = %root,
                    skipped = outcome.skipped.len(),
                    "Some subtrees could not be read"
                );
            }
            outcome.archives
        }
        Err(e) => {
            warn!(error = %e, "Archive discovery task failed");
            Vec::new()
        }
    };

    let mut progress = ScanProgress::new(archives.len());
    let mut previews = Vec::with_capacity(progress.total);
    let mut outcome = ScanOutcome::Completed;

    info!(root = %root, total = progress.total, "Scan started");

    // A dropped receiver and a cancellation arriving while a send is
    // blocked on a full channel both terminate the scan; whatever was
    // accumulated still gets persisted.
    if !send_update(&tx, &token, ScanUpdate::Started { progress }).await {
        outcome = ScanOutcome::Cancelled;
    } else {
        for path in archives {
            if token.is_cancelled() {
                info!(processed = progress.processed, "Scan cancelled");
                outcome = ScanOutcome::Cancelled;
                break;
            }

            let thumb_path = path.clone();
            let thumbnail = match task::spawn_blocking(move || generate_thumbnail(&thumb_path)).await
            {
                Ok(thumbnail) => thumbnail,
                Err(e) => {
                    warn!(path = %path, error = %e, "Thumbnail task failed");
                    None
                }
            };

            let record = PreviewRecord::new(&path, thumbnail);
            previews.push(record.clone());
            progress.advance();
            debug!(path = %path, processed = progress.processed, "Processed archive");

            if !send_update(&tx, &token, ScanUpdate::Preview { record, progress }).await {
                outcome = ScanOutcome::Cancelled;
                break;
            }
        }
    }

    let persist_root = root.clone();
    let persist_previews = previews.clone();
    match task::spawn_blocking(move || persist(store.as_ref(), &persist_root, &persist_previews))
        .await
    {
        Ok(Ok(())) => {}
        Ok(Err(e)) => warn!(error = %e, "Failed to persist scan result"),
        Err(e) => warn!(error = %e, "Persist task failed"),
    }

    info!(
        outcome = ?outcome,
        processed = progress.processed,
        total = progress.total,
        "Scan finished"
    );

    let summary = ScanSummary {
        outcome,
        progress,
        previews,
    };
    let _ = send_update(&tx, &token, ScanUpdate::Finished(summary.clone())).await;
    summary
}

/// Sends one update, giving up when the receiver is gone or the scan is
/// cancelled while the channel is full.
///
/// Returns `true` when the update was delivered. The send is polled
/// before the cancellation, so an update always goes out while the
/// channel has room.
async fn send_update(
    tx: &mpsc::Sender<ScanUpdate>,
    token: &CancellationToken,
    update: ScanUpdate,
) -> bool {
    tokio::select! {
        biased;
        result = tx.send(update) => result.is_ok(),
        () = token.cancelled() => false,
    }
}

/// Persists the scan result under the two store keys.
fn persist(
    store: &dyn KeyValueStore,
    root: &Utf8Path,
    previews: &[PreviewRecord],
) -> Result<(), StoreError> {
    store.set(TARGET_FOLDER_KEY, Value::String(root.to_string()))?;
    store.set(PREVIEWS_KEY, serde_json::to_value(previews)?)?;
    Ok(())
}
