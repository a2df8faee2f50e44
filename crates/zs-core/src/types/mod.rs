//! Domain types shared across the zipshelf workspace.
//!
//! - [`MediaType`] / [`EncodedImage`]: the self-describing image wire format
//! - [`PreviewRecord`]: per-archive summary used for list rendering
//! - [`ScanProgress`]: processed/total counters published during a scan

mod image;
mod preview;
mod progress;

pub use image::{EncodedImage, MediaType};
pub use preview::PreviewRecord;
pub use progress::ScanProgress;
