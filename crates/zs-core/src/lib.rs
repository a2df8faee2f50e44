//! Core types, wire formats, and the persisted store contract for zipshelf.
//!
//! This crate provides the foundational types used across the workspace:
//!
//! - Domain types ([`PreviewRecord`], [`ScanProgress`], [`MediaType`],
//!   [`EncodedImage`])
//! - The [`KeyValueStore`] contract consumed by the scan controller, plus
//!   the default [`JsonFileStore`] implementation
//! - Error types for consistent error handling

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod error;
pub mod store;
pub mod types;

pub use error::StoreError;
pub use store::{CacheState, JsonFileStore, KeyValueStore, PREVIEWS_KEY, TARGET_FOLDER_KEY};
pub use types::{EncodedImage, MediaType, PreviewRecord, ScanProgress};
