//! Archive entry decoding, thumbnail selection, and full-image extraction.
//!
//! This crate turns one zip archive into presentable images:
//!
//! - [`ArchiveReader`]: lazy, read-only view over a container held in
//!   memory, with per-entry decode
//! - [`generate_thumbnail`]: the single representative image for an
//!   archive (first qualifying entry in sorted order)
//! - [`load_all_images`]: the full ordered image sequence for interactive
//!   viewing
//!
//! # Entry selection
//!
//! Both extractors use the same policy: entry names sorted ascending by
//! byte order, directory entries dropped, `._`-prefixed final segments
//! dropped (macOS sidecar metadata), extensions restricted to
//! `jpg/jpeg/png/gif/webp` case-insensitively. This guarantees that a
//! non-empty [`load_all_images`] result starts with exactly the
//! [`generate_thumbnail`] image.
//!
//! # Failure posture
//!
//! The extraction entry points never fail: unreadable files, corrupt
//! containers, and undecodable entries degrade to `None` / an empty or
//! shorter sequence, with a `tracing` warning. Use [`ArchiveReader`]
//! directly when errors need to be observed.

#![deny(clippy::all)]
#![warn(missing_docs)]

mod entries;
mod error;
mod images;
mod reader;
mod thumbnail;

pub use error::ArchiveError;
pub use images::{all_images_from_bytes, load_all_images};
pub use reader::ArchiveReader;
pub use thumbnail::{generate_thumbnail, thumbnail_from_bytes};
