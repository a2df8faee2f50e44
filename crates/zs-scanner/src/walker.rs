//! Recursive archive discovery.
//!
//! This module provides [`ArchiveWalker`], which uses the `ignore` crate
//! to walk a directory tree depth-first and collect `.zip` files.
//!
//! # Behavior
//!
//! - Entries whose name starts with `.` are skipped, files and
//!   directories alike
//! - Files qualify when the extension equals `zip` case-insensitively
//! - Unreadable subtrees are recorded and skipped; they never abort the
//!   walk, and an unreadable root yields an empty result
//! - Discovery order is the walker's traversal order for the current
//!   filesystem state and is never re-sorted

use camino::{Utf8Path, Utf8PathBuf};
use ignore::WalkBuilder;
use tracing::warn;

/// The archive file extension included in scans.
const ARCHIVE_EXTENSION: &str = "zip";

/// Result of one directory walk: discovered archives plus the errors of
/// any subtrees that had to be skipped.
///
/// Partial success is the normal mode here — a permission-denied
/// subdirectory costs its subtree, not the scan.
#[derive(Debug, Default)]
pub struct WalkOutcome {
    /// Absolute archive paths in discovery order.
    pub archives: Vec<Utf8PathBuf>,
    /// Errors from skipped subtrees, in encounter order.
    pub skipped: Vec<ignore::Error>,
}

/// A walker that discovers zip archives in a directory tree.
///
/// # Examples
///
/// ```ignore
/// use zs_scanner::ArchiveWalker;
/// use camino::Utf8Path;
///
/// let outcome = ArchiveWalker::new(Utf8Path::new("/library")).collect();
/// println!("found {} archives", outcome.archives.len());
/// ```
#[derive(Debug)]
pub struct ArchiveWalker {
    /// The root directory to walk.
    root: Utf8PathBuf,
    /// Whether to follow symbolic links.
    follow_links: bool,
}

impl ArchiveWalker {
    /// Creates a walker for the given root directory.
    ///
    /// No validation happens here; a missing or unreadable root simply
    /// produces an empty [`WalkOutcome`].
    #[must_use]
    pub fn new(root: &Utf8Path) -> Self {
        Self {
            root: root.to_owned(),
            follow_links: false,
        }
    }

    /// Configures whether to follow symbolic links.
    ///
    /// By default, symbolic links are not followed.
    #[must_use]
    pub const fn with_follow_links(mut self, follow: bool) -> Self {
        self.follow_links = follow;
        self
    }

    /// Walks the tree and collects all archive paths in discovery order.
    pub fn collect(&self) -> WalkOutcome {
        let mut outcome = WalkOutcome::default();

        for result in self.build_walker() {
            let entry = match result {
                Ok(entry) => entry,
                Err(e) => {
                    warn!(error = %e, "Skipping unreadable subtree");
                    outcome.skipped.push(e);
                    continue;
                }
            };

            if !entry.file_type().is_some_and(|ft| ft.is_file()) {
                continue;
            }

            let Some(path) = Utf8Path::from_path(entry.path()) else {
                warn!(path = %entry.path().display(), "Skipping non-UTF-8 path");
                continue;
            };

            if Self::is_archive(path) {
                outcome.archives.push(path.to_owned());
            }
        }

        outcome
    }

    /// Builds the ignore walker with configured settings.
    fn build_walker(&self) -> ignore::Walk {
        WalkBuilder::new(&self.root)
            // Only the hidden-entry filter; gitignore semantics don't
            // apply to an image library.
            .standard_filters(false)
            .hidden(true)
            .follow_links(self.follow_links)
            // Single-threaded depth-first walk keeps discovery order
            // deterministic for a given filesystem state.
            .threads(1)
            .require_git(false)
            .build()
    }

    /// Checks if a path is an archive file based on extension.
    fn is_archive(path: &Utf8Path) -> bool {
        path.extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case(ARCHIVE_EXTENSION))
    }

    /// Returns the root directory being walked.
    #[inline]
    #[must_use]
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }
}

/// Convenience wrapper: discovered archive paths only, skipped-subtree
/// errors logged and dropped.
#[must_use]
pub fn scan_folder(root: &Utf8Path) -> Vec<Utf8PathBuf> {
    let outcome = ArchiveWalker::new(root).collect();
    if !outcome.skipped.is_empty() {
        warn!(
            root = %root,
            skipped = outcome.skipped.len(),
            "Some subtrees could not be read"
        );
    }
    outcome.archives
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn utf8(path: &std::path::Path) -> Utf8PathBuf {
        Utf8PathBuf::from_path_buf(path.to_path_buf()).unwrap()
    }

    #[test]
    fn test_is_archive() {
        assert!(ArchiveWalker::is_archive(Utf8Path::new("a.zip")));
        assert!(ArchiveWalker::is_archive(Utf8Path::new("b.ZIP")));
        assert!(ArchiveWalker::is_archive(Utf8Path::new("dir/c.Zip")));
        assert!(!ArchiveWalker::is_archive(Utf8Path::new("a.rar")));
        assert!(!ArchiveWalker::is_archive(Utf8Path::new("a.zip.bak")));
        assert!(!ArchiveWalker::is_archive(Utf8Path::new("zip")));
    }

    #[test]
    fn test_collect_recursive_case_insensitive() {
        let dir = tempfile::tempdir().unwrap();
        let root = utf8(dir.path());
        fs::create_dir(root.join("nested").as_std_path()).unwrap();
        fs::write(root.join("a.zip").as_std_path(), b"x").unwrap();
        fs::write(root.join("b.ZIP").as_std_path(), b"x").unwrap();
        fs::write(root.join("notes.txt").as_std_path(), b"x").unwrap();
        fs::write(root.join("nested/c.zip").as_std_path(), b"x").unwrap();

        let mut found = scan_folder(&root);
        found.sort_unstable();

        assert_eq!(
            found,
            vec![root.join("a.zip"), root.join("b.ZIP"), root.join("nested/c.zip")]
        );
    }

    #[test]
    fn test_collect_skips_hidden_files_and_directories() {
        let dir = tempfile::tempdir().unwrap();
        let root = utf8(dir.path());
        fs::create_dir(root.join(".hidden").as_std_path()).unwrap();
        fs::write(root.join(".secret.zip").as_std_path(), b"x").unwrap();
        fs::write(root.join(".hidden/inside.zip").as_std_path(), b"x").unwrap();
        fs::write(root.join("visible.zip").as_std_path(), b"x").unwrap();

        let found = scan_folder(&root);
        assert_eq!(found, vec![root.join("visible.zip")]);
    }

    #[test]
    fn test_collect_no_duplicates_and_stable_order() {
        let dir = tempfile::tempdir().unwrap();
        let root = utf8(dir.path());
        for name in ["a.zip", "b.zip", "c.zip"] {
            fs::write(root.join(name).as_std_path(), b"x").unwrap();
        }

        let first = scan_folder(&root);
        let second = scan_folder(&root);

        assert_eq!(first.len(), 3);
        let mut dedup = first.clone();
        dedup.dedup();
        assert_eq!(dedup.len(), 3);
        // Unchanged filesystem, identical discovery order.
        assert_eq!(first, second);
    }

    #[test]
    fn test_collect_missing_root_is_empty() {
        let outcome = ArchiveWalker::new(Utf8Path::new("/nonexistent/library")).collect();
        assert!(outcome.archives.is_empty());
        assert!(!outcome.skipped.is_empty());
    }

    #[test]
    fn test_collect_empty_root() {
        let dir = tempfile::tempdir().unwrap();
        let outcome = ArchiveWalker::new(&utf8(dir.path())).collect();
        assert!(outcome.archives.is_empty());
        assert!(outcome.skipped.is_empty());
    }
}
