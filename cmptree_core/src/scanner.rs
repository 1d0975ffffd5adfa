use cmptree_common::RelativePath;
use jwalk::WalkDir;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Everything found below one root
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TreeListing {
    /// Every entry below the root, relative to it, in walk order
    pub paths: Vec<RelativePath>,
    /// Directories whose contents could not be listed, the root included
    pub unreadable: Vec<PathBuf>,
}

impl TreeListing {
    fn record_entry(&mut self, root: &Path, path: &Path) {
        let relative = match path.strip_prefix(root) {
            Ok(relative) => relative,
            Err(e) => {
                warn!("Entry {} is outside of {}: {}", path.display(), root.display(), e);
                return;
            }
        };

        match RelativePath::new(relative) {
            Ok(relative) => self.paths.push(relative),
            Err(e) => warn!("Ignoring entry {}: {}", path.display(), e),
        }
    }

    fn record_unreadable(&mut self, path: PathBuf, error: &dyn fmt::Display) {
        warn!("Cannot read directory {}, treating it as empty: {}", path.display(), error);
        self.unreadable.push(path);
    }
}

/// Recursive directory lister built on jwalk
///
/// Every entry below the root is reported, hidden ones included. Symbolic links
/// are reported but never followed, so only real directories are descended into.
#[derive(Debug, Clone, Copy, Default)]
pub struct TreeScanner;

impl TreeScanner {
    pub fn new() -> Self {
        Self
    }

    /// List every path under `root`, in the filesystem's own order
    ///
    /// A directory that cannot be read is logged and contributes no children; the
    /// directory entry itself is still listed. The root contributes no path.
    pub fn scan(&self, root: &Path) -> TreeListing {
        let mut listing = TreeListing::default();

        let walker = WalkDir::new(root).follow_links(false).skip_hidden(false);

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    let path = e.path().unwrap_or(root).to_path_buf();
                    listing.record_unreadable(path, &e);
                    continue;
                }
            };

            // jwalk still yields a directory it failed to open, with the error attached
            if let Some(e) = &entry.read_children_error {
                listing.record_unreadable(entry.path(), e);
            }

            // Skip the synthetic root entry
            if entry.depth == 0 {
                continue;
            }

            listing.record_entry(root, &entry.path());
        }

        debug!(
            "Scanned {} entries from {:?} ({} unreadable directories)",
            listing.paths.len(),
            root,
            listing.unreadable.len()
        );
        listing
    }
}
