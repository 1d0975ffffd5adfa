use crate::{CmpTreeError, Result};
use serde::Serialize;
use std::fmt;
use std::fs::FileType;
use std::path::{Component, Path, PathBuf};

/// A path relative to a traversal root, used as the join key between the two trees.
///
/// Only normal components are kept: `.` is dropped, while `..`, root and prefix
/// components are rejected. Ordering is component-wise, which is the order of
/// a [`ComparisonSet`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(into = "String")]
pub struct RelativePath(PathBuf);

impl RelativePath {
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut normalized = PathBuf::new();

        for component in path.components() {
            match component {
                Component::Normal(name) => normalized.push(name),
                Component::CurDir => {}
                Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                    return Err(CmpTreeError::InvalidRelativePath(path.display().to_string()));
                }
            }
        }

        if normalized.as_os_str().is_empty() {
            return Err(CmpTreeError::InvalidRelativePath(path.display().to_string()));
        }

        Ok(Self(normalized))
    }

    pub fn as_path(&self) -> &Path {
        &self.0
    }
}

impl AsRef<Path> for RelativePath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl fmt::Display for RelativePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, component) in self.0.components().enumerate() {
            if i > 0 {
                f.write_str("/")?;
            }
            write!(f, "{}", component.as_os_str().to_string_lossy())?;
        }
        Ok(())
    }
}

impl From<RelativePath> for String {
    fn from(path: RelativePath) -> Self {
        path.to_string()
    }
}

/// Kind of a filesystem entry as seen without following symbolic links
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FileKind {
    Regular,
    Directory,
    /// Symlinks, FIFOs, sockets, devices and anything else
    Other,
    /// Synthesized when the path does not exist under a root
    Missing,
}

impl FileKind {
    pub fn from_file_type(file_type: &FileType) -> Self {
        if file_type.is_symlink() {
            FileKind::Other
        } else if file_type.is_dir() {
            FileKind::Directory
        } else if file_type.is_file() {
            FileKind::Regular
        } else {
            FileKind::Other
        }
    }

    pub fn exists(self) -> bool {
        self != FileKind::Missing
    }
}

/// Outcome of comparing one relative path across both roots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ComparisonOutcome {
    Match,
    /// Both sides exist but their kinds differ
    MismatchType,
    /// Both sides are regular files and their bytes differ (or could not be read)
    MismatchContent,
    MismatchNeitherExists,
    MismatchOnlyFirstExists,
    MismatchOnlySecondExists,
}

impl ComparisonOutcome {
    pub fn is_match(self) -> bool {
        self == ComparisonOutcome::Match
    }

    /// The outcome seen from the other side, i.e. with the two roots swapped
    pub fn mirrored(self) -> Self {
        match self {
            ComparisonOutcome::MismatchOnlyFirstExists => ComparisonOutcome::MismatchOnlySecondExists,
            ComparisonOutcome::MismatchOnlySecondExists => ComparisonOutcome::MismatchOnlyFirstExists,
            other => other,
        }
    }
}

/// Outcome of one path plus the kinds observed on each side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PartialComparison {
    pub outcome: ComparisonOutcome,
    pub first_kind: FileKind,
    pub second_kind: FileKind,
}

impl PartialComparison {
    pub fn new(outcome: ComparisonOutcome, first_kind: FileKind, second_kind: FileKind) -> Self {
        Self {
            outcome,
            first_kind,
            second_kind,
        }
    }
}

/// A [`PartialComparison`] together with the two joined paths it was computed from
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FullComparison {
    #[serde(flatten)]
    pub partial: PartialComparison,
    pub first_path: PathBuf,
    pub second_path: PathBuf,
}

impl FullComparison {
    pub fn outcome(&self) -> ComparisonOutcome {
        self.partial.outcome
    }
}

/// Ordered results of a whole tree comparison, one entry per merged relative path
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ComparisonSet {
    entries: Vec<FullComparison>,
}

impl ComparisonSet {
    pub fn new(entries: Vec<FullComparison>) -> Self {
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FullComparison> {
        self.entries.iter()
    }

    pub fn as_slice(&self) -> &[FullComparison] {
        &self.entries
    }

    pub fn has_mismatch(&self) -> bool {
        self.entries.iter().any(|c| !c.outcome().is_match())
    }

    pub fn mismatch_count(&self) -> usize {
        self.entries.iter().filter(|c| !c.outcome().is_match()).count()
    }
}

impl<'a> IntoIterator for &'a ComparisonSet {
    type Item = &'a FullComparison;
    type IntoIter = std::slice::Iter<'a, FullComparison>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
