use cmptree_common::{
    CmpTreeError, ComparisonOutcome, FileKind, FullComparison, PartialComparison, RelativePath,
};
use std::fs::{self, File};
use std::io::{self, Read};
use std::path::Path;
use tracing::warn;

/// Size of the chunks read from each file during a byte-for-byte comparison
pub const CHUNK_SIZE: usize = 8 * 1024;

/// Compares one relative path under two roots
#[derive(Debug, Clone, Copy)]
pub struct PathComparator<'a> {
    first_root: &'a Path,
    second_root: &'a Path,
    shallow_pass: bool,
}

impl<'a> PathComparator<'a> {
    pub fn new(first_root: &'a Path, second_root: &'a Path) -> Self {
        Self {
            first_root,
            second_root,
            shallow_pass: false,
        }
    }

    /// Treat regular files of equal size as identical without reading them
    pub fn with_shallow_pass(mut self, enabled: bool) -> Self {
        self.shallow_pass = enabled;
        self
    }

    pub fn compare(&self, relative: &RelativePath) -> FullComparison {
        let first_path = self.first_root.join(relative.as_path());
        let second_path = self.second_root.join(relative.as_path());
        let partial = compare_entries(&first_path, &second_path, self.shallow_pass);

        FullComparison {
            partial,
            first_path,
            second_path,
        }
    }
}

/// Kind of the entry at `path`, without following a final symlink
pub fn file_kind(path: &Path) -> FileKind {
    match fs::symlink_metadata(path) {
        Ok(metadata) => FileKind::from_file_type(&metadata.file_type()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => FileKind::Missing,
        Err(e) => {
            warn!("Cannot inspect {}, treating it as missing: {}", path.display(), e);
            FileKind::Missing
        }
    }
}

/// Classify two entries: existence first, then kind, then content for regular files
///
/// Directories and other non-regular entries of the same kind match without
/// looking inside them. A regular file that cannot be read counts as differing.
/// With `shallow_pass`, regular files only need equal sizes to match.
pub fn compare_entries(first: &Path, second: &Path, shallow_pass: bool) -> PartialComparison {
    let first_kind = file_kind(first);
    let second_kind = file_kind(second);

    let outcome = match (first_kind.exists(), second_kind.exists()) {
        (false, false) => ComparisonOutcome::MismatchNeitherExists,
        (true, false) => ComparisonOutcome::MismatchOnlyFirstExists,
        (false, true) => ComparisonOutcome::MismatchOnlySecondExists,
        (true, true) if first_kind != second_kind => ComparisonOutcome::MismatchType,
        (true, true) => match first_kind {
            FileKind::Regular => match regular_files_match(first, second, shallow_pass) {
                Ok(true) => ComparisonOutcome::Match,
                Ok(false) => ComparisonOutcome::MismatchContent,
                Err(e) => {
                    warn!(
                        "Failed to compare {} with {}: {}",
                        first.display(),
                        second.display(),
                        e
                    );
                    ComparisonOutcome::MismatchContent
                }
            },
            _ => ComparisonOutcome::Match,
        },
    };

    PartialComparison::new(outcome, first_kind, second_kind)
}

fn regular_files_match(first: &Path, second: &Path, shallow_pass: bool) -> Result<bool, CmpTreeError> {
    if shallow_pass {
        sizes_equal(first, second)
    } else {
        files_identical(first, second)
    }
}

/// Whether two files have the same length, following symlinks
pub fn sizes_equal(first: &Path, second: &Path) -> Result<bool, CmpTreeError> {
    Ok(fs::metadata(first)?.len() == fs::metadata(second)?.len())
}

/// Byte-for-byte comparison of two regular files
///
/// Files of different sizes are reported as different without being opened.
pub fn files_identical(first: &Path, second: &Path) -> Result<bool, CmpTreeError> {
    if !sizes_equal(first, second)? {
        return Ok(false);
    }

    let mut first_file = File::open(first)?;
    let mut second_file = File::open(second)?;
    let mut first_buf = vec![0u8; CHUNK_SIZE];
    let mut second_buf = vec![0u8; CHUNK_SIZE];

    loop {
        let first_len = read_chunk(&mut first_file, &mut first_buf)?;
        let second_len = read_chunk(&mut second_file, &mut second_buf)?;

        if first_len != second_len || first_buf[..first_len] != second_buf[..second_len] {
            return Ok(false);
        }
        if first_len == 0 {
            return Ok(true);
        }
    }
}

/// Fill `buf` as far as the reader allows, returning fewer bytes only at end of file
fn read_chunk(reader: &mut impl Read, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}
