use cmptree_common::RelativePath;
use tracing::debug;

/// Union of two path listings, sorted and without duplicates
///
/// The result is the index space of a comparison run: its length and order fix
/// the shape of the resulting `ComparisonSet`.
pub fn merge_path_sets(first: Vec<RelativePath>, second: Vec<RelativePath>) -> Vec<RelativePath> {
    let (first_len, second_len) = (first.len(), second.len());

    let mut merged = first;
    merged.extend(second);
    merged.sort_unstable();
    merged.dedup();

    debug!(
        "Merged {} + {} paths into {} unique paths",
        first_len,
        second_len,
        merged.len()
    );
    merged
}
