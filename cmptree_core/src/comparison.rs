use crate::compare::PathComparator;
use crate::merge::merge_path_sets;
use crate::partition::partition;
use crate::scanner::TreeScanner;
use cmptree_common::{CmpTreeError, ComparisonSet, EngineConfig, FullComparison, RelativePath};
use rayon::ThreadPoolBuilder;
use std::fs;
use std::ops::Range;
use std::path::Path;
use tracing::{debug, info};

type Slot = Option<FullComparison>;

/// Comparison engine for comparing two directory trees
#[derive(Debug, Clone, Default)]
pub struct ComparisonEngine {
    config: EngineConfig,
    scanner: TreeScanner,
}

impl ComparisonEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            scanner: TreeScanner::new(),
        }
    }

    /// Enumerate both trees and compare every path found in either of them
    ///
    /// Blocks until every worker has finished. Unreadable directories and files
    /// degrade into mismatches for the affected paths; only a root that is not a
    /// directory or a failure to start the worker pool is returned as an error.
    pub fn compare_directory_trees(
        &self,
        first_root: &Path,
        second_root: &Path,
    ) -> Result<ComparisonSet, CmpTreeError> {
        check_root(first_root)?;
        check_root(second_root)?;

        let first = self.scanner.scan(first_root);
        let second = self.scanner.scan(second_root);
        info!(
            "Comparing {} first entries with {} second entries",
            first.paths.len(),
            second.paths.len()
        );

        let unreadable = first.unreadable.len() + second.unreadable.len();
        if unreadable > 0 {
            info!("{} directories could not be read and were compared as empty", unreadable);
        }

        let merged = merge_path_sets(first.paths, second.paths);
        self.compare_paths(first_root, second_root, &merged)
    }

    /// Compare an already merged, sorted path list; result `i` belongs to `paths[i]`
    pub fn compare_paths(
        &self,
        first_root: &Path,
        second_root: &Path,
        paths: &[RelativePath],
    ) -> Result<ComparisonSet, CmpTreeError> {
        let ranges = partition(
            paths.len(),
            self.config.resolved_parallelism(),
            self.config.min_batch_size,
        );
        info!("Comparing {} paths with {} worker(s)", paths.len(), ranges.len());

        let comparator = PathComparator::new(first_root, second_root)
            .with_shallow_pass(self.config.shallow_pass);
        let mut slots: Vec<Slot> = vec![None; paths.len()];
        run_workers(&comparator, paths, ranges, &mut slots)?;

        let entries = slots
            .into_iter()
            .collect::<Option<Vec<_>>>()
            .ok_or_else(|| CmpTreeError::Comparison("A worker left a result unfilled".to_string()))?;

        debug!("Generated {} comparisons", entries.len());
        Ok(ComparisonSet::new(entries))
    }
}

/// Ensure `path` exists and is a directory, following symlinks
pub fn check_root(path: &Path) -> Result<(), CmpTreeError> {
    let metadata = fs::metadata(path).map_err(|e| {
        CmpTreeError::Path(format!(
            "{} does not exist or could not be accessed: {}",
            path.display(),
            e
        ))
    })?;

    if !metadata.is_dir() {
        return Err(CmpTreeError::NotADirectory(path.to_path_buf()));
    }
    Ok(())
}

/// Hand each range its own exclusive part of `slots`
fn split_slots<'s>(
    ranges: Vec<Range<usize>>,
    mut slots: &'s mut [Slot],
) -> Vec<(Range<usize>, &'s mut [Slot])> {
    let mut work = Vec::with_capacity(ranges.len());
    for range in ranges {
        let (head, tail) = std::mem::take(&mut slots).split_at_mut(range.len());
        slots = tail;
        work.push((range, head));
    }
    work
}

fn fill_slots(comparator: &PathComparator<'_>, paths: &[RelativePath], slots: &mut [Slot]) {
    for (path, slot) in paths.iter().zip(slots.iter_mut()) {
        *slot = Some(comparator.compare(path));
    }
}

/// Run one worker per range; the calling thread takes the last range itself
fn run_workers(
    comparator: &PathComparator<'_>,
    paths: &[RelativePath],
    ranges: Vec<Range<usize>>,
    slots: &mut [Slot],
) -> Result<(), CmpTreeError> {
    let mut work = split_slots(ranges, slots);
    let Some((own_range, own_slots)) = work.pop() else {
        return Ok(());
    };

    if work.is_empty() {
        fill_slots(comparator, &paths[own_range], own_slots);
        return Ok(());
    }

    let pool = ThreadPoolBuilder::new()
        .num_threads(work.len())
        .thread_name(|index| format!("cmp-tree-worker-{index}"))
        .build()
        .map_err(|e| CmpTreeError::Comparison(format!("Failed to start worker pool: {}", e)))?;

    pool.in_place_scope(|scope| {
        for (range, worker_slots) in work {
            let worker_paths = &paths[range.clone()];
            scope.spawn(move |_| {
                debug!("Worker comparing paths {:?}", range);
                fill_slots(comparator, worker_paths, worker_slots);
            });
        }

        debug!("Calling thread comparing paths {:?}", own_range);
        fill_slots(comparator, &paths[own_range], own_slots);
    });

    Ok(())
}
