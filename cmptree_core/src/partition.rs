use std::ops::Range;

/// Number of workers actually worth starting for `len` paths
///
/// Starts from `parallelism` and drops workers until each one gets at least
/// `min_batch_size` paths. Never returns less than 1.
pub fn effective_workers(len: usize, parallelism: usize, min_batch_size: usize) -> usize {
    let min_batch_size = min_batch_size.max(1);
    let workers = parallelism.max(1);

    if len / workers < min_batch_size {
        (len / min_batch_size).clamp(1, workers)
    } else {
        workers
    }
}

/// Split `[0, len)` into contiguous, gap-free, non-overlapping slices
///
/// Each slice holds `ceil(len / workers)` indices except the last one, which
/// takes whatever is left. An empty input yields no slices.
pub fn partition(len: usize, parallelism: usize, min_batch_size: usize) -> Vec<Range<usize>> {
    if len == 0 {
        return Vec::new();
    }

    let workers = effective_workers(len, parallelism, min_batch_size);
    let slice_len = len.div_ceil(workers);

    (0..len)
        .step_by(slice_len)
        .map(|start| start..(start + slice_len).min(len))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_tiles(ranges: &[Range<usize>], len: usize) {
        let mut next = 0;
        for range in ranges {
            assert_eq!(range.start, next, "gap or overlap at {:?}", range);
            assert!(range.end > range.start, "empty slice {:?}", range);
            next = range.end;
        }
        assert_eq!(next, len);
    }

    #[test]
    fn test_partition_tiles_every_length() {
        for len in 0..300 {
            for parallelism in 1..12 {
                for min_batch in [1, 3, 64] {
                    let ranges = partition(len, parallelism, min_batch);
                    assert_tiles(&ranges, len);
                    assert!(ranges.len() <= parallelism);
                }
            }
        }
    }

    #[test]
    fn test_partition_empty() {
        assert!(partition(0, 8, 64).is_empty());
    }

    #[test]
    fn test_small_batches_use_fewer_workers() {
        // 100 paths at 64 per worker is not worth a second worker
        assert_eq!(effective_workers(100, 8, 64), 1);
        assert_eq!(partition(100, 8, 64), vec![0..100]);

        assert_eq!(effective_workers(200, 8, 64), 3);
        assert_eq!(partition(200, 8, 64), vec![0..67, 67..134, 134..200]);
    }

    #[test]
    fn test_large_batches_use_all_workers() {
        assert_eq!(effective_workers(1000, 4, 64), 4);
        assert_eq!(partition(1000, 4, 64), vec![0..250, 250..500, 500..750, 750..1000]);
    }

    #[test]
    fn test_last_slice_takes_remainder() {
        assert_eq!(partition(10, 4, 1), vec![0..3, 3..6, 6..9, 9..10]);
    }

    #[test]
    fn test_zero_inputs_are_clamped() {
        assert_eq!(effective_workers(10, 0, 0), 1);
        assert_eq!(partition(10, 0, 0), vec![0..10]);
    }
}
