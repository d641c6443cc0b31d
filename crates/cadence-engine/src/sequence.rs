//! Splitting operations into consecutive batches.

use std::ops::Range;

/// Index ranges of consecutive batches of `size` over `len` items.
/// The last range may be shorter; a size of zero is treated as one.
pub fn batch_ranges(len: usize, size: usize) -> Vec<Range<usize>> {
    let size = size.max(1);
    (0..len)
        .step_by(size)
        .map(|start| start..(start + size).min(len))
        .collect()
}

/// Owned batches in input order.
pub fn partition<T: Clone>(items: &[T], size: usize) -> Vec<Vec<T>> {
    batch_ranges(items.len(), size)
        .into_iter()
        .map(|range| items[range].to_vec())
        .collect()
}
