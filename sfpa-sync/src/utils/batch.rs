//! Fixed-size batching
//!
//! Splits an ordered sequence into contiguous chunks without reordering anything.

/// Partition `items` into chunks of at most `size` elements
///
/// # Returns
/// `ceil(len / size)` chunks whose concatenation is exactly `items`. Every chunk except
/// possibly the last holds `size` elements. Empty input, or `size == 0`, yields no
/// chunks.
pub fn batch<T>(items: Vec<T>, size: usize) -> Vec<Vec<T>> {
    if size == 0 || items.is_empty() {
        return Vec::new();
    }

    let mut batches = Vec::with_capacity(items.len().div_ceil(size));
    let mut remaining = items.into_iter();
    loop {
        let chunk: Vec<T> = remaining.by_ref().take(size).collect();
        if chunk.is_empty() {
            break;
        }
        batches.push(chunk);
    }
    batches
}
