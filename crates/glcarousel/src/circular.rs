//! Wrap-around lookup into fixed-length sequences.

/// Reduces any signed index into `0..len`.
///
/// Rust's `%` keeps the sign of the dividend, so the remainder is folded back
/// into range explicitly. `len` must be non-zero.
pub fn wrap_index(index: i64, len: usize) -> usize {
    debug_assert!(len > 0, "wrap_index on empty sequence");
    let n = len as i64;
    (((index % n) + n) % n) as usize
}

/// Returns the element at `index` treating `seq` as circular.
///
/// Returns `None` only for an empty slice; the carousel never hands this an
/// empty sequence after construction.
pub fn at<T>(seq: &[T], index: i64) -> Option<&T> {
    if seq.is_empty() {
        return None;
    }
    seq.get(wrap_index(index, seq.len()))
}
