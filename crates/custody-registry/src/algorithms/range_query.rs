//! # Range Query
//!
//! Bounded paginated reads over an ordered collection.
//!
//! For a collection of length `L` and a request `[start, end)`:
//! - `start > end` fails with `InvalidRange`, whatever `L` is
//! - `start > L` fails with `OutOfBounds` (`start == L` is an empty page)
//! - the window ends at `min(end, L)`

use crate::domain::errors::CustodyError;
use std::ops::Range;

/// Resolve `[start, end)` against a collection of length `len`.
pub fn resolve_window(len: usize, start: usize, end: usize) -> Result<Range<usize>, CustodyError> {
    if start > end {
        return Err(CustodyError::InvalidRange { start, end });
    }
    if start > len {
        return Err(CustodyError::OutOfBounds { start, len });
    }
    Ok(start..end.min(len))
}

/// Borrow the `[start, end)` window of `items`.
pub fn select_range<T>(items: &[T], start: usize, end: usize) -> Result<&[T], CustodyError> {
    let window = resolve_window(items.len(), start, end)?;
    Ok(&items[window])
}
