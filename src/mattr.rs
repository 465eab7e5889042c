//! Moving Average Type-Token Ratio.

use std::collections::{HashMap, HashSet};
use std::hash::Hash;

use crate::error::{PoolError, Result};

pub const DEFAULT_MATTR_WINDOW: usize = 100;

/// Mean type-token ratio over every window of `window` consecutive tokens.
///
/// The window is clipped to the number of tokens. Fails with
/// [`PoolError::EmptyInput`] when there are no tokens or the window is zero.
pub fn mattr<T: Hash + Eq>(tokens: &[T], window: usize) -> Result<f64> {
    let w = window.min(tokens.len());
    if w == 0 {
        return Err(PoolError::EmptyInput);
    }

    let mut counts: HashMap<&T, usize> = HashMap::new();
    for token in &tokens[..w] {
        *counts.entry(token).or_insert(0) += 1;
    }

    let mut total = counts.len() as f64 / w as f64;
    let windows = tokens.len() - w + 1;

    for start in 1..windows {
        let leaving = &tokens[start - 1];
        if let Some(count) = counts.get_mut(leaving) {
            *count -= 1;
            if *count == 0 {
                counts.remove(leaving);
            }
        }
        *counts.entry(&tokens[start + w - 1]).or_insert(0) += 1;
        total += counts.len() as f64 / w as f64;
    }

    Ok(total / windows as f64)
}

/// Mean fraction of tokens in each window that belong to `filter`.
///
/// Same windowing and failure rules as [`mattr`].
pub fn mattr_relative<T: Hash + Eq>(tokens: &[T], filter: &HashSet<T>, window: usize) -> Result<f64> {
    let w = window.min(tokens.len());
    if w == 0 {
        return Err(PoolError::EmptyInput);
    }

    let mut inside = tokens[..w].iter().filter(|t| filter.contains(*t)).count();
    let mut total = inside as f64 / w as f64;
    let windows = tokens.len() - w + 1;

    for start in 1..windows {
        if filter.contains(&tokens[start - 1]) {
            inside -= 1;
        }
        if filter.contains(&tokens[start + w - 1]) {
            inside += 1;
        }
        total += inside as f64 / w as f64;
    }

    Ok(total / windows as f64)
}
