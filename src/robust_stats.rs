//! Median and median absolute deviation.
//!
//! Both statistics run over all entries of an array of any dimension.
//! Medians are found with a selection algorithm rather than a full sort.

use crate::types::{Result, RpcaError};
use ndarray::{ArrayBase, Data, Dimension};
use num::Float;
use std::cmp::Ordering;

/// Scale factor that makes the MAD a consistent estimator of the
/// standard deviation of normally distributed data.
pub const MAD_NORMAL_SCALE: f64 = 1.4826;

/// Median of all entries.
///
/// For an even number of entries this is the average of the two middle
/// order statistics.
pub fn median<A, S, D>(arr: &ArrayBase<S, D>) -> Result<A>
where
    A: Float,
    S: Data<Elem = A>,
    D: Dimension,
{
    let mut values: Vec<A> = arr.iter().copied().collect();
    median_inplace(&mut values)
}

/// Median absolute deviation `scale_factor * median(|x - median(x)|)`.
pub fn mad<A, S, D>(arr: &ArrayBase<S, D>, scale_factor: A) -> Result<A>
where
    A: Float,
    S: Data<Elem = A>,
    D: Dimension,
{
    let mut values: Vec<A> = arr.iter().copied().collect();
    let center = median_inplace(&mut values)?;

    values.iter_mut().for_each(|item| *item = (*item - center).abs());

    Ok(median_inplace(&mut values)? * scale_factor)
}

fn median_inplace<A: Float>(values: &mut [A]) -> Result<A> {
    let n = values.len();
    if n == 0 {
        return Err(RpcaError::EmptyInput);
    }

    let half = n / 2;
    let (lower, &mut upper, _) =
        values.select_nth_unstable_by(half, |a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));

    if n % 2 == 1 {
        Ok(upper)
    } else {
        // The lower middle order statistic is the largest entry left of `half`.
        let below = lower.iter().copied().fold(A::neg_infinity(), A::max);
        Ok((below + upper) / (A::one() + A::one()))
    }
}
