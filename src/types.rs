//! This module collects the error type and the shared helper traits

use ndarray::{ArrayView1, ArrayView2};
use ndarray_linalg::error::LinalgError;
use ndarray_linalg::Norm;
use num::Float;
use thiserror::Error;

pub use ndarray_linalg::{c32, c64, Lapack, Scalar};

#[derive(Error, Debug)]
pub enum RpcaError {
    #[error("Lapack Error: {0}")]
    LinalgError(#[from] LinalgError),
    #[error("SVD computation failed: {0}")]
    SVDError(String),
    #[error("Input matrix must have at least one row and one column, got {nrows}x{ncols}")]
    InvalidInput { nrows: usize, ncols: usize },
    #[error("Input matrix contains non-finite entries")]
    NonFiniteInput,
    #[error("Input matrix has zero l1 norm, initial mu is undefined")]
    DegeneratePenalty,
    #[error("Penalty must be finite and non-negative, got {0}")]
    InvalidPenalty(f64),
    #[error("Statistics of an empty vector are undefined")]
    EmptyInput,
    #[error("Series of length {len} cannot be shaped into a {nrows}x{ncols} matrix")]
    ShapeMismatch {
        len: usize,
        nrows: usize,
        ncols: usize,
    },
    #[error("Series has zero variance and cannot be standardised")]
    ZeroVariance,
    #[error("Series of length {len} is too short for a unit root regression with lag {lag}")]
    SeriesTooShort { len: usize, lag: usize },
    #[error("Tolerance factor must be finite and non-negative, got {0}")]
    InvalidTolerance(f64),
}

pub type Result<T> = std::result::Result<T, RpcaError>;

pub trait RelDiff {
    type A: Scalar;

    /// Return the relative Frobenius norm difference of `first` and `second`.
    fn rel_diff_fro(
        first: ArrayView2<Self::A>,
        second: ArrayView2<Self::A>,
    ) -> <<Self as RelDiff>::A as Scalar>::Real;

    /// Return the relative l2 vector norm difference of `first` and `second`.
    fn rel_diff_l2(
        first: ArrayView1<Self::A>,
        second: ArrayView1<Self::A>,
    ) -> <<Self as RelDiff>::A as Scalar>::Real;
}

macro_rules! rel_diff_impl {
    ($scalar:ty) => {
        impl RelDiff for $scalar {
            type A = $scalar;
            fn rel_diff_fro(
                first: ArrayView2<Self::A>,
                second: ArrayView2<Self::A>,
            ) -> <<Self as RelDiff>::A as Scalar>::Real {
                let diff = first.to_owned() - &second;
                diff.norm_l2() / second.norm_l2()
            }

            fn rel_diff_l2(
                first: ArrayView1<Self::A>,
                second: ArrayView1<Self::A>,
            ) -> <<Self as RelDiff>::A as Scalar>::Real {
                let diff = first.to_owned() - &second;
                diff.norm_l2() / second.norm_l2()
            }
        }
    };
}

rel_diff_impl!(f32);
rel_diff_impl!(f64);
rel_diff_impl!(c32);
rel_diff_impl!(c64);

/// Check that a penalty is usable as a shrinkage threshold.
pub(crate) fn check_penalty<T: Float>(penalty: T) -> Result<()> {
    if penalty.is_finite() && penalty >= T::zero() {
        Ok(())
    } else {
        Err(RpcaError::InvalidPenalty(penalty.to_f64().unwrap_or(f64::NAN)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_rel_diff_of_identical_matrices_is_zero() {
        let mat = array![[1.0, 2.0], [3.0, 4.0]];
        assert_eq!(f64::rel_diff_fro(mat.view(), mat.view()), 0.0);
    }

    #[test]
    fn test_check_penalty() {
        assert!(check_penalty(0.0_f64).is_ok());
        assert!(check_penalty(2.5_f32).is_ok());
        assert!(matches!(
            check_penalty(-1.0_f64),
            Err(RpcaError::InvalidPenalty(_))
        ));
        assert!(check_penalty(f64::NAN).is_err());
        assert!(check_penalty(f64::INFINITY).is_err());
    }
}
