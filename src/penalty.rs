//! Selection of the penalty scale mu.
//!
//! The solver starts from $\mu_0 = mn / (4\|X\|_1)$ and afterwards derives $\mu$ from
//! the dispersion of the current residual: $\mu = \mathrm{sd}(E)\sqrt{2\max(m, n)}$,
//! where $\mathrm{sd}$ is the unbiased sample standard deviation of all entries of $E$.
//! The result is floored at [MU_FLOOR].

use crate::types::{Result, RpcaError};
use ndarray::ArrayView2;
use ndarray_linalg::Norm;

/// Lower bound for the penalty scale.
pub const MU_FLOOR: f64 = 0.01;

pub trait DynamicMu: Sized {
    /// The penalty scale `mu` for the next iteration given the current residual.
    fn dynamic_mu(residual: ArrayView2<Self>) -> Self;

    /// The initial penalty scale `(m * n) / (4 * ||X||_1)`.
    fn initial_mu(mat: ArrayView2<Self>) -> Result<Self>;
}

macro_rules! dynamic_mu_impl {
    ($scalar:ty) => {
        impl DynamicMu for $scalar {
            fn dynamic_mu(residual: ArrayView2<$scalar>) -> $scalar {
                let (m, n) = residual.dim();

                // A single entry has no spread.
                let sd = if residual.len() > 1 {
                    residual.std(1.0)
                } else {
                    0.0
                };

                let mu = sd * (2.0 * m.max(n) as $scalar).sqrt();

                // NaN is not floored so that divergence stays visible.
                if mu < MU_FLOOR as $scalar {
                    MU_FLOOR as $scalar
                } else {
                    mu
                }
            }

            fn initial_mu(mat: ArrayView2<$scalar>) -> Result<$scalar> {
                let (m, n) = mat.dim();
                let l1_norm = mat.norm_l1();

                if l1_norm == 0.0 {
                    return Err(RpcaError::DegeneratePenalty);
                }

                Ok((m * n) as $scalar / (4.0 * l1_norm))
            }
        }
    };
}

dynamic_mu_impl!(f32);
dynamic_mu_impl!(f64);

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::{array, Array2};

    #[test]
    fn test_dynamic_mu_uses_unbiased_standard_deviation() {
        // Entries 1, 2, 3, 4 have mean 2.5 and unbiased variance 5/3.
        let residual = array![[1.0_f64, 2.0], [3.0, 4.0]];
        let expected = (5.0_f64 / 3.0).sqrt() * 2.0;

        assert_relative_eq!(f64::dynamic_mu(residual.view()), expected, max_relative = 1E-12);
    }

    #[test]
    fn test_dynamic_mu_uses_larger_dimension() {
        let residual = array![[1.0_f64, -1.0, 1.0, -1.0, 1.0, -1.0]];
        let sd = (6.0_f64 / 5.0).sqrt();

        assert_relative_eq!(
            f64::dynamic_mu(residual.view()),
            sd * 12.0_f64.sqrt(),
            max_relative = 1E-12
        );
    }

    #[test]
    fn test_dynamic_mu_is_floored() {
        let constant = Array2::<f64>::from_elem((5, 4), 3.0);
        assert_eq!(f64::dynamic_mu(constant.view()), MU_FLOOR);

        let single = array![[42.0_f32]];
        assert_eq!(f32::dynamic_mu(single.view()), MU_FLOOR as f32);
    }

    #[test]
    fn test_dynamic_mu_propagates_nan() {
        let residual = array![[1.0_f64, f64::NAN], [0.0, 2.0]];
        assert!(f64::dynamic_mu(residual.view()).is_nan());
    }

    #[test]
    fn test_initial_mu() {
        let mat = array![[1.0_f64, -2.0], [3.0, -4.0]];
        assert_relative_eq!(f64::initial_mu(mat.view()).unwrap(), 4.0 / 40.0);
    }

    #[test]
    fn test_initial_mu_of_zero_matrix_is_degenerate() {
        let mat = Array2::<f64>::zeros((3, 3));
        assert!(matches!(
            f64::initial_mu(mat.view()),
            Err(RpcaError::DegeneratePenalty)
        ));
    }
}
