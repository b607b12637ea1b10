//! Singular value thresholding.
//!
//! Given a matrix $M = U\Sigma V^H$ and a penalty $\lambda\geq 0$ the singular value
//! thresholding operator returns $\hat{M} = U S_\lambda(\Sigma) V^H$, where $S_\lambda$
//! soft-thresholds every singular value. $\hat{M}$ is the proximal point of
//! $\lambda\|\cdot\|_*$ at $M$. The thresholded singular values are returned alongside
//! $\hat{M}$ so that callers can evaluate the nuclear norm penalty without a second SVD.

use crate::soft_threshold::SoftThreshold;
use crate::svd::{LapackSVD, SVDBackend, SVDData};
use crate::types::{check_penalty, Result, Scalar};
use ndarray::{Array1, Array2, ArrayBase, Data, Ix2};
use ndarray_linalg::Lapack;

pub struct SVTResult<A: Scalar> {
    /// The reconstructed matrix with shrunk singular values
    pub mat: Array2<A>,
    /// The thresholded singular values in descending order
    pub singular_values: Array1<A::Real>,
}

impl<A: Scalar> SVTResult<A> {
    /// Nuclear norm of the thresholded matrix.
    pub fn nuclear_norm(&self) -> A::Real {
        self.singular_values.sum()
    }

    /// Number of singular values that survived the thresholding.
    pub fn rank(&self) -> usize {
        self.singular_values
            .iter()
            .filter(|&&s| s > num::zero())
            .count()
    }
}

pub trait SingularValueThreshold {
    type A: Scalar;

    /// Threshold the singular values with the default Lapack backend.
    fn svt(&self, penalty: <Self::A as Scalar>::Real) -> Result<SVTResult<Self::A>>;

    /// Threshold the singular values with a given SVD backend.
    fn svt_with<B: SVDBackend<Self::A>>(
        &self,
        penalty: <Self::A as Scalar>::Real,
        backend: &B,
    ) -> Result<SVTResult<Self::A>>;
}

impl<A, S> SingularValueThreshold for ArrayBase<S, Ix2>
where
    A: Scalar + Lapack,
    A::Real: SoftThreshold<Real = A::Real, Output = A::Real>,
    S: Data<Elem = A>,
    LapackSVD: SVDBackend<A>,
{
    type A = A;

    fn svt(&self, penalty: A::Real) -> Result<SVTResult<A>> {
        self.svt_with(penalty, &LapackSVD)
    }

    fn svt_with<B: SVDBackend<A>>(&self, penalty: A::Real, backend: &B) -> Result<SVTResult<A>> {
        check_penalty(penalty)?;

        let SVDData { u, s, vt } = backend.decompose(self.view())?;
        let thresholded = SVDData {
            u,
            s: s.soft_threshold(penalty),
            vt,
        };

        Ok(SVTResult {
            mat: thresholded.to_mat(),
            singular_values: thresholded.s,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random_matrix::RandomMatrix;
    use crate::types::{c64, RelDiff, RpcaError};
    use ndarray::array;

    macro_rules! svt_identity_tests {

        ($($name:ident: $scalar:ty, $dim:expr, $tol:expr,)*) => {

            $(

        #[test]
        fn $name() {
            let mut rng = rand::thread_rng();
            let mat = <$scalar>::random_gaussian($dim, &mut rng);

            let result = mat.svt(0.0).unwrap();

            assert_eq!(result.mat.dim(), mat.dim());
            assert!(<$scalar>::rel_diff_fro(result.mat.view(), mat.view()) < $tol);
        }

            )*

        }
    }

    svt_identity_tests! {
        test_svt_zero_penalty_f32_thin: f32, (30, 20), 1E-5,
        test_svt_zero_penalty_f64_thin: f64, (30, 20), 1E-6,
        test_svt_zero_penalty_f64_thick: f64, (20, 30), 1E-6,
        test_svt_zero_penalty_c64_thin: c64, (30, 20), 1E-6,
    }

    #[test]
    fn test_svt_singular_values_are_shifted() {
        let mat = array![[5.0_f64, 0.0], [0.0, 2.0], [0.0, 0.0]];
        let result = mat.svt(3.0).unwrap();

        assert!((result.singular_values[0] - 2.0).abs() < 1E-12);
        assert_eq!(result.singular_values[1], 0.0);
        assert_eq!(result.rank(), 1);

        let expected = array![[2.0_f64, 0.0], [0.0, 0.0], [0.0, 0.0]];
        assert!(f64::rel_diff_fro(result.mat.view(), expected.view()) < 1E-12);
    }

    #[test]
    fn test_svt_nuclear_norm_is_non_increasing_in_penalty() {
        let mut rng = rand::thread_rng();
        let mat = f64::random_gaussian((25, 18), &mut rng);
        let original = mat.svt(0.0).unwrap().nuclear_norm();

        let mut previous = original;
        for &penalty in [0.1, 0.5, 1.0, 2.0, 4.0, 8.0, 100.0].iter() {
            let result = mat.svt(penalty).unwrap();
            let current = result.nuclear_norm();

            assert!(result.singular_values.iter().all(|&s| s >= 0.0));
            assert!(current <= previous + 1E-10);
            previous = current;
        }

        // Beyond the largest singular value everything is thresholded away.
        assert_eq!(previous, 0.0);
    }

    #[test]
    fn test_svt_with_explicit_backend_matches_default() {
        let mut rng = rand::thread_rng();
        let mat = f64::random_gaussian((15, 12), &mut rng);

        let default = mat.svt(0.7).unwrap();
        let explicit = mat.svt_with(0.7, &LapackSVD).unwrap();

        assert!(f64::rel_diff_fro(explicit.mat.view(), default.mat.view()) < 1E-12);
    }

    #[test]
    fn test_svt_rejects_negative_penalty() {
        let mat = array![[1.0_f64, 2.0], [3.0, 4.0]];

        assert!(matches!(mat.svt(-1.0), Err(RpcaError::InvalidPenalty(_))));
    }
}
