//! Thin singular value decompositions and the backend trait that computes them.
//!
//! The solver only needs the thin SVD $A = U\Sigma V^H$ of a dense $m\times n$ matrix,
//! with $U\in\mathbb{C}^{m\times k}$, $V^H\in\mathbb{C}^{k\times n}$ and $k=\min(m, n)$.
//! How it is computed is left to an [SVDBackend]. The default [LapackSVD] calls the
//! divide and conquer driver of Lapack through ndarray-linalg.

use crate::types::{c32, c64, Result, RpcaError, Scalar};
use ndarray::{Array1, Array2, ArrayView2, Axis, Zip};
use ndarray_linalg::{JobSvd, Lapack, SVDDCInto};

pub struct SVDData<A: Scalar> {
    /// The U matrix
    pub u: Array2<A>,
    /// The array of singular values, non-negative and in descending order
    pub s: Array1<A::Real>,
    /// The vt matrix
    pub vt: Array2<A>,
}

impl<A: Scalar> SVDData<A> {
    /// Number of singular triplets stored.
    pub fn rank(&self) -> usize {
        self.s.len()
    }

    /// Sum of the stored singular values.
    pub fn nuclear_norm(&self) -> A::Real {
        self.s.sum()
    }

    /// Form the matrix $U\Sigma V^H$.
    pub fn to_mat(&self) -> Array2<A> {
        let mut scaled_vt = self.vt.to_owned();

        Zip::from(scaled_vt.axis_iter_mut(Axis(0)))
            .and(self.s.view())
            .for_each(|mut row, &s_elem| row.map_inplace(|item| *item *= A::from_real(s_elem)));

        self.u.dot(&scaled_vt)
    }
}

/// A capability that computes thin SVDs.
pub trait SVDBackend<A: Scalar> {
    fn decompose(&self, arr: ArrayView2<A>) -> Result<SVDData<A>>;
}

/// Thin SVD through the Lapack divide and conquer routine `?gesdd`.
#[derive(Clone, Copy, Debug, Default)]
pub struct LapackSVD;

macro_rules! lapack_svd_impl {
    ($scalar:ty) => {
        impl SVDBackend<$scalar> for LapackSVD {
            fn decompose(&self, arr: ArrayView2<$scalar>) -> Result<SVDData<$scalar>> {
                let (u, s, vt) = arr.to_owned().svddc_into(JobSvd::Some)?;

                match (u, vt) {
                    (Some(u), Some(vt)) => Ok(SVDData { u, s, vt }),
                    _ => Err(RpcaError::SVDError(
                        "Lapack did not return singular vectors.".to_string(),
                    )),
                }
            }
        }
    };
}

lapack_svd_impl!(f32);
lapack_svd_impl!(f64);
lapack_svd_impl!(c32);
lapack_svd_impl!(c64);

/// Compute the thin SVD of a matrix with the default backend.
pub fn compute_svd<A>(arr: ArrayView2<A>) -> Result<SVDData<A>>
where
    A: Scalar + Lapack,
    LapackSVD: SVDBackend<A>,
{
    LapackSVD.decompose(arr)
}
