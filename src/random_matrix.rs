//! Generation of random matrices for various types
//!
//! Besides Gaussian, orthogonal and approximately low-rank matrices this module creates
//! the exactly low-rank and sparsely corrupted matrices that robust PCA
//! is meant to separate.

use crate::svd::SVDData;
use crate::types::Result;
use ndarray::{Array1, Array2};
use ndarray_linalg::{Lapack, QRInto, Scalar};
use num::complex::Complex;
use num::traits::cast::cast;
use num::Float;
use rand::seq::index;
use rand::Rng;
use rand_distr::{Distribution, Normal};

pub trait RandomMatrix
where
    Self: Scalar + Lapack,
{
    /// Generate a random Gaussian matrix.
    ///
    /// # Arguments
    ///
    /// * `dimension`: Tuple (rows, cols) specifying the number of rows and columns.
    /// * `rng`: The random number generator to use.
    fn random_gaussian<R: Rng>(dimension: (usize, usize), rng: &mut R) -> Array2<Self>;

    /// Generate a random matrix with orthonormal columns (m >= n) or rows (m < n).
    ///
    /// The orthonormal factor is the Q factor of a reduced QR decomposition
    /// of a Gaussian matrix.
    fn random_orthogonal_matrix<R: Rng>(
        dimension: (usize, usize),
        rng: &mut R,
    ) -> Result<Array2<Self>> {
        let (m, n) = dimension;

        if m >= n {
            let (q, _) = Self::random_gaussian((m, n), rng).qr_into()?;
            Ok(q)
        } else {
            let (q, _) = Self::random_gaussian((n, m), rng).qr_into()?;
            Ok(q.t().mapv(|item| item.conj()))
        }
    }

    /// Generate a random approximate low-rank matrix.
    ///
    /// The singular values are logarithmically distributed between
    /// `sigma_max` and `sigma_min`.
    ///
    /// # Arguments
    ///
    /// * `dimension`: Tuple (rows, cols) specifying the number of rows and columns.
    /// * `sigma_max`: Maximum singular value.
    /// * `sigma_min`: Minimum singular value.
    /// * `rng`: The random number generator to use.
    fn random_approximate_low_rank_matrix<R: Rng>(
        dimension: (usize, usize),
        sigma_max: f64,
        sigma_min: f64,
        rng: &mut R,
    ) -> Result<Array2<Self>> {
        assert!(
            sigma_min < sigma_max,
            "`sigma_min` must be smaller than `sigma_max`"
        );
        assert!(sigma_min > 0.0, "`sigma_min` must be positive.");

        let rank = std::cmp::min(dimension.0, dimension.1);

        let svd = SVDData {
            u: Self::random_orthogonal_matrix((dimension.0, rank), rng)?,
            s: Array1::logspace(10.0, sigma_max.log10(), sigma_min.log10(), rank)
                .mapv(Self::real),
            vt: Self::random_orthogonal_matrix((rank, dimension.1), rng)?,
        };

        Ok(svd.to_mat())
    }

    /// Generate a random matrix of exact rank `rank` as the product
    /// of two Gaussian factors.
    fn random_low_rank_matrix<R: Rng>(
        dimension: (usize, usize),
        rank: usize,
        rng: &mut R,
    ) -> Array2<Self> {
        assert!(
            rank <= std::cmp::min(dimension.0, dimension.1),
            "`rank` must not exceed the smaller matrix dimension."
        );

        let left = Self::random_gaussian((dimension.0, rank), rng);
        let right = Self::random_gaussian((rank, dimension.1), rng);
        left.dot(&right)
    }

    /// Corrupt `count` distinct entries of `mat` by adding `magnitude`
    /// with a random sign.
    ///
    /// Returns the corrupted matrix and the corrupted positions in
    /// row-major order of their linear index.
    fn random_sparse_corruption<R: Rng>(
        mat: &Array2<Self>,
        count: usize,
        magnitude: f64,
        rng: &mut R,
    ) -> (Array2<Self>, Vec<(usize, usize)>) {
        let (m, n) = mat.dim();
        assert!(count <= m * n, "Cannot corrupt more entries than the matrix has.");

        let mut corrupted = mat.to_owned();
        let mut positions: Vec<(usize, usize)> = index::sample(rng, m * n, count)
            .into_iter()
            .map(|linear| (linear / n, linear % n))
            .collect();
        positions.sort_unstable();

        let spike = Self::from_real(cast::<f64, Self::Real>(magnitude).unwrap());
        for &(row, col) in positions.iter() {
            if rng.gen::<bool>() {
                corrupted[[row, col]] += spike;
            } else {
                corrupted[[row, col]] -= spike;
            }
        }

        (corrupted, positions)
    }
}

impl RandomMatrix for f64 {
    fn random_gaussian<R: Rng>(dimension: (usize, usize), rng: &mut R) -> Array2<f64> {
        random_gaussian_real::<f64, R>(dimension, rng)
    }
}

impl RandomMatrix for f32 {
    fn random_gaussian<R: Rng>(dimension: (usize, usize), rng: &mut R) -> Array2<f32> {
        random_gaussian_real::<f32, R>(dimension, rng)
    }
}

impl RandomMatrix for Complex<f64> {
    fn random_gaussian<R: Rng>(dimension: (usize, usize), rng: &mut R) -> Array2<Complex<f64>> {
        random_gaussian_complex::<f64, R>(dimension, rng)
    }
}

impl RandomMatrix for Complex<f32> {
    fn random_gaussian<R: Rng>(dimension: (usize, usize), rng: &mut R) -> Array2<Complex<f32>> {
        random_gaussian_complex::<f32, R>(dimension, rng)
    }
}

fn random_gaussian_real<T: Float, R: Rng>(dimension: (usize, usize), rng: &mut R) -> Array2<T> {
    let mut mat = Array2::<T>::zeros(dimension);
    let normal = Normal::new(0.0, 1.0).unwrap();
    mat.map_inplace(|item| *item = cast::<f64, T>(normal.sample(rng)).unwrap());
    mat
}

fn random_gaussian_complex<T: Float, R: Rng>(
    dimension: (usize, usize),
    rng: &mut R,
) -> Array2<Complex<T>> {
    let mut mat = Array2::<Complex<T>>::zeros(dimension);
    let normal = Normal::new(0.0, 1.0).unwrap();
    mat.map_inplace(|item| {
        let re = cast::<f64, T>(normal.sample(rng)).unwrap();
        let im = cast::<f64, T>(normal.sample(rng)).unwrap();
        *item = Complex::new(re, im);
    });
    mat
}
