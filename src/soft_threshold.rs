//! Elementwise soft-thresholding.
//!
//! The soft-threshold operator with penalty $\lambda\geq 0$ is defined as
//! $S_\lambda(x) = \mathrm{sign}(x)\max(|x| - \lambda, 0)$. It is the proximal
//! operator of $\lambda\|\cdot\|_1$. Entries with $|x|\leq\lambda$ map to exactly zero,
//! all other entries are shrunk towards zero by $\lambda$ and keep their sign.
//! Non-finite inputs produce non-finite outputs.

use ndarray::{Array, ArrayBase, Data, DataMut, Dimension};

pub trait SoftThreshold {
    type Real;
    type Output;

    /// Soft-threshold `self` with the given non-negative penalty.
    fn soft_threshold(&self, penalty: Self::Real) -> Self::Output;
}

macro_rules! soft_threshold_impl {
    ($scalar:ty) => {
        impl SoftThreshold for $scalar {
            type Real = $scalar;
            type Output = $scalar;

            #[inline]
            fn soft_threshold(&self, penalty: $scalar) -> $scalar {
                let penalized = self.abs() - penalty;
                // NaN falls through to the first branch.
                if !(penalized <= 0.0) {
                    penalized.copysign(*self)
                } else {
                    0.0
                }
            }
        }
    };
}

soft_threshold_impl!(f32);
soft_threshold_impl!(f64);

impl<A, S, D> SoftThreshold for ArrayBase<S, D>
where
    A: SoftThreshold<Real = A, Output = A> + Copy,
    S: Data<Elem = A>,
    D: Dimension,
{
    type Real = A;
    type Output = Array<A, D>;

    fn soft_threshold(&self, penalty: A) -> Array<A, D> {
        self.mapv(|item| item.soft_threshold(penalty))
    }
}

/// Soft-threshold an array in place.
pub fn soft_threshold_inplace<A, S, D>(arr: &mut ArrayBase<S, D>, penalty: A)
where
    A: SoftThreshold<Real = A, Output = A> + Copy,
    S: DataMut<Elem = A>,
    D: Dimension,
{
    arr.mapv_inplace(|item| item.soft_threshold(penalty));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random_matrix::RandomMatrix;
    use ndarray::{array, Array1, Array2};

    #[test]
    fn test_scalar_soft_threshold() {
        assert_eq!(3.0_f64.soft_threshold(1.0), 2.0);
        assert_eq!((-3.0_f64).soft_threshold(1.0), -2.0);
        assert_eq!(0.5_f64.soft_threshold(1.0), 0.0);
        assert_eq!((-1.0_f64).soft_threshold(1.0), 0.0);
        assert_eq!(2.5_f32.soft_threshold(0.5), 2.0);
    }

    #[test]
    fn test_zero_penalty_is_identity() {
        for &x in [-7.25_f64, -1E-12, 0.0, 3.5, 1E8].iter() {
            assert_eq!(x.soft_threshold(0.0), x);
        }
    }

    #[test]
    fn test_non_finite_input_propagates() {
        assert!(f64::NAN.soft_threshold(1.0).is_nan());
        assert_eq!(f64::INFINITY.soft_threshold(1.0), f64::INFINITY);
        assert_eq!(f64::NEG_INFINITY.soft_threshold(1.0), f64::NEG_INFINITY);
    }

    #[test]
    fn test_vector_soft_threshold() {
        let vec: Array1<f64> = array![-2.0, -0.5, 0.0, 0.5, 2.0];
        let expected: Array1<f64> = array![-1.0, 0.0, 0.0, 0.0, 1.0];

        assert_eq!(vec.soft_threshold(1.0), expected);
    }

    #[test]
    fn test_inplace_matches_owned() {
        let mut rng = rand::thread_rng();
        let mat = f64::random_gaussian((20, 15), &mut rng);
        let expected = mat.soft_threshold(0.3);

        let mut actual = mat.clone();
        soft_threshold_inplace(&mut actual, 0.3);

        assert_eq!(actual, expected);
    }

    macro_rules! shrinkage_property_tests {

        ($($name:ident: $scalar:ty, $dim:expr, $penalty:expr,)*) => {

            $(

        #[test]
        fn $name() {
            let mut rng = rand::thread_rng();
            let mat: Array2<$scalar> = <$scalar>::random_gaussian($dim, &mut rng);
            let penalty: $scalar = $penalty;

            let shrunk = mat.soft_threshold(penalty);

            assert_eq!(shrunk.dim(), mat.dim());

            for (&before, &after) in mat.iter().zip(shrunk.iter()) {
                assert!(after.abs() <= before.abs());
                if before.abs() <= penalty {
                    assert_eq!(after, 0.0);
                } else {
                    assert_eq!(after.signum(), before.signum());
                    assert!((before.abs() - after.abs() - penalty).abs() <= 1E-5 * before.abs().max(1.0));
                }
            }
        }

            )*

        }
    }

    shrinkage_property_tests! {
        test_shrinkage_f32_small_penalty: f32, (30, 20), 0.1,
        test_shrinkage_f32_large_penalty: f32, (30, 20), 1.5,
        test_shrinkage_f64_small_penalty: f64, (30, 20), 0.1,
        test_shrinkage_f64_large_penalty: f64, (20, 30), 1.5,
    }
}
