//! Augmented Dickey-Fuller regression.
//!
//! For a series $x_0,\dots,x_{T-1}$ with differences $\Delta x_t = x_{t+1} - x_t$ and
//! lag order $p$ the regression
//! $$
//! \Delta x_t = \beta x_t + c + \delta (t + 1) + \sum_{j=1}^{p}\gamma_j\Delta x_{t-j} + \varepsilon_t,
//! \quad t = p,\dots,T-2
//! $$
//! is solved by least squares. The statistic is $\hat\beta / \mathrm{se}(\hat\beta)$.
//! The series wrapper in [crate::rad] differences a series when the statistic is at
//! or below [ADF_CRITICAL_VALUE].

use crate::svd::compute_svd;
use crate::types::{Result, RpcaError};
use ndarray::{Array1, Array2, ArrayBase, Data, Ix1};
use ndarray_linalg::LeastSquaresSvd;

/// Critical value of the statistic for the regression with constant and trend.
pub const ADF_CRITICAL_VALUE: f64 = -3.45;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AdfTest {
    /// Number of lagged differences in the regression
    pub lag: usize,
    /// t statistic of the lagged level
    pub statistic: f64,
    pub needs_diff: bool,
}

/// Lag order `floor((len - 1)^(1/3))`.
pub fn default_lag(len: usize) -> usize {
    (len.saturating_sub(1) as f64).cbrt().floor() as usize
}

/// Zero padded first differences `d[0] = 0`, `d[i] = x[i] - x[i - 1]`.
pub fn zero_padded_diff<S: Data<Elem = f64>>(series: &ArrayBase<S, Ix1>) -> Array1<f64> {
    let mut diff = Array1::<f64>::zeros(series.len());
    for index in 1..series.len() {
        diff[index] = series[index] - series[index - 1];
    }
    diff
}

/// Run the regression with `lag` lagged differences.
///
/// The series needs more than `2 * lag + 4` entries so that the regression
/// has more rows than coefficients.
pub fn adf_test<S: Data<Elem = f64>>(series: &ArrayBase<S, Ix1>, lag: usize) -> Result<AdfTest> {
    let len = series.len();
    if len <= 2 * lag + 4 {
        return Err(RpcaError::SeriesTooShort { len, lag });
    }

    let nrows = len - 1 - lag;
    let ncols = lag + 3;
    let diff = Array1::from_shape_fn(len - 1, |t| series[t + 1] - series[t]);

    // Columns: lagged level, constant, trend, lagged differences.
    let mut design = Array2::<f64>::zeros((nrows, ncols));
    let mut response = Array1::<f64>::zeros(nrows);
    for (row, mut design_row) in design.outer_iter_mut().enumerate() {
        let t = lag + row;
        response[row] = diff[t];
        design_row[0] = series[t];
        design_row[1] = 1.0;
        design_row[2] = (t + 1) as f64;
        for j in 1..=lag {
            design_row[2 + j] = diff[t - j];
        }
    }

    let beta = design.least_squares(&response)?.solution;
    let residual = &response - &design.dot(&beta);
    let sigma_sq = residual.dot(&residual) / (nrows - ncols) as f64;

    // First diagonal entry of (X^T X)^{-1} = V diag(1 / s^2) V^T.
    let svd = compute_svd(design.view())?;
    let inv_gram: f64 = svd
        .s
        .iter()
        .zip(svd.vt.column(0).iter())
        .map(|(&s, &v)| v * v / (s * s))
        .sum();

    let statistic = beta[0] / (sigma_sq * inv_gram).sqrt();

    Ok(AdfTest {
        lag,
        statistic,
        needs_diff: statistic <= ADF_CRITICAL_VALUE,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uniform_noise(index: usize) -> f64 {
        ((37 * index + 11) % 97) as f64 / 97.0
    }

    fn linear_trend() -> Array1<f64> {
        Array1::from_shape_fn(100, |i| (i + 1) as f64 + 5.0 * uniform_noise(i))
    }

    fn random_walk() -> Array1<f64> {
        let mut acc = 0.0;
        (0..100)
            .map(|i| {
                acc += uniform_noise(i) - 0.5;
                acc
            })
            .collect()
    }

    #[test]
    fn test_default_lag() {
        assert_eq!(default_lag(100), 4);
        assert_eq!(default_lag(63), 3);
        assert_eq!(default_lag(8), 1);
        assert_eq!(default_lag(1), 0);
        assert_eq!(default_lag(0), 0);
    }

    #[test]
    fn test_linear_trend_needs_diff() {
        let series = linear_trend();
        let test = adf_test(&series, default_lag(series.len())).unwrap();

        assert_eq!(test.lag, 4);
        assert!(test.needs_diff);
        assert!(test.statistic < ADF_CRITICAL_VALUE - 0.5);
    }

    #[test]
    fn test_linear_trend_with_outlier_needs_diff() {
        let mut series = linear_trend();
        series[50] = 100.0;
        let test = adf_test(&series, default_lag(series.len())).unwrap();

        assert!(test.needs_diff);
        assert!(test.statistic < ADF_CRITICAL_VALUE - 0.5);
    }

    #[test]
    fn test_random_walk_is_left_alone() {
        let series = random_walk();
        let test = adf_test(&series, default_lag(series.len())).unwrap();

        assert!(!test.needs_diff);
        assert!(test.statistic > ADF_CRITICAL_VALUE + 1.0);
    }

    #[test]
    fn test_short_series_is_rejected() {
        let series = Array1::from_shape_fn(10, |i| i as f64 * 0.3 + uniform_noise(i));

        assert!(matches!(
            adf_test(&series, 3),
            Err(RpcaError::SeriesTooShort { len: 10, lag: 3 })
        ));
        assert!(adf_test(&series, 2).is_ok());
    }

    #[test]
    fn test_zero_padded_diff() {
        let series = ndarray::array![1.0, 4.0, 2.0, 2.5];
        assert_eq!(zero_padded_diff(&series), ndarray::array![0.0, 3.0, -2.0, 0.5]);
    }
}
