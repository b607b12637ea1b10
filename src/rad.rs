//! Robust anomaly detection on periodic series.
//!
//! A series of `nrows * ncols` observations is read column by column into an
//! `nrows x ncols` matrix, so that every column holds one period (for example
//! one week of daily values with `nrows = 7`). A seasonal series then forms an
//! approximately low-rank matrix and robust PCA moves observations that break
//! the pattern into the sparse part.
//!
//! Before the decomposition the series is optionally differenced (by default
//! when the Dickey-Fuller regression in [crate::adf] calls for it) and then
//! standardised to zero mean and unit sample variance. The components are
//! mapped back to the scale of the series: `l = L * sd + mean`, `s = S * sd`
//! and `e = E * sd`. Series with fewer than `2 * nrows` non-zero observations
//! are not decomposed.

use crate::adf::{adf_test, default_lag, zero_padded_diff};
use crate::rpca::{RpcaOptions, SolverStatus, RPCA};
use crate::types::{Result, RpcaError};
use ndarray::{Array1, Array2, ArrayBase, Data, Ix1, ShapeBuilder};

/// Transformation applied to the series before standardisation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Differencing {
    /// Difference if the Dickey-Fuller statistic is at or below
    /// [crate::adf::ADF_CRITICAL_VALUE].
    Auto,
    /// Use the series as is.
    Off,
    /// Zero padded first differences `d[0] = 0`, `d[i] = x[i] - x[i - 1]`.
    FirstOrder,
}

#[derive(Clone, Debug)]
pub struct RadOptions {
    pub rpca: RpcaOptions<f64>,
    pub differencing: Differencing,
    /// Observations with `|x| <= eps` do not count as records.
    pub eps: f64,
}

impl Default for RadOptions {
    fn default() -> Self {
        Self {
            rpca: RpcaOptions::default(),
            differencing: Differencing::Auto,
            eps: 1E-12,
        }
    }
}

impl RadOptions {
    pub fn with_rpca(mut self, rpca: RpcaOptions<f64>) -> Self {
        self.rpca = rpca;
        self
    }

    pub fn with_differencing(mut self, differencing: Differencing) -> Self {
        self.differencing = differencing;
        self
    }
}

/// Per-observation components of a series, in the order of the input.
#[derive(Clone, Debug)]
pub struct RadDecomposition {
    /// The differenced and standardised series that was decomposed
    pub x_transform: Array1<f64>,
    /// Low-rank component on the scale of the series
    pub l: Array1<f64>,
    /// Sparse component on the scale of the series
    pub s: Array1<f64>,
    /// Residual on the scale of the series
    pub e: Array1<f64>,
    /// Whether the series was differenced before standardisation
    pub differenced: bool,
    pub mean: f64,
    pub sd: f64,
    pub status: SolverStatus,
    pub iterations: usize,
}

impl RadDecomposition {
    /// Indices of observations with `|s| > threshold`.
    pub fn anomalies(&self, threshold: f64) -> Vec<usize> {
        self.s
            .iter()
            .enumerate()
            .filter(|(_, value)| value.abs() > threshold)
            .map(|(index, _)| index)
            .collect()
    }
}

/// Decompose a series of `nrows * ncols` observations.
///
/// Returns `Ok(None)` if the series has fewer than `2 * nrows` non-zero observations.
pub fn rad<S: Data<Elem = f64>>(
    series: &ArrayBase<S, Ix1>,
    nrows: usize,
    ncols: usize,
    options: &RadOptions,
) -> Result<Option<RadDecomposition>> {
    if nrows == 0 || ncols == 0 {
        return Err(RpcaError::InvalidInput { nrows, ncols });
    }
    if series.len() != nrows * ncols {
        return Err(RpcaError::ShapeMismatch {
            len: series.len(),
            nrows,
            ncols,
        });
    }
    if series.iter().any(|item| !item.is_finite()) {
        return Err(RpcaError::NonFiniteInput);
    }

    let records = series.iter().filter(|item| item.abs() > options.eps).count();
    let min_records = 2 * nrows;
    if records < min_records {
        tracing::debug!(records, min_records, "too few records, skipping decomposition");
        return Ok(None);
    }

    let differenced = match options.differencing {
        Differencing::Off => false,
        Differencing::FirstOrder => true,
        Differencing::Auto => match adf_test(series, default_lag(series.len())) {
            Ok(test) => {
                tracing::debug!(
                    lag = test.lag,
                    statistic = test.statistic,
                    needs_diff = test.needs_diff,
                    "unit root regression"
                );
                test.needs_diff
            }
            Err(RpcaError::SeriesTooShort { len, lag }) => {
                tracing::debug!(len, lag, "series too short for unit root regression");
                false
            }
            Err(err) => return Err(err),
        },
    };

    let transformed = if differenced {
        zero_padded_diff(series)
    } else {
        series.to_owned()
    };

    let mean = transformed.sum() / transformed.len() as f64;
    let sd = transformed.std(1.0);
    if !(sd > 0.0) {
        return Err(RpcaError::ZeroVariance);
    }

    let x_transform = transformed.mapv(|item| (item - mean) / sd);

    // Column-major, one period per column.
    let mat = Array2::from_shape_vec((nrows, ncols).f(), x_transform.to_vec()).map_err(|_| {
        RpcaError::ShapeMismatch {
            len: x_transform.len(),
            nrows,
            ncols,
        }
    })?;

    let decomposition = f64::rpca(mat.view(), &options.rpca)?;

    let unfold = |component: &Array2<f64>, shift: f64| -> Array1<f64> {
        component.t().iter().map(|&item| item * sd + shift).collect()
    };

    Ok(Some(RadDecomposition {
        l: unfold(&decomposition.l, mean),
        s: unfold(&decomposition.s, 0.0),
        e: unfold(&decomposition.e, 0.0),
        x_transform,
        differenced,
        mean,
        sd,
        status: decomposition.status,
        iterations: decomposition.iterations,
    }))
}
