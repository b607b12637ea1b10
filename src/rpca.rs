//! Robust principal component pursuit.
//!
//! A matrix $X\in\mathbb{R}^{m\times n}$ is split as $X = L + S + E$ with $L$ low rank,
//! $S$ sparse and $E$ a dense residual by alternately minimising
//! $$
//! \frac{1}{2}\|X - L - S\|_F^2 + \mu\lambda_L\|L\|_* + \mu\lambda_S\|S\|_1.
//! $$
//! Every iteration first refits $S$ by soft-thresholding $X - L$, then refits $L$ by
//! singular value thresholding $X - S$, and finally recomputes $E$ and the objective.
//! The scale $\mu$ is re-derived from the spread of $E$ after each iteration
//! (see [crate::penalty]). Iteration stops once the objective changes by less than
//! `tol_factor` times its initial value $\frac{1}{2}\|X\|_F^2$, or after `max_iter` iterations.
//!
//! Large entries of $S$ mark observations that do not fit the low-rank background.

use crate::penalty::DynamicMu;
use crate::soft_threshold::SoftThreshold;
use crate::svd::{LapackSVD, SVDBackend};
use crate::svt::SingularValueThreshold;
use crate::types::{check_penalty, RelDiff, Result, RpcaError, Scalar};
use ndarray::{Array2, ArrayView2};
use ndarray_linalg::Norm;

/// Default iteration cap.
pub const DEFAULT_MAX_ITER: usize = 1000;

/// Outcome of a solve.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SolverStatus {
    /// The objective change dropped below the tolerance.
    Converged,
    /// The iteration cap was hit first. The decomposition is still usable.
    MaxIterReached,
    /// The objective became NaN or infinite. The last finite iterate is returned,
    /// or the zero decomposition `l = s = 0, e = x` if the first iteration failed.
    Diverged,
}

/// Solver parameters.
///
/// Penalties left as `None` are derived from the data: `l_penalty = 1` and
/// `s_penalty = 1.4 / sqrt(max(m, n))`.
#[derive(Clone, Debug, PartialEq)]
pub struct RpcaOptions<A> {
    pub l_penalty: Option<A>,
    pub s_penalty: Option<A>,
    pub max_iter: usize,
    /// Convergence is not declared before this many iterations.
    pub min_iter: usize,
    /// Tolerance relative to the initial objective `0.5 * ||X||_F^2`.
    pub tol_factor: A,
    /// Emit per-iteration objective values as `tracing` events.
    pub verbose: bool,
}

impl<A> RpcaOptions<A> {
    pub fn with_l_penalty(mut self, l_penalty: A) -> Self {
        self.l_penalty = Some(l_penalty);
        self
    }

    pub fn with_s_penalty(mut self, s_penalty: A) -> Self {
        self.s_penalty = Some(s_penalty);
        self
    }

    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    pub fn with_min_iter(mut self, min_iter: usize) -> Self {
        self.min_iter = min_iter;
        self
    }

    pub fn with_tol_factor(mut self, tol_factor: A) -> Self {
        self.tol_factor = tol_factor;
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }
}

/// Bookkeeping of a single solve.
#[derive(Clone, Debug)]
pub struct SolverState<A> {
    pub iteration: usize,
    pub mu: A,
    pub objective_prev: A,
    pub tol: A,
    pub converged: bool,
}

/// Snapshot handed to an [IterationObserver] after every iteration.
pub struct IterationRecord<'a, A> {
    /// Number of completed iterations.
    pub iteration: usize,
    /// The penalty scale used in this iteration.
    pub mu: A,
    pub objective_prev: A,
    pub objective: A,
    pub diff: A,
    pub l: ArrayView2<'a, A>,
    pub s: ArrayView2<'a, A>,
    pub e: ArrayView2<'a, A>,
}

/// Receives every iterate of a solve. Observers cannot change the iteration.
pub trait IterationObserver<A> {
    fn observe(&mut self, record: &IterationRecord<'_, A>);
}

/// Observer that ignores all iterates.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoObserver;

impl<A> IterationObserver<A> for NoObserver {
    fn observe(&mut self, _record: &IterationRecord<'_, A>) {}
}

impl<A, F> IterationObserver<A> for F
where
    F: FnMut(&IterationRecord<'_, A>),
{
    fn observe(&mut self, record: &IterationRecord<'_, A>) {
        self(record)
    }
}

/// Result of a solve. `l + s + e` reproduces `x`.
#[derive(Clone, Debug)]
pub struct Decomposition<A> {
    pub x: Array2<A>,
    pub l: Array2<A>,
    pub s: Array2<A>,
    pub e: Array2<A>,
    pub status: SolverStatus,
    pub iterations: usize,
    /// Objective value after each completed iteration.
    pub objective_history: Vec<A>,
}

impl<A> Decomposition<A> {
    pub fn is_converged(&self) -> bool {
        self.status == SolverStatus::Converged
    }
}

pub trait RPCA: Sized {
    /// Decompose `x` with the Lapack SVD backend.
    fn rpca(x: ArrayView2<Self>, options: &RpcaOptions<Self>) -> Result<Decomposition<Self>>;

    /// Decompose `x` with a given SVD backend, reporting every iterate to `observer`.
    fn rpca_with<B, O>(
        x: ArrayView2<Self>,
        options: &RpcaOptions<Self>,
        backend: &B,
        observer: &mut O,
    ) -> Result<Decomposition<Self>>
    where
        B: SVDBackend<Self>,
        O: IterationObserver<Self>,
        Self: Scalar;
}

/// Decompose `x` into low-rank, sparse and residual parts.
pub fn rpca_decompose<A: RPCA>(
    x: ArrayView2<A>,
    options: &RpcaOptions<A>,
) -> Result<Decomposition<A>> {
    A::rpca(x, options)
}

macro_rules! rpca_impl {
    ($scalar:ty) => {
        impl Default for RpcaOptions<$scalar> {
            fn default() -> Self {
                Self {
                    l_penalty: None,
                    s_penalty: None,
                    max_iter: DEFAULT_MAX_ITER,
                    min_iter: 2,
                    tol_factor: 1E-8,
                    verbose: false,
                }
            }
        }

        impl Decomposition<$scalar> {
            /// Positions `(row, col)` with `|S| > threshold`, in row-major order.
            pub fn anomalies(&self, threshold: $scalar) -> Vec<(usize, usize)> {
                self.s
                    .indexed_iter()
                    .filter(|(_, value)| value.abs() > threshold)
                    .map(|(index, _)| index)
                    .collect()
            }

            /// Relative Frobenius error of `l + s + e` against `x`.
            pub fn reconstruction_error(&self) -> $scalar {
                let reconstructed = &self.l + &self.s + &self.e;
                <$scalar>::rel_diff_fro(reconstructed.view(), self.x.view())
            }
        }

        impl RPCA for $scalar {
            fn rpca(
                x: ArrayView2<$scalar>,
                options: &RpcaOptions<$scalar>,
            ) -> Result<Decomposition<$scalar>> {
                Self::rpca_with(x, options, &LapackSVD, &mut NoObserver)
            }

            fn rpca_with<B, O>(
                x: ArrayView2<$scalar>,
                options: &RpcaOptions<$scalar>,
                backend: &B,
                observer: &mut O,
            ) -> Result<Decomposition<$scalar>>
            where
                B: SVDBackend<$scalar>,
                O: IterationObserver<$scalar>,
            {
                let (m, n) = x.dim();
                if m == 0 || n == 0 {
                    return Err(RpcaError::InvalidInput { nrows: m, ncols: n });
                }
                if x.iter().any(|item| !item.is_finite()) {
                    return Err(RpcaError::NonFiniteInput);
                }

                let l_penalty = options.l_penalty.unwrap_or(1.0);
                let s_penalty = options
                    .s_penalty
                    .unwrap_or(1.4 / (m.max(n) as $scalar).sqrt());
                check_penalty(l_penalty)?;
                check_penalty(s_penalty)?;
                if !(options.tol_factor.is_finite() && options.tol_factor >= 0.0) {
                    return Err(RpcaError::InvalidTolerance(options.tol_factor as f64));
                }

                let objective_init = 0.5 * x.norm_l2().powi(2);
                let mut state = SolverState {
                    iteration: 0,
                    mu: <$scalar>::initial_mu(x)?,
                    objective_prev: objective_init,
                    tol: options.tol_factor * objective_init,
                    converged: false,
                };

                tracing::debug!(
                    nrows = m,
                    ncols = n,
                    l_penalty,
                    s_penalty,
                    mu = state.mu,
                    tol = state.tol,
                    "starting robust PCA"
                );

                let mut l = Array2::<$scalar>::zeros((m, n));
                let mut s = Array2::<$scalar>::zeros((m, n));
                // The zero decomposition leaves everything in the residual.
                let mut e = x.to_owned();
                let mut objective_history = Vec::new();
                let mut status = SolverStatus::MaxIterReached;

                while state.iteration < options.max_iter {
                    let mu = state.mu;

                    // Sparse part against the previous low-rank estimate.
                    let s_threshold = mu * s_penalty;
                    let s_new = (&x - &l).soft_threshold(s_threshold);
                    let l1_term = s_threshold * s_new.norm_l1();

                    // Low-rank part against the new sparse estimate.
                    let l_threshold = mu * l_penalty;
                    let svt = (&x - &s_new).svt_with(l_threshold, backend)?;
                    let nuclear_term = l_threshold * svt.nuclear_norm();
                    let l_new = svt.mat;

                    let e_new = &x - &l_new - &s_new;
                    let fit_term = 0.5 * e_new.norm_l2().powi(2);
                    let objective = fit_term + nuclear_term + l1_term;

                    if !objective.is_finite() {
                        tracing::warn!(
                            iteration = state.iteration + 1,
                            mu,
                            "robust PCA objective is not finite, aborting"
                        );
                        status = SolverStatus::Diverged;
                        break;
                    }

                    let diff = (state.objective_prev - objective).abs();
                    let objective_prev = state.objective_prev;
                    state.objective_prev = objective;

                    l = l_new;
                    s = s_new;
                    e = e_new;
                    objective_history.push(objective);

                    state.mu = <$scalar>::dynamic_mu(e.view());
                    state.iteration += 1;

                    if options.verbose {
                        tracing::info!(
                            iteration = state.iteration,
                            objective_prev,
                            objective,
                            mu,
                            "robust PCA iteration"
                        );
                    }

                    observer.observe(&IterationRecord {
                        iteration: state.iteration,
                        mu,
                        objective_prev,
                        objective,
                        diff,
                        l: l.view(),
                        s: s.view(),
                        e: e.view(),
                    });

                    if diff < state.tol && state.iteration >= options.min_iter {
                        state.converged = true;
                        status = SolverStatus::Converged;
                        break;
                    }
                }

                match (status, options.verbose) {
                    (SolverStatus::Converged, true) => tracing::info!(
                        iterations = state.iteration,
                        "converged within {} iterations",
                        state.iteration
                    ),
                    (SolverStatus::MaxIterReached, true) => tracing::info!(
                        iterations = state.iteration,
                        "failed to converge within {} iterations",
                        options.max_iter
                    ),
                    _ => tracing::debug!(
                        iterations = state.iteration,
                        status = ?status,
                        "robust PCA finished"
                    ),
                }

                Ok(Decomposition {
                    x: x.to_owned(),
                    l,
                    s,
                    e,
                    status,
                    iterations: state.iteration,
                    objective_history,
                })
            }
        }
    };
}

rpca_impl!(f32);
rpca_impl!(f64);
