//! Robust principal component pursuit for anomaly detection.
//!
//! A matrix $X$ is decomposed as $X = L + S + E$ with $L$ low rank, $S$ sparse and
//! $E$ a small dense residual. Entries with a large magnitude in $S$ are
//! observations that do not fit the low-rank background.
//!
//! The building blocks are exposed individually: elementwise soft-thresholding,
//! singular value thresholding on top of an exchangeable SVD backend, the
//! residual-driven choice of the penalty scale, and median/MAD statistics.
//! The `rad` module applies the solver to periodic series, differencing
//! trending series first when the `adf` unit root regression asks for it.

pub mod adf;
pub mod examples;
pub mod penalty;
pub mod rad;
pub mod random_matrix;
pub mod robust_stats;
pub mod rpca;
pub mod soft_threshold;
pub mod svd;
pub mod svt;
pub mod types;

pub mod prelude;

pub use adf::{adf_test, default_lag, zero_padded_diff, AdfTest, ADF_CRITICAL_VALUE};
pub use penalty::{DynamicMu, MU_FLOOR};
pub use rad::{rad, Differencing, RadDecomposition, RadOptions};
pub use random_matrix::RandomMatrix;
pub use robust_stats::{mad, median, MAD_NORMAL_SCALE};
pub use rpca::{
    rpca_decompose, Decomposition, IterationObserver, IterationRecord, NoObserver, RpcaOptions,
    SolverState, SolverStatus, RPCA,
};
pub use soft_threshold::{soft_threshold_inplace, SoftThreshold};
pub use svd::{compute_svd, LapackSVD, SVDBackend, SVDData};
pub use svt::{SVTResult, SingularValueThreshold};
pub use types::{RelDiff, Result, RpcaError};
