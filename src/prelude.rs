//! Collect all traits and other exports here.

pub use crate::penalty::DynamicMu;
pub use crate::random_matrix::RandomMatrix;
pub use crate::rpca::{IterationObserver, RpcaOptions, SolverStatus, RPCA};
pub use crate::soft_threshold::SoftThreshold;
pub use crate::svd::SVDBackend;
pub use crate::svt::SingularValueThreshold;
pub use crate::types::RelDiff;
