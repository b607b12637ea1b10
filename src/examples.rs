//! # Library examples
//!
//! We provide an example in the `demos` subdirectory. To run it
//! use `cargo run --example anomaly_detection`.
//!
//! ### Detecting spikes in a seasonal series.
//!
//! This example builds a daily series with a weekly pattern and noise,
//! adds a few spikes and runs the series through [crate::rad::rad]. It prints
//! the positions with a large sparse component next to the injected ones,
//! together with the number of solver iterations. The corresponding code is in
//! the file `anomaly_detection.rs`.
//!
//! ### Separating a corrupted low-rank matrix.
//!
//! ```no_run
//! use rusty_rpca::prelude::*;
//!
//! let mut rng = rand::thread_rng();
//! let low_rank = f64::random_low_rank_matrix((100, 60), 3, &mut rng);
//! let (mat, positions) = f64::random_sparse_corruption(&low_rank, 50, 20.0, &mut rng);
//!
//! let result = f64::rpca(mat.view(), &RpcaOptions::default()).unwrap();
//!
//! println!("Status: {:?} after {} iterations", result.status, result.iterations);
//! println!("Corrupted: {} Detected: {}", positions.len(), result.anomalies(1.0).len());
//! ```
