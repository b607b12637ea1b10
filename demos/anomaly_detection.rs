// Detect injected spikes in a noisy seasonal series.

use ndarray::Array1;
use rand::Rng;
use rand_distr::{Distribution, Normal};
use rusty_rpca::prelude::*;
use rusty_rpca::{rad, Differencing, RadOptions};

pub fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let period = 7;
    let periods = 12;
    let pattern = [10.0, 12.0, 13.0, 13.5, 12.0, 6.0, 5.0];

    let mut rng = rand::thread_rng();
    let noise = Normal::new(0.0, 0.3).unwrap();

    let mut series = Array1::from_shape_fn(period * periods, |index| {
        pattern[index % period] + noise.sample(&mut rng)
    });

    let mut injected: Vec<usize> = (0..4)
        .map(|_| rng.gen_range(0..series.len()))
        .collect();
    injected.sort_unstable();
    injected.dedup();
    for &index in injected.iter() {
        series[index] += 15.0;
    }

    let options = RadOptions::default()
        .with_differencing(Differencing::Off)
        .with_rpca(RpcaOptions::default().with_verbose(true));
    let result = match rad(&series, period, periods, &options) {
        Ok(Some(result)) => result,
        Ok(None) => {
            println!("Not enough records to decompose the series.");
            return;
        }
        Err(err) => {
            println!("Decomposition failed: {}", err);
            return;
        }
    };

    println!("Status: {:?} after {} iterations", result.status, result.iterations);
    println!("Injected spikes: {:?}", injected);
    println!("Detected spikes: {:?}", result.anomalies(3.0 * 0.3));
}
