use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::errors::SimdbenchError;

/// One line of benchmark results, in the positional order the benchmark
/// binary prints them and the CSV stores them.
///
/// Timings are in microseconds. Gains are ratios computed by the benchmark
/// binary itself (baseline time divided by optimized time).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkRow {
    pub naive_time: i64,
    pub vectorized_time: i64,
    pub multithreaded_time: i64,
    pub multithreaded_vectorized_time: i64,
    pub vector_speedup: f64,
    pub vector_speedup_alt: f64,
    pub multithread_speedup: f64,
    pub multithread_vector_speedup: f64,
}

impl BenchmarkRow {
    pub fn timings(&self) -> [i64; 4] {
        [
            self.naive_time,
            self.vectorized_time,
            self.multithreaded_time,
            self.multithreaded_vectorized_time,
        ]
    }

    pub fn gains(&self) -> [f64; 4] {
        [
            self.vector_speedup,
            self.vector_speedup_alt,
            self.multithread_speedup,
            self.multithread_vector_speedup,
        ]
    }
}

/// Rows in the order their sizes were requested.
pub type BenchmarkTable = Vec<BenchmarkRow>;

/// How the final results are printed on stdout.
#[derive(Clone, Copy, Debug, PartialEq, ValueEnum)]
pub enum OutputFormat {
    /// Aligned text table
    Summary,
    /// JSON array of rows
    Json,
}

/// Converts a power of ten into an array size: `floor(10^exponent)`.
pub fn size_from_exponent(exponent: f64) -> Result<u64, SimdbenchError> {
    if !exponent.is_finite() {
        return Err(SimdbenchError::InvalidExponent { exponent });
    }

    // powi keeps integral powers exact (10^3 must be 1000, not 999.999...)
    let value = if exponent.fract() == 0.0 && exponent.abs() <= i32::MAX as f64 {
        10f64.powi(exponent as i32)
    } else {
        10f64.powf(exponent)
    }
    .floor();

    // u64::MAX as f64 rounds up to 2^64, which is already out of range
    if value < 1.0 || value >= u64::MAX as f64 {
        return Err(SimdbenchError::InvalidExponent { exponent });
    }
    Ok(value as u64)
}

/// Resolves every exponent, failing on the first one that yields no usable size.
pub fn sizes_from_exponents(exponents: &[f64]) -> Result<Vec<u64>, SimdbenchError> {
    exponents.iter().map(|&p| size_from_exponent(p)).collect()
}
