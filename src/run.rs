use std::path::Path;

use anyhow::Result;

use crate::invoke;
use crate::types::{BenchmarkRow, BenchmarkTable};

/// Receives per-step progress while [`run_benchmark`] works through the sizes.
pub trait Progress {
    fn step_started(&mut self, binary: &Path, size: u64);
    fn step_succeeded(&mut self, binary: &Path, size: u64, row: &BenchmarkRow);
    fn step_failed(&mut self, binary: &Path, size: u64, err: &anyhow::Error);
}

/// Run the benchmark once per size, in order, collecting one row per size.
///
/// The first failing step aborts the whole run and no rows are returned.
pub fn run_benchmark<P: Progress>(
    binary: &Path,
    sizes: &[u64],
    progress: &mut P,
) -> Result<BenchmarkTable> {
    let mut table = BenchmarkTable::with_capacity(sizes.len());

    for &size in sizes {
        progress.step_started(binary, size);
        match invoke::run_step(binary, size) {
            Ok(row) => {
                progress.step_succeeded(binary, size, &row);
                table.push(row);
            }
            Err(err) => {
                progress.step_failed(binary, size, &err);
                return Err(err);
            }
        }
    }

    tracing::debug!(rows = table.len(), "benchmark run complete");
    Ok(table)
}
