use std::path::Path;
use std::process::{Command, ExitStatus, Stdio};
use std::time::Instant;

use anyhow::Result;

use crate::errors::SimdbenchError;
use crate::parse;
use crate::types::BenchmarkRow;

/// Command-line argument carrying the array size, e.g. `--size=1000`.
pub fn size_argument(size: u64) -> String {
    format!("--size={}", size)
}

/// Run the benchmark binary once for `size` and parse its result line.
///
/// The child inherits our environment; its stdout and stderr are buffered in
/// full and only inspected after it exits. A nonzero exit yields
/// [`SimdbenchError::BenchmarkExecution`] carrying both streams.
pub fn run_step(binary: &Path, size: u64) -> Result<BenchmarkRow> {
    let arg = size_argument(size);
    tracing::debug!(binary = %binary.display(), %arg, "spawning benchmark");

    let started = Instant::now();
    let output = Command::new(binary)
        .arg(&arg)
        .stdin(Stdio::null())
        .output()
        .map_err(|source| SimdbenchError::SpawnFailed {
            binary: binary.to_path_buf(),
            source,
        })?;

    tracing::debug!(
        size,
        status = %output.status,
        elapsed_ms = started.elapsed().as_millis() as u64,
        stdout_bytes = output.stdout.len(),
        stderr_bytes = output.stderr.len(),
        "benchmark exited"
    );

    let stdout = String::from_utf8_lossy(&output.stdout);

    if !output.status.success() {
        return Err(SimdbenchError::BenchmarkExecution {
            binary: binary.to_path_buf(),
            size,
            status: describe_status(output.status),
            stdout: stdout.into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        }
        .into());
    }

    Ok(parse::parse_last_line(&stdout)?)
}

fn describe_status(status: ExitStatus) -> String {
    match status.code() {
        Some(code) => format!("exit code {}", code),
        None => status.to_string(),
    }
}
