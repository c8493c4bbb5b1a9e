use std::path::PathBuf;

#[derive(thiserror::Error, Debug)]
pub enum SimdbenchError {
    #[error("Invalid power of ten {exponent}: 10^p must floor to a positive array size that fits in 64 bits")]
    InvalidExponent { exponent: f64 },

    #[error("Could not run benchmark binary {binary}: {source}")]
    SpawnFailed {
        binary: PathBuf,
        source: std::io::Error,
    },

    #[error("Benchmark {binary} failed for n={size} ({status})")]
    BenchmarkExecution {
        binary: PathBuf,
        size: u64,
        status: String,
        stdout: String,
        stderr: String,
    },

    #[error("Malformed benchmark output {line:?}: {detail}")]
    MalformedOutput { line: String, detail: String },

    #[error("Failed to write results to {path}: {source}")]
    OutputWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to read results from {path}: {detail}")]
    OutputRead { path: PathBuf, detail: String },

    #[error("Failed to render charts to {path}: {detail}")]
    ChartRender { path: PathBuf, detail: String },

    #[error("Failed to read config file {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid config file {path}: {detail}")]
    ConfigParse { path: PathBuf, detail: String },
}
