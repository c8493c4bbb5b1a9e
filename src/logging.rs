use anyhow::{Result, anyhow};
use tracing_subscriber::{EnvFilter, fmt};

/// Environment variable holding a full `EnvFilter` directive, e.g. `simdbench=trace`.
pub const LOG_ENV: &str = "SIMDBENCH_LOG";

/// Filter used when `SIMDBENCH_LOG` is unset, by number of `-v` flags.
pub fn default_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "warn,simdbench=debug",
        _ => "warn,simdbench=trace",
    }
}

/// Install the stderr log subscriber. Call once, before any work starts.
pub fn init_logging(verbosity: u8) -> Result<()> {
    let filter = match std::env::var(LOG_ENV) {
        Ok(directive) => EnvFilter::try_new(&directive)
            .map_err(|e| anyhow!("Invalid {} value {:?}: {}", LOG_ENV, directive, e))?,
        Err(_) => EnvFilter::new(default_directive(verbosity)),
    };

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow!("Logging already initialized: {}", e))
}
