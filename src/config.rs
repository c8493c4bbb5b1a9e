use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::Deserialize;

use crate::chart::DEFAULT_CHART;
use crate::errors::SimdbenchError;
use crate::persist::DEFAULT_OUTPUT;

/// The benchmarking binary, looked up relative to the working directory.
pub const DEFAULT_BINARY: &str = "./simdbmk";

/// Config file picked up from the working directory when present.
pub const LOCAL_CONFIG: &str = "simdbench.toml";

/// Values read from a TOML config file. Every key is optional.
#[derive(Debug, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub binary: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub chart: Option<PathBuf>,
}

/// Fully resolved paths for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub binary: PathBuf,
    pub output: PathBuf,
    pub chart: PathBuf,
}

/// Path of the per-user config file, e.g. `~/.config/simdbench/config.toml`.
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("simdbench").join("config.toml"))
}

/// Load the config file that applies to this run.
///
/// An explicit path must exist. Otherwise `./simdbench.toml` wins over the
/// per-user file, and no file at all means an empty config.
pub fn load_config(explicit: Option<&Path>) -> Result<FileConfig> {
    if let Some(path) = explicit {
        return read_config(path);
    }

    let local = Path::new(LOCAL_CONFIG);
    if local.is_file() {
        return read_config(local);
    }

    if let Some(user) = user_config_path()
        && user.is_file()
    {
        return read_config(&user);
    }

    Ok(FileConfig::default())
}

fn read_config(path: &Path) -> Result<FileConfig> {
    let text = std::fs::read_to_string(path).map_err(|source| SimdbenchError::ConfigRead {
        path: path.to_path_buf(),
        source,
    })?;
    let config = parse_config(&text, path)?;
    tracing::debug!(path = %path.display(), ?config, "loaded config file");
    Ok(config)
}

pub fn parse_config(text: &str, path: &Path) -> Result<FileConfig, SimdbenchError> {
    toml::from_str(text).map_err(|e| SimdbenchError::ConfigParse {
        path: path.to_path_buf(),
        detail: e.message().to_string(),
    })
}

impl Settings {
    /// Command-line values override the config file, which overrides defaults.
    pub fn resolve(
        file: FileConfig,
        binary: Option<PathBuf>,
        output: Option<PathBuf>,
        chart: Option<PathBuf>,
    ) -> Settings {
        Settings {
            binary: binary
                .or(file.binary)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_BINARY)),
            output: output
                .or(file.output)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT)),
            chart: chart
                .or(file.chart)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_CHART)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn defaults_without_config_or_flags() {
        let settings = Settings::resolve(FileConfig::default(), None, None, None);
        assert_eq!(settings.binary, PathBuf::from("./simdbmk"));
        assert_eq!(settings.output, PathBuf::from("./results/benchmark.csv"));
        assert_eq!(settings.chart, PathBuf::from("./results/benchmark.svg"));
    }

    #[test]
    fn config_overrides_defaults() {
        let file = parse_config(
            "binary = \"/opt/bench/simdbmk\"\noutput = \"out/run.csv\"\n",
            Path::new("simdbench.toml"),
        )
        .unwrap();
        let settings = Settings::resolve(file, None, None, None);
        assert_eq!(settings.binary, PathBuf::from("/opt/bench/simdbmk"));
        assert_eq!(settings.output, PathBuf::from("out/run.csv"));
        assert_eq!(settings.chart, PathBuf::from(DEFAULT_CHART));
    }

    #[test]
    fn flags_override_config() {
        let file = FileConfig {
            binary: Some(PathBuf::from("from-config")),
            output: Some(PathBuf::from("config.csv")),
            chart: None,
        };
        let settings = Settings::resolve(
            file,
            Some(PathBuf::from("from-flag")),
            None,
            Some(PathBuf::from("flag.svg")),
        );
        assert_eq!(settings.binary, PathBuf::from("from-flag"));
        assert_eq!(settings.output, PathBuf::from("config.csv"));
        assert_eq!(settings.chart, PathBuf::from("flag.svg"));
    }

    #[test]
    fn empty_config_is_valid() {
        assert_eq!(
            parse_config("", Path::new("c.toml")).unwrap(),
            FileConfig::default()
        );
    }

    #[test]
    fn unknown_key_rejected() {
        let err = parse_config("binnary = \"x\"\n", Path::new("c.toml")).unwrap_err();
        assert!(matches!(err, SimdbenchError::ConfigParse { .. }));
        assert!(err.to_string().contains("c.toml"));
    }

    #[test]
    fn wrong_type_rejected() {
        assert!(parse_config("output = 3\n", Path::new("c.toml")).is_err());
    }

    #[test]
    fn explicit_config_is_read() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("bench.toml");
        fs::write(&path, "chart = \"charts/run.svg\"\n").unwrap();

        let file = load_config(Some(&path)).unwrap();
        assert_eq!(file.chart, Some(PathBuf::from("charts/run.svg")));
    }

    #[test]
    fn missing_explicit_config_errors() {
        let tmp = tempfile::tempdir().unwrap();
        let err = load_config(Some(&tmp.path().join("nope.toml"))).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SimdbenchError>(),
            Some(SimdbenchError::ConfigRead { .. })
        ));
    }
}
