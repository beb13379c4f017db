//! Configuration file for the `mspp` binary.
//! Default location: ~/.mspp/config.toml

use anyhow::{anyhow, Context, Result};
use mspp_algo::{SolverConfig, Variant};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Values used when a command-line flag is absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MsppConfig {
    /// Formulation used by `solve` and as the fallback for `batch`
    pub variant: Variant,
    /// Backend, time limit and verbosity
    pub solver: SolverConfig,
    pub batch: BatchConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Worker threads (0 = all CPUs)
    pub threads: usize,
}

/// Location of the per-user configuration file.
pub fn default_config_path() -> Result<PathBuf> {
    let home = dirs::home_dir().ok_or_else(|| anyhow!("unable to determine home directory"))?;
    Ok(home.join(".mspp").join("config.toml"))
}

/// Load an explicit configuration file, or the per-user one if it exists.
///
/// An explicit path must exist; a missing per-user file yields the defaults.
pub fn load_config(explicit: Option<&Path>) -> Result<MsppConfig> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => match default_config_path() {
            Ok(path) if path.exists() => path,
            _ => return Ok(MsppConfig::default()),
        },
    };
    let contents = fs::read_to_string(&path)
        .with_context(|| format!("reading config file '{}'", path.display()))?;
    parse_config(&contents).with_context(|| format!("parsing config file '{}'", path.display()))
}

pub fn parse_config(contents: &str) -> Result<MsppConfig> {
    Ok(toml::from_str(contents)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mspp_algo::SolverKind;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn empty_file_gives_defaults() {
        let config = parse_config("").unwrap();
        assert_eq!(config, MsppConfig::default());
        assert_eq!(config.variant, Variant::Mspp);
        assert_eq!(config.batch.threads, 0);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let config = parse_config(
            r#"
variant = "NBP"

[solver]
backend = "microlp"
time_limit_seconds = 30.0
"#,
        )
        .unwrap();
        assert_eq!(config.variant, Variant::Nbp);
        assert_eq!(config.solver.backend, SolverKind::Microlp);
        assert_eq!(config.solver.time_limit_seconds, Some(30.0));
        assert!(!config.solver.verbose);
    }

    #[test]
    fn explicit_path_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(load_config(Some(&missing)).is_err());
    }

    #[test]
    fn explicit_path_is_read() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[batch]\nthreads = 3").unwrap();
        let config = load_config(Some(file.path())).unwrap();
        assert_eq!(config.batch.threads, 3);
    }
}
