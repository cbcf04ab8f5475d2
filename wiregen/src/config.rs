//! Optional `wiregen.toml` project configuration.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use eyre::{Context, Result};
use serde::Deserialize;

/// Settings loaded from `wiregen.toml`.
///
/// Every field is optional. Command line flags win over file values,
/// and anything left unset falls back to the built-in defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// The `[generate]` table.
    #[serde(default)]
    pub generate: GenerateConfig,
}

/// The `[generate]` table of `wiregen.toml`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GenerateConfig {
    /// Directory searched for schema files.
    pub src: Option<PathBuf>,
    /// Directory generated code is written to.
    pub out: Option<PathBuf>,
    /// Module the generated tree is mounted under in import paths.
    pub module: Option<String>,
    /// Process schema files sequentially instead of fanning out.
    pub no_fork: Option<bool>,
}

impl Config {
    /// Load configuration from `path`, falling back to defaults when
    /// the file does not exist.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .wrap_err_with(|| format!("failed to read {}", path.display()))?;
        content
            .parse()
            .wrap_err_with(|| format!("invalid config in {}", path.display()))
    }
}

impl FromStr for Config {
    type Err = eyre::Report;

    fn from_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let config: Config = r#"
            [generate]
            src = "schemas"
            out = "src/generated"
            module = "wire"
            no_fork = true
        "#
        .parse()
        .unwrap();

        assert_eq!(config.generate.src, Some(PathBuf::from("schemas")));
        assert_eq!(config.generate.out, Some(PathBuf::from("src/generated")));
        assert_eq!(config.generate.module.as_deref(), Some("wire"));
        assert_eq!(config.generate.no_fork, Some(true));
    }

    #[test]
    fn test_empty_config_is_all_defaults() {
        let config: Config = "".parse().unwrap();

        assert!(config.generate.src.is_none());
        assert!(config.generate.out.is_none());
        assert!(config.generate.module.is_none());
        assert!(config.generate.no_fork.is_none());
    }

    #[test]
    fn test_partial_generate_table() {
        let config: Config = "[generate]\nmodule = \"api\"\n".parse().unwrap();

        assert_eq!(config.generate.module.as_deref(), Some("api"));
        assert!(config.generate.src.is_none());
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let result: Result<Config> = "[generate]\nmodul = \"api\"\n".parse();

        assert!(result.is_err());
    }

    #[test]
    fn test_missing_file_loads_defaults() {
        let config = Config::load(Path::new("does-not-exist/wiregen.toml")).unwrap();

        assert!(config.generate.src.is_none());
    }
}
