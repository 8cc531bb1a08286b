//! Configuration loading from disk.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::schema::FrontendConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("{}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<FrontendConfig, ConfigError> {
    let content = read(path)?;
    let mut config: FrontendConfig = toml::from_str(&content)?;

    // An inline certificate takes precedence over a certificate file.
    if config.frontend.certificate.is_none() {
        if let Some(cert_path) = config.frontend.certificate_path.clone() {
            let cert_path = resolve_relative(path, Path::new(&cert_path));
            config.frontend.certificate = Some(read(&cert_path)?.trim_end().to_string());
        }
    }

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

fn read(path: &Path) -> Result<String, ConfigError> {
    fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Relative certificate paths are resolved against the config file's directory.
fn resolve_relative(config_path: &Path, target: &Path) -> PathBuf {
    if target.is_absolute() {
        return target.to_path_buf();
    }
    config_path
        .parent()
        .map(|dir| dir.join(target))
        .unwrap_or_else(|| target.to_path_buf())
}
