// ABOUTME: Endpoint and API key discovery with precedence chain
// ABOUTME: CLI flag → environment → config.json → default endpoint

use crate::api::DEFAULT_ENDPOINT;
use crate::storage::write_atomic;
use crate::{Error, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub const ENV_ENDPOINT: &str = "MATAROA_ENDPOINT";
pub const ENV_KEY: &str = "MATAROA_KEY";

const PLACEHOLDER_KEY: &str = "your-api-key-here";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub endpoint: String,
    pub key: String,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    endpoint: String,
    #[serde(default)]
    key: String,
}

/// Values given on the command line; they win over everything else.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub endpoint: Option<String>,
    pub key: Option<String>,
}

pub fn default_config_path() -> Result<PathBuf> {
    ProjectDirs::from("", "", "mata")
        .map(|dirs| dirs.config_dir().join("config.json"))
        .ok_or_else(|| Error::Config("Could not determine config directory".into()))
}

pub fn resolve_config(overrides: Overrides, path: &Path) -> Result<Config> {
    resolve_config_with(overrides, path, |name| env::var(name).ok())
}

fn resolve_config_with<F>(overrides: Overrides, path: &Path, lookup_env: F) -> Result<Config>
where
    F: Fn(&str) -> Option<String>,
{
    let file = read_config_file(path)?.unwrap_or_default();
    let env_value = |name: &str| lookup_env(name).filter(|v| !v.is_empty());
    let non_empty = |v: String| Some(v).filter(|v| !v.is_empty());

    let endpoint = overrides
        .endpoint
        .and_then(non_empty)
        .or_else(|| env_value(ENV_ENDPOINT))
        .or_else(|| non_empty(file.endpoint))
        .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());

    let key = overrides
        .key
        .and_then(non_empty)
        .or_else(|| env_value(ENV_KEY))
        .or_else(|| non_empty(file.key))
        .ok_or_else(|| {
            Error::Config(format!(
                "'key' cannot be empty. Provide via --key, {} env var, or '{}'",
                ENV_KEY,
                path.display()
            ))
        })?;

    Ok(Config { endpoint, key })
}

fn read_config_file(path: &Path) -> Result<Option<ConfigFile>> {
    if !path.exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(path)?;
    let file = serde_json::from_str(&content).map_err(|e| {
        Error::Config(format!("error reading config file '{}': {}", path.display(), e))
    })?;
    Ok(Some(file))
}

/// Writes a starter config file. Refuses to overwrite an existing one.
pub fn init_config(path: &Path) -> Result<()> {
    if path.exists() {
        return Err(Error::Config(format!(
            "'{}' already exists",
            path.display()
        )));
    }

    let body = serde_json::to_string_pretty(&ConfigFile {
        endpoint: DEFAULT_ENDPOINT.into(),
        key: PLACEHOLDER_KEY.into(),
    })?;

    write_atomic(path, body.as_bytes())
}
