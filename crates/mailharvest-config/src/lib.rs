use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use mailharvest_core::{CellRef, CoreError, SourceRange};
use serde::Deserialize;
use thiserror::Error;

const APP_DIR: &str = "mailharvest";
const CONFIG_FILENAME: &str = "config.toml";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub credentials: PathBuf,
    pub workbook: String,
    pub sources: Vec<SourceRange>,
    pub destination: Destination,
}

#[derive(Debug, Clone)]
pub struct Destination {
    pub sheet: String,
    pub anchor: CellRef,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing home directory")]
    MissingHomeDir,
    #[error("invalid config path: {0}")]
    InvalidConfigPath(PathBuf),
    #[error("config file not found: {0}")]
    MissingConfigFile(PathBuf),
    #[error("config file permissions too permissive: {0}")]
    InsecurePermissions(PathBuf),
    #[error("missing required config key: {0}")]
    MissingKey(&'static str),
    #[error("sources must contain at least one \"sheet,column,row\" entry")]
    EmptySources,
    #[error("invalid {key}: {source}")]
    InvalidSourceRange {
        key: String,
        #[source]
        source: CoreError,
    },
    #[error("invalid destination.anchor {value:?}: {source}")]
    InvalidAnchor {
        value: String,
        #[source]
        source: CoreError,
    },
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    credentials: Option<PathBuf>,
    workbook: Option<String>,
    sources: Option<Vec<String>>,
    destination: Option<DestinationFile>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct DestinationFile {
    sheet: Option<String>,
    anchor: Option<String>,
}

/// Loads the config from the given path, or from
/// `$XDG_CONFIG_HOME/mailharvest/config.toml` when none is given. Unlike
/// tools that can run on defaults, every run needs a workbook and at
/// least one source, so the file is always required.
pub fn load(config_path: Option<PathBuf>) -> Result<AppConfig> {
    let path = resolve_config_path(config_path)?;
    load_at_path(&path)
}

pub fn resolve_config_path(custom: Option<PathBuf>) -> Result<PathBuf> {
    match custom {
        Some(path) => {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::InvalidConfigPath(path));
            }
            Ok(path)
        }
        None => {
            let base = if let Some(dir) = env::var_os("XDG_CONFIG_HOME") {
                let path = PathBuf::from(dir);
                if path.as_os_str().is_empty() {
                    return Err(ConfigError::InvalidConfigPath(path));
                }
                path
            } else {
                let home = dirs::home_dir().ok_or(ConfigError::MissingHomeDir)?;
                home.join(".config")
            };
            Ok(base.join(APP_DIR).join(CONFIG_FILENAME))
        }
    }
}

fn load_at_path(path: &Path) -> Result<AppConfig> {
    if !path.exists() {
        return Err(ConfigError::MissingConfigFile(path.to_path_buf()));
    }

    ensure_permissions(path)?;
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let parsed: ConfigFile = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    validate_config(parsed)
}

/// All validation happens here, before any network call: every missing or
/// malformed key fails with a message naming it.
fn validate_config(parsed: ConfigFile) -> Result<AppConfig> {
    let credentials = parsed
        .credentials
        .ok_or(ConfigError::MissingKey("credentials"))?;
    let workbook = parsed.workbook.ok_or(ConfigError::MissingKey("workbook"))?;
    let raw_sources = parsed.sources.ok_or(ConfigError::MissingKey("sources"))?;
    if raw_sources.is_empty() {
        return Err(ConfigError::EmptySources);
    }

    let mut sources = Vec::with_capacity(raw_sources.len());
    for (index, raw) in raw_sources.iter().enumerate() {
        let range =
            SourceRange::parse(raw).map_err(|source| ConfigError::InvalidSourceRange {
                key: format!("sources[{index}]"),
                source,
            })?;
        sources.push(range);
    }

    let destination = parsed
        .destination
        .ok_or(ConfigError::MissingKey("destination"))?;
    let sheet = destination
        .sheet
        .ok_or(ConfigError::MissingKey("destination.sheet"))?;
    let raw_anchor = destination
        .anchor
        .ok_or(ConfigError::MissingKey("destination.anchor"))?;
    let anchor = CellRef::parse(&raw_anchor).map_err(|source| ConfigError::InvalidAnchor {
        value: raw_anchor.clone(),
        source,
    })?;

    Ok(AppConfig {
        credentials,
        workbook,
        sources,
        destination: Destination { sheet, anchor },
    })
}

#[cfg(unix)]
fn ensure_permissions(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let metadata = fs::metadata(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let mode = metadata.permissions().mode();
    if mode & 0o077 != 0 {
        return Err(ConfigError::InsecurePermissions(path.to_path_buf()));
    }
    Ok(())
}

#[cfg(not(unix))]
fn ensure_permissions(_path: &Path) -> Result<()> {
    Ok(())
}
