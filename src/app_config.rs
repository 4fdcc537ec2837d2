//! Application configuration loading for CLI defaults.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use papers_dl_core::ProviderKind;
use papers_dl_core::fetch::MAX_TIMEOUT_SECS;
use papers_dl_core::parser::validate_url;

const CONFIG_DIR_NAME: &str = "papers-dl";
const CONFIG_FILE_NAME: &str = "config.toml";

/// File configuration for papers-dl defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileConfig {
    /// Default output directory for downloads.
    pub output_dir: Option<PathBuf>,
    /// User-Agent sent with every request.
    pub user_agent: Option<String>,
    /// Lookup services in consultation order.
    pub providers: Option<Vec<ProviderKind>>,
    /// Base URL of the `SciDB` service.
    pub scidb_base_url: Option<String>,
    /// Sci-Hub mirrors, tried in order.
    pub scihub_mirrors: Option<Vec<String>>,
    /// HTTP connect timeout in seconds.
    pub connect_timeout_secs: Option<u64>,
    /// HTTP whole-request timeout in seconds.
    pub read_timeout_secs: Option<u64>,
    /// Default verbosity mode.
    pub verbosity: Option<VerbositySetting>,
}

impl FileConfig {
    /// Validates config values against runtime constraints.
    pub fn validate(&self) -> Result<()> {
        validate_timeout_secs("connect_timeout_secs", self.connect_timeout_secs)?;
        validate_timeout_secs("read_timeout_secs", self.read_timeout_secs)?;

        if let Some(providers) = &self.providers
            && providers.is_empty()
        {
            bail!("Invalid config value for `providers`: expected at least one provider");
        }
        if let Some(base_url) = &self.scidb_base_url {
            validate_url(base_url)
                .with_context(|| format!("Invalid config value for `scidb_base_url`: {base_url}"))?;
        }
        if let Some(mirrors) = &self.scihub_mirrors {
            for mirror in mirrors {
                validate_url(mirror)
                    .with_context(|| format!("Invalid config value for `scihub_mirrors`: {mirror}"))?;
            }
        }
        if let Some(user_agent) = &self.user_agent
            && user_agent.trim().is_empty()
        {
            bail!("Invalid config value for `user_agent`: must not be empty");
        }
        Ok(())
    }
}

fn validate_timeout_secs(field: &str, value: Option<u64>) -> Result<()> {
    let Some(value) = value else {
        return Ok(());
    };
    if !(1..=MAX_TIMEOUT_SECS).contains(&value) {
        bail!("Invalid config value for `{field}`: {value}. Expected range: 1..={MAX_TIMEOUT_SECS}");
    }
    Ok(())
}

/// Supported config verbosity labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerbositySetting {
    Default,
    Verbose,
    Quiet,
    Debug,
}

impl VerbositySetting {
    /// Returns the stable string label for display output.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Verbose => "verbose",
            Self::Quiet => "quiet",
            Self::Debug => "debug",
        }
    }
}

/// Loaded config metadata.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    /// Config path that was consulted, if any.
    pub path: Option<PathBuf>,
    /// Parsed file config when a config file exists and was valid.
    pub config: Option<FileConfig>,
    /// Indicates whether configuration was loaded from disk.
    pub loaded_from_file: bool,
}

/// Resolves default config path.
///
/// Priority:
/// 1. `$XDG_CONFIG_HOME/papers-dl/config.toml`
/// 2. `$HOME/.config/papers-dl/config.toml`
#[must_use]
pub fn resolve_default_config_path() -> Option<PathBuf> {
    if let Some(xdg_config_home) = env_var_non_empty_os("XDG_CONFIG_HOME") {
        return Some(
            PathBuf::from(xdg_config_home)
                .join(CONFIG_DIR_NAME)
                .join(CONFIG_FILE_NAME),
        );
    }

    let home = env_var_non_empty_os("HOME")?;
    Some(
        PathBuf::from(home)
            .join(".config")
            .join(CONFIG_DIR_NAME)
            .join(CONFIG_FILE_NAME),
    )
}

fn env_var_non_empty_os(name: &str) -> Option<std::ffi::OsString> {
    let value = env::var_os(name)?;
    if value.is_empty() { None } else { Some(value) }
}

/// Loads config from `explicit_path`, or from the default path if present.
///
/// An explicit path must exist; a missing default file is not an error.
pub fn load_config(explicit_path: Option<&Path>) -> Result<LoadedConfig> {
    if let Some(path) = explicit_path {
        let config = load_file_config(path)?;
        return Ok(LoadedConfig {
            path: Some(path.to_path_buf()),
            config: Some(config),
            loaded_from_file: true,
        });
    }

    let path = resolve_default_config_path();
    let Some(path_ref) = path.as_deref() else {
        return Ok(LoadedConfig {
            path,
            config: None,
            loaded_from_file: false,
        });
    };

    if !path_ref.exists() {
        return Ok(LoadedConfig {
            path,
            config: None,
            loaded_from_file: false,
        });
    }

    let config = load_file_config(path_ref)?;
    Ok(LoadedConfig {
        path,
        config: Some(config),
        loaded_from_file: true,
    })
}

fn load_file_config(path: &Path) -> Result<FileConfig> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file '{}'", path.display()))?;
    parse_config_str(&raw)
        .with_context(|| format!("Failed to parse config file '{}'", path.display()))
}

fn parse_config_str(raw: &str) -> Result<FileConfig> {
    let mut cfg = FileConfig::default();
    for (index, raw_line) in raw.lines().enumerate() {
        let line_no = index + 1;
        let line = strip_inline_comment(raw_line).trim();
        if line.is_empty() {
            continue;
        }
        let Some((key, value)) = line.split_once('=') else {
            bail!("Invalid config syntax on line {line_no}: expected key = value");
        };
        let key = key.trim();
        let known = apply_entry(&mut cfg, key, value.trim())
            .with_context(|| format!("Invalid `{key}` value on line {line_no}"))?;
        if !known {
            bail!("Unknown configuration key: '{key}' on line {line_no}");
        }
    }
    cfg.validate()?;
    Ok(cfg)
}

/// Stores one `key = value` pair. Returns `false` for an unknown key.
fn apply_entry(cfg: &mut FileConfig, key: &str, value: &str) -> Result<bool> {
    match key {
        "output_dir" => cfg.output_dir = Some(PathBuf::from(quoted(value)?)),
        "user_agent" => cfg.user_agent = Some(quoted(value)?),
        "providers" => {
            let providers = split_list(&quoted(value)?)
                .iter()
                .map(|name| name.parse::<ProviderKind>().map_err(anyhow::Error::msg))
                .collect::<Result<Vec<_>>>()?;
            cfg.providers = Some(providers);
        }
        "scidb_base_url" => cfg.scidb_base_url = Some(quoted(value)?),
        "scihub_mirrors" => cfg.scihub_mirrors = Some(split_list(&quoted(value)?)),
        "connect_timeout_secs" => cfg.connect_timeout_secs = Some(unsigned(value)?),
        "read_timeout_secs" => cfg.read_timeout_secs = Some(unsigned(value)?),
        "verbosity" => cfg.verbosity = Some(verbosity(&quoted(value)?)?),
        _ => return Ok(false),
    }
    Ok(true)
}

/// Cuts a `#` comment that is not inside a double-quoted string.
fn strip_inline_comment(line: &str) -> &str {
    let mut in_string = false;
    for (index, ch) in line.char_indices() {
        match ch {
            '"' => in_string = !in_string,
            '#' if !in_string => return &line[..index],
            _ => {}
        }
    }
    line
}

fn quoted(raw: &str) -> Result<String> {
    raw.strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        .map(ToString::to_string)
        .ok_or_else(|| anyhow::anyhow!("expected a double-quoted string"))
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(ToString::to_string)
        .collect()
}

fn unsigned(raw: &str) -> Result<u64> {
    raw.parse::<u64>()
        .with_context(|| format!("expected a non-negative integer, got '{raw}'"))
}

fn verbosity(value: &str) -> Result<VerbositySetting> {
    match value {
        "default" => Ok(VerbositySetting::Default),
        "verbose" => Ok(VerbositySetting::Verbose),
        "quiet" => Ok(VerbositySetting::Quiet),
        "debug" => Ok(VerbositySetting::Debug),
        other => bail!("'{other}' is not one of: default, verbose, quiet, debug"),
    }
}
