//! Client configuration.
//!
//! Configuration lives in a YAML file and covers:
//! - The service base URL and optional bearer token
//! - Refresh pacing and request timeout
//! - The status/priority vocabularies and intake form sections
//! - An optional stats snapshot to paint before the first round trip
//!
//! Resolution order for the file itself: explicit `--config` path, then
//! `$DESKVIEW_CONFIG`, then the platform config directory. A missing file at
//! the default location yields the built-in defaults.

use std::env;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{DeskError, Result};
use crate::form::{IntakeSections, default_intake_sections};
use crate::types::StatsSnapshot;
use crate::vocab::Vocabulary;

pub const CONFIG_ENV: &str = "DESKVIEW_CONFIG";
pub const URL_ENV: &str = "DESKVIEW_URL";
pub const TOKEN_ENV: &str = "DESKVIEW_TOKEN";

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeskConfig {
    /// Service base URL (e.g. `https://desk.example.com/`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// Authentication for the service
    #[serde(default)]
    pub auth: AuthConfig,

    /// Background refresh period in seconds (default: 30)
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval: u64,

    /// HTTP request timeout in seconds (default: 30)
    #[serde(default = "default_request_timeout")]
    pub request_timeout: u64,

    /// Recognized ticket statuses, in board/display order
    #[serde(default = "Vocabulary::default_statuses")]
    pub statuses: Vocabulary,

    /// Recognized ticket priorities
    #[serde(default = "Vocabulary::default_priorities")]
    pub priorities: Vocabulary,

    /// Intake form sections, keyed by issue type
    #[serde(default = "default_intake_sections")]
    pub intake: IntakeSections,

    /// Stats to render before the first fetch completes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_stats: Option<StatsSnapshot>,
}

fn default_refresh_interval() -> u64 {
    30
}

fn default_request_timeout() -> u64 {
    30
}

impl Default for DeskConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            auth: AuthConfig::default(),
            refresh_interval: default_refresh_interval(),
            request_timeout: default_request_timeout(),
            statuses: Vocabulary::default_statuses(),
            priorities: Vocabulary::default_priorities(),
            intake: default_intake_sections(),
            initial_stats: None,
        }
    }
}

/// Authentication configuration.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct AuthConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl DeskConfig {
    /// Load configuration, falling back to defaults when no file exists at
    /// the default location. An explicitly named file must exist and parse.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match resolve_config_path(explicit) {
            Some((path, required)) => Self::load_file(&path, required),
            None => Ok(Self::default()),
        }
    }

    fn load_file(path: &Path, required: bool) -> Result<Self> {
        match fs::read_to_string(path) {
            Ok(raw) => {
                let config: DeskConfig = serde_yaml_ng::from_str(&raw)?;
                Ok(config)
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound && !required => {
                Ok(Self::default())
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Err(DeskError::Config(
                format!("config file not found: {}", path.display()),
            )),
            Err(err) => Err(err.into()),
        }
    }

    /// Resolve the service base URL: CLI flag, then `$DESKVIEW_URL`, then the
    /// config file. Normalized with a trailing slash so endpoint joins work.
    pub fn resolved_base_url(&self, cli: Option<&str>) -> Result<Url> {
        let raw = cli
            .map(str::to_string)
            .or_else(|| env::var(URL_ENV).ok())
            .or_else(|| self.base_url.clone())
            .ok_or_else(|| {
                DeskError::Config(
                    "no service URL configured (set base_url, $DESKVIEW_URL, or pass --url)"
                        .to_string(),
                )
            })?;
        let normalized = if raw.ends_with('/') {
            raw
        } else {
            format!("{}/", raw)
        };
        Ok(Url::parse(&normalized)?)
    }

    /// Resolve the bearer token, if any: `$DESKVIEW_TOKEN` wins over the file.
    pub fn resolved_token(&self) -> Option<SecretString> {
        env::var(TOKEN_ENV)
            .ok()
            .or_else(|| self.auth.token.clone())
            .map(SecretString::from)
    }

    pub fn refresh_period(&self) -> Duration {
        Duration::from_secs(self.refresh_interval.max(1))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout.max(1))
    }
}

/// Returns the config path to try plus whether it must exist.
fn resolve_config_path(explicit: Option<&Path>) -> Option<(PathBuf, bool)> {
    if let Some(path) = explicit {
        return Some((path.to_path_buf(), true));
    }
    if let Ok(path) = env::var(CONFIG_ENV) {
        return Some((PathBuf::from(path), true));
    }
    directories::ProjectDirs::from("", "", "deskview")
        .map(|dirs| (dirs.config_dir().join("config.yaml"), false))
}
