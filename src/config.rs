//! Console configuration.
//!
//! ```text
//! keyfetch [BASE_URL] [API_VERSION]
//! ```
//!
//! Both arguments are optional. The log file location can be moved with the
//! `KEYFETCH_LOG` environment variable.

use std::ffi::OsString;
use std::path::PathBuf;

use anyhow::{ensure, Context, Result};

use crate::provider::{is_valid_api_version, MIN_API_VERSION_LEN};

pub const DEFAULT_BASE_URL: &str = "http://localhost:4242/";
pub const DEFAULT_API_VERSION: &str = "2017-06-05";

/// Environment variable overriding the log file path.
pub const LOG_PATH_ENV: &str = "KEYFETCH_LOG";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Backend root; keys are requested from `<base_url>/ephemeral_keys`.
    pub base_url: String,
    /// Sent as `api_version` with every request.
    pub api_version: String,
    pub log_path: PathBuf,
}

impl Config {
    /// Read configuration from the process arguments and environment.
    pub fn from_env() -> Result<Self> {
        Self::parse(std::env::args().skip(1), std::env::var_os(LOG_PATH_ENV))
    }

    /// Build a configuration from positional arguments (program name already
    /// stripped) and an optional log path override.
    pub fn parse(
        args: impl IntoIterator<Item = String>,
        log_path: Option<OsString>,
    ) -> Result<Self> {
        let mut args = args.into_iter();
        let base_url = args.next().unwrap_or_else(|| DEFAULT_BASE_URL.into());
        let api_version = args.next().unwrap_or_else(|| DEFAULT_API_VERSION.into());

        reqwest::Url::parse(&base_url)
            .with_context(|| format!("invalid backend URL `{base_url}`"))?;
        ensure!(
            is_valid_api_version(&api_version),
            "API version `{api_version}` is too short (need at least {MIN_API_VERSION_LEN} characters)"
        );

        let log_path = log_path
            .map(PathBuf::from)
            .unwrap_or_else(|| std::env::temp_dir().join("keyfetch.log"));

        Ok(Self {
            base_url,
            api_version,
            log_path,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn defaults_when_no_arguments() {
        let cfg = Config::parse(args(&[]), None).unwrap();
        assert_eq!(cfg.base_url, DEFAULT_BASE_URL);
        assert_eq!(cfg.api_version, DEFAULT_API_VERSION);
        assert_eq!(cfg.log_path, std::env::temp_dir().join("keyfetch.log"));
    }

    #[test]
    fn positional_arguments_override_defaults() {
        let cfg = Config::parse(args(&["https://keys.example.com/v1", "2020-08-27"]), None).unwrap();
        assert_eq!(cfg.base_url, "https://keys.example.com/v1");
        assert_eq!(cfg.api_version, "2020-08-27");
    }

    #[test]
    fn log_path_override_is_used() {
        let cfg = Config::parse(args(&[]), Some(OsString::from("/var/log/keyfetch.log"))).unwrap();
        assert_eq!(cfg.log_path, PathBuf::from("/var/log/keyfetch.log"));
    }

    #[test]
    fn short_api_version_is_rejected() {
        let err = Config::parse(args(&["http://localhost:4242", "v1"]), None).unwrap_err();
        assert!(err.to_string().contains("too short"), "{err}");
    }

    #[test]
    fn malformed_url_is_rejected() {
        let err = Config::parse(args(&["localhost without scheme"]), None).unwrap_err();
        assert!(err.to_string().contains("invalid backend URL"), "{err}");
    }
}
