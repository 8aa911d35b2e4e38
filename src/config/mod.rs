use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result, ensure};
use clap::Parser;
use dotenvy::dotenv;
use serde::Deserialize;

use crate::router::Route;

const DEFAULT_API_BASE_URL: &str = "https://llmproject-c6n4.onrender.com/api/v1";

/// Configuration for the application
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Root of the remote API, without a trailing slash
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    /// Credential sent in the `token` header
    #[serde(default)]
    pub api_token: Option<String>,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// How long a success banner stays up
    #[serde(default = "default_success_message_secs")]
    pub success_message_secs: u64,
    #[serde(default = "default_log_file")]
    pub log_file: PathBuf,
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_success_message_secs() -> u64 {
    3
}

fn default_log_file() -> PathBuf {
    PathBuf::from("dashboard.log")
}

/// Command line flags. Anything given here overrides the environment.
#[derive(Debug, Parser)]
#[command(name = "project-dashboard", version, about = "Terminal dashboard for projects and tasks")]
pub struct Cli {
    /// Root of the remote API
    #[arg(long, value_name = "URL")]
    pub base_url: Option<String>,

    /// API token (defaults to API_TOKEN)
    #[arg(long, value_name = "TOKEN")]
    pub token: Option<String>,

    /// Screen to open: /dashboard, /projects or /tasks
    #[arg(long, default_value = "/dashboard")]
    pub route: Route,

    /// Where to write logs; the terminal belongs to the UI
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// This function will:
    /// 1. Load variables from .env file if it exists
    /// 2. Deserialize environment variables into Config struct
    pub fn load() -> Result<Self> {
        dotenv().ok();

        let config = envy::from_env::<Config>().context("reading configuration from environment")?;
        config.validated()
    }

    /// Same as [`Config::load`] but from explicit key/value pairs.
    pub fn from_pairs<I>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let config = envy::from_iter::<_, Config>(pairs).context("reading configuration")?;
        config.validated()
    }

    pub fn with_cli(mut self, cli: &Cli) -> Result<Self> {
        if let Some(base_url) = &cli.base_url {
            self.api_base_url = base_url.clone();
        }
        if let Some(token) = &cli.token {
            self.api_token = Some(token.clone());
        }
        if let Some(log_file) = &cli.log_file {
            self.log_file = log_file.clone();
        }
        self.validated()
    }

    fn validated(mut self) -> Result<Self> {
        self.api_base_url = self.api_base_url.trim().trim_end_matches('/').to_string();
        ensure!(!self.api_base_url.is_empty(), "API_BASE_URL must not be empty");
        ensure!(self.request_timeout_secs > 0, "REQUEST_TIMEOUT_SECS must be positive");
        Ok(self)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn success_ttl(&self) -> Duration {
        Duration::from_secs(self.success_message_secs)
    }
}

/// Initialize environment variables and load configuration
pub fn init(cli: &Cli) -> Result<Config> {
    Config::load()?.with_cli(cli)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
        items.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn defaults_apply_when_environment_is_empty() {
        let config = Config::from_pairs(Vec::new()).unwrap();
        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
        assert_eq!(config.api_token, None);
        assert_eq!(config.success_ttl(), Duration::from_secs(3));
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn environment_values_are_read_and_normalized() {
        let config = Config::from_pairs(pairs(&[
            ("API_BASE_URL", "http://localhost:4000/api/v1/"),
            ("API_TOKEN", "abc"),
            ("REQUEST_TIMEOUT_SECS", "5"),
        ]))
        .unwrap();

        assert_eq!(config.api_base_url, "http://localhost:4000/api/v1");
        assert_eq!(config.api_token.as_deref(), Some("abc"));
        assert_eq!(config.request_timeout(), Duration::from_secs(5));
    }

    #[test]
    fn rejects_bad_values() {
        assert!(Config::from_pairs(pairs(&[("REQUEST_TIMEOUT_SECS", "soon")])).is_err());
        assert!(Config::from_pairs(pairs(&[("REQUEST_TIMEOUT_SECS", "0")])).is_err());
        assert!(Config::from_pairs(pairs(&[("API_BASE_URL", " / ")])).is_err());
    }

    #[test]
    fn cli_flags_override_environment() {
        let cli = Cli::parse_from([
            "project-dashboard",
            "--base-url",
            "http://127.0.0.1:9/api",
            "--token",
            "from-cli",
            "--route",
            "/tasks",
        ]);
        let config = Config::from_pairs(pairs(&[("API_TOKEN", "from-env")]))
            .unwrap()
            .with_cli(&cli)
            .unwrap();

        assert_eq!(config.api_base_url, "http://127.0.0.1:9/api");
        assert_eq!(config.api_token.as_deref(), Some("from-cli"));
        assert_eq!(cli.route, Route::Tasks);
    }
}
