//! Layered application configuration.
//!
//! Priority, lowest to highest: built-in defaults, YAML config file,
//! `GETSEND_` environment variables, command-line flags.

use std::path::Path;

use clap::Parser;
use config::{Config, Environment, File};
use serde::Deserialize;

/// Config file picked up from the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "config.yaml";

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file path
    #[arg(short, long, env = "CONFIG_FILE")]
    pub config: Option<String>,

    /// Port to listen on
    #[arg(long, env = "PORT")]
    pub port: Option<u16>,

    /// Base URL of the auth backend
    #[arg(long, env = "AUTH_BASE_URL")]
    pub auth_url: Option<String>,

    /// Emit logs as JSON
    #[arg(long, env = "LOG_JSON")]
    pub log_json: Option<bool>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub auth: AuthConfig,
    pub ui: UiConfig,
    pub log: LogConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
    /// Upper bound for a single request, seconds.
    pub request_timeout_secs: u64,
    pub timeout_disabled: bool,
}

/// Where the external auth backend lives.
#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    pub base_url: String,
    /// Registration endpoint, relative to `base_url`.
    pub register_path: String,
    /// Credential callback prefix; the provider id is appended.
    pub sign_in_path: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct UiConfig {
    /// Document title and brand name.
    pub title: String,
    pub description: String,
    /// Directory served under `/static`.
    pub static_dir: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LogConfig {
    pub json: bool,
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from_args(std::env::args())
    }

    pub fn load_from_args<I, T>(args: I) -> Result<Self, config::ConfigError>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let cli =
            Cli::try_parse_from(args).map_err(|e| config::ConfigError::Message(e.to_string()))?;

        // 1. Defaults
        let mut builder = Config::builder()
            .set_default("server.port", 3000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.request_timeout_secs", 30)?
            .set_default("server.timeout_disabled", false)?
            .set_default("auth.base_url", "http://127.0.0.1:4000")?
            .set_default("auth.register_path", "/api/auth/register")?
            .set_default("auth.sign_in_path", "/api/auth/callback")?
            .set_default("ui.title", "GetSend Chat")?
            .set_default("ui.description", "GetSend lightweight chat app")?
            .set_default("ui.static_dir", "static")?
            .set_default("log.json", false)?;

        // 2. Config file: explicit path, else ./config.yaml if present
        if let Some(path) = &cli.config {
            builder = builder.add_source(File::with_name(path));
        } else if Path::new(DEFAULT_CONFIG_FILE).exists() {
            builder = builder.add_source(File::with_name(DEFAULT_CONFIG_FILE));
        }

        // 3. Environment, e.g. GETSEND_SERVER__PORT=8000
        builder = builder.add_source(
            Environment::with_prefix("GETSEND")
                .separator("__")
                .try_parsing(true),
        );

        // 4. CLI flags (clap already folded in their own env vars)
        if let Some(port) = cli.port {
            builder = builder.set_override("server.port", port)?;
        }
        if let Some(url) = cli.auth_url {
            builder = builder.set_override("auth.base_url", url)?;
        }
        if let Some(json) = cli.log_json {
            builder = builder.set_override("log.json", json)?;
        }

        builder.build()?.try_deserialize()
    }

    /// `host:port` to bind.
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
