use serde::Deserialize;
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use url::Url;

use crate::models::types::CompletionParams;

pub const DEFAULT_CONFIG_PATH: &str = "config.yaml";
pub const DEFAULT_SECRET_KEY: &str = "SimpleSecretKey";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("config file {} does not exist", .0.display())]
    NotFound(PathBuf),

    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("missing OpenAI API key: set OPENAI_API_KEY in the environment")]
    MissingApiKey,

    #[error("llm.base_url {0:?} is not an absolute http(s) URL")]
    InvalidBaseUrl(String),

    #[error("llm.temperature {0} is outside 0.0..=2.0")]
    InvalidTemperature(f32),

    #[error("llm.max_tokens must be greater than zero")]
    InvalidMaxTokens,

    #[error("server.bind_addr {0:?} is not a socket address")]
    InvalidBindAddr(String),
}

/// Raw configuration as read from YAML; every section is optional.
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub llm: LlmConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: String,
    pub secret_key: String,             // kept for parity with session signing; unused by routes
    pub static_dir: Option<PathBuf>,    // serve /static from disk instead of built-in assets
    pub shutdown_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:5000".to_string(),
            secret_key: DEFAULT_SECRET_KEY.to_string(),
            static_dir: None,
            shutdown_timeout_secs: 5,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LlmConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub request_timeout_secs: Option<u64>,
    pub log_prompt_preview_chars: usize, // how many chars of a message to log
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-3.5-turbo".to_string(),
            temperature: 0.7,
            max_tokens: 200,
            request_timeout_secs: None,
            log_prompt_preview_chars: 200,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub dir: Option<PathBuf>, // daily-rotated log files when set
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_string(), dir: None }
    }
}

pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig, SettingsError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|source| SettingsError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let cfg: AppConfig = serde_yaml::from_str(&content)?;
    Ok(cfg)
}

impl AppConfig {
    /// Overlays environment variables on top of file values.
    /// `lookup` is `std::env::var` in production and a map in tests.
    pub fn apply_env<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("BIND_ADDR") {
            self.server.bind_addr = v;
        }
        if let Some(v) = lookup("SECRET_KEY") {
            self.server.secret_key = v;
        }
        if let Some(v) = lookup("OPENAI_API_KEY") {
            self.llm.api_key = Some(v);
        }
        if let Some(v) = lookup("OPENAI_BASE_URL") {
            self.llm.base_url = v;
        }
        if let Some(v) = lookup("OPENAI_MODEL") {
            self.llm.model = v;
        }
        if let Some(v) = lookup("RUST_LOG") {
            self.logging.level = v;
        }
        self
    }

    /// Checks every value and produces the settings the service runs with.
    pub fn validate(self) -> Result<Settings, SettingsError> {
        let api_key = self
            .llm
            .api_key
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .ok_or(SettingsError::MissingApiKey)?;

        let base_url = Url::parse(&self.llm.base_url)
            .ok()
            .filter(|u| matches!(u.scheme(), "http" | "https") && u.has_host())
            .ok_or_else(|| SettingsError::InvalidBaseUrl(self.llm.base_url.clone()))?;

        if !(0.0..=2.0).contains(&self.llm.temperature) {
            return Err(SettingsError::InvalidTemperature(self.llm.temperature));
        }
        if self.llm.max_tokens == 0 {
            return Err(SettingsError::InvalidMaxTokens);
        }

        let bind_addr: SocketAddr = self
            .server
            .bind_addr
            .parse()
            .map_err(|_| SettingsError::InvalidBindAddr(self.server.bind_addr.clone()))?;

        Ok(Settings {
            bind_addr,
            secret_key: self.server.secret_key,
            static_dir: self.server.static_dir,
            shutdown_timeout: Duration::from_secs(self.server.shutdown_timeout_secs),
            llm: LlmSettings {
                api_key,
                base_url,
                params: CompletionParams::builder()
                    .model(self.llm.model)
                    .temperature(self.llm.temperature)
                    .max_tokens(self.llm.max_tokens)
                    .build(),
                request_timeout: self.llm.request_timeout_secs.map(Duration::from_secs),
                log_preview_chars: self.llm.log_prompt_preview_chars,
            },
            logging: self.logging,
        })
    }
}

/// Validated, read-only configuration. Built once at startup and handed
/// to every component that needs it.
#[derive(Debug, Clone)]
pub struct Settings {
    pub bind_addr: SocketAddr,
    pub secret_key: String,
    pub static_dir: Option<PathBuf>,
    pub shutdown_timeout: Duration,
    pub llm: LlmSettings,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone)]
pub struct LlmSettings {
    pub api_key: String,
    pub base_url: Url,
    pub params: CompletionParams,
    pub request_timeout: Option<Duration>,
    pub log_preview_chars: usize,
}

impl LlmSettings {
    /// `{base_url}/chat/completions`, keeping any path prefix such as `/v1`.
    pub fn completions_endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url.as_str().trim_end_matches('/'))
    }
}

impl Settings {
    /// Loads settings from an optional YAML file and the environment.
    ///
    /// With `path == None` the default `config.yaml` is read only if it exists;
    /// an explicit path that does not exist is an error.
    pub fn load<F>(path: Option<&Path>, lookup: F) -> Result<Self, SettingsError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let file_cfg = match path {
            Some(p) if !p.exists() => return Err(SettingsError::NotFound(p.to_path_buf())),
            Some(p) => load_config(p)?,
            None => {
                let default = Path::new(DEFAULT_CONFIG_PATH);
                if default.exists() {
                    load_config(default)?
                } else {
                    AppConfig::default()
                }
            }
        };
        file_cfg.apply_env(lookup).validate()
    }

    /// `load` with the process environment as the override source.
    pub fn load_with_process_env(path: Option<&Path>) -> Result<Self, SettingsError> {
        Self::load(path, |key| std::env::var(key).ok())
    }

    pub fn uses_default_secret(&self) -> bool {
        self.secret_key == DEFAULT_SECRET_KEY
    }
}
