use crate::error::{ConfigError, Result};
use crate::search::SearchSource;
use serde::Deserialize;
use std::path::Path;
use tracing::info;

#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_directory")]
    pub directory: String,
    #[serde(default = "default_log_filename")]
    pub filename: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    #[serde(default = "default_bing_base_url")]
    pub bing_base_url: String,
    #[serde(default = "default_jobs_base_url")]
    pub jobs_base_url: String,
    /// Optional location for the jobs listing, e.g. "Berlin".
    #[serde(default)]
    pub location: String,
    #[serde(default = "default_request_timeout")]
    pub request_timeout: u64,
    #[serde(default = "default_retry_attempts")]
    pub retry_attempts: u32,
    #[serde(default = "default_retry_min_wait")]
    pub retry_min_wait: u64,
    #[serde(default = "default_retry_max_wait")]
    pub retry_max_wait: u64,
    /// Pause between search or listing pages.
    #[serde(default = "default_pause_min_ms")]
    pub pause_min_ms: u64,
    #[serde(default = "default_pause_max_ms")]
    pub pause_max_ms: u64,
    /// Pause between fetching individual result pages.
    #[serde(default = "default_fetch_pause_min_ms")]
    pub fetch_pause_min_ms: u64,
    #[serde(default = "default_fetch_pause_max_ms")]
    pub fetch_pause_max_ms: u64,
    #[serde(default)]
    pub proxy: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub source: SearchSource,

    #[serde(default = "default_per_keyword")]
    pub per_keyword: usize,

    #[serde(default = "default_max_pages")]
    pub max_pages: usize,

    #[serde(default = "default_output")]
    pub output: String,

    /// Path to a cookies.json file. Empty means an anonymous session.
    #[serde(default)]
    pub cookies: String,

    #[serde(default)]
    pub include: Vec<String>,

    #[serde(default)]
    pub exclude: Vec<String>,

    #[serde(default)]
    pub http: HttpConfig,

    #[serde(default)]
    pub logging: LogConfig,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            bing_base_url: default_bing_base_url(),
            jobs_base_url: default_jobs_base_url(),
            location: String::new(),
            request_timeout: default_request_timeout(),
            retry_attempts: default_retry_attempts(),
            retry_min_wait: default_retry_min_wait(),
            retry_max_wait: default_retry_max_wait(),
            pause_min_ms: default_pause_min_ms(),
            pause_max_ms: default_pause_max_ms(),
            fetch_pause_min_ms: default_fetch_pause_min_ms(),
            fetch_pause_max_ms: default_fetch_pause_max_ms(),
            proxy: String::new(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            directory: default_log_directory(),
            filename: default_log_filename(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source: SearchSource::default(),
            per_keyword: default_per_keyword(),
            max_pages: default_max_pages(),
            output: default_output(),
            cookies: String::new(),
            include: Vec::new(),
            exclude: Vec::new(),
            http: HttpConfig::default(),
            logging: LogConfig::default(),
        }
    }
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::FileRead)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content).map_err(ConfigError::Parse)?;

        config.validate()?;
        info!("Configuration loaded successfully");
        Ok(config)
    }

    /// Loads `path` when it exists, otherwise falls back to defaults.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn validate(&self) -> Result<()> {
        for (name, url) in [
            ("http.bing_base_url", &self.http.bing_base_url),
            ("http.jobs_base_url", &self.http.jobs_base_url),
        ] {
            if url.is_empty() {
                return Err(ConfigError::MissingField(name.to_string()).into());
            }
            if !url.starts_with("http") {
                return Err(ConfigError::InvalidValue(format!(
                    "{} must start with http(s): {}",
                    name, url
                ))
                .into());
            }
        }

        if !self.cookies.is_empty() && !Path::new(&self.cookies).exists() {
            // Missing cookies degrade to an anonymous session at harvest time
            tracing::warn!("cookie file does not exist: {}", self.cookies);
        }

        if self.per_keyword == 0 {
            return Err(ConfigError::InvalidValue(
                "per_keyword must be greater than 0".to_string(),
            )
            .into());
        }

        if self.max_pages == 0 {
            return Err(
                ConfigError::InvalidValue("max_pages must be greater than 0".to_string()).into(),
            );
        }

        if self.output.is_empty() {
            return Err(ConfigError::InvalidValue("output cannot be empty".to_string()).into());
        }

        if self.http.request_timeout == 0 {
            return Err(ConfigError::InvalidValue(
                "http.request_timeout must be greater than 0".to_string(),
            )
            .into());
        }

        if self.http.retry_attempts == 0 {
            return Err(ConfigError::InvalidValue(
                "http.retry_attempts must be greater than 0".to_string(),
            )
            .into());
        }

        if self.http.retry_min_wait > self.http.retry_max_wait {
            return Err(ConfigError::InvalidValue(format!(
                "http.retry_min_wait ({}) exceeds http.retry_max_wait ({})",
                self.http.retry_min_wait, self.http.retry_max_wait
            ))
            .into());
        }

        if self.http.pause_min_ms > self.http.pause_max_ms {
            return Err(ConfigError::InvalidValue(format!(
                "http.pause_min_ms ({}) exceeds http.pause_max_ms ({})",
                self.http.pause_min_ms, self.http.pause_max_ms
            ))
            .into());
        }

        if self.http.fetch_pause_min_ms > self.http.fetch_pause_max_ms {
            return Err(ConfigError::InvalidValue(format!(
                "http.fetch_pause_min_ms ({}) exceeds http.fetch_pause_max_ms ({})",
                self.http.fetch_pause_min_ms, self.http.fetch_pause_max_ms
            ))
            .into());
        }

        Ok(())
    }
}

fn default_bing_base_url() -> String {
    "https://www.bing.com".to_string()
}

fn default_jobs_base_url() -> String {
    "https://www.linkedin.com".to_string()
}

fn default_request_timeout() -> u64 {
    15
}

fn default_retry_attempts() -> u32 {
    3
}

fn default_retry_min_wait() -> u64 {
    1
}

fn default_retry_max_wait() -> u64 {
    6
}

fn default_pause_min_ms() -> u64 {
    700
}

fn default_pause_max_ms() -> u64 {
    1700
}

fn default_fetch_pause_min_ms() -> u64 {
    300
}

fn default_fetch_pause_max_ms() -> u64 {
    1000
}

fn default_per_keyword() -> usize {
    10
}

fn default_max_pages() -> usize {
    5
}

fn default_output() -> String {
    "results.csv".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_directory() -> String {
    "logs".to_string()
}

fn default_log_filename() -> String {
    "harvest.log".to_string()
}
