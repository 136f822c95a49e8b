use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Client error: {0}")]
    Client(#[from] ClientError),

    #[error("Cookie error: {0}")]
    Cookie(#[from] CookieError),

    #[error("Scraping error: {0}")]
    Scraper(#[from] ScraperError),

    #[error("Harvest error: {0}")]
    Harvest(#[from] HarvestError),

    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Request error: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Missing required configuration: {0}")]
    MissingField(String),

    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
}

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Failed to build client: {0}")]
    BuildError(String),

    #[error("Response error {status_code}")]
    ResponseError { status_code: u16, url: String },

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

#[derive(Error, Debug)]
pub enum CookieError {
    #[error("Failed to read cookie file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("Failed to parse cookie file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Unsupported cookies.json format")]
    UnsupportedFormat,
}

#[derive(Error, Debug)]
pub enum ScraperError {
    #[error("Failed to parse HTML: {0}")]
    ParseError(String),

    #[error("Selector error: {0}")]
    SelectorError(String),
}

#[derive(Error, Debug)]
pub enum HarvestError {
    #[error("No keywords given")]
    NoKeywords,
}

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Failed to flush output {path}: {source}")]
    Flush {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, AppError>;
