pub mod client;
pub mod config;
pub mod error;
pub mod export;
pub mod filter;
pub mod harvest;
pub mod logging;
pub mod scraper;
pub mod search;
pub mod session;
pub mod utils;

pub use config::Config;
pub use error::{AppError, Result};
pub use harvest::{Harvester, ResultRow};
