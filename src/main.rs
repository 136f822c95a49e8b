use clap::Parser;
use linkedin_harvest::config::Config;
use linkedin_harvest::error::Result;
use linkedin_harvest::export::export_rows;
use linkedin_harvest::harvest::Harvester;
use linkedin_harvest::logging::{init_logging, LoggerConfig};
use linkedin_harvest::search::SearchSource;
use linkedin_harvest::{log_error, log_info};
use std::process::ExitCode;

/// Harvest LinkedIn posts, profiles and jobs matching keywords into a CSV file.
#[derive(Debug, Parser)]
#[command(name = "linkedin-harvest", version)]
struct Cli {
    /// Keywords to search
    #[arg(long, num_args = 1.., required = true)]
    keywords: Vec<String>,

    /// Results to collect per keyword
    #[arg(long)]
    per_keyword: Option<usize>,

    /// Result pages to walk per keyword
    #[arg(long)]
    max_pages: Option<usize>,

    /// Path to cookies.json
    #[arg(long)]
    cookies: Option<String>,

    /// Output file (.csv or .json)
    #[arg(long)]
    out: Option<String>,

    /// Where links come from: bing or jobs
    #[arg(long)]
    source: Option<SearchSource>,

    /// Keep only rows containing any of these terms
    #[arg(long, num_args = 1..)]
    include: Vec<String>,

    /// Drop rows containing any of these terms
    #[arg(long, num_args = 1..)]
    exclude: Vec<String>,

    #[arg(long, default_value = "config.toml")]
    config: String,
}

impl Cli {
    fn apply(self, mut config: Config) -> Result<(Config, Vec<String>)> {
        if let Some(per_keyword) = self.per_keyword {
            config.per_keyword = per_keyword;
        }
        if let Some(max_pages) = self.max_pages {
            config.max_pages = max_pages;
        }
        if let Some(cookies) = self.cookies {
            config.cookies = cookies;
        }
        if let Some(out) = self.out {
            config.output = out;
        }
        if let Some(source) = self.source {
            config.source = source;
        }
        if !self.include.is_empty() {
            config.include = self.include;
        }
        if !self.exclude.is_empty() {
            config.exclude = self.exclude;
        }
        config.validate()?;
        Ok((config, self.keywords))
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = Config::load_or_default(&cli.config)?;
    let (config, keywords) = cli.apply(config)?;

    init_logging(LoggerConfig::from_config(&config.logging)?)?;
    log_info!(
        "[main] Starting harvest of {} keywords via {}",
        keywords.len(),
        config.source
    );

    let harvester = Harvester::from_config(&config)?;
    let rows = harvester.run(&keywords).await?;

    export_rows(&rows, &config.output)?;
    println!("Saved {} rows -> {}", rows.len(), config.output);
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log_error!(e => "[main] Harvest failed");
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
