use std::io;

use anyhow::{anyhow, Context, Result};
use dotenv::dotenv;
use tracing_subscriber::EnvFilter;

use tick_price_calc::config::AppConfig;
use tick_price_calc::services::shell_service::{run_once, run_session};

fn init_logging(config: &AppConfig) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.log_level)
            .with_context(|| format!("Invalid LOG_LEVEL: {}", config.log_level))?,
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init()
        .map_err(|err| anyhow!("Failed to initialise logging: {}", err))
}

fn main() -> Result<()> {
    dotenv().ok(); // Load .env file if present
    let config = AppConfig::from_env()?;
    init_logging(&config)?;

    let args: Vec<String> = std::env::args().skip(1).collect();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    if !args.is_empty() {
        return run_once(&args.join(" "), &mut out);
    }

    let stdin = io::stdin();
    run_session(stdin.lock(), &mut out, &config)
}
