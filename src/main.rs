use anyhow::{Context, Result};
use log::info;
use std::io;

use tesla_rent::{sqlite, Console, RentalConfig, RentalSession, RentalStore, SystemClock};

fn main() -> Result<()> {
    let config = RentalConfig::default();

    // Logs go to stderr; stdout belongs to the prompts.
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.log_level.as_str()),
    )
    .init();

    let conn = sqlite::open_database(&config.db_path)
        .with_context(|| format!("opening database {}", config.db_path.display()))?;
    let store = RentalStore::new(conn);

    let stdin = io::stdin();
    let console = Console::new(stdin.lock(), io::stdout());
    let outcome = RentalSession::new(&store, console, SystemClock)
        .run()
        .context("rental session failed")?;

    info!(
        "run finished: customer {}, rental {}",
        outcome.customer.id, outcome.rental.id
    );
    Ok(())
}
