use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use spendbook::bot::ExpenseBot;
use spendbook::cloud_adapters::google_sheets::StaticToken;
use spendbook::cloud_adapters::{GoogleSheetsAdapter, auth};
use spendbook::config::{Config, ConfigError};
use spendbook::core::LedgerBook;
use spendbook::telegram::BotClient;

#[derive(Parser)]
#[command(
    name = "spendbook",
    about = "Telegram bot keeping a spending ledger in Google Sheets"
)]
struct Cli {
    /// Path to the TOML configuration; environment variables are used when
    /// the file is absent.
    #[arg(long, default_value = "config.toml")]
    config: PathBuf,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Perform OAuth login and store credentials
    Login,
    /// Poll Telegram and serve the ledger
    Run,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let cfg = match Config::load(&cli.config) {
        Ok(cfg) => cfg,
        Err(ConfigError::MissingFile(_)) => Config::from_env()?,
        Err(e) => return Err(e.into()),
    };
    let rt = tokio::runtime::Runtime::new()?;

    match cli.command {
        Commands::Login => {
            rt.block_on(auth::initial_oauth_login(
                &cfg.google_sheets.credentials_path,
                &cfg.google_sheets.token_cache,
            ))?;
            println!("Login successful");
        }
        Commands::Run => {
            let sheets = &cfg.google_sheets;
            let adapter = match &sheets.access_token {
                Some(token) => GoogleSheetsAdapter::new(
                    StaticToken(token.clone()),
                    sheets.spreadsheet_id.clone(),
                ),
                None => {
                    let auth = rt.block_on(auth::sheets_authenticator(
                        &sheets.credentials_path,
                        &sheets.token_cache,
                    ))?;
                    GoogleSheetsAdapter::new(auth, sheets.spreadsheet_id.clone())
                }
            };
            let bot = ExpenseBot::new(
                BotClient::new(cfg.telegram.token.clone()),
                LedgerBook::new(adapter),
            );
            bot.run()?;
        }
    }

    Ok(())
}
