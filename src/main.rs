//! Entry point for mender, a multi-provider AI chat client with surgical
//! code patching for the terminal.
//!
//! This binary loads environment variables, parses CLI arguments via
//! [`cli`], and dispatches to the appropriate subcommand handler.

mod chat;
mod cli;
mod config;
mod constants;
mod credentials;
mod diff;
mod error;
mod message;
mod patch;
mod provider;
mod session;
mod tools;
mod ui;
mod update;

use anyhow::Result;

/// Runs the mender CLI.
///
/// Loads `.env` files (silently ignored if absent), parses command-line
/// arguments into a [`cli::Cli`] struct, and dispatches the chosen
/// subcommand via [`cli::run`].
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = cli::parse();
    cli::run(cli).await
}
