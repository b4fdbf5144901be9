//! Command-line interface definition and dispatch for mender.
//!
//! Uses [`clap`] for argument parsing with derive macros. `chat` is the
//! interactive surface; `patch`, `models`, `keys`, and `config` expose the
//! same operations non-interactively.

use std::io::Read;
use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;

use crate::config::Config;
use crate::credentials::{mask_key, CredentialStore};
use crate::{chat, patch, provider, ui};

/// Top-level CLI structure for mender.
#[derive(Parser)]
#[command(name = "mender", about = "A multi-provider AI chat client with surgical code patching")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands for the mender CLI.
///
/// The `///` doc comments on variants double as `--help` text rendered by
/// clap.
#[derive(Subcommand)]
pub enum Commands {
    /// Start an interactive chat session
    Chat {
        /// Provider to use (gemini, groq, openai, deepseek, claude)
        #[arg(short, long)]
        provider: Option<String>,
        /// Model to use (skips the model menu)
        #[arg(short, long)]
        model: Option<String>,
    },
    /// Replace one function in a Python file with new code
    Patch {
        /// Target file
        file: PathBuf,
        /// Name of the function to replace
        function: String,
        /// File containing the replacement code (stdin when omitted)
        #[arg(short, long)]
        replacement: Option<PathBuf>,
        /// Print the spliced result instead of writing the file
        #[arg(long)]
        dry_run: bool,
    },
    /// List available models for a provider
    Models {
        /// Provider name
        provider: String,
    },
    /// Manage stored API keys
    Keys {
        #[command(subcommand)]
        action: KeysAction,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Subcommands for the `keys` command.
#[derive(Subcommand)]
pub enum KeysAction {
    /// List stored keys (masked)
    List,
    /// Add a key for a provider
    Add {
        /// Provider name
        provider: String,
    },
}

/// Subcommands for the `config` command.
#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current config
    Show,
}

/// Parses command-line arguments into a [`Cli`] struct.
pub fn parse() -> Cli {
    Cli::parse()
}

/// Dispatches the parsed CLI command to its handler.
pub async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Chat { provider, model } => {
            let config = Config::load()?;
            let mut store = CredentialStore::load()?;
            chat::run(config, &mut store, provider, model).await
        }
        Commands::Patch {
            file,
            function,
            replacement,
            dry_run,
        } => {
            let raw = match replacement {
                Some(path) => std::fs::read_to_string(&path)?,
                None => {
                    let mut buffer = String::new();
                    std::io::stdin().read_to_string(&mut buffer)?;
                    buffer
                }
            };
            if dry_run {
                let document = std::fs::read_to_string(&file)?;
                let updated = patch::apply_patch(&document, &function, &raw)?;
                print!("{updated}");
            } else {
                let confirmation = patch::patch_file(&file, &function, &raw)?;
                ui::success(&confirmation);
            }
            Ok(())
        }
        Commands::Models { provider: name } => {
            let descriptor = provider::find_provider(&name)
                .ok_or_else(|| anyhow::anyhow!("Unknown provider: {name}"))?;
            let store = CredentialStore::load()?;
            let key = store
                .keys_for(descriptor.name)
                .first()
                .cloned()
                .unwrap_or_default();
            if key.is_empty() && !descriptor.is_local_listing() {
                anyhow::bail!(
                    "No key stored for {}. Run `mender keys add {name}` first.",
                    descriptor.name
                );
            }
            let models = provider::fetch_models(descriptor, &key).await?;
            println!("{}", format!("{}:", descriptor.name).bold());
            for model in models {
                println!("  {model}");
            }
            Ok(())
        }
        Commands::Keys { action } => {
            let mut store = CredentialStore::load()?;
            match action {
                KeysAction::List => {
                    if store.provider_keys.is_empty() {
                        ui::info("No keys stored.");
                        return Ok(());
                    }
                    let mut providers: Vec<_> = store.provider_keys.iter().collect();
                    providers.sort_by(|a, b| a.0.cmp(b.0));
                    for (name, keys) in providers {
                        println!("{}", format!("{name}:").bold());
                        for key in keys {
                            println!("  {}", mask_key(key));
                        }
                    }
                    Ok(())
                }
                KeysAction::Add { provider: name } => {
                    let descriptor = provider::find_provider(&name)
                        .ok_or_else(|| anyhow::anyhow!("Unknown provider: {name}"))?;
                    let mut rl = rustyline::DefaultEditor::new()?;
                    let Some(key) =
                        ui::prompt_line(&mut rl, &format!("API key for {}:", descriptor.name))?
                    else {
                        return Ok(());
                    };
                    if key.is_empty() {
                        anyhow::bail!("Empty key, nothing stored");
                    }
                    store.add_key(descriptor.name, &key)?;
                    ui::success(&format!("stored key for {}", descriptor.name));
                    Ok(())
                }
            }
        }
        Commands::Config { action } => {
            let config = Config::load()?;
            match action {
                ConfigAction::Show => {
                    let path = Config::config_path()?;
                    println!("{} {}", "Config path:".bold(), path.display());
                    println!();
                    let toml_str = toml::to_string_pretty(&config)?;
                    println!("{}", toml_str);
                }
            }
            Ok(())
        }
    }
}
