//! Interactive chat REPL for mender.
//!
//! A two-level loop: the outer level selects provider, key, and model via
//! numbered menus; the inner level is a rustyline REPL where each input is
//! either a slash command or a chat turn sent with the full history. The
//! whole conversation travels in a [`ChatSession`] so the model keeps
//! context across turns.

mod commands;

use anyhow::Result;
use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use crate::config::Config;
use crate::credentials::{mask_key, CredentialStore};
use crate::message::Message;
use crate::provider::{fetch_models, find_provider, send_completion, ProviderDescriptor, PROVIDERS};
use crate::session::ChatSession;
use crate::ui;
use crate::update;

/// How the inner REPL ended.
enum LoopExit {
    /// Return to the provider menu.
    Menu,
    /// Exit the program.
    Quit,
}

/// Runs the interactive surface: intro, update check, then the provider
/// selection loop.
///
/// `provider` and `model` (CLI flags or config defaults) preselect their
/// menus on the first pass; `/menu` always returns to interactive
/// selection.
pub async fn run(
    config: Config,
    store: &mut CredentialStore,
    provider: Option<String>,
    model: Option<String>,
) -> Result<()> {
    println!(
        "{} v{} {}",
        "mender".bold().cyan(),
        env!("CARGO_PKG_VERSION"),
        "- multi-provider chat with surgical patching".dimmed()
    );
    println!();

    if config.update_check {
        update::check_updates().await;
    }

    let mut rl = DefaultEditor::new()?;
    let history_path = Config::cache_dir()?.join(crate::constants::HISTORY_FILENAME);
    if history_path.exists() {
        let _ = rl.load_history(&history_path);
    }

    let mut preselected_provider = provider.or(config.default_provider);
    let mut preselected_model = model.or(config.default_model);

    loop {
        let descriptor = match preselected_provider.take() {
            Some(ref name) => match find_provider(name) {
                Some(descriptor) => descriptor,
                None => {
                    ui::failure(&format!("unknown provider: {name}"));
                    continue;
                }
            },
            None => match select_provider(&mut rl)? {
                Some(descriptor) => descriptor,
                None => break,
            },
        };

        let Some(key) = select_key(&mut rl, store, descriptor)? else {
            continue;
        };

        ui::info("Fetching models...");
        let models = match fetch_models(descriptor, &key).await {
            Ok(models) if models.is_empty() => {
                ui::failure("provider returned no models");
                continue;
            }
            Ok(models) => models,
            Err(e) => {
                ui::failure(&e.to_string());
                continue;
            }
        };

        let model = match preselected_model.take() {
            Some(model) => model,
            None => match ui::select_from_list(&mut rl, "Pick a model", &models)? {
                Some(index) => models[index].clone(),
                None => continue,
            },
        };

        let mut session = ChatSession::new(descriptor, key, model);
        if let Some(ref sp) = config.system_prompt {
            session.history.push(Message::system(sp.clone()));
        }
        ui::success(&format!(
            "Ready. [{}] [{}] - /help for commands",
            session.descriptor.name, session.model
        ));

        match chat_loop(&mut rl, &mut session).await? {
            LoopExit::Menu => continue,
            LoopExit::Quit => break,
        }
    }

    if let Some(parent) = history_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let _ = rl.save_history(&history_path);
    println!("{}", "goodbye.".dimmed());

    Ok(())
}

/// Provider menu. `None` means exit.
fn select_provider(rl: &mut DefaultEditor) -> Result<Option<&'static ProviderDescriptor>> {
    let mut items: Vec<String> = PROVIDERS.iter().map(|p| p.name.to_string()).collect();
    items.push("Exit".to_string());

    match ui::select_from_list(rl, "Pick a provider", &items)? {
        Some(index) if index < PROVIDERS.len() => Ok(Some(&PROVIDERS[index])),
        _ => Ok(None),
    }
}

/// Key menu: stored keys (masked) plus a "new key" entry. A fresh key is
/// appended to the store immediately. `None` returns to the provider menu.
fn select_key(
    rl: &mut DefaultEditor,
    store: &mut CredentialStore,
    descriptor: &ProviderDescriptor,
) -> Result<Option<String>> {
    let known: Vec<String> = store.keys_for(descriptor.name).to_vec();

    if !known.is_empty() {
        let mut items: Vec<String> = known.iter().map(|k| mask_key(k)).collect();
        items.push("+ new key".to_string());
        match ui::select_from_list(rl, &format!("Keys for {}", descriptor.name), &items)? {
            Some(index) if index < known.len() => return Ok(Some(known[index].clone())),
            Some(_) => {}
            None => return Ok(None),
        }
    }

    let Some(key) = ui::prompt_line(rl, &format!("API key for {}:", descriptor.name))? else {
        return Ok(None);
    };
    if key.is_empty() {
        return Ok(None);
    }
    store.add_key(descriptor.name, &key)?;
    Ok(Some(key))
}

/// The inner REPL. Ctrl+C aborts back to the provider menu; Ctrl+D and
/// `/exit` end the program.
async fn chat_loop(rl: &mut DefaultEditor, session: &mut ChatSession) -> Result<LoopExit> {
    loop {
        let readline = rl.readline(&format!("{} ", "you>".blue().bold()));

        match readline {
            Ok(line) => {
                let line = line.trim().to_string();
                if line.is_empty() {
                    continue;
                }

                if line.starts_with('/') {
                    match commands::handle_slash_command(&line, session, rl).await? {
                        commands::CommandAction::Continue => continue,
                        commands::CommandAction::Menu => return Ok(LoopExit::Menu),
                        commands::CommandAction::Quit => return Ok(LoopExit::Quit),
                        commands::CommandAction::Unknown(cmd) => {
                            println!("{} Unknown command: {}", "?".yellow(), cmd);
                            continue;
                        }
                    }
                }

                let _ = rl.add_history_entry(&line);

                session.push_user(&line);
                ui::info("Thinking...");

                // Ctrl+C drops the in-flight request and stays in the REPL.
                let result = tokio::select! {
                    result = send_completion(
                        session.descriptor,
                        &session.key,
                        &session.model,
                        &session.history,
                    ) => Some(result),
                    _ = tokio::signal::ctrl_c() => None,
                };

                match result {
                    Some(Ok(response)) => {
                        println!();
                        println!("{} {}", "mender:".cyan().bold(), response);
                        session.push_assistant(response);
                    }
                    Some(Err(e)) => {
                        // Pop the failed user message so the turn can be retried.
                        session.pop_last();
                        ui::failure(&e.to_string());
                    }
                    None => {
                        session.pop_last();
                        println!("{}", "^C".dimmed());
                    }
                }
                println!();
            }
            Err(ReadlineError::Interrupted) => {
                println!("{}", "^C".dimmed());
                return Ok(LoopExit::Menu);
            }
            Err(ReadlineError::Eof) => {
                return Ok(LoopExit::Quit);
            }
            Err(e) => {
                ui::failure(&e.to_string());
                return Ok(LoopExit::Quit);
            }
        }
    }
}
