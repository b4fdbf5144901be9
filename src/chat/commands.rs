//! Slash command handlers for the chat REPL.
//!
//! Dispatches `/read`, `/write`, `/scan`, `/run`, `/search`, `/edit`,
//! `/patch`, `/history`, `/clear`, `/help`, `/menu`, and `/exit`. Returns a
//! [`CommandAction`] so the REPL loop can decide how to proceed. Command
//! failures are printed here and never escape to the loop.

use colored::Colorize;
use rustyline::DefaultEditor;

use anyhow::Result;

use crate::constants::{READ_FILE_MAX_SIZE, RUN_TIMEOUT_SECS};
use crate::diff;
use crate::message::{Message, Role};
use crate::patch;
use crate::provider::send_completion;
use crate::session::ChatSession;
use crate::tools;
use crate::ui;

/// Action returned by slash command handling.
pub(crate) enum CommandAction {
    /// Command was handled; continue the REPL loop.
    Continue,
    /// Return to the provider menu.
    Menu,
    /// Exit the program.
    Quit,
    /// Unknown command was entered.
    Unknown(String),
}

/// Dispatch and handle a slash command.
pub(crate) async fn handle_slash_command(
    line: &str,
    session: &mut ChatSession,
    rl: &mut DefaultEditor,
) -> Result<CommandAction> {
    let (command, rest) = match line.split_once(char::is_whitespace) {
        Some((cmd, rest)) => (cmd, rest.trim()),
        None => (line, ""),
    };

    match command {
        "/exit" => Ok(CommandAction::Quit),
        "/menu" => Ok(CommandAction::Menu),
        "/help" => {
            show_help();
            Ok(CommandAction::Continue)
        }
        "/history" => {
            for msg in &session.history {
                if msg.role == Role::System {
                    continue;
                }
                println!("{} {}", format!("{}:", msg.role).bold(), msg.content);
                println!();
            }
            Ok(CommandAction::Continue)
        }
        "/clear" => {
            session.clear();
            ui::info("History cleared.");
            Ok(CommandAction::Continue)
        }
        "/read" => {
            read_file(rest);
            Ok(CommandAction::Continue)
        }
        "/write" => {
            write_file(rest);
            Ok(CommandAction::Continue)
        }
        "/scan" => {
            match tools::scan_dir(rest) {
                Ok(listing) => println!("{listing}"),
                Err(e) => ui::failure(&e.to_string()),
            }
            Ok(CommandAction::Continue)
        }
        "/run" => {
            run_shell(rest, rl).await?;
            Ok(CommandAction::Continue)
        }
        "/search" => {
            search(rest);
            Ok(CommandAction::Continue)
        }
        "/edit" => {
            edit_file(rest, session, rl).await?;
            Ok(CommandAction::Continue)
        }
        "/patch" => {
            patch_function(rest, session).await;
            Ok(CommandAction::Continue)
        }
        _ => Ok(CommandAction::Unknown(command.to_string())),
    }
}

fn show_help() {
    println!("{}", "Commands:".bold());
    println!("  {} - print a file", "/read <path>".cyan());
    println!("  {} - write text to a file", "/write <path> <text>".cyan());
    println!("  {} - list a directory", "/scan [path]".cyan());
    println!("  {} - run a shell command", "/run <command>".cyan());
    println!(
        "  {} - regex search under a directory",
        "/search <pattern> [path]".cyan()
    );
    println!(
        "  {} - model-driven whole-file edit",
        "/edit <path> <instruction>".cyan()
    );
    println!(
        "  {} - rewrite one function in place",
        "/patch <path> <function> [instruction]".cyan()
    );
    println!("  {} - show conversation history", "/history".cyan());
    println!("  {} - clear conversation", "/clear".cyan());
    println!("  {} - back to the provider menu", "/menu".cyan());
    println!("  {} - show this help", "/help".cyan());
    println!("  {} - exit", "/exit".cyan());
    println!();
    println!("{}", "Anything else is sent to the model as a chat turn.".dimmed());
}

fn read_file(path: &str) {
    if path.is_empty() {
        ui::failure("usage: /read <path>");
        return;
    }
    match std::fs::metadata(path) {
        Ok(meta) if meta.len() > READ_FILE_MAX_SIZE => {
            ui::failure(&format!(
                "'{path}' is larger than {READ_FILE_MAX_SIZE} bytes"
            ));
        }
        Ok(_) => match std::fs::read_to_string(path) {
            Ok(contents) => {
                println!("{}", format!("-- {path}").dimmed());
                println!("{contents}");
            }
            Err(e) => ui::failure(&e.to_string()),
        },
        Err(e) => ui::failure(&e.to_string()),
    }
}

fn write_file(rest: &str) {
    let Some((path, text)) = rest.split_once(char::is_whitespace) else {
        ui::failure("usage: /write <path> <text>");
        return;
    };
    let write = || -> std::io::Result<()> {
        if let Some(parent) = std::path::Path::new(path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, text.trim_start())
    };
    match write() {
        Ok(()) => ui::success(&format!("wrote {path}")),
        Err(e) => ui::failure(&e.to_string()),
    }
}

async fn run_shell(command: &str, rl: &mut DefaultEditor) -> Result<()> {
    if command.is_empty() {
        ui::failure("usage: /run <command>");
        return Ok(());
    }
    println!("{} {}", "$".magenta().bold(), command);
    if !ui::confirm(rl, "Run this command?")? {
        ui::info("Cancelled.");
        return Ok(());
    }
    match tools::run_command(command, RUN_TIMEOUT_SECS).await {
        Ok(output) => println!("{output}"),
        Err(e) => ui::failure(&e.to_string()),
    }
    Ok(())
}

fn search(rest: &str) {
    let (pattern, path) = match rest.split_once(char::is_whitespace) {
        Some((pattern, path)) => (pattern, path.trim()),
        None => (rest, "."),
    };
    if pattern.is_empty() {
        ui::failure("usage: /search <pattern> [path]");
        return;
    }
    match tools::search_files(pattern, std::path::Path::new(path), None) {
        Ok(matches) if matches.is_empty() => ui::info("No matches found."),
        Ok(matches) => println!("{}", matches.join("\n")),
        Err(e) => ui::failure(&e.to_string()),
    }
}

/// Model-driven whole-file edit with diff preview and confirmation.
///
/// The previous content is kept as `<path>.bak` when overwriting.
async fn edit_file(rest: &str, session: &ChatSession, rl: &mut DefaultEditor) -> Result<()> {
    let Some((path, instruction)) = rest.split_once(char::is_whitespace) else {
        ui::failure("usage: /edit <path> <instruction>");
        return Ok(());
    };

    let original = std::fs::read_to_string(path).unwrap_or_default();

    ui::info("Generating...");
    let prompt = format!(
        "FILE: {path}\nOriginal:\n```\n{original}\n```\n\nInstructions: {instruction}\n\n\
         Return ONLY the complete new file content in a single ``` block."
    );
    let response = match send_completion(
        session.descriptor,
        &session.key,
        &session.model,
        &[Message::user(prompt)],
    )
    .await
    {
        Ok(response) => response,
        Err(e) => {
            ui::failure(&e.to_string());
            return Ok(());
        }
    };

    let new_content = patch::strip_code_fence(&response);
    if new_content == original.trim_end() || new_content == original {
        ui::info("No changes.");
        return Ok(());
    }

    let preview = if original.is_empty() {
        diff::new_file_preview(&new_content, path)
    } else {
        diff::unified_diff(&original, &new_content, path)
    };
    println!("{preview}");

    if !ui::confirm(rl, "Save?")? {
        ui::info("Cancelled.");
        return Ok(());
    }

    if std::path::Path::new(path).exists() {
        if let Err(e) = std::fs::rename(path, format!("{path}.bak")) {
            ui::failure(&e.to_string());
            return Ok(());
        }
    } else if let Some(parent) = std::path::Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    match std::fs::write(path, new_content) {
        Ok(()) => ui::success(&format!("saved {path}")),
        Err(e) => ui::failure(&e.to_string()),
    }
    Ok(())
}

/// Ask the model for a replacement implementation of one function and run
/// it through the patch engine.
async fn patch_function(rest: &str, session: &ChatSession) {
    let mut parts = rest.splitn(3, char::is_whitespace);
    let (Some(path), Some(function)) = (parts.next(), parts.next()) else {
        ui::failure("usage: /patch <path> <function> [instruction]");
        return;
    };
    let instruction = parts.next().unwrap_or("Improve the implementation.").trim();

    let target = std::path::Path::new(path);
    if !target.exists() {
        ui::failure(&format!("not found: file '{path}'"));
        return;
    }
    let original = match std::fs::read_to_string(target) {
        Ok(contents) => contents,
        Err(e) => {
            ui::failure(&e.to_string());
            return;
        }
    };

    ui::info("Generating...");
    let prompt = format!(
        "FILE: {path}\n```python\n{original}\n```\n\n\
         Rewrite the function '{function}'. {instruction}\n\n\
         Return ONLY the full replacement definition of '{function}' \
         (signature and body) in a ```python block. Do not include any \
         other functions or surrounding code."
    );
    let response = match send_completion(
        session.descriptor,
        &session.key,
        &session.model,
        &[Message::user(prompt)],
    )
    .await
    {
        Ok(response) => response,
        Err(e) => {
            ui::failure(&e.to_string());
            return;
        }
    };

    match patch::patch_file(target, function, &response) {
        Ok(confirmation) => ui::success(&confirmation),
        Err(e) => ui::failure(&e.to_string()),
    }
}
