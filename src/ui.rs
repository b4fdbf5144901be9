//! Terminal prompts and status output.
//!
//! Numbered-list selection and confirmation prompts driven by rustyline,
//! plus the colored status helpers used across the CLI. Selection returns
//! `None` when the user cancels (Ctrl+C/Ctrl+D or blank input where
//! allowed), so callers can unwind one menu level instead of exiting.

use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use anyhow::Result;

/// Present a numbered list and return the chosen index.
///
/// Invalid numbers re-prompt; interrupt/EOF cancels with `None`.
pub fn select_from_list(
    rl: &mut DefaultEditor,
    title: &str,
    items: &[String],
) -> Result<Option<usize>> {
    println!();
    println!("{}", title.bold().cyan());
    for (i, item) in items.iter().enumerate() {
        println!("  {} {}", format!("[{}]", i + 1).yellow(), item);
    }

    loop {
        let line = match rl.readline(&format!("{} ", ">".green().bold())) {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        match trimmed.parse::<usize>() {
            Ok(n) if (1..=items.len()).contains(&n) => return Ok(Some(n - 1)),
            _ => println!(
                "{} pick a number between 1 and {}",
                "?".yellow(),
                items.len()
            ),
        }
    }
}

/// Read one line of free text. `None` on cancel.
pub fn prompt_line(rl: &mut DefaultEditor, prompt: &str) -> Result<Option<String>> {
    match rl.readline(&format!("{} ", prompt.green())) {
        Ok(line) => Ok(Some(line.trim().to_string())),
        Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Yes/no confirmation, defaulting to no.
pub fn confirm(rl: &mut DefaultEditor, prompt: &str) -> Result<bool> {
    match rl.readline(&format!("{} [y/N] ", prompt.yellow())) {
        Ok(line) => Ok(matches!(line.trim().to_lowercase().as_str(), "y" | "yes")),
        Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => Ok(false),
        Err(e) => Err(e.into()),
    }
}

pub fn success(msg: &str) {
    println!("{} {}", "ok:".green().bold(), msg);
}

pub fn info(msg: &str) {
    println!("{}", msg.dimmed());
}

pub fn failure(msg: &str) {
    eprintln!("{} {}", "error:".red().bold(), msg);
}
