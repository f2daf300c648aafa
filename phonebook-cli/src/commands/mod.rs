//! CLI command implementations

pub mod auth;
pub mod config;
pub mod open;
pub mod phones;
pub mod users;

use std::io::{self, BufRead};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use dialoguer::Password;
use phonebook_core::services::{NavigationOutcome, Resolution};
use phonebook_core::PhonebookContext;

/// Get the phonebook directory from environment or default
pub fn get_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("PHONEBOOK_DIR") {
        PathBuf::from(dir)
    } else {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".phonebook")
    }
}

/// Get or create the phonebook context
pub fn get_context() -> Result<PhonebookContext> {
    let data_dir = get_data_dir();

    std::fs::create_dir_all(&data_dir)
        .with_context(|| format!("Failed to create phonebook directory: {:?}", data_dir))?;
    tracing::debug!(data_dir = %data_dir.display(), "opening phonebook context");

    PhonebookContext::new(&data_dir).context("Failed to initialize phonebook context")
}

/// Navigate to the page a command works on and fail unless it renders
///
/// Being sent to the login page means the session is missing.
pub fn require_route(ctx: &mut PhonebookContext, path: &str) -> Result<Resolution> {
    let resolution = ctx.navigate(path)?;
    if let NavigationOutcome::NotFound { path } = &resolution.outcome {
        bail!("No page at '{}'", path);
    }
    if resolution.was_redirected() && resolution.final_path() == ctx.config.router.login_route {
        bail!("Not logged in. Run 'pb login' first.");
    }
    Ok(resolution)
}

/// Password from stdin when piped or asked for, otherwise prompted
pub fn read_password(password_stdin: bool, prompt: &str) -> Result<String> {
    if password_stdin || atty::isnt(atty::Stream::Stdin) {
        let mut line = String::new();
        io::stdin().lock().read_line(&mut line)?;
        let password = line.trim_end_matches(['\r', '\n']).to_string();
        if password.is_empty() {
            bail!("No password given on stdin");
        }
        return Ok(password);
    }

    Ok(Password::new().with_prompt(prompt).interact()?)
}

/// Password typed twice, or read once from stdin
pub fn read_new_password(password_stdin: bool, prompt: &str) -> Result<String> {
    if password_stdin || atty::isnt(atty::Stream::Stdin) {
        return read_password(true, prompt);
    }

    Ok(Password::new()
        .with_prompt(prompt)
        .with_confirmation("Confirm password", "Passwords do not match")
        .interact()?)
}
