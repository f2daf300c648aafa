//! Login, logout and whoami commands

use anyhow::Result;
use colored::Colorize;
use dialoguer::Input;
use serde_json::json;

use super::{get_context, read_password};
use crate::output;

pub async fn login(email: Option<String>, password_stdin: bool) -> Result<()> {
    let mut ctx = get_context()?;

    let email = match email {
        Some(e) => e,
        None => Input::new().with_prompt("Email").interact_text()?,
    };
    let password = read_password(password_stdin, "Password")?;

    output::with_spinner("Signing in...", ctx.login(&email, &password)).await?;

    let shown = ctx
        .session
        .user()
        .map(|u| u.name.unwrap_or(u.email))
        .unwrap_or(email);
    println!("{} Signed in as {}", "✓".green(), shown.bold());
    Ok(())
}

pub fn logout() -> Result<()> {
    let mut ctx = get_context()?;

    if !ctx.session.is_authenticated() {
        output::info("Not logged in");
        return Ok(());
    }

    ctx.logout()?;
    println!("{} Signed out", "✓".green());
    Ok(())
}

pub fn whoami(json: bool) -> Result<()> {
    let ctx = get_context()?;
    let user = ctx.session.user();

    if json {
        return output::print_json(&json!({
            "authenticated": ctx.session.is_authenticated(),
            "user": user,
            "apiBaseUrl": ctx.config.effective_api_base_url(),
        }));
    }

    if !ctx.session.is_authenticated() {
        output::warning("Not logged in. Run 'pb login' to sign in.");
        return Ok(());
    }

    let mut table = output::create_table();
    match user {
        Some(user) => {
            table.add_row(vec!["Email", &user.email]);
            if let Some(name) = &user.name {
                table.add_row(vec!["Name", name]);
            }
            if let Some(id) = &user.id {
                table.add_row(vec!["ID", id]);
            }
        }
        None => {
            table.add_row(vec!["Email", "(unknown)"]);
        }
    }
    table.add_row(vec!["Server", ctx.config.effective_api_base_url()]);

    println!("{}", table);
    Ok(())
}
