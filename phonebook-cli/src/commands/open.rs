//! Open command - navigate to a page through the guard

use anyhow::{bail, Result};
use colored::Colorize;

use phonebook_core::services::NavigationOutcome;

use super::get_context;
use crate::output;

pub fn run(path: &str, json: bool) -> Result<()> {
    let mut ctx = get_context()?;
    let resolution = ctx.navigate(path)?;

    if json {
        return output::print_json(&resolution);
    }

    if resolution.was_redirected() {
        let mut chain = vec![resolution.requested.as_str()];
        chain.extend(resolution.redirects.iter().map(String::as_str));
        println!("{} {}", "Redirected:".yellow(), chain.join(" -> "));
    }

    match &resolution.outcome {
        NavigationOutcome::Render { path, view, params } => {
            println!("{} {} ({})", "Showing:".green(), view.to_string().bold(), path);
            let mut names: Vec<_> = params.keys().collect();
            names.sort();
            for name in names {
                println!("  {} = {}", name, params[name]);
            }
            Ok(())
        }
        NavigationOutcome::NotFound { path } => bail!("No page at '{}'", path),
    }
}
