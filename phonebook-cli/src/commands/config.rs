//! Config command - show and change settings.json

use anyhow::{bail, Result};
use clap::Subcommand;
use colored::Colorize;
use serde_json::json;

use phonebook_core::config::Config;
use phonebook_core::services::Router;
use phonebook_core::Access;

use super::get_data_dir;
use crate::output;

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show current settings
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Set the backend API base URL
    SetUrl {
        /// e.g. http://localhost:8080/api
        url: String,
    },

    /// Set the page signed-in users land on
    SetLanding {
        /// e.g. /dashboard
        route: String,
    },
}

pub fn run(command: ConfigCommands) -> Result<()> {
    let data_dir = get_data_dir();
    let mut config = Config::load(&data_dir)?;

    match command {
        ConfigCommands::Show { json } => {
            if json {
                return output::print_json(&json!({
                    "dataDir": data_dir,
                    "apiBaseUrl": config.api_base_url,
                    "apiBaseUrlOverride": config.api_base_url_override,
                    "router": config.router,
                    "logging": config.logging,
                }));
            }

            let mut table = output::create_table();
            table.add_row(vec!["Data directory", &data_dir.display().to_string()]);
            table.add_row(vec!["API URL", &config.api_base_url]);
            if let Some(url) = &config.api_base_url_override {
                table.add_row(vec!["API URL (PHONEBOOK_API_URL)", url]);
            }
            table.add_row(vec!["Landing route", &config.router.landing_route]);
            table.add_row(vec!["Login route", &config.router.login_route]);
            table.add_row(vec!["Log level", &config.logging.level]);
            println!("{}", table);
        }

        ConfigCommands::SetUrl { url } => {
            config.api_base_url = url.trim_end_matches('/').to_string();
            config.validate()?;
            config.save(&data_dir)?;
            println!("{} API URL set to {}", "✓".green(), config.api_base_url.bold());
            if let Some(url) = &config.api_base_url_override {
                output::warning(&format!("PHONEBOOK_API_URL is set; requests still go to {}", url));
            }
        }

        ConfigCommands::SetLanding { route } => {
            let router = Router::new(config.router.clone());
            match router.match_path(&route) {
                Some(matched) if matched.route.access == Access::RequiresAuth => {
                    config.router.landing_route = matched.path;
                }
                Some(_) => bail!("'{}' is not a signed-in page", route),
                None => bail!("No page at '{}'", route),
            }
            config.validate()?;
            config.save(&data_dir)?;
            println!(
                "{} Landing route set to {}",
                "✓".green(),
                config.router.landing_route.bold()
            );
        }
    }

    Ok(())
}
