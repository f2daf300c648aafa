//! Phones commands - manage the phone numbers of one user

use anyhow::{bail, Result};
use clap::Subcommand;
use colored::Colorize;
use dialoguer::Confirm;

use phonebook_core::{NewPhone, PhoneUpdate};

use super::{get_context, require_route};
use crate::output;

#[derive(Subcommand)]
pub enum PhonesCommands {
    /// List a user's phone numbers
    List {
        /// Owner's user ID
        user_id: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Add a phone number to a user
    Add {
        /// Owner's user ID
        user_id: String,
        /// Phone number
        #[arg(long)]
        number: String,
        /// Kind of number, e.g. mobile, home, work
        #[arg(long = "type", default_value = "mobile")]
        phone_type: String,
    },

    /// Change a phone number
    Update {
        /// Owner's user ID
        user_id: String,
        /// Phone ID
        phone_id: String,
        #[arg(long)]
        number: Option<String>,
        #[arg(long = "type")]
        phone_type: Option<String>,
    },

    /// Delete a phone number
    Delete {
        /// Owner's user ID
        user_id: String,
        /// Phone ID
        phone_id: String,
        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
    },
}

pub async fn run(command: PhonesCommands) -> Result<()> {
    let user_id = match &command {
        PhonesCommands::List { user_id, .. }
        | PhonesCommands::Add { user_id, .. }
        | PhonesCommands::Update { user_id, .. }
        | PhonesCommands::Delete { user_id, .. } => user_id.clone(),
    };

    let mut ctx = get_context()?;
    require_route(&mut ctx, &format!("/users/{}", user_id))?;

    match command {
        PhonesCommands::List { json, .. } => {
            let phones =
                output::with_spinner("Loading phone numbers...", ctx.phones.list(&ctx.session, &user_id)).await?;

            if json {
                return output::print_json(&phones);
            }
            if phones.is_empty() {
                output::info(&format!("User '{}' has no phone numbers.", user_id));
                return Ok(());
            }

            let mut table = output::create_table();
            table.set_header(vec!["ID", "Number", "Type"]);
            for phone in &phones {
                table.add_row(vec![&phone.id, &phone.number, &phone.phone_type]);
            }
            println!("{}", table);
        }

        PhonesCommands::Add { number, phone_type, .. } => {
            let phone = NewPhone::new(number, phone_type);
            let created = output::with_spinner(
                "Adding phone number...",
                ctx.phones.create(&ctx.session, &user_id, &phone),
            )
            .await?;
            println!("{} Added {} ({})", "✓".green(), created.number.bold(), created.id);
        }

        PhonesCommands::Update {
            phone_id,
            number,
            phone_type,
            ..
        } => {
            if number.is_none() && phone_type.is_none() {
                bail!("Nothing to update. Pass --number or --type.");
            }
            let update = PhoneUpdate { number, phone_type };
            let updated = output::with_spinner(
                "Updating phone number...",
                ctx.phones.update(&ctx.session, &user_id, &phone_id, &update),
            )
            .await?;
            println!("{} Updated {} ({})", "✓".green(), updated.number.bold(), updated.phone_type);
        }

        PhonesCommands::Delete { phone_id, force, .. } => {
            if !force
                && !Confirm::new()
                    .with_prompt(format!("Delete phone '{}' of user '{}'?", phone_id, user_id))
                    .default(false)
                    .interact()?
            {
                println!("{}\n", "Cancelled".dimmed());
                return Ok(());
            }

            output::with_spinner(
                "Deleting phone number...",
                ctx.phones.delete(&ctx.session, &user_id, &phone_id),
            )
            .await?;
            println!("{} Phone '{}' deleted", "✓".green(), phone_id);
        }
    }

    Ok(())
}
