//! Users commands - list, show, create, update and delete users

use std::path::PathBuf;

use anyhow::{bail, Result};
use chrono::NaiveDate;
use clap::{Args, Subcommand};
use colored::Colorize;
use dialoguer::{Confirm, Password};

use phonebook_core::{NewUser, PasswordChange, PhotoUpload, User, UserUpdate};

use super::{get_context, read_new_password, require_route};
use crate::output;

/// Fields of a new user; the password is prompted for
#[derive(Args)]
pub struct NewUserArgs {
    /// Full name
    #[arg(long)]
    pub name: String,
    /// Email address
    #[arg(long)]
    pub email: String,
    /// National identity card number
    #[arg(long)]
    pub nic: String,
    /// Postal address
    #[arg(long)]
    pub address: String,
    /// Date of birth (YYYY-MM-DD)
    #[arg(long)]
    pub birthday: NaiveDate,
    /// Gender
    #[arg(long)]
    pub gender: String,
    /// Profile photo to upload
    #[arg(long)]
    pub photo: Option<PathBuf>,
}

impl NewUserArgs {
    fn into_new_user(self, password: String) -> (NewUser, Option<PathBuf>) {
        let user = NewUser {
            name: self.name,
            email: self.email,
            nic: self.nic,
            address: self.address,
            birthday: self.birthday,
            gender: self.gender,
            confirm_password: password.clone(),
            password,
        };
        (user, self.photo)
    }
}

#[derive(Subcommand)]
pub enum UsersCommands {
    /// List all users
    List {
        /// Include each user's phone numbers
        #[arg(long)]
        with_phones: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show one user with their phone numbers
    Show {
        /// User ID
        id: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Create a user
    Create {
        #[command(flatten)]
        user: NewUserArgs,
        /// Read the password from stdin
        #[arg(long)]
        password_stdin: bool,
    },

    /// Update a user's details
    Update {
        /// User ID
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        nic: Option<String>,
        #[arg(long)]
        address: Option<String>,
        /// Date of birth (YYYY-MM-DD)
        #[arg(long)]
        birthday: Option<NaiveDate>,
        #[arg(long)]
        gender: Option<String>,
        /// New profile photo
        #[arg(long)]
        photo: Option<PathBuf>,
    },

    /// Change a user's password
    Password {
        /// User ID
        id: String,
    },

    /// Delete a user
    Delete {
        /// User ID
        id: String,
        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
    },
}

pub async fn run(command: UsersCommands) -> Result<()> {
    match command {
        UsersCommands::List { with_phones, json } => list(with_phones, json).await,
        UsersCommands::Show { id, json } => show(&id, json).await,
        UsersCommands::Create { user, password_stdin } => create(user, password_stdin).await,
        UsersCommands::Update {
            id,
            name,
            email,
            nic,
            address,
            birthday,
            gender,
            photo,
        } => {
            let update = UserUpdate {
                name,
                email,
                nic,
                address,
                birthday,
                gender,
            };
            update_user(&id, update, photo).await
        }
        UsersCommands::Password { id } => change_password(&id).await,
        UsersCommands::Delete { id, force } => delete(&id, force).await,
    }
}

async fn list(with_phones: bool, json: bool) -> Result<()> {
    let mut ctx = get_context()?;
    require_route(&mut ctx, if with_phones { "/userlist" } else { "/users" })?;

    let users = if with_phones {
        output::with_spinner("Loading users...", ctx.users.list_with_phones(&ctx.session)).await?
    } else {
        output::with_spinner("Loading users...", ctx.users.list(&ctx.session)).await?
    };

    if json {
        return output::print_json(&users);
    }

    if users.is_empty() {
        output::info("No users yet. Use 'pb users create' to add one.");
        return Ok(());
    }

    let mut table = output::create_table();
    let mut header = vec!["ID", "Name", "Email", "NIC", "Gender", "Birthday"];
    if with_phones {
        header.push("Phones");
    }
    table.set_header(header);

    for user in &users {
        let mut row = vec![
            user.id.clone(),
            user.name.clone(),
            user.email.clone(),
            user.nic.clone(),
            user.gender.clone(),
            format_birthday(user),
        ];
        if with_phones {
            let numbers: Vec<_> = user.phones.iter().map(|p| p.number.as_str()).collect();
            row.push(numbers.join(", "));
        }
        table.add_row(row);
    }

    println!("{}", table);
    println!("{} user(s)", users.len());
    Ok(())
}

async fn show(id: &str, json: bool) -> Result<()> {
    let mut ctx = get_context()?;
    require_route(&mut ctx, &format!("/users/{}", id))?;

    let user = output::with_spinner("Loading user...", ctx.users.get_with_phones(&ctx.session, id)).await?;

    if json {
        return output::print_json(&user);
    }

    println!("{}", user.name.bold());
    println!();

    let mut table = output::create_table();
    table.add_row(vec!["ID", &user.id]);
    table.add_row(vec!["Email", &user.email]);
    table.add_row(vec!["NIC", &user.nic]);
    table.add_row(vec!["Address", &user.address]);
    table.add_row(vec!["Birthday", &format_birthday(&user)]);
    table.add_row(vec!["Gender", &user.gender]);
    if let Some(photo) = user.photo() {
        table.add_row(vec!["Photo", photo]);
    }
    println!("{}", table);

    if user.phones.is_empty() {
        println!("{}", "No phone numbers".dimmed());
    } else {
        println!();
        println!("{}", "Phone numbers".bold());
        for phone in &user.phones {
            println!("  • {} ({}) [{}]", phone.number, phone.phone_type, phone.id.dimmed());
        }
    }

    Ok(())
}

async fn create(args: NewUserArgs, password_stdin: bool) -> Result<()> {
    let mut ctx = get_context()?;
    require_route(&mut ctx, "/users")?;

    let password = read_new_password(password_stdin, "Password for the new user")?;
    let (user, photo) = args.into_new_user(password);

    let created = match photo {
        Some(path) => {
            let photo = PhotoUpload::from_path(&path)?;
            output::with_spinner("Creating user...", ctx.users.create_with_photo(&ctx.session, &user, photo))
                .await?
        }
        None => output::with_spinner("Creating user...", ctx.users.create(&ctx.session, &user)).await?,
    };

    println!("{} Created user {} ({})", "✓".green(), created.name.bold(), created.id);
    Ok(())
}

pub async fn register(args: NewUserArgs, password_stdin: bool) -> Result<()> {
    let ctx = get_context()?;

    if args.photo.is_some() {
        output::warning("Photos are not accepted at registration; upload one with 'pb users update'.");
    }
    let password = read_new_password(password_stdin, "Choose a password")?;
    let (user, _) = args.into_new_user(password);

    output::with_spinner("Registering...", ctx.users.register(&user)).await?;

    println!("{} Registered {}", "✓".green(), user.email.bold());
    output::info("Sign in with 'pb login'.");
    Ok(())
}

async fn update_user(id: &str, update: UserUpdate, photo: Option<PathBuf>) -> Result<()> {
    if update.is_empty() && photo.is_none() {
        bail!("Nothing to update. Pass at least one field, e.g. --name or --photo.");
    }

    let mut ctx = get_context()?;
    require_route(&mut ctx, &format!("/users/{}/edit", id))?;

    let updated = match photo {
        Some(path) => {
            let photo = PhotoUpload::from_path(&path)?;
            output::with_spinner(
                "Updating user...",
                ctx.users.update_with_photo(&ctx.session, id, &update, photo),
            )
            .await?
        }
        None => output::with_spinner("Updating user...", ctx.users.update(&ctx.session, id, &update)).await?,
    };

    println!("{} Updated user {}", "✓".green(), updated.name.bold());
    Ok(())
}

async fn change_password(id: &str) -> Result<()> {
    let mut ctx = get_context()?;
    require_route(&mut ctx, &format!("/users/{}/edit", id))?;

    let current_password = Password::new().with_prompt("Current password").interact()?;
    let new_password = Password::new()
        .with_prompt("New password")
        .with_confirmation("Confirm new password", "Passwords do not match")
        .interact()?;

    let change = PasswordChange {
        current_password,
        confirm_password: new_password.clone(),
        new_password,
    };
    output::with_spinner(
        "Changing password...",
        ctx.users.update_password(&ctx.session, id, &change),
    )
    .await?;

    println!("{} Password changed", "✓".green());
    Ok(())
}

async fn delete(id: &str, force: bool) -> Result<()> {
    let mut ctx = get_context()?;
    require_route(&mut ctx, &format!("/users/{}", id))?;

    if !force {
        println!("\n{}", format!("This will delete user '{}' and their phone numbers.", id).yellow());
        if !Confirm::new()
            .with_prompt("Are you sure?")
            .default(false)
            .interact()?
        {
            println!("{}\n", "Cancelled".dimmed());
            return Ok(());
        }
    }

    output::with_spinner("Deleting user...", ctx.users.delete(&ctx.session, id)).await?;
    println!("{} User '{}' deleted", "✓".green(), id);
    Ok(())
}

fn format_birthday(user: &User) -> String {
    user.birthday
        .map(|b| b.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}
