//! Phonebook CLI - users and phone numbers from your terminal

use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod output;

use commands::{auth, config, open, phones, users};
use phonebook_core::config::Config;
use phonebook_core::services::init_logging;

/// Phonebook - manage users and their phone numbers
#[derive(Parser)]
#[command(name = "pb", version, about, long_about = None)]
struct Cli {
    /// Log requests and navigation to stderr
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in and store the session
    Login {
        /// Account email (prompted if omitted)
        #[arg(long)]
        email: Option<String>,
        /// Read the password from stdin
        #[arg(long)]
        password_stdin: bool,
    },

    /// Sign out and clear the stored session
    Logout,

    /// Show the signed-in user
    Whoami {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Navigate to a page and show where the guard sends you
    Open {
        /// Page path, e.g. /users/42
        path: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Create an account without signing in
    Register {
        #[command(flatten)]
        user: users::NewUserArgs,
        /// Read the password from stdin
        #[arg(long)]
        password_stdin: bool,
    },

    /// Manage users
    Users {
        #[command(subcommand)]
        command: users::UsersCommands,
    },

    /// Manage a user's phone numbers
    Phones {
        #[command(subcommand)]
        command: phones::PhonesCommands,
    },

    /// Show or change settings
    Config {
        #[command(subcommand)]
        command: config::ConfigCommands,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output::error(&format!("Error: {:#}", e));
            ExitCode::FAILURE
        }
    }
}

fn setup_logging(verbose: bool) {
    let config = Config::load(&commands::get_data_dir()).unwrap_or_default();
    let logging = if verbose {
        config.logging.with_level("debug")
    } else {
        config.logging
    };
    if let Err(e) = init_logging(&logging) {
        output::warning(&format!("Logging disabled: {}", e));
    }
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Login { email, password_stdin } => auth::login(email, password_stdin).await,
        Commands::Logout => auth::logout(),
        Commands::Whoami { json } => auth::whoami(json),
        Commands::Open { path, json } => open::run(&path, json),
        Commands::Register { user, password_stdin } => users::register(user, password_stdin).await,
        Commands::Users { command } => users::run(command).await,
        Commands::Phones { command } => phones::run(command).await,
        Commands::Config { command } => config::run(command),
    }
}
