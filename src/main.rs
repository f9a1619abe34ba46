use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use esports_credentials::cli::{self, Context, GlobalOptions};
use esports_credentials::config::Role;
use esports_credentials::Result;

#[derive(Parser)]
#[command(name = "esports-credentials")]
#[command(version)]
#[command(about = "Password hashing and account credentials for the esports console", long_about = None)]
struct Cli {
    /// Directory holding accounts.json and settings.json
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Cost factor for new hashes (4-31), overrides settings.json
    #[arg(long, global = true)]
    cost: Option<u32>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Hash a password and print the encoded result
    Hash,

    /// Check a password against an encoded hash
    Verify {
        /// Encoded hash, e.g. $2b$10$...
        hash: String,
    },

    /// Show the fields of an encoded hash
    Inspect {
        hash: String,
    },

    /// Manage accounts
    Account {
        #[command(subcommand)]
        action: AccountCommands,
    },

    /// Check an account password
    Login {
        id: String,
    },

    /// Change an account password
    Passwd {
        id: String,
    },
}

#[derive(Subcommand)]
enum AccountCommands {
    /// Create an account
    Add {
        id: String,
        /// admin, player or viewer
        #[arg(long, default_value = "player")]
        role: Role,
    },
    /// List accounts
    List,
    /// Delete an account
    Remove {
        id: String,
        /// Skip the confirmation prompt
        #[arg(long)]
        force: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Ok(false) means the command ran but the check it performed failed
fn run(cli: Cli) -> Result<bool> {
    let options = GlobalOptions {
        data_dir: cli.data_dir,
        cost: cli.cost,
    };

    // inspect needs no data directory
    if let Commands::Inspect { hash } = &cli.command {
        cli::verify::inspect(hash)?;
        return Ok(true);
    }

    let ctx = Context::load(&options)?;

    match cli.command {
        Commands::Hash => cli::hash::run(&ctx).map(|()| true),
        Commands::Verify { hash } => cli::verify::run(&ctx, &hash),
        Commands::Inspect { .. } => Ok(true),
        Commands::Account { action } => match action {
            AccountCommands::Add { id, role } => cli::account::add(&ctx, &id, role),
            AccountCommands::List => cli::account::list(&ctx),
            AccountCommands::Remove { id, force } => cli::account::remove(&ctx, &id, force),
        }
        .map(|()| true),
        Commands::Login { id } => cli::login::run(&ctx, &id).map(|()| true),
        Commands::Passwd { id } => cli::passwd::run(&ctx, &id).map(|()| true),
    }
}
