//! Account management commands

use colored::Colorize;
use secrecy::ExposeSecret;
use tracing::info;

use crate::config::{Account, Role};
use crate::crypto::HashRecord;
use crate::error::{CredentialError, Result};

use super::{confirm, prompt_new_password, Context};

/// Create an account with a new password
pub fn add(ctx: &Context, id: &str, role: Role) -> Result<()> {
    let mut accounts = ctx.store.load_accounts()?;
    if accounts.get(id).is_some() {
        return Err(CredentialError::AccountAlreadyExists(id.to_string()));
    }

    println!("{}", format!("=== New {} account '{}' ===", role, id).cyan().bold());
    let password = prompt_new_password(ctx.settings.min_password_len)?;
    let hash = ctx.verifier.hash(password.expose_secret())?;

    accounts.add(Account::new(id, role, hash))?;
    ctx.store.save_accounts(&accounts)?;
    info!(account = id, role = role.as_str(), "account created");

    println!("{} Account '{}' created.", "Success:".green().bold(), id);
    Ok(())
}

/// Show all accounts with the state of their stored hash
pub fn list(ctx: &Context) -> Result<()> {
    let accounts = ctx.store.load_accounts()?;

    if accounts.is_empty() {
        println!("No accounts.");
        println!();
        println!("Run {} to create one.", "esports-credentials account add".cyan());
        return Ok(());
    }

    println!("{:<20} {:<8} {:<20}", "ID".bold(), "ROLE".bold(), "HASH".bold());
    println!("{}", "─".repeat(50).dimmed());

    for account in accounts.iter() {
        let state = match account.password_hash.parse::<HashRecord>() {
            Ok(record) if record.needs_rehash(ctx.verifier.cost()) => {
                format!("${}$ cost {} (stale)", record.version(), record.cost().get())
                    .yellow()
                    .to_string()
            }
            Ok(record) => format!("${}$ cost {}", record.version(), record.cost().get()),
            Err(_) => "BROKEN".red().bold().to_string(),
        };
        println!("{:<20} {:<8} {}", account.id, account.role.as_str(), state);
    }

    println!();
    Ok(())
}

/// Delete an account after confirmation
pub fn remove(ctx: &Context, id: &str, force: bool) -> Result<()> {
    let mut accounts = ctx.store.load_accounts()?;
    if accounts.get(id).is_none() {
        return Err(CredentialError::AccountNotFound(id.to_string()));
    }

    if !force && !confirm(&format!("Remove account '{}'?", id)) {
        println!("Cancelled.");
        return Ok(());
    }

    accounts.remove(id);
    ctx.store.save_accounts(&accounts)?;
    info!(account = id, "account removed");

    println!("{} Account '{}' removed.", "Success:".green().bold(), id);
    Ok(())
}
