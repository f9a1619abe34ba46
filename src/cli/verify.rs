//! Check a password against a hash, or show what a hash contains

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use colored::Colorize;
use secrecy::ExposeSecret;

use crate::crypto::HashRecord;
use crate::error::Result;

use super::{prompt_password, Context};

/// Returns whether the password matched so `main` can set the exit code
pub fn run(ctx: &Context, stored_hash: &str) -> Result<bool> {
    // Parse before prompting so a broken hash fails fast
    stored_hash.parse::<HashRecord>()?;

    let candidate = prompt_password("Password: ")?;
    let matched = ctx.verifier.verify(candidate.expose_secret(), stored_hash)?;

    if matched {
        println!("{}", "match".green().bold());
    } else {
        println!("{}", "no match".red().bold());
    }

    Ok(matched)
}

pub fn inspect(stored_hash: &str) -> Result<()> {
    let record: HashRecord = stored_hash.parse()?;

    println!("{:<10} {}", "tag".bold(), record.version());
    println!(
        "{:<10} {} ({} rounds)",
        "cost".bold(),
        record.cost().get(),
        record.cost().rounds()
    );
    println!("{:<10} {}", "salt".bold(), STANDARD.encode(record.salt()));
    println!("{:<10} {}", "digest".bold(), STANDARD.encode(record.digest()));

    Ok(())
}
