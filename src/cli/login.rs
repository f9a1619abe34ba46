//! Interactive login check

use colored::Colorize;
use secrecy::ExposeSecret;

use crate::auth::{Authenticator, LoginOutcome};
use crate::error::{CredentialError, Result};

use super::{prompt_password, Context};

pub fn run(ctx: &Context, id: &str) -> Result<()> {
    let accounts = ctx.store.load_accounts()?;
    let mut auth = Authenticator::new(accounts, ctx.verifier);

    let candidate = prompt_password(&format!("Password for {}: ", id))?;

    let outcome = match auth.login_and_upgrade(id, candidate.expose_secret()) {
        Ok(outcome) => outcome,
        Err(e) if e.is_integrity_failure() => {
            eprintln!(
                "{} the stored credential for '{}' is damaged; contact an administrator.",
                "Alert:".red().bold(),
                id
            );
            return Err(e);
        }
        Err(e) => return Err(e),
    };

    match outcome {
        LoginOutcome::Granted {
            role,
            rehash_recommended,
        } => {
            if rehash_recommended {
                ctx.store.save_accounts(auth.store())?;
                println!(
                    "{} stored hash upgraded to cost {}.",
                    "Note:".yellow(),
                    ctx.verifier.cost().get()
                );
            }
            println!("{} Logged in as {} ({}).", "Success:".green().bold(), id, role);
            Ok(())
        }
        LoginOutcome::Denied => Err(CredentialError::InvalidPassword),
        LoginOutcome::UnknownAccount => Err(CredentialError::AccountNotFound(id.to_string())),
    }
}
