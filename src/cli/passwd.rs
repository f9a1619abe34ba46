//! Change an account password

use colored::Colorize;
use secrecy::ExposeSecret;

use crate::auth::{Authenticator, LoginOutcome};
use crate::error::{CredentialError, Result};

use super::{prompt_new_password, prompt_password, Context};

pub fn run(ctx: &Context, id: &str) -> Result<()> {
    let accounts = ctx.store.load_accounts()?;
    let mut auth = Authenticator::new(accounts, ctx.verifier);

    println!("{}", format!("=== Change password for '{}' ===", id).cyan().bold());

    let current = prompt_password("Current password: ")?;
    match auth.login(id, current.expose_secret())? {
        LoginOutcome::Granted { .. } => {}
        LoginOutcome::Denied => return Err(CredentialError::InvalidPassword),
        LoginOutcome::UnknownAccount => {
            return Err(CredentialError::AccountNotFound(id.to_string()))
        }
    }

    println!();
    let new_password = prompt_new_password(ctx.settings.min_password_len)?;

    auth.set_password(id, new_password.expose_secret())?;
    ctx.store.save_accounts(auth.store())?;

    println!();
    println!("{}", "Password changed.".green().bold());
    Ok(())
}
