//! Print a fresh hash for a password

use colored::Colorize;
use secrecy::ExposeSecret;

use crate::error::Result;

use super::{prompt_new_password, Context};

pub fn run(ctx: &Context) -> Result<()> {
    let password = prompt_new_password(ctx.settings.min_password_len)?;

    eprint!(
        "{}",
        format!("Hashing with cost {}... ", ctx.verifier.cost().get()).cyan()
    );
    let hash = ctx.verifier.hash(password.expose_secret())?;
    eprintln!("{}", "done".green());

    println!("{}", hash);
    Ok(())
}
