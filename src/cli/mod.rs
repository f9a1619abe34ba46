//! Command implementations

pub mod account;
pub mod hash;
pub mod login;
pub mod passwd;
pub mod verify;

use std::io::{self, Write};
use std::path::PathBuf;

use colored::Colorize;
use secrecy::{ExposeSecret, SecretString};

use crate::config::{self, AccountStore, Settings};
use crate::crypto::{Cost, CredentialVerifier};
use crate::error::{CredentialError, Result};

/// Options shared by every command
#[derive(Debug, Clone, Default)]
pub struct GlobalOptions {
    pub data_dir: Option<PathBuf>,
    pub cost: Option<u32>,
}

/// Resolved store, settings and verifier for one invocation
pub struct Context {
    pub store: AccountStore,
    pub settings: Settings,
    pub verifier: CredentialVerifier,
}

impl Context {
    pub fn load(options: &GlobalOptions) -> Result<Self> {
        let store = AccountStore::new(config::resolve_data_dir(options.data_dir.clone())?);
        let settings = store.load_settings()?;
        let cost = match options.cost {
            Some(cost) => Cost::new(cost)?,
            None => settings.cost()?,
        };

        Ok(Self {
            store,
            settings,
            verifier: CredentialVerifier::new(cost),
        })
    }
}

/// Ask for a new password twice, enforcing the minimum length
pub fn prompt_new_password(min_len: usize) -> Result<SecretString> {
    loop {
        let password = SecretString::new(rpassword::prompt_password("New password: ")?);

        let len = password.expose_secret().chars().count();
        if len < min_len {
            println!(
                "{} {}",
                "Error:".red(),
                CredentialError::PasswordTooShort(min_len)
            );
            continue;
        }

        let confirm = SecretString::new(rpassword::prompt_password("Confirm password: ")?);
        if password.expose_secret() != confirm.expose_secret() {
            println!("{} {}", "Error:".red(), CredentialError::PasswordMismatch);
            continue;
        }

        return Ok(password);
    }
}

/// Ask for an existing password
pub fn prompt_password(prompt: &str) -> Result<SecretString> {
    Ok(SecretString::new(rpassword::prompt_password(prompt)?))
}

/// Ask a yes/no question, defaulting to no
pub fn confirm(prompt: &str) -> bool {
    print!("{} [y/N] ", prompt);
    io::stdout().flush().ok();

    let mut input = String::new();
    if io::stdin().read_line(&mut input).is_err() {
        return false;
    }

    matches!(input.trim().to_lowercase().as_str(), "y" | "yes")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_cost_override() {
        let tmp = tempfile::tempdir().unwrap();
        let options = GlobalOptions {
            data_dir: Some(tmp.path().to_path_buf()),
            cost: Some(6),
        };

        let ctx = Context::load(&options).unwrap();
        assert_eq!(ctx.verifier.cost().get(), 6);
        assert_eq!(ctx.store.dir(), tmp.path());
    }

    #[test]
    fn test_context_uses_settings_cost() {
        let tmp = tempfile::tempdir().unwrap();
        let store = AccountStore::new(tmp.path());
        store
            .save_settings(&Settings {
                default_cost: 7,
                ..Settings::default()
            })
            .unwrap();

        let options = GlobalOptions {
            data_dir: Some(tmp.path().to_path_buf()),
            cost: None,
        };
        assert_eq!(Context::load(&options).unwrap().verifier.cost().get(), 7);
    }

    #[test]
    fn test_context_rejects_bad_cost() {
        let tmp = tempfile::tempdir().unwrap();
        let options = GlobalOptions {
            data_dir: Some(tmp.path().to_path_buf()),
            cost: Some(50),
        };
        assert!(matches!(
            Context::load(&options),
            Err(CredentialError::UnsupportedCost(50))
        ));
    }
}
