//! Account records and the credential lookup traits

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{CredentialError, Result};

/// Access level of an account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Player,
    Viewer,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Player => "player",
            Role::Viewer => "viewer",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = CredentialError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "player" => Ok(Role::Player),
            "viewer" => Ok(Role::Viewer),
            other => Err(CredentialError::InvalidConfig(format!("unknown role '{}'", other))),
        }
    }
}

/// A single account with its stored credential
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Unique login name
    pub id: String,
    pub role: Role,
    /// Encoded bcrypt hash; the only persisted form of the password
    pub password_hash: String,
}

impl Account {
    pub fn new(id: impl Into<String>, role: Role, password_hash: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            role,
            password_hash: password_hash.into(),
        }
    }
}

/// Read access to stored credentials
pub trait CredentialReader {
    /// Stored hash for `id`, or `None` when no such account exists
    fn stored_hash(&self, id: &str) -> Result<Option<String>>;

    /// Role of `id`, or `None` when no such account exists
    fn role(&self, id: &str) -> Result<Option<Role>>;
}

/// Write access to stored credentials
pub trait CredentialWriter {
    /// Replace the stored hash of an existing account
    fn set_hash(&mut self, id: &str, password_hash: String) -> Result<()>;
}

/// All known accounts
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountList {
    pub accounts: Vec<Account>,
}

impl AccountList {
    pub fn new() -> Self {
        Self { accounts: Vec::new() }
    }

    pub fn add(&mut self, account: Account) -> Result<()> {
        if self.get(&account.id).is_some() {
            return Err(CredentialError::AccountAlreadyExists(account.id));
        }
        self.accounts.push(account);
        Ok(())
    }

    pub fn remove(&mut self, id: &str) -> Option<Account> {
        let pos = self.accounts.iter().position(|a| a.id == id)?;
        Some(self.accounts.remove(pos))
    }

    pub fn get(&self, id: &str) -> Option<&Account> {
        self.accounts.iter().find(|a| a.id == id)
    }

    fn get_mut(&mut self, id: &str) -> Option<&mut Account> {
        self.accounts.iter_mut().find(|a| a.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Account> {
        self.accounts.iter()
    }
}

impl CredentialReader for AccountList {
    fn stored_hash(&self, id: &str) -> Result<Option<String>> {
        Ok(self.get(id).map(|a| a.password_hash.clone()))
    }

    fn role(&self, id: &str) -> Result<Option<Role>> {
        Ok(self.get(id).map(|a| a.role))
    }
}

impl CredentialWriter for AccountList {
    fn set_hash(&mut self, id: &str, password_hash: String) -> Result<()> {
        let account = self
            .get_mut(id)
            .ok_or_else(|| CredentialError::AccountNotFound(id.to_string()))?;
        account.password_hash = password_hash;
        Ok(())
    }
}
