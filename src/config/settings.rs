//! Tunable settings stored next to the account file

use serde::{Deserialize, Serialize};

use crate::crypto::Cost;
use crate::error::{CredentialError, Result};

/// Contents of `settings.json`. Every field falls back to its default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Cost factor for newly created credentials
    pub default_cost: u32,
    /// Shortest password accepted when setting a credential
    pub min_password_len: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_cost: Cost::DEFAULT.get(),
            min_password_len: 8,
        }
    }
}

impl Settings {
    pub fn cost(&self) -> Result<Cost> {
        Cost::new(self.default_cost).map_err(|_| {
            CredentialError::InvalidConfig(format!(
                "default_cost {} is outside {}-{}",
                self.default_cost,
                Cost::MIN.get(),
                Cost::MAX.get()
            ))
        })
    }

    pub fn validate(&self) -> Result<()> {
        self.cost()?;
        if self.min_password_len == 0 {
            return Err(CredentialError::InvalidConfig(
                "min_password_len must be at least 1".into(),
            ));
        }
        Ok(())
    }
}
