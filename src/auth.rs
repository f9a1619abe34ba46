//! Login checks on top of a credential store

use tracing::{info, warn};

use crate::config::{CredentialReader, CredentialWriter, Role};
use crate::crypto::{CredentialVerifier, HashRecord};
use crate::error::Result;

/// Result of a login attempt that reached a verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginOutcome {
    Granted {
        role: Role,
        /// The stored hash uses a lower cost or a legacy tag
        rehash_recommended: bool,
    },
    /// The account exists but the password is wrong
    Denied,
    /// No account with this id
    UnknownAccount,
}

impl LoginOutcome {
    pub fn is_granted(&self) -> bool {
        matches!(self, LoginOutcome::Granted { .. })
    }
}

/// Checks passwords against whatever store supplies the hashes
pub struct Authenticator<S> {
    store: S,
    verifier: CredentialVerifier,
}

impl<S: CredentialReader> Authenticator<S> {
    pub fn new(store: S, verifier: CredentialVerifier) -> Self {
        Self { store, verifier }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Check `candidate` for account `id`
    ///
    /// A broken stored hash is returned as an error so it can be reported
    /// to an operator instead of looking like a typo.
    pub fn login(&self, id: &str, candidate: &str) -> Result<LoginOutcome> {
        let Some(stored) = self.store.stored_hash(id)? else {
            warn!(account = id, "login for unknown account");
            return Ok(LoginOutcome::UnknownAccount);
        };

        let record = stored.parse::<HashRecord>().map_err(|e| {
            warn!(account = id, error = %e, "stored credential is unusable");
            e
        })?;

        if !crate::crypto::verify_record(candidate, &record) {
            info!(account = id, "login denied");
            return Ok(LoginOutcome::Denied);
        }

        let Some(role) = self.store.role(id)? else {
            return Ok(LoginOutcome::UnknownAccount);
        };

        info!(account = id, role = role.as_str(), "login granted");
        Ok(LoginOutcome::Granted {
            role,
            rehash_recommended: record.needs_rehash(self.verifier.cost()),
        })
    }
}

impl<S: CredentialReader + CredentialWriter> Authenticator<S> {
    /// Store a fresh hash of `new_password` for `id`. A new salt is drawn
    /// every time; nothing of the previous record is reused.
    pub fn set_password(&mut self, id: &str, new_password: &str) -> Result<()> {
        let hash = self.verifier.hash(new_password)?;
        self.store.set_hash(id, hash)?;
        info!(account = id, cost = self.verifier.cost().get(), "credential rotated");
        Ok(())
    }

    /// Log in and, when granted with a stale hash, re-hash at the
    /// current cost
    pub fn login_and_upgrade(&mut self, id: &str, candidate: &str) -> Result<LoginOutcome> {
        let outcome = self.login(id, candidate)?;
        if let LoginOutcome::Granted {
            rehash_recommended: true,
            ..
        } = outcome
        {
            self.set_password(id, candidate)?;
        }
        Ok(outcome)
    }
}
