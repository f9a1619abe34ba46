//! Credential handling for the esports console application
//!
//! This crate provides:
//! - bcrypt password hashing with fresh per-credential salts
//! - Verification that keeps "wrong password" and "broken record" apart
//! - A JSON account store with admin, player and viewer roles
//! - Command-line tools for hashing, checking and rotating credentials

pub mod auth;
pub mod cli;
pub mod config;
pub mod crypto;
pub mod error;

pub use auth::{Authenticator, LoginOutcome};
pub use crypto::{CredentialVerifier, HashRecord};
pub use error::{CredentialError, Result};
