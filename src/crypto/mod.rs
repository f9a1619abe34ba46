//! Password hashing for account credentials
//!
//! This module provides:
//! - The self-describing bcrypt hash format (`HashRecord`)
//! - Hashing with fresh salts and constant-time verification
//! - Zeroize-on-drop handling of password key material

mod record;
mod secure_bytes;
mod verifier;

pub use record::{Cost, HashRecord, Version, DIGEST_LEN, ENCODED_LEN, SALT_LEN};
pub use secure_bytes::SecureBytes;
pub use verifier::{generate_salt, hash, hash_with_salt, verify, verify_record, CredentialVerifier};
