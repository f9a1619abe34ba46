//! Zeroize-on-drop buffer for password key material
//!
//! The NUL-terminated, truncated password bytes fed to the bcrypt key
//! schedule live here so they are wiped as soon as hashing finishes.

use std::ops::Deref;
use zeroize::Zeroize;

/// Longest key bcrypt consumes, including the terminating NUL
pub const MAX_KEY_LEN: usize = 72;

#[derive(Zeroize)]
#[zeroize(drop)]
pub struct SecureBytes(Vec<u8>);

impl SecureBytes {
    pub fn new(data: Vec<u8>) -> Self {
        let secure = Self(data);
        secure.lock_memory();
        secure
    }

    /// Build the bcrypt key for a password: its bytes followed by a NUL,
    /// cut to the first 72 bytes
    pub fn bcrypt_key(password: &[u8]) -> Self {
        let mut key = Vec::with_capacity(MAX_KEY_LEN);
        key.extend_from_slice(&password[..password.len().min(MAX_KEY_LEN)]);
        if key.len() < MAX_KEY_LEN {
            key.push(0);
        }
        Self::new(key)
    }

    /// Lock memory to prevent swapping (best effort, may fail without privileges)
    #[cfg(unix)]
    fn lock_memory(&self) {
        if self.0.is_empty() {
            return;
        }
        unsafe {
            libc::mlock(self.0.as_ptr() as *const libc::c_void, self.0.len());
        }
    }

    #[cfg(not(unix))]
    fn lock_memory(&self) {}

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Deref for SecureBytes {
    type Target = [u8];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

// Never print key material
impl std::fmt::Debug for SecureBytes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecureBytes")
            .field("len", &self.0.len())
            .field("data", &"[REDACTED]")
            .finish()
    }
}
