use thiserror::Error;

pub type Result<T> = std::result::Result<T, CredentialError>;

#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("Malformed password hash: {0}")]
    MalformedHash(String),

    #[error("Unsupported cost factor {0} (supported range is 4-31)")]
    UnsupportedCost(u32),

    #[error("Secure random source unavailable: {0}")]
    EntropyUnavailable(String),

    #[error("Password must not contain NUL bytes")]
    PasswordContainsNul,

    #[error("Account '{0}' not found")]
    AccountNotFound(String),

    #[error("Account '{0}' already exists")]
    AccountAlreadyExists(String),

    #[error("Invalid password")]
    InvalidPassword,

    #[error("Password too short (minimum {0} characters)")]
    PasswordTooShort(usize),

    #[error("Passwords do not match")]
    PasswordMismatch,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CredentialError {
    /// True when the stored credential itself is broken and an operator has
    /// to look at it, as opposed to a user typing the wrong password.
    pub fn is_integrity_failure(&self) -> bool {
        matches!(self, Self::MalformedHash(_) | Self::UnsupportedCost(_))
    }
}
