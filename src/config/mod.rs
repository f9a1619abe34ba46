//! Configuration and account storage
//!
//! Handles:
//! - Account records (id, role, encoded password hash)
//! - Settings for new credentials
//! - JSON files in the data directory

mod account;
mod settings;
mod storage;

pub use account::{Account, AccountList, CredentialReader, CredentialWriter, Role};
pub use settings::Settings;
pub use storage::{get_exe_dir, resolve_data_dir, AccountStore, DATA_DIR_ENV};
