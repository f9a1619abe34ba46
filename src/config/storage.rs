//! On-disk account and settings storage
//!
//! Layout of the data directory:
//! - `accounts.json`: every account with its encoded bcrypt hash
//! - `settings.json`: optional, see [`Settings`]

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info};

use crate::error::{CredentialError, Result};

use super::{AccountList, Settings};

const ACCOUNTS_FILE: &str = "accounts.json";
const SETTINGS_FILE: &str = "settings.json";
const DATA_DIR: &str = "data";

/// Environment variable overriding the data directory
pub const DATA_DIR_ENV: &str = "ESPORTS_DATA_DIR";

/// Directory of the running executable
pub fn get_exe_dir() -> Result<PathBuf> {
    let exe_path = std::env::current_exe()?;

    exe_path
        .parent()
        .map(|p| p.to_path_buf())
        .ok_or_else(|| CredentialError::InvalidConfig("cannot determine executable directory".into()))
}

/// Resolve the data directory: explicit path, then `ESPORTS_DATA_DIR`,
/// then `data/` next to the executable
pub fn resolve_data_dir(explicit: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(dir) = explicit {
        return Ok(dir);
    }
    if let Some(dir) = std::env::var_os(DATA_DIR_ENV).filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(dir));
    }
    Ok(get_exe_dir()?.join(DATA_DIR))
}

/// Account and settings files under one data directory
#[derive(Debug, Clone)]
pub struct AccountStore {
    dir: PathBuf,
}

impl AccountStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn accounts_path(&self) -> PathBuf {
        self.dir.join(ACCOUNTS_FILE)
    }

    fn settings_path(&self) -> PathBuf {
        self.dir.join(SETTINGS_FILE)
    }

    /// Load all accounts; a missing file is an empty list
    pub fn load_accounts(&self) -> Result<AccountList> {
        let path = self.accounts_path();
        if !path.exists() {
            debug!(path = %path.display(), "no account file yet");
            return Ok(AccountList::new());
        }

        let data = fs::read(&path)?;
        serde_json::from_slice(&data).map_err(|e| {
            CredentialError::InvalidConfig(format!("{} is corrupted: {}", path.display(), e))
        })
    }

    pub fn save_accounts(&self, accounts: &AccountList) -> Result<()> {
        let path = self.accounts_path();
        write_private(&path, accounts)?;
        info!(path = %path.display(), count = accounts.len(), "saved accounts");
        Ok(())
    }

    /// Load settings; a missing file means defaults
    pub fn load_settings(&self) -> Result<Settings> {
        let path = self.settings_path();
        if !path.exists() {
            return Ok(Settings::default());
        }

        let data = fs::read(&path)?;
        let settings: Settings = serde_json::from_slice(&data).map_err(|e| {
            CredentialError::InvalidConfig(format!("{} is corrupted: {}", path.display(), e))
        })?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn save_settings(&self, settings: &Settings) -> Result<()> {
        settings.validate()?;
        write_private(&self.settings_path(), settings)
    }
}

/// Write JSON to `path`, synced, readable only by the owner on Unix
fn write_private<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }

    let json = serde_json::to_vec_pretty(value)?;
    let mut file = File::create(path)?;
    file.write_all(&json)?;
    file.write_all(b"\n")?;
    file.sync_all()?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o600))?;
    }

    Ok(())
}
