use anyhow::{Context, Result};
use keyring::Entry;

const SERVICE_NAME: &str = "scanview";

/// OS keychain storage for the login password.
///
/// Only the password lives here; the issued credential goes through
/// `Session`. This lets `login --remember` work across sessions without
/// ever writing the password to disk.
pub struct CredentialStore;

impl CredentialStore {
    fn entry(username: &str) -> Result<Entry> {
        Entry::new(SERVICE_NAME, username).context("Failed to open keyring entry")
    }

    /// Remember a password for a username in the OS keychain
    pub fn store(username: &str, password: &str) -> Result<()> {
        Self::entry(username)?
            .set_password(password)
            .context("Failed to store password in keychain")
    }

    /// Retrieve the remembered password for a username
    pub fn get_password(username: &str) -> Result<String> {
        Self::entry(username)?
            .get_password()
            .context("Failed to retrieve password from keychain")
    }

    /// Forget the remembered password for a username
    pub fn delete(username: &str) -> Result<()> {
        Self::entry(username)?
            .delete_credential()
            .context("Failed to delete password from keychain")
    }

    /// Whether a password is remembered for a username
    pub fn has_credentials(username: &str) -> bool {
        Self::entry(username)
            .map(|e| e.get_password().is_ok())
            .unwrap_or(false)
    }
}
