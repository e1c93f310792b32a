//! Password storage in the OS keychain.
//!
//! Passwords are keyed by identity provider name under a single service, so
//! every app that shares a provider shares its password.

use keyring::Entry;
use secrecy::{ExposeSecret, SecretString};

/// Service name for keychain entries
const SERVICE_NAME: &str = "clisso";

#[derive(Debug, thiserror::Error)]
pub enum KeychainError {
    #[error("No password stored for provider '{0}'")]
    NotFound(String),

    #[error("Keychain error: {0}")]
    Backend(#[from] keyring::Error),
}

/// Get/set a password for a named provider identity.
pub trait SecretStore {
    fn get(&self, provider: &str) -> Result<SecretString, KeychainError>;
    fn set(&self, provider: &str, secret: &SecretString) -> Result<(), KeychainError>;
}

/// [`SecretStore`] backed by the platform keychain.
pub struct Keychain {
    service: String,
}

impl Keychain {
    pub fn new() -> Self {
        Self {
            service: SERVICE_NAME.to_string(),
        }
    }

    /// Create with custom service name (for testing)
    pub fn with_service(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
        }
    }
}

impl Default for Keychain {
    fn default() -> Self {
        Self::new()
    }
}

impl SecretStore for Keychain {
    fn get(&self, provider: &str) -> Result<SecretString, KeychainError> {
        let entry = Entry::new(&self.service, provider)?;
        match entry.get_password() {
            Ok(secret) => Ok(SecretString::new(secret)),
            Err(keyring::Error::NoEntry) => Err(KeychainError::NotFound(provider.to_string())),
            Err(e) => Err(KeychainError::Backend(e)),
        }
    }

    fn set(&self, provider: &str, secret: &SecretString) -> Result<(), KeychainError> {
        // keyring will overwrite existing entry
        let entry = Entry::new(&self.service, provider)?;
        entry.set_password(secret.expose_secret())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[ignore] // Requires actual keychain access
    fn test_keychain_roundtrip() {
        let keychain = Keychain::with_service("clisso-test");
        let secret = SecretString::new("hunter2".to_string());

        keychain.set("acme", &secret).unwrap();
        let read_back = keychain.get("acme").unwrap();
        assert_eq!(read_back.expose_secret(), "hunter2");

        Entry::new("clisso-test", "acme")
            .unwrap()
            .delete_credential()
            .unwrap();
        assert!(matches!(
            keychain.get("acme"),
            Err(KeychainError::NotFound(_))
        ));
    }
}
