pub mod profile;
pub mod shell;

use std::fmt;
use std::io::Write;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::config::paths;
use crate::error::{ClissoError, Result};

/// Default profile file, used when neither the command line nor the config names one.
pub const DEFAULT_CREDENTIALS_PATH: &str = "~/.aws/credentials";

/// A short-lived cloud credential returned by an identity exchange.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct Credential {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub session_token: String,
    #[zeroize(skip)]
    pub expiration: DateTime<Utc>,
}

impl Credential {
    /// True when every key field carries material.
    pub fn is_complete(&self) -> bool {
        !self.access_key_id.is_empty()
            && !self.secret_access_key.is_empty()
            && !self.session_token.is_empty()
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"[REDACTED]")
            .field("session_token", &"[REDACTED]")
            .field("expiration", &self.expiration)
            .finish()
    }
}

/// Where a credential goes. Exactly one per invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    /// Print shell assignments; `windows` selects `set` over `export`.
    Shell { windows: bool },
    /// Update the profile file at this (unexpanded) path.
    File(String),
}

impl Delivery {
    /// Pick the sink from flag and config precedence:
    /// `--shell`, then `--write-to-file`, then the configured path, then the default.
    pub fn select(shell: bool, write_to_file: Option<&str>, configured: Option<&str>) -> Self {
        if shell {
            return Delivery::Shell {
                windows: cfg!(windows),
            };
        }
        let path = write_to_file
            .filter(|p| !p.is_empty())
            .or(configured.filter(|p| !p.is_empty()))
            .unwrap_or(DEFAULT_CREDENTIALS_PATH);
        Delivery::File(path.to_string())
    }
}

/// What `deliver` did, for the caller to report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivered {
    Shell,
    File(PathBuf),
}

/// Hand `credential` to its sink. Shell output goes to `out`; file mode never touches `out`.
pub fn deliver(
    credential: &Credential,
    app: &str,
    delivery: &Delivery,
    out: &mut dyn Write,
) -> Result<Delivered> {
    match delivery {
        Delivery::Shell { windows } => {
            shell::write_to_shell(credential, *windows, out)
                .map_err(|e| ClissoError::Delivery(format!("writing credentials to shell: {}", e)))?;
            Ok(Delivered::Shell)
        }
        Delivery::File(raw) => {
            let path = paths::expand_tilde(raw).map_err(|e| {
                ClissoError::Delivery(format!("expanding credentials file path: {}", e))
            })?;
            profile::write_credential(credential, &path, app)
                .map_err(|e| ClissoError::Delivery(format!("writing credentials to file: {}", e)))?;
            tracing::debug!(path = %path.display(), section = app, "profile section updated");
            Ok(Delivered::File(path))
        }
    }
}

#[cfg(test)]
pub(crate) fn sample_credential() -> Credential {
    Credential {
        access_key_id: "ASIAEXAMPLE".to_string(),
        secret_access_key: "secret/key+value".to_string(),
        session_token: "token==".to_string(),
        expiration: DateTime::parse_from_rfc3339("2026-10-16T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc),
    }
}
