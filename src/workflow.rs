//! The credential-acquisition workflow behind `clisso get`.
//!
//! Resolve app → provider → provider type, settle username and password,
//! run the provider's identity exchange and hand the credential to its sink.
//! Every collaborator comes in through a trait so the whole flow runs against
//! fakes in tests; nothing here exits the process.

use std::io::Write;

use secrecy::SecretString;

use crate::config::{AppConfig, ConfigStore, ProviderConfig};
use crate::credentials::{self, Delivered, Delivery};
use crate::error::{ClissoError, Result};
use crate::idp::{ExchangeRegistry, IdentityExchange};
use crate::keychain::SecretStore;
use crate::prompt::Prompter;

/// Per-invocation settings for `get`.
#[derive(Debug, Clone, Default)]
pub struct GetOptions {
    /// App to fetch credentials for; `None` falls back to the selected app.
    pub app: Option<String>,
    /// Print shell assignments instead of writing the profile file.
    pub shell: bool,
    /// Profile file to write instead of the configured one.
    pub write_to_file: Option<String>,
    /// Prompt for the password and store it, skipping the keychain lookup.
    pub save_password: bool,
}

/// How the password for this invocation was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordSource {
    /// Read from the secret store.
    Stored,
    /// Typed by the user after the store lookup failed. The failure itself is
    /// not reported.
    FallbackPrompt,
    /// Typed by the user on `--save-password`; `persisted` is false when the
    /// store rejected it.
    Saved { persisted: bool },
}

/// Result of a successful `get`.
#[derive(Debug)]
pub struct Outcome {
    pub app: String,
    pub provider: String,
    pub password_source: PasswordSource,
    pub delivered: Delivered,
}

/// The workflow's collaborators.
pub struct Workflow<'a> {
    pub config: &'a dyn ConfigStore,
    pub secrets: &'a dyn SecretStore,
    pub prompter: &'a dyn Prompter,
    pub exchanges: &'a ExchangeRegistry,
    /// Receives non-fatal problems as they happen, before the run finishes.
    pub warn: &'a dyn Fn(&str),
}

/// App, provider and the exchange that serves them.
pub struct Resolved<'r> {
    pub app: AppConfig,
    pub provider: ProviderConfig,
    pub exchange: &'r dyn IdentityExchange,
}

impl<'a> Workflow<'a> {
    /// Fetch credentials for `opts.app` and deliver them. Shell output goes to `out`.
    pub fn get(&self, opts: &GetOptions, out: &mut dyn Write) -> Result<Outcome> {
        let resolved = self.resolve(opts.app.as_deref())?;
        let display = resolved.exchange.display_name();

        let username = self.username(&resolved.provider, display)?;
        let (password, password_source) =
            self.password(&resolved.provider.name, display, opts.save_password)?;

        tracing::debug!(
            app = %resolved.app.name,
            provider = %resolved.provider.name,
            "running identity exchange"
        );
        let credential =
            resolved
                .exchange
                .exchange(&resolved.app, &resolved.provider, &username, &password)?;
        drop(password);

        if !credential.is_complete() {
            return Err(ClissoError::Exchange(
                "identity provider returned an incomplete credential".to_string(),
            ));
        }

        let delivery = Delivery::select(
            opts.shell,
            opts.write_to_file.as_deref(),
            self.config.credentials_path().as_deref(),
        );
        let delivered = credentials::deliver(&credential, &resolved.app.name, &delivery, out)?;

        Ok(Outcome {
            app: resolved.app.name,
            provider: resolved.provider.name,
            password_source,
            delivered,
        })
    }

    /// Resolve `(App, Provider, exchange)` for `app`, or the selected app when `app` is empty.
    pub fn resolve(&self, app: Option<&str>) -> Result<Resolved<'a>> {
        let app = match app.filter(|a| !a.is_empty()) {
            Some(app) => app.to_string(),
            None => self.config.selected_app().ok_or(ClissoError::NoAppSpecified)?,
        };

        let provider = self
            .config
            .provider_for_app(&app)
            .ok_or_else(|| ClissoError::ProviderNotConfigured(app.clone()))?;
        let provider_type = self
            .config
            .type_for_provider(&provider)
            .ok_or_else(|| ClissoError::ProviderTypeNotConfigured(provider.clone()))?;
        let exchange = self.exchanges.get(&provider_type).ok_or_else(|| {
            ClissoError::UnsupportedProviderType {
                provider_type: provider_type.clone(),
                app: app.clone(),
            }
        })?;

        let app_config = self.config.app(&app).map_err(|e| {
            ClissoError::InvalidConfig(format!("reading config for app {}: {}", app, e))
        })?;
        let provider_config = self.config.provider(&provider).map_err(|e| {
            ClissoError::InvalidConfig(format!("reading provider config: {}", e))
        })?;

        tracing::debug!(%app, %provider, %provider_type, "resolved app");
        Ok(Resolved {
            app: app_config,
            provider: provider_config,
            exchange,
        })
    }

    /// The provider's default username, or one typed by the user.
    fn username(&self, provider: &ProviderConfig, display: &str) -> Result<String> {
        if !provider.username.is_empty() {
            return Ok(provider.username.clone());
        }
        self.prompter
            .input(&format!("{} username", display))
            .map_err(|e| ClissoError::Prompt {
                what: "username".to_string(),
                reason: e.to_string(),
            })
    }

    /// Settle the password: save-requested, stored, or prompted after a store miss.
    fn password(
        &self,
        provider: &str,
        display: &str,
        save_password: bool,
    ) -> Result<(SecretString, PasswordSource)> {
        if save_password {
            // Don't check the store, the user wants to replace what is there.
            let password = self.prompt_password(display)?;
            let persisted = match self.secrets.set(provider, &password) {
                Ok(()) => true,
                Err(e) => {
                    (self.warn)(&format!("Could not save password to keychain: {}", e));
                    false
                }
            };
            return Ok((password, PasswordSource::Saved { persisted }));
        }

        match self.secrets.get(provider) {
            Ok(password) => Ok((password, PasswordSource::Stored)),
            Err(e) => {
                // Fall back silently to the terminal.
                tracing::debug!(%provider, error = %e, "no usable stored password");
                let password = self.prompt_password(display)?;
                Ok((password, PasswordSource::FallbackPrompt))
            }
        }
    }

    fn prompt_password(&self, display: &str) -> Result<SecretString> {
        self.prompter
            .secret(&format!("{} password", display))
            .map_err(|e| ClissoError::Prompt {
                what: "password".to_string(),
                reason: e.to_string(),
            })
    }
}
