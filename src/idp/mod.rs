//! Identity provider exchanges.
//!
//! Every provider type implements [`IdentityExchange`]: take the app and
//! provider records plus the user's credentials, return a short-lived cloud
//! credential. The acquisition workflow only ever sees the trait; it picks an
//! implementation from an [`ExchangeRegistry`] by the provider's `type` tag.

mod http;
pub mod okta;
pub mod onelogin;
pub mod saml;
pub mod sts;

use std::collections::BTreeMap;
use std::rc::Rc;

use secrecy::SecretString;

use crate::config::{AppConfig, ProviderConfig};
use crate::credentials::Credential;
use crate::error::Result;
use crate::prompt::Prompter;

/// Provider type tag for OneLogin.
pub const PROVIDER_ONELOGIN: &str = "onelogin";
/// Provider type tag for Okta.
pub const PROVIDER_OKTA: &str = "okta";

pub trait IdentityExchange {
    /// Name shown in prompts ("OneLogin username").
    fn display_name(&self) -> &str;

    /// Authenticate `username` at the identity provider and trade the
    /// resulting assertion for a cloud credential.
    fn exchange(
        &self,
        app: &AppConfig,
        provider: &ProviderConfig,
        username: &str,
        password: &SecretString,
    ) -> Result<Credential>;
}

/// Identity exchanges keyed by provider type tag.
#[derive(Default)]
pub struct ExchangeRegistry {
    exchanges: BTreeMap<String, Box<dyn IdentityExchange>>,
}

impl ExchangeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the OneLogin and Okta exchanges. `prompter` is used for
    /// MFA codes during the exchange.
    pub fn builtin(prompter: Rc<dyn Prompter>) -> Self {
        let mut registry = Self::new();
        registry.register(
            PROVIDER_ONELOGIN,
            Box::new(onelogin::OneLogin::new(prompter.clone())),
        );
        registry.register(PROVIDER_OKTA, Box::new(okta::Okta::new(prompter)));
        registry
    }

    /// Add or replace the exchange for `provider_type`.
    pub fn register(&mut self, provider_type: impl Into<String>, exchange: Box<dyn IdentityExchange>) {
        self.exchanges.insert(provider_type.into(), exchange);
    }

    pub fn get(&self, provider_type: &str) -> Option<&dyn IdentityExchange> {
        self.exchanges.get(provider_type).map(|e| e.as_ref())
    }

    pub fn provider_types(&self) -> impl Iterator<Item = &str> {
        self.exchanges.keys().map(|k| k.as_str())
    }
}

/// Requested session length in seconds: app `duration`, default one hour.
pub(crate) fn session_duration(app: &AppConfig) -> Result<u32> {
    match app.attr("duration") {
        None => Ok(3600),
        Some(raw) => raw.parse().map_err(|_| {
            crate::error::ClissoError::InvalidConfig(format!(
                "app '{}' has invalid duration '{}'",
                app.name, raw
            ))
        }),
    }
}
