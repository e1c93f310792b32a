pub mod paths;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{ClissoError, Result};

const CONFIG_FILENAME: &str = ".clisso.yaml";

/// Configuration file format (~/.clisso.yaml).
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub global: GlobalConfig,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub apps: BTreeMap<String, AppEntry>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub providers: BTreeMap<String, ProviderEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub struct GlobalConfig {
    /// Profile file credentials are written to (supports ~ expansion)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credentials_path: Option<String>,
    /// App used by `get` when none is given on the command line
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_app: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    /// Provider-specific settings (app-id, role-arn, url, ...)
    #[serde(flatten)]
    pub attributes: BTreeMap<String, serde_yaml::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ProviderEntry {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub provider_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// Provider-specific settings (client-id, subdomain, base-url, ...)
    #[serde(flatten)]
    pub attributes: BTreeMap<String, serde_yaml::Value>,
}

/// Resolved, read-only view of one app.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub name: String,
    pub provider: String,
    pub attributes: BTreeMap<String, String>,
}

/// Resolved, read-only view of one identity provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderConfig {
    pub name: String,
    pub provider_type: String,
    /// Default username; empty means "ask".
    pub username: String,
    pub attributes: BTreeMap<String, String>,
}

impl AppConfig {
    pub fn attr(&self, key: &str) -> Option<&str> {
        non_empty_attr(&self.attributes, key)
    }

    /// Look up an attribute the identity provider cannot work without.
    pub fn require(&self, key: &str) -> Result<&str> {
        self.attr(key).ok_or_else(|| {
            ClissoError::InvalidConfig(format!("app '{}' is missing '{}'", self.name, key))
        })
    }
}

impl ProviderConfig {
    pub fn attr(&self, key: &str) -> Option<&str> {
        non_empty_attr(&self.attributes, key)
    }

    pub fn require(&self, key: &str) -> Result<&str> {
        self.attr(key).ok_or_else(|| {
            ClissoError::InvalidConfig(format!("provider '{}' is missing '{}'", self.name, key))
        })
    }
}

fn non_empty_attr<'a>(attributes: &'a BTreeMap<String, String>, key: &str) -> Option<&'a str> {
    attributes
        .get(key)
        .map(|v| v.as_str())
        .filter(|v| !v.is_empty())
}

/// Lookups the acquisition workflow performs against static configuration.
///
/// Every `Option` lookup treats an empty value the same as a missing one.
pub trait ConfigStore {
    fn selected_app(&self) -> Option<String>;
    fn provider_for_app(&self, app: &str) -> Option<String>;
    fn type_for_provider(&self, provider: &str) -> Option<String>;
    fn app(&self, name: &str) -> Result<AppConfig>;
    fn provider(&self, name: &str) -> Result<ProviderConfig>;
    fn credentials_path(&self) -> Option<String>;
}

impl Config {
    /// Load config from a path. Returns default config if file doesn't exist.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Config = serde_yaml::from_str(&content)
            .map_err(|e| ClissoError::InvalidConfig(format!("{}: {}", path.display(), e)))?;
        Ok(config)
    }

    /// Save config to a path.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content =
            serde_yaml::to_string(self).map_err(|e| ClissoError::Serialization(e.to_string()))?;
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        fs::write(path, content)?;
        Ok(())
    }

    /// Mark `app` as the default for `get`. The app must exist.
    pub fn select_app(&mut self, app: &str) -> Result<()> {
        if !self.apps.contains_key(app) {
            return Err(ClissoError::AppNotFound(app.to_string()));
        }
        self.global.selected_app = Some(app.to_string());
        Ok(())
    }
}

/// Default config file path (~/.clisso.yaml).
pub fn default_config_path() -> Result<PathBuf> {
    Ok(paths::home_dir()?.join(CONFIG_FILENAME))
}

impl ConfigStore for Config {
    fn selected_app(&self) -> Option<String> {
        self.global.selected_app.clone().filter(|s| !s.is_empty())
    }

    fn provider_for_app(&self, app: &str) -> Option<String> {
        self.apps
            .get(app)
            .and_then(|a| a.provider.clone())
            .filter(|s| !s.is_empty())
    }

    fn type_for_provider(&self, provider: &str) -> Option<String> {
        self.providers
            .get(provider)
            .and_then(|p| p.provider_type.clone())
            .filter(|s| !s.is_empty())
    }

    fn app(&self, name: &str) -> Result<AppConfig> {
        let entry = self
            .apps
            .get(name)
            .ok_or_else(|| ClissoError::AppNotFound(name.to_string()))?;
        let provider = self
            .provider_for_app(name)
            .ok_or_else(|| ClissoError::ProviderNotConfigured(name.to_string()))?;
        Ok(AppConfig {
            name: name.to_string(),
            provider,
            attributes: scalar_attributes(&entry.attributes),
        })
    }

    fn provider(&self, name: &str) -> Result<ProviderConfig> {
        let entry = self.providers.get(name).ok_or_else(|| {
            ClissoError::InvalidConfig(format!("provider '{}' is not configured", name))
        })?;
        let provider_type = self
            .type_for_provider(name)
            .ok_or_else(|| ClissoError::ProviderTypeNotConfigured(name.to_string()))?;
        Ok(ProviderConfig {
            name: name.to_string(),
            provider_type,
            username: entry.username.clone().unwrap_or_default(),
            attributes: scalar_attributes(&entry.attributes),
        })
    }

    fn credentials_path(&self) -> Option<String> {
        self.global.credentials_path.clone().filter(|s| !s.is_empty())
    }
}

/// Flatten YAML scalars to strings. Nested maps and sequences are ignored.
fn scalar_attributes(raw: &BTreeMap<String, serde_yaml::Value>) -> BTreeMap<String, String> {
    raw.iter()
        .filter_map(|(key, value)| {
            let value = match value {
                serde_yaml::Value::String(s) => s.clone(),
                serde_yaml::Value::Number(n) => n.to_string(),
                serde_yaml::Value::Bool(b) => b.to_string(),
                _ => return None,
            };
            Some((key.clone(), value))
        })
        .collect()
}
