//! OneLogin: API credentials → access token → SAML assertion (with OTP MFA) → STS.

use std::fmt;
use std::rc::Rc;

use reqwest::blocking::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::json;

use super::sts::{self, AssumeRoleRequest};
use super::{http, session_duration, IdentityExchange};
use crate::config::{AppConfig, ProviderConfig};
use crate::credentials::Credential;
use crate::error::{ClissoError, Result};
use crate::prompt::Prompter;

const DEFAULT_REGION: &str = "us";

pub struct OneLogin {
    prompter: Rc<dyn Prompter>,
}

impl OneLogin {
    pub fn new(prompter: Rc<dyn Prompter>) -> Self {
        Self { prompter }
    }
}

/// Typed view of the OneLogin-specific app and provider attributes.
struct Settings<'a> {
    client_id: &'a str,
    client_secret: &'a str,
    subdomain: &'a str,
    region: &'a str,
    app_id: &'a str,
    principal_arn: &'a str,
    role_arn: &'a str,
    duration: u32,
}

impl<'a> Settings<'a> {
    fn from_config(app: &'a AppConfig, provider: &'a ProviderConfig) -> Result<Self> {
        Ok(Self {
            client_id: provider.require("client-id")?,
            client_secret: provider.require("client-secret")?,
            subdomain: provider.require("subdomain")?,
            region: provider.attr("region").unwrap_or(DEFAULT_REGION),
            app_id: app.require("app-id")?,
            principal_arn: app.require("principal-arn")?,
            role_arn: app.require("role-arn")?,
            duration: session_duration(app)?,
        })
    }

    fn api_url(&self, path: &str) -> String {
        format!("https://api.{}.onelogin.com{}", self.region, path)
    }
}

impl fmt::Debug for Settings<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("subdomain", &self.subdomain)
            .field("region", &self.region)
            .field("app_id", &self.app_id)
            .field("principal_arn", &self.principal_arn)
            .field("role_arn", &self.role_arn)
            .field("duration", &self.duration)
            .finish()
    }
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct AssertionResponse {
    data: Option<String>,
    message: Option<String>,
    state_token: Option<String>,
    #[serde(default)]
    devices: Vec<Device>,
    callback_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct Device {
    device_id: u64,
    device_type: String,
}

/// What the saml_assertion endpoint asked for next.
#[derive(Debug)]
enum AssertionStep {
    Assertion(String),
    Mfa {
        state_token: String,
        devices: Vec<Device>,
        callback_url: Option<String>,
    },
}

fn classify(resp: AssertionResponse) -> Result<AssertionStep> {
    if let Some(data) = resp.data.filter(|d| !d.is_empty()) {
        return Ok(AssertionStep::Assertion(data));
    }
    match resp.state_token {
        Some(state_token) if !resp.devices.is_empty() => Ok(AssertionStep::Mfa {
            state_token,
            devices: resp.devices,
            callback_url: resp.callback_url,
        }),
        Some(_) => Err(ClissoError::Exchange(
            "MFA is required but no MFA device is registered".to_string(),
        )),
        None => Err(ClissoError::Exchange(format!(
            "no SAML assertion returned: {}",
            resp.message.unwrap_or_else(|| "unknown reason".to_string())
        ))),
    }
}

impl OneLogin {
    fn access_token(&self, client: &Client, settings: &Settings<'_>) -> Result<String> {
        let resp = client
            .post(settings.api_url("/auth/oauth2/v2/token"))
            .header(
                "Authorization",
                format!(
                    "client_id:{}, client_secret:{}",
                    settings.client_id, settings.client_secret
                ),
            )
            .json(&json!({ "grant_type": "client_credentials" }))
            .send()
            .map_err(|e| http::send_error("generating access token", e))?;
        let token: TokenResponse = http::read_json(resp, "generating access token")?;
        Ok(token.access_token)
    }

    fn request_assertion(
        &self,
        client: &Client,
        settings: &Settings<'_>,
        token: &str,
        username: &str,
        password: &SecretString,
    ) -> Result<AssertionStep> {
        let resp = client
            .post(settings.api_url("/api/2/saml_assertion"))
            .header("Authorization", format!("bearer:{}", token))
            .json(&json!({
                "username_or_email": username,
                "password": password.expose_secret(),
                "app_id": settings.app_id,
                "subdomain": settings.subdomain,
            }))
            .send()
            .map_err(|e| http::send_error("generating SAML assertion", e))?;
        classify(http::read_json(resp, "generating SAML assertion")?)
    }

    fn verify_factor(
        &self,
        client: &Client,
        settings: &Settings<'_>,
        token: &str,
        state_token: &str,
        devices: &[Device],
        callback_url: Option<&str>,
    ) -> Result<String> {
        let device = self.choose_device(devices)?;
        let otp = self
            .prompter
            .secret(&format!("{} code", device.device_type))
            .map_err(|e| ClissoError::Prompt {
                what: "MFA code".to_string(),
                reason: e.to_string(),
            })?;

        let url = callback_url
            .map(str::to_string)
            .unwrap_or_else(|| settings.api_url("/api/2/saml_assertion/verify_factor"));
        let resp = client
            .post(url)
            .header("Authorization", format!("bearer:{}", token))
            .json(&json!({
                "app_id": settings.app_id,
                "device_id": device.device_id.to_string(),
                "state_token": state_token,
                "otp_token": otp.expose_secret(),
                "do_not_notify": true,
            }))
            .send()
            .map_err(|e| http::send_error("verifying MFA", e))?;

        match classify(http::read_json(resp, "verifying MFA")?)? {
            AssertionStep::Assertion(data) => Ok(data),
            AssertionStep::Mfa { .. } => Err(ClissoError::Exchange(
                "MFA verification did not return an assertion".to_string(),
            )),
        }
    }

    fn choose_device<'d>(&self, devices: &'d [Device]) -> Result<&'d Device> {
        if let [only] = devices {
            return Ok(only);
        }
        let menu: Vec<String> = devices
            .iter()
            .enumerate()
            .map(|(i, d)| format!("[{}] {}", i + 1, d.device_type))
            .collect();
        let answer = self
            .prompter
            .input(&format!("MFA device {}", menu.join(" ")))
            .map_err(|e| ClissoError::Prompt {
                what: "MFA device".to_string(),
                reason: e.to_string(),
            })?;
        answer
            .trim()
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|i| devices.get(i))
            .ok_or_else(|| ClissoError::Exchange(format!("invalid MFA device choice '{}'", answer)))
    }
}

impl IdentityExchange for OneLogin {
    fn display_name(&self) -> &str {
        "OneLogin"
    }

    fn exchange(
        &self,
        app: &AppConfig,
        provider: &ProviderConfig,
        username: &str,
        password: &SecretString,
    ) -> Result<Credential> {
        let settings = Settings::from_config(app, provider)?;
        let client = http::client()?;

        tracing::debug!(region = settings.region, "requesting OneLogin access token");
        let token = self.access_token(&client, &settings)?;

        tracing::debug!(app_id = settings.app_id, "requesting SAML assertion");
        let assertion = match self.request_assertion(&client, &settings, &token, username, password)? {
            AssertionStep::Assertion(data) => data,
            AssertionStep::Mfa {
                state_token,
                devices,
                callback_url,
            } => {
                tracing::debug!(devices = devices.len(), "MFA required");
                self.verify_factor(
                    &client,
                    &settings,
                    &token,
                    &state_token,
                    &devices,
                    callback_url.as_deref(),
                )?
            }
        };

        sts::assume_role_with_saml(
            &client,
            &AssumeRoleRequest {
                role_arn: settings.role_arn,
                principal_arn: settings.principal_arn,
                assertion: &assertion,
                duration_seconds: settings.duration,
            },
        )
    }
}
