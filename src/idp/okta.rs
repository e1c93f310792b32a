//! Okta: primary authentication (with TOTP MFA) → session token → app
//! SAMLResponse → STS.

use std::rc::Rc;

use quick_xml::events::Event;
use quick_xml::Reader;
use reqwest::blocking::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::json;

use super::saml;
use super::sts::{self, AssumeRoleRequest};
use super::{http, session_duration, IdentityExchange};
use crate::config::{AppConfig, ProviderConfig};
use crate::credentials::Credential;
use crate::error::{ClissoError, Result};
use crate::prompt::Prompter;

/// Factor types a typed code can satisfy, in order of preference.
const CODE_FACTORS: &[&str] = &["token:software:totp", "token:hardware", "token"];

pub struct Okta {
    prompter: Rc<dyn Prompter>,
}

impl Okta {
    pub fn new(prompter: Rc<dyn Prompter>) -> Self {
        Self { prompter }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AuthnResponse {
    status: String,
    session_token: Option<String>,
    state_token: Option<String>,
    #[serde(rename = "_embedded", default)]
    embedded: Embedded,
}

#[derive(Debug, Default, Deserialize)]
struct Embedded {
    #[serde(default)]
    factors: Vec<Factor>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Factor {
    factor_type: String,
    provider: String,
    #[serde(rename = "_links")]
    links: FactorLinks,
}

#[derive(Debug, Clone, Deserialize)]
struct FactorLinks {
    verify: Link,
}

#[derive(Debug, Clone, Deserialize)]
struct Link {
    href: String,
}

/// Where primary authentication left us.
#[derive(Debug)]
enum AuthnStep {
    Session(String),
    Mfa { state_token: String, factor: Factor },
}

fn classify(resp: AuthnResponse) -> Result<AuthnStep> {
    match resp.status.as_str() {
        "SUCCESS" => resp
            .session_token
            .filter(|t| !t.is_empty())
            .map(AuthnStep::Session)
            .ok_or_else(|| ClissoError::Exchange("Okta returned no session token".to_string())),
        "MFA_REQUIRED" | "MFA_CHALLENGE" => {
            let state_token = resp.state_token.ok_or_else(|| {
                ClissoError::Exchange("Okta requested MFA without a state token".to_string())
            })?;
            let factor = CODE_FACTORS
                .iter()
                .find_map(|kind| {
                    resp.embedded
                        .factors
                        .iter()
                        .find(|f| f.factor_type == *kind)
                })
                .cloned()
                .ok_or_else(|| {
                    let offered: Vec<&str> = resp
                        .embedded
                        .factors
                        .iter()
                        .map(|f| f.factor_type.as_str())
                        .collect();
                    ClissoError::Exchange(format!(
                        "no supported MFA factor enrolled (offered: {})",
                        offered.join(", ")
                    ))
                })?;
            Ok(AuthnStep::Mfa {
                state_token,
                factor,
            })
        }
        other => Err(ClissoError::Exchange(format!(
            "Okta authentication status {}",
            other
        ))),
    }
}

/// Pull the `SAMLResponse` form value out of an Okta app sign-in page.
fn extract_saml_response(html: &str) -> Option<String> {
    let name_at = html.find("name=\"SAMLResponse\"")?;
    let tag_start = html[..name_at].rfind('<')?;
    let tag_end = name_at + html[name_at..].find('>')? + 1;

    // The page is HTML, so only the <input> tag itself goes through the parser.
    let mut reader = Reader::from_str(&html[tag_start..tag_end]);
    let input = match reader.read_event().ok()? {
        Event::Start(e) | Event::Empty(e) => e,
        _ => return None,
    };
    let value = input
        .attributes()
        .flatten()
        .find(|a| a.key.as_ref() == b"value")
        .and_then(|a| a.unescape_value().ok().map(|v| v.into_owned()));
    value
}

impl Okta {
    fn authenticate(
        &self,
        client: &Client,
        base_url: &str,
        username: &str,
        password: &SecretString,
    ) -> Result<AuthnStep> {
        let resp = client
            .post(format!("{}/api/v1/authn", base_url))
            .header("Accept", "application/json")
            .json(&json!({
                "username": username,
                "password": password.expose_secret(),
            }))
            .send()
            .map_err(|e| http::send_error("authenticating with Okta", e))?;
        classify(http::read_json(resp, "authenticating with Okta")?)
    }

    fn verify_factor(&self, client: &Client, state_token: &str, factor: &Factor) -> Result<String> {
        let code = self
            .prompter
            .secret(&format!("Okta {} code", factor.provider.to_lowercase()))
            .map_err(|e| ClissoError::Prompt {
                what: "MFA code".to_string(),
                reason: e.to_string(),
            })?;

        let resp = client
            .post(&factor.links.verify.href)
            .header("Accept", "application/json")
            .json(&json!({
                "stateToken": state_token,
                "passCode": code.expose_secret(),
            }))
            .send()
            .map_err(|e| http::send_error("verifying MFA", e))?;

        match classify(http::read_json(resp, "verifying MFA")?)? {
            AuthnStep::Session(token) => Ok(token),
            AuthnStep::Mfa { .. } => Err(ClissoError::Exchange(
                "MFA verification was not accepted".to_string(),
            )),
        }
    }

    fn fetch_assertion(&self, client: &Client, app_url: &str, session_token: &str) -> Result<String> {
        let resp = client
            .get(app_url)
            .query(&[("onetimetoken", session_token)])
            .send()
            .map_err(|e| http::send_error("opening Okta app", e))?;
        let html = http::read_text(resp, "opening Okta app")?;
        extract_saml_response(&html).ok_or_else(|| {
            ClissoError::Exchange("Okta app page did not contain a SAMLResponse".to_string())
        })
    }
}

impl IdentityExchange for Okta {
    fn display_name(&self) -> &str {
        "Okta"
    }

    fn exchange(
        &self,
        app: &AppConfig,
        provider: &ProviderConfig,
        username: &str,
        password: &SecretString,
    ) -> Result<Credential> {
        let base_url = provider.require("base-url")?.trim_end_matches('/');
        let app_url = app.require("url")?;
        let duration = session_duration(app)?;
        let client = http::client()?;

        tracing::debug!(base_url, "authenticating with Okta");
        let session_token = match self.authenticate(&client, base_url, username, password)? {
            AuthnStep::Session(token) => token,
            AuthnStep::Mfa {
                state_token,
                factor,
            } => {
                tracing::debug!(factor = %factor.factor_type, "MFA required");
                self.verify_factor(&client, &state_token, &factor)?
            }
        };

        let assertion = self.fetch_assertion(&client, app_url, &session_token)?;
        let granted = saml::roles(&saml::decode_assertion(&assertion)?)?;
        let role = saml::select_role(&granted, app.attr("role-arn"))?;

        sts::assume_role_with_saml(
            &client,
            &AssumeRoleRequest {
                role_arn: &role.role_arn,
                principal_arn: &role.principal_arn,
                assertion: &assertion,
                duration_seconds: duration,
            },
        )
    }
}
