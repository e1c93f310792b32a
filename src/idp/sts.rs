use std::collections::HashMap;

use chrono::{DateTime, Utc};
use quick_xml::events::Event;
use quick_xml::Reader;
use reqwest::blocking::Client;

use super::http;
use crate::credentials::Credential;
use crate::error::{ClissoError, Result};

const STS_ENDPOINT: &str = "https://sts.amazonaws.com/";
const STS_API_VERSION: &str = "2011-06-15";

/// Inputs for an `AssumeRoleWithSAML` call.
pub struct AssumeRoleRequest<'a> {
    pub role_arn: &'a str,
    pub principal_arn: &'a str,
    /// Base64 `SAMLResponse` as issued by the identity provider.
    pub assertion: &'a str,
    pub duration_seconds: u32,
}

/// Trade a SAML assertion for temporary credentials. The call is unsigned;
/// the assertion is the proof of identity.
pub fn assume_role_with_saml(client: &Client, request: &AssumeRoleRequest<'_>) -> Result<Credential> {
    let duration = request.duration_seconds.to_string();
    let params = [
        ("Action", "AssumeRoleWithSAML"),
        ("Version", STS_API_VERSION),
        ("RoleArn", request.role_arn),
        ("PrincipalArn", request.principal_arn),
        ("SAMLAssertion", request.assertion),
        ("DurationSeconds", duration.as_str()),
    ];

    tracing::debug!(role = request.role_arn, "calling AssumeRoleWithSAML");
    let resp = client
        .post(STS_ENDPOINT)
        .form(&params)
        .send()
        .map_err(|e| http::send_error("assuming role", e))?;

    let status = resp.status();
    let body = resp
        .text()
        .map_err(|e| http::send_error("assuming role", e))?;
    if !status.is_success() {
        let message = leaf_texts(&body)
            .ok()
            .and_then(|mut texts| texts.remove("Message"))
            .unwrap_or_else(|| status.to_string());
        return Err(ClissoError::Exchange(format!("assuming role: {}", message)));
    }
    parse_credentials(&body)
}

/// Read the `<Credentials>` block of an `AssumeRoleWithSAMLResponse`.
pub fn parse_credentials(xml: &str) -> Result<Credential> {
    let texts = leaf_texts(xml)?;
    let field = |name: &str| {
        texts
            .get(name)
            .filter(|v| !v.is_empty())
            .cloned()
            .ok_or_else(|| ClissoError::Exchange(format!("STS response is missing {}", name)))
    };

    let expiration = field("Expiration")?;
    let expiration = DateTime::parse_from_rfc3339(&expiration)
        .map_err(|e| ClissoError::Exchange(format!("STS expiration '{}': {}", expiration, e)))?
        .with_timezone(&Utc);

    Ok(Credential {
        access_key_id: field("AccessKeyId")?,
        secret_access_key: field("SecretAccessKey")?,
        session_token: field("SessionToken")?,
        expiration,
    })
}

/// Text of every element that holds text, keyed by local name. The first
/// occurrence of a name wins.
fn leaf_texts(xml: &str) -> Result<HashMap<String, String>> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut current: Option<String> = None;
    let mut texts = HashMap::new();
    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                current = Some(String::from_utf8_lossy(e.local_name().as_ref()).into_owned());
            }
            Ok(Event::Text(e)) => {
                if let Some(name) = current.take() {
                    let text = e.unescape().map_err(parse_error)?.into_owned();
                    texts.entry(name).or_insert(text);
                }
            }
            Ok(Event::End(_)) => current = None,
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => return Err(parse_error(e)),
        }
    }
    Ok(texts)
}

fn parse_error(e: quick_xml::Error) -> ClissoError {
    ClissoError::Exchange(format!("parsing STS response: {}", e))
}
