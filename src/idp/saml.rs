//! Reading AWS role grants out of a SAML assertion.
//!
//! The assertion is only inspected, never validated: AWS verifies the
//! signature when it is presented to STS.

use base64::Engine;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::{ClissoError, Result};

const ROLE_ATTRIBUTE: &str = "https://aws.amazon.com/SAML/Attributes/Role";

/// One `principal,role` pair granted by the assertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SamlRole {
    pub principal_arn: String,
    pub role_arn: String,
}

/// Decode a base64 `SAMLResponse` into its XML text.
pub fn decode_assertion(encoded: &str) -> Result<String> {
    let compact: String = encoded.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(compact.as_bytes())
        .map_err(|e| ClissoError::Exchange(format!("decoding SAML assertion: {}", e)))?;
    String::from_utf8(bytes)
        .map_err(|e| ClissoError::Exchange(format!("decoding SAML assertion: {}", e)))
}

/// All role grants in the AWS Role attribute of `assertion_xml`.
pub fn roles(assertion_xml: &str) -> Result<Vec<SamlRole>> {
    let mut reader = Reader::from_str(assertion_xml);
    reader.config_mut().trim_text(true);

    let mut in_role_attribute = false;
    // Text collected so far for the AttributeValue being read.
    let mut value: Option<String> = None;
    let mut roles = Vec::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"Attribute" => in_role_attribute = has_name(&e, ROLE_ATTRIBUTE),
                b"AttributeValue" if in_role_attribute => value = Some(String::new()),
                _ => {}
            },
            Ok(Event::Text(e)) => {
                if let Some(value) = value.as_mut() {
                    value.push_str(&e.unescape().map_err(parse_error)?);
                }
            }
            Ok(Event::CData(e)) => {
                if let Some(value) = value.as_mut() {
                    value.push_str(&String::from_utf8_lossy(&e));
                }
            }
            Ok(Event::End(e)) => match e.local_name().as_ref() {
                b"AttributeValue" => {
                    if let Some(value) = value.take() {
                        roles.extend(parse_role_pair(&value));
                    }
                }
                b"Attribute" => in_role_attribute = false,
                _ => {}
            },
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => return Err(parse_error(e)),
        }
    }
    Ok(roles)
}

fn has_name(element: &BytesStart<'_>, name: &str) -> bool {
    let found = element
        .attributes()
        .flatten()
        .any(|a| a.key.as_ref() == b"Name" && a.unescape_value().is_ok_and(|v| v == name));
    found
}

fn parse_error(e: quick_xml::Error) -> ClissoError {
    ClissoError::Exchange(format!("parsing SAML assertion: {}", e))
}

/// Choose the role to assume: the one matching `wanted`, or the only one granted.
pub fn select_role<'a>(roles: &'a [SamlRole], wanted: Option<&str>) -> Result<&'a SamlRole> {
    if let Some(wanted) = wanted {
        return roles.iter().find(|r| r.role_arn == wanted).ok_or_else(|| {
            ClissoError::Exchange(format!(
                "role '{}' is not granted by the SAML assertion",
                wanted
            ))
        });
    }
    match roles {
        [] => Err(ClissoError::Exchange(
            "SAML assertion grants no AWS roles".to_string(),
        )),
        [only] => Ok(only),
        many => {
            let names: Vec<&str> = many.iter().map(|r| r.role_arn.as_str()).collect();
            Err(ClissoError::Exchange(format!(
                "SAML assertion grants several roles, set 'role-arn' on the app to one of: {}",
                names.join(", ")
            )))
        }
    }
}

fn parse_role_pair(value: &str) -> Option<SamlRole> {
    let (a, b) = value.split_once(',')?;
    let (a, b) = (a.trim(), b.trim());
    let (principal, role) = if a.contains(":saml-provider/") {
        (a, b)
    } else if b.contains(":saml-provider/") {
        (b, a)
    } else {
        return None;
    };
    Some(SamlRole {
        principal_arn: principal.to_string(),
        role_arn: role.to_string(),
    })
}

#[cfg(test)]
pub(crate) const SAMPLE_ASSERTION: &str = r#"<saml2p:Response xmlns:saml2p="urn:oasis:names:tc:SAML:2.0:protocol">
<saml2:Assertion xmlns:saml2="urn:oasis:names:tc:SAML:2.0:assertion">
<saml2:AttributeStatement>
<saml2:Attribute Name="https://aws.amazon.com/SAML/Attributes/Role" NameFormat="urn:oasis:names:tc:SAML:2.0:attrname-format:uri">
<saml2:AttributeValue xsi:type="xs:string">arn:aws:iam::123456789012:saml-provider/Okta,arn:aws:iam::123456789012:role/Admin</saml2:AttributeValue>
<saml2:AttributeValue xsi:type="xs:string">arn:aws:iam::123456789012:role/ReadOnly,arn:aws:iam::123456789012:saml-provider/Okta</saml2:AttributeValue>
</saml2:Attribute>
<saml2:Attribute Name="https://aws.amazon.com/SAML/Attributes/RoleSessionName">
<saml2:AttributeValue xsi:type="xs:string">jdoe@example.com</saml2:AttributeValue>
</saml2:Attribute>
</saml2:AttributeStatement>
</saml2:Assertion>
</saml2p:Response>"#;
