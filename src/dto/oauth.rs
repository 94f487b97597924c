//! Success projections returned alongside each `Outcome` variant (§4, §6).
//! These are the wire-shaped values a host renders as JSON/redirects; they
//! carry no repository or client internals beyond the named fields.

use serde::Serialize;

/// Success payload for an `/authorize` entry point — either a `"code"`
/// (authorization code grant, §4.4.1) or a `"token"` (implicit grant,
/// §4.4.6) response.
#[derive(Debug, Clone, Serialize)]
pub struct AuthorizeResponse {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub value: String,
    pub expires_in: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    /// Echoed back only for the authorization-code flow, so the client can
    /// round-trip-verify its own challenge; never read back from storage
    /// (§4.4.1: "it is not stored").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code_challenge: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code_challenge_method: Option<&'static str>,
}

/// Success payload for a `/token` entry point (§4.4.2-§4.4.5).
#[derive(Debug, Clone, Serialize)]
pub struct TokenResponse {
    pub token_type: &'static str,
    pub access_token: String,
    pub expires_in: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
}

impl TokenResponse {
    pub fn new(access_token: String, expires_in: i64, refresh_token: Option<String>) -> Self {
        Self {
            token_type: "bearer",
            access_token,
            expires_in,
            refresh_token,
        }
    }
}

/// The active/inactive projection returned by introspection (§4.6).
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum IntrospectionResponse {
    Active {
        active: bool,
        client_id: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        username: Option<String>,
        scope: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        sub: Option<String>,
        iat: i64,
        exp: i64,
        iss: &'static str,
    },
    Inactive {
        active: bool,
    },
}

impl IntrospectionResponse {
    pub fn inactive() -> Self {
        Self::Inactive { active: false }
    }
}
