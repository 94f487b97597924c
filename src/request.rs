//! The typed grant requests the classifier/validator funnel every inbound
//! envelope into (§4.1, §9 "Polymorphic grant dispatch").
//!
//! Each variant carries only its own fields — no grant's params struct
//! grows an optional field for another grant's concern.

use std::collections::HashMap;

/// An HTTP-shaped envelope: three named parameter bags, header names
/// already lowercased by the caller (§4.1).
#[derive(Debug, Clone, Default)]
pub struct Envelope {
    pub body_params: HashMap<String, String>,
    pub query_params: HashMap<String, String>,
    pub req_headers: Vec<(String, String)>,
}

impl Envelope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_body(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.body_params.insert(key.into(), value.into());
        self
    }

    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query_params.insert(key.into(), value.into());
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.req_headers.push((name.into(), value.into()));
        self
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.req_headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthorizeKind {
    Code,
    Token,
    IdToken,
}

#[derive(Debug, Clone)]
pub struct AuthorizeParams {
    pub kind: AuthorizeKind,
    pub client_id: String,
    pub redirect_uri: String,
    pub scope: String,
    pub state: Option<String>,
    pub code_challenge: Option<String>,
    pub code_challenge_method: Option<String>,
}

#[derive(Debug, Clone)]
pub struct AuthorizationCodeParams {
    pub code: String,
    pub redirect_uri: String,
    pub code_verifier: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ClientCredentialsParams {
    pub scope: String,
}

#[derive(Debug, Clone)]
pub struct PasswordParams {
    pub username: String,
    pub password: String,
    pub scope: String,
}

#[derive(Debug, Clone)]
pub struct RefreshTokenParams {
    pub refresh_token: String,
    pub scope: Option<String>,
}

#[derive(Debug, Clone)]
pub enum TokenRequest {
    AuthorizationCode(AuthorizationCodeParams),
    ClientCredentials(ClientCredentialsParams),
    Password(PasswordParams),
    RefreshToken(RefreshTokenParams),
}

#[derive(Debug, Clone)]
pub struct IntrospectParams {
    pub token: String,
}

#[derive(Debug, Clone)]
pub struct RevokeParams {
    pub token: String,
    pub token_type_hint: Option<String>,
}

/// The dispatch-ready sum every envelope is classified into (§9).
#[derive(Debug, Clone)]
pub enum Request {
    Authorize(AuthorizeParams),
    Token(TokenRequest),
    Introspect(IntrospectParams),
    Userinfo,
    Revoke(RevokeParams),
}
