use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

/// The canonical OAuth 2.0 grant types a `Client` may be registered for.
///
/// Requirement: §3 `supported_grant_types` ⊆ this set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrantType {
    AuthorizationCode,
    Implicit,
    Password,
    ClientCredentials,
    RefreshToken,
}

impl GrantType {
    pub fn as_str(&self) -> &'static str {
        match self {
            GrantType::AuthorizationCode => "authorization_code",
            GrantType::Implicit => "implicit",
            GrantType::Password => "password",
            GrantType::ClientCredentials => "client_credentials",
            GrantType::RefreshToken => "refresh_token",
        }
    }
}

/// An OAuth 2.0 client registered with the authorization server.
///
/// Created out-of-band by the host's admin flow; immutable for the
/// duration of any single request the core handles (§3).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Client {
    pub id: Uuid,
    #[serde(skip_serializing)]
    pub secret: String,
    pub redirect_uris: Vec<String>,
    pub pkce: bool,
    pub authorize_scope: bool,
    pub authorized_scopes: Vec<String>,
    pub supported_grant_types: HashSet<GrantType>,
    pub access_token_ttl: i64,
    pub authorization_code_ttl: i64,
    pub refresh_token_ttl: i64,
    pub id_token_ttl: i64,
}

impl Client {
    /// Exact-string match against the registered redirect URIs (§4.2, §4.4.1).
    pub fn has_redirect_uri(&self, uri: &str) -> bool {
        self.redirect_uris.iter().any(|u| u == uri)
    }

    /// Grant-support gate (§4.4.7).
    pub fn supports(&self, grant: GrantType) -> bool {
        self.supported_grant_types.contains(&grant)
    }

    /// Whether a scope name was explicitly authorized for this client (§4.3).
    pub fn authorizes_scope(&self, name: &str) -> bool {
        self.authorized_scopes.iter().any(|s| s == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> Client {
        Client {
            id: Uuid::new_v4(),
            secret: "hash".to_string(),
            redirect_uris: vec!["https://redirect.uri".to_string()],
            pkce: false,
            authorize_scope: false,
            authorized_scopes: vec!["public".to_string()],
            supported_grant_types: HashSet::from([GrantType::AuthorizationCode]),
            access_token_ttl: 3600,
            authorization_code_ttl: 60,
            refresh_token_ttl: 86400,
            id_token_ttl: 3600,
        }
    }

    #[test]
    fn redirect_uri_match_is_exact() {
        let c = client();
        assert!(c.has_redirect_uri("https://redirect.uri"));
        assert!(!c.has_redirect_uri("https://redirect.uri/"));
        assert!(!c.has_redirect_uri("https://redirect.uri?x=1"));
    }

    #[test]
    fn grant_support_gate() {
        let c = client();
        assert!(c.supports(GrantType::AuthorizationCode));
        assert!(!c.supports(GrantType::ClientCredentials));
    }
}
