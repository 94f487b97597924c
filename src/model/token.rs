use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Discriminates the two roles a `Token` row can play (§3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenType {
    Code,
    AccessToken,
}

/// The PKCE transform recorded against an authorization code (§3, §4.4.1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum CodeChallengeMethod {
    Plain,
    S256,
}

impl CodeChallengeMethod {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "plain" => Some(Self::Plain),
            "S256" => Some(Self::S256),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Plain => "plain",
            Self::S256 => "S256",
        }
    }
}

/// The single entity backing both authorization codes and access tokens,
/// discriminated by `token_type` (§3).
///
/// Invariant: a `Token` with `token_type = Code` has `Some` `redirect_uri`
/// and `Some` `sub`. This is enforced by construction in `TokenService`
/// rather than at the type level, matching the source's single-table
/// modeling while keeping the constructors the only place that can violate it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub value: String,
    pub refresh_token: Option<String>,
    pub token_type: TokenType,
    pub client_id: Uuid,
    pub sub: Option<String>,
    pub redirect_uri: Option<String>,
    pub scope: String,
    pub state: Option<String>,
    pub expires_at: i64,
    pub revoked_at: Option<i64>,
    pub code_challenge_hash: Option<String>,
    pub code_challenge_method: Option<CodeChallengeMethod>,
}

impl Token {
    /// Active iff not revoked and not expired (§3).
    pub fn is_active(&self, now: i64) -> bool {
        self.revoked_at.is_none() && self.expires_at > now
    }

    /// A code is consumable iff active, belongs to the same client, and
    /// carries the same `redirect_uri` as the token request (§3).
    pub fn is_consumable_code(&self, now: i64, client_id: Uuid, redirect_uri: &str) -> bool {
        self.token_type == TokenType::Code
            && self.is_active(now)
            && self.client_id == client_id
            && self.redirect_uri.as_deref() == Some(redirect_uri)
    }
}
