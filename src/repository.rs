//! The pluggable persistence seam (§6). A host implements this trait once,
//! backed by whatever store it likes; the core never opens a connection or
//! assumes a schema.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::CoreError;
use crate::model::{Client, Scope, Token};

/// Attributes needed to create a `Token` row, kept separate from `Token`
/// itself so the repository — not the caller — assigns nothing beyond
/// what's passed in (no hidden defaulting).
#[derive(Debug, Clone)]
pub struct NewToken {
    pub value: String,
    pub refresh_token: Option<String>,
    pub token_type: crate::model::TokenType,
    pub client_id: Uuid,
    pub sub: Option<String>,
    pub redirect_uri: Option<String>,
    pub scope: String,
    pub state: Option<String>,
    pub expires_at: i64,
    pub code_challenge_hash: Option<String>,
    pub code_challenge_method: Option<crate::model::CodeChallengeMethod>,
}

/// How a `Token` should be looked up — by its own value, by its
/// refresh-token value, or (for codes) the same `value` field reused as
/// the code string (§3 models codes and access tokens as the same entity).
#[derive(Debug, Clone, Copy)]
pub enum TokenLookup<'a> {
    Value(&'a str),
    RefreshToken(&'a str),
}

/// The single pluggable persistence trait the core depends on (§6).
///
/// Implementations MUST make `revoke_token` a compare-and-swap on
/// `revoked_at IS NULL` and report whether *this* call performed the
/// revocation — see §9 "Single-use code exchange".
#[async_trait]
pub trait Repository: Send + Sync {
    async fn get_client(&self, id: Uuid) -> Result<Option<Client>, CoreError>;

    async fn create_token(&self, attrs: NewToken) -> Result<Token, CoreError>;

    async fn get_token(&self, lookup: TokenLookup<'_>) -> Result<Option<Token>, CoreError>;

    /// Revoke a token by value. Returns `true` iff this call is the one
    /// that transitioned it from not-revoked to revoked (idempotent: a
    /// second caller observes `false`, never an error).
    async fn revoke_token(&self, value: &str, now: i64) -> Result<bool, CoreError>;

    /// All globally-public scopes (§4.3).
    async fn public_scopes(&self) -> Result<Vec<Scope>, CoreError>;
}
