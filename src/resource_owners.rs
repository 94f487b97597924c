//! The pluggable resource-owner directory (§6). Identity lives entirely
//! outside the core; this trait is the only way the core ever learns
//! about a resource owner.

use async_trait::async_trait;

use crate::model::ResourceOwner;

/// How a resource owner may be looked up (§4.4.4 for password grant,
/// §4.6 for userinfo).
pub enum ResourceOwnerLookup<'a> {
    Sub(&'a str),
    Credentials { username: &'a str, password: &'a str },
}

/// The external identity provider (§6).
#[async_trait]
pub trait ResourceOwners: Send + Sync {
    async fn get_by(&self, lookup: ResourceOwnerLookup<'_>) -> Result<ResourceOwner, ()>;

    /// Scopes this resource owner is authorized to grant, beyond whatever
    /// is globally public (§4.3).
    async fn authorized_scopes(&self, owner: &ResourceOwner) -> Vec<String>;

    /// Identity claims to expose at the userinfo endpoint (§4.6), scoped
    /// to the token's granted `scope`.
    async fn claims(&self, owner: &ResourceOwner, scope: &str) -> serde_json::Map<String, serde_json::Value>;
}
