//! RFC 7662 token introspection (§4.6). Client-authenticated; looks a
//! token up first by its own value, then by refresh-token value.

use crate::config::Clock;
use crate::dto::IntrospectionResponse;
use crate::error::ErrorEnvelope;
use crate::model::{Client, TokenType};
use crate::repository::{Repository, TokenLookup};
use crate::request::IntrospectParams;
use crate::resource_owners::{ResourceOwnerLookup, ResourceOwners};

/// The fixed issuer literal the wire contract expects (§4.6).
const ISSUER: &str = "boruta";

pub async fn introspect(
    repository: &dyn Repository,
    resource_owners: &dyn ResourceOwners,
    clock: &dyn Clock,
    client: &Client,
    params: &IntrospectParams,
) -> Result<IntrospectionResponse, ErrorEnvelope> {
    let token = repository
        .get_token(TokenLookup::Value(&params.token))
        .await
        .map_err(ErrorEnvelope::from)?;

    let token = match token {
        Some(t) => Some(t),
        None => repository
            .get_token(TokenLookup::RefreshToken(&params.token))
            .await
            .map_err(ErrorEnvelope::from)?,
    };

    let now = clock.now();
    let active = token
        .filter(|t| t.token_type == TokenType::AccessToken)
        .filter(|t| t.is_active(now))
        .filter(|t| t.client_id == client.id);

    let Some(token) = active else {
        return Ok(IntrospectionResponse::Inactive { active: false });
    };

    let mut username = None;
    if let Some(sub) = &token.sub {
        if let Ok(owner) = resource_owners.get_by(ResourceOwnerLookup::Sub(sub)).await {
            username = owner.username;
        }
    }

    Ok(IntrospectionResponse::Active {
        active: true,
        client_id: token.client_id.to_string(),
        username,
        scope: token.scope,
        sub: token.sub,
        iat: token.expires_at - client.access_token_ttl,
        exp: token.expires_at,
        iss: ISSUER,
    })
}
