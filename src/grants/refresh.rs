//! Refresh token grant (§4.4.5): rotates both the access token and the
//! refresh token, never widening the originally granted scope.

use crate::config::Clock;
use crate::dto::TokenResponse;
use crate::error::ErrorEnvelope;
use crate::model::{split_scope, Client, GrantType, TokenType};
use crate::repository::{Repository, TokenLookup};
use crate::request::RefreshTokenParams;
use crate::token_service;

use super::ensure_supports;

fn narrow(requested: Option<&str>, granted: &str) -> Result<String, ErrorEnvelope> {
    let Some(requested) = requested else {
        return Ok(granted.to_string());
    };

    let granted_names = split_scope(granted);
    let requested_names = split_scope(requested);

    if requested_names.iter().any(|n| !granted_names.contains(n)) {
        return Err(ErrorEnvelope::invalid_scope());
    }

    Ok(requested_names.join(" "))
}

pub async fn exchange(
    repository: &dyn Repository,
    clock: &dyn Clock,
    client: &Client,
    params: &RefreshTokenParams,
) -> Result<TokenResponse, ErrorEnvelope> {
    ensure_supports(client, GrantType::RefreshToken)?;

    let now = clock.now();
    let previous = repository
        .get_token(TokenLookup::RefreshToken(&params.refresh_token))
        .await
        .map_err(ErrorEnvelope::from)?
        .filter(|t| t.token_type == TokenType::AccessToken)
        .filter(|t| t.client_id == client.id)
        .filter(|t| t.is_active(now))
        .ok_or_else(|| ErrorEnvelope::invalid_grant("Provided refresh token is incorrect."))?;

    let scope = narrow(params.scope.as_deref(), &previous.scope)?;

    repository
        .revoke_token(&previous.value, now)
        .await
        .map_err(ErrorEnvelope::from)?;

    let token = token_service::create_access_token(
        repository,
        clock,
        client.id,
        previous.sub,
        scope,
        client.access_token_ttl,
        true,
    )
    .await
    .map_err(ErrorEnvelope::from)?;

    Ok(TokenResponse::new(
        token.value,
        client.access_token_ttl,
        token.refresh_token,
    ))
}
