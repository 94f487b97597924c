//! Client credentials grant (§4.4.3): machine-to-machine, no resource
//! owner, no refresh token.

use crate::config::Clock;
use crate::dto::TokenResponse;
use crate::error::ErrorEnvelope;
use crate::model::{Client, GrantType, Scope};
use crate::repository::Repository;
use crate::request::ClientCredentialsParams;
use crate::scope_resolver;
use crate::token_service;

use super::ensure_supports;

pub async fn issue(
    repository: &dyn Repository,
    clock: &dyn Clock,
    client: &Client,
    params: &ClientCredentialsParams,
    public_scopes: &[Scope],
) -> Result<TokenResponse, ErrorEnvelope> {
    ensure_supports(client, GrantType::ClientCredentials)?;

    let scope = scope_resolver::resolve(&params.scope, client, public_scopes, &[])?;

    let token = token_service::create_access_token(
        repository,
        clock,
        client.id,
        None,
        scope,
        client.access_token_ttl,
        false,
    )
    .await
    .map_err(ErrorEnvelope::from)?;

    Ok(TokenResponse::new(token.value, client.access_token_ttl, None))
}
