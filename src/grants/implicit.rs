//! Implicit grant (§4.4.6): issues an access token directly off the
//! authorize surface, rendered onto the redirect fragment rather than a
//! code the client exchanges separately.

use crate::config::Clock;
use crate::dto::AuthorizeResponse;
use crate::error::{ErrorEnvelope, Format};
use crate::model::{Client, GrantType, Scope};
use crate::repository::Repository;
use crate::request::AuthorizeParams;
use crate::scope_resolver;
use crate::token_service;

use super::ensure_supports;

pub async fn authorize(
    repository: &dyn Repository,
    clock: &dyn Clock,
    client: &Client,
    params: &AuthorizeParams,
    sub: Option<&str>,
    public_scopes: &[Scope],
    owner_authorized_scopes: &[String],
) -> Result<AuthorizeResponse, ErrorEnvelope> {
    let fail = |e: ErrorEnvelope| {
        e.with_redirect(Format::Fragment, &params.redirect_uri)
            .with_state(params.state.clone())
    };

    ensure_supports(client, GrantType::Implicit).map_err(fail)?;

    let sub = sub.ok_or_else(|| fail(ErrorEnvelope::invalid_resource_owner()))?;

    let scope = scope_resolver::resolve(&params.scope, client, public_scopes, owner_authorized_scopes)
        .map_err(fail)?;

    let token = token_service::create_access_token(
        repository,
        clock,
        client.id,
        Some(sub.to_string()),
        scope,
        client.access_token_ttl,
        false,
    )
    .await
    .map_err(|e| fail(e.into()))?;

    Ok(AuthorizeResponse {
        kind: "token",
        value: token.value,
        expires_in: client.access_token_ttl,
        state: params.state.clone(),
        code_challenge: None,
        code_challenge_method: None,
    })
}
