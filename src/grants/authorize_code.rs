//! Authorization code grant: authorize phase (§4.4.1) and token exchange
//! phase (§4.4.2), including the PKCE challenge/verifier binding.

use crate::config::Clock;
use crate::dto::{AuthorizeResponse, TokenResponse};
use crate::error::{ErrorEnvelope, Format};
use crate::model::{Client, CodeChallengeMethod, GrantType, Scope, TokenType};
use crate::repository::{Repository, TokenLookup};
use crate::request::{AuthorizationCodeParams, AuthorizeParams};
use crate::scope_resolver;
use crate::token_service;
use crate::utils::pkce;

use super::ensure_supports;

fn authorize_error(err: ErrorEnvelope, redirect_uri: &str, state: Option<&String>) -> ErrorEnvelope {
    err.with_redirect(Format::Query, redirect_uri)
        .with_state(state.cloned())
}

/// §4.4.1. `sub` is the already-authenticated resource owner's subject,
/// supplied by the host; its absence is the "resource owner present"
/// precondition failing.
#[allow(clippy::too_many_arguments)]
pub async fn authorize(
    repository: &dyn Repository,
    clock: &dyn Clock,
    client: &Client,
    params: &AuthorizeParams,
    sub: Option<&str>,
    public_scopes: &[Scope],
    owner_authorized_scopes: &[String],
) -> Result<AuthorizeResponse, ErrorEnvelope> {
    let fail = |e: ErrorEnvelope| authorize_error(e, &params.redirect_uri, params.state.as_ref());

    ensure_supports(client, GrantType::AuthorizationCode).map_err(fail)?;

    let (code_challenge, code_challenge_method) = if client.pkce {
        let challenge = params
            .code_challenge
            .as_deref()
            .filter(|c| pkce::validate_code_challenge(c))
            .ok_or_else(|| fail(ErrorEnvelope::invalid_request("Code challenge is invalid.")))?;

        let method = match params.code_challenge_method.as_deref() {
            None => CodeChallengeMethod::Plain,
            Some(raw) => CodeChallengeMethod::parse(raw)
                .ok_or_else(|| fail(ErrorEnvelope::invalid_request("Code challenge is invalid.")))?,
        };
        (Some(challenge), Some(method))
    } else {
        (None, None)
    };

    let sub = sub.ok_or_else(|| fail(ErrorEnvelope::invalid_resource_owner()))?;

    let scope = scope_resolver::resolve(&params.scope, client, public_scopes, owner_authorized_scopes)
        .map_err(fail)?;

    let token = token_service::create_code(
        repository,
        clock,
        client.id,
        sub.to_string(),
        params.redirect_uri.clone(),
        scope,
        params.state.clone(),
        client.authorization_code_ttl,
        code_challenge,
        code_challenge_method,
    )
    .await
    .map_err(|e| fail(e.into()))?;

    Ok(AuthorizeResponse {
        kind: "code",
        value: token.value,
        expires_in: client.authorization_code_ttl,
        state: params.state.clone(),
        code_challenge: code_challenge.map(str::to_string),
        code_challenge_method: code_challenge_method.map(CodeChallengeMethod::as_str),
    })
}

/// §4.4.2. The code is resolved, PKCE-checked, and revoked atomically
/// before the new access token is returned.
pub async fn exchange(
    repository: &dyn Repository,
    clock: &dyn Clock,
    client: &Client,
    params: &AuthorizationCodeParams,
) -> Result<TokenResponse, ErrorEnvelope> {
    ensure_supports(client, GrantType::AuthorizationCode)?;

    let now = clock.now();
    let code = repository
        .get_token(TokenLookup::Value(&params.code))
        .await
        .map_err(ErrorEnvelope::from)?
        .filter(|t| t.token_type == TokenType::Code)
        .filter(|t| t.is_consumable_code(now, client.id, &params.redirect_uri))
        .ok_or_else(ErrorEnvelope::invalid_code)?;

    if let Some(stored_hash) = &code.code_challenge_hash {
        let method = code.code_challenge_method.unwrap_or(CodeChallengeMethod::Plain);
        let verifier = params
            .code_verifier
            .as_deref()
            .ok_or_else(|| ErrorEnvelope::invalid_request("PKCE request invalid."))?;

        if !pkce::verify(verifier, stored_hash, method) {
            return Err(ErrorEnvelope::invalid_request("Code verifier is invalid."));
        }
    }

    let revoked = repository
        .revoke_token(&code.value, now)
        .await
        .map_err(ErrorEnvelope::from)?;
    if !revoked {
        // Someone else already consumed this code between lookup and
        // revocation (§5): treat identically to "code not found".
        return Err(ErrorEnvelope::invalid_code());
    }

    let token = token_service::create_access_token(
        repository,
        clock,
        client.id,
        code.sub,
        code.scope,
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
