//! RFC 7009 token revocation (§4.6). Always reports success to the
//! caller unless the token belongs to a different client — its mere
//! existence (or non-existence) is never observable.

use crate::config::Clock;
use crate::error::ErrorEnvelope;
use crate::model::Client;
use crate::repository::{Repository, TokenLookup};
use crate::request::RevokeParams;

/// `token_type_hint` only reorders the lookup; an absent or unrecognized
/// hint falls back to trying both lookups (§4.6).
async fn locate(
    repository: &dyn Repository,
    params: &RevokeParams,
) -> Result<Option<crate::model::Token>, ErrorEnvelope> {
    let lookups: [TokenLookup<'_>; 2] = match params.token_type_hint.as_deref() {
        Some("refresh_token") => [TokenLookup::RefreshToken(&params.token), TokenLookup::Value(&params.token)],
        _ => [TokenLookup::Value(&params.token), TokenLookup::RefreshToken(&params.token)],
    };

    for lookup in lookups {
        if let Some(token) = repository.get_token(lookup).await.map_err(ErrorEnvelope::from)? {
            return Ok(Some(token));
        }
    }
    Ok(None)
}

pub async fn revoke(
    repository: &dyn Repository,
    clock: &dyn Clock,
    client: &Client,
    params: &RevokeParams,
) -> Result<(), ErrorEnvelope> {
    let Some(token) = locate(repository, params).await? else {
        return Ok(());
    };

    if token.client_id != client.id {
        return Err(ErrorEnvelope::invalid_client(crate::error::Status::Unauthorized));
    }

    repository
        .revoke_token(&token.value, clock.now())
        .await
        .map_err(ErrorEnvelope::from)?;

    Ok(())
}
