//! Token Service (§4.5): constructs `Token` rows for the grant engines,
//! keeping opaque-value generation, PKCE challenge hashing, and TTL
//! sourcing in one place. Lookup and revocation are simple enough that
//! each call site goes straight to `Repository` instead.

use uuid::Uuid;

use crate::config::Clock;
use crate::error::CoreError;
use crate::model::{CodeChallengeMethod, Token, TokenType};
use crate::repository::{NewToken, Repository};
use crate::utils::{pkce, secret};

/// Issue a bare access token (client credentials, password, refresh, and
/// the token half of the authorization-code exchange all end here).
pub async fn create_access_token(
    repository: &dyn Repository,
    clock: &dyn Clock,
    client_id: Uuid,
    sub: Option<String>,
    scope: String,
    ttl: i64,
    with_refresh_token: bool,
) -> Result<Token, CoreError> {
    let refresh_token = if with_refresh_token {
        Some(secret::generate_opaque_value())
    } else {
        None
    };

    repository
        .create_token(NewToken {
            value: secret::generate_opaque_value(),
            refresh_token,
            token_type: TokenType::AccessToken,
            client_id,
            sub,
            redirect_uri: None,
            scope,
            state: None,
            expires_at: clock.now() + ttl,
            code_challenge_hash: None,
            code_challenge_method: None,
        })
        .await
}

/// Issue an authorization code (§4.4.1). The raw `code_challenge` is
/// hashed immediately; it is never itself persisted (§3, §9).
#[allow(clippy::too_many_arguments)]
pub async fn create_code(
    repository: &dyn Repository,
    clock: &dyn Clock,
    client_id: Uuid,
    sub: String,
    redirect_uri: String,
    scope: String,
    state: Option<String>,
    ttl: i64,
    code_challenge: Option<&str>,
    code_challenge_method: Option<CodeChallengeMethod>,
) -> Result<Token, CoreError> {
    let code_challenge_hash = code_challenge.map(pkce::hash_challenge);

    repository
        .create_token(NewToken {
            value: secret::generate_opaque_value(),
            refresh_token: None,
            token_type: TokenType::Code,
            client_id,
            sub: Some(sub),
            redirect_uri: Some(redirect_uri),
            scope,
            state,
            expires_at: clock.now() + ttl,
            code_challenge_hash,
            code_challenge_method,
        })
        .await
}
