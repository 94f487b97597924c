//! OpenID Connect userinfo endpoint (§4.6).

use serde_json::{Map, Value};

use crate::bearer;
use crate::config::Clock;
use crate::error::ErrorEnvelope;
use crate::model::TokenType;
use crate::repository::{Repository, TokenLookup};
use crate::resource_owners::{ResourceOwnerLookup, ResourceOwners};

pub async fn fetch(
    repository: &dyn Repository,
    resource_owners: &dyn ResourceOwners,
    clock: &dyn Clock,
    authorization_header: Option<&str>,
) -> Result<Map<String, Value>, ErrorEnvelope> {
    let bearer = bearer::extract(authorization_header)?;

    let token = repository
        .get_token(TokenLookup::Value(bearer))
        .await
        .map_err(ErrorEnvelope::from)?
        .filter(|t| t.token_type == TokenType::AccessToken)
        .filter(|t| t.is_active(clock.now()))
        .ok_or_else(ErrorEnvelope::invalid_access_token)?;

    let sub = token.sub.ok_or_else(ErrorEnvelope::invalid_bearer)?;

    let owner = resource_owners
        .get_by(ResourceOwnerLookup::Sub(&sub))
        .await
        .map_err(|_| ErrorEnvelope::invalid_bearer())?;

    let mut claims = resource_owners.claims(&owner, &token.scope).await;
    claims.insert("sub".to_string(), Value::String(owner.sub));
    Ok(claims)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FixedClock;
    use crate::error::ErrorCode;
    use crate::model::{Client, ResourceOwner, Scope, Token};
    use crate::repository::NewToken;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use uuid::Uuid;

    struct FakeRepo {
        tokens: Mutex<Vec<Token>>,
    }

    #[async_trait]
    impl Repository for FakeRepo {
        async fn get_client(&self, _id: Uuid) -> Result<Option<Client>, crate::error::CoreError> {
            unimplemented!()
        }

        async fn create_token(&self, _: NewToken) -> Result<Token, crate::error::CoreError> {
            unimplemented!()
        }

        async fn get_token(&self, lookup: TokenLookup<'_>) -> Result<Option<Token>, crate::error::CoreError> {
            let tokens = self.tokens.lock().unwrap();
            Ok(match lookup {
                TokenLookup::Value(v) => tokens.iter().find(|t| t.value == v).cloned(),
                TokenLookup::RefreshToken(v) => {
                    tokens.iter().find(|t| t.refresh_token.as_deref() == Some(v)).cloned()
                }
            })
        }

        async fn revoke_token(&self, _: &str, _: i64) -> Result<bool, crate::error::CoreError> {
            Ok(false)
        }

        async fn public_scopes(&self) -> Result<Vec<Scope>, crate::error::CoreError> {
            Ok(vec![])
        }
    }

    struct FakeOwners;

    #[async_trait]
    impl ResourceOwners for FakeOwners {
        async fn get_by(&self, lookup: ResourceOwnerLookup<'_>) -> Result<ResourceOwner, ()> {
            match lookup {
                ResourceOwnerLookup::Sub(sub) => Ok(ResourceOwner::new(sub).with_username("alice")),
                _ => Err(()),
            }
        }

        async fn authorized_scopes(&self, _owner: &ResourceOwner) -> Vec<String> {
            vec![]
        }

        async fn claims(&self, owner: &ResourceOwner, _scope: &str) -> Map<String, Value> {
            let mut claims = Map::new();
            claims.insert("username".to_string(), Value::String(owner.username.clone().unwrap()));
            claims
        }
    }

    fn active_token() -> Token {
        Token {
            value: "tok".to_string(),
            refresh_token: None,
            token_type: TokenType::AccessToken,
            client_id: Uuid::new_v4(),
            sub: Some("s1".to_string()),
            redirect_uri: None,
            scope: "profile".to_string(),
            state: None,
            expires_at: 10_000,
            revoked_at: None,
            code_challenge_hash: None,
            code_challenge_method: None,
        }
    }

    #[tokio::test]
    async fn returns_claims_with_sub_taking_precedence() {
        let repo = FakeRepo { tokens: Mutex::new(vec![active_token()]) };
        let owners = FakeOwners;
        let clock = FixedClock(0);

        let claims = fetch(&repo, &owners, &clock, Some("Bearer tok")).await.unwrap();
        assert_eq!(claims.get("sub").unwrap(), "s1");
        assert_eq!(claims.get("username").unwrap(), "alice");
    }

    #[tokio::test]
    async fn unknown_token_is_invalid_access_token() {
        let repo = FakeRepo { tokens: Mutex::new(vec![]) };
        let owners = FakeOwners;
        let clock = FixedClock(0);

        let err = fetch(&repo, &owners, &clock, Some("Bearer missing")).await.unwrap_err();
        assert_eq!(err.error, ErrorCode::InvalidAccessToken);
    }

    #[tokio::test]
    async fn malformed_header_is_invalid_bearer() {
        let repo = FakeRepo { tokens: Mutex::new(vec![]) };
        let owners = FakeOwners;
        let clock = FixedClock(0);

        let err = fetch(&repo, &owners, &clock, None).await.unwrap_err();
        assert_eq!(err.error, ErrorCode::InvalidBearer);
    }
}
