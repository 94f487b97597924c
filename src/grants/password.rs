//! Resource-owner password grant (§4.4.4).

use crate::config::Clock;
use crate::dto::TokenResponse;
use crate::error::ErrorEnvelope;
use crate::model::{Client, GrantType, Scope};
use crate::repository::Repository;
use crate::request::PasswordParams;
use crate::resource_owners::{ResourceOwnerLookup, ResourceOwners};
use crate::scope_resolver;
use crate::token_service;

use super::ensure_supports;

pub async fn issue(
    repository: &dyn Repository,
    resource_owners: &dyn ResourceOwners,
    clock: &dyn Clock,
    client: &Client,
    params: &PasswordParams,
    public_scopes: &[Scope],
) -> Result<TokenResponse, ErrorEnvelope> {
    ensure_supports(client, GrantType::Password)?;

    let owner = resource_owners
        .get_by(ResourceOwnerLookup::Credentials {
            username: &params.username,
            password: &params.password,
        })
        .await
        .map_err(|_| ErrorEnvelope::invalid_grant("Invalid username or password."))?;

    let owner_scopes = resource_owners.authorized_scopes(&owner).await;
    let scope = scope_resolver::resolve(&params.scope, client, public_scopes, &owner_scopes)?;

    let token = token_service::create_access_token(
        repository,
        clock,
        client.id,
        Some(owner.sub),
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FixedClock;
    use crate::model::{ResourceOwner, Token};
    use crate::repository::{NewToken, TokenLookup};
    use async_trait::async_trait;
    use std::collections::HashSet;
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

        async fn create_token(&self, attrs: NewToken) -> Result<Token, crate::error::CoreError> {
            let token = Token {
                value: attrs.value,
                refresh_token: attrs.refresh_token,
                token_type: attrs.token_type,
                client_id: attrs.client_id,
                sub: attrs.sub,
                redirect_uri: attrs.redirect_uri,
                scope: attrs.scope,
                state: attrs.state,
                expires_at: attrs.expires_at,
                revoked_at: None,
                code_challenge_hash: attrs.code_challenge_hash,
                code_challenge_method: attrs.code_challenge_method,
            };
            self.tokens.lock().unwrap().push(token.clone());
            Ok(token)
        }

        async fn get_token(&self, _: TokenLookup<'_>) -> Result<Option<Token>, crate::error::CoreError> {
            Ok(None)
        }

        async fn revoke_token(&self, _: &str, _: i64) -> Result<bool, crate::error::CoreError> {
            Ok(false)
        }

        async fn public_scopes(&self) -> Result<Vec<Scope>, crate::error::CoreError> {
            Ok(vec![])
        }
    }

    struct FakeOwners {
        valid_password: &'static str,
    }

    #[async_trait]
    impl ResourceOwners for FakeOwners {
        async fn get_by(&self, lookup: ResourceOwnerLookup<'_>) -> Result<ResourceOwner, ()> {
            match lookup {
                ResourceOwnerLookup::Credentials { username, password } if password == self.valid_password => {
                    Ok(ResourceOwner::new("s1").with_username(username))
                }
                _ => Err(()),
            }
        }

        async fn authorized_scopes(&self, _owner: &ResourceOwner) -> Vec<String> {
            vec!["profile".to_string()]
        }

        async fn claims(&self, _owner: &ResourceOwner, _scope: &str) -> serde_json::Map<String, serde_json::Value> {
            serde_json::Map::new()
        }
    }

    fn client() -> Client {
        Client {
            id: Uuid::new_v4(),
            secret: "hash".to_string(),
            redirect_uris: vec![],
            pkce: false,
            authorize_scope: false,
            authorized_scopes: vec![],
            supported_grant_types: HashSet::from([GrantType::Password]),
            access_token_ttl: 3600,
            authorization_code_ttl: 60,
            refresh_token_ttl: 86400,
            id_token_ttl: 3600,
        }
    }

    #[tokio::test]
    async fn issues_token_with_owner_sub_and_refresh_token() {
        let repo = FakeRepo { tokens: Mutex::new(vec![]) };
        let owners = FakeOwners { valid_password: "correct" };
        let clock = FixedClock(1_000);
        let client = client();
        let params = PasswordParams {
            username: "alice".to_string(),
            password: "correct".to_string(),
            scope: "profile".to_string(),
        };

        let response = issue(&repo, &owners, &clock, &client, &params, &[]).await.unwrap();
        assert!(response.refresh_token.is_some());
    }

    #[tokio::test]
    async fn wrong_password_fails_with_invalid_grant() {
        let repo = FakeRepo { tokens: Mutex::new(vec![]) };
        let owners = FakeOwners { valid_password: "correct" };
        let clock = FixedClock(1_000);
        let client = client();
        let params = PasswordParams {
            username: "alice".to_string(),
            password: "wrong".to_string(),
            scope: String::new(),
        };

        let err = issue(&repo, &owners, &clock, &client, &params, &[]).await.unwrap_err();
        assert_eq!(err.error, crate::error::ErrorCode::InvalidGrant);
    }
}
