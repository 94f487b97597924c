//! Wires the authorization server core against in-memory fakes of
//! `Repository` and `ResourceOwners` and drives an authorization-code +
//! PKCE flow end to end, followed by a refresh and a revocation.

use std::collections::HashSet;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{Map, Value};
use tracing::info;
use uuid::Uuid;

use auth_core::config::SystemClock;
use auth_core::dto::{AuthorizeResponse, IntrospectionResponse, TokenResponse};
use auth_core::error::ErrorEnvelope;
use auth_core::model::{Client, GrantType, ResourceOwner, Scope, Token};
use auth_core::repository::{NewToken, Repository, TokenLookup};
use auth_core::request::Envelope;
use auth_core::resource_owners::{ResourceOwnerLookup, ResourceOwners};
use auth_core::utils::pkce;
use auth_core::{Application, AuthorizationServer, CoreError};

struct InMemoryRepository {
    client: Client,
    tokens: Mutex<Vec<Token>>,
}

#[async_trait]
impl Repository for InMemoryRepository {
    async fn get_client(&self, id: Uuid) -> Result<Option<Client>, CoreError> {
        Ok((id == self.client.id).then(|| self.client.clone()))
    }

    async fn create_token(&self, attrs: NewToken) -> Result<Token, CoreError> {
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

    async fn get_token(&self, lookup: TokenLookup<'_>) -> Result<Option<Token>, CoreError> {
        let tokens = self.tokens.lock().unwrap();
        Ok(match lookup {
            TokenLookup::Value(v) => tokens.iter().find(|t| t.value == v).cloned(),
            TokenLookup::RefreshToken(v) => {
                tokens.iter().find(|t| t.refresh_token.as_deref() == Some(v)).cloned()
            }
        })
    }

    async fn revoke_token(&self, value: &str, now: i64) -> Result<bool, CoreError> {
        let mut tokens = self.tokens.lock().unwrap();
        if let Some(t) = tokens.iter_mut().find(|t| t.value == value) {
            if t.revoked_at.is_none() {
                t.revoked_at = Some(now);
                return Ok(true);
            }
        }
        Ok(false)
    }

    async fn public_scopes(&self) -> Result<Vec<Scope>, CoreError> {
        Ok(vec![Scope::new("openid", true)])
    }
}

struct InMemoryResourceOwners;

#[async_trait]
impl ResourceOwners for InMemoryResourceOwners {
    async fn get_by(&self, lookup: ResourceOwnerLookup<'_>) -> Result<ResourceOwner, ()> {
        match lookup {
            ResourceOwnerLookup::Sub(sub) => Ok(ResourceOwner::new(sub).with_username("demo-user")),
            ResourceOwnerLookup::Credentials { username, password } if password == "correct-horse" => {
                Ok(ResourceOwner::new("s1").with_username(username))
            }
            _ => Err(()),
        }
    }

    async fn authorized_scopes(&self, _owner: &ResourceOwner) -> Vec<String> {
        vec!["profile".to_string()]
    }

    async fn claims(&self, owner: &ResourceOwner, _scope: &str) -> Map<String, Value> {
        let mut claims = Map::new();
        claims.insert(
            "username".to_string(),
            Value::String(owner.username.clone().unwrap_or_default()),
        );
        claims
    }
}

#[derive(Default)]
struct LoggingApplication {
    last_authorize: Option<AuthorizeResponse>,
    last_token: Option<TokenResponse>,
    last_introspection: Option<IntrospectionResponse>,
}

impl Application for LoggingApplication {
    fn authorize_success(&mut self, response: AuthorizeResponse) {
        info!(?response, "authorize succeeded");
        self.last_authorize = Some(response);
    }

    fn authorize_error(&mut self, error: ErrorEnvelope) {
        info!(?error, "authorize failed");
    }

    fn token_success(&mut self, response: TokenResponse) {
        info!(?response, "token issued");
        self.last_token = Some(response);
    }

    fn token_error(&mut self, error: ErrorEnvelope) {
        info!(?error, "token exchange failed");
    }

    fn introspect_success(&mut self, response: IntrospectionResponse) {
        info!(?response, "introspection succeeded");
        self.last_introspection = Some(response);
    }

    fn introspect_error(&mut self, error: ErrorEnvelope) {
        info!(?error, "introspection failed");
    }

    fn userinfo_fetched(&mut self, claims: Map<String, Value>) {
        info!(?claims, "userinfo fetched");
    }

    fn unauthorized(&mut self, error: ErrorEnvelope) {
        info!(?error, "unauthorized");
    }

    fn revoke_success(&mut self) {
        info!("revocation succeeded");
    }

    fn revoke_error(&mut self, error: ErrorEnvelope) {
        info!(?error, "revocation failed");
    }
}

#[tokio::main]
async fn main() {
    auth_core::Config::init_tracing();

    let client = Client {
        id: Uuid::new_v4(),
        secret: auth_core::utils::secret::hash_secret("s3cret").unwrap(),
        redirect_uris: vec!["https://client.example/callback".to_string()],
        pkce: true,
        authorize_scope: false,
        authorized_scopes: vec![],
        supported_grant_types: HashSet::from([
            GrantType::AuthorizationCode,
            GrantType::RefreshToken,
        ]),
        access_token_ttl: 3600,
        authorization_code_ttl: 60,
        refresh_token_ttl: 86_400,
        id_token_ttl: 3600,
    };

    let repository = InMemoryRepository { client: client.clone(), tokens: Mutex::new(vec![]) };
    let resource_owners = InMemoryResourceOwners;
    let clock = SystemClock;
    let server = AuthorizationServer::new(&repository, &resource_owners, &clock);
    let mut app = LoggingApplication::default();

    let code_verifier = "dBjftJeZ4CVP-mB92K27uhbUJU1p1r_wW1gFWFOEjXk";
    let code_challenge = pkce::s256_base64url(code_verifier);

    let authorize_envelope = Envelope::new()
        .with_query("response_type", "code")
        .with_query("client_id", client.id.to_string())
        .with_query("redirect_uri", "https://client.example/callback")
        .with_query("code_challenge", code_challenge)
        .with_query("code_challenge_method", "S256");

    server.handle_authorize(&authorize_envelope, Some("s1"), &mut app).await;

    let code = app.last_authorize.as_ref().expect("authorize should have succeeded").value.clone();

    let token_envelope = Envelope::new()
        .with_body("grant_type", "authorization_code")
        .with_body("client_id", client.id.to_string())
        .with_body("client_secret", "s3cret")
        .with_body("code", code)
        .with_body("redirect_uri", "https://client.example/callback")
        .with_body("code_verifier", code_verifier);

    server.handle_token(&token_envelope, &mut app).await;

    let refresh_token = app
        .last_token
        .as_ref()
        .and_then(|t| t.refresh_token.clone())
        .expect("authorization code exchange should issue a refresh token");

    let refresh_envelope = Envelope::new()
        .with_body("grant_type", "refresh_token")
        .with_body("client_id", client.id.to_string())
        .with_body("client_secret", "s3cret")
        .with_body("refresh_token", refresh_token);

    server.handle_token(&refresh_envelope, &mut app).await;

    let access_token = app
        .last_token
        .as_ref()
        .expect("refresh should have issued a new access token")
        .access_token
        .clone();

    let introspect_envelope = Envelope::new()
        .with_body("client_id", client.id.to_string())
        .with_body("client_secret", "s3cret")
        .with_body("token", access_token.clone());

    server.handle_introspect(&introspect_envelope, &mut app).await;

    let revoke_envelope = Envelope::new()
        .with_body("client_id", client.id.to_string())
        .with_body("client_secret", "s3cret")
        .with_body("token", access_token);

    server.handle_revoke(&revoke_envelope, &mut app).await;
}
