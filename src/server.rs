//! The top-level orchestrator (§2 data flow): wires classifier → schema
//! validator → client authenticator → grant engine → token service,
//! invoking the `Application` callback exactly once per entry point (§9).

use crate::callback::Application;
use crate::classifier::{self, Surface};
use crate::client_auth;
use crate::config::Clock;
use crate::error::ErrorEnvelope;
use crate::grants::{authorize_code, client_credentials, implicit, password, refresh};
use crate::model::ResourceOwner;
use crate::repository::Repository;
use crate::request::{AuthorizeKind, Envelope, Request, TokenRequest};
use crate::resource_owners::{ResourceOwnerLookup, ResourceOwners};
use crate::{introspect, revoke, userinfo};

/// Owns references to the three pluggable collaborators (§6) and exposes
/// one method per public entry point. A host constructs one of these per
/// request (or keeps a long-lived one, since the core holds no state of
/// its own beyond borrowed trait objects).
pub struct AuthorizationServer<'a> {
    pub repository: &'a dyn Repository,
    pub resource_owners: &'a dyn ResourceOwners,
    pub clock: &'a dyn Clock,
}

impl<'a> AuthorizationServer<'a> {
    pub fn new(
        repository: &'a dyn Repository,
        resource_owners: &'a dyn ResourceOwners,
        clock: &'a dyn Clock,
    ) -> Self {
        Self { repository, resource_owners, clock }
    }

    /// Handle a `/authorize` request. `authenticated_sub` is the resource
    /// owner subject the host has already authenticated via its own
    /// session mechanism, if any — the core never performs that
    /// authentication itself (§1: no session management beyond
    /// token-bearing).
    pub async fn handle_authorize(
        &self,
        envelope: &Envelope,
        authenticated_sub: Option<&str>,
        app: &mut dyn Application,
    ) {
        match self.authorize(envelope, authenticated_sub).await {
            Ok(response) => app.authorize_success(response),
            Err(err) => app.authorize_error(err),
        }
    }

    async fn authorize(
        &self,
        envelope: &Envelope,
        authenticated_sub: Option<&str>,
    ) -> Result<crate::dto::AuthorizeResponse, ErrorEnvelope> {
        let params = match classifier::classify(Surface::Authorize, envelope)? {
            Request::Authorize(params) => params,
            _ => unreachable!("Surface::Authorize always classifies to Request::Authorize"),
        };

        let client = client_auth::authenticate_for_authorize(
            self.repository,
            &params.client_id,
            &params.redirect_uri,
            params.state.as_ref(),
        )
        .await?;

        let public_scopes = self.repository.public_scopes().await.map_err(ErrorEnvelope::from)?;
        let owner = self.owner_for(authenticated_sub).await;
        let owner_scopes = match &owner {
            Some(owner) => self.resource_owners.authorized_scopes(owner).await,
            None => Vec::new(),
        };

        match params.kind {
            AuthorizeKind::Code => {
                authorize_code::authorize(
                    self.repository,
                    self.clock,
                    &client,
                    &params,
                    authenticated_sub,
                    &public_scopes,
                    &owner_scopes,
                )
                .await
            }
            AuthorizeKind::Token | AuthorizeKind::IdToken => {
                implicit::authorize(
                    self.repository,
                    self.clock,
                    &client,
                    &params,
                    authenticated_sub,
                    &public_scopes,
                    &owner_scopes,
                )
                .await
            }
        }
    }

    async fn owner_for(&self, sub: Option<&str>) -> Option<ResourceOwner> {
        let sub = sub?;
        self.resource_owners.get_by(ResourceOwnerLookup::Sub(sub)).await.ok()
    }

    /// Handle a `/token` request.
    pub async fn handle_token(&self, envelope: &Envelope, app: &mut dyn Application) {
        match self.token(envelope).await {
            Ok(response) => app.token_success(response),
            Err(err) => app.token_error(err),
        }
    }

    async fn token(&self, envelope: &Envelope) -> Result<crate::dto::TokenResponse, ErrorEnvelope> {
        let request = match classifier::classify(Surface::Token, envelope)? {
            Request::Token(request) => request,
            _ => unreachable!("Surface::Token always classifies to Request::Token"),
        };

        let client = client_auth::authenticate_for_token(self.repository, envelope).await?;
        let public_scopes = self.repository.public_scopes().await.map_err(ErrorEnvelope::from)?;

        match request {
            TokenRequest::AuthorizationCode(params) => {
                authorize_code::exchange(self.repository, self.clock, &client, &params).await
            }
            TokenRequest::ClientCredentials(params) => {
                client_credentials::issue(self.repository, self.clock, &client, &params, &public_scopes).await
            }
            TokenRequest::Password(params) => {
                password::issue(
                    self.repository,
                    self.resource_owners,
                    self.clock,
                    &client,
                    &params,
                    &public_scopes,
                )
                .await
            }
            TokenRequest::RefreshToken(params) => {
                refresh::exchange(self.repository, self.clock, &client, &params).await
            }
        }
    }

    /// Handle an introspection request (§4.6). Client-authenticated.
    pub async fn handle_introspect(&self, envelope: &Envelope, app: &mut dyn Application) {
        match self.introspect(envelope).await {
            Ok(response) => app.introspect_success(response),
            Err(err) => app.introspect_error(err),
        }
    }

    async fn introspect(&self, envelope: &Envelope) -> Result<crate::dto::IntrospectionResponse, ErrorEnvelope> {
        let params = match classifier::classify(Surface::Introspect, envelope)? {
            Request::Introspect(params) => params,
            _ => unreachable!("Surface::Introspect always classifies to Request::Introspect"),
        };
        let client = client_auth::authenticate_for_token(self.repository, envelope).await?;
        introspect::introspect(self.repository, self.resource_owners, self.clock, &client, &params).await
    }

    /// Handle a userinfo request (§4.6).
    pub async fn handle_userinfo(&self, envelope: &Envelope, app: &mut dyn Application) {
        let header = envelope.header("authorization");
        match userinfo::fetch(self.repository, self.resource_owners, self.clock, header).await {
            Ok(claims) => app.userinfo_fetched(claims),
            Err(err) => app.unauthorized(err),
        }
    }

    /// Handle a revocation request (§4.6). Always calls `revoke_success`
    /// unless the client itself cannot be authenticated or the token
    /// belongs to a different client.
    pub async fn handle_revoke(&self, envelope: &Envelope, app: &mut dyn Application) {
        match self.revoke(envelope).await {
            Ok(()) => app.revoke_success(),
            Err(err) => app.revoke_error(err),
        }
    }

    async fn revoke(&self, envelope: &Envelope) -> Result<(), ErrorEnvelope> {
        let params = match classifier::classify(Surface::Revoke, envelope)? {
            Request::Revoke(params) => params,
            _ => unreachable!("Surface::Revoke always classifies to Request::Revoke"),
        };
        let client = client_auth::authenticate_for_token(self.repository, envelope).await?;
        revoke::revoke(self.repository, self.clock, &client, &params).await
    }
}
