//! Client Authenticator (§4.2): resolves and verifies the `Client` behind
//! a request. HTTP Basic wins over body-embedded credentials when both are
//! present, mirroring the precedence RFC 6749 §2.3.1 leaves to server
//! policy. The authorize surface only resolves identity (no secret check);
//! the token surface always verifies the secret.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use uuid::Uuid;

use crate::error::{ErrorEnvelope, Format, Status};
use crate::model::Client;
use crate::repository::Repository;
use crate::request::Envelope;
use crate::utils::secret;

struct BasicAuth {
    client_id: String,
    secret: String,
}

fn parse_basic_auth(header: &str) -> Option<BasicAuth> {
    let encoded = header.strip_prefix("Basic ")?;
    let decoded = BASE64.decode(encoded.trim()).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (client_id, secret) = decoded.split_once(':')?;
    Some(BasicAuth {
        client_id: client_id.to_string(),
        secret: secret.to_string(),
    })
}

fn client_credentials(envelope: &Envelope) -> (Option<String>, Option<String>) {
    if let Some(header) = envelope.header("authorization") {
        if let Some(basic) = parse_basic_auth(header) {
            return (Some(basic.client_id), Some(basic.secret));
        }
    }
    (
        envelope.body_params.get("client_id").cloned(),
        envelope.body_params.get("client_secret").cloned(),
    )
}

fn invalid_client_on_authorize(redirect_uri: Option<&str>, state: Option<&String>) -> ErrorEnvelope {
    let err = ErrorEnvelope::invalid_client(Status::Unauthorized).with_state(state.cloned());
    match redirect_uri {
        Some(uri) => err.with_redirect(Format::Query, uri),
        None => err,
    }
}

/// Resolve the `Client` behind a `/authorize` request. Only `client_id` is
/// required; no secret is checked since the authorize surface never
/// receives one over the redirect (§4.2, §4.4.1).
pub async fn authenticate_for_authorize(
    repository: &dyn Repository,
    client_id: &str,
    redirect_uri: &str,
    state: Option<&String>,
) -> Result<Client, ErrorEnvelope> {
    let id = Uuid::parse_str(client_id)
        .map_err(|_| invalid_client_on_authorize(Some(redirect_uri), state))?;

    let client = repository
        .get_client(id)
        .await
        .map_err(|e| ErrorEnvelope::from(e))?
        .ok_or_else(|| invalid_client_on_authorize(Some(redirect_uri), state))?;

    if !client.has_redirect_uri(redirect_uri) {
        return Err(invalid_client_on_authorize(Some(redirect_uri), state));
    }

    Ok(client)
}

/// Resolve and verify the `Client` behind a `/token`, `/introspect`, or
/// `/revoke` request (§4.2). Errors here carry no redirect format: they
/// surface as a plain `401`.
pub async fn authenticate_for_token(
    repository: &dyn Repository,
    envelope: &Envelope,
) -> Result<Client, ErrorEnvelope> {
    let (client_id, client_secret) = client_credentials(envelope);
    let invalid = || ErrorEnvelope::invalid_client(Status::Unauthorized);

    let client_id = client_id.ok_or_else(invalid)?;
    let client_secret = client_secret.ok_or_else(invalid)?;

    let id = Uuid::parse_str(&client_id).map_err(|_| invalid())?;
    let client = repository
        .get_client(id)
        .await
        .map_err(ErrorEnvelope::from)?
        .ok_or_else(invalid)?;

    let verified = secret::verify_secret(&client_secret, &client.secret).map_err(ErrorEnvelope::from)?;
    if !verified {
        return Err(invalid());
    }

    Ok(client)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_auth_header_parses_client_id_and_secret() {
        let encoded = BASE64.encode("abc:s3cret");
        let header = format!("Basic {encoded}");
        let parsed = parse_basic_auth(&header).unwrap();
        assert_eq!(parsed.client_id, "abc");
        assert_eq!(parsed.secret, "s3cret");
    }

    #[test]
    fn basic_auth_wins_over_body_params() {
        let encoded = BASE64.encode("from-header:secret-header");
        let envelope = Envelope::new()
            .with_header("authorization", format!("Basic {encoded}"))
            .with_body("client_id", "from-body")
            .with_body("client_secret", "secret-body");
        let (id, secret) = client_credentials(&envelope);
        assert_eq!(id.as_deref(), Some("from-header"));
        assert_eq!(secret.as_deref(), Some("secret-header"));
    }

    #[test]
    fn falls_back_to_body_params_without_header() {
        let envelope = Envelope::new()
            .with_body("client_id", "from-body")
            .with_body("client_secret", "secret-body");
        let (id, secret) = client_credentials(&envelope);
        assert_eq!(id.as_deref(), Some("from-body"));
        assert_eq!(secret.as_deref(), Some("secret-body"));
    }

    struct FakeRepo {
        client: Client,
    }

    #[async_trait::async_trait]
    impl Repository for FakeRepo {
        async fn get_client(&self, id: uuid::Uuid) -> Result<Option<Client>, crate::error::CoreError> {
            Ok((id == self.client.id).then(|| self.client.clone()))
        }

        async fn create_token(
            &self,
            _: crate::repository::NewToken,
        ) -> Result<crate::model::Token, crate::error::CoreError> {
            unimplemented!()
        }

        async fn get_token(
            &self,
            _: crate::repository::TokenLookup<'_>,
        ) -> Result<Option<crate::model::Token>, crate::error::CoreError> {
            Ok(None)
        }

        async fn revoke_token(&self, _: &str, _: i64) -> Result<bool, crate::error::CoreError> {
            Ok(false)
        }

        async fn public_scopes(&self) -> Result<Vec<crate::model::Scope>, crate::error::CoreError> {
            Ok(vec![])
        }
    }

    fn client() -> Client {
        Client {
            id: uuid::Uuid::new_v4(),
            secret: "hash".to_string(),
            redirect_uris: vec!["https://redirect.uri".to_string()],
            pkce: false,
            authorize_scope: false,
            authorized_scopes: vec![],
            supported_grant_types: std::collections::HashSet::new(),
            access_token_ttl: 3600,
            authorization_code_ttl: 60,
            refresh_token_ttl: 86400,
            id_token_ttl: 3600,
        }
    }

    #[tokio::test]
    async fn mismatched_redirect_uri_carries_query_format_and_the_requested_uri() {
        let client = client();
        let repo = FakeRepo { client: client.clone() };

        let err = authenticate_for_authorize(&repo, &client.id.to_string(), "https://attacker.example", None)
            .await
            .unwrap_err();

        assert_eq!(err.format, Some(Format::Query));
        assert_eq!(err.redirect_uri.as_deref(), Some("https://attacker.example"));
    }
}
