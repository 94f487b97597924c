//! Schema Validator (§4.1): validates a raw parameter map against a
//! declarative per-grant shape and produces either a typed request or a
//! structured `invalid_request` whose description enumerates every
//! failing property — the description text is part of the external
//! contract (§8), so the wording below is deliberate, not incidental.

use std::collections::HashMap;
use std::sync::OnceLock;

use regex::Regex;

use crate::error::ErrorEnvelope;
use crate::request::{
    AuthorizationCodeParams, AuthorizeKind, AuthorizeParams, ClientCredentialsParams,
    Envelope, IntrospectParams, PasswordParams, RefreshTokenParams, RevokeParams, TokenRequest,
};

pub const UUID_PATTERN: &str = "[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}";

fn uuid_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(&format!("^{UUID_PATTERN}$")).unwrap())
}

/// Accumulates schema failures the way the source's JSON-schema validator
/// would, then renders them into one sentence per failure class.
#[derive(Default)]
struct SchemaFailures {
    pattern_failures: Vec<(String, String)>,
    missing: Vec<String>,
}

impl SchemaFailures {
    fn is_empty(&self) -> bool {
        self.pattern_failures.is_empty() && self.missing.is_empty()
    }

    fn into_error(self) -> ErrorEnvelope {
        let mut sentences = Vec::new();
        for (prop, pattern) in &self.pattern_failures {
            sentences.push(format!("#/{prop} do match required pattern /{pattern}/."));
        }
        if !self.missing.is_empty() {
            sentences.push(format!(
                "Required properties {} are missing at #.",
                self.missing.join(", ")
            ));
        }
        ErrorEnvelope::invalid_request(sentences.join(" "))
    }
}

fn require<'a>(
    params: &'a HashMap<String, String>,
    name: &str,
    failures: &mut SchemaFailures,
) -> Option<&'a str> {
    match params.get(name).map(String::as_str) {
        Some(v) if !v.is_empty() => Some(v),
        _ => {
            failures.missing.push(name.to_string());
            None
        }
    }
}

fn check_client_id_pattern(params: &HashMap<String, String>, failures: &mut SchemaFailures) {
    if let Some(client_id) = params.get("client_id") {
        if !uuid_regex().is_match(client_id) {
            failures
                .pattern_failures
                .push(("client_id".to_string(), UUID_PATTERN.to_string()));
        }
    }
}

/// Validate and classify a `/authorize` envelope (§4.1).
pub fn validate_authorize(envelope: &Envelope) -> Result<AuthorizeParams, ErrorEnvelope> {
    let params = &envelope.query_params;
    let mut failures = SchemaFailures::default();

    check_client_id_pattern(params, &mut failures);
    let response_type = require(params, "response_type", &mut failures);
    let client_id = require(params, "client_id", &mut failures);
    let redirect_uri = require(params, "redirect_uri", &mut failures);

    if !failures.is_empty() {
        return Err(failures.into_error());
    }

    let kind = match response_type.unwrap() {
        "code" => AuthorizeKind::Code,
        "token" => AuthorizeKind::Token,
        "id_token" => AuthorizeKind::IdToken,
        other => {
            return Err(ErrorEnvelope::invalid_request(format!(
                "#/response_type do match required pattern /code|token|id_token/. Unsupported response_type \"{other}\" at #."
            )));
        }
    };

    Ok(AuthorizeParams {
        kind,
        client_id: client_id.unwrap().to_string(),
        redirect_uri: redirect_uri.unwrap().to_string(),
        scope: params.get("scope").cloned().unwrap_or_default(),
        state: params.get("state").cloned(),
        code_challenge: params.get("code_challenge").cloned(),
        code_challenge_method: params.get("code_challenge_method").cloned(),
    })
}

/// Validate and classify a `/token` envelope (§4.1).
pub fn validate_token(envelope: &Envelope) -> Result<TokenRequest, ErrorEnvelope> {
    let params = &envelope.body_params;
    let mut failures = SchemaFailures::default();
    check_client_id_pattern(params, &mut failures);

    let grant_type = require(params, "grant_type", &mut failures);
    if !failures.is_empty() {
        return Err(failures.into_error());
    }

    match grant_type.unwrap() {
        "authorization_code" => {
            let mut failures = SchemaFailures::default();
            check_client_id_pattern(params, &mut failures);
            let code = require(params, "code", &mut failures);
            let redirect_uri = require(params, "redirect_uri", &mut failures);
            if !failures.is_empty() {
                return Err(failures.into_error());
            }
            Ok(TokenRequest::AuthorizationCode(AuthorizationCodeParams {
                code: code.unwrap().to_string(),
                redirect_uri: redirect_uri.unwrap().to_string(),
                code_verifier: params.get("code_verifier").cloned(),
            }))
        }
        "client_credentials" => Ok(TokenRequest::ClientCredentials(ClientCredentialsParams {
            scope: params.get("scope").cloned().unwrap_or_default(),
        })),
        "password" => {
            let mut failures = SchemaFailures::default();
            check_client_id_pattern(params, &mut failures);
            let username = require(params, "username", &mut failures);
            let password = require(params, "password", &mut failures);
            if !failures.is_empty() {
                return Err(failures.into_error());
            }
            Ok(TokenRequest::Password(PasswordParams {
                username: username.unwrap().to_string(),
                password: password.unwrap().to_string(),
                scope: params.get("scope").cloned().unwrap_or_default(),
            }))
        }
        "refresh_token" => {
            let mut failures = SchemaFailures::default();
            check_client_id_pattern(params, &mut failures);
            let refresh_token = require(params, "refresh_token", &mut failures);
            if !failures.is_empty() {
                return Err(failures.into_error());
            }
            Ok(TokenRequest::RefreshToken(RefreshTokenParams {
                refresh_token: refresh_token.unwrap().to_string(),
                scope: params.get("scope").cloned(),
            }))
        }
        other => Err(ErrorEnvelope::invalid_request(format!(
            "#/grant_type do match required pattern /authorization_code|client_credentials|password|refresh_token/. Unsupported grant_type \"{other}\" at #."
        ))),
    }
}

/// Validate an introspection envelope (§4.1, §4.6).
pub fn validate_introspect(envelope: &Envelope) -> Result<IntrospectParams, ErrorEnvelope> {
    let params = &envelope.body_params;
    let mut failures = SchemaFailures::default();
    let token = require(params, "token", &mut failures);
    if !failures.is_empty() {
        return Err(failures.into_error());
    }
    Ok(IntrospectParams {
        token: token.unwrap().to_string(),
    })
}

/// Validate a revocation envelope (§4.1, §4.6).
pub fn validate_revoke(envelope: &Envelope) -> Result<RevokeParams, ErrorEnvelope> {
    let params = &envelope.body_params;
    let mut failures = SchemaFailures::default();
    let token = require(params, "token", &mut failures);
    if !failures.is_empty() {
        return Err(failures.into_error());
    }
    Ok(RevokeParams {
        token: token.unwrap().to_string(),
        token_type_hint: params.get("token_type_hint").cloned(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn authorize_reports_pattern_and_missing_together() {
        let envelope = Envelope::new()
            .with_query("client_id", "not-a-uuid")
            .with_query("response_type", "code");
        let err = validate_authorize(&envelope).unwrap_err();
        assert!(err.error_description.contains("#/client_id do match required pattern"));
        assert!(err
            .error_description
            .contains("Required properties redirect_uri are missing at #."));
    }

    #[test]
    fn authorize_happy_path_classifies_as_code() {
        let envelope = Envelope::new()
            .with_query("client_id", "11111111-1111-1111-1111-111111111111")
            .with_query("response_type", "code")
            .with_query("redirect_uri", "https://redirect.uri");
        let params = validate_authorize(&envelope).unwrap();
        assert_eq!(params.kind, AuthorizeKind::Code);
        assert_eq!(params.scope, "");
    }

    #[test]
    fn token_classifies_by_grant_type() {
        let envelope = Envelope::new()
            .with_body("grant_type", "client_credentials")
            .with_body("scope", "read write");
        match validate_token(&envelope).unwrap() {
            TokenRequest::ClientCredentials(p) => assert_eq!(p.scope, "read write"),
            _ => panic!("expected client_credentials"),
        }
    }

    #[test]
    fn token_missing_required_field_is_invalid_request() {
        let envelope = Envelope::new().with_body("grant_type", "authorization_code");
        let err = validate_token(&envelope).unwrap_err();
        assert!(err.error_description.contains("code"));
        assert!(err.error_description.contains("redirect_uri"));
    }
}
