//! The Application callback (§6, §9): a single-method-per-outcome trait
//! that every public entry point invokes exactly once. Modeled as a trait
//! rather than a bare closure so a host can implement it directly on its
//! existing request-context type, the way a typical handler wires a
//! `State<AppState>` straight into a service call.

use serde_json::Map;
use serde_json::Value;

use crate::dto::{AuthorizeResponse, IntrospectionResponse, TokenResponse};
use crate::error::ErrorEnvelope;

/// One method per terminal outcome named in §6. A host's implementation
/// renders each into its own HTTP surface (redirect, JSON body, 401,
/// whatever fits) — the core only guarantees it calls exactly one of
/// these per entry point.
pub trait Application {
    fn authorize_success(&mut self, response: AuthorizeResponse);
    fn authorize_error(&mut self, error: ErrorEnvelope);
    fn token_success(&mut self, response: TokenResponse);
    fn token_error(&mut self, error: ErrorEnvelope);
    fn introspect_success(&mut self, response: IntrospectionResponse);
    fn introspect_error(&mut self, error: ErrorEnvelope);
    fn userinfo_fetched(&mut self, claims: Map<String, Value>);
    fn unauthorized(&mut self, error: ErrorEnvelope);
    fn revoke_success(&mut self);
    fn revoke_error(&mut self, error: ErrorEnvelope);
}
