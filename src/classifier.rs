//! Request Classifier (§4.1): looks at the one field that names the
//! surface a caller is hitting — `response_type` on `/authorize`,
//! `grant_type` on `/token` — then hands the envelope to the schema
//! validator for that surface.

use crate::error::ErrorEnvelope;
use crate::request::{Envelope, Request};
use crate::schema;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Surface {
    Authorize,
    Token,
    Introspect,
    Userinfo,
    Revoke,
}

/// Classify and validate an envelope for a known surface, producing a
/// dispatch-ready `Request` or the `invalid_request` that schema
/// validation failed with.
pub fn classify(surface: Surface, envelope: &Envelope) -> Result<Request, ErrorEnvelope> {
    match surface {
        Surface::Authorize => schema::validate_authorize(envelope).map(Request::Authorize),
        Surface::Token => schema::validate_token(envelope).map(Request::Token),
        Surface::Introspect => schema::validate_introspect(envelope).map(Request::Introspect),
        Surface::Userinfo => Ok(Request::Userinfo),
        Surface::Revoke => schema::validate_revoke(envelope).map(Request::Revoke),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_authorize_surface() {
        let envelope = Envelope::new()
            .with_query("client_id", "11111111-1111-1111-1111-111111111111")
            .with_query("response_type", "code")
            .with_query("redirect_uri", "https://redirect.uri");
        match classify(Surface::Authorize, &envelope).unwrap() {
            Request::Authorize(_) => {}
            _ => panic!("expected Authorize"),
        }
    }

    #[test]
    fn classifies_userinfo_surface_without_validation() {
        let envelope = Envelope::new();
        match classify(Surface::Userinfo, &envelope).unwrap() {
            Request::Userinfo => {}
            _ => panic!("expected Userinfo"),
        }
    }
}
