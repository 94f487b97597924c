//! Grant engines (§4.4): one state machine per grant type, sharing the
//! client-support gate (§4.4.7) and the common token-creation path through
//! `token_service`.

pub mod authorize_code;
pub mod client_credentials;
pub mod implicit;
pub mod password;
pub mod refresh;

use crate::error::ErrorEnvelope;
use crate::model::{Client, GrantType};

/// §4.4.7: runs after client and redirect_uri resolution, before token
/// creation.
pub fn ensure_supports(client: &Client, grant: GrantType) -> Result<(), ErrorEnvelope> {
    if client.supports(grant) {
        Ok(())
    } else {
        Err(ErrorEnvelope::unsupported_grant_type())
    }
}
