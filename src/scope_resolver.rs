//! Scope Resolver (§4.3): decides which requested scope names a client
//! (and, where relevant, a resource owner) may actually be granted.
//!
//! With `authorize_scope = false`, a name is admissible if it is globally
//! public or the resource owner has authorized it directly. With
//! `authorize_scope = true`, a name must additionally appear in the
//! client's own `authorized_scopes` — this narrows the first condition
//! rather than adding an independent one. An empty requested scope is
//! always admitted as-is (§4.3: "no scope requested is not an error").

use crate::error::ErrorEnvelope;
use crate::model::{split_scope, Client, Scope};

/// Resolve a requested scope string against a client's grant and the
/// public scope set, returning the space-joined, order-preserving result
/// or `invalid_scope` if any requested name is inadmissible.
pub fn resolve(
    requested: &str,
    client: &Client,
    public_scopes: &[Scope],
    owner_authorized: &[String],
) -> Result<String, ErrorEnvelope> {
    let names = split_scope(requested);
    if names.is_empty() {
        return Ok(String::new());
    }

    for name in &names {
        let is_public = public_scopes.iter().any(|s| &s.name == name);
        let base = is_public || (!client.authorize_scope && owner_authorized.iter().any(|s| s == name));
        let admitted = if client.authorize_scope {
            base && client.authorizes_scope(name)
        } else {
            base
        };

        if !admitted {
            return Err(ErrorEnvelope::invalid_scope());
        }
    }

    Ok(names.join(" "))
}
