use serde::{Deserialize, Serialize};

/// The principal on whose behalf tokens are issued.
///
/// Supplied entirely by the host's external identity provider; the core
/// never mutates it (§3).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceOwner {
    pub sub: String,
    pub username: Option<String>,
}

impl ResourceOwner {
    pub fn new(sub: impl Into<String>) -> Self {
        Self {
            sub: sub.into(),
            username: None,
        }
    }

    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }
}
