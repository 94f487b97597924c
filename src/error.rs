//! The external error contract (§6, §7) plus the internal failure modes
//! (`CoreError`) that feed it.
//!
//! The two are kept distinct on purpose: `CoreError` is how fallible
//! internals (repository calls, clock, hashing) report failure to the rest
//! of the crate, while `ErrorEnvelope` is the wire-shaped value the host
//! ultimately renders. Only `From<CoreError> for ErrorEnvelope` bridges them,
//! and it never leaks a `CoreError`'s `Display` text verbatim unless that
//! text is itself one of the contractual strings the wire format expects.

use serde::Serialize;

/// The closed set of error codes the core ever returns (§6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    InvalidRequest,
    InvalidClient,
    InvalidScope,
    InvalidCode,
    InvalidGrant,
    InvalidResourceOwner,
    InvalidBearer,
    InvalidAccessToken,
    UnsupportedGrantType,
    LoginRequired,
}

/// HTTP-shaped status the host should answer with (§6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    BadRequest,
    Unauthorized,
    Forbidden,
    InternalServerError,
}

/// Where an error must be rendered when it originates on the `/authorize`
/// surface (§6, §7).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Format {
    Query,
    Fragment,
}

/// The structured error returned to the Application callback on any
/// failed entry point (§6).
#[derive(Debug, Clone, Serialize)]
pub struct ErrorEnvelope {
    pub error: ErrorCode,
    pub error_description: String,
    pub status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<Format>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect_uri: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
}

impl ErrorEnvelope {
    pub fn new(error: ErrorCode, description: impl Into<String>, status: Status) -> Self {
        Self {
            error,
            error_description: description.into(),
            status,
            format: None,
            redirect_uri: None,
            state: None,
        }
    }

    /// Attach the redirect rendering the authorize surface needs (§7).
    pub fn with_redirect(mut self, format: Format, redirect_uri: impl Into<String>) -> Self {
        self.format = Some(format);
        self.redirect_uri = Some(redirect_uri.into());
        self
    }

    pub fn with_state(mut self, state: Option<String>) -> Self {
        self.state = state;
        self
    }

    pub fn invalid_request(description: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidRequest, description, Status::BadRequest)
    }

    pub fn invalid_client(status: Status) -> Self {
        Self::new(
            ErrorCode::InvalidClient,
            "Invalid client_id or redirect_uri.",
            status,
        )
    }

    pub fn invalid_scope() -> Self {
        Self::new(
            ErrorCode::InvalidScope,
            "Given scopes are unknown or unauthorized.",
            Status::BadRequest,
        )
    }

    pub fn invalid_code() -> Self {
        Self::new(
            ErrorCode::InvalidCode,
            "Provided authorization code is incorrect.",
            Status::BadRequest,
        )
    }

    pub fn invalid_grant(description: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidGrant, description, Status::BadRequest)
    }

    pub fn invalid_resource_owner() -> Self {
        Self::new(
            ErrorCode::InvalidResourceOwner,
            "Resource owner is required.",
            Status::BadRequest,
        )
    }

    pub fn invalid_bearer() -> Self {
        Self::new(
            ErrorCode::InvalidBearer,
            "Invalid bearer from Authorization header.",
            Status::Unauthorized,
        )
    }

    pub fn invalid_access_token() -> Self {
        Self::new(
            ErrorCode::InvalidAccessToken,
            "Provided access token is invalid.",
            Status::Unauthorized,
        )
    }

    pub fn unsupported_grant_type() -> Self {
        Self::new(
            ErrorCode::UnsupportedGrantType,
            "Client do not support given grant type.",
            Status::BadRequest,
        )
    }
}

/// Internal failure modes. Never exposed directly to a host; always
/// funneled through `ErrorEnvelope` at the entry-point boundary.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("repository operation failed: {0}")]
    Repository(#[from] anyhow::Error),

    #[error("resource owner lookup failed")]
    ResourceOwnerLookup,

    #[error("client secret hashing failed")]
    SecretHashing,
}

impl From<CoreError> for ErrorEnvelope {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Repository(_) => Self::new(
                ErrorCode::InvalidRequest,
                "A repository error occurred.",
                Status::InternalServerError,
            ),
            CoreError::ResourceOwnerLookup => Self::invalid_resource_owner(),
            CoreError::SecretHashing => Self::new(
                ErrorCode::InvalidClient,
                "Invalid client_id or redirect_uri.",
                Status::Unauthorized,
            ),
        }
    }
}
