use thiserror::Error;

/// Top-level error type for the `aci-api` crate.
///
/// Covers every failure mode of the APIC REST surface: authentication,
/// transport, the XML codec, and API-level error envelopes. `aci-core`
/// maps these into user-facing diagnostics.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// Login failed (wrong credentials, account locked, etc.)
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    /// Session cookie has expired or was revoked.
    #[error("Session expired -- re-authentication required")]
    SessionExpired,

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS handshake or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── API envelope ────────────────────────────────────────────────
    /// Error element returned inside the `imdata` envelope.
    #[error("APIC error {code}: {message}")]
    Api { code: String, message: String },

    // ── Data ────────────────────────────────────────────────────────
    /// XML parsing or serialization failed, with the raw body for debugging.
    #[error("XML error: {message}")]
    Xml { message: String, body: String },

    /// The controller answered with something the client cannot interpret.
    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),
}

impl Error {
    /// Returns `true` if this error indicates auth has expired
    /// and re-authentication might resolve it.
    pub fn is_auth_expired(&self) -> bool {
        matches!(self, Self::Authentication { .. } | Self::SessionExpired)
    }

    /// Returns `true` if this is a "not found" transport error.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Transport(e) => e.status() == Some(reqwest::StatusCode::NOT_FOUND),
            _ => false,
        }
    }
}
