// ── Core error types ──
//
// User-facing errors from aci-core. The first five variants are the
// fail-fast validation conditions checked before any mutating call;
// the rest wrap transport/session failures from aci-api, which are
// propagated uninterpreted (no retry, no backoff).

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Fail-fast validation ─────────────────────────────────────────
    /// A required parent object does not exist on the controller.
    #[error("{kind} '{name}' does not exist on the controller -- create it first")]
    MissingPrerequisite { kind: String, name: String },

    /// Mutually exclusive or direction-dependent parameters supplied together.
    #[error("Invalid parameter combination: {message}")]
    InvalidParameterCombination { message: String },

    /// A referenced capability this tool does not implement.
    #[error("Unsupported feature: {feature}")]
    UnsupportedFeature { feature: String },

    /// A change the controller model does not support in place.
    #[error("{message}")]
    ImmutableTransition { message: String },

    /// A referenced object (e.g. a filter) is not present in an allowed scope.
    #[error("{kind} '{name}' is not configured in the target tenant or in 'common'")]
    UnmetDependency { kind: String, name: String },

    // ── Connection / session ─────────────────────────────────────────
    #[error("Cannot connect to controller at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("Controller request timed out")]
    Timeout,

    // ── API errors (wrapped, not exposed raw) ────────────────────────
    #[error("APIC error {code}: {message}")]
    Api { code: String, message: String },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    pub(crate) fn missing_prerequisite(kind: &str, name: &str) -> Self {
        Self::MissingPrerequisite {
            kind: kind.to_string(),
            name: name.to_string(),
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<aci_api::Error> for CoreError {
    fn from(err: aci_api::Error) -> Self {
        match err {
            aci_api::Error::Authentication { message } => Self::AuthenticationFailed { message },
            aci_api::Error::SessionExpired => Self::AuthenticationFailed {
                message: "session expired -- re-authentication required".into(),
            },
            aci_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    Self::Timeout
                } else if e.is_connect() {
                    Self::ConnectionFailed {
                        url: e
                            .url()
                            .map(|u| u.to_string())
                            .unwrap_or_else(|| "<unknown>".into()),
                        reason: e.to_string(),
                    }
                } else {
                    Self::Api {
                        code: e
                            .status()
                            .map(|s| s.as_u16().to_string())
                            .unwrap_or_default(),
                        message: e.to_string(),
                    }
                }
            }
            aci_api::Error::InvalidUrl(e) => Self::Config {
                message: format!("invalid URL: {e}"),
            },
            aci_api::Error::Tls(msg) => Self::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {msg}"),
            },
            aci_api::Error::Api { code, message } => Self::Api { code, message },
            aci_api::Error::Xml { message, body: _ } => {
                Self::Internal(format!("XML error: {message}"))
            }
            aci_api::Error::UnexpectedResponse(msg) => Self::Internal(msg),
        }
    }
}
