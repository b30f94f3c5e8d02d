//! Controller connection configuration.
//!
//! Consumers (the CLI) build a [`ControllerConfig`] from their own
//! profile/flag machinery; core only ever sees this resolved form.

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use url::Url;

/// TLS verification policy for the controller connection.
#[derive(Debug, Clone, Default)]
pub enum TlsVerification {
    /// Use the system certificate store.
    #[default]
    SystemDefaults,
    /// Use a custom CA certificate from the given PEM file.
    CustomCa(PathBuf),
    /// Accept any certificate (self-signed APICs).
    DangerAcceptInvalid,
}

/// Resolved configuration for one controller connection.
#[derive(Debug, Clone)]
pub struct ControllerConfig {
    /// Controller base URL (`http://` or `https://`).
    pub url: Url,
    /// Login username.
    pub username: String,
    /// Login password.
    pub password: SecretString,
    /// TLS verification policy.
    pub tls: TlsVerification,
    /// Per-request timeout.
    pub timeout: Duration,
}
