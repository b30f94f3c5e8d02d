//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` variants into user-facing errors with actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use aci_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const UNSUPPORTED: i32 = 5;
    pub const CONFLICT: i32 = 6;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────

    #[error("Could not connect to controller at {url}")]
    #[diagnostic(
        code(aci::connection_failed),
        help(
            "Check that the APIC is running and accessible.\n\
             URL: {url}\n\
             Self-signed certificate? Try --insecure (-k)."
        )
    )]
    ConnectionFailed { url: String, reason: String },

    // ── Authentication ───────────────────────────────────────────────

    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(aci::auth_failed),
        help(
            "Verify the username and password for this controller.\n\
             Run: acictl config set-password --profile {profile}"
        )
    )]
    AuthFailed { profile: String, message: String },

    #[error("No credentials configured for profile '{profile}'")]
    #[diagnostic(
        code(aci::no_credentials),
        help(
            "Configure credentials with: acictl config init\n\
             Or set the ACI_USERNAME and ACI_PASSWORD environment variables."
        )
    )]
    NoCredentials { profile: String },

    // ── Prerequisites / dependencies ─────────────────────────────────

    #[error("{kind} '{name}' does not exist on the controller")]
    #[diagnostic(
        code(aci::missing_prerequisite),
        help("Create the {kind} first: acictl {kind} apply {name} ...")
    )]
    MissingPrerequisite { kind: String, name: String },

    #[error("{kind} '{name}' is not configured in the target tenant or in 'common'")]
    #[diagnostic(
        code(aci::unmet_dependency),
        help("Define the {kind} in the tenant (or the shared 'common' tenant) before referencing it.")
    )]
    UnmetDependency { kind: String, name: String },

    // ── Unsupported / immutable ──────────────────────────────────────

    #[error("'{feature}' is not supported")]
    #[diagnostic(code(aci::unsupported))]
    Unsupported { feature: String },

    #[error("{message}")]
    #[diagnostic(
        code(aci::immutable),
        help("Remove the object and re-apply it with the new settings.")
    )]
    ImmutableTransition { message: String },

    // ── API ──────────────────────────────────────────────────────────

    #[error("APIC error ({code}): {message}")]
    #[diagnostic(code(aci::api_error))]
    ApiError { code: String, message: String },

    // ── Validation ───────────────────────────────────────────────────

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(aci::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────

    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(aci::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: acictl config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("Configuration file not found")]
    #[diagnostic(
        code(aci::no_config),
        help(
            "Create one with: acictl config init\n\
             Expected at: {path}"
        )
    )]
    NoConfig { path: String },

    #[error(transparent)]
    #[diagnostic(code(aci::config))]
    Config(Box<figment::Error>),

    // ── Timeout ──────────────────────────────────────────────────────

    #[error("Request timed out")]
    #[diagnostic(
        code(aci::timeout),
        help("Increase timeout with --timeout or check controller responsiveness.")
    )]
    Timeout,

    // ── IO ───────────────────────────────────────────────────────────

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for CliError {
    fn from(err: figment::Error) -> Self {
        Self::Config(Box::new(err))
    }
}

impl CliError {
    /// Fill in the resolved profile name on errors that reference one.
    ///
    /// `From<CoreError>` can't know which profile was active, so the main
    /// entry point patches it in after conversion.
    pub fn with_profile(mut self, name: &str) -> Self {
        if let Self::AuthFailed {
            ref mut profile, ..
        } = self
        {
            *profile = name.to_string();
        }
        self
    }

    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::AuthFailed { .. } | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::MissingPrerequisite { .. } | Self::UnmetDependency { .. } => {
                exit_code::NOT_FOUND
            }
            Self::Unsupported { .. } => exit_code::UNSUPPORTED,
            Self::ImmutableTransition { .. } => exit_code::CONFLICT,
            Self::Timeout => exit_code::TIMEOUT,
            Self::Validation { .. } | Self::ProfileNotFound { .. } | Self::NoConfig { .. } => {
                exit_code::USAGE
            }
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { url, reason } => {
                CliError::ConnectionFailed { url, reason }
            }

            CoreError::AuthenticationFailed { message } => CliError::AuthFailed {
                profile: "default".into(),
                message,
            },

            CoreError::Timeout => CliError::Timeout,

            CoreError::MissingPrerequisite { kind, name } => {
                CliError::MissingPrerequisite { kind, name }
            }

            CoreError::UnmetDependency { kind, name } => CliError::UnmetDependency { kind, name },

            CoreError::UnsupportedFeature { feature } => CliError::Unsupported { feature },

            CoreError::ImmutableTransition { message } => {
                CliError::ImmutableTransition { message }
            }

            CoreError::InvalidParameterCombination { message } => CliError::Validation {
                field: "parameters".into(),
                reason: message,
            },

            CoreError::Api { code, message } => CliError::ApiError { code, message },

            CoreError::Config { message } => CliError::Validation {
                field: "config".into(),
                reason: message,
            },

            CoreError::Internal(message) => CliError::ApiError {
                code: "internal".into(),
                message,
            },
        }
    }
}
