use secrecy::SecretString;

/// Credentials for the APIC session login.
///
/// The APIC only offers cookie-based session auth on its native REST
/// surface: `aaaLogin` returns a token that the controller also sets as
/// the `APIC-cookie`, which the client's cookie jar replays afterwards.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: SecretString,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: SecretString) -> Self {
        Self {
            username: username.into(),
            password,
        }
    }
}
