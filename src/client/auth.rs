use crate::error::LoadError;
use base64::Engine;
use serde::Deserialize;

/// Supplies the username and password sent with every load request.
///
/// Implementations are consulted once per request, so a provider may rotate
/// secrets between calls without rebuilding the loader.
pub trait CredentialProvider: Send + Sync {
    fn credentials(&self) -> Result<Credentials, LoadError>;
}

/// Username and password for HTTP Basic authentication
#[derive(Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Credentials {
    pub username: String,
    #[serde(default)]
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Value for the `Authorization` header: `Basic base64(username:password)`
    pub fn authorization(&self) -> String {
        let encoded = base64::engine::general_purpose::STANDARD
            .encode(format!("{}:{}", self.username, self.password));
        format!("Basic {}", encoded)
    }
}

impl CredentialProvider for Credentials {
    fn credentials(&self) -> Result<Credentials, LoadError> {
        Ok(self.clone())
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl std::fmt::Display for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Basic ({})", self.username)
    }
}

/// Reads credentials from environment variables on every request
#[derive(Clone, Debug)]
pub struct EnvCredentials {
    username_var: String,
    password_var: String,
}

impl EnvCredentials {
    pub fn new(username_var: impl Into<String>, password_var: impl Into<String>) -> Self {
        Self {
            username_var: username_var.into(),
            password_var: password_var.into(),
        }
    }
}

impl Default for EnvCredentials {
    fn default() -> Self {
        Self::new("STREAM_LOAD_USERNAME", "STREAM_LOAD_PASSWORD")
    }
}

impl CredentialProvider for EnvCredentials {
    fn credentials(&self) -> Result<Credentials, LoadError> {
        let username = std::env::var(&self.username_var).map_err(|_| {
            LoadError::Credentials(format!("{} environment variable not set", self.username_var))
        })?;
        // An unset password is an empty one, the default for fresh clusters
        let password = std::env::var(&self.password_var).unwrap_or_default();
        Ok(Credentials { username, password })
    }
}
