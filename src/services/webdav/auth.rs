use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};

use crate::models::Credentials;

/// Credentials of the current session.
///
/// Owned by the repository façade and passed by reference to every request
/// builder, so independent sessions can coexist in one process.
#[derive(Debug, Clone, Default)]
pub struct AuthContext {
    credentials: Option<Credentials>,
}

impl AuthContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Context holding credentials that have not been verified yet; used to
    /// probe the server before committing them.
    pub fn with_credentials(credentials: Credentials) -> Self {
        Self {
            credentials: Some(credentials),
        }
    }

    pub fn set_credentials(&mut self, credentials: Credentials) {
        self.credentials = Some(credentials);
    }

    pub fn clear(&mut self) {
        self.credentials = None;
    }

    pub fn credentials(&self) -> Option<&Credentials> {
        self.credentials.as_ref()
    }

    pub fn is_set(&self) -> bool {
        self.credentials.is_some()
    }

    /// Headers to attach to a request: `Authorization: Basic ...`, or
    /// nothing for absent or anonymous credentials.
    pub fn headers_for(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let Some(value) = self.authorization_value() {
            headers.insert(AUTHORIZATION, value);
        }
        headers
    }

    fn authorization_value(&self) -> Option<HeaderValue> {
        let credentials = self.credentials.as_ref().filter(|c| !c.is_anonymous())?;
        let token = BASE64.encode(format!("{}:{}", credentials.username, credentials.password));
        let mut value = HeaderValue::from_str(&format!("Basic {}", token)).ok()?;
        value.set_sensitive(true);
        Some(value)
    }
}
