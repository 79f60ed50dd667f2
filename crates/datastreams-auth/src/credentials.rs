use std::fmt;

use crate::error::{AuthError, Result};
use crate::signer::{self, AuthHeaders, SignRequest};

/// Environment variable holding the client ID.
pub const CLIENT_ID_ENV: &str = "CHAINLINK_CLIENT_ID";

/// Environment variable holding the client secret.
pub const CLIENT_SECRET_ENV: &str = "CHAINLINK_CLIENT_SECRET";

/// An API client ID and its HMAC secret.
///
/// The secret is never printed; `Debug` redacts it.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    client_id: String,
    client_secret: String,
}

impl Credentials {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Result<Self> {
        let client_id = client_id.into();
        let client_secret = client_secret.into();
        if client_id.is_empty() {
            return Err(AuthError::NoClientId);
        }
        if client_id.contains(char::is_whitespace) {
            return Err(AuthError::InvalidClientId);
        }
        if client_secret.is_empty() {
            return Err(AuthError::NoClientSecret);
        }
        Ok(Self {
            client_id,
            client_secret,
        })
    }

    /// Read [`CLIENT_ID_ENV`] and [`CLIENT_SECRET_ENV`].
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`from_env`](Self::from_env) with a custom variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let client_id = lookup(CLIENT_ID_ENV).ok_or(AuthError::NoClientId)?;
        let client_secret = lookup(CLIENT_SECRET_ENV).ok_or(AuthError::NoClientSecret)?;
        Self::new(client_id, client_secret)
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub(crate) fn secret_bytes(&self) -> &[u8] {
        self.client_secret.as_bytes()
    }

    /// Sign `request` at an explicit timestamp.
    pub fn sign(&self, request: &SignRequest<'_>, timestamp_ms: u64) -> AuthHeaders {
        signer::sign(request, self, timestamp_ms)
    }

    /// Sign `request` at the current time.
    pub fn sign_now(&self, request: &SignRequest<'_>) -> Result<AuthHeaders> {
        Ok(self.sign(request, signer::now_millis()?))
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn rejects_missing_parts() {
        assert!(matches!(Credentials::new("", "s"), Err(AuthError::NoClientId)));
        assert!(matches!(Credentials::new("id", ""), Err(AuthError::NoClientSecret)));
        assert!(matches!(
            Credentials::new("my id", "s"),
            Err(AuthError::InvalidClientId)
        ));
    }

    #[test]
    fn debug_redacts_secret() {
        let creds = Credentials::new("id-1", "hunter2").unwrap();
        let printed = format!("{creds:?}");
        assert!(printed.contains("id-1"));
        assert!(!printed.contains("hunter2"));
    }

    #[test]
    fn from_lookup_reads_both_variables() {
        let vars: HashMap<&str, &str> =
            [(CLIENT_ID_ENV, "id-2"), (CLIENT_SECRET_ENV, "secret")].into();
        let creds = Credentials::from_lookup(|k| vars.get(k).map(|v| v.to_string())).unwrap();
        assert_eq!(creds.client_id(), "id-2");

        let err = Credentials::from_lookup(|k| (k == CLIENT_ID_ENV).then(|| "id".to_string()))
            .unwrap_err();
        assert!(matches!(err, AuthError::NoClientSecret));
        assert!(matches!(
            Credentials::from_lookup(|_| None),
            Err(AuthError::NoClientId)
        ));
    }

    #[test]
    fn sign_now_uses_current_clock() {
        let creds = Credentials::new("id", "secret").unwrap();
        let request = SignRequest::get("/api/v1/reports").unwrap();
        let before = signer::now_millis().unwrap();
        let headers = creds.sign_now(&request).unwrap();
        assert!(headers.timestamp >= before);
        assert_eq!(headers, creds.sign(&request, headers.timestamp));
    }
}
