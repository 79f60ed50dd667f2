use std::time::{SystemTime, UNIX_EPOCH};

use hmac::{Hmac, Mac};
use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::credentials::Credentials;
use crate::error::{AuthError, Result};

type HmacSha256 = Hmac<Sha256>;

/// Header carrying the client ID.
pub const AUTHORIZATION: &str = "Authorization";

/// Header carrying the signing timestamp in milliseconds.
pub const TIMESTAMP: &str = "X-Authorization-Timestamp";

/// Header carrying the hex HMAC-SHA256 signature.
pub const SIGNATURE: &str = "X-Authorization-Signature-SHA256";

/// The parts of an HTTP request covered by the signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignRequest<'a> {
    method: String,
    path: String,
    body: &'a [u8],
}

impl SignRequest<'static> {
    /// A request with an empty body.
    ///
    /// The method is trimmed and upper-cased; the path must be absolute and
    /// may already carry its query string.
    pub fn new(method: &str, path: &str) -> Result<Self> {
        let method = method.trim();
        if method.is_empty() || !method.bytes().all(|b| b.is_ascii_alphabetic()) {
            return Err(AuthError::InvalidHttpMethod(method.to_string()));
        }
        let path = path.trim();
        if !path.starts_with('/') || path.contains(char::is_whitespace) {
            return Err(AuthError::InvalidPath(path.to_string()));
        }
        Ok(Self {
            method: method.to_ascii_uppercase(),
            path: path.to_string(),
            body: &[],
        })
    }

    pub fn get(path: &str) -> Result<Self> {
        Self::new("GET", path)
    }
}

impl<'a> SignRequest<'a> {
    /// Append a query string; a leading `?` is added when missing.
    pub fn with_search(mut self, search: &str) -> Result<Self> {
        let search = search.trim();
        if search.contains(char::is_whitespace) {
            return Err(AuthError::InvalidSearch(search.to_string()));
        }
        if !search.is_empty() && !search.starts_with('?') {
            self.path.push('?');
        }
        self.path.push_str(search);
        Ok(self)
    }

    pub fn with_body<'b>(self, body: &'b [u8]) -> SignRequest<'b> {
        SignRequest {
            method: self.method,
            path: self.path,
            body,
        }
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    /// Path including the query string, exactly as signed.
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn body(&self) -> &[u8] {
        self.body
    }
}

/// Headers to attach to a signed request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthHeaders {
    #[serde(rename = "Authorization")]
    pub authorization: String,
    #[serde(rename = "X-Authorization-Timestamp")]
    pub timestamp: u64,
    #[serde(rename = "X-Authorization-Signature-SHA256")]
    pub signature: String,
}

impl AuthHeaders {
    /// `(name, value)` pairs in the order the service documents them.
    pub fn pairs(&self) -> [(&'static str, String); 3] {
        [
            (AUTHORIZATION, self.authorization.clone()),
            (TIMESTAMP, self.timestamp.to_string()),
            (SIGNATURE, self.signature.clone()),
        ]
    }
}

/// Lower-case hex SHA-256 of the request body.
pub fn body_digest(body: &[u8]) -> String {
    hex::encode(Sha256::digest(body))
}

/// `"{METHOD} {path} {body digest} {client ID} {timestamp}"`
pub fn canonical_string(request: &SignRequest<'_>, client_id: &str, timestamp_ms: u64) -> String {
    format!(
        "{} {} {} {} {}",
        request.method,
        request.path,
        body_digest(request.body),
        client_id,
        timestamp_ms
    )
}

/// Sign `request` at `timestamp_ms`.
pub fn sign(request: &SignRequest<'_>, credentials: &Credentials, timestamp_ms: u64) -> AuthHeaders {
    let canonical = canonical_string(request, credentials.client_id(), timestamp_ms);
    let mut mac = HmacSha256::new_from_slice(credentials.secret_bytes())
        .expect("HMAC key size is always valid");
    mac.update(canonical.as_bytes());
    let signature = hex::encode(mac.finalize().into_bytes());

    tracing::debug!(
        method = %request.method,
        path = %request.path,
        timestamp_ms,
        "signed request"
    );

    AuthHeaders {
        authorization: credentials.client_id().to_string(),
        timestamp: timestamp_ms,
        signature,
    }
}

/// Milliseconds since the Unix epoch.
pub fn now_millis() -> Result<u64> {
    let elapsed = SystemTime::now().duration_since(UNIX_EPOCH)?;
    Ok(u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX))
}
