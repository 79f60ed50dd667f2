//! Request authentication for the Data Streams API.
//!
//! Every request carries three headers derived from an HMAC-SHA256 over a
//! canonical string:
//! - `Authorization`: the client ID
//! - `X-Authorization-Timestamp`: milliseconds since the Unix epoch
//! - `X-Authorization-Signature-SHA256`: lower-case hex MAC
//!
//! Signing is pure. The timestamp is an input, so a signature can be
//! reproduced exactly; [`Credentials::sign_now`] is the only entry point
//! that reads the clock.

pub mod credentials;
pub mod endpoint;
pub mod error;
pub mod signer;

pub use credentials::{Credentials, CLIENT_ID_ENV, CLIENT_SECRET_ENV};
pub use endpoint::{
    bulk_reports_path, report_path, request_url, websocket_path, API_URL_ENV,
    BULK_REPORTS_PATH, REPORTS_PATH, WS_PATH, WS_URL_ENV,
};
pub use error::{AuthError, Result};
pub use signer::{
    body_digest, canonical_string, now_millis, sign, AuthHeaders, SignRequest, AUTHORIZATION,
    SIGNATURE, TIMESTAMP,
};
