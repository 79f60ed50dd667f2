use std::fmt;
use std::io;

use datastreams_auth::AuthError;
use datastreams_report::ReportError;

// Exit codes follow the sysexits-style ranges used across our CLIs.
pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;
pub const PERMISSION_DENIED: i32 = 50;
pub const DATA_INVALID: i32 = 60;
pub const USAGE: i32 = 64;
pub const INTERNAL: i32 = 125;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn usage(message: impl Into<String>) -> Self {
        Self::new(USAGE, message)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

pub fn io_error(context: &str, err: io::Error) -> CliError {
    let code = match err.kind() {
        io::ErrorKind::PermissionDenied => PERMISSION_DENIED,
        io::ErrorKind::NotFound => USAGE,
        _ => INTERNAL,
    };
    CliError::new(code, format!("{context}: {err}"))
}

pub fn report_error(context: &str, err: ReportError) -> CliError {
    match err {
        ReportError::Api(_) => CliError::new(FAILURE, format!("{context}: {err}")),
        ReportError::InvalidFeedId(_) => CliError::new(USAGE, format!("{context}: {err}")),
        other => CliError::new(DATA_INVALID, format!("{context}: {other}")),
    }
}

pub fn auth_error(context: &str, err: AuthError) -> CliError {
    match err {
        AuthError::Clock(_) => CliError::new(INTERNAL, format!("{context}: {err}")),
        other => CliError::new(USAGE, format!("{context}: {other}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use datastreams_report::{AbiError, FeedVersion};

    #[test]
    fn decode_failures_are_data_invalid() {
        let err = report_error("decode", ReportError::UnknownFeedVersion { version: 7 });
        assert_eq!(err.code, DATA_INVALID);
        assert_eq!(err.message, "decode: unknown feed version 7");

        let err = report_error(
            "decode",
            ReportError::PayloadSchemaMismatch {
                version: FeedVersion::V2,
                source: AbiError::TruncatedInput {
                    needed: 224,
                    available: 32,
                },
            },
        );
        assert_eq!(err.code, DATA_INVALID);
    }

    #[test]
    fn api_errors_are_failures() {
        let err = report_error("fetch", ReportError::Api("not found".into()));
        assert_eq!(err.code, FAILURE);
    }

    #[test]
    fn missing_credentials_are_usage_errors() {
        assert_eq!(auth_error("sign", AuthError::NoClientId).code, USAGE);
    }
}
