//! Signed report decoding and request signing for the Data Streams API.
//!
//! The crate performs no network I/O: fetch report bytes with any HTTP or
//! websocket client, attach the headers from [`auth`], and hand the
//! response to [`report`].
//!
//! # Crate Structure
//!
//! - [`abi`]: the 32-byte word tuple codec the reports are packed with
//! - [`report`]: envelope, feed version and versioned payload decoding
//! - [`auth`]: HMAC-SHA256 request signing and endpoint paths

/// Re-export tuple codec types.
pub mod abi {
    pub use datastreams_abi::*;
}

/// Re-export report decoding types.
pub mod report {
    pub use datastreams_report::*;
}

/// Re-export request signing types.
pub mod auth {
    pub use datastreams_auth::*;
}
