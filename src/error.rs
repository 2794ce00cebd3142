//! Error taxonomy for the client core.
//!
//! Three failure classes cross this crate's boundary:
//! - transport failures (no response at all),
//! - HTTP error statuses (4xx/5xx, with the envelope message recovered
//!   when the body parses),
//! - storage I/O from the credential store backend.
//!
//! Envelope-level failure codes (a 2xx response whose `code` is not 200)
//! are *not* errors — operations hand the envelope back to the caller
//! for user-facing handling. Malformed persisted data never surfaces as
//! an error either; the credential store degrades it to the logged-out
//! state.

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by API calls and the storage backend.
#[derive(Debug, Error)]
pub enum Error {
    /// Transport-level failure: DNS, connect, timeout, TLS.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The server answered with a non-success HTTP status.
    #[error("HTTP {status}: {message}")]
    Http {
        /// HTTP status code.
        status: u16,
        /// Message recovered from the response envelope, or the raw body.
        message: String,
    },

    /// A success response whose body failed to decode as an envelope.
    #[error("response decode failed: {0}")]
    Decode(#[from] serde_json::Error),

    /// Storage backend I/O failure.
    #[error("storage error: {0}")]
    Storage(#[from] std::io::Error),
}
