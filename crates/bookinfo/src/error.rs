//! Failure taxonomy for one greeting request's downstream work.

use thiserror::Error;

/// Classified failure raised by the token provider or the book-info client.
///
/// The greeting handler pattern-matches this enum into its fixed response
/// messages; none of these variants ever reach the transport layer.
#[derive(Debug, Error)]
pub enum BookInfoError {
    /// Token acquisition did not produce an authorized client.
    #[error("authorization failed: {reason}")]
    Authorization {
        /// Provider-supplied reason string.
        reason: String,
    },

    /// Network-level failure reaching the book-info service.
    #[error("transport error calling the book-info service")]
    Transport {
        #[source]
        source: reqwest::Error,
    },

    /// Non-2xx status or malformed body from the book-info service.
    #[error("book-info service returned an unusable response: {detail}")]
    Protocol {
        /// HTTP status code, when one was received.
        status: Option<u16>,
        /// Short description of what was wrong with the response.
        detail: String,
    },
}

impl BookInfoError {
    /// True when the failure happened before any downstream call was made.
    pub fn is_authorization(&self) -> bool {
        matches!(self, Self::Authorization { .. })
    }
}
