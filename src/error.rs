//! Error types for the lorem-press library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`LoremPressError`] is **fatal**: the batch cannot be started at all
//!   (invalid configuration, destination directory cannot be created, HTTP
//!   client cannot be built). Returned as `Err(LoremPressError)` from the
//!   top-level `generate*` functions.
//!
//! * [`ItemError`] is **non-fatal**: a single pipeline failed (network error,
//!   empty body, no title, write error) but every other item in the batch
//!   carries on. Stored inside [`crate::output::ItemOutcome`] and
//!   [`crate::output::BatchResult`] as plain data, never propagated upward.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the lorem-press library.
///
/// Item-level failures use [`ItemError`] and are collected into
/// [`crate::output::BatchResult`] rather than propagated here.
#[derive(Debug, Error)]
pub enum LoremPressError {
    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── I/O errors ────────────────────────────────────────────────────────
    /// The destination directory does not exist and could not be created.
    #[error("Destination directory '{path}' is unavailable: {source}")]
    DestinationUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── HTTP errors ───────────────────────────────────────────────────────
    /// The HTTP client backing the default markdown source could not be built.
    #[error("Failed to build HTTP client: {0}")]
    HttpClient(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A non-fatal error for a single generated item.
///
/// `item` is the 1-indexed position of the pipeline within its batch.
#[derive(Debug, Clone, PartialEq, Eq, Error, serde::Serialize, serde::Deserialize)]
pub enum ItemError {
    /// The request failed at the network or HTTP level (including timeouts
    /// and cancellation).
    #[error("Item {item}: fetching '{url}' failed: {reason}")]
    Transport {
        item: usize,
        url: String,
        reason: String,
    },

    /// The source answered successfully but returned no body.
    #[error("Item {item}: '{url}' returned no data")]
    NoData { item: usize, url: String },

    /// The body is not valid UTF-8.
    #[error("Item {item}: response is not valid UTF-8: {detail}")]
    Decode { item: usize, detail: String },

    /// The markdown contains no level-1 heading to use as the title.
    #[error("Item {item}: markdown has no top-level '# ' heading")]
    MissingTitle { item: usize },

    /// The rendered entry could not be written.
    #[error("Item {item}: failed to write '{path}': {detail}")]
    Write {
        item: usize,
        path: PathBuf,
        detail: String,
    },

    /// The pipeline task ended without reporting (panic or abort).
    #[error("Item {item}: pipeline interrupted: {detail}")]
    Interrupted { item: usize, detail: String },
}

impl ItemError {
    /// 1-indexed position of the failing item within its batch.
    pub fn item(&self) -> usize {
        match self {
            ItemError::Transport { item, .. }
            | ItemError::NoData { item, .. }
            | ItemError::Decode { item, .. }
            | ItemError::MissingTitle { item }
            | ItemError::Write { item, .. }
            | ItemError::Interrupted { item, .. } => *item,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_display() {
        let e = ItemError::Transport {
            item: 3,
            url: "https://example.org/md.txt".into(),
            reason: "HTTP 503".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("Item 3"), "got: {msg}");
        assert!(msg.contains("HTTP 503"), "got: {msg}");
    }

    #[test]
    fn missing_title_display() {
        let e = ItemError::MissingTitle { item: 7 };
        assert!(e.to_string().contains("top-level"));
        assert_eq!(e.item(), 7);
    }

    #[test]
    fn write_error_keeps_path() {
        let e = ItemError::Write {
            item: 1,
            path: PathBuf::from("/tmp/posts/hello.md"),
            detail: "permission denied".into(),
        };
        assert!(e.to_string().contains("hello.md"));
        assert_eq!(e.item(), 1);
    }

    #[test]
    fn item_error_serialises() {
        let e = ItemError::NoData {
            item: 2,
            url: "https://example.org".into(),
        };
        let json = serde_json::to_string(&e).expect("serialise");
        assert!(json.contains("NoData"));
    }

    #[test]
    fn destination_unavailable_display() {
        let e = LoremPressError::DestinationUnavailable {
            path: PathBuf::from("/nope"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(e.to_string().contains("/nope"));
    }
}
