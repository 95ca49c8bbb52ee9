//! Progress-callback trait for per-item generation events.
//!
//! Inject an [`Arc<dyn GenerationProgressCallback>`] via
//! [`crate::config::GenerationConfigBuilder::progress_callback`] to receive
//! events as each pipeline in a batch starts and finishes.
//!
//! # Example
//!
//! ```rust
//! use lorem_press::{GenerationProgressCallback, GenerationConfig};
//! use std::path::Path;
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct CountingCallback {
//!     written: AtomicUsize,
//! }
//!
//! impl GenerationProgressCallback for CountingCallback {
//!     fn on_item_complete(&self, item: usize, total: usize, path: &Path) {
//!         self.written.fetch_add(1, Ordering::SeqCst);
//!         eprintln!("{item}/{total} -> {}", path.display());
//!     }
//! }
//!
//! let counter = Arc::new(CountingCallback { written: AtomicUsize::new(0) });
//!
//! let config = GenerationConfig::builder()
//!     .progress_callback(counter as Arc<dyn GenerationProgressCallback>)
//!     .build()
//!     .unwrap();
//! ```

use std::path::Path;
use std::sync::Arc;

/// Called by the batch as it processes each item.
///
/// Every pipeline runs on its own Tokio task, so `on_item_start`,
/// `on_item_complete` and `on_item_error` are called concurrently from
/// different threads. Implementations must protect shared mutable state with
/// appropriate synchronisation primitives (e.g. `Mutex`, `AtomicUsize`).
/// All methods default to no-ops.
pub trait GenerationProgressCallback: Send + Sync {
    /// Called once before any pipeline is spawned.
    fn on_batch_start(&self, total: usize) {
        let _ = total;
    }

    /// Called when a pipeline begins fetching.
    ///
    /// # Arguments
    /// * `item`: 1-indexed position in the batch
    /// * `total`: batch size
    fn on_item_start(&self, item: usize, total: usize) {
        let _ = (item, total);
    }

    /// Called when an entry has been written.
    fn on_item_complete(&self, item: usize, total: usize, path: &Path) {
        let _ = (item, total, path);
    }

    /// Called when a pipeline fails at any step.
    fn on_item_error(&self, item: usize, total: usize, error: &str) {
        let _ = (item, total, error);
    }

    /// Called once after every pipeline has reported, right before the
    /// completion callback.
    fn on_batch_complete(&self, total: usize, success_count: usize) {
        let _ = (total, success_count);
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl GenerationProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::GenerationConfig`].
pub type ProgressCallback = Arc<dyn GenerationProgressCallback>;
