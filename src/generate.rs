//! Eager (whole-batch) generation entry points.
//!
//! [`generate`] wraps [`BatchCoordinator`] for callers that simply want to
//! await the final [`BatchResult`]. Use the coordinator directly to observe
//! run state or cancel items while the batch is in flight, or
//! [`crate::stream::generate_stream`] to consume outcomes as they land.

use crate::batch::BatchCoordinator;
use crate::config::GenerationConfig;
use crate::error::LoremPressError;
use crate::output::BatchResult;
use crate::pipeline::item::PipelineContext;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tokio::sync::oneshot;
use tracing::info;

/// Generate `count` entries into `destination` and wait for all of them.
///
/// # Returns
/// `Ok(BatchResult)` once every item has reported, whether items succeeded
/// or not; inspect the `BatchResult` for per-item failures.
///
/// # Errors
/// Returns `Err(LoremPressError)` only for fatal errors:
/// - the destination directory cannot be created or is not a directory
/// - the HTTP client cannot be built
pub async fn generate(
    count: usize,
    destination: impl AsRef<Path>,
    config: &GenerationConfig,
) -> Result<BatchResult, LoremPressError> {
    let start = Instant::now();
    let destination = prepare_destination(destination.as_ref(), config).await?;
    let context = PipelineContext::from_config(config)?;

    let (tx, rx) = oneshot::channel();
    let coordinator = BatchCoordinator::start(count, destination, context, move |result| {
        let _ = tx.send(result);
    });
    coordinator.join().await?;

    let result = rx
        .await
        .map_err(|_| LoremPressError::Internal("completion callback never fired".into()))?;
    info!(
        "Generated {} items in {}ms ({})",
        count,
        start.elapsed().as_millis(),
        if result.is_success() { "ok" } else { "with failures" }
    );
    Ok(result)
}

/// Synchronous wrapper around [`generate`].
///
/// Creates a temporary multi-threaded tokio runtime internally.
pub fn generate_sync(
    count: usize,
    destination: impl AsRef<Path>,
    config: &GenerationConfig,
) -> Result<BatchResult, LoremPressError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| LoremPressError::Internal(format!("Failed to create tokio runtime: {}", e)))?
        .block_on(generate(count, destination, config))
}

/// Create (or check) the destination directory according to the config.
pub(crate) async fn prepare_destination(
    dir: &Path,
    config: &GenerationConfig,
) -> Result<PathBuf, LoremPressError> {
    let unavailable = |source| LoremPressError::DestinationUnavailable {
        path: dir.to_path_buf(),
        source,
    };

    if config.create_destination {
        tokio::fs::create_dir_all(dir).await.map_err(unavailable)?;
    }
    let meta = tokio::fs::metadata(dir).await.map_err(unavailable)?;
    if !meta.is_dir() {
        return Err(unavailable(std::io::Error::new(
            std::io::ErrorKind::Other,
            "not a directory",
        )));
    }
    Ok(dir.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::{assert_err, assert_ok};

    #[tokio::test]
    async fn creates_missing_destination() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("sites/sample/posts");
        let config = GenerationConfig::default();
        let prepared = assert_ok!(prepare_destination(&dir, &config).await);
        assert!(prepared.is_dir());
    }

    #[test]
    fn sync_wrapper_surfaces_fatal_errors() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        let config = GenerationConfig::builder()
            .create_destination(false)
            .build()
            .unwrap();
        assert_err!(generate_sync(3, tmp.path(), &config));
    }

    #[tokio::test]
    async fn missing_destination_without_create_is_fatal() {
        let tmp = tempfile::tempdir().unwrap();
        let config = GenerationConfig::builder()
            .create_destination(false)
            .build()
            .unwrap();
        let err = prepare_destination(&tmp.path().join("absent"), &config)
            .await
            .unwrap_err();
        assert!(matches!(err, LoremPressError::DestinationUnavailable { .. }));
    }

    #[tokio::test]
    async fn file_as_destination_is_fatal() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        let config = GenerationConfig::builder()
            .create_destination(false)
            .build()
            .unwrap();
        let err = prepare_destination(tmp.path(), &config).await.unwrap_err();
        assert!(err.to_string().contains("not a directory"), "got: {err}");
    }
}
