//! Streaming generation API: emit item outcomes as they complete.
//!
//! Unlike [`crate::generate::generate`], which folds everything into one
//! all-or-nothing [`crate::BatchResult`], [`generate_stream`] yields every
//! [`ItemOutcome`] (successes included) in completion order. Items are
//! spawned onto the runtime before the stream is returned, so they make
//! progress even while the caller is not polling.
//!
//! Only item-level progress events fire; the stream has no batch-complete
//! hook because the caller decides when it is done reading.

use crate::config::GenerationConfig;
use crate::error::{ItemError, LoremPressError};
use crate::generate::prepare_destination;
use crate::output::ItemOutcome;
use crate::pipeline::item::{run_item, ItemControl, PipelineContext};
use futures::stream::FuturesUnordered;
use std::path::Path;
use std::pin::Pin;
use std::sync::Arc;
use tokio_stream::Stream;
use tracing::info;

/// A boxed stream of item outcomes.
pub type OutcomeStream = Pin<Box<dyn Stream<Item = ItemOutcome> + Send>>;

/// Generate `count` entries, streaming each outcome as soon as it is ready.
///
/// The stream ends after exactly `count` items.
///
/// # Example
/// ```rust,no_run
/// use lorem_press::{generate_stream, GenerationConfig, ItemOutcome};
/// use futures::StreamExt;
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = GenerationConfig::default();
/// let mut outcomes = generate_stream(5, "posts", &config).await?;
/// while let Some(outcome) = outcomes.next().await {
///     match outcome {
///         ItemOutcome::Success(path) => println!("wrote {}", path.display()),
///         ItemOutcome::Failure(e) => eprintln!("error: {e}"),
///     }
/// }
/// # Ok(())
/// # }
/// ```
pub async fn generate_stream(
    count: usize,
    destination: impl AsRef<Path>,
    config: &GenerationConfig,
) -> Result<OutcomeStream, LoremPressError> {
    let destination = prepare_destination(destination.as_ref(), config).await?;
    let context = Arc::new(PipelineContext::from_config(config)?);
    info!(
        "Starting streaming batch of {} items into {}",
        count,
        destination.display()
    );

    let pending: FuturesUnordered<_> = (1..=count)
        .map(|item| {
            let context = Arc::clone(&context);
            let destination = destination.clone();
            let handle = tokio::spawn(async move {
                let control = ItemControl::new(item);
                let outcome = run_item(&context, &control, count, &destination).await;
                control.mark_completed();
                outcome
            });
            async move {
                handle.await.unwrap_or_else(|e| {
                    ItemOutcome::Failure(ItemError::Interrupted {
                        item,
                        detail: e.to_string(),
                    })
                })
            }
        })
        .collect();

    Ok(Box::pin(pending))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::fetch::{FetchError, MarkdownSource, MockMarkdownSource};
    use crate::pipeline::write::MockEntryStore;
    use async_trait::async_trait;
    use futures::StreamExt;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use url::Url;

    /// Panics on the second request it receives.
    struct PanicOnSecond {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl MarkdownSource for PanicOnSecond {
        async fn fetch(&self, _url: &Url) -> Result<Vec<u8>, FetchError> {
            if self.calls.fetch_add(1, Ordering::SeqCst) == 1 {
                panic!("boom");
            }
            Ok(b"# Fine\n\ntext".to_vec())
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn yields_every_outcome_including_successes() {
        let tmp = tempfile::tempdir().unwrap();
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let mut source = MockMarkdownSource::new();
        source.expect_fetch().times(6).returning(move |_| {
            if counter.fetch_add(1, Ordering::SeqCst) % 3 == 0 {
                Err(FetchError::NoData)
            } else {
                Ok(b"# Streamed\n\n## Part\n\ntext".to_vec())
            }
        });
        let mut store = MockEntryStore::new();
        store.expect_write().times(4).returning(|_, _| Ok(()));

        let config = GenerationConfig::builder()
            .source(Arc::new(source))
            .store(Arc::new(store))
            .build()
            .unwrap();

        let outcomes: Vec<ItemOutcome> = generate_stream(6, tmp.path(), &config)
            .await
            .unwrap()
            .collect()
            .await;

        assert_eq!(outcomes.len(), 6);
        assert_eq!(outcomes.iter().filter(|o| o.is_success()).count(), 4);
        let mut failed_items: Vec<usize> = outcomes
            .iter()
            .filter_map(|o| match o {
                ItemOutcome::Failure(e) => Some(e.item()),
                ItemOutcome::Success(_) => None,
            })
            .collect();
        failed_items.sort_unstable();
        failed_items.dedup();
        assert_eq!(failed_items.len(), 2, "each failing item reports once");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn panicked_item_is_streamed_as_interrupted() {
        let tmp = tempfile::tempdir().unwrap();
        let mut store = MockEntryStore::new();
        store.expect_write().times(3).returning(|_, _| Ok(()));
        let config = GenerationConfig::builder()
            .source(Arc::new(PanicOnSecond {
                calls: AtomicUsize::new(0),
            }))
            .store(Arc::new(store))
            .build()
            .unwrap();

        let outcomes: Vec<ItemOutcome> = generate_stream(4, tmp.path(), &config)
            .await
            .unwrap()
            .collect()
            .await;

        assert_eq!(outcomes.len(), 4);
        let interrupted: Vec<&ItemError> = outcomes
            .iter()
            .filter_map(|o| match o {
                ItemOutcome::Failure(e) => Some(e),
                ItemOutcome::Success(_) => None,
            })
            .collect();
        assert_eq!(interrupted.len(), 1);
        match interrupted[0] {
            ItemError::Interrupted { detail, .. } => {
                assert!(detail.contains("boom"), "got: {detail}")
            }
            other => panic!("expected interrupted, got {other:?}"),
        }
    }
}
