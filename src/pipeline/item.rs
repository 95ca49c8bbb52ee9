//! One pipeline: fetch → decode → transform → assemble → write.
//!
//! [`run_item`] always returns an [`ItemOutcome`] and never propagates an
//! error upward, so one bad item cannot abort its siblings. Each stage maps
//! its own failure to the matching [`ItemError`] variant and the `?` chain
//! short-circuits the remaining stages for this item only.

use crate::config::GenerationConfig;
use crate::error::{ItemError, LoremPressError};
use crate::output::{ItemOutcome, RunState};
use crate::pipeline::assemble::assemble_entry;
use crate::pipeline::decode::decode_text;
use crate::pipeline::fetch::{FetchError, HttpSource, MarkdownSource};
use crate::pipeline::transform::rewrite_headings;
use crate::pipeline::write::{EntryStore, FsStore};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Everything a pipeline needs besides its own control block. Shared by every
/// pipeline of a batch.
#[derive(Clone)]
pub struct PipelineContext {
    pub config: GenerationConfig,
    pub source: Arc<dyn MarkdownSource>,
    pub store: Arc<dyn EntryStore>,
}

impl fmt::Debug for PipelineContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PipelineContext")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl PipelineContext {
    /// Resolve the source and store, from most-specific to least-specific:
    /// a pre-built override in the config wins, otherwise the HTTP source and
    /// file-system store are constructed.
    pub fn from_config(config: &GenerationConfig) -> Result<Self, LoremPressError> {
        let source: Arc<dyn MarkdownSource> = match config.source {
            Some(ref source) => Arc::clone(source),
            None => Arc::new(
                HttpSource::new(config.fetch_timeout_secs)
                    .map_err(|e| LoremPressError::HttpClient(e.to_string()))?,
            ),
        };
        let store: Arc<dyn EntryStore> = match config.store {
            Some(ref store) => Arc::clone(store),
            None => Arc::new(FsStore),
        };
        Ok(Self {
            config: config.clone(),
            source,
            store,
        })
    }
}

/// Per-pipeline execution state and cancellation switch.
#[derive(Debug)]
pub struct ItemControl {
    index: usize,
    state: AtomicU8,
    cancel: CancellationToken,
}

impl ItemControl {
    /// A suspended pipeline at 1-indexed position `index`.
    pub fn new(index: usize) -> Self {
        Self {
            index,
            state: AtomicU8::new(RunState::Suspended.as_u8()),
            cancel: CancellationToken::new(),
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn state(&self) -> RunState {
        RunState::from_u8(self.state.load(Ordering::SeqCst))
    }

    /// Request cancellation of the in-flight fetch.
    ///
    /// Returns `false` if the pipeline already reported or a cancellation is
    /// already pending. A cancelled pipeline still reports exactly one
    /// outcome, a `Transport` failure, unless its fetch had already finished.
    pub fn cancel(&self) -> bool {
        let mut current = self.state.load(Ordering::SeqCst);
        loop {
            match RunState::from_u8(current) {
                RunState::Completed | RunState::Canceling => return false,
                RunState::Suspended | RunState::Running => {
                    match self.state.compare_exchange(
                        current,
                        RunState::Canceling.as_u8(),
                        Ordering::SeqCst,
                        Ordering::SeqCst,
                    ) {
                        Ok(_) => break,
                        Err(actual) => current = actual,
                    }
                }
            }
        }
        self.cancel.cancel();
        true
    }

    /// Suspended → Running. A pending cancellation is left in place.
    pub(crate) fn mark_running(&self) {
        let _ = self.state.compare_exchange(
            RunState::Suspended.as_u8(),
            RunState::Running.as_u8(),
            Ordering::SeqCst,
            Ordering::SeqCst,
        );
    }

    pub(crate) fn mark_completed(&self) {
        self.state.store(RunState::Completed.as_u8(), Ordering::SeqCst);
    }
}

/// Run one pipeline to its single outcome.
///
/// The caller reports the outcome and then calls `mark_completed`.
pub async fn run_item(
    ctx: &PipelineContext,
    control: &ItemControl,
    total: usize,
    destination: &Path,
) -> ItemOutcome {
    control.mark_running();
    let item = control.index();
    if let Some(ref cb) = ctx.config.progress_callback {
        cb.on_item_start(item, total);
    }

    let outcome = ItemOutcome::from(produce_entry(ctx, control, destination).await);

    match &outcome {
        ItemOutcome::Success(path) => {
            debug!("Item {}/{}: wrote {}", item, total, path.display());
            if let Some(ref cb) = ctx.config.progress_callback {
                cb.on_item_complete(item, total, path);
            }
        }
        ItemOutcome::Failure(e) => {
            warn!("Item {}/{} failed: {}", item, total, e);
            if let Some(ref cb) = ctx.config.progress_callback {
                cb.on_item_error(item, total, &e.to_string());
            }
        }
    }
    outcome
}

async fn produce_entry(
    ctx: &PipelineContext,
    control: &ItemControl,
    destination: &Path,
) -> Result<PathBuf, ItemError> {
    let item = control.index();
    let url = &ctx.config.source_url;

    // ── Fetch ────────────────────────────────────────────────────────────
    let fetched = tokio::select! {
        biased;
        _ = control.cancel.cancelled() => Err(FetchError::Transport("request cancelled".into())),
        result = ctx.source.fetch(url) => result,
    };
    let bytes = fetched.map_err(|e| match e {
        FetchError::Transport(reason) => ItemError::Transport {
            item,
            url: url.to_string(),
            reason,
        },
        FetchError::NoData => ItemError::NoData {
            item,
            url: url.to_string(),
        },
    })?;

    // ── Decode ───────────────────────────────────────────────────────────
    let markdown = decode_text(bytes).map_err(|e| ItemError::Decode {
        item,
        detail: e.to_string(),
    })?;

    // ── Transform + assemble ─────────────────────────────────────────────
    // ThreadRng is !Send: keep it out of scope across the write await.
    let entry = {
        let mut rng = rand::thread_rng();
        let rewritten = rewrite_headings(&markdown, &ctx.config.image_template, &mut rng)
            .map_err(|_| ItemError::MissingTitle { item })?;
        assemble_entry(rewritten, destination, &ctx.config, &mut rng)
    };

    // ── Write ────────────────────────────────────────────────────────────
    let path = entry.destination().to_path_buf();
    let text = entry.rendered_text().map_err(|e| ItemError::Write {
        item,
        path: path.clone(),
        detail: format!("front matter: {e}"),
    })?;
    ctx.store
        .write(&path, &text)
        .await
        .map_err(|e| ItemError::Write {
            item,
            path: path.clone(),
            detail: e.to_string(),
        })?;

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::fetch::MockMarkdownSource;
    use crate::pipeline::write::MockEntryStore;

    const SAMPLE: &str = "# Hello World\n\nSome text.\n\n## Sub\n\nMore.";

    fn context(source: MockMarkdownSource, store: MockEntryStore) -> PipelineContext {
        let config = GenerationConfig::builder()
            .source(Arc::new(source))
            .store(Arc::new(store))
            .build()
            .unwrap();
        PipelineContext::from_config(&config).unwrap()
    }

    fn source_returning(result: Result<Vec<u8>, FetchError>) -> MockMarkdownSource {
        let mut source = MockMarkdownSource::new();
        source
            .expect_fetch()
            .times(1)
            .returning(move |_| result.clone());
        source
    }

    fn unused_store() -> MockEntryStore {
        let mut store = MockEntryStore::new();
        store.expect_write().times(0);
        store
    }

    #[tokio::test]
    async fn successful_item_writes_slugged_file() {
        let mut store = MockEntryStore::new();
        store
            .expect_write()
            .times(1)
            .returning(|path, text| {
                assert_eq!(path, Path::new("posts/hello-world.md"));
                assert!(text.starts_with("---\ntitle: Hello World\n"));
                assert!(text.contains("![Sub]("));
                assert!(!text.contains("# Hello World"));
                Ok(())
            });
        let ctx = context(source_returning(Ok(SAMPLE.as_bytes().to_vec())), store);
        let control = ItemControl::new(1);

        let outcome = run_item(&ctx, &control, 1, Path::new("posts")).await;

        assert_eq!(outcome, ItemOutcome::Success(PathBuf::from("posts/hello-world.md")));
        assert_eq!(control.state(), RunState::Running);
    }

    #[tokio::test]
    async fn transport_failure_skips_later_stages() {
        let ctx = context(
            source_returning(Err(FetchError::Transport("HTTP 502 Bad Gateway".into()))),
            unused_store(),
        );
        let outcome = run_item(&ctx, &ItemControl::new(4), 5, Path::new("posts")).await;
        match outcome {
            ItemOutcome::Failure(ItemError::Transport { item, reason, .. }) => {
                assert_eq!(item, 4);
                assert!(reason.contains("502"));
            }
            other => panic!("expected transport failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn empty_body_is_no_data() {
        let ctx = context(source_returning(Err(FetchError::NoData)), unused_store());
        let outcome = run_item(&ctx, &ItemControl::new(2), 2, Path::new("posts")).await;
        assert!(matches!(
            outcome,
            ItemOutcome::Failure(ItemError::NoData { item: 2, .. })
        ));
    }

    #[tokio::test]
    async fn invalid_utf8_is_decode_error() {
        let ctx = context(source_returning(Ok(vec![0xc3, 0x28])), unused_store());
        let outcome = run_item(&ctx, &ItemControl::new(1), 1, Path::new("posts")).await;
        assert!(matches!(
            outcome,
            ItemOutcome::Failure(ItemError::Decode { item: 1, .. })
        ));
    }

    #[tokio::test]
    async fn no_heading_is_missing_title() {
        let ctx = context(
            source_returning(Ok(b"plain text, no headings at all".to_vec())),
            unused_store(),
        );
        let outcome = run_item(&ctx, &ItemControl::new(3), 3, Path::new("posts")).await;
        assert_eq!(outcome, ItemOutcome::Failure(ItemError::MissingTitle { item: 3 }));
    }

    #[tokio::test]
    async fn store_failure_is_write_error() {
        let mut store = MockEntryStore::new();
        store.expect_write().times(1).returning(|_, _| {
            Err(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "read-only file system",
            ))
        });
        let ctx = context(source_returning(Ok(SAMPLE.as_bytes().to_vec())), store);
        let outcome = run_item(&ctx, &ItemControl::new(1), 1, Path::new("posts")).await;
        match outcome {
            ItemOutcome::Failure(ItemError::Write { path, detail, .. }) => {
                assert_eq!(path, PathBuf::from("posts/hello-world.md"));
                assert!(detail.contains("read-only"));
            }
            other => panic!("expected write failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn cancelled_before_fetch_is_transport_error() {
        let mut source = MockMarkdownSource::new();
        source
            .expect_fetch()
            .returning(|_| Ok(SAMPLE.as_bytes().to_vec()));
        let ctx = context(source, unused_store());
        let control = ItemControl::new(1);

        assert!(control.cancel());
        assert_eq!(control.state(), RunState::Canceling);
        assert!(!control.cancel(), "second cancel is a no-op");

        let outcome = run_item(&ctx, &control, 1, Path::new("posts")).await;
        match outcome {
            ItemOutcome::Failure(ItemError::Transport { reason, .. }) => {
                assert_eq!(reason, "request cancelled");
            }
            other => panic!("expected cancellation, got {other:?}"),
        }
        assert_eq!(control.state(), RunState::Canceling);
    }

    #[test]
    fn control_lifecycle() {
        let control = ItemControl::new(9);
        assert_eq!(control.index(), 9);
        assert_eq!(control.state(), RunState::Suspended);
        control.mark_running();
        assert_eq!(control.state(), RunState::Running);
        control.mark_completed();
        assert_eq!(control.state(), RunState::Completed);
        assert!(!control.cancel(), "completed pipelines cannot be cancelled");
    }
}
