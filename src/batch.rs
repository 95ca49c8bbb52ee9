//! Batch coordination: fan N pipelines out, join them, report once.
//!
//! ```text
//!                 ┌─ pipeline 1 ─┐
//! start(N, dir) ──┼─ pipeline 2 ─┼──▶ ResultAggregator ──▶ completion task ──▶ on_complete(BatchResult)
//!                 └─ pipeline N ─┘        (mutex)           (joins all N)        (exactly once)
//! ```
//!
//! Every pipeline is its own Tokio task, so pipelines run in parallel on the
//! multi-threaded runtime and finish in any order. A single completion task
//! joins all N handles; only after the last one returns does it read the
//! aggregator and invoke the callback. That task is the one place the
//! callback ever runs, and `FnOnce` rules out a second call.
//!
//! The coordinator itself cannot fail. Pipeline failures are data inside the
//! `BatchResult`.

use crate::aggregate::ResultAggregator;
use crate::error::{ItemError, LoremPressError};
use crate::output::{BatchResult, RunState};
use crate::pipeline::item::{run_item, ItemControl, PipelineContext};
use futures::future::join_all;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// A running batch of N pipelines.
///
/// Must be started from within a Tokio runtime. Dropping the coordinator
/// does not stop the batch; the callback still fires once every pipeline
/// has reported.
#[derive(Debug)]
pub struct BatchCoordinator {
    destination: PathBuf,
    controls: Vec<Arc<ItemControl>>,
    aggregator: Arc<ResultAggregator>,
    completion: JoinHandle<()>,
}

impl BatchCoordinator {
    /// Spawn `count` pipelines writing into `destination` and return
    /// immediately. `on_complete` is called exactly once, from the
    /// completion task, after all `count` pipelines have reported.
    pub fn start<F>(
        count: usize,
        destination: impl Into<PathBuf>,
        context: PipelineContext,
        on_complete: F,
    ) -> Self
    where
        F: FnOnce(BatchResult) + Send + 'static,
    {
        let destination = destination.into();
        let context = Arc::new(context);
        let aggregator = Arc::new(ResultAggregator::new(count));
        let controls: Vec<Arc<ItemControl>> =
            (1..=count).map(|i| Arc::new(ItemControl::new(i))).collect();

        info!(
            "Starting batch of {} items into {}",
            count,
            destination.display()
        );
        if let Some(ref cb) = context.config.progress_callback {
            cb.on_batch_start(count);
        }

        let handles: Vec<JoinHandle<()>> = controls
            .iter()
            .map(|control| {
                let context = Arc::clone(&context);
                let control = Arc::clone(control);
                let aggregator = Arc::clone(&aggregator);
                let destination = destination.clone();
                tokio::spawn(async move {
                    let outcome = run_item(&context, &control, count, &destination).await;
                    aggregator.report(outcome);
                    control.mark_completed();
                })
            })
            .collect();

        let completion = tokio::spawn(complete_batch(
            handles,
            controls.clone(),
            Arc::clone(&aggregator),
            context,
            on_complete,
        ));

        Self {
            destination,
            controls,
            aggregator,
            completion,
        }
    }

    /// Batch size.
    pub fn len(&self) -> usize {
        self.controls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.controls.is_empty()
    }

    pub fn destination(&self) -> &Path {
        &self.destination
    }

    /// Per-pipeline state and cancellation, in submission order.
    pub fn pipelines(&self) -> &[Arc<ItemControl>] {
        &self.controls
    }

    /// Cancel the fetch of the 1-indexed `item`. See [`ItemControl::cancel`].
    pub fn cancel(&self, item: usize) -> bool {
        item.checked_sub(1)
            .and_then(|i| self.controls.get(i))
            .is_some_and(|control| control.cancel())
    }

    /// Aggregate state of all pipelines; see [`RunState::aggregate`].
    pub fn run_state(&self) -> RunState {
        RunState::aggregate(self.controls.iter().map(|c| c.state()))
    }

    /// Outcomes reported so far.
    pub fn reported(&self) -> usize {
        self.aggregator.reported()
    }

    /// True once the completion callback has returned.
    pub fn is_finished(&self) -> bool {
        self.completion.is_finished()
    }

    /// Wait until the completion callback has returned.
    pub async fn join(self) -> Result<(), LoremPressError> {
        self.completion
            .await
            .map_err(|e| LoremPressError::Internal(format!("completion task failed: {e}")))
    }
}

/// Counted join over every pipeline, then the single callback invocation.
async fn complete_batch<F>(
    handles: Vec<JoinHandle<()>>,
    controls: Vec<Arc<ItemControl>>,
    aggregator: Arc<ResultAggregator>,
    context: Arc<PipelineContext>,
    on_complete: F,
) where
    F: FnOnce(BatchResult) + Send + 'static,
{
    let joined = join_all(handles).await;

    for (control, result) in controls.iter().zip(joined) {
        if let Err(e) = result {
            // The task died before reporting; keep successes + failures == N.
            warn!("Item {} interrupted: {}", control.index(), e);
            aggregator.report_failure(ItemError::Interrupted {
                item: control.index(),
                detail: e.to_string(),
            });
            control.mark_completed();
        }
    }

    debug_assert_eq!(aggregator.reported(), aggregator.expected());
    let result = aggregator.final_result();
    let successes = aggregator.success_count();
    info!(
        "Batch complete: {}/{} items written",
        successes,
        aggregator.expected()
    );
    if let Some(ref cb) = context.config.progress_callback {
        cb.on_batch_complete(aggregator.expected(), successes);
    }
    debug!("Invoking batch completion callback");
    on_complete(result);
}
