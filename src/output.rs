//! Result types produced by pipelines and batches.

use crate::error::ItemError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// The single outcome of one pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemOutcome {
    /// The entry was written to this path.
    Success(PathBuf),
    /// The pipeline stopped at the step that produced this error.
    Failure(ItemError),
}

impl ItemOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ItemOutcome::Success(_))
    }
}

impl From<Result<PathBuf, ItemError>> for ItemOutcome {
    fn from(result: Result<PathBuf, ItemError>) -> Self {
        match result {
            Ok(path) => ItemOutcome::Success(path),
            Err(e) => ItemOutcome::Failure(e),
        }
    }
}

/// The merged outcome of a whole batch.
///
/// Shape is all-or-nothing: a single failing item turns the whole result into
/// `Failure`, which carries only the errors. Paths written by the successful
/// items of a mixed batch are not returned, although the files stay on disk.
///
/// Both sequences are in completion order, which differs between runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BatchResult {
    Success(Vec<PathBuf>),
    Failure(Vec<ItemError>),
}

impl BatchResult {
    pub fn is_success(&self) -> bool {
        matches!(self, BatchResult::Success(_))
    }

    /// Number of entries carried by the result (paths or errors).
    pub fn len(&self) -> usize {
        match self {
            BatchResult::Success(paths) => paths.len(),
            BatchResult::Failure(errors) => errors.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Convert into a standard `Result`.
    pub fn into_result(self) -> Result<Vec<PathBuf>, Vec<ItemError>> {
        match self {
            BatchResult::Success(paths) => Ok(paths),
            BatchResult::Failure(errors) => Err(errors),
        }
    }
}

/// Execution state of a pipeline, or of a batch as a whole.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RunState {
    /// Created but not yet picked up by the runtime.
    Suspended,
    Running,
    /// Cancellation requested; the pipeline has not reported yet.
    Canceling,
    /// The pipeline has reported its outcome.
    Completed,
}

impl RunState {
    /// Fold per-pipeline states into a batch state.
    ///
    /// Canceling beats Running, Running beats everything else, and pipelines
    /// that disagree without either of those count as Running. An empty set is
    /// Suspended.
    pub fn aggregate<I>(states: I) -> RunState
    where
        I: IntoIterator<Item = RunState>,
    {
        let mut agreed: Option<RunState> = None;
        let mut disagree = false;
        let mut running = false;

        for state in states {
            match state {
                RunState::Canceling => return RunState::Canceling,
                RunState::Running => running = true,
                other => match agreed {
                    None => agreed = Some(other),
                    Some(prev) if prev != other => disagree = true,
                    Some(_) => {}
                },
            }
        }

        if running || disagree {
            RunState::Running
        } else {
            agreed.unwrap_or(RunState::Suspended)
        }
    }

    pub(crate) fn as_u8(self) -> u8 {
        match self {
            RunState::Suspended => 0,
            RunState::Running => 1,
            RunState::Canceling => 2,
            RunState::Completed => 3,
        }
    }

    pub(crate) fn from_u8(v: u8) -> RunState {
        match v {
            0 => RunState::Suspended,
            1 => RunState::Running,
            2 => RunState::Canceling,
            _ => RunState::Completed,
        }
    }
}
