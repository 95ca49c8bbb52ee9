//! Thread-safe collection of pipeline outcomes into one [`BatchResult`].
//!
//! One aggregator lives for exactly one batch. It is handed to every
//! pipeline behind an `Arc`; all mutation goes through a single mutex, so
//! concurrent reports from independent tasks never race or drop an entry.

use crate::error::ItemError;
use crate::output::{BatchResult, ItemOutcome};
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard, PoisonError};

#[derive(Debug, Default)]
struct Collected {
    successes: Vec<PathBuf>,
    failures: Vec<ItemError>,
}

/// Collects exactly `expected` outcomes from concurrent pipelines.
#[derive(Debug)]
pub struct ResultAggregator {
    expected: usize,
    collected: Mutex<Collected>,
}

impl ResultAggregator {
    pub fn new(expected: usize) -> Self {
        Self {
            expected,
            collected: Mutex::new(Collected::default()),
        }
    }

    // A panicking reporter cannot leave `Collected` half-updated (each
    // mutation is a single push), so a poisoned lock is still usable.
    fn lock(&self) -> MutexGuard<'_, Collected> {
        self.collected.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn report_success(&self, path: PathBuf) {
        self.lock().successes.push(path);
    }

    pub fn report_failure(&self, error: ItemError) {
        self.lock().failures.push(error);
    }

    pub fn report(&self, outcome: ItemOutcome) {
        match outcome {
            ItemOutcome::Success(path) => self.report_success(path),
            ItemOutcome::Failure(error) => self.report_failure(error),
        }
    }

    /// Batch size fixed at construction.
    pub fn expected(&self) -> usize {
        self.expected
    }

    /// Outcomes received so far.
    pub fn reported(&self) -> usize {
        let c = self.lock();
        c.successes.len() + c.failures.len()
    }

    pub fn is_complete(&self) -> bool {
        self.reported() >= self.expected
    }

    /// Number of successful outcomes received so far.
    pub fn success_count(&self) -> usize {
        self.lock().successes.len()
    }

    /// `Failure` with every error if any item failed, else `Success` with
    /// every written path. Successful paths of a mixed batch are dropped.
    pub fn final_result(&self) -> BatchResult {
        let c = self.lock();
        if c.failures.is_empty() {
            BatchResult::Success(c.successes.clone())
        } else {
            BatchResult::Failure(c.failures.clone())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn all_successes() {
        let agg = ResultAggregator::new(2);
        agg.report_success(PathBuf::from("a.md"));
        agg.report(ItemOutcome::Success(PathBuf::from("b.md")));
        assert!(agg.is_complete());
        assert_eq!(
            agg.final_result(),
            BatchResult::Success(vec![PathBuf::from("a.md"), PathBuf::from("b.md")])
        );
    }

    #[test]
    fn any_failure_discards_successes() {
        let agg = ResultAggregator::new(3);
        agg.report_success(PathBuf::from("a.md"));
        agg.report_failure(ItemError::MissingTitle { item: 2 });
        agg.report_success(PathBuf::from("c.md"));
        assert_eq!(agg.success_count(), 2);
        assert_eq!(
            agg.final_result(),
            BatchResult::Failure(vec![ItemError::MissingTitle { item: 2 }])
        );
    }

    #[test]
    fn empty_batch_is_empty_success() {
        let agg = ResultAggregator::new(0);
        assert!(agg.is_complete());
        assert_eq!(agg.final_result(), BatchResult::Success(vec![]));
    }

    #[test]
    fn concurrent_reports_are_all_kept() {
        let agg = Arc::new(ResultAggregator::new(400));
        let handles: Vec<_> = (0..8)
            .map(|t| {
                let agg = Arc::clone(&agg);
                std::thread::spawn(move || {
                    for i in 0..50 {
                        if (t + i) % 5 == 0 {
                            agg.report_failure(ItemError::MissingTitle { item: t * 50 + i });
                        } else {
                            agg.report_success(PathBuf::from(format!("{t}-{i}.md")));
                        }
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        assert_eq!(agg.reported(), 400);
        match agg.final_result() {
            BatchResult::Failure(errors) => assert_eq!(errors.len(), 400 - agg.success_count()),
            other => panic!("expected failures, got {other:?}"),
        }
    }
}
