// PoolWatch - app/refresh.rs
//
// Refresh lifecycle management. Fetches the dashboard document on a
// background thread and hands the outcome to the owning thread via an mpsc
// channel.
//
// Architecture:
//   - `RefreshManager` lives on the owning (UI) thread; the fetch runs on a
//     short-lived background thread that sends exactly one `RefreshOutcome`.
//   - The owner polls without blocking (`poll`) or waits with a bound
//     (`wait`). State is never touched from the background thread.
//   - A refresh still outstanding after `deadline` is abandoned: the
//     receiver is dropped and a late result is discarded by the worker.
//   - A worker that dies without sending (panic) settles as `WorkerLost`.

use crate::core::model::{DashboardDocument, RefreshOutcome};
use crate::util::error::FetchError;
use std::sync::mpsc::{self, RecvTimeoutError, TryRecvError};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// The external collaborator that produces the dashboard document.
pub trait DashboardSource: Send + Sync {
    fn fetch(&self) -> Result<DashboardDocument, FetchError>;
}

impl<F> DashboardSource for F
where
    F: Fn() -> Result<DashboardDocument, FetchError> + Send + Sync,
{
    fn fetch(&self) -> Result<DashboardDocument, FetchError> {
        self()
    }
}

/// An outstanding refresh.
struct InFlight {
    outcome_rx: mpsc::Receiver<RefreshOutcome>,
    started_at: Instant,
}

/// Runs at most one background fetch at a time.
pub struct RefreshManager {
    source: Arc<dyn DashboardSource>,
    deadline: Duration,
    in_flight: Option<InFlight>,
}

impl RefreshManager {
    pub fn new(source: Arc<dyn DashboardSource>, deadline: Duration) -> Self {
        Self {
            source,
            deadline,
            in_flight: None,
        }
    }

    /// Whether a fetch has been started and not yet settled.
    pub fn is_running(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Spawn the background fetch. Callers guard against overlap; a refresh
    /// already in flight is abandoned.
    pub fn start(&mut self) {
        if self.in_flight.is_some() {
            tracing::warn!("Starting a refresh while another is outstanding; abandoning the old one");
        }

        let (tx, rx) = mpsc::channel();
        let source = Arc::clone(&self.source);

        self.in_flight = Some(InFlight {
            outcome_rx: rx,
            started_at: Instant::now(),
        });

        std::thread::spawn(move || {
            let started = Instant::now();
            let outcome = match source.fetch() {
                Ok(document) => RefreshOutcome::Completed {
                    document,
                    elapsed: started.elapsed(),
                },
                Err(error) => RefreshOutcome::Failed { error },
            };
            // Receiver dropped (refresh abandoned or store gone); exit quietly.
            let _ = tx.send(outcome);
        });

        tracing::debug!("Refresh started");
    }

    /// Poll for the outcome without blocking. Returns `Some` exactly once
    /// per started refresh.
    pub fn poll(&mut self) -> Option<RefreshOutcome> {
        let in_flight = self.in_flight.as_ref()?;
        let settled = match in_flight.outcome_rx.try_recv() {
            Ok(outcome) => Some(outcome),
            Err(TryRecvError::Disconnected) => Some(RefreshOutcome::Failed {
                error: FetchError::WorkerLost,
            }),
            Err(TryRecvError::Empty) => self.check_deadline(),
        };
        if settled.is_some() {
            self.in_flight = None;
        }
        settled
    }

    /// Wait up to `timeout` for the outcome.
    pub fn wait(&mut self, timeout: Duration) -> Option<RefreshOutcome> {
        let in_flight = self.in_flight.as_ref()?;
        let remaining = self.deadline.saturating_sub(in_flight.started_at.elapsed());
        let settled = match in_flight.outcome_rx.recv_timeout(timeout.min(remaining)) {
            Ok(outcome) => Some(outcome),
            Err(RecvTimeoutError::Disconnected) => Some(RefreshOutcome::Failed {
                error: FetchError::WorkerLost,
            }),
            Err(RecvTimeoutError::Timeout) => self.check_deadline(),
        };
        if settled.is_some() {
            self.in_flight = None;
        }
        settled
    }

    fn check_deadline(&self) -> Option<RefreshOutcome> {
        let elapsed = self.in_flight.as_ref()?.started_at.elapsed();
        if elapsed >= self.deadline {
            Some(RefreshOutcome::Failed {
                error: FetchError::TimedOut { elapsed },
            })
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn ok_source() -> Arc<dyn DashboardSource> {
        Arc::new(|| -> Result<DashboardDocument, FetchError> {
            let mut doc = DashboardDocument::new();
            doc.insert("key_count".to_string(), serde_json::json!(3));
            Ok(doc)
        })
    }

    fn wait_settled(manager: &mut RefreshManager) -> RefreshOutcome {
        for _ in 0..100 {
            if let Some(outcome) = manager.wait(Duration::from_millis(50)) {
                return outcome;
            }
        }
        panic!("refresh never settled");
    }

    #[test]
    fn test_completed_outcome_delivered_once() {
        let mut manager = RefreshManager::new(ok_source(), Duration::from_secs(10));
        assert!(manager.poll().is_none());

        manager.start();
        assert!(manager.is_running());
        match wait_settled(&mut manager) {
            RefreshOutcome::Completed { document, .. } => {
                assert_eq!(document["key_count"], 3);
            }
            other => panic!("expected Completed, got {other:?}"),
        }
        assert!(!manager.is_running());
        assert!(manager.poll().is_none());
    }

    #[test]
    fn test_failure_outcome_carries_error() {
        let source: Arc<dyn DashboardSource> = Arc::new(|| -> Result<DashboardDocument, FetchError> {
            Err(FetchError::HttpStatus {
                url: "http://test/api/dashboard-data".to_string(),
                status: 502,
            })
        });
        let mut manager = RefreshManager::new(source, Duration::from_secs(10));
        manager.start();
        match wait_settled(&mut manager) {
            RefreshOutcome::Failed { error } => assert_eq!(error.status(), Some(502)),
            other => panic!("expected Failed, got {other:?}"),
        }
    }

    #[test]
    fn test_panicking_worker_settles_as_lost() {
        let source: Arc<dyn DashboardSource> =
            Arc::new(|| -> Result<DashboardDocument, FetchError> { panic!("collaborator blew up") });
        let mut manager = RefreshManager::new(source, Duration::from_secs(10));
        manager.start();
        match wait_settled(&mut manager) {
            RefreshOutcome::Failed {
                error: FetchError::WorkerLost,
            } => {}
            other => panic!("expected WorkerLost, got {other:?}"),
        }
    }

    #[test]
    fn test_hung_fetch_abandoned_after_deadline() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let source: Arc<dyn DashboardSource> = Arc::new(move || -> Result<DashboardDocument, FetchError> {
            counter.fetch_add(1, Ordering::SeqCst);
            std::thread::sleep(Duration::from_secs(2));
            Ok(DashboardDocument::new())
        });
        let mut manager = RefreshManager::new(source, Duration::from_millis(50));
        manager.start();

        std::thread::sleep(Duration::from_millis(80));
        match manager.poll() {
            Some(RefreshOutcome::Failed {
                error: FetchError::TimedOut { elapsed },
            }) => assert!(elapsed >= Duration::from_millis(50)),
            other => panic!("expected TimedOut, got {other:?}"),
        }
        assert!(!manager.is_running());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
