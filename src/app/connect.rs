use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;
use std::time::Instant;

use tracing::{info, warn};

use crate::topology::{Credentials, FetchError, TopologyClient, TopologySnapshot};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(in crate::app) enum FetchPhase {
    Idle,
    Pending,
    Succeeded,
    Failed,
}

pub(in crate::app) enum FetchOutcome {
    Loaded(TopologySnapshot),
    Failed(String),
}

struct PendingFetch {
    generation: u64,
    started: Instant,
    rx: Receiver<Result<TopologySnapshot, FetchError>>,
}

/// Runs topology requests on worker threads. Only the most recent request
/// is ever applied; starting a new one abandons the previous receiver.
pub(in crate::app) struct ConnectionFlow {
    generation: u64,
    phase: FetchPhase,
    pending: Option<PendingFetch>,
}

impl Default for ConnectionFlow {
    fn default() -> Self {
        Self {
            generation: 0,
            phase: FetchPhase::Idle,
            pending: None,
        }
    }
}

impl ConnectionFlow {
    pub(in crate::app) fn start(&mut self, client: &TopologyClient, credentials: Credentials) -> u64 {
        let client = client.clone();
        self.spawn(move || client.fetch(&credentials))
    }

    pub(in crate::app) fn spawn<F>(&mut self, job: F) -> u64
    where
        F: FnOnce() -> Result<TopologySnapshot, FetchError> + Send + 'static,
    {
        self.generation = self.generation.wrapping_add(1);
        if let Some(previous) = self.pending.take() {
            info!(
                superseded = previous.generation,
                generation = self.generation,
                "superseding in-flight topology request"
            );
        }

        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let _ = tx.send(job());
        });

        self.pending = Some(PendingFetch {
            generation: self.generation,
            started: Instant::now(),
            rx,
        });
        self.phase = FetchPhase::Pending;
        self.generation
    }

    pub(in crate::app) fn poll(&mut self) -> Option<FetchOutcome> {
        let pending = self.pending.take()?;

        match pending.rx.try_recv() {
            Ok(Ok(snapshot)) => {
                info!(
                    generation = pending.generation,
                    elapsed_ms = pending.started.elapsed().as_millis() as u64,
                    "topology request succeeded"
                );
                self.phase = FetchPhase::Succeeded;
                Some(FetchOutcome::Loaded(snapshot))
            }
            Ok(Err(error)) => {
                warn!(generation = pending.generation, %error, "topology request failed");
                self.phase = FetchPhase::Failed;
                Some(FetchOutcome::Failed(error.to_string()))
            }
            Err(TryRecvError::Empty) => {
                self.pending = Some(pending);
                None
            }
            Err(TryRecvError::Disconnected) => {
                warn!(generation = pending.generation, "topology worker disconnected");
                self.phase = FetchPhase::Failed;
                Some(FetchOutcome::Failed(
                    "Background fetch worker disconnected".to_owned(),
                ))
            }
        }
    }

    pub(in crate::app) fn phase(&self) -> FetchPhase {
        self.phase
    }

    pub(in crate::app) fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

#[cfg(test)]
pub(in crate::app) mod tests {
    use std::sync::mpsc;
    use std::thread;
    use std::time::Duration;

    use super::*;
    use crate::topology::fixtures::node;

    pub(in crate::app) fn wait_for_outcome(flow: &mut ConnectionFlow) -> FetchOutcome {
        for _ in 0..500 {
            if let Some(outcome) = flow.poll() {
                return outcome;
            }
            thread::sleep(Duration::from_millis(10));
        }
        panic!("topology request did not finish");
    }

    fn snapshot_with(id: &str) -> TopologySnapshot {
        TopologySnapshot::new(vec![node(id, "vm", id)], Vec::new())
    }

    fn decode_error() -> FetchError {
        let error = serde_json::from_str::<serde_json::Value>("{").expect_err("invalid json");
        FetchError::Decode(error)
    }

    #[test]
    fn starts_idle() {
        let mut flow = ConnectionFlow::default();
        assert_eq!(flow.phase(), FetchPhase::Idle);
        assert!(!flow.is_pending());
        assert!(flow.poll().is_none());
    }

    #[test]
    fn successful_request_moves_to_succeeded() {
        let mut flow = ConnectionFlow::default();
        flow.spawn(|| Ok(snapshot_with("a")));
        assert_eq!(flow.phase(), FetchPhase::Pending);

        let FetchOutcome::Loaded(snapshot) = wait_for_outcome(&mut flow) else {
            panic!("expected a loaded snapshot");
        };
        assert_eq!(snapshot.nodes()[0].id, "a");
        assert_eq!(flow.phase(), FetchPhase::Succeeded);
        assert!(!flow.is_pending());
    }

    #[test]
    fn failed_request_moves_to_failed() {
        let mut flow = ConnectionFlow::default();
        flow.spawn(|| Err(decode_error()));

        assert!(matches!(wait_for_outcome(&mut flow), FetchOutcome::Failed(_)));
        assert_eq!(flow.phase(), FetchPhase::Failed);
    }

    #[test]
    fn newer_request_supersedes_in_flight_one() {
        let mut flow = ConnectionFlow::default();
        let (release_first, first_gate) = mpsc::channel::<()>();
        let (release_second, second_gate) = mpsc::channel::<()>();

        let first = flow.spawn(move || {
            let _ = first_gate.recv();
            Ok(snapshot_with("stale"))
        });
        let second = flow.spawn(move || {
            let _ = second_gate.recv();
            Ok(snapshot_with("fresh"))
        });
        assert!(second > first);

        release_first.send(()).expect("release first");
        thread::sleep(Duration::from_millis(50));
        assert!(flow.poll().is_none());
        assert_eq!(flow.phase(), FetchPhase::Pending);

        release_second.send(()).expect("release second");
        let FetchOutcome::Loaded(snapshot) = wait_for_outcome(&mut flow) else {
            panic!("expected a loaded snapshot");
        };
        assert_eq!(snapshot.nodes()[0].id, "fresh");
        assert!(flow.poll().is_none());
    }
}
