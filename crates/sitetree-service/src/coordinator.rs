use log::{debug, error, info};
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::{self, error::TrySendError, Receiver, Sender};
use tokio::sync::watch;
use tokio::time::sleep;

use sitetree_core::Snapshot;

use crate::error::{Result, ServiceError};
use crate::state::GlobalState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BuildState {
    /// The published snapshot matches the last completed scan
    Built,
    /// A scan was requested, is running, or failed since the last publish
    Stale,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanStatus {
    pub state: BuildState,
    /// Number of snapshots published so far
    pub generation: u64,
    /// Scans attempted, failed ones included
    pub scans_completed: u64,
    /// Highest request ticket covered by a finished scan
    pub served_through: u64,
    pub fingerprint: Option<String>,
    pub last_error: Option<String>,
}

impl Default for ScanStatus {
    fn default() -> Self {
        Self {
            state: BuildState::Stale,
            generation: 0,
            scans_completed: 0,
            served_through: 0,
            fingerprint: None,
            last_error: None,
        }
    }
}

/// Cloneable front door for requesting scans and observing their outcome.
#[derive(Clone)]
pub struct ScanHandle {
    wake: Sender<()>,
    next_ticket: Arc<AtomicU64>,
    status: watch::Receiver<ScanStatus>,
}

impl ScanHandle {
    /// Ask for a rescan. Returns the ticket the eventual scan will cover.
    pub fn request_scan(&self) -> Result<u64> {
        let ticket = self.next_ticket.fetch_add(1, Ordering::SeqCst) + 1;
        match self.wake.try_send(()) {
            // A wake-up already pending will pick this ticket up too
            Ok(()) | Err(TrySendError::Full(())) => Ok(ticket),
            Err(TrySendError::Closed(())) => Err(ServiceError::CoordinatorClosed),
        }
    }

    /// Request a scan and wait until a scan started after the request finishes.
    pub async fn scan(&mut self) -> Result<ScanStatus> {
        let ticket = self.request_scan()?;
        self.wait_for_ticket(ticket).await
    }

    pub async fn wait_for_ticket(&mut self, ticket: u64) -> Result<ScanStatus> {
        let status = self
            .status
            .wait_for(|status| status.served_through >= ticket)
            .await
            .map_err(|_| ServiceError::CoordinatorClosed)?;
        Ok((*status).clone())
    }

    pub fn status(&self) -> ScanStatus {
        self.status.borrow().clone()
    }
}

/// Owns the only scanning path.
///
/// At most one scan runs at a time. Requests only bump a shared ticket
/// counter and leave a single pending wake-up, so any number of requests
/// made while a scan runs (or during the debounce window) cost one
/// follow-up scan.
pub struct ScanCoordinator {
    state: GlobalState,
    wake: Receiver<()>,
    latest_ticket: Arc<AtomicU64>,
    status: watch::Sender<ScanStatus>,
}

pub fn channel(state: GlobalState) -> (ScanCoordinator, ScanHandle) {
    let (wake_tx, wake_rx) = mpsc::channel(1);
    let (status_tx, status_rx) = watch::channel(ScanStatus::default());
    let next_ticket = Arc::new(AtomicU64::new(0));

    let coordinator = ScanCoordinator {
        state,
        wake: wake_rx,
        latest_ticket: Arc::clone(&next_ticket),
        status: status_tx,
    };
    let handle = ScanHandle {
        wake: wake_tx,
        next_ticket,
        status: status_rx,
    };
    (coordinator, handle)
}

impl ScanCoordinator {
    pub async fn start(mut self) {
        info!("scan coordinator started");

        while self.wake.recv().await.is_some() {
            let served = self.status.borrow().served_through;
            if self.latest_ticket.load(Ordering::SeqCst) <= served {
                continue;
            }
            self.status.send_modify(|status| status.state = BuildState::Stale);

            let debounce = self.state.settings.read().await.scan.debounce_ms;
            if debounce > 0 {
                sleep(Duration::from_millis(debounce)).await;
            }

            // Drain before reading the ticket, so a request arriving after
            // the read keeps its wake-up
            while self.wake.try_recv().is_ok() {}
            let covered = self.latest_ticket.load(Ordering::SeqCst);

            if covered > served + 1 {
                debug!("collapsed {} scan requests into one scan", covered - served);
            }

            self.perform_scan(covered).await;
        }

        info!("scan coordinator stopped");
    }

    async fn perform_scan(&self, covered: u64) {
        let config = Arc::clone(&self.state.config);
        let fs = Arc::clone(&self.state.fs);

        let outcome = tokio::task::spawn_blocking(move || Snapshot::scan(&config, &*fs)).await;

        match outcome {
            Ok(Ok(snapshot)) => {
                let snapshot = Arc::new(snapshot);
                let fingerprint = snapshot.fingerprint().to_string();
                let previous = self.state.publish(snapshot).await;

                if previous.is_some_and(|prev| prev.fingerprint() == fingerprint) {
                    debug!("content unchanged since last scan");
                }

                self.status.send_modify(|status| {
                    status.state = BuildState::Built;
                    status.generation += 1;
                    status.scans_completed += 1;
                    status.served_through = status.served_through.max(covered);
                    status.fingerprint = Some(fingerprint);
                    status.last_error = None;
                });
            }
            Ok(Err(e)) => {
                error!("scan failed, keeping previous snapshot: {}", e);
                self.record_failure(covered, e.to_string());
            }
            Err(e) => {
                error!("scan task aborted: {}", e);
                self.record_failure(covered, e.to_string());
            }
        }
    }

    fn record_failure(&self, covered: u64, message: String) {
        self.status.send_modify(|status| {
            status.state = BuildState::Stale;
            status.scans_completed += 1;
            status.served_through = status.served_through.max(covered);
            status.last_error = Some(message);
        });
    }
}
