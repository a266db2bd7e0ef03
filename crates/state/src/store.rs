use crate::model::{
    AppState, ExtractionResults, NetworkState, OptimizationResults, RequestKind, RequestStatus,
    RequestToken, Toast, ToastLevel,
};
use chrono::Utc;
use protocol::fixture::{demo_desired_speed_kmh, demo_junctions};
use protocol::{ExtractResponse, Junction, OptimizeResponse};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::watch;
use tracing::{debug, info, warn};

#[derive(Debug, Default)]
struct RequestLedger {
    next_request: u64,
    next_toast: u64,
    extraction: Option<u64>,
    optimization: Option<u64>,
    optimized_ids: Vec<i64>,
}

impl RequestLedger {
    fn slot(&mut self, kind: RequestKind) -> &mut Option<u64> {
        match kind {
            RequestKind::Extraction => &mut self.extraction,
            RequestKind::Optimization => &mut self.optimization,
        }
    }

    /// Retires `token` if it is still the newest of its kind.
    fn settle(&mut self, token: RequestToken) -> bool {
        let slot = self.slot(token.kind);
        if *slot == Some(token.id) {
            *slot = None;
            true
        } else {
            false
        }
    }
}

#[derive(Debug)]
struct Inner {
    state: watch::Sender<AppState>,
    ledger: Mutex<RequestLedger>,
}

/// Shared handle to the application state. Clones observe and mutate the same state.
///
/// Every mutation replaces the snapshot seen by [`Store::subscribe`] receivers.
#[derive(Debug, Clone)]
pub struct Store {
    inner: Arc<Inner>,
}

impl Default for Store {
    fn default() -> Self {
        Self::new(AppState::default())
    }
}

impl Store {
    #[must_use]
    pub fn new(initial: AppState) -> Self {
        let (state, _) = watch::channel(initial);
        Self { inner: Arc::new(Inner { state, ledger: Mutex::new(RequestLedger::default()) }) }
    }

    /// Store preloaded with the demo corridor.
    #[must_use]
    pub fn with_demo() -> Self {
        let store = Self::default();
        store.reset_to_demo();
        store
    }

    fn ledger(&self) -> MutexGuard<'_, RequestLedger> {
        self.inner.ledger.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[must_use]
    pub fn snapshot(&self) -> AppState {
        self.inner.state.borrow().clone()
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<AppState> {
        self.inner.state.subscribe()
    }

    pub fn update(&self, f: impl FnOnce(&mut AppState)) {
        self.inner.state.send_modify(f);
    }

    pub fn replace_junctions(&self, junctions: Vec<Junction>) {
        debug!("replacing network with {} junctions", junctions.len());
        self.update(|state| state.network.junctions = junctions);
    }

    pub fn set_desired_speed(&self, desired_speed_kmh: f64) {
        self.update(|state| state.network.desired_speed_kmh = desired_speed_kmh);
    }

    pub fn reset_to_demo(&self) {
        info!("resetting to demo network");
        self.reset_with(demo_junctions(), demo_desired_speed_kmh());
    }

    pub fn reset_to_empty(&self) {
        info!("resetting to empty network");
        self.reset_with(Vec::new(), demo_desired_speed_kmh());
    }

    fn reset_with(&self, junctions: Vec<Junction>, desired_speed_kmh: f64) {
        let mut ledger = self.ledger();
        ledger.extraction = None;
        ledger.optimization = None;
        self.update(|state| {
            state.network = NetworkState { junctions, desired_speed_kmh };
            state.extraction = ExtractionResults::default();
            state.optimization = OptimizationResults::default();
            state.status = RequestStatus::default();
        });
    }

    /// Starts a request of `kind`, superseding any earlier one of the same kind.
    pub fn begin(&self, kind: RequestKind) -> RequestToken {
        let mut ledger = self.ledger();
        ledger.next_request += 1;
        let id = ledger.next_request;
        *ledger.slot(kind) = Some(id);
        if kind == RequestKind::Optimization {
            let ids = self.inner.state.borrow().network.junctions.iter().map(|j| j.id).collect();
            ledger.optimized_ids = ids;
        }

        self.update(|state| {
            match kind {
                RequestKind::Extraction => state.status.is_loading = true,
                RequestKind::Optimization => state.status.is_optimizing = true,
            }
            state.status.error = None;
        });
        debug!("{kind} request #{id} started");
        RequestToken { kind, id }
    }

    /// Applies an extraction result. Returns `false` if `token` was superseded.
    pub fn complete_extraction(&self, token: RequestToken, response: ExtractResponse) -> bool {
        self.settle(token, |state, _| {
            state.extraction = ExtractionResults::from(response);
        })
    }

    /// Applies an optimization result. Returns `false` if `token` was superseded.
    pub fn complete_optimization(&self, token: RequestToken, response: OptimizeResponse) -> bool {
        self.settle(token, |state, ledger| {
            state.optimization = OptimizationResults {
                junction_ids: std::mem::take(&mut ledger.optimized_ids),
                ..OptimizationResults::from(response)
            };
        })
    }

    /// Records a failed request; results already in the state are kept.
    pub fn fail(&self, token: RequestToken, message: impl Into<String>) -> bool {
        let message = message.into();
        let mut ledger = self.ledger();
        if !ledger.settle(token) {
            debug!("dropping failure of stale {} request #{}", token.kind, token.id);
            return false;
        }
        self.update(|state| {
            clear_flag(&mut state.status, token.kind);
            state.status.error = Some(message);
        });
        true
    }

    fn settle(
        &self,
        token: RequestToken,
        apply: impl FnOnce(&mut AppState, &mut RequestLedger),
    ) -> bool {
        let mut ledger = self.ledger();
        if !ledger.settle(token) {
            debug!("dropping stale {} response #{}", token.kind, token.id);
            return false;
        }
        self.update(|state| {
            apply(state, &mut *ledger);
            clear_flag(&mut state.status, token.kind);
            state.status.error = None;
        });
        debug!("{} request #{} applied", token.kind, token.id);
        true
    }

    /// Sets the error without touching any request in flight.
    pub fn report_error(&self, message: impl Into<String>) {
        let message = message.into();
        self.update(|state| state.status.error = Some(message));
    }

    pub fn push_toast(&self, level: ToastLevel, message: impl Into<String>) -> u64 {
        let id = {
            let mut ledger = self.ledger();
            ledger.next_toast += 1;
            ledger.next_toast
        };
        let toast = Toast { id, level, message: message.into(), created_at: Utc::now() };
        debug!("toast #{id} [{level}] {}", toast.message);
        self.update(|state| state.toasts.push(toast));
        id
    }

    /// Returns `false` if no toast has that id.
    pub fn dismiss_toast(&self, id: u64) -> bool {
        let mut removed = false;
        self.update(|state| {
            let before = state.toasts.len();
            state.toasts.retain(|toast| toast.id != id);
            removed = state.toasts.len() != before;
        });
        removed
    }

    /// Writes the latest optimized offsets back onto the junctions, in order.
    ///
    /// Nothing is written unless the current junction ids are the ones the offsets were
    /// computed for. Returns the number of junctions updated.
    #[allow(clippy::cast_possible_truncation)]
    pub fn apply_optimized_offsets(&self) -> usize {
        let mut applied = 0;
        self.update(|state| {
            let current = state.network.junctions.iter().map(|j| j.id);
            if !current.eq(state.optimization.junction_ids.iter().copied()) {
                warn!("optimized offsets belong to a different network, not applying them");
                return;
            }
            let offsets = &state.optimization.offsets;
            for (junction, offset) in state.network.junctions.iter_mut().zip(offsets) {
                junction.offset = offset.round() as i64;
                applied += 1;
            }
        });
        applied
    }
}

fn clear_flag(status: &mut RequestStatus, kind: RequestKind) {
    match kind {
        RequestKind::Extraction => status.is_loading = false,
        RequestKind::Optimization => status.is_optimizing = false,
    }
}
