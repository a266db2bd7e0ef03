//! Request flows that tie the store to the service client.
//!
//! Each action checks the network held by the store, refuses to send anything the
//! service would reject, and writes the outcome back through a request token so
//! that a slower, older reply never replaces a newer one.

use crate::error::ActionError;
use crate::model::{RequestKind, ToastLevel};
use crate::store::Store;
use network::{GreenwaveClient, Transport};
use protocol::{check_junctions, Junction, OptimizeOptions};
use tracing::{info, warn};

#[derive(Copy, Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    Applied,
    /// A newer request of the same kind was started while this one was in flight.
    Superseded,
}

impl Completion {
    const fn from_applied(applied: bool) -> Self {
        if applied {
            Self::Applied
        } else {
            Self::Superseded
        }
    }
}

fn preflight(store: &Store) -> Result<(Vec<Junction>, f64), ActionError> {
    let network = store.snapshot().network;
    if network.junctions.is_empty() {
        return Err(ActionError::NoJunctions);
    }
    let report = check_junctions(&network.junctions)?;
    if !report.is_valid {
        return Err(ActionError::CycleMismatch { durations: report.durations });
    }
    Ok((network.junctions, network.desired_speed_kmh))
}

fn refuse(store: &Store, error: ActionError) -> ActionError {
    warn!("request refused: {error}");
    store.report_error(error.to_string());
    store.push_toast(ToastLevel::Error, error.to_string());
    error
}

/// Extracts the green waves of the current network.
///
/// # Errors
/// Returns [`ActionError`] when the network is empty, malformed or has unequal cycle
/// lengths (nothing is sent), or when the service call fails.
pub async fn extract<T: Transport>(
    store: &Store,
    client: &GreenwaveClient<T>,
) -> Result<Completion, ActionError> {
    let (junctions, speed) = preflight(store).map_err(|e| refuse(store, e))?;

    let token = store.begin(RequestKind::Extraction);
    match client.extract_green_waves(&junctions, speed).await {
        Ok(response) => {
            info!(
                "extracted {} green waves and {} through waves",
                response.green_waves.len(),
                response.through_waves.len()
            );
            let applied = store.complete_extraction(token, response);
            if applied {
                store.push_toast(ToastLevel::Success, "Green waves extracted");
            }
            Ok(Completion::from_applied(applied))
        }
        Err(e) => {
            warn!("extraction failed: {e}");
            if store.fail(token, e.to_string()) {
                store.push_toast(ToastLevel::Error, format!("Extraction failed: {e}"));
            }
            Err(e.into())
        }
    }
}

/// Optimizes junction offsets of the current network with `options`.
///
/// # Errors
/// Same conditions as [`extract`].
pub async fn optimize<T: Transport>(
    store: &Store,
    client: &GreenwaveClient<T>,
    options: &OptimizeOptions,
) -> Result<Completion, ActionError> {
    let (junctions, speed) = preflight(store).map_err(|e| refuse(store, e))?;

    let token = store.begin(RequestKind::Optimization);
    match client.optimize_offsets(&junctions, speed, options).await {
        Ok(response) => {
            info!(
                "optimized {} offsets over {} generations",
                response.offsets.len(),
                response.history.len()
            );
            let applied = store.complete_optimization(token, response);
            if applied {
                store.push_toast(ToastLevel::Success, "Offsets optimized");
            }
            Ok(Completion::from_applied(applied))
        }
        Err(e) => {
            warn!("optimization failed: {e}");
            if store.fail(token, e.to_string()) {
                store.push_toast(ToastLevel::Error, format!("Optimization failed: {e}"));
            }
            Err(e.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use network::testing::MockTransport;
    use protocol::Malformation;
    use protocol::ModelError;
    use serde_json::json;

    const BASE: &str = "http://svc/api/greenwave";

    fn client(transport: MockTransport) -> GreenwaveClient<MockTransport> {
        GreenwaveClient::with_transport(transport, BASE)
    }

    #[tokio::test]
    async fn extract_stores_results() {
        let store = Store::with_demo();
        let client = client(MockTransport::new().reply_json(&json!({
            "green_waves": [{ "distance": 200.0, "travel_time": 18.0, "band_width": 12.5 }],
            "through_waves": [{ "intervals": [], "depth": 2, "bandwidth": 12.5 }]
        })));

        let outcome = extract(&store, &client).await.unwrap();

        assert_eq!(outcome, Completion::Applied);
        let state = store.snapshot();
        assert_eq!(state.extraction.green_waves.len(), 1);
        assert_eq!(state.extraction.through_waves.len(), 1);
        assert!(state.extraction.show_green_waves);
        assert!(!state.status.is_loading);
        assert_eq!(state.toasts.last().map(|t| t.level), Some(ToastLevel::Success));
    }

    #[tokio::test]
    async fn cycle_mismatch_is_refused_before_sending() {
        let store = Store::with_demo();
        store.update(|state| state.network.junctions[2].cycle[0].signals[0].duration += 5);
        let client = client(MockTransport::new());

        let err = extract(&store, &client).await.unwrap_err();

        assert!(matches!(err, ActionError::CycleMismatch { ref durations } if durations == &[85, 85, 90, 85]));
        assert!(client.transport().calls().is_empty());
        let state = store.snapshot();
        assert!(state.status.error.is_some());
        assert!(!state.status.is_loading);
        assert_eq!(state.toasts.last().map(|t| t.level), Some(ToastLevel::Error));
    }

    #[tokio::test]
    async fn malformed_junction_is_refused_before_sending() {
        let store = Store::with_demo();
        store.update(|state| state.network.junctions[0].cycle.clear());
        let client = client(MockTransport::new());

        let err = optimize(&store, &client, &OptimizeOptions::default()).await.unwrap_err();

        assert!(matches!(
            err,
            ActionError::Malformed(ModelError::MalformedJunction { junction_id: 0, reason: Malformation::EmptyCycle })
        ));
        assert!(client.transport().calls().is_empty());
    }

    #[tokio::test]
    async fn empty_network_is_refused() {
        let store = Store::default();
        let client = client(MockTransport::new());

        let err = extract(&store, &client).await.unwrap_err();

        assert!(matches!(err, ActionError::NoJunctions));
        assert!(client.transport().calls().is_empty());
    }

    #[tokio::test]
    async fn optimize_stores_offsets_and_history() {
        let store = Store::with_demo();
        let client = client(MockTransport::new().reply_json(&json!({
            "offsets": [0.0, 14.0, 29.0, 41.0],
            "green_waves": [],
            "through_waves": [],
            "history": [3.0, 5.5, 7.25]
        })));

        let outcome = optimize(&store, &client, &OptimizeOptions::default()).await.unwrap();

        assert_eq!(outcome, Completion::Applied);
        let state = store.snapshot();
        assert_eq!(state.optimization.offsets, vec![0.0, 14.0, 29.0, 41.0]);
        assert_eq!(state.optimization.history, vec![3.0, 5.5, 7.25]);
        assert!(!state.status.is_optimizing);
    }

    #[tokio::test]
    async fn service_failure_keeps_previous_results() {
        let store = Store::with_demo();
        let client = client(
            MockTransport::new()
                .reply_json(&json!({ "green_waves": [{ "distance": 1.0 }], "through_waves": [] }))
                .reply_status(503, "down"),
        );
        extract(&store, &client).await.unwrap();

        let err = extract(&store, &client).await.unwrap_err();

        assert!(matches!(err, ActionError::Client(ref e) if e.status() == Some(503)));
        let state = store.snapshot();
        assert_eq!(state.extraction.green_waves.len(), 1);
        assert!(state.status.error.as_deref().is_some_and(|m| m.contains("503")));
        assert!(!state.status.is_loading);
    }

    #[tokio::test]
    async fn reply_after_reset_is_superseded() {
        let store = Store::with_demo();
        let client = client(MockTransport::new().reply_json(&json!({})));
        let token = store.begin(RequestKind::Extraction);
        store.reset_to_demo();

        assert!(!store.complete_extraction(token, protocol::ExtractResponse::default()));
        let outcome = extract(&store, &client).await.unwrap();
        assert_eq!(outcome, Completion::Applied);
    }
}
