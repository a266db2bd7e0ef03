use chrono::{DateTime, Utc};
use protocol::config::DEFAULT_DESIRED_SPEED_KMH;
use protocol::{ExtractResponse, GreenWave, Junction, OptimizeResponse, ThroughGreenWave};
use serde::Serialize;
use strum_macros::Display;

/// The junction network being edited and the speed the service should plan for.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NetworkState {
    pub junctions: Vec<Junction>,
    pub desired_speed_kmh: f64,
}

impl Default for NetworkState {
    fn default() -> Self {
        Self { junctions: Vec::new(), desired_speed_kmh: DEFAULT_DESIRED_SPEED_KMH }
    }
}

/// Waves found for the network as entered, before any offset optimization.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ExtractionResults {
    pub green_waves: Vec<GreenWave>,
    pub through_waves: Vec<ThroughGreenWave>,
    pub show_green_waves: bool,
}

impl From<ExtractResponse> for ExtractionResults {
    fn from(response: ExtractResponse) -> Self {
        Self {
            green_waves: response.green_waves,
            through_waves: response.through_waves,
            show_green_waves: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct OptimizationResults {
    pub green_waves: Vec<GreenWave>,
    pub through_waves: Vec<ThroughGreenWave>,
    pub offsets: Vec<f64>,
    pub history: Vec<f64>,
    /// Ids of the junctions the offsets were computed for, in order.
    pub junction_ids: Vec<i64>,
}

impl From<OptimizeResponse> for OptimizationResults {
    fn from(response: OptimizeResponse) -> Self {
        Self {
            green_waves: response.green_waves,
            through_waves: response.through_waves,
            offsets: response.offsets,
            history: response.history,
            junction_ids: Vec::new(),
        }
    }
}

/// The one place loading and error flags live.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct RequestStatus {
    pub is_loading: bool,
    pub is_optimizing: bool,
    pub error: Option<String>,
}

#[derive(Copy, Debug, Clone, PartialEq, Eq, Hash, Serialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ToastLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Toast {
    pub id: u64,
    pub level: ToastLevel,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

/// Full application snapshot handed to subscribers.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct AppState {
    pub network: NetworkState,
    pub extraction: ExtractionResults,
    pub optimization: OptimizationResults,
    pub status: RequestStatus,
    pub toasts: Vec<Toast>,
}

impl AppState {
    #[must_use]
    pub fn has_results(&self) -> bool {
        self.extraction != ExtractionResults::default()
            || self.optimization != OptimizationResults::default()
    }
}

#[derive(Copy, Debug, Clone, PartialEq, Eq, Hash, Display)]
pub enum RequestKind {
    Extraction,
    Optimization,
}

/// Identifies one in-flight request; only the newest token of a kind may write results.
#[derive(Copy, Debug, Clone, PartialEq, Eq, Hash)]
pub struct RequestToken {
    pub kind: RequestKind,
    pub(crate) id: u64,
}

impl RequestToken {
    #[must_use]
    pub const fn id(&self) -> u64 {
        self.id
    }
}
