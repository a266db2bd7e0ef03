use crate::optimizer::OptimizeOptions;
use crate::types::Junction;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractRequest {
    pub junctions: Vec<Junction>,
    pub desired_speed_kmh: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizeRequest {
    pub junctions: Vec<Junction>,
    pub desired_speed_kmh: f64,
    pub optimizer_type: String,
    pub optimizer_params: Map<String, Value>,
}

impl OptimizeRequest {
    #[must_use]
    pub fn new(junctions: Vec<Junction>, desired_speed_kmh: f64, options: &OptimizeOptions) -> Self {
        Self {
            junctions,
            desired_speed_kmh,
            optimizer_type: options.optimizer_type.clone(),
            optimizer_params: options.optimizer_params.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HealthResponse {
    #[serde(default)]
    pub message: String,
}

/// Time window in which a junction shows green for one of its phases.
#[derive(Copy, Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GreenInterval {
    pub phase_idx: i64,
    pub start: f64,
    pub end: f64,
}

/// Green band between two neighbouring junctions.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GreenWave {
    pub interval_jun_one: Option<GreenInterval>,
    pub interval_jun_two: Option<GreenInterval>,
    /// Meters.
    pub distance: f64,
    /// Seconds.
    pub travel_time: f64,
    pub band_width: f64,
}

/// Green band that carries through a run of consecutive junctions.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ThroughGreenWave {
    pub intervals: Vec<GreenInterval>,
    pub depth: i64,
    pub bandwidth: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractResponse {
    pub green_waves: Vec<GreenWave>,
    pub through_waves: Vec<ThroughGreenWave>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizeResponse {
    pub offsets: Vec<f64>,
    pub green_waves: Vec<GreenWave>,
    pub through_waves: Vec<ThroughGreenWave>,
    /// Best fitness per generation of the optimizer run.
    pub history: Vec<f64>,
}
