use crate::config::DEFAULT_OPTIMIZER_TYPE;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use strum_macros::Display;

#[derive(Copy, Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum CrossoverType {
    Blend,
    Uniform,
}

/// Tuning knobs understood by the service's genetic optimizer. Unset fields are left
/// to the service defaults.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GeneticParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub population_size: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generations: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mutation_rate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tournament_size: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crossover_type: Option<CrossoverType>,
}

impl GeneticParams {
    #[must_use]
    pub fn into_params(self) -> Map<String, Value> {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        }
    }
}

/// Optimizer selector plus its free-form configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizeOptions {
    pub optimizer_type: String,
    pub optimizer_params: Map<String, Value>,
}

impl Default for OptimizeOptions {
    fn default() -> Self {
        Self { optimizer_type: DEFAULT_OPTIMIZER_TYPE.to_string(), optimizer_params: Map::new() }
    }
}

impl OptimizeOptions {
    #[must_use]
    pub fn genetic(params: &GeneticParams) -> Self {
        Self { optimizer_params: params.clone().into_params(), ..Self::default() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn default_params_are_empty() {
        assert!(GeneticParams::default().into_params().is_empty());
        let options = OptimizeOptions::default();
        assert_eq!(options.optimizer_type, "genetic");
        assert!(options.optimizer_params.is_empty());
    }

    #[test]
    fn set_fields_are_forwarded() {
        let params = GeneticParams {
            population_size: Some(50),
            generations: Some(200),
            mutation_rate: Some(0.05),
            tournament_size: Some(3),
            crossover_type: Some(CrossoverType::Blend),
        };
        assert_eq!(
            Value::Object(params.into_params()),
            json!({
                "population_size": 50,
                "generations": 200,
                "mutation_rate": 0.05,
                "tournament_size": 3,
                "crossover_type": "blend"
            })
        );
    }

    #[test]
    fn crossover_display_matches_wire() {
        assert_eq!(CrossoverType::Uniform.to_string(), "uniform");
    }
}
