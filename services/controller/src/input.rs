use anyhow::{Context, Result};
use protocol::fixture::demo_junctions;
use protocol::Junction;
use serde::Deserialize;
use serde_json::Value;
use std::path::Path;
use tracing::info;

#[derive(Debug, Deserialize)]
struct WrappedNetwork {
    junctions: Vec<Junction>,
    #[serde(default)]
    desired_speed_kmh: Option<f64>,
}

/// Junctions to work on, plus a speed if the file carried one.
#[derive(Debug, Clone, PartialEq)]
pub struct NetworkInput {
    pub junctions: Vec<Junction>,
    pub desired_speed_kmh: Option<f64>,
}

impl NetworkInput {
    /// # Errors
    /// Fails if the JSON is neither a junction array nor a `{ "junctions": [...] }` object.
    pub fn parse(text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text).context("junction file is not JSON")?;
        if value.is_array() {
            let junctions: Vec<Junction> =
                serde_json::from_value(value).context("invalid junction array")?;
            return Ok(Self { junctions, desired_speed_kmh: None });
        }
        let WrappedNetwork { junctions, desired_speed_kmh } =
            serde_json::from_value(value).context("invalid junction file")?;
        Ok(Self { junctions, desired_speed_kmh })
    }

    /// Reads `path`, or falls back to the demo network.
    ///
    /// # Errors
    /// Fails if the file cannot be read or parsed.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            info!("no junction file given, using demo network");
            return Ok(Self { junctions: demo_junctions(), desired_speed_kmh: None });
        };
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading junctions from {}", path.display()))?;
        let input = Self::parse(&text).with_context(|| format!("in {}", path.display()))?;
        info!("loaded {} junctions from {}", input.junctions.len(), path.display());
        Ok(input)
    }
}
