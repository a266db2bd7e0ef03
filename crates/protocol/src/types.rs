use crate::error::{Malformation, ModelError};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use strum_macros::Display;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum Color {
    Red,
    Yellow,
    Green,
}

/// One light of a phase. `min_duration`/`max_duration` bound what an optimizer may
/// stretch or shrink the signal to; they are omitted on the wire when unset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    pub duration: i64,
    pub color: Color,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_duration: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_duration: Option<i64>,
}

impl Signal {
    #[must_use]
    pub const fn new(duration: i64, color: Color) -> Self {
        Self { duration, color, min_duration: None, max_duration: None }
    }

    #[must_use]
    pub fn with_bounds(mut self, min_duration: i64, max_duration: i64) -> Self {
        self.min_duration = Some(min_duration);
        self.max_duration = Some(max_duration);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Phase {
    pub id: i64,
    pub signals: Vec<Signal>,
}

impl Phase {
    #[must_use]
    pub const fn new(id: i64, signals: Vec<Signal>) -> Self {
        Self { id, signals }
    }

    #[must_use]
    pub fn total_duration(&self) -> i64 {
        self.signals.iter().map(|s| s.duration).fold(0, i64::saturating_add)
    }
}

#[derive(Copy, Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Junction {
    pub id: i64,
    pub label: String,
    pub cycle: Vec<Phase>,
    #[serde(default)]
    pub offset: i64,
    #[serde(default)]
    pub point: Point,
}

impl Junction {
    #[must_use]
    pub fn new(id: i64, label: impl Into<String>, cycle: Vec<Phase>) -> Self {
        Self { id, label: label.into(), cycle, offset: 0, point: Point::default() }
    }

    #[must_use]
    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.point = Point { x, y };
        self
    }

    /// Sum of every signal duration across every phase of the cycle, saturating at the
    /// `i64` bounds.
    #[must_use]
    pub fn total_duration(&self) -> i64 {
        self.cycle.iter().map(Phase::total_duration).fold(0, i64::saturating_add)
    }

    /// # Errors
    /// Returns [`ModelError::MalformedJunction`] for an empty cycle, an empty phase,
    /// a non-positive signal duration, inverted duration bounds or a repeated phase id.
    pub fn check_well_formed(&self) -> Result<(), ModelError> {
        let malformed = |reason| ModelError::MalformedJunction { junction_id: self.id, reason };

        if self.cycle.is_empty() {
            return Err(malformed(Malformation::EmptyCycle));
        }

        let mut phase_ids = HashSet::with_capacity(self.cycle.len());
        for phase in &self.cycle {
            if !phase_ids.insert(phase.id) {
                return Err(malformed(Malformation::DuplicatePhaseId(phase.id)));
            }
            if phase.signals.is_empty() {
                return Err(malformed(Malformation::EmptyPhase { phase_id: phase.id }));
            }
            for (signal_idx, signal) in phase.signals.iter().enumerate() {
                if signal.duration <= 0 {
                    return Err(malformed(Malformation::NonPositiveDuration {
                        phase_id: phase.id,
                        signal_idx,
                        duration: signal.duration,
                    }));
                }
                if let (Some(min), Some(max)) = (signal.min_duration, signal.max_duration) {
                    if min > max {
                        return Err(malformed(Malformation::InvertedBounds {
                            phase_id: phase.id,
                            signal_idx,
                            min,
                            max,
                        }));
                    }
                }
            }
        }
        Ok(())
    }
}
