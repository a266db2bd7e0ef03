use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("junction {junction_id} is malformed: {reason}")]
    MalformedJunction { junction_id: i64, reason: Malformation },

    #[error("junction id {0} is used more than once")]
    DuplicateJunctionId(i64),
}

/// What exactly is wrong with a junction definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Malformation {
    EmptyCycle,
    EmptyPhase { phase_id: i64 },
    NonPositiveDuration { phase_id: i64, signal_idx: usize, duration: i64 },
    InvertedBounds { phase_id: i64, signal_idx: usize, min: i64, max: i64 },
    DuplicatePhaseId(i64),
}

impl fmt::Display for Malformation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Malformation::EmptyCycle => write!(f, "cycle has no phases"),
            Malformation::EmptyPhase { phase_id } => write!(f, "phase {phase_id} has no signals"),
            Malformation::NonPositiveDuration { phase_id, signal_idx, duration } => write!(
                f,
                "signal {signal_idx} of phase {phase_id} has non-positive duration {duration}"
            ),
            Malformation::InvertedBounds { phase_id, signal_idx, min, max } => write!(
                f,
                "signal {signal_idx} of phase {phase_id} has min_duration {min} above max_duration {max}"
            ),
            Malformation::DuplicatePhaseId(id) => write!(f, "phase id {id} is used more than once"),
        }
    }
}
