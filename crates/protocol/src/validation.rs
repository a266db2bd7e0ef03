use crate::error::ModelError;
use crate::types::Junction;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Per-junction cycle lengths and whether they all agree with the first one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleValidation {
    pub is_valid: bool,
    pub durations: Vec<i64>,
    /// Duration of the first junction; `None` for an empty collection.
    pub common_duration: Option<i64>,
}

impl CycleValidation {
    /// Indices of the junctions whose cycle length differs from the reference.
    #[must_use]
    pub fn mismatched(&self) -> Vec<usize> {
        match self.common_duration {
            Some(common) => self
                .durations
                .iter()
                .enumerate()
                .filter(|(_, d)| **d != common)
                .map(|(idx, _)| idx)
                .collect(),
            None => Vec::new(),
        }
    }
}

#[must_use]
pub fn calculate_total_duration(junction: &Junction) -> i64 {
    junction.total_duration()
}

/// An empty collection is reported as valid with no common duration.
#[must_use]
pub fn validate_junction_cycles(junctions: &[Junction]) -> CycleValidation {
    let durations: Vec<i64> = junctions.iter().map(calculate_total_duration).collect();
    let common_duration = durations.first().copied();
    let is_valid = durations.iter().all(|d| Some(*d) == common_duration);

    CycleValidation { is_valid, durations, common_duration }
}

/// Structural check of every junction followed by the cycle report. A cycle length
/// mismatch is returned as `is_valid = false`, not as an error.
///
/// # Errors
/// Returns the first [`ModelError`] found: a malformed junction or a repeated junction id.
pub fn check_junctions(junctions: &[Junction]) -> Result<CycleValidation, ModelError> {
    let mut ids = HashSet::with_capacity(junctions.len());
    for junction in junctions {
        junction.check_well_formed()?;
        if !ids.insert(junction.id) {
            return Err(ModelError::DuplicateJunctionId(junction.id));
        }
    }
    Ok(validate_junction_cycles(junctions))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Malformation;
    use crate::types::{Color, Phase, Signal};

    fn junction(id: i64, durations: &[&[i64]]) -> Junction {
        let cycle = durations
            .iter()
            .enumerate()
            .map(|(phase_id, signals)| {
                Phase::new(
                    phase_id as i64,
                    signals.iter().map(|d| Signal::new(*d, Color::Green)).collect(),
                )
            })
            .collect();
        Junction::new(id, format!("Junction {id}"), cycle)
    }

    #[test]
    fn total_duration_example() {
        let j = junction(0, &[&[30, 20], &[20, 15]]);
        assert_eq!(calculate_total_duration(&j), 85);
    }

    #[test]
    fn total_duration_is_order_independent() {
        let a = junction(0, &[&[30, 20], &[20, 15]]);
        let b = junction(0, &[&[15, 20], &[20, 30]]);
        assert_eq!(calculate_total_duration(&a), calculate_total_duration(&b));
    }

    #[test]
    fn junction_without_phases_sums_to_zero() {
        assert_eq!(calculate_total_duration(&Junction::new(1, "bare", vec![])), 0);
    }

    #[test]
    fn equal_cycles_are_valid() {
        let report = validate_junction_cycles(&[
            junction(0, &[&[30, 20], &[20, 15]]),
            junction(1, &[&[20, 35, 5], &[10, 10, 5]]),
        ]);
        assert!(report.is_valid);
        assert_eq!(report.durations, vec![85, 85]);
        assert_eq!(report.common_duration, Some(85));
        assert!(report.mismatched().is_empty());
    }

    #[test]
    fn one_changed_signal_breaks_validity() {
        let report = validate_junction_cycles(&[
            junction(0, &[&[30, 20], &[20, 15]]),
            junction(1, &[&[30, 20], &[20, 10]]),
        ]);
        assert!(!report.is_valid);
        assert_eq!(report.durations, vec![85, 80]);
        assert_eq!(report.common_duration, Some(85));
        assert_eq!(report.mismatched(), vec![1]);
    }

    #[test]
    fn reference_is_first_junction() {
        let report = validate_junction_cycles(&[
            junction(0, &[&[10]]),
            junction(1, &[&[20]]),
            junction(2, &[&[20]]),
        ]);
        assert!(!report.is_valid);
        assert_eq!(report.common_duration, Some(10));
        assert_eq!(report.mismatched(), vec![1, 2]);
    }

    #[test]
    fn empty_collection_is_vacuously_valid() {
        let report = validate_junction_cycles(&[]);
        assert!(report.is_valid);
        assert!(report.durations.is_empty());
        assert_eq!(report.common_duration, None);
    }

    #[test]
    fn check_junctions_reports_mismatch_as_data() {
        let report =
            check_junctions(&[junction(0, &[&[30, 20]]), junction(1, &[&[40]])]).unwrap();
        assert!(!report.is_valid);
    }

    #[test]
    fn check_junctions_rejects_malformed() {
        let err = check_junctions(&[junction(0, &[&[30]]), junction(1, &[&[]])]).unwrap_err();
        assert_eq!(
            err,
            ModelError::MalformedJunction {
                junction_id: 1,
                reason: Malformation::EmptyPhase { phase_id: 0 },
            }
        );
    }

    #[test]
    fn check_junctions_rejects_duplicate_ids() {
        let err = check_junctions(&[junction(3, &[&[30]]), junction(3, &[&[30]])]).unwrap_err();
        assert_eq!(err, ModelError::DuplicateJunctionId(3));
    }
}
