use crate::types::Junction;

/// Detached copy of the collection in the shape sent to the service.
#[must_use]
pub fn prepare_junctions_for_api(junctions: &[Junction]) -> Vec<Junction> {
    junctions.to_vec()
}
