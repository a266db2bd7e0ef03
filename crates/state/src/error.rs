use network::ClientError;
use protocol::ModelError;
use thiserror::Error;

/// Why an extract or optimize action did not produce results.
#[derive(Debug, Error)]
pub enum ActionError {
    #[error("no junctions to send")]
    NoJunctions,

    #[error(transparent)]
    Malformed(#[from] ModelError),

    #[error("junction cycle lengths differ: {durations:?}")]
    CycleMismatch { durations: Vec<i64> },

    #[error(transparent)]
    Client(#[from] ClientError),
}
