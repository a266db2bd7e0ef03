pub mod config;
pub mod error;
pub mod fixture;
pub mod messages;
pub mod optimizer;
pub mod payload;
pub mod types;
pub mod validation;

pub use error::{Malformation, ModelError};
pub use messages::*;
pub use optimizer::*;
pub use payload::prepare_junctions_for_api;
pub use types::*;
pub use validation::{calculate_total_duration, check_junctions, validate_junction_cycles, CycleValidation};
