pub mod actions;
pub mod error;
pub mod model;
pub mod store;

pub use actions::{extract, optimize, Completion};
pub use error::ActionError;
pub use model::*;
pub use store::Store;
