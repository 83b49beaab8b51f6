//! Domain model (parameters, errors, outcomes, ids).

pub mod errors;
pub mod ids;
pub mod outcome;
pub mod params;

pub use errors::ErrorBag;
pub use ids::RunId;
pub use outcome::Outcome;
pub use params::{ObjectValue, ParamObject, Parameters, Value};
