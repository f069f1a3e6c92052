//! Deal assumptions: the validated engine input record and its untrusted
//! parse boundary

mod deal;
mod validate;

pub use deal::DealAssumptions;
pub use validate::{AssumptionsInput, ValidationError};
