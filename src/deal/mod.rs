//! Deal pipeline records and loading

mod data;
mod loader;

pub use data::{Deal, DealStatus};
pub use loader::{load_deals, load_deals_from_reader};
