//! Type-safe wrappers for projection data.

pub mod ids;
pub mod stat;
pub mod time;

#[cfg(test)]
mod tests;

pub use ids::{PlayerId, TeamCode};
pub use stat::StatKind;
pub use time::GameDate;
