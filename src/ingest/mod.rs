//! Turning uploaded CSV files into engine inputs
//!
//! Column names are resolved once, here, through [`aliases::ALIASES`]; the
//! rest of the crate only ever sees canonical fields.

pub mod aliases;
pub mod feed;

#[cfg(test)]
mod tests;

pub use aliases::{Column, ColumnIndex, ALIASES};
pub use feed::{read_feed, read_feed_file, read_slates, read_slates_file};
