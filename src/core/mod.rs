//! Core utilities shared across the engine
//!
//! - `config`: engine policy configuration and validation
//! - `files`: data directory layout and file helpers

pub mod config;
pub mod files;


pub use config::{AssistOverrideConfig, BlendWeights, EngineConfig, RedistributionConfig};
pub use files::{default_data_dir, try_read_to_string, DataPaths};
