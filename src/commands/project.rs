//! Project command implementation

use serde::Serialize;
use std::path::PathBuf;

use crate::{
    cli::types::{PlayerId, TeamCode},
    storage::StatLine,
    Result,
};

use super::{describe_line, open_engine};

/// Parameters for a one-off projection
#[derive(Debug, Clone)]
pub struct ProjectParams {
    pub data_dir: Option<PathBuf>,
    pub player: String,
    pub opponent: TeamCode,
    pub minutes: f64,
    pub raw: StatLine,
    pub as_json: bool,
}

#[derive(Debug, Serialize)]
struct ProjectOutput<'a> {
    player_id: &'a PlayerId,
    opponent: &'a TeamCode,
    minutes: f64,
    raw: &'a StatLine,
    blended: &'a StatLine,
}

/// Blend one raw line against the current calibration.
pub fn handle_project(params: ProjectParams) -> Result<()> {
    let (_, engine) = open_engine(params.data_dir)?;
    let player = PlayerId::new(&params.player);

    let blended = engine.project(&player, &params.opponent, params.minutes, &params.raw)?;

    if params.as_json {
        let output = ProjectOutput {
            player_id: &player,
            opponent: &params.opponent,
            minutes: params.minutes,
            raw: &params.raw,
            blended: &blended,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!(
        "{} vs {} ({} min)",
        params.player.trim(),
        params.opponent,
        params.minutes
    );
    println!("  raw:     {}", describe_line(&params.raw));
    println!("  blended: {}", describe_line(&blended));
    Ok(())
}
