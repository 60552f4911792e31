//! Players command implementation

use std::io::Write;
use std::path::PathBuf;

use crate::{cli::types::TeamCode, storage::PlayerEntry, Result};

use super::{csv_writer, open_engine};

/// Parameters for the players master listing
#[derive(Debug, Clone)]
pub struct PlayersParams {
    pub data_dir: Option<PathBuf>,
    pub team: Option<TeamCode>,
    pub out: Option<PathBuf>,
    pub as_json: bool,
}

/// List every player with their most recent team.
pub fn handle_players(params: PlayersParams) -> Result<()> {
    let (_, engine) = open_engine(params.data_dir)?;
    let players = engine.store().players_master(params.team.as_ref())?;

    if let Some(out) = params.out.as_deref() {
        let mut writer = csv_writer(Some(out))?;
        write_players(&mut writer, &players)?;
        writer.flush()?;
        println!("✓ Wrote {} players to {}", players.len(), out.display());
        return Ok(());
    }

    if params.as_json {
        println!("{}", serde_json::to_string_pretty(&players)?);
        return Ok(());
    }

    if players.is_empty() {
        println!("No players stored yet.");
        return Ok(());
    }
    println!("{:<28} {:<5} {:<12} {:>5}", "Player", "Team", "Last seen", "Games");
    for p in &players {
        println!(
            "{:<28} {:<5} {:<12} {:>5}",
            p.player_name,
            p.team.as_str(),
            p.last_seen.to_string(),
            p.games
        );
    }
    Ok(())
}

pub fn write_players<W: Write>(writer: &mut csv::Writer<W>, players: &[PlayerEntry]) -> Result<()> {
    writer.write_record(["Player", "Team", "LastSeen", "Games"])?;
    for p in players {
        writer.write_record([
            p.player_name.clone(),
            p.team.as_str().to_string(),
            p.last_seen.to_string(),
            p.games.to_string(),
        ])?;
    }
    Ok(())
}
