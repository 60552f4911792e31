//! Usage redistribution command implementation

use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::{
    cli::types::{PlayerId, TeamCode},
    ingest::read_slates_file,
    redistribution::AbsenceAdjustment,
    Result,
};

use super::{format_value, open_engine};

/// Parameters for the usage command
#[derive(Debug, Clone)]
pub struct UsageParams {
    pub data_dir: Option<PathBuf>,
    pub slate: PathBuf,
    /// Only this team's slate; every team in the file otherwise.
    pub team: Option<TeamCode>,
    pub as_json: bool,
}

#[derive(Debug, Serialize)]
struct TeamAdjustments {
    team: TeamCode,
    adjustments: BTreeMap<PlayerId, AbsenceAdjustment>,
}

/// Compute absence adjustments for every slate in a CSV.
pub fn handle_usage(params: UsageParams) -> Result<()> {
    let slates = read_slates_file(&params.slate)?;
    let (_, engine) = open_engine(params.data_dir)?;

    let results: Vec<TeamAdjustments> = slates
        .iter()
        .filter(|slate| params.team.as_ref().map_or(true, |t| &slate.team == t))
        .map(|slate| TeamAdjustments {
            team: slate.team.clone(),
            adjustments: engine.compute_usage_adjustments(&slate.team, slate),
        })
        .collect();

    if params.as_json {
        println!("{}", serde_json::to_string_pretty(&results)?);
        return Ok(());
    }

    if results.is_empty() {
        println!("No matching teams in {}.", params.slate.display());
        return Ok(());
    }
    for team in &results {
        if team.adjustments.is_empty() {
            println!("{}: no adjustments", team.team);
            continue;
        }
        println!("{}:", team.team);
        for adjustment in team.adjustments.values() {
            let stats = adjustment
                .multipliers
                .iter()
                .map(|(stat, m)| format!("{} x{}", stat, format_value(*m)))
                .collect::<Vec<_>>()
                .join(", ");
            println!("  {}: {}", adjustment.player_id, stats);
        }
    }
    Ok(())
}
