use std::path::Path;

use anyhow::Result;
use chrono::NaiveDate;
use sadhana_common::{DateRange, ParticipantLogs};
use sadhana_score::{build_leaderboard, LeaderboardEntry, RankBy, ScoreEngine};
use tracing::info;

use super::{points, read_json};

/// Build the date filter from optional bounds; either side may be open.
pub fn date_range(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Result<Option<DateRange>> {
    if from.is_none() && to.is_none() {
        return Ok(None);
    }
    let range = DateRange::new(from.unwrap_or(NaiveDate::MIN), to.unwrap_or(NaiveDate::MAX))?;
    Ok(Some(range))
}

/// Rank participants and print the leaderboard
pub fn run(
    engine: &ScoreEngine,
    file: &Path,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
    rank_by: RankBy,
    default_target_rounds: u32,
    json: bool,
) -> Result<()> {
    let range = date_range(from, to)?;
    let participants: Vec<ParticipantLogs> = read_json(file)?;
    let board = build_leaderboard(engine, &participants, range, rank_by, default_target_rounds);
    info!("Built leaderboard for {} participants", board.len());

    if json {
        println!("{}", serde_json::to_string_pretty(&board)?);
    } else {
        print!("{}", render(&board, rank_by));
    }
    Ok(())
}

pub fn render(board: &[LeaderboardEntry], rank_by: RankBy) -> String {
    let mut out = String::new();
    out.push_str(&format!("\nSadhana Leaderboard (by {})\n", rank_by));
    out.push_str("═══════════════════════════════════════════════\n");

    if board.is_empty() {
        out.push_str("No participants\n\n");
        return out;
    }

    out.push_str(&format!("{:>4}  {:<20}{:>6}{:>10}{:>10}\n", "#", "Name", "Days", "Total", "Avg"));
    out.push_str("───────────────────────────────────────────────\n");
    for entry in board {
        out.push_str(&format!(
            "{:>4}  {:<20}{:>6}{:>10}{:>10.1}\n",
            entry.rank,
            entry.name,
            entry.days_logged,
            points(entry.total_score),
            entry.average_score
        ));
    }
    out.push('\n');
    out
}
