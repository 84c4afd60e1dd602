use std::path::Path;

use anyhow::Result;
use sadhana_common::{ActivityLog, ScoreBreakdown};
use sadhana_score::ScoreEngine;
use tracing::info;

use super::{points, read_json};

/// Score one activity log and print the breakdown
pub fn run(engine: &ScoreEngine, file: &Path, target_rounds: u32, json: bool) -> Result<()> {
    let log: ActivityLog = read_json(file)?;
    let breakdown = engine.calculate(&log, target_rounds);
    info!("Scored log for {} with target {}", log.today_date, target_rounds);

    if json {
        println!("{}", serde_json::to_string_pretty(&breakdown)?);
    } else {
        print!("{}", render(&log, &breakdown, target_rounds));
    }
    Ok(())
}

pub fn render(log: &ActivityLog, breakdown: &ScoreBreakdown, target_rounds: u32) -> String {
    let mut out = String::new();
    out.push_str(&format!("\nSadhana Score for {}\n", log.today_date));
    out.push_str("═══════════════════════════════\n");
    out.push_str(&format!("Rounds chanted: {} (target {})\n\n", log.total_rounds(), target_rounds));

    for (name, value) in breakdown.categories() {
        out.push_str(&format!("  {:<14}{:>8}\n", name, points(value)));
    }
    out.push_str("  ──────────────────────\n");
    out.push_str(&format!("  {:<14}{:>8}\n\n", "total", points(breakdown.total_score)));
    out
}
