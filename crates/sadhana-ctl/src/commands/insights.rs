use std::path::Path;

use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDate};
use sadhana_common::ActivityLog;
use sadhana_score::{monthly_insights, MonthlyInsights, ScoreEngine};

use super::{points, read_json};

/// Parse a `YYYY-MM` month argument
pub fn parse_month(month: &str) -> Result<(i32, u32)> {
    let first = NaiveDate::parse_from_str(&format!("{}-01", month.trim()), "%Y-%m-%d")
        .with_context(|| format!("Invalid month '{}', expected YYYY-MM", month))?;
    Ok((first.year(), first.month()))
}

/// Print monthly insights for a participant's logs
pub fn run(engine: &ScoreEngine, file: &Path, month: &str, target_rounds: u32, json: bool) -> Result<()> {
    let (year, month) = parse_month(month)?;
    let logs: Vec<ActivityLog> = read_json(file)?;
    let insights = monthly_insights(engine, &logs, year, month, target_rounds)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&insights)?);
    } else {
        print!("{}", render(&insights));
    }
    Ok(())
}

pub fn render(insights: &MonthlyInsights) -> String {
    let mut out = String::new();
    out.push_str(&format!("\nMonthly Sadhana Insights ({}-{:02})\n", insights.year, insights.month));
    out.push_str("═══════════════════════════════════════\n\n");

    out.push_str(&format!(
        "Days logged: {} of {} ({:.0}%)\n",
        insights.days_logged,
        insights.days_in_month,
        insights.consistency * 100.0
    ));
    out.push_str(&format!("Longest streak: {} days\n", insights.longest_streak));
    out.push_str(&format!("Rounds chanted: {}\n", insights.total_rounds));
    out.push_str(&format!("Total score: {}\n", points(insights.totals.total_score)));

    if let Some(best) = &insights.best_day {
        out.push_str(&format!("Best day: {} ({})\n", best.date, points(best.breakdown.total_score)));
    }

    if insights.days_logged > 0 {
        out.push_str("\nCategory      Total   Daily avg\n");
        out.push_str("───────────────────────────────\n");
        let averages = insights.averages.categories();
        for (i, (name, total)) in insights.totals.categories().iter().enumerate() {
            out.push_str(&format!("{:<12}{:>8}{:>11.1}\n", name, points(*total), averages[i].1));
        }
    }

    out.push('\n');
    out
}
