use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use sadhana_common::{ActivityLog, DailyScore, Error, Result, ScoreBreakdown};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::engine::ScoreEngine;

/// One devotee's month at a glance.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MonthlyInsights {
    pub year: i32,
    pub month: u32,
    pub days_in_month: u32,
    pub days_logged: u32,
    pub daily: Vec<DailyScore>,
    pub totals: ScoreBreakdown,
    /// Mean per logged day, not per calendar day.
    pub averages: ScoreBreakdown,
    pub best_day: Option<DailyScore>,
    pub longest_streak: u32,
    pub total_rounds: u64,
    /// Share of the month's days that have a log, in `[0, 1]`.
    pub consistency: f64,
}

/// First and last day of a calendar month.
pub fn month_bounds(year: i32, month: u32) -> Result<(NaiveDate, NaiveDate)> {
    let invalid = || Error::InvalidPeriod(format!("{}-{:02} is not a calendar month", year, month));

    let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)?;
    let next_first = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    }
    .ok_or_else(invalid)?;
    let last = next_first.pred_opt().ok_or_else(invalid)?;

    Ok((first, last))
}

/// Collapse logs to one per date, later entries replacing earlier ones.
pub(crate) fn latest_per_day<'a, I>(logs: I) -> BTreeMap<NaiveDate, &'a ActivityLog>
where
    I: IntoIterator<Item = &'a ActivityLog>,
{
    let mut by_day = BTreeMap::new();
    for log in logs {
        if by_day.insert(log.today_date, log).is_some() {
            debug!("Duplicate log for {}, keeping the later entry", log.today_date);
        }
    }
    by_day
}

/// Score a month of logs for one participant.
///
/// Logs outside the month are ignored.
pub fn monthly_insights(
    engine: &ScoreEngine,
    logs: &[ActivityLog],
    year: i32,
    month: u32,
    target_rounds: u32,
) -> Result<MonthlyInsights> {
    let (first, last) = month_bounds(year, month)?;
    let days_in_month = last.day();

    let in_month = latest_per_day(logs.iter().filter(|log| log.today_date >= first && log.today_date <= last));

    let daily: Vec<DailyScore> = in_month
        .values()
        .map(|log| DailyScore { date: log.today_date, breakdown: engine.calculate(log, target_rounds) })
        .collect();

    let totals: ScoreBreakdown = daily.iter().map(|day| day.breakdown).sum();
    let averages = totals.scaled_down(daily.len());

    let mut best_day: Option<DailyScore> = None;
    for day in &daily {
        match best_day {
            Some(best) if day.breakdown.total_score <= best.breakdown.total_score => {}
            _ => best_day = Some(*day),
        }
    }

    let total_rounds = in_month.values().map(|log| log.total_rounds()).fold(0, u64::saturating_add);
    let days_logged = daily.len() as u32;

    debug!("Computed insights for {}-{:02}: {} of {} days logged", year, month, days_logged, days_in_month);

    Ok(MonthlyInsights {
        year,
        month,
        days_in_month,
        days_logged,
        longest_streak: longest_streak(in_month.keys().copied()),
        consistency: f64::from(days_logged) / f64::from(days_in_month),
        daily,
        totals,
        averages,
        best_day,
        total_rounds,
    })
}

/// Longest run of consecutive days in an ascending date sequence.
fn longest_streak<I: IntoIterator<Item = NaiveDate>>(dates: I) -> u32 {
    let mut longest = 0;
    let mut current = 0;
    let mut previous: Option<NaiveDate> = None;

    for date in dates {
        current = match previous.and_then(|p| p.succ_opt()) {
            Some(next) if next == date => current + 1,
            _ => 1,
        };
        longest = longest.max(current);
        previous = Some(date);
    }

    longest
}
