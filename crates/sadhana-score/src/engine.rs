// Sadhana Score Engine
//
// Turns one day's activity log into points per category. Each category is
// computed by its own function from its own fields only, so a malformed
// timestamp or an unknown slot label costs that one category and nothing
// else.

use sadhana_common::clock::{minutes_since_midnight, parse_wall_clock, sleep_scale_minutes};
use sadhana_common::config::DEFAULT_TARGET_ROUNDS;
use sadhana_common::types::clamped_total;
use sadhana_common::{
    ActivityLog, AssociationLog, BookReadingLog, ChantingLog, ChantingSlot, Result, ScoreBreakdown,
};
use tracing::{debug, trace};

use crate::rules::ScoringRules;

/// Stateless scorer bound to one rule table.
#[derive(Debug, Clone, Default)]
pub struct ScoreEngine {
    rules: ScoringRules,
}

impl ScoreEngine {
    /// Bind an engine to `rules`, rejecting tables that could yield a
    /// negative or non-finite category.
    pub fn new(rules: ScoringRules) -> Result<Self> {
        rules.validate()?;
        Ok(Self { rules })
    }

    pub fn rules(&self) -> &ScoringRules {
        &self.rules
    }

    /// Score every category of `log` against the participant's daily quota.
    pub fn calculate(&self, log: &ActivityLog, target_rounds: u32) -> ScoreBreakdown {
        let breakdown = ScoreBreakdown::from_categories(
            self.chanting_score(&log.chanting_logs, target_rounds),
            self.reading_score(&log.book_reading_logs),
            self.association_score(&log.association_logs),
            self.exercise_score(log.exercise_time),
            self.regulation_score(log),
            self.arati_score(log),
            self.sleep_score(log.sleep_at.as_deref()),
            self.wake_score(log.wakeup_at.as_deref()),
        );

        trace!(
            "Scored {}: chanting={} reading={} association={} exercise={} regulations={} arati={} sleep={} wake={} total={}",
            log.today_date,
            breakdown.chanting,
            breakdown.reading,
            breakdown.association,
            breakdown.exercise,
            breakdown.regulations,
            breakdown.arati,
            breakdown.sleep,
            breakdown.wake,
            breakdown.total_score
        );

        breakdown
    }

    /// Chanting points with the best-valued rounds spent against the quota.
    ///
    /// Rounds are ranked by their slot's rate. The top `target_rounds` earn
    /// that rate and every round past the quota earns the flat
    /// `beyond_target` credit, whichever slot it came from. Slots are
    /// consumed as whole groups rather than one entry per round, which gives
    /// the same sum.
    pub fn chanting_score(&self, logs: &[ChantingLog], target_rounds: u32) -> f64 {
        let rates = &self.rules.chanting;

        let mut groups: Vec<(f64, u64)> = logs
            .iter()
            .filter(|log| log.counted_rounds() > 0)
            .map(|log| {
                if log.slot == ChantingSlot::Unrecognized {
                    debug!("Unrecognized chanting slot with {} rounds scores no slot points", log.rounds);
                }
                (rates.points_for(log.slot), log.counted_rounds())
            })
            .collect();
        groups.sort_by(|a, b| b.0.total_cmp(&a.0));

        let mut quota_left = u64::from(target_rounds);
        let mut score = 0.0;
        for (rate, rounds) in groups {
            let within_quota = rounds.min(quota_left);
            quota_left -= within_quota;
            score += rate * within_quota as f64;
            score += rates.beyond_target * (rounds - within_quota) as f64;
        }

        score
    }

    pub fn reading_score(&self, logs: &[BookReadingLog]) -> f64 {
        self.rules.reading.score(clamped_total(logs.iter().map(|log| log.reading_time)))
    }

    pub fn association_score(&self, logs: &[AssociationLog]) -> f64 {
        self.rules.association.score(clamped_total(logs.iter().map(|log| log.duration)))
    }

    /// All-or-nothing: any exercise at all earns the full points.
    pub fn exercise_score(&self, exercise_time: i64) -> f64 {
        if exercise_time > 0 {
            self.rules.exercise.points
        } else {
            0.0
        }
    }

    pub fn regulation_score(&self, log: &ActivityLog) -> f64 {
        let r = &self.rules.regulations;
        [
            (log.no_meat, r.no_meat),
            (log.no_intoxication, r.no_intoxication),
            (log.no_illicit_sex, r.no_illicit_sex),
            (log.no_gambling, r.no_gambling),
            (log.only_prasadam, r.only_prasadam),
        ]
        .iter()
        .filter(|(kept, _)| *kept)
        .map(|(_, points)| points)
        .sum()
    }

    pub fn arati_score(&self, log: &ActivityLog) -> f64 {
        let a = &self.rules.arati;
        [
            (log.mangla_attended, a.mangla),
            (log.narshima_attended, a.narshima),
            (log.tulsi_arti_attended, a.tulsi),
            (log.darshan_arti_attended, a.darshan),
            (log.guru_puja_attended, a.guru_puja),
            (log.sandhya_arti_attended, a.sandhya),
            (log.japa_sanga.unwrap_or(false), a.japa_sanga),
        ]
        .iter()
        .filter(|(attended, _)| *attended)
        .map(|(_, points)| points)
        .sum()
    }

    /// Bedtime points; missing or unparseable timestamps score zero.
    pub fn sleep_score(&self, sleep_at: Option<&str>) -> f64 {
        match wall_clock("sleep_at", sleep_at) {
            Some(time) => self.rules.sleep.points_at(sleep_scale_minutes(time)),
            None => 0.0,
        }
    }

    /// Rising-time points; missing or unparseable timestamps score zero.
    pub fn wake_score(&self, wakeup_at: Option<&str>) -> f64 {
        match wall_clock("wakeup_at", wakeup_at) {
            Some(time) => self.rules.wake.points_at(minutes_since_midnight(time)),
            None => 0.0,
        }
    }
}

fn wall_clock(field: &str, raw: Option<&str>) -> Option<chrono::NaiveTime> {
    let raw = raw?;
    let parsed = parse_wall_clock(raw);
    if parsed.is_none() {
        debug!("Ignoring unparseable {} timestamp {:?}", field, raw);
    }
    parsed
}

/// Score a log with the standard rules.
///
/// `target_rounds` falls back to the standard quota of 16 rounds.
pub fn calculate_score(log: &ActivityLog, target_rounds: Option<u32>) -> ScoreBreakdown {
    ScoreEngine::default().calculate(log, target_rounds.unwrap_or(DEFAULT_TARGET_ROUNDS))
}
