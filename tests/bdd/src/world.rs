use chrono::NaiveDate;
use cucumber::World;
use sadhana_common::{ActivityLog, ChantingSlot, ScoreBreakdown};
use sadhana_score::ScoreEngine;

/// BDD World for sadhana scoring
#[derive(Debug, World)]
#[world(init = Self::new)]
pub struct ScoringWorld {
    /// Engine under test
    pub engine: ScoreEngine,

    /// Log being built up by Given steps
    pub log: ActivityLog,

    /// Participant's daily chanting quota
    pub target_rounds: u32,

    /// Result of the last When step
    pub breakdown: Option<ScoreBreakdown>,
}

impl ScoringWorld {
    pub fn new() -> Self {
        Self {
            engine: ScoreEngine::default(),
            log: ActivityLog::new(NaiveDate::from_ymd_opt(2024, 1, 1).expect("valid date")),
            target_rounds: sadhana_common::config::DEFAULT_TARGET_ROUNDS,
            breakdown: None,
        }
    }

    /// Resolve a slot label the way the API payload would.
    pub fn slot(label: &str) -> ChantingSlot {
        serde_json::from_value(serde_json::Value::String(label.to_string()))
            .unwrap_or(ChantingSlot::Unrecognized)
    }

    /// Value of a named category, or of the total.
    pub fn category(&self, name: &str) -> Option<f64> {
        let breakdown = self.breakdown.as_ref()?;
        if name == "total" {
            return Some(breakdown.total_score);
        }
        breakdown.categories().iter().find(|(n, _)| *n == name).map(|(_, v)| *v)
    }
}

impl Default for ScoringWorld {
    fn default() -> Self {
        Self::new()
    }
}
