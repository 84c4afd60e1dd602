// Scoring rule table
//
// Every point value the engine uses lives here as plain data. A rule table
// is immutable once built; a different season's rules are a different
// `ScoringRules` value, loaded from TOML and validated before use.

use std::fs;
use std::path::Path;

use sadhana_common::{ChantingSlot, Error, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringRules {
    /// Free-form label identifying this rule set.
    pub version: String,
    pub chanting: ChantingRules,
    pub reading: CappedRate,
    pub association: CappedRate,
    pub exercise: ExerciseRules,
    pub regulations: RegulationRules,
    pub arati: AratiRules,
    pub sleep: TimeBands,
    pub wake: TimeBands,
}

/// Points per round, per time-of-day slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChantingRules {
    #[serde(rename = "before_7_30_am")]
    pub before_7_30_am: f64,
    #[serde(rename = "7_30_to_12_00_pm")]
    pub morning: f64,
    #[serde(rename = "12_00_to_6_00_pm")]
    pub afternoon: f64,
    #[serde(rename = "6_00_to_12_00_am")]
    pub evening: f64,
    #[serde(rename = "after_12_00_am")]
    pub after_midnight: f64,
    /// Flat credit for every round past the participant's target.
    pub beyond_target: f64,
}

impl ChantingRules {
    pub fn points_for(&self, slot: ChantingSlot) -> f64 {
        match slot {
            ChantingSlot::Before730Am => self.before_7_30_am,
            ChantingSlot::Morning => self.morning,
            ChantingSlot::Afternoon => self.afternoon,
            ChantingSlot::Evening => self.evening,
            ChantingSlot::AfterMidnight => self.after_midnight,
            ChantingSlot::Unrecognized => 0.0,
        }
    }
}

/// Linear points-per-minute rate with a ceiling.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CappedRate {
    pub points_per_minute: f64,
    pub max_points: f64,
}

impl CappedRate {
    pub fn score(&self, minutes: u64) -> f64 {
        (minutes as f64 * self.points_per_minute).min(self.max_points)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExerciseRules {
    pub points: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegulationRules {
    pub no_meat: f64,
    pub no_intoxication: f64,
    pub no_illicit_sex: f64,
    pub no_gambling: f64,
    pub only_prasadam: f64,
}

impl RegulationRules {
    pub fn max_points(&self) -> f64 {
        self.no_meat + self.no_intoxication + self.no_illicit_sex + self.no_gambling + self.only_prasadam
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AratiRules {
    pub mangla: f64,
    pub narshima: f64,
    pub tulsi: f64,
    pub darshan: f64,
    pub guru_puja: f64,
    pub sandhya: f64,
    pub japa_sanga: f64,
}

impl AratiRules {
    pub fn max_points(&self, japa_sanga_tracked: bool) -> f64 {
        let base = self.mangla + self.narshima + self.tulsi + self.darshan + self.guru_puja + self.sandhya;
        if japa_sanga_tracked {
            base + self.japa_sanga
        } else {
            base
        }
    }
}

/// Half-open minute range `[start_minute, end_minute)` worth `points`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeBand {
    pub start_minute: u32,
    pub end_minute: u32,
    pub points: f64,
}

impl TimeBand {
    pub fn contains(&self, minute: u32) -> bool {
        minute >= self.start_minute && minute < self.end_minute
    }
}

/// Piecewise classification of a time of day into points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeBands {
    pub bands: Vec<TimeBand>,
    /// Points for a parsed time that falls in no band.
    pub otherwise: f64,
}

impl TimeBands {
    pub fn points_at(&self, minute: u32) -> f64 {
        self.bands.iter().find(|band| band.contains(minute)).map_or(self.otherwise, |band| band.points)
    }

    pub fn max_points(&self) -> f64 {
        self.bands.iter().map(|band| band.points).fold(self.otherwise, f64::max)
    }

    fn validate(&self, name: &str) -> Result<()> {
        check_points(&format!("{}.otherwise", name), self.otherwise)?;

        let mut sorted: Vec<&TimeBand> = self.bands.iter().collect();
        sorted.sort_by_key(|band| band.start_minute);

        let mut previous_end: Option<u32> = None;
        for band in sorted {
            if band.start_minute >= band.end_minute {
                return Err(Error::InvalidRules(format!(
                    "{} band {}..{} is empty or inverted",
                    name, band.start_minute, band.end_minute
                )));
            }
            check_points(&format!("{} band {}..{}", name, band.start_minute, band.end_minute), band.points)?;
            if let Some(end) = previous_end {
                if band.start_minute < end {
                    return Err(Error::InvalidRules(format!(
                        "{} band starting at {} overlaps the previous band ending at {}",
                        name, band.start_minute, end
                    )));
                }
            }
            previous_end = Some(band.end_minute);
        }

        Ok(())
    }
}

impl Default for ScoringRules {
    fn default() -> Self {
        Self {
            version: "standard".to_string(),
            chanting: ChantingRules {
                before_7_30_am: 10.0,
                morning: 7.5,
                afternoon: 5.0,
                evening: 2.5,
                after_midnight: 1.0,
                beyond_target: 1.0,
            },
            reading: CappedRate { points_per_minute: 0.5, max_points: 60.0 },
            association: CappedRate { points_per_minute: 0.5, max_points: 60.0 },
            exercise: ExerciseRules { points: 20.0 },
            regulations: RegulationRules {
                no_meat: 5.0,
                no_intoxication: 5.0,
                no_illicit_sex: 5.0,
                no_gambling: 5.0,
                only_prasadam: 20.0,
            },
            arati: AratiRules {
                mangla: 10.0,
                narshima: 5.0,
                tulsi: 5.0,
                darshan: 5.0,
                guru_puja: 5.0,
                sandhya: 5.0,
                japa_sanga: 10.0,
            },
            // Sleep minutes are on the rolled-over scale (00:30 = 1470).
            sleep: TimeBands {
                bands: vec![
                    TimeBand { start_minute: 0, end_minute: 1320, points: 25.0 },
                    TimeBand { start_minute: 1320, end_minute: 1350, points: 20.0 },
                    TimeBand { start_minute: 1350, end_minute: 1380, points: 15.0 },
                ],
                otherwise: 5.0,
            },
            wake: TimeBands {
                bands: vec![
                    TimeBand { start_minute: 210, end_minute: 240, points: 25.0 },
                    TimeBand { start_minute: 240, end_minute: 270, points: 20.0 },
                    TimeBand { start_minute: 270, end_minute: 330, points: 15.0 },
                ],
                otherwise: 0.0,
            },
        }
    }
}

impl ScoringRules {
    /// Parse and validate a TOML rule table.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let rules: ScoringRules = toml::from_str(content)?;
        rules.validate()?;
        Ok(rules)
    }

    /// Load and validate a rule table from a TOML file.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        debug!("Loading scoring rules from {:?}", path);
        let content = fs::read_to_string(path)?;
        let rules = Self::from_toml_str(&content)?;
        info!("Loaded scoring rules '{}' from {:?}", rules.version, path);
        Ok(rules)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Reject tables that could produce negative or ambiguous scores.
    pub fn validate(&self) -> Result<()> {
        let c = &self.chanting;
        for (name, value) in [
            ("chanting.before_7_30_am", c.before_7_30_am),
            ("chanting.7_30_to_12_00_pm", c.morning),
            ("chanting.12_00_to_6_00_pm", c.afternoon),
            ("chanting.6_00_to_12_00_am", c.evening),
            ("chanting.after_12_00_am", c.after_midnight),
            ("chanting.beyond_target", c.beyond_target),
            ("reading.points_per_minute", self.reading.points_per_minute),
            ("reading.max_points", self.reading.max_points),
            ("association.points_per_minute", self.association.points_per_minute),
            ("association.max_points", self.association.max_points),
            ("exercise.points", self.exercise.points),
            ("regulations.no_meat", self.regulations.no_meat),
            ("regulations.no_intoxication", self.regulations.no_intoxication),
            ("regulations.no_illicit_sex", self.regulations.no_illicit_sex),
            ("regulations.no_gambling", self.regulations.no_gambling),
            ("regulations.only_prasadam", self.regulations.only_prasadam),
            ("arati.mangla", self.arati.mangla),
            ("arati.narshima", self.arati.narshima),
            ("arati.tulsi", self.arati.tulsi),
            ("arati.darshan", self.arati.darshan),
            ("arati.guru_puja", self.arati.guru_puja),
            ("arati.sandhya", self.arati.sandhya),
            ("arati.japa_sanga", self.arati.japa_sanga),
        ] {
            check_points(name, value)?;
        }

        self.sleep.validate("sleep")?;
        self.wake.validate("wake")?;
        Ok(())
    }

    /// Highest score a single day can reach outside chanting, which has no
    /// ceiling.
    pub fn max_daily_score(&self, japa_sanga_tracked: bool) -> f64 {
        self.reading.max_points
            + self.association.max_points
            + self.exercise.points
            + self.regulations.max_points()
            + self.arati.max_points(japa_sanga_tracked)
            + self.sleep.max_points()
            + self.wake.max_points()
    }
}

fn check_points(name: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(Error::InvalidRules(format!("{} must be a non-negative number, got {}", name, value)));
    }
    Ok(())
}
