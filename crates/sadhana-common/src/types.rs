use std::fmt;
use std::iter::Sum;
use std::ops::Add;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Time-of-day bucket a batch of japa rounds was chanted in.
///
/// Labels match the ones stored by the API. Any label this build does not
/// know deserializes to [`ChantingSlot::Unrecognized`] instead of failing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChantingSlot {
    #[serde(rename = "before_7_30_am")]
    Before730Am,
    #[serde(rename = "7_30_to_12_00_pm")]
    Morning,
    #[serde(rename = "12_00_to_6_00_pm")]
    Afternoon,
    #[serde(rename = "6_00_to_12_00_am")]
    Evening,
    #[serde(rename = "after_12_00_am")]
    AfterMidnight,
    #[serde(rename = "unrecognized", other)]
    Unrecognized,
}

impl ChantingSlot {
    pub const KNOWN: [ChantingSlot; 5] = [
        ChantingSlot::Before730Am,
        ChantingSlot::Morning,
        ChantingSlot::Afternoon,
        ChantingSlot::Evening,
        ChantingSlot::AfterMidnight,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ChantingSlot::Before730Am => "before_7_30_am",
            ChantingSlot::Morning => "7_30_to_12_00_pm",
            ChantingSlot::Afternoon => "12_00_to_6_00_pm",
            ChantingSlot::Evening => "6_00_to_12_00_am",
            ChantingSlot::AfterMidnight => "after_12_00_am",
            ChantingSlot::Unrecognized => "unrecognized",
        }
    }
}

impl fmt::Display for ChantingSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChantingLog {
    pub slot: ChantingSlot,
    #[serde(default)]
    pub rounds: i64,
}

impl ChantingLog {
    /// Rounds with negative counts treated as zero.
    pub fn counted_rounds(&self) -> u64 {
        self.rounds.max(0) as u64
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookReadingLog {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub reading_time: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssociationLog {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub duration: i64,
}

/// One devotee's sadhana record for a single calendar day.
///
/// This is the shape the REST API hands out. Missing flags and collections
/// default to false / empty so partially filled days still score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityLog {
    pub today_date: NaiveDate,
    #[serde(default)]
    pub sleep_at: Option<String>,
    #[serde(default)]
    pub wakeup_at: Option<String>,

    #[serde(default)]
    pub no_meat: bool,
    #[serde(default)]
    pub no_intoxication: bool,
    #[serde(default)]
    pub no_illicit_sex: bool,
    #[serde(default)]
    pub no_gambling: bool,
    #[serde(default)]
    pub only_prasadam: bool,

    #[serde(default)]
    pub mangla_attended: bool,
    #[serde(default)]
    pub narshima_attended: bool,
    #[serde(default)]
    pub tulsi_arti_attended: bool,
    #[serde(default)]
    pub darshan_arti_attended: bool,
    #[serde(default)]
    pub guru_puja_attended: bool,
    #[serde(default)]
    pub sandhya_arti_attended: bool,
    /// Only some deployments track japa sanga; `None` means not tracked.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub japa_sanga: Option<bool>,

    #[serde(default)]
    pub exercise_time: i64,
    #[serde(default)]
    pub chanting_logs: Vec<ChantingLog>,
    #[serde(default)]
    pub book_reading_logs: Vec<BookReadingLog>,
    #[serde(default)]
    pub association_logs: Vec<AssociationLog>,
}

impl ActivityLog {
    /// An empty log for `date`: nothing chanted, read or attended.
    pub fn new(today_date: NaiveDate) -> Self {
        Self {
            today_date,
            sleep_at: None,
            wakeup_at: None,
            no_meat: false,
            no_intoxication: false,
            no_illicit_sex: false,
            no_gambling: false,
            only_prasadam: false,
            mangla_attended: false,
            narshima_attended: false,
            tulsi_arti_attended: false,
            darshan_arti_attended: false,
            guru_puja_attended: false,
            sandhya_arti_attended: false,
            japa_sanga: None,
            exercise_time: 0,
            chanting_logs: Vec::new(),
            book_reading_logs: Vec::new(),
            association_logs: Vec::new(),
        }
    }

    pub fn total_rounds(&self) -> u64 {
        clamped_total(self.chanting_logs.iter().map(|log| log.rounds))
    }

    pub fn total_reading_minutes(&self) -> u64 {
        clamped_total(self.book_reading_logs.iter().map(|log| log.reading_time))
    }

    pub fn total_association_minutes(&self) -> u64 {
        clamped_total(self.association_logs.iter().map(|log| log.duration))
    }
}

/// Sum of the non-negative values; negative entries count as zero.
pub fn clamped_total<I: IntoIterator<Item = i64>>(values: I) -> u64 {
    values.into_iter().map(|v| v.max(0) as u64).fold(0, u64::saturating_add)
}

/// Points earned per category for one day, plus their sum.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub chanting: f64,
    pub reading: f64,
    pub association: f64,
    pub exercise: f64,
    pub regulations: f64,
    pub arati: f64,
    pub sleep: f64,
    pub wake: f64,
    #[serde(rename = "totalScore")]
    pub total_score: f64,
}

impl ScoreBreakdown {
    /// Build a breakdown from category values, deriving the total.
    #[allow(clippy::too_many_arguments)]
    pub fn from_categories(
        chanting: f64,
        reading: f64,
        association: f64,
        exercise: f64,
        regulations: f64,
        arati: f64,
        sleep: f64,
        wake: f64,
    ) -> Self {
        let total_score =
            chanting + reading + association + exercise + regulations + arati + sleep + wake;
        Self {
            chanting,
            reading,
            association,
            exercise,
            regulations,
            arati,
            sleep,
            wake,
            total_score,
        }
    }

    /// Category name/value pairs in display order.
    pub fn categories(&self) -> [(&'static str, f64); 8] {
        [
            ("chanting", self.chanting),
            ("reading", self.reading),
            ("association", self.association),
            ("exercise", self.exercise),
            ("regulations", self.regulations),
            ("arati", self.arati),
            ("sleep", self.sleep),
            ("wake", self.wake),
        ]
    }

    pub fn category_sum(&self) -> f64 {
        self.categories().iter().map(|(_, v)| v).sum()
    }

    /// Divide every category by `n`; zero `n` yields an all-zero breakdown.
    pub fn scaled_down(&self, n: usize) -> Self {
        if n == 0 {
            return Self::default();
        }
        let d = n as f64;
        Self::from_categories(
            self.chanting / d,
            self.reading / d,
            self.association / d,
            self.exercise / d,
            self.regulations / d,
            self.arati / d,
            self.sleep / d,
            self.wake / d,
        )
    }
}

impl Add for ScoreBreakdown {
    type Output = ScoreBreakdown;

    fn add(self, rhs: Self) -> Self::Output {
        Self::from_categories(
            self.chanting + rhs.chanting,
            self.reading + rhs.reading,
            self.association + rhs.association,
            self.exercise + rhs.exercise,
            self.regulations + rhs.regulations,
            self.arati + rhs.arati,
            self.sleep + rhs.sleep,
            self.wake + rhs.wake,
        )
    }
}

impl Sum for ScoreBreakdown {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

impl<'a> Sum<&'a ScoreBreakdown> for ScoreBreakdown {
    fn sum<I: Iterator<Item = &'a ScoreBreakdown>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

/// A breakdown tied to the day it was computed for.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyScore {
    pub date: NaiveDate,
    pub breakdown: ScoreBreakdown,
}

/// A registered devotee as the API lists them for leaderboards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub id: Uuid,
    pub name: String,
    /// Personal daily chanting quota; the standard quota applies when unset.
    #[serde(default)]
    pub target_rounds: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantLogs {
    pub participant: Participant,
    #[serde(default)]
    pub logs: Vec<ActivityLog>,
}

/// Inclusive range of calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl DateRange {
    pub fn new(from: NaiveDate, to: NaiveDate) -> crate::Result<Self> {
        if from > to {
            return Err(crate::Error::InvalidPeriod(format!(
                "range start {} is after range end {}",
                from, to
            )));
        }
        Ok(Self { from, to })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.from && date <= self.to
    }
}
