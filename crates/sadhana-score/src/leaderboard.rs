use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use sadhana_common::{DateRange, ParticipantLogs, ScoreBreakdown};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::engine::ScoreEngine;
use crate::insights::latest_per_day;

/// Metric the leaderboard is ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RankBy {
    #[default]
    Total,
    Average,
}

impl FromStr for RankBy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "total" => Ok(RankBy::Total),
            "average" | "avg" => Ok(RankBy::Average),
            other => Err(format!("unknown ranking metric '{}', expected 'total' or 'average'", other)),
        }
    }
}

impl fmt::Display for RankBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RankBy::Total => f.write_str("total"),
            RankBy::Average => f.write_str("average"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    /// Competition rank: tied participants share a rank and the next rank
    /// skips accordingly (1, 1, 3).
    pub rank: u32,
    pub participant_id: Uuid,
    pub name: String,
    pub days_logged: u32,
    pub total_score: f64,
    pub average_score: f64,
}

impl LeaderboardEntry {
    fn metric(&self, rank_by: RankBy) -> f64 {
        match rank_by {
            RankBy::Total => self.total_score,
            RankBy::Average => self.average_score,
        }
    }
}

/// Score every participant over `range` and rank them.
///
/// Each participant is scored against their own target, or
/// `default_target_rounds` when they have none. Logs outside `range` are
/// ignored; `None` takes every log.
pub fn build_leaderboard(
    engine: &ScoreEngine,
    participants: &[ParticipantLogs],
    range: Option<DateRange>,
    rank_by: RankBy,
    default_target_rounds: u32,
) -> Vec<LeaderboardEntry> {
    let mut entries: Vec<LeaderboardEntry> = participants
        .iter()
        .map(|p| {
            let target = p.participant.target_rounds.unwrap_or(default_target_rounds);
            let days = latest_per_day(
                p.logs.iter().filter(|log| range.map_or(true, |r| r.contains(log.today_date))),
            );

            let totals: ScoreBreakdown = days.values().map(|log| engine.calculate(log, target)).sum();
            let days_logged = days.len() as u32;

            LeaderboardEntry {
                rank: 0,
                participant_id: p.participant.id,
                name: p.participant.name.clone(),
                days_logged,
                total_score: totals.total_score,
                average_score: totals.scaled_down(days.len()).total_score,
            }
        })
        .collect();

    entries.sort_by(|a, b| {
        b.metric(rank_by)
            .total_cmp(&a.metric(rank_by))
            .then_with(|| a.name.cmp(&b.name))
            .then_with(|| a.participant_id.cmp(&b.participant_id))
    });

    let mut previous: Option<(f64, u32)> = None;
    for (index, entry) in entries.iter_mut().enumerate() {
        let metric = entry.metric(rank_by);
        entry.rank = match previous {
            Some((p, rank)) if p.total_cmp(&metric) == Ordering::Equal => rank,
            _ => index as u32 + 1,
        };
        previous = Some((metric, entry.rank));
    }

    debug!("Ranked {} participants by {}", entries.len(), rank_by);
    entries
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use sadhana_common::{ActivityLog, ChantingLog, ChantingSlot, Participant};

    use super::*;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    fn day(d: u32, rounds: i64) -> ActivityLog {
        let mut log = ActivityLog::new(date(d));
        log.chanting_logs = vec![ChantingLog { slot: ChantingSlot::Before730Am, rounds }];
        log
    }

    fn participant(name: &str, target_rounds: Option<u32>, logs: Vec<ActivityLog>) -> ParticipantLogs {
        ParticipantLogs {
            participant: Participant { id: Uuid::new_v4(), name: name.to_string(), target_rounds },
            logs,
        }
    }

    #[test]
    fn test_rank_by_parsing() {
        assert_eq!("total".parse::<RankBy>().unwrap(), RankBy::Total);
        assert_eq!("Average".parse::<RankBy>().unwrap(), RankBy::Average);
        assert_eq!("avg".parse::<RankBy>().unwrap(), RankBy::Average);
        assert!("median".parse::<RankBy>().is_err());
        assert_eq!(RankBy::default(), RankBy::Total);
    }

    #[test]
    fn test_ranks_by_total_descending() {
        let engine = ScoreEngine::default();
        let participants = vec![
            participant("Gopal", None, vec![day(1, 4)]),
            participant("Radhika", None, vec![day(1, 10), day(2, 10)]),
            participant("Keshav", None, vec![day(1, 8)]),
        ];

        let board = build_leaderboard(&engine, &participants, None, RankBy::Total, 16);
        let names: Vec<&str> = board.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Radhika", "Keshav", "Gopal"]);
        assert_eq!(board[0].rank, 1);
        assert_eq!(board[0].total_score, 200.0);
        assert_eq!(board[0].average_score, 100.0);
        assert_eq!(board[0].days_logged, 2);
        assert_eq!(board[2].rank, 3);
    }

    #[test]
    fn test_ties_share_rank_and_order_by_name() {
        let engine = ScoreEngine::default();
        let participants = vec![
            participant("Yamuna", None, vec![day(1, 5)]),
            participant("Bhakti", None, vec![day(1, 5)]),
            participant("Chaitanya", None, vec![day(1, 1)]),
        ];

        let board = build_leaderboard(&engine, &participants, None, RankBy::Total, 16);
        assert_eq!(board[0].name, "Bhakti");
        assert_eq!(board[1].name, "Yamuna");
        assert_eq!(board[0].rank, 1);
        assert_eq!(board[1].rank, 1);
        assert_eq!(board[2].rank, 3);
    }

    #[test]
    fn test_personal_target_applies() {
        let engine = ScoreEngine::default();
        let participants = vec![
            participant("Low quota", Some(4), vec![day(1, 8)]),
            participant("Default quota", None, vec![day(1, 8)]),
        ];

        let board = build_leaderboard(&engine, &participants, None, RankBy::Total, 16);
        assert_eq!(board[0].name, "Default quota");
        assert_eq!(board[0].total_score, 80.0);
        // 4 rounds at 10 points, 4 at the flat rate.
        assert_eq!(board[1].total_score, 44.0);
    }

    #[test]
    fn test_range_filter_and_average_ranking() {
        let engine = ScoreEngine::default();
        let participants = vec![
            participant("Steady", None, vec![day(1, 6), day(2, 6), day(3, 6)]),
            participant("Burst", None, vec![day(2, 10), day(20, 16)]),
            participant("Absent", None, vec![]),
        ];
        let range = DateRange::new(date(1), date(10)).unwrap();

        let by_total = build_leaderboard(&engine, &participants, Some(range), RankBy::Total, 16);
        assert_eq!(by_total[0].name, "Steady");
        assert_eq!(by_total[0].total_score, 180.0);
        assert_eq!(by_total[1].name, "Burst");
        assert_eq!(by_total[1].days_logged, 1);

        let by_average = build_leaderboard(&engine, &participants, Some(range), RankBy::Average, 16);
        assert_eq!(by_average[0].name, "Burst");
        assert_eq!(by_average[0].average_score, 100.0);

        let absent = by_average.iter().find(|e| e.name == "Absent").unwrap();
        assert_eq!(absent.days_logged, 0);
        assert_eq!(absent.total_score, 0.0);
        assert_eq!(absent.average_score, 0.0);
        assert_eq!(absent.rank, 3);
    }

    #[test]
    fn test_empty_leaderboard() {
        let engine = ScoreEngine::default();
        assert!(build_leaderboard(&engine, &[], None, RankBy::Total, 16).is_empty());
    }
}
