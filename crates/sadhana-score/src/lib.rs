//! Sadhana scoring.
//!
//! Converts a devotee's daily activity log into points per practice category
//! and aggregates those points into monthly insights and leaderboards. All
//! functions are pure: they take plain data and a rule table and never touch
//! storage or the network.
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`engine`] | Per-day category scoring and the daily total |
//! | [`rules`] | Immutable, TOML-loadable point tables |
//! | [`insights`] | Monthly totals, averages, best day and streaks |
//! | [`leaderboard`] | Participant ranking over a date range |

pub mod engine;
pub mod insights;
pub mod leaderboard;
pub mod rules;

pub use engine::{calculate_score, ScoreEngine};
pub use insights::{monthly_insights, MonthlyInsights};
pub use leaderboard::{build_leaderboard, LeaderboardEntry, RankBy};
pub use rules::ScoringRules;
