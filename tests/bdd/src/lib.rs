// BDD test support library for sadhana scoring
//
// Holds the cucumber world shared by the scoring feature files. Step
// definitions live next to the runner in tests/scoring.rs.

pub mod world;

pub use world::ScoringWorld;
