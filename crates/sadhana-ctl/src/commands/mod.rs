use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use tracing::debug;

pub mod insights;
pub mod leaderboard;
pub mod rules;
pub mod score;

/// Read a JSON payload from `path`, or from stdin when `path` is `-`.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let reader: Box<dyn Read> = if path == Path::new("-") {
        debug!("Reading JSON payload from stdin");
        Box::new(io::stdin().lock())
    } else {
        debug!("Reading JSON payload from {:?}", path);
        let file = File::open(path).with_context(|| format!("Failed to open {:?}", path))?;
        Box::new(file)
    };

    serde_json::from_reader(BufReader::new(reader))
        .with_context(|| format!("Failed to parse JSON from {:?}", path))
}

/// Format a point value without a trailing `.0` on whole numbers.
pub fn points(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        format!("{:.1}", value)
    }
}
