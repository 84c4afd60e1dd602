use anyhow::Result;
use sadhana_score::ScoringRules;

/// Print the active rule table as TOML, or JSON when asked
pub fn show(rules: &ScoringRules, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(rules)?);
    } else {
        println!("# Scoring rules: {}", rules.version);
        println!(
            "# Daily ceiling without chanting: {} ({} with japa sanga)",
            rules.max_daily_score(false),
            rules.max_daily_score(true)
        );
        print!("{}", rules.to_toml_string()?);
    }
    Ok(())
}
