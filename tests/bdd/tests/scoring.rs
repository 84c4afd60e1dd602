use chrono::NaiveDate;
use cucumber::{given, then, when, World};
use sadhana_bdd::ScoringWorld;
use sadhana_common::{AssociationLog, BookReadingLog, ChantingLog};

#[given("the standard scoring rules")]
async fn standard_rules(world: &mut ScoringWorld) {
    world.engine = sadhana_score::ScoreEngine::default();
}

#[given(regex = r"^a sadhana log for (\d{4}-\d{2}-\d{2})$")]
async fn log_for_date(world: &mut ScoringWorld, date: NaiveDate) {
    world.log = sadhana_common::ActivityLog::new(date);
}

#[given(regex = r"^a daily target of (\d+) rounds?$")]
async fn daily_target(world: &mut ScoringWorld, rounds: u32) {
    world.target_rounds = rounds;
}

#[given(regex = r#"^(-?\d+) rounds? chanted in the "([^"]+)" slot$"#)]
async fn rounds_chanted(world: &mut ScoringWorld, rounds: i64, slot: String) {
    world.log.chanting_logs.push(ChantingLog { slot: ScoringWorld::slot(&slot), rounds });
}

#[given(regex = r#"^(-?\d+) minutes of reading "([^"]+)"$"#)]
async fn reading(world: &mut ScoringWorld, minutes: i64, book: String) {
    world.log.book_reading_logs.push(BookReadingLog { name: book, reading_time: minutes });
}

#[given(regex = r#"^(-?\d+) minutes of association in "([^"]+)"$"#)]
async fn association(world: &mut ScoringWorld, minutes: i64, kind: String) {
    world.log.association_logs.push(AssociationLog { kind, duration: minutes });
}

#[given(regex = r"^(-?\d+) minutes of exercise$")]
async fn exercise(world: &mut ScoringWorld, minutes: i64) {
    world.log.exercise_time = minutes;
}

#[given("all five regulative principles were followed")]
async fn all_regulations(world: &mut ScoringWorld) {
    world.log.no_meat = true;
    world.log.no_intoxication = true;
    world.log.no_illicit_sex = true;
    world.log.no_gambling = true;
    world.log.only_prasadam = true;
}

#[given("only prasadam was eaten")]
async fn only_prasadam(world: &mut ScoringWorld) {
    world.log.only_prasadam = true;
}

#[given(regex = r#"^the "([^"]+)" arati was attended$"#)]
async fn arati_attended(world: &mut ScoringWorld, arati: String) {
    match arati.as_str() {
        "mangla" => world.log.mangla_attended = true,
        "narshima" => world.log.narshima_attended = true,
        "tulsi" => world.log.tulsi_arti_attended = true,
        "darshan" => world.log.darshan_arti_attended = true,
        "guru puja" => world.log.guru_puja_attended = true,
        "sandhya" => world.log.sandhya_arti_attended = true,
        other => panic!("Unknown arati in feature file: {}", other),
    }
}

#[given("japa sanga was attended")]
async fn japa_sanga(world: &mut ScoringWorld) {
    world.log.japa_sanga = Some(true);
}

#[given(regex = r#"^the devotee slept at "([^"]*)"$"#)]
async fn slept_at(world: &mut ScoringWorld, raw: String) {
    world.log.sleep_at = Some(raw);
}

#[given(regex = r#"^the devotee woke up at "([^"]*)"$"#)]
async fn woke_at(world: &mut ScoringWorld, raw: String) {
    world.log.wakeup_at = Some(raw);
}

#[when("the day is scored")]
async fn score_day(world: &mut ScoringWorld) {
    world.breakdown = Some(world.engine.calculate(&world.log, world.target_rounds));
}

#[then(regex = r"^the (\w+) score is (-?[\d.]+)$")]
async fn category_score(world: &mut ScoringWorld, category: String, expected: f64) {
    let actual = world.category(&category).unwrap_or_else(|| panic!("No score for '{}'", category));
    assert_eq!(actual, expected, "{} score", category);
}

#[then("the total equals the sum of the categories")]
async fn total_is_sum(world: &mut ScoringWorld) {
    let breakdown = world.breakdown.expect("day was scored");
    assert_eq!(breakdown.total_score, breakdown.category_sum());
}

#[tokio::main]
async fn main() {
    ScoringWorld::cucumber()
        .fail_on_skipped()
        .max_concurrent_scenarios(1)
        .run_and_exit("tests/features")
        .await;
}
