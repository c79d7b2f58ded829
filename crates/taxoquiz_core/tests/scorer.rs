use rusqlite::Connection;
use taxoquiz_core::db::open_db_in_memory;
use taxoquiz_core::{
    AnswerOutcome, ConfigError, NewTaxon, QuizConfig, ScoreStore, Scorer, SessionId,
    SqliteScoreStore, SqliteTaxonRepository, Taxon, TaxonLevel,
};

struct Fixture {
    conn: Connection,
    lion: Taxon,
    tiger: Taxon,
}

fn fixture() -> Fixture {
    let conn = open_db_in_memory().unwrap();
    let (lion, tiger) = {
        let repo = SqliteTaxonRepository::try_new(&conn).unwrap();
        let lion = repo
            .insert_taxon(
                &NewTaxon::new("Lion")
                    .with(TaxonLevel::Genus, "Panthera")
                    .with(TaxonLevel::Species, "leo"),
            )
            .unwrap();
        let tiger = repo
            .insert_taxon(
                &NewTaxon::new("Tiger")
                    .with(TaxonLevel::Genus, "Panthera")
                    .with(TaxonLevel::Species, "tigris"),
            )
            .unwrap();
        (lion, tiger)
    };
    Fixture { conn, lion, tiger }
}

fn scorer(conn: &Connection) -> Scorer<SqliteTaxonRepository<'_>, SqliteScoreStore<'_>> {
    Scorer::try_new(
        SqliteTaxonRepository::try_new(conn).unwrap(),
        SqliteScoreStore::try_new(conn).unwrap(),
        QuizConfig::default(),
    )
    .unwrap()
}

fn score_of(conn: &Connection, session: &SessionId, taxon: &Taxon) -> Option<i64> {
    SqliteScoreStore::try_new(conn)
        .unwrap()
        .get(session, taxon.id)
        .unwrap()
        .map(|record| record.score)
}

fn learner() -> SessionId {
    SessionId::new("learner").unwrap()
}

#[test]
fn blank_answer_records_nothing() {
    let fx = fixture();
    let scorer = scorer(&fx.conn);

    let outcome = scorer.apply_answer(&learner(), &fx.lion, "   ", 10).unwrap();
    assert_eq!(outcome, AnswerOutcome::NoAnswer);
    assert!(SqliteScoreStore::try_new(&fx.conn)
        .unwrap()
        .list_for_session(&learner())
        .unwrap()
        .is_empty());
}

#[test]
fn correct_answers_accumulate() {
    let fx = fixture();
    let scorer = scorer(&fx.conn);

    let first = scorer.apply_answer(&learner(), &fx.lion, "Lion", 10).unwrap();
    assert_eq!(first, AnswerOutcome::Correct { score: 10 });
    assert_eq!(score_of(&fx.conn, &learner(), &fx.lion), Some(10));

    let second = scorer.apply_answer(&learner(), &fx.lion, "Lion", 3).unwrap();
    assert_eq!(second, AnswerOutcome::Correct { score: 13 });
    assert_eq!(score_of(&fx.conn, &learner(), &fx.lion), Some(13));
}

#[test]
fn matching_ignores_case_and_surrounding_space() {
    let fx = fixture();
    let scorer = scorer(&fx.conn);

    let outcome = scorer
        .apply_answer(&learner(), &fx.lion, "  lION \n", 8)
        .unwrap();
    assert_eq!(outcome, AnswerOutcome::Correct { score: 8 });
}

#[test]
fn wrong_guess_penalizes_the_confused_taxon_only() {
    let fx = fixture();
    let scorer = scorer(&fx.conn);

    let outcome = scorer.apply_answer(&learner(), &fx.lion, " Tiger ", 10).unwrap();
    assert_eq!(
        outcome,
        AnswerOutcome::Incorrect {
            penalized: Some(fx.tiger.id)
        }
    );
    assert_eq!(score_of(&fx.conn, &learner(), &fx.tiger), Some(-1));
    assert_eq!(score_of(&fx.conn, &learner(), &fx.lion), None);
}

#[test]
fn repeated_wrong_guesses_stop_at_the_floor() {
    let fx = fixture();
    let scorer = scorer(&fx.conn);

    for _ in 0..5 {
        scorer.apply_answer(&learner(), &fx.lion, "Tiger", 10).unwrap();
        assert_eq!(score_of(&fx.conn, &learner(), &fx.tiger), Some(-1));
    }
}

#[test]
fn penalty_walks_a_positive_score_down_to_the_floor() {
    let fx = fixture();
    let scorer = scorer(&fx.conn);
    scorer.apply_answer(&learner(), &fx.tiger, "Tiger", 12).unwrap();

    let mut observed = Vec::new();
    for _ in 0..4 {
        scorer.apply_answer(&learner(), &fx.lion, "Tiger", 10).unwrap();
        observed.push(score_of(&fx.conn, &learner(), &fx.tiger).unwrap());
    }
    assert_eq!(observed, vec![7, 2, -1, -1]);
}

#[test]
fn unknown_guess_is_ignored() {
    let fx = fixture();
    let scorer = scorer(&fx.conn);

    let outcome = scorer.apply_answer(&learner(), &fx.lion, "Jaguar", 10).unwrap();
    assert_eq!(outcome, AnswerOutcome::Incorrect { penalized: None });

    // Guessed-name lookup keeps case, so a lowercase name is not tracked.
    let outcome = scorer.apply_answer(&learner(), &fx.lion, "tiger", 10).unwrap();
    assert_eq!(outcome, AnswerOutcome::Incorrect { penalized: None });

    assert!(SqliteScoreStore::try_new(&fx.conn)
        .unwrap()
        .list_for_session(&learner())
        .unwrap()
        .is_empty());
}

#[test]
fn penalty_and_floor_come_from_config() {
    let fx = fixture();
    let config = QuizConfig {
        wrong_guess_penalty: 2,
        score_floor: -3,
        ..QuizConfig::default()
    };
    let scorer = Scorer::try_new(
        SqliteTaxonRepository::try_new(&fx.conn).unwrap(),
        SqliteScoreStore::try_new(&fx.conn).unwrap(),
        config,
    )
    .unwrap();

    let mut observed = Vec::new();
    for _ in 0..3 {
        scorer.apply_answer(&learner(), &fx.lion, "Tiger", 10).unwrap();
        observed.push(score_of(&fx.conn, &learner(), &fx.tiger).unwrap());
    }
    assert_eq!(observed, vec![-3, -3, -3]);
}

#[test]
fn outcome_serializes_with_a_tag() {
    let json = serde_json::to_value(AnswerOutcome::Correct { score: 4 }).unwrap();
    assert_eq!(json, serde_json::json!({ "outcome": "correct", "score": 4 }));

    let json = serde_json::to_value(AnswerOutcome::NoAnswer).unwrap();
    assert_eq!(json, serde_json::json!({ "outcome": "no_answer" }));
}

#[test]
fn negative_penalty_is_rejected() {
    let fx = fixture();
    let config = QuizConfig {
        wrong_guess_penalty: -5,
        ..QuizConfig::default()
    };
    let rejected = Scorer::try_new(
        SqliteTaxonRepository::try_new(&fx.conn).unwrap(),
        SqliteScoreStore::try_new(&fx.conn).unwrap(),
        config,
    )
    .err();

    assert_eq!(
        rejected,
        Some(ConfigError::NegativeValue {
            field: "wrong_guess_penalty",
            value: -5
        })
    );
}
