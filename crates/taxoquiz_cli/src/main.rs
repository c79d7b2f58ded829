//! CLI entry point.
//!
//! # Responsibility
//! - Open a catalog database and print the next question of a session.
//! - Keep output deterministic enough for quick local sanity checks.
//!
//! Usage: `taxoquiz_cli <db-path> [session-id]`. Set `TAXOQUIZ_LOG_DIR`
//! to write rolling logs.

use log::info;
use std::env;
use std::error::Error;
use taxoquiz_core::db::open_db;
use taxoquiz_core::{
    core_version, default_log_level, init_logging, QuizConfig, QuizService, QuizSession,
    SessionId, SqliteScoreStore, SqliteTaxonRepository,
};

const LOG_DIR_ENV: &str = "TAXOQUIZ_LOG_DIR";

fn main() -> Result<(), Box<dyn Error>> {
    let mut args = env::args().skip(1);
    let Some(db_path) = args.next() else {
        eprintln!("usage: taxoquiz_cli <db-path> [session-id]");
        std::process::exit(2);
    };
    let session_id = match args.next() {
        Some(raw) => SessionId::new(raw)?,
        None => SessionId::generate(),
    };

    if let Ok(log_dir) = env::var(LOG_DIR_ENV) {
        init_logging(default_log_level(), &log_dir)?;
    }
    info!(
        "event=cli_start module=cli status=ok version={} session={}",
        core_version(),
        session_id.short()
    );

    let conn = open_db(&db_path)?;
    let service = QuizService::try_new(
        SqliteTaxonRepository::try_new(&conn)?,
        SqliteScoreStore::try_new(&conn)?,
        QuizConfig::default(),
    )?;
    let mut session = QuizSession::new(session_id);

    println!("taxoquiz_core version={}", core_version());
    println!("session={}", session.session_id);
    match service.next_question(&mut session)? {
        Some(question) => {
            println!("identify: {}", question.taxon.scientific_name());
            println!("award={}", question.score_to_award);
            for (index, name) in question.propositions.iter().enumerate() {
                println!("  {}. {name}", index + 1);
            }
        }
        None => println!("no taxa available"),
    }
    Ok(())
}
