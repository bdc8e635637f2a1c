//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `barky_core` linkage and that a database opens and migrates.
//! - Keep output deterministic for quick local sanity checks.
//!
//! Usage: `barky [DB_PATH]`. `BARKY_DB_PATH` is used when no argument is
//! given; without either, an in-memory database is probed. Setting
//! `BARKY_LOG_DIR` (absolute path) enables file logging.

use barky_core::db::{open_db, open_db_in_memory};
use barky_core::{
    core_version, default_log_level, init_logging, RepoResult, SqliteBookmarkRepository,
};
use std::process::ExitCode;

const DB_PATH_ENV: &str = "BARKY_DB_PATH";
const LOG_DIR_ENV: &str = "BARKY_LOG_DIR";

fn main() -> ExitCode {
    if let Ok(log_dir) = std::env::var(LOG_DIR_ENV) {
        if let Err(err) = init_logging(default_log_level().as_str(), log_dir) {
            eprintln!("barky: logging disabled: {err}");
        }
    }

    let db_path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var(DB_PATH_ENV).ok());

    println!("barky_core version={}", core_version());
    match probe(db_path.as_deref()) {
        Ok(count) => {
            println!(
                "barky_core db={} bookmarks={count}",
                db_path.as_deref().unwrap_or(":memory:")
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("barky: {err}");
            ExitCode::FAILURE
        }
    }
}

fn probe(db_path: Option<&str>) -> RepoResult<u64> {
    let conn = match db_path {
        Some(path) => open_db(path)?,
        None => open_db_in_memory()?,
    };
    let repo = SqliteBookmarkRepository::try_new(&conn)?;
    repo.count()
}
