mod command;
mod event;
pub mod user;

pub use command::*;
pub use event::*;

#[derive(Clone)]
pub struct State {
    pub read_db: sqlx::SqlitePool,
    pub write_db: sqlx::SqlitePool,
}

impl State {
    /// Single pool for both reads and writes (CLI commands and tests).
    pub fn single(pool: sqlx::SqlitePool) -> Self {
        Self {
            read_db: pool.clone(),
            write_db: pool,
        }
    }
}
