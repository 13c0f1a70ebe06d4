use sqlx::SqlitePool;

#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub session_ttl_days: i64,
}

impl AppState {
    pub fn new(pool: SqlitePool, session_ttl_days: i64) -> Self {
        Self {
            pool,
            session_ttl_days,
        }
    }
}
