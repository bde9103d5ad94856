//! PostgreSQL adapters for the outbound storage ports.

mod board;
mod finance;
mod habits;
mod users;

use std::str::FromStr;

use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::ports::outbound::HealthProbe;

pub use board::PostgresBoardStore;
pub use finance::PostgresFinanceStore;
pub use habits::PostgresHabitRepository;
pub use users::PostgresUserRepository;

/// Parse an enum stored as text, naming the column kind on failure.
fn decode<T: FromStr>(value: &str, kind: &str) -> Result<T, String> {
    T::from_str(value).map_err(|_| format!("unknown {kind} '{value}' in database"))
}

/// Round-trips a trivial query through the pool.
#[derive(Clone)]
pub struct PostgresHealthProbe {
    pool: PgPool,
}

impl PostgresHealthProbe {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl HealthProbe for PostgresHealthProbe {
    async fn ping(&self) -> Result<(), String> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map(|_| ())
            .map_err(|e| e.to_string())
    }
}
