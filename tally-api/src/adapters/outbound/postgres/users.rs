use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::{
    models::{Email, UserId, UserProfile},
    ports::outbound::UserRepository,
    ProfileError,
};

#[derive(sqlx::FromRow)]
struct UserRow {
    id: i32,
    username: String,
    email: String,
}

impl TryFrom<UserRow> for UserProfile {
    type Error = ProfileError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id.into(),
            username: row.username,
            email: Email::try_from(row.email)?,
        })
    }
}

#[derive(Clone)]
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn upsert(
        &self,
        id: UserId,
        username: &str,
        email: &Email,
    ) -> Result<UserProfile, ProfileError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (id, username, email)
            VALUES ($1, $2, $3)
            ON CONFLICT (id) DO UPDATE SET username = EXCLUDED.username, email = EXCLUDED.email
            RETURNING id, username, email
            "#,
        )
        .bind(id.as_i32())
        .bind(username)
        .bind(&**email)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e.as_database_error() {
            Some(db) if db.is_unique_violation() => {
                ProfileError::Invalid("Email is already in use".to_string())
            }
            _ => ProfileError::storage(e.to_string()),
        })?;

        row.try_into()
    }

    async fn get(&self, id: UserId) -> Result<Option<UserProfile>, ProfileError> {
        let row = sqlx::query_as::<_, UserRow>("SELECT id, username, email FROM users WHERE id = $1")
            .bind(id.as_i32())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| ProfileError::storage(e.to_string()))?;

        row.map(UserProfile::try_from).transpose()
    }
}
