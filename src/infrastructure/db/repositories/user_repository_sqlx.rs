use async_trait::async_trait;
use sqlx::Row;
use sqlx::postgres::PgRow;
use uuid::Uuid;

use crate::application::ports::user_repository::UserRepository;
use crate::domain::identity::{IdentityUser, NewUser};
use crate::infrastructure::db::PgPool;

const USER_COLUMNS: &str = "id, user_name, normalized_user_name, email, normalized_email, \
     email_confirmed, password_hash, security_stamp, created_at";

pub struct SqlxUserRepository {
    pub pool: PgPool,
}

impl SqlxUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn map_user(row: PgRow) -> IdentityUser {
    IdentityUser {
        id: row.get("id"),
        user_name: row.get("user_name"),
        normalized_user_name: row.get("normalized_user_name"),
        email: row.get("email"),
        normalized_email: row.get("normalized_email"),
        email_confirmed: row.get("email_confirmed"),
        password_hash: row.try_get("password_hash").ok().flatten(),
        security_stamp: row.get("security_stamp"),
        created_at: row.get("created_at"),
    }
}

#[async_trait]
impl UserRepository for SqlxUserRepository {
    async fn create_user(&self, user: &NewUser) -> anyhow::Result<Option<IdentityUser>> {
        let normalized = user.normalized_email();
        let sql = format!(
            r#"INSERT INTO users (id, user_name, normalized_user_name, email, normalized_email, password_hash, security_stamp)
               VALUES ($1, $2, $3, $2, $3, $4, $5)
               ON CONFLICT DO NOTHING
               RETURNING {USER_COLUMNS}"#
        );
        let row = sqlx::query(&sql)
            .bind(user.id)
            .bind(&user.email)
            .bind(&normalized)
            .bind(&user.password_hash)
            .bind(&user.security_stamp)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(map_user))
    }

    async fn find_by_normalized_email(
        &self,
        normalized_email: &str,
    ) -> anyhow::Result<Option<IdentityUser>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE normalized_email = $1");
        let row = sqlx::query(&sql)
            .bind(normalized_email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(map_user))
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<IdentityUser>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(map_user))
    }

    async fn confirm_email(&self, id: Uuid) -> anyhow::Result<bool> {
        let res = sqlx::query("UPDATE users SET email_confirmed = TRUE WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }

    async fn update_password(
        &self,
        id: Uuid,
        password_hash: &str,
        security_stamp: &str,
    ) -> anyhow::Result<Option<IdentityUser>> {
        let sql = format!(
            "UPDATE users SET password_hash = $2, security_stamp = $3 WHERE id = $1 RETURNING {USER_COLUMNS}"
        );
        let row = sqlx::query(&sql)
            .bind(id)
            .bind(password_hash)
            .bind(security_stamp)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(map_user))
    }
}
