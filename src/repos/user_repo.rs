/*
 * Responsibility
 * - users / user_roles テーブル向け SQLx 操作 (読み取りのみ)
 * - パスワード照合は DB 側の crypt() に任せる (この crate ではハッシュ計算しない)
 *
 * Expected schema
 *   users      ("userId" uuid PK, "userName" text UNIQUE, "email" text, "passwordHash" text NOT NULL)
 *   user_roles ("userId" uuid REFERENCES users, "role" text)
 */
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::repos::error::RepoError;

#[derive(Debug, FromRow)]
pub struct UserRow {
    #[sqlx(rename = "userId")]
    pub id: Uuid,
    #[sqlx(rename = "userName")]
    pub user_name: String,
    pub email: String,
}

/// `false` for an unknown user as well as for a wrong password.
pub async fn verify_password(
    db: &PgPool,
    user_name: &str,
    password: &str,
) -> Result<bool, RepoError> {
    let matched = sqlx::query_scalar::<_, bool>(
        r#"
        SELECT COALESCE("passwordHash" = crypt($2, "passwordHash"), false)
        FROM users
        WHERE "userName" = $1
        "#,
    )
    .bind(user_name)
    .bind(password)
    .fetch_optional(db)
    .await?;

    Ok(matched.unwrap_or(false))
}

pub async fn roles_for(db: &PgPool, user_name: &str) -> Result<Vec<String>, RepoError> {
    let roles = sqlx::query_scalar::<_, String>(
        r#"
        SELECT r."role"
        FROM user_roles r
        JOIN users u ON u."userId" = r."userId"
        WHERE u."userName" = $1
        ORDER BY r."role"
        "#,
    )
    .bind(user_name)
    .fetch_all(db)
    .await?;

    Ok(roles)
}

pub async fn get_by_user_name(db: &PgPool, user_name: &str) -> Result<Option<UserRow>, RepoError> {
    let row = sqlx::query_as::<_, UserRow>(
        r#"
        SELECT "userId", "userName", "email"
        FROM users
        WHERE "userName" = $1
        "#,
    )
    .bind(user_name)
    .fetch_optional(db)
    .await?;

    Ok(row)
}

pub async fn ping(db: &PgPool) -> Result<(), RepoError> {
    sqlx::query("SELECT 1").execute(db).await?;
    Ok(())
}
