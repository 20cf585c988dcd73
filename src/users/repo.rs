use sqlx::{FromRow, PgPool};
use time::Date;

/// User record in the database. The `password` column holds the Argon2 hash
/// and is never serialized; responses go through `PublicUser`.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id_user: i32,
    pub username: String,
    pub email: String,
    pub password: String,
    pub role: String,
    pub birthdate: Option<Date>,
    pub country: Option<String>,
}

const USER_COLUMNS: &str = "id_user, username, email, password, role, birthdate, country";

pub async fn find_by_email(db: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!(
        "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
    ))
    .bind(email)
    .fetch_optional(db)
    .await
}

pub async fn find_by_id(db: &PgPool, id: i32) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!(
        "SELECT {USER_COLUMNS} FROM users WHERE id_user = $1"
    ))
    .bind(id)
    .fetch_optional(db)
    .await
}

pub async fn list_all(db: &PgPool) -> Result<Vec<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!(
        "SELECT {USER_COLUMNS} FROM users ORDER BY id_user"
    ))
    .fetch_all(db)
    .await
}

pub async fn insert(
    db: &PgPool,
    username: &str,
    email: &str,
    password_hash: &str,
    role: &str,
    birthdate: Option<Date>,
    country: Option<&str>,
) -> Result<User, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!(
        r#"
        INSERT INTO users (username, email, password, role, birthdate, country)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING {USER_COLUMNS}
        "#
    ))
    .bind(username)
    .bind(email)
    .bind(password_hash)
    .bind(role)
    .bind(birthdate)
    .bind(country)
    .fetch_one(db)
    .await
}

/// Partial-field merge; absent fields keep their current value.
/// `password_hash` must already be hashed by the caller.
pub async fn update(
    db: &PgPool,
    id: i32,
    username: Option<&str>,
    email: Option<&str>,
    password_hash: Option<&str>,
    role: Option<&str>,
    birthdate: Option<Date>,
    country: Option<&str>,
) -> Result<User, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!(
        r#"
        UPDATE users
        SET username  = COALESCE($2, username),
            email     = COALESCE($3, email),
            password  = COALESCE($4, password),
            role      = COALESCE($5, role),
            birthdate = COALESCE($6, birthdate),
            country   = COALESCE($7, country)
        WHERE id_user = $1
        RETURNING {USER_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(username)
    .bind(email)
    .bind(password_hash)
    .bind(role)
    .bind(birthdate)
    .bind(country)
    .fetch_one(db)
    .await
}

pub async fn delete(db: &PgPool, id: i32) -> Result<u64, sqlx::Error> {
    let res = sqlx::query("DELETE FROM users WHERE id_user = $1")
        .bind(id)
        .execute(db)
        .await?;
    Ok(res.rows_affected())
}
