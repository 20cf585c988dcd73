use serde::Serialize;
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;

/// One logged chatbot exchange: the user's input and the bot's output.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Chat {
    pub id_chat: i32,
    pub id_user: i32,
    pub input_type: String,
    pub input_content: String,
    pub output_type: String,
    pub output_content: String,
    #[serde(with = "time::serde::rfc3339")]
    pub date: OffsetDateTime,
}

const CHAT_COLUMNS: &str =
    "id_chat, id_user, input_type, input_content, output_type, output_content, date";

pub async fn insert(
    db: &PgPool,
    id_user: i32,
    input_type: &str,
    input_content: &str,
    output_type: &str,
    output_content: &str,
) -> Result<Chat, sqlx::Error> {
    sqlx::query_as::<_, Chat>(&format!(
        r#"
        INSERT INTO chats (id_user, input_type, input_content, output_type, output_content)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING {CHAT_COLUMNS}
        "#
    ))
    .bind(id_user)
    .bind(input_type)
    .bind(input_content)
    .bind(output_type)
    .bind(output_content)
    .fetch_one(db)
    .await
}

pub async fn list_for_user(db: &PgPool, id_user: i32) -> Result<Vec<Chat>, sqlx::Error> {
    sqlx::query_as::<_, Chat>(&format!(
        "SELECT {CHAT_COLUMNS} FROM chats WHERE id_user = $1 ORDER BY date DESC, id_chat DESC"
    ))
    .bind(id_user)
    .fetch_all(db)
    .await
}
