use axum::{Json, debug_handler, extract::State, http::StatusCode};
use serde::Deserialize;
use serde_json::{Value, json};
use sqlx::SqlitePool;

use crate::{
    AppError, AppResult, IdPath, JsonBody,
    db::{Chat, ChatRow, Message},
};

use super::{ChatState, UserDirectory};

#[derive(Debug, Deserialize)]
pub(crate) struct ChatFields {
    name: String,
    participants: Vec<i64>,
}

async fn chat_msgs(db_pool: &SqlitePool, chat_id: i64) -> AppResult<Vec<Message>> {
    Ok(
        sqlx::query_as("SELECT id,text,chat_id FROM messages WHERE chat_id=? ORDER BY id")
            .bind(chat_id)
            .fetch_all(db_pool)
            .await?
    )
}

#[debug_handler(state = ChatState)]
pub(crate) async fn list_chats(
    State(db_pool): State<SqlitePool>,
) -> AppResult<Json<Value>> {
    let rows: Vec<ChatRow> = sqlx::query_as("SELECT id,name,participants FROM chats ORDER BY id")
        .fetch_all(&db_pool)
        .await?;

    let mut chats = Vec::with_capacity(rows.len());
    for row in rows {
        let messages = chat_msgs(&db_pool, row.id).await?;
        chats.push(row.into_chat(messages)?);
    }

    Ok(Json(json!({ "chats": chats })))
}

#[debug_handler(state = ChatState)]
pub(crate) async fn get_chat(
    IdPath(id): IdPath<i64>,
    State(db_pool): State<SqlitePool>,
) -> AppResult<Json<Value>> {
    let row: ChatRow = sqlx::query_as("SELECT id,name,participants FROM chats WHERE id=?")
        .bind(id)
        .fetch_optional(&db_pool)
        .await?
        .ok_or(AppError::NotFound("Chat"))?;

    let chat = row.into_chat(chat_msgs(&db_pool, id).await?)?;
    Ok(Json(json!({ "chat": chat })))
}

#[debug_handler(state = ChatState)]
pub(crate) async fn create_chat(
    State(db_pool): State<SqlitePool>,
    State(users): State<UserDirectory>,
    JsonBody(ChatFields { name, participants }): JsonBody<ChatFields>,
) -> AppResult<(StatusCode, Json<Value>)> {
    tracing::debug!(%name, ?participants, "creating chat");
    users.verify_participants(&participants).await?;

    let row: ChatRow = sqlx::query_as("INSERT INTO chats (name,participants) VALUES (?,?) RETURNING id,name,participants")
        .bind(&name)
        .bind(serde_json::to_string(&participants)?)
        .fetch_one(&db_pool)
        .await?;
    let chat: Chat = row.into_chat(Vec::new())?;

    tracing::info!(chat_id = chat.id, name = %chat.name, "chat created");

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Chat created successfully", "chat": chat })),
    ))
}

#[debug_handler(state = ChatState)]
pub(crate) async fn update_chat(
    IdPath(id): IdPath<i64>,
    State(db_pool): State<SqlitePool>,
    State(users): State<UserDirectory>,
    JsonBody(ChatFields { name, participants }): JsonBody<ChatFields>,
) -> AppResult<Json<Value>> {
    super::ensure_chat(&db_pool, id).await?;
    users.verify_participants(&participants).await?;

    let row: ChatRow = sqlx::query_as("UPDATE chats SET name=?,participants=? WHERE id=? RETURNING id,name,participants")
        .bind(&name)
        .bind(serde_json::to_string(&participants)?)
        .bind(id)
        .fetch_optional(&db_pool)
        .await?
        .ok_or(AppError::NotFound("Chat"))?;
    let chat = row.into_chat(chat_msgs(&db_pool, id).await?)?;

    tracing::info!(chat_id = id, "chat updated");

    Ok(Json(json!({ "message": "Chat updated successfully", "chat": chat })))
}

#[debug_handler(state = ChatState)]
pub(crate) async fn delete_chat(
    IdPath(id): IdPath<i64>,
    State(db_pool): State<SqlitePool>,
) -> AppResult<Json<Value>> {
    let deleted = sqlx::query("DELETE FROM chats WHERE id=?")
        .bind(id)
        .execute(&db_pool)
        .await?
        .rows_affected();
    if deleted == 0 {
        return Err(AppError::NotFound("Chat"));
    }

    tracing::info!(chat_id = id, "chat deleted");

    Ok(Json(json!({ "message": "Chat deleted successfully" })))
}
