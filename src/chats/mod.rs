mod chat;
mod directory;
mod msg;

use axum::{Router, extract::FromRef, routing::get};
use sqlx::SqlitePool;

use crate::AppResult;

pub use directory::UserDirectory;

#[derive(Clone, FromRef)]
pub struct ChatState {
    pub db_pool: SqlitePool,
    pub users: UserDirectory,
}

pub fn router() -> Router<ChatState> {
    Router::new()
        .route("/chat", get(chat::list_chats).post(chat::create_chat))
        .route(
            "/chat/{id}",
            get(chat::get_chat)
                .put(chat::update_chat)
                .delete(chat::delete_chat),
        )
        .route("/chat/{id}/message", get(msg::list_msgs).post(msg::create_msg))
        .route(
            "/chat/{id}/message/{message_id}",
            get(msg::get_msg)
                .put(msg::update_msg)
                .delete(msg::delete_msg),
        )
}

/// The complete chat service.
pub fn service(state: ChatState) -> Router {
    crate::finish(router().with_state(state))
}

/// 404s unless chat `id` exists.
pub(crate) async fn ensure_chat(db_pool: &SqlitePool, id: i64) -> AppResult<()> {
    sqlx::query("SELECT 1 FROM chats WHERE id=?")
        .bind(id)
        .fetch_optional(db_pool)
        .await?
        .map(|_| ())
        .ok_or(crate::AppError::NotFound("Chat"))
}
