use std::str::FromStr;

use serde::Serialize;
use sqlx::{
    FromRow, SqlitePool,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
};

use crate::AppResult;

pub const MAX_CONNECTIONS: u32 = 16;

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    // unique: id
    // unique: username
    // unique: email
}

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct Message {
    pub id: i64,
    pub text: String,
    pub chat_id: i64,
}

/// A `chats` row as stored; `participants` is a JSON array of user ids.
#[derive(Debug, Clone, FromRow)]
pub struct ChatRow {
    pub id: i64,
    pub name: String,
    pub participants: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Chat {
    pub id: i64,
    pub name: String,
    pub participants: Vec<i64>,
    pub messages: Vec<Message>,
}

impl ChatRow {
    pub fn into_chat(self, messages: Vec<Message>) -> AppResult<Chat> {
        Ok(Chat {
            id: self.id,
            name: self.name,
            participants: serde_json::from_str(&self.participants)?,
            messages,
        })
    }
}

/// Opens a pool with foreign keys enforced and applies `schema` to it.
pub async fn open(database_url: &str, max_connections: u32, schema: &str) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true);

    let db_pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await?;

    sqlx::raw_sql(schema)
        .execute(&db_pool)
        .await?;

    Ok(db_pool)
}

/// A private in-memory database. One connection, since every SQLite
/// `:memory:` connection is its own database.
pub async fn open_in_memory(schema: &str) -> Result<SqlitePool, sqlx::Error> {
    open("sqlite::memory:", 1, schema).await
}
