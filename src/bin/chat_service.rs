use anyhow::Context;
use chatusers::{
    chats::{self, ChatState, UserDirectory},
    config::ChatServiceConfig,
    db, res,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    chatusers::init_tracing();

    let config = ChatServiceConfig::from_env()?;
    let db_pool = db::open(&config.database_url, db::MAX_CONNECTIONS, res::CHATS_SCHEMA)
        .await
        .with_context(|| format!("opening {}", config.database_url))?;
    let users = UserDirectory::new(&config.user_service_url, config.upstream_timeout)?;

    tracing::info!(user_service = %config.user_service_url, "validating participants against user service");

    chatusers::serve(&config.bind_addr, chats::service(ChatState { db_pool, users })).await
}
