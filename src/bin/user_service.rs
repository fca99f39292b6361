use anyhow::Context;
use chatusers::{config::UserServiceConfig, db, res, users};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    chatusers::init_tracing();

    let config = UserServiceConfig::from_env()?;
    let db_pool = db::open(&config.database_url, db::MAX_CONNECTIONS, res::USERS_SCHEMA)
        .await
        .with_context(|| format!("opening {}", config.database_url))?;

    chatusers::serve(&config.bind_addr, users::service(db_pool)).await
}
