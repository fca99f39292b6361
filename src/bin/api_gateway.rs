use chatusers::{
    config::GatewayConfig,
    gateway::{self, GatewayState},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    chatusers::init_tracing();

    let config = GatewayConfig::from_env()?;
    tracing::info!(
        user_service = %config.user_service_url,
        chat_service = %config.chat_service_url,
        "gateway upstreams"
    );

    let state = GatewayState::from_config(&config)?;
    chatusers::serve(&config.bind_addr, gateway::service(state)).await
}
