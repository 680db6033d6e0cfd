use std::sync::Arc;

use tokio::sync::broadcast;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pressing_notify::channel::transport;
use pressing_notify::{ApiClient, ChannelEvent, Config, NotificationSync, PushChannel};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenv::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,pressing_notify=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();

    let (channel, transport_handle) = PushChannel::new();
    tokio::spawn(transport::run(
        config.ws_url.clone(),
        config.api_token.clone(),
        transport_handle,
    ));

    let api = Arc::new(ApiClient::new(&config.api_base_url, &config.api_token));
    let sync = NotificationSync::new(api, channel.clone(), config.principal);
    sync.start();

    tracing::info!(
        "tailing inbox for user {} ({})",
        config.principal.user_id,
        config.principal.role
    );

    let mut events = channel.subscribe();
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            event = events.recv() => match event {
                Ok(ChannelEvent::Notification(n)) => {
                    tracing::info!(
                        "[{}] {}: {} (unread: {})",
                        n.priority,
                        n.title,
                        n.message,
                        sync.unread_count()
                    );
                }
                Ok(ChannelEvent::Connected(up)) => {
                    tracing::info!("push channel {}", if up { "connected" } else { "disconnected" });
                }
                Err(broadcast::error::RecvError::Lagged(_)) => continue,
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    }

    sync.stop();
    Ok(())
}
