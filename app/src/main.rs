use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use app::adapter::{FileConfigStore, JsonlFeed, LoggingCommandSink};
use app::session::Session;
use app::settings::Settings;

#[tokio::main(flavor = "multi_thread")]
pub async fn main() {
    let settings = Settings::new().expect("Error reading configuration");

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(settings.logging.default_level.clone()));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let feed = JsonlFeed::new(settings.feed.history_file.clone());
    let sink = LoggingCommandSink;
    let config_store = FileConfigStore::new(settings.session.state_file.clone());

    let mut session = Session::new(settings.device.id.clone(), feed, sink, config_store);

    let cancel = CancellationToken::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("Shutting down");
                cancel.cancel();
            }
        });
    }

    tracing::info!("Starting monitor session for {}", settings.device.id);
    session.run(cancel).await;
}
