use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::sync::mpsc;

use montage::application::ports::PushGateway;
use montage::application::services::{
    ApprovalProcessor, CompletionEngine, JobCompletionGate, NotificationWorker, Notifier,
};
use montage::infrastructure::channels::{HttpPushGateway, NoopPushGateway, RealtimeHub};
use montage::infrastructure::observability::{TracingConfig, init_tracing};
use montage::infrastructure::persistence::{
    PgNotificationStore, PgProgressStore, PgUserDirectory, create_pool,
};
use montage::infrastructure::storage::LocalImageStore;
use montage::presentation::{AppState, Settings, create_router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::from_env().map_err(anyhow::Error::msg)?;

    init_tracing(TracingConfig::default(), settings.server.port);

    let pool = create_pool(&settings.database.url, settings.database.max_connections).await?;
    sqlx::migrate!().run(&pool).await?;

    let progress_store = Arc::new(PgProgressStore::new(pool.clone()));
    let notification_store = Arc::new(PgNotificationStore::new(pool.clone()));
    let directory = Arc::new(PgUserDirectory::new(pool.clone()));

    let images = Arc::new(
        LocalImageStore::new(
            PathBuf::from(&settings.storage.signature_dir),
            settings.storage.public_base_url.clone(),
        )
        .map_err(|e| anyhow::anyhow!("signature store init failed: {e}"))?,
    );

    let hub = Arc::new(RealtimeHub::new(settings.notifications.realtime_capacity));

    let push: Arc<dyn PushGateway> = match &settings.push.gateway_url {
        Some(url) => Arc::new(
            HttpPushGateway::new(url.clone(), settings.push.api_key.clone())
                .map_err(|e| anyhow::anyhow!("push gateway init failed: {e}"))?,
        ),
        None => {
            tracing::info!("No push gateway configured, mobile push disabled");
            Arc::new(NoopPushGateway)
        }
    };

    let (event_tx, event_rx) = mpsc::channel(settings.notifications.queue_capacity);
    let notifier = Notifier::new(event_tx);

    let worker = NotificationWorker::new(
        event_rx,
        progress_store.clone(),
        notification_store.clone(),
        directory.clone(),
        hub.clone(),
        push,
    );
    tokio::spawn(worker.run());

    let engine = Arc::new(CompletionEngine::new(
        progress_store.clone(),
        notifier.clone(),
    ));
    let gate = Arc::new(JobCompletionGate::new(
        progress_store.clone(),
        directory.clone(),
        images,
        notifier.clone(),
    ));
    let approvals = Arc::new(ApprovalProcessor::new(progress_store.clone(), notifier));

    let state = AppState {
        engine,
        gate,
        approvals,
        progress_store,
        notification_store,
        hub,
    };

    let router = create_router(state);

    let addr = SocketAddr::new(settings.server.host.parse()?, settings.server.port);
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
