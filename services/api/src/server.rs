use crate::cli::ServeArgs;
use crate::infra::{AppState, DatasetFileStore, UploadState};
use crate::routes::with_leaderboard_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use leaderboard::config::AppConfig;
use leaderboard::error::AppError;
use leaderboard::leaderboard::{InMemoryDatasetRepository, LeaderboardService};
use leaderboard::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::{info, warn};

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }
    if let Some(dataset) = args.dataset.take() {
        config.storage.dataset_path = Some(dataset);
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let repository = Arc::new(InMemoryDatasetRepository::default());
    let service = Arc::new(LeaderboardService::new(repository, config.ranking));

    let store = config
        .storage
        .dataset_path
        .as_ref()
        .map(|path| Arc::new(DatasetFileStore::new(path.clone())));
    if let Some(store) = store.as_deref() {
        match store.load() {
            Ok(Some((path, records))) => {
                let summary = service.upload(records, path.display().to_string())?;
                info!(
                    path = %path.display(),
                    records = summary.records,
                    "restored dataset from disk"
                );
            }
            Ok(None) => info!("no stored dataset yet; waiting for the first upload"),
            Err(err) => warn!(error = %err, "stored dataset could not be imported; starting empty"),
        }
    }

    let uploads = UploadState::new(service.clone(), store);

    let app = with_leaderboard_routes(service, config.storage.max_upload_bytes)
        .layer(Extension(uploads))
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        rookie_threshold = config.ranking.rookie_threshold,
        window_size = config.ranking.window_size,
        "sales leaderboard ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
