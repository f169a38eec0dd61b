use std::process::ExitCode;
use std::sync::Arc;

use common::pagination::Pagination;
use configs::AppConfig;
use dotenvy::dotenv;
use migration::MigratorTrait;
use service::notify;
use service::storage::SeaOrmStore;
use service::RecordService;
use tracing::{error, info, warn};
use uuid::Uuid;

/// Load configuration: `config.toml` (or `CONFIG_PATH`) first, the environment otherwise.
/// The file error is returned alongside so it can be logged once logging is up.
fn load_config() -> anyhow::Result<(AppConfig, Option<anyhow::Error>)> {
    match AppConfig::load_and_validate() {
        Ok(cfg) => Ok((cfg, None)),
        Err(file_err) => Ok((AppConfig::from_env()?, Some(file_err))),
    }
}

async fn run(cfg: AppConfig) -> anyhow::Result<()> {
    let db = models::db::connect_with_config(&cfg.database).await?;
    migration::Migrator::up(&db, None).await?;
    info!(service = "records", event = "migrated", "schema up to date");

    let store = Arc::new(SeaOrmStore::new(db));
    let notifier = notify::from_config(&cfg.notification)?;
    let records = RecordService::new(store, notifier, cfg.notification.policy);

    let years = records.years.get_all(Pagination::default()).await?;
    info!(
        service = "records",
        event = "ready",
        policy = ?cfg.notification.policy,
        webhook = cfg.notification.webhook_url.is_some(),
        years = years.len(),
        "record service ready"
    );

    tokio::signal::ctrl_c().await?;
    info!(service = "records", event = "shutdown_signal", "received Ctrl+C, shutting down");
    Ok(())
}

fn main() -> ExitCode {
    dotenv().ok();

    let (cfg, file_err) = match load_config() {
        Ok(loaded) => loaded,
        Err(e) => {
            common::utils::logging::init_logging_default();
            error!(service = "records", event = "config_invalid", error = %e, "no usable configuration");
            return ExitCode::FAILURE;
        }
    };
    common::utils::logging::init_logging(cfg.logging.json);
    if let Some(e) = file_err {
        warn!(service = "records", event = "config_fallback", error = %e, "config file unusable, using environment");
    }

    let service_id = Uuid::new_v4();
    let pid = std::process::id();
    let version = env!("CARGO_PKG_VERSION");

    std::panic::set_hook(Box::new(move |info| {
        error!(service = "records", event = "panic", %service_id, pid, message = %info, "unhandled panic occurred");
    }));

    let mut builder = tokio::runtime::Builder::new_multi_thread();
    builder.enable_all();
    if let Some(w) = cfg.runtime.worker_threads {
        builder.worker_threads(w);
    }
    let rt = match builder.build() {
        Ok(rt) => rt,
        Err(e) => {
            error!(service = "records", event = "runtime_build_failed", error = %e, "failed to build tokio runtime");
            return ExitCode::FAILURE;
        }
    };

    info!(service = "records", event = "start", %service_id, pid, version, "record service starting");

    match rt.block_on(run(cfg)) {
        Ok(()) => {
            info!(service = "records", event = "stop", %service_id, pid, "record service stopped");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(service = "records", event = "run_failed", error = %e, "record service failed");
            ExitCode::FAILURE
        }
    }
}
