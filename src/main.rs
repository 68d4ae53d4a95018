//! Callwatch binary.
//!
//! Reads presence events and confirmation answers as JSON lines on stdin and
//! drives the presence coordinator until stdin closes or Ctrl-C arrives.

use std::error::Error;
use std::sync::Arc;

use tokio::io::BufReader;
use tokio::sync::{mpsc, watch};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use callwatch::adapters::logging::{LoggingMuteActuator, LoggingNotifier, LoggingStatusPublisher};
use callwatch::adapters::memory::{
    InMemoryGroupSettingsRepository, InMemoryMemberStatsRepository, InMemorySessionStore,
};
use callwatch::adapters::postgres::{
    self, PostgresGroupSettingsRepository, PostgresMemberStatsRepository, PostgresSessionStore,
};
use callwatch::adapters::{ConfirmationBoard, JsonLinesSource, TokioClock};
use callwatch::application::{Collaborators, PresenceCoordinator};
use callwatch::config::{AppConfig, LoggingConfig};
use callwatch::ports::{GroupSettingsRepository, MemberStatsRepository, SessionStore};

const EVENT_BUFFER: usize = 256;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let config = AppConfig::load()?;
    config.validate()?;
    init_tracing(&config.logging);

    let defaults = config.watchdog.default_group_settings();
    let (session_store, member_stats, group_settings) = match &config.database {
        Some(database) => {
            let pool = postgres::connect(database).await?;
            info!("Using PostgreSQL storage");
            (
                Arc::new(PostgresSessionStore::new(pool.clone())) as Arc<dyn SessionStore>,
                Arc::new(PostgresMemberStatsRepository::new(pool.clone()))
                    as Arc<dyn MemberStatsRepository>,
                Arc::new(PostgresGroupSettingsRepository::new(pool, defaults))
                    as Arc<dyn GroupSettingsRepository>,
            )
        }
        None => {
            info!("No database configured; using in-memory storage");
            (
                Arc::new(InMemorySessionStore::new()) as Arc<dyn SessionStore>,
                Arc::new(InMemoryMemberStatsRepository::new()) as Arc<dyn MemberStatsRepository>,
                Arc::new(InMemoryGroupSettingsRepository::new(defaults))
                    as Arc<dyn GroupSettingsRepository>,
            )
        }
    };

    let board = Arc::new(ConfirmationBoard::new());
    let coordinator = PresenceCoordinator::new(
        Collaborators {
            session_store,
            notifier: Arc::new(LoggingNotifier::new(board.clone())),
            actuator: Arc::new(LoggingMuteActuator::new()),
            group_settings,
            member_stats,
            status: Arc::new(LoggingStatusPublisher::new()),
            clock: Arc::new(TokioClock::new()),
        },
        config.engine_config(),
    );

    let (event_tx, event_rx) = mpsc::channel(EVENT_BUFFER);
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let source = JsonLinesSource::new(event_tx, board);
    let reader = tokio::spawn(async move {
        match source.run(BufReader::new(tokio::io::stdin())).await {
            Ok(summary) => info!(
                events = summary.events,
                confirmations = summary.confirmations,
                rejected = summary.rejected,
                "Input closed"
            ),
            Err(e) => error!(error = %e, "Failed to read input"),
        }
    });

    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Ctrl-C received");
            let _ = shutdown_tx.send(true);
        }
    });

    coordinator.run(event_rx, shutdown_rx).await;
    reader.abort();

    Ok(())
}

/// `RUST_LOG` wins over the configured level when set.
fn init_tracing(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if logging.json {
        builder.json().init();
    } else {
        builder.init();
    }
}
