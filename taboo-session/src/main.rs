use anyhow::Result;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use taboo_core::{GameStore, RandomSource, SeededRandom, SystemClock, ThreadRandom};
use taboo_persistence::{ContentRepository, SnapshotRepository, connect_and_migrate};
use taboo_session::{
    Config, ContentProvider, DirectoryContentProvider, GameSession, RemoteContentProvider,
    console::run_console,
};
use taboo_types::GameState;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    info!("Starting taboo session...");
    let config = Config::from_env()?;

    let db = connect_and_migrate(&config.database_url).await?;
    let snapshots = SnapshotRepository::new(db.clone());

    let state = match snapshots.load_snapshot(&config.session_key).await {
        Ok(Some(state)) => {
            info!(
                "Resuming session '{}' in status {:?}",
                config.session_key, state.status
            );
            state
        }
        Ok(None) => GameState::default(),
        Err(e) => {
            warn!("Discarding unreadable snapshot: {:#}", e);
            GameState::default()
        }
    };

    let rng: Box<dyn RandomSource> = match config.rng_seed {
        Some(seed) => {
            info!("Using seeded random source ({})", seed);
            Box::new(SeededRandom::new(seed))
        }
        None => Box::new(ThreadRandom),
    };
    let store = GameStore::with_state(state, rng, Box::new(SystemClock));
    let session = GameSession::with_persistence(
        store,
        config.tick_interval,
        snapshots,
        config.session_key.clone(),
    );

    let provider: Box<dyn ContentProvider> = match &config.content_base_url {
        Some(url) => {
            info!("Loading content from {}", url);
            Box::new(RemoteContentProvider::new(
                url.clone(),
                ContentRepository::new(db),
                config.content_cache_days,
            ))
        }
        None => {
            info!(
                "Loading content from directory: {}",
                config.content_directory.display()
            );
            Box::new(DirectoryContentProvider::new(&config.content_directory))
        }
    };
    if let Err(e) = session.load_content(provider.as_ref()).await {
        warn!("Content could not be installed: {}", e);
    }
    session.resume().await;

    tokio::select! {
        result = run_console(&session) => result?,
        _ = signal::ctrl_c() => info!("Received Ctrl+C, shutting down gracefully..."),
    }

    session.shutdown().await;
    info!("Session closed.");
    Ok(())
}
