//! Headless session host for the Pearl companion.
//!
//! Keeps one companion alive between runs: the state is restored from the
//! state file at startup, ticked on a fixed interval while the session is
//! open, saved periodically, and saved once more on shutdown.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `pearl-config.yaml`
//! 2. Initialize structured logging (tracing)
//! 3. Build the engine and restore the saved state (or start fresh)
//! 4. Catch up on the time elapsed since the last save
//! 5. Grant the daily reward
//! 6. Ask the chat collaborator for a greeting
//! 7. Run the ticker until Ctrl-C or the tick limit
//! 8. Save the final state

mod autosave;
mod error;

use std::path::Path;
use std::sync::Arc;

use pearl_chat::{ChatClient, ChatConfig, ChatError, ChatStats};
use pearl_core::config::{EngineConfig, LoggingConfig};
use pearl_core::persistence::{JsonFileStore, StateStore};
use pearl_core::runner::{SessionControl, run_ticker};
use pearl_core::{CompanionEngine, EngineBuilder};
use tokio::sync::Mutex;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::autosave::{AutosaveCallback, save_state};
use crate::error::HostError;

/// Configuration file looked up in the working directory.
const CONFIG_PATH: &str = "pearl-config.yaml";

/// Application entry point for the session host.
///
/// # Errors
///
/// Returns an error if configuration or logging cannot be set up. Storage
/// and chat failures during the session are logged, not returned.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Load configuration.
    let config = EngineConfig::load_or_default(Path::new(CONFIG_PATH)).map_err(HostError::from)?;

    // 2. Initialize structured logging.
    init_logging(&config.logging)?;
    info!(
        state_path = %config.session.state_path,
        tick_interval_ms = config.session.tick_interval_ms,
        autosave_every_ticks = config.session.autosave_every_ticks,
        max_ticks = config.session.max_ticks,
        seeded = config.session.seed.is_some(),
        "pearl-host starting"
    );

    // 3. Build the engine and restore the saved companion.
    let store: Arc<dyn StateStore> = Arc::new(JsonFileStore::new(&config.session.state_path));
    let mut engine = EngineBuilder::from_config(&config).build();
    let saved = store.load().unwrap_or_else(|e| {
        warn!(error = %e, "failed to read saved state, starting a fresh companion");
        None
    });
    let restored = engine.restore_or_default(saved.as_deref());

    // 4. Catch up on elapsed time.
    let catch_up = engine.tick();
    info!(
        restored,
        elapsed_minutes = catch_up.elapsed_minutes,
        mood = engine.state().mood.as_str(),
        bond_level = engine.state().bond_level,
        "companion loaded"
    );

    // 5. Daily reward.
    if let Some(reward) = engine.start_session() {
        info!(streak = reward.streak, reward = reward.reward, "daily reward");
    }
    save_state(&engine, store.as_ref());

    // 6. Greeting.
    let chat = chat_client(ChatConfig::from_env());
    let greeting = greet(&engine, &chat).await;
    info!(
        remote = chat.config().is_configured(),
        greeting = %greeting,
        "pearl says hello"
    );

    // 7. Run the session.
    let control = Arc::new(SessionControl::new(config.session.tick_interval_ms));
    spawn_interrupt_handler(Arc::clone(&control));

    let engine = Arc::new(Mutex::new(engine));
    let mut autosave =
        AutosaveCallback::new(Arc::clone(&store), config.session.autosave_every_ticks);
    let result = run_ticker(&engine, &control, config.session.max_ticks, &mut autosave).await;

    // 8. Final save.
    let saved = {
        let guard = engine.lock().await;
        save_state(&guard, store.as_ref())
    };

    info!(
        end_reason = ?result.end_reason,
        total_ticks = result.total_ticks,
        autosaves = autosave.saves(),
        final_save = saved,
        "pearl-host shutdown complete"
    );

    Ok(())
}

/// Install the tracing subscriber. `RUST_LOG` wins over the configured level.
fn init_logging(logging: &LoggingConfig) -> Result<(), HostError> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));
    let result = if logging.json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .try_init()
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .try_init()
    };
    result.map_err(|e| HostError::Logging {
        message: e.to_string(),
    })
}

/// The chat client for this session. An unusable chat configuration keeps
/// Pearl on her fallback lines; the session still runs.
fn chat_client(config: Result<ChatConfig, ChatError>) -> ChatClient {
    let config = config.unwrap_or_else(|e| {
        warn!(error = %e, "invalid chat configuration, using fallback lines");
        ChatConfig::default()
    });
    ChatClient::new(config)
}

/// Pearl's opening line for the session.
async fn greet(engine: &CompanionEngine, chat: &ChatClient) -> String {
    let state = engine.state();
    chat.generate(&[], state.mood, state.bond_level, &ChatStats::from_state(state))
        .await
}

/// Stop the session on Ctrl-C.
fn spawn_interrupt_handler(control: Arc<SessionControl>) {
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("interrupt received, stopping session");
                control.request_stop();
            }
            Err(e) => {
                warn!(error = %e, "failed to listen for interrupt, session runs until tick limit");
            }
        }
    });
}
