// ABOUTME: Watch module for reloading the deck when its markdown source changes
// ABOUTME: Rebuilds the deck and restarts the shared session on each relevant change

use log::{debug, error, info};
use std::path::{Path, PathBuf};
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use notify::{RecursiveMode, Watcher};
use notify_debouncer_full::new_debouncer;

use crate::errors::{DeckError, Result};
use crate::markdown::{self, LoadOptions};
use crate::server::SharedSession;
use crate::utils;

/// Configuration for watch mode
#[derive(Debug, Clone)]
pub struct WatchConfig {
    /// Path to the markdown file to watch
    pub markdown_path: PathBuf,

    /// How the deck is rebuilt
    pub load_options: LoadOptions,

    /// Debounce time in milliseconds
    pub debounce_ms: u64,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            markdown_path: PathBuf::new(),
            load_options: LoadOptions::default(),
            debounce_ms: 500,
        }
    }
}

/// Rebuild the deck and restart the session on it.
///
/// A deck that fails to load leaves the running session untouched.
pub fn reload_session(config: &WatchConfig, session: &SharedSession) -> Result<()> {
    let deck = markdown::load_deck(&config.markdown_path, &config.load_options)?;
    session.lock().reload(Arc::new(deck));
    Ok(())
}

/// Watch the deck source on a background thread
pub fn spawn_watcher(config: WatchConfig, session: SharedSession) -> Result<thread::JoinHandle<()>> {
    utils::validate_file_exists(&config.markdown_path)?;

    let handle = thread::Builder::new()
        .name("deck-watcher".to_string())
        .spawn(move || {
            if let Err(e) = watch_markdown(&config, &session) {
                error!("Deck watcher stopped: {}", e);
            }
        })
        .map_err(|e| DeckError::WatchError(format!("Failed to spawn watcher thread: {}", e)))?;

    Ok(handle)
}

/// Block, reloading the session whenever the markdown file changes
pub fn watch_markdown(config: &WatchConfig, session: &SharedSession) -> Result<()> {
    utils::validate_file_exists(&config.markdown_path)?;

    let (tx, rx) = mpsc::channel();

    let mut debouncer = new_debouncer(Duration::from_millis(config.debounce_ms), None, tx)
        .map_err(|e| DeckError::WatchError(format!("Failed to create file watcher: {}", e)))?;

    // Watch the containing directory; editors often replace the file on save
    let watch_path = match config.markdown_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let abs_watch_path = if watch_path.is_absolute() {
        watch_path.to_path_buf()
    } else {
        utils::get_absolute_path(watch_path)?
    };

    debug!("Watching absolute path: {:?}", abs_watch_path);

    debouncer
        .watcher()
        .watch(&abs_watch_path, RecursiveMode::NonRecursive)
        .map_err(|e| {
            DeckError::WatchError(format!(
                "Failed to start watching directory {:?}: {}",
                abs_watch_path, e
            ))
        })?;

    info!("Watching {:?} for changes", config.markdown_path);

    for result in rx {
        match result {
            Ok(events) => {
                let relevant = events
                    .iter()
                    .flat_map(|event| event.paths.iter())
                    .any(|path| is_relevant_path(path, &config.markdown_path));

                if relevant {
                    match reload_session(config, session) {
                        Ok(()) => info!("Deck reloaded from {:?}", config.markdown_path),
                        Err(e) => error!("Failed to reload deck: {}", e),
                    }
                }
            }
            Err(errors) => {
                for e in errors {
                    error!("Watch error: {:?}", e);
                }
            }
        }
    }

    Ok(())
}

/// Checks if a changed path is the deck source
fn is_relevant_path(path: &Path, markdown_path: &Path) -> bool {
    if path == markdown_path {
        return true;
    }

    match (
        utils::get_absolute_path(path),
        utils::get_absolute_path(markdown_path),
    ) {
        (Ok(changed), Ok(source)) => changed == source,
        _ => path.file_name().is_some() && path.file_name() == markdown_path.file_name(),
    }
}
