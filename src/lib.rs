// ABOUTME: Library module for deckpilot.
// ABOUTME: Slide registry, navigation engine, render dispatchers and the remote-control surface.

// Reexport modules
pub mod config;
pub mod errors;
pub mod export;
pub mod html;
pub mod markdown;
pub mod mode;
pub mod navigation;
pub mod resources;
pub mod reveal;
pub mod server;
pub mod session;
pub mod slide;
pub mod utils;
pub mod watch;

// Reexport common types and functions
pub use config::Config;
pub use errors::{DeckError, Result};
pub use export::{export_deck, ExportConfig};
pub use html::{render_presenter, render_view, HtmlRenderer, RenderOptions};
pub use markdown::{load_deck, parse_deck, LoadOptions};
pub use navigation::NavigationState;
pub use resources::ResourceFile;
pub use server::{RemoteControl, Reply, ServerConfig, SharedSession};
pub use session::{progress, InputEvent, RenderDispatcher, Session};
pub use slide::{Deck, DeckInfo, Slide};
pub use watch::{spawn_watcher, WatchConfig};
