// ABOUTME: Configuration module for deckpilot
// ABOUTME: Provides configuration settings and environment variable handling

use crate::html::RenderOptions;
use crate::markdown::LoadOptions;
use crate::resources::ResourceFile;
use crate::server::ServerConfig;
use crate::watch::WatchConfig;
use std::env;
use std::path::PathBuf;

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_DEBOUNCE_MS: u64 = 500;

/// Global configuration for the application
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub debounce_ms: u64,
    /// Seconds between audience page reloads; 0 disables reloading
    pub refresh_secs: u64,
    pub embed_resources: bool,
    pub animate_list_items: bool,
    pub default_css: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            refresh_secs: 2,
            embed_resources: true,
            animate_list_items: false,
            default_css: None,
        }
    }
}

fn env_flag(name: &str, default: bool) -> bool {
    env::var(name)
        .ok()
        .map(|s| !matches!(s.to_lowercase().as_str(), "false" | "0" | "no" | "off"))
        .unwrap_or(default)
}

fn env_number<T: std::str::FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|s| s.trim().parse::<T>().ok())
        .unwrap_or(default)
}

impl Config {
    /// Create a new configuration instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            port: env_number("DECK_PORT", defaults.port),
            debounce_ms: env_number("DECK_DEBOUNCE_MS", defaults.debounce_ms),
            refresh_secs: env_number("DECK_REFRESH_SECS", defaults.refresh_secs),
            embed_resources: env_flag("DECK_EMBED_RESOURCES", defaults.embed_resources),
            animate_list_items: env_flag("DECK_ANIMATE_LIST_ITEMS", defaults.animate_list_items),
            default_css: env::var("DECK_CSS").ok().filter(|s| !s.is_empty()),
        }
    }

    /// Get markdown loading options, with an optional CLI override
    pub fn get_load_options(&self, animate_list_items: bool) -> LoadOptions {
        LoadOptions {
            animate_list_items: animate_list_items || self.animate_list_items,
        }
    }

    /// Get render options with defaults from this config
    pub fn get_render_options(
        &self,
        css: Option<Vec<String>>,
        js: Option<Vec<String>>,
        embed_resources: Option<bool>,
        controls: bool,
    ) -> RenderOptions {
        let css = css.unwrap_or_else(|| self.default_css.iter().cloned().collect());

        RenderOptions {
            css_files: css.iter().map(|path| ResourceFile::new(path)).collect(),
            js_files: js
                .unwrap_or_default()
                .iter()
                .map(|path| ResourceFile::new(path))
                .collect(),
            embed_resources: embed_resources.unwrap_or(self.embed_resources),
            refresh_secs: if controls && self.refresh_secs > 0 {
                Some(self.refresh_secs)
            } else {
                None
            },
            controls,
        }
    }

    /// Get a server configuration with defaults
    pub fn get_server_config(&self, port: Option<u16>, host: Option<String>) -> ServerConfig {
        ServerConfig {
            host: host.unwrap_or_else(|| "127.0.0.1".to_string()),
            port: port.unwrap_or(self.port),
        }
    }

    /// Get a watch configuration with defaults
    pub fn get_watch_config(&self, markdown_path: PathBuf, load_options: LoadOptions) -> WatchConfig {
        WatchConfig {
            markdown_path,
            load_options,
            debounce_ms: self.debounce_ms,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_options_prefer_cli_values() {
        let config = Config {
            default_css: Some("theme.css".to_string()),
            ..Config::default()
        };

        let options = config.get_render_options(None, None, None, false);
        assert_eq!(options.css_files, vec![ResourceFile::new("theme.css")]);
        assert!(options.embed_resources);
        assert_eq!(options.refresh_secs, None);

        let options = config.get_render_options(
            Some(vec!["https://cdn.example.com/a.css".to_string()]),
            Some(vec!["app.js".to_string()]),
            Some(false),
            true,
        );
        assert!(options.css_files[0].is_remote);
        assert_eq!(options.js_files.len(), 1);
        assert!(!options.embed_resources);
        assert_eq!(options.refresh_secs, Some(2));
    }

    #[test]
    fn test_server_and_load_defaults() {
        let config = Config::default();
        let server = config.get_server_config(None, None);
        assert_eq!(server.port, 8080);
        assert_eq!(server.host, "127.0.0.1");
        assert_eq!(config.get_server_config(Some(9000), None).port, 9000);

        assert!(!config.get_load_options(false).animate_list_items);
        assert!(config.get_load_options(true).animate_list_items);
    }
}
