// ABOUTME: Static export of a deck to HTML pages
// ABOUTME: Walks every navigation state from the first slide to the end and writes one page per state

use crate::errors::{DeckError, Result};
use crate::html::{HtmlRenderer, RenderOptions};
use crate::session::{InputEvent, Session};
use crate::slide::Deck;
use crate::utils;
use log::info;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

/// Configuration for static export
#[derive(Debug, Clone)]
pub struct ExportConfig {
    pub base_name: String,
    pub render: RenderOptions,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            base_name: "slide".to_string(),
            render: RenderOptions::default(),
        }
    }
}

/// File name for one state, e.g. `slide_0002_01.html`
pub fn page_file_name(base_name: &str, slide_index: usize, reveal_step: usize) -> String {
    format!("{}_{:04}_{:02}.html", base_name, slide_index + 1, reveal_step)
}

/// Write one HTML page per reachable state, in presentation order
pub fn export_deck(deck: Arc<Deck>, output_dir: &Path, config: &ExportConfig) -> Result<Vec<PathBuf>> {
    info!("Exporting {} slides to {:?}", deck.len(), output_dir);
    utils::ensure_directory_exists(output_dir)?;

    let renderer = HtmlRenderer::new(config.render.clone());
    let page = renderer.output();
    let mut session = Session::new(Arc::clone(&deck), Box::new(renderer));
    session.render();

    let start_time = Instant::now();
    let mut output_files = Vec::with_capacity(deck.total_steps() + 1);

    loop {
        let state = *session.state();
        let output_file =
            output_dir.join(page_file_name(&config.base_name, state.slide_index, state.reveal_step));

        fs::write(&output_file, page.read().as_bytes()).map_err(DeckError::FileReadError)?;
        output_files.push(output_file);

        if !session.handle(InputEvent::Next)? {
            break;
        }
    }

    info!(
        "Export complete. Wrote {} pages in {:.2} seconds",
        output_files.len(),
        start_time.elapsed().as_secs_f64()
    );

    Ok(output_files)
}
