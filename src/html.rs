// ABOUTME: HTML render dispatcher for deckpilot
// ABOUTME: Turns the navigation state into audience and presenter pages via comrak

use crate::navigation::{self, NavigationState};
use crate::resources::{self, ResourceFile, ResourceKind};
use crate::session::{progress, RenderDispatcher};
use crate::slide::{Deck, Slide};
use crate::utils::escape_html;
use chrono::{DateTime, Utc};
use comrak::{markdown_to_html, ComrakOptions};
use log::debug;
use parking_lot::RwLock;
use std::sync::Arc;

const BASE_STYLE: &str = "html,body{margin:0;height:100%;font-family:sans-serif}\
body{display:flex;flex-direction:column}\
main.slide{flex:1;display:flex;flex-direction:column;justify-content:center;align-items:center;padding:2em}\
body.fullscreen main.slide{padding:0}\
footer.template{display:flex;justify-content:space-between;align-items:center;padding:0 1em 1em}\
.progress{flex:1;margin-left:1em;height:4px;background:#ddd}\
.progress-bar{height:100%;background:#333}\
.presenter{display:grid;grid-template-columns:2fr 1fr;gap:1em;padding:1em}";

/// Options for rendering pages
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    pub css_files: Vec<ResourceFile>,
    pub js_files: Vec<ResourceFile>,
    pub embed_resources: bool,
    /// Ask browsers to reload the page periodically, keeping extra windows in sync
    pub refresh_secs: Option<u64>,
    /// Emit links to the remote control routes instead of inert buttons
    pub controls: bool,
}

/// Markdown for the slide with only the first `reveal_step` fragments shown.
/// Pinned text is always included, in its place between fragments.
pub fn visible_markdown(slide: &Slide, reveal_step: usize) -> String {
    let mut markdown = slide.body().to_string();
    let mut pinned = slide.pinned_text().iter().peekable();

    for step in 0..=slide.reveal_steps() {
        if step > 0 && step <= reveal_step {
            markdown.push('\n');
            markdown.push_str(&slide.fragments()[step - 1]);
        }
        while let Some((_, text)) = pinned.next_if(|(after, _)| *after == step) {
            markdown.push('\n');
            markdown.push_str(text);
        }
    }
    markdown
}

fn markdown_options() -> ComrakOptions {
    let mut options = ComrakOptions::default();
    options.render.unsafe_ = true; // Allow raw HTML
    options.extension.table = true;
    options.extension.strikethrough = true;
    options
}

/// Render the visible part of a slide to an HTML fragment
pub fn render_slide_content(slide: &Slide, reveal_step: usize) -> String {
    markdown_to_html(&visible_markdown(slide, reveal_step), &markdown_options())
}

fn document_head(title: &str, options: &RenderOptions) -> String {
    let mut head = String::from("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    head.push_str("<meta charset=\"UTF-8\">\n");
    head.push_str(
        "<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n",
    );
    if let Some(secs) = options.refresh_secs {
        head.push_str(&format!("<meta http-equiv=\"refresh\" content=\"{}\">\n", secs));
    }
    head.push_str(&format!("<title>{}</title>\n", escape_html(title)));
    head.push_str(&format!("<style>{}</style>\n", BASE_STYLE));
    head.push_str(&resources::tags(
        &options.css_files,
        ResourceKind::Css,
        options.embed_resources,
    ));
    head.push_str("</head>\n");
    head
}

fn document_tail(options: &RenderOptions) -> String {
    let mut tail = resources::tags(&options.js_files, ResourceKind::Js, options.embed_resources);
    tail.push_str("</body>\n</html>\n");
    tail
}

fn fullscreen_affordance(state: &NavigationState, options: &RenderOptions) -> String {
    let label = if state.fullscreen {
        "Exit fullscreen"
    } else {
        "Fullscreen"
    };
    let pressed = if state.fullscreen { "true" } else { "false" };

    if options.controls {
        format!(
            "<form class=\"fullscreen-toggle\" method=\"post\" action=\"/fullscreen\">\
             <button type=\"submit\" aria-pressed=\"{}\">{}</button></form>",
            pressed, label
        )
    } else {
        format!(
            "<button class=\"fullscreen-toggle\" type=\"button\" aria-pressed=\"{}\">{}</button>",
            pressed, label
        )
    }
}

fn template(state: &NavigationState, deck: &Deck, options: &RenderOptions) -> String {
    let percent = progress(state, deck) * 100.0;
    format!(
        "<footer class=\"template\">\n{}\n<span class=\"counter\">{} / {}</span>\n\
         <div class=\"progress\" role=\"progressbar\" aria-valuenow=\"{:.1}\" aria-valuemin=\"0\" aria-valuemax=\"100\">\
         <div class=\"progress-bar\" style=\"width: {:.1}%\"></div></div>\n</footer>\n",
        fullscreen_affordance(state, options),
        state.slide_index + 1,
        deck.len(),
        percent,
        percent
    )
}

/// Render the audience page for the current state
pub fn render_view(state: &NavigationState, deck: &Deck, options: &RenderOptions) -> String {
    let slide = match deck.get(state.slide_index) {
        Ok(slide) => slide,
        Err(_) => return String::new(),
    };

    let mut html = document_head(&deck.info().title, options);

    let body_class = if state.fullscreen { " class=\"fullscreen\"" } else { "" };
    html.push_str(&format!("<body{}>\n", body_class));
    html.push_str(&format!(
        "<main class=\"slide\" data-slide=\"{}\" data-step=\"{}\">\n{}</main>\n",
        state.slide_index,
        state.reveal_step,
        render_slide_content(slide, state.reveal_step)
    ));

    if !slide.is_bare() {
        html.push_str(&template(state, deck, options));
    }

    html.push_str(&document_tail(options));
    html
}

fn format_elapsed(started_at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let secs = (now - started_at).num_seconds().max(0);
    format!("{:02}:{:02}:{:02}", secs / 3600, (secs % 3600) / 60, secs % 60)
}

/// Render the presenter page: notes, what comes next, and the session clock
pub fn render_presenter(
    state: &NavigationState,
    deck: &Deck,
    started_at: DateTime<Utc>,
    now: DateTime<Utc>,
    options: &RenderOptions,
) -> String {
    let slide = match deck.get(state.slide_index) {
        Ok(slide) => slide,
        Err(_) => return String::new(),
    };

    let mut html = document_head(&format!("Presenter - {}", deck.info().title), options);
    html.push_str("<body>\n<div class=\"presenter\">\n");

    html.push_str(&format!(
        "<section class=\"current\">\n{}</section>\n",
        render_slide_content(slide, state.reveal_step)
    ));

    html.push_str("<aside>\n");
    html.push_str(&format!(
        "<p class=\"clock\">{}</p>\n<p class=\"counter\">Slide {} of {}, step {} of {}</p>\n",
        format_elapsed(started_at, now),
        state.slide_index + 1,
        deck.len(),
        state.reveal_step,
        slide.reveal_steps()
    ));

    let up_next = match navigation::next_state(state, deck) {
        Some(next) if next.slide_index == state.slide_index => "Next fragment".to_string(),
        Some(next) => deck
            .get(next.slide_index)
            .ok()
            .and_then(Slide::title)
            .map(|title| format!("Next: {}", escape_html(title)))
            .unwrap_or_else(|| format!("Next: slide {}", next.slide_index + 1)),
        None => "End of deck".to_string(),
    };
    html.push_str(&format!("<p class=\"next\">{}</p>\n", up_next));

    html.push_str("<div class=\"notes\">\n");
    match slide.notes() {
        Some(notes) => html.push_str(&markdown_to_html(notes, &markdown_options())),
        None => html.push_str("<p><em>No notes</em></p>\n"),
    }
    html.push_str("</div>\n");

    if options.controls {
        html.push_str("<nav>");
        for (route, label) in [("prev", "Prev"), ("next", "Next"), ("first", "First"), ("last", "Last")] {
            html.push_str(&format!(
                "<form method=\"post\" action=\"/{}?view=presenter\"><button type=\"submit\">{}</button></form>",
                route, label
            ));
        }
        html.push_str("</nav>\n");
    }
    html.push_str("</aside>\n</div>\n");

    html.push_str(&document_tail(options));
    html
}

/// Render dispatcher keeping the latest audience page in a shared buffer
pub struct HtmlRenderer {
    options: RenderOptions,
    output: Arc<RwLock<String>>,
    frames: u64,
}

impl HtmlRenderer {
    pub fn new(options: RenderOptions) -> Self {
        Self {
            options,
            output: Arc::new(RwLock::new(String::new())),
            frames: 0,
        }
    }

    /// Handle for reading the most recent page after the renderer moves into a session
    pub fn output(&self) -> Arc<RwLock<String>> {
        Arc::clone(&self.output)
    }
}

impl RenderDispatcher for HtmlRenderer {
    fn on_state_change(&mut self, state: &NavigationState, deck: &Deck) {
        self.frames += 1;
        debug!("Rendering frame {} for {:?}", self.frames, state.position());
        *self.output.write() = render_view(state, deck, &self.options);
    }
}
