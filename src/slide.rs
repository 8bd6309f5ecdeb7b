// ABOUTME: Slide registry for the deckpilot navigation engine
// ABOUTME: Holds the immutable, ordered sequence of slides that makes up a deck

use crate::errors::{DeckError, Result};
use log::debug;

/// One screen of content.
///
/// The body and fragments are opaque to the engine: only the number of
/// fragments matters for navigation, since each fragment is one
/// progressive-reveal step.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Slide {
    position: usize,
    body: String,
    fragments: Vec<String>,
    pinned: Vec<(usize, String)>,
    notes: Option<String>,
    bare: bool,
}

impl Slide {
    /// Create a slide whose whole content appears at once.
    pub fn new(body: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            ..Self::default()
        }
    }

    /// Append a progressive-reveal fragment.
    pub fn fragment(mut self, fragment: impl Into<String>) -> Self {
        self.fragments.push(fragment.into());
        self
    }

    pub fn with_fragments<I, S>(mut self, fragments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fragments.extend(fragments.into_iter().map(Into::into));
        self
    }

    /// Append text that stays visible at every step, placed after the
    /// fragments added so far.
    pub fn pinned(mut self, text: impl Into<String>) -> Self {
        self.pinned.push((self.fragments.len(), text.into()));
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Render this slide without the deck template (progress, fullscreen).
    pub fn bare(mut self, bare: bool) -> Self {
        self.bare = bare;
        self
    }

    /// 0-based position in the deck, assigned at registration.
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn fragments(&self) -> &[String] {
        &self.fragments
    }

    /// Always-visible text, each entry keyed by how many fragments precede it.
    pub fn pinned_text(&self) -> &[(usize, String)] {
        &self.pinned
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    pub fn is_bare(&self) -> bool {
        self.bare
    }

    /// Number of progressive-reveal steps available within the slide.
    pub fn reveal_steps(&self) -> usize {
        self.fragments.len()
    }

    /// First heading line of the body, used for outlines and the presenter view.
    pub fn title(&self) -> Option<&str> {
        self.body
            .lines()
            .map(str::trim)
            .find(|line| line.starts_with('#'))
            .map(|line| line.trim_start_matches('#').trim())
            .filter(|title| !title.is_empty())
    }
}

/// Metadata from the deck's frontmatter block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeckInfo {
    pub title: String,
    pub author: String,
    pub date: String,
}

impl Default for DeckInfo {
    fn default() -> Self {
        Self {
            title: "Presentation".to_string(),
            author: String::new(),
            date: String::new(),
        }
    }
}

/// An ordered, non-empty, read-only sequence of slides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deck {
    info: DeckInfo,
    slides: Vec<Slide>,
}

impl Deck {
    /// Build a deck from slides in presentation order.
    pub fn register(slides: Vec<Slide>) -> Result<Self> {
        Self::register_with_info(DeckInfo::default(), slides)
    }

    pub fn register_with_info(info: DeckInfo, mut slides: Vec<Slide>) -> Result<Self> {
        if slides.is_empty() {
            return Err(DeckError::EmptyDeck);
        }

        for (position, slide) in slides.iter_mut().enumerate() {
            slide.position = position;
        }

        debug!(
            "Registered deck {:?} with {} slides",
            info.title,
            slides.len()
        );

        Ok(Self { info, slides })
    }

    pub fn get(&self, index: usize) -> Result<&Slide> {
        self.slides.get(index).ok_or(DeckError::IndexOutOfRange {
            index,
            len: self.slides.len(),
        })
    }

    pub fn len(&self) -> usize {
        self.slides.len()
    }

    /// A registered deck is never empty.
    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }

    pub fn last_index(&self) -> usize {
        self.slides.len() - 1
    }

    pub fn info(&self) -> &DeckInfo {
        &self.info
    }

    pub fn slides(&self) -> &[Slide] {
        &self.slides
    }

    /// Total number of `advance` calls needed to walk from the first state
    /// to the terminal one.
    pub fn total_steps(&self) -> usize {
        self.slides.iter().map(Slide::reveal_steps).sum::<usize>() + self.last_index()
    }
}
