// ABOUTME: Presentation session for the deckpilot engine
// ABOUTME: Couples one deck, one navigation state and one render dispatcher

use crate::errors::{DeckError, Result};
use crate::mode;
use crate::navigation::{self, NavigationState};
use crate::slide::Deck;
use chrono::{DateTime, Utc};
use log::{debug, info};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use uuid::Uuid;

/// Discrete input driving a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Next,
    Prev,
    /// 0-based slide index.
    Jump(usize),
    First,
    Last,
    ToggleFullscreen,
}

impl InputEvent {
    /// Map a keyboard key name (DOM `KeyboardEvent.key` style) to an event.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "ArrowRight" | "ArrowDown" | "PageDown" | " " | "Space" | "Enter" => {
                Some(InputEvent::Next)
            }
            "ArrowLeft" | "ArrowUp" | "PageUp" | "Backspace" => Some(InputEvent::Prev),
            "Home" => Some(InputEvent::First),
            "End" => Some(InputEvent::Last),
            "f" | "F" => Some(InputEvent::ToggleFullscreen),
            _ => None,
        }
    }
}

impl FromStr for InputEvent {
    type Err = DeckError;

    /// Parse a text command. Slide numbers in `jump` are 1-based.
    fn from_str(s: &str) -> Result<Self> {
        let mut parts = s.split_whitespace();
        let command = parts
            .next()
            .ok_or_else(|| DeckError::InvalidCommand("empty command".to_string()))?
            .to_lowercase();

        let event = match command.as_str() {
            "next" | "n" => InputEvent::Next,
            "prev" | "previous" | "p" => InputEvent::Prev,
            "first" | "home" => InputEvent::First,
            "last" | "end" => InputEvent::Last,
            "fullscreen" | "f" => InputEvent::ToggleFullscreen,
            "jump" | "goto" | "g" => {
                let number = parts.next().ok_or_else(|| {
                    DeckError::InvalidCommand(format!("{} needs a slide number", command))
                })?;
                InputEvent::Jump(parse_slide_number(number)?)
            }
            _ => {
                // A bare number is shorthand for a jump
                match command.parse::<usize>() {
                    Ok(_) => InputEvent::Jump(parse_slide_number(&command)?),
                    Err(_) => return Err(DeckError::InvalidCommand(s.trim().to_string())),
                }
            }
        };

        if let Some(extra) = parts.next() {
            return Err(DeckError::InvalidCommand(format!(
                "unexpected argument: {}",
                extra
            )));
        }

        Ok(event)
    }
}

/// Convert a 1-based slide number into a 0-based index.
pub fn parse_slide_number(number: &str) -> Result<usize> {
    match number.trim().parse::<usize>() {
        Ok(n) if n >= 1 => Ok(n - 1),
        _ => Err(DeckError::InvalidCommand(format!(
            "invalid slide number: {}",
            number
        ))),
    }
}

/// Progress through the deck as `slide_index / (N - 1)`, 0 for a single slide.
pub fn progress(state: &NavigationState, deck: &Deck) -> f64 {
    let last = deck.last_index();
    if last == 0 {
        0.0
    } else {
        state.slide_index as f64 / last as f64
    }
}

/// Rendering collaborator notified after every state change.
pub trait RenderDispatcher {
    fn on_state_change(&mut self, state: &NavigationState, deck: &Deck);
}

impl<F> RenderDispatcher for F
where
    F: FnMut(&NavigationState, &Deck),
{
    fn on_state_change(&mut self, state: &NavigationState, deck: &Deck) {
        self(state, deck)
    }
}

/// A dispatcher that renders nothing.
pub struct NullDispatcher;

impl RenderDispatcher for NullDispatcher {
    fn on_state_change(&mut self, _state: &NavigationState, _deck: &Deck) {}
}

/// One active presentation.
pub struct Session {
    id: Uuid,
    started_at: DateTime<Utc>,
    deck: Arc<Deck>,
    state: NavigationState,
    dispatcher: Box<dyn RenderDispatcher + Send>,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.id)
            .field("started_at", &self.started_at)
            .field("slides", &self.deck.len())
            .field("state", &self.state)
            .finish()
    }
}

impl Session {
    pub fn new(deck: Arc<Deck>, dispatcher: Box<dyn RenderDispatcher + Send>) -> Self {
        let session = Self {
            id: Uuid::new_v4(),
            started_at: Utc::now(),
            deck,
            state: NavigationState::new(),
            dispatcher,
        };
        info!(
            "Started session {} with {} slides",
            session.id,
            session.deck.len()
        );
        session
    }

    pub fn without_renderer(deck: Arc<Deck>) -> Self {
        Self::new(deck, Box::new(NullDispatcher))
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn deck(&self) -> &Arc<Deck> {
        &self.deck
    }

    pub fn state(&self) -> &NavigationState {
        &self.state
    }

    pub fn progress(&self) -> f64 {
        progress(&self.state, &self.deck)
    }

    pub fn is_terminal(&self) -> bool {
        navigation::is_terminal(&self.state, &self.deck)
    }

    /// Hand the current state to the dispatcher, e.g. for the first paint.
    pub fn render(&mut self) {
        self.dispatcher.on_state_change(&self.state, &self.deck);
    }

    /// Apply one input event. Returns whether the state changed; the
    /// dispatcher is only invoked when it did.
    pub fn handle(&mut self, event: InputEvent) -> Result<bool> {
        let deck: &Deck = &self.deck;
        let changed = match event {
            InputEvent::Next => navigation::advance(&mut self.state, deck),
            InputEvent::Prev => navigation::retreat(&mut self.state, deck),
            InputEvent::Jump(index) => navigation::jump_to(&mut self.state, deck, index)?,
            InputEvent::First => navigation::first(&mut self.state),
            InputEvent::Last => navigation::last(&mut self.state, deck),
            InputEvent::ToggleFullscreen => {
                mode::toggle_fullscreen(&mut self.state);
                true
            }
        };

        if changed {
            debug!("Session {} handled {:?} -> {:?}", self.id, event, self.state);
            self.render();
        } else {
            debug!("Session {} ignored {:?} at {:?}", self.id, event, self.state);
        }

        Ok(changed)
    }

    pub fn set_fullscreen(&mut self, fullscreen: bool) -> bool {
        let changed = mode::set_fullscreen(&mut self.state, fullscreen);
        if changed {
            self.render();
        }
        changed
    }

    /// Start over on a rebuilt deck, keeping the slide index where it still exists.
    pub fn reload(&mut self, deck: Arc<Deck>) {
        let slide_index = self.state.slide_index.min(deck.last_index());
        let fullscreen = self.state.fullscreen;

        self.id = Uuid::new_v4();
        self.started_at = Utc::now();
        self.deck = deck;
        self.state = NavigationState {
            slide_index,
            reveal_step: 0,
            fullscreen,
        };

        info!(
            "Reloaded deck into session {} ({} slides, at slide {})",
            self.id,
            self.deck.len(),
            slide_index + 1
        );
        self.render();
    }
}
