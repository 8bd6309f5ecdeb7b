// ABOUTME: Navigation controller for the deckpilot engine
// ABOUTME: Owns the (slide, reveal step) position and the moves between positions

use crate::errors::Result;
use crate::reveal;
use crate::slide::Deck;
use log::debug;

/// Mutable state of one presentation session.
///
/// Positions are ordered lexicographically by `(slide_index, reveal_step)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct NavigationState {
    pub slide_index: usize,
    pub reveal_step: usize,
    pub fullscreen: bool,
}

impl NavigationState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn position(&self) -> (usize, usize) {
        (self.slide_index, self.reveal_step)
    }

    fn at(self, slide_index: usize, reveal_step: usize) -> Self {
        Self {
            slide_index,
            reveal_step,
            ..self
        }
    }
}

/// Whether `state` sits on the last slide with every fragment shown.
pub fn is_terminal(state: &NavigationState, deck: &Deck) -> bool {
    state.slide_index == deck.last_index()
        && state.reveal_step == deck.slides()[deck.last_index()].reveal_steps()
}

/// The state one `advance` away, or `None` at the terminal state.
pub fn next_state(state: &NavigationState, deck: &Deck) -> Option<NavigationState> {
    let slide = deck.get(state.slide_index).ok()?;

    if reveal::can_advance(state.reveal_step, reveal::step_count(slide)) {
        Some(state.at(state.slide_index, state.reveal_step + 1))
    } else if state.slide_index < deck.last_index() {
        Some(state.at(state.slide_index + 1, 0))
    } else {
        None
    }
}

/// The state one `retreat` away, or `None` at the initial state.
pub fn previous_state(state: &NavigationState, deck: &Deck) -> Option<NavigationState> {
    if reveal::can_retreat(state.reveal_step) {
        return Some(state.at(state.slide_index, state.reveal_step - 1));
    }

    if state.slide_index == 0 {
        return None;
    }

    let previous = deck.get(state.slide_index - 1).ok()?;
    Some(state.at(state.slide_index - 1, reveal::step_count(previous)))
}

/// Show the next fragment, or move to the next slide. Returns whether the state changed.
pub fn advance(state: &mut NavigationState, deck: &Deck) -> bool {
    match next_state(state, deck) {
        Some(next) => {
            debug!("advance {:?} -> {:?}", state.position(), next.position());
            *state = next;
            true
        }
        None => false,
    }
}

/// Hide the last fragment, or move back to the previous slide fully revealed.
pub fn retreat(state: &mut NavigationState, deck: &Deck) -> bool {
    match previous_state(state, deck) {
        Some(previous) => {
            debug!("retreat {:?} -> {:?}", state.position(), previous.position());
            *state = previous;
            true
        }
        None => false,
    }
}

/// Move to the start of slide `index`; the state is untouched on error.
pub fn jump_to(state: &mut NavigationState, deck: &Deck, index: usize) -> Result<bool> {
    deck.get(index)?;

    let target = state.at(index, 0);
    let changed = target != *state;
    *state = target;
    Ok(changed)
}

pub fn first(state: &mut NavigationState) -> bool {
    let target = state.at(0, 0);
    let changed = target != *state;
    *state = target;
    changed
}

/// Move to the terminal state: last slide, fully revealed.
pub fn last(state: &mut NavigationState, deck: &Deck) -> bool {
    let last = deck.last_index();
    let target = state.at(last, deck.slides()[last].reveal_steps());
    let changed = target != *state;
    *state = target;
    changed
}
