// ABOUTME: Presentation mode controller
// ABOUTME: Tracks the fullscreen flag alongside navigation

use crate::navigation::NavigationState;
use log::debug;

pub fn toggle_fullscreen(state: &mut NavigationState) {
    state.fullscreen = !state.fullscreen;
    debug!("fullscreen -> {}", state.fullscreen);
}

/// Returns whether the flag changed.
pub fn set_fullscreen(state: &mut NavigationState, fullscreen: bool) -> bool {
    let changed = state.fullscreen != fullscreen;
    state.fullscreen = fullscreen;
    changed
}
