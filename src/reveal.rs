// ABOUTME: Reveal cursor helpers for progressive disclosure within a slide
// ABOUTME: Pure predicates; the step itself lives in the navigation state

use crate::slide::Slide;

/// Number of reveal steps the slide offers (`R`).
pub fn step_count(slide: &Slide) -> usize {
    slide.reveal_steps()
}

/// True while there are hidden fragments left on the slide.
pub fn can_advance(current_step: usize, step_count: usize) -> bool {
    current_step < step_count
}

pub fn can_retreat(current_step: usize) -> bool {
    current_step > 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_count_matches_fragments() {
        let slide = Slide::new("# List").fragment("- one").fragment("- two");
        assert_eq!(step_count(&slide), 2);
        assert_eq!(step_count(&Slide::new("# Plain")), 0);
    }

    #[test]
    fn test_predicates_at_boundaries() {
        assert!(!can_advance(0, 0));
        assert!(can_advance(0, 1));
        assert!(!can_advance(1, 1));
        assert!(!can_retreat(0));
        assert!(can_retreat(1));
    }
}
