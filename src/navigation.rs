// ABOUTME: Slide navigation model for the slider-export application
// ABOUTME: Tracks the active slide with wraparound and the transitional marks around it

/// Visual state of one slide relative to the active one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlideState {
    Active,
    Prev,
    Next,
    Neutral,
}

impl SlideState {
    /// CSS class the exported document uses for this state
    pub fn css_class(self) -> &'static str {
        match self {
            SlideState::Active => "active",
            SlideState::Prev => "prev",
            SlideState::Next => "next",
            SlideState::Neutral => "",
        }
    }
}

/// Position within an ordered slide list. Advancing past either end wraps around.
///
/// The navigation script embedded in exported documents implements the same
/// rules; this type fixes the initial marking and keeps the rules testable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Carousel {
    len: usize,
    current: usize,
}

impl Carousel {
    pub fn new(len: usize) -> Self {
        Self { len, current: 0 }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn next(&mut self) {
        if self.len > 0 {
            self.current = (self.current + 1) % self.len;
        }
    }

    pub fn prev(&mut self) {
        if self.len > 0 {
            self.current = (self.current + self.len - 1) % self.len;
        }
    }

    /// Jump to a slide; out-of-range indices are ignored
    pub fn go_to(&mut self, index: usize) {
        if index < self.len {
            self.current = index;
        }
    }

    /// State of the slide at `index`. When previous and next coincide
    /// (two slides) the previous mark wins.
    pub fn state_of(&self, index: usize) -> SlideState {
        if self.len == 0 || index >= self.len {
            return SlideState::Neutral;
        }
        if index == self.current {
            SlideState::Active
        } else if index == (self.current + self.len - 1) % self.len {
            SlideState::Prev
        } else if index == (self.current + 1) % self.len {
            SlideState::Next
        } else {
            SlideState::Neutral
        }
    }

    pub fn states(&self) -> Vec<SlideState> {
        (0..self.len).map(|i| self.state_of(i)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_wraps_back_to_first() {
        let mut carousel = Carousel::new(3);
        for _ in 0..3 {
            carousel.next();
        }
        assert_eq!(carousel.current(), 0);
        assert_eq!(carousel.state_of(0), SlideState::Active);
    }

    #[test]
    fn prev_from_first_activates_last() {
        let mut carousel = Carousel::new(3);
        carousel.prev();
        assert_eq!(carousel.current(), 2);
        assert_eq!(carousel.state_of(2), SlideState::Active);
    }

    #[test]
    fn marks_neighbours_and_leaves_others_neutral() {
        let mut carousel = Carousel::new(5);
        carousel.go_to(2);
        assert_eq!(
            carousel.states(),
            vec![
                SlideState::Neutral,
                SlideState::Prev,
                SlideState::Active,
                SlideState::Next,
                SlideState::Neutral,
            ]
        );
    }

    #[test]
    fn exactly_one_active_slide() {
        let mut carousel = Carousel::new(4);
        for _ in 0..6 {
            let active = carousel
                .states()
                .iter()
                .filter(|s| **s == SlideState::Active)
                .count();
            assert_eq!(active, 1);
            carousel.next();
        }
    }

    #[test]
    fn empty_carousel_is_inert() {
        let mut carousel = Carousel::new(0);
        carousel.next();
        carousel.prev();
        assert_eq!(carousel.current(), 0);
        assert!(carousel.states().is_empty());
    }

    #[test]
    fn single_slide_has_no_neighbours() {
        let carousel = Carousel::new(1);
        assert_eq!(carousel.states(), vec![SlideState::Active]);
    }
}
