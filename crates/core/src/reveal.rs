//! One-shot reveal latch for the comparison bars

/// `Armed` until the bar is first seen, then `Fired` for good
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RevealState {
    #[default]
    Armed,
    Fired,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RevealLatch {
    state: RevealState,
}

impl RevealLatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> RevealState {
        self.state
    }

    pub fn is_revealed(&self) -> bool {
        self.state == RevealState::Fired
    }

    /// Feed a visibility observation. Returns `true` exactly once: on the
    /// first observation that reports the element visible.
    pub fn observe(&mut self, visible: bool) -> bool {
        match (self.state, visible) {
            (RevealState::Armed, true) => {
                self.state = RevealState::Fired;
                true
            }
            _ => false,
        }
    }
}
