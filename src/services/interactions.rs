//! Like/save toggle state, modeled explicitly.
//!
//! The forward flip and its inverse live together so a failed remote
//! write can roll the local state back with the request's own outcome,
//! never a later snapshot.

/// Local interaction state for one (user, card) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToggleState {
    pub active: bool,
    pub count: i64,
}

impl ToggleState {
    pub fn new(active: bool, count: i64) -> Self {
        Self { active, count }
    }

    /// Forward mutation: flip and adjust the counter.
    pub fn apply(self) -> Self {
        if self.active {
            Self {
                active: false,
                count: (self.count - 1).max(0),
            }
        } else {
            Self {
                active: true,
                count: self.count + 1,
            }
        }
    }
}

/// An optimistic flip awaiting remote confirmation.
#[derive(Debug)]
pub struct OptimisticToggle {
    before: ToggleState,
    after: ToggleState,
}

impl OptimisticToggle {
    pub fn begin(current: ToggleState) -> Self {
        Self {
            before: current,
            after: current.apply(),
        }
    }

    /// State shown while the remote write is in flight.
    pub fn pending(&self) -> ToggleState {
        self.after
    }

    /// Remote write succeeded.
    pub fn confirm(self) -> ToggleState {
        self.after
    }

    /// Remote write failed: restore the pre-toggle state.
    pub fn revert(self) -> ToggleState {
        self.before
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_flips_and_counts() {
        let unliked = ToggleState::new(false, 7);
        let liked = unliked.apply();
        assert_eq!(liked, ToggleState::new(true, 8));
        assert_eq!(liked.apply(), ToggleState::new(false, 7));
    }

    #[test]
    fn test_count_never_goes_negative() {
        let state = ToggleState::new(true, 0);
        assert_eq!(state.apply().count, 0);
    }

    #[test]
    fn test_revert_restores_pre_toggle_state() {
        let before = ToggleState::new(false, 3);
        let toggle = OptimisticToggle::begin(before);

        assert_eq!(toggle.pending(), ToggleState::new(true, 4));

        // Simulated backend failure on the insert: the visible state
        // must return to its pre-toggle value.
        let restored = toggle.revert();
        assert_eq!(restored, before);
    }

    #[test]
    fn test_confirm_keeps_applied_state() {
        let toggle = OptimisticToggle::begin(ToggleState::new(true, 10));
        assert_eq!(toggle.confirm(), ToggleState::new(false, 9));
    }
}
