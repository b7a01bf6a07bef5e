use std::fmt;

/// Where a widget's processing session stands.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SessionState {
    #[default]
    Idle,
    Validating,
    /// The interactive cropper is open.
    Editing,
    /// Decoding and auto-cropping without user input.
    AutoProcessing,
    Compressing,
    Done,
    Errored,
}

impl SessionState {
    /// A new selection must not start while one of these is active.
    pub fn is_busy(self) -> bool {
        matches!(
            self,
            Self::Validating | Self::AutoProcessing | Self::Compressing
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Errored)
    }

    /// Legal forward edges. Every state may return to `Idle` (reset or cancel),
    /// and a host may commit a file whenever no session is running.
    pub fn can_transition_to(self, next: SessionState) -> bool {
        use SessionState::*;
        if next == Idle {
            return true;
        }
        matches!(
            (self, next),
            (Idle, Validating)
                | (Validating, Editing | AutoProcessing | Errored)
                | (Editing, Compressing | Errored)
                | (AutoProcessing, Compressing | Errored)
                | (Compressing, Done | Errored)
                | (Idle | Done | Errored, Done)
        )
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Validating => write!(f, "validating"),
            Self::Editing => write!(f, "editing"),
            Self::AutoProcessing => write!(f, "auto-processing"),
            Self::Compressing => write!(f, "compressing"),
            Self::Done => write!(f, "done"),
            Self::Errored => write!(f, "errored"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forward_path_is_legal() {
        use SessionState::*;
        assert!(Idle.can_transition_to(Validating));
        assert!(Validating.can_transition_to(Editing));
        assert!(Editing.can_transition_to(Compressing));
        assert!(Compressing.can_transition_to(Done));
        assert!(Done.can_transition_to(Idle));
    }

    #[test]
    fn test_skipping_validation_is_illegal() {
        use SessionState::*;
        assert!(!Idle.can_transition_to(Compressing));
        assert!(!Idle.can_transition_to(Editing));
        assert!(!Validating.can_transition_to(Done));
        assert!(!Editing.can_transition_to(AutoProcessing));
    }

    #[test]
    fn test_busy_states() {
        assert!(SessionState::Compressing.is_busy());
        assert!(!SessionState::Editing.is_busy());
        assert!(!SessionState::Done.is_busy());
    }
}
