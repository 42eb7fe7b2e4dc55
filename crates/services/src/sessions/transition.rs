use exam_core::model::OptionId;

/// Why a session operation was ignored. State is unchanged in every case.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    AlreadyStarted,
    EmptyName,
    NoQuestions,
    NotStarted,
    /// The current question is revealed; its answer can no longer change.
    AnswerLocked,
    /// The current question was scored earlier (reached again via jump).
    AlreadyScored,
    UnknownOption(OptionId),
    EmptySelection,
    NotRevealed,
    LastQuestion,
    OutOfRange { index: usize, len: usize },
}

/// Result of a session operation.
///
/// Rejections are informational: callers are expected to have disabled the
/// action already and may ignore the value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Applied,
    Rejected(Rejection),
}

impl Transition {
    #[must_use]
    pub fn is_applied(self) -> bool {
        matches!(self, Transition::Applied)
    }

    #[must_use]
    pub fn rejection(self) -> Option<Rejection> {
        match self {
            Transition::Applied => None,
            Transition::Rejected(reason) => Some(reason),
        }
    }
}
