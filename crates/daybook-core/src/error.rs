/// Failures the journal reports to the user by kind.
///
/// Validation variants are raised before any store or identity call is made.
/// Remote failures travel as `anyhow::Error` with context; only the kinds a
/// caller needs to branch on live here.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum JournalError {
    #[error("Please write something before saving.")]
    EmptyEntry,

    #[error("Please enter a task.")]
    EmptyTodo,

    #[error("Please fill in all fields")]
    MissingCredentials,

    #[error("Password must be at least {min} characters")]
    PasswordTooShort { min: usize },

    #[error("Invalid mood '{0}'. Valid: {valid}", valid = crate::mood::Mood::valid_names())]
    InvalidMood(String),

    #[error("Invalid date '{0}': expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("Invalid month '{0}': expected YYYY-MM")]
    InvalidMonth(String),

    #[error("Invalid user id '{0}'")]
    InvalidUserId(String),

    #[error("Not signed in. Please sign in first.")]
    NotSignedIn,

    #[error("Journal is locked. Run `daybook unlock` first.")]
    Locked,

    #[error("No {kind} matching '{id}'")]
    NotFound { kind: &'static str, id: String },

    #[error("Ambiguous {kind} prefix '{id}': matches multiple items")]
    AmbiguousId { kind: &'static str, id: String },

    #[error("{0}")]
    Auth(String),
}

impl JournalError {
    /// True for input problems caught before any remote call.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::EmptyEntry
                | Self::EmptyTodo
                | Self::MissingCredentials
                | Self::PasswordTooShort { .. }
                | Self::InvalidMood(_)
                | Self::InvalidDate(_)
                | Self::InvalidMonth(_)
                | Self::InvalidUserId(_)
        )
    }
}
