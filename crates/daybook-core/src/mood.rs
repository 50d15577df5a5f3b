use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::JournalError;

/// Emotional tag attached to every journal entry.
///
/// The set is closed. Declaration order is the picker order and the order
/// statistics are reported in.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, ValueEnum, Serialize,
    Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    #[default]
    Happy,
    Grateful,
    Excited,
    Calm,
    Neutral,
    Tired,
    Sad,
    Anxious,
    Angry,
    Loved,
    Confused,
    Proud,
}

impl Mood {
    pub const ALL: [Mood; 12] = [
        Self::Happy,
        Self::Grateful,
        Self::Excited,
        Self::Calm,
        Self::Neutral,
        Self::Tired,
        Self::Sad,
        Self::Anxious,
        Self::Angry,
        Self::Loved,
        Self::Confused,
        Self::Proud,
    ];

    /// Wire name, as stored in documents and accepted on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Happy => "happy",
            Self::Grateful => "grateful",
            Self::Excited => "excited",
            Self::Calm => "calm",
            Self::Neutral => "neutral",
            Self::Tired => "tired",
            Self::Sad => "sad",
            Self::Anxious => "anxious",
            Self::Angry => "angry",
            Self::Loved => "loved",
            Self::Confused => "confused",
            Self::Proud => "proud",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Happy => "Happy",
            Self::Grateful => "Grateful",
            Self::Excited => "Excited",
            Self::Calm => "Calm",
            Self::Neutral => "Neutral",
            Self::Tired => "Tired",
            Self::Sad => "Sad",
            Self::Anxious => "Anxious",
            Self::Angry => "Angry",
            Self::Loved => "Loved",
            Self::Confused => "Confused",
            Self::Proud => "Proud",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            Self::Happy => "😄",
            Self::Grateful => "🙏",
            Self::Excited => "🤩",
            Self::Calm => "😌",
            Self::Neutral => "😐",
            Self::Tired => "😴",
            Self::Sad => "😔",
            Self::Anxious => "😟",
            Self::Angry => "😠",
            Self::Loved => "🥰",
            Self::Confused => "😕",
            Self::Proud => "😊",
        }
    }

    pub(crate) fn valid_names() -> String {
        Self::ALL
            .iter()
            .map(Mood::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl std::fmt::Display for Mood {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Mood {
    type Err = JournalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|mood| mood.as_str() == wanted)
            .ok_or_else(|| JournalError::InvalidMood(s.to_string()))
    }
}
