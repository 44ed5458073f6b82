//! Highlight swipe actions.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A user decision on a highlighted photo.
///
/// Once any action is recorded for a photo, that photo is excluded from
/// future highlight listings for the user.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HighlightActionKind {
    /// Keep the photo; stop suggesting it.
    Archived,
    /// Decide later; stop suggesting it for now.
    Deferred,
    /// Photo was sent to trash from the highlight feed.
    Deleted,
}

impl HighlightActionKind {
    /// Wire-format string for this action.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Archived => "archived",
            Self::Deferred => "deferred",
            Self::Deleted => "deleted",
        }
    }
}

impl fmt::Display for HighlightActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for an unrecognized action string.
#[derive(Debug, Error)]
#[error("invalid highlight action: {given} (expected archived, deferred, or deleted)")]
pub struct InvalidAction {
    /// The rejected input.
    pub given: String,
}

impl FromStr for HighlightActionKind {
    type Err = InvalidAction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "archived" => Ok(Self::Archived),
            "deferred" => Ok(Self::Deferred),
            "deleted" => Ok(Self::Deleted),
            other => Err(InvalidAction {
                given: other.to_owned(),
            }),
        }
    }
}
