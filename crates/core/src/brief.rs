//! Brief lifecycle: status values and the publish transition.
//!
//! A brief starts as `draft` and can be published exactly once, which moves it
//! to the terminal `ready` state. Published briefs are frozen: canvas edits and
//! snapshot restores are rejected; reads, snapshots, and lock housekeeping
//! remain available.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// Lifecycle state of a brief. Stored as lowercase text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BriefStatus {
    Draft,
    Ready,
}

impl BriefStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            BriefStatus::Draft => "draft",
            BriefStatus::Ready => "ready",
        }
    }

    /// Apply the publish transition.
    ///
    /// Only `draft -> ready` exists. Publishing a brief that is already
    /// `ready` is an error rather than a no-op.
    pub fn publish(self) -> Result<BriefStatus, CoreError> {
        match self {
            BriefStatus::Draft => Ok(BriefStatus::Ready),
            BriefStatus::Ready => Err(CoreError::InvalidState(
                "Brief is already published".into(),
            )),
        }
    }

    /// Fail unless the brief's canvas may still be modified.
    pub fn ensure_editable(self) -> Result<(), CoreError> {
        match self {
            BriefStatus::Draft => Ok(()),
            BriefStatus::Ready => Err(CoreError::InvalidState(
                "Brief is published and can no longer be edited".into(),
            )),
        }
    }
}

impl fmt::Display for BriefStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for BriefStatus {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl FromStr for BriefStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(BriefStatus::Draft),
            "ready" => Ok(BriefStatus::Ready),
            other => Err(CoreError::Internal(format!(
                "Unknown brief status '{other}'"
            ))),
        }
    }
}
