use crate::reminder::InvalidStatusError;
use crate::shared::entity::{Entity, ID};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

/// One call attempt for a `Reminder`. The log is append-only; rows are only
/// ever removed together with the owning reminder.
#[derive(Debug, Clone, PartialEq)]
pub struct CallLog {
    pub id: ID,
    pub reminder_id: ID,
    /// The timestamp at which the call was placed
    pub attempted_at: i64,
    pub status: CallStatus,
    /// Raw provider response, when the provider returned one
    pub response_data: Option<String>,
    /// Human readable failure reason, set only when the attempt failed
    pub error_message: Option<String>,
}

impl Entity for CallLog {
    fn id(&self) -> &ID {
        &self.id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CallStatus {
    Success,
    Failed,
}

impl CallStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Failed => "failed",
        }
    }
}

impl Display for CallStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for CallStatus {
    type Err = InvalidStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "success" => Ok(Self::Success),
            "failed" => Ok(Self::Failed),
            _ => Err(InvalidStatusError(s.to_string())),
        }
    }
}
