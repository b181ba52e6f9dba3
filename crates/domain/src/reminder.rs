use crate::shared::entity::{Entity, ID};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;
use thiserror::Error;

/// A `Reminder` is a phone call that should be placed at a specific instant.
/// `scheduled_for` is the absolute UTC timestamp in millis at which the call
/// is due; `timezone` is only used for interpreting user-entered local times
/// and for display, it never changes the stored instant on its own.
#[derive(Debug, Clone, PartialEq)]
pub struct Reminder {
    pub id: ID,
    pub title: String,
    pub message: String,
    /// The number that will be dialed when the reminder triggers
    pub phone_number: PhoneNumber,
    /// The timestamp at which the call should be attempted
    pub scheduled_for: i64,
    pub timezone: Tz,
    pub status: ReminderStatus,
    pub created: i64,
    pub updated: i64,
}

impl Reminder {
    pub const TITLE_MAX_LEN: usize = 100;
    pub const MESSAGE_MAX_LEN: usize = 500;

    pub fn is_valid_title(title: &str) -> bool {
        !title.is_empty() && title.chars().count() <= Self::TITLE_MAX_LEN
    }

    pub fn is_valid_message(message: &str) -> bool {
        !message.is_empty() && message.chars().count() <= Self::MESSAGE_MAX_LEN
    }
}

impl Entity for Reminder {
    fn id(&self) -> &ID {
        &self.id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReminderStatus {
    Scheduled,
    /// Claimed by a scheduler tick, call in flight. Rows that stay here past
    /// the requeue age are handed back to the scheduler by the recovery
    /// sweep.
    Dispatching,
    Completed,
    Failed,
}

impl ReminderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Scheduled => "scheduled",
            Self::Dispatching => "dispatching",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }
}

impl Display for ReminderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Error, Debug)]
#[error("Status: {0} is not recognized")]
pub struct InvalidStatusError(pub String);

impl FromStr for ReminderStatus {
    type Err = InvalidStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "scheduled" => Ok(Self::Scheduled),
            "dispatching" => Ok(Self::Dispatching),
            "completed" => Ok(Self::Completed),
            "failed" => Ok(Self::Failed),
            _ => Err(InvalidStatusError(s.to_string())),
        }
    }
}

/// E.164 phone number: `+` followed by 2 to 15 digits, first digit 1-9.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    pub fn new(number: &str) -> Result<Self, InvalidPhoneNumberError> {
        let digits = match number.strip_prefix('+') {
            Some(digits) => digits,
            None => return Err(InvalidPhoneNumberError(number.to_string())),
        };
        let valid_len = (2..=15).contains(&digits.len());
        let all_digits = digits.chars().all(|c| c.is_ascii_digit());
        let valid_start = digits.starts_with(|c: char| ('1'..='9').contains(&c));
        if valid_len && all_digits && valid_start {
            Ok(Self(number.to_string()))
        } else {
            Err(InvalidPhoneNumberError(number.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for PhoneNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Error, Debug)]
#[error("Phone number: {0} is not a valid E.164 number")]
pub struct InvalidPhoneNumberError(pub String);

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn it_accepts_valid_phone_numbers() {
        let valid_numbers = vec!["+4799999999", "+12025550123", "+15", "+919876543210"];

        for number in &valid_numbers {
            assert!(PhoneNumber::new(number).is_ok());
        }
    }

    #[test]
    fn it_rejects_invalid_phone_numbers() {
        let invalid_numbers = vec![
            "",
            "+",
            "+1",
            "4799999999",
            "+0799999999",
            "+47a9999999",
            "+4712345678901234",
            "+47 99999999",
        ];

        for number in &invalid_numbers {
            assert!(PhoneNumber::new(number).is_err());
        }
    }

    #[test]
    fn status_round_trips_through_text() {
        for status in &[
            ReminderStatus::Scheduled,
            ReminderStatus::Dispatching,
            ReminderStatus::Completed,
            ReminderStatus::Failed,
        ] {
            assert_eq!(status.as_str().parse::<ReminderStatus>().unwrap(), *status);
        }
        assert!("snoozed".parse::<ReminderStatus>().is_err());
    }

    #[test]
    fn validates_title_and_message_bounds() {
        assert!(Reminder::is_valid_title("Dentist"));
        assert!(!Reminder::is_valid_title(""));
        assert!(!Reminder::is_valid_title(&"x".repeat(101)));
        assert!(Reminder::is_valid_message(&"x".repeat(500)));
        assert!(!Reminder::is_valid_message(&"x".repeat(501)));
    }
}
