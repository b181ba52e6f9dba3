mod call_log;
mod reminder;
mod shared;
mod timezone;

pub use call_log::{CallLog, CallStatus};
pub use reminder::{InvalidPhoneNumberError, InvalidStatusError, PhoneNumber, Reminder, ReminderStatus};
pub use shared::entity::{Entity, ID};
pub use timezone::{parse_scheduled_for, to_absolute, to_local, InvalidTimeError};
