use callme_domain::{CallLog, CallStatus, Reminder, ReminderStatus, ID};
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ReminderDTO {
    pub id: ID,
    pub title: String,
    pub message: String,
    pub phone_number: String,
    pub scheduled_for: DateTime<Utc>,
    pub timezone: String,
    pub status: ReminderStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ReminderDTO {
    pub fn new(reminder: Reminder) -> Self {
        Self {
            id: reminder.id.clone(),
            title: reminder.title,
            message: reminder.message,
            phone_number: reminder.phone_number.to_string(),
            scheduled_for: millis_to_datetime(reminder.scheduled_for),
            timezone: reminder.timezone.name().to_string(),
            status: reminder.status,
            created_at: millis_to_datetime(reminder.created),
            updated_at: millis_to_datetime(reminder.updated),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CallLogDTO {
    pub id: ID,
    pub reminder_id: ID,
    pub attempted_at: DateTime<Utc>,
    pub status: CallStatus,
    pub response_data: Option<String>,
    pub error_message: Option<String>,
}

impl CallLogDTO {
    pub fn new(log: CallLog) -> Self {
        Self {
            id: log.id.clone(),
            reminder_id: log.reminder_id.clone(),
            attempted_at: millis_to_datetime(log.attempted_at),
            status: log.status,
            response_data: log.response_data,
            error_message: log.error_message,
        }
    }
}

fn millis_to_datetime(ts: i64) -> DateTime<Utc> {
    Utc.timestamp_millis_opt(ts)
        .single()
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}
