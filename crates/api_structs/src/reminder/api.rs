use crate::dtos::{CallLogDTO, ReminderDTO};
use callme_domain::ID;
use serde::{Deserialize, Serialize};

pub mod get_reminders {
    use super::*;

    pub type APIResponse = Vec<ReminderDTO>;
}

pub mod get_reminder {
    use super::*;

    #[derive(Deserialize)]
    pub struct PathParams {
        pub reminder_id: ID,
    }

    pub type APIResponse = ReminderDTO;
}

pub mod create_reminder {
    use super::*;

    #[derive(Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        pub title: String,
        pub message: String,
        pub phone_number: String,
        /// RFC 3339 instant, or a naive local wall-clock datetime which is
        /// resolved in `timezone`
        pub scheduled_for: String,
        pub timezone: String,
    }

    pub type APIResponse = ReminderDTO;
}

pub mod update_reminder {
    use super::*;

    #[derive(Deserialize)]
    pub struct PathParams {
        pub reminder_id: ID,
    }

    #[derive(Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        pub title: Option<String>,
        pub message: Option<String>,
        pub phone_number: Option<String>,
        pub scheduled_for: Option<String>,
        pub timezone: Option<String>,
    }

    pub type APIResponse = ReminderDTO;
}

pub mod delete_reminder {
    use super::*;

    #[derive(Deserialize)]
    pub struct PathParams {
        pub reminder_id: ID,
    }
}

pub mod get_call_logs {
    use super::*;

    #[derive(Deserialize)]
    pub struct PathParams {
        pub reminder_id: ID,
    }

    pub type APIResponse = Vec<CallLogDTO>;
}

pub mod snooze_reminder {
    use super::*;

    #[derive(Deserialize)]
    pub struct PathParams {
        pub reminder_id: ID,
    }

    #[derive(Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        pub minutes: i64,
    }

    pub type APIResponse = ReminderDTO;
}
