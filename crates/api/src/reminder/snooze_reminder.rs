use crate::error::CallmeError;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpResponse};
use callme_api_structs::snooze_reminder::*;
use callme_domain::{Reminder, ReminderStatus, ID};
use callme_infra::CallmeContext;

pub async fn snooze_reminder_controller(
    path_params: web::Path<PathParams>,
    body: web::Json<RequestBody>,
    ctx: web::Data<CallmeContext>,
) -> Result<HttpResponse, CallmeError> {
    let usecase = SnoozeReminderUseCase {
        reminder_id: path_params.reminder_id.clone(),
        minutes: body.minutes,
    };

    execute(usecase, &ctx)
        .await
        .map(|reminder| HttpResponse::Ok().json(APIResponse::new(reminder)))
        .map_err(CallmeError::from)
}

#[derive(Debug)]
pub struct SnoozeReminderUseCase {
    pub reminder_id: ID,
    pub minutes: i64,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    NotFound(ID),
    NotSnoozable(ID),
    InvalidDuration(i64),
    StorageError,
}

impl From<UseCaseError> for CallmeError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::NotFound(reminder_id) => Self::NotFound(format!(
                "The reminder with id: {}, was not found.",
                reminder_id
            )),
            UseCaseError::NotSnoozable(reminder_id) => Self::Conflict(format!(
                "The reminder with id: {} has to be completed or failed to be snoozed.",
                reminder_id
            )),
            UseCaseError::InvalidDuration(minutes) => Self::BadClientData(format!(
                "Cannot snooze a reminder by {} minutes",
                minutes
            )),
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for SnoozeReminderUseCase {
    type Response = Reminder;

    type Errors = UseCaseError;

    async fn execute(&mut self, ctx: &CallmeContext) -> Result<Self::Response, Self::Errors> {
        if self.minutes <= 0 {
            return Err(UseCaseError::InvalidDuration(self.minutes));
        }

        let mut reminder = match ctx.repos.reminders.find(&self.reminder_id).await {
            Some(reminder) => reminder,
            None => return Err(UseCaseError::NotFound(self.reminder_id.clone())),
        };

        // Snooze reopens a reminder whose attempt already happened. A
        // scheduled or in-flight reminder has nothing to reopen.
        match reminder.status {
            ReminderStatus::Completed | ReminderStatus::Failed => {}
            _ => return Err(UseCaseError::NotSnoozable(self.reminder_id.clone())),
        }

        let now = ctx.sys.get_timestamp_millis();
        reminder.status = ReminderStatus::Scheduled;
        reminder.scheduled_for = now + self.minutes * 60 * 1000;
        reminder.updated = now;

        // No call log entry here, snooze is not an attempt
        ctx.repos
            .reminders
            .save(&reminder)
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        Ok(reminder)
    }
}
