use crate::error::CallmeError;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpResponse};
use callme_api_structs::update_reminder::*;
use callme_domain::{parse_scheduled_for, PhoneNumber, Reminder, ReminderStatus, ID};
use callme_infra::CallmeContext;
use chrono_tz::Tz;

pub async fn update_reminder_controller(
    path_params: web::Path<PathParams>,
    body: web::Json<RequestBody>,
    ctx: web::Data<CallmeContext>,
) -> Result<HttpResponse, CallmeError> {
    let body = body.0;
    let usecase = UpdateReminderUseCase {
        reminder_id: path_params.reminder_id.clone(),
        title: body.title,
        message: body.message,
        phone_number: body.phone_number,
        scheduled_for: body.scheduled_for,
        timezone: body.timezone,
    };

    execute(usecase, &ctx)
        .await
        .map(|reminder| HttpResponse::Ok().json(APIResponse::new(reminder)))
        .map_err(CallmeError::from)
}

#[derive(Debug)]
pub struct UpdateReminderUseCase {
    pub reminder_id: ID,
    pub title: Option<String>,
    pub message: Option<String>,
    pub phone_number: Option<String>,
    pub scheduled_for: Option<String>,
    pub timezone: Option<String>,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    NotFound(ID),
    NotEditable(ID),
    InvalidTitle,
    InvalidMessage,
    InvalidPhoneNumber(String),
    InvalidTimezone(String),
    InvalidScheduledTime(String),
    ScheduledTimeNotInFuture,
    StorageError,
}

impl From<UseCaseError> for CallmeError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::NotFound(reminder_id) => Self::NotFound(format!(
                "The reminder with id: {}, was not found.",
                reminder_id
            )),
            UseCaseError::NotEditable(reminder_id) => Self::Conflict(format!(
                "The reminder with id: {} can only be edited while it is scheduled.",
                reminder_id
            )),
            UseCaseError::InvalidTitle => Self::BadClientData(format!(
                "The title has to be between 1 and {} characters long",
                Reminder::TITLE_MAX_LEN
            )),
            UseCaseError::InvalidMessage => Self::BadClientData(format!(
                "The message has to be between 1 and {} characters long",
                Reminder::MESSAGE_MAX_LEN
            )),
            UseCaseError::InvalidPhoneNumber(phone_number) => Self::BadClientData(format!(
                "The phone number: {} is not a valid E.164 number",
                phone_number
            )),
            UseCaseError::InvalidTimezone(timezone) => Self::BadClientData(format!(
                "The timezone: {} is not a valid IANA timezone identifier",
                timezone
            )),
            UseCaseError::InvalidScheduledTime(reason) => Self::BadClientData(reason),
            UseCaseError::ScheduledTimeNotInFuture => {
                Self::BadClientData("The scheduled time has to be in the future".into())
            }
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for UpdateReminderUseCase {
    type Response = Reminder;

    type Errors = UseCaseError;

    async fn execute(&mut self, ctx: &CallmeContext) -> Result<Self::Response, Self::Errors> {
        let mut reminder = match ctx.repos.reminders.find(&self.reminder_id).await {
            Some(reminder) => reminder,
            None => return Err(UseCaseError::NotFound(self.reminder_id.clone())),
        };

        // Field edits are only allowed before dispatch. Status transitions
        // (dispatch outcome, snooze) have their own paths and never go
        // through here.
        if reminder.status != ReminderStatus::Scheduled {
            return Err(UseCaseError::NotEditable(self.reminder_id.clone()));
        }

        if let Some(title) = &self.title {
            if !Reminder::is_valid_title(title) {
                return Err(UseCaseError::InvalidTitle);
            }
            reminder.title = title.clone();
        }
        if let Some(message) = &self.message {
            if !Reminder::is_valid_message(message) {
                return Err(UseCaseError::InvalidMessage);
            }
            reminder.message = message.clone();
        }
        if let Some(phone_number) = &self.phone_number {
            reminder.phone_number = PhoneNumber::new(phone_number)
                .map_err(|_| UseCaseError::InvalidPhoneNumber(phone_number.clone()))?;
        }
        if let Some(timezone) = &self.timezone {
            // Changing the timezone alone never moves the stored instant,
            // it only affects how new local times below are interpreted
            reminder.timezone = timezone
                .parse::<Tz>()
                .map_err(|_| UseCaseError::InvalidTimezone(timezone.clone()))?;
        }
        if let Some(scheduled_for) = &self.scheduled_for {
            let instant = parse_scheduled_for(scheduled_for, reminder.timezone)
                .map_err(|e| UseCaseError::InvalidScheduledTime(e.to_string()))?
                .timestamp_millis();
            if instant <= ctx.sys.get_timestamp_millis() {
                return Err(UseCaseError::ScheduledTimeNotInFuture);
            }
            reminder.scheduled_for = instant;
        }

        reminder.updated = ctx.sys.get_timestamp_millis();

        ctx.repos
            .reminders
            .save(&reminder)
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        Ok(reminder)
    }
}
