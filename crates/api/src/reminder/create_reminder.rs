use crate::error::CallmeError;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpResponse};
use callme_api_structs::create_reminder::*;
use callme_domain::{parse_scheduled_for, PhoneNumber, Reminder, ReminderStatus};
use callme_infra::CallmeContext;
use chrono_tz::Tz;

pub async fn create_reminder_controller(
    body: web::Json<RequestBody>,
    ctx: web::Data<CallmeContext>,
) -> Result<HttpResponse, CallmeError> {
    let body = body.0;
    let usecase = CreateReminderUseCase {
        title: body.title,
        message: body.message,
        phone_number: body.phone_number,
        scheduled_for: body.scheduled_for,
        timezone: body.timezone,
    };

    execute(usecase, &ctx)
        .await
        .map(|reminder| HttpResponse::Created().json(APIResponse::new(reminder)))
        .map_err(CallmeError::from)
}

#[derive(Debug)]
pub struct CreateReminderUseCase {
    pub title: String,
    pub message: String,
    pub phone_number: String,
    pub scheduled_for: String,
    pub timezone: String,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
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
impl UseCase for CreateReminderUseCase {
    type Response = Reminder;

    type Errors = UseCaseError;

    async fn execute(&mut self, ctx: &CallmeContext) -> Result<Self::Response, Self::Errors> {
        if !Reminder::is_valid_title(&self.title) {
            return Err(UseCaseError::InvalidTitle);
        }
        if !Reminder::is_valid_message(&self.message) {
            return Err(UseCaseError::InvalidMessage);
        }
        let phone_number = PhoneNumber::new(&self.phone_number)
            .map_err(|_| UseCaseError::InvalidPhoneNumber(self.phone_number.clone()))?;
        let timezone: Tz = self
            .timezone
            .parse()
            .map_err(|_| UseCaseError::InvalidTimezone(self.timezone.clone()))?;
        let scheduled_for = parse_scheduled_for(&self.scheduled_for, timezone)
            .map_err(|e| UseCaseError::InvalidScheduledTime(e.to_string()))?
            .timestamp_millis();

        let now = ctx.sys.get_timestamp_millis();
        if scheduled_for <= now {
            return Err(UseCaseError::ScheduledTimeNotInFuture);
        }

        let reminder = Reminder {
            id: Default::default(),
            title: self.title.clone(),
            message: self.message.clone(),
            phone_number,
            scheduled_for,
            timezone,
            status: ReminderStatus::Scheduled,
            created: now,
            updated: now,
        };

        ctx.repos
            .reminders
            .insert(&reminder)
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        Ok(reminder)
    }
}
