use crate::error::CallmeError;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpResponse};
use callme_api_structs::dtos::ReminderDTO;
use callme_api_structs::get_reminders::*;
use callme_domain::Reminder;
use callme_infra::CallmeContext;

pub async fn get_reminders_controller(
    ctx: web::Data<CallmeContext>,
) -> Result<HttpResponse, CallmeError> {
    execute(GetRemindersUseCase {}, &ctx)
        .await
        .map(|reminders| {
            HttpResponse::Ok().json(
                reminders
                    .into_iter()
                    .map(ReminderDTO::new)
                    .collect::<APIResponse>(),
            )
        })
        .map_err(CallmeError::from)
}

#[derive(Debug)]
pub struct GetRemindersUseCase {}

#[derive(Debug)]
pub enum UseCaseError {}

impl From<UseCaseError> for CallmeError {
    fn from(e: UseCaseError) -> Self {
        match e {}
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for GetRemindersUseCase {
    type Response = Vec<Reminder>;

    type Errors = UseCaseError;

    async fn execute(&mut self, ctx: &CallmeContext) -> Result<Self::Response, Self::Errors> {
        Ok(ctx.repos.reminders.find_all().await)
    }
}
