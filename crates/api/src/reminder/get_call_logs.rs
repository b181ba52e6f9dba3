use crate::error::CallmeError;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpResponse};
use callme_api_structs::dtos::CallLogDTO;
use callme_api_structs::get_call_logs::*;
use callme_domain::{CallLog, ID};
use callme_infra::CallmeContext;

pub async fn get_call_logs_controller(
    path_params: web::Path<PathParams>,
    ctx: web::Data<CallmeContext>,
) -> Result<HttpResponse, CallmeError> {
    let usecase = GetCallLogsUseCase {
        reminder_id: path_params.reminder_id.clone(),
    };

    execute(usecase, &ctx)
        .await
        .map(|logs| {
            HttpResponse::Ok().json(
                logs.into_iter()
                    .map(CallLogDTO::new)
                    .collect::<APIResponse>(),
            )
        })
        .map_err(CallmeError::from)
}

#[derive(Debug)]
pub struct GetCallLogsUseCase {
    pub reminder_id: ID,
}

#[derive(Debug)]
pub enum UseCaseError {
    NotFound(ID),
}

impl From<UseCaseError> for CallmeError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::NotFound(reminder_id) => Self::NotFound(format!(
                "The reminder with id: {}, was not found.",
                reminder_id
            )),
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for GetCallLogsUseCase {
    type Response = Vec<CallLog>;

    type Errors = UseCaseError;

    async fn execute(&mut self, ctx: &CallmeContext) -> Result<Self::Response, Self::Errors> {
        if ctx.repos.reminders.find(&self.reminder_id).await.is_none() {
            return Err(UseCaseError::NotFound(self.reminder_id.clone()));
        }

        Ok(ctx.repos.call_logs.find_by_reminder(&self.reminder_id).await)
    }
}
