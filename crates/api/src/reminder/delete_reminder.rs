use crate::error::CallmeError;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpResponse};
use callme_api_structs::delete_reminder::*;
use callme_domain::{Reminder, ID};
use callme_infra::CallmeContext;

pub async fn delete_reminder_controller(
    path_params: web::Path<PathParams>,
    ctx: web::Data<CallmeContext>,
) -> Result<HttpResponse, CallmeError> {
    let usecase = DeleteReminderUseCase {
        reminder_id: path_params.reminder_id.clone(),
    };

    execute(usecase, &ctx)
        .await
        .map(|_| HttpResponse::NoContent().finish())
        .map_err(CallmeError::from)
}

#[derive(Debug)]
pub struct DeleteReminderUseCase {
    pub reminder_id: ID,
}

#[derive(Debug)]
pub enum UseCaseError {
    NotFound(ID),
    StorageError,
}

impl From<UseCaseError> for CallmeError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::NotFound(reminder_id) => Self::NotFound(format!(
                "The reminder with id: {}, was not found.",
                reminder_id
            )),
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for DeleteReminderUseCase {
    type Response = Reminder;

    type Errors = UseCaseError;

    async fn execute(&mut self, ctx: &CallmeContext) -> Result<Self::Response, Self::Errors> {
        // The reminder and its call log history go together. Postgres
        // enforces this through the FK cascade; the explicit log delete
        // keeps the in-memory store consistent with that schema.
        ctx.repos
            .call_logs
            .delete_by_reminder(&self.reminder_id)
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        ctx.repos
            .reminders
            .delete(&self.reminder_id)
            .await
            .ok_or_else(|| UseCaseError::NotFound(self.reminder_id.clone()))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use callme_domain::{CallLog, CallStatus, PhoneNumber, ReminderStatus};
    use callme_infra::setup_inmemory_context;

    async fn insert_reminder_with_logs(ctx: &CallmeContext, attempts: usize) -> Reminder {
        let reminder = Reminder {
            id: Default::default(),
            title: "Dentist".into(),
            message: "Leave for the dentist appointment".into(),
            phone_number: PhoneNumber::new("+12025550123").unwrap(),
            scheduled_for: 100,
            timezone: chrono_tz::UTC,
            status: ReminderStatus::Failed,
            created: 0,
            updated: 0,
        };
        ctx.repos.reminders.insert(&reminder).await.unwrap();

        for attempt in 0..attempts {
            let log = CallLog {
                id: Default::default(),
                reminder_id: reminder.id.clone(),
                attempted_at: 100 + attempt as i64,
                status: CallStatus::Failed,
                response_data: None,
                error_message: Some("busy".into()),
            };
            ctx.repos.call_logs.insert(&log).await.unwrap();
        }

        reminder
    }

    #[actix_web::test]
    async fn deletes_the_reminder_and_all_of_its_call_logs() {
        let ctx = setup_inmemory_context();
        let reminder = insert_reminder_with_logs(&ctx, 3).await;

        let usecase = DeleteReminderUseCase {
            reminder_id: reminder.id.clone(),
        };
        let deleted = execute(usecase, &ctx).await.unwrap();
        assert_eq!(deleted.id, reminder.id);

        assert_eq!(ctx.repos.reminders.find(&reminder.id).await, None);
        assert!(ctx
            .repos
            .call_logs
            .find_by_reminder(&reminder.id)
            .await
            .is_empty());
    }

    #[actix_web::test]
    async fn deleting_one_reminder_leaves_other_logs_alone() {
        let ctx = setup_inmemory_context();
        let doomed = insert_reminder_with_logs(&ctx, 2).await;
        let survivor = insert_reminder_with_logs(&ctx, 1).await;

        let usecase = DeleteReminderUseCase {
            reminder_id: doomed.id.clone(),
        };
        execute(usecase, &ctx).await.unwrap();

        assert_eq!(
            ctx.repos.call_logs.find_by_reminder(&survivor.id).await.len(),
            1
        );
    }

    #[actix_web::test]
    async fn rejects_unknown_reminder_ids() {
        let ctx = setup_inmemory_context();

        let usecase = DeleteReminderUseCase {
            reminder_id: ID::default(),
        };
        let res = execute(usecase, &ctx).await;
        assert!(matches!(res.unwrap_err(), UseCaseError::NotFound(_)));
    }
}
