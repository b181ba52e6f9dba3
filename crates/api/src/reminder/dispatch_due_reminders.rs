use crate::shared::usecase::UseCase;
use actix_web::rt::time::timeout;
use callme_domain::{CallLog, CallStatus, Reminder, ReminderStatus};
use callme_infra::CallmeContext;
use futures::stream::{self, StreamExt};
use std::time::Duration;
use tracing::{error, info, warn};

/// One tick of the due-set scheduler: claim every scheduled reminder whose
/// trigger instant has arrived and place the calls.
#[derive(Debug)]
pub struct DispatchDueRemindersUseCase;

#[derive(Debug)]
pub enum UseCaseError {}

#[derive(Debug, Default, PartialEq)]
pub struct DispatchSummary {
    pub claimed: usize,
    pub completed: usize,
    pub failed: usize,
}

#[async_trait::async_trait(?Send)]
impl UseCase for DispatchDueRemindersUseCase {
    type Response = DispatchSummary;

    type Errors = UseCaseError;

    async fn execute(&mut self, ctx: &CallmeContext) -> Result<Self::Response, Self::Errors> {
        let now = ctx.sys.get_timestamp_millis();
        let due = ctx.repos.reminders.find_due(now).await;

        // Claim in ascending scheduled_for order. A lost claim means another
        // tick, an edit or a delete got there first and the reminder is not
        // ours to dispatch.
        let mut claimed = Vec::new();
        for mut reminder in due {
            if ctx
                .repos
                .reminders
                .claim(&reminder.id, reminder.updated, now)
                .await
            {
                reminder.status = ReminderStatus::Dispatching;
                reminder.updated = now;
                claimed.push(reminder);
            }
        }

        let mut summary = DispatchSummary {
            claimed: claimed.len(),
            ..Default::default()
        };
        if claimed.is_empty() {
            return Ok(summary);
        }
        info!("Dispatching {} due reminder(s)", summary.claimed);

        // Calls are I/O bound with wildly varying latency, so they run
        // concurrently under a bounded pool and may finish in any order.
        let outcomes = stream::iter(claimed)
            .map(|reminder| dispatch_call(reminder, ctx))
            .buffer_unordered(ctx.config.dispatch_concurrency)
            .collect::<Vec<_>>()
            .await;

        for outcome in outcomes {
            match outcome {
                CallStatus::Success => summary.completed += 1,
                CallStatus::Failed => summary.failed += 1,
            }
        }

        Ok(summary)
    }
}

/// A single call attempt for one claimed reminder. The outcome always
/// becomes data on the reminder, it never propagates out of the tick.
async fn dispatch_call(mut reminder: Reminder, ctx: &CallmeContext) -> CallStatus {
    let call_timeout = Duration::from_secs(ctx.config.call_timeout_secs);
    let result = timeout(
        call_timeout,
        ctx.telephony
            .place_call(reminder.phone_number.as_str(), &reminder.message),
    )
    .await;

    let attempted_at = ctx.sys.get_timestamp_millis();
    let (status, response_data, error_message) = match result {
        Ok(Ok(response)) => (CallStatus::Success, response.response_data, None),
        Ok(Err(e)) => {
            warn!("Call for reminder {} failed: {}", reminder.id, e);
            (CallStatus::Failed, None, Some(e.to_string()))
        }
        Err(_) => {
            warn!(
                "Call for reminder {} got no answer from the provider within {:?}",
                reminder.id, call_timeout
            );
            (CallStatus::Failed, None, Some("timeout".to_string()))
        }
    };

    let log = CallLog {
        id: Default::default(),
        reminder_id: reminder.id.clone(),
        attempted_at,
        status,
        response_data,
        error_message,
    };
    // Log before status: a crash in between leaves the reminder in
    // `dispatching` for the recovery sweep instead of producing a terminal
    // status with no attempt on record.
    if let Err(e) = ctx.repos.call_logs.insert(&log).await {
        error!(
            "Could not append call log for reminder {}: {:?}",
            reminder.id, e
        );
    }

    reminder.status = match status {
        CallStatus::Success => ReminderStatus::Completed,
        CallStatus::Failed => ReminderStatus::Failed,
    };
    reminder.updated = attempted_at;
    if let Err(e) = ctx.repos.reminders.save(&reminder).await {
        error!(
            "Could not record call outcome for reminder {}: {:?}",
            reminder.id, e
        );
    }

    status
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::shared::usecase::execute;
    use callme_domain::PhoneNumber;
    use callme_infra::{
        setup_inmemory_context, CallResponse, ISys, ITelephonyService, TelephonyError,
    };
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct StaticTimeSys;
    impl ISys for StaticTimeSys {
        fn get_timestamp_millis(&self) -> i64 {
            1717243200000 // Sat Jun 01 2024 12:00:00 GMT+0000
        }
    }

    struct CountingTelephony {
        calls: AtomicUsize,
        fail_with: Option<String>,
    }

    impl CountingTelephony {
        fn succeeding() -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                fail_with: None,
            })
        }

        fn failing(reason: &str) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                fail_with: Some(reason.to_string()),
            })
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait::async_trait]
    impl ITelephonyService for CountingTelephony {
        async fn place_call(
            &self,
            _phone_number: &str,
            _message: &str,
        ) -> Result<CallResponse, TelephonyError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.fail_with {
                Some(reason) => Err(TelephonyError::Provider(reason.clone())),
                None => Ok(CallResponse {
                    response_data: Some("{\"call\":\"queued\"}".into()),
                }),
            }
        }
    }

    /// Provider that never answers, for exercising the call timeout
    struct SilentTelephony;

    #[async_trait::async_trait]
    impl ITelephonyService for SilentTelephony {
        async fn place_call(
            &self,
            _phone_number: &str,
            _message: &str,
        ) -> Result<CallResponse, TelephonyError> {
            futures::future::pending().await
        }
    }

    fn setup() -> CallmeContext {
        let mut ctx = setup_inmemory_context();
        ctx.sys = Arc::new(StaticTimeSys {});
        ctx
    }

    async fn insert_reminder_scheduled_at(ctx: &CallmeContext, scheduled_for: i64) -> Reminder {
        let reminder = Reminder {
            id: Default::default(),
            title: "Dentist".into(),
            message: "Leave for the dentist appointment".into(),
            phone_number: PhoneNumber::new("+12025550123").unwrap(),
            scheduled_for,
            timezone: chrono_tz::America::New_York,
            status: ReminderStatus::Scheduled,
            created: scheduled_for - 1000,
            updated: scheduled_for - 1000,
        };
        ctx.repos.reminders.insert(&reminder).await.unwrap();
        reminder
    }

    #[actix_web::test]
    async fn completes_a_due_reminder_and_appends_exactly_one_log() {
        let mut ctx = setup();
        let telephony = CountingTelephony::succeeding();
        ctx.telephony = telephony.clone();

        let now = ctx.sys.get_timestamp_millis();
        let reminder = insert_reminder_scheduled_at(&ctx, now - 1000).await;

        let summary = execute(DispatchDueRemindersUseCase, &ctx).await.unwrap();
        assert_eq!(
            summary,
            DispatchSummary {
                claimed: 1,
                completed: 1,
                failed: 0
            }
        );

        let dispatched = ctx.repos.reminders.find(&reminder.id).await.unwrap();
        assert_eq!(dispatched.status, ReminderStatus::Completed);
        assert_eq!(dispatched.updated, now);

        let logs = ctx.repos.call_logs.find_by_reminder(&reminder.id).await;
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].status, CallStatus::Success);
        assert_eq!(logs[0].response_data, Some("{\"call\":\"queued\"}".into()));
        assert_eq!(logs[0].error_message, None);
    }

    #[actix_web::test]
    async fn a_rejected_call_marks_the_reminder_failed() {
        let mut ctx = setup();
        ctx.telephony = CountingTelephony::failing("line busy");

        let now = ctx.sys.get_timestamp_millis();
        let reminder = insert_reminder_scheduled_at(&ctx, now - 1000).await;

        let summary = execute(DispatchDueRemindersUseCase, &ctx).await.unwrap();
        assert_eq!(summary.failed, 1);

        let dispatched = ctx.repos.reminders.find(&reminder.id).await.unwrap();
        assert_eq!(dispatched.status, ReminderStatus::Failed);

        let logs = ctx.repos.call_logs.find_by_reminder(&reminder.id).await;
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].status, CallStatus::Failed);
        assert_eq!(
            logs[0].error_message,
            Some("Telephony provider rejected the call: line busy".into())
        );
    }

    #[actix_web::test]
    async fn a_call_that_never_answers_fails_with_a_timeout() {
        let mut ctx = setup();
        ctx.telephony = Arc::new(SilentTelephony);
        ctx.config.call_timeout_secs = 0;

        let now = ctx.sys.get_timestamp_millis();
        let reminder = insert_reminder_scheduled_at(&ctx, now - 1000).await;

        let summary = execute(DispatchDueRemindersUseCase, &ctx).await.unwrap();
        assert_eq!(summary.failed, 1);

        let logs = ctx.repos.call_logs.find_by_reminder(&reminder.id).await;
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].error_message, Some("timeout".into()));
    }

    #[actix_web::test]
    async fn a_second_tick_does_not_redial() {
        let mut ctx = setup();
        let telephony = CountingTelephony::succeeding();
        ctx.telephony = telephony.clone();

        let now = ctx.sys.get_timestamp_millis();
        let reminder = insert_reminder_scheduled_at(&ctx, now - 1000).await;

        execute(DispatchDueRemindersUseCase, &ctx).await.unwrap();
        let summary = execute(DispatchDueRemindersUseCase, &ctx).await.unwrap();

        assert_eq!(summary, DispatchSummary::default());
        assert_eq!(telephony.call_count(), 1);
        assert_eq!(
            ctx.repos.call_logs.find_by_reminder(&reminder.id).await.len(),
            1
        );
    }

    #[actix_web::test]
    async fn reminders_that_are_not_due_yet_are_left_alone() {
        let mut ctx = setup();
        let telephony = CountingTelephony::succeeding();
        ctx.telephony = telephony.clone();

        let now = ctx.sys.get_timestamp_millis();
        let reminder = insert_reminder_scheduled_at(&ctx, now + 60 * 1000).await;

        let summary = execute(DispatchDueRemindersUseCase, &ctx).await.unwrap();
        assert_eq!(summary, DispatchSummary::default());
        assert_eq!(telephony.call_count(), 0);
        assert_eq!(
            ctx.repos.reminders.find(&reminder.id).await.unwrap().status,
            ReminderStatus::Scheduled
        );
    }

    #[actix_web::test]
    async fn dispatches_every_due_reminder_in_one_tick() {
        let mut ctx = setup();
        let telephony = CountingTelephony::succeeding();
        ctx.telephony = telephony.clone();

        let now = ctx.sys.get_timestamp_millis();
        for offset in &[1000, 2000, 3000] {
            insert_reminder_scheduled_at(&ctx, now - offset).await;
        }
        insert_reminder_scheduled_at(&ctx, now + 60 * 1000).await;

        let summary = execute(DispatchDueRemindersUseCase, &ctx).await.unwrap();
        assert_eq!(
            summary,
            DispatchSummary {
                claimed: 3,
                completed: 3,
                failed: 0
            }
        );
        assert_eq!(telephony.call_count(), 3);
    }

    #[actix_web::test]
    async fn a_reminder_claimed_by_another_actor_is_skipped() {
        let mut ctx = setup();
        let telephony = CountingTelephony::succeeding();
        ctx.telephony = telephony.clone();

        let now = ctx.sys.get_timestamp_millis();
        let reminder = insert_reminder_scheduled_at(&ctx, now - 1000).await;

        // Another scheduler instance wins the claim between our due query
        // and our claim attempt
        assert!(
            ctx.repos
                .reminders
                .claim(&reminder.id, reminder.updated, now)
                .await
        );

        let summary = execute(DispatchDueRemindersUseCase, &ctx).await.unwrap();
        assert_eq!(summary, DispatchSummary::default());
        assert_eq!(telephony.call_count(), 0);
    }
}
