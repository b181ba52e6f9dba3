use crate::shared::usecase::UseCase;
use callme_infra::CallmeContext;
use tracing::warn;

/// Recovery sweep for crashes mid-dispatch: reminders claimed longer ago
/// than the requeue age whose outcome was never recorded go back to the
/// scheduler so the next tick can claim them again.
#[derive(Debug)]
pub struct RequeueStuckDispatchesUseCase;

#[derive(Debug)]
pub enum UseCaseError {}

#[async_trait::async_trait(?Send)]
impl UseCase for RequeueStuckDispatchesUseCase {
    type Response = u64;

    type Errors = UseCaseError;

    async fn execute(&mut self, ctx: &CallmeContext) -> Result<Self::Response, Self::Errors> {
        let now = ctx.sys.get_timestamp_millis();
        let cutoff = now - (ctx.config.dispatching_requeue_secs as i64) * 1000;

        let requeued = ctx
            .repos
            .reminders
            .requeue_dispatching_before(cutoff, now)
            .await;
        if requeued > 0 {
            warn!(
                "Requeued {} reminder(s) that were stuck in dispatching",
                requeued
            );
        }

        Ok(requeued)
    }
}
