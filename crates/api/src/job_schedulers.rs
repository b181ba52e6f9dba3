use crate::reminder::dispatch_due_reminders::DispatchDueRemindersUseCase;
use crate::reminder::requeue_stuck_dispatches::RequeueStuckDispatchesUseCase;
use crate::shared::usecase::execute;
use actix_web::rt::time::interval;
use callme_infra::CallmeContext;
use std::time::Duration;

const RECOVERY_SWEEP_INTERVAL_SECS: u64 = 60;

/// Drives the due-set scheduler. A recurring poll over the persisted store
/// instead of one timer per reminder: the due comparison happens against the
/// wall clock at tick time, so restarts and clock adjustments delay a
/// dispatch by at most one tick and never skip one.
pub fn start_call_dispatch_job(ctx: CallmeContext) {
    actix_web::rt::spawn(async move {
        let mut tick = interval(Duration::from_secs(ctx.config.scheduler_tick_interval_secs));
        loop {
            tick.tick().await;
            let _ = execute(DispatchDueRemindersUseCase, &ctx).await;
        }
    });
}

/// Sweeps reminders whose dispatch died before recording an outcome back
/// into the scheduler's reach.
pub fn start_dispatch_recovery_job(ctx: CallmeContext) {
    actix_web::rt::spawn(async move {
        let mut tick = interval(Duration::from_secs(RECOVERY_SWEEP_INTERVAL_SECS));
        loop {
            tick.tick().await;
            let _ = execute(RequeueStuckDispatchesUseCase, &ctx).await;
        }
    });
}
