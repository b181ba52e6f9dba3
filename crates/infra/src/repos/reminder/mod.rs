mod inmemory;
mod postgres;

use callme_domain::{Reminder, ID};
pub use inmemory::InMemoryReminderRepo;
pub use postgres::PostgresReminderRepo;

#[async_trait::async_trait]
pub trait IReminderRepo: Send + Sync {
    async fn insert(&self, reminder: &Reminder) -> anyhow::Result<()>;
    async fn save(&self, reminder: &Reminder) -> anyhow::Result<()>;
    async fn find(&self, reminder_id: &ID) -> Option<Reminder>;
    async fn find_all(&self) -> Vec<Reminder>;
    /// Scheduled reminders whose trigger instant has arrived, earliest due
    /// first
    async fn find_due(&self, now: i64) -> Vec<Reminder>;
    /// Atomically move a reminder from `scheduled` to `dispatching`,
    /// stamping `updated` with the claim time. The swap only succeeds when
    /// the row still carries `expected_updated`; every edit bumps that
    /// stamp, so a reminder claimed, edited or deleted since it was
    /// selected is left alone for this tick.
    async fn claim(&self, reminder_id: &ID, expected_updated: i64, now: i64) -> bool;
    /// Hand reminders that have been stuck in `dispatching` since before
    /// `cutoff` back to the scheduler. Returns how many were requeued.
    async fn requeue_dispatching_before(&self, cutoff: i64, now: i64) -> u64;
    async fn delete(&self, reminder_id: &ID) -> Option<Reminder>;
}
