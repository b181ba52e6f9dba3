mod inmemory;
mod postgres;

use crate::repos::shared::repo::DeleteResult;
use callme_domain::{CallLog, ID};
pub use inmemory::InMemoryCallLogRepo;
pub use postgres::PostgresCallLogRepo;

#[async_trait::async_trait]
pub trait ICallLogRepo: Send + Sync {
    async fn insert(&self, log: &CallLog) -> anyhow::Result<()>;
    /// Attempts for one reminder, oldest first
    async fn find_by_reminder(&self, reminder_id: &ID) -> Vec<CallLog>;
    async fn delete_by_reminder(&self, reminder_id: &ID) -> anyhow::Result<DeleteResult>;
}
