use super::ICallLogRepo;
use crate::repos::shared::inmemory_repo::*;
use crate::repos::shared::repo::DeleteResult;
use callme_domain::{CallLog, ID};

pub struct InMemoryCallLogRepo {
    call_logs: std::sync::Mutex<Vec<CallLog>>,
}

impl InMemoryCallLogRepo {
    pub fn new() -> Self {
        Self {
            call_logs: std::sync::Mutex::new(Vec::new()),
        }
    }
}

#[async_trait::async_trait]
impl ICallLogRepo for InMemoryCallLogRepo {
    async fn insert(&self, log: &CallLog) -> anyhow::Result<()> {
        insert(log, &self.call_logs);
        Ok(())
    }

    async fn find_by_reminder(&self, reminder_id: &ID) -> Vec<CallLog> {
        let mut logs = find_by(&self.call_logs, |log: &CallLog| {
            log.reminder_id == *reminder_id
        });
        logs.sort_by_key(|log| log.attempted_at);
        logs
    }

    async fn delete_by_reminder(&self, reminder_id: &ID) -> anyhow::Result<DeleteResult> {
        Ok(delete_by(&self.call_logs, |log: &CallLog| {
            log.reminder_id == *reminder_id
        }))
    }
}
