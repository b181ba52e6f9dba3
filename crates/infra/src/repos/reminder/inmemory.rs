use super::IReminderRepo;
use crate::repos::shared::inmemory_repo::*;
use callme_domain::{Reminder, ReminderStatus, ID};

pub struct InMemoryReminderRepo {
    reminders: std::sync::Mutex<Vec<Reminder>>,
}

impl InMemoryReminderRepo {
    pub fn new() -> Self {
        Self {
            reminders: std::sync::Mutex::new(Vec::new()),
        }
    }
}

#[async_trait::async_trait]
impl IReminderRepo for InMemoryReminderRepo {
    async fn insert(&self, reminder: &Reminder) -> anyhow::Result<()> {
        insert(reminder, &self.reminders);
        Ok(())
    }

    async fn save(&self, reminder: &Reminder) -> anyhow::Result<()> {
        save(reminder, &self.reminders);
        Ok(())
    }

    async fn find(&self, reminder_id: &ID) -> Option<Reminder> {
        find(reminder_id, &self.reminders)
    }

    async fn find_all(&self) -> Vec<Reminder> {
        let mut reminders = find_by(&self.reminders, |_| true);
        reminders.sort_by_key(|r| r.created);
        reminders
    }

    async fn find_due(&self, now: i64) -> Vec<Reminder> {
        let mut due = find_by(&self.reminders, |r: &Reminder| {
            r.status == ReminderStatus::Scheduled && r.scheduled_for <= now
        });
        due.sort_by_key(|r| r.scheduled_for);
        due
    }

    async fn claim(&self, reminder_id: &ID, expected_updated: i64, now: i64) -> bool {
        // The conditional check and the status write happen under one lock,
        // which is what makes the claim a linearization point.
        let mut reminders = self.reminders.lock().unwrap();
        match reminders.iter_mut().find(|r| r.id == *reminder_id) {
            Some(reminder)
                if reminder.status == ReminderStatus::Scheduled
                    && reminder.updated == expected_updated =>
            {
                reminder.status = ReminderStatus::Dispatching;
                reminder.updated = now;
                true
            }
            _ => false,
        }
    }

    async fn requeue_dispatching_before(&self, cutoff: i64, now: i64) -> u64 {
        update_many(
            &self.reminders,
            |r: &Reminder| r.status == ReminderStatus::Dispatching && r.updated <= cutoff,
            |r| {
                r.status = ReminderStatus::Scheduled;
                r.updated = now;
            },
        ) as u64
    }

    async fn delete(&self, reminder_id: &ID) -> Option<Reminder> {
        delete(reminder_id, &self.reminders)
    }
}
