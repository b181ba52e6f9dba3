use super::IReminderRepo;
use callme_domain::{PhoneNumber, Reminder, ReminderStatus, ID};
use sqlx::{FromRow, PgPool};
use std::convert::{TryFrom, TryInto};
use tracing::error;
use uuid::Uuid;

pub struct PostgresReminderRepo {
    pool: PgPool,
}

impl PostgresReminderRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct ReminderRaw {
    reminder_uid: Uuid,
    title: String,
    message: String,
    phone_number: String,
    scheduled_for: i64,
    timezone: String,
    status: String,
    created: i64,
    updated: i64,
}

impl TryFrom<ReminderRaw> for Reminder {
    type Error = anyhow::Error;

    fn try_from(raw: ReminderRaw) -> anyhow::Result<Self> {
        Ok(Self {
            id: ID::from(raw.reminder_uid),
            title: raw.title,
            message: raw.message,
            phone_number: PhoneNumber::new(&raw.phone_number)?,
            scheduled_for: raw.scheduled_for,
            timezone: raw.timezone.parse().map_err(anyhow::Error::msg)?,
            status: raw.status.parse()?,
            created: raw.created,
            updated: raw.updated,
        })
    }
}

#[async_trait::async_trait]
impl IReminderRepo for PostgresReminderRepo {
    async fn insert(&self, reminder: &Reminder) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO reminders
            (reminder_uid, title, message, phone_number, scheduled_for, timezone, status, created, updated)
            VALUES($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(reminder.id.inner_ref())
        .bind(&reminder.title)
        .bind(&reminder.message)
        .bind(reminder.phone_number.as_str())
        .bind(reminder.scheduled_for)
        .bind(reminder.timezone.name())
        .bind(reminder.status.as_str())
        .bind(reminder.created)
        .bind(reminder.updated)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn save(&self, reminder: &Reminder) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            UPDATE reminders SET
                title = $2,
                message = $3,
                phone_number = $4,
                scheduled_for = $5,
                timezone = $6,
                status = $7,
                updated = $8
            WHERE reminder_uid = $1
            "#,
        )
        .bind(reminder.id.inner_ref())
        .bind(&reminder.title)
        .bind(&reminder.message)
        .bind(reminder.phone_number.as_str())
        .bind(reminder.scheduled_for)
        .bind(reminder.timezone.name())
        .bind(reminder.status.as_str())
        .bind(reminder.updated)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find(&self, reminder_id: &ID) -> Option<Reminder> {
        sqlx::query_as::<_, ReminderRaw>(
            r#"
            SELECT * FROM reminders
            WHERE reminder_uid = $1
            "#,
        )
        .bind(reminder_id.inner_ref())
        .fetch_optional(&self.pool)
        .await
        .ok()
        .flatten()
        .and_then(|raw| raw.try_into().ok())
    }

    async fn find_all(&self) -> Vec<Reminder> {
        sqlx::query_as::<_, ReminderRaw>(
            r#"
            SELECT * FROM reminders
            ORDER BY created ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .unwrap_or_default()
        .into_iter()
        .filter_map(|raw| raw.try_into().ok())
        .collect()
    }

    async fn find_due(&self, now: i64) -> Vec<Reminder> {
        sqlx::query_as::<_, ReminderRaw>(
            r#"
            SELECT * FROM reminders
            WHERE status = $1 AND scheduled_for <= $2
            ORDER BY scheduled_for ASC
            "#,
        )
        .bind(ReminderStatus::Scheduled.as_str())
        .bind(now)
        .fetch_all(&self.pool)
        .await
        .unwrap_or_default()
        .into_iter()
        .filter_map(|raw| raw.try_into().ok())
        .collect()
    }

    async fn claim(&self, reminder_id: &ID, expected_updated: i64, now: i64) -> bool {
        // Compare-and-swap on (status, updated): the row either transitions
        // exactly once or the claim is lost to whoever touched it first.
        let res = sqlx::query(
            r#"
            UPDATE reminders SET
                status = $3,
                updated = $2
            WHERE reminder_uid = $1 AND status = $4 AND updated = $5
            "#,
        )
        .bind(reminder_id.inner_ref())
        .bind(now)
        .bind(ReminderStatus::Dispatching.as_str())
        .bind(ReminderStatus::Scheduled.as_str())
        .bind(expected_updated)
        .execute(&self.pool)
        .await;

        match res {
            Ok(done) => done.rows_affected() == 1,
            Err(e) => {
                error!("Claim for reminder {} failed: {:?}", reminder_id, e);
                false
            }
        }
    }

    async fn requeue_dispatching_before(&self, cutoff: i64, now: i64) -> u64 {
        sqlx::query(
            r#"
            UPDATE reminders SET
                status = $3,
                updated = $2
            WHERE status = $4 AND updated <= $1
            "#,
        )
        .bind(cutoff)
        .bind(now)
        .bind(ReminderStatus::Scheduled.as_str())
        .bind(ReminderStatus::Dispatching.as_str())
        .execute(&self.pool)
        .await
        .map(|done| done.rows_affected())
        .unwrap_or(0)
    }

    async fn delete(&self, reminder_id: &ID) -> Option<Reminder> {
        // Call logs go with the reminder through the FK cascade
        sqlx::query_as::<_, ReminderRaw>(
            r#"
            DELETE FROM reminders
            WHERE reminder_uid = $1
            RETURNING *
            "#,
        )
        .bind(reminder_id.inner_ref())
        .fetch_optional(&self.pool)
        .await
        .ok()
        .flatten()
        .and_then(|raw| raw.try_into().ok())
    }
}
