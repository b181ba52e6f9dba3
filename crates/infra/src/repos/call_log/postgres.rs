use super::ICallLogRepo;
use crate::repos::shared::repo::DeleteResult;
use callme_domain::{CallLog, CallStatus, ID};
use sqlx::{FromRow, PgPool};
use std::convert::{TryFrom, TryInto};
use uuid::Uuid;

pub struct PostgresCallLogRepo {
    pool: PgPool,
}

impl PostgresCallLogRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct CallLogRaw {
    call_log_uid: Uuid,
    reminder_uid: Uuid,
    attempted_at: i64,
    status: String,
    response_data: Option<String>,
    error_message: Option<String>,
}

impl TryFrom<CallLogRaw> for CallLog {
    type Error = anyhow::Error;

    fn try_from(raw: CallLogRaw) -> anyhow::Result<Self> {
        Ok(Self {
            id: ID::from(raw.call_log_uid),
            reminder_id: ID::from(raw.reminder_uid),
            attempted_at: raw.attempted_at,
            status: raw.status.parse::<CallStatus>()?,
            response_data: raw.response_data,
            error_message: raw.error_message,
        })
    }
}

#[async_trait::async_trait]
impl ICallLogRepo for PostgresCallLogRepo {
    async fn insert(&self, log: &CallLog) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO call_logs
            (call_log_uid, reminder_uid, attempted_at, status, response_data, error_message)
            VALUES($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(log.id.inner_ref())
        .bind(log.reminder_id.inner_ref())
        .bind(log.attempted_at)
        .bind(log.status.as_str())
        .bind(&log.response_data)
        .bind(&log.error_message)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find_by_reminder(&self, reminder_id: &ID) -> Vec<CallLog> {
        sqlx::query_as::<_, CallLogRaw>(
            r#"
            SELECT * FROM call_logs
            WHERE reminder_uid = $1
            ORDER BY attempted_at ASC
            "#,
        )
        .bind(reminder_id.inner_ref())
        .fetch_all(&self.pool)
        .await
        .unwrap_or_default()
        .into_iter()
        .filter_map(|raw| raw.try_into().ok())
        .collect()
    }

    async fn delete_by_reminder(&self, reminder_id: &ID) -> anyhow::Result<DeleteResult> {
        let res = sqlx::query(
            r#"
            DELETE FROM call_logs
            WHERE reminder_uid = $1
            "#,
        )
        .bind(reminder_id.inner_ref())
        .execute(&self.pool)
        .await?;
        Ok(DeleteResult {
            deleted_count: res.rows_affected() as i64,
        })
    }
}
