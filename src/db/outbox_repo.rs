// src/db/outbox_repo.rs

use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::invoice::InvoiceOutboxEvent,
    models::job::JobType,
};

#[derive(Clone)]
pub struct OutboxRepository {
    pool: PgPool,
}

impl OutboxRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Rides in the same transaction as the job update that entered "Selesai",
    /// so a rolled-back update leaves no event behind.
    pub async fn enqueue(
        conn: &mut PgConnection,
        job_id: Uuid,
        job_type: JobType,
        client_id: Uuid,
        assigned_staff_id: Option<Uuid>,
    ) -> Result<Uuid, AppError> {
        let event_id: Uuid = sqlx::query_scalar(
            "INSERT INTO invoice_outbox (job_id, job_type, client_id, assigned_staff_id) \
             VALUES ($1, $2, $3, $4) \
             RETURNING event_id",
        )
        .bind(job_id)
        .bind(job_type.label())
        .bind(client_id)
        .bind(assigned_staff_id)
        .fetch_one(conn)
        .await?;

        Ok(event_id)
    }

    /// Flips a batch of due pending events to `processing` and returns them,
    /// attempts already bumped. SKIP LOCKED keeps concurrent workers off each
    /// other's rows. A `processing` row older than ten minutes belonged to a
    /// worker that died before its delivery transaction committed, so it is
    /// claimable again; a delivered event is `done` and never comes back.
    pub async fn claim_batch(&self, batch_size: i64) -> Result<Vec<InvoiceOutboxEvent>, AppError> {
        let events = sqlx::query_as::<_, InvoiceOutboxEvent>(
            "WITH cte AS ( \
                SELECT event_id FROM invoice_outbox \
                WHERE (status = 'pending' AND available_at <= NOW()) \
                   OR (status = 'processing' AND updated_at < NOW() - INTERVAL '10 minutes') \
                ORDER BY created_at ASC \
                FOR UPDATE SKIP LOCKED \
                LIMIT $1 \
            ) \
            UPDATE invoice_outbox o \
            SET status = 'processing', updated_at = NOW(), attempts = o.attempts + 1 \
            FROM cte \
            WHERE o.event_id = cte.event_id \
            RETURNING o.*",
        )
        .bind(batch_size)
        .fetch_all(&self.pool)
        .await?;

        Ok(events)
    }

    /// Success path. Runs in the invoice-creation transaction so the event
    /// can never be done without its invoice, or vice versa.
    pub async fn mark_done(
        conn: &mut PgConnection,
        event_id: Uuid,
        invoice_id: Uuid,
    ) -> Result<(), AppError> {
        sqlx::query(
            "UPDATE invoice_outbox \
             SET status = 'done', invoice_id = $2, last_error = NULL, updated_at = NOW() \
             WHERE event_id = $1",
        )
        .bind(event_id)
        .bind(invoice_id)
        .execute(conn)
        .await?;

        Ok(())
    }

    /// Puts the event back in the queue after `delay_secs`.
    pub async fn schedule_retry(
        &self,
        event_id: Uuid,
        delay_secs: f64,
        error: &str,
    ) -> Result<(), AppError> {
        sqlx::query(
            "UPDATE invoice_outbox \
             SET status = 'pending', available_at = NOW() + make_interval(secs => $2), \
                 last_error = $3, updated_at = NOW() \
             WHERE event_id = $1",
        )
        .bind(event_id)
        .bind(delay_secs)
        .bind(error)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Terminal failure once the retries are exhausted. The row stays for
    /// manual inspection.
    pub async fn mark_failed(&self, event_id: Uuid, error: &str) -> Result<(), AppError> {
        sqlx::query(
            "UPDATE invoice_outbox \
             SET status = 'failed', last_error = $2, updated_at = NOW() \
             WHERE event_id = $1",
        )
        .bind(event_id)
        .bind(error)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
