// src/services/outbox_worker.rs

use std::time::Duration;

use uuid::Uuid;

use crate::{
    common::error::AppError, db::OutboxRepository, services::invoice_service::InvoiceService,
};

const MAX_ATTEMPTS: i32 = 8;
const BASE_BACKOFF_SECS: f64 = 5.0;
const MAX_BACKOFF_SECS: f64 = 3600.0;
const BATCH_SIZE: i64 = 10;

/// Exponential backoff, capped at an hour. `attempts` counts the try that
/// just failed, so the first retry waits the base interval.
fn backoff_secs(attempts: i32) -> f64 {
    let exponent = (attempts - 1).clamp(0, 16);
    (BASE_BACKOFF_SECS * 2f64.powi(exponent)).min(MAX_BACKOFF_SECS)
}

/// Sub-second jitter so workers restarted together do not retry in lockstep.
fn jitter_secs() -> f64 {
    (Uuid::new_v4().as_u128() % 1000) as f64 / 1000.0
}

/// Background loop turning completion events into invoices. Spawned once at
/// startup; polls the outbox, delivers each claimed event in its own
/// transaction, and reschedules failures.
pub fn start_worker(
    outbox_repo: OutboxRepository,
    invoice_service: InvoiceService,
    poll_interval: Duration,
) {
    tokio::spawn(async move {
        tracing::info!("🧾 Invoice worker started, polling every {poll_interval:?}");
        loop {
            match drain_once(&outbox_repo, &invoice_service).await {
                Ok(0) => {}
                Ok(delivered) => tracing::info!("invoice worker delivered {delivered} event(s)"),
                Err(e) => tracing::error!("invoice worker pass failed: {e}"),
            }
            tokio::time::sleep(poll_interval).await;
        }
    });
}

async fn drain_once(
    outbox_repo: &OutboxRepository,
    invoice_service: &InvoiceService,
) -> Result<usize, AppError> {
    let events = outbox_repo.claim_batch(BATCH_SIZE).await?;
    let mut delivered = 0;

    for event in events {
        match invoice_service.create_from_event(&event).await {
            Ok(invoice_id) => {
                delivered += 1;
                tracing::info!(
                    "🧾 Invoice {invoice_id} created for job {} ({})",
                    event.job_id,
                    event.job_type
                );
            }
            Err(e) => {
                let error = e.to_string();
                if event.attempts >= MAX_ATTEMPTS {
                    tracing::error!(
                        "invoice event {} failed permanently after {} attempts: {error}",
                        event.event_id,
                        event.attempts
                    );
                    outbox_repo.mark_failed(event.event_id, &error).await?;
                } else {
                    let delay = backoff_secs(event.attempts) + jitter_secs();
                    tracing::warn!(
                        "invoice event {} attempt {} failed, retrying in {delay:.0}s: {error}",
                        event.event_id,
                        event.attempts
                    );
                    outbox_repo
                        .schedule_retry(event.event_id, delay, &error)
                        .await?;
                }
            }
        }
    }

    Ok(delivered)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backoff_doubles_from_the_base_interval() {
        assert_eq!(backoff_secs(1), 5.0);
        assert_eq!(backoff_secs(2), 10.0);
        assert_eq!(backoff_secs(3), 20.0);
        assert_eq!(backoff_secs(4), 40.0);
    }

    #[test]
    fn backoff_is_capped_and_tolerates_odd_attempt_counts() {
        assert_eq!(backoff_secs(30), MAX_BACKOFF_SECS);
        assert_eq!(backoff_secs(0), 5.0);
        assert_eq!(backoff_secs(-3), 5.0);
    }

    #[test]
    fn jitter_stays_below_one_second() {
        for _ in 0..64 {
            let j = jitter_secs();
            assert!((0.0..1.0).contains(&j), "got {j}");
        }
    }
}
