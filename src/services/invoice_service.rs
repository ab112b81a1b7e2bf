// src/services/invoice_service.rs

use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{ClientRepository, InvoiceRepository, OutboxRepository, StaffRepository},
    models::{
        auth::AccessScope,
        invoice::{
            Invoice, InvoiceDraft, InvoiceLineItem, InvoiceOutboxEvent, LineItemDraft,
            NewInvoiceLineItemPayload, NewInvoicePayload, UpdateInvoiceLineItemPayload,
            UpdateInvoicePayload, line_amount,
        },
        job::JobType,
    },
};

pub const AUTO_INVOICE_NOTES: &str = "Invoice otomatis dibuat dari penyelesaian pekerjaan.";
pub const AUTO_INVOICE_DUE_DAYS: i64 = 30;

#[derive(Clone)]
pub struct InvoiceService {
    pool: PgPool,
    repo: InvoiceRepository,
    client_repo: ClientRepository,
    staff_repo: StaffRepository,
}

impl InvoiceService {
    pub fn new(
        pool: PgPool,
        repo: InvoiceRepository,
        client_repo: ClientRepository,
        staff_repo: StaffRepository,
    ) -> Self {
        Self {
            pool,
            repo,
            client_repo,
            staff_repo,
        }
    }

    async fn check_client(&self, client_id: Uuid) -> Result<(), AppError> {
        if self
            .client_repo
            .find_by_id(client_id, AccessScope::admin())
            .await?
            .is_none()
        {
            return Err(AppError::InvalidInput("Client ID not found".to_string()));
        }
        Ok(())
    }

    async fn check_assigned_staff(&self, staff_id: Uuid) -> Result<(), AppError> {
        if self.staff_repo.find_by_id(staff_id).await?.is_none() {
            return Err(AppError::InvalidInput(
                "Assigned Staff ID not found".to_string(),
            ));
        }
        Ok(())
    }

    // =========================================================================
    //  MANUAL INVOICES
    // =========================================================================

    pub async fn create_invoice(&self, payload: NewInvoicePayload) -> Result<Invoice, AppError> {
        self.check_client(payload.client_id).await?;
        if let Some(staff_id) = payload.assigned_staff_id {
            self.check_assigned_staff(staff_id).await?;
        }

        let draft = InvoiceDraft {
            client_id: payload.client_id,
            assigned_staff_id: payload.assigned_staff_id,
            invoice_date: payload.invoice_date,
            due_date: payload.due_date,
            status: payload.status.unwrap_or_else(|| "Pending".to_string()),
            notes: payload.notes,
            line_items: payload
                .line_items
                .into_iter()
                .map(|item| LineItemDraft {
                    description: item.description,
                    quantity: item.quantity,
                    unit_price: item.unit_price,
                    related_job_type: item.related_job_type,
                    related_job_id: item.related_job_id,
                })
                .collect(),
        };

        self.repo.create(&draft).await
    }

    pub async fn get_invoice(
        &self,
        invoice_id: Uuid,
        scope: AccessScope,
    ) -> Result<Invoice, AppError> {
        self.repo
            .find(invoice_id, scope)
            .await?
            .ok_or(AppError::NotFound("Invoice"))
    }

    pub async fn list_invoices(&self, scope: AccessScope) -> Result<Vec<Invoice>, AppError> {
        self.repo.list(scope).await
    }

    /// Header-only merge. The invoice number and client are fixed at
    /// creation; the rest of the header may move.
    pub async fn update_invoice(
        &self,
        invoice_id: Uuid,
        scope: AccessScope,
        payload: UpdateInvoicePayload,
    ) -> Result<Invoice, AppError> {
        let mut invoice = self.get_invoice(invoice_id, scope).await?;

        if let Some(staff_id) = payload.assigned_staff_id {
            self.check_assigned_staff(staff_id).await?;
            invoice.assigned_staff_id = Some(staff_id);
        }
        if let Some(v) = payload.invoice_date {
            invoice.invoice_date = v;
        }
        if let Some(v) = payload.due_date {
            invoice.due_date = v;
        }
        if let Some(v) = payload.status {
            invoice.status = v;
        }
        if let Some(v) = payload.notes {
            invoice.notes = Some(v);
        }

        let rows = self.repo.update_header(&invoice).await?;
        if rows == 0 {
            return Err(AppError::NotFound("Invoice"));
        }

        // Unscoped read-back: the caller may have just reassigned it.
        self.repo
            .find(invoice_id, AccessScope::admin())
            .await?
            .ok_or(AppError::NotFound("Invoice"))
    }

    pub async fn delete_invoice(
        &self,
        invoice_id: Uuid,
        scope: AccessScope,
    ) -> Result<(), AppError> {
        let rows = self.repo.delete(invoice_id, scope).await?;
        if rows == 0 {
            return Err(AppError::NotFound("Invoice"));
        }
        Ok(())
    }

    // =========================================================================
    //  LINE ITEMS
    // =========================================================================
    // Each mutation shares one transaction with the total recompute.

    pub async fn add_line_item(
        &self,
        invoice_id: Uuid,
        scope: AccessScope,
        payload: NewInvoiceLineItemPayload,
    ) -> Result<InvoiceLineItem, AppError> {
        let mut tx = self.pool.begin().await?;

        InvoiceRepository::find_header_on(&mut *tx, invoice_id, scope)
            .await?
            .ok_or(AppError::NotFound("Invoice"))?;

        let draft = LineItemDraft {
            description: payload.description,
            quantity: payload.quantity,
            unit_price: payload.unit_price,
            related_job_type: payload.related_job_type,
            related_job_id: payload.related_job_id,
        };
        let item = InvoiceRepository::insert_line_item(&mut *tx, invoice_id, &draft).await?;
        InvoiceRepository::recompute_total(&mut *tx, invoice_id).await?;

        tx.commit().await?;
        Ok(item)
    }

    pub async fn update_line_item(
        &self,
        invoice_id: Uuid,
        line_item_id: Uuid,
        scope: AccessScope,
        payload: UpdateInvoiceLineItemPayload,
    ) -> Result<InvoiceLineItem, AppError> {
        let mut tx = self.pool.begin().await?;

        InvoiceRepository::find_header_on(&mut *tx, invoice_id, scope)
            .await?
            .ok_or(AppError::NotFound("Invoice"))?;

        let mut item = InvoiceRepository::find_line_item(&mut *tx, invoice_id, line_item_id)
            .await?
            .ok_or(AppError::NotFound("Line item"))?;

        if let Some(v) = payload.description {
            item.description = v;
        }
        if let Some(v) = payload.quantity {
            item.quantity = v;
        }
        if let Some(v) = payload.unit_price {
            item.unit_price = v;
        }
        if let Some(v) = payload.related_job_type {
            item.related_job_type = Some(v);
        }
        if let Some(v) = payload.related_job_id {
            item.related_job_id = Some(v);
        }
        item.amount = line_amount(item.quantity, item.unit_price);

        let rows = InvoiceRepository::update_line_item(&mut *tx, &item).await?;
        if rows == 0 {
            return Err(AppError::NotFound("Line item"));
        }
        InvoiceRepository::recompute_total(&mut *tx, invoice_id).await?;

        let item = InvoiceRepository::find_line_item(&mut *tx, invoice_id, line_item_id)
            .await?
            .ok_or(AppError::NotFound("Line item"))?;

        tx.commit().await?;
        Ok(item)
    }

    pub async fn delete_line_item(
        &self,
        invoice_id: Uuid,
        line_item_id: Uuid,
        scope: AccessScope,
    ) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        InvoiceRepository::find_header_on(&mut *tx, invoice_id, scope)
            .await?
            .ok_or(AppError::NotFound("Invoice"))?;

        let rows = InvoiceRepository::delete_line_item(&mut *tx, invoice_id, line_item_id).await?;
        if rows == 0 {
            return Err(AppError::NotFound("Line item"));
        }
        InvoiceRepository::recompute_total(&mut *tx, invoice_id).await?;

        tx.commit().await?;
        Ok(())
    }

    // =========================================================================
    //  AUTOMATIC INVOICES (outbox worker)
    // =========================================================================

    /// What a completion event bills: one line at the flat service fee for
    /// that engagement kind, due 30 days out.
    pub fn draft_from_event(event: &InvoiceOutboxEvent) -> Result<InvoiceDraft, AppError> {
        let job_type = JobType::from_label(&event.job_type).ok_or_else(|| {
            AppError::InvalidInput(format!(
                "Unknown job type '{}' on invoice event",
                event.job_type
            ))
        })?;

        let today = Utc::now().date_naive();

        Ok(InvoiceDraft {
            client_id: event.client_id,
            assigned_staff_id: event.assigned_staff_id,
            invoice_date: today,
            due_date: today + Duration::days(AUTO_INVOICE_DUE_DAYS),
            status: "Pending".to_string(),
            notes: Some(AUTO_INVOICE_NOTES.to_string()),
            line_items: vec![LineItemDraft {
                description: job_type.invoice_description(event.job_id),
                quantity: Decimal::ONE,
                unit_price: job_type.service_fee(),
                related_job_type: Some(job_type.label().to_string()),
                related_job_id: Some(event.job_id),
            }],
        })
    }

    /// Creates the invoice for one claimed event and settles the event in the
    /// same transaction. Either both land or neither does.
    pub async fn create_from_event(&self, event: &InvoiceOutboxEvent) -> Result<Uuid, AppError> {
        let draft = Self::draft_from_event(event)?;

        let mut tx = self.pool.begin().await?;
        let invoice_id = InvoiceRepository::create_on(&mut *tx, &draft).await?;
        OutboxRepository::mark_done(&mut *tx, event.event_id, invoice_id).await?;
        tx.commit().await?;

        Ok(invoice_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;

    fn event(job_type: &str) -> InvoiceOutboxEvent {
        let now = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        InvoiceOutboxEvent {
            event_id: Uuid::new_v4(),
            job_id: Uuid::new_v4(),
            job_type: job_type.to_string(),
            client_id: Uuid::new_v4(),
            assigned_staff_id: Some(Uuid::new_v4()),
            status: "processing".to_string(),
            attempts: 1,
            last_error: None,
            available_at: now,
            invoice_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn monthly_completion_bills_one_line_at_the_flat_fee() {
        let event = event("Pekerjaan Bulanan");
        let draft = InvoiceService::draft_from_event(&event).unwrap();

        assert_eq!(draft.line_items.len(), 1);
        let line = &draft.line_items[0];
        assert_eq!(line.quantity, Decimal::ONE);
        assert_eq!(line.unit_price, Decimal::from(1_500_000));
        assert_eq!(line.amount(), Decimal::from(1_500_000));
        assert_eq!(draft.total(), Decimal::from(1_500_000));
        assert_eq!(line.related_job_id, Some(event.job_id));
        assert_eq!(line.related_job_type.as_deref(), Some("Pekerjaan Bulanan"));
        assert!(line.description.contains(&event.job_id.to_string()));

        assert_eq!(draft.status, "Pending");
        assert_eq!(draft.notes.as_deref(), Some(AUTO_INVOICE_NOTES));
        assert_eq!(draft.due_date - draft.invoice_date, Duration::days(30));
    }

    #[test]
    fn unknown_job_type_label_is_rejected() {
        let event = event("Pekerjaan Misterius");
        assert!(InvoiceService::draft_from_event(&event).is_err());
    }
}
