// src/models/invoice.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

fn validate_positive_decimal(val: &Decimal) -> Result<(), ValidationError> {
    if *val <= Decimal::ZERO {
        let mut err = ValidationError::new("range");
        err.message = Some("Value must be greater than zero.".into());
        return Err(err);
    }
    Ok(())
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
pub struct InvoiceLineItem {
    pub line_item_id: Uuid,
    pub invoice_id: Uuid,
    pub description: String,
    pub quantity: Decimal,
    pub unit_price: Decimal,
    pub amount: Decimal,
    pub related_job_type: Option<String>,
    pub related_job_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Invoice header plus its line items. `total_amount` is always the sum of
/// line-item amounts; every write path that touches items recomputes it.
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
pub struct Invoice {
    pub invoice_id: Uuid,
    pub invoice_number: String,
    pub client_id: Uuid,
    pub client_name: String,
    pub npwp_client: String,
    pub assigned_staff_id: Option<Uuid>,
    pub assigned_staff_name: Option<String>,
    pub invoice_date: NaiveDate,
    pub due_date: NaiveDate,
    pub total_amount: Decimal,
    pub status: String,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[sqlx(skip)]
    pub line_items: Vec<InvoiceLineItem>,
}

/// Queued completion event, drained by the invoice worker. One event turns
/// into at most one invoice; `invoice_id` is filled once delivered.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct InvoiceOutboxEvent {
    pub event_id: Uuid,
    pub job_id: Uuid,
    pub job_type: String,
    pub client_id: Uuid,
    pub assigned_staff_id: Option<Uuid>,
    pub status: String,
    pub attempts: i32,
    pub last_error: Option<String>,
    pub available_at: DateTime<Utc>,
    pub invoice_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// PAYLOADS
// =============================================================================

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct NewInvoicePayload {
    pub client_id: Uuid,
    pub assigned_staff_id: Option<Uuid>,
    pub invoice_date: NaiveDate,
    pub due_date: NaiveDate,
    pub status: Option<String>,
    pub notes: Option<String>,
    #[validate(length(min = 1, message = "At least one line item is required"), nested)]
    pub line_items: Vec<NewInvoiceLineItemPayload>,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct NewInvoiceLineItemPayload {
    #[validate(length(min = 1, message = "description is required"))]
    pub description: String,
    #[validate(custom(function = "validate_positive_decimal"))]
    pub quantity: Decimal,
    #[validate(custom(function = "validate_positive_decimal"))]
    pub unit_price: Decimal,
    pub related_job_type: Option<String>,
    pub related_job_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateInvoicePayload {
    pub assigned_staff_id: Option<Uuid>,
    pub invoice_date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
    pub status: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateInvoiceLineItemPayload {
    pub description: Option<String>,
    #[validate(custom(function = "validate_positive_decimal"))]
    pub quantity: Option<Decimal>,
    #[validate(custom(function = "validate_positive_decimal"))]
    pub unit_price: Option<Decimal>,
    pub related_job_type: Option<String>,
    pub related_job_id: Option<Uuid>,
}

/// `amount = quantity * unit_price`, the only place it is computed.
pub fn line_amount(quantity: Decimal, unit_price: Decimal) -> Decimal {
    quantity * unit_price
}

// =============================================================================
// DRAFTS
// =============================================================================
// Normalized form every invoice write goes through, whether it came from the
// manual POST payload or from the completion worker's price table.

#[derive(Debug, Clone)]
pub struct LineItemDraft {
    pub description: String,
    pub quantity: Decimal,
    pub unit_price: Decimal,
    pub related_job_type: Option<String>,
    pub related_job_id: Option<Uuid>,
}

impl LineItemDraft {
    pub fn amount(&self) -> Decimal {
        line_amount(self.quantity, self.unit_price)
    }
}

#[derive(Debug, Clone)]
pub struct InvoiceDraft {
    pub client_id: Uuid,
    pub assigned_staff_id: Option<Uuid>,
    pub invoice_date: NaiveDate,
    pub due_date: NaiveDate,
    pub status: String,
    pub notes: Option<String>,
    pub line_items: Vec<LineItemDraft>,
}

impl InvoiceDraft {
    pub fn total(&self) -> Decimal {
        self.line_items.iter().map(LineItemDraft::amount).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_amount_multiplies() {
        assert_eq!(
            line_amount(Decimal::from(3), Decimal::from(250_000)),
            Decimal::from(750_000)
        );
    }

    #[test]
    fn zero_quantity_fails_validation() {
        let payload = NewInvoiceLineItemPayload {
            description: "Jasa konsultasi".to_string(),
            quantity: Decimal::ZERO,
            unit_price: Decimal::from(100_000),
            related_job_type: None,
            related_job_id: None,
        };
        assert!(payload.validate().is_err());
    }

    #[test]
    fn invoice_without_line_items_fails_validation() {
        let payload = NewInvoicePayload {
            client_id: Uuid::new_v4(),
            assigned_staff_id: None,
            invoice_date: NaiveDate::from_ymd_opt(2025, 9, 1).unwrap(),
            due_date: NaiveDate::from_ymd_opt(2025, 10, 1).unwrap(),
            status: None,
            notes: None,
            line_items: vec![],
        };
        assert!(payload.validate().is_err());
    }
}
