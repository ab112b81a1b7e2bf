// src/db/invoice_repo.rs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::{PgConnection, PgPool};
use std::collections::HashMap;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::auth::AccessScope,
    models::invoice::{Invoice, InvoiceDraft, InvoiceLineItem, LineItemDraft},
};

const INVOICE_SELECT: &str = "SELECT i.*, c.client_name, c.npwp_client, s.nama AS assigned_staff_name \
     FROM invoices i \
     JOIN clients c ON i.client_id = c.client_id \
     LEFT JOIN staffs s ON i.assigned_staff_id = s.staff_id";

#[derive(Clone)]
pub struct InvoiceRepository {
    pool: PgPool,
}

impl InvoiceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // =========================================================================
    //  NUMBERING
    // =========================================================================

    /// Mints the next `INV/YYYYMMDD/NNN` for the given date. An advisory lock
    /// keyed on the date prefix serializes concurrent inserts for that day;
    /// it is held until the surrounding transaction ends, so this must run
    /// inside the same transaction as the insert that uses the number. The
    /// unique index on `invoice_number` backstops the whole scheme.
    pub async fn next_invoice_number(
        conn: &mut PgConnection,
        invoice_date: NaiveDate,
    ) -> Result<String, AppError> {
        let prefix = format!("INV/{}", invoice_date.format("%Y%m%d"));

        sqlx::query("SELECT pg_advisory_xact_lock(hashtext($1)::BIGINT)")
            .bind(&prefix)
            .execute(&mut *conn)
            .await?;

        let last_seq: i32 = sqlx::query_scalar(
            "SELECT COALESCE(MAX(split_part(invoice_number, '/', 3)::INT), 0) \
             FROM invoices WHERE invoice_number LIKE $1 || '/%'",
        )
        .bind(&prefix)
        .fetch_one(&mut *conn)
        .await?;

        Ok(format!("{}/{:03}", prefix, last_seq + 1))
    }

    // =========================================================================
    //  CREATE
    // =========================================================================

    /// Inserts header and items on the caller's connection. Used by the
    /// outbox worker to share a transaction with the event bookkeeping.
    pub async fn create_on(
        conn: &mut PgConnection,
        draft: &InvoiceDraft,
    ) -> Result<Uuid, AppError> {
        let invoice_number = Self::next_invoice_number(&mut *conn, draft.invoice_date).await?;

        let invoice_id: Uuid = sqlx::query_scalar(
            "INSERT INTO invoices \
                (invoice_number, client_id, assigned_staff_id, invoice_date, due_date, \
                 total_amount, status, notes) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING invoice_id",
        )
        .bind(&invoice_number)
        .bind(draft.client_id)
        .bind(draft.assigned_staff_id)
        .bind(draft.invoice_date)
        .bind(draft.due_date)
        .bind(draft.total())
        .bind(&draft.status)
        .bind(&draft.notes)
        .fetch_one(&mut *conn)
        .await?;

        for item in &draft.line_items {
            Self::insert_line_item(&mut *conn, invoice_id, item).await?;
        }

        Ok(invoice_id)
    }

    /// Standalone create: one transaction, then a joined read-back.
    pub async fn create(&self, draft: &InvoiceDraft) -> Result<Invoice, AppError> {
        let mut tx = self.pool.begin().await?;
        let invoice_id = Self::create_on(&mut *tx, draft).await?;
        tx.commit().await?;

        let invoice = self.find(invoice_id, AccessScope::admin()).await?;
        invoice.ok_or(AppError::NotFound("Invoice"))
    }

    // =========================================================================
    //  READS
    // =========================================================================

    pub async fn find(
        &self,
        invoice_id: Uuid,
        scope: AccessScope,
    ) -> Result<Option<Invoice>, AppError> {
        let mut conn = self.pool.acquire().await?;

        let invoice = Self::find_header_on(&mut conn, invoice_id, scope).await?;
        match invoice {
            Some(mut invoice) => {
                invoice.line_items = sqlx::query_as::<_, InvoiceLineItem>(
                    "SELECT * FROM invoice_line_items WHERE invoice_id = $1 ORDER BY created_at",
                )
                .bind(invoice.invoice_id)
                .fetch_all(&mut *conn)
                .await?;
                Ok(Some(invoice))
            }
            None => Ok(None),
        }
    }

    /// Scoped header fetch without line items, usable inside a transaction.
    pub async fn find_header_on(
        conn: &mut PgConnection,
        invoice_id: Uuid,
        scope: AccessScope,
    ) -> Result<Option<Invoice>, AppError> {
        let mut sql = format!("{INVOICE_SELECT} WHERE i.invoice_id = $1");
        if !scope.is_admin {
            sql.push_str(" AND i.assigned_staff_id = $2");
        }

        let mut query = sqlx::query_as::<_, Invoice>(&sql).bind(invoice_id);
        if !scope.is_admin {
            query = query.bind(scope.staff_id);
        }
        let invoice = query.fetch_optional(conn).await?;
        Ok(invoice)
    }

    pub async fn list(&self, scope: AccessScope) -> Result<Vec<Invoice>, AppError> {
        let mut conn = self.pool.acquire().await?;

        let mut sql = INVOICE_SELECT.to_string();
        if !scope.is_admin {
            sql.push_str(" WHERE i.assigned_staff_id = $1");
        }
        sql.push_str(" ORDER BY i.invoice_date DESC, i.invoice_number DESC");

        let mut query = sqlx::query_as::<_, Invoice>(&sql);
        if !scope.is_admin {
            query = query.bind(scope.staff_id);
        }
        let mut invoices = query.fetch_all(&mut *conn).await?;

        if invoices.is_empty() {
            return Ok(invoices);
        }

        let ids: Vec<Uuid> = invoices.iter().map(|i| i.invoice_id).collect();
        let items = sqlx::query_as::<_, InvoiceLineItem>(
            "SELECT * FROM invoice_line_items WHERE invoice_id = ANY($1) ORDER BY created_at",
        )
        .bind(ids)
        .fetch_all(&mut *conn)
        .await?;

        let mut by_invoice: HashMap<Uuid, Vec<InvoiceLineItem>> = HashMap::new();
        for item in items {
            by_invoice.entry(item.invoice_id).or_default().push(item);
        }
        for invoice in invoices.iter_mut() {
            invoice.line_items = by_invoice.remove(&invoice.invoice_id).unwrap_or_default();
        }

        Ok(invoices)
    }

    // =========================================================================
    //  HEADER UPDATE / DELETE
    // =========================================================================

    /// Header-only write; `total_amount` is owned by the line-item paths.
    pub async fn update_header(&self, invoice: &Invoice) -> Result<u64, AppError> {
        let result = sqlx::query(
            "UPDATE invoices SET \
                assigned_staff_id = $1, invoice_date = $2, due_date = $3, \
                status = $4, notes = $5, updated_at = NOW() \
             WHERE invoice_id = $6",
        )
        .bind(invoice.assigned_staff_id)
        .bind(invoice.invoice_date)
        .bind(invoice.due_date)
        .bind(&invoice.status)
        .bind(&invoice.notes)
        .bind(invoice.invoice_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    pub async fn delete(&self, invoice_id: Uuid, scope: AccessScope) -> Result<u64, AppError> {
        let mut sql = "DELETE FROM invoices WHERE invoice_id = $1".to_string();
        if !scope.is_admin {
            sql.push_str(" AND assigned_staff_id = $2");
        }

        let mut query = sqlx::query(&sql).bind(invoice_id);
        if !scope.is_admin {
            query = query.bind(scope.staff_id);
        }
        let result = query.execute(&self.pool).await?;
        Ok(result.rows_affected())
    }

    // =========================================================================
    //  LINE ITEMS
    // =========================================================================
    // Callers run these inside a transaction together with `recompute_total`,
    // so the header total can never drift from the items.

    pub async fn insert_line_item(
        conn: &mut PgConnection,
        invoice_id: Uuid,
        item: &LineItemDraft,
    ) -> Result<InvoiceLineItem, AppError> {
        let row = sqlx::query_as::<_, InvoiceLineItem>(
            "INSERT INTO invoice_line_items \
                (invoice_id, description, quantity, unit_price, amount, related_job_type, related_job_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING *",
        )
        .bind(invoice_id)
        .bind(&item.description)
        .bind(item.quantity)
        .bind(item.unit_price)
        .bind(item.amount())
        .bind(&item.related_job_type)
        .bind(item.related_job_id)
        .fetch_one(conn)
        .await?;

        Ok(row)
    }

    pub async fn find_line_item(
        conn: &mut PgConnection,
        invoice_id: Uuid,
        line_item_id: Uuid,
    ) -> Result<Option<InvoiceLineItem>, AppError> {
        let item = sqlx::query_as::<_, InvoiceLineItem>(
            "SELECT * FROM invoice_line_items WHERE line_item_id = $1 AND invoice_id = $2",
        )
        .bind(line_item_id)
        .bind(invoice_id)
        .fetch_optional(conn)
        .await?;
        Ok(item)
    }

    pub async fn update_line_item(
        conn: &mut PgConnection,
        item: &InvoiceLineItem,
    ) -> Result<u64, AppError> {
        let result = sqlx::query(
            "UPDATE invoice_line_items SET \
                description = $1, quantity = $2, unit_price = $3, amount = $4, \
                related_job_type = $5, related_job_id = $6, updated_at = NOW() \
             WHERE line_item_id = $7",
        )
        .bind(&item.description)
        .bind(item.quantity)
        .bind(item.unit_price)
        .bind(item.amount)
        .bind(&item.related_job_type)
        .bind(item.related_job_id)
        .bind(item.line_item_id)
        .execute(conn)
        .await?;

        Ok(result.rows_affected())
    }

    pub async fn delete_line_item(
        conn: &mut PgConnection,
        invoice_id: Uuid,
        line_item_id: Uuid,
    ) -> Result<u64, AppError> {
        let result = sqlx::query(
            "DELETE FROM invoice_line_items WHERE line_item_id = $1 AND invoice_id = $2",
        )
        .bind(line_item_id)
        .bind(invoice_id)
        .execute(conn)
        .await?;
        Ok(result.rows_affected())
    }

    /// Re-derives the header total from the stored items.
    pub async fn recompute_total(
        conn: &mut PgConnection,
        invoice_id: Uuid,
    ) -> Result<Decimal, AppError> {
        let total: Decimal = sqlx::query_scalar(
            "UPDATE invoices SET \
                total_amount = COALESCE( \
                    (SELECT SUM(amount) FROM invoice_line_items WHERE invoice_id = $1), 0), \
                updated_at = NOW() \
             WHERE invoice_id = $1 \
             RETURNING total_amount",
        )
        .bind(invoice_id)
        .fetch_one(conn)
        .await?;

        Ok(total)
    }
}
