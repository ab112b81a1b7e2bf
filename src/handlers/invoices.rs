// src/handlers/invoices.rs

use axum::{
    Json,
    extract::{Path, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    models::{
        auth::AccessScope,
        invoice::{
            Invoice, InvoiceLineItem, NewInvoiceLineItemPayload, NewInvoicePayload,
            UpdateInvoiceLineItemPayload, UpdateInvoicePayload,
        },
    },
};

// =============================================================================
//  INVOICES
// =============================================================================

// POST /api/v1/invoices
#[utoipa::path(
    post,
    path = "/api/v1/invoices",
    tag = "Invoices",
    request_body = NewInvoicePayload,
    responses(
        (status = 201, description = "Invoice dibuat dengan nomor urut harian", body = Invoice),
        (status = 400, description = "Payload tidak valid")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_invoice(
    State(app_state): State<AppState>,
    Json(payload): Json<NewInvoicePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let invoice = app_state.invoice_service.create_invoice(payload).await?;

    Ok((StatusCode::CREATED, Json(invoice)))
}

// GET /api/v1/invoices
#[utoipa::path(
    get,
    path = "/api/v1/invoices",
    tag = "Invoices",
    responses(
        (status = 200, description = "Daftar invoice (di-scope per staff untuk non-admin)", body = Vec<Invoice>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_invoices(
    State(app_state): State<AppState>,
    scope: AccessScope,
) -> Result<Json<Vec<Invoice>>, AppError> {
    let invoices = app_state.invoice_service.list_invoices(scope).await?;
    Ok(Json(invoices))
}

// GET /api/v1/invoices/{id}
#[utoipa::path(
    get,
    path = "/api/v1/invoices/{id}",
    tag = "Invoices",
    params(("id" = Uuid, Path, description = "Invoice ID")),
    responses(
        (status = 200, description = "Detail invoice beserta line item", body = Invoice),
        (status = 404, description = "Invoice tidak ditemukan")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_invoice(
    State(app_state): State<AppState>,
    scope: AccessScope,
    Path(invoice_id): Path<Uuid>,
) -> Result<Json<Invoice>, AppError> {
    let invoice = app_state
        .invoice_service
        .get_invoice(invoice_id, scope)
        .await?;
    Ok(Json(invoice))
}

// PATCH /api/v1/invoices/{id}
#[utoipa::path(
    patch,
    path = "/api/v1/invoices/{id}",
    tag = "Invoices",
    params(("id" = Uuid, Path, description = "Invoice ID")),
    request_body = UpdateInvoicePayload,
    responses(
        (status = 200, description = "Header invoice diperbarui", body = Invoice),
        (status = 404, description = "Invoice tidak ditemukan")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_invoice(
    State(app_state): State<AppState>,
    scope: AccessScope,
    Path(invoice_id): Path<Uuid>,
    Json(payload): Json<UpdateInvoicePayload>,
) -> Result<Json<Invoice>, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let invoice = app_state
        .invoice_service
        .update_invoice(invoice_id, scope, payload)
        .await?;

    Ok(Json(invoice))
}

// DELETE /api/v1/invoices/{id}
#[utoipa::path(
    delete,
    path = "/api/v1/invoices/{id}",
    tag = "Invoices",
    params(("id" = Uuid, Path, description = "Invoice ID")),
    responses(
        (status = 204, description = "Invoice dihapus beserta line item"),
        (status = 404, description = "Invoice tidak ditemukan")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_invoice(
    State(app_state): State<AppState>,
    scope: AccessScope,
    Path(invoice_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    app_state
        .invoice_service
        .delete_invoice(invoice_id, scope)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

// GET /api/v1/invoices/{id}/pdf
#[utoipa::path(
    get,
    path = "/api/v1/invoices/{id}/pdf",
    tag = "Invoices",
    params(("id" = Uuid, Path, description = "Invoice ID")),
    responses(
        (status = 200, description = "Invoice siap cetak (application/pdf)"),
        (status = 404, description = "Invoice tidak ditemukan")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_invoice_pdf(
    State(app_state): State<AppState>,
    scope: AccessScope,
    Path(invoice_id): Path<Uuid>,
) -> Result<Response, AppError> {
    let invoice = app_state
        .invoice_service
        .get_invoice(invoice_id, scope)
        .await?;

    let pdf_bytes = app_state.pdf_service.render_invoice(&invoice)?;

    // Invoice numbers contain '/', which is not valid in a filename.
    let filename = invoice.invoice_number.replace('/', "-");
    let headers = [
        (header::CONTENT_TYPE, "application/pdf"),
        (
            header::CONTENT_DISPOSITION,
            &format!("attachment; filename=\"{filename}.pdf\""),
        ),
    ];

    Ok((headers, pdf_bytes).into_response())
}

// =============================================================================
//  LINE ITEMS
// =============================================================================

// POST /api/v1/invoices/{id}/line-items
#[utoipa::path(
    post,
    path = "/api/v1/invoices/{id}/line-items",
    tag = "Invoices",
    params(("id" = Uuid, Path, description = "Invoice ID")),
    request_body = NewInvoiceLineItemPayload,
    responses(
        (status = 201, description = "Line item ditambahkan, total invoice dihitung ulang", body = InvoiceLineItem),
        (status = 404, description = "Invoice tidak ditemukan")
    ),
    security(("api_jwt" = []))
)]
pub async fn add_line_item(
    State(app_state): State<AppState>,
    scope: AccessScope,
    Path(invoice_id): Path<Uuid>,
    Json(payload): Json<NewInvoiceLineItemPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let item = app_state
        .invoice_service
        .add_line_item(invoice_id, scope, payload)
        .await?;

    Ok((StatusCode::CREATED, Json(item)))
}

// PATCH /api/v1/invoices/{id}/line-items/{item_id}
#[utoipa::path(
    patch,
    path = "/api/v1/invoices/{id}/line-items/{item_id}",
    tag = "Invoices",
    params(
        ("id" = Uuid, Path, description = "Invoice ID"),
        ("item_id" = Uuid, Path, description = "Line item ID")
    ),
    request_body = UpdateInvoiceLineItemPayload,
    responses(
        (status = 200, description = "Line item diperbarui, total invoice dihitung ulang", body = InvoiceLineItem),
        (status = 404, description = "Invoice atau line item tidak ditemukan")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_line_item(
    State(app_state): State<AppState>,
    scope: AccessScope,
    Path((invoice_id, item_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<UpdateInvoiceLineItemPayload>,
) -> Result<Json<InvoiceLineItem>, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let item = app_state
        .invoice_service
        .update_line_item(invoice_id, item_id, scope, payload)
        .await?;

    Ok(Json(item))
}

// DELETE /api/v1/invoices/{id}/line-items/{item_id}
#[utoipa::path(
    delete,
    path = "/api/v1/invoices/{id}/line-items/{item_id}",
    tag = "Invoices",
    params(
        ("id" = Uuid, Path, description = "Invoice ID"),
        ("item_id" = Uuid, Path, description = "Line item ID")
    ),
    responses(
        (status = 204, description = "Line item dihapus, total invoice dihitung ulang"),
        (status = 404, description = "Invoice atau line item tidak ditemukan")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_line_item(
    State(app_state): State<AppState>,
    scope: AccessScope,
    Path((invoice_id, item_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, AppError> {
    app_state
        .invoice_service
        .delete_line_item(invoice_id, item_id, scope)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
