// src/handlers/clients.rs

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    models::{
        auth::AccessScope,
        client::{Client, ClientJobsDashboard, CreateClientPayload, UpdateClientPayload},
    },
};

// POST /api/v1/clients
#[utoipa::path(
    post,
    path = "/api/v1/clients",
    tag = "Clients",
    request_body = CreateClientPayload,
    responses(
        (status = 201, description = "Klien baru dibuat", body = Client),
        (status = 400, description = "Payload tidak valid")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_client(
    State(app_state): State<AppState>,
    Json(payload): Json<CreateClientPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let client = app_state.client_service.create_client(payload).await?;

    Ok((StatusCode::CREATED, Json(client)))
}

// GET /api/v1/clients
#[utoipa::path(
    get,
    path = "/api/v1/clients",
    tag = "Clients",
    responses(
        (status = 200, description = "Daftar klien (di-scope per PIC untuk non-admin)", body = Vec<Client>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_clients(
    State(app_state): State<AppState>,
    scope: AccessScope,
) -> Result<Json<Vec<Client>>, AppError> {
    let clients = app_state.client_service.list_clients(scope).await?;
    Ok(Json(clients))
}

// GET /api/v1/clients/{id}
#[utoipa::path(
    get,
    path = "/api/v1/clients/{id}",
    tag = "Clients",
    params(("id" = Uuid, Path, description = "Client ID")),
    responses(
        (status = 200, description = "Detail klien", body = Client),
        (status = 404, description = "Klien tidak ditemukan")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_client(
    State(app_state): State<AppState>,
    scope: AccessScope,
    Path(client_id): Path<Uuid>,
) -> Result<Json<Client>, AppError> {
    let client = app_state.client_service.get_client(client_id, scope).await?;
    Ok(Json(client))
}

// PATCH /api/v1/clients/{id}
#[utoipa::path(
    patch,
    path = "/api/v1/clients/{id}",
    tag = "Clients",
    params(("id" = Uuid, Path, description = "Client ID")),
    request_body = UpdateClientPayload,
    responses(
        (status = 200, description = "Klien diperbarui", body = Client),
        (status = 404, description = "Klien tidak ditemukan")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_client(
    State(app_state): State<AppState>,
    scope: AccessScope,
    Path(client_id): Path<Uuid>,
    Json(payload): Json<UpdateClientPayload>,
) -> Result<Json<Client>, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let client = app_state
        .client_service
        .update_client(client_id, scope, payload)
        .await?;

    Ok(Json(client))
}

// DELETE /api/v1/clients/{id}
#[utoipa::path(
    delete,
    path = "/api/v1/clients/{id}",
    tag = "Clients",
    params(("id" = Uuid, Path, description = "Client ID")),
    responses(
        (status = 204, description = "Klien dihapus"),
        (status = 404, description = "Klien tidak ditemukan")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_client(
    State(app_state): State<AppState>,
    scope: AccessScope,
    Path(client_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    app_state
        .client_service
        .delete_client(client_id, scope)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

// GET /api/v1/clients/{id}/all-jobs
#[utoipa::path(
    get,
    path = "/api/v1/clients/{id}/all-jobs",
    tag = "Clients",
    params(("id" = Uuid, Path, description = "Client ID")),
    responses(
        (status = 200, description = "Semua pekerjaan klien, dikelompokkan per jenis", body = ClientJobsDashboard),
        (status = 404, description = "Klien tidak ditemukan")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_client_all_jobs(
    State(app_state): State<AppState>,
    scope: AccessScope,
    Path(client_id): Path<Uuid>,
) -> Result<Json<ClientJobsDashboard>, AppError> {
    let dashboard = app_state
        .client_service
        .get_client_all_jobs(client_id, scope)
        .await?;

    Ok(Json(dashboard))
}
