// src/handlers/staffs.rs

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
        staff::{ChangePasswordPayload, CreateStaffPayload, Staff, UpdateStaffPayload},
    },
};

// POST /api/v1/staffs
#[utoipa::path(
    post,
    path = "/api/v1/staffs",
    tag = "Staffs",
    request_body = CreateStaffPayload,
    responses(
        (status = 201, description = "Staff baru dibuat", body = Staff),
        (status = 409, description = "Email sudah terdaftar")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_staff(
    State(app_state): State<AppState>,
    Json(payload): Json<CreateStaffPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let staff = app_state.staff_service.create_staff(payload).await?;

    Ok((StatusCode::CREATED, Json(staff)))
}

// GET /api/v1/staffs
#[utoipa::path(
    get,
    path = "/api/v1/staffs",
    tag = "Staffs",
    responses(
        (status = 200, description = "Daftar semua staff", body = Vec<Staff>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_staffs(State(app_state): State<AppState>) -> Result<Json<Vec<Staff>>, AppError> {
    let staffs = app_state.staff_service.list_staffs().await?;
    Ok(Json(staffs))
}

// GET /api/v1/staffs/{id}
#[utoipa::path(
    get,
    path = "/api/v1/staffs/{id}",
    tag = "Staffs",
    params(("id" = Uuid, Path, description = "Staff ID")),
    responses(
        (status = 200, description = "Detail staff", body = Staff),
        (status = 404, description = "Staff tidak ditemukan")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_staff(
    State(app_state): State<AppState>,
    Path(staff_id): Path<Uuid>,
) -> Result<Json<Staff>, AppError> {
    let staff = app_state.staff_service.get_staff(staff_id).await?;
    Ok(Json(staff))
}

// PATCH /api/v1/staffs/{id}
#[utoipa::path(
    patch,
    path = "/api/v1/staffs/{id}",
    tag = "Staffs",
    params(("id" = Uuid, Path, description = "Staff ID")),
    request_body = UpdateStaffPayload,
    responses(
        (status = 200, description = "Staff diperbarui", body = Staff),
        (status = 404, description = "Staff tidak ditemukan")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_staff(
    State(app_state): State<AppState>,
    Path(staff_id): Path<Uuid>,
    Json(payload): Json<UpdateStaffPayload>,
) -> Result<Json<Staff>, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let staff = app_state
        .staff_service
        .update_staff(staff_id, payload)
        .await?;

    Ok(Json(staff))
}

// DELETE /api/v1/staffs/{id}
#[utoipa::path(
    delete,
    path = "/api/v1/staffs/{id}",
    tag = "Staffs",
    params(("id" = Uuid, Path, description = "Staff ID")),
    responses(
        (status = 204, description = "Staff dihapus"),
        (status = 404, description = "Staff tidak ditemukan")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_staff(
    State(app_state): State<AppState>,
    Path(staff_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    app_state.staff_service.delete_staff(staff_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// PATCH /api/v1/staffs/{id}/password
#[utoipa::path(
    patch,
    path = "/api/v1/staffs/{id}/password",
    tag = "Staffs",
    params(("id" = Uuid, Path, description = "Staff ID")),
    request_body = ChangePasswordPayload,
    responses(
        (status = 204, description = "Password diganti"),
        (status = 404, description = "Staff tidak ditemukan")
    ),
    security(("api_jwt" = []))
)]
pub async fn change_password(
    State(app_state): State<AppState>,
    scope: AccessScope,
    Path(staff_id): Path<Uuid>,
    Json(payload): Json<ChangePasswordPayload>,
) -> Result<StatusCode, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    // Only an admin may rotate someone else's password.
    if !scope.is_admin && scope.staff_id != staff_id {
        return Err(AppError::NotFound("Staff"));
    }

    app_state
        .staff_service
        .change_password(staff_id, payload)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
