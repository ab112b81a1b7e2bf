// src/models/client.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// A billable client. `pic_staff_sigma_name` comes from a JOIN with `staffs`
/// and is display-only.
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
pub struct Client {
    pub client_id: Uuid,
    pub client_name: String,
    pub npwp_client: String,
    pub address_client: String,
    pub membership_status: String,
    pub phone_client: String,
    pub email_client: String,
    pub pic_client: String,
    pub djp_online_username: String,
    pub coretax_username: String,

    // Stored bcrypt-hashed; never leaves the server.
    #[serde(skip_serializing)]
    #[schema(ignore)]
    pub coretax_password: String,

    pub pic_staff_sigma_id: Option<Uuid>,
    pub pic_staff_sigma_name: Option<String>,
    pub client_category: String,

    // Layanan pajak
    pub pph_final_umkm: bool,
    pub pph_25: bool,
    pub pph_21: bool,
    pub pph_unifikasi: bool,
    pub ppn: bool,
    pub spt_tahunan: bool,
    pub pelaporan_deviden: bool,
    pub laporan_keuangan: bool,
    pub investasi_deviden: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateClientPayload {
    #[validate(length(min = 1, message = "Client name is required."))]
    #[schema(example = "PT Maju Bersama")]
    pub client_name: String,

    #[validate(length(min = 1, message = "NPWP is required."))]
    #[schema(example = "01.234.567.8-901.000")]
    pub npwp_client: String,

    #[serde(default)]
    pub address_client: String,
    #[serde(default)]
    #[schema(example = "Aktif")]
    pub membership_status: String,
    #[serde(default)]
    pub phone_client: String,
    #[serde(default)]
    pub email_client: String,
    #[serde(default)]
    pub pic_client: String,
    #[serde(default)]
    pub djp_online_username: String,
    #[serde(default)]
    pub coretax_username: String,
    #[serde(default)]
    pub coretax_password: String,

    pub pic_staff_sigma_id: Option<Uuid>,

    #[serde(default)]
    #[schema(example = "Badan")]
    pub client_category: String,

    #[serde(default)]
    pub pph_final_umkm: bool,
    #[serde(default)]
    pub pph_25: bool,
    #[serde(default)]
    pub pph_21: bool,
    #[serde(default)]
    pub pph_unifikasi: bool,
    #[serde(default)]
    pub ppn: bool,
    #[serde(default)]
    pub spt_tahunan: bool,
    #[serde(default)]
    pub pelaporan_deviden: bool,
    #[serde(default)]
    pub laporan_keuangan: bool,
    #[serde(default)]
    pub investasi_deviden: bool,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateClientPayload {
    #[validate(length(min = 1, message = "Client name cannot be empty."))]
    pub client_name: Option<String>,
    pub npwp_client: Option<String>,
    pub address_client: Option<String>,
    pub membership_status: Option<String>,
    pub phone_client: Option<String>,
    pub email_client: Option<String>,
    pub pic_client: Option<String>,
    pub djp_online_username: Option<String>,
    pub coretax_username: Option<String>,
    pub coretax_password: Option<String>,
    pub pic_staff_sigma_id: Option<Uuid>,
    pub client_category: Option<String>,
    pub pph_final_umkm: Option<bool>,
    pub pph_25: Option<bool>,
    pub pph_21: Option<bool>,
    pub pph_unifikasi: Option<bool>,
    pub ppn: Option<bool>,
    pub spt_tahunan: Option<bool>,
    pub pelaporan_deviden: Option<bool>,
    pub laporan_keuangan: Option<bool>,
    pub investasi_deviden: Option<bool>,
}

/// Aggregated per-client view: every engagement of every kind, as served by
/// `GET /clients/{id}/all-jobs`.
#[derive(Debug, Serialize, ToSchema)]
pub struct ClientJobsDashboard {
    pub client_id: Uuid,
    pub client_name: String,
    pub npwp_client: String,
    pub monthly_jobs: Vec<crate::models::monthly_job::MonthlyJob>,
    pub annual_jobs: Vec<crate::models::annual_job::AnnualJob>,
    pub sp2dk_jobs: Vec<crate::models::sp2dk_job::Sp2dkJob>,
    pub pemeriksaan_jobs: Vec<crate::models::pemeriksaan_job::PemeriksaanJob>,
}
