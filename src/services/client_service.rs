// src/services/client_service.rs

use bcrypt::hash;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{ClientRepository, JobRepository, StaffRepository},
    models::{
        auth::AccessScope,
        client::{Client, ClientJobsDashboard, CreateClientPayload, UpdateClientPayload},
    },
};

/// Detects a value that is already a bcrypt hash, so a client row fetched and
/// PATCHed back does not get its stored hash re-hashed.
fn is_bcrypt_hash(value: &str) -> bool {
    value.len() == 60
        && (value.starts_with("$2a$") || value.starts_with("$2b$") || value.starts_with("$2y$"))
}

async fn hash_blocking(plain: String) -> Result<String, AppError> {
    let hashed = tokio::task::spawn_blocking(move || hash(&plain, bcrypt::DEFAULT_COST))
        .await
        .map_err(|e| anyhow::anyhow!("password hashing task failed: {e}"))??;
    Ok(hashed)
}

#[derive(Clone)]
pub struct ClientService {
    repo: ClientRepository,
    staff_repo: StaffRepository,
    job_repo: JobRepository,
}

impl ClientService {
    pub fn new(repo: ClientRepository, staff_repo: StaffRepository, job_repo: JobRepository) -> Self {
        Self {
            repo,
            staff_repo,
            job_repo,
        }
    }

    async fn check_pic_staff(&self, staff_id: Uuid) -> Result<(), AppError> {
        if self.staff_repo.find_by_id(staff_id).await?.is_none() {
            return Err(AppError::InvalidInput("PIC Staff ID not found".to_string()));
        }
        Ok(())
    }

    pub async fn create_client(&self, payload: CreateClientPayload) -> Result<Client, AppError> {
        if let Some(staff_id) = payload.pic_staff_sigma_id {
            self.check_pic_staff(staff_id).await?;
        }

        let coretax_password = if payload.coretax_password.is_empty()
            || is_bcrypt_hash(&payload.coretax_password)
        {
            payload.coretax_password.clone()
        } else {
            hash_blocking(payload.coretax_password.clone()).await?
        };

        self.repo.create(&payload, &coretax_password).await
    }

    pub async fn get_client(
        &self,
        client_id: Uuid,
        scope: AccessScope,
    ) -> Result<Client, AppError> {
        self.repo
            .find_by_id(client_id, scope)
            .await?
            .ok_or(AppError::NotFound("Client"))
    }

    pub async fn list_clients(&self, scope: AccessScope) -> Result<Vec<Client>, AppError> {
        self.repo.list(scope).await
    }

    /// Merge update: absent fields keep their stored value. An empty
    /// `coretax_password` is treated as absent.
    pub async fn update_client(
        &self,
        client_id: Uuid,
        scope: AccessScope,
        payload: UpdateClientPayload,
    ) -> Result<Client, AppError> {
        let mut client = self.get_client(client_id, scope).await?;

        if let Some(staff_id) = payload.pic_staff_sigma_id {
            self.check_pic_staff(staff_id).await?;
            client.pic_staff_sigma_id = Some(staff_id);
        }

        if let Some(v) = payload.client_name {
            client.client_name = v;
        }
        if let Some(v) = payload.npwp_client {
            client.npwp_client = v;
        }
        if let Some(v) = payload.address_client {
            client.address_client = v;
        }
        if let Some(v) = payload.membership_status {
            client.membership_status = v;
        }
        if let Some(v) = payload.phone_client {
            client.phone_client = v;
        }
        if let Some(v) = payload.email_client {
            client.email_client = v;
        }
        if let Some(v) = payload.pic_client {
            client.pic_client = v;
        }
        if let Some(v) = payload.djp_online_username {
            client.djp_online_username = v;
        }
        if let Some(v) = payload.coretax_username {
            client.coretax_username = v;
        }
        if let Some(v) = payload.coretax_password {
            if !v.is_empty() {
                client.coretax_password = if is_bcrypt_hash(&v) {
                    v
                } else {
                    hash_blocking(v).await?
                };
            }
        }
        if let Some(v) = payload.client_category {
            client.client_category = v;
        }
        if let Some(v) = payload.pph_final_umkm {
            client.pph_final_umkm = v;
        }
        if let Some(v) = payload.pph_25 {
            client.pph_25 = v;
        }
        if let Some(v) = payload.pph_21 {
            client.pph_21 = v;
        }
        if let Some(v) = payload.pph_unifikasi {
            client.pph_unifikasi = v;
        }
        if let Some(v) = payload.ppn {
            client.ppn = v;
        }
        if let Some(v) = payload.spt_tahunan {
            client.spt_tahunan = v;
        }
        if let Some(v) = payload.pelaporan_deviden {
            client.pelaporan_deviden = v;
        }
        if let Some(v) = payload.laporan_keuangan {
            client.laporan_keuangan = v;
        }
        if let Some(v) = payload.investasi_deviden {
            client.investasi_deviden = v;
        }

        let rows = self.repo.update_row(&client).await?;
        if rows == 0 {
            return Err(AppError::NotFound("Client"));
        }

        self.get_client(client_id, scope).await
    }

    pub async fn delete_client(&self, client_id: Uuid, scope: AccessScope) -> Result<(), AppError> {
        let rows = self.repo.delete(client_id, scope).await?;
        if rows == 0 {
            return Err(AppError::NotFound("Client"));
        }
        Ok(())
    }

    /// Every engagement of every kind for one client, in a single response.
    /// The caller's scope gates the client itself AND each job list, so a
    /// non-admin only sees the engagements assigned to them.
    pub async fn get_client_all_jobs(
        &self,
        client_id: Uuid,
        scope: AccessScope,
    ) -> Result<ClientJobsDashboard, AppError> {
        let client = self.get_client(client_id, scope).await?;

        let monthly_jobs = self
            .job_repo
            .list_for_client::<crate::models::monthly_job::MonthlyJob>(client_id, scope)
            .await?;
        let annual_jobs = self
            .job_repo
            .list_for_client::<crate::models::annual_job::AnnualJob>(client_id, scope)
            .await?;
        let sp2dk_jobs = self
            .job_repo
            .list_for_client::<crate::models::sp2dk_job::Sp2dkJob>(client_id, scope)
            .await?;
        let pemeriksaan_jobs = self
            .job_repo
            .list_for_client::<crate::models::pemeriksaan_job::PemeriksaanJob>(client_id, scope)
            .await?;

        Ok(ClientJobsDashboard {
            client_id: client.client_id,
            client_name: client.client_name,
            npwp_client: client.npwp_client,
            monthly_jobs,
            annual_jobs,
            sp2dk_jobs,
            pemeriksaan_jobs,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_stored_bcrypt_hashes() {
        let hashed = bcrypt::hash("rahasia123", 4).unwrap();
        assert!(is_bcrypt_hash(&hashed));
    }

    #[test]
    fn rejects_plaintext_and_lookalikes() {
        assert!(!is_bcrypt_hash("rahasia123"));
        assert!(!is_bcrypt_hash(""));
        // Right prefix, wrong length.
        assert!(!is_bcrypt_hash("$2b$12$short"));
        // Right length, wrong prefix.
        assert!(!is_bcrypt_hash(&"x".repeat(60)));
    }
}
