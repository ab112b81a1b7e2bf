// src/db/client_repo.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::auth::AccessScope,
    models::client::{Client, CreateClientPayload},
};

const CLIENT_SELECT: &str = "SELECT c.*, s.nama AS pic_staff_sigma_name \
     FROM clients c \
     LEFT JOIN staffs s ON c.pic_staff_sigma_id = s.staff_id";

#[derive(Clone)]
pub struct ClientRepository {
    pool: PgPool,
}

impl ClientRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Inserts the row and reads it back through the display join.
    /// `coretax_password` arrives already hashed.
    pub async fn create(
        &self,
        payload: &CreateClientPayload,
        coretax_password: &str,
    ) -> Result<Client, AppError> {
        let client_id: Uuid = sqlx::query_scalar(
            "INSERT INTO clients ( \
                client_name, npwp_client, address_client, membership_status, phone_client, \
                email_client, pic_client, djp_online_username, coretax_username, coretax_password, \
                pic_staff_sigma_id, client_category, pph_final_umkm, pph_25, pph_21, \
                pph_unifikasi, ppn, spt_tahunan, pelaporan_deviden, laporan_keuangan, \
                investasi_deviden) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, \
                $18, $19, $20, $21) \
             RETURNING client_id",
        )
        .bind(&payload.client_name)
        .bind(&payload.npwp_client)
        .bind(&payload.address_client)
        .bind(&payload.membership_status)
        .bind(&payload.phone_client)
        .bind(&payload.email_client)
        .bind(&payload.pic_client)
        .bind(&payload.djp_online_username)
        .bind(&payload.coretax_username)
        .bind(coretax_password)
        .bind(payload.pic_staff_sigma_id)
        .bind(&payload.client_category)
        .bind(payload.pph_final_umkm)
        .bind(payload.pph_25)
        .bind(payload.pph_21)
        .bind(payload.pph_unifikasi)
        .bind(payload.ppn)
        .bind(payload.spt_tahunan)
        .bind(payload.pelaporan_deviden)
        .bind(payload.laporan_keuangan)
        .bind(payload.investasi_deviden)
        .fetch_one(&self.pool)
        .await?;

        let client = self.find_by_id(client_id, AccessScope::admin()).await?;
        client.ok_or(AppError::NotFound("Client"))
    }

    pub async fn find_by_id(
        &self,
        client_id: Uuid,
        scope: AccessScope,
    ) -> Result<Option<Client>, AppError> {
        let mut sql = format!("{CLIENT_SELECT} WHERE c.client_id = $1");
        if !scope.is_admin {
            sql.push_str(" AND c.pic_staff_sigma_id = $2");
        }

        let mut query = sqlx::query_as::<_, Client>(&sql).bind(client_id);
        if !scope.is_admin {
            query = query.bind(scope.staff_id);
        }
        let client = query.fetch_optional(&self.pool).await?;
        Ok(client)
    }

    pub async fn list(&self, scope: AccessScope) -> Result<Vec<Client>, AppError> {
        let mut sql = CLIENT_SELECT.to_string();
        if !scope.is_admin {
            sql.push_str(" WHERE c.pic_staff_sigma_id = $1");
        }
        sql.push_str(" ORDER BY c.client_name ASC");

        let mut query = sqlx::query_as::<_, Client>(&sql);
        if !scope.is_admin {
            query = query.bind(scope.staff_id);
        }
        let clients = query.fetch_all(&self.pool).await?;
        Ok(clients)
    }

    /// Full-row write of a merged client record.
    pub async fn update_row(&self, client: &Client) -> Result<u64, AppError> {
        let result = sqlx::query(
            "UPDATE clients SET \
                client_name = $1, npwp_client = $2, address_client = $3, membership_status = $4, \
                phone_client = $5, email_client = $6, pic_client = $7, djp_online_username = $8, \
                coretax_username = $9, coretax_password = $10, pic_staff_sigma_id = $11, \
                client_category = $12, pph_final_umkm = $13, pph_25 = $14, pph_21 = $15, \
                pph_unifikasi = $16, ppn = $17, spt_tahunan = $18, pelaporan_deviden = $19, \
                laporan_keuangan = $20, investasi_deviden = $21, updated_at = NOW() \
             WHERE client_id = $22",
        )
        .bind(&client.client_name)
        .bind(&client.npwp_client)
        .bind(&client.address_client)
        .bind(&client.membership_status)
        .bind(&client.phone_client)
        .bind(&client.email_client)
        .bind(&client.pic_client)
        .bind(&client.djp_online_username)
        .bind(&client.coretax_username)
        .bind(&client.coretax_password)
        .bind(client.pic_staff_sigma_id)
        .bind(&client.client_category)
        .bind(client.pph_final_umkm)
        .bind(client.pph_25)
        .bind(client.pph_21)
        .bind(client.pph_unifikasi)
        .bind(client.ppn)
        .bind(client.spt_tahunan)
        .bind(client.pelaporan_deviden)
        .bind(client.laporan_keuangan)
        .bind(client.investasi_deviden)
        .bind(client.client_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    pub async fn delete(&self, client_id: Uuid, scope: AccessScope) -> Result<u64, AppError> {
        let mut sql = "DELETE FROM clients WHERE client_id = $1".to_string();
        if !scope.is_admin {
            sql.push_str(" AND pic_staff_sigma_id = $2");
        }

        let mut query = sqlx::query(&sql).bind(client_id);
        if !scope.is_admin {
            query = query.bind(scope.staff_id);
        }
        let result = query.execute(&self.pool).await?;
        Ok(result.rows_affected())
    }
}
