// src/models.rs

pub mod annual_job;
pub mod auth;
pub mod client;
pub mod invoice;
pub mod job;
pub mod monthly_job;
pub mod pemeriksaan_job;
pub mod sp2dk_job;
pub mod staff;
