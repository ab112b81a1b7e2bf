// src/handlers.rs

pub mod auth;
pub mod clients;
pub mod invoices;
pub mod jobs;
pub mod reports;
pub mod staffs;
