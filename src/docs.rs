// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};

use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::login,

        // --- Staffs ---
        handlers::staffs::create_staff,
        handlers::staffs::list_staffs,
        handlers::staffs::get_staff,
        handlers::staffs::update_staff,
        handlers::staffs::delete_staff,
        handlers::staffs::change_password,

        // --- Clients ---
        handlers::clients::create_client,
        handlers::clients::list_clients,
        handlers::clients::get_client,
        handlers::clients::update_client,
        handlers::clients::delete_client,
        handlers::clients::get_client_all_jobs,

        // --- Monthly jobs ---
        handlers::jobs::create_monthly_job,
        handlers::jobs::list_monthly_jobs,
        handlers::jobs::get_monthly_job,
        handlers::jobs::update_monthly_job,
        handlers::jobs::delete_monthly_job,
        handlers::reports::add_monthly_tax_report,
        handlers::reports::update_monthly_tax_report,
        handlers::reports::delete_monthly_tax_report,

        // --- Annual jobs ---
        handlers::jobs::create_annual_job,
        handlers::jobs::list_annual_jobs,
        handlers::jobs::get_annual_job,
        handlers::jobs::update_annual_job,
        handlers::jobs::delete_annual_job,
        handlers::reports::add_annual_tax_report,
        handlers::reports::update_annual_tax_report,
        handlers::reports::delete_annual_tax_report,
        handlers::reports::add_annual_dividend_report,
        handlers::reports::update_annual_dividend_report,
        handlers::reports::delete_annual_dividend_report,

        // --- SP2DK jobs ---
        handlers::jobs::create_sp2dk_job,
        handlers::jobs::list_sp2dk_jobs,
        handlers::jobs::get_sp2dk_job,
        handlers::jobs::update_sp2dk_job,
        handlers::jobs::delete_sp2dk_job,

        // --- Pemeriksaan jobs ---
        handlers::jobs::create_pemeriksaan_job,
        handlers::jobs::list_pemeriksaan_jobs,
        handlers::jobs::get_pemeriksaan_job,
        handlers::jobs::update_pemeriksaan_job,
        handlers::jobs::delete_pemeriksaan_job,

        // --- Invoices ---
        handlers::invoices::create_invoice,
        handlers::invoices::list_invoices,
        handlers::invoices::get_invoice,
        handlers::invoices::update_invoice,
        handlers::invoices::delete_invoice,
        handlers::invoices::get_invoice_pdf,
        handlers::invoices::add_line_item,
        handlers::invoices::update_line_item,
        handlers::invoices::delete_line_item,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::LoginPayload,
            models::auth::AuthResponse,

            // --- Staffs ---
            models::staff::Staff,
            models::staff::CreateStaffPayload,
            models::staff::UpdateStaffPayload,
            models::staff::ChangePasswordPayload,

            // --- Clients ---
            models::client::Client,
            models::client::CreateClientPayload,
            models::client::UpdateClientPayload,
            models::client::ClientJobsDashboard,

            // --- Monthly jobs ---
            models::monthly_job::MonthlyJob,
            models::monthly_job::MonthlyTaxReport,
            models::monthly_job::NewMonthlyJobPayload,
            models::monthly_job::NewMonthlyTaxReportPayload,
            models::monthly_job::UpdateMonthlyTaxReportPayload,

            // --- Annual jobs ---
            models::annual_job::AnnualJob,
            models::annual_job::AnnualTaxReport,
            models::annual_job::AnnualDividendReport,
            models::annual_job::NewAnnualJobPayload,
            models::annual_job::NewAnnualTaxReportPayload,
            models::annual_job::UpdateAnnualTaxReportPayload,
            models::annual_job::NewAnnualDividendReportPayload,
            models::annual_job::UpdateAnnualDividendReportPayload,

            // --- SP2DK / Pemeriksaan ---
            models::sp2dk_job::Sp2dkJob,
            models::sp2dk_job::NewSp2dkJobPayload,
            models::pemeriksaan_job::PemeriksaanJob,
            models::pemeriksaan_job::NewPemeriksaanJobPayload,

            // --- Invoices ---
            models::invoice::Invoice,
            models::invoice::InvoiceLineItem,
            models::invoice::NewInvoicePayload,
            models::invoice::NewInvoiceLineItemPayload,
            models::invoice::UpdateInvoicePayload,
            models::invoice::UpdateInvoiceLineItemPayload,
        )
    ),
    tags(
        (name = "Auth", description = "Login dan token JWT"),
        (name = "Staffs", description = "Administrasi staff internal"),
        (name = "Clients", description = "Administrasi klien"),
        (name = "Monthly Jobs", description = "Pekerjaan bulanan dan laporan pajaknya"),
        (name = "Annual Jobs", description = "Pekerjaan tahunan, SPT, dan laporan dividen"),
        (name = "SP2DK Jobs", description = "Penanganan SP2DK"),
        (name = "Pemeriksaan Jobs", description = "Pendampingan pemeriksaan pajak"),
        (name = "Invoices", description = "Invoice manual dan otomatis beserta PDF")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(
                Http::new(HttpAuthScheme::Bearer)
            ),
        );
    }
}
