// src/services/pdf_service.rs

use genpdf::{Element, elements, style};
use image::Luma;
use qrcode::QrCode;
use rust_decimal::Decimal;

use crate::{common::error::AppError, models::invoice::Invoice};

/// "Rp 1.500.000" / "Rp 1.500.000,50". Indonesian grouping, comma fraction,
/// whole amounts shown without cents.
fn format_rupiah(amount: &Decimal) -> String {
    let rounded = amount.round_dp(2);
    let raw = rounded.abs().to_string();

    let (int_part, frac_part) = match raw.split_once('.') {
        Some((int, frac)) => {
            let frac = frac.trim_end_matches('0');
            if frac.is_empty() {
                (int, None)
            } else {
                (int, Some(format!("{frac:0<2}")))
            }
        }
        None => (raw.as_str(), None),
    };

    let digits: Vec<char> = int_part.chars().collect();
    let mut grouped = String::new();
    for (i, c) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(*c);
    }

    let sign = if rounded.is_sign_negative() { "-" } else { "" };
    match frac_part {
        Some(frac) => format!("Rp {sign}{grouped},{frac}"),
        None => format!("Rp {sign}{grouped}"),
    }
}

fn pdf_error(e: impl ToString) -> AppError {
    AppError::InternalServerError(anyhow::Error::msg(e.to_string()))
}

/// Renders invoices into printable PDFs. Fonts are loaded per call from the
/// `./fonts` directory next to the binary.
#[derive(Clone)]
pub struct PdfService;

impl PdfService {
    pub fn new() -> Self {
        Self
    }

    pub fn render_invoice(&self, invoice: &Invoice) -> Result<Vec<u8>, AppError> {
        let font_family = genpdf::fonts::from_files("./fonts", "Roboto", None)
            .map_err(|_| AppError::FontNotFound("Roboto not found in ./fonts".to_string()))?;

        let mut doc = genpdf::Document::new(font_family);
        doc.set_title(format!("Invoice {}", invoice.invoice_number));
        let mut decorator = genpdf::SimplePageDecorator::new();
        decorator.set_margins(10);
        doc.set_page_decorator(decorator);

        // --- LETTERHEAD ---
        doc.push(
            elements::Paragraph::new("SIGMA KONSULTAN PAJAK")
                .styled(style::Style::new().bold().with_font_size(18)),
        );
        doc.push(
            elements::Paragraph::new("Jasa Akuntansi dan Perpajakan")
                .styled(style::Style::new().with_font_size(10)),
        );
        doc.push(elements::Break::new(1.5));

        doc.push(
            elements::Paragraph::new(format!("INVOICE {}", invoice.invoice_number))
                .styled(style::Style::new().bold().with_font_size(14)),
        );
        doc.push(elements::Paragraph::new(format!(
            "Tanggal: {}",
            invoice.invoice_date.format("%d/%m/%Y")
        )));
        doc.push(elements::Paragraph::new(format!(
            "Jatuh tempo: {}",
            invoice.due_date.format("%d/%m/%Y")
        )));
        doc.push(elements::Paragraph::new(format!("Status: {}", invoice.status)));
        doc.push(elements::Break::new(1));

        // --- PAYEE BLOCK ---
        doc.push(elements::Paragraph::new("Ditagihkan kepada:").styled(style::Style::new().bold()));
        doc.push(elements::Paragraph::new(invoice.client_name.clone()));
        doc.push(elements::Paragraph::new(format!("NPWP: {}", invoice.npwp_client)));
        if let Some(staff) = &invoice.assigned_staff_name {
            doc.push(elements::Paragraph::new(format!("PIC Sigma: {staff}")));
        }
        doc.push(elements::Break::new(2));

        // --- LINE ITEMS ---
        // Column weights: description (5), qty (1), unit price (2), amount (2).
        let mut table = elements::TableLayout::new(vec![5, 1, 2, 2]);
        table.set_cell_decorator(elements::FrameCellDecorator::new(true, true, false));

        let bold = style::Style::new().bold();
        table
            .row()
            .element(elements::Paragraph::new("Deskripsi").styled(bold))
            .element(elements::Paragraph::new("Qty").styled(bold))
            .element(elements::Paragraph::new("Harga Satuan").styled(bold))
            .element(elements::Paragraph::new("Jumlah").styled(bold))
            .push()
            .map_err(pdf_error)?;

        for item in &invoice.line_items {
            table
                .row()
                .element(elements::Paragraph::new(item.description.clone()))
                .element(elements::Paragraph::new(
                    item.quantity.normalize().to_string(),
                ))
                .element(elements::Paragraph::new(format_rupiah(&item.unit_price)))
                .element(elements::Paragraph::new(format_rupiah(&item.amount)))
                .push()
                .map_err(pdf_error)?;
        }

        doc.push(table);
        doc.push(elements::Break::new(1));

        let mut total = elements::Paragraph::new(format!(
            "TOTAL: {}",
            format_rupiah(&invoice.total_amount)
        ));
        total.set_alignment(genpdf::Alignment::Right);
        doc.push(total.styled(style::Style::new().bold().with_font_size(12)));

        if let Some(notes) = &invoice.notes {
            doc.push(elements::Break::new(1));
            doc.push(
                elements::Paragraph::new(notes.clone())
                    .styled(style::Style::new().italic().with_font_size(9)),
            );
        }

        // --- QR CODE ---
        // Carries the invoice number so a printed copy can be looked up.
        doc.push(elements::Break::new(2));
        let code = QrCode::new(invoice.invoice_number.as_bytes()).map_err(pdf_error)?;
        let image_buffer = code.render::<Luma<u8>>().build();
        let dynamic_image = image::DynamicImage::ImageLuma8(image_buffer);
        let pdf_image = genpdf::elements::Image::from_dynamic_image(dynamic_image)
            .map_err(pdf_error)?
            .with_scale(genpdf::Scale::new(0.5, 0.5));
        doc.push(pdf_image);

        let mut buffer = Vec::new();
        doc.render(&mut buffer).map_err(pdf_error)?;

        Ok(buffer)
    }
}

impl Default for PdfService {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rupiah_grouping_uses_dots() {
        assert_eq!(format_rupiah(&Decimal::from(0)), "Rp 0");
        assert_eq!(format_rupiah(&Decimal::from(950)), "Rp 950");
        assert_eq!(format_rupiah(&Decimal::from(1_500_000)), "Rp 1.500.000");
        assert_eq!(format_rupiah(&Decimal::from(10_000_000)), "Rp 10.000.000");
    }

    #[test]
    fn rupiah_fraction_uses_comma() {
        let with_cents = Decimal::new(150_000_050, 2); // 1.500.000,50
        assert_eq!(format_rupiah(&with_cents), "Rp 1.500.000,50");
        // A fraction that rounds away is dropped entirely.
        let near_whole = Decimal::new(1_000_004, 3); // 1000,004
        assert_eq!(format_rupiah(&near_whole), "Rp 1.000");
    }
}
