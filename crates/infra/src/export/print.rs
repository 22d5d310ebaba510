//! Printable repair order documents.
//!
//! [`DocumentExporter`] is the contract a real PDF renderer will implement.
//! Until one exists, [`HtmlPrintExporter`] returns the on-screen order layout
//! as a standalone HTML page for the host's print dialog.

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use werkdesk_core::format_money;
use werkdesk_repairs::{RepairOrder, Ticket, TicketId};

/// Shop details printed in the order header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyProfile {
    pub name: String,
    pub address: String,
    pub contact: String,
}

impl Default for CompanyProfile {
    fn default() -> Self {
        Self {
            name: "WerkDesk Solutions".to_string(),
            address: "123 Tech Street, Innovation City, TX 75001".to_string(),
            contact: "support@werkdesk.com | (555) 123-4567".to_string(),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ExportError {
    #[error("ticket {0} has no repair order to export")]
    NoRepairOrder(TicketId),

    #[error("document rendering failed: {0}")]
    Render(String),
}

/// A rendered document and the media type it should be served as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedDocument {
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

/// Renders one ticket's repair order into a printable document.
pub trait DocumentExporter: Send + Sync {
    fn render_to_pdf(&self, ticket: &Ticket) -> Result<RenderedDocument, ExportError>;
}

/// Stand-in exporter producing print-ready HTML instead of PDF bytes.
#[derive(Debug, Clone, Default)]
pub struct HtmlPrintExporter {
    company: CompanyProfile,
}

impl HtmlPrintExporter {
    pub fn new(company: CompanyProfile) -> Self {
        Self { company }
    }

    pub fn company(&self) -> &CompanyProfile {
        &self.company
    }
}

impl DocumentExporter for HtmlPrintExporter {
    fn render_to_pdf(&self, ticket: &Ticket) -> Result<RenderedDocument, ExportError> {
        let order = ticket
            .repair_order()
            .ok_or_else(|| ExportError::NoRepairOrder(ticket.id.clone()))?;
        let html = render_repair_order_html(&self.company, &ticket.id, order)
            .map_err(|e| ExportError::Render(e.to_string()))?;
        Ok(RenderedDocument {
            content_type: "text/html; charset=utf-8",
            bytes: html.into_bytes(),
        })
    }
}

const TERMS: &str = "Devices not collected within 90 days of notification may be recycled. \
We are not responsible for data loss; please back up your device before repair.";

const STYLE: &str = "body{font-family:sans-serif;margin:1.5rem;color:#1f2937}\
header{display:flex;justify-content:space-between;align-items:flex-start;margin-bottom:1.5rem}\
h1{font-size:28px;margin:0}h2{font-size:18px;margin:1.5rem 0 .5rem}\
table{width:100%;border-collapse:collapse}th,td{border-bottom:1px solid #e5e7eb;padding:.4rem;text-align:left}\
td.num,th.num{text-align:right}dl{display:grid;grid-template-columns:max-content 1fr;gap:.25rem 1rem}\
dt{color:#6b7280}.totals{text-align:right;margin-top:1rem}.terms{border-top:1px dashed #9ca3af;margin-top:2rem;font-size:12px}";

fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn field(out: &mut String, label: &str, value: &str) -> std::fmt::Result {
    write!(out, "<dt>{}</dt><dd>{}</dd>", escape(label), escape(value))
}

/// The order layout as a complete HTML page.
pub fn render_repair_order_html(
    company: &CompanyProfile,
    ticket_id: &TicketId,
    order: &RepairOrder,
) -> Result<String, std::fmt::Error> {
    let mut out = String::new();
    write!(
        out,
        "<!DOCTYPE html><html lang=\"{}\"><head><meta charset=\"utf-8\"><title>Repair Order {}</title><style>{STYLE}</style></head><body>",
        escape(&order.locale),
        escape(ticket_id.as_str()),
    )?;

    write!(
        out,
        "<header><div><h1>{}</h1><p>{}<br>{}</p></div><div><h1>Repair Order</h1><p>Ticket ID: {}</p></div></header>",
        escape(&company.name),
        escape(&company.address),
        escape(&company.contact),
        escape(ticket_id.as_str()),
    )?;

    out.push_str("<section><h2>Customer</h2><dl>");
    let order_date = order
        .order_date
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default();
    field(&mut out, "Order date", &order_date)?;
    field(&mut out, "Customer name", &order.customer_name)?;
    field(&mut out, "Customer phone", &order.customer_phone)?;
    field(&mut out, "Reason for repair", &order.reason)?;
    out.push_str("</dl></section>");

    out.push_str("<section><h2>Device information</h2><dl>");
    field(&mut out, "Device type", order.device_type.map(|t| t.as_str()).unwrap_or(""))?;
    field(&mut out, "Brand", &order.device_brand)?;
    field(&mut out, "Model", &order.device_model)?;
    field(&mut out, "Serial / IMEI", &order.serial_or_imei)?;
    field(&mut out, "Device color", &order.device_color)?;
    field(&mut out, "Display code / password", &order.display_code_or_password)?;
    out.push_str("</dl></section>");

    out.push_str(
        "<section><h2>Parts &amp; services</h2><table><thead><tr><th>Description</th>\
         <th class=\"num\">Qty</th><th class=\"num\">Unit price</th><th class=\"num\">Item total</th></tr></thead><tbody>",
    );
    for item in order.line_items() {
        write!(
            out,
            "<tr><td>{}</td><td class=\"num\">{}</td><td class=\"num\">{}</td><td class=\"num\">{}</td></tr>",
            escape(&item.description),
            item.qty(),
            format_money(item.unit_price()),
            format_money(item.total()),
        )?;
    }
    out.push_str("</tbody></table></section>");

    write!(
        out,
        "<section class=\"totals\"><p>Estimated cost: {}</p><p>Prepayment: {}</p>\
         <p>Subtotal parts &amp; services: <strong>{}</strong></p><p>Balance due: <strong>{}</strong></p></section>",
        format_money(order.estimated_cost),
        format_money(order.prepayment),
        format_money(order.grand_total()),
        format_money(order.balance_due()),
    )?;

    if !order.notes.trim().is_empty() {
        write!(out, "<section><h2>Additional notes</h2><p>{}</p></section>", escape(&order.notes))?;
    }

    write!(
        out,
        "<section class=\"terms\"><h4>Terms &amp; conditions</h4><p>{TERMS}</p></section></body></html>"
    )?;
    Ok(out)
}
