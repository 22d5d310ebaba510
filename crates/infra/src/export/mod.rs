//! Export adapters: CSV tables and printable repair orders.

pub mod csv;
pub mod print;

pub use csv::{PARTS_HEADER, TICKETS_HEADER, parts_to_csv, tickets_to_csv};
pub use print::{
    CompanyProfile, DocumentExporter, ExportError, HtmlPrintExporter, RenderedDocument,
    render_repair_order_html,
};
