//! CSV export of the tickets and parts tables.
//!
//! Layout: a fixed header line, then one line per record joined with `\n`
//! (no trailing newline). Text fields are wrapped in double quotes with any
//! embedded quote doubled; ids, dates and numbers are written bare.

use werkdesk_inventory::Part;
use werkdesk_repairs::Ticket;

pub const TICKETS_HEADER: &str =
    "Ticket #,Date,Status,Partner,Customer,Phone,Device,Serial/IMEI,Service Type,Price";

pub const PARTS_HEADER: &str =
    "Part ID,Name,Brand,Category,Stock,Min Threshold,Cost,Retail,Supplier,Barcode";

fn quoted(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

fn document(header: &str, rows: impl Iterator<Item = String>) -> String {
    let mut out = String::from(header);
    out.push('\n');
    out.push_str(&rows.collect::<Vec<_>>().join("\n"));
    out
}

pub fn tickets_to_csv(tickets: &[Ticket]) -> String {
    document(
        TICKETS_HEADER,
        tickets.iter().map(|t| {
            format!(
                "{},{},{},{},{},{},{},{},{},{}",
                t.id,
                t.date.format("%Y-%m-%d"),
                quoted(t.status.as_str()),
                quoted(&t.partner),
                quoted(&t.customer),
                quoted(&t.phone),
                quoted(&t.device),
                quoted(&t.serial),
                quoted(&t.service),
                t.price,
            )
        }),
    )
}

pub fn parts_to_csv(parts: &[Part]) -> String {
    document(
        PARTS_HEADER,
        parts.iter().map(|p| {
            format!(
                "{},{},{},{},{},{},{},{},{},{}",
                p.id,
                quoted(&p.name),
                quoted(&p.brand),
                quoted(&p.category),
                p.stock,
                p.threshold,
                p.cost,
                p.retail,
                quoted(&p.supplier),
                quoted(&p.barcode),
            )
        }),
    )
}
