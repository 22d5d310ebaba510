//! Pre-save validation.
//!
//! Rules run only on create/update. Records already in storage are never
//! re-validated, so everything downstream must tolerate invalid legacy data.

use werkdesk_core::{DomainError, DomainResult};

use crate::order::RepairOrder;
use crate::ticket::{NewTicket, TicketPatch};

fn require(value: &str, field: &'static str) -> DomainResult<()> {
    if value.trim().is_empty() {
        return Err(DomainError::missing_field(field));
    }
    Ok(())
}

/// A repair order needs a customer, a device type and a reason.
pub fn validate_repair_order(order: &RepairOrder) -> DomainResult<()> {
    require(&order.customer_name, "customerName")?;
    if order.device_type.is_none() {
        return Err(DomainError::missing_field("deviceType"));
    }
    require(&order.reason, "reason")?;
    if order.prepayment < 0.0 {
        return Err(DomainError::validation("prepayment must be >= 0"));
    }
    Ok(())
}

/// A new ticket needs a customer, a device and a price.
pub fn validate_new_ticket(ticket: &NewTicket) -> DomainResult<()> {
    require(&ticket.customer, "customer")?;
    require(&ticket.device, "device")?;
    match ticket.price {
        None => Err(DomainError::missing_field("price")),
        Some(price) if price < 0.0 => Err(DomainError::validation("price must be >= 0")),
        Some(_) => Ok(()),
    }
}

/// An edit may change required fields but not blank them.
pub fn validate_ticket_patch(patch: &TicketPatch) -> DomainResult<()> {
    if let Some(customer) = &patch.customer {
        require(customer, "customer")?;
    }
    if let Some(device) = &patch.device {
        require(device, "device")?;
    }
    if matches!(patch.price, Some(price) if price < 0.0) {
        return Err(DomainError::validation("price must be >= 0"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::order::DeviceType;
    use chrono::NaiveDate;

    fn valid_order() -> RepairOrder {
        let mut order = RepairOrder::blank(NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(), "en");
        order.customer_name = "Alice Smith".into();
        order.device_type = Some(DeviceType::Smartphone);
        order.reason = "Cracked screen".into();
        order
    }

    #[test]
    fn complete_order_passes() {
        assert_eq!(validate_repair_order(&valid_order()), Ok(()));
    }

    #[test]
    fn order_reports_first_missing_field() {
        let mut order = valid_order();
        order.customer_name = "   ".into();
        assert_eq!(
            validate_repair_order(&order),
            Err(DomainError::MissingField("customerName"))
        );

        let mut order = valid_order();
        order.device_type = None;
        assert_eq!(validate_repair_order(&order).unwrap_err().missing(), Some("deviceType"));

        let mut order = valid_order();
        order.reason.clear();
        assert_eq!(validate_repair_order(&order).unwrap_err().missing(), Some("reason"));
    }

    #[test]
    fn negative_prepayment_is_rejected() {
        let mut order = valid_order();
        order.prepayment = -1.0;
        assert!(matches!(validate_repair_order(&order), Err(DomainError::Validation(_))));
    }

    #[test]
    fn new_ticket_requires_customer_device_and_price() {
        let mut ticket = NewTicket {
            customer: "Bob".into(),
            device: "Pixel 7".into(),
            price: Some(0.0),
            ..NewTicket::default()
        };
        assert_eq!(validate_new_ticket(&ticket), Ok(()));

        ticket.price = None;
        assert_eq!(validate_new_ticket(&ticket).unwrap_err().missing(), Some("price"));

        ticket.price = Some(10.0);
        ticket.customer = String::new();
        assert_eq!(validate_new_ticket(&ticket).unwrap_err().missing(), Some("customer"));
    }

    #[test]
    fn patch_may_not_blank_required_fields() {
        assert_eq!(validate_ticket_patch(&TicketPatch::default()), Ok(()));

        let patch = TicketPatch {
            device: Some(" ".into()),
            ..TicketPatch::default()
        };
        assert_eq!(validate_ticket_patch(&patch).unwrap_err().missing(), Some("device"));
    }
}
