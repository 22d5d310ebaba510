//! Built-in ticket set used when the backend holds no collection yet.

use crate::ticket::Ticket;

const SEED_TICKETS: &str = include_str!("../fixtures/tickets.json");

/// The seed tickets with their embedded orders normalized.
pub fn seed_tickets() -> serde_json::Result<Vec<Ticket>> {
    let mut tickets: Vec<Ticket> = serde_json::from_str(SEED_TICKETS)?;
    for order in tickets.iter_mut().filter_map(|t| t.repair_order_data.as_mut()) {
        order.normalize();
    }
    Ok(tickets)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::order::DeviceType;
    use crate::ticket::TicketStatus;

    #[test]
    fn seed_set_parses() {
        let tickets = seed_tickets().unwrap();
        let ids: Vec<_> = tickets.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["T001", "T002", "T003", "T004"]);
        assert_eq!(tickets[3].status, TicketStatus::Cancelled);
    }

    #[test]
    fn first_ticket_carries_its_order() {
        let tickets = seed_tickets().unwrap();
        let order = tickets[0].repair_order().unwrap();
        assert_eq!(order.device_type, Some(DeviceType::Smartphone));
        assert_eq!(order.grand_total(), 120.0);
        assert_eq!(order.balance_due(), 70.0);
        assert!(tickets[1..].iter().all(|t| t.repair_order().is_none()));
    }
}
