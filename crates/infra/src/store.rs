//! The repair order store: owner of the ticket collection.
//!
//! Every mutation writes the **entire** collection through the persistence
//! port before returning. If that write fails the mutation is rolled back, so
//! the in-memory collection never drifts from what the backend holds.

use chrono::NaiveDate;
use thiserror::Error;

use werkdesk_core::{DomainError, IdSequence, position_of};
use werkdesk_repairs::fixtures::seed_tickets;
use werkdesk_repairs::{
    NewTicket, RepairOrder, StatusCounts, Ticket, TicketId, TicketPatch, validate_new_ticket,
    validate_repair_order, validate_ticket_patch,
};

use crate::persistence::{PersistenceError, PersistencePort};
use crate::query::TicketQuery;

/// Store operation error.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Persistence(#[from] PersistenceError),

    #[error("built-in fixtures are invalid: {0}")]
    Fixtures(#[source] serde_json::Error),
}

impl StoreError {
    pub fn domain(&self) -> Option<&DomainError> {
        match self {
            StoreError::Domain(e) => Some(e),
            _ => None,
        }
    }
}

/// Owns the ticket collection (newest first) and its persistence.
///
/// Reads hand out borrowed views or clones; nothing outside the store can
/// mutate the collection without going through an operation that persists.
#[derive(Debug)]
pub struct RepairOrderStore<P> {
    persistence: P,
    tickets: Vec<Ticket>,
    ids: IdSequence<TicketId>,
}

impl<P: PersistencePort> RepairOrderStore<P> {
    /// Hydrate from the backend, seeding (and persisting) the built-in
    /// fixtures when nothing has been stored yet.
    pub fn open(persistence: P) -> Result<Self, StoreError> {
        let (tickets, seeded) = match persistence.load()? {
            Some(tickets) => (tickets, false),
            None => (seed_tickets().map_err(StoreError::Fixtures)?, true),
        };

        let high_water = persistence.load_high_water()?;
        let mut store = Self::with_tickets(persistence, tickets);
        if let Some(issued) = high_water {
            store.ids.resume_after(issued);
        }
        if seeded {
            store.persistence.save(&store.tickets)?;
            tracing::info!(count = store.tickets.len(), "seeded ticket collection");
        } else {
            tracing::info!(count = store.tickets.len(), "hydrated ticket collection");
        }
        Ok(store)
    }

    /// Wrap an already loaded collection without touching the backend.
    ///
    /// Stored orders are normalized (totals recomputed, line ids deduped) but
    /// never re-validated.
    pub fn with_tickets(persistence: P, mut tickets: Vec<Ticket>) -> Self {
        for order in tickets.iter_mut().filter_map(|t| t.repair_order_data.as_mut()) {
            order.normalize();
        }
        let ids = IdSequence::starting_after(tickets.iter().map(|t| &t.id));
        Self {
            persistence,
            tickets,
            ids,
        }
    }

    pub fn list(&self) -> &[Ticket] {
        &self.tickets
    }

    /// An owned copy of the collection.
    pub fn snapshot(&self) -> Vec<Ticket> {
        self.tickets.clone()
    }

    pub fn get(&self, id: &TicketId) -> Option<&Ticket> {
        self.tickets.iter().find(|t| &t.id == id)
    }

    pub fn query(&self, query: &TicketQuery) -> Vec<Ticket> {
        query.apply(&self.tickets)
    }

    pub fn status_counts(&self) -> StatusCounts {
        werkdesk_repairs::status_counts(&self.tickets)
    }

    pub fn partners(&self) -> Vec<String> {
        werkdesk_repairs::partners(&self.tickets)
    }

    pub fn persistence(&self) -> &P {
        &self.persistence
    }

    /// Validate and open a new ticket at the front of the collection.
    pub fn create(&mut self, new: NewTicket, today: NaiveDate) -> Result<Ticket, StoreError> {
        validate_new_ticket(&new)?;

        let id = self.ids.next_id();
        // Record the id as issued before the ticket exists anywhere, so a
        // later delete plus restart cannot hand it out again.
        self.persistence.save_high_water(self.ids.last_issued())?;
        let ticket = Ticket::open(id, new, today);
        let created = ticket.clone();

        self.mutate(|tickets| tickets.insert(0, ticket))?;
        tracing::info!(ticket_id = %created.id, "ticket created");
        Ok(created)
    }

    /// Merge `patch` into a ticket. Unknown ids are a silent no-op (`Ok(None)`).
    pub fn update(&mut self, id: &TicketId, patch: &TicketPatch) -> Result<Option<Ticket>, StoreError> {
        validate_ticket_patch(patch)?;

        let Some(index) = self.position(id) else {
            tracing::debug!(ticket_id = %id, "update of unknown ticket ignored");
            return Ok(None);
        };

        self.mutate(|tickets| tickets[index].apply_patch(patch))?;
        tracing::info!(ticket_id = %id, "ticket updated");
        Ok(Some(self.tickets[index].clone()))
    }

    /// Validate `order`, embed it in its ticket and mirror its customer,
    /// phone, price and summary onto the ticket. Unknown ids are a no-op.
    pub fn save_repair_order(
        &mut self,
        id: &TicketId,
        order: RepairOrder,
    ) -> Result<Option<Ticket>, StoreError> {
        validate_repair_order(&order)?;

        let Some(index) = self.position(id) else {
            tracing::debug!(ticket_id = %id, "repair order for unknown ticket ignored");
            return Ok(None);
        };

        let order = order.normalized();
        let grand_total = order.grand_total();
        self.mutate(|tickets| tickets[index].attach_repair_order(order))?;
        tracing::info!(ticket_id = %id, grand_total, "repair order saved");
        Ok(Some(self.tickets[index].clone()))
    }

    /// Remove a ticket together with its embedded order. Idempotent: returns
    /// `Ok(false)` without persisting when the id is unknown.
    pub fn delete(&mut self, id: &TicketId) -> Result<bool, StoreError> {
        let Some(index) = self.position(id) else {
            tracing::debug!(ticket_id = %id, "delete of unknown ticket ignored");
            return Ok(false);
        };

        self.mutate(|tickets| {
            tickets.remove(index);
        })?;
        tracing::info!(ticket_id = %id, "ticket deleted");
        Ok(true)
    }

    fn position(&self, id: &TicketId) -> Option<usize> {
        position_of(&self.tickets, id)
    }

    /// Apply `change`, persist the whole collection, and restore the previous
    /// collection if the write fails.
    fn mutate(&mut self, change: impl FnOnce(&mut Vec<Ticket>)) -> Result<(), StoreError> {
        let previous = self.tickets.clone();
        change(&mut self.tickets);

        if let Err(err) = self.persistence.save(&self.tickets) {
            tracing::error!(error = %err, "persisting ticket collection failed; change rolled back");
            self.tickets = previous;
            return Err(err.into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    use werkdesk_repairs::{DeviceType, TicketStatus};

    use crate::persistence::{InMemoryKeyValueStore, KeyValuePersistence, KeyValueStore};

    /// Backend whose writes can be switched to fail.
    #[derive(Debug, Default)]
    struct FlakyBackend {
        inner: InMemoryKeyValueStore,
        fail_writes: AtomicBool,
    }

    impl KeyValueStore for FlakyBackend {
        fn get(&self, key: &str) -> Result<Option<String>, PersistenceError> {
            self.inner.get(key)
        }

        fn set(&self, key: &str, value: &str) -> Result<(), PersistenceError> {
            if self.fail_writes.load(Ordering::SeqCst) {
                return Err(PersistenceError::Backend("quota exceeded".to_string()));
            }
            self.inner.set(key, value)
        }

        fn remove(&self, key: &str) -> Result<(), PersistenceError> {
            self.inner.remove(key)
        }
    }

    type TestStore = RepairOrderStore<KeyValuePersistence<Arc<FlakyBackend>>>;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    fn open() -> (TestStore, Arc<FlakyBackend>) {
        let backend = Arc::new(FlakyBackend::default());
        let store = RepairOrderStore::open(KeyValuePersistence::new(backend.clone(), "werkdeskTickets"))
            .unwrap();
        (store, backend)
    }

    fn reopen(backend: &Arc<FlakyBackend>) -> TestStore {
        RepairOrderStore::open(KeyValuePersistence::new(backend.clone(), "werkdeskTickets")).unwrap()
    }

    fn new_ticket(customer: &str) -> NewTicket {
        NewTicket {
            customer: customer.into(),
            phone: "555-0101".into(),
            device: "Google Pixel 7".into(),
            service: "Screen Repair".into(),
            price: Some(120.0),
            summary: "Dropped phone".into(),
            ..NewTicket::default()
        }
    }

    fn ids<P: PersistencePort>(store: &RepairOrderStore<P>) -> Vec<&str> {
        store.list().iter().map(|t| t.id.as_str()).collect()
    }

    #[test]
    fn empty_backend_is_seeded_and_persisted() {
        let (store, backend) = open();
        assert_eq!(ids(&store), vec!["T001", "T002", "T003", "T004"]);
        assert!(backend.get("werkdeskTickets").unwrap().is_some());
    }

    #[test]
    fn existing_collection_is_not_reseeded() {
        let (mut store, backend) = open();
        store.delete(&TicketId::new("T001")).unwrap();
        store.delete(&TicketId::new("T003")).unwrap();

        let reopened = reopen(&backend);
        assert_eq!(ids(&reopened), vec!["T002", "T004"]);
    }

    #[test]
    fn empty_stored_collection_stays_empty() {
        let backend = Arc::new(FlakyBackend::default());
        backend.set("werkdeskTickets", "[]").unwrap();
        let store = reopen(&backend);
        assert!(store.list().is_empty());
    }

    #[test]
    fn create_prepends_and_persists() {
        let (mut store, backend) = open();
        let ticket = store.create(new_ticket("Eve Adams"), today()).unwrap();

        assert_eq!(ticket.id.as_str(), "T005");
        assert_eq!(ticket.status, TicketStatus::New);
        assert_eq!(ticket.date, today());
        assert_eq!(store.list()[0], ticket);
        assert_eq!(reopen(&backend).list()[0], ticket);
    }

    #[test]
    fn invalid_ticket_is_rejected_and_not_listed() {
        let (mut store, backend) = open();
        let err = store.create(new_ticket(""), today()).unwrap_err();

        assert_eq!(err.domain().and_then(DomainError::missing), Some("customer"));
        assert_eq!(store.list().len(), 4);
        assert!(store.list().iter().all(|t| !t.customer.is_empty()));
        assert_eq!(reopen(&backend).list().len(), 4);
    }

    #[test]
    fn ids_do_not_collide_after_deletion() {
        let (mut store, _) = open();
        store.delete(&TicketId::new("T002")).unwrap();
        let created = store.create(new_ticket("Frank"), today()).unwrap();

        assert_eq!(created.id.as_str(), "T005");
        let mut all: Vec<_> = ids(&store);
        all.sort();
        all.dedup();
        assert_eq!(all.len(), store.list().len());
    }

    #[test]
    fn deleting_keeps_relative_order() {
        let backend = Arc::new(FlakyBackend::default());
        let tickets: Vec<Ticket> = seed_tickets().unwrap().into_iter().take(3).collect();
        let mut store = RepairOrderStore::with_tickets(
            KeyValuePersistence::new(backend.clone(), "werkdeskTickets"),
            tickets,
        );

        assert!(store.delete(&TicketId::new("T002")).unwrap());
        assert_eq!(ids(&store), vec!["T001", "T003"]);
        assert_eq!(ids(&reopen(&backend)), vec!["T001", "T003"]);
    }

    #[test]
    fn deleting_unknown_id_is_a_no_op() {
        let (mut store, _) = open();
        assert!(!store.delete(&TicketId::new("T999")).unwrap());
        assert_eq!(store.list().len(), 4);
    }

    #[test]
    fn update_merges_and_ignores_unknown_ids() {
        let (mut store, backend) = open();
        let patch = TicketPatch::status(TicketStatus::ReadyForPickup);

        let updated = store.update(&TicketId::new("T001"), &patch).unwrap().unwrap();
        assert_eq!(updated.status, TicketStatus::ReadyForPickup);
        assert_eq!(updated.customer, "Alice Smith");
        assert_eq!(
            reopen(&backend).get(&TicketId::new("T001")).unwrap().status,
            TicketStatus::ReadyForPickup
        );

        assert_eq!(store.update(&TicketId::new("T404"), &patch).unwrap(), None);
    }

    #[test]
    fn saving_an_order_propagates_to_the_ticket() {
        let (mut store, backend) = open();
        let id = TicketId::new("T002");
        let ticket = store.get(&id).unwrap().clone();

        let mut order = RepairOrder::draft_for_ticket(&ticket, today(), "en");
        order.device_type = Some(DeviceType::Smartphone);
        order.customer_phone = "555-9999".into();
        order.estimated_cost = 95.0;
        order.prepayment = 20.0;
        let line = order.line_items()[0].id;
        order.line_item_mut(line).unwrap().set_unit_price(60.0);
        order.push_line_item("Labour", 1.0, 35.0);

        let saved = store.save_repair_order(&id, order).unwrap().unwrap();
        assert_eq!(saved.phone, "555-9999");
        assert_eq!(saved.price, 95.0);
        let embedded = saved.repair_order().unwrap();
        assert_eq!(embedded.grand_total(), 95.0);
        assert_eq!(embedded.balance_due(), 75.0);

        // Other tickets are untouched.
        assert!(store.get(&TicketId::new("T003")).unwrap().repair_order().is_none());
        assert_eq!(reopen(&backend).get(&id), Some(&saved));
    }

    #[test]
    fn invalid_order_is_not_saved() {
        let (mut store, _) = open();
        let id = TicketId::new("T002");
        let order = RepairOrder::draft_for_ticket(store.get(&id).unwrap(), today(), "en");

        let err = store.save_repair_order(&id, order).unwrap_err();
        assert_eq!(err.domain().and_then(DomainError::missing), Some("deviceType"));
        assert!(store.get(&id).unwrap().repair_order().is_none());
    }

    #[test]
    fn failed_write_rolls_back() {
        let (mut store, backend) = open();
        let before = store.snapshot();
        backend.fail_writes.store(true, Ordering::SeqCst);

        let err = store.create(new_ticket("Grace"), today()).unwrap_err();
        assert!(matches!(err, StoreError::Persistence(PersistenceError::Backend(_))));
        assert!(store.delete(&TicketId::new("T001")).is_err());
        assert!(store
            .update(&TicketId::new("T002"), &TicketPatch::status(TicketStatus::Cancelled))
            .is_err());
        assert_eq!(store.snapshot(), before);

        backend.fail_writes.store(false, Ordering::SeqCst);
        let created = store.create(new_ticket("Grace"), today()).unwrap();
        assert!(store.get(&created.id).is_some());
    }

    #[test]
    fn round_trip_reload_is_field_for_field() {
        let (mut store, backend) = open();
        store.create(new_ticket("Heidi"), today()).unwrap();
        store
            .update(&TicketId::new("T004"), &TicketPatch::status(TicketStatus::New))
            .unwrap();

        assert_eq!(reopen(&backend).snapshot(), store.snapshot());
    }

    #[test]
    fn deleted_id_is_not_reissued_after_restart() {
        let (mut store, backend) = open();
        let first = store.create(new_ticket("Judy"), today()).unwrap();
        assert_eq!(first.id.as_str(), "T005");
        assert!(store.delete(&first.id).unwrap());

        let mut store = reopen(&backend);
        let second = store.create(new_ticket("Karl"), today()).unwrap();
        assert_eq!(second.id.as_str(), "T006");
    }

    #[test]
    fn blank_order_date_does_not_block_loading() {
        let backend = Arc::new(FlakyBackend::default());
        backend
            .set(
                "werkdeskTickets",
                r#"[{"id":"T001","date":"2024-05-01","status":"New","customer":"Alice","price":50,
                    "repairOrderData":{"orderDate":"","customerName":"Alice","prepayment":10,
                    "partsAndServices":[{"id":1,"qty":1,"unitPrice":50}]}},
                   {"id":"T002","date":"2024-05-03","status":"In Progress","customer":"Bob","price":80,
                    "repairOrderData":null}]"#,
            )
            .unwrap();

        let store = reopen(&backend);
        assert_eq!(ids(&store), vec!["T001", "T002"]);
        let order = store.list()[0].repair_order().unwrap();
        assert_eq!(order.order_date, None);
        assert_eq!(order.balance_due(), 40.0);
    }

    #[test]
    fn legacy_records_hydrate_without_validation() {
        let backend = Arc::new(FlakyBackend::default());
        backend
            .set(
                "werkdeskTickets",
                r#"[{"id":"W-17","date":"05/03/2024","status":"New","customer":"","price":"abc",
                    "repairOrderData":{"orderDate":"2024-05-03","customerName":"","deviceType":"",
                    "partsAndServices":[{"id":1,"qty":"2","unitPrice":"10","total":0}]}}]"#,
            )
            .unwrap();

        let mut store = reopen(&backend);
        let ticket = &store.list()[0];
        assert_eq!(ticket.price, 0.0);
        assert_eq!(ticket.repair_order().unwrap().grand_total(), 20.0);

        // Non-canonical ids are kept; new ids still start at T001.
        let created = store.create(new_ticket("Ivan"), today()).unwrap();
        assert_eq!(created.id.as_str(), "T001");
    }
}
