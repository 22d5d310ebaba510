use std::sync::{Arc, Mutex, MutexGuard};

use werkdesk_infra::{
    PersistencePort, RepairOrderStore, Settings, StoreError,
    export::{DocumentExporter, HtmlPrintExporter},
};
use werkdesk_inventory::PartCatalog;
use werkdesk_partners::PartnerDirectory;

/// The ticket store as wired by the API: any backend behind a trait object.
pub type TicketStore = RepairOrderStore<Box<dyn PersistencePort>>;

/// Shared state handed to every handler.
///
/// Each collection sits behind its own mutex, so requests touching the same
/// collection are serialized and every mutation sees the previous one.
pub struct AppServices {
    tickets: Mutex<TicketStore>,
    parts: Mutex<PartCatalog>,
    partners: Mutex<PartnerDirectory>,
    exporter: Arc<dyn DocumentExporter>,
}

impl AppServices {
    pub fn new(
        tickets: TicketStore,
        parts: PartCatalog,
        partners: PartnerDirectory,
        exporter: Arc<dyn DocumentExporter>,
    ) -> Self {
        Self {
            tickets: Mutex::new(tickets),
            parts: Mutex::new(parts),
            partners: Mutex::new(partners),
            exporter,
        }
    }

    pub fn tickets(&self) -> Result<MutexGuard<'_, TicketStore>, LockPoisoned> {
        self.tickets.lock().map_err(|_| LockPoisoned("tickets"))
    }

    pub fn parts(&self) -> Result<MutexGuard<'_, PartCatalog>, LockPoisoned> {
        self.parts.lock().map_err(|_| LockPoisoned("parts"))
    }

    pub fn partners(&self) -> Result<MutexGuard<'_, PartnerDirectory>, LockPoisoned> {
        self.partners.lock().map_err(|_| LockPoisoned("partners"))
    }

    pub fn exporter(&self) -> &dyn DocumentExporter {
        self.exporter.as_ref()
    }
}

/// A handler panicked while holding one of the collection locks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockPoisoned(pub &'static str);

pub fn build_services(settings: &Settings) -> Result<AppServices, StoreError> {
    let persistence = settings.open_persistence()?;
    let tickets = RepairOrderStore::open(persistence)?;
    let parts = PartCatalog::seeded().map_err(StoreError::Fixtures)?;
    let partners = PartnerDirectory::seeded().map_err(StoreError::Fixtures)?;
    let exporter = Arc::new(HtmlPrintExporter::new(settings.company.clone()));

    tracing::info!(
        tickets = tickets.list().len(),
        parts = parts.parts().len(),
        partners = partners.partners().len(),
        "services ready"
    );
    Ok(AppServices::new(tickets, parts, partners, exporter))
}
