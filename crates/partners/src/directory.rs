//! In-memory partner directory.

use werkdesk_core::{DomainResult, IdSequence, position_of};

use crate::partner::{NewPartner, Partner, PartnerId, PartnerPatch};

const SEED_PARTNERS: &str = include_str!("../fixtures/partners.json");

/// Partners held in memory, newest first.
#[derive(Debug, Clone)]
pub struct PartnerDirectory {
    partners: Vec<Partner>,
    ids: IdSequence<PartnerId>,
}

impl PartnerDirectory {
    pub fn new(partners: Vec<Partner>) -> Self {
        let ids = IdSequence::starting_after(partners.iter().map(|p| &p.id));
        Self { partners, ids }
    }

    /// Directory preloaded with the built-in partners.
    pub fn seeded() -> serde_json::Result<Self> {
        Ok(Self::new(serde_json::from_str(SEED_PARTNERS)?))
    }

    pub fn partners(&self) -> &[Partner] {
        &self.partners
    }

    pub fn get(&self, id: &PartnerId) -> Option<&Partner> {
        position_of(&self.partners, id).map(|i| &self.partners[i])
    }

    pub fn create(&mut self, new: NewPartner) -> DomainResult<Partner> {
        new.validate()?;
        let partner = new.into_partner(self.ids.next_id());
        self.partners.insert(0, partner.clone());
        Ok(partner)
    }

    /// `Ok(None)` when no partner has this id.
    pub fn update(&mut self, id: &PartnerId, patch: &PartnerPatch) -> DomainResult<Option<Partner>> {
        patch.validate()?;
        Ok(position_of(&self.partners, id).map(|i| {
            let partner = &mut self.partners[i];
            patch.apply(partner);
            partner.clone()
        }))
    }

    /// Returns whether a partner was removed; unknown ids are a no-op.
    pub fn delete(&mut self, id: &PartnerId) -> bool {
        match position_of(&self.partners, id) {
            Some(i) => {
                self.partners.remove(i);
                true
            }
            None => false,
        }
    }
}
