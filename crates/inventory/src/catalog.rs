//! In-memory parts catalog.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use werkdesk_core::{DomainResult, IdSequence, position_of};

use crate::part::{NewPart, Part, PartId, PartPatch};

const SEED_PARTS: &str = include_str!("../fixtures/parts.json");

/// Value meaning "no constraint" for category and supplier filters.
pub const ALL: &str = "all";

/// Search text plus category/supplier filters for the parts table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PartFilter {
    pub search: String,
    pub category: Option<String>,
    pub supplier: Option<String>,
}

fn constraint(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty() && *v != ALL)
}

impl PartFilter {
    pub fn matches(&self, part: &Part) -> bool {
        part.matches_search(self.search.trim())
            && constraint(&self.category).is_none_or(|c| part.category == c)
            && constraint(&self.supplier).is_none_or(|s| part.supplier == s)
    }
}

/// Headline numbers for the inventory page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryStats {
    pub total_parts: usize,
    pub low_stock: usize,
    pub out_of_stock: usize,
    pub stock_value: f64,
}

/// Parts held in memory, newest first.
#[derive(Debug, Clone)]
pub struct PartCatalog {
    parts: Vec<Part>,
    ids: IdSequence<PartId>,
}

impl PartCatalog {
    pub fn new(parts: Vec<Part>) -> Self {
        let ids = IdSequence::starting_after(parts.iter().map(|p| &p.id));
        Self { parts, ids }
    }

    /// Catalog preloaded with the built-in parts.
    pub fn seeded() -> serde_json::Result<Self> {
        Ok(Self::new(serde_json::from_str(SEED_PARTS)?))
    }

    pub fn parts(&self) -> &[Part] {
        &self.parts
    }

    pub fn get(&self, id: &PartId) -> Option<&Part> {
        position_of(&self.parts, id).map(|i| &self.parts[i])
    }

    pub fn create(&mut self, new: NewPart) -> DomainResult<Part> {
        new.validate()?;
        let part = new.into_part(self.ids.next_id());
        self.parts.insert(0, part.clone());
        Ok(part)
    }

    /// `Ok(None)` when no part has this id.
    pub fn update(&mut self, id: &PartId, patch: &PartPatch) -> DomainResult<Option<Part>> {
        patch.validate()?;
        Ok(position_of(&self.parts, id).map(|i| {
            let part = &mut self.parts[i];
            patch.apply(part);
            part.clone()
        }))
    }

    /// Returns whether a part was removed; unknown ids are a no-op.
    pub fn delete(&mut self, id: &PartId) -> bool {
        match position_of(&self.parts, id) {
            Some(i) => {
                self.parts.remove(i);
                true
            }
            None => false,
        }
    }

    pub fn restock(&mut self, id: &PartId) -> Option<Part> {
        position_of(&self.parts, id).map(|i| {
            let part = &mut self.parts[i];
            part.restock();
            part.clone()
        })
    }

    pub fn search(&self, filter: &PartFilter) -> Vec<Part> {
        self.parts.iter().filter(|p| filter.matches(p)).cloned().collect()
    }

    pub fn stats(&self) -> InventoryStats {
        InventoryStats {
            total_parts: self.parts.len(),
            low_stock: self.parts.iter().filter(|p| p.is_low_stock()).count(),
            out_of_stock: self.parts.iter().filter(|p| p.is_out_of_stock()).count(),
            stock_value: self.parts.iter().map(Part::stock_value).sum(),
        }
    }

    pub fn categories(&self) -> Vec<String> {
        distinct(self.parts.iter().map(|p| p.category.as_str()))
    }

    pub fn suppliers(&self) -> Vec<String> {
        distinct(self.parts.iter().map(|p| p.supplier.as_str()))
    }
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    values
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
