use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use werkdesk_core::money::{amount_from_json, lenient_amount, non_negative, optional_amount};
use werkdesk_core::{DomainError, DomainResult, Entity};

werkdesk_core::record_id!(
    /// Part identifier (`P001`, `P002`, ...).
    PartId,
    "P"
);

/// Stock added by a restock when the part has no low-stock threshold.
pub const DEFAULT_RESTOCK: u32 = 10;

/// A spare part held in stock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Part {
    pub id: PartId,
    pub name: String,
    #[serde(default)]
    pub brand: String,
    pub category: String,
    #[serde(default, deserialize_with = "lenient_count")]
    pub stock: u32,
    /// Minimum stock before the part is flagged as low.
    #[serde(default, deserialize_with = "lenient_count")]
    pub threshold: u32,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub cost: f64,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub retail: f64,
    #[serde(default)]
    pub supplier: String,
    #[serde(default)]
    pub barcode: String,
}

impl Entity for Part {
    type Id = PartId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl Part {
    pub fn is_low_stock(&self) -> bool {
        self.stock <= self.threshold
    }

    pub fn is_out_of_stock(&self) -> bool {
        self.stock == 0
    }

    /// Units added by one restock: twice the threshold, or
    /// [`DEFAULT_RESTOCK`] when no threshold is set.
    pub fn restock_quantity(&self) -> u32 {
        match self.threshold.saturating_mul(2) {
            0 => DEFAULT_RESTOCK,
            qty => qty,
        }
    }

    /// Apply one restock and return the new stock level.
    pub fn restock(&mut self) -> u32 {
        self.stock = self.stock.saturating_add(self.restock_quantity());
        self.stock
    }

    /// Stock valued at cost.
    pub fn stock_value(&self) -> f64 {
        f64::from(self.stock) * self.cost
    }

    /// Case-insensitive match on name, id or brand; substring match on barcode.
    pub fn matches_search(&self, needle: &str) -> bool {
        if needle.is_empty() {
            return true;
        }
        let lowered = needle.to_lowercase();
        self.name.to_lowercase().contains(&lowered)
            || self.id.as_str().to_lowercase().contains(&lowered)
            || self.brand.to_lowercase().contains(&lowered)
            || self.barcode.contains(needle)
    }
}

/// Form payload for a new part.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct NewPart {
    pub name: String,
    pub brand: String,
    pub category: String,
    #[serde(deserialize_with = "optional_count")]
    pub stock: Option<u32>,
    #[serde(deserialize_with = "optional_count")]
    pub threshold: Option<u32>,
    #[serde(deserialize_with = "optional_amount")]
    pub cost: Option<f64>,
    #[serde(deserialize_with = "optional_amount")]
    pub retail: Option<f64>,
    pub supplier: String,
    pub barcode: String,
}

impl NewPart {
    /// Name, category, stock, cost and retail price are required.
    pub fn validate(&self) -> DomainResult<()> {
        if self.name.trim().is_empty() {
            return Err(DomainError::missing_field("name"));
        }
        if self.category.trim().is_empty() {
            return Err(DomainError::missing_field("category"));
        }
        if self.stock.is_none() {
            return Err(DomainError::missing_field("stock"));
        }
        if self.cost.is_none() {
            return Err(DomainError::missing_field("cost"));
        }
        if self.retail.is_none() {
            return Err(DomainError::missing_field("retail"));
        }
        Ok(())
    }

    pub fn into_part(self, id: PartId) -> Part {
        Part {
            id,
            name: self.name,
            brand: self.brand,
            category: self.category,
            stock: self.stock.unwrap_or(0),
            threshold: self.threshold.unwrap_or(0),
            cost: non_negative(self.cost.unwrap_or(0.0)),
            retail: non_negative(self.retail.unwrap_or(0.0)),
            supplier: self.supplier,
            barcode: self.barcode,
        }
    }
}

/// Partial edit of a part. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct PartPatch {
    pub name: Option<String>,
    pub brand: Option<String>,
    pub category: Option<String>,
    #[serde(deserialize_with = "optional_count")]
    pub stock: Option<u32>,
    #[serde(deserialize_with = "optional_count")]
    pub threshold: Option<u32>,
    #[serde(deserialize_with = "optional_amount")]
    pub cost: Option<f64>,
    #[serde(deserialize_with = "optional_amount")]
    pub retail: Option<f64>,
    pub supplier: Option<String>,
    pub barcode: Option<String>,
}

impl PartPatch {
    /// Required fields may be changed but not blanked.
    pub fn validate(&self) -> DomainResult<()> {
        if matches!(&self.name, Some(name) if name.trim().is_empty()) {
            return Err(DomainError::missing_field("name"));
        }
        if matches!(&self.category, Some(category) if category.trim().is_empty()) {
            return Err(DomainError::missing_field("category"));
        }
        Ok(())
    }

    pub fn apply(&self, part: &mut Part) {
        let text = [
            (&mut part.name, &self.name),
            (&mut part.brand, &self.brand),
            (&mut part.category, &self.category),
            (&mut part.supplier, &self.supplier),
            (&mut part.barcode, &self.barcode),
        ];
        for (field, value) in text {
            if let Some(value) = value {
                *field = value.clone();
            }
        }
        if let Some(stock) = self.stock {
            part.stock = stock;
        }
        if let Some(threshold) = self.threshold {
            part.threshold = threshold;
        }
        if let Some(cost) = self.cost {
            part.cost = non_negative(cost);
        }
        if let Some(retail) = self.retail {
            part.retail = non_negative(retail);
        }
    }
}

fn count_from_json(value: &Value) -> u32 {
    // Counts are whole units; fractional input is truncated.
    let amount = non_negative(amount_from_json(value)).trunc();
    if amount >= f64::from(u32::MAX) {
        u32::MAX
    } else {
        amount as u32
    }
}

fn lenient_count<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(count_from_json(&value))
}

fn optional_count<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) if s.trim().is_empty() => None,
        Some(v) => Some(count_from_json(&v)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn part(stock: u32, threshold: u32) -> Part {
        Part {
            id: PartId::new("P001"),
            name: "iPhone 13 Screen".into(),
            brand: "Apple".into(),
            category: "Screens".into(),
            stock,
            threshold,
            cost: 80.0,
            retail: 150.0,
            supplier: "ScreenSource Ltd.".into(),
            barcode: "123456789012".into(),
        }
    }

    #[test]
    fn low_stock_includes_the_threshold() {
        assert!(part(5, 5).is_low_stock());
        assert!(part(3, 5).is_low_stock());
        assert!(!part(6, 5).is_low_stock());
        assert!(part(0, 0).is_out_of_stock());
    }

    #[test]
    fn restock_adds_twice_the_threshold() {
        let mut p = part(3, 5);
        assert_eq!(p.restock(), 13);
    }

    #[test]
    fn restock_without_threshold_adds_default() {
        let mut p = part(2, 0);
        assert_eq!(p.restock(), 2 + DEFAULT_RESTOCK);
    }

    #[test]
    fn search_covers_name_id_brand_and_barcode() {
        let p = part(1, 1);
        assert!(p.matches_search("screen"));
        assert!(p.matches_search("p001"));
        assert!(p.matches_search("APPLE"));
        assert!(p.matches_search("456789"));
        assert!(p.matches_search(""));
        assert!(!p.matches_search("samsung"));
    }

    #[test]
    fn new_part_requires_core_fields() {
        let form: NewPart = serde_json::from_str(
            r#"{"name":"Pixel 7 Battery","category":"Batteries","stock":"4","cost":"22.5","retail":"","threshold":""}"#,
        )
        .unwrap();
        assert_eq!(form.stock, Some(4));
        assert_eq!(form.threshold, None);
        assert_eq!(form.validate().unwrap_err().missing(), Some("retail"));

        let form = NewPart {
            retail: Some(60.0),
            ..form
        };
        assert_eq!(form.validate(), Ok(()));

        let part = form.into_part(PartId::new("P005"));
        assert_eq!(part.threshold, 0);
        assert_eq!(part.cost, 22.5);
    }

    #[test]
    fn zero_stock_counts_as_given() {
        let form = NewPart {
            name: "Fan".into(),
            category: "Cooling".into(),
            stock: Some(0),
            cost: Some(5.0),
            retail: Some(9.0),
            ..NewPart::default()
        };
        assert_eq!(form.validate(), Ok(()));
    }

    #[test]
    fn patch_updates_selected_fields() {
        let mut p = part(3, 5);
        let patch = PartPatch {
            stock: Some(20),
            supplier: Some("PartsDirect".into()),
            ..PartPatch::default()
        };
        patch.apply(&mut p);
        assert_eq!(p.stock, 20);
        assert_eq!(p.supplier, "PartsDirect");
        assert_eq!(p.name, "iPhone 13 Screen");

        let blanking = PartPatch {
            name: Some("".into()),
            ..PartPatch::default()
        };
        assert_eq!(blanking.validate().unwrap_err().missing(), Some("name"));
    }

    #[test]
    fn stored_counts_are_lenient() {
        let p: Part = serde_json::from_str(
            r#"{"id":"P009","name":"Cable","category":"Misc","stock":"7","threshold":-2,"cost":"1.5","retail":3}"#,
        )
        .unwrap();
        assert_eq!(p.stock, 7);
        assert_eq!(p.threshold, 0);
        assert_eq!(p.stock_value(), 10.5);
    }
}
