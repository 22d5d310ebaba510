use serde::{Deserialize, Serialize};

use werkdesk_core::{DomainError, DomainResult, Entity};

werkdesk_core::record_id!(
    /// Partner identifier (`PTN001`, `PTN002`, ...).
    PartnerId,
    "PTN"
);

/// A partner shop and the number of tickets it has submitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Partner {
    pub id: PartnerId,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub tickets_submitted: u32,
}

impl Entity for Partner {
    type Id = PartnerId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Loose address check: something, `@`, something, `.`, something, with no
/// whitespace inside each run.
pub fn is_valid_email(raw: &str) -> bool {
    let chars: Vec<char> = raw.chars().collect();
    let solid = |i: usize| chars.get(i).is_some_and(|c| !c.is_whitespace());

    chars.iter().enumerate().any(|(at, &c)| {
        if c != '@' || at == 0 || !solid(at - 1) {
            return false;
        }
        let mut i = at + 1;
        while solid(i) {
            if chars[i] == '.' && i > at + 1 && solid(i + 1) {
                return true;
            }
            i += 1;
        }
        false
    })
}

fn check_name(name: &str) -> DomainResult<()> {
    if name.trim().is_empty() {
        return Err(DomainError::missing_field("name"));
    }
    Ok(())
}

fn check_email(email: &str) -> DomainResult<()> {
    if email.trim().is_empty() {
        return Err(DomainError::missing_field("email"));
    }
    if !is_valid_email(email) {
        return Err(DomainError::validation(format!("{email:?} is not a valid email address")));
    }
    Ok(())
}

/// Form payload for a new partner.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct NewPartner {
    pub name: String,
    pub email: String,
}

impl NewPartner {
    pub fn validate(&self) -> DomainResult<()> {
        check_name(&self.name)?;
        check_email(&self.email)
    }

    /// New partners start with no submitted tickets.
    pub fn into_partner(self, id: PartnerId) -> Partner {
        Partner {
            id,
            name: self.name,
            email: self.email,
            tickets_submitted: 0,
        }
    }
}

/// Partial edit of a partner. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PartnerPatch {
    pub name: Option<String>,
    pub email: Option<String>,
}

impl PartnerPatch {
    pub fn validate(&self) -> DomainResult<()> {
        if let Some(name) = &self.name {
            check_name(name)?;
        }
        if let Some(email) = &self.email {
            check_email(email)?;
        }
        Ok(())
    }

    pub fn apply(&self, partner: &mut Partner) {
        if let Some(name) = &self.name {
            partner.name = name.clone();
        }
        if let Some(email) = &self.email {
            partner.email = email.clone();
        }
    }
}
