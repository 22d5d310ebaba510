//! Prefixed, human-readable record identifiers (`T001`, `P004`, ...).

use core::marker::PhantomData;

/// A record identifier made of a fixed prefix and a zero-padded sequence number.
///
/// Identifiers loaded from storage are kept verbatim even when they do not
/// follow the `PREFIX` + digits shape; only freshly minted ids are guaranteed to.
pub trait RecordId: Sized {
    /// Fixed prefix shared by every id of this kind.
    const PREFIX: &'static str;

    fn from_raw(raw: String) -> Self;

    fn as_str(&self) -> &str;

    /// Build the id for sequence number `n` (padded to three digits).
    fn from_sequence(n: u64) -> Self {
        Self::from_raw(format!("{}{:03}", Self::PREFIX, n))
    }

    /// Sequence number encoded in this id, if it has the canonical shape.
    fn sequence(&self) -> Option<u64> {
        let digits = self.as_str().strip_prefix(Self::PREFIX)?;
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        digits.parse().ok()
    }
}

/// Monotonic id generator.
///
/// Seeded from the highest sequence number already in use, so ids never collide
/// with live records, even after deletions shrink the collection.
#[derive(Debug, Clone)]
pub struct IdSequence<I> {
    next: u64,
    _kind: PhantomData<fn() -> I>,
}

impl<I: RecordId> IdSequence<I> {
    pub fn new() -> Self {
        Self {
            next: 1,
            _kind: PhantomData,
        }
    }

    /// Start after the highest sequence found among `existing`.
    pub fn starting_after<'a>(existing: impl IntoIterator<Item = &'a I>) -> Self
    where
        I: 'a,
    {
        let highest = existing
            .into_iter()
            .filter_map(|id| id.sequence())
            .max()
            .unwrap_or(0);
        Self {
            next: highest + 1,
            _kind: PhantomData,
        }
    }

    /// Never issue a sequence number at or below `issued`.
    pub fn resume_after(&mut self, issued: u64) {
        self.next = self.next.max(issued + 1);
    }

    /// Highest sequence number handed out so far (0 when none).
    pub fn last_issued(&self) -> u64 {
        self.next - 1
    }

    /// Sequence number the next call to `next_id` will use.
    pub fn peek(&self) -> u64 {
        self.next
    }

    pub fn next_id(&mut self) -> I {
        let id = I::from_sequence(self.next);
        self.next += 1;
        id
    }
}

impl<I: RecordId> Default for IdSequence<I> {
    fn default() -> Self {
        Self::new()
    }
}

/// Declare a string-backed [`RecordId`] newtype.
///
/// ```ignore
/// werkdesk_core::record_id!(TicketId, "T");
/// ```
#[macro_export]
macro_rules! record_id {
    ($(#[$meta:meta])* $t:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, ::serde::Serialize, ::serde::Deserialize)]
        #[serde(transparent)]
        pub struct $t(String);

        impl $t {
            pub fn new(raw: impl Into<String>) -> Self {
                Self(raw.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl $crate::id::RecordId for $t {
            const PREFIX: &'static str = $prefix;

            fn from_raw(raw: String) -> Self {
                Self(raw)
            }

            fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl core::str::FromStr for $t {
            type Err = $crate::error::DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let s = s.trim();
                if s.is_empty() {
                    return Err($crate::error::DomainError::invalid_id(concat!(
                        stringify!($t),
                        ": empty identifier"
                    )));
                }
                Ok(Self(s.to_string()))
            }
        }

        impl From<&str> for $t {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }
    };
}
