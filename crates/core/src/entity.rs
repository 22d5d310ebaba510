//! Entity trait: identity + continuity across state changes.

/// Entity marker + minimal interface.
///
/// Tickets and inventory parts are entities: two records with the same id are
/// the same record, whatever their other fields say.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;
}

/// Index of the entity with `id` in `items`, if any.
pub fn position_of<E: Entity>(items: &[E], id: &E::Id) -> Option<usize> {
    items.iter().position(|item| item.id() == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Row(u32);

    impl Entity for Row {
        type Id = u32;

        fn id(&self) -> &u32 {
            &self.0
        }
    }

    #[test]
    fn position_of_finds_by_id() {
        let rows = [Row(3), Row(1), Row(2)];
        assert_eq!(position_of(&rows, &1), Some(1));
        assert_eq!(position_of(&rows, &9), None);
    }
}
