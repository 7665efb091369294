//! Authoritative record of constructed buildings.

use std::collections::BTreeMap;

use hexonia_core::{BuildingId, Footprint, StructureId, StructureSnapshot};

/// Building stored inside the world.
#[derive(Clone, Debug)]
pub(crate) struct StructureState {
    pub(crate) building: BuildingId,
    pub(crate) footprint: Footprint,
}

/// Registry that stores placed buildings and allocates their identifiers.
#[derive(Debug)]
pub(crate) struct StructureRegistry {
    entries: BTreeMap<StructureId, StructureState>,
    /// `None` once every identifier has been allocated.
    next_structure_id: Option<StructureId>,
}

impl StructureRegistry {
    /// Creates an empty registry whose first identifier is zero.
    pub(crate) fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            next_structure_id: Some(StructureId::new(0)),
        }
    }

    /// Reserves the next identifier, or `None` when the id space is exhausted.
    ///
    /// Identifiers are never reused, so an exhausted registry stays exhausted
    /// until the world is rebuilt.
    pub(crate) fn allocate(&mut self) -> Option<StructureId> {
        let id = self.next_structure_id?;
        self.next_structure_id = id.get().checked_add(1).map(StructureId::new);
        Some(id)
    }

    /// Records a building under an identifier obtained from [`Self::allocate`].
    pub(crate) fn insert(&mut self, id: StructureId, building: BuildingId, footprint: Footprint) {
        let _ = self
            .entries
            .insert(id, StructureState { building, footprint });
    }

    /// Snapshots of every structure ordered by identifier.
    pub(crate) fn snapshots(&self) -> Vec<StructureSnapshot> {
        self.entries
            .iter()
            .map(|(id, state)| StructureSnapshot {
                id: *id,
                building: state.building.clone(),
                center: state.footprint.center(),
                footprint: state.footprint.clone(),
            })
            .collect()
    }

    #[cfg(test)]
    pub(crate) fn starting_at(id: StructureId) -> Self {
        Self {
            entries: BTreeMap::new(),
            next_structure_id: Some(id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hexonia_core::{footprint::footprint, GridCoord};

    #[test]
    fn registry_starts_empty_with_zero_identifier() {
        let registry = StructureRegistry::new();
        assert!(registry.entries.is_empty());
        assert_eq!(registry.next_structure_id, Some(StructureId::new(0)));
    }

    #[test]
    fn identifiers_are_allocated_sequentially() {
        let mut registry = StructureRegistry::new();
        let first = registry.allocate().expect("fresh registry");
        registry.insert(
            first,
            BuildingId::new("small"),
            footprint(GridCoord::new(1, 1), 0, 4, 4),
        );
        let second = registry.allocate().expect("fresh registry");
        registry.insert(
            second,
            BuildingId::new("medium"),
            footprint(GridCoord::new(2, 2), 1, 4, 4),
        );

        assert_eq!(first, StructureId::new(0));
        assert_eq!(second, StructureId::new(1));

        let snapshots = registry.snapshots();
        assert_eq!(snapshots.len(), 2);
        assert_eq!(snapshots[1].building, BuildingId::new("medium"));
        assert_eq!(snapshots[1].center, GridCoord::new(2, 2));
        assert_eq!(snapshots[1].footprint.len(), 7);
    }

    #[test]
    fn last_identifier_is_handed_out_once() {
        let mut registry = StructureRegistry::starting_at(StructureId::new(u32::MAX - 1));

        assert_eq!(registry.allocate(), Some(StructureId::new(u32::MAX - 1)));
        assert_eq!(registry.allocate(), Some(StructureId::new(u32::MAX)));
        assert_eq!(registry.allocate(), None);
        assert_eq!(registry.allocate(), None);
    }
}
