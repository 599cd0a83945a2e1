//! Cross-member relation lookups.
//!
//! The [`RelationIndex`] maps a descriptor id to the members that declared a
//! descriptor with that id, so a relation such as "wait for gesture 7" can be
//! resolved to nodes elsewhere in the tree. It is derived data: the
//! authoritative declarations live on each member, and only the
//! [`ArenaRegistry`](crate::registry::ArenaRegistry) mutates the index.

use std::collections::{BTreeSet, HashMap};

use horizon_gesture_core::logging::targets;
use horizon_gesture_core::{GestureId, MemberId};

/// Descriptor id to owning members.
#[derive(Debug, Default, Clone)]
pub struct RelationIndex {
    owners: HashMap<GestureId, BTreeSet<MemberId>>,
}

impl RelationIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records that `member` declares `gesture`. Duplicate registration is a no-op.
    ///
    /// Returns `true` if the mapping was new.
    pub(crate) fn register(&mut self, member: MemberId, gesture: GestureId) -> bool {
        let inserted = self.owners.entry(gesture).or_default().insert(member);
        if inserted {
            tracing::trace!(target: targets::REGISTRY, %member, %gesture, "indexed gesture");
        }
        inserted
    }

    /// Removes the mapping, dropping the key once no member owns the id.
    ///
    /// Returns `true` if a mapping was removed.
    pub(crate) fn unregister(&mut self, member: MemberId, gesture: GestureId) -> bool {
        let Some(members) = self.owners.get_mut(&gesture) else {
            return false;
        };
        let removed = members.remove(&member);
        if members.is_empty() {
            self.owners.remove(&gesture);
        }
        if removed {
            tracing::trace!(target: targets::REGISTRY, %member, %gesture, "unindexed gesture");
        }
        removed
    }

    /// Members owning `gesture`, in ascending member id order.
    ///
    /// Unknown ids resolve to an empty iterator.
    pub fn owners(&self, gesture: GestureId) -> impl Iterator<Item = MemberId> + '_ {
        self.owners.get(&gesture).into_iter().flatten().copied()
    }

    /// Members owning any of `gestures`, deduplicated, in list order then
    /// ascending member id order.
    pub fn resolve<'a>(&self, gestures: impl IntoIterator<Item = &'a GestureId>) -> Vec<MemberId> {
        let mut seen = BTreeSet::new();
        let mut members = Vec::new();
        for gesture in gestures {
            for member in self.owners(*gesture) {
                if seen.insert(member) {
                    members.push(member);
                }
            }
        }
        members
    }

    /// Whether `member` owns `gesture`.
    pub fn is_owner(&self, gesture: GestureId, member: MemberId) -> bool {
        self.owners
            .get(&gesture)
            .is_some_and(|members| members.contains(&member))
    }

    /// Number of indexed descriptor ids.
    pub fn len(&self) -> usize {
        self.owners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.owners.is_empty()
    }

    /// Total number of (gesture, member) pairs.
    pub fn mapping_count(&self) -> usize {
        self.owners.values().map(BTreeSet::len).sum()
    }

    pub(crate) fn clear(&mut self) {
        self.owners.clear();
    }
}
