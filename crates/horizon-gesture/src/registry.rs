//! Members eligible for arbitration and their recognizers.
//!
//! The [`ArenaRegistry`] owns every registered [`ArenaMember`] behind a
//! slotmap handle, the recognizers mirroring each member's descriptors, and the
//! [`RelationIndex`] derived from those descriptors. It is the only component
//! that mutates the index.

use std::collections::{BTreeMap, HashMap};

use glam::Vec2;
use horizon_gesture_core::logging::targets;
use horizon_gesture_core::{
    ArenaError, GestureId, MemberHandle, MemberId, Result, ThreadAffinity,
};
use slotmap::SlotMap;

use crate::config::ArenaConfig;
use crate::descriptor::{DescriptorSet, GestureFamily};
use crate::member::ArenaMember;
use crate::recognizer::{GestureState, Recognizer, RecognizerContext};
use crate::relation::RelationIndex;
use crate::sink::GestureSink;

/// One registered member and the recognizers built from its descriptors.
struct MemberEntry {
    member: Box<dyn ArenaMember>,
    /// One recognizer per family slot.
    recognizers: BTreeMap<GestureFamily, Recognizer>,
}

impl MemberEntry {
    fn new(member: Box<dyn ArenaMember>, config: &ArenaConfig) -> Self {
        let recognizers = build_recognizers(member.member_id(), member.descriptors(), config);
        Self {
            member,
            recognizers,
        }
    }
}

/// Builds the family slots for `descriptors`. When several descriptors share a
/// family the lowest id keeps the slot.
fn build_recognizers(
    member: MemberId,
    descriptors: &DescriptorSet,
    config: &ArenaConfig,
) -> BTreeMap<GestureFamily, Recognizer> {
    let mut recognizers: BTreeMap<GestureFamily, Recognizer> = BTreeMap::new();
    for descriptor in descriptors {
        let family = descriptor.family();
        if let Some(existing) = recognizers.get(&family) {
            tracing::warn!(
                target: targets::REGISTRY,
                %member,
                %family,
                kept = %existing.gesture_id(),
                ignored = %descriptor.id(),
                "family slot already taken"
            );
            continue;
        }
        recognizers.insert(family, Recognizer::new(descriptor.clone(), config));
    }
    recognizers
}

/// Aggregate state of a member's recognizers.
///
/// Any END wins, then any ACTIVE; otherwise the least advanced state. A member
/// without recognizers reports INIT.
pub fn aggregate_state(states: impl IntoIterator<Item = GestureState>) -> GestureState {
    let mut min = None;
    let mut active = false;
    for state in states {
        match state {
            GestureState::End => return GestureState::End,
            GestureState::Active => active = true,
            _ => {}
        }
        min = Some(min.map_or(state, |m: GestureState| m.min(state)));
    }
    if active {
        GestureState::Active
    } else {
        min.unwrap_or_default()
    }
}

/// Registry of arena members.
///
/// Registration is idempotent per [`MemberId`]. All mutation is expected on
/// the thread that created the registry.
pub struct ArenaRegistry {
    members: SlotMap<MemberHandle, MemberEntry>,
    by_id: HashMap<MemberId, MemberHandle>,
    relations: RelationIndex,
    config: ArenaConfig,
    affinity: ThreadAffinity,
}

impl Default for ArenaRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ArenaRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArenaRegistry")
            .field("members", &self.by_id.len())
            .field("relations", &self.relations)
            .field("config", &self.config)
            .finish()
    }
}

impl ArenaRegistry {
    /// Creates an empty registry with default tuning.
    pub fn new() -> Self {
        Self::with_config(ArenaConfig::default())
    }

    pub fn with_config(config: ArenaConfig) -> Self {
        Self {
            members: SlotMap::with_key(),
            by_id: HashMap::new(),
            relations: RelationIndex::new(),
            config,
            affinity: ThreadAffinity::current(),
        }
    }

    #[inline]
    pub fn config(&self) -> &ArenaConfig {
        &self.config
    }

    #[inline]
    pub fn relations(&self) -> &RelationIndex {
        &self.relations
    }

    /// Registers `member` and indexes its descriptors.
    ///
    /// Re-registering a live member id is a no-op: the existing entry is
    /// kept, `member` is dropped and the existing handle returned.
    #[tracing::instrument(
        skip(self, member),
        fields(member = %member.member_id()),
        target = "horizon_gesture::registry",
        level = "trace"
    )]
    pub fn register(&mut self, member: Box<dyn ArenaMember>) -> MemberHandle {
        self.affinity.debug_assert_same_thread("ArenaRegistry::register");
        let id = member.member_id();
        if let Some(&handle) = self.by_id.get(&id) {
            tracing::debug!(target: targets::REGISTRY, %id, "member already registered");
            return handle;
        }

        for gesture in member.descriptors().ids() {
            self.relations.register(id, gesture);
        }
        let entry = MemberEntry::new(member, &self.config);
        let recognizers = entry.recognizers.len();
        let handle = self.members.insert(entry);
        self.by_id.insert(id, handle);
        tracing::debug!(target: targets::REGISTRY, %id, ?handle, recognizers, "registered member");
        handle
    }

    /// Removes a member and its index entries, handing the node back.
    #[tracing::instrument(skip(self), target = "horizon_gesture::registry", level = "trace")]
    pub fn unregister(&mut self, id: MemberId) -> Option<Box<dyn ArenaMember>> {
        self.affinity.debug_assert_same_thread("ArenaRegistry::unregister");
        let handle = self.by_id.remove(&id)?;
        let entry = self.members.remove(handle)?;
        for gesture in entry.member.descriptors().ids() {
            self.relations.unregister(id, gesture);
        }
        tracing::debug!(target: targets::REGISTRY, %id, "unregistered member");
        Some(entry.member)
    }

    /// Replaces a member's declarations wholesale.
    ///
    /// The relation index is updated and the member's recognizers rebuilt in
    /// INIT. Must not be called while a pointer stream involving the member is
    /// in flight.
    #[tracing::instrument(skip(self, descriptors), target = "horizon_gesture::registry", level = "trace")]
    pub fn update_descriptors(&mut self, id: MemberId, descriptors: DescriptorSet) -> Result<()> {
        self.affinity.debug_assert_same_thread("ArenaRegistry::update_descriptors");
        let handle = *self.by_id.get(&id).ok_or(ArenaError::UnknownMember(id))?;
        let entry = self
            .members
            .get_mut(handle)
            .ok_or(ArenaError::UnknownMember(id))?;

        for gesture in entry.member.descriptors().ids() {
            self.relations.unregister(id, gesture);
        }
        for gesture in descriptors.ids() {
            self.relations.register(id, gesture);
        }
        entry.recognizers = build_recognizers(id, &descriptors, &self.config);
        entry.member.set_descriptors(descriptors);
        tracing::debug!(
            target: targets::REGISTRY,
            %id,
            recognizers = entry.recognizers.len(),
            "descriptors replaced"
        );
        Ok(())
    }

    /// Drops every member and the whole relation index.
    pub fn clear(&mut self) {
        self.affinity.debug_assert_same_thread("ArenaRegistry::clear");
        self.members.clear();
        self.by_id.clear();
        self.relations.clear();
        tracing::debug!(target: targets::REGISTRY, "registry cleared");
    }

    pub fn contains(&self, id: MemberId) -> bool {
        self.by_id.contains_key(&id)
    }

    pub fn handle(&self, id: MemberId) -> Option<MemberHandle> {
        self.by_id.get(&id).copied()
    }

    /// Member id behind a handle, if the handle is still live.
    pub fn member_id(&self, handle: MemberHandle) -> Option<MemberId> {
        self.members.get(handle).map(|entry| entry.member.member_id())
    }

    pub fn member(&self, id: MemberId) -> Option<&dyn ArenaMember> {
        self.entry(id).map(|entry| entry.member.as_ref())
    }

    pub fn member_mut(&mut self, id: MemberId) -> Option<&mut (dyn ArenaMember + 'static)> {
        self.entry_mut(id).map(|entry| entry.member.as_mut())
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Registered member ids in ascending order.
    pub fn ids(&self) -> Vec<MemberId> {
        let mut ids: Vec<_> = self.by_id.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Whether the member is registered and has at least one recognizer.
    pub fn participates(&self, id: MemberId) -> bool {
        self.entry(id).is_some_and(|entry| !entry.recognizers.is_empty())
    }

    /// Aggregate recognizer state of a member; `None` if unregistered.
    pub fn member_state(&self, id: MemberId) -> Option<GestureState> {
        self.entry(id)
            .map(|entry| aggregate_state(entry.recognizers.values().map(Recognizer::state)))
    }

    /// State of the recognizer bound to `gesture` on `id`.
    pub fn recognizer_state(&self, id: MemberId, gesture: GestureId) -> Option<GestureState> {
        self.recognizer(id, gesture).map(Recognizer::state)
    }

    pub fn recognizer(&self, id: MemberId, gesture: GestureId) -> Option<&Recognizer> {
        self.entry(id)?
            .recognizers
            .values()
            .find(|r| r.gesture_id() == gesture)
    }

    /// Recognizers of a member in family order.
    pub fn recognizers(&self, id: MemberId) -> impl Iterator<Item = &Recognizer> + '_ {
        self.entry(id)
            .into_iter()
            .flat_map(|entry| entry.recognizers.values())
    }

    /// Gesture ids of the member's recognizers currently in ACTIVE.
    pub fn active_gestures(&self, id: MemberId) -> Vec<GestureId> {
        self.recognizers(id)
            .filter(|r| r.state() == GestureState::Active)
            .map(Recognizer::gesture_id)
            .collect()
    }

    /// Resets every recognizer of a member to INIT.
    pub fn reset_member(&mut self, id: MemberId) {
        if let Some(entry) = self.entry_mut(id) {
            entry.recognizers.values_mut().for_each(Recognizer::reset);
        }
    }

    /// Runs `f` on each recognizer of `id` with a context bound to the member.
    ///
    /// Returns `false` if the member is not registered.
    pub(crate) fn with_recognizers<F>(
        &mut self,
        id: MemberId,
        sink: &mut dyn GestureSink,
        velocity: Vec2,
        mut f: F,
    ) -> bool
    where
        F: FnMut(&mut Recognizer, &mut RecognizerContext<'_>),
    {
        let Some(&handle) = self.by_id.get(&id) else {
            return false;
        };
        let Some(entry) = self.members.get_mut(handle) else {
            return false;
        };
        let MemberEntry {
            member,
            recognizers,
        } = entry;
        let mut cx = RecognizerContext {
            member_id: id,
            member: &mut **member,
            sink,
            config: &self.config,
            velocity,
        };
        for recognizer in recognizers.values_mut() {
            f(recognizer, &mut cx);
        }
        true
    }

    /// Runs `f` on the recognizer bound to `gesture`.
    pub(crate) fn with_recognizer<F>(
        &mut self,
        id: MemberId,
        gesture: GestureId,
        sink: &mut dyn GestureSink,
        velocity: Vec2,
        f: F,
    ) -> Result<()>
    where
        F: FnOnce(&mut Recognizer, &mut RecognizerContext<'_>),
    {
        let handle = *self.by_id.get(&id).ok_or(ArenaError::UnknownMember(id))?;
        let entry = self
            .members
            .get_mut(handle)
            .ok_or(ArenaError::UnknownMember(id))?;
        let MemberEntry {
            member,
            recognizers,
        } = entry;
        let recognizer = recognizers
            .values_mut()
            .find(|r| r.gesture_id() == gesture)
            .ok_or_else(|| ArenaError::unknown_gesture(id, gesture))?;
        let mut cx = RecognizerContext {
            member_id: id,
            member: &mut **member,
            sink,
            config: &self.config,
            velocity,
        };
        f(recognizer, &mut cx);
        Ok(())
    }

    fn entry(&self, id: MemberId) -> Option<&MemberEntry> {
        self.by_id.get(&id).and_then(|&h| self.members.get(h))
    }

    fn entry_mut(&mut self, id: MemberId) -> Option<&mut MemberEntry> {
        let handle = *self.by_id.get(&id)?;
        self.members.get_mut(handle)
    }
}

static_assertions::assert_not_impl_any!(ArenaRegistry: Send, Sync);
