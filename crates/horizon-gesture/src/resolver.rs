//! Relation-driven ordering of competing members.
//!
//! A pointer stream is arbitrated in two steps. [`CompetitionResolver::compete_chain`]
//! turns the hit-tested response chain into a compete chain by applying each
//! member's `waitFor` and `continueWith` relations. [`CompetitionResolver::resolve`]
//! then walks that chain to find the provisional winner, skipping members
//! whose recognizers have failed. `simultaneous` relations never reorder the
//! chain; they only decide who may stay active next to the winner.

use horizon_gesture_core::logging::{span_names, targets};
use horizon_gesture_core::{GestureId, MemberId, PerfSpan};

use crate::config::SimultaneousMode;
use crate::recognizer::GestureState;
use crate::registry::ArenaRegistry;

/// How one member contributes to the compete chain.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Contribution {
    /// No reordering relation, or none that matched: the member alone.
    Plain,
    /// `waitFor` matched members further out; they compete first. Ends the fold.
    Deferred(Vec<MemberId>),
    /// `continueWith` hand-off targets follow the member. Ends the fold.
    HandOff(Vec<MemberId>),
}

/// Co-winners of a member and the descriptor ids that justify them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SimultaneousWinners {
    /// Members allowed to stay active next to the winner, in relation order.
    pub members: Vec<MemberId>,
    /// Simultaneous ids the winner owns itself. Recognizers bound to these
    /// ids are spared when the winner's other recognizers are failed.
    pub covered: Vec<GestureId>,
}

impl SimultaneousWinners {
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn contains(&self, member: MemberId) -> bool {
        self.members.contains(&member)
    }
}

/// Builds compete chains and picks the provisional winner.
///
/// The resolver is stateless apart from a cursor remembering where in the
/// compete chain the last winner was found, so that a member appearing twice
/// (for example once through the hit test and once as a hand-off target) is
/// scanned from the right position.
#[derive(Debug, Clone, Default)]
pub struct CompetitionResolver {
    cursor: Option<usize>,
}

impl CompetitionResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forgets the cursor. Called when a new stream starts.
    pub fn reset(&mut self) {
        self.cursor = None;
    }

    /// Position of the last resolved winner in the compete chain.
    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    fn contribution(registry: &ArenaRegistry, chain: &[MemberId], index: usize) -> Contribution {
        let current = chain[index];
        let Some(member) = registry.member(current) else {
            return Contribution::Plain;
        };
        let Some(descriptor) = member.descriptors().first_reordering() else {
            return Contribution::Plain;
        };
        let relations = descriptor.relations();

        if !relations.wait_for.is_empty() {
            let after = &chain[index + 1..];
            let mut matches = Vec::new();
            for gesture in &relations.wait_for {
                let mut owned: Vec<(usize, MemberId)> = registry
                    .relations()
                    .owners(*gesture)
                    .filter(|owner| *owner != current && !matches.contains(owner))
                    .filter_map(|owner| after.iter().position(|m| *m == owner).map(|p| (p, owner)))
                    .collect();
                owned.sort_unstable_by_key(|(position, _)| *position);
                matches.extend(owned.into_iter().map(|(_, owner)| owner));
            }
            if matches.is_empty() {
                tracing::trace!(
                    target: targets::RESOLVER,
                    member = %current,
                    gesture = %descriptor.id(),
                    "waitFor matched nothing"
                );
                return Contribution::Plain;
            }
            return Contribution::Deferred(matches);
        }

        let targets = registry
            .relations()
            .resolve(&relations.continue_with)
            .into_iter()
            .filter(|owner| *owner != current)
            .collect();
        Contribution::HandOff(targets)
    }

    /// Compete order contributed by `current` alone.
    ///
    /// A member without `waitFor` or `continueWith` yields `[current]`. A
    /// `waitFor` relation puts the matching members found after `current` in
    /// `chain` first, ordered by relation list then chain position. A
    /// `continueWith` relation appends its hand-off targets after `current`.
    pub fn compete_order(
        registry: &ArenaRegistry,
        chain: &[MemberId],
        current: MemberId,
    ) -> Vec<MemberId> {
        let Some(index) = chain.iter().position(|m| *m == current) else {
            return vec![current];
        };
        match Self::contribution(registry, chain, index) {
            Contribution::Plain => vec![current],
            Contribution::Deferred(mut matches) => {
                matches.push(current);
                matches
            }
            Contribution::HandOff(targets) => {
                let mut order = vec![current];
                order.extend(targets);
                order
            }
        }
    }

    /// Folds [`compete_order`](Self::compete_order) over a response chain.
    ///
    /// Members are taken deepest first. The first member whose `waitFor`
    /// matches, or who declares `continueWith`, ends the fold; members further
    /// out do not compete this round.
    pub fn compete_chain(registry: &ArenaRegistry, response_chain: &[MemberId]) -> Vec<MemberId> {
        let _span = PerfSpan::new(span_names::COMPETE);
        let mut compete = Vec::with_capacity(response_chain.len());
        for (index, &member) in response_chain.iter().enumerate() {
            if !registry.contains(member) {
                debug_assert!(false, "response chain contains unregistered {member}");
                tracing::warn!(target: targets::RESOLVER, %member, "skipping unregistered chain member");
                continue;
            }
            match Self::contribution(registry, response_chain, index) {
                Contribution::Plain => compete.push(member),
                Contribution::Deferred(matches) => {
                    compete.extend(matches);
                    compete.push(member);
                    break;
                }
                Contribution::HandOff(targets) => {
                    compete.push(member);
                    compete.extend(targets);
                    break;
                }
            }
        }
        tracing::debug!(target: targets::RESOLVER, ?response_chain, ?compete, "compete chain built");
        compete
    }

    /// Provisional winner of `compete_chain`, starting from `current`.
    ///
    /// A live `current` stays the winner and an ENDed one closes the round.
    /// Otherwise the chain is scanned forward from `current` and then wrapped
    /// around, skipping every entry for `current`; the first live member wins
    /// and the first ENDed one closes the round. Scanning never resets a
    /// candidate's recognizers. `None` when every candidate has failed.
    pub fn resolve(
        &mut self,
        registry: &ArenaRegistry,
        compete_chain: &[MemberId],
        current: Option<MemberId>,
    ) -> Option<MemberId> {
        let state = |member: MemberId| {
            registry.member_state(member).unwrap_or_else(|| {
                tracing::warn!(target: targets::RESOLVER, %member, "unregistered member treated as failed");
                GestureState::Fail
            })
        };

        let index = match current {
            Some(current) => {
                let index = self
                    .cursor
                    .filter(|&i| compete_chain.get(i) == Some(&current))
                    .or_else(|| compete_chain.iter().position(|m| *m == current));
                match state(current) {
                    s if s.is_alive() => {
                        self.cursor = index;
                        return Some(current);
                    }
                    GestureState::End => return None,
                    _ => {}
                }
                index
            }
            None => None,
        };

        let (forward, wrapped) = match index {
            Some(i) => (i + 1..compete_chain.len(), 0..i),
            None => (0..compete_chain.len(), 0..0),
        };
        for i in forward.chain(wrapped) {
            let candidate = compete_chain[i];
            if Some(candidate) == current {
                continue;
            }
            match state(candidate) {
                s if s.is_alive() => {
                    tracing::debug!(
                        target: targets::RESOLVER,
                        from = ?current,
                        to = %candidate,
                        "winner advanced"
                    );
                    self.cursor = Some(i);
                    return Some(candidate);
                }
                GestureState::End => return None,
                _ => {}
            }
        }
        tracing::debug!(target: targets::RESOLVER, from = ?current, "no live candidate");
        None
    }

    /// Members allowed to win together with `current`.
    ///
    /// Walks every descriptor of `current` that lists `simultaneous` ids and
    /// collects the other owners of those ids. An id that `current` declares
    /// itself is only recorded as covered; its other owners are not collected. In
    /// [`SimultaneousMode::Mutual`] an owner only qualifies if one of its own
    /// descriptors lists an id that `current` declares.
    pub fn simultaneous_winners(registry: &ArenaRegistry, current: MemberId) -> SimultaneousWinners {
        let mut winners = SimultaneousWinners::default();
        let Some(member) = registry.member(current) else {
            return winners;
        };
        let mode = registry.config().simultaneous;
        let index = registry.relations();

        for descriptor in member.descriptors() {
            for &gesture in &descriptor.relations().simultaneous {
                if member.descriptors().contains(gesture) {
                    if !winners.covered.contains(&gesture) {
                        winners.covered.push(gesture);
                    }
                    continue;
                }
                for owner in index.owners(gesture) {
                    if owner == current || winners.members.contains(&owner) {
                        continue;
                    }
                    let accepted = match mode {
                        SimultaneousMode::Declared => true,
                        SimultaneousMode::Mutual => lists_back(registry, owner, current),
                    };
                    if accepted {
                        winners.members.push(owner);
                    }
                }
            }
        }
        winners
    }
}

/// Whether `owner` lists, as simultaneous, some id declared by `current`.
fn lists_back(registry: &ArenaRegistry, owner: MemberId, current: MemberId) -> bool {
    let Some(member) = registry.member(owner) else {
        return false;
    };
    member.descriptors().iter().any(|d| {
        d.relations()
            .simultaneous
            .iter()
            .any(|&g| registry.relations().is_owner(g, current))
    })
}
