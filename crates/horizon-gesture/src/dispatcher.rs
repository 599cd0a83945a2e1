//! Top-level pointer-stream driver.
//!
//! The [`PointerStreamDispatcher`] owns the [`ArenaRegistry`], the host's hit
//! tester and the gesture sink. For every pointer event it maintains the
//! active response chain, asks the [`CompetitionResolver`] who currently wins,
//! forwards the event to the winner and its simultaneous co-winners, bubbles
//! the raw contact report along the chain, and runs slide escalation.
//!
//! # Stream lifecycle
//!
//! ```text
//! Down ──▶ hit test ─▶ reset recognizers ─▶ compete chain ─▶ provisional winner
//! Move ──▶ chain still valid? ──no──▶ invalidate, rebuild on next move
//!                 │yes
//!                 ▼
//!          resolve ─▶ feed winner + co-winners ─▶ advance on failure
//! Up/Cancel ──▶ feed / fail ─▶ clear stream
//! ```

use horizon_gesture_core::logging::{span_names, targets};
use horizon_gesture_core::{ArenaError, GestureId, MemberId, PerfSpan, Point, Result, ThreadAffinity};

use crate::config::ChainInvalidation;
use crate::event::{PointerEvent, PointerPhase};
use crate::recognizer::GestureState;
use crate::registry::ArenaRegistry;
use crate::resolver::{CompetitionResolver, SimultaneousWinners};
use crate::sink::GestureSink;
use crate::slide::SlideConsumer;
use crate::velocity::VelocityTracker;

/// Produces the response chain under a pointer, deepest node first.
pub trait HitTester {
    fn hit_test(&self, position: Point) -> Vec<MemberId>;
}

impl<F> HitTester for F
where
    F: Fn(Point) -> Vec<MemberId>,
{
    fn hit_test(&self, position: Point) -> Vec<MemberId> {
        self(position)
    }
}

/// Transition requested by the host for one recognizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExternalState {
    /// Commit the recognizer (INIT/BEGIN -> ACTIVE).
    Active,
    /// Fail it and let the next candidate compete.
    Fail,
    /// End it.
    End,
}

impl ExternalState {
    /// Parses the host wire code. Only ACTIVE, FAIL and END can be requested.
    pub fn from_code(code: i32) -> Result<Self> {
        match GestureState::from_code(code)? {
            GestureState::Active => Ok(Self::Active),
            GestureState::Fail => Ok(Self::Fail),
            GestureState::End => Ok(Self::End),
            GestureState::Init | GestureState::Begin => Err(ArenaError::InvalidStateCode(code)),
        }
    }
}

/// Drives arbitration for one pointer stream at a time.
pub struct PointerStreamDispatcher<H, S> {
    registry: ArenaRegistry,
    hit_tester: H,
    sink: S,
    resolver: CompetitionResolver,
    slide: SlideConsumer,
    velocity: VelocityTracker,
    /// Response chain of the current stream, deepest first.
    active_list: Vec<MemberId>,
    compete_list: Vec<MemberId>,
    winner: Option<MemberId>,
    last_winner: Option<MemberId>,
    co_winners: SimultaneousWinners,
    down_event: Option<PointerEvent>,
    last_event: Option<PointerEvent>,
    /// Set when a move invalidated the chain; the next move starts over.
    rebuild_pending: bool,
    affinity: ThreadAffinity,
}

impl<H, S> std::fmt::Debug for PointerStreamDispatcher<H, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PointerStreamDispatcher")
            .field("registry", &self.registry)
            .field("active_list", &self.active_list)
            .field("compete_list", &self.compete_list)
            .field("winner", &self.winner)
            .field("co_winners", &self.co_winners)
            .field("rebuild_pending", &self.rebuild_pending)
            .finish_non_exhaustive()
    }
}

impl<H: HitTester, S: GestureSink> PointerStreamDispatcher<H, S> {
    pub fn new(registry: ArenaRegistry, hit_tester: H, sink: S) -> Self {
        let window = registry.config().velocity_window_ms;
        Self {
            registry,
            hit_tester,
            sink,
            resolver: CompetitionResolver::new(),
            slide: SlideConsumer::new(),
            velocity: VelocityTracker::new(window),
            active_list: Vec::new(),
            compete_list: Vec::new(),
            winner: None,
            last_winner: None,
            co_winners: SimultaneousWinners::default(),
            down_event: None,
            last_event: None,
            rebuild_pending: false,
            affinity: ThreadAffinity::current(),
        }
    }

    #[inline]
    pub fn registry(&self) -> &ArenaRegistry {
        &self.registry
    }

    /// Mutable registry access for registration. Members must not be
    /// registered or updated while a stream is in flight.
    #[inline]
    pub fn registry_mut(&mut self) -> &mut ArenaRegistry {
        &mut self.registry
    }

    #[inline]
    pub fn sink(&self) -> &S {
        &self.sink
    }

    #[inline]
    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    // Introspection.

    /// Aggregate recognizer state of a member.
    pub fn current_state(&self, member: MemberId) -> Option<GestureState> {
        self.registry.member_state(member)
    }

    /// Response chain of the current stream; empty between streams and after
    /// invalidation.
    pub fn active_chain(&self) -> &[MemberId] {
        &self.active_list
    }

    pub fn compete_chain(&self) -> &[MemberId] {
        &self.compete_list
    }

    pub fn winner(&self) -> Option<MemberId> {
        self.winner
    }

    pub fn co_winners(&self) -> &[MemberId] {
        &self.co_winners.members
    }

    /// Processes one pointer event to completion.
    ///
    /// Returns `true` while a member's slide angles claim the stream (see
    /// [`consume_slide_event`](Self::consume_slide_event)).
    pub fn handle_pointer_event(&mut self, event: &PointerEvent) -> bool {
        self.affinity.debug_assert_same_thread("PointerStreamDispatcher::handle_pointer_event");
        let _span = PerfSpan::new(span_names::POINTER_EVENT);
        tracing::trace!(
            target: targets::DISPATCHER,
            phase = ?event.phase,
            x = event.position.x,
            y = event.position.y,
            pointers = event.pointer_count(),
            "pointer event"
        );
        match event.phase {
            PointerPhase::Down => self.on_press(event),
            PointerPhase::Move => self.on_move(event),
            PointerPhase::Up => self.on_release(event),
            PointerPhase::Cancel => self.on_cancel(event),
        }
    }

    /// Slide escalation for `event` against the active chain.
    ///
    /// Called by [`handle_pointer_event`](Self::handle_pointer_event); exposed
    /// for hosts that route interception separately.
    pub fn consume_slide_event(&mut self, event: &PointerEvent) -> bool {
        self.slide
            .consume(&self.registry, &self.active_list, event, &mut self.sink)
    }

    /// Host-driven transition of one recognizer, then re-arbitration with the
    /// last pointer event.
    #[tracing::instrument(skip(self), target = "horizon_gesture::dispatcher", level = "debug")]
    pub fn set_gesture_state(
        &mut self,
        member: MemberId,
        gesture: GestureId,
        state: ExternalState,
    ) -> Result<()> {
        self.affinity.debug_assert_same_thread("PointerStreamDispatcher::set_gesture_state");
        let velocity = self.velocity.velocity();
        self.registry
            .with_recognizer(member, gesture, &mut self.sink, velocity, |r, cx| match state {
                ExternalState::Active => r.activate(cx),
                ExternalState::Fail => r.fail(cx),
                ExternalState::End => r.end(cx),
            })?;

        if self.compete_list.is_empty() {
            return Ok(());
        }
        if let Some(event) = self.last_event.clone() {
            self.settle();
            self.find_next_winner(&event);
            self.last_winner = self.winner;
        }
        Ok(())
    }

    fn on_press(&mut self, event: &PointerEvent) -> bool {
        self.clear_stream();
        self.rebuild_pending = false;

        self.active_list = self.hit_chain(event.position);
        self.compete_list = CompetitionResolver::compete_chain(&self.registry, &self.active_list);
        for &member in self.active_list.iter().chain(&self.compete_list) {
            self.registry.reset_member(member);
        }

        self.velocity.add(event.timestamp_ms, event.position);
        self.down_event = Some(event.clone());
        self.last_event = Some(event.clone());

        self.winner = self.compete_list.first().copied();
        if let Some(winner) = self.winner {
            let co_winners = CompetitionResolver::simultaneous_winners(&self.registry, winner);
            for &member in &co_winners.members {
                if !self.compete_list.contains(&member) {
                    self.registry.reset_member(member);
                }
            }
            self.co_winners = co_winners;
            tracing::debug!(
                target: targets::DISPATCHER,
                winner = %winner,
                chain = ?self.active_list,
                compete = ?self.compete_list,
                "provisional winner"
            );
        }
        self.feed_winners(event);
        self.last_winner = self.winner;
        self.settle();
        self.find_next_winner(event);
        self.last_winner = self.winner;

        self.bubble_touches(event);
        self.consume_slide_event(event)
    }

    fn on_move(&mut self, event: &PointerEvent) -> bool {
        if self.rebuild_pending {
            tracing::debug!(
                target: targets::DISPATCHER,
                x = event.position.x,
                y = event.position.y,
                "rebuilding stream after invalidation"
            );
            return self.on_press(&event.with_phase(PointerPhase::Down));
        }
        if self.chain_invalidated(event.position) {
            self.invalidate();
            return false;
        }

        self.velocity.add(event.timestamp_ms, event.position);
        self.last_event = Some(event.clone());

        self.winner = self
            .resolver
            .resolve(&self.registry, &self.compete_list, self.winner);
        if self.winner.is_some() && self.winner == self.last_winner {
            self.feed_winners(event);
        }
        self.settle();
        self.find_next_winner(event);
        self.last_winner = self.winner;

        self.bubble_touches(event);
        self.consume_slide_event(event)
    }

    fn on_release(&mut self, event: &PointerEvent) -> bool {
        self.velocity.add(event.timestamp_ms, event.position);
        self.last_event = Some(event.clone());

        self.winner = self
            .resolver
            .resolve(&self.registry, &self.compete_list, self.winner);
        if self.winner.is_some() && self.winner == self.last_winner {
            self.feed_winners(event);
        }
        self.settle();
        self.find_next_winner(event);
        self.last_winner = self.winner;

        self.bubble_touches(event);
        let consumed = self.consume_slide_event(event);
        tracing::debug!(target: targets::DISPATCHER, winner = ?self.winner, "stream released");
        self.clear_stream();
        consumed
    }

    fn on_cancel(&mut self, event: &PointerEvent) -> bool {
        let velocity = self.velocity.velocity();
        let mut members: Vec<MemberId> = Vec::new();
        for &member in self
            .compete_list
            .iter()
            .chain(&self.co_winners.members)
            .chain(&self.active_list)
        {
            if !members.contains(&member) {
                members.push(member);
            }
        }
        for member in members {
            self.registry
                .with_recognizers(member, &mut self.sink, velocity, |r, cx| {
                    if r.is_active() {
                        r.fail(cx);
                    }
                });
        }

        self.bubble_touches(event);
        let consumed = self.consume_slide_event(event);
        tracing::debug!(target: targets::DISPATCHER, winner = ?self.winner, "stream cancelled");
        self.clear_stream();
        consumed
    }

    /// Registered, participating members under `position`, deepest first,
    /// without duplicates.
    fn hit_chain(&self, position: Point) -> Vec<MemberId> {
        let mut chain = Vec::new();
        for member in self.hit_tester.hit_test(position) {
            if !self.registry.contains(member) {
                tracing::trace!(target: targets::DISPATCHER, %member, "hit node not registered");
                continue;
            }
            if !self.registry.participates(member) || chain.contains(&member) {
                continue;
            }
            chain.push(member);
        }
        chain
    }

    /// Whether the chain under `position` is inconsistent with the active chain.
    ///
    /// Moving deeper (the new chain ends with the active chain) or back out
    /// onto an ancestor (the active chain ends with the new chain) keeps the
    /// stream; any other target invalidates it.
    fn chain_invalidated(&self, position: Point) -> bool {
        if self.active_list.is_empty() {
            return false;
        }
        if self.registry.config().chain_invalidation == ChainInvalidation::UntilActive
            && self
                .winner
                .is_some_and(|w| self.registry.member_state(w) == Some(GestureState::Active))
        {
            return false;
        }
        let chain = self.hit_chain(position);
        !(chain.ends_with(&self.active_list) || self.active_list.ends_with(&chain))
    }

    /// Fails the winner and co-winners and drops the stream. The next move
    /// starts a fresh arbitration at its own position.
    fn invalidate(&mut self) {
        tracing::debug!(
            target: targets::DISPATCHER,
            chain = ?self.active_list,
            winner = ?self.winner,
            "active chain invalidated"
        );
        let velocity = self.velocity.velocity();
        let mut losers: Vec<MemberId> = self.winner.into_iter().collect();
        losers.extend(self.co_winners.members.iter().copied());
        for member in losers {
            self.registry
                .with_recognizers(member, &mut self.sink, velocity, |r, cx| r.fail(cx));
        }
        self.clear_stream();
        self.rebuild_pending = true;
    }

    fn clear_stream(&mut self) {
        self.active_list.clear();
        self.compete_list.clear();
        self.winner = None;
        self.last_winner = None;
        self.co_winners = SimultaneousWinners::default();
        self.down_event = None;
        self.last_event = None;
        self.resolver.reset();
        self.slide.reset();
        self.velocity.clear();
    }

    /// Feeds `event` to every recognizer of `member`.
    fn feed(&mut self, member: MemberId, event: &PointerEvent) {
        let velocity = self.velocity.velocity();
        let found = self
            .registry
            .with_recognizers(member, &mut self.sink, velocity, |r, cx| r.handle(cx, event));
        if !found {
            debug_assert!(false, "dispatching to unregistered {member}");
            tracing::warn!(target: targets::DISPATCHER, %member, "dispatch target not registered");
        }
    }

    fn feed_winners(&mut self, event: &PointerEvent) {
        let Some(winner) = self.winner else {
            return;
        };
        self.feed(winner, event);
        let co_winners = self.co_winners.members.clone();
        for member in co_winners {
            self.feed(member, event);
        }
    }

    /// Brings a member that joins mid-stream up to date: the press, then the
    /// current event.
    fn prime(&mut self, member: MemberId, event: &PointerEvent) {
        if let Some(down) = self.down_event.clone() {
            self.feed(member, &down);
        }
        if event.phase != PointerPhase::Down {
            self.feed(member, event);
        }
    }

    /// Re-resolves and, while the winner keeps changing, primes each new
    /// winner and its joining co-winners. Bounded by the compete chain length.
    fn find_next_winner(&mut self, event: &PointerEvent) {
        for _ in 0..=self.compete_list.len() {
            self.winner = self
                .resolver
                .resolve(&self.registry, &self.compete_list, self.winner);
            if self.winner == self.last_winner {
                return;
            }
            let Some(winner) = self.winner else {
                tracing::debug!(target: targets::DISPATCHER, from = ?self.last_winner, "no winner left");
                self.co_winners = SimultaneousWinners::default();
                return;
            };
            tracing::debug!(
                target: targets::DISPATCHER,
                from = ?self.last_winner,
                to = %winner,
                "winner changed"
            );
            self.last_winner = Some(winner);

            let previous = std::mem::take(&mut self.co_winners);
            let co_winners = CompetitionResolver::simultaneous_winners(&self.registry, winner);
            let joining: Vec<MemberId> = co_winners
                .members
                .iter()
                .copied()
                .filter(|m| !previous.contains(*m))
                .collect();
            self.co_winners = co_winners;

            self.prime(winner, event);
            for member in joining {
                if !self.compete_list.contains(&member) {
                    self.registry.reset_member(member);
                }
                self.prime(member, event);
            }
            self.settle();
        }
    }

    /// Race settlement: a member that reached ACTIVE fails its other live
    /// recognizers, except those bound to simultaneous ids it owns itself.
    fn settle(&mut self) {
        let velocity = self.velocity.velocity();
        let mut members: Vec<MemberId> = self.winner.into_iter().collect();
        members.extend(self.co_winners.members.iter().copied());
        for member in members {
            if self.registry.member_state(member) != Some(GestureState::Active) {
                continue;
            }
            let covered = CompetitionResolver::simultaneous_winners(&self.registry, member).covered;
            self.registry
                .with_recognizers(member, &mut self.sink, velocity, |r, cx| {
                    if r.state() != GestureState::Active
                        && r.state().is_alive()
                        && !covered.contains(&r.gesture_id())
                    {
                        r.fail(cx);
                    }
                });
        }
    }

    /// Raw contact report to every recognizer on the response chain while
    /// the stream has a winner.
    fn bubble_touches(&mut self, event: &PointerEvent) {
        if self.winner.is_none() {
            return;
        }
        let velocity = self.velocity.velocity();
        for &member in &self.active_list {
            self.registry
                .with_recognizers(member, &mut self.sink, velocity, |r, cx| r.touches(cx, event));
        }
    }
}
