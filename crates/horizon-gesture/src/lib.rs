//! Gesture arbitration for nested UI hierarchies.
//!
//! When several nested or sibling nodes declare competing gesture recognizers,
//! this crate decides, for every pointer stream, which node interprets it and
//! in what derived form:
//!
//! - **Descriptors**: [`GestureDescriptor`] declares one recognizer (family,
//!   relations, callbacks, tuning); [`DescriptorSet`] holds a node's declarations
//! - **Relations**: [`RelationIndex`] resolves descriptor ids to the members that
//!   declared them
//! - **Recognizers**: [`Recognizer`] state machines (INIT/BEGIN/ACTIVE/FAIL/END),
//!   one per family slot per member
//! - **Registry**: [`ArenaRegistry`] owns the participating [`ArenaMember`]s
//! - **Resolver**: [`CompetitionResolver`] builds compete chains and picks winners
//! - **Dispatcher**: [`PointerStreamDispatcher`] drives a pointer stream end to end
//!
//! Everything runs synchronously on the UI-event thread. Resolved callbacks
//! leave through a [`GestureSink`].
//!
//! # Example
//!
//! ```
//! use glam::Vec2;
//! use horizon_gesture::{
//!     ArenaMember, ArenaRegistry, DescriptorSet, GestureCallback, GestureDescriptor,
//!     GestureFamily, MemberId, Point, PointerEvent, PointerPhase, PointerStreamDispatcher,
//!     RecordingSink,
//! };
//!
//! struct Node {
//!     id: MemberId,
//!     descriptors: DescriptorSet,
//! }
//!
//! impl ArenaMember for Node {
//!     fn member_id(&self) -> MemberId {
//!         self.id
//!     }
//!
//!     fn descriptors(&self) -> &DescriptorSet {
//!         &self.descriptors
//!     }
//!
//!     fn set_descriptors(&mut self, descriptors: DescriptorSet) {
//!         self.descriptors = descriptors;
//!     }
//!
//!     fn can_consume_gesture(&self, _delta: Vec2) -> bool {
//!         true
//!     }
//! }
//!
//! let mut registry = ArenaRegistry::new();
//! registry.register(Box::new(Node {
//!     id: MemberId(1),
//!     descriptors: [GestureDescriptor::new(1, GestureFamily::Pan)]
//!         .into_iter()
//!         .collect(),
//! }));
//!
//! let hit_test = |_: Point| vec![MemberId(1)];
//! let mut dispatcher = PointerStreamDispatcher::new(registry, hit_test, RecordingSink::new());
//!
//! dispatcher.handle_pointer_event(&PointerEvent::new(PointerPhase::Down, Point::new(0.0, 0.0), 0));
//! dispatcher.handle_pointer_event(&PointerEvent::new(PointerPhase::Move, Point::new(30.0, 0.0), 16));
//! assert_eq!(dispatcher.winner(), Some(MemberId(1)));
//!
//! let callbacks = dispatcher.sink().callbacks_for(MemberId(1));
//! assert_eq!(callbacks[0], GestureCallback::Begin);
//! ```

pub mod config;
pub mod descriptor;
pub mod dispatcher;
pub mod event;
pub mod member;
pub mod recognizer;
pub mod registry;
pub mod relation;
pub mod resolver;
pub mod sink;
pub mod slide;
pub mod velocity;

pub use config::{ArenaConfig, ChainInvalidation, SimultaneousMode};
pub use descriptor::{
    CallbackSet, DescriptorSet, GestureCallback, GestureConfig, GestureDescriptor, GestureFamily,
    Relations,
};
pub use dispatcher::{ExternalState, HitTester, PointerStreamDispatcher};
pub use event::{GestureEvent, GestureParams, Pointer, PointerEvent, PointerPhase};
pub use member::{AngleRange, ArenaMember, BorderEdge};
pub use recognizer::{GestureState, Recognizer, RecognizerContext};
pub use registry::ArenaRegistry;
pub use relation::RelationIndex;
pub use resolver::{CompetitionResolver, SimultaneousWinners};
pub use sink::{GestureSink, RecordingSink};
pub use slide::{SlideConsumer, SlideStatus};
pub use velocity::VelocityTracker;

pub use horizon_gesture_core::{ArenaError, DescriptorError, GestureId, MemberHandle, MemberId, Point, Result};
