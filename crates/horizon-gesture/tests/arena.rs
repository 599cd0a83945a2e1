//! End-to-end arbitration scenarios driven through the dispatcher.

use glam::Vec2;
use horizon_gesture::{
    AngleRange, ArenaConfig, ArenaError, ArenaMember, ArenaRegistry, CallbackSet,
    CompetitionResolver, DescriptorSet, ExternalState, GestureCallback, GestureDescriptor,
    GestureFamily, GestureId, GestureParams, GestureState, MemberId, Point, PointerEvent,
    PointerPhase, PointerStreamDispatcher, RecordingSink, SimultaneousMode,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

struct Node {
    id: MemberId,
    descriptors: DescriptorSet,
    angles: Vec<AngleRange>,
}

impl Node {
    fn new(id: u32, descriptors: Vec<GestureDescriptor>) -> Self {
        Self {
            id: MemberId(id),
            descriptors: descriptors.into_iter().collect(),
            angles: Vec::new(),
        }
    }

    fn with_angles(mut self, angles: Vec<AngleRange>) -> Self {
        self.angles = angles;
        self
    }
}

impl ArenaMember for Node {
    fn member_id(&self) -> MemberId {
        self.id
    }

    fn descriptors(&self) -> &DescriptorSet {
        &self.descriptors
    }

    fn set_descriptors(&mut self, descriptors: DescriptorSet) {
        self.descriptors = descriptors;
    }

    fn can_consume_gesture(&self, _delta: Vec2) -> bool {
        true
    }

    fn consume_slide_angles(&self) -> &[AngleRange] {
        &self.angles
    }
}

fn make_descriptor(id: u32, family: GestureFamily) -> GestureDescriptor {
    GestureDescriptor::new(id, family)
}

fn make_pointer(phase: PointerPhase, x: f32, y: f32, t: u64) -> PointerEvent {
    PointerEvent::new(phase, Point::new(x, y), t)
}

fn ids(raw: &[u32]) -> Vec<MemberId> {
    raw.iter().copied().map(MemberId).collect()
}

fn make_dispatcher<F>(
    config: ArenaConfig,
    nodes: Vec<Node>,
    hit_test: F,
) -> PointerStreamDispatcher<F, RecordingSink>
where
    F: Fn(Point) -> Vec<MemberId>,
{
    init_tracing();
    let mut registry = ArenaRegistry::with_config(config);
    for node in nodes {
        registry.register(Box::new(node));
    }
    PointerStreamDispatcher::new(registry, hit_test, RecordingSink::new())
}

fn fixed_chain(raw: &[u32]) -> impl Fn(Point) -> Vec<MemberId> + use<> {
    let chain = ids(raw);
    move |_| chain.clone()
}

#[test]
fn test_singleton_default() {
    let registry = {
        let mut registry = ArenaRegistry::new();
        registry.register(Box::new(Node::new(1, vec![make_descriptor(1, GestureFamily::Pan)])));
        registry.register(Box::new(Node::new(2, vec![make_descriptor(2, GestureFamily::Tap)])));
        registry
    };
    let order = CompetitionResolver::compete_order(&registry, &ids(&[1, 2]), MemberId(1));
    assert_eq!(order, ids(&[1]));
}

#[test]
fn test_wait_for_declaration_order_dominates_chain_order() {
    // A waits for C's gesture first, then B's.
    let mut dispatcher = make_dispatcher(
        ArenaConfig::default(),
        vec![
            Node::new(1, vec![make_descriptor(10, GestureFamily::Pan).with_wait_for([30, 20])]),
            Node::new(2, vec![make_descriptor(20, GestureFamily::Pan)]),
            Node::new(3, vec![make_descriptor(30, GestureFamily::Pan)]),
        ],
        fixed_chain(&[1, 2, 3]),
    );
    dispatcher.handle_pointer_event(&make_pointer(PointerPhase::Down, 0.0, 0.0, 0));
    assert_eq!(dispatcher.active_chain(), ids(&[1, 2, 3]).as_slice());
    assert_eq!(dispatcher.compete_chain(), ids(&[3, 2, 1]).as_slice());
    assert_eq!(dispatcher.winner(), Some(MemberId(3)));
}

#[test]
fn test_fail_and_advance_leaves_later_candidates_untouched() {
    let mut dispatcher = make_dispatcher(
        ArenaConfig::default(),
        vec![
            Node::new(1, vec![make_descriptor(1, GestureFamily::Pan)]),
            Node::new(2, vec![make_descriptor(2, GestureFamily::Pan)]),
            Node::new(3, vec![make_descriptor(3, GestureFamily::Pan)]),
        ],
        fixed_chain(&[1, 2, 3]),
    );
    dispatcher.handle_pointer_event(&make_pointer(PointerPhase::Down, 0.0, 0.0, 0));
    assert_eq!(dispatcher.winner(), Some(MemberId(1)));

    dispatcher
        .set_gesture_state(MemberId(1), GestureId(1), ExternalState::Fail)
        .unwrap();
    assert_eq!(dispatcher.winner(), Some(MemberId(2)));
    assert_eq!(dispatcher.current_state(MemberId(1)), Some(GestureState::Fail));
    assert_eq!(dispatcher.current_state(MemberId(3)), Some(GestureState::Init));

    dispatcher.handle_pointer_event(&make_pointer(PointerPhase::Move, 40.0, 0.0, 16));
    assert_eq!(dispatcher.current_state(MemberId(2)), Some(GestureState::Active));
    assert_eq!(dispatcher.current_state(MemberId(3)), Some(GestureState::Init));
}

#[test]
fn test_simultaneous_co_winners_track_the_same_drag() {
    let mut dispatcher = make_dispatcher(
        ArenaConfig::default(),
        vec![
            Node::new(1, vec![make_descriptor(1, GestureFamily::Pan).with_simultaneous([2])]),
            Node::new(2, vec![make_descriptor(2, GestureFamily::Pan).with_simultaneous([1])]),
            Node::new(4, vec![make_descriptor(4, GestureFamily::Pan)]),
        ],
        fixed_chain(&[1, 2, 4]),
    );
    let a = CompetitionResolver::simultaneous_winners(dispatcher.registry(), MemberId(1));
    let b = CompetitionResolver::simultaneous_winners(dispatcher.registry(), MemberId(2));
    assert_eq!(a.members, ids(&[2]));
    assert_eq!(b.members, ids(&[1]));
    assert!(!a.contains(MemberId(4)));

    dispatcher.handle_pointer_event(&make_pointer(PointerPhase::Down, 0.0, 0.0, 0));
    assert_eq!(dispatcher.co_winners(), ids(&[2]).as_slice());
    dispatcher.handle_pointer_event(&make_pointer(PointerPhase::Move, 0.0, 30.0, 16));

    assert_eq!(dispatcher.current_state(MemberId(1)), Some(GestureState::Active));
    assert_eq!(dispatcher.current_state(MemberId(2)), Some(GestureState::Active));
    assert_eq!(dispatcher.current_state(MemberId(4)), Some(GestureState::Init));
}

#[test]
fn test_terminal_recognizer_stays_silent_until_next_press() {
    let mut dispatcher = make_dispatcher(
        ArenaConfig::default(),
        vec![Node::new(1, vec![make_descriptor(1, GestureFamily::Pan)])],
        fixed_chain(&[1]),
    );
    dispatcher.handle_pointer_event(&make_pointer(PointerPhase::Down, 0.0, 0.0, 0));
    dispatcher.handle_pointer_event(&make_pointer(PointerPhase::Move, 20.0, 0.0, 16));
    dispatcher
        .set_gesture_state(MemberId(1), GestureId(1), ExternalState::Fail)
        .unwrap();
    assert_eq!(dispatcher.winner(), None);
    let emitted = dispatcher.sink().events().len();

    dispatcher.handle_pointer_event(&make_pointer(PointerPhase::Move, 40.0, 0.0, 32));
    dispatcher.handle_pointer_event(&make_pointer(PointerPhase::Up, 40.0, 0.0, 48));
    assert_eq!(dispatcher.sink().events().len(), emitted);

    dispatcher.handle_pointer_event(&make_pointer(PointerPhase::Down, 0.0, 0.0, 100));
    assert_eq!(dispatcher.current_state(MemberId(1)), Some(GestureState::Init));
    dispatcher.handle_pointer_event(&make_pointer(PointerPhase::Move, 20.0, 0.0, 116));
    assert_eq!(dispatcher.current_state(MemberId(1)), Some(GestureState::Active));
    assert!(dispatcher.sink().events().len() > emitted);
}

#[test]
fn test_registration_is_idempotent() {
    let mut registry = ArenaRegistry::new();
    let first = registry.register(Box::new(Node::new(1, vec![make_descriptor(7, GestureFamily::Pan)])));
    let second = registry.register(Box::new(Node::new(1, vec![make_descriptor(7, GestureFamily::Pan)])));
    assert_eq!(first, second);
    assert_eq!(registry.len(), 1);
    assert_eq!(registry.relations().mapping_count(), 1);
    assert_eq!(
        registry.relations().owners(GestureId(7)).collect::<Vec<_>>(),
        ids(&[1])
    );
}

#[test]
fn test_move_onto_unrelated_member_invalidates_chain() {
    let hit_test = |p: Point| {
        if p.x < 100.0 {
            vec![MemberId(1), MemberId(2)]
        } else {
            vec![MemberId(3)]
        }
    };
    let mut dispatcher = make_dispatcher(
        ArenaConfig::default(),
        vec![
            Node::new(1, vec![make_descriptor(1, GestureFamily::Pan)]),
            Node::new(2, vec![make_descriptor(2, GestureFamily::Pan)]),
            Node::new(3, vec![make_descriptor(3, GestureFamily::Pan)]),
        ],
        hit_test,
    );

    dispatcher.handle_pointer_event(&make_pointer(PointerPhase::Down, 10.0, 10.0, 0));
    assert_eq!(dispatcher.active_chain(), ids(&[1, 2]).as_slice());

    dispatcher.handle_pointer_event(&make_pointer(PointerPhase::Move, 200.0, 10.0, 16));
    assert!(dispatcher.active_chain().is_empty());
    assert_eq!(dispatcher.winner(), None);
    assert_eq!(dispatcher.current_state(MemberId(1)), Some(GestureState::Fail));

    dispatcher.handle_pointer_event(&make_pointer(PointerPhase::Move, 210.0, 10.0, 32));
    assert_eq!(dispatcher.active_chain(), ids(&[3]).as_slice());
    assert_eq!(dispatcher.winner(), Some(MemberId(3)));

    dispatcher.handle_pointer_event(&make_pointer(PointerPhase::Move, 240.0, 10.0, 48));
    assert_eq!(dispatcher.current_state(MemberId(3)), Some(GestureState::Active));
}

#[test]
fn test_deeper_hit_keeps_chain() {
    let hit_test = |p: Point| {
        if p.y < 50.0 {
            vec![MemberId(1), MemberId(2)]
        } else {
            vec![MemberId(5), MemberId(1), MemberId(2)]
        }
    };
    let mut dispatcher = make_dispatcher(
        ArenaConfig::default(),
        vec![
            Node::new(1, vec![make_descriptor(1, GestureFamily::Pan)]),
            Node::new(2, vec![make_descriptor(2, GestureFamily::Pan)]),
            Node::new(5, vec![make_descriptor(5, GestureFamily::Pan)]),
        ],
        hit_test,
    );
    dispatcher.handle_pointer_event(&make_pointer(PointerPhase::Down, 10.0, 10.0, 0));
    dispatcher.handle_pointer_event(&make_pointer(PointerPhase::Move, 10.0, 80.0, 16));
    assert_eq!(dispatcher.active_chain(), ids(&[1, 2]).as_slice());
    assert_eq!(dispatcher.current_state(MemberId(1)), Some(GestureState::Active));
}

#[test]
fn test_drag_onto_ancestor_keeps_chain() {
    let hit_test = |p: Point| {
        if p.x < 50.0 {
            vec![MemberId(1), MemberId(2)]
        } else {
            vec![MemberId(2)]
        }
    };
    let mut dispatcher = make_dispatcher(
        ArenaConfig::default(),
        vec![
            Node::new(1, vec![make_descriptor(1, GestureFamily::Pan)]),
            Node::new(2, vec![make_descriptor(2, GestureFamily::Pan)]),
        ],
        hit_test,
    );
    dispatcher.handle_pointer_event(&make_pointer(PointerPhase::Down, 10.0, 10.0, 0));
    dispatcher.handle_pointer_event(&make_pointer(PointerPhase::Move, 30.0, 10.0, 16));
    assert_eq!(dispatcher.winner(), Some(MemberId(1)));
    assert_eq!(dispatcher.current_state(MemberId(1)), Some(GestureState::Active));

    // The finger leaves the inner member but stays over its ancestor.
    dispatcher.handle_pointer_event(&make_pointer(PointerPhase::Move, 60.0, 10.0, 32));
    assert_eq!(dispatcher.active_chain(), ids(&[1, 2]).as_slice());
    assert_eq!(dispatcher.winner(), Some(MemberId(1)));
    assert_eq!(dispatcher.current_state(MemberId(1)), Some(GestureState::Active));
    assert_eq!(dispatcher.current_state(MemberId(2)), Some(GestureState::Init));

    dispatcher.handle_pointer_event(&make_pointer(PointerPhase::Up, 60.0, 10.0, 48));
    assert_eq!(dispatcher.current_state(MemberId(1)), Some(GestureState::End));
    assert_eq!(
        dispatcher.sink().callbacks_for(MemberId(1)),
        vec![
            GestureCallback::Begin,
            GestureCallback::Start,
            GestureCallback::Update,
            GestureCallback::Update,
            GestureCallback::End
        ]
    );
}

#[test]
fn test_continue_with_hands_stream_to_target() {
    let mut dispatcher = make_dispatcher(
        ArenaConfig::default(),
        vec![
            Node::new(1, vec![make_descriptor(1, GestureFamily::Pan).with_continue_with([2])]),
            Node::new(2, vec![make_descriptor(2, GestureFamily::Pan)]),
        ],
        fixed_chain(&[1]),
    );
    dispatcher.handle_pointer_event(&make_pointer(PointerPhase::Down, 0.0, 0.0, 0));
    assert_eq!(dispatcher.compete_chain(), ids(&[1, 2]).as_slice());
    assert_eq!(dispatcher.winner(), Some(MemberId(1)));

    dispatcher
        .set_gesture_state(MemberId(1), GestureId(1), ExternalState::Fail)
        .unwrap();
    assert_eq!(dispatcher.winner(), Some(MemberId(2)));
    assert_eq!(dispatcher.current_state(MemberId(2)), Some(GestureState::Init));

    dispatcher.handle_pointer_event(&make_pointer(PointerPhase::Move, 30.0, 0.0, 16));
    dispatcher.handle_pointer_event(&make_pointer(PointerPhase::Move, 60.0, 0.0, 32));
    assert_eq!(dispatcher.winner(), Some(MemberId(2)));
    assert_eq!(dispatcher.current_state(MemberId(2)), Some(GestureState::Active));
    assert_eq!(
        dispatcher.sink().callbacks_for(MemberId(2)),
        vec![
            GestureCallback::Begin,
            GestureCallback::Start,
            GestureCallback::Update,
            GestureCallback::Update
        ]
    );
    assert!(dispatcher.sink().callbacks_for(MemberId(1)).is_empty());
}

#[test]
fn test_until_active_policy_keeps_committed_drag() {
    let hit_test = |p: Point| {
        if p.x < 100.0 {
            vec![MemberId(1)]
        } else {
            vec![MemberId(3)]
        }
    };
    let mut dispatcher = make_dispatcher(
        ArenaConfig::default().with_chain_invalidation(horizon_gesture::ChainInvalidation::UntilActive),
        vec![
            Node::new(1, vec![make_descriptor(1, GestureFamily::Pan)]),
            Node::new(3, vec![make_descriptor(3, GestureFamily::Pan)]),
        ],
        hit_test,
    );
    dispatcher.handle_pointer_event(&make_pointer(PointerPhase::Down, 10.0, 10.0, 0));
    dispatcher.handle_pointer_event(&make_pointer(PointerPhase::Move, 60.0, 10.0, 16));
    dispatcher.handle_pointer_event(&make_pointer(PointerPhase::Move, 160.0, 10.0, 32));
    assert_eq!(dispatcher.active_chain(), ids(&[1]).as_slice());
    assert_eq!(dispatcher.winner(), Some(MemberId(1)));
}

#[test]
fn test_concrete_wait_for_example() {
    let mut dispatcher = make_dispatcher(
        ArenaConfig::default(),
        vec![
            Node::new(1, vec![make_descriptor(1, GestureFamily::Pan).with_wait_for([2])]),
            Node::new(2, vec![make_descriptor(2, GestureFamily::Pan).with_simultaneous([3])]),
            Node::new(3, vec![make_descriptor(3, GestureFamily::Pan)]),
        ],
        fixed_chain(&[1, 2, 3]),
    );
    dispatcher.handle_pointer_event(&make_pointer(PointerPhase::Down, 0.0, 0.0, 0));
    assert_eq!(dispatcher.compete_chain(), ids(&[2, 1]).as_slice());
    assert_eq!(dispatcher.winner(), Some(MemberId(2)));

    // Member 2 fails through the host handler; member 1 was waiting for it.
    dispatcher
        .set_gesture_state(MemberId(2), GestureId(2), ExternalState::Fail)
        .unwrap();
    assert_eq!(dispatcher.winner(), Some(MemberId(1)));

    dispatcher.handle_pointer_event(&make_pointer(PointerPhase::Move, 30.0, 0.0, 16));
    assert_eq!(dispatcher.current_state(MemberId(1)), Some(GestureState::Active));
    assert_eq!(dispatcher.current_state(MemberId(3)), Some(GestureState::Init));
}

#[test]
fn test_concrete_resolve_sequence() {
    let mut registry = ArenaRegistry::new();
    registry.register(Box::new(Node::new(1, vec![make_descriptor(1, GestureFamily::Pan).with_wait_for([2])])));
    registry.register(Box::new(Node::new(2, vec![make_descriptor(2, GestureFamily::Pan).with_simultaneous([3])])));
    registry.register(Box::new(Node::new(3, vec![make_descriptor(3, GestureFamily::Pan)])));
    let mut dispatcher = PointerStreamDispatcher::new(registry, fixed_chain(&[1, 2, 3]), RecordingSink::new());
    let chain = ids(&[1, 2, 3]);
    let mut resolver = CompetitionResolver::new();

    assert_eq!(resolver.resolve(dispatcher.registry(), &chain, Some(MemberId(1))), Some(MemberId(1)));

    dispatcher
        .set_gesture_state(MemberId(2), GestureId(2), ExternalState::Fail)
        .unwrap();
    assert_eq!(resolver.resolve(dispatcher.registry(), &chain, Some(MemberId(2))), Some(MemberId(3)));

    dispatcher
        .set_gesture_state(MemberId(3), GestureId(3), ExternalState::Fail)
        .unwrap();
    assert_eq!(resolver.resolve(dispatcher.registry(), &chain, Some(MemberId(3))), Some(MemberId(1)));
}

#[test]
fn test_declared_simultaneous_is_one_way() {
    let mut registry = ArenaRegistry::with_config(
        ArenaConfig::default().with_simultaneous(SimultaneousMode::Declared),
    );
    registry.register(Box::new(Node::new(2, vec![make_descriptor(2, GestureFamily::Pan).with_simultaneous([3])])));
    registry.register(Box::new(Node::new(3, vec![make_descriptor(3, GestureFamily::Pan)])));

    let winners = CompetitionResolver::simultaneous_winners(&registry, MemberId(2));
    assert_eq!(winners.members, ids(&[3]));
    assert!(CompetitionResolver::simultaneous_winners(&registry, MemberId(3)).is_empty());
}

#[test]
fn test_release_hands_over_to_next_candidate() {
    let mut dispatcher = make_dispatcher(
        ArenaConfig::default(),
        vec![
            Node::new(1, vec![make_descriptor(1, GestureFamily::Pan).with_config("minDistance", 50)]),
            Node::new(2, vec![make_descriptor(2, GestureFamily::Tap)]),
        ],
        fixed_chain(&[1, 2]),
    );
    dispatcher.handle_pointer_event(&make_pointer(PointerPhase::Down, 10.0, 10.0, 0));
    assert_eq!(dispatcher.winner(), Some(MemberId(1)));
    dispatcher.handle_pointer_event(&make_pointer(PointerPhase::Up, 10.0, 10.0, 80));

    assert_eq!(dispatcher.current_state(MemberId(1)), Some(GestureState::Fail));
    assert_eq!(dispatcher.current_state(MemberId(2)), Some(GestureState::End));
    assert_eq!(
        dispatcher.sink().callbacks_for(MemberId(2)),
        vec![
            GestureCallback::Begin,
            GestureCallback::Start,
            GestureCallback::End
        ]
    );
    assert!(dispatcher.sink().callbacks_for(MemberId(1)).is_empty());
    assert!(dispatcher.active_chain().is_empty());
}

#[test]
fn test_fling_reports_release_velocity() {
    let mut dispatcher = make_dispatcher(
        ArenaConfig::default(),
        vec![Node::new(1, vec![make_descriptor(1, GestureFamily::Fling)])],
        fixed_chain(&[1]),
    );
    dispatcher.handle_pointer_event(&make_pointer(PointerPhase::Down, 0.0, 0.0, 0));
    dispatcher.handle_pointer_event(&make_pointer(PointerPhase::Move, 50.0, 0.0, 10));
    dispatcher.handle_pointer_event(&make_pointer(PointerPhase::Move, 100.0, 0.0, 20));
    dispatcher.handle_pointer_event(&make_pointer(PointerPhase::Up, 150.0, 0.0, 30));

    assert_eq!(dispatcher.current_state(MemberId(1)), Some(GestureState::End));
    let update = dispatcher
        .sink()
        .events()
        .iter()
        .find(|e| e.callback == GestureCallback::Update)
        .unwrap();
    match update.params {
        GestureParams::Fling { velocity_x, velocity_y, .. } => {
            assert!((velocity_x - 5000.0).abs() < 1.0);
            assert_eq!(velocity_y, 0.0);
        }
        ref other => panic!("unexpected params {other:?}"),
    }
}

#[test]
fn test_pan_wins_over_tap_on_same_member() {
    let mut dispatcher = make_dispatcher(
        ArenaConfig::default(),
        vec![Node::new(
            1,
            vec![
                make_descriptor(1, GestureFamily::Pan),
                make_descriptor(2, GestureFamily::Tap),
            ],
        )],
        fixed_chain(&[1]),
    );
    dispatcher.handle_pointer_event(&make_pointer(PointerPhase::Down, 0.0, 0.0, 0));
    dispatcher.handle_pointer_event(&make_pointer(PointerPhase::Move, 5.0, 0.0, 16));

    let registry = dispatcher.registry();
    assert_eq!(registry.recognizer_state(MemberId(1), GestureId(1)), Some(GestureState::Active));
    assert_eq!(registry.recognizer_state(MemberId(1), GestureId(2)), Some(GestureState::Fail));
}

#[test]
fn test_slide_angles_claim_horizontal_drag() {
    let mut dispatcher = make_dispatcher(
        ArenaConfig::default(),
        vec![
            Node::new(1, vec![make_descriptor(1, GestureFamily::Pan)])
                .with_angles(vec![AngleRange::new(-30.0, 30.0)]),
            Node::new(2, vec![make_descriptor(2, GestureFamily::Native)]),
        ],
        fixed_chain(&[1, 2]),
    );
    assert!(!dispatcher.handle_pointer_event(&make_pointer(PointerPhase::Down, 0.0, 0.0, 0)));
    assert!(!dispatcher.handle_pointer_event(&make_pointer(PointerPhase::Move, 3.0, 1.0, 8)));
    assert!(dispatcher.handle_pointer_event(&make_pointer(PointerPhase::Move, 40.0, 5.0, 16)));
    assert!(!dispatcher.handle_pointer_event(&make_pointer(PointerPhase::Up, 40.0, 5.0, 32)));
    assert_eq!(
        dispatcher.sink().intercept_requests(),
        &[true, true, true, false]
    );
}

#[test]
fn test_cancel_fails_live_recognizers() {
    let mut dispatcher = make_dispatcher(
        ArenaConfig::default(),
        vec![Node::new(1, vec![make_descriptor(1, GestureFamily::Pan)])],
        fixed_chain(&[1]),
    );
    dispatcher.handle_pointer_event(&make_pointer(PointerPhase::Down, 0.0, 0.0, 0));
    dispatcher.handle_pointer_event(&make_pointer(PointerPhase::Move, 20.0, 0.0, 16));
    dispatcher.handle_pointer_event(&make_pointer(PointerPhase::Cancel, 20.0, 0.0, 32));

    assert_eq!(dispatcher.current_state(MemberId(1)), Some(GestureState::Fail));
    assert_eq!(
        dispatcher.sink().callbacks_for(MemberId(1)).last(),
        Some(&GestureCallback::Fail)
    );
    assert!(dispatcher.active_chain().is_empty());
    assert_eq!(dispatcher.winner(), None);
    assert_eq!(dispatcher.sink().intercept_requests(), &[false]);
}

#[test]
fn test_touches_bubble_along_chain() {
    let touches = CallbackSet::from_names(["onTouchesDown", "onTouchesMove", "onTouchesUp"]);
    let mut dispatcher = make_dispatcher(
        ArenaConfig::default(),
        vec![
            Node::new(1, vec![make_descriptor(1, GestureFamily::Pan)]),
            Node::new(2, vec![make_descriptor(2, GestureFamily::Tap).with_callbacks(touches)]),
        ],
        fixed_chain(&[1, 2]),
    );
    dispatcher.handle_pointer_event(&make_pointer(PointerPhase::Down, 0.0, 0.0, 0));
    dispatcher.handle_pointer_event(&make_pointer(PointerPhase::Move, 1.0, 0.0, 8));
    assert_eq!(
        dispatcher.sink().callbacks_for(MemberId(2)),
        vec![GestureCallback::TouchesDown, GestureCallback::TouchesMove]
    );
}

#[test]
fn test_set_gesture_state_reports_unknown_targets() {
    let mut dispatcher = make_dispatcher(
        ArenaConfig::default(),
        vec![Node::new(1, vec![make_descriptor(1, GestureFamily::Pan)])],
        fixed_chain(&[1]),
    );
    let err = dispatcher
        .set_gesture_state(MemberId(9), GestureId(1), ExternalState::Active)
        .unwrap_err();
    assert!(matches!(err, ArenaError::UnknownMember(MemberId(9))));

    let err = dispatcher
        .set_gesture_state(MemberId(1), GestureId(9), ExternalState::End)
        .unwrap_err();
    assert!(matches!(err, ArenaError::UnknownGesture { .. }));

    assert_eq!(ExternalState::from_code(3).unwrap(), ExternalState::Fail);
    assert!(ExternalState::from_code(1).is_err());
    assert!(ExternalState::from_code(42).is_err());
}

#[test]
fn test_external_activation_commits_recognizer() {
    let mut dispatcher = make_dispatcher(
        ArenaConfig::default(),
        vec![Node::new(1, vec![make_descriptor(1, GestureFamily::LongPress)])],
        fixed_chain(&[1]),
    );
    dispatcher.handle_pointer_event(&make_pointer(PointerPhase::Down, 0.0, 0.0, 0));
    dispatcher
        .set_gesture_state(MemberId(1), GestureId(1), ExternalState::Active)
        .unwrap();
    assert_eq!(dispatcher.current_state(MemberId(1)), Some(GestureState::Active));
    dispatcher.handle_pointer_event(&make_pointer(PointerPhase::Up, 0.0, 0.0, 50));
    assert_eq!(dispatcher.current_state(MemberId(1)), Some(GestureState::End));
}

#[test]
fn test_unregistered_and_empty_members_never_compete() {
    let mut dispatcher = make_dispatcher(
        ArenaConfig::default(),
        vec![
            Node::new(1, Vec::new()),
            Node::new(2, vec![make_descriptor(2, GestureFamily::Pan)]),
        ],
        fixed_chain(&[7, 1, 2, 2]),
    );
    dispatcher.handle_pointer_event(&make_pointer(PointerPhase::Down, 0.0, 0.0, 0));
    assert_eq!(dispatcher.active_chain(), ids(&[2]).as_slice());
    assert_eq!(dispatcher.winner(), Some(MemberId(2)));
}

#[test]
fn test_descriptors_from_json_drive_arbitration() {
    let descriptors = DescriptorSet::from_json(
        r#"[
            {"id": 1, "type": 0, "relationMap": {"waitFor": [2]}},
            {"id": 5, "type": 3}
        ]"#,
    )
    .unwrap();
    let mut registry = ArenaRegistry::new();
    registry.register(Box::new(Node {
        id: MemberId(1),
        descriptors,
        angles: Vec::new(),
    }));
    registry.register(Box::new(Node::new(2, vec![make_descriptor(2, GestureFamily::Pan)])));

    let chain = CompetitionResolver::compete_chain(&registry, &ids(&[1, 2]));
    assert_eq!(chain, ids(&[2, 1]));
}
