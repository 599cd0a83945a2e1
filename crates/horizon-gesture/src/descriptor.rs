//! Gesture declarations.
//!
//! A [`GestureDescriptor`] is the immutable declaration of one recognizer on a
//! node: its global id, its [`GestureFamily`], the relation lists that tie it to
//! descriptors on other nodes, which callbacks the runtime wants, and opaque
//! tuning values. Nodes replace their whole [`DescriptorSet`] when declarations
//! change; descriptors are never patched in place.
//!
//! Declarations usually arrive from script as JSON:
//!
//! ```
//! use horizon_gesture::descriptor::{GestureDescriptor, GestureFamily};
//!
//! let descriptor = GestureDescriptor::from_json(
//!     r#"{ "id": 1, "type": 0, "relationMap": { "waitFor": [2] },
//!          "configMap": { "minDistance": 8 } }"#,
//! )
//! .unwrap();
//! assert_eq!(descriptor.family(), GestureFamily::Pan);
//! assert_eq!(descriptor.relations().wait_for.len(), 1);
//! ```

use std::collections::BTreeMap;
use std::collections::btree_map;
use std::fmt;
use std::sync::Arc;

use horizon_gesture_core::logging::targets;
use horizon_gesture_core::{DescriptorError, GestureId};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Recognizer family. The discriminant is the wire code used by declarations.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "i64", into = "u8")]
pub enum GestureFamily {
    /// Continuous drag past a minimum distance.
    Pan = 0,
    /// Release velocity above a threshold.
    Fling = 1,
    /// Delta-driven scrolling of the member itself.
    Default = 2,
    /// Short press and release in place.
    Tap = 3,
    /// Press held in place for a minimum duration.
    LongPress = 4,
    /// Two-pointer twist.
    Rotation = 5,
    /// Two-pointer spread.
    Pinch = 6,
    /// Scrolling performed by the platform's native view.
    Native = 7,
}

impl GestureFamily {
    /// All families in wire-code order.
    pub const ALL: [GestureFamily; 8] = [
        Self::Pan,
        Self::Fling,
        Self::Default,
        Self::Tap,
        Self::LongPress,
        Self::Rotation,
        Self::Pinch,
        Self::Native,
    ];

    /// The wire code of this family.
    #[inline]
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Looks up a family by wire code.
    pub fn from_code(code: i64) -> Result<Self, DescriptorError> {
        Self::ALL
            .iter()
            .copied()
            .find(|family| i64::from(family.code()) == code)
            .ok_or(DescriptorError::UnknownFamily(code))
    }

    /// Whether the family needs two pointers.
    #[inline]
    pub fn is_multi_pointer(self) -> bool {
        matches!(self, Self::Rotation | Self::Pinch)
    }
}

impl TryFrom<i64> for GestureFamily {
    type Error = DescriptorError;

    fn try_from(code: i64) -> Result<Self, Self::Error> {
        Self::from_code(code)
    }
}

impl From<GestureFamily> for u8 {
    fn from(family: GestureFamily) -> Self {
        family.code()
    }
}

impl fmt::Display for GestureFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Pan => "pan",
            Self::Fling => "fling",
            Self::Default => "default",
            Self::Tap => "tap",
            Self::LongPress => "long-press",
            Self::Rotation => "rotation",
            Self::Pinch => "pinch",
            Self::Native => "native",
        };
        f.write_str(name)
    }
}

/// A callback a recognizer can deliver to the runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum GestureCallback {
    #[serde(rename = "onBegin")]
    Begin,
    #[serde(rename = "onStart")]
    Start,
    #[serde(rename = "onUpdate")]
    Update,
    #[serde(rename = "onEnd")]
    End,
    #[serde(rename = "onFail")]
    Fail,
    #[serde(rename = "onTouchesDown")]
    TouchesDown,
    #[serde(rename = "onTouchesMove")]
    TouchesMove,
    #[serde(rename = "onTouchesUp")]
    TouchesUp,
    #[serde(rename = "onTouchesCancel")]
    TouchesCancel,
}

impl GestureCallback {
    const ALL: [GestureCallback; 9] = [
        Self::Begin,
        Self::Start,
        Self::Update,
        Self::End,
        Self::Fail,
        Self::TouchesDown,
        Self::TouchesMove,
        Self::TouchesUp,
        Self::TouchesCancel,
    ];

    /// The name scripts use to subscribe to this callback.
    pub fn name(self) -> &'static str {
        match self {
            Self::Begin => "onBegin",
            Self::Start => "onStart",
            Self::Update => "onUpdate",
            Self::End => "onEnd",
            Self::Fail => "onFail",
            Self::TouchesDown => "onTouchesDown",
            Self::TouchesMove => "onTouchesMove",
            Self::TouchesUp => "onTouchesUp",
            Self::TouchesCancel => "onTouchesCancel",
        }
    }

    /// Looks up a callback by its script name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|cb| cb.name() == name)
    }

    #[inline]
    fn bit(self) -> u16 {
        1 << (self as u16)
    }
}

/// Set of callbacks enabled on a descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CallbackSet(u16);

impl CallbackSet {
    /// No callbacks.
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Begin, start, update, end and fail; no touches callbacks.
    pub fn lifecycle() -> Self {
        [
            GestureCallback::Begin,
            GestureCallback::Start,
            GestureCallback::Update,
            GestureCallback::End,
            GestureCallback::Fail,
        ]
        .into_iter()
        .collect()
    }

    /// Every callback.
    pub fn all() -> Self {
        GestureCallback::ALL.into_iter().collect()
    }

    /// Builds a set from script names, ignoring unknown names.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = Self::empty();
        for name in names {
            match GestureCallback::from_name(name.as_ref()) {
                Some(cb) => set.insert(cb),
                None => tracing::trace!(
                    target: targets::REGISTRY,
                    name = name.as_ref(),
                    "ignoring unknown gesture callback name"
                ),
            }
        }
        set
    }

    #[inline]
    pub fn contains(self, cb: GestureCallback) -> bool {
        self.0 & cb.bit() != 0
    }

    #[inline]
    pub fn insert(&mut self, cb: GestureCallback) {
        self.0 |= cb.bit();
    }

    #[inline]
    pub fn remove(&mut self, cb: GestureCallback) {
        self.0 &= !cb.bit();
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl Default for CallbackSet {
    fn default() -> Self {
        Self::lifecycle()
    }
}

impl FromIterator<GestureCallback> for CallbackSet {
    fn from_iter<T: IntoIterator<Item = GestureCallback>>(iter: T) -> Self {
        let mut set = Self::empty();
        for cb in iter {
            set.insert(cb);
        }
        set
    }
}

/// Relation lists of a descriptor. Order inside each list is significant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Relations {
    /// Gestures that must fail or end before this one may commit.
    pub wait_for: Vec<GestureId>,
    /// Gestures that may stay active alongside this one.
    pub simultaneous: Vec<GestureId>,
    /// Gestures that take over the stream from this one.
    pub continue_with: Vec<GestureId>,
}

impl Relations {
    /// Whether any list is non-empty.
    pub fn is_empty(&self) -> bool {
        self.wait_for.is_empty() && self.simultaneous.is_empty() && self.continue_with.is_empty()
    }

    /// Whether the descriptor reorders the compete chain (`waitFor` or `continueWith`).
    pub fn reorders_chain(&self) -> bool {
        !self.wait_for.is_empty() || !self.continue_with.is_empty()
    }
}

/// Opaque key/value tuning of a descriptor.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GestureConfig(Map<String, Value>);

impl GestureConfig {
    /// Wraps a JSON object.
    pub fn new(values: Map<String, Value>) -> Self {
        Self(values)
    }

    /// Raw access to a value.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Reads a numeric value as `f32`.
    pub fn get_f32(&self, key: &str) -> Option<f32> {
        self.0.get(key).and_then(Value::as_f64).map(|v| v as f32)
    }

    /// Reads a numeric value as `f32`, falling back to `default`.
    pub fn f32_or(&self, key: &str, default: f32) -> f32 {
        self.get_f32(key).unwrap_or(default)
    }

    /// Reads a non-negative integer, accepting float literals by truncation.
    pub fn get_u64(&self, key: &str) -> Option<u64> {
        let value = self.0.get(key)?;
        value
            .as_u64()
            .or_else(|| value.as_f64().filter(|v| *v >= 0.0).map(|v| v as u64))
    }

    /// Reads an integer value, falling back to `default`.
    pub fn u64_or(&self, key: &str, default: u64) -> u64 {
        self.get_u64(key).unwrap_or(default)
    }

    fn insert(&mut self, key: String, value: Value) {
        self.0.insert(key, value);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Rejects known numeric keys that are negative or not numbers.
    fn validate(&self, gesture: GestureId) -> Result<(), DescriptorError> {
        const NUMERIC_KEYS: [&str; 7] = [
            "minDistance",
            "maxDistance",
            "maxDuration",
            "minDuration",
            "minVelocity",
            "minSpan",
            "minAngle",
        ];
        for key in NUMERIC_KEYS {
            let Some(value) = self.0.get(key) else {
                continue;
            };
            match value.as_f64() {
                Some(v) if v >= 0.0 && v.is_finite() => {}
                Some(_) => {
                    return Err(DescriptorError::invalid_config(gesture, key, "must be >= 0"));
                }
                None => {
                    return Err(DescriptorError::invalid_config(gesture, key, "must be a number"));
                }
            }
        }
        Ok(())
    }
}

/// Declaration of one recognizer.
#[derive(Debug, Clone, PartialEq)]
pub struct GestureDescriptor {
    id: GestureId,
    family: GestureFamily,
    relations: Relations,
    callbacks: CallbackSet,
    config: GestureConfig,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDescriptor {
    id: GestureId,
    #[serde(rename = "type")]
    family: GestureFamily,
    #[serde(default)]
    callback_names: Option<Vec<String>>,
    #[serde(default)]
    relation_map: Option<Relations>,
    #[serde(default)]
    config_map: Option<Map<String, Value>>,
}

impl TryFrom<RawDescriptor> for GestureDescriptor {
    type Error = DescriptorError;

    fn try_from(raw: RawDescriptor) -> Result<Self, Self::Error> {
        let config = GestureConfig::new(raw.config_map.unwrap_or_default());
        config.validate(raw.id)?;
        Ok(Self {
            id: raw.id,
            family: raw.family,
            relations: raw.relation_map.unwrap_or_default(),
            callbacks: raw
                .callback_names
                .map(CallbackSet::from_names)
                .unwrap_or_default(),
            config,
        })
    }
}

impl GestureDescriptor {
    /// Creates a descriptor with no relations, default callbacks and empty config.
    pub fn new(id: impl Into<GestureId>, family: GestureFamily) -> Self {
        Self {
            id: id.into(),
            family,
            relations: Relations::default(),
            callbacks: CallbackSet::default(),
            config: GestureConfig::default(),
        }
    }

    /// Parses one JSON declaration.
    pub fn from_json(json: &str) -> Result<Self, DescriptorError> {
        let raw: RawDescriptor = serde_json::from_str(json)?;
        raw.try_into()
    }

    /// Parses one declaration from an already-decoded JSON value.
    pub fn from_value(value: Value) -> Result<Self, DescriptorError> {
        let raw: RawDescriptor = serde_json::from_value(value)?;
        raw.try_into()
    }

    /// Sets the `waitFor` list.
    pub fn with_wait_for(mut self, ids: impl IntoIterator<Item = u32>) -> Self {
        self.relations.wait_for = ids.into_iter().map(GestureId).collect();
        self
    }

    /// Sets the `simultaneous` list.
    pub fn with_simultaneous(mut self, ids: impl IntoIterator<Item = u32>) -> Self {
        self.relations.simultaneous = ids.into_iter().map(GestureId).collect();
        self
    }

    /// Sets the `continueWith` list.
    pub fn with_continue_with(mut self, ids: impl IntoIterator<Item = u32>) -> Self {
        self.relations.continue_with = ids.into_iter().map(GestureId).collect();
        self
    }

    /// Sets the enabled callbacks.
    pub fn with_callbacks(mut self, callbacks: CallbackSet) -> Self {
        self.callbacks = callbacks;
        self
    }

    /// Adds one tuning value.
    pub fn with_config(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.config.insert(key.into(), value.into());
        self
    }

    #[inline]
    pub fn id(&self) -> GestureId {
        self.id
    }

    #[inline]
    pub fn family(&self) -> GestureFamily {
        self.family
    }

    #[inline]
    pub fn relations(&self) -> &Relations {
        &self.relations
    }

    #[inline]
    pub fn callbacks(&self) -> CallbackSet {
        self.callbacks
    }

    #[inline]
    pub fn config(&self) -> &GestureConfig {
        &self.config
    }
}

/// The descriptors declared by one member, ordered by ascending id.
///
/// Iteration order is the declaration precedence used by the resolver: when a
/// member owns several descriptors with relations, the lowest id wins.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DescriptorSet {
    descriptors: BTreeMap<GestureId, Arc<GestureDescriptor>>,
}

impl DescriptorSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a JSON array of declarations.
    pub fn from_json(json: &str) -> Result<Self, DescriptorError> {
        let values: Vec<Value> = serde_json::from_str(json)?;
        values
            .into_iter()
            .map(GestureDescriptor::from_value)
            .collect()
    }

    /// Inserts a descriptor, returning the one it replaced.
    pub fn insert(&mut self, descriptor: GestureDescriptor) -> Option<Arc<GestureDescriptor>> {
        self.descriptors.insert(descriptor.id(), Arc::new(descriptor))
    }

    pub fn get(&self, id: GestureId) -> Option<&Arc<GestureDescriptor>> {
        self.descriptors.get(&id)
    }

    pub fn contains(&self, id: GestureId) -> bool {
        self.descriptors.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// Descriptor ids in ascending order.
    pub fn ids(&self) -> impl Iterator<Item = GestureId> + '_ {
        self.descriptors.keys().copied()
    }

    /// Descriptors in ascending id order.
    pub fn iter(&self) -> btree_map::Values<'_, GestureId, Arc<GestureDescriptor>> {
        self.descriptors.values()
    }

    /// The first descriptor, by id, that declares `waitFor` or `continueWith`.
    pub fn first_reordering(&self) -> Option<&Arc<GestureDescriptor>> {
        self.iter().find(|d| d.relations().reorders_chain())
    }
}

impl FromIterator<GestureDescriptor> for DescriptorSet {
    fn from_iter<T: IntoIterator<Item = GestureDescriptor>>(iter: T) -> Self {
        let mut set = Self::new();
        for descriptor in iter {
            set.insert(descriptor);
        }
        set
    }
}

impl<'a> IntoIterator for &'a DescriptorSet {
    type Item = &'a Arc<GestureDescriptor>;
    type IntoIter = btree_map::Values<'a, GestureId, Arc<GestureDescriptor>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

static_assertions::assert_impl_all!(GestureDescriptor: Send, Sync, Clone);
static_assertions::assert_impl_all!(DescriptorSet: Send, Sync);
