//! Identifiers shared by every arbitration component.

use std::fmt;

use serde::{Deserialize, Serialize};
use slotmap::new_key_type;

/// Identifier of a UI node taking part in gesture arbitration.
///
/// Member ids are assigned by the embedding runtime (usually the node's sign)
/// and stay stable for the node's lifetime.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct MemberId(pub u32);

/// Global identifier of a gesture descriptor.
///
/// Relation lists (`waitFor`, `simultaneous`, `continueWith`) reference these
/// ids, which may belong to descriptors declared on other members.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct GestureId(pub u32);

impl MemberId {
    /// Returns the raw id.
    #[inline]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl GestureId {
    /// Returns the raw id.
    #[inline]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl From<u32> for MemberId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl From<u32> for GestureId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "member#{}", self.0)
    }
}

impl fmt::Display for GestureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "gesture#{}", self.0)
    }
}

new_key_type! {
    /// Arena-assigned handle for a registered member.
    ///
    /// UI nodes keep only this handle instead of a reference into the registry.
    /// A handle becomes stale once its member is unregistered; lookups through a
    /// stale handle return `None`.
    pub struct MemberHandle;
}

static_assertions::assert_impl_all!(MemberId: Send, Sync, Copy);
static_assertions::assert_impl_all!(GestureId: Send, Sync, Copy);
static_assertions::assert_eq_size!(MemberId, u32);
