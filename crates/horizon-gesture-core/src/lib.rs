//! Core types for Horizon Gesture.
//!
//! This crate holds the pieces shared by every layer of the gesture arena:
//!
//! - **Identifiers**: [`MemberId`], [`GestureId`] and the registry's [`MemberHandle`]
//! - **Geometry**: [`Point`] in device pixels plus px/dip conversion
//! - **Errors**: [`ArenaError`] and [`DescriptorError`] for the host-facing API
//! - **Logging**: per-subsystem tracing targets and [`PerfSpan`](logging::PerfSpan)
//! - **Thread checks**: [`ThreadAffinity`](thread_check::ThreadAffinity) for the
//!   single UI-thread model
//!
//! The arbitration engine itself lives in the `horizon-gesture` crate.

pub mod error;
pub mod geometry;
pub mod id;
pub mod logging;
pub mod thread_check;

pub use error::{ArenaError, DescriptorError, Result};
pub use geometry::{Point, dip_to_px, px_to_dip, vec_to_dip};
pub use id::{GestureId, MemberHandle, MemberId};
pub use logging::PerfSpan;
pub use thread_check::ThreadAffinity;
