//! UI-thread affinity checks for arbitration state.
//!
//! The registry and the dispatcher are driven from the single thread that
//! delivers pointer input. Each of them records a [`ThreadAffinity`] when it is
//! built and asserts it (debug builds only) on every mutation, so a host that
//! accidentally feeds events from a worker thread fails loudly instead of
//! racing.
//!
//! ```
//! use horizon_gesture_core::thread_check::ThreadAffinity;
//!
//! let affinity = ThreadAffinity::current();
//! assert!(affinity.is_same_thread());
//! affinity.debug_assert_same_thread("registry mutation");
//! ```

use std::thread::ThreadId;

/// Records the thread a piece of arbitration state belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThreadAffinity {
    thread_id: ThreadId,
}

impl Default for ThreadAffinity {
    fn default() -> Self {
        Self::current()
    }
}

impl ThreadAffinity {
    /// Bind to the calling thread.
    #[inline]
    pub fn current() -> Self {
        Self {
            thread_id: std::thread::current().id(),
        }
    }

    /// Get the thread ID this affinity is bound to.
    #[inline]
    pub fn thread_id(&self) -> ThreadId {
        self.thread_id
    }

    /// Check if the calling thread matches this affinity.
    #[inline]
    pub fn is_same_thread(&self) -> bool {
        std::thread::current().id() == self.thread_id
    }

    /// Assert the calling thread, in every build.
    ///
    /// # Panics
    ///
    /// Panics naming `operation` when called from another thread.
    pub fn assert_same_thread(&self, operation: &str) {
        if !self.is_same_thread() {
            self.panic_wrong_thread(operation);
        }
    }

    /// Debug-only variant of [`assert_same_thread`](Self::assert_same_thread).
    #[inline]
    pub fn debug_assert_same_thread(&self, operation: &str) {
        #[cfg(debug_assertions)]
        self.assert_same_thread(operation);
        #[cfg(not(debug_assertions))]
        let _ = operation;
    }

    #[cold]
    #[inline(never)]
    fn panic_wrong_thread(&self, operation: &str) -> ! {
        let current = std::thread::current();
        panic!(
            "gesture arena: {operation} called from thread \"{}\" ({:?}); \
             arbitration state belongs to {:?} and must stay on the UI-event thread",
            current.name().unwrap_or("<unnamed>"),
            current.id(),
            self.thread_id,
        );
    }
}
