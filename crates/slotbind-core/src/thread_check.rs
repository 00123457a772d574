//! Thread affinity verification for slotbind.
//!
//! The adapter's contract (list mutation, change notification, bind/create)
//! is single-threaded: everything happens on one designated UI thread, and
//! concurrent mutation from other threads is undefined behavior. This module
//! provides the debug assertions used to catch violations early instead of
//! silently corrupting view state.
//!
//! # Usage
//!
//! Record the owning thread at construction and assert on every entry point:
//!
//! ```
//! use slotbind_core::ThreadAffinity;
//!
//! struct Adapter {
//!     affinity: ThreadAffinity,
//! }
//!
//! impl Adapter {
//!     fn new() -> Self {
//!         Self { affinity: ThreadAffinity::current() }
//!     }
//!
//!     fn bind(&self) {
//!         // Panics in debug builds when called from the wrong thread.
//!         self.affinity.debug_assert_same_thread();
//!     }
//! }
//! ```
//!
//! Two levels of checking are provided:
//!
//! - **Debug assertions** (`debug_assert_same_thread`): only active in debug
//!   builds. Use these liberally for zero-cost production performance.
//! - **Runtime assertions** (`assert_same_thread`): always active. Use where
//!   thread safety must be verified even in release builds.

use std::sync::OnceLock;
use std::thread::ThreadId;

/// Global storage for the designated UI thread ID.
static UI_THREAD_ID: OnceLock<ThreadId> = OnceLock::new();

/// Designate the current thread as the UI thread.
///
/// Call this once from the host application's UI thread at startup. Calling
/// it again from the same thread is a no-op.
///
/// # Panics
///
/// Panics if called again from a different thread.
pub fn set_ui_thread() {
    let current = std::thread::current().id();
    if UI_THREAD_ID.set(current).is_err() && UI_THREAD_ID.get() != Some(&current) {
        panic!(
            "set_ui_thread() called from a different thread than original. \
             The UI thread ID can only be set once."
        );
    }
}

/// Get the designated UI thread ID, if it has been set.
#[inline]
pub fn ui_thread_id() -> Option<ThreadId> {
    UI_THREAD_ID.get().copied()
}

/// Check if the current thread is the designated UI thread.
///
/// Returns `true` when no UI thread has been designated yet (graceful
/// fallback during early initialization and in tests).
#[inline]
pub fn is_ui_thread() -> bool {
    match UI_THREAD_ID.get() {
        Some(&ui_id) => std::thread::current().id() == ui_id,
        None => true,
    }
}

/// Thread affinity tracker for objects.
///
/// Records the thread an object was created on and verifies that subsequent
/// operations occur on the same thread.
#[derive(Debug, Clone, Copy)]
pub struct ThreadAffinity {
    thread_id: ThreadId,
}

impl Default for ThreadAffinity {
    fn default() -> Self {
        Self::current()
    }
}

impl ThreadAffinity {
    /// Create a new thread affinity tracker for the current thread.
    #[inline]
    pub fn current() -> Self {
        Self {
            thread_id: std::thread::current().id(),
        }
    }

    /// Create a thread affinity tracker for the designated UI thread.
    ///
    /// Falls back to the current thread if no UI thread has been designated.
    pub fn ui_thread() -> Self {
        Self {
            thread_id: ui_thread_id().unwrap_or_else(|| std::thread::current().id()),
        }
    }

    /// Get the thread ID this affinity is bound to.
    #[inline]
    pub fn thread_id(&self) -> ThreadId {
        self.thread_id
    }

    /// Check if the current thread matches this affinity.
    #[inline]
    pub fn is_same_thread(&self) -> bool {
        std::thread::current().id() == self.thread_id
    }

    /// Assert that we are on the same thread as the affinity.
    ///
    /// This always runs (debug and release builds).
    ///
    /// # Panics
    ///
    /// Panics with a descriptive message if called from a different thread.
    #[inline]
    pub fn assert_same_thread(&self) {
        self.assert_same_thread_with_msg("object accessed from wrong thread")
    }

    /// Assert that we are on the same thread, with a custom message.
    ///
    /// # Panics
    ///
    /// Panics if called from a different thread.
    pub fn assert_same_thread_with_msg(&self, msg: &str) {
        if !self.is_same_thread() {
            self.panic_wrong_thread(msg);
        }
    }

    /// Debug-only assertion that we are on the same thread.
    ///
    /// This is a no-op in release builds.
    #[inline]
    pub fn debug_assert_same_thread(&self) {
        #[cfg(debug_assertions)]
        self.assert_same_thread();
    }

    #[cold]
    #[inline(never)]
    fn panic_wrong_thread(&self, msg: &str) -> ! {
        let current = std::thread::current();
        let current_name = current.name().unwrap_or("<unnamed>");
        let current_id = current.id();

        panic!(
            "THREAD AFFINITY VIOLATION: {msg}\n\
             Object was created on thread: {:?}\n\
             Current thread: \"{current_name}\" (ID: {current_id:?})\n\
             The slotbind adapter, its backing lists, and all bind/create \
             operations must be driven from the single designated UI thread; \
             cross-thread mutation is undefined behavior.",
            self.thread_id
        )
    }
}
