//! Core primitives for slotbind.
//!
//! This crate provides the foundational components of the slotbind adapter:
//!
//! - **Signal/Slot System**: Type-safe, synchronous change notification with
//!   slots invoked in registration order
//! - **Thread Affinity Checks**: Debug assertions pinning adapter operations
//!   to the single designated UI thread
//!
//! # Signal/Slot Example
//!
//! ```
//! use slotbind_core::Signal;
//!
//! // Create a signal that notifies when a value changes
//! let value_changed = Signal::<i32>::new();
//!
//! // Connect a slot to handle the signal
//! let conn_id = value_changed.connect(|value| {
//!     println!("Value changed to: {}", value);
//! });
//!
//! // Emit the signal
//! value_changed.emit(42);
//!
//! // Disconnect when done
//! value_changed.disconnect(conn_id);
//! ```
//!
//! # Threading Model
//!
//! slotbind assumes a single-threaded cooperative model: every mutation of a
//! backing list, every resulting notification, and every bind/create call
//! happens on one designated thread. Signals here dispatch synchronously on
//! the emitting thread; there is no queued cross-thread delivery. Use
//! [`set_ui_thread`] and [`ThreadAffinity`] to catch accidental cross-thread
//! access in debug builds.

pub mod signal;
pub mod thread_check;

pub use signal::{ConnectionId, Signal};
pub use thread_check::{ThreadAffinity, is_ui_thread, set_ui_thread, ui_thread_id};
