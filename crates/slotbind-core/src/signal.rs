//! Signal/slot system for slotbind.
//!
//! This module provides a type-safe signal mechanism for change notification.
//! Signals are emitted by containers when their state changes, and connected
//! slots (callbacks) are invoked in response.
//!
//! # Key Types
//!
//! - [`Signal<Args>`] - The main signal type for emitting notifications
//! - [`ConnectionId`] - Unique identifier returned when connecting a slot
//!
//! # Dispatch Model
//!
//! Emission is always synchronous: every connected slot runs on the emitting
//! thread before `emit` returns, in the order the slots were connected. There
//! is no queued or cross-thread dispatch; slotbind assumes a single designated
//! UI thread (see [`crate::thread_check`]), and mutating shared state from
//! multiple threads is undefined behavior at the adapter level.
//!
//! # Example
//!
//! ```
//! use slotbind_core::Signal;
//!
//! let changed = Signal::<String>::new();
//!
//! let conn_id = changed.connect(|text| {
//!     println!("changed to: {}", text);
//! });
//!
//! changed.emit("Hello".to_string());
//! changed.disconnect(conn_id);
//! ```

use std::sync::Arc;

use parking_lot::Mutex;
use slotmap::{SlotMap, new_key_type};

new_key_type! {
    /// A unique identifier for a signal-slot connection.
    ///
    /// Use this ID to disconnect a specific connection via
    /// [`Signal::disconnect`]. The ID remains valid until the connection is
    /// explicitly disconnected or the signal is dropped.
    pub struct ConnectionId;
}

/// Internal storage for a single connection.
struct Connection<Args> {
    /// The slot function to invoke.
    slot: Arc<dyn Fn(&Args) + Send + Sync>,
}

/// Registered connections plus the order they were registered in.
///
/// `SlotMap` iteration order is unspecified once keys have been removed, but
/// observers must be invoked in registration order, so the order is tracked
/// explicitly.
struct Connections<Args> {
    slots: SlotMap<ConnectionId, Connection<Args>>,
    order: Vec<ConnectionId>,
}

/// A type-safe signal that can have multiple connected slots.
///
/// When a signal is emitted, all connected slots are invoked synchronously
/// with the provided arguments, in registration order.
///
/// # Type Parameter
///
/// - `Args`: The argument type passed to connected slots. Use `()` for
///   signals with no arguments, or a tuple for multiple arguments.
///
/// # Related Types
///
/// - [`ConnectionId`] - Returned by [`connect`](Self::connect), used to disconnect
pub struct Signal<Args> {
    /// All active connections.
    connections: Mutex<Connections<Args>>,
}

impl<Args: Clone + Send + 'static> Default for Signal<Args> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Args: Clone + Send + 'static> Signal<Args> {
    /// Create a new signal with no connections.
    pub fn new() -> Self {
        Self {
            connections: Mutex::new(Connections {
                slots: SlotMap::with_key(),
                order: Vec::new(),
            }),
        }
    }

    /// Connect a slot (closure) to this signal.
    ///
    /// Slots are invoked synchronously on the emitting thread, in the order
    /// they were connected.
    ///
    /// Returns a `ConnectionId` that can be used to disconnect the slot later.
    ///
    /// # Example
    ///
    /// ```
    /// use slotbind_core::Signal;
    ///
    /// let signal = Signal::<String>::new();
    /// let id = signal.connect(|s| println!("got: {}", s));
    /// signal.emit("hello".to_string());
    /// ```
    pub fn connect<F>(&self, slot: F) -> ConnectionId
    where
        F: Fn(&Args) + Send + Sync + 'static,
    {
        let mut connections = self.connections.lock();
        let id = connections.slots.insert(Connection {
            slot: Arc::new(slot),
        });
        connections.order.push(id);
        id
    }

    /// Disconnect a specific slot by its connection ID.
    ///
    /// Returns `true` if the connection was found and removed, `false` otherwise.
    pub fn disconnect(&self, id: ConnectionId) -> bool {
        let mut connections = self.connections.lock();
        if connections.slots.remove(id).is_some() {
            connections.order.retain(|&existing| existing != id);
            true
        } else {
            false
        }
    }

    /// Get the number of connected slots.
    pub fn connection_count(&self) -> usize {
        self.connections.lock().slots.len()
    }

    /// Emit the signal, invoking all connected slots.
    ///
    /// Every connected slot is invoked on the current thread before this
    /// call returns, in registration order. Emission cannot be suppressed:
    /// a signal owner's one-record-per-mutation contract holds for every
    /// observer.
    ///
    /// Slots connected or disconnected while an emit is in progress take
    /// effect from the next emit; the current emit sees the connection set
    /// captured at its start.
    #[tracing::instrument(skip_all, target = "slotbind_core::signal", level = "trace")]
    pub fn emit(&self, args: Args) {
        // Snapshot the slots so re-entrant connect/disconnect from inside a
        // slot does not deadlock on the connections mutex.
        let slots: Vec<Arc<dyn Fn(&Args) + Send + Sync>> = {
            let connections = self.connections.lock();
            tracing::trace!(
                target: "slotbind_core::signal",
                connection_count = connections.order.len(),
                "emitting signal"
            );
            connections
                .order
                .iter()
                .filter_map(|&id| connections.slots.get(id).map(|conn| conn.slot.clone()))
                .collect()
        };

        for slot in slots {
            slot(&args);
        }
    }
}

static_assertions::assert_impl_all!(Signal<(usize, usize)>: Send, Sync);
