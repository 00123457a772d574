//! Observable list container.
//!
//! [`ObservableList<T>`] is an ordered sequence with stable positional
//! indices that emits exactly one structured [`ListChange`] record per
//! mutation, synchronously on the mutating thread, to observers in
//! registration order. It is the backing store for the adapter's header,
//! body, and footer regions.
//!
//! # Example
//!
//! ```
//! use slotbind::{ListChange, ObservableList};
//!
//! let list = ObservableList::new();
//! list.changed().connect(|change| {
//!     if let ListChange::Inserted { start, count } = change {
//!         println!("inserted {} at {}", count, start);
//!     }
//! });
//! list.push("Apple".to_string());
//! assert_eq!(list.len(), 1);
//! ```

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use slotbind_core::Signal;

use crate::error::ListError;

/// An opaque token attached to an in-place change, forwarded through the
/// notification chain so a bind hook can perform a partial rebind instead of
/// a full one.
///
/// Payloads are cheap to clone (reference-counted) and type-erased; the
/// producer and the bind hook agree on the concrete type out of band.
#[derive(Clone)]
pub struct ChangePayload(Arc<dyn Any + Send + Sync>);

impl ChangePayload {
    /// Wrap a value as a change payload.
    pub fn new<P: Any + Send + Sync>(value: P) -> Self {
        Self(Arc::new(value))
    }

    /// Downcast the payload to a concrete type.
    pub fn downcast_ref<P: Any>(&self) -> Option<&P> {
        self.0.downcast_ref::<P>()
    }
}

impl fmt::Debug for ChangePayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ChangePayload").finish_non_exhaustive()
    }
}

/// A structural change record describing the minimal affected range of one
/// list mutation.
#[derive(Debug, Clone)]
pub enum ListChange {
    /// `count` items were inserted starting at `start`.
    Inserted { start: usize, count: usize },
    /// `count` items were removed starting at `start` (pre-removal indices).
    Removed { start: usize, count: usize },
    /// `count` items starting at `start` were replaced or modified in place.
    Changed {
        start: usize,
        count: usize,
        /// Optional partial-rebind token, forwarded to the bind hook.
        payload: Option<ChangePayload>,
    },
    /// The item at `from` was moved to `to` (post-move index).
    Moved { from: usize, to: usize },
}

/// An ordered sequence that emits one change record per mutation.
///
/// All mutations validate their positions first and leave the sequence
/// unmodified on [`ListError::OutOfRange`]. Each successful mutation applies
/// atomically from the caller's point of view, then emits exactly one
/// [`ListChange`] describing the minimal affected range. Observers run
/// synchronously on the mutating thread, in registration order, and see the
/// post-mutation sequence.
///
/// The list itself is exclusively mutated by the application; the adapter
/// only reads it and reacts to its change events.
pub struct ObservableList<T> {
    items: RwLock<Vec<T>>,
    changed: Signal<ListChange>,
}

impl<T: Send + Sync + 'static> Default for ObservableList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Send + Sync + 'static> ObservableList<T> {
    /// Creates an empty list.
    pub fn new() -> Self {
        Self::from_items(Vec::new())
    }

    /// Creates a list pre-populated with `items`. No change record is
    /// emitted for the initial contents.
    pub fn from_items(items: Vec<T>) -> Self {
        Self {
            items: RwLock::new(items),
            changed: Signal::new(),
        }
    }

    /// The change stream for this list.
    ///
    /// Connect to register an observer, disconnect to unregister.
    pub fn changed(&self) -> &Signal<ListChange> {
        &self.changed
    }

    /// Returns the number of items in the list.
    pub fn len(&self) -> usize {
        self.items.read().len()
    }

    /// Returns `true` if the list is empty.
    pub fn is_empty(&self) -> bool {
        self.items.read().is_empty()
    }

    /// Appends an item to the end of the list.
    pub fn push(&self, item: T) {
        let start = {
            let mut items = self.items.write();
            items.push(item);
            items.len() - 1
        };
        self.changed.emit(ListChange::Inserted { start, count: 1 });
    }

    /// Inserts an item at `position`, shifting subsequent items.
    ///
    /// `position == len()` appends.
    pub fn insert(&self, position: usize, item: T) -> Result<(), ListError> {
        {
            let mut items = self.items.write();
            if position > items.len() {
                return Err(ListError::out_of_range(position, items.len()));
            }
            items.insert(position, item);
        }
        self.changed.emit(ListChange::Inserted {
            start: position,
            count: 1,
        });
        Ok(())
    }

    /// Inserts a batch of items at `position` as one mutation.
    ///
    /// Emits a single change record covering the whole inserted range.
    /// Inserting an empty batch is a no-op and emits nothing.
    pub fn insert_all(&self, position: usize, batch: Vec<T>) -> Result<(), ListError> {
        if batch.is_empty() {
            let len = self.items.read().len();
            if position > len {
                return Err(ListError::out_of_range(position, len));
            }
            return Ok(());
        }
        let count = batch.len();
        {
            let mut items = self.items.write();
            if position > items.len() {
                return Err(ListError::out_of_range(position, items.len()));
            }
            items.splice(position..position, batch);
        }
        self.changed.emit(ListChange::Inserted {
            start: position,
            count,
        });
        Ok(())
    }

    /// Removes and returns the item at `position`.
    pub fn remove(&self, position: usize) -> Result<T, ListError> {
        let item = {
            let mut items = self.items.write();
            if position >= items.len() {
                return Err(ListError::out_of_range(position, items.len()));
            }
            items.remove(position)
        };
        self.changed.emit(ListChange::Removed {
            start: position,
            count: 1,
        });
        Ok(item)
    }

    /// Removes `count` items starting at `position`.
    ///
    /// Removing zero items is a no-op and emits nothing.
    pub fn remove_range(&self, position: usize, count: usize) -> Result<(), ListError> {
        {
            let mut items = self.items.write();
            let len = items.len();
            if position.checked_add(count).is_none_or(|end| end > len) {
                return Err(ListError::out_of_range(position, len));
            }
            if count == 0 {
                return Ok(());
            }
            items.drain(position..position + count);
        }
        self.changed.emit(ListChange::Removed {
            start: position,
            count,
        });
        Ok(())
    }

    /// Removes all items as a single range removal.
    pub fn clear(&self) {
        let len = self.len();
        // remove_range validates against the current length, so this cannot fail.
        let _ = self.remove_range(0, len);
    }

    /// Replaces the item at `position`.
    pub fn set(&self, position: usize, item: T) -> Result<(), ListError> {
        self.set_with_payload(position, item, None)
    }

    /// Replaces the item at `position`, attaching a partial-rebind payload
    /// to the emitted change record.
    pub fn set_with_payload(
        &self,
        position: usize,
        item: T,
        payload: Option<ChangePayload>,
    ) -> Result<(), ListError> {
        {
            let mut items = self.items.write();
            if position >= items.len() {
                return Err(ListError::out_of_range(position, items.len()));
            }
            items[position] = item;
        }
        self.changed.emit(ListChange::Changed {
            start: position,
            count: 1,
            payload,
        });
        Ok(())
    }

    /// Modifies the item at `position` in place via a closure, emitting a
    /// single change record for the position.
    pub fn modify<F, R>(&self, position: usize, f: F) -> Result<R, ListError>
    where
        F: FnOnce(&mut T) -> R,
    {
        let result = {
            let mut items = self.items.write();
            if position >= items.len() {
                return Err(ListError::out_of_range(position, items.len()));
            }
            f(&mut items[position])
        };
        self.changed.emit(ListChange::Changed {
            start: position,
            count: 1,
            payload: None,
        });
        Ok(result)
    }

    /// Moves the item at `from` to `to`.
    ///
    /// `to` is interpreted as the item's index after the move.
    pub fn move_item(&self, from: usize, to: usize) -> Result<(), ListError> {
        {
            let mut items = self.items.write();
            let len = items.len();
            if from >= len {
                return Err(ListError::out_of_range(from, len));
            }
            if to >= len {
                return Err(ListError::out_of_range(to, len));
            }
            let item = items.remove(from);
            items.insert(to, item);
        }
        self.changed.emit(ListChange::Moved { from, to });
        Ok(())
    }

    /// Read access to the item at `position` via a closure.
    pub fn with_item<F, R>(&self, position: usize, f: F) -> Option<R>
    where
        F: FnOnce(&T) -> R,
    {
        let items = self.items.read();
        items.get(position).map(f)
    }

    /// Returns a read guard over the items.
    pub fn items(&self) -> impl std::ops::Deref<Target = Vec<T>> + '_ {
        self.items.read()
    }
}

impl<T: Clone + Send + Sync + 'static> ObservableList<T> {
    /// Returns a clone of the item at `position`.
    pub fn get(&self, position: usize) -> Option<T> {
        self.items.read().get(position).cloned()
    }
}
