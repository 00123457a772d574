//! Collaborator contracts between the adapter core and the host platform.
//!
//! The adapter implements none of the rendering machinery; it talks to the
//! host through three small traits:
//!
//! - [`SlotObserver`]: the rendering widget's change-notification surface.
//!   The adapter forwards unified-space range notifications here so the
//!   widget can keep its recycling bookkeeping consistent.
//! - [`BindableSlot`]: an inflated, bindable view instance. The adapter
//!   writes item fields into it and flushes pending writes synchronously at
//!   the end of every bind.
//! - [`SlotInflater`]: the layout-inflation mechanism, producing a
//!   [`BindableSlot`] for a [`LayoutId`].
//!
//! On top of those, the host customizes slot setup and binding through
//! per-layout [`CreateHook`]/[`BindHook`] callbacks, which receive a
//! [`BindContext`] describing the row being bound.

use crate::list::ChangePayload;
use crate::regions::RegionSlot;
use crate::registry::{FieldId, LayoutId};

/// The rendering widget's notification surface.
///
/// All positions are unified-space positions. Insert and move notifications
/// describe post-mutation coordinates; remove notifications describe
/// pre-mutation coordinates, matching the bookkeeping the recycling widget
/// performs internally.
pub trait SlotObserver: Send + Sync {
    /// `count` slots were inserted starting at `position`.
    fn notify_inserted(&self, position: usize, count: usize);

    /// `count` slots were removed starting at `position`.
    fn notify_removed(&self, position: usize, count: usize);

    /// `count` slots starting at `position` changed in place. `payload`
    /// optionally carries a partial-rebind token from the originating
    /// mutation.
    fn notify_changed(&self, position: usize, count: usize, payload: Option<ChangePayload>);

    /// The slot at `from` moved to `to`.
    fn notify_moved(&self, from: usize, to: usize);
}

/// An inflated view instance the adapter can bind an item into.
///
/// Produced by the host's [`SlotInflater`]; the adapter never constructs one
/// itself. A slot is bound to at most one unified position at a time: each
/// bind overwrites the previous binding in full and ends with
/// [`commit_pending_writes`](Self::commit_pending_writes), so the slot is
/// visually consistent the instant the bind call returns.
pub trait BindableSlot<T> {
    /// Injects `item` under the given binding field.
    fn set_field(&mut self, field: FieldId, item: &T);

    /// Flushes any deferred field writes. Called exactly once at the end of
    /// every successful bind.
    fn commit_pending_writes(&mut self);
}

/// The host's layout-inflation mechanism.
pub trait SlotInflater<T>: Send + Sync {
    /// Produces a fresh bindable slot for `layout`.
    fn inflate(&self, layout: LayoutId) -> Box<dyn BindableSlot<T>>;
}

/// Context handed to a [`BindHook`] for the row being bound.
#[derive(Debug)]
pub struct BindContext<'a> {
    /// The unified position being bound.
    pub position: usize,
    /// The region-local classification of the position.
    pub slot: RegionSlot,
    /// Partial-rebind token, present when this bind was triggered by a
    /// change notification that carried one.
    pub payload: Option<&'a ChangePayload>,
}

/// Callback invoked once when a slot is created for a layout, before it is
/// ever bound. Use for one-time view setup (listeners, static styling).
pub type CreateHook<T> = Box<dyn Fn(&mut dyn BindableSlot<T>) + Send + Sync>;

/// Callback invoked after the adapter's own field writes on every bind of a
/// slot with the matching layout, before the pending writes are committed.
pub type BindHook<T> = Box<dyn Fn(&mut dyn BindableSlot<T>, &BindContext<'_>) + Send + Sync>;
