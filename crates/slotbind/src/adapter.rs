//! Adapter core: dispatch, configuration, and the bind lifecycle.
//!
//! [`SlotAdapter`] owns the three backing lists, the type registry, the
//! per-layout hook tables, and the change notifier. The rendering widget
//! drives it through four calls — [`slot_count`](SlotAdapter::slot_count),
//! [`slot_type_tag`](SlotAdapter::slot_type_tag),
//! [`create_slot`](SlotAdapter::create_slot) and
//! [`bind_slot`](SlotAdapter::bind_slot) — and receives change
//! notifications through the [`SlotObserver`] it passes to
//! [`attach`](SlotAdapter::attach).
//!
//! The adapter reads the lists but never mutates them; structural mutation
//! belongs to the application, which holds the same `Arc`s. The only state
//! the adapter flips itself is the substitute configuration (empty-state
//! and load-more), which changes the unified slot count without touching
//! any list and is therefore notified directly.
//!
//! All operations are expected on a single designated thread. Concurrent
//! mutation from multiple threads is not supported; debug builds assert the
//! constructing thread on the hot dispatch paths.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use slotbind_core::{ConnectionId, Signal, ThreadAffinity};

use crate::error::{AdapterError, Result};
use crate::list::{ChangePayload, ObservableList};
use crate::notifier::{ChangeNotifier, ModeFlags};
use crate::regions::{BodyMode, RegionMap, RegionSlot};
use crate::registry::{BindItem, FieldId, ItemTypeRegistry, LayoutId, TypeKey};
use crate::slot::{BindContext, BindHook, BindableSlot, CreateHook, SlotInflater, SlotObserver};

/// A configured substitute row (empty-state or load-more).
struct Substitute<T> {
    layout: LayoutId,
    field: FieldId,
    item: T,
}

struct AdapterConfig<T> {
    /// When set, every row binds under this one field and the registry is
    /// bypassed for field selection.
    default_field: Option<FieldId>,
    empty: Option<Substitute<T>>,
    load_more: Option<Substitute<T>>,
    /// More pages are expected; only meaningful while `load_more` is set.
    has_more: bool,
}

impl<T> Default for AdapterConfig<T> {
    fn default() -> Self {
        Self {
            default_field: None,
            empty: None,
            load_more: None,
            has_more: false,
        }
    }
}

impl<T> AdapterConfig<T> {
    fn flags(&self) -> ModeFlags {
        ModeFlags {
            empty_configured: self.empty.is_some(),
            load_more_active: self.load_more.is_some() && self.has_more,
        }
    }
}

/// The binding adapter between three observable lists and a list-rendering
/// widget.
///
/// See the [crate docs](crate) for the overall architecture. Construction
/// gives three empty lists; [`with_lists`](Self::with_lists) accepts
/// externally-owned ones so the application can keep mutating them through
/// its own `Arc`s.
pub struct SlotAdapter<T: Send + Sync + 'static> {
    header: Arc<ObservableList<T>>,
    body: Arc<ObservableList<T>>,
    footer: Arc<ObservableList<T>>,
    registry: RwLock<ItemTypeRegistry>,
    config: RwLock<AdapterConfig<T>>,
    /// Mode bits shared with the notifier's translation closures.
    flags: Arc<RwLock<ModeFlags>>,
    notifier: ChangeNotifier<T>,
    /// Kept alongside the notifier for the adapter's own direct
    /// notifications (substitute-row appearance, load-more toggling).
    observer: RwLock<Option<Arc<dyn SlotObserver>>>,
    create_hooks: RwLock<HashMap<LayoutId, CreateHook<T>>>,
    bind_hooks: RwLock<HashMap<LayoutId, BindHook<T>>>,
    affinity: ThreadAffinity,
}

impl<T: BindItem> Default for SlotAdapter<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: BindItem> SlotAdapter<T> {
    /// Creates an adapter owning three fresh empty lists.
    pub fn new() -> Self {
        Self::with_lists(
            Arc::new(ObservableList::new()),
            Arc::new(ObservableList::new()),
            Arc::new(ObservableList::new()),
        )
    }

    /// Creates an adapter over caller-supplied lists.
    pub fn with_lists(
        header: Arc<ObservableList<T>>,
        body: Arc<ObservableList<T>>,
        footer: Arc<ObservableList<T>>,
    ) -> Self {
        Self {
            header,
            body,
            footer,
            registry: RwLock::new(ItemTypeRegistry::new()),
            config: RwLock::new(AdapterConfig::default()),
            flags: Arc::new(RwLock::new(ModeFlags::default())),
            notifier: ChangeNotifier::new(),
            observer: RwLock::new(None),
            create_hooks: RwLock::new(HashMap::new()),
            bind_hooks: RwLock::new(HashMap::new()),
            affinity: ThreadAffinity::current(),
        }
    }

    /// The header list. Mutate it to change the rows above the body.
    pub fn header_list(&self) -> &Arc<ObservableList<T>> {
        &self.header
    }

    /// The body list, subject to empty-state and load-more substitution.
    pub fn body_list(&self) -> &Arc<ObservableList<T>> {
        &self.body
    }

    /// The footer list.
    pub fn footer_list(&self) -> &Arc<ObservableList<T>> {
        &self.footer
    }

    // -- configuration ----------------------------------------------------

    /// Registers (or replaces) the layout/field mapping for an item kind.
    ///
    /// Callable before or after attachment; already-bound rows are not
    /// re-bound retroactively.
    pub fn register_type(&self, key: TypeKey, layout: LayoutId, field: Option<FieldId>) {
        self.affinity.debug_assert_same_thread();
        self.registry.write().register(key, layout, field);
    }

    /// Registers the mapping for type `K`, the common homogeneous-list case.
    pub fn register_type_of<K: 'static>(&self, layout: LayoutId, field: Option<FieldId>) {
        self.affinity.debug_assert_same_thread();
        self.registry.write().register_type::<K>(layout, field);
    }

    /// Switches every row to bind under one shared field (`Some`), or back
    /// to per-type field dispatch (`None`).
    pub fn set_default_field(&self, field: Option<FieldId>) {
        self.affinity.debug_assert_same_thread();
        self.config.write().default_field = field;
    }

    /// Registers a one-time setup hook for slots of `layout`.
    ///
    /// At most one hook per layout; a later registration silently replaces
    /// an earlier one.
    pub fn register_create_hook(&self, layout: LayoutId, hook: CreateHook<T>) {
        self.affinity.debug_assert_same_thread();
        self.create_hooks.write().insert(layout, hook);
    }

    /// Registers a per-bind hook for slots of `layout`, invoked after the
    /// adapter's own field write and before the commit.
    ///
    /// Same replacement policy as [`register_create_hook`](Self::register_create_hook).
    pub fn register_bind_hook(&self, layout: LayoutId, hook: BindHook<T>) {
        self.affinity.debug_assert_same_thread();
        self.bind_hooks.write().insert(layout, hook);
    }

    /// Configures the empty-state substitute: when the body list is empty, a
    /// single row of `layout` bound to `item` stands in for it.
    ///
    /// Fails with [`AdapterError::AmbiguousMode`] if load-more is already
    /// configured; the two substitutes are mutually exclusive and prior
    /// configuration is kept.
    pub fn configure_empty_state(&self, layout: LayoutId, item: T) -> Result<()> {
        self.affinity.debug_assert_same_thread();
        let mut config = self.config.write();
        if config.load_more.is_some() {
            return Err(AdapterError::AmbiguousMode);
        }
        let first = config.empty.is_none();
        config.empty = Some(Substitute {
            layout,
            field: FieldId::DEFAULT,
            item,
        });
        let flags = config.flags();
        drop(config);
        *self.flags.write() = flags;

        // Configuring while already empty makes the placeholder appear now.
        if first && self.body.is_empty() {
            if let Some(observer) = self.observer.read().as_ref() {
                observer.notify_inserted(self.header.len(), 1);
            }
        }
        Ok(())
    }

    /// Configures the load-more substitute: a single trailing row of
    /// `layout` bound to `item` under `field`, shown while more pages are
    /// expected. Enables [`has_more`](Self::set_has_more) immediately.
    ///
    /// Fails with [`AdapterError::AmbiguousMode`] if an empty-state
    /// substitute is already configured.
    pub fn configure_load_more(&self, layout: LayoutId, item: T, field: FieldId) -> Result<()> {
        self.affinity.debug_assert_same_thread();
        let mut config = self.config.write();
        if config.empty.is_some() {
            return Err(AdapterError::AmbiguousMode);
        }
        let was_active = config.flags().load_more_active;
        config.load_more = Some(Substitute {
            layout,
            field,
            item,
        });
        config.has_more = true;
        let flags = config.flags();
        drop(config);
        *self.flags.write() = flags;

        if !was_active {
            if let Some(observer) = self.observer.read().as_ref() {
                observer.notify_inserted(self.header.len() + self.body.len(), 1);
            }
        }
        Ok(())
    }

    /// Toggles whether the trailing load-more row is shown.
    ///
    /// A no-op unless load-more is configured. Notifies the attached widget
    /// of the trailing row's insertion or removal.
    pub fn set_has_more(&self, has_more: bool) {
        self.affinity.debug_assert_same_thread();
        let mut config = self.config.write();
        if config.load_more.is_none() || config.has_more == has_more {
            config.has_more = has_more && config.load_more.is_some();
            return;
        }
        config.has_more = has_more;
        let flags = config.flags();
        drop(config);
        *self.flags.write() = flags;

        let trailing = self.header.len() + self.body.len();
        if let Some(observer) = self.observer.read().as_ref() {
            if has_more {
                observer.notify_inserted(trailing, 1);
            } else {
                observer.notify_removed(trailing, 1);
            }
        }
    }

    // -- index space ------------------------------------------------------

    /// A snapshot of the unified index space under the current counts and
    /// mode.
    pub fn region_map(&self) -> RegionMap {
        let flags = *self.flags.read();
        let body = self.body.len();
        let mode = if flags.load_more_active {
            BodyMode::LoadMore
        } else if body == 0 && flags.empty_configured {
            BodyMode::Empty
        } else {
            BodyMode::Normal
        };
        RegionMap::new(self.header.len(), body, self.footer.len(), mode)
    }

    /// Total unified slot count, the widget's `getSlotCount`.
    pub fn slot_count(&self) -> usize {
        self.region_map().total()
    }

    /// The layout backing a unified position, the widget's type tag.
    ///
    /// Header, body and footer rows resolve through the registry and fail
    /// with [`AdapterError::MissingLayoutMapping`] when the item's kind is
    /// unregistered; substitute rows use their configured layout.
    pub fn slot_type_tag(&self, position: usize) -> Result<LayoutId> {
        let map = self.region_map();
        let slot = map.classify(position).ok_or(AdapterError::PositionOutOfRange {
            position,
            total: map.total(),
        })?;
        match slot {
            RegionSlot::Header(i) => self.row_layout(&self.header, i),
            RegionSlot::Body(i) => self.row_layout(&self.body, i),
            RegionSlot::Footer(i) => self.row_layout(&self.footer, i),
            RegionSlot::EmptyPlaceholder => self
                .config
                .read()
                .empty
                .as_ref()
                .map(|sub| sub.layout)
                .ok_or(AdapterError::MissingSubstitute { slot: "empty-state" }),
            RegionSlot::LoadMoreRow => self
                .config
                .read()
                .load_more
                .as_ref()
                .map(|sub| sub.layout)
                .ok_or(AdapterError::MissingSubstitute { slot: "load-more" }),
        }
    }

    fn row_layout(&self, list: &ObservableList<T>, index: usize) -> Result<LayoutId> {
        let registry = self.registry.read();
        match list.with_item(index, |item| {
            let key = item.type_key();
            registry
                .lookup(key)
                .map(|entry| entry.layout)
                .ok_or(AdapterError::MissingLayoutMapping {
                    type_name: key.type_name(),
                })
        }) {
            Some(result) => result,
            // Raced with a concurrent removal; a stale position is the same
            // failure as a miscomputed one.
            None => Err(AdapterError::PositionOutOfRange {
                position: index,
                total: list.len(),
            }),
        }
    }

    // -- slot lifecycle ---------------------------------------------------

    /// Inflates a fresh slot for `layout` and runs its create hook, if any.
    pub fn create_slot(
        &self,
        inflater: &dyn SlotInflater<T>,
        layout: LayoutId,
    ) -> Box<dyn BindableSlot<T>> {
        tracing::trace!(target: "slotbind::adapter", layout = layout.raw(), "creating slot");
        let mut slot = inflater.inflate(layout);
        if let Some(hook) = self.create_hooks.read().get(&layout) {
            hook(slot.as_mut());
        }
        slot
    }

    /// Binds the slot to a unified position.
    ///
    /// Resolves the backing item (or substitute), writes it under the
    /// resolved field, runs the per-layout bind hook, and commits pending
    /// writes before returning, so the row is consistent the instant this
    /// call returns. `payload` carries a partial-rebind token when the bind
    /// was triggered by a change notification that had one.
    ///
    /// On error nothing is committed and no hook has run.
    pub fn bind_slot(
        &self,
        slot: &mut dyn BindableSlot<T>,
        position: usize,
        payload: Option<&ChangePayload>,
    ) -> Result<()> {
        self.affinity.debug_assert_same_thread();
        let map = self.region_map();
        let region = map.classify(position).ok_or(AdapterError::PositionOutOfRange {
            position,
            total: map.total(),
        })?;
        tracing::trace!(
            target: "slotbind::adapter",
            position,
            ?region,
            "binding slot"
        );

        let layout = match region {
            RegionSlot::Header(i) => self.bind_row(&self.header, i, slot)?,
            RegionSlot::Body(i) => self.bind_row(&self.body, i, slot)?,
            RegionSlot::Footer(i) => self.bind_row(&self.footer, i, slot)?,
            RegionSlot::EmptyPlaceholder => self.bind_substitute(slot, SubstituteKind::Empty)?,
            RegionSlot::LoadMoreRow => self.bind_substitute(slot, SubstituteKind::LoadMore)?,
        };

        if let Some(layout) = layout {
            if let Some(hook) = self.bind_hooks.read().get(&layout) {
                let ctx = BindContext {
                    position,
                    slot: region,
                    payload,
                };
                hook(slot, &ctx);
            }
        }
        slot.commit_pending_writes();
        Ok(())
    }

    /// Writes a list row into the slot and resolves its layout.
    ///
    /// In default-field mode the registry is bypassed for field selection
    /// and a missing mapping only means no hook dispatch; in per-type mode
    /// it is fatal to the bind.
    fn bind_row(
        &self,
        list: &ObservableList<T>,
        index: usize,
        slot: &mut dyn BindableSlot<T>,
    ) -> Result<Option<LayoutId>> {
        let config = self.config.read();
        let default_field = config.default_field;
        drop(config);
        let registry = self.registry.read();
        match list.with_item(index, |item| {
            let key = item.type_key();
            if let Some(field) = default_field {
                slot.set_field(field, item);
                Ok(registry.lookup(key).map(|entry| entry.layout))
            } else {
                let entry =
                    registry
                        .lookup(key)
                        .ok_or(AdapterError::MissingLayoutMapping {
                            type_name: key.type_name(),
                        })?;
                if let Some(field) = entry.field {
                    slot.set_field(field, item);
                }
                Ok(Some(entry.layout))
            }
        }) {
            Some(result) => result,
            None => Err(AdapterError::PositionOutOfRange {
                position: index,
                total: list.len(),
            }),
        }
    }

    fn bind_substitute(
        &self,
        slot: &mut dyn BindableSlot<T>,
        kind: SubstituteKind,
    ) -> Result<Option<LayoutId>> {
        let config = self.config.read();
        let sub = match kind {
            SubstituteKind::Empty => config.empty.as_ref(),
            SubstituteKind::LoadMore => config.load_more.as_ref(),
        }
        .ok_or(AdapterError::MissingSubstitute { slot: kind.name() })?;
        slot.set_field(sub.field, &sub.item);
        Ok(Some(sub.layout))
    }

    // -- attachment -------------------------------------------------------

    /// Subscribes to all three lists, forwarding translated notifications
    /// to `observer`. Re-attaching replaces a previous observer.
    pub fn attach(&self, observer: Arc<dyn SlotObserver>) {
        tracing::debug!(target: "slotbind::adapter", "attaching to widget");
        *self.observer.write() = Some(observer.clone());
        self.notifier
            .attach(&self.header, &self.body, &self.footer, self.flags.clone(), observer);
    }

    /// Drops all list subscriptions and the observer. Idempotent; the lists
    /// themselves are untouched and list mutation after detach notifies
    /// nobody.
    pub fn detach(&self) {
        tracing::debug!(target: "slotbind::adapter", "detaching from widget");
        self.notifier.detach();
        *self.observer.write() = None;
    }

    /// Returns `true` while attached to a widget.
    pub fn is_attached(&self) -> bool {
        self.notifier.is_attached()
    }

    /// Detaches automatically when `teardown` fires, the scoped-teardown
    /// hookup for hosts with an explicit lifecycle signal. The adapter holds
    /// no reference back to the signal; dropping the adapter first is fine.
    pub fn detach_on(self: &Arc<Self>, teardown: &Signal<()>) -> ConnectionId {
        let weak = Arc::downgrade(self);
        teardown.connect(move |_| {
            if let Some(adapter) = weak.upgrade() {
                adapter.detach();
            }
        })
    }
}

#[derive(Clone, Copy)]
enum SubstituteKind {
    Empty,
    LoadMore,
}

impl SubstituteKind {
    fn name(self) -> &'static str {
        match self {
            Self::Empty => "empty-state",
            Self::LoadMore => "load-more",
        }
    }
}
