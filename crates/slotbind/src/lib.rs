//! Binding adapter layer for list-rendering widgets.
//!
//! `slotbind` connects mutable observable collections of model items to the
//! recyclable view slots of a host list widget: rows re-render when their
//! backing item changes, arbitrary item kinds map to view layouts through a
//! type-keyed registry, and header/footer/empty-state/load-more regions are
//! unified into the single linear index space the widget addresses.
//!
//! The host framework — the widget itself, its recycling pool, layout
//! inflation, and declarative view binding — stays outside this crate,
//! reached through the small traits in [`slot`]. What lives here is the
//! dispatch and change-notification core.
//!
//! # Architecture
//!
//! - [`ObservableList`]: an ordered sequence emitting structured change
//!   events (insert/remove/change/move, each with a range) through a
//!   [`Signal`](slotbind_core::Signal).
//! - [`ItemTypeRegistry`]: maps an item kind ([`TypeKey`]) to the
//!   ([`LayoutId`], [`FieldId`]) pair used to render and bind it.
//! - [`RegionMap`]: the pure unified index space over header, body (or its
//!   substitute), and footer.
//! - `ChangeNotifier` (internal): translates per-list change events into
//!   correctly-offset unified-space notifications.
//! - [`SlotAdapter`]: owns all of the above and drives the
//!   create → bind → commit slot lifecycle.
//!
//! # Example
//!
//! ```
//! use slotbind::{FieldId, LayoutId, SlotAdapter};
//!
//! let adapter: SlotAdapter<String> = SlotAdapter::new();
//! adapter.register_type_of::<String>(LayoutId::new(1), Some(FieldId::new(1)));
//!
//! adapter.body_list().push("first row".to_string());
//! adapter.body_list().push("second row".to_string());
//!
//! assert_eq!(adapter.slot_count(), 2);
//! assert_eq!(adapter.slot_type_tag(0).unwrap(), LayoutId::new(1));
//! ```
//!
//! # Threading
//!
//! The model is single-threaded and cooperative: list mutation, change
//! notification, and slot binding are all expected on one designated
//! thread. The types are `Send + Sync` so they can be *owned* across
//! threads, but concurrent mutation is not supported and debug builds
//! assert the adapter's constructing thread on the dispatch paths.

pub mod adapter;
pub mod error;
pub mod list;
pub mod regions;
pub mod registry;
pub mod slot;

mod notifier;

pub use adapter::SlotAdapter;
pub use error::{AdapterError, ListError, Result};
pub use list::{ChangePayload, ListChange, ObservableList};
pub use regions::{BodyMode, RegionMap, RegionSlot};
pub use registry::{BindItem, FieldId, ItemType, ItemTypeRegistry, LayoutId, TypeKey};
pub use slot::{BindContext, BindHook, BindableSlot, CreateHook, SlotInflater, SlotObserver};
