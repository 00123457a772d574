//! Runtime type-keyed layout dispatch.
//!
//! Every row rendered by the adapter is backed by an item whose runtime kind
//! selects a view layout and, in per-type dispatch mode, the field the item
//! is injected under. The mapping is held in an [`ItemTypeRegistry`] keyed by
//! [`TypeKey`] — a stable type-identity token rather than any reflective
//! lookup.
//!
//! Homogeneous lists get their key for free: [`BindItem::type_key`] defaults
//! to the implementing type's own identity. Heterogeneous lists are expressed
//! as an enum that returns a distinct key per variant, typically via
//! zero-sized marker types:
//!
//! ```
//! use slotbind::{BindItem, TypeKey};
//!
//! enum Row {
//!     Heading(String),
//!     Entry(String),
//! }
//!
//! struct HeadingKind;
//! struct EntryKind;
//!
//! impl BindItem for Row {
//!     fn type_key(&self) -> TypeKey {
//!         match self {
//!             Row::Heading(_) => TypeKey::of::<HeadingKind>(),
//!             Row::Entry(_) => TypeKey::of::<EntryKind>(),
//!         }
//!     }
//! }
//! ```

use std::any::{Any, TypeId, type_name};
use std::collections::HashMap;

/// Identifies a view layout understood by the host's inflation mechanism.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LayoutId(pub u32);

impl LayoutId {
    /// Creates a layout identifier.
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// The raw identifier value.
    pub const fn raw(self) -> u32 {
        self.0
    }
}

/// Identifies a binding field slot within an inflated layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FieldId(pub u32);

impl FieldId {
    /// The conventional catch-all item field, used for every row when the
    /// adapter runs in default-field mode and for substitute rows.
    pub const DEFAULT: FieldId = FieldId(0);

    /// Creates a field identifier.
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// The raw identifier value.
    pub const fn raw(self) -> u32 {
        self.0
    }
}

/// A stable identity token for an item's runtime kind.
///
/// Produced deterministically from a Rust type via [`TypeKey::of`]. Two keys
/// compare equal iff they were produced from the same type.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeKey {
    id: TypeId,
    name: &'static str,
}

impl TypeKey {
    /// The key for type `K`.
    pub fn of<K: Any>() -> Self {
        Self {
            id: TypeId::of::<K>(),
            name: type_name::<K>(),
        }
    }

    /// Best-effort name of the keyed type, for diagnostics.
    pub fn type_name(&self) -> &'static str {
        self.name
    }
}

impl std::fmt::Debug for TypeKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("TypeKey").field(&self.name).finish()
    }
}

/// An item that can be placed in the adapter's backing lists.
///
/// The default `type_key` identifies items by their own type, which is right
/// for homogeneous lists. Override it for enum-of-variants lists (see the
/// module docs).
pub trait BindItem: Send + Sync + 'static {
    /// The runtime kind of this item, used for layout dispatch.
    fn type_key(&self) -> TypeKey
    where
        Self: Sized,
    {
        TypeKey::of::<Self>()
    }
}

impl BindItem for String {}

/// The layout/field pair registered for one item kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemType {
    /// The layout inflated for rows of this kind.
    pub layout: LayoutId,
    /// The field the item is injected under in per-type mode. `None` means
    /// the bind is a field-write no-op (hooks still run).
    pub field: Option<FieldId>,
}

/// Maps item kinds to their layout/field pairs.
///
/// Registration is an idempotent upsert: re-registering a key replaces the
/// previous entry silently (last registration wins).
#[derive(Debug, Default)]
pub struct ItemTypeRegistry {
    entries: HashMap<TypeKey, ItemType>,
}

impl ItemTypeRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers (or replaces) the mapping for `key`.
    pub fn register(&mut self, key: TypeKey, layout: LayoutId, field: Option<FieldId>) {
        tracing::debug!(
            target: "slotbind::registry",
            key = key.type_name(),
            layout = layout.raw(),
            "registering item type"
        );
        self.entries.insert(key, ItemType { layout, field });
    }

    /// Registers the mapping for type `K`.
    pub fn register_type<K: Any>(&mut self, layout: LayoutId, field: Option<FieldId>) {
        self.register(TypeKey::of::<K>(), layout, field);
    }

    /// Looks up the mapping for `key`.
    pub fn lookup(&self, key: TypeKey) -> Option<ItemType> {
        self.entries.get(&key).copied()
    }

    /// The number of registered kinds.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
