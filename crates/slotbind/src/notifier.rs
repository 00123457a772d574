//! Change notification bridge between the backing lists and the widget.
//!
//! [`ChangeNotifier`] holds one subscription per backing list. Each
//! [`ListChange`] a list emits is translated — purely, in [`translate`] —
//! into one or more unified-space [`SlotUpdate`]s and forwarded to the
//! attached [`SlotObserver`].
//!
//! # Offset semantics
//!
//! This is the primary correctness risk of the whole subsystem: the widget
//! requires insert and move notifications in post-mutation coordinates and
//! remove notifications in pre-mutation coordinates, or its internal
//! bookkeeping silently corrupts. Observers run after the mutation is
//! applied, so list lengths read at notification time are post-mutation; the
//! pre-mutation body length is reconstructed from the change record's own
//! count where the translation needs it.
//!
//! # The placeholder swap
//!
//! With an empty-state substitute configured, the body region never
//! collapses to zero width: the transition between the single placeholder
//! row and real rows is translated as a *change* of the surviving slot plus
//! an insert/remove of the remainder. This keeps the widget's net
//! inserted-minus-removed equal to the net total-count change across any
//! mutation sequence.

use std::sync::{Arc, Weak};

use parking_lot::{Mutex, RwLock};
use slotbind_core::ConnectionId;

use crate::list::{ChangePayload, ListChange, ObservableList};
use crate::slot::SlotObserver;

/// Which backing list an event originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ListRegion {
    Header,
    Body,
    Footer,
}

/// The mode bits the translation needs, mirrored from the adapter's
/// substitute configuration.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct ModeFlags {
    /// An empty-state substitute is configured.
    pub empty_configured: bool,
    /// A load-more substitute is configured and more pages are expected.
    pub load_more_active: bool,
}

/// Counts and mode bits at notification time (post-mutation).
#[derive(Debug, Clone, Copy)]
pub(crate) struct RegionContext {
    pub header_len: usize,
    pub body_len: usize,
    pub footer_len: usize,
    pub flags: ModeFlags,
}

impl RegionContext {
    /// Body-region width for a given body length under the current flags.
    fn body_width_for(&self, body_len: usize) -> usize {
        if self.flags.load_more_active {
            body_len + 1
        } else if body_len == 0 && self.flags.empty_configured {
            1
        } else {
            body_len
        }
    }
}

/// One unified-space notification to forward to the widget.
#[derive(Debug, Clone)]
pub(crate) enum SlotUpdate {
    Inserted {
        position: usize,
        count: usize,
    },
    Removed {
        position: usize,
        count: usize,
    },
    Changed {
        position: usize,
        count: usize,
        payload: Option<ChangePayload>,
    },
    Moved {
        from: usize,
        to: usize,
    },
}

impl SlotUpdate {
    pub(crate) fn dispatch(self, observer: &dyn SlotObserver) {
        match self {
            Self::Inserted { position, count } => observer.notify_inserted(position, count),
            Self::Removed { position, count } => observer.notify_removed(position, count),
            Self::Changed {
                position,
                count,
                payload,
            } => observer.notify_changed(position, count, payload),
            Self::Moved { from, to } => observer.notify_moved(from, to),
        }
    }
}

/// Translates one list change into its unified-space notifications.
pub(crate) fn translate(
    region: ListRegion,
    change: &ListChange,
    ctx: &RegionContext,
) -> Vec<SlotUpdate> {
    tracing::trace!(
        target: "slotbind::notifier",
        ?region,
        ?change,
        header = ctx.header_len,
        body = ctx.body_len,
        footer = ctx.footer_len,
        "translating list change"
    );
    match region {
        // Header base is 0 and unaffected by header mutations; local
        // coordinates are already unified coordinates.
        ListRegion::Header => vec![offset(change, 0)],
        ListRegion::Body => translate_body(change, ctx),
        // The footer base depends on the body width, which footer mutations
        // never change, so pre- and post-mutation bases coincide.
        ListRegion::Footer => {
            let base = ctx.header_len + ctx.body_width_for(ctx.body_len);
            vec![offset(change, base)]
        }
    }
}

/// Shifts a change record's coordinates by a region base.
fn offset(change: &ListChange, base: usize) -> SlotUpdate {
    match change {
        ListChange::Inserted { start, count } => SlotUpdate::Inserted {
            position: base + start,
            count: *count,
        },
        ListChange::Removed { start, count } => SlotUpdate::Removed {
            position: base + start,
            count: *count,
        },
        ListChange::Changed {
            start,
            count,
            payload,
        } => SlotUpdate::Changed {
            position: base + start,
            count: *count,
            payload: payload.clone(),
        },
        ListChange::Moved { from, to } => SlotUpdate::Moved {
            from: base + from,
            to: base + to,
        },
    }
}

fn translate_body(change: &ListChange, ctx: &RegionContext) -> Vec<SlotUpdate> {
    let base = ctx.header_len;
    match *change {
        ListChange::Inserted { count, .. } => {
            let pre_len = ctx.body_len - count;
            if ctx.flags.empty_configured && pre_len == 0 && count > 0 {
                // The placeholder row becomes the first real row; only the
                // remainder is a structural insert.
                let mut updates = vec![SlotUpdate::Changed {
                    position: base,
                    count: 1,
                    payload: None,
                }];
                if count > 1 {
                    updates.push(SlotUpdate::Inserted {
                        position: base + 1,
                        count: count - 1,
                    });
                }
                updates
            } else {
                vec![offset(change, base)]
            }
        }
        ListChange::Removed { start, count } => {
            if ctx.flags.empty_configured && ctx.body_len == 0 && count > 0 {
                // The last real rows were removed; the slot at the region
                // base survives as the placeholder.
                debug_assert_eq!(start, 0);
                let mut updates = vec![SlotUpdate::Changed {
                    position: base,
                    count: 1,
                    payload: None,
                }];
                if count > 1 {
                    updates.push(SlotUpdate::Removed {
                        position: base + 1,
                        count: count - 1,
                    });
                }
                updates
            } else {
                vec![offset(change, base)]
            }
        }
        ListChange::Changed { .. } | ListChange::Moved { .. } => vec![offset(change, base)],
    }
}

/// Owns the per-list subscriptions for an attached adapter.
///
/// Teardown is idempotent: detaching when never attached (or twice) is a
/// no-op, and a subscription whose list has already been dropped is skipped.
pub(crate) struct ChangeNotifier<T: Send + Sync + 'static> {
    connections: Mutex<Vec<(Weak<ObservableList<T>>, ConnectionId)>>,
}

impl<T: Send + Sync + 'static> ChangeNotifier<T> {
    pub(crate) fn new() -> Self {
        Self {
            connections: Mutex::new(Vec::new()),
        }
    }

    /// Returns `true` while subscriptions are live.
    pub(crate) fn is_attached(&self) -> bool {
        !self.connections.lock().is_empty()
    }

    /// Subscribes to all three lists, forwarding translated notifications to
    /// `observer`. An existing attachment is torn down first, so swapping in
    /// a new observer (or re-attaching after list replacement) is safe.
    pub(crate) fn attach(
        &self,
        header: &Arc<ObservableList<T>>,
        body: &Arc<ObservableList<T>>,
        footer: &Arc<ObservableList<T>>,
        flags: Arc<RwLock<ModeFlags>>,
        observer: Arc<dyn SlotObserver>,
    ) {
        self.detach();

        let mut connections = self.connections.lock();
        for (region, list) in [
            (ListRegion::Header, header),
            (ListRegion::Body, body),
            (ListRegion::Footer, footer),
        ] {
            // Weak captures: the closure is stored inside the list's own
            // signal, so a strong reference would cycle and leak the lists.
            let header_ref = Arc::downgrade(header);
            let body_ref = Arc::downgrade(body);
            let footer_ref = Arc::downgrade(footer);
            let flags = flags.clone();
            let observer = observer.clone();
            let id = list.changed().connect(move |change| {
                let (Some(header), Some(body), Some(footer)) = (
                    header_ref.upgrade(),
                    body_ref.upgrade(),
                    footer_ref.upgrade(),
                ) else {
                    return;
                };
                let ctx = RegionContext {
                    header_len: header.len(),
                    body_len: body.len(),
                    footer_len: footer.len(),
                    flags: *flags.read(),
                };
                for update in translate(region, change, &ctx) {
                    update.dispatch(observer.as_ref());
                }
            });
            connections.push((Arc::downgrade(list), id));
        }
    }

    /// Drops all subscriptions. Safe to call at any time, any number of
    /// times.
    pub(crate) fn detach(&self) {
        let connections = std::mem::take(&mut *self.connections.lock());
        for (list, id) in connections {
            if let Some(list) = list.upgrade() {
                list.changed().disconnect(id);
            }
        }
    }
}

impl<T: Send + Sync + 'static> Drop for ChangeNotifier<T> {
    fn drop(&mut self) {
        for (list, id) in self.connections.get_mut().drain(..) {
            if let Some(list) = list.upgrade() {
                list.changed().disconnect(id);
            }
        }
    }
}
