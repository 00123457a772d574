//! End-to-end tests driving the adapter the way a list widget would:
//! mutate the backing lists, check the notification stream, and bind the
//! resulting unified positions.

use std::sync::Arc;

use parking_lot::Mutex;
use slotbind::{
    AdapterError, BindItem, BindableSlot, ChangePayload, FieldId, LayoutId, RegionSlot,
    SlotAdapter, SlotObserver, TypeKey,
};

/// Opt-in log output for test debugging: `RUST_LOG=slotbind=trace`.
fn init_tracing() {
    static INIT: std::sync::Once = std::sync::Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

const TEXT_ROW: LayoutId = LayoutId::new(1);
const BANNER_ROW: LayoutId = LayoutId::new(2);
const EMPTY_ROW: LayoutId = LayoutId::new(8);
const LOADER_ROW: LayoutId = LayoutId::new(9);
const ITEM_FIELD: FieldId = FieldId::new(1);

/// A widget stand-in that records every notification and tracks the slot
/// count the widget would maintain from them.
#[derive(Default)]
struct WidgetDouble {
    log: Mutex<Vec<String>>,
    tracked_count: Mutex<usize>,
}

impl WidgetDouble {
    fn tracked(&self) -> usize {
        *self.tracked_count.lock()
    }
}

impl SlotObserver for WidgetDouble {
    fn notify_inserted(&self, position: usize, count: usize) {
        self.log.lock().push(format!("ins {position} {count}"));
        *self.tracked_count.lock() += count;
    }

    fn notify_removed(&self, position: usize, count: usize) {
        self.log.lock().push(format!("rem {position} {count}"));
        *self.tracked_count.lock() -= count;
    }

    fn notify_changed(&self, position: usize, count: usize, _: Option<ChangePayload>) {
        self.log.lock().push(format!("chg {position} {count}"));
    }

    fn notify_moved(&self, from: usize, to: usize) {
        self.log.lock().push(format!("mov {from} {to}"));
    }
}

#[derive(Default)]
struct TextSlot {
    bound: Option<(FieldId, String)>,
    committed: bool,
}

impl BindableSlot<String> for TextSlot {
    fn set_field(&mut self, field: FieldId, item: &String) {
        self.bound = Some((field, item.clone()));
        self.committed = false;
    }

    fn commit_pending_writes(&mut self) {
        self.committed = true;
    }
}

fn text_adapter() -> SlotAdapter<String> {
    let adapter = SlotAdapter::new();
    adapter.register_type_of::<String>(TEXT_ROW, Some(ITEM_FIELD));
    adapter
}

#[test]
fn test_remove_mid_body_matches_documented_example() {
    init_tracing();
    // body = [A, B, C]; position 1 is Body(1) and resolves item B.
    let adapter = text_adapter();
    for row in ["A", "B", "C"] {
        adapter.body_list().push(row.to_string());
    }
    assert_eq!(
        adapter.region_map().classify(1),
        Some(RegionSlot::Body(1))
    );

    let mut slot = TextSlot::default();
    adapter.bind_slot(&mut slot, 1, None).unwrap();
    assert_eq!(slot.bound, Some((ITEM_FIELD, "B".to_string())));
    assert!(slot.committed);

    let widget = Arc::new(WidgetDouble::default());
    adapter.attach(widget.clone());
    *widget.tracked_count.lock() = adapter.slot_count();

    adapter.body_list().remove_range(1, 1).unwrap();
    assert_eq!(*widget.log.lock(), vec!["rem 1 1"]);
    assert_eq!(adapter.slot_count(), 2);
    assert_eq!(widget.tracked(), 2);
}

#[test]
fn test_insert_offsets_by_header_count() {
    let adapter = text_adapter();
    adapter.header_list().push("h0".to_string());
    adapter.header_list().push("h1".to_string());

    let widget = Arc::new(WidgetDouble::default());
    adapter.attach(widget.clone());

    adapter
        .body_list()
        .insert_all(0, vec!["a".to_string(), "b".to_string(), "c".to_string()])
        .unwrap();
    assert_eq!(*widget.log.lock(), vec!["ins 2 3"]);
}

#[test]
fn test_notification_stream_conserves_total_count() {
    init_tracing();
    // Over an arbitrary mutation sequence, net inserted-minus-removed as
    // seen by the widget must equal the net change in slot_count, including
    // across empty-placeholder transitions.
    let adapter = text_adapter();
    adapter.header_list().push("header".to_string());
    adapter
        .configure_empty_state(EMPTY_ROW, "no rows".to_string())
        .unwrap();

    let widget = Arc::new(WidgetDouble::default());
    adapter.attach(widget.clone());
    *widget.tracked_count.lock() = adapter.slot_count();

    let body = adapter.body_list();
    body.push("one".to_string()); // placeholder swaps out
    body.insert_all(1, vec!["two".to_string(), "three".to_string()])
        .unwrap();
    body.set(0, "ONE".to_string()).unwrap();
    body.move_item(0, 2).unwrap();
    body.remove_range(0, 2).unwrap();
    body.remove(0).unwrap(); // placeholder swaps back in
    adapter.footer_list().push("footer".to_string());
    body.push("again".to_string());

    assert_eq!(widget.tracked(), adapter.slot_count());
    assert_eq!(adapter.slot_count(), 3); // header + "again" + footer
}

#[test]
fn test_empty_placeholder_transitions() {
    let adapter = text_adapter();
    adapter
        .configure_empty_state(EMPTY_ROW, "no rows".to_string())
        .unwrap();
    assert_eq!(adapter.slot_type_tag(0).unwrap(), EMPTY_ROW);

    let widget = Arc::new(WidgetDouble::default());
    adapter.attach(widget.clone());

    // 0 -> 2 rows: the placeholder slot is rebound, one slot inserted.
    adapter
        .body_list()
        .insert_all(0, vec!["a".to_string(), "b".to_string()])
        .unwrap();
    assert_eq!(*widget.log.lock(), vec!["chg 0 1", "ins 1 1"]);
    assert_eq!(adapter.slot_type_tag(0).unwrap(), TEXT_ROW);

    // 2 -> 0 rows: the surviving slot becomes the placeholder again.
    widget.log.lock().clear();
    adapter.body_list().remove_range(0, 2).unwrap();
    assert_eq!(*widget.log.lock(), vec!["chg 0 1", "rem 1 1"]);
    assert_eq!(adapter.slot_count(), 1);
    assert_eq!(adapter.slot_type_tag(0).unwrap(), EMPTY_ROW);
}

#[test]
fn test_load_more_row_binds_configured_item() {
    let adapter = text_adapter();
    adapter.body_list().push("row".to_string());
    adapter
        .configure_load_more(LOADER_ROW, "loading more...".to_string(), FieldId::DEFAULT)
        .unwrap();

    assert_eq!(adapter.slot_count(), 2);
    assert_eq!(adapter.slot_type_tag(1).unwrap(), LOADER_ROW);

    let mut slot = TextSlot::default();
    adapter.bind_slot(&mut slot, 1, None).unwrap();
    assert_eq!(
        slot.bound,
        Some((FieldId::DEFAULT, "loading more...".to_string()))
    );

    adapter.set_has_more(false);
    assert_eq!(adapter.slot_count(), 1);
    assert!(matches!(
        adapter.slot_type_tag(1),
        Err(AdapterError::PositionOutOfRange { .. })
    ));
}

#[test]
fn test_every_mutation_reaches_attached_widget() {
    // The change-stream handle the application holds offers connect and
    // disconnect only; there is no way to suppress delivery, so the widget
    // sees exactly one notification per mutation alongside any observers
    // the application registers itself.
    let adapter = text_adapter();
    let widget = Arc::new(WidgetDouble::default());
    adapter.attach(widget.clone());
    *widget.tracked_count.lock() = adapter.slot_count();

    let app_events = Arc::new(Mutex::new(0usize));
    let app = app_events.clone();
    adapter.body_list().changed().connect(move |_| {
        *app.lock() += 1;
    });

    adapter.body_list().push("a".to_string());
    adapter.body_list().push("b".to_string());
    adapter.body_list().remove(0).unwrap();
    adapter.body_list().set(0, "b2".to_string()).unwrap();

    assert_eq!(*app_events.lock(), 4);
    assert_eq!(widget.log.lock().len(), 4);
    assert_eq!(widget.tracked(), adapter.slot_count());
}

#[test]
fn test_detached_adapter_mutation_is_silent() {
    let adapter = text_adapter();
    let widget = Arc::new(WidgetDouble::default());
    adapter.attach(widget.clone());
    adapter.body_list().push("a".to_string());
    adapter.detach();

    adapter.body_list().push("b".to_string());
    adapter.body_list().remove(0).unwrap();
    assert_eq!(*widget.log.lock(), vec!["ins 0 1"]);
}

#[test]
fn test_change_payload_reaches_bind_hook() {
    let adapter = text_adapter();
    adapter.body_list().push("row".to_string());

    let seen = Arc::new(Mutex::new(None::<u64>));
    let sink = seen.clone();
    adapter.register_bind_hook(
        TEXT_ROW,
        Box::new(move |_, ctx| {
            *sink.lock() = ctx.payload.and_then(|p| p.downcast_ref::<u64>()).copied();
        }),
    );

    // The widget hands the payload from a partial-change notification back
    // into the rebind.
    let captured = Arc::new(Mutex::new(None::<ChangePayload>));
    struct PayloadTap(Arc<Mutex<Option<ChangePayload>>>);
    impl SlotObserver for PayloadTap {
        fn notify_inserted(&self, _: usize, _: usize) {}
        fn notify_removed(&self, _: usize, _: usize) {}
        fn notify_changed(&self, _: usize, _: usize, payload: Option<ChangePayload>) {
            *self.0.lock() = payload;
        }
        fn notify_moved(&self, _: usize, _: usize) {}
    }
    adapter.attach(Arc::new(PayloadTap(captured.clone())));

    adapter
        .body_list()
        .set_with_payload(0, "row'".to_string(), Some(ChangePayload::new(42u64)))
        .unwrap();
    let payload = captured.lock().take().expect("payload forwarded");

    let mut slot = TextSlot::default();
    adapter.bind_slot(&mut slot, 0, Some(&payload)).unwrap();
    assert_eq!(*seen.lock(), Some(42));
}

#[test]
fn test_enum_rows_dispatch_per_variant() {
    enum Row {
        Text(String),
        Banner(String),
    }

    struct TextKind;
    struct BannerKind;

    impl BindItem for Row {
        fn type_key(&self) -> TypeKey {
            match self {
                Row::Text(_) => TypeKey::of::<TextKind>(),
                Row::Banner(_) => TypeKey::of::<BannerKind>(),
            }
        }
    }

    struct RowSlot {
        layouts: Vec<FieldId>,
    }
    impl BindableSlot<Row> for RowSlot {
        fn set_field(&mut self, field: FieldId, _: &Row) {
            self.layouts.push(field);
        }
        fn commit_pending_writes(&mut self) {}
    }

    let adapter: SlotAdapter<Row> = SlotAdapter::new();
    adapter.register_type_of::<TextKind>(TEXT_ROW, Some(FieldId::new(1)));
    adapter.register_type_of::<BannerKind>(BANNER_ROW, Some(FieldId::new(2)));

    adapter.body_list().push(Row::Banner("sale".to_string()));
    adapter.body_list().push(Row::Text("hello".to_string()));

    assert_eq!(adapter.slot_type_tag(0).unwrap(), BANNER_ROW);
    assert_eq!(adapter.slot_type_tag(1).unwrap(), TEXT_ROW);

    let mut slot = RowSlot { layouts: vec![] };
    adapter.bind_slot(&mut slot, 0, None).unwrap();
    adapter.bind_slot(&mut slot, 1, None).unwrap();
    assert_eq!(slot.layouts, vec![FieldId::new(2), FieldId::new(1)]);
}
