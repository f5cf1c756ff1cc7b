//! End-to-end sheet scenarios.
//!
//! Each test drives a mounted sheet through the public surface only:
//! events in, `tick` for time, style sink and observers out.

#![forbid(unsafe_code)]

use sheetkit_core::event::{Event, PointerPhase, RawPointerEvent};
use sheetkit_core::geometry::FixedGeometry;
use sheetkit_core::listener::{ListenerKinds, ListenerRegistry};
use sheetkit_widgets::bottom_sheet::{
    BottomSheet, DRAGGING_CLASS, Height, RecordingSink, SheetNotification, SheetPhase, Transform,
};
use sheetkit_widgets::config::SheetConfig;
use web_time::{Duration, Instant};

const MS: Duration = Duration::from_millis(1);
const VIEWPORT: f64 = 1000.0;

type Sheet = BottomSheet<RecordingSink, FixedGeometry>;

fn sheet_with(config: SheetConfig, registry: &ListenerRegistry) -> Sheet {
    let mut sheet = BottomSheet::new(config, registry.clone());
    sheet.mount(RecordingSink::new(), FixedGeometry::new(VIEWPORT, 500.0));
    sheet
}

fn drag(sheet: &mut Sheet, from: f64, to: f64, now: Instant) {
    sheet.handle_event(
        &Event::handle(RawPointerEvent::touch(PointerPhase::Down, from)),
        now,
    );
    sheet.handle_event(
        &Event::document(RawPointerEvent::touch(PointerPhase::Move, (from + to) / 2.0)),
        now,
    );
    sheet.handle_event(
        &Event::document(RawPointerEvent::touch(PointerPhase::Move, to)),
        now,
    );
    sheet.handle_event(
        &Event::document(RawPointerEvent::touch(PointerPhase::Up, to)),
        now,
    );
}

/// Sets the rendered height the next drag starts from.
fn settle_rendered(sheet: &mut Sheet) {
    let fraction = sheet.current_breakpoint();
    if let Some(geometry) = sheet.geometry_mut() {
        geometry.rendered_height = fraction * VIEWPORT;
    }
}

#[test]
fn close_timing_matches_duration() {
    let registry = ListenerRegistry::new();
    let mut sheet = sheet_with(SheetConfig::default(), &registry);
    let t0 = Instant::now();

    sheet.show();
    sheet.hide(t0);

    sheet.tick(t0 + 150 * MS);
    assert!(sheet.is_open(), "still open at 150ms");
    assert_eq!(sheet.sink().unwrap().transform, Transform::Hidden);

    sheet.tick(t0 + 310 * MS);
    assert!(!sheet.is_open(), "closed at 310ms");
    assert_eq!(sheet.phase(), SheetPhase::Closed);
}

#[test]
fn custom_duration_moves_the_deadline() {
    let registry = ListenerRegistry::new();
    let mut sheet = sheet_with(
        SheetConfig::default().duration(Duration::from_millis(500)),
        &registry,
    );
    let t0 = Instant::now();
    sheet.show();
    sheet.hide(t0);
    sheet.tick(t0 + 310 * MS);
    assert!(sheet.is_open());
    sheet.tick(t0 + 500 * MS);
    assert!(!sheet.is_open());
}

#[test]
fn show_resets_breakpoint_after_drag() {
    let registry = ListenerRegistry::new();
    let mut sheet = sheet_with(SheetConfig::default(), &registry);
    let t0 = Instant::now();

    sheet.show();
    // 500 + 300 = 800 px → 0.8
    drag(&mut sheet, 700.0, 400.0, t0);
    assert_eq!(sheet.current_breakpoint(), 0.8);

    sheet.hide(t0);
    sheet.tick(t0 + 300 * MS);
    sheet.show();
    assert_eq!(sheet.current_breakpoint(), 0.5);
    assert_eq!(
        sheet.sink().unwrap().height,
        Height::ViewportFraction(0.5)
    );
}

#[test]
fn reopen_before_deadline_survives_stale_timer() {
    let registry = ListenerRegistry::new();
    let mut sheet = sheet_with(SheetConfig::default(), &registry);
    let t0 = Instant::now();

    sheet.show();
    sheet.hide(t0);
    sheet.tick(t0 + 100 * MS);
    sheet.show();
    assert_eq!(sheet.phase(), SheetPhase::Open);

    assert!(!sheet.tick(t0 + 1000 * MS));
    assert!(sheet.is_open());
    assert_eq!(sheet.sink().unwrap().transform, Transform::Shown);
}

#[test]
fn snapping_examples() {
    let registry = ListenerRegistry::new();
    let config = SheetConfig::default().breakpoints(vec![0.1, 0.3, 0.5, 0.8, 1.0]);
    let mut sheet = sheet_with(config, &registry);
    let t0 = Instant::now();
    sheet.show();

    // 500 - 80 = 420 px → 0.42 → 0.5
    drag(&mut sheet, 400.0, 480.0, t0);
    assert_eq!(sheet.current_breakpoint(), 0.5);

    // 500 - 310 = 190 px → 0.19 → 0.1
    drag(&mut sheet, 400.0, 710.0, t0);
    assert_eq!(sheet.current_breakpoint(), 0.1);

    let settled: Vec<_> = sheet
        .drain_notifications()
        .into_iter()
        .filter_map(|n| match n {
            SheetNotification::BreakpointSettled(f) => Some(f),
            SheetNotification::OpenChanged(_) => None,
        })
        .collect();
    assert_eq!(settled, vec![0.5, 0.1]);
}

#[test]
fn drag_chain_starts_from_rendered_height() {
    let registry = ListenerRegistry::new();
    let mut sheet = sheet_with(SheetConfig::default(), &registry);
    let t0 = Instant::now();
    sheet.show();

    drag(&mut sheet, 500.0, 300.0, t0);
    assert_eq!(sheet.current_breakpoint(), 0.7);
    settle_rendered(&mut sheet);

    // 700 + 250 = 950 px → 0.95 → 1.0
    drag(&mut sheet, 500.0, 250.0, t0);
    assert_eq!(sheet.current_breakpoint(), 1.0);
}

#[test]
fn backdrop_visibility_all_combinations() {
    let registry = ListenerRegistry::new();
    for (open, show_backdrop) in [(false, false), (false, true), (true, false), (true, true)] {
        let mut sheet = sheet_with(SheetConfig::default().show_backdrop(show_backdrop), &registry);
        sheet.set_open(open);
        let expected = open && show_backdrop;
        assert_eq!(
            sheet.backdrop_visible(),
            expected,
            "open={open} show_backdrop={show_backdrop}"
        );
        let backdrop = sheet.sink().unwrap().backdrop;
        assert_eq!(backdrop.interactive, expected);
        assert_eq!(backdrop.opacity, if expected { 1.0 } else { 0.0 });
    }
}

#[test]
fn repeated_open_hide_never_duplicates_drag_listeners() {
    let registry = ListenerRegistry::new();
    let mut sheet = sheet_with(SheetConfig::default(), &registry);
    let mut now = Instant::now();

    for _ in 0..5 {
        sheet.show();
        sheet.handle_event(
            &Event::handle(RawPointerEvent::mouse(PointerPhase::Down, 600.0)),
            now,
        );
        sheet.handle_event(
            &Event::handle(RawPointerEvent::mouse(PointerPhase::Down, 590.0)),
            now,
        );
        assert!(registry.max_count(sheet.owner()) <= 1);
        sheet.hide(now);
        assert!(!sheet.is_dragging());
        assert_eq!(
            registry.count(sheet.owner(), ListenerKinds::MOUSE_MOVE),
            0
        );
        sheet.show();
        now += 50 * MS;
        sheet.tick(now);
    }
    assert_eq!(sheet.active_listeners(), ListenerKinds::PERSISTENT);
}

#[test]
fn unmount_mid_drag_leaves_no_listeners() {
    let registry = ListenerRegistry::new();
    let mut sheet = sheet_with(SheetConfig::default(), &registry);
    let t0 = Instant::now();
    sheet.show();
    sheet.handle_event(
        &Event::handle(RawPointerEvent::touch(PointerPhase::Down, 600.0)),
        t0,
    );

    let (sink, _) = sheet.unmount().unwrap();
    assert!(!sink.has_class(DRAGGING_CLASS));
    assert_eq!(registry.total(), 0);
    assert!(sheet.unmount().is_none());

    // Events after unmount reach nothing.
    assert!(!sheet.handle_event(&Event::escape(), t0));
    assert!(sheet.is_open());
}

#[test]
fn sheets_sharing_a_registry_are_isolated() {
    let registry = ListenerRegistry::new();
    let mut a = sheet_with(SheetConfig::default(), &registry);
    let b = sheet_with(SheetConfig::default(), &registry);
    let t0 = Instant::now();

    a.handle_event(
        &Event::handle(RawPointerEvent::mouse(PointerPhase::Down, 600.0)),
        t0,
    );
    assert!(a.is_dragging());
    assert!(!b.is_dragging());
    assert_eq!(b.active_listeners(), ListenerKinds::PERSISTENT);

    drop(a);
    assert_eq!(registry.total(), ListenerKinds::PERSISTENT.iter().count());
}

#[test]
fn touch_release_without_changed_touch_keeps_start_height() {
    let registry = ListenerRegistry::new();
    let mut sheet = sheet_with(SheetConfig::default(), &registry);
    let t0 = Instant::now();
    sheet.show();

    sheet.handle_event(
        &Event::handle(RawPointerEvent::touch(PointerPhase::Down, 600.0)),
        t0,
    );
    sheet.handle_event(
        &Event::document(RawPointerEvent::touch(PointerPhase::Move, 300.0)),
        t0,
    );
    sheet.handle_event(
        &Event::document(RawPointerEvent::Touch {
            phase: PointerPhase::Up,
            touches: Vec::new(),
            changed_touches: Vec::new(),
            client_y: None,
        }),
        t0,
    );
    // Zero delta: 500 px → 0.5.
    assert_eq!(sheet.current_breakpoint(), 0.5);
}
