#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use sheetkit_core::event::{Event, KeyCode, KeyEvent, PointerPhase, RawPointerEvent, TouchPoint};
use sheetkit_core::geometry::FixedGeometry;
use sheetkit_core::listener::{ListenerKinds, ListenerRegistry};
use sheetkit_widgets::bottom_sheet::{BottomSheet, Height, RecordingSink, StyleCommand};
use sheetkit_widgets::config::SheetConfig;
use web_time::{Duration, Instant};

#[derive(Debug, Arbitrary)]
enum Phase {
    Down,
    Move,
    Up,
    Cancel,
}

#[derive(Debug, Arbitrary)]
enum Op {
    Mouse { phase: Phase, y: i16, on_handle: bool },
    Touch { phase: Phase, y: Option<i16>, changed: Option<i16>, on_handle: bool },
    Key(u8),
    Backdrop,
    Show,
    Hide,
    SetOpen(bool),
    Advance(u16),
    SetBreakpoints(Vec<i8>),
    SetInitial(i8),
    SetHandleVisible(bool),
    Remount,
    Unmount,
}

#[derive(Debug, Arbitrary)]
struct Input {
    viewport: u16,
    breakpoints: Vec<i8>,
    show_backdrop: bool,
    backdrop_dismiss: bool,
    ops: Vec<Op>,
}

fn phase(p: &Phase) -> PointerPhase {
    match p {
        Phase::Down => PointerPhase::Down,
        Phase::Move => PointerPhase::Move,
        Phase::Up => PointerPhase::Up,
        Phase::Cancel => PointerPhase::Cancel,
    }
}

fn fractions(raw: &[i8]) -> Vec<f64> {
    raw.iter().map(|b| f64::from(*b) / 100.0).collect()
}

fn route(raw: RawPointerEvent, on_handle: bool) -> Event {
    if on_handle {
        Event::handle(raw)
    } else {
        Event::document(raw)
    }
}

fuzz_target!(|input: Input| {
    if input.ops.len() > 256 {
        return;
    }
    let viewport = f64::from(input.viewport);
    let registry = ListenerRegistry::new();
    let config = SheetConfig::default()
        .breakpoints(fractions(&input.breakpoints))
        .show_backdrop(input.show_backdrop)
        .backdrop_dismiss(input.backdrop_dismiss);
    let mut sheet = BottomSheet::new(config, registry.clone());
    sheet.mount(RecordingSink::new(), FixedGeometry::new(viewport, viewport / 2.0));
    let mut now = Instant::now();

    for op in &input.ops {
        if let Some(sink) = sheet.sink_mut() {
            sink.clear_log();
        }
        match op {
            Op::Mouse { phase: p, y, on_handle } => {
                let raw = RawPointerEvent::mouse(phase(p), f64::from(*y));
                sheet.handle_event(&route(raw, *on_handle), now);
            }
            Op::Touch { phase: p, y, changed, on_handle } => {
                let raw = RawPointerEvent::Touch {
                    phase: phase(p),
                    touches: y.map(|y| TouchPoint::new(0, f64::from(y))).into_iter().collect(),
                    changed_touches: changed
                        .map(|y| TouchPoint::new(0, f64::from(y)))
                        .into_iter()
                        .collect(),
                    client_y: None,
                };
                sheet.handle_event(&route(raw, *on_handle), now);
            }
            Op::Key(k) => {
                let code = if *k % 2 == 0 { KeyCode::Escape } else { KeyCode::Char(char::from(*k)) };
                sheet.handle_event(&Event::Key(KeyEvent::new(code)), now);
            }
            Op::Backdrop => {
                sheet.handle_event(&Event::BackdropClick, now);
            }
            Op::Show => sheet.show(),
            Op::Hide => sheet.hide(now),
            Op::SetOpen(open) => sheet.set_open(*open),
            Op::Advance(ms) => {
                now += Duration::from_millis(u64::from(*ms));
                sheet.tick(now);
            }
            Op::SetBreakpoints(raw) => sheet.set_breakpoints(fractions(raw)),
            Op::SetInitial(raw) => sheet.set_initial_breakpoint(f64::from(*raw) / 100.0),
            Op::SetHandleVisible(visible) => sheet.set_handle_visible(*visible),
            Op::Remount => {
                sheet.mount(RecordingSink::new(), FixedGeometry::new(viewport, viewport / 3.0));
            }
            Op::Unmount => {
                sheet.unmount();
            }
        }

        // Post-conditions that must always hold:
        assert!(registry.max_count(sheet.owner()) <= 1, "duplicate listener");
        let drag = sheet.active_listeners() & ListenerKinds::DRAG_CONTINUATION;
        assert_eq!(sheet.is_dragging(), !drag.is_empty(), "drag listeners out of sync");
        let current = sheet.current_breakpoint();
        assert!(current > 0.0 && current <= 1.0, "breakpoint {current} out of range");

        let (lo, hi) = sheet.config().breakpoints.pixel_range(viewport);
        if let Some(sink) = sheet.sink() {
            for cmd in &sink.log {
                if let StyleCommand::Height(Height::Pixels(px)) = cmd {
                    assert!(*px >= lo && *px <= hi, "live height {px} outside [{lo}, {hi}]");
                }
            }
        }
    }

    sheet.unmount();
    assert_eq!(registry.total(), 0, "listeners leaked after unmount");
});
