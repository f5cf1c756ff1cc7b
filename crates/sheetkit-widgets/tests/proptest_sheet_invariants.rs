//! Property-based invariant tests for the bottom sheet.
//!
//! Arbitrary interleavings of pointer input, Escape, backdrop clicks,
//! show/hide and clock advances must never:
//!
//! 1. Register more than one listener per kind for a sheet.
//! 2. Leave a drag session without drag listeners, or the reverse.
//! 3. Write a live drag height outside the breakpoint pixel range.
//! 4. Settle on a breakpoint outside the configured set.
//! 5. Report closed while a close is still inside its duration.

use proptest::prelude::*;
use sheetkit_core::breakpoint::BreakpointSet;
use sheetkit_core::event::{Event, PointerPhase, RawPointerEvent};
use sheetkit_core::geometry::FixedGeometry;
use sheetkit_core::listener::{ListenerKinds, ListenerRegistry};
use sheetkit_widgets::bottom_sheet::{BottomSheet, Height, RecordingSink, SheetPhase, StyleCommand};
use sheetkit_widgets::config::SheetConfig;
use web_time::{Duration, Instant};

const VIEWPORT: f64 = 900.0;

#[derive(Debug, Clone)]
enum Op {
    Press { y: f64, touch: bool },
    Move { y: f64, touch: bool },
    Release { y: f64, touch: bool },
    Cancel,
    Escape,
    Backdrop,
    Show,
    Hide,
    SetOpen(bool),
    Advance(u64),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => (0.0..VIEWPORT, any::<bool>()).prop_map(|(y, touch)| Op::Press { y, touch }),
        5 => (-200.0..VIEWPORT + 200.0, any::<bool>()).prop_map(|(y, touch)| Op::Move { y, touch }),
        3 => (-200.0..VIEWPORT + 200.0, any::<bool>()).prop_map(|(y, touch)| Op::Release { y, touch }),
        1 => Just(Op::Cancel),
        1 => Just(Op::Escape),
        1 => Just(Op::Backdrop),
        2 => Just(Op::Show),
        2 => Just(Op::Hide),
        1 => any::<bool>().prop_map(Op::SetOpen),
        3 => (0u64..400).prop_map(Op::Advance),
    ]
}

fn breakpoints_strategy() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(0.01f64..=1.0, 1..8)
}

fn raw(phase: PointerPhase, y: f64, touch: bool) -> RawPointerEvent {
    if touch {
        RawPointerEvent::touch(phase, y)
    } else {
        RawPointerEvent::mouse(phase, y)
    }
}

proptest! {
    #[test]
    fn sheet_invariants_hold(
        bps in breakpoints_strategy(),
        ops in prop::collection::vec(op_strategy(), 1..60),
    ) {
        let set = BreakpointSet::new(bps);
        let (lo, hi) = set.pixel_range(VIEWPORT);
        let registry = ListenerRegistry::new();
        let config = SheetConfig::default()
            .breakpoints(set.clone())
            .show_backdrop(true)
            .backdrop_dismiss(true);
        let mut sheet = BottomSheet::new(config, registry.clone());
        sheet.mount(RecordingSink::new(), FixedGeometry::new(VIEWPORT, VIEWPORT / 2.0));

        let mut now = Instant::now();

        for op in ops {
            if let Some(sink) = sheet.sink_mut() {
                sink.clear_log();
            }
            let before = sheet.phase();
            let pending_deadline = sheet.next_deadline();
            let advanced = matches!(op, Op::Advance(_));

            match op {
                Op::Press { y, touch } => {
                    sheet.handle_event(&Event::handle(raw(PointerPhase::Down, y, touch)), now);
                }
                Op::Move { y, touch } => {
                    sheet.handle_event(&Event::document(raw(PointerPhase::Move, y, touch)), now);
                }
                Op::Release { y, touch } => {
                    let settled = sheet.is_dragging();
                    sheet.handle_event(&Event::document(raw(PointerPhase::Up, y, touch)), now);
                    if settled && !sheet.is_dragging() {
                        prop_assert!(set.contains(sheet.current_breakpoint()));
                    }
                }
                Op::Cancel => {
                    sheet.handle_event(&Event::document(raw(PointerPhase::Cancel, 0.0, true)), now);
                    sheet.handle_event(&Event::document(raw(PointerPhase::Cancel, 0.0, false)), now);
                }
                Op::Escape => {
                    sheet.handle_event(&Event::escape(), now);
                }
                Op::Backdrop => {
                    sheet.handle_event(&Event::BackdropClick, now);
                }
                Op::Show => sheet.show(),
                Op::Hide => sheet.hide(now),
                Op::SetOpen(open) => sheet.set_open(open),
                Op::Advance(ms) => {
                    now += Duration::from_millis(ms);
                    sheet.tick(now);
                }
            }

            if before == SheetPhase::Closing && sheet.phase() == SheetPhase::Closed && advanced {
                let deadline = pending_deadline.expect("closing sheet has a deadline");
                prop_assert!(now >= deadline, "closed before duration elapsed");
            }

            prop_assert!(registry.max_count(sheet.owner()) <= 1);
            let drag_kinds = sheet.active_listeners() & ListenerKinds::DRAG_CONTINUATION;
            if sheet.is_dragging() {
                prop_assert_eq!(drag_kinds, ListenerKinds::DRAG_CONTINUATION);
            } else {
                prop_assert!(drag_kinds.is_empty());
            }

            if let Some(sink) = sheet.sink() {
                for cmd in &sink.log {
                    if let StyleCommand::Height(Height::Pixels(px)) = cmd {
                        prop_assert!(*px >= lo - 1e-9 && *px <= hi + 1e-9, "live height {px} outside [{lo}, {hi}]");
                    }
                }
            }
        }

        sheet.unmount();
        prop_assert_eq!(registry.total(), 0);
    }

    #[test]
    fn show_always_resets_to_initial(
        initial in 0.01f64..=1.0,
        ys in prop::collection::vec(0.0..VIEWPORT, 2..6),
    ) {
        let registry = ListenerRegistry::new();
        let mut sheet = BottomSheet::new(
            SheetConfig::default().initial_breakpoint(initial),
            registry,
        );
        sheet.mount(RecordingSink::new(), FixedGeometry::new(VIEWPORT, VIEWPORT / 2.0));
        let now = Instant::now();

        sheet.show();
        sheet.handle_event(&Event::handle(RawPointerEvent::mouse(PointerPhase::Down, ys[0])), now);
        for y in &ys[1..] {
            sheet.handle_event(&Event::document(RawPointerEvent::mouse(PointerPhase::Move, *y)), now);
        }
        sheet.handle_event(&Event::document(RawPointerEvent::mouse(PointerPhase::Up, ys[ys.len() - 1])), now);

        sheet.show();
        prop_assert_eq!(sheet.current_breakpoint(), initial);
    }
}
