// Forbid unsafe in production; deny in tests.
#![cfg_attr(not(test), forbid(unsafe_code))]
#![cfg_attr(test, deny(unsafe_code))]

//! Core: input unification, drag sessions, breakpoints, timers, listeners.
//!
//! # Role in sheetkit
//! `sheetkit-core` is the platform-independent layer under the bottom sheet
//! widget. It has no notion of styling; it turns raw pointer input into
//! heights and fractions, and provides the small lifecycle primitives the
//! widget composes.
//!
//! # Primary responsibilities
//! - **Event**: canonical pointer (mouse and touch), key and backdrop events.
//! - **Input unification**: one `(phase, y)` stream for both pointer classes.
//! - **DragSession**: live and final heights from pointer deltas.
//! - **BreakpointSet**: validated fractions and nearest-breakpoint snapping.
//! - **TimerQueue**: explicit-clock deferred work with cancellation tokens.
//! - **ListenerRegistry**: scoped, idempotent global listener bookkeeping.
//!
//! # How it fits in the system
//! `sheetkit-widgets` owns a `BottomSheet` that feeds events through these
//! pieces and pushes the results to a style sink.

pub mod breakpoint;
pub mod cancellation;
pub mod drag;
pub mod event;
pub mod geometry;
pub mod input;
pub mod listener;
pub mod timer;

pub use web_time::{Duration, Instant};
