// Forbid unsafe in production; deny in tests.
#![cfg_attr(not(test), forbid(unsafe_code))]
#![cfg_attr(test, deny(unsafe_code))]

//! Headless bottom sheet widget.
//!
//! [`BottomSheet`] composes the `sheetkit-core` primitives into a component
//! that opens, closes with a deferred completion, resizes under drag and
//! snaps to breakpoints. Hosts supply a [`StyleSink`] to receive the
//! presentation and a geometry source to measure against.
//!
//! Enable the `config` feature to load a [`SheetConfig`] from TOML or JSON.

pub mod bottom_sheet;
pub mod config;

pub use bottom_sheet::{
    BottomSheet, Height, RecordingSink, SheetNotification, SheetPhase, StyleSink, Transform,
    Transition,
};
pub use config::{SheetConfig, SheetConfigError, SheetConfigFile};
