#![forbid(unsafe_code)]

//! Global listener bookkeeping with scoped handles.
//!
//! A [`ListenerRegistry`] stands in for the document-level listener table
//! shared by every sheet on a page. Registering returns a [`ListenerGuard`];
//! dropping the guard unregisters. Owners keep guards in `Option` slots, so
//! overwriting or clearing a slot is the removal step and nothing can
//! outlive its owner.
//!
//! The registry counts registrations per `(owner, kind)`. Correct owners never
//! exceed one per kind; the count exists so tests can prove that.
//!
//! # Invariants
//!
//! 1. Releasing a guard twice, or releasing after
//!    [`remove_all`](ListenerRegistry::remove_all), is a no-op.
//! 2. Counts never underflow.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use bitflags::bitflags;

use crate::event::{PointerPhase, RawPointerEvent};

bitflags! {
    /// Listener event kinds.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ListenerKinds: u16 {
        const MOUSE_DOWN     = 0b0000_0001;
        const TOUCH_START    = 0b0000_0010;
        const MOUSE_MOVE     = 0b0000_0100;
        const MOUSE_UP       = 0b0000_1000;
        const TOUCH_MOVE     = 0b0001_0000;
        const TOUCH_END      = 0b0010_0000;
        const KEY_DOWN       = 0b0100_0000;
        const BACKDROP_CLICK = 0b1000_0000;

        /// Press listeners on the drag handle.
        const HANDLE_PRESS = Self::MOUSE_DOWN.bits() | Self::TOUCH_START.bits();
        /// Document listeners that exist only while a drag is in progress.
        const DRAG_CONTINUATION = Self::MOUSE_MOVE.bits()
            | Self::MOUSE_UP.bits()
            | Self::TOUCH_MOVE.bits()
            | Self::TOUCH_END.bits();
        /// Listeners kept for the whole mounted lifetime.
        const PERSISTENT = Self::HANDLE_PRESS.bits()
            | Self::KEY_DOWN.bits()
            | Self::BACKDROP_CLICK.bits();
    }
}

impl ListenerKinds {
    /// The single kind a raw pointer event is delivered through.
    ///
    /// Cancellation rides on the release listener of its device.
    #[must_use]
    pub fn for_pointer(raw: &RawPointerEvent) -> Self {
        match (raw.is_touch(), raw.phase()) {
            (false, PointerPhase::Down) => Self::MOUSE_DOWN,
            (true, PointerPhase::Down) => Self::TOUCH_START,
            (false, PointerPhase::Move) => Self::MOUSE_MOVE,
            (true, PointerPhase::Move) => Self::TOUCH_MOVE,
            (false, PointerPhase::Up | PointerPhase::Cancel) => Self::MOUSE_UP,
            (true, PointerPhase::Up | PointerPhase::Cancel) => Self::TOUCH_END,
        }
    }
}

/// Identity of a listener owner (one per component instance).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OwnerId(u64);

#[derive(Debug, Default)]
struct RegistryInner {
    counts: HashMap<(OwnerId, ListenerKinds), usize>,
    next_owner: u64,
}

/// Shared, single-threaded listener table.
///
/// Cloning yields another handle to the same table.
#[derive(Debug, Clone, Default)]
pub struct ListenerRegistry {
    inner: Rc<RefCell<RegistryInner>>,
}

impl ListenerRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a fresh owner identity.
    pub fn allocate_owner(&self) -> OwnerId {
        let mut inner = self.inner.borrow_mut();
        let id = OwnerId(inner.next_owner);
        inner.next_owner += 1;
        id
    }

    /// Register `kinds` for `owner`; the registration lives as long as the guard.
    #[must_use = "dropping the guard unregisters immediately"]
    pub fn add(&self, owner: OwnerId, kinds: ListenerKinds) -> ListenerGuard {
        {
            let mut inner = self.inner.borrow_mut();
            for kind in kinds.iter() {
                *inner.counts.entry((owner, kind)).or_insert(0) += 1;
            }
        }
        tracing::trace!(owner = owner.0, ?kinds, "listeners attached");
        ListenerGuard {
            registry: self.clone(),
            owner,
            kinds,
            released: false,
        }
    }

    /// Forcibly unregister `kinds` for `owner`. Absent entries are ignored.
    pub fn remove_all(&self, owner: OwnerId, kinds: ListenerKinds) {
        let mut inner = self.inner.borrow_mut();
        for kind in kinds.iter() {
            inner.counts.remove(&(owner, kind));
        }
    }

    fn release(&self, owner: OwnerId, kinds: ListenerKinds) {
        let mut inner = self.inner.borrow_mut();
        for kind in kinds.iter() {
            if let Some(count) = inner.counts.get_mut(&(owner, kind)) {
                *count = count.saturating_sub(1);
                if *count == 0 {
                    inner.counts.remove(&(owner, kind));
                }
            }
        }
        tracing::trace!(owner = owner.0, ?kinds, "listeners released");
    }

    /// Number of registrations of a single `kind` for `owner`.
    #[must_use]
    pub fn count(&self, owner: OwnerId, kind: ListenerKinds) -> usize {
        self.inner
            .borrow()
            .counts
            .get(&(owner, kind))
            .copied()
            .unwrap_or(0)
    }

    /// Every kind `owner` currently has at least one registration for.
    #[must_use]
    pub fn active(&self, owner: OwnerId) -> ListenerKinds {
        self.inner
            .borrow()
            .counts
            .iter()
            .filter(|((o, _), n)| *o == owner && **n > 0)
            .fold(ListenerKinds::empty(), |acc, ((_, k), _)| acc | *k)
    }

    /// Whether `owner` is listening for every kind in `kinds`.
    #[must_use]
    pub fn is_listening(&self, owner: OwnerId, kinds: ListenerKinds) -> bool {
        self.active(owner).contains(kinds)
    }

    /// Largest registration count of any single kind for `owner`.
    #[must_use]
    pub fn max_count(&self, owner: OwnerId) -> usize {
        self.inner
            .borrow()
            .counts
            .iter()
            .filter(|((o, _), _)| *o == owner)
            .map(|(_, n)| *n)
            .max()
            .unwrap_or(0)
    }

    /// Total registrations across all owners.
    #[must_use]
    pub fn total(&self) -> usize {
        self.inner.borrow().counts.values().sum()
    }
}

/// Scoped registration. Unregisters on drop.
#[derive(Debug)]
pub struct ListenerGuard {
    registry: ListenerRegistry,
    owner: OwnerId,
    kinds: ListenerKinds,
    released: bool,
}

impl ListenerGuard {
    /// Kinds covered by this guard.
    #[inline]
    #[must_use]
    pub fn kinds(&self) -> ListenerKinds {
        self.kinds
    }

    /// Owner of the registration.
    #[inline]
    #[must_use]
    pub fn owner(&self) -> OwnerId {
        self.owner
    }

    /// Unregister now instead of at drop.
    pub fn release(mut self) {
        self.release_inner();
    }

    fn release_inner(&mut self) {
        if !self.released {
            self.released = true;
            self.registry.release(self.owner, self.kinds);
        }
    }
}

impl Drop for ListenerGuard {
    fn drop(&mut self) {
        self.release_inner();
    }
}
