//! Integration tests for the `smallfn-internals` slot machinery.
//!
//! These tests exercise the full payload lifecycle across the public
//! [`RawSlot`] API (engage, clone, relocate, swap, destroy) and verify the
//! memory-management properties the crate promises:
//!
//! - every logical payload instance is dropped exactly once, with zero
//!   double-drops and zero leaks, regardless of how it was moved around;
//! - relocation (`take`, `swap`) transfers ownership without running either
//!   the payload's destructor or its clone;
//! - clones are fully independent values, never aliasing the source's heap
//!   allocation;
//! - the inline/heap strategy decision is stable and observable.

use std::cell::RefCell;
use std::rc::Rc;

use smallfn_internals::RawSlot;

/// Event log shared between trackers and assertions.
type EventLog = Rc<RefCell<Vec<String>>>;

/// A payload that records its clone and drop events, sized exactly at the
/// two-word inline threshold.
struct SmallTracker {
    name: char,
    log: EventLog,
}

impl SmallTracker {
    fn new(name: char, log: &EventLog) -> Self {
        Self {
            name,
            log: Rc::clone(log),
        }
    }
}

impl Clone for SmallTracker {
    fn clone(&self) -> Self {
        self.log.borrow_mut().push(format!("clone {}", self.name));
        Self {
            name: self.name,
            log: Rc::clone(&self.log),
        }
    }
}

impl Drop for SmallTracker {
    fn drop(&mut self) {
        self.log.borrow_mut().push(format!("drop {}", self.name));
    }
}

/// Same event behavior as [`SmallTracker`], padded past the two-word buffer
/// so it always takes the heap strategy.
struct LargeTracker {
    inner: SmallTracker,
    _padding: [u64; 4],
}

impl LargeTracker {
    fn new(name: char, log: &EventLog) -> Self {
        Self {
            inner: SmallTracker::new(name, log),
            _padding: [0; 4],
        }
    }
}

impl Clone for LargeTracker {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            _padding: self._padding,
        }
    }
}

fn new_log() -> EventLog {
    Rc::new(RefCell::new(Vec::new()))
}

fn events(log: &EventLog) -> Vec<String> {
    log.borrow().clone()
}

#[test]
fn test_strategy_selection() {
    let log = new_log();
    let small = RawSlot::new(SmallTracker::new('s', &log));
    let large = RawSlot::new(LargeTracker::new('l', &log));

    assert_eq!(small.stored_inline(), Some(true));
    assert_eq!(large.stored_inline(), Some(false));
}

#[test]
fn test_engage_and_drop_is_exactly_once() {
    let log = new_log();
    {
        let _slot = RawSlot::new(SmallTracker::new('a', &log));
        assert!(events(&log).is_empty());
    }
    assert_eq!(events(&log), ["drop a"]);
}

#[test]
fn test_duplicate_clones_exactly_once() {
    let log = new_log();
    {
        let original = RawSlot::new(SmallTracker::new('a', &log));
        let copy = original.duplicate();
        assert!(copy.is_engaged());
        assert_eq!(events(&log), ["clone a"]);
    }
    // One drop for the original, one for the clone
    assert_eq!(events(&log), ["clone a", "drop a", "drop a"]);
}

#[test]
fn test_take_relocates_without_clone_or_drop() {
    let log = new_log();
    {
        let mut source = RawSlot::new(SmallTracker::new('a', &log));
        let taken = source.take();
        assert!(!source.is_engaged());
        assert!(taken.is_engaged());
        // Relocation is a transfer of ownership, not a new logical instance
        assert!(events(&log).is_empty());

        // Dropping the emptied source must not touch the payload
        drop(source);
        assert!(events(&log).is_empty());
    }
    assert_eq!(events(&log), ["drop a"]);
}

#[test]
fn test_take_relocates_heap_payload_without_copying() {
    let log = new_log();
    {
        let mut source = RawSlot::new(LargeTracker::new('l', &log));
        let taken = source.take();
        assert!(!source.is_engaged());
        assert_eq!(taken.stored_inline(), Some(false));
        assert!(events(&log).is_empty());
    }
    assert_eq!(events(&log), ["drop l"]);
}

#[test]
fn test_swap_preserves_instance_count() {
    let log = new_log();
    {
        let mut first = RawSlot::new(SmallTracker::new('a', &log));
        let mut second = RawSlot::new(LargeTracker::new('b', &log));

        first.swap(&mut second);
        first.swap(&mut second);
        // Two round-trips of relocations: no clones, no drops
        assert!(events(&log).is_empty());
    }
    let final_events = events(&log);
    assert_eq!(final_events.len(), 2);
    assert!(final_events.contains(&String::from("drop a")));
    assert!(final_events.contains(&String::from("drop b")));
}

#[test]
fn test_swap_with_empty_transfers_ownership() {
    let log = new_log();
    let mut engaged = RawSlot::new(SmallTracker::new('a', &log));
    let mut empty = RawSlot::empty();

    engaged.swap(&mut empty);
    assert!(!engaged.is_engaged());
    assert!(empty.is_engaged());
    assert!(events(&log).is_empty());

    drop(engaged);
    assert!(events(&log).is_empty());
    drop(empty);
    assert_eq!(events(&log), ["drop a"]);
}

#[test]
fn test_clear_drops_payload_immediately() {
    let log = new_log();
    let mut slot = RawSlot::new(LargeTracker::new('l', &log));
    slot.clear();
    assert_eq!(events(&log), ["drop l"]);
    // The subsequent slot drop must not drop again
    drop(slot);
    assert_eq!(events(&log), ["drop l"]);
}

#[test]
fn test_duplicate_of_heap_payload_is_independent() {
    let log = new_log();
    let original = RawSlot::new(LargeTracker::new('l', &log));
    let copy = original.duplicate();
    assert_eq!(events(&log), ["clone l"]);

    // Dropping the original must leave the copy alive and usable
    drop(original);
    assert_eq!(events(&log), ["clone l", "drop l"]);
    assert!(copy.is_engaged());
    drop(copy);
    assert_eq!(events(&log), ["clone l", "drop l", "drop l"]);
}

#[test]
fn test_long_lifecycle_balances_instances() {
    let log = new_log();
    {
        let mut a = RawSlot::new(SmallTracker::new('x', &log));
        let mut b = a.duplicate();
        let mut c = b.take();
        a.swap(&mut c);
        let d = a.duplicate();
        b.clear();
        drop(d);
    }
    // Three logical instances existed: the original, the duplicate of `a`,
    // and the duplicate taken at `d`. Each must drop exactly once.
    let final_events = events(&log);
    let clones = final_events.iter().filter(|e| *e == "clone x").count();
    let drops = final_events.iter().filter(|e| *e == "drop x").count();
    assert_eq!(clones, 2);
    assert_eq!(drops, 3);
}
