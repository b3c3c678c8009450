//! Scoped blocking of canvas events and widget interactivity.
//!
//! Both regions are released by dropping a guard, so they are restored on
//! every exit path including early returns and `?`.

use std::cell::Cell;
use std::rc::Rc;

/// Counts nested blocks on canvas event delivery.
///
/// Clones share the same counter.
#[derive(Debug, Clone, Default)]
pub struct EventGate {
    depth: Rc<Cell<u32>>,
}

impl EventGate {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Blocks event delivery until the returned guard is dropped.
    #[must_use = "events are unblocked as soon as the guard is dropped"]
    pub fn block(&self) -> EventBlock {
        self.depth.set(self.depth.get() + 1);
        EventBlock {
            depth: Rc::clone(&self.depth),
        }
    }

    /// Whether any block is currently held.
    #[must_use]
    pub fn is_blocked(&self) -> bool {
        self.depth.get() > 0
    }
}

/// Guard returned by [`EventGate::block`].
#[derive(Debug)]
pub struct EventBlock {
    depth: Rc<Cell<u32>>,
}

impl Drop for EventBlock {
    fn drop(&mut self) {
        self.depth.set(self.depth.get().saturating_sub(1));
    }
}

/// Interactivity of the 3D view and the overlay widgets.
#[derive(Debug, Clone)]
pub struct Interactivity {
    view3d: Rc<Cell<bool>>,
    overlay: Rc<Cell<bool>>,
}

impl Default for Interactivity {
    fn default() -> Self {
        Self {
            view3d: Rc::new(Cell::new(true)),
            overlay: Rc::new(Cell::new(true)),
        }
    }
}

impl Interactivity {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn view3d(&self) -> bool {
        self.view3d.get()
    }

    #[must_use]
    pub fn overlay(&self) -> bool {
        self.overlay.get()
    }

    /// Disables both until the returned guard is dropped, then restores
    /// whatever state they had before.
    #[must_use = "interactivity is restored as soon as the guard is dropped"]
    pub fn suspend(&self) -> InteractivitySuspension {
        let guard = InteractivitySuspension {
            view3d: (Rc::clone(&self.view3d), self.view3d.get()),
            overlay: (Rc::clone(&self.overlay), self.overlay.get()),
        };
        self.view3d.set(false);
        self.overlay.set(false);
        guard
    }
}

/// Guard returned by [`Interactivity::suspend`].
#[derive(Debug)]
pub struct InteractivitySuspension {
    view3d: (Rc<Cell<bool>>, bool),
    overlay: (Rc<Cell<bool>>, bool),
}

impl Drop for InteractivitySuspension {
    fn drop(&mut self) {
        self.view3d.0.set(self.view3d.1);
        self.overlay.0.set(self.overlay.1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn failing(gate: &EventGate) -> Result<(), &'static str> {
        let _block = gate.block();
        assert!(gate.is_blocked());
        Err("boom")
    }

    #[test]
    fn test_block_released_on_error() {
        let gate = EventGate::new();
        assert!(failing(&gate).is_err());
        assert!(!gate.is_blocked());
    }

    #[test]
    fn test_nested_blocks() {
        let gate = EventGate::new();
        let outer = gate.block();
        {
            let _inner = gate.clone().block();
            assert!(gate.is_blocked());
        }
        assert!(gate.is_blocked());
        drop(outer);
        assert!(!gate.is_blocked());
    }

    #[test]
    fn test_suspend_restores_previous_state() {
        let interactivity = Interactivity::new();
        {
            let _s = interactivity.suspend();
            assert!(!interactivity.view3d());
            assert!(!interactivity.overlay());
            {
                let _nested = interactivity.suspend();
            }
            assert!(!interactivity.overlay());
        }
        assert!(interactivity.view3d());
        assert!(interactivity.overlay());
    }

    #[test]
    fn test_suspend_restored_after_panic() {
        let interactivity = Interactivity::new();
        let shared = interactivity.clone();
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(move || {
            let _s = shared.suspend();
            panic!("render failed");
        }));
        assert!(result.is_err());
        assert!(interactivity.view3d());
    }
}
