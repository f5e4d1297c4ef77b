// Document-wide pointer affordance, injected into the orb instead of touching the page directly.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::types::CursorStyle;

/// Capability for setting the global cursor. The orb is its only writer.
pub trait PointerAffordance {
    fn set_cursor(&mut self, style: CursorStyle);
}

/// Latch holding the most recent cursor style. Clones share the same cell so
/// the WASM facade can read back what the orb last asked for.
#[derive(Debug, Clone, Default)]
pub struct CursorLatch {
    current: Rc<Cell<CursorStyle>>,
}

impl CursorLatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> CursorStyle {
        self.current.get()
    }
}

impl PointerAffordance for CursorLatch {
    fn set_cursor(&mut self, style: CursorStyle) {
        self.current.set(style);
    }
}

/// Records every cursor change, for asserting on the sequence of affordance updates.
#[derive(Debug, Clone, Default)]
pub struct CursorLog {
    changes: Rc<RefCell<Vec<CursorStyle>>>,
}

impl CursorLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn changes(&self) -> Vec<CursorStyle> {
        self.changes.borrow().clone()
    }
}

impl PointerAffordance for CursorLog {
    fn set_cursor(&mut self, style: CursorStyle) {
        self.changes.borrow_mut().push(style);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latch_clones_share_state() {
        let latch = CursorLatch::new();
        let mut writer = latch.clone();
        assert_eq!(latch.current(), CursorStyle::Auto);
        writer.set_cursor(CursorStyle::Pointer);
        assert_eq!(latch.current(), CursorStyle::Pointer);
    }

    #[test]
    fn log_records_in_order() {
        let log = CursorLog::new();
        let mut writer = log.clone();
        writer.set_cursor(CursorStyle::Pointer);
        writer.set_cursor(CursorStyle::Auto);
        assert_eq!(log.changes(), vec![CursorStyle::Pointer, CursorStyle::Auto]);
    }
}
