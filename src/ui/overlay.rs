use crate::calc::IndexedDay;
use chrono::NaiveDate;
use crossterm::event::KeyCode;
use ratatui::layout::{Position, Rect};
use std::cell::Cell;
use std::rc::Rc;

/// Counts the dismissal listeners (Escape key, outside click) currently
/// attached. Cloning shares the same counter.
#[derive(Clone, Debug, Default)]
pub struct ListenerRegistry {
    active: Rc<Cell<usize>>,
}

impl ListenerRegistry {
    pub fn acquire(&self) -> DismissListeners {
        self.active.set(self.active.get() + 1);
        tracing::debug!(active = self.active(), "dismiss listeners attached");
        DismissListeners {
            active: Rc::clone(&self.active),
            panel: None,
            close: None,
        }
    }

    pub fn active(&self) -> usize {
        self.active.get()
    }
}

/// Held for as long as the overlay is open; dropping it detaches the listeners.
/// Dismissal input is routed through the guard, so input only reaches a
/// listener while the guard is alive.
#[derive(Debug)]
pub struct DismissListeners {
    active: Rc<Cell<usize>>,
    panel: Option<Rect>,
    close: Option<Rect>,
}

impl DismissListeners {
    /// Screen areas of the panel and its close control from the last draw.
    pub fn set_bounds(&mut self, panel: Rect, close: Rect) {
        self.panel = Some(panel);
        self.close = Some(close);
    }

    pub fn on_key(&self, code: KeyCode) -> bool {
        matches!(code, KeyCode::Esc | KeyCode::Enter)
    }

    /// True for a click on the close control or anywhere outside the panel.
    pub fn on_click(&self, pos: Position) -> bool {
        let on_close = self.close.is_some_and(|r| r.contains(pos));
        let inside = self.panel.is_some_and(|r| r.contains(pos));
        on_close || !inside
    }
}

impl Drop for DismissListeners {
    fn drop(&mut self) {
        self.active.set(self.active.get().saturating_sub(1));
        tracing::debug!(active = self.active.get(), "dismiss listeners detached");
    }
}

/// Detail panel for one month-grid date with its full session list.
#[derive(Debug)]
pub struct DetailOverlay {
    pub date: NaiveDate,
    pub day: IndexedDay,
    listeners: DismissListeners,
}

impl DetailOverlay {
    pub fn open(date: NaiveDate, day: IndexedDay, registry: &ListenerRegistry) -> Self {
        DetailOverlay {
            date,
            day,
            listeners: registry.acquire(),
        }
    }

    pub fn listeners(&self) -> &DismissListeners {
        &self.listeners
    }

    pub fn listeners_mut(&mut self) -> &mut DismissListeners {
        &mut self.listeners
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_acquire_and_drop_balances() {
        let registry = ListenerRegistry::default();
        let guard = registry.acquire();
        assert_eq!(registry.active(), 1);
        drop(guard);
        assert_eq!(registry.active(), 0);
    }

    #[test]
    fn test_overlay_releases_on_drop() {
        let registry = ListenerRegistry::default();
        let date = NaiveDate::from_ymd_opt(2024, 6, 3).unwrap();
        let mut slot = Some(DetailOverlay::open(date, IndexedDay::default(), &registry));
        assert_eq!(registry.active(), 1);
        slot = None;
        assert!(slot.is_none());
        assert_eq!(registry.active(), 0);
    }

    #[test]
    fn test_key_dismissal() {
        let registry = ListenerRegistry::default();
        let guard = registry.acquire();
        assert!(guard.on_key(KeyCode::Esc));
        assert!(guard.on_key(KeyCode::Enter));
        assert!(!guard.on_key(KeyCode::Char('n')));
        assert!(!guard.on_key(KeyCode::Left));
    }

    #[test]
    fn test_click_dismissal_uses_bounds() {
        let registry = ListenerRegistry::default();
        let mut guard = registry.acquire();
        let panel = Rect::new(10, 5, 40, 20);
        let close = Rect::new(45, 5, 3, 1);
        guard.set_bounds(panel, close);
        assert!(!guard.on_click(Position::new(20, 10)));
        assert!(guard.on_click(Position::new(46, 5)));
        assert!(guard.on_click(Position::new(0, 0)));
        assert!(guard.on_click(Position::new(60, 10)));
    }

    #[test]
    fn test_click_before_first_draw_dismisses() {
        let registry = ListenerRegistry::default();
        let guard = registry.acquire();
        assert!(guard.on_click(Position::new(20, 10)));
    }

    #[test]
    fn test_replacing_overlay_does_not_leak() {
        let registry = ListenerRegistry::default();
        let date = NaiveDate::from_ymd_opt(2024, 6, 3).unwrap();
        let mut slot = Some(DetailOverlay::open(date, IndexedDay::default(), &registry));
        assert!(slot.is_some());
        slot = Some(DetailOverlay::open(date, IndexedDay::default(), &registry));
        assert_eq!(registry.active(), 1);
        drop(slot);
        assert_eq!(registry.active(), 0);
    }
}
