//! Active item state machine.
//!
//! Tracks which item is highlighted. The active index is always either `None`
//! or the index of a selectable item (not a divider, not disabled); every
//! transition preserves that.

use crate::item::MenuItem;

/// Keyboard/pointer navigation over the selectable subset of a menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    /// Indices of selectable items, ascending.
    selectable: Vec<usize>,
    active: Option<usize>,
    wrap: bool,
}

impl Navigation {
    /// Create navigation state for `items` with nothing active.
    pub fn new<N>(items: &[MenuItem<N>]) -> Self {
        Self { selectable: selectable_indices(items), active: None, wrap: true }
    }

    /// Builder: whether moving past either end wraps around.
    pub fn with_wrap(mut self, wrap: bool) -> Self {
        self.wrap = wrap;
        self
    }

    /// Currently active item index.
    pub fn active(&self) -> Option<usize> {
        self.active
    }

    /// Indices of the items that can become active.
    pub fn selectable(&self) -> &[usize] {
        &self.selectable
    }

    /// Replace the item sequence and re-validate the active index.
    ///
    /// The active index survives if it still points at a selectable item;
    /// otherwise it snaps to the first selectable item.
    pub fn set_items<N>(&mut self, items: &[MenuItem<N>]) {
        self.selectable = selectable_indices(items);
        if let Some(active) = self.active {
            if !self.selectable.contains(&active) {
                self.active = self.first();
                tracing::trace!(from = active, to = ?self.active, "Active item re-validated");
            }
        }
    }

    /// Menu opened: highlight the first selectable item.
    pub fn open(&mut self) -> Option<usize> {
        self.active = self.first();
        self.active
    }

    /// Menu closed: nothing is active.
    pub fn clear(&mut self) {
        self.active = None;
    }

    /// Advance to the next selectable item.
    pub fn move_next(&mut self) -> Option<usize> {
        let next = match self.position() {
            None => self.first(),
            Some(pos) if pos + 1 < self.selectable.len() => Some(self.selectable[pos + 1]),
            Some(_) if self.wrap => self.first(),
            Some(pos) => Some(self.selectable[pos]),
        };
        self.set_active(next)
    }

    /// Retreat to the previous selectable item.
    pub fn move_previous(&mut self) -> Option<usize> {
        let previous = match self.position() {
            None => self.last(),
            Some(pos) if pos > 0 => Some(self.selectable[pos - 1]),
            Some(_) if self.wrap => self.last(),
            Some(pos) => Some(self.selectable[pos]),
        };
        self.set_active(previous)
    }

    /// Jump to the first selectable item.
    pub fn jump_first(&mut self) -> Option<usize> {
        let first = self.first();
        self.set_active(first)
    }

    /// Jump to the last selectable item.
    pub fn jump_last(&mut self) -> Option<usize> {
        let last = self.last();
        self.set_active(last)
    }

    /// Pointer entered the item at `index`.
    ///
    /// Only selectable items become active; returns whether the active index
    /// changed.
    pub fn hover(&mut self, index: usize) -> bool {
        if !self.selectable.contains(&index) || self.active == Some(index) {
            return false;
        }
        self.active = Some(index);
        true
    }

    /// Resolve a click on the item at `index`.
    ///
    /// Returns the index to select, or `None` for dividers, disabled items and
    /// out-of-range indices.
    pub fn activate(&mut self, index: usize) -> Option<usize> {
        if !self.selectable.contains(&index) {
            return None;
        }
        self.active = Some(index);
        Some(index)
    }

    /// Resolve the confirm key: the active item, if any.
    pub fn confirm(&self) -> Option<usize> {
        self.active
    }

    fn set_active(&mut self, index: Option<usize>) -> Option<usize> {
        if self.active != index {
            tracing::trace!(from = ?self.active, to = ?index, "Active item moved");
        }
        self.active = index;
        index
    }

    fn position(&self) -> Option<usize> {
        let active = self.active?;
        self.selectable.iter().position(|&i| i == active)
    }

    fn first(&self) -> Option<usize> {
        self.selectable.first().copied()
    }

    fn last(&self) -> Option<usize> {
        self.selectable.last().copied()
    }
}

fn selectable_indices<N>(items: &[MenuItem<N>]) -> Vec<usize> {
    items.iter().enumerate().filter(|(_, item)| item.is_selectable()).map(|(i, _)| i).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::MenuAction;

    fn action(label: &str) -> MenuItem {
        MenuItem::action(label)
    }

    fn disabled(label: &str) -> MenuItem {
        MenuItem::Action(MenuAction::new(label).disabled(true))
    }

    /// Selectable indices [1, 3, 5].
    fn odd_menu() -> Vec<MenuItem> {
        vec![
            MenuItem::divider(),
            action("One"),
            disabled("Two"),
            action("Three"),
            MenuItem::divider(),
            action("Five"),
        ]
    }

    #[test]
    fn test_move_next_wraps() {
        let mut nav = Navigation::new(&odd_menu());
        assert_eq!(nav.selectable(), &[1, 3, 5]);
        assert_eq!(nav.active(), None);

        assert_eq!(nav.move_next(), Some(1));
        assert_eq!(nav.move_next(), Some(3));
        assert_eq!(nav.move_next(), Some(5));
        assert_eq!(nav.move_next(), Some(1));
    }

    #[test]
    fn test_move_previous_wraps() {
        let mut nav = Navigation::new(&odd_menu());
        assert_eq!(nav.move_previous(), Some(5));

        nav.hover(1);
        assert_eq!(nav.move_previous(), Some(5));
        assert_eq!(nav.move_previous(), Some(3));
    }

    #[test]
    fn test_no_wrap_sticks_at_ends() {
        let mut nav = Navigation::new(&odd_menu()).with_wrap(false);
        nav.jump_last();
        assert_eq!(nav.move_next(), Some(5));
        nav.jump_first();
        assert_eq!(nav.move_previous(), Some(1));
    }

    #[test]
    fn test_single_selectable_item_stays_put() {
        let items = vec![action("Copy"), MenuItem::divider(), disabled("Delete")];
        let mut nav = Navigation::new(&items);
        assert_eq!(nav.move_next(), Some(0));
        assert_eq!(nav.move_next(), Some(0));
        assert_eq!(nav.move_previous(), Some(0));
    }

    #[test]
    fn test_jumps_skip_unselectable() {
        let items = vec![MenuItem::divider(), action("A"), action("B"), disabled("C")];
        let mut nav = Navigation::new(&items);
        assert_eq!(nav.jump_first(), Some(1));
        assert_eq!(nav.jump_last(), Some(2));
    }

    #[test]
    fn test_hover_ignores_disabled_and_dividers() {
        let mut nav = Navigation::new(&odd_menu());
        nav.open();
        assert!(!nav.hover(0));
        assert!(!nav.hover(2));
        assert!(!nav.hover(99));
        assert_eq!(nav.active(), Some(1));

        assert!(nav.hover(5));
        assert!(!nav.hover(5));
        assert_eq!(nav.active(), Some(5));
    }

    #[test]
    fn test_open_resets_to_first_selectable() {
        let items = vec![MenuItem::divider(), disabled("A"), action("B")];
        let mut nav = Navigation::new(&items);
        assert_eq!(nav.open(), Some(2));

        nav.clear();
        assert_eq!(nav.active(), None);
        assert_eq!(nav.open(), Some(2));
    }

    #[test]
    fn test_empty_and_all_dividers() {
        let mut nav = Navigation::new::<()>(&[]);
        assert_eq!(nav.open(), None);
        assert_eq!(nav.move_next(), None);
        assert_eq!(nav.move_previous(), None);
        assert_eq!(nav.jump_first(), None);
        assert_eq!(nav.jump_last(), None);
        assert_eq!(nav.confirm(), None);

        let items: Vec<MenuItem> = vec![MenuItem::divider(), MenuItem::divider()];
        let mut nav = Navigation::new(&items);
        assert_eq!(nav.open(), None);
        assert_eq!(nav.move_next(), None);
    }

    #[test]
    fn test_activate_resolves_only_selectable() {
        let mut nav = Navigation::new(&odd_menu());
        assert_eq!(nav.activate(0), None);
        assert_eq!(nav.activate(2), None);
        assert_eq!(nav.activate(42), None);
        assert_eq!(nav.activate(3), Some(3));
        assert_eq!(nav.confirm(), Some(3));
    }

    #[test]
    fn test_set_items_revalidates() {
        let mut nav = Navigation::new(&odd_menu());
        nav.hover(3);

        // Index 3 still selectable: kept.
        nav.set_items(&odd_menu());
        assert_eq!(nav.active(), Some(3));

        // Index 3 becomes disabled: snap to first selectable.
        let items = vec![action("A"), disabled("B"), action("C"), disabled("D")];
        nav.set_items(&items);
        assert_eq!(nav.active(), Some(0));

        // Nothing selectable left.
        nav.set_items(&[MenuItem::<()>::divider()]);
        assert_eq!(nav.active(), None);
    }
}
