//! Keyboard focus.
//!
//! Each [`WidgetTree`](crate::tree::WidgetTree) owns one [`FocusManager`].
//!
//! 1. During event routing, a widget calls `ctx.request_focus()` when clicked.
//! 2. Once the click has been routed, the tree applies the request, or clears
//!    focus when nothing asked for it.
//! 3. Tab (when no widget consumed it) moves focus through the focusable
//!    widgets in tree order; Shift is not tracked, so it always moves forward.
//! 4. Keyboard events go to the focused widget before anyone else.

use crate::tree::WidgetId;

#[derive(Debug, Default)]
pub struct FocusManager {
    focused: Option<WidgetId>,
    /// Focus requested during the current dispatch.
    requested: Option<WidgetId>,
}

impl FocusManager {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn focused(&self) -> Option<WidgetId> {
        self.focused
    }

    #[inline]
    pub fn is_focused(&self, id: WidgetId) -> bool {
        self.focused == Some(id)
    }

    #[inline]
    pub fn request(&mut self, id: WidgetId) {
        self.requested = Some(id);
    }

    #[inline]
    pub(crate) fn take_request(&mut self) -> Option<WidgetId> {
        self.requested.take()
    }

    /// Records the new focus; returns the previously focused id if it changed.
    pub(crate) fn replace(&mut self, id: Option<WidgetId>) -> Option<Option<WidgetId>> {
        if self.focused == id {
            None
        } else {
            Some(std::mem::replace(&mut self.focused, id))
        }
    }

    /// The entry after the focused one in `order`, wrapping around.
    pub fn next_in(&self, order: &[WidgetId]) -> Option<WidgetId> {
        if order.is_empty() {
            return None;
        }
        let n = order.len();
        Some(match self.focused.and_then(|cur| order.iter().position(|&x| x == cur)) {
            None => order[0],
            Some(i) => order[(i + 1) % n],
        })
    }
}

#[cfg(test)]
mod tests {
    use slotmap::SlotMap;

    use super::*;

    #[test]
    fn next_wraps_and_starts_at_first() {
        let mut keys: SlotMap<WidgetId, ()> = SlotMap::with_key();
        let order = [keys.insert(()), keys.insert(()), keys.insert(())];

        let mut focus = FocusManager::new();
        assert_eq!(focus.next_in(&order), Some(order[0]));

        focus.replace(Some(order[2]));
        assert_eq!(focus.next_in(&order), Some(order[0]));

        focus.replace(Some(order[0]));
        assert_eq!(focus.next_in(&order), Some(order[1]));
        assert_eq!(focus.next_in(&[]), None);
    }

    #[test]
    fn replace_reports_only_changes() {
        let mut keys: SlotMap<WidgetId, ()> = SlotMap::with_key();
        let a = keys.insert(());
        let mut focus = FocusManager::new();
        assert_eq!(focus.replace(Some(a)), Some(None));
        assert_eq!(focus.replace(Some(a)), None);
        assert_eq!(focus.replace(None), Some(Some(a)));
    }
}
