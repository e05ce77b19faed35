use tessera_engine::coords::{Rect, Vec2, Viewport};
use tessera_engine::input::Key;
use tessera_engine::paint::{Border, Color};

use crate::event::{EventCtx, EventResult, UiEvent};
use crate::painter::Painter;
use crate::signal::Signal;
use crate::widget::Widget;

/// Payload of [`Dropdown::selection_changed`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionChanged {
    pub previous: i32,
    pub index: i32,
    pub item: Option<String>,
}

/// A collapsed control that expands into a scrollable list of strings.
///
/// `selected_index` is `-1` when nothing is selected. While expanded, the list
/// is an overlay: it paints above every other widget, opens below the control
/// (or above it when the viewport has no room below) and receives pointer
/// events before anything else in the tree.
///
/// # Example
/// ```rust,ignore
/// Dropdown::new(["All", "Fire", "Water"])
///     .selected(0)
///     .max_visible_items(6)
///     .on_change(move |ev| filter_dirty.set(true))
/// ```
pub struct Dropdown {
    items: Vec<String>,
    selected: i32,
    open: bool,
    max_visible_items: usize,
    /// First visible row of the expanded list.
    scroll: usize,
    /// Keyboard cursor while expanded.
    highlighted: Option<usize>,
    focused: bool,
    placeholder: String,
    item_height: f32,
    font_size: f32,
    padding: f32,
    text_color: Color,
    bg: Color,
    list_bg: Color,
    highlight_bg: Color,
    selected_bg: Color,
    border: Border,
    focused_border: Border,
    corner_radius: f32,
    /// Raised when a user or [`select`](Self::select) changes the selection.
    pub selection_changed: Signal<SelectionChanged>,
}

impl Dropdown {
    pub fn new<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            items: items.into_iter().map(Into::into).collect(),
            selected: -1,
            open: false,
            max_visible_items: 8,
            scroll: 0,
            highlighted: None,
            focused: false,
            placeholder: String::new(),
            item_height: 24.0,
            font_size: 14.0,
            padding: 8.0,
            text_color: Color::from_straight(0.9, 0.92, 0.95, 1.0),
            bg: Color::from_straight(0.06, 0.1, 0.16, 1.0),
            list_bg: Color::from_straight(0.08, 0.11, 0.17, 1.0),
            highlight_bg: Color::from_straight(0.16, 0.24, 0.36, 1.0),
            selected_bg: Color::from_straight(0.0, 0.4, 0.7, 1.0),
            border: Border::new(1.0, Color::from_straight(0.18, 0.28, 0.42, 1.0)),
            focused_border: Border::new(2.0, Color::from_straight(0.0, 0.67, 1.0, 1.0)),
            corner_radius: 4.0,
            selection_changed: Signal::new(),
        }
    }

    /// Initial selection; out-of-range values become `-1`.
    pub fn selected(mut self, index: i32) -> Self {
        self.set_selected_index(index);
        self
    }

    /// At least one row is always shown.
    pub fn max_visible_items(mut self, v: usize) -> Self {
        self.max_visible_items = v.max(1);
        self
    }

    pub fn placeholder(mut self, v: impl Into<String>) -> Self {
        self.placeholder = v.into();
        self
    }

    pub fn item_height(mut self, v: f32) -> Self {
        self.item_height = v;
        self
    }

    pub fn font_size(mut self, v: f32) -> Self {
        self.font_size = v;
        self
    }

    pub fn text_color(mut self, v: Color) -> Self {
        self.text_color = v;
        self
    }

    pub fn bg(mut self, v: Color) -> Self {
        self.bg = v;
        self
    }

    pub fn selected_bg(mut self, v: Color) -> Self {
        self.selected_bg = v;
        self
    }

    pub fn on_change(mut self, f: impl FnMut(&SelectionChanged) + 'static) -> Self {
        self.selection_changed.connect(f);
        self
    }

    // ── state ─────────────────────────────────────────────────────────────

    #[inline]
    pub fn items(&self) -> &[String] {
        &self.items
    }

    #[inline]
    pub fn selected_index(&self) -> i32 {
        self.selected
    }

    pub fn selected_item(&self) -> Option<&str> {
        usize::try_from(self.selected).ok().and_then(|i| self.items.get(i)).map(String::as_str)
    }

    #[inline]
    pub fn is_open(&self) -> bool {
        self.open
    }

    #[inline]
    pub fn scroll_offset(&self) -> usize {
        self.scroll
    }

    #[inline]
    pub fn highlighted(&self) -> Option<usize> {
        self.highlighted
    }

    /// Selects `index` and collapses. Notifies only when the selection actually
    /// changes; returns whether it did.
    pub fn select(&mut self, index: usize) -> bool {
        if index >= self.items.len() {
            log::warn!("dropdown: select({index}) out of range ({} items)", self.items.len());
            return false;
        }
        self.collapse();
        let previous = self.selected;
        let index = index as i32;
        if previous == index {
            return false;
        }
        self.selected = index;
        let ev = SelectionChanged { previous, index, item: self.selected_item().map(str::to_owned) };
        log::debug!("dropdown: selection {previous} -> {index}");
        self.selection_changed.emit(&ev);
        true
    }

    /// Programmatic selection: out-of-range values normalize to `-1`. Never notifies.
    pub fn set_selected_index(&mut self, index: i32) {
        self.selected = if index >= 0 && (index as usize) < self.items.len() { index } else { -1 };
    }

    /// Replaces the items, collapsing the list. A selection that no longer fits becomes `-1`.
    pub fn set_items<I, S>(&mut self, items: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.items = items.into_iter().map(Into::into).collect();
        self.collapse();
        self.set_selected_index(self.selected);
    }

    /// Flips between collapsed and expanded.
    pub fn toggle(&mut self) {
        if self.open {
            self.collapse();
        } else {
            self.open = true;
            self.highlighted = usize::try_from(self.selected).ok().or(if self.items.is_empty() { None } else { Some(0) });
            self.scroll = 0;
            if let Some(h) = self.highlighted {
                self.reveal(h);
            }
        }
    }

    fn collapse(&mut self) {
        self.open = false;
        self.highlighted = None;
    }

    fn visible_rows(&self) -> usize {
        self.items.len().min(self.max_visible_items)
    }

    fn max_scroll(&self) -> usize {
        self.items.len().saturating_sub(self.visible_rows())
    }

    /// Scrolls so row `i` is inside the visible window.
    fn reveal(&mut self, i: usize) {
        let rows = self.visible_rows();
        if i < self.scroll {
            self.scroll = i;
        } else if rows > 0 && i >= self.scroll + rows {
            self.scroll = i + 1 - rows;
        }
        self.scroll = self.scroll.min(self.max_scroll());
    }

    fn scroll_by(&mut self, delta: f32) {
        let step = if delta > 0.0 { 1 } else { -1 };
        let next = (self.scroll as i64 + step).clamp(0, self.max_scroll() as i64);
        self.scroll = next as usize;
    }

    /// Screen rect of the expanded list for a control at `rect`.
    pub fn list_rect(&self, rect: Rect, viewport: Viewport) -> Rect {
        let h = self.visible_rows() as f32 * self.item_height;
        let below = rect.max().y;
        let y = if below + h > viewport.height && rect.origin.y - h >= 0.0 {
            rect.origin.y - h
        } else {
            below
        };
        Rect::new(rect.origin.x, y, rect.size.x, h)
    }

    fn row_at(&self, list: Rect, pos: Vec2) -> Option<usize> {
        if !list.contains(pos) {
            return None;
        }
        let row = ((pos.y - list.origin.y) / self.item_height) as usize + self.scroll;
        (row < self.items.len()).then_some(row)
    }

    fn on_open_event(&mut self, event: &UiEvent, rect: Rect, ctx: &mut EventCtx<'_>) -> EventResult {
        let list = self.list_rect(rect, ctx.viewport);
        match event {
            UiEvent::Click { pos } => {
                if let Some(row) = self.row_at(list, *pos) {
                    self.select(row);
                    ctx.request_focus();
                } else {
                    // Outside (or on the control itself): collapse, keep the selection.
                    self.collapse();
                    if rect.contains(*pos) {
                        ctx.request_focus();
                    }
                }
                EventResult::Consumed
            }
            UiEvent::ScrollWheel { delta } => {
                self.scroll_by(*delta);
                EventResult::Consumed
            }
            UiEvent::KeyPress { key } => match key {
                Key::ArrowDown | Key::ArrowUp => {
                    let last = self.items.len().saturating_sub(1);
                    let next = match (self.highlighted, key) {
                        (None, _) => 0,
                        (Some(h), Key::ArrowDown) => (h + 1).min(last),
                        (Some(h), _) => h.saturating_sub(1),
                    };
                    if !self.items.is_empty() {
                        self.highlighted = Some(next);
                        self.reveal(next);
                    }
                    EventResult::Consumed
                }
                Key::Enter => {
                    match self.highlighted {
                        Some(h) => {
                            self.select(h);
                        }
                        None => self.collapse(),
                    }
                    EventResult::Consumed
                }
                Key::Escape => {
                    self.collapse();
                    EventResult::Consumed
                }
                _ => EventResult::Ignored,
            },
            UiEvent::TextInput { .. } => EventResult::Ignored,
        }
    }

    fn display_text(&self) -> (&str, Color) {
        match self.selected_item() {
            Some(item) => (item, self.text_color),
            None => (self.placeholder.as_str(), self.text_color.with_alpha(0.5)),
        }
    }
}

impl Widget for Dropdown {
    fn paint(&self, painter: &mut Painter, rect: Rect) {
        let border = if self.focused || self.open { self.focused_border } else { self.border };
        let bg = if painter.is_hovered(rect) { self.bg.lighten(0.05) } else { self.bg };
        painter.fill_rounded_rect(rect, self.corner_radius, bg, Some(border));

        let arrow_w = rect.size.y.min(24.0);
        let text_rect = Rect::new(rect.origin.x, rect.origin.y, (rect.size.x - arrow_w).max(0.0), rect.size.y);
        let (text, color) = self.display_text();
        painter.text_in(text, self.font_size, color, text_rect, self.padding);

        let arrow = Rect::new(rect.max().x - arrow_w, rect.origin.y, arrow_w, rect.size.y);
        painter.text_centered(if self.open { "▴" } else { "▾" }, self.font_size, self.text_color, arrow);
    }

    fn on_event(&mut self, event: &UiEvent, rect: Rect, ctx: &mut EventCtx<'_>) -> EventResult {
        if self.open {
            return self.on_open_event(event, rect, ctx);
        }
        match event {
            UiEvent::Click { pos } if rect.contains(*pos) => {
                ctx.request_focus();
                self.toggle();
                EventResult::Consumed
            }
            UiEvent::KeyPress { key: Key::Enter | Key::Space | Key::ArrowDown } if self.focused => {
                self.toggle();
                EventResult::Consumed
            }
            _ => EventResult::Ignored,
        }
    }

    fn overlay_active(&self) -> bool {
        self.open
    }

    fn paint_overlay(&self, painter: &mut Painter, rect: Rect) {
        let list = self.list_rect(rect, painter.viewport());
        if list.is_empty() {
            return;
        }
        painter.fill_rounded_rect(list, self.corner_radius, self.list_bg, Some(self.border));
        painter.push_clip(list);

        let end = (self.scroll + self.visible_rows()).min(self.items.len());
        for (slot, i) in (self.scroll..end).enumerate() {
            let row = Rect::new(list.origin.x, list.origin.y + slot as f32 * self.item_height, list.size.x, self.item_height);
            if i as i32 == self.selected {
                painter.fill_rect(row, self.selected_bg);
            } else if Some(i) == self.highlighted || painter.is_hovered(row) {
                painter.fill_rect(row, self.highlight_bg);
            }
            painter.text_in(self.items[i].as_str(), self.font_size, self.text_color, row, self.padding);
        }

        if self.items.len() > self.visible_rows() {
            let frac = self.visible_rows() as f32 / self.items.len() as f32;
            let thumb_h = (list.size.y * frac).max(8.0);
            let travel = list.size.y - thumb_h;
            let t = self.scroll as f32 / self.max_scroll().max(1) as f32;
            let thumb = Rect::new(list.max().x - 4.0, list.origin.y + travel * t, 3.0, thumb_h);
            painter.fill_rounded_rect(thumb, 1.5, self.text_color.with_alpha(0.35), None);
        }

        painter.pop_clip();
    }

    fn focusable(&self) -> bool {
        true
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
        if !focused {
            self.collapse();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::event::UiInput;
    use crate::tree::{WidgetId, WidgetTree};

    const VP: Viewport = Viewport::new(400.0, 300.0);

    fn recorded(dd: &mut Dropdown) -> Rc<RefCell<Vec<SelectionChanged>>> {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        dd.selection_changed.connect(move |ev| sink.borrow_mut().push(ev.clone()));
        log
    }

    fn in_tree(dd: Dropdown, y: f32) -> (WidgetTree, WidgetId) {
        let mut tree = WidgetTree::new();
        let id = tree.insert_root("dd", Vec2::new(10.0, y), Vec2::new(120.0, 24.0), dd).unwrap();
        (tree, id)
    }

    // ── selection ─────────────────────────────────────────────────────────

    #[test]
    fn reselect_is_silent_new_index_notifies_once() {
        let mut dd = Dropdown::new(["All", "Fire", "Water"]).selected(0);
        let log = recorded(&mut dd);

        dd.toggle();
        assert!(!dd.select(0));
        assert!(!dd.is_open());
        assert!(log.borrow().is_empty());

        assert!(dd.select(2));
        assert_eq!(
            *log.borrow(),
            vec![SelectionChanged { previous: 0, index: 2, item: Some("Water".into()) }]
        );
    }

    #[test]
    fn set_selected_index_normalizes_without_notifying() {
        let mut dd = Dropdown::new(["a", "b"]);
        let log = recorded(&mut dd);
        dd.set_selected_index(5);
        assert_eq!(dd.selected_index(), -1);
        assert_eq!(dd.selected_item(), None);
        dd.set_selected_index(1);
        assert_eq!(dd.selected_item(), Some("b"));
        dd.set_selected_index(-3);
        assert_eq!(dd.selected_index(), -1);
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn set_items_drops_stale_selection() {
        let mut dd = Dropdown::new(["a", "b", "c"]).selected(2);
        dd.set_items(["x"]);
        assert_eq!(dd.selected_index(), -1);
    }

    // ── geometry ──────────────────────────────────────────────────────────

    #[test]
    fn list_opens_above_when_no_room_below() {
        let dd = Dropdown::new(["a", "b", "c", "d"]).item_height(20.0);
        let near_top = Rect::new(0.0, 10.0, 100.0, 24.0);
        assert_eq!(dd.list_rect(near_top, VP).origin.y, 34.0);

        let near_bottom = Rect::new(0.0, 260.0, 100.0, 24.0);
        let list = dd.list_rect(near_bottom, VP);
        assert_eq!(list.origin.y, 180.0);
        assert_eq!(list.size.y, 80.0);
    }

    // ── input ─────────────────────────────────────────────────────────────

    #[test]
    fn click_opens_then_click_row_selects() {
        let mut dd = Dropdown::new(["All", "Fire", "Water"]).item_height(20.0);
        let log = recorded(&mut dd);
        let (mut tree, id) = in_tree(dd, 10.0);

        tree.handle_input(&UiInput::click(Vec2::new(20.0, 20.0)), VP);
        assert!(tree.widget::<Dropdown>(id).unwrap().is_open());

        // List starts at y = 34; the second row spans 54..74.
        tree.handle_input(&UiInput::click(Vec2::new(20.0, 60.0)), VP);
        let dd = tree.widget::<Dropdown>(id).unwrap();
        assert!(!dd.is_open());
        assert_eq!(dd.selected_index(), 1);
        assert_eq!(log.borrow().len(), 1);
    }

    #[test]
    fn click_outside_collapses_and_is_consumed() {
        let dd = Dropdown::new(["All", "Fire"]).selected(1);
        let (mut tree, id) = in_tree(dd, 10.0);
        tree.widget_mut::<Dropdown>(id).unwrap().toggle();

        let left = tree.handle_input(&UiInput::click(Vec2::new(390.0, 290.0)), VP);
        assert!(left.is_empty());
        let dd = tree.widget::<Dropdown>(id).unwrap();
        assert!(!dd.is_open());
        assert_eq!(dd.selected_index(), 1);
    }

    #[test]
    fn wheel_scrolls_within_bounds() {
        let items: Vec<String> = (0..10).map(|i| format!("item {i}")).collect();
        let dd = Dropdown::new(items).max_visible_items(4);
        let (mut tree, id) = in_tree(dd, 10.0);
        tree.widget_mut::<Dropdown>(id).unwrap().toggle();

        let wheel = UiInput { scroll_delta: 1.0, ..UiInput::default() };
        for _ in 0..20 {
            tree.handle_input(&wheel, VP);
        }
        assert_eq!(tree.widget::<Dropdown>(id).unwrap().scroll_offset(), 6);

        let up = UiInput { scroll_delta: -1.0, ..UiInput::default() };
        tree.handle_input(&up, VP);
        assert_eq!(tree.widget::<Dropdown>(id).unwrap().scroll_offset(), 5);
    }

    #[test]
    fn keyboard_moves_highlight_and_selects() {
        let mut dd = Dropdown::new(["a", "b", "c"]).selected(0);
        let log = recorded(&mut dd);
        let (mut tree, id) = in_tree(dd, 10.0);
        tree.set_focus(Some(id));

        tree.handle_input(&UiInput::key(Key::Enter), VP);
        assert!(tree.widget::<Dropdown>(id).unwrap().is_open());
        tree.handle_input(&UiInput::key(Key::ArrowDown), VP);
        tree.handle_input(&UiInput::key(Key::ArrowDown), VP);
        assert_eq!(tree.widget::<Dropdown>(id).unwrap().highlighted(), Some(2));
        tree.handle_input(&UiInput::key(Key::Enter), VP);

        assert_eq!(tree.widget::<Dropdown>(id).unwrap().selected_index(), 2);
        assert_eq!(log.borrow().len(), 1);
    }

    #[test]
    fn escape_collapses_and_is_consumed() {
        let (mut tree, id) = in_tree(Dropdown::new(["a"]), 10.0);
        tree.widget_mut::<Dropdown>(id).unwrap().toggle();
        let left = tree.handle_input(&UiInput::key(Key::Escape), VP);
        assert!(left.is_empty());
        assert!(!tree.widget::<Dropdown>(id).unwrap().is_open());
    }
}
