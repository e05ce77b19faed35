//! Paginated card grid.
//!
//! The browser owns a fixed pool of tile slots, one per grid cell. Paging
//! never allocates: it rebinds the pool to the next window of the filtered
//! list and leaves trailing slots empty.

use std::rc::Rc;

use tessera_engine::coords::{Rect, Vec2};
use tessera_engine::input::Key;
use tessera_engine::paint::{Border, Color};

use crate::event::{EventCtx, EventResult, UiEvent};
use crate::painter::Painter;
use crate::signal::Signal;
use crate::widget::Widget;

/// What a catalog entry shows on its tile.
pub trait CardFace: 'static {
    fn label(&self) -> &str;

    /// Secondary line under the label.
    fn caption(&self) -> String {
        String::new()
    }

    fn tint(&self) -> Color {
        Color::from_straight(0.14, 0.18, 0.26, 1.0)
    }
}

/// Grid geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BrowserLayout {
    pub columns: usize,
    pub rows: usize,
    /// Unscaled tile size.
    pub card_size: Vec2,
    pub card_scale: f32,
    /// Gap between tiles: `x` between columns, `y` between rows.
    pub spacing: Vec2,
}

impl Default for BrowserLayout {
    fn default() -> Self {
        Self { columns: 4, rows: 2, card_size: Vec2::new(96.0, 128.0), card_scale: 1.0, spacing: Vec2::splat(8.0) }
    }
}

impl BrowserLayout {
    #[inline]
    pub fn capacity(&self) -> usize {
        self.columns * self.rows
    }

    #[inline]
    pub fn tile_size(&self) -> Vec2 {
        self.card_size * self.card_scale
    }

    /// Distance between the origins of adjacent tiles.
    #[inline]
    pub fn stride(&self) -> Vec2 {
        self.tile_size() + self.spacing
    }

    /// Size covered by the tiles, without trailing spacing.
    pub fn grid_size(&self) -> Vec2 {
        let tile = self.tile_size();
        let n = |count: usize, extent: f32, gap: f32| {
            if count == 0 { 0.0 } else { count as f32 * extent + (count - 1) as f32 * gap }
        };
        Vec2::new(n(self.columns, tile.x, self.spacing.x), n(self.rows, tile.y, self.spacing.y))
    }
}

/// A reusable grid cell: fixed offset, rebound card.
///
/// Slots are not tree nodes. Their offset is relative to the browser node's
/// resolved rect, which the tree passes to `paint` and `on_event` every
/// frame, so tiles follow the browser's anchor chain without being anchors
/// themselves and rebinding a page never touches the tree.
#[derive(Debug)]
pub struct TileSlot<C> {
    offset: Vec2,
    card: Option<Rc<C>>,
}

impl<C> TileSlot<C> {
    /// Offset from the browser's origin.
    #[inline]
    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    #[inline]
    pub fn card(&self) -> Option<&Rc<C>> {
        self.card.as_ref()
    }

    #[inline]
    pub fn is_bound(&self) -> bool {
        self.card.is_some()
    }
}

/// A filtered, paginated grid of cards.
///
/// Cards are shared `Rc` handles into the caller's catalog; the browser never
/// mutates or copies them, and card identity is pointer identity.
///
/// # Example
/// ```rust,ignore
/// let mut browser = CardPageBrowser::new(BrowserLayout { columns: 5, ..Default::default() })
///     .on_card_click(move |card| picked.set(Some(Rc::clone(card))));
/// browser.set_cards(catalog.iter().cloned());
/// ```
pub struct CardPageBrowser<C> {
    layout: BrowserLayout,
    slots: Vec<TileSlot<C>>,
    source: Vec<Rc<C>>,
    filtered: Vec<Rc<C>>,
    page: usize,
    selected: Option<Rc<C>>,
    indicator_height: f32,
    font_size: f32,
    text_color: Color,
    hover_border: Border,
    selected_border: Border,
    corner_radius: f32,
    /// Raised with the bound card when a bound tile is clicked.
    pub card_clicked: Signal<Rc<C>>,
    /// Raised with the new page index after a page change.
    pub page_changed: Signal<usize>,
}

impl<C: CardFace> CardPageBrowser<C> {
    pub fn new(layout: BrowserLayout) -> Self {
        let mut browser = Self {
            layout,
            slots: Vec::new(),
            source: Vec::new(),
            filtered: Vec::new(),
            page: 0,
            selected: None,
            indicator_height: 20.0,
            font_size: 13.0,
            text_color: Color::from_straight(0.9, 0.92, 0.95, 1.0),
            hover_border: Border::new(1.0, Color::from_straight(0.5, 0.6, 0.75, 1.0)),
            selected_border: Border::new(2.0, Color::from_straight(1.0, 0.8, 0.2, 1.0)),
            corner_radius: 6.0,
            card_clicked: Signal::new(),
            page_changed: Signal::new(),
        };
        browser.build_layout();
        browser
    }

    pub fn font_size(mut self, v: f32) -> Self {
        self.font_size = v;
        self
    }

    pub fn text_color(mut self, v: Color) -> Self {
        self.text_color = v;
        self
    }

    pub fn selected_border(mut self, v: Border) -> Self {
        self.selected_border = v;
        self
    }

    pub fn on_card_click(mut self, mut f: impl FnMut(&Rc<C>) + 'static) -> Self {
        self.card_clicked.connect(move |card| f(card));
        self
    }

    /// Allocates one slot per grid cell. Only the first call has any effect.
    pub fn build_layout(&mut self) {
        if !self.slots.is_empty() {
            log::debug!("browser: layout already built");
            return;
        }
        if self.layout.capacity() == 0 {
            log::warn!("browser: empty grid ({}x{})", self.layout.columns, self.layout.rows);
            return;
        }
        let stride = self.layout.stride();
        self.slots = (0..self.layout.rows)
            .flat_map(|row| (0..self.layout.columns).map(move |col| (col, row)))
            .map(|(col, row)| TileSlot {
                offset: Vec2::new(col as f32 * stride.x, row as f32 * stride.y),
                card: None,
            })
            .collect();
    }

    #[inline]
    pub fn layout(&self) -> &BrowserLayout {
        &self.layout
    }

    /// Grid plus page indicator.
    pub fn preferred_size(&self) -> Vec2 {
        self.layout.grid_size() + Vec2::new(0.0, self.indicator_height + self.layout.spacing.y)
    }

    // ── cards ─────────────────────────────────────────────────────────────

    /// Replaces the cards shown, unfiltered, and returns to the first page.
    pub fn set_cards(&mut self, cards: impl IntoIterator<Item = Rc<C>>) {
        self.source = cards.into_iter().collect();
        self.filtered = self.source.clone();
        self.page = 0;
        self.rebind();
        log::debug!("browser: {} cards, {} pages", self.filtered.len(), self.page_count());
    }

    #[inline]
    pub fn source(&self) -> &[Rc<C>] {
        &self.source
    }

    #[inline]
    pub fn filtered(&self) -> &[Rc<C>] {
        &self.filtered
    }

    #[inline]
    pub fn slots(&self) -> &[TileSlot<C>] {
        &self.slots
    }

    /// Cards currently bound to slots, in slot order.
    pub fn visible_cards(&self) -> Vec<Rc<C>> {
        self.slots.iter().filter_map(|s| s.card.clone()).collect()
    }

    #[inline]
    pub fn selected(&self) -> Option<&Rc<C>> {
        self.selected.as_ref()
    }

    pub fn set_selected(&mut self, card: Option<Rc<C>>) {
        self.selected = card;
    }

    // ── paging ────────────────────────────────────────────────────────────

    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn page_count(&self) -> usize {
        match self.capacity() {
            0 => 0,
            cap => self.filtered.len().div_ceil(cap),
        }
    }

    #[inline]
    pub fn current_page(&self) -> usize {
        self.page
    }

    /// Jumps to `page`, clamped to the valid range. Returns whether the page changed.
    pub fn set_page(&mut self, page: usize) -> bool {
        let clamped = page.min(self.page_count().saturating_sub(1));
        if clamped == self.page {
            return false;
        }
        self.page = clamped;
        self.rebind();
        log::debug!("browser: page {} / {}", self.page + 1, self.page_count());
        self.page_changed.emit(&self.page);
        true
    }

    pub fn next_page(&mut self) -> bool {
        self.set_page(self.page + 1)
    }

    pub fn prev_page(&mut self) -> bool {
        self.set_page(self.page.saturating_sub(1))
    }

    fn rebind(&mut self) {
        let cap = self.capacity();
        let start = (self.page * cap).min(self.filtered.len());
        let mut window = self.filtered[start..].iter().take(cap);
        for slot in &mut self.slots {
            slot.card = window.next().cloned();
        }
    }

    fn tile_rect(&self, origin: Vec2, slot: &TileSlot<C>) -> Rect {
        Rect::from_origin_size(origin + slot.offset, self.layout.tile_size())
    }

    fn bound_slot_at(&self, origin: Vec2, pos: Vec2) -> Option<Rc<C>> {
        self.slots
            .iter()
            .filter(|s| s.is_bound())
            .find(|s| self.tile_rect(origin, s).contains(pos))
            .and_then(|s| s.card.clone())
    }

    fn indicator_text(&self) -> String {
        match self.page_count() {
            0 => "0 / 0".to_owned(),
            n => format!("{} / {}", self.page + 1, n),
        }
    }
}

impl<C: CardFace> Widget for CardPageBrowser<C> {
    fn paint(&self, painter: &mut Painter, rect: Rect) {
        for slot in self.slots.iter().filter(|s| s.is_bound()) {
            let Some(card) = &slot.card else { continue };
            let tile = self.tile_rect(rect.origin, slot);
            let is_selected = self.selected.as_ref().is_some_and(|s| Rc::ptr_eq(s, card));
            let border = if is_selected {
                Some(self.selected_border)
            } else if painter.is_hovered(tile) {
                Some(self.hover_border)
            } else {
                None
            };
            painter.fill_rounded_rect(tile, self.corner_radius, card.tint(), border);

            let line = self.font_size + 4.0;
            let label = Rect::new(tile.origin.x, tile.origin.y + 6.0, tile.size.x, line);
            painter.text_centered(card.label(), self.font_size, self.text_color, label);
            let caption = card.caption();
            if !caption.is_empty() {
                let below = label.translate(Vec2::new(0.0, line));
                painter.text_centered(&caption, self.font_size * 0.85, self.text_color.with_alpha(0.7), below);
            }
        }

        let grid = self.layout.grid_size();
        let indicator = Rect::new(
            rect.origin.x,
            rect.origin.y + grid.y + self.layout.spacing.y,
            grid.x.max(rect.size.x),
            self.indicator_height,
        );
        painter.text_centered(&self.indicator_text(), self.font_size, self.text_color.with_alpha(0.8), indicator);
    }

    fn on_event(&mut self, event: &UiEvent, rect: Rect, ctx: &mut EventCtx<'_>) -> EventResult {
        match event {
            UiEvent::Click { pos } => match self.bound_slot_at(rect.origin, *pos) {
                Some(card) => {
                    self.selected = Some(Rc::clone(&card));
                    self.card_clicked.emit(&card);
                    EventResult::Consumed
                }
                None => EventResult::Ignored,
            },
            UiEvent::ScrollWheel { delta } => {
                if *delta > 0.0 {
                    self.next_page();
                } else {
                    self.prev_page();
                }
                EventResult::Consumed
            }
            UiEvent::KeyPress { key: key @ (Key::PageUp | Key::PageDown) } if rect.contains(ctx.pointer) => {
                if *key == Key::PageDown {
                    self.next_page();
                } else {
                    self.prev_page();
                }
                EventResult::Consumed
            }
            _ => EventResult::Ignored,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use tessera_engine::coords::Viewport;

    use super::*;
    use crate::event::UiInput;
    use crate::tree::{WidgetId, WidgetTree};

    #[derive(Debug)]
    struct Card(String);

    impl CardFace for Card {
        fn label(&self) -> &str {
            &self.0
        }
    }

    fn deck(n: usize) -> Vec<Rc<Card>> {
        (0..n).map(|i| Rc::new(Card(format!("card {i}")))).collect()
    }

    fn small_layout() -> BrowserLayout {
        BrowserLayout { columns: 4, rows: 2, card_size: Vec2::new(50.0, 60.0), card_scale: 1.0, spacing: Vec2::splat(10.0) }
    }

    // ── layout ────────────────────────────────────────────────────────────

    #[test]
    fn build_layout_allocates_once_with_stride() {
        let mut b: CardPageBrowser<Card> = CardPageBrowser::new(small_layout());
        b.build_layout();
        assert_eq!(b.capacity(), 8);
        assert_eq!(b.slots()[1].offset(), Vec2::new(60.0, 0.0));
        assert_eq!(b.slots()[5].offset(), Vec2::new(60.0, 70.0));
        assert_eq!(small_layout().grid_size(), Vec2::new(230.0, 130.0));
    }

    #[test]
    fn card_scale_affects_stride() {
        let layout = BrowserLayout { card_scale: 2.0, ..small_layout() };
        let b: CardPageBrowser<Card> = CardPageBrowser::new(layout);
        assert_eq!(b.slots()[1].offset(), Vec2::new(110.0, 0.0));
    }

    #[test]
    fn spacing_is_per_axis() {
        let layout = BrowserLayout { spacing: Vec2::new(4.0, 20.0), ..small_layout() };
        let b: CardPageBrowser<Card> = CardPageBrowser::new(layout);
        assert_eq!(layout.stride(), Vec2::new(54.0, 80.0));
        assert_eq!(b.slots()[5].offset(), Vec2::new(54.0, 80.0));
        assert_eq!(layout.grid_size(), Vec2::new(4.0 * 50.0 + 3.0 * 4.0, 2.0 * 60.0 + 20.0));
        assert_eq!(b.preferred_size().y, layout.grid_size().y + 20.0 + 20.0);
    }

    #[test]
    fn empty_grid_allocates_nothing() {
        let layout = BrowserLayout { columns: 0, ..small_layout() };
        let mut b = CardPageBrowser::new(layout);
        b.build_layout();
        b.set_cards(deck(3));
        assert!(b.slots().is_empty());
        assert_eq!(b.page_count(), 0);
        assert!(b.visible_cards().is_empty());
    }

    // ── paging ────────────────────────────────────────────────────────────

    #[test]
    fn set_cards_binds_first_page() {
        let cards = deck(3);
        let mut b = CardPageBrowser::new(small_layout());
        b.set_cards(cards.iter().cloned());

        assert_eq!(b.filtered().len(), 3);
        assert!(b.filtered().iter().zip(&cards).all(|(a, b)| Rc::ptr_eq(a, b)));
        assert_eq!(b.page_count(), 1);
        assert_eq!(b.slots().iter().filter(|s| s.is_bound()).count(), 3);
    }

    #[test]
    fn final_page_is_partial_and_navigation_clamps() {
        let cards = deck(10);
        let mut b = CardPageBrowser::new(small_layout());
        b.set_cards(cards.iter().cloned());
        assert_eq!(b.page_count(), 2);

        assert!(b.next_page());
        assert!(!b.next_page());
        assert_eq!(b.current_page(), 1);
        let visible = b.visible_cards();
        assert_eq!(visible.len(), 2);
        assert!(Rc::ptr_eq(&visible[0], &cards[8]));

        assert!(b.set_page(0));
        assert!(!b.prev_page());
        assert!(b.set_page(99));
        assert_eq!(b.current_page(), 1);
    }

    #[test]
    fn divisible_count_fills_last_page() {
        let mut b = CardPageBrowser::new(small_layout());
        b.set_cards(deck(16));
        b.set_page(1);
        assert_eq!(b.page_count(), 2);
        assert_eq!(b.visible_cards().len(), 8);
    }

    #[test]
    fn empty_list_has_no_pages_or_bindings() {
        let mut b = CardPageBrowser::new(small_layout());
        b.set_cards(deck(5));
        b.set_cards(Vec::new());
        assert_eq!(b.page_count(), 0);
        assert_eq!(b.current_page(), 0);
        assert!(!b.next_page());
        assert!(b.slots().iter().all(|s| !s.is_bound()));
    }

    // ── input ─────────────────────────────────────────────────────────────

    fn in_tree(cards: &[Rc<Card>]) -> (WidgetTree, WidgetId, Rc<RefCell<Vec<Rc<Card>>>>) {
        let clicks = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&clicks);
        let mut b = CardPageBrowser::new(small_layout()).on_card_click(move |c| sink.borrow_mut().push(Rc::clone(c)));
        b.set_cards(cards.iter().cloned());
        let size = b.preferred_size();
        let mut tree = WidgetTree::new();
        let id = tree.insert_root("browser", Vec2::new(100.0, 100.0), size, b).unwrap();
        (tree, id, clicks)
    }

    const VP: Viewport = Viewport::new(800.0, 600.0);

    #[test]
    fn click_bound_tile_notifies_once() {
        let cards = deck(3);
        let (mut tree, id, clicks) = in_tree(&cards);

        // Second tile spans x 160..210.
        tree.handle_input(&UiInput::click(Vec2::new(170.0, 120.0)), VP);
        assert_eq!(clicks.borrow().len(), 1);
        assert!(Rc::ptr_eq(&clicks.borrow()[0], &cards[1]));
        let selected = tree.widget::<CardPageBrowser<Card>>(id).unwrap().selected().cloned();
        assert!(selected.is_some_and(|s| Rc::ptr_eq(&s, &cards[1])));
    }

    #[test]
    fn tiles_follow_the_browser_when_it_moves() {
        let cards = deck(3);
        let (mut tree, id, clicks) = in_tree(&cards);
        tree.set_offset(id, Vec2::new(300.0, 200.0));

        // The old spot of the first tile is now empty space.
        tree.handle_input(&UiInput::click(Vec2::new(110.0, 110.0)), VP);
        assert!(clicks.borrow().is_empty());

        tree.handle_input(&UiInput::click(Vec2::new(310.0, 210.0)), VP);
        assert!(clicks.borrow().first().is_some_and(|c| Rc::ptr_eq(c, &cards[0])));
    }

    #[test]
    fn click_unbound_tile_is_silent() {
        let cards = deck(3);
        let (mut tree, _, clicks) = in_tree(&cards);
        // Fourth tile (index 3) is unbound.
        let left = tree.handle_input(&UiInput::click(Vec2::new(290.0, 120.0)), VP);
        assert_eq!(left.len(), 1);
        assert!(clicks.borrow().is_empty());
    }

    #[test]
    fn wheel_and_page_keys_page_while_hovered() {
        let cards = deck(20);
        let (mut tree, id, _) = in_tree(&cards);
        let over = Vec2::new(120.0, 120.0);

        tree.handle_input(&UiInput { mouse_pos: over, scroll_delta: 1.0, ..UiInput::default() }, VP);
        assert_eq!(tree.widget::<CardPageBrowser<Card>>(id).unwrap().current_page(), 1);

        tree.handle_input(&UiInput { mouse_pos: over, keys_pressed: vec![Key::PageDown], ..UiInput::default() }, VP);
        assert_eq!(tree.widget::<CardPageBrowser<Card>>(id).unwrap().current_page(), 2);

        // Not hovered: ignored.
        let away = UiInput { mouse_pos: Vec2::new(5.0, 5.0), keys_pressed: vec![Key::PageUp], ..UiInput::default() };
        assert_eq!(tree.handle_input(&away, VP).len(), 1);
        assert_eq!(tree.widget::<CardPageBrowser<Card>>(id).unwrap().current_page(), 2);
    }
}
