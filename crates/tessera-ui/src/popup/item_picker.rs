use std::cell::{Cell, RefCell};
use std::rc::Rc;

use tessera_engine::coords::Vec2;

use super::filter::{CardFilter, FilterSet};
use super::{Payload, PopupCloser, PopupContent, PopupResult};
use crate::tree::{TreeError, WidgetId, WidgetTree};
use crate::widgets::{BrowserLayout, Button, CardFace, CardPageBrowser, Dropdown, Label, TextAlign};

const ROW: f32 = 20.0;
const FILTER_LABEL: f32 = 16.0;
const FILTER_HEIGHT: f32 = 26.0;
const FILTER_WIDTH: f32 = 150.0;
const NAV_WIDTH: f32 = 80.0;
const GAP: f32 = 8.0;

/// Widgets the picker reads back every frame.
#[derive(Clone)]
struct Parts {
    browser: WidgetId,
    filters: Vec<WidgetId>,
    prev: WidgetId,
    next: WidgetId,
    selection: WidgetId,
}

/// A filterable card grid. Clicking a card selects it; OK confirms the
/// selection.
///
/// Each [`CardFilter`] becomes a dropdown; any change re-filters the grid in
/// the same frame. A selection that the filters hide is dropped.
///
/// ```rust,ignore
/// let picker = ItemPickerPopup::new("Choose a starter", catalog.clone(), vec![by_type, by_generation]);
/// let popup = Popup::new("Starter", picker.content_size(), picker)?;
/// ```
pub struct ItemPickerPopup<C> {
    prompt: String,
    cards: Vec<Rc<C>>,
    filters: Vec<CardFilter<C>>,
    layout: BrowserLayout,
    filter_set: FilterSet<C>,
    dirty: Rc<Cell<bool>>,
    nav: Rc<Cell<i32>>,
    selected: Rc<RefCell<Option<Rc<C>>>>,
    parts: Option<Parts>,
}

impl<C: CardFace> ItemPickerPopup<C> {
    pub fn new(prompt: impl Into<String>, cards: Vec<Rc<C>>, filters: Vec<CardFilter<C>>) -> Self {
        let filter_set = FilterSet::new(filters.len());
        Self {
            prompt: prompt.into(),
            cards,
            filters,
            layout: BrowserLayout::default(),
            filter_set,
            dirty: Rc::new(Cell::new(false)),
            nav: Rc::new(Cell::new(0)),
            selected: Rc::new(RefCell::new(None)),
            parts: None,
        }
    }

    pub fn layout(mut self, layout: BrowserLayout) -> Self {
        self.layout = layout;
        self
    }

    fn browser_size(&self) -> Vec2 {
        CardPageBrowser::<C>::new(self.layout).preferred_size()
    }

    fn browser_y(&self) -> f32 {
        if self.filters.is_empty() { ROW + GAP } else { ROW + GAP + FILTER_LABEL + FILTER_HEIGHT + GAP }
    }

    /// Content size that fits the prompt, filters, grid and navigation row.
    pub fn content_size(&self) -> Vec2 {
        let browser = self.browser_size();
        let filters_w = self.filters.len() as f32 * (FILTER_WIDTH + GAP);
        Vec2::new(
            browser.x.max(filters_w).max(NAV_WIDTH * 4.0),
            self.browser_y() + browser.y + GAP + FILTER_HEIGHT,
        )
    }

    /// Recomputes the visible cards from the filter controls and pushes them
    /// into the grid.
    pub fn apply_filters(&mut self, tree: &mut WidgetTree) {
        let Some(parts) = self.parts.clone() else { return };
        for (slot, (filter, &control)) in self.filters.iter().zip(&parts.filters).enumerate() {
            let index = tree.widget::<Dropdown>(control).map_or(-1, Dropdown::selected_index);
            self.filter_set.set(slot, filter.predicate_for(index));
        }
        let visible = self.filter_set.apply(&self.cards);

        let selection_hidden = self
            .selected
            .borrow()
            .as_ref()
            .is_some_and(|s| !visible.iter().any(|c| Rc::ptr_eq(c, s)));
        if selection_hidden {
            *self.selected.borrow_mut() = None;
        }

        log::debug!(
            "picker: {} of {} cards pass {} active filters",
            visible.len(),
            self.cards.len(),
            self.filter_set.active_count()
        );
        if let Some(browser) = tree.widget_mut::<CardPageBrowser<C>>(parts.browser) {
            browser.set_cards(visible);
        }
    }

    fn sync(&self, tree: &mut WidgetTree, parts: &Parts) {
        let selected = self.selected.borrow().clone();
        let (page, pages) = match tree.widget_mut::<CardPageBrowser<C>>(parts.browser) {
            Some(browser) => {
                browser.set_selected(selected.clone());
                (browser.current_page(), browser.page_count())
            }
            None => (0, 0),
        };

        tree.set_visible(parts.prev, pages > 1);
        tree.set_visible(parts.next, pages > 1);
        if let Some(prev) = tree.widget_mut::<Button>(parts.prev) {
            prev.set_enabled(page > 0);
        }
        if let Some(next) = tree.widget_mut::<Button>(parts.next) {
            next.set_enabled(page + 1 < pages);
        }
        if let Some(label) = tree.widget_mut::<Label>(parts.selection) {
            match &selected {
                Some(card) => label.set_text(format!("Selected: {}", card.label())),
                None if pages == 0 => label.set_text("No cards match"),
                None => label.set_text("No card selected"),
            }
        }
    }
}

impl<C: CardFace> PopupContent<C> for ItemPickerPopup<C> {
    fn build_content(&mut self, tree: &mut WidgetTree, panel: WidgetId, _closer: &PopupCloser) -> Result<(), TreeError> {
        let width = tree.size(panel).map_or_else(|| self.content_size().x, |s| s.x);
        tree.insert_child(panel, "prompt", Vec2::zero(), Vec2::new(width, ROW), Label::new(self.prompt.as_str()))?;

        let mut filters = Vec::with_capacity(self.filters.len());
        for (i, filter) in self.filters.iter().enumerate() {
            let x = i as f32 * (FILTER_WIDTH + GAP);
            tree.insert_child(
                panel,
                format!("filter_label_{i}"),
                Vec2::new(x, ROW + GAP),
                Vec2::new(FILTER_WIDTH, FILTER_LABEL),
                Label::new(filter.label()).size(12.0),
            )?;
            let dirty = Rc::clone(&self.dirty);
            let dropdown = Dropdown::new(filter.dropdown_items())
                .selected(0)
                .on_change(move |_| dirty.set(true));
            filters.push(tree.insert_child(
                panel,
                format!("filter_{i}"),
                Vec2::new(x, ROW + GAP + FILTER_LABEL),
                Vec2::new(FILTER_WIDTH, FILTER_HEIGHT),
                dropdown,
            )?);
        }

        let selected = Rc::clone(&self.selected);
        let mut browser = CardPageBrowser::<C>::new(self.layout).on_card_click(move |card| {
            log::debug!("picker: selected `{}`", card.label());
            *selected.borrow_mut() = Some(Rc::clone(card));
        });
        browser.set_cards(self.cards.iter().cloned());
        let browser_size = browser.preferred_size();
        let browser_y = self.browser_y();
        let browser = tree.insert_child(panel, "browser", Vec2::new(0.0, browser_y), browser_size, browser)?;

        let nav_y = browser_y + browser_size.y + GAP;
        let step = Rc::clone(&self.nav);
        let prev = tree.insert_child(
            panel,
            "prev",
            Vec2::new(0.0, nav_y),
            Vec2::new(NAV_WIDTH, FILTER_HEIGHT),
            Button::new("‹ Prev").on_click(move || step.set(step.get() - 1)),
        )?;
        let step = Rc::clone(&self.nav);
        let next = tree.insert_child(
            panel,
            "next",
            Vec2::new(width - NAV_WIDTH, nav_y),
            Vec2::new(NAV_WIDTH, FILTER_HEIGHT),
            Button::new("Next ›").on_click(move || step.set(step.get() + 1)),
        )?;
        let selection = tree.insert_child(
            panel,
            "selection",
            Vec2::new(NAV_WIDTH + GAP, nav_y),
            Vec2::new((width - 2.0 * (NAV_WIDTH + GAP)).max(0.0), FILTER_HEIGHT),
            Label::new("").align(TextAlign::Center),
        )?;

        let parts = Parts { browser, filters, prev, next, selection };
        self.sync(tree, &parts);
        self.parts = Some(parts);
        Ok(())
    }

    fn update(&mut self, tree: &mut WidgetTree) {
        let Some(parts) = self.parts.clone() else { return };
        if self.dirty.replace(false) {
            self.apply_filters(tree);
        }
        let step = self.nav.replace(0);
        if step != 0 {
            if let Some(browser) = tree.widget_mut::<CardPageBrowser<C>>(parts.browser) {
                if step > 0 {
                    browser.next_page();
                } else {
                    browser.prev_page();
                }
            }
        }
        self.sync(tree, &parts);
    }

    fn build_result(&mut self, _tree: &WidgetTree, confirmed: bool) -> PopupResult<C> {
        match (confirmed, self.selected.borrow().clone()) {
            (true, Some(card)) => PopupResult::confirmed(Payload::Card(card)),
            (true, None) => PopupResult::confirmed(Payload::None),
            (false, _) => PopupResult::cancelled(),
        }
    }
}

#[cfg(test)]
mod tests {
    use tessera_engine::coords::Viewport;
    use tessera_engine::time::FrameTime;

    use super::*;
    use crate::event::UiInput;
    use crate::popup::Popup;

    #[derive(Debug)]
    struct Mon {
        name: String,
        kind: &'static str,
    }

    impl CardFace for Mon {
        fn label(&self) -> &str {
            &self.name
        }
    }

    fn pool(n: usize) -> Vec<Rc<Mon>> {
        (0..n)
            .map(|i| Rc::new(Mon { name: format!("mon {i}"), kind: if i % 3 == 0 { "Water" } else { "Fire" } }))
            .collect()
    }

    const VP: Viewport = Viewport::new(1024.0, 768.0);

    fn t() -> FrameTime {
        FrameTime::fixed(1, 0.016)
    }

    fn open(cards: &[Rc<Mon>]) -> Popup<Mon> {
        let kinds = CardFilter::by_key("Type", cards, |m: &Mon| m.kind.to_owned());
        let picker = ItemPickerPopup::new("Pick one", cards.to_vec(), vec![kinds]);
        let mut popup = Popup::new("Picker", picker.content_size(), picker).unwrap();
        popup.mark_open();
        popup.update(&t(), None, VP);
        popup
    }

    fn browser(popup: &Popup<Mon>) -> &CardPageBrowser<Mon> {
        let id = popup.tree().find_path("frame/content/browser").unwrap();
        popup.tree().widget::<CardPageBrowser<Mon>>(id).unwrap()
    }

    fn click(popup: &mut Popup<Mon>, pos: Vec2) {
        popup.update(&t(), Some(&UiInput::click(pos)), VP);
    }

    fn first_tile(popup: &Popup<Mon>) -> Vec2 {
        let origin = popup.rect_of("frame/content/browser").unwrap().origin;
        origin + Vec2::splat(10.0)
    }

    #[test]
    fn nav_buttons_hidden_for_single_page() {
        let popup = open(&pool(5));
        let prev = popup.tree().find_path("frame/content/prev").unwrap();
        assert!(!popup.tree().is_visible(prev));
        assert_eq!(browser(&popup).page_count(), 1);
    }

    #[test]
    fn next_button_pages_forward() {
        let mut popup = open(&pool(12));
        let next = popup.rect_of("frame/content/next").unwrap().center();
        click(&mut popup, next);
        assert_eq!(browser(&popup).current_page(), 1);
        let next_id = popup.tree().find_path("frame/content/next").unwrap();
        assert!(!popup.tree().widget::<Button>(next_id).unwrap().is_enabled());
    }

    #[test]
    fn filter_change_reapplies_in_same_frame() {
        let cards = pool(6);
        let mut popup = open(&cards);

        // Open the type filter and pick its third row ("Fire").
        let control = popup.rect_of("frame/content/filter_0").unwrap();
        click(&mut popup, control.center());
        click(&mut popup, Vec2::new(control.center().x, control.max().y + 2.5 * 24.0));

        let b = browser(&popup);
        assert_eq!(b.filtered().len(), 4);
        assert!(b.filtered().iter().all(|c| c.kind == "Fire"));
    }

    #[test]
    fn hidden_selection_is_dropped() {
        let cards = pool(6);
        let mut popup = open(&cards);

        // cards[0] is Water; select it, then filter to Fire.
        let tile = first_tile(&popup);
        click(&mut popup, tile);
        let control = popup.rect_of("frame/content/filter_0").unwrap();
        click(&mut popup, control.center());
        click(&mut popup, Vec2::new(control.center().x, control.max().y + 2.5 * 24.0));

        assert!(browser(&popup).selected().is_none());
        let ok = popup.rect_of("frame/ok").unwrap().center();
        click(&mut popup, ok);
        let result = popup.close();
        assert!(result.confirmed);
        assert!(result.selected_card().is_none());
    }

    #[test]
    fn confirm_returns_clicked_card() {
        let cards = pool(3);
        let mut popup = open(&cards);
        let tile = first_tile(&popup);
        click(&mut popup, tile);
        let ok = popup.rect_of("frame/ok").unwrap().center();
        click(&mut popup, ok);
        let result = popup.close();
        assert!(result.selected_card().is_some_and(|c| Rc::ptr_eq(c, &cards[0])));
    }
}
