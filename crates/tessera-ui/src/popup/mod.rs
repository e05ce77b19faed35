//! Modal popups.
//!
//! A [`Popup`] runs a fixed lifecycle:
//!
//! 1. **Building**: the constructor lays out the frame (title bar, content
//!    panel, OK / Cancel) and calls [`PopupContent::build_content`] once.
//! 2. **Open**: [`ModalStack::open`] pushes it; only the top popup gets input.
//! 3. **Confirmed / Cancelled**: OK, Cancel, Escape or a content control asks
//!    to close through the [`PopupCloser`]; [`PopupContent::build_result`]
//!    runs exactly once.
//! 4. **Closed**: the stack pops it, drops its widgets and hands the
//!    [`PopupResult`] to the continuation registered at open time.

mod dropdown_select;
pub mod filter;
mod item_picker;
mod stack;
mod text_input;

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use tessera_engine::coords::{Rect, Vec2, Viewport};
use tessera_engine::input::Key;
use tessera_engine::paint::{Border, Color};
use tessera_engine::time::FrameTime;

use crate::event::{UiEvent, UiInput};
use crate::painter::Painter;
use crate::tree::{TreeError, WidgetId, WidgetTree};
use crate::widgets::{Button, Label, Panel};

pub use dropdown_select::DropdownSelectPopup;
pub use filter::{CardFilter, FilterSet, Predicate};
pub use item_picker::ItemPickerPopup;
pub use stack::ModalStack;
pub use text_input::TextInputPopup;

static NEXT_POPUP_ID: AtomicU64 = AtomicU64::new(1);

// ── PopupId ───────────────────────────────────────────────────────────────

/// Unique identifier for a popup instance.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct PopupId(u64);

impl PopupId {
    fn next() -> Self {
        PopupId(NEXT_POPUP_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for PopupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "popup#{}", self.0)
    }
}

// ── state & results ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PopupState {
    Building,
    Open,
    Confirmed,
    Cancelled,
    Closed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseAction {
    Confirm,
    Cancel,
}

/// What a popup hands back besides the confirmation flag.
#[derive(Debug)]
pub enum Payload<C> {
    None,
    Card(Rc<C>),
    Indexed { index: usize, item: String },
    Text(String),
}

impl<C> Clone for Payload<C> {
    fn clone(&self) -> Self {
        match self {
            Payload::None => Payload::None,
            Payload::Card(c) => Payload::Card(Rc::clone(c)),
            Payload::Indexed { index, item } => Payload::Indexed { index: *index, item: item.clone() },
            Payload::Text(t) => Payload::Text(t.clone()),
        }
    }
}

/// The single result a popup produces.
#[derive(Debug)]
pub struct PopupResult<C> {
    pub confirmed: bool,
    pub payload: Payload<C>,
}

impl<C> Clone for PopupResult<C> {
    fn clone(&self) -> Self {
        Self { confirmed: self.confirmed, payload: self.payload.clone() }
    }
}

impl<C> PopupResult<C> {
    pub fn confirmed(payload: Payload<C>) -> Self {
        Self { confirmed: true, payload }
    }

    pub fn cancelled() -> Self {
        Self { confirmed: false, payload: Payload::None }
    }

    pub fn selected_card(&self) -> Option<&Rc<C>> {
        match &self.payload {
            Payload::Card(c) => Some(c),
            _ => None,
        }
    }

    /// `-1` unless the payload is indexed.
    pub fn selected_index(&self) -> i32 {
        match &self.payload {
            Payload::Indexed { index, .. } => *index as i32,
            _ => -1,
        }
    }

    pub fn selected_item(&self) -> Option<&str> {
        match &self.payload {
            Payload::Indexed { item, .. } => Some(item),
            _ => None,
        }
    }

    pub fn text(&self) -> Option<&str> {
        match &self.payload {
            Payload::Text(t) => Some(t),
            _ => None,
        }
    }
}

// ── closer ────────────────────────────────────────────────────────────────

/// Handle that content controls capture to ask their popup to close.
///
/// Requests are applied at the end of the popup's update; the first request
/// of a frame wins.
#[derive(Debug, Clone, Default)]
pub struct PopupCloser(Rc<Cell<Option<CloseAction>>>);

impl PopupCloser {
    pub fn request(&self, action: CloseAction) {
        if self.0.get().is_none() {
            self.0.set(Some(action));
        }
    }

    pub fn confirm(&self) {
        self.request(CloseAction::Confirm);
    }

    pub fn cancel(&self) {
        self.request(CloseAction::Cancel);
    }

    #[inline]
    pub fn pending(&self) -> Option<CloseAction> {
        self.0.get()
    }

    fn take(&self) -> Option<CloseAction> {
        self.0.take()
    }
}

// ── content hooks ─────────────────────────────────────────────────────────

/// The content-specific half of a popup.
pub trait PopupContent<C> {
    /// Builds the controls under `panel`, anchored to it. Called exactly once.
    fn build_content(&mut self, tree: &mut WidgetTree, panel: WidgetId, closer: &PopupCloser) -> Result<(), TreeError>;

    /// Per-frame hook, after input has been routed.
    fn update(&mut self, _tree: &mut WidgetTree) {}

    /// Reads the controls into a result. Called exactly once, on close.
    fn build_result(&mut self, tree: &WidgetTree, confirmed: bool) -> PopupResult<C>;
}

// ── style ─────────────────────────────────────────────────────────────────

/// Frame look shared by every popup.
#[derive(Debug, Clone)]
pub struct PopupStyle {
    pub title_height: f32,
    pub padding: f32,
    pub button_size: Vec2,
    pub button_spacing: f32,
    pub title_size: f32,
    pub frame_bg: Color,
    pub title_bg: Color,
    pub title_color: Color,
    pub border: Border,
    pub corner_radius: f32,
    pub ok_label: String,
    pub cancel_label: String,
    pub ok_bg: Color,
    pub cancel_bg: Color,
}

impl Default for PopupStyle {
    fn default() -> Self {
        Self {
            title_height: 32.0,
            padding: 12.0,
            button_size: Vec2::new(88.0, 30.0),
            button_spacing: 8.0,
            title_size: 15.0,
            frame_bg: Color::from_straight(0.1, 0.12, 0.17, 1.0),
            title_bg: Color::from_straight(0.14, 0.17, 0.24, 1.0),
            title_color: Color::white(),
            border: Border::new(1.0, Color::from_straight(0.25, 0.3, 0.4, 1.0)),
            corner_radius: 8.0,
            ok_label: "OK".to_owned(),
            cancel_label: "Cancel".to_owned(),
            ok_bg: Color::from_straight(0.0, 0.45, 0.8, 1.0),
            cancel_bg: Color::from_straight(0.22, 0.25, 0.32, 1.0),
        }
    }
}

impl PopupStyle {
    /// Outer frame size for a given content size.
    pub fn frame_size(&self, content: Vec2) -> Vec2 {
        Vec2::new(
            content.x + self.padding * 2.0,
            self.title_height + content.y + self.button_size.y + self.padding * 3.0,
        )
    }
}

// ── popup ─────────────────────────────────────────────────────────────────

/// A modal unit with its own widget tree.
pub struct Popup<C> {
    id: PopupId,
    title: String,
    content_size: Vec2,
    tree: WidgetTree,
    frame: WidgetId,
    content: WidgetId,
    state: PopupState,
    hooks: Box<dyn PopupContent<C>>,
    closer: PopupCloser,
    result: Option<PopupResult<C>>,
}

impl<C: 'static> Popup<C> {
    pub fn new(
        title: impl Into<String>,
        content_size: Vec2,
        hooks: impl PopupContent<C> + 'static,
    ) -> Result<Self, TreeError> {
        Self::with_style(title, content_size, PopupStyle::default(), hooks)
    }

    pub fn with_style(
        title: impl Into<String>,
        content_size: Vec2,
        style: PopupStyle,
        hooks: impl PopupContent<C> + 'static,
    ) -> Result<Self, TreeError> {
        let title = title.into();
        let id = PopupId::next();
        let closer = PopupCloser::default();
        let size = style.frame_size(content_size);
        let pad = style.padding;

        let mut tree = WidgetTree::new();
        let frame = tree.insert_root(
            "frame",
            Vec2::zero(),
            size,
            Panel::new().background(style.frame_bg).border(style.border).corner_radius(style.corner_radius),
        )?;

        let bar = tree.insert_child(
            frame,
            "title",
            Vec2::zero(),
            Vec2::new(size.x, style.title_height),
            Panel::new().background(style.title_bg).corner_radius(style.corner_radius),
        )?;
        tree.insert_child(
            bar,
            "text",
            Vec2::new(pad, 0.0),
            Vec2::new(size.x - pad * 2.0, style.title_height),
            Label::new(title.as_str()).size(style.title_size).color(style.title_color),
        )?;

        let content = tree.insert_child(
            frame,
            "content",
            Vec2::new(pad, style.title_height + pad),
            content_size,
            Panel::new(),
        )?;

        let buttons_y = size.y - pad - style.button_size.y;
        let cancel_x = size.x - pad - style.button_size.x;
        let ok_x = cancel_x - style.button_spacing - style.button_size.x;
        let on_ok = closer.clone();
        tree.insert_child(
            frame,
            "ok",
            Vec2::new(ok_x, buttons_y),
            style.button_size,
            Button::new(style.ok_label.as_str()).background(style.ok_bg).hover_background(style.ok_bg.lighten(0.1)).on_click(move || on_ok.confirm()),
        )?;
        let on_cancel = closer.clone();
        tree.insert_child(
            frame,
            "cancel",
            Vec2::new(cancel_x, buttons_y),
            style.button_size,
            Button::new(style.cancel_label.as_str()).background(style.cancel_bg).hover_background(style.cancel_bg.lighten(0.1)).on_click(move || on_cancel.cancel()),
        )?;

        let mut hooks = hooks;
        hooks.build_content(&mut tree, content, &closer)?;
        log::debug!("{id} `{title}` built ({} widgets)", tree.len());

        Ok(Self {
            id,
            title,
            content_size,
            tree,
            frame,
            content,
            state: PopupState::Building,
            hooks: Box::new(hooks),
            closer,
            result: None,
        })
    }

    #[inline]
    pub fn id(&self) -> PopupId {
        self.id
    }

    #[inline]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[inline]
    pub fn state(&self) -> PopupState {
        self.state
    }

    #[inline]
    pub fn content_size(&self) -> Vec2 {
        self.content_size
    }

    #[inline]
    pub fn tree(&self) -> &WidgetTree {
        &self.tree
    }

    #[inline]
    pub fn tree_mut(&mut self) -> &mut WidgetTree {
        &mut self.tree
    }

    #[inline]
    pub fn content_panel(&self) -> WidgetId {
        self.content
    }

    pub fn frame_rect(&self) -> Option<Rect> {
        self.tree.rect(self.frame)
    }

    /// Screen rect of a widget addressed by name path, e.g. `"frame/ok"`.
    pub fn rect_of(&self, path: &str) -> Option<Rect> {
        self.tree.find_path(path).and_then(|id| self.tree.rect(id))
    }

    /// The result, once the popup has been confirmed or cancelled.
    #[inline]
    pub fn result(&self) -> Option<&PopupResult<C>> {
        self.result.as_ref()
    }

    #[inline]
    pub fn is_finished(&self) -> bool {
        matches!(self.state, PopupState::Confirmed | PopupState::Cancelled)
    }

    /// Programmatic close request, applied on the next update.
    pub fn request_close(&self, action: CloseAction) {
        self.closer.request(action);
    }

    pub(crate) fn mark_open(&mut self) {
        if self.state == PopupState::Building {
            self.state = PopupState::Open;
            log::debug!("{} `{}` open", self.id, self.title);
        }
    }

    /// Centers the frame on the viewport.
    pub fn center(&mut self, viewport: Viewport) {
        let Some(size) = self.tree.size(self.frame) else { return };
        let offset = Vec2::new(
            ((viewport.width - size.x) * 0.5).round(),
            ((viewport.height - size.y) * 0.5).round(),
        );
        self.tree.set_offset(self.frame, offset);
    }

    /// One frame: layout, widget updates, input (`None` when another popup is
    /// on top), content hook, then any pending close.
    pub fn update(&mut self, time: &FrameTime, input: Option<&UiInput>, viewport: Viewport) {
        if self.state != PopupState::Open {
            return;
        }
        self.center(viewport);
        self.tree.update(time);

        if let Some(input) = input {
            let unconsumed = self.tree.handle_input(input, viewport);
            if unconsumed.iter().any(|ev| matches!(ev, UiEvent::KeyPress { key: Key::Escape })) {
                self.closer.cancel();
            }
        }

        self.hooks.update(&mut self.tree);

        if let Some(action) = self.closer.take() {
            self.finish(action);
        }
    }

    fn finish(&mut self, action: CloseAction) {
        if self.result.is_some() {
            return;
        }
        let confirmed = action == CloseAction::Confirm;
        let mut result = self.hooks.build_result(&self.tree, confirmed);
        if !confirmed {
            result = PopupResult::cancelled();
        }
        self.state = if confirmed { PopupState::Confirmed } else { PopupState::Cancelled };
        log::debug!("{} `{}` {:?}", self.id, self.title, self.state);
        self.result = Some(result);
    }

    /// Ends the lifecycle: destroys the widgets and yields the result. A popup
    /// closed while still open counts as cancelled.
    pub fn close(mut self) -> PopupResult<C> {
        if self.result.is_none() {
            self.finish(CloseAction::Cancel);
        }
        self.state = PopupState::Closed;
        self.tree.clear();
        log::debug!("{} `{}` closed", self.id, self.title);
        self.result.take().unwrap_or_else(PopupResult::cancelled)
    }

    pub fn draw(&self, painter: &mut Painter) {
        self.tree.paint(painter);
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;

    #[derive(Default)]
    struct Calls {
        built: u32,
        results: Vec<bool>,
    }

    /// Content that records hook calls and returns a fixed text payload.
    struct Recorder(Rc<RefCell<Calls>>);

    impl PopupContent<()> for Recorder {
        fn build_content(&mut self, tree: &mut WidgetTree, panel: WidgetId, _closer: &PopupCloser) -> Result<(), TreeError> {
            self.0.borrow_mut().built += 1;
            tree.insert_child(panel, "hint", Vec2::zero(), Vec2::new(100.0, 20.0), Label::new("hint"))?;
            Ok(())
        }

        fn build_result(&mut self, _tree: &WidgetTree, confirmed: bool) -> PopupResult<()> {
            self.0.borrow_mut().results.push(confirmed);
            PopupResult { confirmed, payload: Payload::Text("payload".into()) }
        }
    }

    const VP: Viewport = Viewport::new(800.0, 600.0);

    fn open_popup(calls: &Rc<RefCell<Calls>>) -> Popup<()> {
        let mut popup = Popup::new("Test", Vec2::new(200.0, 100.0), Recorder(Rc::clone(calls))).unwrap();
        assert_eq!(popup.state(), PopupState::Building);
        popup.mark_open();
        popup
    }

    fn frame() -> FrameTime {
        FrameTime::fixed(1, 1.0 / 60.0)
    }

    #[test]
    fn frame_has_named_parts_and_content() {
        let calls = Rc::default();
        let popup = open_popup(&calls);
        for path in ["frame", "frame/title/text", "frame/content", "frame/content/hint", "frame/ok", "frame/cancel"] {
            assert!(popup.tree().find_path(path).is_some(), "missing {path}");
        }
        assert_eq!(calls.borrow().built, 1);
    }

    #[test]
    fn frame_is_centered() {
        let calls = Rc::default();
        let mut popup = open_popup(&calls);
        popup.update(&frame(), None, VP);
        let rect = popup.frame_rect().unwrap();
        assert_eq!(rect.center(), Vec2::new(400.0, 300.0));
    }

    #[test]
    fn ok_confirms_once_with_payload() {
        let calls = Rc::default();
        let mut popup = open_popup(&calls);
        popup.update(&frame(), None, VP);
        let ok = popup.rect_of("frame/ok").unwrap().center();

        popup.update(&frame(), Some(&UiInput::click(ok)), VP);
        assert_eq!(popup.state(), PopupState::Confirmed);
        // Further frames do nothing.
        popup.update(&frame(), Some(&UiInput::click(ok)), VP);

        let result = popup.close();
        assert!(result.confirmed);
        assert_eq!(result.text(), Some("payload"));
        assert_eq!(calls.borrow().results, vec![true]);
    }

    #[test]
    fn escape_cancels_without_payload() {
        let calls = Rc::default();
        let mut popup = open_popup(&calls);
        popup.update(&frame(), Some(&UiInput::key(Key::Escape)), VP);
        assert_eq!(popup.state(), PopupState::Cancelled);

        let result = popup.close();
        assert!(!result.confirmed);
        assert!(matches!(result.payload, Payload::None));
        assert_eq!(calls.borrow().results, vec![false]);
    }

    #[test]
    fn closing_an_open_popup_cancels() {
        let calls = Rc::default();
        let popup = open_popup(&calls);
        let result = popup.close();
        assert!(!result.confirmed);
        assert_eq!(calls.borrow().results, vec![false]);
    }

    #[test]
    fn building_popup_ignores_updates() {
        let calls = Rc::default();
        let mut popup = Popup::new("Idle", Vec2::new(50.0, 50.0), Recorder(Rc::clone(&calls))).unwrap();
        popup.request_close(CloseAction::Confirm);
        popup.update(&frame(), None, VP);
        assert_eq!(popup.state(), PopupState::Building);
        assert!(calls.borrow().results.is_empty());
    }

    #[test]
    fn result_accessors() {
        let r: PopupResult<()> = PopupResult::confirmed(Payload::Indexed { index: 2, item: "Water".into() });
        assert_eq!(r.selected_index(), 2);
        assert_eq!(r.selected_item(), Some("Water"));
        assert_eq!(r.text(), None);
        assert!(r.selected_card().is_none());
        assert_eq!(PopupResult::<()>::cancelled().selected_index(), -1);
    }
}
