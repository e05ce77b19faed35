use tessera_engine::coords::Viewport;
use tessera_engine::time::FrameTime;

use super::{Popup, PopupId, PopupResult};
use crate::event::UiInput;
use crate::painter::Painter;

type OnClose<C> = Box<dyn FnOnce(&mut ModalStack<C>, PopupResult<C>)>;

struct Entry<C> {
    popup: Popup<C>,
    on_close: OnClose<C>,
}

/// Open popups, bottom to top.
///
/// Only the top popup receives input. Continuations run after their popup has
/// been popped and may open further popups.
pub struct ModalStack<C> {
    entries: Vec<Entry<C>>,
}

impl<C: 'static> ModalStack<C> {
    pub fn new() -> Self {
        Self { entries: Vec::new() }
    }

    /// Pushes `popup` and registers the continuation that receives its result.
    pub fn open(
        &mut self,
        mut popup: Popup<C>,
        on_close: impl FnOnce(&mut ModalStack<C>, PopupResult<C>) + 'static,
    ) -> PopupId {
        popup.mark_open();
        let id = popup.id();
        self.entries.push(Entry { popup, on_close: Box::new(on_close) });
        log::debug!("modal stack: push {id} (depth {})", self.entries.len());
        id
    }

    #[inline]
    pub fn is_open(&self) -> bool {
        !self.entries.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn top(&self) -> Option<&Popup<C>> {
        self.entries.last().map(|e| &e.popup)
    }

    pub fn top_mut(&mut self) -> Option<&mut Popup<C>> {
        self.entries.last_mut().map(|e| &mut e.popup)
    }

    pub fn top_id(&self) -> Option<PopupId> {
        self.top().map(Popup::id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Popup<C>> {
        self.entries.iter().map(|e| &e.popup)
    }

    /// Updates every popup (input only to the top one), then closes finished
    /// popups top-down and runs their continuations.
    pub fn update(&mut self, time: &FrameTime, input: Option<&UiInput>, viewport: Viewport) {
        let top = self.entries.len().saturating_sub(1);
        for (i, entry) in self.entries.iter_mut().enumerate() {
            let input = if i == top { input } else { None };
            entry.popup.update(time, input, viewport);
        }

        while let Some(i) = self.entries.iter().rposition(|e| e.popup.is_finished()) {
            let Entry { popup, on_close } = self.entries.remove(i);
            let id = popup.id();
            let result = popup.close();
            log::debug!("modal stack: pop {id} (confirmed: {}, depth {})", result.confirmed, self.entries.len());
            on_close(self, result);
        }
    }

    pub fn draw(&self, painter: &mut Painter) {
        for entry in &self.entries {
            entry.popup.draw(painter);
        }
    }

    /// Cancels every open popup, top first. Popups opened by the continuations
    /// stay open.
    pub fn cancel_all(&mut self) {
        let entries = std::mem::take(&mut self.entries);
        for Entry { popup, on_close } in entries.into_iter().rev() {
            let result = popup.close();
            on_close(self, result);
        }
    }
}

impl<C: 'static> Default for ModalStack<C> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use tessera_engine::coords::Vec2;
    use tessera_engine::input::Key;

    use super::*;
    use crate::popup::{CloseAction, Payload, PopupCloser, PopupContent, PopupState};
    use crate::tree::{TreeError, WidgetId, WidgetTree};

    struct Fixed(&'static str);

    impl PopupContent<()> for Fixed {
        fn build_content(&mut self, _: &mut WidgetTree, _: WidgetId, _: &PopupCloser) -> Result<(), TreeError> {
            Ok(())
        }

        fn build_result(&mut self, _: &WidgetTree, confirmed: bool) -> PopupResult<()> {
            PopupResult { confirmed, payload: Payload::Text(self.0.into()) }
        }
    }

    fn popup(tag: &'static str) -> Popup<()> {
        Popup::new(tag, Vec2::new(100.0, 40.0), Fixed(tag)).unwrap()
    }

    const VP: Viewport = Viewport::new(640.0, 480.0);

    fn frame() -> FrameTime {
        FrameTime::fixed(0, 0.016)
    }

    #[test]
    fn only_top_receives_input() {
        let mut stack = ModalStack::new();
        stack.open(popup("bottom"), |_, _| {});
        stack.open(popup("top"), |_, _| {});

        stack.update(&frame(), Some(&UiInput::key(Key::Escape)), VP);
        assert_eq!(stack.len(), 1);
        assert_eq!(stack.top().map(|p| p.title()), Some("bottom"));
        assert_eq!(stack.top().map(|p| p.state()), Some(PopupState::Open));
    }

    #[test]
    fn continuation_receives_result_and_may_open_more() {
        let results = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&results);
        let mut stack = ModalStack::new();
        stack.open(popup("first"), move |stack, result| {
            sink.borrow_mut().push((result.confirmed, result.text().map(str::to_owned)));
            stack.open(popup("second"), |_, _| {});
        });

        stack.top().unwrap().request_close(CloseAction::Confirm);
        stack.update(&frame(), None, VP);

        assert_eq!(*results.borrow(), vec![(true, Some("first".to_owned()))]);
        assert_eq!(stack.top().map(|p| p.title()), Some("second"));
    }

    #[test]
    fn cancel_all_delivers_cancelled_results() {
        let confirmed = Rc::new(RefCell::new(Vec::new()));
        let mut stack = ModalStack::new();
        for tag in ["a", "b"] {
            let sink = Rc::clone(&confirmed);
            stack.open(popup(tag), move |_, r| sink.borrow_mut().push((tag, r.confirmed)));
        }
        stack.cancel_all();
        assert!(!stack.is_open());
        assert_eq!(*confirmed.borrow(), vec![("b", false), ("a", false)]);
    }
}
