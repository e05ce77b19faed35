use tessera_engine::coords::Vec2;

use super::{Payload, PopupCloser, PopupContent, PopupResult};
use crate::tree::{TreeError, WidgetId, WidgetTree};
use crate::widgets::{InputField, Label};

const PROMPT_HEIGHT: f32 = 20.0;
const FIELD_HEIGHT: f32 = 32.0;
const GAP: f32 = 8.0;

/// Prompt plus a single-line field. The field is focused on open, and Enter
/// in it confirms.
///
/// ```rust,ignore
/// let popup = Popup::new("Rename", TextInputPopup::CONTENT_SIZE, TextInputPopup::new("Trainer name", "Ash"))?;
/// popups.open(popup, |_, result| log::info!("name: {:?}", result.text()));
/// ```
pub struct TextInputPopup {
    prompt: String,
    default_text: String,
    placeholder: String,
    max_len: Option<usize>,
    field: Option<WidgetId>,
}

impl TextInputPopup {
    /// A content size that fits the prompt and the field.
    pub const CONTENT_SIZE: Vec2 = Vec2::new(320.0, PROMPT_HEIGHT + GAP + FIELD_HEIGHT);

    pub fn new(prompt: impl Into<String>, default_text: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            default_text: default_text.into(),
            placeholder: String::new(),
            max_len: None,
            field: None,
        }
    }

    pub fn placeholder(mut self, v: impl Into<String>) -> Self {
        self.placeholder = v.into();
        self
    }

    pub fn max_len(mut self, v: usize) -> Self {
        self.max_len = Some(v);
        self
    }
}

impl<C> PopupContent<C> for TextInputPopup {
    fn build_content(&mut self, tree: &mut WidgetTree, panel: WidgetId, closer: &PopupCloser) -> Result<(), TreeError> {
        let width = tree.size(panel).map_or(Self::CONTENT_SIZE.x, |s| s.x);
        tree.insert_child(panel, "prompt", Vec2::zero(), Vec2::new(width, PROMPT_HEIGHT), Label::new(self.prompt.as_str()))?;

        let submit = closer.clone();
        let mut field = InputField::new()
            .text(self.default_text.as_str())
            .placeholder(self.placeholder.as_str())
            .on_submit(move |_| submit.confirm());
        if let Some(n) = self.max_len {
            field = field.max_len(n);
        }
        let id = tree.insert_child(panel, "input", Vec2::new(0.0, PROMPT_HEIGHT + GAP), Vec2::new(width, FIELD_HEIGHT), field)?;
        tree.set_focus(Some(id));
        self.field = Some(id);
        Ok(())
    }

    fn build_result(&mut self, tree: &WidgetTree, confirmed: bool) -> PopupResult<C> {
        let text = self.field.and_then(|id| tree.widget::<InputField>(id)).map(|f| f.value().to_owned());
        match (confirmed, text) {
            (true, Some(text)) => PopupResult::confirmed(Payload::Text(text)),
            (true, None) => PopupResult::confirmed(Payload::None),
            (false, _) => PopupResult::cancelled(),
        }
    }
}

#[cfg(test)]
mod tests {
    use tessera_engine::coords::Viewport;
    use tessera_engine::input::Key;
    use tessera_engine::time::FrameTime;

    use super::*;
    use crate::event::UiInput;
    use crate::popup::{Popup, PopupState};

    const VP: Viewport = Viewport::new(800.0, 600.0);

    fn open(content: TextInputPopup) -> Popup<()> {
        let mut popup = Popup::new("Name", TextInputPopup::CONTENT_SIZE, content).unwrap();
        popup.mark_open();
        popup
    }

    #[test]
    fn field_is_focused_with_default_text() {
        let popup = open(TextInputPopup::new("Trainer name", "Red"));
        let field = popup.tree().find_path("frame/content/input").unwrap();
        assert_eq!(popup.tree().focused(), Some(field));
        assert_eq!(popup.tree().widget::<InputField>(field).map(|f| f.value()), Some("Red"));
    }

    #[test]
    fn enter_confirms_with_typed_text() {
        let mut popup = open(TextInputPopup::new("Trainer name", ""));
        let t = FrameTime::fixed(1, 0.016);
        popup.update(&t, Some(&UiInput::text("Ash")), VP);
        popup.update(&t, Some(&UiInput::key(Key::Enter)), VP);
        assert_eq!(popup.state(), PopupState::Confirmed);
        assert_eq!(popup.close().text(), Some("Ash"));
    }

    #[test]
    fn max_len_applies_to_default() {
        let popup = open(TextInputPopup::new("Code", "ABCDEFG").max_len(4));
        let field = popup.tree().find_path("frame/content/input").unwrap();
        assert_eq!(popup.tree().widget::<InputField>(field).map(|f| f.value()), Some("ABCD"));
    }
}
