use tessera_engine::coords::Vec2;

use super::{Payload, PopupCloser, PopupContent, PopupResult};
use crate::tree::{TreeError, WidgetId, WidgetTree};
use crate::widgets::{Dropdown, Label};

const PROMPT_HEIGHT: f32 = 20.0;
const DROPDOWN_HEIGHT: f32 = 28.0;
const GAP: f32 = 8.0;

/// Prompt plus one dropdown; confirms with the selected index and item.
pub struct DropdownSelectPopup {
    prompt: String,
    items: Vec<String>,
    default_index: i32,
    max_visible_items: usize,
    dropdown: Option<WidgetId>,
}

impl DropdownSelectPopup {
    pub const CONTENT_SIZE: Vec2 = Vec2::new(280.0, PROMPT_HEIGHT + GAP + DROPDOWN_HEIGHT);

    pub fn new<I, S>(prompt: impl Into<String>, items: I, default_index: i32) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            prompt: prompt.into(),
            items: items.into_iter().map(Into::into).collect(),
            default_index,
            max_visible_items: 6,
            dropdown: None,
        }
    }

    pub fn max_visible_items(mut self, v: usize) -> Self {
        self.max_visible_items = v;
        self
    }
}

impl<C> PopupContent<C> for DropdownSelectPopup {
    fn build_content(&mut self, tree: &mut WidgetTree, panel: WidgetId, _closer: &PopupCloser) -> Result<(), TreeError> {
        let width = tree.size(panel).map_or(Self::CONTENT_SIZE.x, |s| s.x);
        tree.insert_child(panel, "prompt", Vec2::zero(), Vec2::new(width, PROMPT_HEIGHT), Label::new(self.prompt.as_str()))?;

        let dropdown = Dropdown::new(self.items.iter().cloned())
            .selected(self.default_index)
            .max_visible_items(self.max_visible_items)
            .placeholder("Select…");
        let id = tree.insert_child(panel, "choice", Vec2::new(0.0, PROMPT_HEIGHT + GAP), Vec2::new(width, DROPDOWN_HEIGHT), dropdown)?;
        self.dropdown = Some(id);
        Ok(())
    }

    fn build_result(&mut self, tree: &WidgetTree, confirmed: bool) -> PopupResult<C> {
        if !confirmed {
            return PopupResult::cancelled();
        }
        let dropdown = self.dropdown.and_then(|id| tree.widget::<Dropdown>(id));
        let payload = match dropdown.and_then(|d| Some((usize::try_from(d.selected_index()).ok()?, d.selected_item()?))) {
            Some((index, item)) => Payload::Indexed { index, item: item.to_owned() },
            None => Payload::None,
        };
        PopupResult::confirmed(payload)
    }
}
