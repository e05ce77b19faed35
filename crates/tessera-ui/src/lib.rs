//! Tessera UI: a retained widget tree with anchored layout, modal popups and
//! a paginated card browser, drawing into `tessera-engine`'s `DrawList`.
//!
//! # Quick start
//!
//! ```rust,ignore
//! use tessera_ui::prelude::*;
//!
//! let mut tree = WidgetTree::new();
//! let panel = tree.insert_root("main", Vec2::new(20.0, 20.0), Vec2::new(400.0, 300.0),
//!     Panel::new().background(Color::from_hex(0x1E2230)))?;
//! tree.insert_child(panel, "title", Vec2::new(12.0, 12.0), Vec2::new(376.0, 20.0), Label::new("Deck"))?;
//!
//! let mut ui: UiScene<Card> = UiScene::new(TreeScene::new(tree), viewport);
//!
//! // In your frame callback:
//! ui.update(&clock.tick(), &UiInput::from_frame(&input_state, &input_frame));
//! draw_list.clear();
//! ui.draw(&mut draw_list);
//! // Pass draw_list to your renderer.
//! ```
//!
//! # Popups
//!
//! ```rust,ignore
//! let popup = Popup::new("Rename", TextInputPopup::CONTENT_SIZE, TextInputPopup::new("Name", "Ash"))?;
//! ui.popups_mut().open(popup, |_, result| {
//!     if let Some(name) = result.text() {
//!         log::info!("renamed to {name}");
//!     }
//! });
//! ```

pub mod anchor;
pub mod event;
pub mod focus;
pub mod painter;
pub mod popup;
pub mod scene;
pub mod signal;
pub mod tree;
pub mod widget;
pub mod widgets;

/// Everything you need to build and extend UI; import this in your component files.
pub mod prelude {
    pub use crate::anchor::Anchor;
    pub use crate::event::{EventCtx, EventResult, UiEvent, UiInput};
    pub use crate::painter::Painter;
    pub use crate::popup::{
        CardFilter, CloseAction, DropdownSelectPopup, FilterSet, ItemPickerPopup, ModalStack, Payload, Popup,
        PopupCloser, PopupContent, PopupResult, PopupState, PopupStyle, TextInputPopup,
    };
    pub use crate::scene::{Scene, SceneCtx, TreeScene, UiScene};
    pub use crate::signal::Signal;
    pub use crate::tree::{TreeError, WidgetId, WidgetTree};
    pub use crate::widget::{Element, Widget};
    pub use crate::widgets::{
        BrowserLayout, Button, CardFace, CardPageBrowser, Dropdown, InputField, Label, Panel, SelectionChanged,
        TextAlign,
    };

    // Re-export the engine primitives everyone needs.
    pub use tessera_engine::coords::{Rect, Vec2, Viewport};
    pub use tessera_engine::input::Key;
    pub use tessera_engine::paint::{Border, Color};
    pub use tessera_engine::scene::DrawList;
    pub use tessera_engine::time::FrameTime;
}
