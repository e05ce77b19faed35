mod button;
mod card_browser;
mod dropdown;
mod input_field;
mod label;
mod panel;

pub use button::Button;
pub use card_browser::{BrowserLayout, CardFace, CardPageBrowser, TileSlot};
pub use dropdown::{Dropdown, SelectionChanged};
pub use input_field::InputField;
pub use label::{Label, TextAlign};
pub use panel::Panel;
