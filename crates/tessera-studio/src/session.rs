//! A scripted, headless run of the studio screen.
//!
//! The main screen has three buttons, one per popup kind. The script clicks
//! them, drives each popup with synthetic input and records what came back.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use anyhow::{Context, Result};
use tessera_engine::time::FrameClock;
use tessera_ui::prelude::*;

use crate::catalog::{self, Card};

pub const VIEWPORT: Viewport = Viewport::new(1024.0, 768.0);

const REGIONS: [&str; 4] = ["Kanto", "Johto", "Hoenn", "Sinnoh"];
const ROW_HEIGHT: f32 = 24.0;
const FRAME_STEP: Duration = Duration::from_micros(16_667);

/// What the popups returned.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Outcome {
    pub trainer: Option<String>,
    pub region: Option<String>,
    pub starter: Option<String>,
    /// Popups that closed without confirming.
    pub cancelled: u32,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Request {
    Name,
    Region,
    Starter,
}

pub struct Session {
    ui: UiScene<Card>,
    outcome: Rc<RefCell<Outcome>>,
    clock: FrameClock,
}

impl Session {
    pub fn new(cards: Vec<Rc<Card>>) -> Result<Self> {
        let outcome = Rc::new(RefCell::new(Outcome::default()));
        let request: Rc<Cell<Option<Request>>> = Rc::new(Cell::new(None));

        let mut tree = WidgetTree::new();
        let main = tree.insert_root(
            "main",
            Vec2::zero(),
            VIEWPORT.size(),
            Panel::new().background(Color::from_hex(0x14171F)),
        )?;
        tree.insert_child(main, "title", Vec2::new(24.0, 20.0), Vec2::new(400.0, 28.0), Label::new("Tessera Studio").size(20.0))?;
        for (i, (name, label, kind)) in [
            ("name", "Trainer name…", Request::Name),
            ("region", "Region…", Request::Region),
            ("starter", "Starter…", Request::Starter),
        ]
        .into_iter()
        .enumerate()
        {
            let slot = Rc::clone(&request);
            tree.insert_child(
                main,
                name,
                Vec2::new(24.0, 64.0 + i as f32 * 40.0),
                Vec2::new(160.0, 30.0),
                Button::new(label).on_click(move || slot.set(Some(kind))),
            )?;
        }
        let status = tree.insert_child(main, "status", Vec2::new(24.0, 200.0), Vec2::new(600.0, 20.0), Label::new(""))?;

        let shown = Rc::clone(&outcome);
        let scene = TreeScene::<Card>::new(tree).on_update(move |tree, ctx| {
            if let Some(kind) = request.take() {
                if let Err(err) = open_popup(kind, &cards, ctx.popups, &shown) {
                    log::error!("could not build popup: {err}");
                }
            }
            if let Some(label) = tree.widget_mut::<Label>(status) {
                label.set_text(summary(&shown.borrow()));
            }
        });

        Ok(Self { ui: UiScene::new(scene, VIEWPORT), outcome, clock: FrameClock::new() })
    }

    pub fn outcome(&self) -> Outcome {
        self.outcome.borrow().clone()
    }

    #[cfg(test)]
    fn ui(&self) -> &UiScene<Card> {
        &self.ui
    }

    /// Runs the whole script and returns what the popups produced.
    pub fn run_script(&mut self) -> Result<Outcome> {
        self.name_trainer("Ash")?;
        self.choose_region(2)?;
        self.pick_starter("Water")?;
        Ok(self.outcome())
    }

    /// Opens the text popup, types `name` and submits with Enter.
    pub fn name_trainer(&mut self, name: &str) -> Result<()> {
        self.click_scene("main/name")?;
        self.step(&UiInput::text(name));
        self.step(&UiInput::key(Key::Enter));
        self.expect_closed("name")
    }

    /// Opens the region popup, picks row `index` and confirms.
    pub fn choose_region(&mut self, index: usize) -> Result<()> {
        self.click_scene("main/region")?;
        self.pick_row("frame/content/choice", index)?;
        self.click_popup("frame/ok")?;
        self.expect_closed("region")
    }

    /// Opens the picker, filters by `category`, takes the first card and
    /// confirms.
    pub fn pick_starter(&mut self, category: &str) -> Result<()> {
        self.click_scene("main/starter")?;

        let options = {
            let popup = self.ui.popups().top().context("picker did not open")?;
            let id = popup.tree().find_path("frame/content/filter_0").context("picker has no type filter")?;
            popup.tree().widget::<Dropdown>(id).map(|d| d.items().to_vec()).unwrap_or_default()
        };
        let row = options.iter().position(|o| o == category).with_context(|| format!("no `{category}` filter option"))?;
        self.pick_row("frame/content/filter_0", row)?;

        let tile = self.popup_rect("frame/content/browser")?.origin + Vec2::splat(10.0);
        self.step(&UiInput::click(tile));
        self.click_popup("frame/ok")?;
        self.expect_closed("starter")
    }

    fn step(&mut self, input: &UiInput) -> FrameTime {
        let time = self.clock.step(FRAME_STEP);
        self.ui.update(&time, input);
        let mut list = DrawList::new();
        self.ui.draw(&mut list);
        log::trace!("frame {}: {} draw items", time.frame_index, list.items().len());
        time
    }

    fn click_scene(&mut self, path: &str) -> Result<()> {
        let rect = self
            .ui
            .scene::<TreeScene<Card>>()
            .and_then(|s| s.tree().find_path(path).and_then(|id| s.tree().rect(id)))
            .with_context(|| format!("no scene widget at `{path}`"))?;
        self.step(&UiInput::click(rect.center()));
        Ok(())
    }

    fn popup_rect(&self, path: &str) -> Result<Rect> {
        self.ui
            .popups()
            .top()
            .and_then(|p| p.rect_of(path))
            .with_context(|| format!("no popup widget at `{path}`"))
    }

    fn click_popup(&mut self, path: &str) -> Result<()> {
        let rect = self.popup_rect(path)?;
        self.step(&UiInput::click(rect.center()));
        Ok(())
    }

    /// Expands the dropdown at `path` and clicks its row `index`.
    fn pick_row(&mut self, path: &str, index: usize) -> Result<()> {
        let control = self.popup_rect(path)?;
        self.step(&UiInput::click(control.center()));
        let row_y = control.max().y + (index as f32 + 0.5) * ROW_HEIGHT;
        self.step(&UiInput::click(Vec2::new(control.center().x, row_y)));
        Ok(())
    }

    fn expect_closed(&self, what: &str) -> Result<()> {
        if self.ui.popups().is_open() {
            anyhow::bail!("{what} popup is still open");
        }
        Ok(())
    }
}

fn open_popup(
    kind: Request,
    cards: &[Rc<Card>],
    popups: &mut ModalStack<Card>,
    outcome: &Rc<RefCell<Outcome>>,
) -> Result<(), TreeError> {
    let sink = Rc::clone(outcome);
    match kind {
        Request::Name => {
            let content = TextInputPopup::new("Trainer name", "").placeholder("Type a name").max_len(16);
            let popup = Popup::new("Trainer", TextInputPopup::CONTENT_SIZE, content)?;
            popups.open(popup, move |_, result| {
                let mut o = sink.borrow_mut();
                match result.text() {
                    Some(name) => o.trainer = Some(name.to_owned()),
                    None => o.cancelled += 1,
                }
            });
        }
        Request::Region => {
            let content = DropdownSelectPopup::new("Home region", REGIONS, 0);
            let popup = Popup::new("Region", DropdownSelectPopup::CONTENT_SIZE, content)?;
            popups.open(popup, move |_, result| {
                let mut o = sink.borrow_mut();
                match result.selected_item() {
                    Some(region) if result.confirmed => o.region = Some(region.to_owned()),
                    _ => o.cancelled += 1,
                }
            });
        }
        Request::Starter => {
            let picker = ItemPickerPopup::new("Choose your starter", cards.to_vec(), catalog::filters(cards));
            let popup = Popup::new("Starter", picker.content_size(), picker)?;
            popups.open(popup, move |_, result| {
                let mut o = sink.borrow_mut();
                match result.selected_card() {
                    Some(card) => o.starter = Some(card.name.clone()),
                    None => o.cancelled += 1,
                }
            });
        }
    }
    Ok(())
}

fn summary(o: &Outcome) -> String {
    let show = |v: &Option<String>| v.clone().unwrap_or_else(|| "-".to_owned());
    format!("Trainer: {}   Region: {}   Starter: {}", show(&o.trainer), show(&o.region), show(&o.starter))
}
