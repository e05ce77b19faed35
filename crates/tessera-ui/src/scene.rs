use tessera_engine::coords::{Vec2, Viewport};
use tessera_engine::paint::Color;
use tessera_engine::scene::DrawList;
use tessera_engine::time::FrameTime;

pub use crate::event::UiInput;
use crate::painter::Painter;
use crate::popup::ModalStack;
use crate::tree::WidgetTree;
use crate::widget::AsAny;

/// Pointer position used while a popup is open, so the scene shows no hover.
const PARKED: Vec2 = Vec2::new(f32::NEG_INFINITY, f32::NEG_INFINITY);

// ── Scene ─────────────────────────────────────────────────────────────────

/// Per-frame context handed to [`Scene::update`].
pub struct SceneCtx<'a, C> {
    pub time: &'a FrameTime,
    /// `None` while a popup is open: the modal stack owns input.
    pub input: Option<&'a UiInput>,
    pub viewport: Viewport,
    /// Lets the scene open popups.
    pub popups: &'a mut ModalStack<C>,
}

/// The screen under the popups.
pub trait Scene<C>: AsAny {
    fn update(&mut self, ctx: &mut SceneCtx<'_, C>);
    fn draw(&self, painter: &mut Painter);
}

type UpdateHook<C> = Box<dyn FnMut(&mut WidgetTree, &mut SceneCtx<'_, C>)>;

/// A scene that is a widget tree plus an optional per-frame hook.
///
/// # Example
/// ```rust,ignore
/// let mut tree = WidgetTree::new();
/// let open = Rc::new(Cell::new(false));
/// let flag = Rc::clone(&open);
/// tree.insert_root("pick", Vec2::new(20.0, 20.0), Vec2::new(120.0, 30.0),
///     Button::new("Pick…").on_click(move || flag.set(true)))?;
///
/// let scene = TreeScene::new(tree).on_update(move |_tree, ctx| {
///     if open.replace(false) {
///         ctx.popups.open(make_picker()?, |_, result| log::info!("{:?}", result.selected_card()));
///     }
/// });
/// ```
pub struct TreeScene<C> {
    tree: WidgetTree,
    hook: Option<UpdateHook<C>>,
}

impl<C: 'static> TreeScene<C> {
    pub fn new(tree: WidgetTree) -> Self {
        Self { tree, hook: None }
    }

    /// Runs after the tree has handled this frame's input.
    pub fn on_update(mut self, f: impl FnMut(&mut WidgetTree, &mut SceneCtx<'_, C>) + 'static) -> Self {
        self.hook = Some(Box::new(f));
        self
    }

    #[inline]
    pub fn tree(&self) -> &WidgetTree {
        &self.tree
    }

    #[inline]
    pub fn tree_mut(&mut self) -> &mut WidgetTree {
        &mut self.tree
    }
}

impl<C: 'static> Scene<C> for TreeScene<C> {
    fn update(&mut self, ctx: &mut SceneCtx<'_, C>) {
        self.tree.update(ctx.time);
        if let Some(input) = ctx.input {
            self.tree.handle_input(input, ctx.viewport);
        }
        if let Some(hook) = &mut self.hook {
            hook(&mut self.tree, ctx);
        }
    }

    fn draw(&self, painter: &mut Painter) {
        self.tree.paint(painter);
    }
}

// ── UiScene ───────────────────────────────────────────────────────────────

/// Top-level coordinator: the active scene plus the modal stack.
///
/// The host calls [`update`](Self::update) then [`draw`](Self::draw) once per
/// frame and hands the `DrawList` to its renderer.
///
/// # Example
///
/// ```rust,ignore
/// let mut ui = UiScene::new(TreeScene::new(tree), viewport).dim_background(true);
///
/// // In your frame callback:
/// ui.update(&clock.tick(), &UiInput::from_frame(&input_state, &input_frame));
/// draw_list.clear();
/// ui.draw(&mut draw_list);
/// ```
pub struct UiScene<C> {
    scene: Box<dyn Scene<C>>,
    popups: ModalStack<C>,
    viewport: Viewport,
    dim_background: bool,
    scrim: Color,
    pointer: Vec2,
    pressed: bool,
}

impl<C: 'static> UiScene<C> {
    pub fn new(scene: impl Scene<C> + 'static, viewport: Viewport) -> Self {
        Self {
            scene: Box::new(scene),
            popups: ModalStack::new(),
            viewport,
            dim_background: true,
            scrim: Color::black().with_alpha(0.45),
            pointer: PARKED,
            pressed: false,
        }
    }

    /// Draw a translucent scrim over the scene while a popup is open.
    pub fn dim_background(mut self, v: bool) -> Self {
        self.dim_background = v;
        self
    }

    pub fn scrim_color(mut self, v: Color) -> Self {
        self.scrim = v;
        self
    }

    pub fn set_dim_background(&mut self, v: bool) {
        self.dim_background = v;
    }

    #[inline]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        if !viewport.is_valid() {
            log::warn!("ignoring invalid viewport {viewport:?}");
            return;
        }
        self.viewport = viewport;
    }

    /// Replaces the active scene. Open popups stay open.
    pub fn set_scene(&mut self, scene: impl Scene<C> + 'static) {
        self.scene = Box::new(scene);
    }

    /// The active scene, if it is an `S`.
    pub fn scene<S: Scene<C>>(&self) -> Option<&S> {
        (*self.scene).as_any().downcast_ref::<S>()
    }

    pub fn scene_mut<S: Scene<C>>(&mut self) -> Option<&mut S> {
        (*self.scene).as_any_mut().downcast_mut::<S>()
    }

    #[inline]
    pub fn popups(&self) -> &ModalStack<C> {
        &self.popups
    }

    #[inline]
    pub fn popups_mut(&mut self) -> &mut ModalStack<C> {
        &mut self.popups
    }

    /// One frame. The scene updates first and gets input only when no popup
    /// was open at the start of the frame; then the popups update, and only a
    /// top popup that was already open at frame start receives input.
    pub fn update(&mut self, time: &FrameTime, input: &UiInput) {
        self.pointer = input.mouse_pos;
        self.pressed = input.mouse_pressed;

        let top_at_start = self.popups.top_id();
        let mut ctx = SceneCtx {
            time,
            input: top_at_start.is_none().then_some(input),
            viewport: self.viewport,
            popups: &mut self.popups,
        };
        self.scene.update(&mut ctx);

        let popup_input = match top_at_start {
            Some(id) if self.popups.top_id() == Some(id) => Some(input),
            _ => None,
        };
        self.popups.update(time, popup_input, self.viewport);
    }

    pub fn draw(&self, list: &mut DrawList) {
        let modal = self.popups.is_open();
        let scene_pointer = if modal { PARKED } else { self.pointer };
        let mut painter = Painter::new(list, self.viewport, scene_pointer, self.pressed && !modal);
        self.scene.draw(&mut painter);

        if modal {
            if self.dim_background {
                painter.fill_rect(self.viewport.rect(), self.scrim);
            }
            painter.mouse_pos = self.pointer;
            painter.mouse_pressed = self.pressed;
            self.popups.draw(&mut painter);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use tessera_engine::input::Key;
    use tessera_engine::scene::DrawCmd;

    use super::*;
    use crate::popup::{Popup, TextInputPopup};
    use crate::widgets::Button;

    const VP: Viewport = Viewport::new(800.0, 600.0);

    fn t(i: u64) -> FrameTime {
        FrameTime::fixed(i, 0.016)
    }

    /// A scene with one button at (10, 10) that opens a text popup.
    fn scene(clicks: &Rc<Cell<u32>>) -> UiScene<()> {
        let mut tree = WidgetTree::new();
        let flag = Rc::new(Cell::new(false));
        let on_click = Rc::clone(&flag);
        let counter = Rc::clone(clicks);
        tree.insert_root(
            "open",
            Vec2::new(10.0, 10.0),
            Vec2::new(100.0, 30.0),
            Button::new("Open").on_click(move || {
                counter.set(counter.get() + 1);
                on_click.set(true);
            }),
        )
        .unwrap();
        let scene = TreeScene::<()>::new(tree).on_update(move |_, ctx| {
            if flag.replace(false) {
                let popup = Popup::new("Name", TextInputPopup::CONTENT_SIZE, TextInputPopup::new("Name", "")).unwrap();
                ctx.popups.open(popup, |_, _| {});
            }
        });
        UiScene::new(scene, VP)
    }

    #[test]
    fn popup_blocks_scene_input() {
        let clicks = Rc::new(Cell::new(0));
        let mut ui = scene(&clicks);
        let button = Vec2::new(20.0, 20.0);

        ui.update(&t(0), &UiInput::click(button));
        assert_eq!(clicks.get(), 1);
        assert!(ui.popups().is_open());

        // The scene no longer sees clicks while the popup is up.
        ui.update(&t(1), &UiInput::click(button));
        assert_eq!(clicks.get(), 1);

        ui.update(&t(2), &UiInput::key(Key::Escape));
        assert!(!ui.popups().is_open());
        ui.update(&t(3), &UiInput::click(button));
        assert_eq!(clicks.get(), 2);
    }

    #[test]
    fn popup_opened_this_frame_gets_no_input() {
        let clicks = Rc::new(Cell::new(0));
        let mut ui = scene(&clicks);
        let open_and_type = UiInput { text_input: "x".into(), ..UiInput::click(Vec2::new(20.0, 20.0)) };
        ui.update(&t(0), &open_and_type);

        let field = ui.popups().top().and_then(|p| p.tree().find_path("frame/content/input")).unwrap();
        let value = ui.popups().top().and_then(|p| p.tree().widget::<crate::widgets::InputField>(field)).map(|f| f.value().to_owned());
        assert_eq!(value.as_deref(), Some(""));
    }

    #[test]
    fn scene_keeps_updating_under_a_popup() {
        let calls = Rc::new(Cell::new(0u32));
        let with_input = Rc::new(Cell::new(0u32));
        let (c, w) = (Rc::clone(&calls), Rc::clone(&with_input));
        let scene = TreeScene::<()>::new(WidgetTree::new()).on_update(move |_, ctx| {
            c.set(c.get() + 1);
            if ctx.input.is_some() {
                w.set(w.get() + 1);
            }
        });
        let mut ui = UiScene::new(scene, VP);
        ui.update(&t(0), &UiInput::default());

        let popup = Popup::new("Name", TextInputPopup::CONTENT_SIZE, TextInputPopup::new("Name", "")).unwrap();
        ui.popups_mut().open(popup, |_, _| {});
        for i in 1..=3 {
            ui.update(&t(i), &UiInput::default());
        }
        assert!(ui.popups().is_open());
        assert_eq!(calls.get(), 4);
        assert_eq!(with_input.get(), 1);
    }

    #[test]
    fn scrim_drawn_only_while_modal() {
        let clicks = Rc::new(Cell::new(0));
        let mut ui = scene(&clicks);
        let full_screen_quads = |ui: &UiScene<()>| {
            let mut list = DrawList::new();
            ui.draw(&mut list);
            list.items()
                .iter()
                .filter(|it| matches!(&it.cmd, DrawCmd::Quad(q) if q.rect == VP.rect()))
                .count()
        };

        assert_eq!(full_screen_quads(&ui), 0);
        ui.update(&t(0), &UiInput::click(Vec2::new(20.0, 20.0)));
        assert_eq!(full_screen_quads(&ui), 1);

        ui.set_dim_background(false);
        assert_eq!(full_screen_quads(&ui), 0);
    }

    #[test]
    fn typed_scene_access() {
        let clicks = Rc::new(Cell::new(0));
        let ui = scene(&clicks);
        let tree = ui.scene::<TreeScene<()>>().map(TreeScene::tree);
        assert!(tree.and_then(|t| t.find_path("open")).is_some());
    }
}
