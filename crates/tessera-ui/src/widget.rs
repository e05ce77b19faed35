use std::any::Any;

use tessera_engine::coords::Rect;
use tessera_engine::time::FrameTime;

use crate::event::{EventCtx, EventResult, UiEvent};
use crate::painter::Painter;

// ── AsAny ─────────────────────────────────────────────────────────────────

/// Lets the tree hand out typed references to the widgets it stores.
pub trait AsAny: Any {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

// ── Widget trait ──────────────────────────────────────────────────────────

/// Behaviour of a node in a [`WidgetTree`](crate::tree::WidgetTree).
///
/// Position, size, ownership and children live in the tree; the widget only
/// holds control-specific state. `rect` is the node's resolved screen rect.
///
/// # Implementing a custom widget
///
/// ```rust,ignore
/// use tessera_ui::prelude::*;
///
/// pub struct Swatch { color: Color }
///
/// impl Widget for Swatch {
///     fn paint(&self, painter: &mut Painter, rect: Rect) {
///         painter.fill_rounded_rect(rect, 4.0, self.color, None);
///     }
/// }
///
/// let id = tree.insert_child(panel, "swatch", Vec2::new(8.0, 8.0), Vec2::splat(24.0), Swatch { color })?;
/// ```
pub trait Widget: AsAny {
    /// Draw this widget inside `rect`. Children are painted by the tree afterwards.
    fn paint(&self, painter: &mut Painter, rect: Rect);

    /// Route an input event. Return [`EventResult::Consumed`] to stop propagation.
    fn on_event(&mut self, _event: &UiEvent, _rect: Rect, _ctx: &mut EventCtx<'_>) -> EventResult {
        EventResult::Ignored
    }

    /// Called once per frame before input is dispatched.
    fn update(&mut self, _time: &FrameTime) {}

    /// `true` while the widget shows content outside its own rect (an expanded
    /// list). Overlay widgets are painted last and offered events first.
    fn overlay_active(&self) -> bool {
        false
    }

    /// Paint the out-of-rect content; only called while [`overlay_active`](Self::overlay_active).
    fn paint_overlay(&self, _painter: &mut Painter, _rect: Rect) {}

    /// Whether Tab cycling may land on this widget.
    fn focusable(&self) -> bool {
        false
    }

    fn set_focused(&mut self, _focused: bool) {}
}

// ── Element ───────────────────────────────────────────────────────────────

/// A type-erased widget as stored by the tree.
pub struct Element(Box<dyn Widget>);

impl Element {
    pub fn new<W: Widget>(w: W) -> Self {
        Self(Box::new(w))
    }

    #[inline]
    pub fn get(&self) -> &dyn Widget {
        &*self.0
    }

    #[inline]
    pub fn get_mut(&mut self) -> &mut dyn Widget {
        &mut *self.0
    }

    pub fn downcast_ref<T: Widget>(&self) -> Option<&T> {
        (*self.0).as_any().downcast_ref::<T>()
    }

    pub fn downcast_mut<T: Widget>(&mut self) -> Option<&mut T> {
        (*self.0).as_any_mut().downcast_mut::<T>()
    }
}

impl<W: Widget> From<W> for Element {
    fn from(w: W) -> Self {
        Self::new(w)
    }
}
