//! The widget arena.
//!
//! Nodes live in a `SlotMap`; a [`WidgetId`] is the stable handle used for
//! ownership (children lists) and for anchoring. Removing a node removes its
//! whole subtree, and any id pointing into it simply stops resolving.

use std::fmt;

use slotmap::{SlotMap, new_key_type};
use tessera_engine::coords::{Rect, Vec2, Viewport};
use tessera_engine::input::Key;
use tessera_engine::time::FrameTime;

use crate::anchor::Anchor;
use crate::event::{EventCtx, EventResult, UiEvent, UiInput};
use crate::focus::FocusManager;
use crate::painter::Painter;
use crate::widget::{Element, Widget};

new_key_type! {
    /// Handle to a node in a [`WidgetTree`].
    pub struct WidgetId;
}

// ── errors ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    UnknownParent,
    /// A sibling already uses this name.
    NameTaken(String),
}

impl fmt::Display for TreeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TreeError::UnknownParent => write!(f, "parent widget does not exist"),
            TreeError::NameTaken(name) => write!(f, "a sibling named `{name}` already exists"),
        }
    }
}

impl std::error::Error for TreeError {}

// ── node ──────────────────────────────────────────────────────────────────

struct Node {
    name: String,
    anchor: Anchor,
    size: Vec2,
    /// Owning container (the anchor parent may differ after re-anchoring).
    parent: Option<WidgetId>,
    children: Vec<WidgetId>,
    visible: bool,
    widget: Element,
}

// ── tree ──────────────────────────────────────────────────────────────────

/// An owned forest of widgets with relative positioning and input routing.
///
/// Children are kept in insertion order, which is also paint order
/// (back-to-front). Hit-testing walks the reverse: the last-added child is
/// offered a pointer event first, and children before their parent.
#[derive(Default)]
pub struct WidgetTree {
    nodes: SlotMap<WidgetId, Node>,
    roots: Vec<WidgetId>,
    focus: FocusManager,
}

impl WidgetTree {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[inline]
    pub fn contains(&self, id: WidgetId) -> bool {
        self.nodes.contains_key(id)
    }

    #[inline]
    pub fn roots(&self) -> &[WidgetId] {
        &self.roots
    }

    // ── construction ──────────────────────────────────────────────────────

    /// Adds a top-level widget positioned at `offset` in screen space.
    pub fn insert_root(
        &mut self,
        name: impl Into<String>,
        offset: Vec2,
        size: Vec2,
        widget: impl Into<Element>,
    ) -> Result<WidgetId, TreeError> {
        let name = name.into();
        if self.roots.iter().any(|&r| self.nodes[r].name == name) {
            return Err(TreeError::NameTaken(name));
        }
        let id = self.nodes.insert(Node {
            name,
            anchor: Anchor::root(offset),
            size,
            parent: None,
            children: Vec::new(),
            visible: true,
            widget: widget.into(),
        });
        self.roots.push(id);
        Ok(id)
    }

    /// Adds a widget owned by `parent` and anchored `offset` from it.
    pub fn insert_child(
        &mut self,
        parent: WidgetId,
        name: impl Into<String>,
        offset: Vec2,
        size: Vec2,
        widget: impl Into<Element>,
    ) -> Result<WidgetId, TreeError> {
        let name = name.into();
        let Some(p) = self.nodes.get(parent) else {
            return Err(TreeError::UnknownParent);
        };
        if p.children.iter().any(|&c| self.nodes[c].name == name) {
            return Err(TreeError::NameTaken(name));
        }
        let id = self.nodes.insert(Node {
            name,
            anchor: Anchor::relative_to(parent, offset),
            size,
            parent: Some(parent),
            children: Vec::new(),
            visible: true,
            widget: widget.into(),
        });
        self.nodes[parent].children.push(id);
        Ok(id)
    }

    /// Removes `id` and its entire subtree. Returns `false` for unknown ids.
    pub fn remove(&mut self, id: WidgetId) -> bool {
        let Some(owner) = self.nodes.get(id).map(|n| n.parent) else {
            log::debug!("remove: unknown widget {id:?}");
            return false;
        };
        match owner {
            Some(p) => {
                if let Some(parent) = self.nodes.get_mut(p) {
                    parent.children.retain(|&c| c != id);
                }
            }
            None => self.roots.retain(|&r| r != id),
        }

        let mut stack = vec![id];
        while let Some(cur) = stack.pop() {
            if let Some(node) = self.nodes.remove(cur) {
                stack.extend(node.children);
            }
        }
        if self.focus.focused().is_some_and(|f| !self.nodes.contains_key(f)) {
            self.focus.replace(None);
        }
        true
    }

    /// Drops every node.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.roots.clear();
        self.focus = FocusManager::new();
    }

    // ── geometry ──────────────────────────────────────────────────────────

    /// Absolute position of `id`'s anchor.
    pub fn resolve(&self, id: WidgetId) -> Option<Vec2> {
        let node = self.nodes.get(id)?;
        Some(node.anchor.resolve(|p| self.nodes.get(p).map(|n| n.anchor)))
    }

    /// Absolute screen rect of `id`.
    pub fn rect(&self, id: WidgetId) -> Option<Rect> {
        let origin = self.resolve(id)?;
        Some(Rect::from_origin_size(origin, self.nodes[id].size))
    }

    pub fn anchor(&self, id: WidgetId) -> Option<Anchor> {
        self.nodes.get(id).map(|n| n.anchor)
    }

    pub fn offset(&self, id: WidgetId) -> Option<Vec2> {
        self.nodes.get(id).map(|n| n.anchor.offset)
    }

    pub fn set_offset(&mut self, id: WidgetId, offset: Vec2) -> bool {
        match self.nodes.get_mut(id) {
            Some(node) => {
                node.anchor.offset = offset;
                true
            }
            None => false,
        }
    }

    /// Re-anchors `id` to `parent` (or to screen space with `None`), keeping
    /// its offset. Refused when `parent` is unknown or would create a cycle.
    pub fn set_anchor_parent(&mut self, id: WidgetId, parent: Option<WidgetId>) -> bool {
        if !self.nodes.contains_key(id) {
            log::warn!("set_anchor_parent: unknown widget {id:?}");
            return false;
        }
        if let Some(p) = parent {
            if !self.nodes.contains_key(p) {
                log::warn!("set_anchor_parent: unknown anchor target {p:?}");
                return false;
            }
            if Anchor::would_cycle(id, p, |n| self.nodes.get(n).map(|n| n.anchor)) {
                log::warn!("set_anchor_parent: anchoring {id:?} to {p:?} would form a cycle");
                return false;
            }
        }
        self.nodes[id].anchor.parent = parent;
        true
    }

    pub fn size(&self, id: WidgetId) -> Option<Vec2> {
        self.nodes.get(id).map(|n| n.size)
    }

    pub fn set_size(&mut self, id: WidgetId, size: Vec2) -> bool {
        match self.nodes.get_mut(id) {
            Some(node) => {
                node.size = size;
                true
            }
            None => false,
        }
    }

    // ── visibility ────────────────────────────────────────────────────────

    /// The node's own flag; see [`is_shown`](Self::is_shown) for the effective state.
    pub fn is_visible(&self, id: WidgetId) -> bool {
        self.nodes.get(id).is_some_and(|n| n.visible)
    }

    pub fn set_visible(&mut self, id: WidgetId, visible: bool) -> bool {
        match self.nodes.get_mut(id) {
            Some(node) => {
                node.visible = visible;
                true
            }
            None => false,
        }
    }

    /// `true` when the node and all of its owners are visible.
    pub fn is_shown(&self, id: WidgetId) -> bool {
        let mut next = Some(id);
        while let Some(cur) = next {
            match self.nodes.get(cur) {
                Some(node) if node.visible => next = node.parent,
                _ => return false,
            }
        }
        true
    }

    // ── hierarchy & lookup ────────────────────────────────────────────────

    pub fn parent(&self, id: WidgetId) -> Option<WidgetId> {
        self.nodes.get(id)?.parent
    }

    pub fn children(&self, id: WidgetId) -> &[WidgetId] {
        self.nodes.get(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    pub fn name(&self, id: WidgetId) -> Option<&str> {
        self.nodes.get(id).map(|n| n.name.as_str())
    }

    pub fn find_child(&self, parent: WidgetId, name: &str) -> Option<WidgetId> {
        self.children(parent).iter().copied().find(|&c| self.nodes[c].name == name)
    }

    /// Resolves a `/`-separated name path starting at the roots, e.g. `"frame/content/ok"`.
    pub fn find_path(&self, path: &str) -> Option<WidgetId> {
        let mut segments = path.split('/').filter(|s| !s.is_empty());
        let first = segments.next()?;
        let mut cur = self.roots.iter().copied().find(|&r| self.nodes[r].name == first)?;
        for seg in segments {
            cur = self.find_child(cur, seg)?;
        }
        Some(cur)
    }

    // ── typed access ──────────────────────────────────────────────────────

    pub fn widget<T: Widget>(&self, id: WidgetId) -> Option<&T> {
        self.nodes.get(id)?.widget.downcast_ref::<T>()
    }

    pub fn widget_mut<T: Widget>(&mut self, id: WidgetId) -> Option<&mut T> {
        self.nodes.get_mut(id)?.widget.downcast_mut::<T>()
    }

    pub fn element(&self, id: WidgetId) -> Option<&dyn Widget> {
        self.nodes.get(id).map(|n| n.widget.get())
    }

    // ── focus ─────────────────────────────────────────────────────────────

    #[inline]
    pub fn focused(&self) -> Option<WidgetId> {
        self.focus.focused()
    }

    /// Moves keyboard focus, notifying both the old and the new widget.
    pub fn set_focus(&mut self, id: Option<WidgetId>) -> bool {
        if let Some(target) = id {
            if !self.nodes.contains_key(target) {
                log::warn!("set_focus: unknown widget {target:?}");
                return false;
            }
        }
        if let Some(previous) = self.focus.replace(id) {
            if let Some(node) = previous.and_then(|p| self.nodes.get_mut(p)) {
                node.widget.get_mut().set_focused(false);
            }
            if let Some(node) = id.and_then(|n| self.nodes.get_mut(n)) {
                node.widget.get_mut().set_focused(true);
            }
            log::trace!("focus {previous:?} -> {id:?}");
        }
        true
    }

    /// Advances focus to the next focusable, shown widget in tree order.
    pub fn focus_next(&mut self) -> Option<WidgetId> {
        let order: Vec<WidgetId> = self
            .paint_order()
            .into_iter()
            .filter(|&id| self.nodes[id].widget.get().focusable())
            .collect();
        let next = self.focus.next_in(&order)?;
        self.set_focus(Some(next));
        Some(next)
    }

    // ── frame passes ──────────────────────────────────────────────────────

    pub fn update(&mut self, time: &FrameTime) {
        for node in self.nodes.values_mut() {
            node.widget.get_mut().update(time);
        }
    }

    /// Paints shown widgets back-to-front, then any expanded overlays on top.
    pub fn paint(&self, painter: &mut Painter) {
        let order = self.paint_order();
        for &id in &order {
            if let Some(rect) = self.rect(id) {
                self.nodes[id].widget.get().paint(painter, rect);
            }
        }
        for &id in &order {
            let widget = self.nodes[id].widget.get();
            if widget.overlay_active() {
                if let Some(rect) = self.rect(id) {
                    widget.paint_overlay(painter, rect);
                }
            }
        }
    }

    /// Routes one frame of input. Returns the events no widget consumed, in
    /// order, so the owner can act on them (a popup cancels on Escape).
    pub fn handle_input(&mut self, input: &UiInput, viewport: Viewport) -> Vec<UiEvent> {
        input
            .events()
            .into_iter()
            .filter(|ev| !self.dispatch(ev, viewport, input.mouse_pos).is_consumed())
            .collect()
    }

    /// Routes a single event.
    pub fn dispatch(&mut self, event: &UiEvent, viewport: Viewport, pointer: Vec2) -> EventResult {
        let result = match event {
            UiEvent::Click { pos } => self.dispatch_pointer(event, viewport, *pos),
            UiEvent::ScrollWheel { .. } => self.dispatch_pointer(event, viewport, pointer),
            UiEvent::TextInput { .. } => match self.focused_shown() {
                Some(id) => self.offer(id, event, viewport, pointer),
                None => EventResult::Ignored,
            },
            UiEvent::KeyPress { .. } => self.dispatch_key(event, viewport, pointer),
        };

        if let UiEvent::Click { .. } = event {
            // A click moves focus to whoever asked for it, or nowhere.
            let requested = self.focus.take_request();
            self.set_focus(requested);
        } else if let Some(id) = self.focus.take_request() {
            self.set_focus(Some(id));
        }

        if !result.is_consumed() && matches!(event, UiEvent::KeyPress { key: Key::Tab }) {
            return match self.focus_next() {
                Some(_) => EventResult::Consumed,
                None => EventResult::Ignored,
            };
        }
        result
    }

    fn dispatch_pointer(&mut self, event: &UiEvent, viewport: Viewport, pos: Vec2) -> EventResult {
        if self.offer_overlays(event, viewport, pos).is_consumed() {
            return EventResult::Consumed;
        }
        for id in self.paint_order().into_iter().rev() {
            let hit = self.rect(id).is_some_and(|r| r.contains(pos));
            if hit && self.offer(id, event, viewport, pos).is_consumed() {
                log::trace!("{event:?} consumed by {:?}", self.nodes[id].name);
                return EventResult::Consumed;
            }
        }
        EventResult::Ignored
    }

    fn dispatch_key(&mut self, event: &UiEvent, viewport: Viewport, pointer: Vec2) -> EventResult {
        if self.offer_overlays(event, viewport, pointer).is_consumed() {
            return EventResult::Consumed;
        }
        let focused = self.focused_shown();
        if let Some(id) = focused {
            if self.offer(id, event, viewport, pointer).is_consumed() {
                return EventResult::Consumed;
            }
        }
        for id in self.paint_order().into_iter().rev() {
            if Some(id) == focused {
                continue;
            }
            let hovered = self.rect(id).is_some_and(|r| r.contains(pointer));
            if hovered && self.offer(id, event, viewport, pointer).is_consumed() {
                return EventResult::Consumed;
            }
        }
        EventResult::Ignored
    }

    /// Offers `event` to expanded overlays, front-most first.
    fn offer_overlays(&mut self, event: &UiEvent, viewport: Viewport, pointer: Vec2) -> EventResult {
        let overlays: Vec<WidgetId> = self
            .paint_order()
            .into_iter()
            .rev()
            .filter(|&id| self.nodes[id].widget.get().overlay_active())
            .collect();
        for id in overlays {
            if self.offer(id, event, viewport, pointer).is_consumed() {
                return EventResult::Consumed;
            }
        }
        EventResult::Ignored
    }

    fn offer(&mut self, id: WidgetId, event: &UiEvent, viewport: Viewport, pointer: Vec2) -> EventResult {
        let Some(rect) = self.rect(id) else {
            return EventResult::Ignored;
        };
        let Some(node) = self.nodes.get_mut(id) else {
            return EventResult::Ignored;
        };
        let mut ctx = EventCtx { viewport, pointer, target: id, focus: &mut self.focus };
        node.widget.get_mut().on_event(event, rect, &mut ctx)
    }

    fn focused_shown(&self) -> Option<WidgetId> {
        self.focus.focused().filter(|&id| self.is_shown(id))
    }

    /// Shown nodes in paint order: roots in order, each node before its children.
    fn paint_order(&self) -> Vec<WidgetId> {
        let mut out = Vec::with_capacity(self.nodes.len());
        let mut stack: Vec<WidgetId> = self.roots.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            let node = &self.nodes[id];
            if !node.visible {
                continue;
            }
            out.push(id);
            stack.extend(node.children.iter().rev());
        }
        out
    }
}
