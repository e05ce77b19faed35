//! Relative positioning.
//!
//! Every node is placed by an [`Anchor`]: an offset from the resolved
//! position of another node (usually its container). Moving a container
//! therefore moves everything anchored to it, with no layout pass.

use tessera_engine::coords::Vec2;

use crate::tree::WidgetId;

/// A local offset plus an optional non-owning reference to the node it is
/// relative to.
///
/// The reference is an arena key, not a pointer: a node removed from the tree
/// simply stops resolving, and an anchor pointing at it degrades to root
/// behaviour (its offset is used as an absolute position).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Anchor {
    pub offset: Vec2,
    pub parent: Option<WidgetId>,
}

impl Anchor {
    /// Anchored to screen space.
    #[inline]
    pub const fn root(offset: Vec2) -> Self {
        Self { offset, parent: None }
    }

    #[inline]
    pub const fn relative_to(parent: WidgetId, offset: Vec2) -> Self {
        Self { offset, parent: Some(parent) }
    }

    /// Absolute position: `offset` plus the resolved position of the parent chain.
    ///
    /// `lookup` maps a node to its anchor; a missing node ends the chain. No
    /// result is cached, so offsets changed since the last call are honoured.
    pub fn resolve(&self, lookup: impl Fn(WidgetId) -> Option<Anchor>) -> Vec2 {
        let mut pos = self.offset;
        let mut next = self.parent;
        while let Some(id) = next {
            match lookup(id) {
                Some(anchor) => {
                    pos += anchor.offset;
                    next = anchor.parent;
                }
                None => break,
            }
        }
        pos
    }

    /// `true` if `self` (belonging to node `owner`) already depends on `owner`
    /// through the chain starting at `candidate`, i.e. anchoring `owner` to
    /// `candidate` would close a loop.
    pub(crate) fn would_cycle(
        owner: WidgetId,
        candidate: WidgetId,
        lookup: impl Fn(WidgetId) -> Option<Anchor>,
    ) -> bool {
        let mut next = Some(candidate);
        while let Some(id) = next {
            if id == owner {
                return true;
            }
            next = lookup(id).and_then(|a| a.parent);
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use slotmap::SlotMap;

    use super::*;

    fn chain(offsets: &[Vec2]) -> (SlotMap<WidgetId, Anchor>, Vec<WidgetId>) {
        let mut arena: SlotMap<WidgetId, Anchor> = SlotMap::with_key();
        let mut ids = Vec::new();
        let mut parent = None;
        for &offset in offsets {
            let id = arena.insert(Anchor { offset, parent });
            ids.push(id);
            parent = Some(id);
        }
        (arena, ids)
    }

    #[test]
    fn root_resolves_to_its_offset() {
        let a = Anchor::root(Vec2::new(3.0, 4.0));
        assert_eq!(a.resolve(|_| None), Vec2::new(3.0, 4.0));
    }

    #[test]
    fn chain_resolves_to_sum_of_offsets() {
        let offsets = [
            Vec2::new(100.0, 50.0),
            Vec2::new(10.0, 20.0),
            Vec2::new(-5.0, 2.5),
            Vec2::new(1.0, 1.0),
        ];
        let (arena, ids) = chain(&offsets);
        let leaf = arena[*ids.last().unwrap()];
        let expected: Vec2 = offsets.iter().copied().sum();
        assert_eq!(leaf.resolve(|id| arena.get(id).copied()), expected);
    }

    #[test]
    fn moving_an_ancestor_moves_descendants() {
        let (mut arena, ids) = chain(&[Vec2::new(0.0, 0.0), Vec2::new(10.0, 10.0)]);
        arena[ids[0]].offset = Vec2::new(50.0, 0.0);
        let leaf = arena[ids[1]];
        assert_eq!(leaf.resolve(|id| arena.get(id).copied()), Vec2::new(60.0, 10.0));
    }

    #[test]
    fn missing_parent_degrades_to_root() {
        let (mut arena, ids) = chain(&[Vec2::new(7.0, 7.0), Vec2::new(1.0, 2.0)]);
        arena.remove(ids[0]);
        let leaf = arena[ids[1]];
        assert_eq!(leaf.resolve(|id| arena.get(id).copied()), Vec2::new(1.0, 2.0));
    }

    #[test]
    fn cycle_detection() {
        let (arena, ids) = chain(&[Vec2::zero(), Vec2::zero(), Vec2::zero()]);
        let lookup = |id| arena.get(id).copied();
        // Anchoring the root to its grandchild would loop.
        assert!(Anchor::would_cycle(ids[0], ids[2], lookup));
        assert!(Anchor::would_cycle(ids[1], ids[1], lookup));
        assert!(!Anchor::would_cycle(ids[2], ids[0], lookup));
    }
}
