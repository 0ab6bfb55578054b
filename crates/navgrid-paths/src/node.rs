use std::cmp::Ordering;

use navgrid_core::{Point, WorldPoint};

use crate::heap::HeapItem;

/// Sentinel cost meaning "not reached yet".
pub const UNREACHABLE: i32 = i32::MAX;

/// Sentinel parent index for the start node.
pub(crate) const NO_PARENT: usize = usize::MAX;

/// Immutable data of one grid cell, fixed when the grid is built.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Node {
    pub pos: Point,
    pub walkable: bool,
    pub world: WorldPoint,
    /// Extra cost paid for entering this cell. Never negative.
    pub penalty: i32,
}

// ---------------------------------------------------------------------------
// Per-search scratch
// ---------------------------------------------------------------------------

/// Search-scoped costs of one cell. A fresh array of these is allocated for
/// every search, so nothing leaks from one query into the next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct NodeState {
    pub(crate) g: i32,
    pub(crate) h: i32,
    /// Flat index of the predecessor on the best known path.
    pub(crate) parent: usize,
    pub(crate) closed: bool,
}

impl NodeState {
    #[inline]
    pub(crate) fn f(&self) -> i32 {
        self.g.saturating_add(self.h)
    }
}

impl Default for NodeState {
    fn default() -> Self {
        Self {
            g: UNREACHABLE,
            h: 0,
            parent: NO_PARENT,
            closed: false,
        }
    }
}

/// Open-set entry: a flat cell index plus a copy of the costs that order it.
///
/// Lower `f` ranks higher; equal `f` is broken by lower `h`, favouring cells
/// believed closer to the goal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct OpenNode {
    pub(crate) idx: usize,
    pub(crate) g: i32,
    pub(crate) h: i32,
}

impl OpenNode {
    #[inline]
    pub(crate) fn f(&self) -> i32 {
        self.g.saturating_add(self.h)
    }
}

impl Ord for OpenNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed so the max-heap pops the cheapest entry first.
        other
            .f()
            .cmp(&self.f())
            .then_with(|| other.h.cmp(&self.h))
    }
}

impl PartialOrd for OpenNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl HeapItem for OpenNode {
    #[inline]
    fn heap_key(&self) -> usize {
        self.idx
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heap::IndexedHeap;

    fn open(idx: usize, g: i32, h: i32) -> OpenNode {
        OpenNode { idx, g, h }
    }

    #[test]
    fn lower_f_ranks_higher() {
        assert!(open(0, 10, 10) > open(1, 20, 10));
    }

    #[test]
    fn equal_f_prefers_lower_h() {
        assert!(open(0, 30, 10) > open(1, 20, 20));
    }

    #[test]
    fn state_defaults_unreached() {
        let s = NodeState::default();
        assert_eq!(s.g, UNREACHABLE);
        assert_eq!(s.parent, NO_PARENT);
        assert!(!s.closed);
        assert_eq!(s.f(), UNREACHABLE);
    }

    #[test]
    fn heap_pops_non_decreasing_f() {
        let mut h = IndexedHeap::with_capacity(6);
        h.insert(open(0, 14, 42));
        h.insert(open(1, 10, 50));
        h.insert(open(2, 28, 28));
        h.insert(open(3, 20, 50));
        h.insert(open(4, 0, 56));
        h.insert(open(5, 24, 44));
        let mut last = (i32::MIN, i32::MIN);
        while let Ok(n) = h.extract_best() {
            let cur = (n.f(), n.h);
            assert!(cur >= last, "{cur:?} popped after {last:?}");
            last = cur;
        }
    }
}
