//! Seams between the segment model and whatever displays it.
//!
//! The core never owns on-screen state. It talks to the display through two
//! capabilities: [`SelectionProvider`] for focus and caret placement, and
//! [`ViewTree`] for structural queries and content writes. Segments refer to
//! their regions only through the [`ViewRegistry`] relation table.

use std::collections::HashMap;

use crate::editor::SegmentId;

/// Opaque handle to a node in the view.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u64);

impl NodeId {
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn as_raw(self) -> u64 {
        self.0
    }
}

/// What kind of region to mount for a segment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RegionKind {
    /// Independently editable text region.
    Text,
    /// Atomic chip displaying `label`.
    Chip { label: String },
}

/// Caret location as reported by the platform.
///
/// `offset` follows DOM range semantics: characters when `node` is a text
/// run, child positions when `node` is a region.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FocusPoint {
    pub node: NodeId,
    pub offset: usize,
}

/// Platform selection and focus.
pub trait SelectionProvider {
    /// Current caret, if any.
    fn focus_point(&self) -> Option<FocusPoint>;

    /// Replace the active selection with `start..end` inside `node`.
    fn set_range(&mut self, node: NodeId, start: usize, end: usize);

    /// Give keyboard focus to `region`.
    fn focus(&mut self, region: NodeId);
}

/// Structure and content of the mounted regions.
pub trait ViewTree {
    fn parent(&self, node: NodeId) -> Option<NodeId>;

    fn children(&self, node: NodeId) -> &[NodeId];

    /// Number of characters below `node` (its text content length).
    fn text_len(&self, node: NodeId) -> usize;

    /// True for leaf nodes carrying characters.
    fn is_text_node(&self, node: NodeId) -> bool;

    /// Concatenated text of a region.
    fn displayed_content(&self, region: NodeId) -> String;

    /// Overwrite a region's displayed text.
    fn replace_content(&mut self, region: NodeId, content: &str);

    fn mount(&mut self, kind: RegionKind) -> NodeId;

    fn unmount(&mut self, region: NodeId);

    /// Characters between the start of `ancestor` and `point`.
    fn character_offset(&self, ancestor: NodeId, point: FocusPoint) -> usize {
        let mut total = if self.is_text_node(point.node) {
            point.offset.min(self.text_len(point.node))
        } else {
            self.children(point.node)
                .iter()
                .take(point.offset)
                .map(|child| self.text_len(*child))
                .sum()
        };
        let mut current = point.node;
        while current != ancestor {
            let Some(parent) = self.parent(current) else {
                break;
            };
            total += self
                .children(parent)
                .iter()
                .take_while(|sibling| **sibling != current)
                .map(|sibling| self.text_len(*sibling))
                .sum::<usize>();
            current = parent;
        }
        total
    }

    /// True when `node` is `ancestor` or sits somewhere below it.
    fn is_self_or_descendant(&self, node: NodeId, ancestor: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(candidate) = current {
            if candidate == ancestor {
                return true;
            }
            current = self.parent(candidate);
        }
        false
    }
}

/// Everything the editor needs from its host.
pub trait Platform: SelectionProvider + ViewTree {}

impl<T: SelectionProvider + ViewTree> Platform for T {}

/// Relation table from segment id to mounted region.
#[derive(Debug, Default)]
pub struct ViewRegistry {
    regions: HashMap<SegmentId, NodeId>,
}

impl ViewRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: SegmentId) -> Option<NodeId> {
        self.regions.get(&id).copied()
    }

    pub fn insert(&mut self, id: SegmentId, region: NodeId) {
        self.regions.insert(id, region);
    }

    pub fn remove(&mut self, id: SegmentId) -> Option<NodeId> {
        self.regions.remove(&id)
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    pub(crate) fn ids(&self) -> Vec<SegmentId> {
        self.regions.keys().copied().collect()
    }
}
