//! In-memory editing surface standing in for the platform.
//!
//! Regions are root nodes; text regions hold text runs as children. Native
//! editing (typing, Backspace/Delete, caret keys) only ever acts inside the
//! active region, so the caret stops at region boundaries just like it does
//! between separate editable elements.

use std::collections::HashMap;

use crate::editor::mutation::char_to_byte_idx;
use crate::view::{FocusPoint, NodeId, RegionKind, SelectionProvider, ViewTree};

#[derive(Clone, Debug)]
enum NodeData {
    TextRegion,
    ChipRegion { label: String },
    /// Inline wrapper with no text of its own.
    Group,
    Run { text: String },
}

#[derive(Clone, Debug)]
struct Node {
    data: NodeData,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Range {
    node: NodeId,
    start: usize,
    end: usize,
}

/// Keys the surface handles natively inside the active region.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NativeKey {
    Char(char),
    Backspace,
    Delete,
    Left,
    Right,
    Home,
    End,
}

#[derive(Debug, Default)]
pub struct Surface {
    nodes: HashMap<NodeId, Node>,
    next_node: u64,
    active: Option<NodeId>,
    range: Option<Range>,
}

impl Surface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Region that currently has keyboard focus.
    pub fn active_region(&self) -> Option<NodeId> {
        self.active
    }

    pub fn is_text_region(&self, node: NodeId) -> bool {
        matches!(
            self.nodes.get(&node).map(|node| &node.data),
            Some(NodeData::TextRegion)
        )
    }

    pub fn chip_label(&self, node: NodeId) -> Option<&str> {
        match self.nodes.get(&node).map(|node| &node.data) {
            Some(NodeData::ChipRegion { label }) => Some(label),
            _ => None,
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Append a text run below `parent`.
    ///
    /// Editing platforms are free to split a region's text across several
    /// nodes; this lets callers reproduce that shape.
    pub fn append_run(&mut self, parent: NodeId, text: &str) -> Option<NodeId> {
        self.append_child(
            parent,
            NodeData::Run {
                text: text.to_string(),
            },
        )
    }

    /// Append an inline wrapper below `parent`; runs can then nest inside it.
    pub fn append_group(&mut self, parent: NodeId) -> Option<NodeId> {
        self.append_child(parent, NodeData::Group)
    }

    fn append_child(&mut self, parent: NodeId, data: NodeData) -> Option<NodeId> {
        if !self.nodes.contains_key(&parent) {
            return None;
        }
        let id = self.allocate(data, Some(parent));
        if let Some(node) = self.nodes.get_mut(&parent) {
            node.children.push(id);
        }
        Some(id)
    }

    /// Region and character offset of the caret within that region.
    pub fn caret(&self) -> Option<(NodeId, usize)> {
        let range = self.range?;
        let region = self.root_of(range.node);
        let point = FocusPoint {
            node: range.node,
            offset: range.end,
        };
        Some((region, self.character_offset(region, point)))
    }

    /// True when the selection is a caret rather than a span.
    pub fn is_collapsed(&self) -> bool {
        self.range.is_none_or(|range| range.start == range.end)
    }

    /// Place the caret `offset` characters into `region`, as a click would.
    pub fn click(&mut self, region: NodeId, offset: usize) -> bool {
        if !self.is_text_region(region) {
            return false;
        }
        self.focus(region);
        self.place_caret(region, offset);
        true
    }

    /// Run a native editing key in the active region.
    ///
    /// Returns the region whose content changed, which the host must report
    /// back through the input-capture path.
    pub fn apply_native(&mut self, key: NativeKey) -> Option<NodeId> {
        let region = self.active?;
        let (caret_region, offset) = self.caret()?;
        if caret_region != region {
            return None;
        }
        let content = self.displayed_content(region);
        let len = content.chars().count();
        let offset = offset.min(len);

        match key {
            NativeKey::Char(ch) => {
                let mut updated = content;
                updated.insert(char_to_byte_idx(&updated, offset), ch);
                self.replace_content(region, &updated);
                self.place_caret(region, offset + 1);
                Some(region)
            }
            NativeKey::Backspace => {
                if offset == 0 {
                    return None;
                }
                let updated = remove_char(&content, offset - 1);
                self.replace_content(region, &updated);
                self.place_caret(region, offset - 1);
                Some(region)
            }
            NativeKey::Delete => {
                if offset >= len {
                    return None;
                }
                let updated = remove_char(&content, offset);
                self.replace_content(region, &updated);
                self.place_caret(region, offset);
                Some(region)
            }
            NativeKey::Left => {
                self.place_caret(region, offset.saturating_sub(1));
                None
            }
            NativeKey::Right => {
                self.place_caret(region, (offset + 1).min(len));
                None
            }
            NativeKey::Home => {
                self.place_caret(region, 0);
                None
            }
            NativeKey::End => {
                self.place_caret(region, len);
                None
            }
        }
    }

    /// Collapse the selection `offset` characters into `region`, inside the
    /// run holding that position.
    fn place_caret(&mut self, region: NodeId, offset: usize) {
        let mut runs = Vec::new();
        self.collect_runs(region, &mut runs);
        let mut remaining = offset;
        for run in &runs {
            let len = self.text_len(*run);
            if remaining <= len {
                self.set_range(*run, remaining, remaining);
                return;
            }
            remaining -= len;
        }
        match runs.last() {
            Some(&last) => {
                let len = self.text_len(last);
                self.set_range(last, len, len);
            }
            None => self.set_range(region, 0, 0),
        }
    }

    /// Text runs below `node`, in display order.
    fn collect_runs(&self, node: NodeId, out: &mut Vec<NodeId>) {
        let Some(entry) = self.nodes.get(&node) else {
            return;
        };
        if matches!(entry.data, NodeData::Run { .. }) {
            out.push(node);
        }
        for child in &entry.children {
            self.collect_runs(*child, out);
        }
    }

    fn allocate(&mut self, data: NodeData, parent: Option<NodeId>) -> NodeId {
        let id = NodeId::from_raw(self.next_node);
        self.next_node += 1;
        self.nodes.insert(
            id,
            Node {
                data,
                parent,
                children: Vec::new(),
            },
        );
        id
    }

    fn root_of(&self, node: NodeId) -> NodeId {
        let mut current = node;
        while let Some(parent) = self.parent(current) {
            current = parent;
        }
        current
    }

    fn remove_subtree(&mut self, node: NodeId) {
        let Some(removed) = self.nodes.remove(&node) else {
            return;
        };
        for child in removed.children {
            self.remove_subtree(child);
        }
    }

    fn collect_text(&self, node: NodeId, out: &mut String) {
        let Some(entry) = self.nodes.get(&node) else {
            return;
        };
        if let NodeData::Run { text } = &entry.data {
            out.push_str(text);
        }
        for child in &entry.children {
            self.collect_text(*child, out);
        }
    }
}

fn remove_char(text: &str, offset: usize) -> String {
    let start = char_to_byte_idx(text, offset);
    let end = char_to_byte_idx(text, offset + 1);
    let mut updated = String::with_capacity(text.len());
    updated.push_str(&text[..start]);
    updated.push_str(&text[end..]);
    updated
}

impl SelectionProvider for Surface {
    fn focus_point(&self) -> Option<FocusPoint> {
        self.range.map(|range| FocusPoint {
            node: range.node,
            offset: range.end,
        })
    }

    fn set_range(&mut self, node: NodeId, start: usize, end: usize) {
        let Some(entry) = self.nodes.get(&node) else {
            return;
        };
        let max = match &entry.data {
            NodeData::Run { text } => text.chars().count(),
            _ => entry.children.len(),
        };
        self.range = Some(Range {
            node,
            start: start.min(max),
            end: end.min(max),
        });
    }

    fn focus(&mut self, region: NodeId) {
        if self.is_text_region(region) {
            self.active = Some(region);
        }
    }
}

impl ViewTree for Surface {
    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(&node).and_then(|node| node.parent)
    }

    fn children(&self, node: NodeId) -> &[NodeId] {
        self.nodes
            .get(&node)
            .map(|node| node.children.as_slice())
            .unwrap_or(&[])
    }

    fn text_len(&self, node: NodeId) -> usize {
        let Some(entry) = self.nodes.get(&node) else {
            return 0;
        };
        match &entry.data {
            NodeData::Run { text } => text.chars().count(),
            _ => entry
                .children
                .iter()
                .map(|child| self.text_len(*child))
                .sum(),
        }
    }

    fn is_text_node(&self, node: NodeId) -> bool {
        matches!(
            self.nodes.get(&node).map(|node| &node.data),
            Some(NodeData::Run { .. })
        )
    }

    fn displayed_content(&self, region: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(region, &mut out);
        out
    }

    fn replace_content(&mut self, region: NodeId, content: &str) {
        if !self.is_text_region(region) {
            return;
        }
        let caret_was_inside = self
            .range
            .is_some_and(|range| self.root_of(range.node) == region);
        let old_children = self
            .nodes
            .get_mut(&region)
            .map(|node| std::mem::take(&mut node.children))
            .unwrap_or_default();
        for child in old_children {
            self.remove_subtree(child);
        }
        if !content.is_empty() {
            self.append_run(region, content);
        }
        if caret_was_inside {
            // Removing the caret's node collapses the selection to the region start.
            self.range = Some(Range {
                node: region,
                start: 0,
                end: 0,
            });
        }
    }

    fn mount(&mut self, kind: RegionKind) -> NodeId {
        let data = match kind {
            RegionKind::Text => NodeData::TextRegion,
            RegionKind::Chip { label } => NodeData::ChipRegion { label },
        };
        self.allocate(data, None)
    }

    fn unmount(&mut self, region: NodeId) {
        if self
            .range
            .is_some_and(|range| self.root_of(range.node) == region)
        {
            self.range = None;
        }
        if self.active == Some(region) {
            self.active = None;
        }
        self.remove_subtree(region);
    }
}
