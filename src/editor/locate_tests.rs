use pretty_assertions::assert_eq;

use super::*;
use crate::surface::Surface;
use crate::view::{FocusPoint, NodeId, RegionKind, SelectionProvider, ViewRegistry, ViewTree};

/// Mounts `parts` (`#label` for tags) on a fresh surface.
fn mounted(parts: &[&str]) -> (Document, ViewRegistry, Surface) {
    let segments = parts
        .iter()
        .enumerate()
        .map(|(idx, part)| {
            let id = SegmentId::from_raw(idx as u64);
            match part.strip_prefix('#') {
                Some(label) => Segment::tag(id, label),
                None => Segment::text(id, *part),
            }
        })
        .collect();
    let document = Document::from_segments(segments).unwrap();
    let mut registry = ViewRegistry::new();
    let mut surface = Surface::new();
    sync::reconcile(&document, &mut registry, &mut surface);
    sync::synchronize(&document, &registry, &mut surface);
    (document, registry, surface)
}

fn region(registry: &ViewRegistry, document: &Document, index: usize) -> NodeId {
    registry.get(document.segments()[index].id).unwrap()
}

/// Records every caret request before handing it to a real surface.
#[derive(Default)]
struct RecordingPlatform {
    inner: Surface,
    ranges: Vec<(NodeId, usize, usize)>,
    focused: Vec<NodeId>,
}

impl SelectionProvider for RecordingPlatform {
    fn focus_point(&self) -> Option<FocusPoint> {
        self.inner.focus_point()
    }

    fn set_range(&mut self, node: NodeId, start: usize, end: usize) {
        self.ranges.push((node, start, end));
        self.inner.set_range(node, start, end);
    }

    fn focus(&mut self, region: NodeId) {
        self.focused.push(region);
        self.inner.focus(region);
    }
}

impl ViewTree for RecordingPlatform {
    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.inner.parent(node)
    }

    fn children(&self, node: NodeId) -> &[NodeId] {
        self.inner.children(node)
    }

    fn text_len(&self, node: NodeId) -> usize {
        self.inner.text_len(node)
    }

    fn is_text_node(&self, node: NodeId) -> bool {
        self.inner.is_text_node(node)
    }

    fn displayed_content(&self, region: NodeId) -> String {
        self.inner.displayed_content(region)
    }

    fn replace_content(&mut self, region: NodeId, content: &str) {
        self.inner.replace_content(region, content);
    }

    fn mount(&mut self, kind: RegionKind) -> NodeId {
        self.inner.mount(kind)
    }

    fn unmount(&mut self, region: NodeId) {
        self.inner.unmount(region);
    }
}

#[test]
fn resolves_caret_inside_a_text_run() {
    let (doc, registry, mut surface) = mounted(&["ab", "#A", "cde"]);
    surface.click(region(&registry, &doc, 2), 2);

    assert_eq!(
        locate::resolve_focus(&doc, &registry, &surface),
        FocusContext::Cursor {
            index: 2,
            offset: 2
        }
    );
}

#[test]
fn resolves_caret_on_an_empty_region() {
    let (doc, registry, mut surface) = mounted(&["ab", "#A", ""]);
    surface.click(region(&registry, &doc, 2), 0);

    assert_eq!(
        locate::resolve_focus(&doc, &registry, &surface),
        FocusContext::Cursor {
            index: 2,
            offset: 0
        }
    );
}

#[test]
fn resolves_nested_text_nodes_to_their_region() {
    let (doc, registry, mut surface) = mounted(&["", "#A", "ab"]);
    let target = region(&registry, &doc, 2);
    let wrapper = surface.append_group(target).unwrap();
    let nested = surface.append_run(wrapper, "cd").unwrap();
    surface.set_range(nested, 1, 1);

    assert_eq!(
        locate::segment_index_for_node(&doc, &registry, &surface, nested),
        Some(2)
    );
    assert_eq!(
        locate::resolve_focus(&doc, &registry, &surface),
        FocusContext::Cursor {
            index: 2,
            offset: 3
        }
    );
}

#[test]
fn focus_on_a_chip_is_not_a_cursor() {
    let (doc, registry, mut surface) = mounted(&["ab", "#A", "cd"]);
    surface.set_range(region(&registry, &doc, 1), 0, 0);

    assert_eq!(
        locate::resolve_focus(&doc, &registry, &surface),
        FocusContext::Detached
    );
}

#[test]
fn focus_outside_the_widget_is_detached() {
    let (doc, registry, mut surface) = mounted(&["ab"]);
    let stranger = surface.mount(RegionKind::Text);
    surface.replace_content(stranger, "elsewhere");
    surface.click(stranger, 3);

    assert_eq!(
        locate::resolve_focus(&doc, &registry, &surface),
        FocusContext::Detached
    );
}

#[test]
fn no_selection_is_detached() {
    let (doc, registry, surface) = mounted(&["ab"]);

    assert_eq!(
        locate::resolve_focus(&doc, &registry, &surface),
        FocusContext::Detached
    );
}

#[test]
fn caret_to_end_focuses_region_and_collapses_after_last_run() {
    let (doc, registry, mut surface) = mounted(&["abc", "#A", "de"]);
    let target = region(&registry, &doc, 0);

    assert!(caret::move_caret_to_end(
        &mut surface,
        &registry,
        doc.segments()[0].id
    ));
    assert_eq!(surface.active_region(), Some(target));
    assert_eq!(surface.caret(), Some((target, 3)));
}

#[test]
fn caret_to_start_lands_before_first_run() {
    let (doc, registry, mut surface) = mounted(&["abc", "#A", "de"]);
    let target = region(&registry, &doc, 2);

    assert!(caret::move_caret_to_start(
        &mut surface,
        &registry,
        doc.segments()[2].id
    ));
    assert_eq!(surface.active_region(), Some(target));
    assert_eq!(surface.caret(), Some((target, 0)));
}

#[test]
fn caret_on_empty_region_uses_the_region_itself() {
    let (doc, registry, surface) = mounted(&["", "#A", ""]);
    let mut platform = RecordingPlatform {
        inner: surface,
        ..Default::default()
    };
    let target = region(&registry, &doc, 2);

    caret::move_caret_to_end(&mut platform, &registry, doc.segments()[2].id);
    assert_eq!(platform.focused, vec![target]);
    assert_eq!(platform.ranges, vec![(target, 0, 0)]);
}

#[test]
fn caret_skips_trailing_empty_runs() {
    let (doc, registry, mut surface) = mounted(&["ab"]);
    let target = region(&registry, &doc, 0);
    let first = surface.children(target)[0];
    surface.append_run(target, "");
    let mut platform = RecordingPlatform {
        inner: surface,
        ..Default::default()
    };

    caret::move_caret_to_end(&mut platform, &registry, doc.segments()[0].id);
    assert_eq!(platform.ranges, vec![(first, 2, 2)]);
}

#[test]
fn caret_without_a_mounted_region_is_a_no_op() {
    let (_, registry, surface) = mounted(&["ab"]);
    let mut platform = RecordingPlatform {
        inner: surface,
        ..Default::default()
    };

    assert!(!caret::move_caret_to_end(
        &mut platform,
        &registry,
        SegmentId::from_raw(99)
    ));
    assert!(!caret::move_caret_to_start(
        &mut platform,
        &registry,
        SegmentId::from_raw(99)
    ));
    assert!(platform.focused.is_empty());
    assert!(platform.ranges.is_empty());
}

#[test]
fn synchronize_only_writes_regions_that_differ() {
    let (doc, registry, mut surface) = mounted(&["ab", "#A", "cd"]);
    assert_eq!(sync::synchronize(&doc, &registry, &mut surface), 0);

    let edited = mutation::edit_text(&doc, 2, "changed").unwrap();
    assert_eq!(sync::synchronize(&edited, &registry, &mut surface), 1);
    assert_eq!(
        surface.displayed_content(region(&registry, &edited, 2)),
        "changed"
    );
}

#[test]
fn synchronize_leaves_matching_live_edit_alone() {
    let (doc, registry, mut surface) = mounted(&["ab"]);
    let target = region(&registry, &doc, 0);
    surface.click(target, 2);
    surface.apply_native(crate::surface::NativeKey::Char('c'));

    let captured = mutation::edit_text(&doc, 0, "abc").unwrap();
    assert_eq!(sync::synchronize(&captured, &registry, &mut surface), 0);
    assert_eq!(surface.caret(), Some((target, 3)));
}

#[test]
fn reconcile_mounts_new_and_unmounts_removed_segments() {
    let (doc, mut registry, mut surface) = mounted(&["ab", "#A", "cd"]);
    assert_eq!(registry.len(), 3);
    let chip = region(&registry, &doc, 1);
    assert_eq!(surface.chip_label(chip), Some("A"));

    let mut ids = SegmentIds::after(&doc);
    let deleted = mutation::delete_tag(&doc, 1, &mut ids).unwrap();
    sync::reconcile(&deleted.document, &mut registry, &mut surface);

    assert_eq!(registry.len(), 1);
    assert_eq!(surface.chip_label(chip), None);
    assert_eq!(
        registry.get(doc.segments()[0].id),
        Some(region(&registry, &deleted.document, 0))
    );
}
