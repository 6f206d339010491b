use super::mutation::FocusContext;
use super::segment::Document;
use crate::view::{FocusPoint, NodeId, Platform, ViewRegistry, ViewTree};

/// Index of the segment whose region is `node` or contains it.
pub fn segment_index_for_node<T: ViewTree + ?Sized>(
    document: &Document,
    registry: &ViewRegistry,
    tree: &T,
    node: NodeId,
) -> Option<usize> {
    document.segments().iter().position(|segment| {
        registry
            .get(segment.id)
            .is_some_and(|region| tree.is_self_or_descendant(node, region))
    })
}

/// Resolve a reported focus point into a text segment and a character
/// offset inside it.
pub fn resolve_point<T: ViewTree + ?Sized>(
    document: &Document,
    registry: &ViewRegistry,
    tree: &T,
    point: FocusPoint,
) -> FocusContext {
    let Some(index) = segment_index_for_node(document, registry, tree, point.node) else {
        return FocusContext::Detached;
    };
    let segment = &document.segments()[index];
    let Some(region) = registry.get(segment.id) else {
        return FocusContext::Detached;
    };
    if !segment.is_text() {
        return FocusContext::Detached;
    }
    FocusContext::Cursor {
        index,
        offset: tree.character_offset(region, point),
    }
}

/// Ask the platform where the caret is right now.
pub fn resolve_focus<P: Platform + ?Sized>(
    document: &Document,
    registry: &ViewRegistry,
    platform: &P,
) -> FocusContext {
    match platform.focus_point() {
        Some(point) => resolve_point(document, registry, platform, point),
        None => FocusContext::Detached,
    }
}
