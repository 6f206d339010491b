use std::collections::HashSet;

use log::trace;

use super::segment::{Document, SegmentBody};
use crate::view::{RegionKind, ViewRegistry, ViewTree};

/// Mount regions for segments that just appeared and unmount the ones whose
/// segments left the document. Surviving segments keep their region.
pub fn reconcile<T: ViewTree + ?Sized>(
    document: &Document,
    registry: &mut ViewRegistry,
    tree: &mut T,
) {
    let live: HashSet<_> = document.segments().iter().map(|segment| segment.id).collect();
    for id in registry.ids() {
        if live.contains(&id) {
            continue;
        }
        if let Some(region) = registry.remove(id) {
            tree.unmount(region);
        }
    }

    for segment in document.segments() {
        if registry.get(segment.id).is_some() {
            continue;
        }
        let kind = match &segment.body {
            SegmentBody::Text { .. } => RegionKind::Text,
            SegmentBody::Tag { label } => RegionKind::Chip {
                label: label.clone(),
            },
        };
        let region = tree.mount(kind);
        registry.insert(segment.id, region);
    }
}

/// Push stored text into every text region that displays something else.
///
/// Regions already showing the right content are left alone so a live edit
/// (and its caret) is not disturbed. Returns how many regions were written.
pub fn synchronize<T: ViewTree + ?Sized>(
    document: &Document,
    registry: &ViewRegistry,
    tree: &mut T,
) -> usize {
    let mut written = 0;
    for segment in document.segments() {
        let Some(content) = segment.content() else {
            continue;
        };
        let Some(region) = registry.get(segment.id) else {
            continue;
        };
        if tree.displayed_content(region) != content {
            trace!(
                "overwriting region {} for segment {}",
                region.as_raw(),
                segment.id.as_raw()
            );
            tree.replace_content(region, content);
            written += 1;
        }
    }
    written
}
