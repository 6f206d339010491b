use log::debug;

use super::segment::SegmentId;
use crate::view::{NodeId, Platform, ViewRegistry};

/// Focus the region of segment `id` and collapse the selection after its
/// last content-bearing child. Returns `false` when the segment has no
/// mounted region.
pub fn move_caret_to_end<P: Platform + ?Sized>(
    platform: &mut P,
    registry: &ViewRegistry,
    id: SegmentId,
) -> bool {
    let Some(region) = focus_region(platform, registry, id) else {
        return false;
    };
    let children = platform.children(region);
    let last = children
        .iter()
        .rposition(|child| platform.text_len(*child) > 0)
        .map(|position| (position, children[position]));

    match last {
        Some((_, child)) if platform.is_text_node(child) => {
            let len = platform.text_len(child);
            platform.set_range(child, len, len);
        }
        Some((position, _)) => platform.set_range(region, position + 1, position + 1),
        None => platform.set_range(region, 0, 0),
    }
    true
}

/// Focus the region of segment `id` and collapse the selection before its
/// first content-bearing child.
pub fn move_caret_to_start<P: Platform + ?Sized>(
    platform: &mut P,
    registry: &ViewRegistry,
    id: SegmentId,
) -> bool {
    let Some(region) = focus_region(platform, registry, id) else {
        return false;
    };
    let children = platform.children(region);
    let first = children
        .iter()
        .position(|child| platform.text_len(*child) > 0)
        .map(|position| (position, children[position]));

    match first {
        Some((_, child)) if platform.is_text_node(child) => platform.set_range(child, 0, 0),
        Some((position, _)) => platform.set_range(region, position, position),
        None => platform.set_range(region, 0, 0),
    }
    true
}

fn focus_region<P: Platform + ?Sized>(
    platform: &mut P,
    registry: &ViewRegistry,
    id: SegmentId,
) -> Option<NodeId> {
    let Some(region) = registry.get(id) else {
        debug!("no mounted region for segment {}", id.as_raw());
        return None;
    };
    platform.focus(region);
    Some(region)
}
