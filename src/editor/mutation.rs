use super::segment::{Document, Segment, SegmentId, SegmentIds};
use super::EditError;

/// Where the platform says the user is typing, resolved against the document.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FocusContext {
    /// Caret inside the text segment at `index`, `offset` characters in.
    Cursor { index: usize, offset: usize },
    /// No caret inside the widget.
    Detached,
}

/// Result of a tag insertion: the new document plus the text segment the
/// caret should land at the start of.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Insertion {
    pub document: Document,
    pub caret: SegmentId,
}

/// Result of a tag deletion: the new document plus the text segment the
/// caret should land at the end of, if any.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Deletion {
    pub document: Document,
    pub focus: Option<SegmentId>,
}

/// Insert a tag labelled `label`.
///
/// With a cursor the focused text run is split around the caret (both halves
/// trimmed) and the tag goes in between; the left half keeps the focused
/// segment's id. Without one the tag is appended, padded with empty text
/// runs so that two tags never touch.
pub fn insert_tag(
    document: &Document,
    label: &str,
    focus: FocusContext,
    ids: &mut SegmentIds,
) -> Insertion {
    if let FocusContext::Cursor { index, offset } = focus {
        if let Some(insertion) = split_insert(document, index, offset, label, ids) {
            return insertion;
        }
    }
    append_tag(document, label, ids)
}

fn split_insert(
    document: &Document,
    index: usize,
    offset: usize,
    label: &str,
    ids: &mut SegmentIds,
) -> Option<Insertion> {
    let focused = document.get(index)?;
    let content = focused.content()?;
    let (pre, post) = split_at_char(content, offset);

    let tag = Segment::tag(ids.next_id(), label);
    let after = Segment::text(ids.next_id(), post.trim());
    let caret = after.id;

    let mut segments = Vec::with_capacity(document.len() + 2);
    segments.extend_from_slice(&document.segments()[..index]);
    segments.push(Segment::text(focused.id, pre.trim()));
    segments.push(tag);
    segments.push(after);
    segments.extend_from_slice(&document.segments()[index + 1..]);

    Some(Insertion {
        document: Document::from_mutation(segments, ids),
        caret,
    })
}

fn append_tag(document: &Document, label: &str, ids: &mut SegmentIds) -> Insertion {
    let ends_with_tag = document.last().is_tag();
    let mut segments = document.clone().into_segments();
    if ends_with_tag {
        segments.push(Segment::text(ids.next_id(), ""));
    }
    segments.push(Segment::tag(ids.next_id(), label));
    let trailing = Segment::text(ids.next_id(), "");
    let caret = trailing.id;
    segments.push(trailing);

    Insertion {
        document: Document::from_mutation(segments, ids),
        caret,
    }
}

/// Remove the tag at `index`, merging its text neighbours into the left one.
pub fn delete_tag(
    document: &Document,
    index: usize,
    ids: &mut SegmentIds,
) -> Result<Deletion, EditError> {
    let segment = document.get(index).ok_or(EditError::OutOfRange {
        index,
        len: document.len(),
    })?;
    if !segment.is_tag() {
        return Err(EditError::NotATag { index });
    }

    let previous = index.checked_sub(1).and_then(|i| document.get(i));
    let next = document.get(index + 1);
    let all = document.segments();

    let merge = match (previous, next.and_then(Segment::content)) {
        (Some(previous), Some(right)) => previous
            .content()
            .map(|left| (previous.id, format!("{left}{right}"))),
        _ => None,
    };

    let segments = match merge {
        Some((id, merged)) => {
            let mut segments = Vec::with_capacity(all.len() - 2);
            segments.extend_from_slice(&all[..index - 1]);
            segments.push(Segment::text(id, merged));
            segments.extend_from_slice(&all[index + 2..]);
            segments
        }
        None => {
            let mut segments = all.to_vec();
            segments.remove(index);
            segments
        }
    };

    let document = Document::from_mutation(segments, ids);
    let focus_index = if previous.is_some() { index - 1 } else { index };
    let focus = document
        .get(focus_index)
        .filter(|segment| segment.is_text())
        .map(|segment| segment.id);

    Ok(Deletion { document, focus })
}

/// Replace the content of the text segment at `index`.
pub fn edit_text(
    document: &Document,
    index: usize,
    content: &str,
) -> Result<Document, EditError> {
    let segment = document.get(index).ok_or(EditError::OutOfRange {
        index,
        len: document.len(),
    })?;
    if !segment.is_text() {
        return Err(EditError::NotText { index });
    }
    if segment.content() == Some(content) {
        return Ok(document.clone());
    }

    let mut segments = document.segments().to_vec();
    segments[index] = Segment::text(segment.id, content);
    Document::from_segments(segments)
}

pub fn char_to_byte_idx(text: &str, char_idx: usize) -> usize {
    if char_idx == 0 {
        return 0;
    }
    for (count, (byte_idx, _)) in text.char_indices().enumerate() {
        if count == char_idx {
            return byte_idx;
        }
    }
    text.len()
}

/// Split `text` at a character offset, clamping past-the-end offsets.
pub fn split_at_char(text: &str, offset: usize) -> (&str, &str) {
    text.split_at(char_to_byte_idx(text, offset))
}
