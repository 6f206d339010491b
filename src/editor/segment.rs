use std::collections::HashSet;

use super::EditError;

/// Stable identity of a segment for as long as it stays in the document.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SegmentId(u64);

impl SegmentId {
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn as_raw(self) -> u64 {
        self.0
    }
}

/// Monotonic id source. Two segments created back to back never share an id.
#[derive(Debug, Default)]
pub struct SegmentIds {
    next: u64,
}

impl SegmentIds {
    pub fn new() -> Self {
        Self::default()
    }

    /// Continue numbering after the largest id already in `document`.
    pub fn after(document: &Document) -> Self {
        let next = document
            .segments()
            .iter()
            .map(|segment| segment.id.as_raw() + 1)
            .max()
            .unwrap_or(0);
        Self { next }
    }

    pub fn next_id(&mut self) -> SegmentId {
        let id = SegmentId(self.next);
        self.next += 1;
        id
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SegmentKind {
    Text,
    Tag,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Segment {
    pub id: SegmentId,
    pub body: SegmentBody,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SegmentBody {
    Text { content: String },
    Tag { label: String },
}

impl Segment {
    pub fn text(id: SegmentId, content: impl Into<String>) -> Self {
        Self {
            id,
            body: SegmentBody::Text {
                content: content.into(),
            },
        }
    }

    pub fn tag(id: SegmentId, label: impl Into<String>) -> Self {
        Self {
            id,
            body: SegmentBody::Tag {
                label: label.into(),
            },
        }
    }

    pub fn kind(&self) -> SegmentKind {
        match self.body {
            SegmentBody::Text { .. } => SegmentKind::Text,
            SegmentBody::Tag { .. } => SegmentKind::Tag,
        }
    }

    pub fn is_text(&self) -> bool {
        self.kind() == SegmentKind::Text
    }

    pub fn is_tag(&self) -> bool {
        self.kind() == SegmentKind::Tag
    }

    /// Text content, or `None` for a tag.
    pub fn content(&self) -> Option<&str> {
        match &self.body {
            SegmentBody::Text { content } => Some(content),
            SegmentBody::Tag { .. } => None,
        }
    }

    /// Length of the text content in characters; tags have no length.
    pub fn char_len(&self) -> usize {
        self.content().map_or(0, |content| content.chars().count())
    }
}

/// Ordered, never-empty sequence of segments.
///
/// Documents are value snapshots: every mutation builds a new one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Document {
    segments: Vec<Segment>,
}

impl Document {
    /// A document holding a single empty text segment.
    pub fn new(ids: &mut SegmentIds) -> Self {
        Self {
            segments: vec![Segment::text(ids.next_id(), "")],
        }
    }

    /// Build a document from caller-supplied segments, rejecting sequences
    /// that break the model: empty, repeated ids, or two tags side by side.
    pub fn from_segments(segments: Vec<Segment>) -> Result<Self, EditError> {
        if segments.is_empty() {
            return Err(EditError::EmptyDocument);
        }
        let mut seen = HashSet::with_capacity(segments.len());
        if let Some(duplicate) = segments.iter().find(|segment| !seen.insert(segment.id)) {
            return Err(EditError::DuplicateId {
                id: duplicate.id.as_raw(),
            });
        }
        let document = Self { segments };
        if document.has_adjacent_tags() {
            return Err(EditError::AdjacentTags);
        }
        Ok(document)
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn get(&self, index: usize) -> Option<&Segment> {
        self.segments.get(index)
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn last(&self) -> &Segment {
        // Non-empty by construction.
        &self.segments[self.segments.len() - 1]
    }

    pub fn index_of(&self, id: SegmentId) -> Option<usize> {
        self.segments.iter().position(|segment| segment.id == id)
    }

    pub fn has_adjacent_tags(&self) -> bool {
        self.segments
            .windows(2)
            .any(|pair| pair[0].is_tag() && pair[1].is_tag())
    }

    /// Text with each tag shown as `[label]`.
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match &segment.body {
                SegmentBody::Text { content } => out.push_str(content),
                SegmentBody::Tag { label } => {
                    out.push('[');
                    out.push_str(label);
                    out.push(']');
                }
            }
        }
        out
    }

    pub fn tag_count(&self) -> usize {
        self.segments.iter().filter(|segment| segment.is_tag()).count()
    }

    pub(crate) fn into_segments(self) -> Vec<Segment> {
        self.segments
    }

    /// Wrap a sequence produced by the mutation engine, restoring the
    /// never-empty guarantee.
    pub(crate) fn from_mutation(mut segments: Vec<Segment>, ids: &mut SegmentIds) -> Self {
        if segments.is_empty() {
            segments.push(Segment::text(ids.next_id(), ""));
        }
        Self { segments }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_document_is_single_empty_text() {
        let mut ids = SegmentIds::new();
        let document = Document::new(&mut ids);
        assert_eq!(document.len(), 1);
        assert_eq!(document.segments()[0].content(), Some(""));
    }

    #[test]
    fn ids_are_strictly_increasing() {
        let mut ids = SegmentIds::new();
        let a = ids.next_id();
        let b = ids.next_id();
        assert!(b > a);
    }

    #[test]
    fn ids_continue_after_existing_document() {
        let document = Document::from_segments(vec![
            Segment::text(SegmentId::from_raw(4), "a"),
            Segment::tag(SegmentId::from_raw(9), "X"),
            Segment::text(SegmentId::from_raw(2), "b"),
        ])
        .unwrap();
        let mut ids = SegmentIds::after(&document);
        assert_eq!(ids.next_id(), SegmentId::from_raw(10));
    }

    #[test]
    fn empty_segment_list_is_rejected() {
        assert_eq!(
            Document::from_segments(Vec::new()),
            Err(EditError::EmptyDocument)
        );
    }

    #[test]
    fn repeated_ids_are_rejected() {
        let result = Document::from_segments(vec![
            Segment::text(SegmentId::from_raw(1), "left"),
            Segment::tag(SegmentId::from_raw(2), "X"),
            Segment::text(SegmentId::from_raw(1), "right"),
        ]);
        assert_eq!(result, Err(EditError::DuplicateId { id: 1 }));
    }

    #[test]
    fn side_by_side_tags_are_rejected() {
        let result = Document::from_segments(vec![
            Segment::text(SegmentId::from_raw(0), "a"),
            Segment::tag(SegmentId::from_raw(1), "A"),
            Segment::tag(SegmentId::from_raw(2), "B"),
        ]);
        assert_eq!(result, Err(EditError::AdjacentTags));
    }

    #[test]
    fn plain_text_brackets_tags() {
        let document = Document::from_segments(vec![
            Segment::text(SegmentId::from_raw(0), "hi "),
            Segment::tag(SegmentId::from_raw(1), "Rust"),
            Segment::text(SegmentId::from_raw(2), ""),
        ])
        .unwrap();
        assert_eq!(document.plain_text(), "hi [Rust]");
        assert_eq!(document.tag_count(), 1);
    }

    #[test]
    fn char_len_counts_characters_not_bytes() {
        let segment = Segment::text(SegmentId::from_raw(0), "héllo");
        assert_eq!(segment.char_len(), 5);
    }
}
