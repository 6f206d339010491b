use log::debug;
use thiserror::Error;

pub mod caret;
pub mod locate;
pub mod mutation;
pub mod navigation;
pub mod segment;
pub mod sync;

pub use mutation::{Deletion, FocusContext, Insertion};
pub use navigation::{KeyOutcome, NavAction, NavKey};
pub use segment::{Document, Segment, SegmentBody, SegmentId, SegmentIds, SegmentKind};

use crate::view::{NodeId, Platform, ViewRegistry};

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum EditError {
    #[error("segment index {index} is out of range for {len} segments")]
    OutOfRange { index: usize, len: usize },

    #[error("segment {index} is not a tag")]
    NotATag { index: usize },

    #[error("segment {index} is not a text segment")]
    NotText { index: usize },

    #[error("a document needs at least one segment")]
    EmptyDocument,

    #[error("segment id {id} appears more than once")]
    DuplicateId { id: u64 },

    #[error("two tags cannot sit next to each other")]
    AdjacentTags,
}

/// Inline editor mixing editable text runs with atomic tags.
///
/// Owns the document and the id registry; the platform owns focus, the
/// caret and the displayed content. Every mutation replaces the document,
/// then reconciles the mounted regions, synchronizes their content and
/// finally moves the caret, all before returning.
#[derive(Debug)]
pub struct TagEditor<P> {
    document: Document,
    ids: SegmentIds,
    registry: ViewRegistry,
    platform: P,
    suggested_tags: Vec<String>,
}

impl<P: Platform> TagEditor<P> {
    pub fn new(platform: P, suggested_tags: Vec<String>) -> Self {
        let mut ids = SegmentIds::new();
        let document = Document::new(&mut ids);
        Self::assemble(platform, suggested_tags, document, ids)
    }

    /// Start from an existing document instead of a single empty text run.
    pub fn with_document(platform: P, suggested_tags: Vec<String>, document: Document) -> Self {
        let ids = SegmentIds::after(&document);
        Self::assemble(platform, suggested_tags, document, ids)
    }

    fn assemble(
        platform: P,
        suggested_tags: Vec<String>,
        document: Document,
        ids: SegmentIds,
    ) -> Self {
        let mut editor = Self {
            document,
            ids,
            registry: ViewRegistry::new(),
            platform,
            suggested_tags,
        };
        editor.refresh_view();
        editor
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn registry(&self) -> &ViewRegistry {
        &self.registry
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    /// Direct platform access for native editing and clicks. Content changes
    /// made this way must be reported through [`TagEditor::capture_input`].
    pub fn platform_mut(&mut self) -> &mut P {
        &mut self.platform
    }

    pub fn suggested_tags(&self) -> &[String] {
        &self.suggested_tags
    }

    pub fn region_for(&self, id: SegmentId) -> Option<NodeId> {
        self.registry.get(id)
    }

    /// Where the caret is, resolved fresh from the platform.
    pub fn focus_context(&self) -> FocusContext {
        locate::resolve_focus(&self.document, &self.registry, &self.platform)
    }

    pub fn insert_tag(&mut self, label: &str) {
        let focus = self.focus_context();
        let Insertion { document, caret } =
            mutation::insert_tag(&self.document, label, focus, &mut self.ids);
        debug!("inserted tag {label:?} with focus {focus:?}");
        self.commit(document);
        caret::move_caret_to_start(&mut self.platform, &self.registry, caret);
    }

    /// Insert the suggestion at `index`, if there is one.
    pub fn activate_suggestion(&mut self, index: usize) -> bool {
        let Some(label) = self.suggested_tags.get(index).cloned() else {
            debug!("no suggestion at index {index}");
            return false;
        };
        self.insert_tag(&label);
        true
    }

    pub fn delete_tag(&mut self, index: usize) -> bool {
        match mutation::delete_tag(&self.document, index, &mut self.ids) {
            Ok(Deletion { document, focus }) => {
                self.commit(document);
                if let Some(id) = focus {
                    caret::move_caret_to_end(&mut self.platform, &self.registry, id);
                }
                true
            }
            Err(err) => {
                debug!("ignoring tag deletion: {err}");
                false
            }
        }
    }

    /// Delete the tag with identity `id`, wherever it sits now.
    pub fn delete_tag_by_id(&mut self, id: SegmentId) -> bool {
        match self.document.index_of(id) {
            Some(index) => self.delete_tag(index),
            None => {
                debug!("ignoring deletion of unknown segment {}", id.as_raw());
                false
            }
        }
    }

    pub fn edit_text(&mut self, index: usize, content: &str) -> bool {
        match mutation::edit_text(&self.document, index, content) {
            Ok(document) => {
                self.commit(document);
                true
            }
            Err(err) => {
                debug!("ignoring text edit: {err}");
                false
            }
        }
    }

    /// Input-capture path: copy what `region` now displays into its segment.
    pub fn capture_input(&mut self, region: NodeId) -> bool {
        let Some(index) =
            locate::segment_index_for_node(&self.document, &self.registry, &self.platform, region)
        else {
            debug!("input from unknown region {}", region.as_raw());
            return false;
        };
        let content = self.platform.displayed_content(region);
        self.edit_text(index, &content)
    }

    /// Intercept navigation keys at segment boundaries.
    pub fn handle_key(&mut self, key: NavKey) -> KeyOutcome {
        let FocusContext::Cursor { index, offset } = self.focus_context() else {
            return KeyOutcome::PassThrough;
        };
        let Some(action) = navigation::plan(&self.document, index, offset, key) else {
            return KeyOutcome::PassThrough;
        };

        match action {
            NavAction::CaretToEnd(target) => self.move_caret_to_end(target),
            NavAction::CaretToStart(target) => self.move_caret_to_start(target),
            NavAction::DeleteTag(target) => self.delete_tag(target),
            NavAction::Block => false,
        };
        KeyOutcome::Handled
    }

    /// Focus the last text segment with the caret at its end.
    pub fn focus_end(&mut self) -> bool {
        let Some(index) = self
            .document
            .segments()
            .iter()
            .rposition(|segment| segment.is_text())
        else {
            return false;
        };
        self.move_caret_to_end(index)
    }

    pub fn move_caret_to_end(&mut self, index: usize) -> bool {
        let Some(segment) = self.document.get(index).filter(|segment| segment.is_text()) else {
            return false;
        };
        caret::move_caret_to_end(&mut self.platform, &self.registry, segment.id)
    }

    pub fn move_caret_to_start(&mut self, index: usize) -> bool {
        let Some(segment) = self.document.get(index).filter(|segment| segment.is_text()) else {
            return false;
        };
        caret::move_caret_to_start(&mut self.platform, &self.registry, segment.id)
    }

    fn commit(&mut self, document: Document) {
        self.document = document;
        self.refresh_view();
    }

    fn refresh_view(&mut self) {
        sync::reconcile(&self.document, &mut self.registry, &mut self.platform);
        sync::synchronize(&self.document, &self.registry, &mut self.platform);
    }
}

#[cfg(test)]
#[path = "editor_tests.rs"]
mod editor_tests;



#[cfg(test)]
#[path = "editor/locate_tests.rs"]
mod locate_tests;
