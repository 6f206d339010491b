use super::segment::Document;

/// Keys the navigation layer may intercept.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NavKey {
    ArrowLeft,
    ArrowRight,
    Backspace,
    Delete,
    Other,
}

/// What to do instead of the platform's default for a key.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NavAction {
    /// Move the caret to the end of the text segment at this index.
    CaretToEnd(usize),
    /// Move the caret to the start of the text segment at this index.
    CaretToStart(usize),
    /// Delete the tag at this index.
    DeleteTag(usize),
    /// At a boundary with nowhere to go; swallow the key.
    Block,
}

/// Whether the platform should still run its default handling.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyOutcome {
    Handled,
    PassThrough,
}

/// Decide how `key` behaves with the caret `offset` characters into the
/// text segment at `index`. `None` leaves the key to the platform.
pub fn plan(document: &Document, index: usize, offset: usize, key: NavKey) -> Option<NavAction> {
    let segment = document.get(index)?;
    if !segment.is_text() {
        return None;
    }
    let at_start = offset == 0;
    let at_end = offset >= segment.char_len();
    let has_next = index + 1 < document.len();

    match key {
        NavKey::ArrowLeft if at_start && index > 0 => Some(
            previous_text(document, index)
                .map(NavAction::CaretToEnd)
                .unwrap_or(NavAction::Block),
        ),
        NavKey::ArrowRight if at_end && has_next => Some(
            next_text(document, index)
                .map(NavAction::CaretToStart)
                .unwrap_or(NavAction::Block),
        ),
        NavKey::Backspace if at_start && index > 0 => document
            .get(index - 1)
            .filter(|previous| previous.is_tag())
            .map(|_| NavAction::DeleteTag(index - 1)),
        NavKey::Delete if at_end && has_next => document
            .get(index + 1)
            .filter(|next| next.is_tag())
            .map(|_| NavAction::DeleteTag(index + 1)),
        _ => None,
    }
}

/// Nearest text segment before `index`, skipping tags.
fn previous_text(document: &Document, index: usize) -> Option<usize> {
    document.segments()[..index]
        .iter()
        .rposition(|segment| segment.is_text())
}

/// Nearest text segment after `index`, skipping tags. Empty text segments
/// count as stops.
fn next_text(document: &Document, index: usize) -> Option<usize> {
    document.segments()[index + 1..]
        .iter()
        .position(|segment| segment.is_text())
        .map(|position| index + 1 + position)
}
