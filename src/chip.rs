//! Display element for a single tag: a label pill plus a delete control.
//!
//! Chips hold no state. The only thing they report back is the delete
//! signal, raised once per activation of the control.

use ratatui::text::Span;
use unicode_width::UnicodeWidthStr;

use crate::editor::SegmentId;
use crate::theme::Theme;

const DELETE_GLYPH: &str = "×";

/// What a chip reports back to its owner.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChipEvent {
    Delete(SegmentId),
}

#[derive(Clone, Copy, Debug)]
pub struct Chip<'a> {
    id: SegmentId,
    label: &'a str,
}

impl<'a> Chip<'a> {
    pub fn new(id: SegmentId, label: &'a str) -> Self {
        Self { id, label }
    }

    pub fn id(&self) -> SegmentId {
        self.id
    }

    fn body(&self) -> String {
        format!(" {} ", self.label)
    }

    fn control(&self) -> String {
        format!("{DELETE_GLYPH} ")
    }

    /// Columns taken by the label part.
    pub fn body_width(&self) -> usize {
        self.body().width()
    }

    /// Columns taken by the delete control.
    pub fn control_width(&self) -> usize {
        self.control().width()
    }

    pub fn width(&self) -> usize {
        self.body_width() + self.control_width()
    }

    /// Label and control, styled.
    pub fn spans(&self, theme: &Theme) -> (Span<'static>, Span<'static>) {
        (
            Span::styled(self.body(), theme.chip_style()),
            Span::styled(self.control(), theme.chip_delete_style()),
        )
    }

    /// Activate the delete control.
    pub fn activate(&self) -> ChipEvent {
        ChipEvent::Delete(self.id)
    }
}
