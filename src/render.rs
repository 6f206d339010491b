use ratatui::{
    style::Style,
    text::{Line, Span},
};
use unicode_width::UnicodeWidthChar;

use crate::chip::{Chip, ChipEvent};
use crate::editor::{Document, SegmentBody, SegmentId};
use crate::theme::Theme;
use crate::view::{NodeId, ViewRegistry, ViewTree};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CursorVisualPosition {
    pub line: usize,
    pub column: u16,
}

/// What a screen cell stands for when it is clicked.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HitTarget {
    /// Character `offset` of a text region.
    Text { region: NodeId, offset: usize },
    /// Label part of a chip.
    Chip(SegmentId),
    /// Delete control of a chip.
    ChipDelete(SegmentId),
    Suggestion(usize),
    /// Anywhere else inside the board.
    Board,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Hit {
    pub line: usize,
    pub start: u16,
    pub end: u16,
    pub target: HitTarget,
}

#[derive(Debug)]
pub struct RenderResult {
    pub lines: Vec<Line<'static>>,
    pub cursor: Option<CursorVisualPosition>,
    pub total_lines: usize,
    pub hits: Vec<Hit>,
}

impl RenderResult {
    /// Maps a cell (relative to the rendered lines) to its target.
    ///
    /// Clicking right of a text run places the caret after its last
    /// character; any other miss is a board click.
    pub fn hit_test(&self, line: usize, column: u16) -> HitTarget {
        let on_line: Vec<&Hit> = self.hits.iter().filter(|hit| hit.line == line).collect();
        if let Some(hit) = on_line
            .iter()
            .find(|hit| hit.start <= column && column < hit.end)
        {
            return hit.target;
        }
        match on_line
            .iter()
            .filter(|hit| hit.end <= column)
            .max_by_key(|hit| hit.end)
            .map(|hit| hit.target)
        {
            Some(HitTarget::Text { region, offset }) => HitTarget::Text {
                region,
                offset: offset + 1,
            },
            _ => HitTarget::Board,
        }
    }
}

/// Lays out the board: text regions as wrapped words, tags as chips.
///
/// Text comes from the view, so a region being edited natively renders
/// what the user sees even before it is captured.
pub fn render_board<T: ViewTree>(
    document: &Document,
    registry: &ViewRegistry,
    tree: &T,
    caret: Option<(NodeId, usize)>,
    theme: &Theme,
    width: usize,
) -> RenderResult {
    let width = width.max(1);
    let mut fragments = Vec::new();
    for segment in document.segments() {
        let Some(region) = registry.get(segment.id) else {
            continue;
        };
        match &segment.body {
            SegmentBody::Text { .. } => {
                let content = tree.displayed_content(region);
                let caret_offset = caret
                    .filter(|(node, _)| *node == region)
                    .map(|(_, offset)| offset);
                tokenize_region(&content, region, caret_offset, width, &mut fragments);
            }
            SegmentBody::Tag { label } => {
                fragments.push(chip_fragment(&Chip::new(segment.id, label), theme));
            }
        }
    }
    layout(&fragments, width)
}

/// Lays out the suggestion bar as a row of buttons.
pub fn render_suggestions(
    tags: &[String],
    selected: Option<usize>,
    theme: &Theme,
    width: usize,
) -> RenderResult {
    let mut fragments = Vec::new();
    for (idx, tag) in tags.iter().enumerate() {
        if idx > 0 {
            fragments.push(Fragment::whitespace(" "));
        }
        let text = format!(" + {tag} ");
        let text_width = visible_width(&text);
        fragments.push(Fragment {
            segments: vec![(text, theme.suggestion_style(selected == Some(idx)))],
            width: text_width,
            kind: FragmentKind::Word,
            events: vec![FragmentEvent {
                offset: 0,
                kind: EventKind::Hit {
                    width: text_width,
                    target: HitTarget::Suggestion(idx),
                },
            }],
        });
    }
    layout(&fragments, width.max(1))
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum FragmentKind {
    Word,
    Whitespace,
}

#[derive(Clone, Copy, Debug)]
enum EventKind {
    Hit { width: usize, target: HitTarget },
    Cursor,
}

#[derive(Clone, Copy, Debug)]
struct FragmentEvent {
    offset: usize,
    kind: EventKind,
}

#[derive(Clone, Debug)]
struct Fragment {
    segments: Vec<(String, Style)>,
    width: usize,
    kind: FragmentKind,
    events: Vec<FragmentEvent>,
}

impl Fragment {
    fn whitespace(text: &str) -> Self {
        Self {
            segments: vec![(text.to_string(), Style::default())],
            width: visible_width(text),
            kind: FragmentKind::Whitespace,
            events: Vec::new(),
        }
    }
}

fn chip_fragment(chip: &Chip<'_>, theme: &Theme) -> Fragment {
    let (body, control) = chip.spans(theme);
    let body_width = chip.body_width();
    Fragment {
        segments: vec![
            (body.content.into_owned(), body.style),
            (control.content.into_owned(), control.style),
        ],
        width: chip.width(),
        kind: FragmentKind::Word,
        events: vec![
            FragmentEvent {
                offset: 0,
                kind: EventKind::Hit {
                    width: body_width,
                    target: HitTarget::Chip(chip.id()),
                },
            },
            FragmentEvent {
                offset: body_width,
                kind: EventKind::Hit {
                    width: chip.control_width(),
                    target: match chip.activate() {
                        ChipEvent::Delete(id) => HitTarget::ChipDelete(id),
                    },
                },
            },
        ],
    }
}

/// Splits a region's text into words and whitespace runs, one hit per
/// character. Words wider than the board are cut at the board width.
fn tokenize_region(
    content: &str,
    region: NodeId,
    caret: Option<usize>,
    width: usize,
    fragments: &mut Vec<Fragment>,
) {
    let mut builder = TokenBuilder::new(FragmentKind::Word);
    let mut char_count = 0;
    for (offset, ch) in content.chars().enumerate() {
        let kind = if ch.is_whitespace() {
            FragmentKind::Whitespace
        } else {
            FragmentKind::Word
        };
        let ch_width = UnicodeWidthChar::width(ch).unwrap_or(0);
        if !builder.is_empty() && (builder.kind != kind || builder.width + ch_width > width) {
            fragments.push(builder.finish());
            builder = TokenBuilder::new(kind);
        }
        builder.kind = kind;
        if caret == Some(offset) {
            builder.mark_cursor();
        }
        builder.push(ch, ch_width, HitTarget::Text { region, offset });
        char_count = offset + 1;
    }
    if caret == Some(char_count) {
        builder.mark_cursor();
    }
    if !builder.is_empty() {
        fragments.push(builder.finish());
    }
}

struct TokenBuilder {
    kind: FragmentKind,
    text: String,
    width: usize,
    events: Vec<FragmentEvent>,
}

impl TokenBuilder {
    fn new(kind: FragmentKind) -> Self {
        Self {
            kind,
            text: String::new(),
            width: 0,
            events: Vec::new(),
        }
    }

    fn is_empty(&self) -> bool {
        self.text.is_empty() && self.events.is_empty()
    }

    fn mark_cursor(&mut self) {
        self.events.push(FragmentEvent {
            offset: self.width,
            kind: EventKind::Cursor,
        });
    }

    fn push(&mut self, ch: char, ch_width: usize, target: HitTarget) {
        self.events.push(FragmentEvent {
            offset: self.width,
            kind: EventKind::Hit {
                width: ch_width.max(1),
                target,
            },
        });
        self.text.push(ch);
        self.width += ch_width;
    }

    fn finish(self) -> Fragment {
        Fragment {
            segments: vec![(self.text, Style::default())],
            width: self.width,
            kind: self.kind,
            events: self.events,
        }
    }
}

fn layout(fragments: &[Fragment], width: usize) -> RenderResult {
    let mut outputs = Vec::new();
    let mut builder = LineBuilder::new();
    let mut pending_whitespace: Vec<Fragment> = Vec::new();

    for fragment in fragments {
        match fragment.kind {
            FragmentKind::Whitespace => pending_whitespace.push(fragment.clone()),
            FragmentKind::Word => {
                let whitespace_width: usize =
                    pending_whitespace.iter().map(|item| item.width).sum();
                if builder.width > 0 && builder.width + whitespace_width + fragment.width > width {
                    builder.consume_pending(&mut pending_whitespace);
                    outputs.push(builder.build_line());
                    builder = LineBuilder::new();
                }
                builder.consume_pending(&mut pending_whitespace);
                builder.append(fragment.clone());
            }
        }
    }
    builder.consume_pending(&mut pending_whitespace);
    outputs.push(builder.build_line());

    let mut lines = Vec::with_capacity(outputs.len());
    let mut hits = Vec::new();
    let mut cursor = None;
    for (line_idx, (line, events)) in outputs.into_iter().enumerate() {
        for event in events {
            match event.kind {
                EventKind::Hit { width, target } => hits.push(Hit {
                    line: line_idx,
                    start: event.column,
                    end: event.column.saturating_add(width as u16),
                    target,
                }),
                EventKind::Cursor => {
                    cursor = Some(CursorVisualPosition {
                        line: line_idx,
                        column: event.column,
                    });
                }
            }
        }
        lines.push(line);
    }

    RenderResult {
        total_lines: lines.len(),
        lines,
        cursor,
        hits,
    }
}

struct LocatedEvent {
    column: u16,
    kind: EventKind,
}

struct LineBuilder {
    spans: Vec<Span<'static>>,
    events: Vec<LocatedEvent>,
    width: usize,
}

impl LineBuilder {
    fn new() -> Self {
        Self {
            spans: Vec::new(),
            events: Vec::new(),
            width: 0,
        }
    }

    fn consume_pending(&mut self, pending_whitespace: &mut Vec<Fragment>) {
        for fragment in pending_whitespace.drain(..) {
            self.append(fragment);
        }
    }

    fn append(&mut self, fragment: Fragment) {
        for event in fragment.events {
            self.events.push(LocatedEvent {
                column: (self.width + event.offset) as u16,
                kind: event.kind,
            });
        }
        for (text, style) in fragment.segments {
            if !text.is_empty() {
                self.spans.push(Span::styled(text, style));
            }
        }
        self.width += fragment.width;
    }

    fn build_line(mut self) -> (Line<'static>, Vec<LocatedEvent>) {
        if self.spans.is_empty() {
            self.spans.push(Span::raw(""));
        }
        self.events.sort_by_key(|event| event.column);
        (Line::from(self.spans), self.events)
    }
}

fn visible_width(text: &str) -> usize {
    text.chars()
        .map(|ch| UnicodeWidthChar::width(ch).unwrap_or(0))
        .sum()
}

#[cfg(test)]
#[path = "render_tests.rs"]
mod tests;
