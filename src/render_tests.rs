use pretty_assertions::assert_eq;

use super::*;
use crate::editor::{Segment, TagEditor};
use crate::surface::{NativeKey, Surface};

fn editor_with(parts: &[&str]) -> TagEditor<Surface> {
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
    TagEditor::with_document(Surface::new(), Vec::new(), document)
}

fn render(editor: &TagEditor<Surface>, width: usize) -> RenderResult {
    render_board(
        editor.document(),
        editor.registry(),
        editor.platform(),
        editor.platform().caret(),
        &Theme::default(),
        width,
    )
}

fn line_text(line: &Line<'_>) -> String {
    line.spans.iter().map(|span| span.content.as_ref()).collect()
}

fn texts(result: &RenderResult) -> Vec<String> {
    result.lines.iter().map(line_text).collect()
}

fn region(editor: &TagEditor<Surface>, index: usize) -> NodeId {
    editor
        .region_for(editor.document().segments()[index].id)
        .unwrap()
}

#[test]
fn chips_render_inline_between_text() {
    let editor = editor_with(&["ab", "#A", "cd"]);
    let result = render(&editor, 40);

    assert_eq!(texts(&result), vec!["ab A × cd"]);
    assert_eq!(result.total_lines, 1);
    assert_eq!(result.cursor, None);
}

#[test]
fn hit_map_covers_text_chip_and_control() {
    let editor = editor_with(&["ab", "#A", "cd"]);
    let result = render(&editor, 40);
    let chip = SegmentId::from_raw(1);

    assert_eq!(
        result.hit_test(0, 1),
        HitTarget::Text {
            region: region(&editor, 0),
            offset: 1
        }
    );
    assert_eq!(result.hit_test(0, 3), HitTarget::Chip(chip));
    assert_eq!(result.hit_test(0, 5), HitTarget::ChipDelete(chip));
    assert_eq!(
        result.hit_test(0, 8),
        HitTarget::Text {
            region: region(&editor, 2),
            offset: 1
        }
    );
}

#[test]
fn clicks_past_the_text_land_after_the_last_character() {
    let editor = editor_with(&["ab", "#A", "cd"]);
    let result = render(&editor, 40);

    assert_eq!(
        result.hit_test(0, 30),
        HitTarget::Text {
            region: region(&editor, 2),
            offset: 2
        }
    );
    assert_eq!(result.hit_test(3, 0), HitTarget::Board);
}

#[test]
fn click_past_a_trailing_chip_is_a_board_click() {
    let editor = editor_with(&["ab", "#A"]);
    let result = render(&editor, 40);

    assert_eq!(result.hit_test(0, 20), HitTarget::Board);
}

#[test]
fn cursor_follows_the_caret() {
    let mut editor = editor_with(&["ab", "#A", "cd"]);
    let target = region(&editor, 2);
    editor.platform_mut().click(target, 1);

    let result = render(&editor, 40);
    assert_eq!(
        result.cursor,
        Some(CursorVisualPosition { line: 0, column: 8 })
    );
}

#[test]
fn cursor_in_an_empty_region_sits_between_chips() {
    let mut editor = editor_with(&["a", "#A", "", "#B", "b"]);
    let target = region(&editor, 2);
    editor.platform_mut().click(target, 0);

    let result = render(&editor, 40);
    assert_eq!(texts(&result), vec!["a A ×  B × b"]);
    assert_eq!(
        result.cursor,
        Some(CursorVisualPosition { line: 0, column: 6 })
    );
}

#[test]
fn text_wraps_at_whitespace() {
    let editor = editor_with(&["one two three"]);
    let result = render(&editor, 10);

    assert_eq!(texts(&result), vec!["one two ", "three"]);
    assert_eq!(
        result.hit_test(1, 0),
        HitTarget::Text {
            region: region(&editor, 0),
            offset: 8
        }
    );
}

#[test]
fn long_words_are_cut_at_the_board_width() {
    let editor = editor_with(&["abcdefghij"]);
    let result = render(&editor, 4);

    assert_eq!(texts(&result), vec!["abcd", "efgh", "ij"]);
}

#[test]
fn chips_wrap_as_a_unit() {
    let editor = editor_with(&["abcdef", "#Tag"]);
    let result = render(&editor, 8);

    assert_eq!(texts(&result), vec!["abcdef", " Tag × "]);
    assert_eq!(
        result.hit_test(1, 5),
        HitTarget::ChipDelete(SegmentId::from_raw(1))
    );
}

#[test]
fn renders_live_view_content_before_capture() {
    let mut editor = editor_with(&["ab"]);
    let target = region(&editor, 0);
    editor.platform_mut().click(target, 2);
    editor.platform_mut().apply_native(NativeKey::Char('x'));

    let result = render(&editor, 40);
    assert_eq!(texts(&result), vec!["abx"]);
    assert_eq!(editor.document().plain_text(), "ab");
}

#[test]
fn suggestions_render_as_buttons() {
    let theme = Theme::default();
    let tags = vec!["React".to_string(), "CSS".to_string()];
    let result = render_suggestions(&tags, Some(1), &theme, 80);

    assert_eq!(texts(&result), vec![" + React   + CSS "]);
    assert_eq!(result.hit_test(0, 0), HitTarget::Suggestion(0));
    assert_eq!(result.hit_test(0, 10), HitTarget::Suggestion(1));
    assert_eq!(result.hit_test(0, 9), HitTarget::Board);
    assert_eq!(result.lines[0].spans[2].style, theme.suggestion_style(true));
    assert_eq!(result.lines[0].spans[0].style, theme.suggestion_style(false));
}
