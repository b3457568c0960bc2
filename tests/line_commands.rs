// Line editing commands over several selections at once

use fresh_comments::{EditorState, Position, Selection};

fn pos(line: usize, column: usize) -> Position {
    Position::new(line, column)
}

fn cursors(editor: &EditorState) -> Vec<Position> {
    editor.selections().iter().map(|sel| sel.head()).collect()
}

#[test]
fn test_duplicate_with_two_cursors() {
    let mut editor = EditorState::new("a\nb\nc");
    editor.set_selections(vec![
        Selection::cursor(pos(0, 1)),
        Selection::cursor(pos(2, 0)),
    ]);
    editor.duplicate_text().unwrap();
    assert_eq!(editor.text(), "a\na\nb\nc\nc");
    assert_eq!(cursors(&editor), vec![pos(1, 1), pos(4, 0)]);
}

#[test]
fn test_delete_lines_of_separate_cursors() {
    let mut editor = EditorState::new("one\ntwo\nthree\nfour");
    editor.set_selections(vec![
        Selection::cursor(pos(0, 2)),
        Selection::cursor(pos(2, 2)),
    ]);
    editor.delete_current_lines().unwrap();
    assert_eq!(editor.text(), "two\nfour");
    assert_eq!(cursors(&editor), vec![pos(0, 0), pos(1, 0)]);
}

#[test]
fn test_move_down_then_up_restores_text() {
    let text = "fn a() {}\nfn b() {}\nfn c() {}";
    let mut editor = EditorState::new(text);
    editor.set_selections(vec![Selection::new(pos(0, 3), pos(1, 4))]);

    editor.move_line_down().unwrap();
    assert_eq!(editor.text(), "fn c() {}\nfn a() {}\nfn b() {}");
    assert_eq!(
        editor.selections(),
        &[Selection::new(pos(1, 3), pos(2, 4)).with_primary(true)]
    );

    editor.move_line_up().unwrap();
    assert_eq!(editor.text(), text);
}

#[test]
fn test_open_lines_on_two_cursors() {
    let mut editor = EditorState::new("  a\nb");
    editor.set_selections(vec![
        Selection::cursor(pos(0, 3)),
        Selection::cursor(pos(1, 1)),
    ]);
    editor.open_line_below().unwrap();
    assert_eq!(editor.text(), "  a\n  \nb\n");
    assert_eq!(cursors(&editor), vec![pos(1, 2), pos(3, 0)]);
}

#[test]
fn test_split_then_add_cursor_below() {
    let mut editor = EditorState::new("abc\nde\nfghi");
    editor.set_selections(vec![Selection::new(pos(0, 0), pos(1, 2))]);
    editor.split_selection_into_lines();
    assert_eq!(editor.selections().len(), 2);

    editor.set_selections(vec![Selection::cursor(pos(1, 2))]);
    editor.add_cursor_to_next_line();
    assert_eq!(cursors(&editor), vec![pos(1, 2), pos(2, 2)]);
    assert!(editor.selections()[1].primary);
}

#[test]
fn test_select_line_then_delete() {
    let mut editor = EditorState::new("keep\ndrop\nkeep");
    editor.set_selections(vec![Selection::cursor(pos(1, 2))]);
    editor.select_line();
    assert_eq!(
        editor.selections(),
        &[Selection::new(pos(1, 0), pos(2, 0)).with_primary(true)]
    );
    editor.delete_current_lines().unwrap();
    assert_eq!(editor.text(), "keep\nkeep");
}
