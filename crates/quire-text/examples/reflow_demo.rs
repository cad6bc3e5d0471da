use quire_config::HAlign;
use quire_text::{CursorAction, LineFlags, MonospaceMeasurer, TextBox, TextBoxOptions, TextStyle};

fn flag_name(flags: LineFlags) -> &'static str {
    if flags == LineFlags::BLANK {
        "blank"
    } else if flags.contains(LineFlags::LINEBREAK) {
        "linebreak"
    } else if flags.contains(LineFlags::WORDBREAK) {
        "wordbreak"
    } else {
        "-"
    }
}

fn print_rows(text_box: &TextBox) {
    for (row, (line, flags, start)) in text_box.line_model().rows().enumerate() {
        println!(
            "  {:>2} @{:<3} {:<10} {:>5.1}px  \"{}\"",
            row,
            start,
            flag_name(flags),
            text_box.row_width(row),
            line
        );
    }
}

fn main() {
    println!("=== Reflow Demo ===\n");

    // 8px monospace glyphs, 18px rows, 120px wide text area.
    let options = TextBoxOptions {
        halign: HAlign::Left,
        padding: [0.0; 4],
        ..TextBoxOptions::default()
    };
    let mut text_box = TextBox::new(MonospaceMeasurer::new(8.0, 18.0), TextStyle::default(), options, (120.0, 90.0));

    println!("Test 1: Word wrapping");
    println!("---------------------");
    text_box.set_text("The quick brown fox jumps over the lazy dog.\n\nSupercalifragilistic!");
    text_box.flush();
    print_rows(&text_box);

    println!("\nTest 2: Typing at the end");
    println!("-------------------------");
    text_box.take_line_edits();
    text_box.set_cursor_index(text_box.text_len());
    for ch in [" ", "w", "o", "w"] {
        text_box.insert(ch);
    }
    text_box.flush();
    for edit in text_box.take_line_edits() {
        println!("  rows {:?} -> {:?}", edit.old, edit.new);
    }
    print_rows(&text_box);

    println!("\nTest 3: Cursor movement");
    println!("-----------------------");
    text_box.set_cursor_index(0);
    for action in [CursorAction::End, CursorAction::Down, CursorAction::Right, CursorAction::PageDown] {
        text_box.move_cursor(action, false, false);
        let cursor = text_box.cursor();
        println!(
            "  {:<9} -> index {:>2}, row {}, col {}, scroll {:?}",
            format!("{action:?}"),
            text_box.cursor_index(),
            cursor.row,
            cursor.col,
            text_box.viewport_scroll()
        );
    }

    println!("\nTest 4: Selection");
    println!("-----------------");
    text_box.set_cursor_index(6);
    text_box.select_word_at_cursor();
    println!("  word:      {:?}", text_box.selected_text());
    text_box.select_row_block_at_cursor();
    println!("  paragraph: {:?}", text_box.selected_text());
    for span in text_box.selection_spans() {
        println!("  row {}: {:.1}..{:.1}px", span.row, span.px_start, span.px_end);
    }
}
