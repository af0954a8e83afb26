//! Greedy word-wrap against the static font metrics.

use crate::layout::font_metrics::FontMetricTable;

/// Breaks `text` into lines no wider than `max_width_pt` at `size_pt`.
///
/// Words wider than a whole line are split at character boundaries. Explicit
/// newlines in the input start a new line. Blank text returns no lines.
pub fn wrap_text(
    text: &str,
    metrics: &FontMetricTable,
    size_pt: f32,
    max_width_pt: f32,
) -> Vec<String> {
    let max_width = max_width_pt / size_pt;
    let mut lines = Vec::new();

    for paragraph in text.lines() {
        let mut current = String::new();
        let mut current_width = 0.0_f32;

        for word in paragraph.split_whitespace() {
            for piece in split_long_word(word, metrics, max_width) {
                let piece_w = metrics.measure_str(&piece);
                if current.is_empty() {
                    current_width = piece_w;
                    current = piece;
                } else if current_width + metrics.space_width + piece_w > max_width {
                    lines.push(std::mem::take(&mut current));
                    current_width = piece_w;
                    current = piece;
                } else {
                    current_width += metrics.space_width + piece_w;
                    current.push(' ');
                    current.push_str(&piece);
                }
            }
        }

        if !current.is_empty() {
            lines.push(current);
        }
    }

    lines
}

fn split_long_word(word: &str, metrics: &FontMetricTable, max_width: f32) -> Vec<String> {
    if metrics.measure_str(word) <= max_width {
        return vec![word.to_string()];
    }

    let mut pieces = Vec::new();
    let mut piece = String::new();
    let mut width = 0.0_f32;
    for c in word.chars() {
        let mut buf = [0u8; 4];
        let w = metrics.measure_str(c.encode_utf8(&mut buf));
        if !piece.is_empty() && width + w > max_width {
            pieces.push(std::mem::take(&mut piece));
            width = 0.0;
        }
        piece.push(c);
        width += w;
    }
    if !piece.is_empty() {
        pieces.push(piece);
    }
    pieces
}
