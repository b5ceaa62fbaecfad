//! Advance widths for the builtin Helvetica faces and the line fitting
//! built on top of them (word wrap, ellipsis truncation, alignment).
//!
//! Widths come from the Adobe AFM files and are expressed in 1/1000 em.
//! Characters outside printable ASCII fall back to the width of a digit.

use unicode_linebreak::{linebreaks, BreakOpportunity};

use crate::model::{Align, Font};

/// Ratio between line pitch and font size for Helvetica.
pub const LINE_HEIGHT_FACTOR: f64 = 1.156;
/// Ascender height as a fraction of the font size.
pub const ASCENT_FACTOR: f64 = 0.718;
pub const ELLIPSIS: &str = "...";

const FALLBACK_WIDTH: u16 = 556;

#[rustfmt::skip]
const HELVETICA: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556, // '0'..'?'
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, // '@'..'O'
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556, // 'P'..'_'
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, // '`'..'o'
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,      // 'p'..'~'
];

#[rustfmt::skip]
const HELVETICA_BOLD: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611, // '0'..'?'
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778, // '@'..'O'
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556, // 'P'..'_'
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611, // '`'..'o'
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,      // 'p'..'~'
];

fn char_units(ch: char, font: Font) -> u16 {
    let table = match font {
        Font::Regular => &HELVETICA,
        Font::Bold => &HELVETICA_BOLD,
    };
    let code = ch as u32;
    if (32..=126).contains(&code) {
        table[(code - 32) as usize]
    } else {
        FALLBACK_WIDTH
    }
}

/// Rendered width of a single line of text.
pub fn text_width(text: &str, font: Font, size: f64) -> f64 {
    let units: u32 = text.chars().map(|ch| char_units(ch, font) as u32).sum();
    units as f64 * size / 1000.0
}

pub fn line_height(size: f64) -> f64 {
    size * LINE_HEIGHT_FACTOR
}

/// Greedy line wrap over the UAX #14 break opportunities of `text`.
///
/// A piece between two opportunities that is wider than `width` on its own
/// is broken between characters. Trailing whitespace is dropped at line
/// ends only. Always yields at least one line, so an empty string still
/// occupies a line.
pub fn wrap_lines(text: &str, width: f64, font: Font, size: f64) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut start = 0;

    for (end, opportunity) in linebreaks(text) {
        let piece = &text[start..end];
        start = end;

        let candidate = format!("{current}{piece}");
        if current.is_empty() || text_width(candidate.trim_end(), font, size) <= width {
            current = candidate;
        } else {
            lines.push(current.trim_end().to_string());
            current = piece.to_string();
        }

        while text_width(current.trim_end(), font, size) > width {
            let split = fitting_prefix(&current, width, font, size);
            if split >= current.trim_end().len() {
                break;
            }
            lines.push(current[..split].to_string());
            current = current[split..].to_string();
        }

        if matches!(opportunity, BreakOpportunity::Mandatory) {
            lines.push(current.trim_end().to_string());
            current.clear();
        }
    }

    if !current.is_empty() || lines.is_empty() {
        lines.push(current.trim_end().to_string());
    }
    lines
}

/// Byte length of the longest prefix of `text` that fits `width`, never
/// less than one character.
fn fitting_prefix(text: &str, width: f64, font: Font, size: f64) -> usize {
    let mut used = 0.0;
    for (i, ch) in text.char_indices() {
        used += char_units(ch, font) as f64 * size / 1000.0;
        if used > width {
            return if i == 0 { ch.len_utf8() } else { i };
        }
    }
    text.len()
}

/// Cut `text` so that it fits `width`, marking the cut with an ellipsis.
pub fn truncate_with_ellipsis(text: &str, width: f64, font: Font, size: f64) -> String {
    if text_width(text, font, size) <= width {
        return text.to_string();
    }

    let ellipsis_width = text_width(ELLIPSIS, font, size);
    let mut kept = String::new();
    let mut kept_width = 0.0;
    for ch in text.chars() {
        let w = char_units(ch, font) as f64 * size / 1000.0;
        if kept_width + w + ellipsis_width > width {
            break;
        }
        kept.push(ch);
        kept_width += w;
    }

    if kept.is_empty() && ellipsis_width > width {
        return String::new();
    }
    kept.truncate(kept.trim_end().len());
    kept.push_str(ELLIPSIS);
    kept
}

/// A line positioned relative to the top-left corner of its text box.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedLine {
    pub text: String,
    pub dx: f64,
    /// Offset of the baseline from the top of the box.
    pub baseline: f64,
}

/// Break `text` into positioned lines for a box of `width` points.
///
/// With `no_wrap` the text stays on one line and is truncated with an
/// ellipsis; otherwise it wraps and, when `max_height` is given, lines that
/// would extend past it are dropped.
pub fn fit_lines(
    text: &str,
    font: Font,
    size: f64,
    width: f64,
    align: Align,
    no_wrap: bool,
    max_height: Option<f64>,
) -> Vec<PlacedLine> {
    let lines = if no_wrap {
        vec![truncate_with_ellipsis(text, width, font, size)]
    } else {
        wrap_lines(text, width, font, size)
    };

    let pitch = line_height(size);
    let max_lines = match max_height {
        Some(h) => ((h / pitch).floor() as usize).max(1),
        None => usize::MAX,
    };

    lines
        .into_iter()
        .take(max_lines)
        .enumerate()
        .filter(|(_, line)| !line.is_empty())
        .map(|(i, line)| {
            let slack = (width - text_width(&line, font, size)).max(0.0);
            let dx = match align {
                Align::Left => 0.0,
                Align::Right => slack,
                Align::Center => slack / 2.0,
            };
            PlacedLine {
                text: line,
                dx,
                baseline: i as f64 * pitch + size * ASCENT_FACTOR,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digits_share_one_width() {
        assert_eq!(
            text_width("0123456789", Font::Regular, 10.0),
            text_width("9999999999", Font::Bold, 10.0)
        );
        assert!((text_width("10", Font::Regular, 10.0) - 11.12).abs() < 1e-9);
    }

    #[test]
    fn bold_is_wider_than_regular() {
        let regular = text_width("Description", Font::Regular, 9.0);
        let bold = text_width("Description", Font::Bold, 9.0);
        assert!(bold > regular);
    }

    #[test]
    fn wraps_on_word_boundaries() {
        let lines = wrap_lines("GRAND TOTAL", 40.0, Font::Bold, 10.0);
        assert_eq!(lines, vec!["GRAND", "TOTAL"]);
    }

    #[test]
    fn breaks_words_longer_than_the_box() {
        let lines = wrap_lines("1234567890.00", 30.0, Font::Regular, 10.0);
        assert!(lines.len() > 1);
        assert_eq!(lines.concat(), "1234567890.00");
        for line in &lines {
            assert!(text_width(line, Font::Regular, 10.0) <= 30.0);
        }
    }

    #[test]
    fn hyphens_are_break_opportunities() {
        let lines = wrap_lines("GRAND-TOTAL", 45.0, Font::Bold, 10.0);
        assert_eq!(lines, vec!["GRAND-", "TOTAL"]);
    }

    #[test]
    fn inner_spacing_survives_wrapping() {
        assert_eq!(wrap_lines("Net  total", 200.0, Font::Regular, 10.0), vec!["Net  total"]);
    }

    #[test]
    fn explicit_newlines_start_a_new_line() {
        let lines = wrap_lines("Salary\nBonus", 200.0, Font::Regular, 10.0);
        assert_eq!(lines, vec!["Salary", "Bonus"]);
    }

    #[test]
    fn empty_text_still_occupies_a_line() {
        assert_eq!(wrap_lines("", 50.0, Font::Regular, 8.0).len(), 1);
    }

    #[test]
    fn truncation_keeps_text_inside_the_box() {
        let cut = truncate_with_ellipsis("Groceries for the whole month", 50.0, Font::Regular, 8.0);
        assert!(cut.ends_with(ELLIPSIS));
        assert!(text_width(&cut, Font::Regular, 8.0) <= 50.0);
        assert_eq!(truncate_with_ellipsis("Rice", 50.0, Font::Regular, 8.0), "Rice");
    }

    #[test]
    fn right_alignment_pushes_text_to_the_edge() {
        let lines = fit_lines("12.00", Font::Regular, 8.0, 60.0, Align::Right, true, None);
        assert_eq!(lines.len(), 1);
        let end = lines[0].dx + text_width("12.00", Font::Regular, 8.0);
        assert!((end - 60.0).abs() < 1e-9);
    }

    #[test]
    fn max_height_drops_overflowing_lines() {
        let lines = fit_lines("a b c d", Font::Regular, 10.0, 5.0, Align::Left, false, Some(25.0));
        assert_eq!(lines.len(), 2);
    }
}
