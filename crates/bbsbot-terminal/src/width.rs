//! Display-width column slicing
//!
//! List screens on the remote service use fixed character columns, counted
//! in display cells: ASCII is one cell, CJK characters are two. Byte or
//! char indices would drift on mixed rows, so field extraction slices by
//! display column.

use unicode_width::UnicodeWidthChar;

/// Slice `s` by display columns, starting at column `start` and spanning
/// `len` columns.
///
/// A character is included if it begins inside the window; a wide character
/// straddling the end boundary is kept whole.
pub fn substr_width(s: &str, start: usize, len: usize) -> &str {
    slice_columns(s, start, Some(start + len))
}

/// Slice `s` by display columns from column `start` to the end of the row.
pub fn substr_width_from(s: &str, start: usize) -> &str {
    slice_columns(s, start, None)
}

fn slice_columns(s: &str, start: usize, end: Option<usize>) -> &str {
    let mut col = 0;
    let mut begin = s.len();
    let mut finish = s.len();
    let mut started = false;

    for (idx, ch) in s.char_indices() {
        if !started && col >= start {
            begin = idx;
            started = true;
        }
        if let Some(end) = end {
            if col >= end {
                finish = idx;
                break;
            }
        }
        col += ch.width().unwrap_or(0);
    }

    if !started {
        return "";
    }
    &s[begin..finish]
}
