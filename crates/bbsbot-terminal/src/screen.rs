//! Rendered-screen model
//!
//! `TerminalScreen` wraps a `vt100::Parser` holding the fixed-size grid the
//! remote service draws into. The protocol engine feeds decoded text into
//! `write` and reads back per-row snapshots; it never mutates the grid
//! directly. Cursor movement, erases, colors, and double-width character
//! placement are all interpreted by the underlying emulator.

/// Per-cell display attributes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CellAttr {
    pub bold: bool,
    pub underline: bool,
    pub inverse: bool,
    pub fg: Color,
    pub bg: Color,
}

/// Cell color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Color {
    #[default]
    Default,
    Indexed(u8),
    Rgb(u8, u8, u8),
}

impl From<vt100::Color> for Color {
    fn from(color: vt100::Color) -> Self {
        match color {
            vt100::Color::Default => Color::Default,
            vt100::Color::Idx(idx) => Color::Indexed(idx),
            vt100::Color::Rgb(r, g, b) => Color::Rgb(r, g, b),
        }
    }
}

/// Read-only snapshot of one grid row
///
/// `text` has trailing blank cells trimmed; `attrs` keeps one entry per
/// occupied display column (wide characters contribute two).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ScreenLine {
    pub text: String,
    pub attrs: Vec<CellAttr>,
}

/// Fixed-size rendered terminal grid
pub struct TerminalScreen {
    parser: vt100::Parser,
    rows: u16,
    columns: u16,
}

impl TerminalScreen {
    /// Create a screen with the given grid dimensions
    pub fn new(columns: u16, rows: u16) -> Self {
        Self {
            parser: vt100::Parser::new(rows, columns, 0),
            rows,
            columns,
        }
    }

    /// Grid height in rows
    pub fn rows(&self) -> usize {
        self.rows as usize
    }

    /// Grid width in character cells
    pub fn columns(&self) -> usize {
        self.columns as usize
    }

    /// Feed decoded text (including control sequences) into the grid
    pub fn write(&mut self, text: &str) {
        self.parser.process(text.as_bytes());
    }

    /// Snapshot of the row at `row`, or an empty line when out of range
    pub fn line(&self, row: usize) -> ScreenLine {
        if row >= self.rows as usize {
            return ScreenLine::default();
        }
        let screen = self.parser.screen();
        let mut text = String::new();
        let mut attrs = Vec::new();
        for col in 0..self.columns {
            let Some(cell) = screen.cell(row as u16, col) else {
                continue;
            };
            if cell.is_wide_continuation() {
                continue;
            }
            let attr = CellAttr {
                bold: cell.bold(),
                underline: cell.underline(),
                inverse: cell.inverse(),
                fg: cell.fgcolor().into(),
                bg: cell.bgcolor().into(),
            };
            let contents = cell.contents();
            if contents.is_empty() {
                text.push(' ');
                attrs.push(attr);
            } else {
                text.push_str(&contents);
                attrs.push(attr);
                if cell.is_wide() {
                    attrs.push(attr);
                }
            }
        }
        while text.ends_with(' ') {
            text.pop();
            attrs.pop();
        }
        ScreenLine { text, attrs }
    }

    /// Snapshot of every row, top to bottom
    pub fn lines(&self) -> Vec<ScreenLine> {
        (0..self.rows as usize).map(|row| self.line(row)).collect()
    }

    /// Full screen text, rows joined with newlines
    pub fn contents(&self) -> String {
        self.lines()
            .into_iter()
            .map(|line| line.text)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl std::fmt::Debug for TerminalScreen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TerminalScreen")
            .field("columns", &self.columns)
            .field("rows", &self.rows)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_lands_on_row_zero() {
        let mut screen = TerminalScreen::new(80, 24);
        screen.write("hello world");
        assert_eq!(screen.line(0).text, "hello world");
        assert_eq!(screen.line(1).text, "");
    }

    #[test]
    fn test_cursor_addressing_places_rows() {
        let mut screen = TerminalScreen::new(80, 24);
        screen.write("\x1b[5;1Hrow four");
        assert_eq!(screen.line(4).text, "row four");
        assert_eq!(screen.line(0).text, "");
    }

    #[test]
    fn test_trailing_blanks_trimmed() {
        let mut screen = TerminalScreen::new(80, 24);
        screen.write("abc   ");
        let line = screen.line(0);
        assert_eq!(line.text, "abc");
        assert_eq!(line.attrs.len(), 3);
    }

    #[test]
    fn test_wide_chars_occupy_two_columns() {
        let mut screen = TerminalScreen::new(80, 24);
        screen.write("看板abc");
        let line = screen.line(0);
        assert_eq!(line.text, "看板abc");
        // two wide chars (2 cols each) + three ascii
        assert_eq!(line.attrs.len(), 7);
    }

    #[test]
    fn test_out_of_range_row_is_empty() {
        let screen = TerminalScreen::new(80, 24);
        assert_eq!(screen.line(24), ScreenLine::default());
    }

    #[test]
    fn test_redraw_overwrites_previous_content() {
        let mut screen = TerminalScreen::new(80, 24);
        screen.write("\x1b[1;1Hfirst draw");
        screen.write("\x1b[2J\x1b[1;1Hsecond");
        assert_eq!(screen.line(0).text, "second");
    }
}
