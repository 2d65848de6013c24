//! Paginated content extraction
//!
//! Article content scrolls through a viewport: header on row 0, body on
//! rows 1..22, footer on row 23 showing either a completion percentage or
//! the empty-content marker. The extractor captures the body, advances a
//! page, and repeats until the footer reports completion; the final
//! rendered page overlaps the last captured row, so everything after the
//! first row equal to it is appended and the overlap dropped.

use bbsbot_terminal::keymap;
use bbsbot_terminal::ScreenLine;

use crate::error::Result;
use crate::session::Session;

const FOOTER_COMPLETE: &str = "100%";
const FOOTER_EMPTY: &str = "此文章無內容";

/// Body rows span 1..22 (0-indexed); row 0 is the header, row 23 the footer
const BODY_ROWS: std::ops::Range<usize> = 1..23;
const FOOTER_ROW: usize = 23;

/// True when the footer says there is nothing further to page through
pub fn footer_complete(footer: &str) -> bool {
    footer.contains(FOOTER_COMPLETE) || footer.contains(FOOTER_EMPTY)
}

/// Assembles full content from successive viewport captures
#[derive(Debug)]
pub struct PageAssembler {
    lines: Vec<ScreenLine>,
}

impl PageAssembler {
    /// Start an assembly with the header row
    pub fn new(header: ScreenLine) -> Self {
        Self {
            lines: vec![header],
        }
    }

    /// Capture one viewport body (rows 1..22) before a page advance.
    ///
    /// A page advance keeps the previous last row at the top of the next
    /// page; a leading row equal to the last captured one is the scroll
    /// overlap and is dropped.
    pub fn push_page(&mut self, body: &[ScreenLine]) {
        let mut body = body;
        if let (Some(last), Some(first)) = (self.lines.last(), body.first()) {
            if !first.text.is_empty() && first.text == last.text {
                body = &body[1..];
            }
        }
        self.lines.extend_from_slice(body);
    }

    /// Fold in the final rendered screen (rows 0..22) and finish.
    ///
    /// The first final row whose text equals the last captured row marks
    /// the start of the overlap; rows after it are new. Trailing empty
    /// rows are trimmed.
    pub fn finish(mut self, final_rows: &[ScreenLine]) -> Vec<ScreenLine> {
        let last_text = self
            .lines
            .last()
            .map(|line| line.text.clone())
            .unwrap_or_default();
        for (i, row) in final_rows.iter().enumerate() {
            if row.text == last_text {
                self.lines.extend_from_slice(&final_rows[i + 1..]);
                break;
            }
        }
        while self
            .lines
            .last()
            .map(|line| line.text.is_empty())
            .unwrap_or(false)
        {
            self.lines.pop();
        }
        self.lines
    }
}

impl Session {
    /// Extract the full content currently open in the viewport.
    ///
    /// Drives "next page" until the footer shows completion, dedups the
    /// final-page overlap, trims trailing blanks, and (if any paging
    /// happened) returns the view to the top so the cursor is left in a
    /// known position. The header row is included in the result.
    pub async fn read_content(&mut self) -> Result<Vec<ScreenLine>> {
        self.drain_pending();
        let mut assembler = PageAssembler::new(self.line(0));
        let mut paged = false;

        while !footer_complete(&self.line(FOOTER_ROW).text) {
            let body: Vec<ScreenLine> = BODY_ROWS.map(|row| self.line(row)).collect();
            assembler.push_page(&body);
            self.send(keymap::PAGE_DOWN).await?;
            paged = true;
        }

        let final_rows: Vec<ScreenLine> = (0..FOOTER_ROW).map(|row| self.line(row)).collect();
        let lines = assembler.finish(&final_rows);

        if paged {
            self.send(keymap::HOME).await?;
        }
        Ok(lines)
    }
}
