//! List navigation and offset addressing
//!
//! List targets are addressed by absolute index, or by negative offsets
//! relative to the last index rendered on screen. The last-known index is
//! read from fixed numeric columns (two layout variants) scanning the list
//! rows bottom-up. Navigation that cannot resolve always returns the view
//! to the index screen and restores the position snapshot to root.

use std::sync::OnceLock;

use regex::Regex;
use tracing::debug;

use bbsbot_terminal::keymap;
use bbsbot_terminal::{substr_width, ScreenLine};

use crate::error::Result;
use crate::session::Session;
use crate::state::Position;

/// Numeric-index column windows: primary and secondary layout variants
const INDEX_WINDOWS: [(usize, usize); 2] = [(3, 4), (15, 2)];

/// Rows scanned (bottom-up) for the last rendered index
const SCAN_ROWS: std::ops::RangeInclusive<usize> = 3..=22;

/// Resolve one requested offset against the rendered screen.
///
/// Zero is invalid. Positive offsets are already absolute. A negative
/// offset is anchored at the last on-screen index `L` and resolves to
/// `L + offset + 1`, so `-1` addresses `L` itself. Returns `None` when the
/// offset is invalid or cannot be anchored.
pub fn resolve_offset(lines: &[ScreenLine], offset: i64) -> Option<u32> {
    if offset == 0 {
        return None;
    }
    if offset > 0 {
        return u32::try_from(offset).ok();
    }
    for row in SCAN_ROWS.rev() {
        let Some(line) = lines.get(row) else { continue };
        for (start, len) in INDEX_WINDOWS {
            let field = substr_width(&line.text, start, len).trim();
            if field.is_empty() {
                continue;
            }
            if let Ok(last) = field.parse::<i64>() {
                let resolved = last + offset + 1;
                // list indices are 1-based; a resolution landing on 0 is
                // off the top of the list and fails like a negative one
                return u32::try_from(resolved).ok().filter(|&n| n > 0);
            }
        }
    }
    None
}

/// Parse the current board name out of the header row.
///
/// The header shows a bracketed board title followed by a
/// guillemet-quoted identifier; the board-list header itself uses the
/// same shape and is excluded. One board's header does not fit the
/// pattern at all and is matched by name.
pub fn parse_boardname(header: &str) -> Option<String> {
    static BOARD_RE: OnceLock<Regex> = OnceLock::new();
    let re = BOARD_RE
        .get_or_init(|| Regex::new("【(?<title>[^】]*)】.*《(?<boardname>[^》]*)》").unwrap());

    if let Some(caps) = re.captures(header) {
        if !caps["title"].trim_start().starts_with("看板列表") {
            return Some(caps["boardname"].to_string());
        }
    }
    if header.contains("LoL") {
        return Some("LoL".to_string());
    }
    None
}

impl Session {
    /// Name of the board currently on screen, if the header shows one
    pub fn current_boardname(&self) -> Option<String> {
        parse_boardname(&self.line(0).text)
    }

    /// Return the view to the index screen
    pub async fn enter_index(&mut self) -> Result<bool> {
        self.send(&keymap::return_to_index()).await?;
        Ok(true)
    }

    /// Enter a board by exact name; on mismatch the view returns to the
    /// index and the position snapshot is restored to root
    pub async fn enter_board_by_name(&mut self, boardname: &str) -> Result<bool> {
        self.send(&format!(
            "s{boardname}{enter} {home}{end}",
            enter = keymap::ENTER,
            home = keymap::HOME,
            end = keymap::END
        ))
        .await?;
        self.drain_pending();

        match self.current_boardname() {
            Some(name) if name.eq_ignore_ascii_case(boardname) => {
                self.state.position = Position::board(name);
                self.emit_state();
                Ok(true)
            }
            _ => {
                debug!(boardname, "board entry failed, returning to index");
                self.abort_navigation().await
            }
        }
    }

    /// Navigate through a chain of list offsets.
    ///
    /// Each offset is resolved against the screen as rendered at that
    /// step. Any unresolvable offset fails the whole batch: the view goes
    /// back to the index and the position snapshot is restored to root.
    pub async fn enter_by_offset(&mut self, offsets: &[i64]) -> Result<bool> {
        for &offset in offsets {
            self.drain_pending();
            let lines = self.screen_lines();
            match resolve_offset(&lines, offset) {
                Some(index) => {
                    self.send(&format!(
                        "{index}{enter}{enter} {home}{end}",
                        enter = keymap::ENTER,
                        home = keymap::HOME,
                        end = keymap::END
                    ))
                    .await?;
                }
                None => {
                    debug!(offset, "offset resolution failed, returning to index");
                    return self.abort_navigation().await;
                }
            }
        }

        self.drain_pending();
        let name = self.current_boardname().unwrap_or_default();
        self.state.position = Position::board(name);
        self.emit_state();
        self.send(keymap::HOME).await?;
        Ok(true)
    }

    /// Enter the board list and navigate by offsets
    pub async fn enter_board_by_offset(&mut self, offsets: &[i64]) -> Result<bool> {
        self.send(&format!("C{}", keymap::ENTER)).await?;
        self.enter_by_offset(offsets).await
    }

    /// Enter the favorites list and navigate by offsets
    pub async fn enter_favorite(&mut self, offsets: &[i64]) -> Result<bool> {
        self.send(&format!("F{}", keymap::ENTER)).await?;
        self.enter_by_offset(offsets).await
    }

    async fn abort_navigation(&mut self) -> Result<bool> {
        self.enter_index().await?;
        self.state.position = Position::index();
        self.emit_state();
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{screen_message, scripted_session};

    fn lines_with(row: usize, text: &str) -> Vec<ScreenLine> {
        let mut lines = vec![ScreenLine::default(); 24];
        lines[row] = ScreenLine {
            text: text.to_string(),
            attrs: Vec::new(),
        };
        lines
    }

    #[test]
    fn test_positive_offset_is_absolute() {
        let lines = vec![ScreenLine::default(); 24];
        assert_eq!(resolve_offset(&lines, 42), Some(42));
    }

    #[test]
    fn test_zero_offset_always_fails() {
        let lines = lines_with(22, "  137 ...");
        assert_eq!(resolve_offset(&lines, 0), None);
    }

    #[test]
    fn test_negative_offset_anchored_at_last_index() {
        // primary window: columns 3..7 hold the index
        let lines = lines_with(22, "    137 Gossiping    綜合 ◎廢文集中地");
        assert_eq!(resolve_offset(&lines, -1), Some(137));
        assert_eq!(resolve_offset(&lines, -2), Some(136));
    }

    #[test]
    fn test_secondary_window_variant() {
        // nothing numeric in the primary window; index at columns 15..17
        let lines = lines_with(22, "cursor here    42 entry");
        assert_eq!(resolve_offset(&lines, -1), Some(42));
    }

    #[test]
    fn test_bottom_up_scan_uses_last_row_with_index() {
        let mut lines = lines_with(20, "    100 upper row");
        lines[21] = ScreenLine {
            text: "    137 lower row".to_string(),
            attrs: Vec::new(),
        };
        assert_eq!(resolve_offset(&lines, -1), Some(137));
    }

    #[test]
    fn test_unanchorable_negative_offset_fails() {
        let lines = vec![ScreenLine::default(); 24];
        assert_eq!(resolve_offset(&lines, -1), None);
        // anchored but negative or zero after resolution; indices are
        // 1-based, so landing on 0 fails too
        let lines = lines_with(22, "      3 top of list");
        assert_eq!(resolve_offset(&lines, -3), Some(1));
        assert_eq!(resolve_offset(&lines, -4), None);
        assert_eq!(resolve_offset(&lines, -5), None);
    }

    #[test]
    fn test_parse_boardname() {
        assert_eq!(
            parse_boardname("【 八卦板 】含五告豪洨 《Gossiping》"),
            Some("Gossiping".to_string())
        );
        assert_eq!(parse_boardname("【 看板列表 】 《Boards》"), None);
        assert_eq!(parse_boardname("no header here"), None);
    }

    #[test]
    fn test_parse_boardname_lol_fallback() {
        assert_eq!(
            parse_boardname("some odd LoL header"),
            Some("LoL".to_string())
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_enter_board_by_name_success() {
        let (mut session, handle) = scripted_session().await;
        handle.respond(vec![screen_message(&[(
            0,
            "【 八卦板 】含五告豪洨 《Gossiping》",
        )])]);

        assert!(session.enter_board_by_name("gossiping").await.unwrap());
        assert_eq!(
            session.state().position.boardname.as_deref(),
            Some("Gossiping")
        );
        assert!(handle.sent_text(0).starts_with("sgossiping\r"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_enter_board_by_name_failure_restores_index() {
        let (mut session, handle) = scripted_session().await;
        handle.respond(vec![screen_message(&[(0, "main menu, no board header")])]);
        handle.respond(vec![screen_message(&[(0, "index")])]);

        assert!(!session.enter_board_by_name("NoSuchBoard").await.unwrap());
        assert_eq!(session.state().position.boardname.as_deref(), Some(""));
        // the abort sent the return-to-index chord
        assert_eq!(handle.sent_text(1), keymap::return_to_index());
    }

    #[tokio::test(start_paused = true)]
    async fn test_enter_by_offset_resolves_negative_and_records_position() {
        let (mut session, handle) = scripted_session().await;
        // paint a list whose last rendered index is 137
        handle
            .push(bbsbot_transport::TransportEvent::Message(screen_message(
                &[(22, "    137 Gossiping    綜合 ◎廢文集中地")],
            )))
            .await;

        // jump reply renders the target board header
        handle.respond(vec![screen_message(&[(
            0,
            "【 八卦板 】含五告豪洨 《Gossiping》",
        )])]);
        // trailing Home reply
        handle.respond(vec![screen_message(&[(0, "【 八卦板 】 《Gossiping》")])]);

        assert!(session.enter_by_offset(&[-1]).await.unwrap());
        assert_eq!(
            session.state().position.boardname.as_deref(),
            Some("Gossiping")
        );
        assert!(handle.sent_text(0).starts_with("137\r\r"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_enter_by_offset_zero_fails_whole_batch() {
        let (mut session, handle) = scripted_session().await;
        handle.respond(vec![screen_message(&[(0, "index")])]);

        assert!(!session.enter_by_offset(&[0, 5]).await.unwrap());
        assert_eq!(session.state().position.boardname.as_deref(), Some(""));
        // nothing but the return-to-index chord went out
        assert_eq!(handle.sent_count(), 1);
        assert_eq!(handle.sent_text(0), keymap::return_to_index());
    }
}
