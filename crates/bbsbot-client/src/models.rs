//! Screen-row data models
//!
//! List rows use fixed display-column layouts, so fields are sliced by
//! display width rather than by character index. A row that does not carry
//! the mandatory field for its layout parses to `None`.

use serde::{Deserialize, Serialize};

use bbsbot_terminal::{substr_width, substr_width_from};

/// One article entry, as rendered on a board's article list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    pub id: u32,
    pub boardname: String,
    pub status: String,
    pub push: String,
    pub date: String,
    pub author: String,
    pub title: String,
    /// Body lines, populated only when the article itself was opened
    #[serde(default)]
    pub content: Vec<String>,
}

impl Article {
    /// Parse one list row. The numeric id column is mandatory.
    pub fn from_line(line: &str, boardname: &str) -> Option<Self> {
        let id = substr_width(line, 1, 7).trim().parse::<u32>().ok()?;
        Some(Article {
            id,
            boardname: boardname.to_string(),
            status: substr_width(line, 8, 1).trim().to_string(),
            push: substr_width(line, 9, 2).trim().to_string(),
            date: substr_width(line, 11, 5).trim().to_string(),
            author: substr_width(line, 17, 12).trim().to_string(),
            title: substr_width_from(line, 30).trim().to_string(),
            content: Vec::new(),
        })
    }

    /// Numeric weight of the push column for threshold filtering.
    ///
    /// The overflow marker counts as 100; anything non-numeric otherwise
    /// (including the empty column) sorts below zero.
    pub fn push_weight(&self) -> i32 {
        if self.push == "爆" {
            100
        } else {
            self.push.parse().unwrap_or(-1)
        }
    }
}

/// One board entry, as rendered on the board list or favorites list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    pub index: u32,
    pub name: String,
    pub class: String,
    pub title: String,
}

impl Board {
    /// Parse one list row. The name column is mandatory; separators and
    /// blank rows have nothing there and are skipped.
    pub fn from_line(line: &str) -> Option<Self> {
        let name = substr_width(line, 10, 12).trim().to_string();
        if name.is_empty() {
            return None;
        }
        let title = substr_width_from(line, 30).trim();
        Some(Board {
            index: substr_width(line, 3, 4).trim().parse().unwrap_or(0),
            name,
            class: substr_width(line, 23, 4).trim().to_string(),
            title: title.strip_prefix('◎').unwrap_or(title).trim_start().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_article_from_line() {
        //        0123456789...
        let line = " 123456 m99 5/17 someauthor   [問卦] 有沒有八卦";
        let article = Article::from_line(line, "Gossiping").unwrap();
        assert_eq!(article.id, 123456);
        assert_eq!(article.boardname, "Gossiping");
        assert_eq!(article.status, "m");
        assert_eq!(article.push, "99");
        assert_eq!(article.date, "5/17");
        assert_eq!(article.author, "someauthor");
        assert_eq!(article.title, "[問卦] 有沒有八卦");
        assert!(article.content.is_empty());
    }

    #[test]
    fn test_article_row_without_id_is_skipped() {
        assert!(Article::from_line("", "Gossiping").is_none());
        assert!(Article::from_line("  ★  pinned banner row        ", "Gossiping").is_none());
    }

    #[test]
    fn test_push_weight() {
        let mut article =
            Article::from_line(" 123456 m99 5/17 someauthor   title", "test").unwrap();
        assert_eq!(article.push_weight(), 99);
        article.push = "爆".to_string();
        assert_eq!(article.push_weight(), 100);
        article.push = "X1".to_string();
        assert_eq!(article.push_weight(), -1);
        article.push.clear();
        assert_eq!(article.push_weight(), -1);
    }

    #[test]
    fn test_board_from_line() {
        let line = "   1137   ˇGossiping   綜合   ◎【八卦】廢文集中地";
        let board = Board::from_line(line).unwrap();
        assert_eq!(board.index, 1137);
        assert_eq!(board.name, "ˇGossiping");
        assert_eq!(board.class, "綜合");
        assert_eq!(board.title, "【八卦】廢文集中地");
    }

    #[test]
    fn test_board_row_without_name_is_skipped() {
        assert!(Board::from_line("").is_none());
        assert!(Board::from_line("   12            ").is_none());
    }

    #[test]
    fn test_board_index_defaults_to_zero() {
        let line = "          MyFavBoard   好站   ◎收藏";
        let board = Board::from_line(line).unwrap();
        assert_eq!(board.index, 0);
        assert_eq!(board.name, "MyFavBoard");
    }
}
