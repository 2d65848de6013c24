//! Declarative query interface
//!
//! `session.select::<T>()` builds a query over a selectable model, `where_`
//! narrows it, and `get`/`get_one` drive the terminal to produce results.
//! The set of selectable models is closed; each one knows how to navigate
//! to its list screen, parse the rows, and apply its predicates.

use std::collections::HashMap;
use std::marker::PhantomData;

use async_trait::async_trait;

use bbsbot_terminal::keymap;

use crate::error::QueryError;
use crate::models::{Article, Board};
use crate::session::Session;

/// Rows 3..=22 carry list entries; 0..=2 are the header block
const LIST_ROWS: std::ops::RangeInclusive<usize> = 3..=22;

/// Accumulated `where_` clauses. A repeated key replaces the earlier value.
#[derive(Debug, Clone, Default)]
pub struct Predicates {
    values: HashMap<String, String>,
}

impl Predicates {
    pub fn insert(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_string(), value.to_string());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }
}

mod sealed {
    pub trait Sealed {}
    impl Sealed for super::Article {}
    impl Sealed for super::Board {}
}

/// A model the query interface can produce.
///
/// Sealed: the navigation each implementation performs is coupled to the
/// session's position tracking, so outside implementations are not
/// supported.
#[async_trait]
pub trait Selectable: sealed::Sealed + Sized + Send {
    /// Navigate, parse, and filter a full result set
    async fn execute(
        session: &mut Session,
        predicates: &Predicates,
    ) -> Result<Vec<Self>, QueryError>;

    /// Produce at most one result
    async fn execute_one(
        session: &mut Session,
        predicates: &Predicates,
    ) -> Result<Option<Self>, QueryError> {
        Ok(Self::execute(session, predicates).await?.into_iter().next())
    }
}

/// In-flight query builder
#[derive(Debug)]
pub struct Select<'a, T> {
    session: &'a mut Session,
    predicates: Predicates,
    _marker: PhantomData<T>,
}

impl<'a, T: Selectable> Select<'a, T> {
    pub(crate) fn new(session: &'a mut Session) -> Self {
        Self {
            session,
            predicates: Predicates::default(),
            _marker: PhantomData,
        }
    }

    /// Add a predicate; repeating a key overwrites its earlier value
    pub fn where_(mut self, key: &str, value: &str) -> Self {
        self.predicates.insert(key, value);
        self
    }

    /// Execute and return all matching entries
    pub async fn get(self) -> Result<Vec<T>, QueryError> {
        T::execute(self.session, &self.predicates).await
    }

    /// Execute and return the first matching entry, if any
    pub async fn get_one(self) -> Result<Option<T>, QueryError> {
        T::execute_one(self.session, &self.predicates).await
    }
}

impl Session {
    /// Start a query over a selectable model
    pub fn select<T: Selectable>(&mut self) -> Select<'_, T> {
        Select::new(self)
    }
}

#[async_trait]
impl Selectable for Article {
    async fn execute(
        session: &mut Session,
        predicates: &Predicates,
    ) -> Result<Vec<Self>, QueryError> {
        let boardname = predicates
            .get("boardname")
            .ok_or(QueryError::MissingPredicate("boardname"))?
            .to_string();
        if !session.enter_board_by_name(&boardname).await? {
            return Err(QueryError::Navigation(format!(
                "no such board: {boardname}"
            )));
        }

        // position the cursor: either on a specific id or at the newest entry
        match predicates.get("id") {
            Some(id) => session.send(&format!("{id}{}", keymap::ENTER)).await?,
            None => session.send(keymap::END).await?,
        };
        session.drain_pending();

        let lines = session.screen_lines();
        let mut articles: Vec<Article> = LIST_ROWS
            .filter_map(|row| lines.get(row))
            .filter_map(|line| Article::from_line(&line.text, &boardname))
            .collect();
        // screen order is oldest-first; results report newest-first
        articles.reverse();

        if let Some(threshold) = predicates.get("push") {
            let threshold: i32 = threshold.parse().unwrap_or(0);
            articles.retain(|a| a.push_weight() >= threshold);
        }
        if let Some(author) = predicates.get("author") {
            articles.retain(|a| a.author.contains(author));
        }
        if let Some(title) = predicates.get("title") {
            articles.retain(|a| a.title.contains(title));
        }
        Ok(articles)
    }

    /// Like `execute`, but also opens the first match and captures its body
    async fn execute_one(
        session: &mut Session,
        predicates: &Predicates,
    ) -> Result<Option<Self>, QueryError> {
        let Some(mut article) = Self::execute(session, predicates).await?.into_iter().next()
        else {
            return Ok(None);
        };

        session
            .send(&format!("{id}{e}{e}", id = article.id, e = keymap::ENTER))
            .await?;
        article.content = session
            .read_content()
            .await?
            .into_iter()
            .map(|line| line.text)
            .collect();
        session.send(keymap::ARROW_LEFT).await?;
        Ok(Some(article))
    }
}

#[async_trait]
impl Selectable for Board {
    async fn execute(
        session: &mut Session,
        predicates: &Predicates,
    ) -> Result<Vec<Self>, QueryError> {
        if let Some(prefix) = predicates.get("prefix") {
            let prefix = prefix.to_string();
            // the search overlay lists every board sharing the prefix; a
            // unique prefix instead lands directly inside the board
            session.send(&format!("s{prefix} ")).await?;
            session.drain_pending();

            let lines = session.screen_lines();
            let mut boards: Vec<Board> = LIST_ROWS
                .filter_map(|row| lines.get(row))
                .filter_map(|line| Board::from_line(&line.text))
                .filter(|b| {
                    b.name
                        .trim_start_matches('ˇ')
                        .to_lowercase()
                        .starts_with(&prefix.to_lowercase())
                })
                .collect();
            if boards.is_empty() {
                // the header may still show a board left over from earlier
                // navigation; only a name matching the prefix counts as a
                // single-match completion
                if let Some(name) = session.current_boardname() {
                    if name.to_lowercase().starts_with(&prefix.to_lowercase()) {
                        boards.push(Board {
                            index: 0,
                            name,
                            class: String::new(),
                            title: String::new(),
                        });
                    }
                }
            }
            session.enter_index().await?;
            return Ok(boards);
        }

        let entry = predicates
            .get("entry")
            .ok_or(QueryError::MissingPredicate("entry"))?
            .to_string();
        let entered = match entry.as_str() {
            "class" => session.send(&format!("C{}", keymap::ENTER)).await?,
            "favorite" => session.send(&format!("F{}", keymap::ENTER)).await?,
            "hot" => {
                // the hottest-boards listing hangs off the first class entry
                session.send(&format!("C{}", keymap::ENTER)).await?;
                session.enter_by_offset(&[1]).await?
            }
            other => return Err(QueryError::UnknownEntry(other.to_string())),
        };
        if !entered {
            return Err(QueryError::Navigation(format!("entry failed: {entry}")));
        }
        session.drain_pending();

        let lines = session.screen_lines();
        let boards = LIST_ROWS
            .filter_map(|row| lines.get(row))
            .filter_map(|line| Board::from_line(&line.text))
            .collect();
        session.enter_index().await?;
        Ok(boards)
    }
}
