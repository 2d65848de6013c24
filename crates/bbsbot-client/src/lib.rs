//! bbsbot client
//!
//! Automates a remote, screen-oriented bulletin-board service reachable
//! over a character-grid terminal protocol, and exposes the screen-derived
//! data (boards, articles) through a declarative query interface:
//!
//! ```no_run
//! use bbsbot_client::{Article, Session};
//! use bbsbot_config::ClientConfig;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let mut session = Session::connect(ClientConfig::default()).await?;
//! if session.login("user", "pass", true).await? {
//!     let articles = session
//!         .select::<Article>()
//!         .where_("boardname", "Gossiping")
//!         .where_("push", "50")
//!         .get()
//!         .await?;
//!     println!("{} articles", articles.len());
//!     session.logout().await?;
//! }
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod events;
pub mod login;
pub mod models;
pub mod navigation;
pub mod pagination;
pub mod query;
pub mod session;
pub mod state;

#[cfg(test)]
pub(crate) mod testing;

pub use error::{ClientError, QueryError, Result};
pub use events::{EventBus, SessionEvent};
pub use models::{Article, Board};
pub use pagination::PageAssembler;
pub use query::{Predicates, Select, Selectable};
pub use session::Session;
pub use state::{Position, SessionState};
