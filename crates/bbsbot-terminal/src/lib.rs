//! Terminal-facing pieces of bbsbot
//!
//! The remote service renders everything into a fixed character grid; this
//! crate holds the rendered-screen model the protocol engine reads from,
//! the display-width column slicing used by the fixed-column list layouts
//! (double-byte characters occupy two columns), and the named key escape
//! sequences composed into outbound commands.

pub mod keymap;
pub mod screen;
pub mod width;

pub use screen::{CellAttr, Color, ScreenLine, TerminalScreen};
pub use width::{substr_width, substr_width_from};
