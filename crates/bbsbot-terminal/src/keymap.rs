//! Named key escape sequences
//!
//! Outbound commands are composed by concatenating these with literal text
//! before charset encoding. The values match what the remote full-screen
//! service expects from a VT100-family client.

pub const ENTER: &str = "\r";
pub const ARROW_UP: &str = "\x1b[A";
pub const ARROW_DOWN: &str = "\x1b[B";
pub const ARROW_RIGHT: &str = "\x1b[C";
pub const ARROW_LEFT: &str = "\x1b[D";
pub const HOME: &str = "\x1b[1~";
pub const END: &str = "\x1b[4~";
pub const PAGE_UP: &str = "\x1b[5~";
pub const PAGE_DOWN: &str = "\x1b[6~";
pub const CTRL_U: &str = "\x15";

/// Keystroke sequence that returns the view to the index screen from any
/// menu depth.
pub fn return_to_index() -> String {
    ARROW_LEFT.repeat(10)
}
