//! Login handshake protocol
//!
//! The remote system acknowledges none of the handshake steps explicitly;
//! the only feedback is whatever it has drawn on screen. After the
//! credentials go out, the engine polls the rendered screen on a fixed
//! interval and matches known prompts by substring against fixed rows.
//! Row numbers and marker strings are deliberately exact: behavioral
//! compatibility with the remote service depends on them.
//!
//! A prompt that never matches anything keeps the poll loop alive
//! indefinitely; that is a documented limitation, surfaced through the
//! log rather than resolved heuristically beyond the generic yes/no
//! fallback.

use std::time::Duration;

use tracing::{debug, info};

use bbsbot_terminal::keymap;

use crate::error::Result;
use crate::events::SessionEvent;
use crate::session::Session;

/// Drawn during the pre-login banner and while credentials are being
/// checked; doubles as the charset-switch sentinel
pub(crate) const BANNER_SENTINEL: &str = "登入中，請稍候...";

const REJECTED: &str = "密碼不對或無此帳號";
const RATE_LIMITED: &str = "請稍後再試";
const DUPLICATE_CONNECTION: &str = "您想刪除其他重複登入的連線嗎";
const FREQUENCY_WARNING: &str = "請勿頻繁登入以免造成系統過度負荷";
const CLEAR_FAILED_ATTEMPTS: &str = "您要刪除以上錯誤嘗試的記錄嗎";
const ANY_KEY: &str = "按任意鍵繼續";
const WELCOME: &str = "我是";

const POLL_INTERVAL: Duration = Duration::from_millis(400);

/// Prompt states the handshake can observe on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginPrompt {
    /// Credential rejection marker (row 21); terminal failure
    Rejected,
    /// Rate-limit marker (row 23); terminal failure
    RateLimited,
    /// Still logging in (row 22); keep polling
    InProgress,
    /// Duplicate-connection question (row 22)
    DuplicateConnection,
    /// Excessive-login-frequency warning (row 23)
    FrequencyWarning,
    /// Offer to clear failed-attempt records (row 23)
    ClearFailedAttempts,
    /// Press-any-key prompt (row 23)
    AnyKey,
    /// Some yes/no question nothing else matched (rows 22-23)
    GenericYesNo,
    /// Main-session welcome marker (row 23); terminal success
    Welcome,
    /// Nothing matched; keep polling
    Unrecognized,
}

/// Classify the current screen into a handshake prompt.
///
/// Evaluation order matters: failure markers first, then the specific
/// prompts, then the generic yes/no fallback, then the welcome marker.
pub fn classify(row21: &str, row22: &str, row23: &str) -> LoginPrompt {
    if row21.contains(REJECTED) {
        LoginPrompt::Rejected
    } else if row23.contains(RATE_LIMITED) {
        LoginPrompt::RateLimited
    } else if row22.contains(BANNER_SENTINEL) {
        LoginPrompt::InProgress
    } else if row22.contains(DUPLICATE_CONNECTION) {
        LoginPrompt::DuplicateConnection
    } else if row23.contains(FREQUENCY_WARNING) {
        LoginPrompt::FrequencyWarning
    } else if row23.contains(CLEAR_FAILED_ATTEMPTS) {
        LoginPrompt::ClearFailedAttempts
    } else if row23.contains(ANY_KEY) {
        LoginPrompt::AnyKey
    } else if format!("{row22}{row23}").to_lowercase().contains("y/n") {
        LoginPrompt::GenericYesNo
    } else if row23.contains(WELCOME) {
        LoginPrompt::Welcome
    } else {
        LoginPrompt::Unrecognized
    }
}

/// Prompts already answered in this handshake; each of the specific
/// prompts is responded to at most once even when the server keeps
/// redrawing it
#[derive(Debug, Default)]
struct Handled {
    duplicate_connection: bool,
    frequency_warning: bool,
    clear_failed_attempts: bool,
    any_key: bool,
}

/// Run the polled handshake until it resolves.
///
/// Assumes the credential submission command was already sent. Returns
/// `Ok(true)` on the welcome marker, `Ok(false)` on a terminal failure.
pub(crate) async fn run_handshake(session: &mut Session, kick: bool) -> Result<bool> {
    let mut handled = Handled::default();
    let mut first = true;
    loop {
        if !first {
            tokio::time::sleep(POLL_INTERVAL).await;
        }
        first = false;
        session.drain_pending();

        let row21 = session.line(21).text;
        let row22 = session.line(22).text;
        let row23 = session.line(23).text;

        match classify(&row21, &row22, &row23) {
            LoginPrompt::Rejected | LoginPrompt::RateLimited => {
                debug!("login rejected by remote");
                session.publish(SessionEvent::LoginFailed);
                return Ok(false);
            }
            LoginPrompt::Welcome => {
                session.publish(SessionEvent::LoginSuccess);
                return Ok(true);
            }
            LoginPrompt::InProgress => {}
            LoginPrompt::DuplicateConnection => {
                if !handled.duplicate_connection {
                    handled.duplicate_connection = true;
                    let answer = if kick { "y" } else { "n" };
                    session
                        .send(&format!("{answer}{}", keymap::ENTER))
                        .await?;
                }
            }
            LoginPrompt::FrequencyWarning => {
                if !handled.frequency_warning {
                    handled.frequency_warning = true;
                    session.send(keymap::ENTER).await?;
                }
            }
            LoginPrompt::ClearFailedAttempts => {
                if !handled.clear_failed_attempts {
                    handled.clear_failed_attempts = true;
                    session.send(&format!("y{}", keymap::ENTER)).await?;
                }
            }
            LoginPrompt::AnyKey => {
                if !handled.any_key {
                    handled.any_key = true;
                    session.send(keymap::ENTER).await?;
                }
            }
            LoginPrompt::GenericYesNo => {
                info!(screen = %session.screen_text(), "unrecognized yes/no prompt, answering y");
                session.send(&format!("y{}", keymap::ENTER)).await?;
            }
            LoginPrompt::Unrecognized => {
                info!(screen = %session.screen_text(), "unrecognized login state");
            }
        }
    }
}
