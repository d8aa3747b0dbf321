//! Clipboard sinks for generated passwords.
//!
//! Publishing a password overwrites whatever the clipboard held before.
//! No history of published passwords is kept.

use std::thread;
use std::time::{Duration, Instant};

use clipboard_rs::{Clipboard, ClipboardContext};
use tracing::debug;

use crate::error::{PasswordError, Result};

/// A destination that receives a generated password.
pub trait ClipboardSink {
    /// Replace the sink's contents with `text`.
    ///
    /// # Errors
    ///
    /// Returns an error if the sink cannot be written.
    fn set_text(&mut self, text: &str) -> Result<()>;
}

/// Whether the clipboard empties when the process that set it exits.
///
/// On X11 and Wayland the owning process answers every paste request itself,
/// so the text is only available while the clipboard context is alive.
pub const OWNER_MUST_STAY_ALIVE: bool =
    cfg!(all(unix, not(any(target_os = "macos", target_os = "ios"))));

/// Default time [`SystemClipboard`] keeps serving copied text.
pub const DEFAULT_HOLD: Duration = Duration::from_secs(10);

/// Longest time [`SystemClipboard`] will keep serving copied text.
pub const MAX_HOLD: Duration = Duration::from_secs(3600);

const HOLD_POLL_INTERVAL: Duration = Duration::from_millis(200);

/// The system clipboard.
///
/// A fresh clipboard context is opened for every write so no handle is held
/// between commands. Where [`OWNER_MUST_STAY_ALIVE`] holds, `set_text` blocks
/// until another application takes the clipboard or the hold time elapses.
#[derive(Debug, Clone, Copy)]
pub struct SystemClipboard {
    hold: Duration,
}

impl SystemClipboard {
    /// Create a system clipboard sink with the default hold time.
    #[must_use]
    pub fn new() -> Self {
        Self::with_hold(DEFAULT_HOLD)
    }

    /// Create a system clipboard sink that serves copied text for at most
    /// `hold`, clamped to [`MAX_HOLD`].
    #[must_use]
    pub fn with_hold(hold: Duration) -> Self {
        Self {
            hold: hold.min(MAX_HOLD),
        }
    }

    /// Maximum time a write keeps serving the clipboard.
    #[must_use]
    pub fn hold(&self) -> Duration {
        self.hold
    }
}

impl Default for SystemClipboard {
    fn default() -> Self {
        Self::new()
    }
}

impl ClipboardSink for SystemClipboard {
    fn set_text(&mut self, text: &str) -> Result<()> {
        let ctx =
            ClipboardContext::new().map_err(|e| PasswordError::Clipboard(e.to_string()))?;
        ctx.set_text(text.to_string())
            .map_err(|e| PasswordError::Clipboard(e.to_string()))?;
        debug!(len = text.len(), "Copied text to system clipboard");

        if OWNER_MUST_STAY_ALIVE {
            let deadline = Instant::now() + self.hold;
            hold_until(deadline, HOLD_POLL_INTERVAL, || {
                ctx.get_text().is_ok_and(|current| current == text)
            });
        }
        Ok(())
    }
}

/// Sleep in `interval` steps while `still_owned` reports true, up to `deadline`.
///
/// Returns `true` if ownership was lost before the deadline.
fn hold_until(
    deadline: Instant,
    interval: Duration,
    mut still_owned: impl FnMut() -> bool,
) -> bool {
    while Instant::now() < deadline {
        if !still_owned() {
            debug!("Clipboard taken over by another application");
            return true;
        }
        thread::sleep(interval.min(deadline.saturating_duration_since(Instant::now())));
    }
    debug!("Clipboard hold time elapsed");
    false
}

/// An in-process clipboard, used where no display server is available.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MemoryClipboard {
    contents: Option<String>,
}

impl MemoryClipboard {
    /// Create an empty in-memory clipboard.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The current contents, if anything was ever copied.
    #[must_use]
    pub fn contents(&self) -> Option<&str> {
        self.contents.as_deref()
    }
}

impl ClipboardSink for MemoryClipboard {
    fn set_text(&mut self, text: &str) -> Result<()> {
        self.contents = Some(text.to_string());
        Ok(())
    }
}
