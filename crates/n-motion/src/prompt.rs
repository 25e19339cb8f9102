//! Scoped prompt visual state.
//!
//! While the engine waits for the target char it marks the cursor cell,
//! hides the terminal cursor, and optionally echoes a prompt. A
//! [`PromptGuard`] acquires all of that up front and releases it on drop,
//! so a cancelled or failed read leaves the screen as it found it.

use tracing::trace;

use crate::config::Config;
use crate::host::{Host, MarkRegion, MarkerId};
use crate::input::Key;

/// Text echoed on the command line when `show_prompt` is set.
pub const PROMPT: &str = "clever-f: ";

pub struct PromptGuard<'h, H: Host + ?Sized> {
    host: &'h mut H,
    cursor_marker: Option<MarkerId>,
    cursor_hidden: bool,
    prompt_shown: bool,
}

impl<'h, H: Host + ?Sized> PromptGuard<'h, H> {
    pub fn acquire(host: &'h mut H, config: &Config) -> Self {
        let cursor_marker = config
            .mark_cursor
            .then(|| host.mark_region(MarkRegion::Cursor));
        if cursor_marker.is_some() {
            host.redraw();
        }
        if config.hide_cursor_on_cmdline {
            host.set_cursor_visible(false);
        }
        if config.show_prompt {
            host.show_prompt(Some(PROMPT));
        }
        Self {
            host,
            cursor_marker,
            cursor_hidden: config.hide_cursor_on_cmdline,
            prompt_shown: config.show_prompt,
        }
    }

    /// Read one key, skipping terminal artifacts.
    pub fn read_key(&mut self) -> Key {
        loop {
            match self.host.read_key() {
                Key::TerminalArtifact => trace!("skipping terminal artifact"),
                key => return key,
            }
        }
    }
}

impl<H: Host + ?Sized> Drop for PromptGuard<'_, H> {
    fn drop(&mut self) {
        if let Some(id) = self.cursor_marker.take() {
            self.host.clear_marker(id);
        }
        if self.cursor_hidden {
            self.host.set_cursor_visible(true);
        }
        if self.prompt_shown {
            self.host.show_prompt(None);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer_host::BufferHost;
    use crate::host::MarkKind;

    #[test]
    fn acquires_and_releases_everything() {
        let mut host = BufferHost::with_text("abc");
        host.push_keys("x");
        let config = Config {
            show_prompt: true,
            ..Config::default()
        };
        {
            let mut guard = PromptGuard::acquire(&mut host, &config);
            assert_eq!(guard.read_key(), Key::Char('x'));
        }
        assert!(host.markers_of(MarkKind::Cursor).is_empty());
        assert!(host.cursor_visible());
        assert_eq!(host.prompt_text(), None);
        assert_eq!(host.redraws(), 1);
    }

    #[test]
    fn state_is_visible_while_held() {
        let mut host = BufferHost::with_text("abc");
        let config = Config {
            show_prompt: true,
            ..Config::default()
        };
        // Leak the guard so its release never runs.
        std::mem::forget(PromptGuard::acquire(&mut host, &config));
        assert_eq!(host.markers_of(MarkKind::Cursor).len(), 1);
        assert!(!host.cursor_visible());
        assert_eq!(host.prompt_text(), Some(PROMPT));
    }

    #[test]
    fn disabled_options_touch_nothing() {
        let mut host = BufferHost::with_text("abc");
        host.push_keys("x");
        let config = Config {
            mark_cursor: false,
            hide_cursor_on_cmdline: false,
            ..Config::default()
        };
        let mut guard = PromptGuard::acquire(&mut host, &config);
        assert_eq!(guard.read_key(), Key::Char('x'));
        std::mem::forget(guard);
        assert!(host.markers_of(MarkKind::Cursor).is_empty());
        assert!(host.cursor_visible());
        assert_eq!(host.redraws(), 0);
    }

    #[test]
    fn artifacts_are_skipped() {
        let mut host = BufferHost::with_text("abc");
        host.push_key(Key::TerminalArtifact);
        host.push_key(Key::TerminalArtifact);
        host.push_key(Key::Char('b'));
        let mut guard = PromptGuard::acquire(&mut host, &Config::default());
        assert_eq!(guard.read_key(), Key::Char('b'));
        drop(guard);
        assert_eq!(host.reads(), 3);
    }
}
