//! Command history with up/down arrow navigation.
//!
//! Uses stub type pattern - struct always exists, but behavior is feature-gated.

#![cfg_attr(not(feature = "history"), allow(unused_variables))]

#[cfg(not(feature = "history"))]
use core::marker::PhantomData;

/// Command history storage.
///
/// When `history` feature is enabled, keeps up to `limit` lines (never more
/// than `N`) in a ring buffer. When disabled, zero-size stub that no-ops all
/// operations.
#[derive(Debug)]
pub struct CommandHistory<const N: usize, const INPUT_SIZE: usize> {
    #[cfg(feature = "history")]
    buffer: heapless::Vec<heapless::String<INPUT_SIZE>, N>,

    #[cfg(feature = "history")]
    limit: usize,

    #[cfg(feature = "history")]
    position: Option<usize>,

    #[cfg(not(feature = "history"))]
    _phantom: PhantomData<[u8; INPUT_SIZE]>,
}

impl<const N: usize, const INPUT_SIZE: usize> CommandHistory<N, INPUT_SIZE> {
    /// History holding up to `N` lines.
    pub fn new() -> Self {
        Self::with_limit(N)
    }

    /// History holding up to `limit` lines (clamped to `N`).
    #[cfg(feature = "history")]
    pub fn with_limit(limit: usize) -> Self {
        Self {
            buffer: heapless::Vec::new(),
            limit: limit.min(N),
            position: None,
        }
    }

    /// History holding up to `limit` lines (stub version).
    #[cfg(not(feature = "history"))]
    pub fn with_limit(limit: usize) -> Self {
        Self {
            _phantom: PhantomData,
        }
    }

    /// Remember an executed line.
    ///
    /// Blank lines and repeats of the newest entry are skipped.
    #[cfg(feature = "history")]
    pub fn add(&mut self, cmd: &str) {
        self.position = None;

        if cmd.trim().is_empty() || self.limit == 0 {
            return;
        }
        if let Some(last) = self.buffer.last()
            && last.as_str() == cmd
        {
            return;
        }

        let mut entry = heapless::String::new();
        if entry.push_str(cmd).is_ok() {
            if self.buffer.len() >= self.limit {
                self.buffer.remove(0);
            }
            let _ = self.buffer.push(entry);
        }
    }

    /// Remember an executed line (stub version - no-op).
    #[cfg(not(feature = "history"))]
    pub fn add(&mut self, _cmd: &str) {}

    /// Navigate to previous command (up arrow).
    #[cfg(feature = "history")]
    pub fn previous_command(&mut self) -> Option<heapless::String<INPUT_SIZE>> {
        if self.buffer.is_empty() {
            return None;
        }

        let pos = match self.position {
            None => self.buffer.len() - 1,
            Some(p) => p.saturating_sub(1),
        };

        self.position = Some(pos);
        self.buffer.get(pos).cloned()
    }

    /// Navigate to previous command (stub version - returns None).
    #[cfg(not(feature = "history"))]
    pub fn previous_command(&mut self) -> Option<heapless::String<INPUT_SIZE>> {
        None
    }

    /// Navigate to next command (down arrow).
    ///
    /// Returns `None` once past the newest entry; the caller shows an empty
    /// line then.
    #[cfg(feature = "history")]
    pub fn next_command(&mut self) -> Option<heapless::String<INPUT_SIZE>> {
        match self.position {
            None => None,
            Some(p) if p + 1 >= self.buffer.len() => {
                self.position = None;
                None
            }
            Some(p) => {
                self.position = Some(p + 1);
                self.buffer.get(p + 1).cloned()
            }
        }
    }

    /// Navigate to next command (stub version - returns None).
    #[cfg(not(feature = "history"))]
    pub fn next_command(&mut self) -> Option<heapless::String<INPUT_SIZE>> {
        None
    }

    /// Whether up/down navigation is in progress.
    #[cfg(feature = "history")]
    pub fn is_navigating(&self) -> bool {
        self.position.is_some()
    }

    /// Whether up/down navigation is in progress (stub version - never).
    #[cfg(not(feature = "history"))]
    pub fn is_navigating(&self) -> bool {
        false
    }

    /// Number of remembered lines.
    #[cfg(feature = "history")]
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Number of remembered lines (stub version - always zero).
    #[cfg(not(feature = "history"))]
    pub fn len(&self) -> usize {
        0
    }

    /// No remembered lines.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Reset navigation position.
    #[cfg(feature = "history")]
    pub fn reset_position(&mut self) {
        self.position = None;
    }

    /// Reset navigation position (stub version - no-op).
    #[cfg(not(feature = "history"))]
    pub fn reset_position(&mut self) {}
}

impl<const N: usize, const INPUT_SIZE: usize> Default for CommandHistory<N, INPUT_SIZE> {
    fn default() -> Self {
        Self::new()
    }
}
