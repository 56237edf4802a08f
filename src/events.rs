//! Caption event reconstruction.
//!
//! A caption's end is only known when the next one arrives, so exactly one
//! event is held back and closed by its successor.

use crate::clock::SystemClock;

/// Text made only of spaces (the empty string included).
pub fn is_blank(text: &str) -> bool {
    text.chars().all(|c| c == ' ')
}

/// The caption currently on screen, end time unknown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingCaption {
    pub text:     String,
    pub start:    SystemClock,
    pub is_blank: bool,
}

/// A caption with both ends known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogueInterval {
    pub start: SystemClock,
    pub end:   SystemClock,
    pub text:  String,
}

/// Outcome of closing the last caption at end of stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Trailing {
    /// Nothing on screen, or only a blank caption
    Empty,
    Closed(DialogueInterval),
    /// Text on screen whose end would not come after its start
    Dropped(PendingCaption),
}

#[derive(Debug, Default)]
pub struct CaptionReconstructor {
    pending: Option<PendingCaption>,
}

impl CaptionReconstructor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending(&self) -> Option<&PendingCaption> {
        self.pending.as_ref()
    }

    /// Buffers `text` starting at `at` and closes the previous caption.
    ///
    /// The closed caption is returned unless its text is empty, or both it
    /// and the new caption are blank.
    pub fn push(&mut self, text: String, at: SystemClock) -> Option<DialogueInterval> {
        let blank = is_blank(&text);
        let closed = self.pending.replace(PendingCaption { text, start: at, is_blank: blank })?;

        if closed.text.is_empty() || (closed.is_blank && blank) {
            return None;
        }
        Some(DialogueInterval { start: closed.start, end: at, text: closed.text })
    }

    /// Closes the last caption at end of stream.
    ///
    /// Blank captions are discarded silently; text that would end before it
    /// starts comes back as [`Trailing::Dropped`].
    pub fn finish(&mut self, end: SystemClock) -> Trailing {
        match self.pending.take() {
            None => Trailing::Empty,
            Some(last) if last.is_blank => Trailing::Empty,
            Some(last) if end <= last.start => Trailing::Dropped(last),
            Some(last) => Trailing::Closed(DialogueInterval { start: last.start, end, text: last.text }),
        }
    }
}
