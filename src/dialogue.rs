//! Advanced SubStation Alpha output.

use std::io::Write;

use crate::clock::Timestamp;
use crate::error::{Error, Result};

pub const SCRIPT_HEADER: &str = "\
[Script Info]
ScriptType: v4.00+
Collisions: Normal
ScaledBorderAndShadow: yes
Timer: 100.0000

[Events]
Format: Layer, Start, End, Style, Name, MarginL, MarginR, MarginV, Effect, Text
";

pub fn format_dialogue(start: Timestamp, end: Timestamp, text: &str) -> String {
    format!("Dialogue: 0,{start},{end},Default,,,,,,{text}")
}

/// Writes the script header lazily, before the first line.
pub struct DialogueEmitter<W: Write> {
    out:            W,
    header_written: bool,
    lines:          u64,
}

impl<W: Write> DialogueEmitter<W> {
    pub fn new(out: W) -> Self {
        Self { out, header_written: false, lines: 0 }
    }

    pub fn emit(&mut self, start: Timestamp, end: Timestamp, text: &str) -> Result<()> {
        if !self.header_written {
            self.out.write_all(SCRIPT_HEADER.as_bytes()).map_err(Error::Output)?;
            self.header_written = true;
        }
        writeln!(self.out, "{}", format_dialogue(start, end, text)).map_err(Error::Output)?;
        self.lines += 1;
        Ok(())
    }

    pub fn lines(&self) -> u64 {
        self.lines
    }

    pub fn flush(&mut self) -> Result<()> {
        self.out.flush().map_err(Error::Output)
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(h: u32, m: u32, s: u32, c: u32) -> Timestamp {
        Timestamp { hours: h, minutes: m, seconds: s, centis: c }
    }

    #[test]
    fn no_events_no_output() {
        let emitter = DialogueEmitter::new(Vec::new());
        assert!(emitter.into_inner().is_empty());
    }

    #[test]
    fn header_written_once() {
        let mut emitter = DialogueEmitter::new(Vec::new());
        emitter.emit(ts(1, 2, 3, 4), ts(1, 2, 5, 0), "A").unwrap();
        emitter.emit(ts(1, 2, 5, 0), ts(21, 0, 0, 99), "B").unwrap();
        assert_eq!(emitter.lines(), 2);

        let text = String::from_utf8(emitter.into_inner()).unwrap();
        assert_eq!(text.matches("[Script Info]").count(), 1);
        assert!(text.starts_with(SCRIPT_HEADER));
        let body: Vec<&str> = text[SCRIPT_HEADER.len()..].lines().collect();
        assert_eq!(body, vec![
            "Dialogue: 0,01:02:03.04,01:02:05.00,Default,,,,,,A",
            "Dialogue: 0,01:02:05.00,21:00:00.99,Default,,,,,,B",
        ]);
    }
}
