use std::path::PathBuf;

use crate::caption::text::TextDecoderKind;

/// Knobs consumed by [`crate::processor::PacketProcessor`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProcessorConfig {
    /// Reject PAT/PMT/TOT sections whose CRC-32 does not match
    pub verify_crc:     bool,
    /// Close the last pending caption at end of stream instead of dropping it
    pub flush_trailing: bool,
}

/// Configuration options for a caption extraction run
#[derive(Debug, Clone)]
pub struct Options {
    pub input:          PathBuf,
    /// Standard output when `None`
    pub output:         Option<PathBuf>,
    pub verify_crc:     bool,
    pub flush_trailing: bool,
    pub text_decoder:   TextDecoderKind,
    /// Text produced by the placeholder decoder
    pub placeholder:    String,
    /// Print the JSON run summary to stderr when done
    pub report:         bool,
}

impl Options {
    pub fn new(input: impl Into<PathBuf>) -> Self {
        Self {
            input:          input.into(),
            output:         None,
            verify_crc:     false,
            flush_trailing: false,
            text_decoder:   TextDecoderKind::default(),
            placeholder:    "dummy".into(),
            report:         false,
        }
    }

    pub fn processor_config(&self) -> ProcessorConfig {
        ProcessorConfig {
            verify_crc:     self.verify_crc,
            flush_trailing: self.flush_trailing,
        }
    }
}
