//! JSON run summary.

use serde::Serialize;

/// What the extractor discovered and produced over one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExtractionReport {
    pub packets:                u64,
    pub pmt_pids:               Vec<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption_pid:            Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pcr_pid:                Option<u16>,
    /// Wall time minus presentation clock, in hundredths of a second
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clock_offset_centitime: Option<i64>,
    pub dialogue_lines:         u64,
    /// A caption was still on screen when the stream ended and was not written
    pub trailing_dropped:       bool,
}

impl ExtractionReport {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
