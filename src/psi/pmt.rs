use log::debug;

use crate::constants::{
    CAPTION_COMPONENT_TAG, PMT_TABLE_ID, STREAM_IDENTIFIER_DESCRIPTOR, STREAM_TYPE_PRIVATE_PES,
};
use crate::psi::section::SectionReader;

/// ─────────── PMT ───────────
#[derive(Debug, Clone)]
pub struct PmtSection {
    pub version:        u8,
    pub program_number: u16,
    pub pcr_pid:        u16,
    pub streams:        Vec<StreamInfo>,
}
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamInfo {
    pub stream_type:    u8,
    pub elementary_pid: u16,
    /// component_tag of the stream identifier descriptor (ARIB STD-B10 6.2.16)
    pub component_tag:  Option<u8>,
}

impl StreamInfo {
    pub fn is_caption(&self) -> bool {
        self.stream_type == STREAM_TYPE_PRIVATE_PES && self.component_tag == Some(CAPTION_COMPONENT_TAG)
    }
}

impl PmtSection {
    /// Elementary PID of the first caption stream.
    pub fn caption_pid(&self) -> Option<u16> {
        self.streams.iter().find(|s| s.is_caption()).map(|s| s.elementary_pid)
    }
}

/// Returns `None` when the payload does not hold a complete PMT section.
pub fn parse_pmt(payload: &[u8], verify_crc: bool) -> Option<PmtSection> {
    let sec = SectionReader::new(payload, verify_crc)?;
    if sec.table_id != PMT_TABLE_ID {
        debug!("not PMT (table_id 0x{:02X})", sec.table_id);
        return None;
    }
    let b = sec.data;
    let end = sec.crc_start();
    if end < 12 { return None; }

    /* ── fixed header ── */
    let program_number = u16::from_be_bytes([b[3], b[4]]);
    let version        = (b[5] & 0x3E) >> 1;
    let pcr_pid        = (((b[8] & 0x1F) as u16) << 8) | (b[9] as u16);
    let prog_info_len  = (((b[10] & 0x0F) as usize) << 8) | (b[11] as usize);
    let mut idx        = 12 + prog_info_len;          // skip program descriptors

    /* ── ES loop ── */
    let mut streams = Vec::new();
    while idx + 5 <= end {
        let stype = b[idx];
        let pid   = (((b[idx + 1] & 0x1F) as u16) << 8) | (b[idx + 2] as u16);
        let eslen = (((b[idx + 3] & 0x0F) as usize) << 8) | (b[idx + 4] as usize);
        let desc_start = idx + 5;
        let desc_end = (desc_start + eslen).min(end);
        streams.push(StreamInfo {
            stream_type:    stype,
            elementary_pid: pid,
            component_tag:  find_component_tag(&b[desc_start..desc_end]),
        });
        idx = desc_start + eslen;
    }

    Some(PmtSection { version, program_number, pcr_pid, streams })
}

/// Walks an ES_info descriptor loop for a stream identifier descriptor.
fn find_component_tag(descriptors: &[u8]) -> Option<u8> {
    let mut idx = 0;
    while idx + 2 <= descriptors.len() {
        let tag = descriptors[idx];
        let len = descriptors[idx + 1] as usize;
        if tag == STREAM_IDENTIFIER_DESCRIPTOR && len >= 1 && idx + 2 < descriptors.len() {
            return Some(descriptors[idx + 2]);
        }
        idx += 2 + len;
    }
    None
}
