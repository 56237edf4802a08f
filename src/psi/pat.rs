use std::collections::BTreeSet;

use log::debug;

use crate::constants::PAT_TABLE_ID;
use crate::psi::section::SectionReader;

/// ─────────── PAT ───────────
#[derive(Debug, Clone)]
pub struct PatSection {
    pub transport_stream_id: u16,
    pub version:             u8,
    pub programs:            Vec<PatEntry>,
}
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatEntry {
    pub program_number: u16,
    pub pmt_pid:        u16,
}

impl PatSection {
    /// Program-map PIDs of every program (program 0, the NIT, is never listed).
    pub fn pmt_pids(&self) -> BTreeSet<u16> {
        self.programs.iter().map(|p| p.pmt_pid).collect()
    }
}

/// Returns `None` when the payload does not hold a PAT section.
pub fn parse_pat(payload: &[u8], verify_crc: bool) -> Option<PatSection> {
    let sec = SectionReader::new(payload, verify_crc)?;
    if sec.table_id != PAT_TABLE_ID {
        debug!("not PAT (table_id 0x{:02X})", sec.table_id);
        return None;
    }
    let d = sec.data;
    if d.len() < 8 { return None; }

    let mut idx = 8;
    let mut programs = Vec::new();
    while idx + 4 <= sec.crc_start() {
        let pn  = u16::from_be_bytes([d[idx], d[idx + 1]]);
        let pid = (((d[idx + 2] & 0x1F) as u16) << 8) | (d[idx + 3] as u16);
        idx += 4;
        if pn != 0 { programs.push(PatEntry { program_number: pn, pmt_pid: pid }); }
    }

    Some(PatSection {
        transport_stream_id: u16::from_be_bytes([d[3], d[4]]),
        version:             (d[5] & 0x3E) >> 1,
        programs,
    })
}
