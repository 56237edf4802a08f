//! ARIB STD-B24 caption PES decoding: synchronised PES header, data group and
//! the data unit loop.
//!
//! Only the first packet of a PES is looked at. Units that run past it are dropped.

pub mod text;

use log::{debug, warn};

use crate::constants::{DATA_GROUP_MANAGEMENT_A, DATA_GROUP_MANAGEMENT_B, DATA_UNIT_STATEMENT_BODY};

const PES_START_CODE: [u8; 3] = [0x00, 0x00, 0x01];

/// One caption data group located in a PES payload.
#[derive(Debug, Clone, Copy)]
pub struct CaptionDataGroup<'a> {
    pub data_group_id: u8,
    /// data_unit loop, bounded by data_unit_loop_length and the packet end
    units: &'a [u8],
}

impl<'a> CaptionDataGroup<'a> {
    /// Group ids 0x00 and 0x20 carry caption management data (B24 table 9-1).
    pub fn is_management(&self) -> bool {
        matches!(self.data_group_id, DATA_GROUP_MANAGEMENT_A | DATA_GROUP_MANAGEMENT_B)
    }

    pub fn units(&self) -> DataUnits<'a> {
        DataUnits { rest: self.units }
    }

    /// Only the statement body units, the ones that carry displayable text.
    pub fn statements(&self) -> impl Iterator<Item = DataUnit<'a>> {
        self.units().filter(|u| u.parameter == DATA_UNIT_STATEMENT_BODY)
    }
}

/// A single data unit (B24 table 9-11).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataUnit<'a> {
    pub parameter: u8,
    pub data:      &'a [u8],
}

/// Iterator over the data units of one group.
#[derive(Debug, Clone)]
pub struct DataUnits<'a> {
    rest: &'a [u8],
}

impl<'a> Iterator for DataUnits<'a> {
    type Item = DataUnit<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let r = self.rest;
        if r.len() < 5 {
            return None;
        }
        // r[0] is unit_separator (0x1F)
        let parameter = r[1];
        let size = ((r[2] as usize) << 16) | ((r[3] as usize) << 8) | r[4] as usize;
        if 5 + size > r.len() {
            warn!("data unit 0x{parameter:02X} of {size} bytes runs past the packet, skipped");
            self.rest = &[];
            return None;
        }
        self.rest = &r[5 + size..];
        Some(DataUnit { parameter, data: &r[5..5 + size] })
    }
}

/// Locates the caption data group in the first packet of a caption PES.
///
/// Returns `None` when the payload is not a PES or is too short to hold the
/// headers it declares.
pub fn parse_caption_pes(payload: &[u8]) -> Option<CaptionDataGroup<'_>> {
    if payload.len() < 9 || payload[..3] != PES_START_CODE {
        debug!("caption payload does not start a PES");
        return None;
    }
    let pes_header_len = payload[8] as usize;

    // data_identifier, private_stream_id, PES_data_packet_header_length
    let sync_hdr = 9 + pes_header_len;
    let data_packet_header_len = (*payload.get(sync_hdr + 2)? & 0x0F) as usize;
    let group = payload.get(sync_hdr + 3 + data_packet_header_len..)?;

    // data_group_id(6) version(2), link numbers, data_group_size(16)
    if group.len() < 6 {
        return None;
    }
    let data_group_id = (group[0] & 0xFC) >> 2;
    let mut p = &group[5..];

    let tmd = p[0] >> 6;
    if matches!(data_group_id, DATA_GROUP_MANAGEMENT_A | DATA_GROUP_MANAGEMENT_B) {
        // caption_management_data: TMD, [OTM], num_languages, language loop
        let skip = if tmd == 0b10 { 6 } else { 1 };
        p = p.get(skip..)?;
        let num_languages = *p.first()?;
        p = &p[1..];
        for _ in 0..num_languages {
            let dmf = *p.first()? & 0x0F;
            let entry_len = if (0b1100..=0b1110).contains(&dmf) { 6 } else { 5 };
            p = p.get(entry_len..)?;
        }
    } else {
        // caption_data: TMD, [STM]
        let skip = if tmd == 0b01 || tmd == 0b10 { 6 } else { 1 };
        p = p.get(skip..)?;
    }

    if p.len() < 3 {
        return None;
    }
    let loop_len = ((p[0] as usize) << 16) | ((p[1] as usize) << 8) | p[2] as usize;
    let units = &p[3..];
    Some(CaptionDataGroup {
        data_group_id,
        units: &units[..loop_len.min(units.len())],
    })
}
