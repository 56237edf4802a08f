// psi/section.rs
//! Generic PSI / SI section reader with optional CRC-32 (MPEG-2) validation.

use crc::{CRC_32_MPEG_2, Crc};
use log::debug;

const CRC_MPEG: Crc<u32> = Crc::<u32>::new(&CRC_32_MPEG_2);

/// A complete section located inside a packet payload.
pub struct SectionReader<'a> {
    pub table_id:       u8,
    pub section_length: usize,
    /// table_id through the last byte of the section (CRC included)
    pub data:           &'a [u8],
}

impl<'a> SectionReader<'a> {
    /// Applies the pointer field and bounds the section by `section_length`.
    ///
    /// Returns `None` when the payload is empty, the section does not fit in
    /// this packet, or (with `verify_crc`) the CRC-32 does not match.
    pub fn new(payload: &'a [u8], verify_crc: bool) -> Option<Self> {
        let pointer = *payload.first()? as usize;
        let start = 1 + pointer;
        if payload.len() < start + 3 {
            debug!("short section header");
            return None;
        }

        let table_id = payload[start];
        let section_length = (((payload[start + 1] & 0x0F) as usize) << 8) | payload[start + 2] as usize;
        let end = start + 3 + section_length;
        if end > payload.len() {
            debug!("section 0x{table_id:02X} truncated ({section_length} bytes declared)");
            return None;
        }
        let data = &payload[start..end];

        if verify_crc {
            if section_length < 4 {
                return None;
            }
            let calc = CRC_MPEG.checksum(&data[..data.len() - 4]);
            let found = u32::from_be_bytes([
                data[data.len() - 4],
                data[data.len() - 3],
                data[data.len() - 2],
                data[data.len() - 1],
            ]);
            if calc != found {
                debug!("section 0x{table_id:02X} CRC-32 mismatch (0x{calc:08X} != 0x{found:08X})");
                return None;
            }
        }

        Some(Self { table_id, section_length, data })
    }

    /// Offset one past the last byte preceding the CRC_32.
    pub fn crc_start(&self) -> usize {
        self.data.len().saturating_sub(4)
    }
}
