//! Transport packet header, adaptation field and PCR decoding (ISO/IEC 13818-1 2.4.3).

use bitstream_io::{BigEndian, BitRead, BitReader};

use crate::clock::SystemClock;
use crate::constants::{PCR_BASE_MULTIPLIER, TS_HEADER_SIZE, TS_PACKET_SIZE, TS_SYNC_BYTE};
use crate::error::{Error, Result};

/// The fixed 4-byte packet header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PacketHeader {
    pub transport_error:    bool,
    pub payload_unit_start: bool,
    pub pid:                u16,
    pub has_adaptation:     bool,
    pub has_payload:        bool,
    pub continuity_counter: u8,
}

/// One decoded packet. Borrowed from the read buffer and dropped after dispatch.
#[derive(Debug, Clone, Copy)]
pub struct Packet<'a> {
    pub header:  PacketHeader,
    /// PCR carried in the adaptation field, if any
    pub pcr:     Option<SystemClock>,
    /// Bytes after the header and adaptation field; `None` when the packet carries no payload
    pub payload: Option<&'a [u8]>,
}

/// Decodes a 188-byte packet.
///
/// The sync byte is checked before anything else is read. A bad sync byte or
/// an adaptation field that reaches past the packet is a framing error; the
/// stream is not re-synchronised.
pub fn parse_packet(chunk: &[u8]) -> Result<Packet<'_>> {
    if chunk.len() < TS_PACKET_SIZE {
        return Err(Error::PacketTooShort(chunk.len()));
    }
    if chunk[0] != TS_SYNC_BYTE {
        return Err(Error::InvalidSyncByte(chunk[0]));
    }
    let chunk = &chunk[..TS_PACKET_SIZE];

    let header = parse_header(&chunk[1..TS_HEADER_SIZE])?;
    let mut offset = TS_HEADER_SIZE;
    let mut pcr = None;

    if header.has_adaptation {
        let adap_len = chunk[offset] as usize;
        offset += 1;
        if offset + adap_len > TS_PACKET_SIZE {
            return Err(Error::AdaptationFieldOverflow(adap_len));
        }
        let field = &chunk[offset..offset + adap_len];
        // field[0] holds the flags; PCR_flag is bit 4
        if adap_len >= 7 && field[0] & 0x10 != 0 {
            pcr = Some(parse_pcr(&field[1..7])?);
        }
        offset += adap_len;
    }

    let payload = header.has_payload.then(|| &chunk[offset..]);
    Ok(Packet { header, pcr, payload })
}

/// Header bytes 1..4 (everything after the sync byte).
fn parse_header(bytes: &[u8]) -> Result<PacketHeader> {
    let mut br = BitReader::endian(bytes, BigEndian);

    let transport_error    = br.read::<1, u8>()? != 0;
    let payload_unit_start = br.read::<1, u8>()? != 0;
    br.skip(1)?;                                   // transport_priority
    let pid                = br.read::<13, u16>()?;
    br.skip(2)?;                                   // transport_scrambling_control
    let has_adaptation     = br.read::<1, u8>()? != 0;
    let has_payload        = br.read::<1, u8>()? != 0;
    let continuity_counter = br.read::<4, u8>()?;

    Ok(PacketHeader {
        transport_error,
        payload_unit_start,
        pid,
        has_adaptation,
        has_payload,
        continuity_counter,
    })
}

/// program_clock_reference: 33-bit base, 6 reserved bits, 9-bit extension.
pub fn parse_pcr(bytes: &[u8]) -> Result<SystemClock> {
    let mut br = BitReader::endian(bytes, BigEndian);
    let base = br.read::<33, u64>()?;
    br.skip(6)?;
    let ext = br.read::<9, u16>()?;
    Ok(SystemClock::from_pcr(base * PCR_BASE_MULTIPLIER + ext as u64))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blank_packet(pid: u16) -> [u8; TS_PACKET_SIZE] {
        let mut pkt = [0xFFu8; TS_PACKET_SIZE];
        pkt[0] = TS_SYNC_BYTE;
        pkt[1] = 0x40 | ((pid >> 8) as u8 & 0x1F);
        pkt[2] = pid as u8;
        pkt[3] = 0x10;
        pkt
    }

    #[test]
    fn rejects_bad_sync_byte() {
        let mut pkt = blank_packet(0x100);
        pkt[0] = 0x48;
        assert!(matches!(parse_packet(&pkt), Err(Error::InvalidSyncByte(0x48))));
    }

    #[test]
    fn rejects_short_packet() {
        let pkt = [TS_SYNC_BYTE; 100];
        assert!(matches!(parse_packet(&pkt), Err(Error::PacketTooShort(100))));
    }

    #[test]
    fn decodes_header_fields() {
        let mut pkt = blank_packet(0x1ABC);
        pkt[3] = 0x17;
        let parsed = parse_packet(&pkt).unwrap();
        assert_eq!(parsed.header.pid, 0x1ABC);
        assert!(parsed.header.payload_unit_start);
        assert!(parsed.header.has_payload);
        assert!(!parsed.header.has_adaptation);
        assert_eq!(parsed.header.continuity_counter, 7);
        assert_eq!(parsed.payload.map(<[u8]>::len), Some(184));
        assert!(parsed.pcr.is_none());
    }

    #[test]
    fn decodes_pcr_with_nine_bit_extension() {
        let mut pkt = blank_packet(0x101);
        pkt[3] = 0x30;
        pkt[4] = 7;
        pkt[5] = 0x10;
        // base = 1, extension = 0x1FF
        pkt[6..12].copy_from_slice(&[0x00, 0x00, 0x00, 0x00, 0xFF, 0xFF]);
        let parsed = parse_packet(&pkt).unwrap();
        assert_eq!(parsed.pcr, Some(SystemClock::from_pcr(300 + 0x1FF)));
        assert_eq!(parsed.payload.map(<[u8]>::len), Some(176));
    }

    #[test]
    fn pcr_flag_without_room_is_ignored() {
        let mut pkt = blank_packet(0x101);
        pkt[3] = 0x30;
        pkt[4] = 1;
        pkt[5] = 0x10;
        let parsed = parse_packet(&pkt).unwrap();
        assert!(parsed.pcr.is_none());
    }

    #[test]
    fn adaptation_only_packet_has_no_payload() {
        let mut pkt = blank_packet(0x101);
        pkt[3] = 0x20;
        pkt[4] = 183;
        pkt[5] = 0x00;
        let parsed = parse_packet(&pkt).unwrap();
        assert!(parsed.payload.is_none());
    }

    #[test]
    fn oversized_adaptation_field_is_fatal() {
        let mut pkt = blank_packet(0x101);
        pkt[3] = 0x30;
        pkt[4] = 184;
        assert!(matches!(parse_packet(&pkt), Err(Error::AdaptationFieldOverflow(184))));
    }
}
