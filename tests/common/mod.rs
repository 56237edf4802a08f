//! Synthetic transport stream builder shared by the integration tests.
#![allow(dead_code)]

use crc::{CRC_32_MPEG_2, Crc};

pub const PACKET: usize = 188;
const CRC: Crc<u32> = Crc::<u32>::new(&CRC_32_MPEG_2);

/// One payload-unit-start packet; the payload is padded with 0xFF.
pub fn payload_packet(pid: u16, payload: &[u8]) -> Vec<u8> {
    assert!(payload.len() <= PACKET - 4);
    let mut pkt = vec![0x47, 0x40 | ((pid >> 8) as u8 & 0x1F), pid as u8, 0x10];
    pkt.extend_from_slice(payload);
    pkt.resize(PACKET, 0xFF);
    pkt
}

/// Pointer field, section, CRC_32.
pub fn psi_packet(pid: u16, section: &[u8]) -> Vec<u8> {
    let crc = CRC.checksum(section);
    let mut payload = vec![0x00];
    payload.extend_from_slice(section);
    payload.extend_from_slice(&crc.to_be_bytes());
    payload_packet(pid, &payload)
}

/// Header of a long-form section; section_length accounts for the CRC.
fn section(table_id: u8, id: u16, body: &[u8]) -> Vec<u8> {
    let section_length = 5 + body.len() + 4;
    let mut s = vec![
        table_id,
        0xB0 | (section_length >> 8) as u8,
        section_length as u8,
        (id >> 8) as u8,
        id as u8,
        0xC1,
        0x00,
        0x00,
    ];
    s.extend_from_slice(body);
    s
}

pub fn pat(programs: &[(u16, u16)]) -> Vec<u8> {
    let mut body = vec![0x00, 0x00, 0xE0, 0x10]; // NIT
    for &(program, pid) in programs {
        body.extend_from_slice(&[(program >> 8) as u8, program as u8, 0xE0 | (pid >> 8) as u8, pid as u8]);
    }
    psi_packet(0x0000, &section(0x00, 0x7FE1, &body))
}

/// PMT with one video stream and one caption stream tagged `component_tag`.
pub fn pmt(pmt_pid: u16, pcr_pid: u16, caption_pid: u16, component_tag: u8) -> Vec<u8> {
    let body = vec![
        0xE0 | (pcr_pid >> 8) as u8, pcr_pid as u8,
        0xF0, 0x00,
        0x02, 0xE1, 0x11, 0xF0, 0x03, 0x52, 0x01, 0x00,
        0x06, 0xE0 | (caption_pid >> 8) as u8, caption_pid as u8, 0xF0, 0x03, 0x52, 0x01, component_tag,
    ];
    psi_packet(pmt_pid, &section(0x02, 0x0400, &body))
}

/// TOT carrying `mjd` and BCD-coded `hms`.
pub fn tot(mjd: u16, hms: [u8; 3]) -> Vec<u8> {
    let section = vec![
        0x73, 0x70, 0x0B,
        (mjd >> 8) as u8, mjd as u8, hms[0], hms[1], hms[2],
        0xF0, 0x00,
    ];
    psi_packet(0x0014, &section)
}

/// Adaptation-field-only packet carrying a PCR of `centiseconds`.
pub fn pcr(pid: u16, centiseconds: u64) -> Vec<u8> {
    let base = centiseconds * 900;
    let mut pkt = vec![0x47, (pid >> 8) as u8 & 0x1F, pid as u8, 0x20, 183, 0x10];
    pkt.extend_from_slice(&[
        (base >> 25) as u8,
        (base >> 17) as u8,
        (base >> 9) as u8,
        (base >> 1) as u8,
        ((base & 1) << 7) as u8 | 0x7E,
        0x00,
    ]);
    pkt.resize(PACKET, 0xFF);
    pkt
}

/// Caption PES whose statement body units hold `texts` verbatim.
pub fn caption(pid: u16, texts: &[&str]) -> Vec<u8> {
    let mut units = Vec::new();
    for text in texts {
        let len = text.len();
        units.extend_from_slice(&[0x1F, 0x20, (len >> 16) as u8, (len >> 8) as u8, len as u8]);
        units.extend_from_slice(text.as_bytes());
    }
    let mut pes = vec![
        0x00, 0x00, 0x01, 0xBD, 0x00, 0x00, 0x80, 0x80, 0x05,
        0x21, 0x00, 0x01, 0x00, 0x01,
        0x80, 0xFF, 0xF0,
        0x01 << 2, 0x00, 0x00, 0x00, 0x00,
        0x00,
        (units.len() >> 16) as u8, (units.len() >> 8) as u8, units.len() as u8,
    ];
    pes.extend_from_slice(&units);
    payload_packet(pid, &pes)
}

/// PAT → PMT(0x100: caption 0x200, PCR 0x101) preamble.
pub fn preamble() -> Vec<u8> {
    [pat(&[(0x0400, 0x100)]), pmt(0x100, 0x101, 0x200, 0x87)].concat()
}
