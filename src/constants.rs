//! Constants for MPEG-TS demultiplexing and ARIB caption extraction

/// MPEG-TS packet constants
pub const TS_PACKET_SIZE: usize = 188;
pub const TS_SYNC_BYTE: u8 = 0x47;
pub const TS_HEADER_SIZE: usize = 4;

/// Well-known PIDs
pub const PAT_PID: u16 = 0x0000;
pub const TOT_PID: u16 = 0x0014; // TDT/TOT (ARIB STD-B10 5.2.9)

/// PSI / SI table ids
pub const PAT_TABLE_ID: u8 = 0x00;
pub const PMT_TABLE_ID: u8 = 0x02;
pub const TOT_TABLE_ID: u8 = 0x73;

/// PMT elementary stream matching
pub const STREAM_TYPE_PRIVATE_PES: u8 = 0x06; // ARIB synchronized data
pub const STREAM_IDENTIFIER_DESCRIPTOR: u8 = 0x52;
pub const CAPTION_COMPONENT_TAG: u8 = 0x87;

/// ARIB STD-B24 caption data
pub const DATA_GROUP_MANAGEMENT_A: u8 = 0x00;
pub const DATA_GROUP_MANAGEMENT_B: u8 = 0x20;
pub const DATA_UNIT_STATEMENT_BODY: u8 = 0x20;

/// PCR constants
pub const PCR_CLOCK_HZ: i64 = 27_000_000; // 27 MHz
pub const PCR_TICKS_PER_CENTITIME: i64 = PCR_CLOCK_HZ / 100;
pub const PCR_BASE_MULTIPLIER: u64 = 300;

/// Japan Standard Time, the zone TOT wall-clock values are expressed in
pub const BROADCAST_UTC_OFFSET_SECS: i32 = 9 * 3600;
