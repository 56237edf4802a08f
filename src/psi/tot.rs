// psi/tot.rs
//! Time Offset Table (ARIB STD-B10 5.2.9): JST_time as MJD + BCD hh:mm:ss.

use chrono::{DateTime, Days, FixedOffset, NaiveDate, NaiveTime, TimeZone};
use log::debug;

use crate::constants::{BROADCAST_UTC_OFFSET_SECS, TOT_TABLE_ID};
use crate::psi::section::SectionReader;

/// Decodes one packed BCD byte, e.g. `0x59` → 59.
pub fn decode_bcd(n: u8) -> u32 {
    (n >> 4) as u32 * 10 + (n & 0x0F) as u32
}

/// Converts a Modified Julian Date (day 0 = 1858-11-17) to a calendar date.
pub fn mjd_to_date(mjd: u16) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(1858, 11, 17)?.checked_add_days(Days::new(mjd as u64))
}

/// Returns the broadcast wall time, or `None` when the payload is not a TOT
/// or carries an impossible date/time.
pub fn parse_tot(payload: &[u8], verify_crc: bool) -> Option<DateTime<FixedOffset>> {
    let sec = SectionReader::new(payload, verify_crc)?;
    if sec.table_id != TOT_TABLE_ID {
        debug!("not TOT (table_id 0x{:02X})", sec.table_id);
        return None;
    }
    let b = sec.data;
    if b.len() < 8 { return None; }

    let mjd  = u16::from_be_bytes([b[3], b[4]]);
    let date = mjd_to_date(mjd)?;
    let time = NaiveTime::from_hms_opt(decode_bcd(b[5]), decode_bcd(b[6]), decode_bcd(b[7]))?;

    FixedOffset::east_opt(BROADCAST_UTC_OFFSET_SECS)?
        .from_local_datetime(&date.and_time(time))
        .single()
}
