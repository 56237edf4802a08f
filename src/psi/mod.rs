pub mod section;
pub mod pat;
pub mod pmt;
pub mod tot;

pub use pat::{parse_pat, PatSection};
pub use pmt::{parse_pmt, PmtSection};
pub use tot::{decode_bcd, parse_tot};
