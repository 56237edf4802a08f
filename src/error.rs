//! Error types for caption extraction.
//!
//! Only framing violations and I/O failures are errors. Tables that are
//! simply not applicable to a given packet decode to `None` instead.

use thiserror::Error;

/// Fatal extraction errors.
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid sync byte (expected 0x47).
    #[error("Invalid sync byte: expected 0x47, got 0x{0:02X}")]
    InvalidSyncByte(u8),

    /// Packet shorter than 188 bytes handed to the decoder.
    #[error("Packet too short: expected 188 bytes, got {0}")]
    PacketTooShort(usize),

    /// adaptation_field_length points past the end of the packet.
    #[error("Adaptation field of {0} bytes overflows the packet")]
    AdaptationFieldOverflow(usize),

    /// The input ended in the middle of a packet.
    #[error("Input ends with a truncated packet of {0} bytes")]
    TruncatedPacket(usize),

    /// Reading the input failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Writing a dialogue line failed.
    #[error("Failed to write subtitle output: {0}")]
    Output(#[source] std::io::Error),
}

/// Result alias for extraction operations.
pub type Result<T> = std::result::Result<T, Error>;
