// src/lib.rs
pub mod extractor {
    pub use crate::caption::text::TextDecoderKind;
    pub use crate::report::ExtractionReport;
    pub use crate::types::Options;

    /// Async entry-point; returns when the input is exhausted or a fatal error occurs
    pub async fn run(opts: Options) -> anyhow::Result<ExtractionReport> {
        crate::core::run(opts).await
    }
}

pub mod constants;
pub mod error;
pub mod packet;
pub mod psi;
pub mod caption;
pub mod clock;
pub mod events;
pub mod dialogue;
pub mod processor;
pub mod report;
pub mod types;
pub mod core;     // file I/O wrapper around the processor

pub use error::{Error, Result};
