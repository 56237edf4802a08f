use std::io::{self, BufWriter, Write};

use anyhow::Context;
use log::info;
use tokio::fs::File;
use tokio::io::{AsyncRead, AsyncReadExt, BufReader};

use crate::caption::text::CaptionTextDecoder;
use crate::constants::TS_PACKET_SIZE;
use crate::error::{Error, Result};
use crate::processor::PacketProcessor;
use crate::report::ExtractionReport;
use crate::types::{Options, ProcessorConfig};

/// Opens the input and output named in `opts` and runs one extraction.
pub async fn run(opts: Options) -> anyhow::Result<ExtractionReport> {
    let input = File::open(&opts.input)
        .await
        .with_context(|| format!("cannot open {}", opts.input.display()))?;

    let out: Box<dyn Write> = match &opts.output {
        Some(path) => Box::new(BufWriter::new(
            std::fs::File::create(path).with_context(|| format!("cannot create {}", path.display()))?,
        )),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };

    let decoder = opts.text_decoder.build(&opts.placeholder);
    let (report, _) = extract(BufReader::new(input), out, decoder, opts.processor_config())
        .await
        .with_context(|| format!("extraction from {} failed", opts.input.display()))?;

    info!(
        "{} packets read, {} dialogue lines written",
        report.packets, report.dialogue_lines
    );
    if opts.report {
        write_report(&report, io::stderr().lock())?;
    }
    Ok(report)
}

/// Writes `report` as pretty JSON followed by a newline.
pub fn write_report<W: Write>(report: &ExtractionReport, mut w: W) -> anyhow::Result<()> {
    writeln!(w, "{}", report.to_json()?)?;
    w.flush()?;
    Ok(())
}

/// Feeds `reader` to a [`PacketProcessor`] one 188-byte packet at a time.
///
/// Any error stops the run; nothing after the failing packet is processed.
pub async fn extract<R, W>(
    mut reader: R,
    out: W,
    decoder: Box<dyn CaptionTextDecoder>,
    config: ProcessorConfig,
) -> Result<(ExtractionReport, W)>
where
    R: AsyncRead + Unpin,
    W: Write,
{
    let mut processor = PacketProcessor::new(out, decoder, config);
    let mut buf = [0u8; TS_PACKET_SIZE];

    loop {
        let n = read_packet(&mut reader, &mut buf).await?;
        if n == 0 {
            break;
        }
        if n < TS_PACKET_SIZE {
            return Err(Error::TruncatedPacket(n));
        }
        processor.process_packet(&buf)?;
    }

    processor.finish()
}

/// Fills `buf` unless the input ends first; returns the byte count read.
async fn read_packet<R: AsyncRead + Unpin>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        let n = reader.read(&mut buf[filled..]).await?;
        if n == 0 {
            break;
        }
        filled += n;
    }
    Ok(filled)
}
