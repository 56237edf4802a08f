use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use arib_caption_dumper::extractor::{run, Options, TextDecoderKind};

#[derive(Clone, Copy, ValueEnum)]
enum Decoder {
    /// Same text for every caption
    Placeholder,
    /// Caption bytes as lossy UTF-8
    Raw,
}

impl From<Decoder> for TextDecoderKind {
    fn from(d: Decoder) -> Self {
        match d {
            Decoder::Placeholder => TextDecoderKind::Placeholder,
            Decoder::Raw => TextDecoderKind::Raw,
        }
    }
}

/// Dump ARIB closed captions from an MPEG-2 TS file as an ASS script
#[derive(Parser)]
struct Opt {
    /// MPEG-2 transport stream to read
    input: PathBuf,

    /// Write the script here instead of standard output
    #[clap(short, long)]
    output: Option<PathBuf>,

    /// Ignore PAT/PMT/TOT sections with a bad CRC-32
    #[clap(long, default_value_t = false)]
    verify_crc: bool,

    /// Close the last caption at end of stream instead of dropping it
    #[clap(long, default_value_t = false)]
    flush_trailing: bool,

    /// How caption data units are turned into text
    #[clap(long, value_enum, default_value_t = Decoder::Placeholder)]
    text_decoder: Decoder,

    /// Text emitted for every caption by the placeholder decoder
    #[clap(long, default_value = "dummy")]
    placeholder: String,

    /// Print a JSON run summary to stderr
    #[clap(long, default_value_t = false)]
    report: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let opt = Opt::parse();

    run(Options {
        input:          opt.input,
        output:         opt.output,
        verify_crc:     opt.verify_crc,
        flush_trailing: opt.flush_trailing,
        text_decoder:   opt.text_decoder.into(),
        placeholder:    opt.placeholder,
        report:         opt.report,
    })
    .await
    .map(drop)
}
