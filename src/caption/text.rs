//! Caption text decoding seam.
//!
//! Turning ARIB 8-unit character codes into text is not done here; the
//! extractor only needs a string it can test for blankness.

/// Decodes the bytes of one statement body data unit.
pub trait CaptionTextDecoder {
    fn decode(&self, data: &[u8]) -> String;
}

/// Returns the same string for every unit.
#[derive(Debug, Clone)]
pub struct PlaceholderDecoder {
    pub text: String,
}

impl Default for PlaceholderDecoder {
    fn default() -> Self {
        Self { text: "dummy".into() }
    }
}

impl CaptionTextDecoder for PlaceholderDecoder {
    fn decode(&self, _data: &[u8]) -> String {
        self.text.clone()
    }
}

/// Lossy UTF-8 pass-through for streams whose units already hold plain text.
#[derive(Debug, Clone, Copy, Default)]
pub struct RawTextDecoder;

impl CaptionTextDecoder for RawTextDecoder {
    fn decode(&self, data: &[u8]) -> String {
        String::from_utf8_lossy(data).into_owned()
    }
}

/// Decoder selection for [`crate::types::Options`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TextDecoderKind {
    #[default]
    Placeholder,
    Raw,
}

impl TextDecoderKind {
    pub fn build(self, placeholder: &str) -> Box<dyn CaptionTextDecoder> {
        match self {
            TextDecoderKind::Placeholder => Box::new(PlaceholderDecoder { text: placeholder.to_owned() }),
            TextDecoderKind::Raw => Box::new(RawTextDecoder),
        }
    }
}
