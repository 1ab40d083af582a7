//! Lossy text decoding for process output

use encoding_rs::Encoding;

use crate::RunnerError;

/// Text encoding applied to process output and scratch files.
///
/// Decoding never fails: malformed input is replaced with U+FFFD.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputEncoding(&'static Encoding);

/// Result of decoding a byte buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedText {
    pub text: String,
    /// At least one byte sequence was replaced.
    pub had_replacements: bool,
}

impl OutputEncoding {
    /// Resolve a WHATWG encoding label such as `utf-8`, `windows-1254` or `ibm866`.
    pub fn for_label(label: &str) -> Result<Self, RunnerError> {
        Encoding::for_label(label.trim().as_bytes())
            .map(Self)
            .ok_or_else(|| RunnerError::UnknownEncoding {
                label: label.to_string(),
            })
    }

    #[must_use]
    pub fn utf8() -> Self {
        Self(encoding_rs::UTF_8)
    }

    /// Canonical encoding name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.0.name()
    }

    #[must_use]
    pub fn decode(&self, bytes: &[u8]) -> DecodedText {
        let (text, _, had_replacements) = self.0.decode(bytes);
        DecodedText {
            text: text.into_owned(),
            had_replacements,
        }
    }

    /// Encode text for writing to disk. Unmappable characters become numeric
    /// character references, as `encoding_rs` does for legacy encodings.
    #[must_use]
    pub fn encode(&self, text: &str) -> Vec<u8> {
        let (bytes, _, _) = self.0.encode(text);
        bytes.into_owned()
    }
}

impl Default for OutputEncoding {
    fn default() -> Self {
        Self::utf8()
    }
}
