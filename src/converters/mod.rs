/*!
 * Dialect converters for citation rewriting.
 *
 * Each source dialect gets one converter behind the `FormatConverter`
 * contract, so the controller never touches dialect-specific pattern
 * literals. Adding a dialect means adding a converter and a dispatch arm,
 * nothing else.
 */

use crate::citation_format::{detect_format, CitationFormat};

pub mod gemini;
pub mod gpt;

pub use gemini::GeminiConverter;
pub use gpt::GptConverter;

/// Uniform two-operation contract for a dialect converter: probe whether a
/// document is in this converter's dialect, and rewrite it to canonical
/// footnote form.
pub trait FormatConverter: Sync {
    /// The dialect this converter handles.
    fn format(&self) -> CitationFormat;

    /// Whether the document is classified as this converter's dialect.
    fn applies(&self, text: &str) -> bool {
        detect_format(text) == self.format()
    }

    /// Rewrite inline markers and the reference list to canonical form.
    /// Text outside the citation syntax is preserved byte-for-byte.
    fn convert(&self, text: &str) -> String;
}

static GPT_CONVERTER: GptConverter = GptConverter;
static GEMINI_CONVERTER: GeminiConverter = GeminiConverter;

/// Look up the converter for a detected dialect. Canonical and unknown
/// documents have nothing to convert.
pub fn converter_for(format: CitationFormat) -> Option<&'static dyn FormatConverter> {
    match format {
        CitationFormat::Gpt => Some(&GPT_CONVERTER),
        CitationFormat::Gemini => Some(&GEMINI_CONVERTER),
        CitationFormat::Converted | CitationFormat::Unknown => None,
    }
}
