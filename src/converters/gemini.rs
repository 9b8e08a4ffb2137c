use crate::citation_format::{replace_bare_citations, CitationFormat, GEMINI_REF_REGEX};
use super::FormatConverter;

// @module: Gemini dialect conversion

/// Converter for Gemini deep-research reports.
///
/// Step sequence: the inline pass runs first and rewrites bare
/// space-number-punctuation markers to `[^n]`, skipping heading lines so
/// numbered headings are never mistaken for citations. The reference pass
/// runs second as an independent line-by-line sweep; it matches numbered
/// reference lines (title, optional access-time phrase, URL) that the
/// inline pass leaves untouched, since their numbers are followed by `.`
/// rather than sentence punctuation.
pub struct GeminiConverter;

impl FormatConverter for GeminiConverter {
    fn format(&self) -> CitationFormat {
        CitationFormat::Gemini
    }

    fn convert(&self, text: &str) -> String {
        let inline_converted = convert_inline(text);
        convert_references(&inline_converted)
    }
}

/// Rewrite bare inline citations line by line. Heading lines pass through
/// verbatim.
fn convert_inline(text: &str) -> String {
    text.split('\n')
        .map(|line| {
            if line.trim().starts_with('#') {
                line.to_string()
            } else {
                replace_bare_citations(line)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Rewrite numbered reference lines to `[^n]: Title URL`. Lines that do not
/// match the reference pattern pass through unchanged.
fn convert_references(text: &str) -> String {
    text.split('\n')
        .map(|line| match GEMINI_REF_REGEX.captures(line.trim()) {
            Some(caps) => format!("[^{}]: {} {}", &caps[1], &caps[2], &caps[3]),
            None => line.to_string(),
        })
        .collect::<Vec<_>>()
        .join("\n")
}
