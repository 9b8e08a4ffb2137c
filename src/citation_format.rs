use std::collections::BTreeSet;
use std::fmt;
use once_cell::sync::Lazy;
use regex::Regex;

// @module: Citation format detection and counting

// @const: GPT inline citation regex, matches [[n]](URL) and [\[n\]](URL)
pub static GPT_INLINE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\[\\?\[(\d+)\\?\]\]\([^)]+\)").unwrap()
});

// @const: URL capture variant of the GPT inline regex
pub static GPT_INLINE_URL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\[\\?\[\d+\\?\]\]\(([^)]+)\)").unwrap()
});

// @const: Gemini reference line regex, e.g. "1. Title, 访问时间为..., [URL](URL)"
pub static GEMINI_REF_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^(\d+)\. (.+?)(?:, 访问时间为[^，]+，)? ?\[?(https?://[^\s\]]+)\]?\(?[^)]*\)?$").unwrap()
});

// @const: Gemini reference section hint (numbered line carrying the access-time phrase)
static GEMINI_ACCESS_LINE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\n\d+\..+访问时间为").unwrap()
});

// @const: Gemini bare-number hint (whitespace + 1-3 ASCII digits + CJK sentence punctuation)
static GEMINI_BARE_HINT_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\s[0-9]{1,3}[。，]").unwrap()
});

// @const: Canonical footnote inline marker, [^n]
pub static CONVERTED_INLINE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\[\^(\d+)\]").unwrap()
});

// @const: Canonical footnote definition line, [^n]: at line start
pub static CONVERTED_REF_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^\[\^(\d+)\]:").unwrap()
});

// ASCII only: `\d` would also match full-width digits (１２３), which are
// ordinary CJK prose, not citation numbers, and do not parse as u32.
static DIGIT_RUN_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"[0-9]+").unwrap());

/// Citation dialect of a document. Exactly one tag describes a document at
/// any point in the pipeline; `detect_format` assigns it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CitationFormat {
    /// GPT deep-research reports: [[n]](URL) bracket-link markers
    Gpt,
    /// Gemini deep-research reports: bare " n。" markers and numbered references
    Gemini,
    /// Already in canonical footnote format ([^n] / [^n]:)
    Converted,
    /// No recognized citation dialect
    Unknown,
}

impl fmt::Display for CitationFormat {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            CitationFormat::Gpt => "gpt",
            CitationFormat::Gemini => "gemini",
            CitationFormat::Converted => "converted",
            CitationFormat::Unknown => "unknown",
        };
        write!(f, "{}", name)
    }
}

/// Detect the citation dialect of a document.
///
/// First match wins; the ordering is load-bearing because the dialects'
/// surface patterns overlap:
/// 1. GPT bracket-link marker anywhere in the text.
/// 2. A numbered reference line carrying the access-time phrase (Gemini).
/// 3. Bare space-number-punctuation occurrence with no canonical marker
///    present (Gemini fallback for documents whose reference section was
///    stripped or malformed; known-imprecise, the heading-line exclusion in
///    the converter is the only guard).
/// 4. Canonical inline marker plus canonical definition line (converted).
/// 5. Unknown.
pub fn detect_format(text: &str) -> CitationFormat {
    if GPT_INLINE_REGEX.is_match(text) {
        return CitationFormat::Gpt;
    }

    if GEMINI_ACCESS_LINE_REGEX.is_match(text) {
        return CitationFormat::Gemini;
    }

    if GEMINI_BARE_HINT_REGEX.is_match(text) && !CONVERTED_INLINE_REGEX.is_match(text) {
        return CitationFormat::Gemini;
    }

    if CONVERTED_INLINE_REGEX.is_match(text) && CONVERTED_REF_REGEX.is_match(text) {
        return CitationFormat::Converted;
    }

    CitationFormat::Unknown
}

/// Count inline citations and reference definitions for the given dialect.
///
/// Inline counts are occurrence counts, not deduplicated by number. For the
/// GPT dialect, when no canonical definition lines exist yet, the reference
/// count falls back to the distinct citation numbers found in bracket-link
/// markers after the last `---` separator (treating that tail as the
/// reference section).
///
/// Gemini inline counting scans the whole text, so a number at the start of
/// a line (preceded by a newline) counts, while the line-by-line conversion
/// pass never rewrites it. Before-counts can therefore exceed the number of
/// markers a conversion touches.
pub fn count_citations(text: &str, format: CitationFormat) -> (usize, usize) {
    match format {
        CitationFormat::Gpt => {
            let inline_count = GPT_INLINE_REGEX.find_iter(text).count();
            let mut ref_count = CONVERTED_REF_REGEX.find_iter(text).count();
            if ref_count == 0 {
                if let Some((_, tail)) = text.rsplit_once("---") {
                    let distinct: BTreeSet<u32> = GPT_INLINE_REGEX
                        .captures_iter(tail)
                        .filter_map(|caps| caps[1].parse().ok())
                        .collect();
                    ref_count = distinct.len();
                }
            }
            (inline_count, ref_count)
        }
        CitationFormat::Gemini => {
            let inline_count = find_bare_citations(text).len();
            let ref_count = GEMINI_REF_REGEX.find_iter(text).count();
            (inline_count, ref_count)
        }
        CitationFormat::Converted => {
            let inline_count = CONVERTED_INLINE_REGEX.find_iter(text).count();
            let ref_count = CONVERTED_REF_REGEX.find_iter(text).count();
            (inline_count, ref_count)
        }
        CitationFormat::Unknown => (0, 0),
    }
}

/// Distinct citation numbers from canonical-form text: (inline, references).
/// Only meaningful for text already in, or converted to, canonical form.
pub fn unique_citation_numbers(text: &str) -> (BTreeSet<u32>, BTreeSet<u32>) {
    let inline_numbers = CONVERTED_INLINE_REGEX
        .captures_iter(text)
        .filter_map(|caps| caps[1].parse().ok())
        .collect();
    let ref_numbers = CONVERTED_REF_REGEX
        .captures_iter(text)
        .filter_map(|caps| caps[1].parse().ok())
        .collect();
    (inline_numbers, ref_numbers)
}

/// One bare Gemini citation occurrence: the matched byte range (optional
/// leading space plus digits, boundary characters excluded) and its number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BareCitation {
    pub start: usize,
    pub end: usize,
    pub number: u32,
}

/// Scan for bare Gemini inline citations: a 1-3 digit number, optionally
/// preceded by one space, whose surrounding characters mark it as a citation
/// rather than ordinary prose. Only ASCII digits form a run; full-width
/// digits never match.
///
/// The boundary rules mirror a look-around pattern the regex crate cannot
/// express directly: the character before the match must exist and be
/// neither a digit nor `[` (when the match consumes a leading space, the
/// rule applies to the character before that space), and the character
/// after the digits must be `。`, `，`, `,`, whitespace, or the end of the
/// text. Runs of four or more digits never match; neither does a number at
/// the very start of the text.
pub fn find_bare_citations(text: &str) -> Vec<BareCitation> {
    let mut citations = Vec::new();

    for run in DIGIT_RUN_REGEX.find_iter(text) {
        if run.as_str().len() > 3 {
            continue;
        }

        let follows_ok = match text[run.end()..].chars().next() {
            None => true,
            Some(c) => matches!(c, '。' | '，' | ',') || c.is_whitespace(),
        };
        if !follows_ok {
            continue;
        }

        let start = match text[..run.start()].chars().next_back() {
            None => continue,
            Some(' ') => {
                let space_start = run.start() - 1;
                match text[..space_start].chars().next_back() {
                    // Boundary char sits before the space; consume the space.
                    Some(c) if !c.is_ascii_digit() && c != '[' => space_start,
                    // The space itself serves as the boundary char.
                    _ => run.start(),
                }
            }
            Some(c) if !c.is_ascii_digit() && c != '[' => run.start(),
            Some(_) => continue,
        };

        let number: u32 = run.as_str().parse().unwrap_or(0);
        citations.push(BareCitation {
            start,
            end: run.end(),
            number,
        });
    }

    citations
}

/// Rewrite every bare Gemini citation in a line to the canonical ` [^n]`
/// marker. A single leading space is always emitted, whether or not the
/// match consumed one; the trailing punctuation is left untouched.
pub fn replace_bare_citations(line: &str) -> String {
    let citations = find_bare_citations(line);
    if citations.is_empty() {
        return line.to_string();
    }

    let mut result = String::with_capacity(line.len() + citations.len() * 4);
    let mut last = 0;
    for citation in citations {
        result.push_str(&line[last..citation.start]);
        result.push_str(&format!(" [^{}]", citation.number));
        last = citation.end;
    }
    result.push_str(&line[last..]);
    result
}
