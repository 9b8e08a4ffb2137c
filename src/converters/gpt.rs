use once_cell::sync::Lazy;
use regex::Regex;

use crate::citation_format::{CitationFormat, GPT_INLINE_REGEX, GPT_INLINE_URL_REGEX};
use super::FormatConverter;

// @module: GPT dialect conversion

// @const: Footnote definition prefix inside a title remainder, e.g. "[^12]:"
static REF_PREFIX_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\[\^?(\d+)\]?:\s*(.+)").unwrap()
});

// @const: Leftover marker fragments to scrub out of a reference title
static LEFTOVER_MARKER_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\[\^?\d+\]?:?").unwrap()
});

// @const: Standalone "[URL](URL)" markdown link at the start of a line
static RAW_URL_LINK_PREFIX_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\[https?://[^\]]+\]\(https?://[^)]+\)").unwrap()
});

// @const: Line that is nothing but a "[URL](URL)" markdown link
static RAW_URL_LINK_LINE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\[https?://[^\]]+\]\(https?://[^)]+\)$").unwrap()
});

// @const: URL target of a markdown link
static URL_TARGET_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\]\((https?://[^)]+)\)").unwrap()
});

static WHITESPACE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Converter for GPT deep-research reports.
///
/// Two sub-formats exist. In the standard layout the reference section
/// already carries `[^n]:` definition lines, polluted with `[[m]](URL)`
/// link fragments. In the variant layout the reference list itself is
/// written with bracket-link markers after the document's last `---`
/// separator. Both pipelines rewrite the reference section first and apply
/// the inline substitution last: the reference rewrite recovers URLs from
/// the original `[[n]](URL)` fragments, which the inline substitution
/// destroys.
pub struct GptConverter;

impl FormatConverter for GptConverter {
    fn format(&self) -> CitationFormat {
        CitationFormat::Gpt
    }

    fn convert(&self, text: &str) -> String {
        let rewritten = if is_variant_layout(text) {
            convert_variant_references(text)
        } else {
            convert_standard_references(text)
        };
        convert_inline(&rewritten)
    }
}

/// A document uses the variant layout when bracket-link markers appear in
/// the text following its last `---` separator. Without a separator there
/// is no such tail and the standard pipeline applies.
fn is_variant_layout(text: &str) -> bool {
    match text.rsplit_once("---") {
        Some((_, tail)) => tail.contains("[[") || tail.contains(r"[\["),
        None => false,
    }
}

/// Replace every inline `[[n]](target)` marker with `[^n]`.
fn convert_inline(text: &str) -> String {
    GPT_INLINE_REGEX.replace_all(text, "[^${1}]").into_owned()
}

/// Rewrite the standard-layout reference section.
///
/// Inside the section headed by `## 参考文献` or `## References`, each
/// definition line is cleaned to `[^n]: <title> <firstURL>`. A `---` inside
/// the section starts a raw URL listing; it and everything after it is
/// dropped. Every other line passes through unchanged, including the
/// `**其它来源` secondary-sources note.
fn convert_standard_references(text: &str) -> String {
    let mut result: Vec<String> = Vec::new();
    let mut in_references = false;
    let mut skip_raw_urls = false;

    for line in text.split('\n') {
        let trimmed = line.trim();

        if trimmed.starts_with("## 参考文献") || trimmed.starts_with("## References") {
            in_references = true;
            result.push(line.to_string());
            continue;
        }

        if in_references && trimmed == "---" {
            skip_raw_urls = true;
            continue;
        }
        if skip_raw_urls {
            continue;
        }

        if in_references && (trimmed.starts_with("[^") || trimmed.starts_with(r"\[^")) {
            result.push(rewrite_standard_ref_line(line));
        } else {
            result.push(line.to_string());
        }
    }

    result.join("\n")
}

/// Clean one standard-layout definition line: strip the `[[m]](URL)`
/// fragments, collapse whitespace, unescape backslash-escaped brackets,
/// scrub leftover marker fragments from the title, and re-emit as
/// `[^n]: <title> <firstURL>`. Lines that do not yield a recognizable
/// definition prefix are returned unchanged.
fn rewrite_standard_ref_line(line: &str) -> String {
    let urls: Vec<&str> = GPT_INLINE_URL_REGEX
        .captures_iter(line)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
        .collect();

    let stripped = GPT_INLINE_REGEX.replace_all(line, "");
    let collapsed = WHITESPACE_REGEX.replace_all(stripped.trim(), " ");
    let title = collapsed.replace(r"\[", "[").replace(r"\]", "]");

    if title.starts_with("[^") {
        if let Some(caps) = REF_PREFIX_REGEX.captures(&title) {
            let number = caps[1].to_string();
            let rest = LEFTOVER_MARKER_REGEX.replace_all(&caps[2], "");
            let rest = rest.trim();
            return match urls.first() {
                Some(url) => format!("[^{}]: {} {}", number, rest, url),
                None => format!("[^{}]: {}", number, rest),
            };
        }
    }

    line.to_string()
}

/// Rewrite the variant-layout reference list.
///
/// Only the text after the last `---` separator is touched; the head is
/// preserved byte-for-byte. A tail line carrying bracket-link markers
/// becomes one `[^n]: <title> <URL>` definition per citation number: the
/// URL comes from an immediately following standalone `[URL](URL)` line
/// when present (which is then consumed), otherwise from the marker targets
/// by position. Standalone raw-URL link lines that were not consumed are
/// dropped; everything else passes through.
fn convert_variant_references(text: &str) -> String {
    let Some((head, tail)) = text.rsplit_once("---") else {
        return text.to_string();
    };

    let lines: Vec<&str> = tail.split('\n').collect();
    let mut result: Vec<String> = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i];
        let citations: Vec<u32> = GPT_INLINE_REGEX
            .captures_iter(line)
            .filter_map(|caps| caps[1].parse().ok())
            .collect();

        if !citations.is_empty() {
            let title = GPT_INLINE_REGEX.replace_all(line, "").trim().to_string();

            // Shared URL on the next line covers every citation number here.
            if let Some(next) = lines.get(i + 1) {
                let next = next.trim();
                if RAW_URL_LINK_PREFIX_REGEX.is_match(next) {
                    if let Some(caps) = URL_TARGET_REGEX.captures(next) {
                        let url = &caps[1];
                        for number in &citations {
                            result.push(format!("[^{}]: {} {}", number, title, url));
                        }
                        i += 2;
                        continue;
                    }
                }
            }

            // No separate URL line; fall back to the marker targets by position.
            let urls: Vec<&str> = GPT_INLINE_URL_REGEX
                .captures_iter(line)
                .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
                .collect();
            for (j, number) in citations.iter().enumerate() {
                match urls.get(j) {
                    Some(url) if !url.is_empty() => {
                        result.push(format!("[^{}]: {} {}", number, title, url));
                    }
                    _ => result.push(format!("[^{}]: {}", number, title)),
                }
            }
        } else if !RAW_URL_LINK_LINE_REGEX.is_match(line.trim()) {
            result.push(line.to_string());
        }

        i += 1;
    }

    format!("{}---{}", head, result.join("\n"))
}
