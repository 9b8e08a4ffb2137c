/*!
 * Tests for the Gemini dialect converter
 */

use dscite::converters::{FormatConverter, GeminiConverter};
use crate::common;

/// Test the canonical Gemini case: bare inline citation plus an
/// access-time reference line
#[test]
fn test_convert_withInlineAndReferenceLine_shouldRewriteBoth() {
    let input = "事实表明 1。\n\n\
                 1. Source Title, 访问时间为2024年1月1日， [http://x.example](http://x.example)\n";
    let output = GeminiConverter.convert(input);

    assert!(output.contains("事实表明 [^1]。"));
    assert!(output.contains("[^1]: Source Title http://x.example"));
}

/// Test full document conversion preserves headings and structure
#[test]
fn test_convert_withGeminiDocument_shouldProduceCanonicalDocument() {
    let output = GeminiConverter.convert(common::sample_gemini_document());
    let expected = r#"# Gemini Report

事实表明 [^1]。另一个结论 [^2]，还有更多。

## 参考资料

[^1]: Source Title http://x.example
[^2]: Another Title http://y.example
"#;
    assert_eq!(output, expected);
}

/// Test that heading lines are protected from inline conversion
#[test]
fn test_convert_withNumberedHeading_shouldLeaveHeadingUnchanged() {
    let input = "# Section 1。\n\n正文 2。\n";
    let output = GeminiConverter.convert(input);

    assert!(output.contains("# Section 1。"));
    assert!(output.contains("正文 [^2]。"));
}

/// Test a reference line without the access-time phrase
#[test]
fn test_convert_withPlainReferenceLine_shouldRewriteLine() {
    let input = "3. Plain Title http://z.example\n";
    let output = GeminiConverter.convert(input);

    assert!(output.contains("[^3]: Plain Title http://z.example"));
}

/// Test a reference line with a bracket-wrapped URL and trailing parenthetical
#[test]
fn test_convert_withBracketWrappedUrl_shouldExtractBareUrl() {
    let input = "4. Wrapped Title, 访问时间为2024年2月2日， [http://w.example](http://w.example)\n";
    let output = GeminiConverter.convert(input);

    assert_eq!(output, "[^4]: Wrapped Title http://w.example\n");
}

/// Test that full-width digits in prose survive conversion untouched
#[test]
fn test_convert_withFullWidthDigit_shouldLeaveTextUnchanged() {
    let input = "事实表明 １。\n";
    assert_eq!(GeminiConverter.convert(input), input);
}

/// Test that lines matching neither pass are preserved
#[test]
fn test_convert_withProseLines_shouldLeaveThemUnchanged() {
    let input = "No citations in this line.\nAnother plain line.\n";
    assert_eq!(GeminiConverter.convert(input), input);
}

/// Test applicability probing
#[test]
fn test_applies_withGeminiAndGptText_shouldOnlyMatchGemini() {
    assert!(GeminiConverter.applies(common::sample_gemini_document()));
    assert!(!GeminiConverter.applies(common::sample_gpt_standard_document()));
}
