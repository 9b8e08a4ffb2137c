/*!
 * Common test utilities for the dscite test suite
 */

use std::fs;
use std::path::{Path, PathBuf};
use anyhow::Result;
use tempfile::TempDir;

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// A GPT deep-research report in the standard layout: bracket-link inline
/// markers, and a references section whose definition lines still carry the
/// `[[n]](URL)` fragments.
pub fn sample_gpt_standard_document() -> &'static str {
    r#"# Research Report

Key finding one[[1]](http://a.example)[[2]](http://b.example).

## References

[^1]: Title A [[1]](http://a.example)
[^2]: Title B [[2]](http://b.example)
"#
}

/// A GPT deep-research report in the variant layout: the reference list
/// after the last `---` is itself written with bracket-link markers.
pub fn sample_gpt_variant_document() -> &'static str {
    r#"# Variant Report

Finding[[1]](http://a.example) and more[[2]](http://b.example).

---

[[1]](http://a.example) Example Research Paper
[http://a.example](http://a.example)
[[2]](http://b.example) Second Source
"#
}

/// A Gemini deep-research report: bare space-number-punctuation inline
/// markers and numbered reference lines with the access-time phrase.
pub fn sample_gemini_document() -> &'static str {
    r#"# Gemini Report

事实表明 1。另一个结论 2，还有更多。

## 参考资料

1. Source Title, 访问时间为2024年1月1日， [http://x.example](http://x.example)
2. Another Title, 访问时间为2024年1月2日， [http://y.example](http://y.example)
"#
}

/// A document already in canonical footnote format.
pub fn sample_converted_document() -> &'static str {
    r#"# Converted Report

A fact[^1]. Another fact[^2].

[^1]: Title A http://a.example
[^2]: Title B http://b.example
"#
}

/// A document with no recognizable citation dialect.
pub fn sample_unknown_document() -> &'static str {
    "Just some plain text without any citations.\n"
}
