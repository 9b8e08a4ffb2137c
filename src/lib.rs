/*!
 * # dscite - Deep Research Citation Formatter
 *
 * A Rust library for converting inline numeric citations in AI
 * "deep research" reports to uniform Markdown footnote format.
 *
 * ## Features
 *
 * - Detect which citation dialect a document uses (GPT bracket-link
 *   style or Gemini CJK-punctuation style)
 * - Rewrite inline markers and the trailing reference list to the
 *   canonical `[^n]` / `[^n]: Title URL` footnote form
 * - Preserve all other document content byte-for-byte
 * - Cross-check converted documents for missing or orphan references
 * - Process a single file or a directory tree, with dry-run preview,
 *   check-only inspection, and backup-before-write
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `citation_format`: Dialect detection, citation counting, pattern table
 * - `converters`: One converter per source dialect behind a uniform contract:
 *   - `converters::gpt`: GPT bracket-link reports (standard and variant layouts)
 *   - `converters::gemini`: Gemini bare-number reports
 * - `validation`: Post-conversion inline/reference cross-check
 * - `file_utils`: File system operations and backup handling
 * - `app_controller`: Per-file state machine and directory processing
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod citation_format;
pub mod converters;
pub mod validation;
pub mod file_utils;
pub mod app_controller;
pub mod errors;

// Re-export main types for easier usage
pub use citation_format::{
    count_citations, detect_format, unique_citation_numbers, CitationFormat,
};
pub use converters::{converter_for, FormatConverter};
pub use validation::{validate_conversion, ValidationReport};
pub use app_controller::{
    Controller, DirectoryStats, ProcessOptions, ProcessOutcome, ProcessResult,
};
pub use errors::{AppError, ConversionError};
