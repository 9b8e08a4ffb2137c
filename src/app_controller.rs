use anyhow::Result;
use log::{error, info, debug};
use std::path::Path;
use indicatif::{ProgressBar, ProgressStyle};

use crate::citation_format::{
    count_citations, detect_format, unique_citation_numbers, CitationFormat,
};
use crate::converters::converter_for;
use crate::file_utils::FileManager;
use crate::validation::validate_conversion;

// @module: Application controller for citation processing

/// Number of document lines a dry-run diff preview inspects.
const PREVIEW_LINES: usize = 20;

/// Maximum characters shown per side of a preview diff line.
const PREVIEW_WIDTH: usize = 80;

/// Processing modes requested on the command line.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessOptions {
    /// Preview changes without writing
    pub dry_run: bool,
    /// Inspect format and counts only, never transform
    pub check_only: bool,
    /// Re-process documents already in canonical form
    pub force: bool,
    /// Descend into subdirectories
    pub recursive: bool,
    /// Detailed per-step output
    pub verbose: bool,
}

/// Terminal state of the per-file machine, used to classify a result into
/// the directory aggregate without sniffing message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessOutcome {
    /// A conversion (or check/preview of a convertible document) completed
    Processed,
    /// Document already in canonical form and force was not set
    AlreadyConverted,
    /// Nothing to do: unrecognized format or a no-op conversion
    Skipped,
    /// Read, backup, or write failure
    Failed,
}

/// Result of processing one file. Created once, never mutated; consumed by
/// the caller for reporting and by the directory fold for statistics.
#[derive(Debug, Clone)]
pub struct ProcessResult {
    /// Whether the file reached a non-error terminal state
    pub success: bool,
    /// Human-readable outcome message
    pub message: String,
    /// Detected citation dialect
    pub format: CitationFormat,
    /// Terminal state for aggregate classification
    pub outcome: ProcessOutcome,
    /// Inline citation markers before processing
    pub citations_before: usize,
    /// Inline citation markers after processing
    pub citations_after: usize,
    /// Reference definitions before processing
    pub refs_before: usize,
    /// Reference definitions after processing
    pub refs_after: usize,
}

impl ProcessResult {
    fn failed(message: impl Into<String>, format: CitationFormat) -> Self {
        ProcessResult {
            success: false,
            message: message.into(),
            format,
            outcome: ProcessOutcome::Failed,
            citations_before: 0,
            citations_after: 0,
            refs_before: 0,
            refs_after: 0,
        }
    }
}

/// Aggregate counters for a directory run, produced by folding per-file
/// results. Read once at the end for the summary line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DirectoryStats {
    /// Files converted (or previewed/checked as convertible)
    pub processed: usize,
    /// Files already in canonical form
    pub converted: usize,
    /// Files skipped: unrecognized format or no changes needed
    pub skipped: usize,
    /// Files that failed to read, back up, or write
    pub errors: usize,
}

impl DirectoryStats {
    /// Total number of files seen.
    pub fn total(&self) -> usize {
        self.processed + self.converted + self.skipped + self.errors
    }

    /// Fold one per-file outcome into the aggregate.
    fn absorb(mut self, outcome: ProcessOutcome) -> Self {
        match outcome {
            ProcessOutcome::Processed => self.processed += 1,
            ProcessOutcome::AlreadyConverted => self.converted += 1,
            ProcessOutcome::Skipped => self.skipped += 1,
            ProcessOutcome::Failed => self.errors += 1,
        }
        self
    }
}

/// Main application controller driving the per-file state machine:
/// read -> detect -> {already-converted | unknown | needs-conversion}
/// -> {check-report | preview | write} -> result.
pub struct Controller {
    // @field: Processing options
    options: ProcessOptions,
}

impl Controller {
    // @method: Create a new controller with the given options
    pub fn new(options: ProcessOptions) -> Self {
        Controller { options }
    }

    /// Process a single file through the state machine. All failures are
    /// captured in the returned result; this never panics or aborts a
    /// surrounding directory run.
    pub fn process_file(&self, path: &Path) -> ProcessResult {
        let content = match FileManager::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                return ProcessResult::failed(
                    format!("Error reading file: {:#}", e),
                    CitationFormat::Unknown,
                );
            }
        };

        let format = detect_format(&content);
        let (citations_before, refs_before) = count_citations(&content, format);

        if self.options.check_only {
            return self.check_file(&content, format, citations_before, refs_before);
        }

        if format == CitationFormat::Converted {
            if self.options.force {
                // Canonical form is a fixed point; re-validate and report only.
                let (inline_numbers, ref_numbers) = unique_citation_numbers(&content);
                let mut message = format!(
                    "Already converted (forced check) | {} citations, {} refs",
                    inline_numbers.len(),
                    ref_numbers.len()
                );
                if let Some(warning) = validate_conversion(&content).warning_summary() {
                    message.push_str(" | ");
                    message.push_str(&warning);
                }
                return ProcessResult {
                    success: true,
                    message,
                    format,
                    outcome: ProcessOutcome::Processed,
                    citations_before,
                    citations_after: citations_before,
                    refs_before,
                    refs_after: refs_before,
                };
            }
            return ProcessResult {
                success: true,
                message: "Already converted - use -f to force re-check".to_string(),
                format,
                outcome: ProcessOutcome::AlreadyConverted,
                citations_before,
                citations_after: citations_before,
                refs_before,
                refs_after: refs_before,
            };
        }

        let Some(converter) = converter_for(format) else {
            return ProcessResult {
                success: false,
                message: "Unknown format - skipping".to_string(),
                format,
                outcome: ProcessOutcome::Skipped,
                citations_before,
                citations_after: 0,
                refs_before,
                refs_after: 0,
            };
        };

        if self.options.verbose {
            debug!("Detected format: {}", format);
            debug!(
                "Citations before: {} inline, {} refs",
                citations_before, refs_before
            );
        }

        let converted = converter.convert(&content);
        let (citations_after, refs_after) =
            count_citations(&converted, CitationFormat::Converted);

        if converted == content {
            return ProcessResult {
                success: true,
                message: "No changes needed".to_string(),
                format,
                outcome: ProcessOutcome::Skipped,
                citations_before,
                citations_after,
                refs_before,
                refs_after,
            };
        }

        let validation_suffix = validate_conversion(&converted)
            .warning_summary()
            .map(|warning| format!(" | {}", warning))
            .unwrap_or_default();

        if self.options.dry_run {
            self.print_preview(&content, &converted);
            return ProcessResult {
                success: true,
                message: format!(
                    "Preview complete | {} citations, {} refs{}",
                    citations_after, refs_after, validation_suffix
                ),
                format,
                outcome: ProcessOutcome::Processed,
                citations_before,
                citations_after,
                refs_before,
                refs_after,
            };
        }

        // Backup must complete before the destructive write.
        let backup = match FileManager::backup_file(path) {
            Ok(backup) => backup,
            Err(e) => {
                return ProcessResult::failed(
                    format!("Error creating backup, file left unchanged: {:#}", e),
                    format,
                );
            }
        };
        if let Err(e) = FileManager::write_to_file(path, &converted) {
            return ProcessResult::failed(format!("Error writing file: {:#}", e), format);
        }

        let backup_name = backup
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| backup.display().to_string());
        ProcessResult {
            success: true,
            message: format!(
                "Converted | {} citations, {} refs | backup: {}{}",
                citations_after, refs_after, backup_name, validation_suffix
            ),
            format,
            outcome: ProcessOutcome::Processed,
            citations_before,
            citations_after,
            refs_before,
            refs_after,
        }
    }

    /// Check-only terminal state: report dialect and counts without
    /// transforming anything.
    fn check_file(
        &self,
        content: &str,
        format: CitationFormat,
        citations_before: usize,
        refs_before: usize,
    ) -> ProcessResult {
        match format {
            CitationFormat::Converted => {
                let (inline_numbers, ref_numbers) = unique_citation_numbers(content);
                let mut message = format!(
                    "Format: converted | Inline: {} unique | Refs: {}",
                    inline_numbers.len(),
                    ref_numbers.len()
                );
                if let Some(warning) = validate_conversion(content).warning_summary() {
                    message.push_str(" | ");
                    message.push_str(&warning);
                }
                ProcessResult {
                    success: true,
                    message,
                    format,
                    outcome: ProcessOutcome::AlreadyConverted,
                    citations_before,
                    citations_after: citations_before,
                    refs_before,
                    refs_after: refs_before,
                }
            }
            CitationFormat::Gpt | CitationFormat::Gemini => ProcessResult {
                success: true,
                message: format!(
                    "Format: {} | Needs conversion | Inline: {} | Refs: {}",
                    format, citations_before, refs_before
                ),
                format,
                outcome: ProcessOutcome::Processed,
                citations_before,
                citations_after: 0,
                refs_before,
                refs_after: 0,
            },
            CitationFormat::Unknown => ProcessResult {
                success: false,
                message: "Format: unknown | Cannot process".to_string(),
                format,
                outcome: ProcessOutcome::Skipped,
                citations_before,
                citations_after: 0,
                refs_before,
                refs_after: 0,
            },
        }
    }

    /// Process every Markdown document in a directory, one file at a time,
    /// folding per-file outcomes into the aggregate statistics. Individual
    /// failures never abort the run.
    pub fn process_directory(&self, dir: &Path) -> Result<DirectoryStats> {
        let files = FileManager::find_markdown_files(dir, self.options.recursive)?;
        if files.is_empty() {
            info!("No Markdown documents found in {:?}", dir);
            return Ok(DirectoryStats::default());
        }

        let progress_bar = ProgressBar::new(files.len() as u64);
        let style = ProgressStyle::default_bar()
            .template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress_bar.set_style(style);

        let stats = files.iter().fold(DirectoryStats::default(), |stats, file| {
            let display_path = file.strip_prefix(dir).unwrap_or(file);
            info!("Processing: {}", display_path.display());

            let result = self.process_file(file);
            match result.outcome {
                ProcessOutcome::Processed => info!("✓ {}", result.message),
                ProcessOutcome::AlreadyConverted => info!("◈ {}", result.message),
                ProcessOutcome::Skipped => info!("⊘ {}", result.message),
                ProcessOutcome::Failed => error!("✗ {}", result.message),
            }

            progress_bar.inc(1);
            stats.absorb(result.outcome)
        });
        progress_bar.finish_and_clear();

        Ok(stats)
    }

    /// Print a truncated diff of the first changed lines for dry-run mode.
    fn print_preview(&self, original: &str, converted: &str) {
        println!("\n=== Preview (first {} lines) ===", PREVIEW_LINES);
        let old_lines = original.split('\n').take(PREVIEW_LINES);
        let new_lines = converted.split('\n').take(PREVIEW_LINES);
        for (i, (old, new)) in old_lines.zip(new_lines).enumerate() {
            if old != new {
                println!("Line {}:", i + 1);
                println!("  - {}", truncate_chars(old, PREVIEW_WIDTH));
                println!("  + {}", truncate_chars(new, PREVIEW_WIDTH));
            }
        }
    }
}

/// Truncate a line to at most `max` characters (not bytes; preview lines
/// routinely contain CJK text).
fn truncate_chars(line: &str, max: usize) -> String {
    line.chars().take(max).collect()
}
