/*!
 * End-to-end single-file conversion workflow tests
 */

use std::fs;
use std::path::Path;
use anyhow::Result;
use dscite::app_controller::{Controller, ProcessOptions, ProcessOutcome};
use dscite::citation_format::CitationFormat;
use dscite::file_utils::FileManager;
use crate::common;

fn controller(options: ProcessOptions) -> Controller {
    Controller::new(options)
}

/// Test a GPT document is converted in place with a backup
#[test]
fn test_process_file_withGptDocument_shouldConvertAndBackup() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let file = common::create_test_file(
        temp_dir.path(),
        "report.md",
        common::sample_gpt_standard_document(),
    )?;

    let result = controller(ProcessOptions::default()).process_file(&file);

    assert!(result.success);
    assert_eq!(result.outcome, ProcessOutcome::Processed);
    assert_eq!(result.format, CitationFormat::Gpt);
    assert!(result.message.contains("Converted"));

    let converted = fs::read_to_string(&file)?;
    assert!(converted.contains("Key finding one[^1][^2]."));
    assert!(converted.contains("[^1]: Title A http://a.example"));

    let backup = FileManager::backup_path(&file);
    assert_eq!(
        fs::read_to_string(backup)?,
        common::sample_gpt_standard_document()
    );
    Ok(())
}

/// Test a Gemini document is converted in place
#[test]
fn test_process_file_withGeminiDocument_shouldConvert() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let file = common::create_test_file(
        temp_dir.path(),
        "gemini.md",
        common::sample_gemini_document(),
    )?;

    let result = controller(ProcessOptions::default()).process_file(&file);

    assert!(result.success);
    assert_eq!(result.format, CitationFormat::Gemini);
    let converted = fs::read_to_string(&file)?;
    assert!(converted.contains("事实表明 [^1]。"));
    assert!(converted.contains("[^1]: Source Title http://x.example"));
    Ok(())
}

/// Test dry-run mode leaves the file and filesystem untouched
#[test]
fn test_process_file_withDryRun_shouldNotWriteAnything() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let file = common::create_test_file(
        temp_dir.path(),
        "report.md",
        common::sample_gpt_standard_document(),
    )?;

    let options = ProcessOptions {
        dry_run: true,
        ..ProcessOptions::default()
    };
    let result = controller(options).process_file(&file);

    assert!(result.success);
    assert!(result.message.contains("Preview complete"));
    assert_eq!(
        fs::read_to_string(&file)?,
        common::sample_gpt_standard_document()
    );
    assert!(!FileManager::backup_path(&file).exists());
    Ok(())
}

/// Test check mode reports a convertible document without transforming it
#[test]
fn test_process_file_withCheckMode_shouldReportWithoutWriting() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let file = common::create_test_file(
        temp_dir.path(),
        "gemini.md",
        common::sample_gemini_document(),
    )?;

    let options = ProcessOptions {
        check_only: true,
        ..ProcessOptions::default()
    };
    let result = controller(options).process_file(&file);

    assert!(result.success);
    assert!(result.message.contains("Needs conversion"));
    assert_eq!(
        fs::read_to_string(&file)?,
        common::sample_gemini_document()
    );
    Ok(())
}

/// Test check mode surfaces validator warnings on canonical documents
#[test]
fn test_process_file_withCheckOnIncompleteDocument_shouldWarnAboutMissingRefs() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let content = "Cited[^1] and[^2].\n\n[^1]: A http://a.example\n";
    let file = common::create_test_file(temp_dir.path(), "partial.md", content)?;

    let options = ProcessOptions {
        check_only: true,
        ..ProcessOptions::default()
    };
    let result = controller(options).process_file(&file);

    assert!(result.success);
    assert_eq!(result.outcome, ProcessOutcome::AlreadyConverted);
    assert!(result.message.contains("Missing refs"));
    Ok(())
}

/// Test an already-converted document is skipped without force
#[test]
fn test_process_file_withConvertedDocument_shouldReportAlreadyConverted() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let file = common::create_test_file(
        temp_dir.path(),
        "done.md",
        common::sample_converted_document(),
    )?;

    let result = controller(ProcessOptions::default()).process_file(&file);

    assert!(result.success);
    assert_eq!(result.outcome, ProcessOutcome::AlreadyConverted);
    assert_eq!(
        fs::read_to_string(&file)?,
        common::sample_converted_document()
    );
    Ok(())
}

/// Test force on a canonical document is an idempotent re-check
#[test]
fn test_process_file_withForceOnConverted_shouldBeByteIdenticalNoOp() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let file = common::create_test_file(
        temp_dir.path(),
        "done.md",
        common::sample_converted_document(),
    )?;

    let options = ProcessOptions {
        force: true,
        ..ProcessOptions::default()
    };
    let result = controller(options).process_file(&file);

    assert!(result.success);
    assert_eq!(result.outcome, ProcessOutcome::Processed);
    assert!(result.message.contains("forced check"));
    // Idempotence: the canonical form is a fixed point
    assert_eq!(
        fs::read_to_string(&file)?,
        common::sample_converted_document()
    );
    assert!(!FileManager::backup_path(&file).exists());
    Ok(())
}

/// Test an unrecognized document fails without mutation
#[test]
fn test_process_file_withUnknownFormat_shouldFailWithoutMutation() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let file = common::create_test_file(
        temp_dir.path(),
        "plain.md",
        common::sample_unknown_document(),
    )?;

    let result = controller(ProcessOptions::default()).process_file(&file);

    assert!(!result.success);
    assert_eq!(result.outcome, ProcessOutcome::Skipped);
    assert_eq!(result.format, CitationFormat::Unknown);
    assert_eq!(
        fs::read_to_string(&file)?,
        common::sample_unknown_document()
    );
    Ok(())
}

/// Test a converter run that changes nothing reports a non-error skip
#[test]
fn test_process_file_withNoOpConversion_shouldReportNoChangesNeeded() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    // Detected as Gemini via the bare-number fallback, but the only match
    // sits on a protected heading line, so conversion changes nothing.
    let content = "# Heading 1。\n\nplain prose here\n";
    let file = common::create_test_file(temp_dir.path(), "heading.md", content)?;

    let result = controller(ProcessOptions::default()).process_file(&file);

    assert!(result.success);
    assert_eq!(result.outcome, ProcessOutcome::Skipped);
    assert!(result.message.contains("No changes needed"));
    assert_eq!(fs::read_to_string(&file)?, content);
    Ok(())
}

/// Test a failed backup aborts the write and leaves the original intact
#[test]
fn test_process_file_withBlockedBackupPath_shouldFailBeforeWriting() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let file = common::create_test_file(
        temp_dir.path(),
        "report.md",
        common::sample_gpt_standard_document(),
    )?;
    // A directory squatting on the backup path makes the copy fail
    fs::create_dir(FileManager::backup_path(&file))?;

    let result = controller(ProcessOptions::default()).process_file(&file);

    assert!(!result.success);
    assert_eq!(result.outcome, ProcessOutcome::Failed);
    assert!(result.message.contains("backup"));
    assert_eq!(
        fs::read_to_string(&file)?,
        common::sample_gpt_standard_document()
    );
    Ok(())
}

/// Test a read failure is captured in the result
#[test]
fn test_process_file_withMissingFile_shouldFail() {
    let result = controller(ProcessOptions::default())
        .process_file(Path::new("/nonexistent/missing.md"));

    assert!(!result.success);
    assert_eq!(result.outcome, ProcessOutcome::Failed);
    assert!(result.message.contains("Error reading file"));
}

/// Test converted output satisfies round-trip coverage for well-formed input
#[test]
fn test_process_file_withWellFormedInput_shouldHaveMatchingCitationSets() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let file = common::create_test_file(
        temp_dir.path(),
        "report.md",
        common::sample_gpt_standard_document(),
    )?;

    let result = controller(ProcessOptions::default()).process_file(&file);
    assert!(result.success);

    let converted = fs::read_to_string(&file)?;
    let report = dscite::validation::validate_conversion(&converted);
    assert!(report.is_clean());
    Ok(())
}
