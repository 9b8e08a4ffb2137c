use anyhow::{Result, Context};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

// @module: File and directory utilities

/// File extension recognized as a processable document.
const DOCUMENT_EXTENSION: &str = "md";

/// Suffix appended to a file path to form its backup sibling.
const BACKUP_SUFFIX: &str = ".bak";

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_file()
    }

    // @checks: Directory existence
    pub fn dir_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_dir()
    }

    /// Read a file to a string
    pub fn read_to_string<P: AsRef<Path>>(path: P) -> Result<String> {
        fs::read_to_string(&path)
            .with_context(|| format!("Failed to read file: {:?}", path.as_ref()))
    }

    /// Write a string to a file
    pub fn write_to_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        fs::write(&path, content)
            .with_context(|| format!("Failed to write to file: {:?}", path.as_ref()))
    }

    /// Backup sibling path for a document: the same path with `.bak` appended.
    pub fn backup_path<P: AsRef<Path>>(path: P) -> PathBuf {
        let mut os = path.as_ref().as_os_str().to_os_string();
        os.push(BACKUP_SUFFIX);
        PathBuf::from(os)
    }

    /// Copy a file to its backup sibling, returning the backup path.
    ///
    /// Callers overwriting the original must call this first and treat a
    /// failure as fatal for that file: no backup, no destructive write.
    pub fn backup_file<P: AsRef<Path>>(path: P) -> Result<PathBuf> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(anyhow::anyhow!("Source file does not exist: {:?}", path));
        }

        let backup = Self::backup_path(path);
        fs::copy(path, &backup)
            .with_context(|| format!("Failed to create backup file: {:?}", backup))?;

        Ok(backup)
    }

    /// Whether a path is a backup artifact produced by a previous run.
    pub fn is_backup_file<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref()
            .file_name()
            .map(|name| name.to_string_lossy().ends_with(BACKUP_SUFFIX))
            .unwrap_or(false)
    }

    /// Find processable Markdown documents in a directory, excluding backup
    /// files. Non-recursive mode looks at the top level only.
    pub fn find_markdown_files<P: AsRef<Path>>(dir: P, recursive: bool) -> Result<Vec<PathBuf>> {
        let mut walker = WalkDir::new(dir.as_ref()).follow_links(true);
        if !recursive {
            walker = walker.max_depth(1);
        }

        let mut result = Vec::new();
        for entry in walker {
            let entry = entry.context("Failed to read directory entry")?;
            let path = entry.path();

            if !path.is_file() || Self::is_backup_file(path) {
                continue;
            }
            if let Some(ext) = path.extension() {
                if ext.to_string_lossy().eq_ignore_ascii_case(DOCUMENT_EXTENSION) {
                    result.push(path.to_path_buf());
                }
            }
        }

        Ok(result)
    }
}
