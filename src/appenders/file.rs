//! File sink implementation
//!
//! The file is opened, appended to and closed for every line. No handle is
//! kept between writes, so several processes can share one log file.

use crate::core::{LoggerError, Result, Sink};
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

#[cfg(feature = "file")]
use fs2::FileExt;

pub struct FileSink {
    path: PathBuf,
}

impl FileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn append(&self, line: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| LoggerError::file_sink(self.path.display().to_string(), e.to_string()))?;

        #[cfg(feature = "file")]
        FileExt::lock_exclusive(&file)
            .map_err(|_| LoggerError::file_lock(self.path.display().to_string()))?;

        let mut output = String::with_capacity(line.len() + 1);
        output.push_str(line);
        output.push('\n');
        let written = file.write_all(output.as_bytes());

        #[cfg(feature = "file")]
        let _ = FileExt::unlock(&file);

        written?;
        Ok(())
    }
}

impl Sink for FileSink {
    fn write_line(&mut self, line: &str) -> Result<()> {
        self.append(line)
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &str {
        "file"
    }
}

/// Delete a log file; a missing file is not an error
pub fn delete_log_file(path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(LoggerError::io_operation(
            "deleting log file",
            format!("cannot remove '{}'", path.display()),
            e,
        )),
    }
}

/// Read a log file back line by line
pub fn read_lines(path: impl AsRef<Path>) -> Result<Vec<String>> {
    let text = fs::read_to_string(path)?;
    Ok(text.lines().map(String::from).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_appends_lines() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("nested").join("app.log");

        let mut sink = FileSink::new(&path);
        sink.write_line("first").unwrap();
        sink.write_line("second").unwrap();

        assert_eq!(read_lines(&path).unwrap(), vec!["first", "second"]);
        assert_eq!(fs::read_to_string(&path).unwrap(), "first\nsecond\n");
    }

    #[test]
    fn test_delete_is_idempotent() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("app.log");
        fs::write(&path, "old\n").unwrap();

        delete_log_file(&path).unwrap();
        assert!(!path.exists());
        delete_log_file(&path).unwrap();
    }

    #[test]
    fn test_unwritable_path_is_error() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        // A directory cannot be opened for appending
        let mut sink = FileSink::new(temp_dir.path());
        assert!(sink.write_line("line").is_err());
    }
}
