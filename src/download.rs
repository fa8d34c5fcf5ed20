//! Delivering a converted file to the user.
//!
//! In a browser the payload becomes a temporary object URL behind a hidden
//! anchor that is clicked and then torn down. Here that step is the
//! [`DownloadTarget`] capability, supplied by the host. [`DirectoryTarget`]
//! is the file-system version used by the CLI: the payload goes to a temp
//! file inside the destination directory, which is then persisted under its
//! final name. If persisting fails the temp file is removed on drop.

use crate::config::DEFAULT_FILENAME;
use crate::error::ClientError;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info};

/// Host capability that hands a finished payload to the user.
pub trait DownloadTarget {
    /// Start a download of `bytes` named `filename`.
    ///
    /// Called at most once per attempt, and only on the success path.
    fn trigger_download(&mut self, bytes: &[u8], filename: &str) -> Result<(), ClientError>;
}

impl<T: DownloadTarget + ?Sized> DownloadTarget for &mut T {
    fn trigger_download(&mut self, bytes: &[u8], filename: &str) -> Result<(), ClientError> {
        (**self).trigger_download(bytes, filename)
    }
}

impl<T: DownloadTarget + ?Sized> DownloadTarget for Box<T> {
    fn trigger_download(&mut self, bytes: &[u8], filename: &str) -> Result<(), ClientError> {
        (**self).trigger_download(bytes, filename)
    }
}

/// Saves downloads into a directory, creating it on first use.
#[derive(Debug, Clone)]
pub struct DirectoryTarget {
    dir: PathBuf,
}

impl DirectoryTarget {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Where a download named `filename` would be written.
    pub fn path_for(&self, filename: &str) -> PathBuf {
        self.dir.join(safe_filename(filename))
    }
}

impl DownloadTarget for DirectoryTarget {
    fn trigger_download(&mut self, bytes: &[u8], filename: &str) -> Result<(), ClientError> {
        let path = self.path_for(filename);
        let failed = |source: std::io::Error| ClientError::DownloadFailed {
            path: path.clone(),
            source,
        };

        std::fs::create_dir_all(&self.dir).map_err(failed)?;

        let mut tmp = NamedTempFile::new_in(&self.dir).map_err(failed)?;
        tmp.write_all(bytes).map_err(failed)?;
        tmp.flush().map_err(failed)?;
        debug!("Wrote {} bytes to {}", bytes.len(), tmp.path().display());

        tmp.persist(&path).map_err(|e| failed(e.error))?;
        info!("Saved download to {}", path.display());
        Ok(())
    }
}

/// Reduce a server-suggested name to a single safe path component.
///
/// Directory parts are dropped, control and reserved characters become `_`,
/// and anything left empty becomes [`DEFAULT_FILENAME`].
pub fn safe_filename(suggested: &str) -> String {
    let base = suggested
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(suggested);

    let mut cleaned = String::with_capacity(base.len());
    let mut prev_underscore = false;
    for c in base.chars() {
        let c = if is_forbidden(c) { '_' } else { c };
        if c == '_' && prev_underscore {
            continue;
        }
        prev_underscore = c == '_';
        cleaned.push(c);
    }

    let trimmed = cleaned.trim_matches(&[' ', '.'][..]);
    if trimmed.is_empty() || trimmed.chars().all(|c| c == '_') {
        return DEFAULT_FILENAME.to_string();
    }

    let mut name = trimmed.to_string();
    let stem = name.split('.').next().unwrap_or("");
    if is_reserved_windows_name(stem) {
        name.insert(stem.len(), '_');
    }
    name
}

fn is_forbidden(c: char) -> bool {
    matches!(c,
        ':' | '*' | '?' | '"' | '<' | '>' | '|' | '\0'..='\u{1F}' | '\u{7F}'
    )
}

fn is_reserved_windows_name(name: &str) -> bool {
    const RESERVED: &[&str] = &[
        "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
        "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
    ];
    RESERVED.iter().any(|r| r.eq_ignore_ascii_case(name))
}
