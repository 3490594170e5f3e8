//! The machine-owned region of the hosts file.
//!
//! The tool owns exactly one delimited block inside a file it otherwise
//! does not touch:
//!
//! ```text
//! ##Auto Generated Entries[DO NOT EDIT]##
//! 172.17.0.2 web
//! 172.17.0.3 db
//! ##END##
//! ```
//!
//! Every synchronization strips the previous block and appends a freshly
//! rendered one.  The surgery works on the whole file in memory; hosts
//! files are small.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use log::debug;
use tempfile::NamedTempFile;

use crate::error::DtError;
use crate::types::HostEntry;

pub const START_MARKER: &str = "##Auto Generated Entries[DO NOT EDIT]##";
pub const END_MARKER: &str = "##END##";

/// Renders `entries` as a complete block, without a trailing newline.
pub fn render_block(entries: &[HostEntry]) -> String {
    let mut block = String::from(START_MARKER);
    for entry in entries {
        block.push('\n');
        block.push_str(&entry.to_string());
    }
    block.push('\n');
    block.push_str(END_MARKER);
    block
}

/// Removes the region from the first start marker to the last end marker.
///
/// Content without a start marker, or without an end marker after it,
/// is returned unchanged.
pub fn strip_block(content: &str) -> String {
    let Some(start) = content.find(START_MARKER) else {
        return content.to_string();
    };
    match content.rfind(END_MARKER) {
        Some(end) if end >= start + START_MARKER.len() => {
            let mut out = String::with_capacity(content.len());
            out.push_str(&content[..start]);
            out.push_str(&content[end + END_MARKER.len()..]);
            out
        }
        _ => content.to_string(),
    }
}

/// Replaces any existing block in `content` with one built from `entries`.
///
/// The new block always goes at the end.  A newline is inserted first if
/// the remaining text does not end with one, so the marker never joins
/// an operator's last line; applying the same entries twice is a no-op.
pub fn splice_block(content: &str, entries: &[HostEntry]) -> String {
    let mut out = strip_block(content);
    if !out.is_empty() && !out.ends_with('\n') {
        out.push('\n');
    }
    out.push_str(&render_block(entries));
    out
}

/// A hosts file on disk.
#[derive(Debug, Clone)]
pub struct HostsFile {
    path: PathBuf,
    atomic: bool,
}

impl HostsFile {
    pub fn new(path: impl Into<PathBuf>, atomic: bool) -> Self {
        Self {
            path: path.into(),
            atomic,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn read(&self) -> Result<String, DtError> {
        fs::read_to_string(&self.path).map_err(|source| self.io_error(source))
    }

    /// Replaces the file contents in a single write pass.
    pub fn write(&self, contents: &str) -> Result<(), DtError> {
        let result = if self.atomic {
            self.write_atomic(contents)
        } else {
            fs::write(&self.path, contents)
        };
        result.map_err(|source| self.io_error(source))
    }

    fn write_atomic(&self, contents: &str) -> io::Result<()> {
        // Rename onto the resolved file so a symlinked hosts file keeps its link.
        let target = fs::canonicalize(&self.path)?;
        let dir = match target.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let meta = fs::metadata(&target)?;

        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(contents.as_bytes())?;
        tmp.as_file().sync_all()?;
        copy_ownership(tmp.as_file(), &meta)?;
        fs::set_permissions(tmp.path(), meta.permissions())?;
        tmp.persist(&target).map_err(|e| e.error)?;

        debug!("Replaced {} atomically", target.display());
        Ok(())
    }

    fn io_error(&self, source: io::Error) -> DtError {
        DtError::HostsFile {
            path: self.path.clone(),
            source,
        }
    }
}

#[cfg(unix)]
fn copy_ownership(file: &fs::File, original: &fs::Metadata) -> io::Result<()> {
    use std::os::unix::fs::{fchown, MetadataExt};

    let current = file.metadata()?;
    if current.uid() == original.uid() && current.gid() == original.gid() {
        return Ok(());
    }
    fchown(file, Some(original.uid()), Some(original.gid()))
}

#[cfg(not(unix))]
fn copy_ownership(_file: &fs::File, _original: &fs::Metadata) -> io::Result<()> {
    Ok(())
}
