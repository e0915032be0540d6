// LogAnalyzer - platform/fs.rs
//
// Filesystem abstraction traits.
// Enables testing the analyzer without depending on real filesystem state.

use std::io;
use std::path::Path;

/// What a path points at, as far as the analyzer cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Regular,
    Directory,
    /// Devices, sockets, FIFOs, and anything else that is not a plain file.
    Other,
}

/// Read-file-metadata capability used by the analyzer.
///
/// Implementations must be shareable across analysis threads.
pub trait FileProbe: Send + Sync {
    /// Classify `path`. A missing path must surface as
    /// `io::ErrorKind::NotFound`.
    fn file_kind(&self, path: &Path) -> io::Result<FileKind>;
}

/// Probe backed by `std::fs::metadata`.
///
/// Symlinks are followed: a link to a regular file counts as regular, a
/// dangling link reports `NotFound`.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdFileProbe;

impl FileProbe for StdFileProbe {
    fn file_kind(&self, path: &Path) -> io::Result<FileKind> {
        let meta = std::fs::metadata(path)?;
        let file_type = meta.file_type();
        Ok(if file_type.is_file() {
            FileKind::Regular
        } else if file_type.is_dir() {
            FileKind::Directory
        } else {
            FileKind::Other
        })
    }
}
