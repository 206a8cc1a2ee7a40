//! Reading and writing documents as line vectors.
//!
//! Files are validated before reading:
//! - File existence and permissions
//! - File size limits
//! - Binary file detection
//! - UTF-8 encoding
//!
//! Writes go to a temporary sibling file that is then renamed over the
//! target, so a failed save never leaves a truncated document behind.

use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Maximum file size in bytes (50 MB)
pub const MAX_FILE_SIZE: u64 = 50 * 1024 * 1024;

/// Bytes scanned for NUL when detecting binary files
const BINARY_SNIFF_LEN: usize = 8192;

/// Line terminator style of a file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LineEnding {
    #[default]
    Lf,
    CrLf,
    Cr,
    /// No terminator found (single-line or empty file)
    Unknown,
}

impl LineEnding {
    /// Terminator written between lines; `Unknown` writes `\n`
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Lf | Self::Unknown => "\n",
            Self::CrLf => "\r\n",
            Self::Cr => "\r",
        }
    }

    /// Style of the first terminator in `text`
    pub fn detect(text: &str) -> Self {
        let bytes = text.as_bytes();
        match bytes.iter().position(|&b| b == b'\n' || b == b'\r') {
            None => Self::Unknown,
            Some(i) if bytes[i] == b'\n' => Self::Lf,
            Some(i) if bytes.get(i + 1) == Some(&b'\n') => Self::CrLf,
            Some(_) => Self::Cr,
        }
    }

    /// Label for status output
    pub fn name(self) -> &'static str {
        match self {
            Self::Lf => "LF",
            Self::CrLf => "CRLF",
            Self::Cr => "CR",
            Self::Unknown => "Unknown",
        }
    }
}

/// Metadata gathered while reading a file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileInfo {
    /// Size in bytes
    pub size: u64,
    pub line_ending: LineEnding,
    pub encoding: String,
}

/// Errors that can occur when reading or writing a document
#[derive(Debug, Error)]
pub enum FileError {
    #[error("file not found")]
    NotFound,

    #[error("permission denied")]
    PermissionDenied,

    #[error("is a directory")]
    IsDirectory,

    /// File appears to be binary (contains null bytes)
    #[error("binary file")]
    BinaryFile,

    #[error("file too large ({size_mb:.1} MB)")]
    TooLarge { size_mb: f64 },

    #[error("file is not valid UTF-8")]
    InvalidUtf8,

    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl FileError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        match source.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound,
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied,
            _ => Self::Io {
                path: path.to_path_buf(),
                source,
            },
        }
    }

    /// Get a user-friendly error message
    pub fn user_message(&self, filename: &str) -> String {
        match self {
            Self::NotFound => format!("File not found: {}", filename),
            Self::PermissionDenied => format!("Permission denied: {}", filename),
            Self::IsDirectory => format!("Cannot open directory: {}", filename),
            Self::BinaryFile => format!("Cannot open binary file: {}", filename),
            Self::TooLarge { size_mb } => {
                format!(
                    "{} is too large ({:.1} MB, max {} MB)",
                    filename,
                    size_mb,
                    MAX_FILE_SIZE / (1024 * 1024)
                )
            }
            Self::InvalidUtf8 => format!("{} is not valid UTF-8", filename),
            Self::Io { source, .. } => format!("Error accessing {}: {}", filename, source),
        }
    }
}

/// Validate a file before attempting to open it
///
/// Checks:
/// - File exists
/// - Is not a directory
/// - Has read permissions
/// - Does not exceed size limit
pub fn validate_file_for_opening(path: &Path) -> Result<u64, FileError> {
    let metadata = fs::metadata(path).map_err(|e| FileError::io(path, e))?;

    if metadata.is_dir() {
        return Err(FileError::IsDirectory);
    }

    if metadata.len() > MAX_FILE_SIZE {
        return Err(FileError::TooLarge {
            size_mb: metadata.len() as f64 / (1024.0 * 1024.0),
        });
    }

    Ok(metadata.len())
}

/// Check if a file is likely binary by scanning for null bytes
///
/// Reads the first 8KB of the file and checks for null bytes,
/// which are common in binary files but rare in text files.
///
/// Returns `false` on any read error (let the actual open fail with a better error).
pub fn is_likely_binary(path: &Path) -> bool {
    let Ok(mut file) = File::open(path) else {
        return false;
    };

    let mut buffer = [0u8; BINARY_SNIFF_LEN];
    let Ok(bytes_read) = file.read(&mut buffer) else {
        return false;
    };

    buffer[..bytes_read].contains(&0)
}

/// Get the filename from a path for display in error messages
pub fn filename_for_display(path: &Path) -> String {
    path.file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string()
}

/// Split text into lines on `\r\n`, `\n` or `\r`.
///
/// A trailing terminator produces an empty last line, and empty text is a
/// single empty line.
pub fn split_lines(text: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let mut rest = text;
    while let Some(i) = rest.find(&['\n', '\r'][..]) {
        lines.push(rest[..i].to_string());
        let skip = if rest[i..].starts_with("\r\n") { 2 } else { 1 };
        rest = &rest[i + skip..];
    }
    lines.push(rest.to_string());
    lines
}

/// Read a file into lines
pub fn read_file(path: &Path) -> Result<Vec<String>, FileError> {
    read_file_with_info(path).map(|(lines, _)| lines)
}

/// Read a file into lines along with its size, line ending and encoding
pub fn read_file_with_info(path: &Path) -> Result<(Vec<String>, FileInfo), FileError> {
    let size = validate_file_for_opening(path)?;
    if is_likely_binary(path) {
        return Err(FileError::BinaryFile);
    }

    let bytes = fs::read(path).map_err(|e| FileError::io(path, e))?;
    let text = String::from_utf8(bytes).map_err(|_| FileError::InvalidUtf8)?;
    let info = FileInfo {
        size,
        line_ending: LineEnding::detect(&text),
        encoding: "UTF-8".to_string(),
    };
    let lines = split_lines(&text);
    tracing::info!(
        "Read {} ({} lines, {})",
        path.display(),
        lines.len(),
        info.line_ending.name()
    );
    Ok((lines, info))
}

/// Write lines joined with `line_ending`, atomically replacing `path`.
///
/// An empty last line produces a file that ends with a terminator.
pub fn write_file(path: &Path, lines: &[String], line_ending: LineEnding) -> Result<(), FileError> {
    let content = lines.join(line_ending.as_str());
    let tmp_path = temp_path_for(path);

    let written = File::create(&tmp_path)
        .and_then(|mut file| {
            file.write_all(content.as_bytes())?;
            file.sync_all()
        })
        .and_then(|()| fs::rename(&tmp_path, path));

    if let Err(e) = written {
        // The temp file may not exist if creation itself failed
        let _ = fs::remove_file(&tmp_path);
        return Err(FileError::io(path, e));
    }

    tracing::info!("Wrote {} ({} lines)", path.display(), lines.len());
    Ok(())
}

/// `dir/.name.tedit-tmp` next to `path`
fn temp_path_for(path: &Path) -> PathBuf {
    let name = filename_for_display(path);
    path.with_file_name(format!(".{}.tedit-tmp", name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    fn strings(lines: &[&str]) -> Vec<String> {
        lines.iter().map(|l| l.to_string()).collect()
    }

    #[test]
    fn test_validate_nonexistent_file() {
        let result = validate_file_for_opening(Path::new("/nonexistent/path/file.txt"));
        assert!(matches!(result, Err(FileError::NotFound)));
    }

    #[test]
    fn test_validate_directory() {
        let dir = TempDir::new().unwrap();
        let result = validate_file_for_opening(dir.path());
        assert!(matches!(result, Err(FileError::IsDirectory)));
    }

    #[test]
    fn test_is_binary_with_null_bytes() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(b"Hello\x00World").unwrap();
        temp.flush().unwrap();

        assert!(is_likely_binary(temp.path()));
        assert!(matches!(read_file(temp.path()), Err(FileError::BinaryFile)));
    }

    #[test]
    fn test_invalid_utf8_rejected() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(&[0x66, 0x6f, 0xff, 0x6f]).unwrap();
        temp.flush().unwrap();

        assert!(matches!(read_file(temp.path()), Err(FileError::InvalidUtf8)));
    }

    #[test]
    fn test_detect_line_endings() {
        assert_eq!(LineEnding::detect("a\nb"), LineEnding::Lf);
        assert_eq!(LineEnding::detect("a\r\nb\n"), LineEnding::CrLf);
        assert_eq!(LineEnding::detect("a\rb"), LineEnding::Cr);
        assert_eq!(LineEnding::detect("single"), LineEnding::Unknown);
    }

    #[test]
    fn test_split_lines() {
        assert_eq!(split_lines(""), strings(&[""]));
        assert_eq!(split_lines("a\nb\n"), strings(&["a", "b", ""]));
        assert_eq!(split_lines("a\r\nb"), strings(&["a", "b"]));
        assert_eq!(split_lines("a\rb\r\n\nc"), strings(&["a", "b", "", "c"]));
    }

    #[test]
    fn test_read_with_info() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(b"one\r\ntwo\r\n").unwrap();
        temp.flush().unwrap();

        let (lines, info) = read_file_with_info(temp.path()).unwrap();
        assert_eq!(lines, strings(&["one", "two", ""]));
        assert_eq!(info.size, 10);
        assert_eq!(info.line_ending, LineEnding::CrLf);
        assert_eq!(info.encoding, "UTF-8");
    }

    #[test]
    fn test_write_preserves_line_ending_and_trailing_newline() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("doc.txt");

        write_file(&path, &strings(&["a", "b", ""]), LineEnding::CrLf).unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"a\r\nb\r\n");
        assert!(!temp_path_for(&path).exists());

        let (lines, info) = read_file_with_info(&path).unwrap();
        assert_eq!(lines, strings(&["a", "b", ""]));
        assert_eq!(info.line_ending, LineEnding::CrLf);
    }

    #[test]
    fn test_write_into_missing_directory_fails() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing").join("doc.txt");
        assert!(write_file(&path, &strings(&["x"]), LineEnding::Lf).is_err());
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            FileError::NotFound.user_message("test.txt"),
            "File not found: test.txt"
        );
        assert_eq!(
            FileError::IsDirectory.user_message("mydir"),
            "Cannot open directory: mydir"
        );
        assert_eq!(
            FileError::BinaryFile.user_message("image.png"),
            "Cannot open binary file: image.png"
        );
    }
}
