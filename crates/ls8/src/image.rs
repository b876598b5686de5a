//! Program image ingestion.
//!
//! Images are text with one byte per line written as a binary literal
//! (`10000010`). Anything after `#` is a comment; blank and comment-only
//! lines are skipped. Bytes are assigned consecutive addresses from 0.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use ls8_core::MEMORY_BYTES;
use thiserror::Error;

/// Longest accepted binary literal.
pub const MAX_LITERAL_DIGITS: usize = 8;

/// Failure to produce a program image. Raised before execution starts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    /// Program file does not exist.
    #[error("{}: file not found", .path.display())]
    NotFound {
        /// Requested path.
        path: PathBuf,
    },
    /// Program file exists but could not be read.
    #[error("{}: {kind}", .path.display())]
    Io {
        /// Requested path.
        path: PathBuf,
        /// Underlying I/O error kind.
        kind: io::ErrorKind,
    },
    /// Line is neither blank, a comment, nor a binary byte literal.
    #[error("line {line}: expected a binary byte literal, found `{text}`")]
    Malformed {
        /// 1-indexed line number.
        line: usize,
        /// Offending text with comment and whitespace stripped.
        text: String,
    },
    /// Image does not fit in machine memory.
    #[error("program is {len} bytes but memory holds {} bytes", MEMORY_BYTES)]
    ImageTooLarge {
        /// Number of bytes in the image.
        len: usize,
    },
}

/// Parses image text into bytes.
///
/// # Errors
///
/// Returns [`LoadError::Malformed`] for the first bad line and
/// [`LoadError::ImageTooLarge`] when the image exceeds memory.
pub fn parse_image(content: &str) -> Result<Vec<u8>, LoadError> {
    let mut bytes = Vec::new();

    for (idx, line) in content.lines().enumerate() {
        let code = line.split_once('#').map_or(line, |(code, _)| code).trim();
        if code.is_empty() {
            continue;
        }

        let byte = parse_binary_byte(code).ok_or_else(|| LoadError::Malformed {
            line: idx + 1,
            text: code.to_string(),
        })?;
        bytes.push(byte);
    }

    if bytes.len() > MEMORY_BYTES {
        return Err(LoadError::ImageTooLarge { len: bytes.len() });
    }

    Ok(bytes)
}

/// Reads and parses the image at `path`.
///
/// # Errors
///
/// Returns [`LoadError::NotFound`] or [`LoadError::Io`] when the file cannot
/// be read, otherwise any error from [`parse_image`].
pub fn load_image(path: &Path) -> Result<Vec<u8>, LoadError> {
    let content = fs::read_to_string(path).map_err(|error| match error.kind() {
        io::ErrorKind::NotFound => LoadError::NotFound {
            path: path.to_path_buf(),
        },
        kind => LoadError::Io {
            path: path.to_path_buf(),
            kind,
        },
    })?;

    parse_image(&content)
}

fn parse_binary_byte(code: &str) -> Option<u8> {
    if code.len() > MAX_LITERAL_DIGITS || !code.bytes().all(|b| b == b'0' || b == b'1') {
        return None;
    }
    u8::from_str_radix(code, 2).ok()
}
