use std::{fmt, path::PathBuf};

#[derive(Debug, Copy, Clone)]
pub enum ParseTileError {
    ColorError,
    OrientationError,
}

/// Errors which occured when parsing the file
#[derive(Debug)]
pub enum TmxError {
    /// An attribute was missing, had the wrong type or wasn't formated
    /// correctly.
    MalformedAttributes(String),
    /// An error occured when decompressing layer data using the
    /// [flate2](https://github.com/rust-lang/flate2-rs) crate.
    DecompressingError(std::io::Error),
    Base64DecodingError(base64::DecodeError),
    XmlDecodingError(xml::reader::Error),
    /// The document ended in the middle of a structure.
    PrematureEnd(String),
    CouldNotOpenFile {
        path: PathBuf,
        err: std::io::Error,
    },
    Other(String),
}

impl fmt::Display for TmxError {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        match self {
            TmxError::MalformedAttributes(s) => write!(fmt, "{}", s),
            TmxError::DecompressingError(e) => write!(fmt, "{}", e),
            TmxError::Base64DecodingError(e) => write!(fmt, "{}", e),
            TmxError::XmlDecodingError(e) => write!(fmt, "{}", e),
            TmxError::PrematureEnd(e) => write!(fmt, "{}", e),
            TmxError::CouldNotOpenFile { path, err } => {
                write!(
                    fmt,
                    "Could not open '{}'. Error: {}",
                    path.to_string_lossy(),
                    err
                )
            }
            TmxError::Other(s) => write!(fmt, "{}", s),
        }
    }
}

impl std::error::Error for TmxError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TmxError::DecompressingError(e) => Some(e as &dyn std::error::Error),
            TmxError::Base64DecodingError(e) => Some(e as &dyn std::error::Error),
            TmxError::XmlDecodingError(e) => Some(e as &dyn std::error::Error),
            TmxError::CouldNotOpenFile { err, .. } => Some(err as &dyn std::error::Error),
            _ => None,
        }
    }
}

/// A non-fatal problem found while loading a map.
///
/// These never abort the load; they are collected on
/// [`Map::diagnostics`](crate::Map::diagnostics) in the order they were hit
/// and also reported through the [`log`] facade.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Diagnostic {
    /// A layer's data element named an encoding other than "csv" or
    /// "base64". The layer keeps an empty tile sequence.
    UnknownEncoding { layer: String, encoding: String },
    /// A layer's compressed data could not be inflated. The layer keeps an
    /// empty tile sequence.
    DecompressionFailed { layer: String, detail: String },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        match self {
            Diagnostic::UnknownEncoding { layer, encoding } => write!(
                fmt,
                "layer \"{}\": data loading from {} is not implemented",
                layer, encoding
            ),
            Diagnostic::DecompressionFailed { layer, detail } => {
                write!(fmt, "layer \"{}\": discarding tile data: {}", layer, detail)
            }
        }
    }
}
