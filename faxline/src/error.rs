//! Error types for CCITT fax decoding.

use core::fmt;

/// The kind of failure that stopped decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A bit pattern that is not a valid white or black run code.
    InvalidCode,
    /// A bit pattern that is not a valid two-dimensional mode code.
    InvalidTwoDimCode,
    /// An EOL marker appeared where a run code was expected.
    UnexpectedEol,
    /// An EOL marker was missing, preceded by non-zero fill bits, or the
    /// first row was not flagged as one-dimensional.
    MalformedEol,
    /// The fill order is neither MSB-to-LSB nor LSB-to-MSB.
    UnsupportedFillOrder,
    /// The TIFF compression scheme is not one of the CCITT schemes.
    UnsupportedCompression,
    /// The output buffer cannot hold the requested number of rows.
    BufferTooSmall,
    /// The raster for the requested image size cannot be allocated.
    ImageTooLarge,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidCode => write!(f, "invalid run code"),
            Self::InvalidTwoDimCode => write!(f, "invalid two-dimensional mode code"),
            Self::UnexpectedEol => write!(f, "unexpected end-of-line marker"),
            Self::MalformedEol => write!(f, "malformed end-of-line marker"),
            Self::UnsupportedFillOrder => write!(f, "unsupported fill order"),
            Self::UnsupportedCompression => write!(f, "unsupported compression scheme"),
            Self::BufferTooSmall => write!(f, "output buffer too small"),
            Self::ImageTooLarge => write!(f, "image too large to allocate"),
        }
    }
}

impl core::error::Error for ErrorKind {}

/// An error that occurred while decoding, with the position it occurred at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeError {
    kind: ErrorKind,
    row: Option<u32>,
    column: Option<u32>,
}

impl DecodeError {
    /// Create a new error without position information.
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            row: None,
            column: None,
        }
    }

    pub(crate) fn at(kind: ErrorKind, row: u32, column: Option<usize>) -> Self {
        Self {
            kind,
            row: Some(row),
            column: column.map(|c| u32::try_from(c).unwrap_or(u32::MAX)),
        }
    }

    /// The kind of the error.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// The row that was being decoded, if known.
    pub fn row(&self) -> Option<u32> {
        self.row
    }

    /// The column that was reached in the row, if known.
    pub fn column(&self) -> Option<u32> {
        self.column
    }
}

impl From<ErrorKind> for DecodeError {
    fn from(kind: ErrorKind) -> Self {
        Self::new(kind)
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;

        match (self.row, self.column) {
            (Some(row), Some(column)) => write!(f, " at row {row}, column {column}"),
            (Some(row), None) => write!(f, " at row {row}"),
            _ => Ok(()),
        }
    }
}

impl core::error::Error for DecodeError {}

/// Result type for CCITT fax decoding operations.
pub type Result<T> = core::result::Result<T, DecodeError>;
