//! CFL error types

use std::fmt;

use thiserror::Error;

/// CFL protocol errors
#[derive(Error, Debug)]
pub enum Error {
    /// No input was supplied
    #[error("null reference: no message bytes supplied")]
    NullInput,

    /// Invalid sync word
    #[error("invalid sync word: expected 0x0A50, got {found:#06x}")]
    InvalidSync {
        /// Found sync word
        found: u16,
    },

    /// Unsupported protocol version
    #[error("version mismatch: expected {expected}, got {found}")]
    VersionMismatch {
        /// Supported version
        expected: u8,
        /// Found version
        found: u8,
    },

    /// Checksum mismatch
    #[error("CRC mismatch: computed {expected:#06x}, header carries {found:#06x}")]
    ChecksumMismatch {
        /// Checksum recomputed over the received bytes
        expected: u16,
        /// Checksum stored in the header
        found: u16,
    },

    /// Declared payload length above the protocol maximum
    #[error("invalid length: {size} bytes (max {max})")]
    PayloadTooLarge {
        /// Declared or requested payload size
        size: usize,
        /// Maximum allowed
        max: usize,
    },

    /// Buffer length disagrees with the header
    #[error("buffer size mismatch: need {expected} bytes, got {got}")]
    BufferSizeMismatch {
        /// Size implied by the header
        expected: usize,
        /// Actual size
        got: usize,
    },

    /// Illegal flag combination
    #[error("invalid flags: {flags:#04x}")]
    InvalidFlags {
        /// Offending flag byte
        flags: u8,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Protocol error kind, `None` for transport failures
    #[must_use]
    pub fn kind(&self) -> Option<ErrorKind> {
        let kind = match self {
            Self::NullInput => ErrorKind::Null,
            Self::InvalidSync { .. } => ErrorKind::Sync,
            Self::VersionMismatch { .. } => ErrorKind::Version,
            Self::ChecksumMismatch { .. } => ErrorKind::Crc,
            Self::PayloadTooLarge { .. } => ErrorKind::Length,
            Self::BufferSizeMismatch { .. } => ErrorKind::BufferSize,
            Self::InvalidFlags { .. } => ErrorKind::Flags,
            Self::Io(_) => return None,
        };
        Some(kind)
    }

    /// The bytes belong to another protocol or an incompatible peer.
    ///
    /// Such messages can be dropped without treating the link as faulty.
    #[must_use]
    pub const fn is_foreign(&self) -> bool {
        matches!(self, Self::InvalidSync { .. } | Self::VersionMismatch { .. })
    }

    /// The message was damaged in transit or built incorrectly.
    #[must_use]
    pub const fn is_corruption(&self) -> bool {
        matches!(
            self,
            Self::PayloadTooLarge { .. }
                | Self::BufferSizeMismatch { .. }
                | Self::ChecksumMismatch { .. }
        )
    }
}

/// Closed set of validation fault kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ErrorKind {
    /// No input supplied
    Null = 1,
    /// Sync word mismatch
    Sync = 2,
    /// Version mismatch
    Version = 3,
    /// Checksum mismatch
    Crc = 4,
    /// Declared length above maximum
    Length = 5,
    /// Buffer size disagrees with declared length
    BufferSize = 6,
    /// Illegal flag combination
    Flags = 7,
}

impl ErrorKind {
    /// Human-readable description
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Null => "null reference",
            Self::Sync => "invalid sync word",
            Self::Version => "version mismatch",
            Self::Crc => "CRC mismatch",
            Self::Length => "invalid length",
            Self::BufferSize => "buffer size mismatch",
            Self::Flags => "invalid flags",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validation outcome as a plain status code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    /// Message accepted
    Ok,
    /// Message rejected
    Err(ErrorKind),
}

impl Status {
    /// Human-readable description
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::Err(kind) => kind.as_str(),
        }
    }

    /// Check if the message was accepted
    #[must_use]
    pub const fn is_ok(self) -> bool {
        matches!(self, Self::Ok)
    }
}

/// IO failures have no protocol status and are handed back unchanged.
impl<'a, T> TryFrom<&'a Result<T>> for Status {
    type Error = &'a std::io::Error;

    fn try_from(result: &'a Result<T>) -> std::result::Result<Self, Self::Error> {
        if let Err(Error::Io(err)) = result {
            return Err(err);
        }
        let kind = result.as_ref().err().and_then(Error::kind);
        Ok(kind.map_or(Self::Ok, Self::Err))
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
