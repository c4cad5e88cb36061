//! CFL message header
//!
//! The header is 12 bytes, big-endian on the wire, and is always followed by
//! exactly `length` payload bytes.

use super::crc::{crc16, crc16_continue};
use super::{CRC_OFFSET, Error, Flags, HEADER_SIZE, Result, SYNC_WORD, VERSION};

/// CFL message header (12 bytes on the wire)
///
/// # Wire Format
///
/// ```text
/// 0                   1                   2                   3
/// 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |      Sync Word (0x0A50)       |    Version    |     Flags     |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |          Message ID           |        Sequence Number        |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |        Payload Length         |            CRC-16             |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
///
/// The CRC covers the first ten bytes followed by the payload. It must be
/// computed last: changing any other field afterwards invalidates it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MessageHeader {
    sync: u16,
    version: u8,
    flags: u8,
    id: u16,
    seq: u16,
    length: u16,
    crc: u16,
}

impl MessageHeader {
    /// Create a fresh header.
    ///
    /// Sequence number, length and CRC start at zero.
    #[must_use]
    pub const fn new(id: u16, flags: Flags) -> Self {
        Self {
            sync: SYNC_WORD,
            version: VERSION,
            flags: flags.bits(),
            id,
            seq: 0,
            length: 0,
            crc: 0,
        }
    }

    /// Get sync word
    #[must_use]
    pub const fn sync(&self) -> u16 {
        self.sync
    }

    /// Get protocol version
    #[must_use]
    pub const fn version(&self) -> u8 {
        self.version
    }

    /// Get flags
    #[must_use]
    pub const fn flags(&self) -> Flags {
        Flags::from_bits(self.flags)
    }

    /// Get message ID
    #[must_use]
    pub const fn id(&self) -> u16 {
        self.id
    }

    /// Get sequence number
    #[must_use]
    pub const fn seq(&self) -> u16 {
        self.seq
    }

    /// Get declared payload length
    #[must_use]
    pub const fn length(&self) -> u16 {
        self.length
    }

    /// Get stored checksum
    #[must_use]
    pub const fn crc(&self) -> u16 {
        self.crc
    }

    /// Set sequence number
    pub fn set_seq(&mut self, seq: u16) {
        self.seq = seq;
    }

    /// Set payload length.
    ///
    /// Not bounds checked; oversized values are rejected on validation.
    pub fn set_length(&mut self, length: u16) {
        self.length = length;
    }

    /// Set the given flag bits, keeping the others
    pub fn set_flags(&mut self, flags: u8) {
        self.flags |= flags;
    }

    /// Clear the given flag bits, keeping the others
    pub fn clear_flags(&mut self, flags: u8) {
        self.flags &= !flags;
    }

    /// Check if any bit of `flag` is set
    #[must_use]
    pub const fn has_flag(&self, flag: u8) -> bool {
        (self.flags & flag) != 0
    }

    /// Checksum of this header followed by `length` bytes of `payload`.
    ///
    /// The caller guarantees `payload.len() >= length`.
    pub(crate) fn checksum(&self, payload: &[u8]) -> u16 {
        let header = self.to_bytes();
        let crc = crc16(&header[..CRC_OFFSET]);
        crc16_continue(crc, &payload[..usize::from(self.length)])
    }

    /// Compute the CRC over header and payload and store it.
    ///
    /// Only the first `length` bytes of `payload` are covered. Fails without
    /// touching the header when fewer bytes are supplied.
    pub fn compute_crc(&mut self, payload: &[u8]) -> Result<u16> {
        let needed = usize::from(self.length);
        if payload.len() < needed {
            return Err(Error::BufferSizeMismatch {
                expected: HEADER_SIZE + needed,
                got: HEADER_SIZE + payload.len(),
            });
        }

        self.crc = self.checksum(payload);
        Ok(self.crc)
    }

    /// Size of the complete message this header describes
    #[must_use]
    pub const fn message_len(&self) -> usize {
        HEADER_SIZE + self.length as usize
    }

    /// Convert to bytes (big-endian)
    #[must_use]
    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let mut bytes = [0u8; HEADER_SIZE];

        bytes[0..2].copy_from_slice(&self.sync.to_be_bytes());
        bytes[2] = self.version;
        bytes[3] = self.flags;
        bytes[4..6].copy_from_slice(&self.id.to_be_bytes());
        bytes[6..8].copy_from_slice(&self.seq.to_be_bytes());
        bytes[8..10].copy_from_slice(&self.length.to_be_bytes());
        bytes[10..12].copy_from_slice(&self.crc.to_be_bytes());

        bytes
    }

    /// Parse from bytes (big-endian) without validating any field.
    ///
    /// Bytes past the header are ignored.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Self::peek(bytes).ok_or(Error::BufferSizeMismatch {
            expected: HEADER_SIZE,
            got: bytes.len(),
        })
    }

    /// Read the header fields of possibly damaged data, for diagnostics.
    #[must_use]
    pub fn peek(bytes: &[u8]) -> Option<Self> {
        let header: &[u8; HEADER_SIZE] = bytes.get(..HEADER_SIZE)?.try_into().ok()?;
        let be16 = |at: usize| u16::from_be_bytes([header[at], header[at + 1]]);

        Some(Self {
            sync: be16(0),
            version: header[2],
            flags: header[3],
            id: be16(4),
            seq: be16(6),
            length: be16(8),
            crc: be16(10),
        })
    }
}
