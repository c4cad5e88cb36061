//! CFL message flags

use std::fmt;
use std::ops::BitOr;

/// Flag bit names in bit order, as printed in header dumps
const NAMES: [&str; 8] = ["RQST", "RPLY", "PUSH", "ACK", "NACK", "ENC", "COMP", "RSVD"];

/// Message flags
///
/// Any bit pattern is representable; legality of combinations is checked by
/// the validator only when strict flag checking is enabled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Flags(u8);

impl Flags {
    /// Message is a request
    pub const REQUEST: u8 = 1 << 0;
    /// Message is a reply
    pub const REPLY: u8 = 1 << 1;
    /// Unsolicited push
    pub const PUSH: u8 = 1 << 2;
    /// Positive acknowledgment
    pub const ACK: u8 = 1 << 3;
    /// Negative acknowledgment
    pub const NACK: u8 = 1 << 4;
    /// Payload is encrypted
    pub const ENCRYPTED: u8 = 1 << 5;
    /// Payload is compressed
    pub const COMPRESSED: u8 = 1 << 6;
    /// Reserved for future use
    pub const RESERVED: u8 = 1 << 7;

    /// Create empty flags
    #[must_use]
    pub const fn new() -> Self {
        Self(0)
    }

    /// Create from byte
    #[must_use]
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits)
    }

    /// Convert to byte
    #[must_use]
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Set a flag
    #[must_use]
    pub const fn with(mut self, flag: u8) -> Self {
        self.0 |= flag;
        self
    }

    /// Set bits in place
    pub fn insert(&mut self, flags: u8) {
        self.0 |= flags;
    }

    /// Clear bits in place
    pub fn remove(&mut self, flags: u8) {
        self.0 &= !flags;
    }

    /// Check if any bit of `flag` is set
    #[must_use]
    pub const fn contains(self, flag: u8) -> bool {
        (self.0 & flag) != 0
    }

    /// Check if no flag is set
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Check if the combination is legal.
    ///
    /// ACK with NACK, REQUEST with REPLY and the reserved bit are rejected.
    #[must_use]
    pub const fn is_legal(self) -> bool {
        const ACK_NACK: u8 = Flags::ACK | Flags::NACK;
        const REQUEST_REPLY: u8 = Flags::REQUEST | Flags::REPLY;

        self.0 & ACK_NACK != ACK_NACK
            && self.0 & REQUEST_REPLY != REQUEST_REPLY
            && self.0 & Self::RESERVED == 0
    }

    /// Names of the set bits, lowest bit first
    pub fn names(self) -> impl Iterator<Item = &'static str> {
        NAMES
            .iter()
            .enumerate()
            .filter(move |(bit, _)| self.0 & (1 << bit) != 0)
            .map(|(_, name)| *name)
    }
}

impl From<u8> for Flags {
    fn from(bits: u8) -> Self {
        Self(bits)
    }
}

impl BitOr for Flags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl fmt::Display for Flags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "NONE");
        }
        let parts: Vec<_> = self.names().collect();
        write!(f, "{}", parts.join(" | "))
    }
}
