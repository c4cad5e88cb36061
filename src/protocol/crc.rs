//! CRC-16 checksum engine
//!
//! Polynomial `0x1021`, initial register `0xFFFF`, MSB-first, no final XOR
//! (the parameter set commonly called CRC-16/CCITT-FALSE).
//!
//! The register is never post-processed, so a finished value can be fed back
//! in as the starting register of a later computation. This is what lets the
//! header and payload be checksummed as two separate calls.

/// Generator polynomial
pub const CRC_POLY: u16 = 0x1021;

/// Initial register value
pub const CRC_INIT: u16 = 0xFFFF;

const TABLE: [u16; 256] = build_table();

const fn build_table() -> [u16; 256] {
    let mut table = [0u16; 256];
    let mut i = 0;
    while i < 256 {
        let mut crc = (i as u16) << 8;
        let mut bit = 0;
        while bit < 8 {
            crc = if crc & 0x8000 != 0 {
                (crc << 1) ^ CRC_POLY
            } else {
                crc << 1
            };
            bit += 1;
        }
        table[i] = crc;
        i += 1;
    }
    table
}

/// Checksum `data` starting from [`CRC_INIT`].
///
/// An empty slice yields `0xFFFF`.
#[must_use]
pub fn crc16(data: &[u8]) -> u16 {
    crc16_continue(CRC_INIT, data)
}

/// Extend a running register with more bytes.
///
/// `crc16_continue(crc16(a), b) == crc16(a ‖ b)` for any `a`, `b`.
/// An empty slice returns `crc` unchanged.
#[must_use]
pub fn crc16_continue(crc: u16, data: &[u8]) -> u16 {
    data.iter().fold(crc, |crc, &byte| {
        let index = ((crc >> 8) as u8 ^ byte) as usize;
        (crc << 8) ^ TABLE[index]
    })
}

/// Incremental CRC-16 hasher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Crc16 {
    register: u16,
}

impl Crc16 {
    /// Start a fresh checksum
    #[must_use]
    pub const fn new() -> Self {
        Self { register: CRC_INIT }
    }

    /// Resume from a previously computed value
    #[must_use]
    pub const fn resume(register: u16) -> Self {
        Self { register }
    }

    /// Feed more bytes
    pub fn update(&mut self, data: &[u8]) {
        self.register = crc16_continue(self.register, data);
    }

    /// Current checksum value
    #[must_use]
    pub const fn finish(&self) -> u16 {
        self.register
    }
}

impl Default for Crc16 {
    fn default() -> Self {
        Self::new()
    }
}
