//! Human-readable header dumps for logs and debugging

use std::fmt;

use tracing::debug;

use super::{MessageHeader, SYNC_WORD, VERSION};

/// Multi-line rendering of a header, valid or not
///
/// ```text
/// CFL Header:
///   sync:    0x0A50 (OK)
///   version: 1 (OK)
///   flags:   0x09 [ RQST ACK ]
///   id:      0x0042 (66)
///   seq:     0x0007 (7)
///   length:  5 bytes
///   crc:     0x7F42
/// ```
#[derive(Debug, Clone, Copy)]
pub struct HeaderDump<'a>(&'a MessageHeader);

impl fmt::Display for HeaderDump<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let h = self.0;
        let sync_status = if h.sync() == SYNC_WORD {
            "OK"
        } else {
            "INVALID"
        };
        let version_status = if h.version() == VERSION {
            "OK"
        } else {
            "MISMATCH"
        };

        writeln!(f, "CFL Header:")?;
        writeln!(f, "  sync:    0x{:04X} ({sync_status})", h.sync())?;
        writeln!(f, "  version: {} ({version_status})", h.version())?;
        write!(f, "  flags:   0x{:02X} [", h.flags().bits())?;
        for name in h.flags().names() {
            write!(f, " {name}")?;
        }
        writeln!(f, " ]")?;
        writeln!(f, "  id:      0x{:04X} ({})", h.id(), h.id())?;
        writeln!(f, "  seq:     0x{:04X} ({})", h.seq(), h.seq())?;
        writeln!(f, "  length:  {} bytes", h.length())?;
        write!(f, "  crc:     0x{:04X}", h.crc())
    }
}

impl MessageHeader {
    /// Render the header for humans
    #[must_use]
    pub const fn dump(&self) -> HeaderDump<'_> {
        HeaderDump(self)
    }
}

/// Emit the header as a structured `debug` event
pub fn trace_header(header: &MessageHeader) {
    debug!(
        sync = header.sync(),
        version = header.version(),
        flags = %header.flags(),
        id = header.id(),
        seq = header.seq(),
        length = header.length(),
        crc = header.crc(),
        "cfl header"
    );
}
