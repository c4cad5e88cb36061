//! Blocking read/write of single messages over a byte stream
//!
//! The transport decides where messages start; these helpers assume the
//! stream is positioned at a header and consume exactly one message.

use std::io::{ErrorKind, Read, Write};

use tracing::{debug, trace};

use crate::protocol::{
    Error, HEADER_SIZE, Message, Result, Validator, ValidatorConfig, decode_with,
};

/// Read and validate one message.
///
/// The header is checked before the payload is read, so a foreign or
/// oversized header never causes a payload allocation or a read past the
/// message. A stream that ends early surfaces as [`Error::Io`] with
/// [`ErrorKind::UnexpectedEof`].
pub fn read_message<R: Read>(reader: &mut R, config: &ValidatorConfig) -> Result<Message> {
    read_next(reader, config)?.ok_or_else(|| Error::Io(ErrorKind::UnexpectedEof.into()))
}

/// Read the next message, or `None` if the stream ends before its first byte.
///
/// A stream that ends inside a message is still an error.
pub fn read_next<R: Read>(reader: &mut R, config: &ValidatorConfig) -> Result<Option<Message>> {
    let validator = Validator::new(*config);

    let mut header_bytes = [0u8; HEADER_SIZE];
    if !read_header(reader, &mut header_bytes)? {
        debug!("stream ended");
        return Ok(None);
    }

    let header = validator.check_header(&header_bytes).inspect_err(|err| {
        debug!(error = %err, "rejecting header");
    })?;

    let mut buf = vec![0u8; header.message_len()];
    buf[..HEADER_SIZE].copy_from_slice(&header_bytes);
    reader.read_exact(&mut buf[HEADER_SIZE..])?;

    let message = decode_with(&validator, buf.into()).inspect_err(|err| {
        debug!(error = %err, id = header.id(), seq = header.seq(), "rejecting message");
    })?;

    trace!(
        id = message.id(),
        seq = message.seq(),
        len = message.payload().len(),
        "received message"
    );
    #[cfg(feature = "debug-tools")]
    crate::protocol::trace_header(message.header());

    Ok(Some(message))
}

/// Write one encoded message and flush.
pub fn write_message<W: Write>(writer: &mut W, message: &Message) -> Result<()> {
    writer.write_all(&message.encode())?;
    writer.flush()?;

    trace!(
        id = message.id(),
        seq = message.seq(),
        len = message.payload().len(),
        "sent message"
    );
    Ok(())
}

/// Fill `buf` with a header. Returns `false` on end of stream before any byte.
fn read_header<R: Read>(reader: &mut R, buf: &mut [u8; HEADER_SIZE]) -> std::io::Result<bool> {
    let mut filled = 0;
    while filled < HEADER_SIZE {
        match reader.read(&mut buf[filled..]) {
            Ok(0) if filled == 0 => return Ok(false),
            Ok(0) => return Err(ErrorKind::UnexpectedEof.into()),
            Ok(n) => filled += n,
            Err(err) if err.kind() == ErrorKind::Interrupted => {}
            Err(err) => return Err(err),
        }
    }
    Ok(true)
}
