//! CFL protocol core implementation
//!
//! This module provides the wire format, CRC-16 engine, message model and
//! validator for CFL.

mod codec;
pub mod crc;
mod dump;
mod error;
mod header;
mod message;
mod types;

pub use codec::{
    Frame, Validator, ValidatorConfig, decode, decode_with, encode, encode_into, validate,
};
pub use crc::{Crc16, crc16, crc16_continue};
pub use dump::{HeaderDump, trace_header};
pub use error::{Error, ErrorKind, Result, Status};
pub use header::MessageHeader;
pub use message::{Message, MessageBuilder};
pub use types::Flags;

/// CFL sync word, first two bytes of every message
pub const SYNC_WORD: u16 = 0x0A50;

/// Supported protocol version
pub const VERSION: u8 = 1;

/// Maximum payload size in bytes
pub const MAX_PAYLOAD_SIZE: usize = 4096;

/// Header size in bytes
pub const HEADER_SIZE: usize = 12;

/// Offset of the CRC field; the header bytes before it are checksummed
pub const CRC_OFFSET: usize = 10;

/// Largest possible encoded message
pub const MAX_MESSAGE_SIZE: usize = HEADER_SIZE + MAX_PAYLOAD_SIZE;
