//! CFL (Compact Framing Layer) - fixed-header binary message framing
//!
//! CFL frames request/reply/push messages for byte-oriented links such as
//! serial lines and sockets. Every message is a 12-byte big-endian header
//! followed by up to 4096 payload bytes, protected by a CRC-16.
//!
//! # Quick Start
//!
//! ```rust
//! use cfl::{Flags, Message, validate};
//!
//! // Build a message; the CRC is finalized last
//! let msg = Message::builder(0x0101)
//!     .flags(Flags::new().with(Flags::REQUEST))
//!     .seq(1)
//!     .payload(&b"Hello, device!"[..])
//!     .build()?;
//!
//! // Encode to bytes
//! let bytes = msg.encode();
//!
//! // Validate on the receiving side
//! let frame = validate(&bytes)?;
//! assert_eq!(frame.payload(), b"Hello, device!");
//! # Ok::<(), cfl::Error>(())
//! ```
//!
//! # Features
//!
//! - **CRC-16/CCITT** - chunked computation over header and payload
//! - **Fail-fast validation** - one discriminated error per rejected buffer
//! - **Zero-copy decoding** - payloads share the receive buffer via [`bytes::Bytes`]

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod io;
pub mod protocol;

pub use protocol::{
    Error, ErrorKind, Flags, Frame, HEADER_SIZE, MAX_PAYLOAD_SIZE, Message, MessageHeader, Result,
    Status, SYNC_WORD, VERSION, Validator, ValidatorConfig, validate,
};
