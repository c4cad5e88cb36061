//! CFL message implementation

use bytes::Bytes;

use super::{Error, Flags, MAX_PAYLOAD_SIZE, MessageHeader, Result};

/// CFL message: a finalized header plus its payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// Message header
    header: MessageHeader,
    /// Message payload
    payload: Bytes,
}

impl Message {
    /// Create a message with sequence number zero and a finalized CRC
    ///
    /// # Errors
    ///
    /// Returns [`Error::PayloadTooLarge`] if the payload exceeds
    /// [`MAX_PAYLOAD_SIZE`].
    pub fn new(id: u16, flags: Flags, payload: impl Into<Bytes>) -> Result<Self> {
        Self::builder(id).flags(flags).payload(payload).build()
    }

    /// Start building a message
    #[must_use]
    pub fn builder(id: u16) -> MessageBuilder {
        MessageBuilder::new(id)
    }

    /// Assemble a message from parts that were already validated
    pub(crate) fn from_parts(header: MessageHeader, payload: Bytes) -> Self {
        Self { header, payload }
    }

    /// Get message ID
    #[must_use]
    pub const fn id(&self) -> u16 {
        self.header.id()
    }

    /// Get sequence number
    #[must_use]
    pub const fn seq(&self) -> u16 {
        self.header.seq()
    }

    /// Get flags
    #[must_use]
    pub const fn flags(&self) -> Flags {
        self.header.flags()
    }

    /// Get payload
    #[must_use]
    pub fn payload(&self) -> &Bytes {
        &self.payload
    }

    /// Get header
    #[must_use]
    pub const fn header(&self) -> &MessageHeader {
        &self.header
    }

    /// Split into header and payload
    #[must_use]
    pub fn into_parts(self) -> (MessageHeader, Bytes) {
        (self.header, self.payload)
    }

    /// Encode message to bytes
    #[must_use]
    pub fn encode(&self) -> Vec<u8> {
        super::encode(self)
    }

    /// Decode message from bytes
    pub fn decode(bytes: impl Into<Bytes>) -> Result<Self> {
        super::decode(bytes.into())
    }
}

/// Builder that finalizes the CRC after every other field is set
#[derive(Debug, Clone, Default)]
pub struct MessageBuilder {
    id: u16,
    flags: Flags,
    seq: u16,
    payload: Bytes,
}

impl MessageBuilder {
    /// Start a message with the given ID
    #[must_use]
    pub fn new(id: u16) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }

    /// Set flags
    #[must_use]
    pub fn flags(mut self, flags: Flags) -> Self {
        self.flags = flags;
        self
    }

    /// Set sequence number
    #[must_use]
    pub fn seq(mut self, seq: u16) -> Self {
        self.seq = seq;
        self
    }

    /// Set payload
    #[must_use]
    pub fn payload(mut self, payload: impl Into<Bytes>) -> Self {
        self.payload = payload.into();
        self
    }

    /// Finalize the header and produce the message
    ///
    /// # Errors
    ///
    /// Returns [`Error::PayloadTooLarge`] if the payload exceeds
    /// [`MAX_PAYLOAD_SIZE`].
    pub fn build(self) -> Result<Message> {
        let size = self.payload.len();
        let length = u16::try_from(size)
            .ok()
            .filter(|&len| usize::from(len) <= MAX_PAYLOAD_SIZE)
            .ok_or(Error::PayloadTooLarge {
                size,
                max: MAX_PAYLOAD_SIZE,
            })?;

        let mut header = MessageHeader::new(self.id, self.flags);
        header.set_seq(self.seq);
        header.set_length(length);
        header.compute_crc(&self.payload)?;

        Ok(Message::from_parts(header, self.payload))
    }
}
