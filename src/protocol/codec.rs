//! CFL message codec (encode/validate/decode)
//!
//! Validation is an ordered, fail-fast pipeline. Each check assumes the ones
//! before it passed, so only the first fault present is ever reported:
//!
//! 1. input present (non-empty)
//! 2. sync word
//! 3. protocol version
//! 4. flag combination (only with [`ValidatorConfig::strict_flags`])
//! 5. declared length within [`MAX_PAYLOAD_SIZE`]
//! 6. buffer size equals header plus declared length
//! 7. CRC over header and payload

use bytes::{BufMut, Bytes, BytesMut};

use super::{
    Error, HEADER_SIZE, MAX_PAYLOAD_SIZE, Message, MessageHeader, Result, SYNC_WORD, VERSION,
};

/// Configurable validation rules.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ValidatorConfig {
    /// Reject illegal flag combinations (ACK with NACK, REQUEST with REPLY,
    /// reserved bit set). Off by default.
    pub strict_flags: bool,
}

impl ValidatorConfig {
    /// Enable or disable flag combination checks
    #[must_use]
    pub const fn with_strict_flags(mut self, strict: bool) -> Self {
        self.strict_flags = strict;
        self
    }
}

/// A validated message borrowing the received buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame<'a> {
    header: MessageHeader,
    payload: &'a [u8],
}

impl<'a> Frame<'a> {
    /// Get header
    #[must_use]
    pub const fn header(&self) -> &MessageHeader {
        &self.header
    }

    /// Get payload
    #[must_use]
    pub const fn payload(&self) -> &'a [u8] {
        self.payload
    }

    /// Copy into an owned message
    #[must_use]
    pub fn to_message(&self) -> Message {
        Message::from_parts(self.header, Bytes::copy_from_slice(self.payload))
    }
}

/// Message validator
#[derive(Debug, Clone, Copy, Default)]
pub struct Validator {
    config: ValidatorConfig,
}

impl Validator {
    /// Create a validator with the given rules
    #[must_use]
    pub const fn new(config: ValidatorConfig) -> Self {
        Self { config }
    }

    /// Get the active rules
    #[must_use]
    pub const fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    /// Validate a buffer holding exactly one message.
    ///
    /// # Errors
    ///
    /// Returns the first failing check of the pipeline described in the
    /// module documentation.
    pub fn validate<'a>(&self, buf: &'a [u8]) -> Result<Frame<'a>> {
        let header = self.check_header(buf)?;

        let expected = header.message_len();
        if buf.len() != expected {
            return Err(Error::BufferSizeMismatch {
                expected,
                got: buf.len(),
            });
        }

        let payload = &buf[HEADER_SIZE..];
        let computed = header.checksum(payload);
        if computed != header.crc() {
            return Err(Error::ChecksumMismatch {
                expected: computed,
                found: header.crc(),
            });
        }

        Ok(Frame { header, payload })
    }

    /// Run the structural header checks (steps 1 to 5) on the start of `buf`.
    ///
    /// Sync, version and flags are checked on whatever prefix is present, so
    /// a short buffer from another protocol still reports a sync fault. The
    /// sync check needs at least two bytes; a single byte cannot be compared
    /// against the sync word and goes straight to the size check. A buffer
    /// too short to hold a full header then fails with
    /// [`Error::BufferSizeMismatch`].
    pub fn check_header(&self, buf: &[u8]) -> Result<MessageHeader> {
        if buf.is_empty() {
            return Err(Error::NullInput);
        }

        if let [hi, lo, ..] = *buf {
            let found = u16::from_be_bytes([hi, lo]);
            if found != SYNC_WORD {
                return Err(Error::InvalidSync { found });
            }
        }

        if let Some(&found) = buf.get(2) {
            if found != VERSION {
                return Err(Error::VersionMismatch {
                    expected: VERSION,
                    found,
                });
            }
        }

        if let Some(&flags) = buf.get(3) {
            if self.config.strict_flags && !super::Flags::from_bits(flags).is_legal() {
                return Err(Error::InvalidFlags { flags });
            }
        }

        let header = MessageHeader::from_bytes(buf)?;

        let size = usize::from(header.length());
        if size > MAX_PAYLOAD_SIZE {
            return Err(Error::PayloadTooLarge {
                size,
                max: MAX_PAYLOAD_SIZE,
            });
        }

        Ok(header)
    }
}

/// Validate a buffer with the default rules
///
/// # Errors
///
/// See [`Validator::validate`].
pub fn validate(buf: &[u8]) -> Result<Frame<'_>> {
    Validator::default().validate(buf)
}

/// Encode a message to bytes
///
/// # Format
///
/// ```text
/// [HEADER (12 bytes)] [PAYLOAD (length bytes)]
/// ```
#[must_use]
pub fn encode(message: &Message) -> Vec<u8> {
    let header = message.header();
    let mut bytes = Vec::with_capacity(header.message_len());

    bytes.extend_from_slice(&header.to_bytes());
    bytes.extend_from_slice(message.payload());

    bytes
}

/// Append an encoded message to `buf`
pub fn encode_into(message: &Message, buf: &mut BytesMut) {
    buf.reserve(message.header().message_len());
    buf.put_slice(&message.header().to_bytes());
    buf.put_slice(message.payload());
}

/// Decode a message from bytes without copying the payload
///
/// # Errors
///
/// See [`Validator::validate`].
pub fn decode(bytes: Bytes) -> Result<Message> {
    decode_with(&Validator::default(), bytes)
}

/// Decode a message using explicit validation rules
///
/// # Errors
///
/// See [`Validator::validate`].
pub fn decode_with(validator: &Validator, bytes: Bytes) -> Result<Message> {
    let header = *validator.validate(&bytes)?.header();
    Ok(Message::from_parts(header, bytes.slice(HEADER_SIZE..)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Flags;
    use crate::protocol::crc::crc16;

    fn sample(payload: &[u8]) -> Vec<u8> {
        let mut header = MessageHeader::new(0x0042, Flags::from_bits(Flags::REQUEST));
        header.set_seq(9);
        header.set_length(u16::try_from(payload.len()).unwrap());
        header.compute_crc(payload).unwrap();

        let mut buf = header.to_bytes().to_vec();
        buf.extend_from_slice(payload);
        buf
    }

    /// Overwrite the length field and re-finalize the CRC over what is present.
    fn with_length(buf: &mut [u8], length: u16) {
        buf[8..10].copy_from_slice(&length.to_be_bytes());
        let mut covered = buf[..10].to_vec();
        covered.extend_from_slice(&buf[HEADER_SIZE..]);
        let crc = crc16(&covered);
        buf[10..12].copy_from_slice(&crc.to_be_bytes());
    }

    #[test]
    fn test_validate_ok() {
        let buf = sample(b"hello");
        let frame = validate(&buf).unwrap();

        assert_eq!(frame.header().id(), 0x0042);
        assert_eq!(frame.header().seq(), 9);
        assert_eq!(frame.payload(), b"hello");
    }

    #[test]
    fn test_validate_empty_payload() {
        let buf = sample(&[]);
        assert_eq!(buf.len(), HEADER_SIZE);
        assert!(validate(&buf).unwrap().payload().is_empty());
    }

    #[test]
    fn test_empty_buffer_is_null() {
        assert!(matches!(validate(&[]), Err(Error::NullInput)));
    }

    #[test]
    fn test_invalid_sync() {
        let mut buf = sample(b"x");
        buf[0] = 0xDE;
        assert!(matches!(
            validate(&buf),
            Err(Error::InvalidSync { found: 0xDE50 })
        ));
    }

    #[test]
    fn test_version_mismatch() {
        let mut buf = sample(b"x");
        buf[2] = 2;
        assert!(matches!(
            validate(&buf),
            Err(Error::VersionMismatch { found: 2, .. })
        ));
    }

    #[test]
    fn test_sync_checked_before_length() {
        let mut buf = sample(b"x");
        with_length(&mut buf, 0xFFFF);
        buf[1] = 0x00;
        assert!(matches!(validate(&buf), Err(Error::InvalidSync { .. })));
    }

    #[test]
    fn test_sync_checked_before_size() {
        let mut buf = sample(b"abc");
        buf.truncate(HEADER_SIZE + 1);
        buf[0] = 0;
        assert!(matches!(validate(&buf), Err(Error::InvalidSync { .. })));
    }

    #[test]
    fn test_short_buffer() {
        let buf = sample(b"");
        assert!(matches!(validate(&buf[..1]), Err(Error::BufferSizeMismatch { .. })));
        assert!(matches!(
            validate(&buf[..7]),
            Err(Error::BufferSizeMismatch {
                expected: HEADER_SIZE,
                got: 7
            })
        ));
        assert!(matches!(validate(&[0xFF]), Err(Error::BufferSizeMismatch { .. })));
        assert!(matches!(validate(&[0xFF, 0xFF]), Err(Error::InvalidSync { .. })));
    }

    #[test]
    fn test_length_boundary() {
        let payload = vec![0x5A; MAX_PAYLOAD_SIZE];
        let buf = sample(&payload);
        assert_eq!(validate(&buf).unwrap().payload().len(), MAX_PAYLOAD_SIZE);

        let mut buf = sample(&vec![0x5A; MAX_PAYLOAD_SIZE + 1]);
        assert!(matches!(
            validate(&buf),
            Err(Error::PayloadTooLarge {
                size: 4097,
                max: 4096
            })
        ));

        // Correct CRC does not rescue an oversized length
        with_length(&mut buf, 4097);
        assert!(matches!(validate(&buf), Err(Error::PayloadTooLarge { .. })));
    }

    #[test]
    fn test_buffer_size_mismatch() {
        let mut buf = sample(b"abcd");
        buf.push(0);
        assert!(matches!(
            validate(&buf),
            Err(Error::BufferSizeMismatch {
                expected: 16,
                got: 17
            })
        ));

        buf.truncate(HEADER_SIZE + 2);
        assert!(matches!(
            validate(&buf),
            Err(Error::BufferSizeMismatch { expected: 16, got: 14 })
        ));
    }

    #[test]
    fn test_checksum_mismatch() {
        let mut buf = sample(b"payload");
        buf[HEADER_SIZE + 3] ^= 0x10;
        assert!(matches!(validate(&buf), Err(Error::ChecksumMismatch { .. })));

        let mut buf = sample(b"payload");
        buf[11] ^= 0x01;
        assert!(matches!(validate(&buf), Err(Error::ChecksumMismatch { .. })));
    }

    #[test]
    fn test_strict_flags() {
        let mut header = MessageHeader::new(1, Flags::from_bits(Flags::ACK | Flags::NACK));
        header.compute_crc(&[]).unwrap();
        let buf = header.to_bytes();

        assert!(validate(&buf).is_ok());

        let strict = Validator::new(ValidatorConfig::default().with_strict_flags(true));
        assert!(matches!(
            strict.validate(&buf),
            Err(Error::InvalidFlags { flags: 0x18 })
        ));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_config_from_json() {
        let config: ValidatorConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, ValidatorConfig::default());

        let config: ValidatorConfig = serde_json::from_str(r#"{"strict_flags":true}"#).unwrap();
        assert!(config.strict_flags);
    }

    #[test]
    fn test_decode_shares_buffer() {
        let bytes = Bytes::from(sample(b"zero-copy"));
        let message = decode(bytes.clone()).unwrap();

        assert_eq!(message.payload().as_ref(), b"zero-copy");
        assert_eq!(message.payload().as_ptr(), bytes[HEADER_SIZE..].as_ptr());
    }

    #[test]
    fn test_encode_matches_manual_layout() {
        let message = Message::builder(0x0042)
            .flags(Flags::from_bits(Flags::REQUEST))
            .seq(9)
            .payload(&b"hello"[..])
            .build()
            .unwrap();

        assert_eq!(encode(&message), sample(b"hello"));
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn payload_strategy() -> impl Strategy<Value = Vec<u8>> {
            prop::collection::vec(any::<u8>(), 0..=MAX_PAYLOAD_SIZE)
        }

        proptest! {
            #[test]
            fn prop_roundtrip_validates(
                id in any::<u16>(),
                flags in any::<u8>(),
                seq in any::<u16>(),
                payload in payload_strategy(),
            ) {
                let message = Message::builder(id)
                    .flags(Flags::from_bits(flags))
                    .seq(seq)
                    .payload(payload.clone())
                    .build()
                    .unwrap();
                let encoded = encode(&message);
                prop_assert_eq!(encoded.len(), HEADER_SIZE + payload.len());

                let frame = validate(&encoded).unwrap();
                prop_assert_eq!(frame.header().id(), id);
                prop_assert_eq!(frame.header().flags().bits(), flags);
                prop_assert_eq!(frame.header().seq(), seq);
                prop_assert_eq!(frame.payload(), &payload[..]);
            }

            #[test]
            fn prop_single_bit_flip_detected(
                payload in prop::collection::vec(any::<u8>(), 0..256),
                position in any::<prop::sample::Index>(),
                bit in 0u8..8,
            ) {
                let mut buf = sample(&payload);
                // Anything but the CRC field
                let mut candidates: Vec<usize> = (0..10).collect();
                candidates.extend(HEADER_SIZE..buf.len());
                let at = candidates[position.index(candidates.len())];
                buf[at] ^= 1 << bit;

                let result = validate(&buf);
                let expected_fault = match at {
                    0 | 1 => matches!(result, Err(Error::InvalidSync { .. })),
                    2 => matches!(result, Err(Error::VersionMismatch { .. })),
                    8 | 9 => matches!(
                        result,
                        Err(Error::PayloadTooLarge { .. } | Error::BufferSizeMismatch { .. })
                    ),
                    _ => matches!(result, Err(Error::ChecksumMismatch { .. })),
                };
                prop_assert!(expected_fault, "flipped bit {} of byte {}: {:?}", bit, at, result);
            }

            #[test]
            fn prop_size_change_detected_before_crc(
                payload in prop::collection::vec(any::<u8>(), 1..256),
                extra in prop::collection::vec(any::<u8>(), 1..8),
            ) {
                let mut buf = sample(&payload);
                buf.extend_from_slice(&extra);
                let is_size_fault = matches!(validate(&buf), Err(Error::BufferSizeMismatch { .. }));
                prop_assert!(is_size_fault);

                let mut buf = sample(&payload);
                buf.pop();
                let is_size_fault = matches!(validate(&buf), Err(Error::BufferSizeMismatch { .. }));
                prop_assert!(is_size_fault);
            }
        }
    }
}
