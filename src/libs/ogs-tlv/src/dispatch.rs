//! Message dispatcher
//!
//! Selects the message specification from the type code, decodes
//! strictly, and falls back to a lenient decode (and, for ambiguous type
//! codes, the protocol's alternate table) when mandatory IEs are
//! missing. The alternate table only wins with a complete decode;
//! otherwise the primary table's outcome stands.

use bytes::Bytes;

use crate::config::CodecConfig;
use crate::error::{CodecError, CodecResult, FaultCode};
use crate::group::DecodeMode;
use crate::message::{Message, Protocol};
use crate::registry::MessageSpec;

enum Attempt {
    Complete(Message),
    /// Decoded leniently with mandatory IEs missing
    Partial(Message),
    Failed(FaultCode),
}

impl Attempt {
    fn missed_mandatory(&self) -> bool {
        matches!(
            self,
            Attempt::Partial(_) | Attempt::Failed(FaultCode::MandatoryIeMissing)
        )
    }

    fn into_outcome(self) -> (Option<Message>, FaultCode) {
        match self {
            Attempt::Complete(msg) => (Some(msg), FaultCode::Ok),
            Attempt::Partial(msg) => (Some(msg), FaultCode::MandatoryIeMissing),
            Attempt::Failed(fault) => (None, fault),
        }
    }
}

fn attempt<P: Protocol>(spec: &'static MessageSpec, buf: &[u8], config: &CodecConfig) -> Attempt {
    let missing = match Message::decode::<P>(spec, buf, DecodeMode::Strict) {
        Ok(msg) => return Attempt::Complete(msg),
        Err(CodecError::MandatoryIeMissing(missing)) => missing,
        Err(e) => {
            log::debug!("{} {}: {}", P::NAME, spec.name(), e);
            return Attempt::Failed(FaultCode::from(&e));
        }
    };
    if !config.lenient_retry {
        return Attempt::Failed(FaultCode::MandatoryIeMissing);
    }

    log::debug!(
        "{} {}: {} mandatory IEs missing, retrying leniently",
        P::NAME,
        spec.name(),
        missing.len()
    );
    match Message::decode::<P>(spec, buf, DecodeMode::Lenient) {
        Ok(msg) => {
            for m in &msg.missing {
                log::warn!("{} {}: missing mandatory IE {}", P::NAME, spec.name(), m);
            }
            Attempt::Partial(msg)
        }
        Err(e) => {
            log::debug!("{} {}: lenient decode failed: {}", P::NAME, spec.name(), e);
            Attempt::Failed(FaultCode::BufferInvalid)
        }
    }
}

/// Decode with the default configuration.
pub fn decode_message<P: Protocol>(buf: &[u8]) -> (Option<Message>, FaultCode) {
    decode_message_with::<P>(buf, &CodecConfig::default())
}

/// Decode a message, classifying the outcome. A message is returned
/// alongside `MandatoryIeMissing` when the lenient retry succeeded.
pub fn decode_message_with<P: Protocol>(
    buf: &[u8],
    config: &CodecConfig,
) -> (Option<Message>, FaultCode) {
    if buf.len() < P::MIN_HEADER_LEN {
        log::debug!(
            "{}: {} bytes, shorter than the {}-byte header",
            P::NAME,
            buf.len(),
            P::MIN_HEADER_LEN
        );
        return (None, FaultCode::BufferTooShort);
    }
    if buf.len() > config.max_message_len {
        log::warn!(
            "{}: {} bytes exceeds the {}-byte limit",
            P::NAME,
            buf.len(),
            config.max_message_len
        );
        return (None, FaultCode::BufferInvalid);
    }

    let code = buf[P::TYPE_OFFSET];
    let registry = P::registry();
    let Some(spec) = registry.message(code) else {
        log::debug!("{}: unknown message type {}", P::NAME, code);
        return (None, FaultCode::TypeNotFound);
    };

    let primary = attempt::<P>(spec, buf, config);
    if !primary.missed_mandatory() || !config.disambiguation_retry {
        return primary.into_outcome();
    }
    let Some(alt) = registry.alternate(code) else {
        return primary.into_outcome();
    };

    log::debug!(
        "{}: type {} incomplete as {}, trying {}",
        P::NAME,
        code,
        spec.name(),
        alt.name()
    );
    match attempt::<P>(alt, buf, config) {
        Attempt::Complete(msg) => (Some(msg), FaultCode::Ok),
        _ => primary.into_outcome(),
    }
}

/// Encode a message.
pub fn encode_message<P: Protocol>(msg: &Message) -> CodecResult<Bytes> {
    msg.encode::<P>()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::OnceLock;

    use bytes::{BufMut, BytesMut};

    use crate::cursor::Cursor;
    use crate::group::{GroupSpec, Slot};
    use crate::ie::{Ie, IeFormat, IeHeader};
    use crate::layout::{FieldDef, Layout, ValueRule};
    use crate::message::MESSAGE_TYPE;
    use crate::registry::Registry;
    use crate::test_util::Simple;

    struct Toy;

    static TOY_HEADER: Layout = Layout::new(
        "toy header",
        &[
            FieldDef::uint(MESSAGE_TYPE, 8),
            FieldDef::uint("length", 8).derived(ValueRule::LengthOf { from: None }),
        ],
    );

    static REQUEST: MessageSpec = MessageSpec::new(
        18,
        GroupSpec::ordered(
            "Request (A)",
            &[Slot::mandatory(20, "Tunnel"), Slot::mandatory(30, "Name")],
        ),
    );

    static REQUEST_ALT: MessageSpec = MessageSpec::new(
        18,
        GroupSpec::ordered("Request (B)", &[Slot::mandatory(30, "Name")]),
    );

    impl IeFormat for Toy {
        fn read_fixed(cur: &mut Cursor) -> CodecResult<IeHeader> {
            Simple::read_fixed(cur)
        }

        fn write_fixed(ie: &Ie, length: Option<usize>, buf: &mut BytesMut) -> CodecResult<()> {
            Simple::write_fixed(ie, length, buf)
        }
    }

    impl Protocol for Toy {
        const NAME: &'static str = "toy";
        const MIN_HEADER_LEN: usize = 2;
        const TYPE_OFFSET: usize = 0;

        fn header_layout() -> &'static Layout {
            &TOY_HEADER
        }

        fn registry() -> &'static Registry {
            static REGISTRY: OnceLock<Registry> = OnceLock::new();
            REGISTRY.get_or_init(|| {
                Registry::builder("toy")
                    .header(&TOY_HEADER)
                    .message(&REQUEST)
                    .alternate(&REQUEST_ALT)
                    .build()
                    .unwrap()
            })
        }
    }

    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn message(ies: &[&[u8]]) -> Vec<u8> {
        let body: Vec<u8> = ies.concat();
        let mut buf = BytesMut::new();
        buf.put_u8(18);
        buf.put_u8(body.len() as u8);
        buf.put_slice(&body);
        buf.to_vec()
    }

    #[test]
    fn test_complete_message() {
        let buf = message(&[&[20, 0, 1, 5], &[30, 0, 1, b'a']]);
        let (msg, fault) = decode_message::<Toy>(&buf);
        assert_eq!(fault, FaultCode::Ok);
        let msg = msg.unwrap();
        assert_eq!(msg.name(), "Request (A)");
        assert_eq!(encode_message::<Toy>(&msg).unwrap().as_ref(), &buf[..]);
    }

    #[test]
    fn test_alternate_table_wins() {
        let buf = message(&[&[30, 0, 1, b'a']]);
        let (msg, fault) = decode_message::<Toy>(&buf);
        assert_eq!(fault, FaultCode::Ok);
        assert_eq!(msg.unwrap().name(), "Request (B)");
    }

    #[test]
    fn test_alternate_disabled() {
        let buf = message(&[&[30, 0, 1, b'a']]);
        let config = CodecConfig {
            disambiguation_retry: false,
            ..Default::default()
        };
        let (msg, fault) = decode_message_with::<Toy>(&buf, &config);
        assert_eq!(fault, FaultCode::MandatoryIeMissing);
        let msg = msg.unwrap();
        assert_eq!(msg.name(), "Request (A)");
        assert_eq!(msg.missing[0].name, "Tunnel");
    }

    #[test]
    fn test_both_tables_incomplete() {
        init();
        let buf = message(&[&[20, 0, 1, 5]]);
        let (msg, fault) = decode_message::<Toy>(&buf);
        assert_eq!(fault, FaultCode::MandatoryIeMissing);
        let msg = msg.unwrap();
        assert_eq!(msg.name(), "Request (A)");
        assert_eq!(msg.missing[0].name, "Name");
    }

    #[test]
    fn test_lenient_retry_disabled() {
        let buf = message(&[&[20, 0, 1, 5]]);
        let config = CodecConfig {
            lenient_retry: false,
            ..Default::default()
        };
        assert_eq!(
            decode_message_with::<Toy>(&buf, &config),
            (None, FaultCode::MandatoryIeMissing)
        );
    }

    #[test]
    fn test_short_and_unknown() {
        assert_eq!(decode_message::<Toy>(&[18]), (None, FaultCode::BufferTooShort));
        assert_eq!(decode_message::<Toy>(&[7, 0]), (None, FaultCode::TypeNotFound));
        assert_eq!(
            decode_message::<Toy>(&[18, 9, 30]),
            (None, FaultCode::BufferTooShort)
        );
    }

    #[test]
    fn test_oversized_buffer() {
        let config = CodecConfig {
            max_message_len: 4,
            ..Default::default()
        };
        let buf = message(&[&[30, 0, 1, b'a']]);
        assert_eq!(
            decode_message_with::<Toy>(&buf, &config),
            (None, FaultCode::BufferInvalid)
        );
    }
}
