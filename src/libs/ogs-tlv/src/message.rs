//! Messages
//!
//! A message is a protocol header record, an optional extension header
//! chain and a body group. The header's length field and next extension
//! type are derived from what follows the header when encoding.

use bytes::{BufMut, Bytes, BytesMut};

use crate::cursor::{BitWriter, Cursor};
use crate::error::{CodecError, CodecResult, MissingIe};
use crate::extension::{decode_chain, encode_chain, ExtensionHeader};
use crate::group::{DecodeCtx, DecodeMode, Group};
use crate::ie::IeFormat;
use crate::layout::Layout;
use crate::record::{Parent, Record};
use crate::registry::{MessageSpec, Registry};

/// Parent key under which a header obtains the first extension type
pub const FIRST_EXTENSION_TYPE: &str = "first_extension_type";

/// Header field holding the message type code in every protocol
pub const MESSAGE_TYPE: &str = "message_type";

/// A control-plane protocol instantiated on the codec engine
pub trait Protocol: IeFormat + 'static {
    const NAME: &'static str;
    /// Shortest buffer that can hold a header
    const MIN_HEADER_LEN: usize;
    /// Byte offset of the message type in the header
    const TYPE_OFFSET: usize;

    fn header_layout() -> &'static Layout;

    fn registry() -> &'static Registry;

    /// Type of the first extension header announced by `header`, if the
    /// protocol has extension headers and the header announces one.
    fn first_extension(_header: &Record) -> Option<u8> {
        None
    }
}

/// Decoded or constructed message
#[derive(Debug, Clone)]
pub struct Message {
    spec: &'static MessageSpec,
    pub header: Record,
    pub extensions: Vec<ExtensionHeader>,
    pub body: Group,
    /// Mandatory IEs found missing by a lenient decode
    pub missing: Vec<MissingIe>,
}

impl PartialEq for Message {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.spec, other.spec)
            && self.header == other.header
            && self.extensions == other.extensions
            && self.body == other.body
            && self.missing == other.missing
    }
}

impl Eq for Message {}

/// Values the header derives from the rest of the message
struct Envelope {
    tail_len: usize,
    first_extension: u8,
}

impl Parent for Envelope {
    fn tail_len(&self) -> usize {
        self.tail_len
    }

    fn value(&self, key: &str) -> Option<u64> {
        (key == FIRST_EXTENSION_TYPE).then_some(self.first_extension as u64)
    }
}

impl Message {
    /// Empty message of the given type with a default header.
    pub fn new<P: Protocol>(spec: &'static MessageSpec) -> CodecResult<Self> {
        let mut header = Record::new(P::header_layout());
        header
            .set(MESSAGE_TYPE, spec.type_code as u64)
            .map_err(CodecError::from_encode)?;
        Ok(Self {
            spec,
            header,
            extensions: Vec::new(),
            body: Group::new(),
            missing: Vec::new(),
        })
    }

    pub fn spec(&self) -> &'static MessageSpec {
        self.spec
    }

    pub fn name(&self) -> &'static str {
        self.spec.name()
    }

    pub fn type_code(&self) -> u8 {
        self.spec.type_code
    }

    /// Whether every mandatory IE was found
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }

    /// Decode `buf` as a message of type `spec`.
    pub fn decode<P: Protocol>(
        spec: &'static MessageSpec,
        buf: &[u8],
        mode: DecodeMode,
    ) -> CodecResult<Message> {
        let mut cur = Cursor::from_slice(buf);
        let header =
            Record::decode(P::header_layout(), &mut cur).map_err(CodecError::from_decode)?;
        let tail = header.tail_len().map_err(CodecError::from_decode)?;
        if cur.remaining() < tail {
            return Err(CodecError::BufferTooShort {
                needed: tail,
                available: cur.remaining(),
            });
        }
        if cur.remaining() > tail {
            log::debug!(
                "{} {}: ignoring {} bytes past the declared length",
                P::NAME,
                spec.name(),
                cur.remaining() - tail
            );
        }
        let mut window = cur.window(tail)?;

        let extensions = match P::first_extension(&header) {
            Some(first) if first != 0 => decode_chain(&mut window, first, P::registry())?,
            _ => Vec::new(),
        };

        let mut ctx = DecodeCtx::new(mode, P::registry(), spec.scope);
        let body = Group::decode::<P>(&mut window, &spec.body, &mut ctx)?;

        Ok(Message {
            spec,
            header,
            extensions,
            body,
            missing: ctx.into_missing(),
        })
    }

    /// Encode the message, recomputing every derived header field.
    pub fn encode<P: Protocol>(&self) -> CodecResult<Bytes> {
        let mut tail = BytesMut::new();
        encode_chain(&self.extensions, &mut tail)?;
        self.body.encode::<P>(&mut tail)?;

        let envelope = Envelope {
            tail_len: tail.len(),
            first_extension: self.extensions.first().map(|e| e.kind).unwrap_or(0),
        };
        let mut w = BitWriter::new();
        self.header
            .encode(&envelope, &mut w)
            .map_err(CodecError::from_encode)?;
        let mut buf = w.finish().map_err(|e| CodecError::EncodingError(e.to_string()))?;
        buf.put_slice(&tail);
        Ok(buf.freeze())
    }
}
