//! Information Elements
//!
//! Generic IE container and the framing-independent parts of IE decode
//! and encode. Each protocol supplies an [`IeFormat`] describing its
//! fixed IE header; escape tags (16-bit extended types), enterprise IDs,
//! TV fixed lengths and the value window are handled here.

use std::fmt;

use bytes::{BufMut, Bytes, BytesMut};

use crate::cursor::Cursor;
use crate::error::{CodecError, CodecResult, FieldError};
use crate::group::{DecodeCtx, Group};
use crate::record::{NoParent, Record};
use crate::registry::PayloadDef;

/// IE lookup key: effective tag and instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IeKey {
    pub tag: u16,
    pub instance: u8,
}

impl IeKey {
    pub const fn new(tag: u16, instance: u8) -> Self {
        Self { tag, instance }
    }
}

impl fmt::Display for IeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.tag, self.instance)
    }
}

/// Fixed IE header as read by a protocol's [`IeFormat`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IeHeader {
    pub tag: u16,
    pub instance: u8,
    pub spare: u8,
    /// Length field; `None` for TV IEs whose length is implied by tag
    pub length: Option<usize>,
}

/// Protocol-specific IE framing
pub trait IeFormat {
    /// Tag announcing a 16-bit extended type after the fixed header
    const ESCAPE: Option<u16> = None;

    /// Read the fixed part of an IE header.
    fn read_fixed(cur: &mut Cursor) -> CodecResult<IeHeader>;

    /// Write the fixed part of an IE header. `length` is `None` for TV
    /// IEs and otherwise counts everything after the fixed header.
    fn write_fixed(ie: &Ie, length: Option<usize>, buf: &mut BytesMut) -> CodecResult<()>;

    /// Fixed value length of a TV IE
    fn tv_len(_tag: u16) -> Option<usize> {
        None
    }

    /// Whether the tag carries a 16-bit enterprise ID before the value
    fn has_enterprise(_tag: u16) -> bool {
        false
    }
}

/// Structured IE payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    Fields(Record),
    Grouped(Group),
}

/// IE value: raw bytes when no payload class applies or the payload
/// could not be decoded, structured otherwise
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IeValue {
    Raw(Bytes),
    Structured(Payload),
}

/// Information Element
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ie {
    /// Tag as found on the wire (the escape tag for extended types)
    pub tag: u16,
    /// Extended type following an escape tag
    pub ext: Option<u16>,
    /// Enterprise ID of vendor-specific IEs
    pub enterprise: Option<u16>,
    pub instance: u8,
    pub spare: u8,
    pub value: IeValue,
}

impl Ie {
    pub fn new(tag: u16, value: IeValue) -> Self {
        Self {
            tag,
            ext: None,
            enterprise: None,
            instance: 0,
            spare: 0,
            value,
        }
    }

    pub fn raw(tag: u16, value: impl Into<Bytes>) -> Self {
        Self::new(tag, IeValue::Raw(value.into()))
    }

    pub fn fields(tag: u16, record: Record) -> Self {
        Self::new(tag, IeValue::Structured(Payload::Fields(record)))
    }

    pub fn grouped(tag: u16, group: Group) -> Self {
        Self::new(tag, IeValue::Structured(Payload::Grouped(group)))
    }

    pub fn with_instance(mut self, instance: u8) -> Self {
        self.instance = instance;
        self
    }

    pub fn with_ext(mut self, ext: u16) -> Self {
        self.ext = Some(ext);
        self
    }

    pub fn with_enterprise(mut self, enterprise: u16) -> Self {
        self.enterprise = Some(enterprise);
        self
    }

    /// Effective tag: the extended type when present
    pub fn effective_tag(&self) -> u16 {
        self.ext.unwrap_or(self.tag)
    }

    pub fn key(&self) -> IeKey {
        IeKey::new(self.effective_tag(), self.instance)
    }

    pub fn is_raw(&self) -> bool {
        matches!(self.value, IeValue::Raw(_))
    }

    pub fn raw_value(&self) -> Option<&Bytes> {
        match &self.value {
            IeValue::Raw(b) => Some(b),
            _ => None,
        }
    }

    pub fn record(&self) -> Option<&Record> {
        match &self.value {
            IeValue::Structured(Payload::Fields(r)) => Some(r),
            _ => None,
        }
    }

    pub fn record_mut(&mut self) -> Option<&mut Record> {
        match &mut self.value {
            IeValue::Structured(Payload::Fields(r)) => Some(r),
            _ => None,
        }
    }

    pub fn group(&self) -> Option<&Group> {
        match &self.value {
            IeValue::Structured(Payload::Grouped(g)) => Some(g),
            _ => None,
        }
    }

    pub fn group_mut(&mut self) -> Option<&mut Group> {
        match &mut self.value {
            IeValue::Structured(Payload::Grouped(g)) => Some(g),
            _ => None,
        }
    }

    /// Serialized value bytes, excluding header, extended type and
    /// enterprise ID.
    pub fn value_bytes<F: IeFormat>(&self) -> CodecResult<Bytes> {
        match &self.value {
            IeValue::Raw(b) => Ok(b.clone()),
            IeValue::Structured(Payload::Fields(r)) => {
                r.to_bytes(&NoParent).map_err(CodecError::from_encode)
            }
            IeValue::Structured(Payload::Grouped(g)) => g.to_bytes::<F>(),
        }
    }

    /// Encode the IE, computing its length from the serialized value.
    pub fn encode<F: IeFormat>(&self, buf: &mut BytesMut) -> CodecResult<()> {
        let value = self.value_bytes::<F>()?;

        let escaped = F::ESCAPE == Some(self.tag);
        if escaped != self.ext.is_some() {
            return Err(CodecError::EncodingError(format!(
                "IE {}: extended type does not match tag",
                self.tag
            )));
        }
        if F::has_enterprise(self.tag) != self.enterprise.is_some() {
            return Err(CodecError::EncodingError(format!(
                "IE {}: enterprise ID does not match tag",
                self.tag
            )));
        }

        if let Some(len) = F::tv_len(self.tag) {
            if value.len() != len {
                return Err(CodecError::EncodingError(format!(
                    "TV IE {}: value is {} bytes, expected {}",
                    self.tag,
                    value.len(),
                    len
                )));
            }
            F::write_fixed(self, None, buf)?;
            buf.put_slice(&value);
            return Ok(());
        }

        let extra = if self.ext.is_some() || self.enterprise.is_some() {
            2
        } else {
            0
        };
        let length = value.len() + extra;
        if length > u16::MAX as usize {
            return Err(CodecError::EncodingError(format!(
                "IE {}: length {} exceeds 65535",
                self.tag, length
            )));
        }
        F::write_fixed(self, Some(length), buf)?;
        if let Some(id) = self.enterprise.or(self.ext) {
            buf.put_u16(id);
        }
        buf.put_slice(&value);
        Ok(())
    }

    /// Decode one IE. With `expected` set, the effective tag must match.
    /// Returns the IE and the number of bytes consumed.
    pub fn decode<F: IeFormat>(
        cur: &mut Cursor,
        expected: Option<u16>,
        ctx: &mut DecodeCtx<'_>,
    ) -> CodecResult<(Ie, usize)> {
        let start = cur.remaining();
        let (mut ie, length) = read_header::<F>(cur)?;

        if let Some(tag) = expected {
            if ie.effective_tag() != tag {
                return Err(CodecError::BufferInvalid(format!(
                    "expected IE {}, found {}",
                    tag,
                    ie.effective_tag()
                )));
            }
        }
        if cur.remaining() < length {
            return Err(CodecError::BufferTooShort {
                needed: length,
                available: cur.remaining(),
            });
        }
        let window = cur.window(length)?;

        ie.value = match ctx.resolve(ie.key()) {
            Some(def) => decode_payload::<F>(def, window, ctx)?,
            None => IeValue::Raw(window.clone().read_rest()?),
        };
        Ok((ie, start - cur.remaining()))
    }
}

/// Read an IE header, returning the IE with an empty value and the
/// length of its value window.
fn read_header<F: IeFormat>(cur: &mut Cursor) -> CodecResult<(Ie, usize)> {
    let hdr = F::read_fixed(cur)?;
    let mut length = match hdr.length {
        Some(len) => len,
        None => F::tv_len(hdr.tag)
            .ok_or_else(|| CodecError::BufferInvalid(format!("unknown TV IE type {}", hdr.tag)))?,
    };

    let mut ie = Ie::new(hdr.tag, IeValue::Raw(Bytes::new()));
    ie.instance = hdr.instance;
    ie.spare = hdr.spare;

    let enterprise = F::has_enterprise(hdr.tag);
    if enterprise || F::ESCAPE == Some(hdr.tag) {
        if length < 2 || cur.remaining() < 2 {
            return Err(CodecError::BufferInvalid(format!(
                "IE {}: missing {}",
                hdr.tag,
                if enterprise {
                    "enterprise ID"
                } else {
                    "extended type"
                }
            )));
        }
        let id = cur.read_u16()?;
        if enterprise {
            ie.enterprise = Some(id);
        } else {
            ie.ext = Some(id);
        }
        length -= 2;
    }
    Ok((ie, length))
}

/// Effective tag of the IE at the cursor, without consuming it.
pub fn peek_tag<F: IeFormat>(cur: &Cursor) -> CodecResult<u16> {
    let mut probe = cur.clone();
    read_header::<F>(&mut probe).map(|(ie, _)| ie.effective_tag())
}

/// Decode a structured payload, falling back to raw bytes when the
/// window does not hold a valid instance of the payload class.
fn decode_payload<F: IeFormat>(
    def: PayloadDef,
    window: Cursor,
    ctx: &mut DecodeCtx<'_>,
) -> CodecResult<IeValue> {
    let raw = || window.clone().read_rest().map(IeValue::Raw);
    match def {
        PayloadDef::Fields(layout) => {
            let mut w = window.clone();
            let decoded = Record::decode(layout, &mut w).and_then(|r| {
                if w.is_empty() {
                    Ok(r)
                } else {
                    Err(FieldError::Trailing {
                        layout: layout.name,
                        remaining: w.remaining(),
                    })
                }
            });
            match decoded {
                Ok(r) => Ok(IeValue::Structured(Payload::Fields(r))),
                Err(e) => {
                    log::debug!("{}: keeping raw value ({})", layout.name, e);
                    Ok(raw()?)
                }
            }
        }
        PayloadDef::Grouped(spec) => {
            let mark = ctx.mark();
            let mut w = window.clone();
            match Group::decode::<F>(&mut w, spec, ctx) {
                Ok(g) => Ok(IeValue::Structured(Payload::Grouped(g))),
                Err(e @ CodecError::MandatoryIeMissing(_)) => Err(e),
                Err(e) => {
                    ctx.rewind(mark);
                    log::debug!("{}: keeping raw value ({})", spec.name, e);
                    Ok(raw()?)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::group::DecodeMode;
    use crate::layout::{FieldDef, Layout};
    use crate::registry::Registry;
    use crate::test_util::Simple;

    static COUNTER: Layout = Layout::new("Counter", &[FieldDef::uint("counter", 16)]);

    fn registry() -> Registry {
        Registry::builder("simple")
            .ie(1, PayloadDef::Fields(&COUNTER))
            .ie(20, PayloadDef::Fields(&COUNTER))
            .build()
            .unwrap()
    }

    fn decode(data: &[u8]) -> CodecResult<(Ie, usize)> {
        let reg = registry();
        let mut ctx = DecodeCtx::new(DecodeMode::Strict, &reg, &[]);
        Ie::decode::<Simple>(&mut Cursor::from_slice(data), None, &mut ctx)
    }

    #[test]
    fn test_tv_ie() {
        let (ie, used) = decode(&[1, 0x12, 0x34, 0xFF]).unwrap();
        assert_eq!(used, 3);
        assert_eq!(ie.record().unwrap().get("counter"), Some(0x1234));
    }

    #[test]
    fn test_unknown_tv_is_invalid() {
        assert!(matches!(decode(&[2, 0, 0]), Err(CodecError::BufferInvalid(_))));
    }

    #[test]
    fn test_unregistered_tlv_is_raw() {
        let (ie, used) = decode(&[30, 0, 3, 7, 8, 9]).unwrap();
        assert_eq!(used, 6);
        assert_eq!(ie.raw_value().unwrap().as_ref(), &[7, 8, 9]);
    }

    #[test]
    fn test_wrong_payload_size_falls_back_to_raw() {
        let (ie, _) = decode(&[20, 0, 3, 1, 2, 3]).unwrap();
        assert!(ie.is_raw());
        let (ie, _) = decode(&[20, 0, 1, 1]).unwrap();
        assert_eq!(ie.raw_value().unwrap().as_ref(), &[1]);
    }

    #[test]
    fn test_length_overrun() {
        assert_eq!(
            decode(&[20, 0, 9, 1, 2]).unwrap_err(),
            CodecError::BufferTooShort {
                needed: 9,
                available: 2
            }
        );
    }

    #[test]
    fn test_escape_tag() {
        let (ie, used) = decode(&[0xFE, 0, 3, 0x01, 0x02, 0xAA]).unwrap();
        assert_eq!(used, 6);
        assert_eq!(ie.ext, Some(0x0102));
        assert_eq!(ie.effective_tag(), 0x0102);
        assert_eq!(ie.raw_value().unwrap().as_ref(), &[0xAA]);

        let mut buf = BytesMut::new();
        ie.encode::<Simple>(&mut buf).unwrap();
        assert_eq!(buf.as_ref(), &[0xFE, 0, 3, 0x01, 0x02, 0xAA]);
    }

    #[test]
    fn test_escape_without_extended_type() {
        assert!(matches!(
            decode(&[0xFE, 0, 1, 0x01]),
            Err(CodecError::BufferInvalid(_))
        ));
    }

    #[test]
    fn test_expected_tag_mismatch() {
        let reg = registry();
        let mut ctx = DecodeCtx::new(DecodeMode::Strict, &reg, &[]);
        let mut cur = Cursor::from_slice(&[20, 0, 2, 0, 1]);
        assert!(matches!(
            Ie::decode::<Simple>(&mut cur, Some(21), &mut ctx),
            Err(CodecError::BufferInvalid(_))
        ));
    }

    #[test]
    fn test_encode_recomputes_length() {
        let mut rec = Record::new(&COUNTER);
        rec.set("counter", 0xBEEF).unwrap();
        let mut buf = BytesMut::new();
        Ie::fields(20, rec).encode::<Simple>(&mut buf).unwrap();
        assert_eq!(buf.as_ref(), &[20, 0, 2, 0xBE, 0xEF]);
    }

    #[test]
    fn test_encode_tv_length_mismatch() {
        let mut buf = BytesMut::new();
        let err = Ie::raw(1, vec![1, 2, 3]).encode::<Simple>(&mut buf).unwrap_err();
        assert!(matches!(err, CodecError::EncodingError(_)));
    }

    #[test]
    fn test_encode_oversized_value() {
        let mut buf = BytesMut::new();
        let err = Ie::raw(30, vec![0u8; 70_000])
            .encode::<Simple>(&mut buf)
            .unwrap_err();
        assert!(matches!(err, CodecError::EncodingError(_)));
    }

    #[test]
    fn test_peek_tag_does_not_consume() {
        let cur = Cursor::from_slice(&[0xFE, 0, 2, 0x00, 0x09]);
        assert_eq!(peek_tag::<Simple>(&cur).unwrap(), 9);
        assert_eq!(cur.remaining(), 5);
    }
}
