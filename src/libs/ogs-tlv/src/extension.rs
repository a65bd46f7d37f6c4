//! Extension header chains
//!
//! Each extension header is a length octet counting 4-byte words, the
//! content, and a next-type octet naming the following header (0 ends
//! the chain). The first header's type is carried by the enclosing
//! message header.

use bytes::{BufMut, Bytes, BytesMut};

use crate::cursor::Cursor;
use crate::error::{CodecError, CodecResult};
use crate::record::{NoParent, Record};
use crate::registry::Registry;

/// Extension header content
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtContent {
    Raw(Bytes),
    Fields(Record),
}

/// One element of an extension header chain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionHeader {
    /// Type of this header, as announced by its predecessor
    pub kind: u8,
    pub content: ExtContent,
}

impl ExtensionHeader {
    pub fn raw(kind: u8, content: impl Into<Bytes>) -> Self {
        Self {
            kind,
            content: ExtContent::Raw(content.into()),
        }
    }

    pub fn fields(kind: u8, record: Record) -> Self {
        Self {
            kind,
            content: ExtContent::Fields(record),
        }
    }

    pub fn record(&self) -> Option<&Record> {
        match &self.content {
            ExtContent::Fields(r) => Some(r),
            ExtContent::Raw(_) => None,
        }
    }

    fn content_bytes(&self) -> CodecResult<Bytes> {
        match &self.content {
            ExtContent::Raw(b) => Ok(b.clone()),
            ExtContent::Fields(r) => r.to_bytes(&NoParent).map_err(CodecError::from_encode),
        }
    }
}

/// Decode a chain whose first header has type `first`.
pub fn decode_chain(
    cur: &mut Cursor,
    first: u8,
    registry: &Registry,
) -> CodecResult<Vec<ExtensionHeader>> {
    let mut chain = Vec::new();
    let mut next = first;
    while next != 0 {
        if cur.is_empty() {
            return Err(CodecError::BufferInvalid(format!(
                "extension header {next:#04x} announced but no data follows"
            )));
        }
        let words = cur.read_u8()? as usize;
        if words == 0 {
            return Err(CodecError::BufferInvalid(format!(
                "extension header {next:#04x} with zero length"
            )));
        }
        let content_len = words * 4 - 2;
        if cur.remaining() < content_len + 1 {
            return Err(CodecError::BufferTooShort {
                needed: content_len + 1,
                available: cur.remaining(),
            });
        }
        let window = cur.window(content_len)?;
        let content = decode_content(next, window, registry)?;
        let following = cur.read_u8()?;
        chain.push(ExtensionHeader {
            kind: next,
            content,
        });
        next = following;
    }
    Ok(chain)
}

fn decode_content(kind: u8, window: Cursor, registry: &Registry) -> CodecResult<ExtContent> {
    let raw = || window.clone().read_rest().map(ExtContent::Raw);
    let Some(layout) = registry.extension(kind) else {
        return Ok(raw()?);
    };
    let mut w = window.clone();
    match Record::decode(layout, &mut w) {
        Ok(r) if w.is_empty() => Ok(ExtContent::Fields(r)),
        Ok(_) => {
            log::debug!("{}: trailing content, keeping raw value", layout.name);
            Ok(raw()?)
        }
        Err(e) => {
            log::debug!("{}: keeping raw value ({})", layout.name, e);
            Ok(raw()?)
        }
    }
}

/// Encode a chain; each header's length and next-type octets are
/// derived from its content and its successor.
pub fn encode_chain(chain: &[ExtensionHeader], buf: &mut BytesMut) -> CodecResult<()> {
    for (i, ext) in chain.iter().enumerate() {
        let content = ext.content_bytes()?;
        let total = content.len() + 2;
        if total % 4 != 0 || total / 4 > u8::MAX as usize {
            return Err(CodecError::EncodingError(format!(
                "extension header {:#04x}: {} content bytes do not fill whole words",
                ext.kind,
                content.len()
            )));
        }
        buf.put_u8((total / 4) as u8);
        buf.put_slice(&content);
        buf.put_u8(chain.get(i + 1).map(|e| e.kind).unwrap_or(0));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{FieldDef, Layout};

    static UDP_PORT: Layout = Layout::new("UDP Port", &[FieldDef::uint("udp_port", 16)]);

    fn registry() -> Registry {
        Registry::builder("ext test")
            .extension(0x40, &UDP_PORT)
            .build()
            .unwrap()
    }

    #[test]
    fn test_decode_two_element_chain() {
        let data = [1, 0x08, 0x68, 0x20, 1, 0xAA, 0xBB, 0x00];
        let mut cur = Cursor::from_slice(&data);
        let chain = decode_chain(&mut cur, 0x40, &registry()).unwrap();
        assert_eq!(chain.len(), 2);
        assert_eq!(chain[0].record().unwrap().get("udp_port"), Some(0x0868));
        assert_eq!(chain[1].kind, 0x20);
        assert_eq!(chain[1].content, ExtContent::Raw(Bytes::from_static(&[0xAA, 0xBB])));
        assert!(cur.is_empty());

        let mut buf = BytesMut::new();
        encode_chain(&chain, &mut buf).unwrap();
        assert_eq!(buf.as_ref(), &data);
    }

    #[test]
    fn test_dangling_next_type() {
        let mut cur = Cursor::from_slice(&[1, 0x08, 0x68, 0x20]);
        assert!(matches!(
            decode_chain(&mut cur, 0x40, &registry()),
            Err(CodecError::BufferInvalid(_))
        ));
    }

    #[test]
    fn test_zero_length() {
        let mut cur = Cursor::from_slice(&[0, 0, 0, 0]);
        assert!(matches!(
            decode_chain(&mut cur, 0x40, &registry()),
            Err(CodecError::BufferInvalid(_))
        ));
    }

    #[test]
    fn test_overrun() {
        let mut cur = Cursor::from_slice(&[2, 0, 0, 0]);
        assert!(matches!(
            decode_chain(&mut cur, 0x40, &registry()),
            Err(CodecError::BufferTooShort { .. })
        ));
    }

    #[test]
    fn test_encode_rejects_partial_words() {
        let mut buf = BytesMut::new();
        let err = encode_chain(&[ExtensionHeader::raw(0x20, vec![1, 2, 3])], &mut buf).unwrap_err();
        assert!(matches!(err, CodecError::EncodingError(_)));
    }

    #[test]
    fn test_bad_content_kept_raw() {
        // 6 content bytes for a 2-byte layout
        let data = [2, 1, 2, 3, 4, 5, 6, 0];
        let mut cur = Cursor::from_slice(&data);
        let chain = decode_chain(&mut cur, 0x40, &registry()).unwrap();
        assert_eq!(chain[0].content, ExtContent::Raw(Bytes::from_static(&[1, 2, 3, 4, 5, 6])));
    }
}
