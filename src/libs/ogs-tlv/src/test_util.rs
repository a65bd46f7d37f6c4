//! Minimal IE framing used by the engine's own tests

use bytes::{BufMut, BytesMut};

use crate::cursor::Cursor;
use crate::error::CodecResult;
use crate::ie::{Ie, IeFormat, IeHeader};

/// 1-byte tag, 2-byte length; tags below 16 are TV, 0xFE escapes
pub(crate) struct Simple;

impl IeFormat for Simple {
    const ESCAPE: Option<u16> = Some(0xFE);

    fn read_fixed(cur: &mut Cursor) -> CodecResult<IeHeader> {
        let tag = cur.read_u8()? as u16;
        if tag < 16 {
            return Ok(IeHeader {
                tag,
                ..Default::default()
            });
        }
        Ok(IeHeader {
            tag,
            length: Some(cur.read_u16()? as usize),
            ..Default::default()
        })
    }

    fn write_fixed(ie: &Ie, length: Option<usize>, buf: &mut BytesMut) -> CodecResult<()> {
        buf.put_u8(ie.tag as u8);
        if let Some(len) = length {
            buf.put_u16(len as u16);
        }
        Ok(())
    }

    fn tv_len(tag: u16) -> Option<usize> {
        (tag == 1).then_some(2)
    }
}
