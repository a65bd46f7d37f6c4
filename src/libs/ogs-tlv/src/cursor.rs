//! Bit-granular read cursor and writer
//!
//! Header fields in the control-plane protocols are packed at bit
//! granularity (version/flag nibbles, 24-bit sequence numbers), so the
//! cursor tracks a bit offset inside a bounded byte window. Byte strings
//! may only be read or written on a byte boundary.

use bytes::{BufMut, Bytes, BytesMut};

use crate::error::CursorError;

/// Read cursor over an immutable byte window
#[derive(Debug, Clone)]
pub struct Cursor {
    data: Bytes,
    /// Bit offset of the next read
    pos: usize,
}

impl Cursor {
    pub fn new(data: Bytes) -> Self {
        Self { data, pos: 0 }
    }

    pub fn from_slice(data: &[u8]) -> Self {
        Self::new(Bytes::copy_from_slice(data))
    }

    fn end(&self) -> usize {
        self.data.len() * 8
    }

    /// Bits left in the window
    pub fn remaining_bits(&self) -> usize {
        self.end() - self.pos
    }

    /// Whole bytes left in the window
    pub fn remaining(&self) -> usize {
        self.remaining_bits() / 8
    }

    pub fn is_empty(&self) -> bool {
        self.pos >= self.end()
    }

    pub fn is_aligned(&self) -> bool {
        self.pos % 8 == 0
    }

    /// Bits consumed since the start of the window
    pub fn position_bits(&self) -> usize {
        self.pos
    }

    fn ensure(&self, bits: usize) -> Result<(), CursorError> {
        let available = self.remaining_bits();
        if bits > available {
            return Err(CursorError::Exhausted {
                needed: bits,
                available,
            });
        }
        Ok(())
    }

    fn ensure_aligned(&self) -> Result<(), CursorError> {
        if !self.is_aligned() {
            return Err(CursorError::Unaligned(self.pos));
        }
        Ok(())
    }

    /// Read an unsigned big-endian integer of `bits` width (1..=64).
    pub fn read_bits(&mut self, bits: u8) -> Result<u64, CursorError> {
        if bits == 0 || bits > 64 {
            return Err(CursorError::Width(bits));
        }
        self.ensure(bits as usize)?;

        let mut value: u64 = 0;
        let mut left = bits as usize;
        while left > 0 {
            let byte = self.data[self.pos / 8];
            let avail = 8 - self.pos % 8;
            let take = avail.min(left);
            let chunk = (byte >> (avail - take)) & (0xFFu16 >> (8 - take)) as u8;
            value = (value << take) | chunk as u64;
            self.pos += take;
            left -= take;
        }
        Ok(value)
    }

    pub fn peek_bits(&self, bits: u8) -> Result<u64, CursorError> {
        self.clone().read_bits(bits)
    }

    pub fn read_u8(&mut self) -> Result<u8, CursorError> {
        self.read_bits(8).map(|v| v as u8)
    }

    pub fn read_u16(&mut self) -> Result<u16, CursorError> {
        self.read_bits(16).map(|v| v as u16)
    }

    pub fn read_u32(&mut self) -> Result<u32, CursorError> {
        self.read_bits(32).map(|v| v as u32)
    }

    pub fn read_u64(&mut self) -> Result<u64, CursorError> {
        self.read_bits(64)
    }

    pub fn peek_u8(&self) -> Result<u8, CursorError> {
        self.peek_bits(8).map(|v| v as u8)
    }

    /// Read `len` bytes without copying.
    pub fn read_bytes(&mut self, len: usize) -> Result<Bytes, CursorError> {
        self.ensure_aligned()?;
        self.ensure(len * 8)?;
        let start = self.pos / 8;
        self.pos += len * 8;
        Ok(self.data.slice(start..start + len))
    }

    /// Read everything left in the window.
    pub fn read_rest(&mut self) -> Result<Bytes, CursorError> {
        self.read_bytes(self.remaining())
    }

    /// Split off a sub-window of `len` bytes; this cursor skips past it.
    pub fn window(&mut self, len: usize) -> Result<Cursor, CursorError> {
        self.read_bytes(len).map(Cursor::new)
    }
}

/// Bit-granular writer accumulating into a `BytesMut`
#[derive(Debug, Default)]
pub struct BitWriter {
    buf: BytesMut,
    /// Pending bits of a partially written byte
    acc: u8,
    pending: u8,
}

impl BitWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_aligned(&self) -> bool {
        self.pending == 0
    }

    pub fn bit_len(&self) -> usize {
        self.buf.len() * 8 + self.pending as usize
    }

    /// Write the low `bits` bits of `value`, most significant first.
    pub fn put_bits(&mut self, value: u64, bits: u8) -> Result<(), CursorError> {
        if bits == 0 || bits > 64 {
            return Err(CursorError::Width(bits));
        }
        if self.is_aligned() && bits % 8 == 0 {
            let bytes = value.to_be_bytes();
            self.buf.put_slice(&bytes[8 - bits as usize / 8..]);
            return Ok(());
        }
        for i in (0..bits).rev() {
            self.acc = (self.acc << 1) | ((value >> i) & 1) as u8;
            self.pending += 1;
            if self.pending == 8 {
                self.buf.put_u8(self.acc);
                self.acc = 0;
                self.pending = 0;
            }
        }
        Ok(())
    }

    pub fn put_slice(&mut self, data: &[u8]) -> Result<(), CursorError> {
        if !self.is_aligned() {
            return Err(CursorError::Unaligned(self.bit_len()));
        }
        self.buf.put_slice(data);
        Ok(())
    }

    /// Finish writing; fails if the last byte is incomplete.
    pub fn finish(self) -> Result<BytesMut, CursorError> {
        if !self.is_aligned() {
            return Err(CursorError::Unaligned(self.bit_len()));
        }
        Ok(self.buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_bits_across_bytes() {
        let mut cur = Cursor::from_slice(&[0x32, 0x10, 0xAB, 0xCD]);
        assert_eq!(cur.read_bits(3).unwrap(), 1);
        assert_eq!(cur.read_bits(1).unwrap(), 1);
        assert_eq!(cur.read_bits(4).unwrap(), 2);
        assert_eq!(cur.read_bits(12).unwrap(), 0x10A);
        assert_eq!(cur.read_bits(12).unwrap(), 0xBCD);
        assert!(cur.is_empty());
    }

    #[test]
    fn test_read_exhausted() {
        let mut cur = Cursor::from_slice(&[0x01]);
        assert_eq!(
            cur.read_u16(),
            Err(CursorError::Exhausted {
                needed: 16,
                available: 8
            })
        );
    }

    #[test]
    fn test_unaligned_bytes_rejected() {
        let mut cur = Cursor::from_slice(&[0xFF, 0x00]);
        cur.read_bits(4).unwrap();
        assert_eq!(cur.read_bytes(1), Err(CursorError::Unaligned(4)));
    }

    #[test]
    fn test_window_bounds_reads() {
        let mut cur = Cursor::from_slice(&[1, 2, 3, 4, 5]);
        let mut win = cur.window(2).unwrap();
        assert_eq!(win.read_u8().unwrap(), 1);
        assert_eq!(win.read_u8().unwrap(), 2);
        assert!(win.read_u8().is_err());
        assert_eq!(cur.remaining(), 3);
        assert_eq!(cur.read_rest().unwrap().as_ref(), &[3, 4, 5]);
    }

    #[test]
    fn test_read_u64() {
        let mut cur = Cursor::from_slice(&[0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08]);
        assert_eq!(cur.read_u64().unwrap(), 0x0102030405060708);
    }

    #[test]
    fn test_writer_packs_bits() {
        let mut w = BitWriter::new();
        w.put_bits(2, 3).unwrap();
        w.put_bits(0, 1).unwrap();
        w.put_bits(1, 1).unwrap();
        w.put_bits(0, 3).unwrap();
        w.put_bits(0x123456, 24).unwrap();
        let out = w.finish().unwrap();
        assert_eq!(out.as_ref(), &[0x48, 0x12, 0x34, 0x56]);
    }

    #[test]
    fn test_writer_rejects_partial_byte() {
        let mut w = BitWriter::new();
        w.put_bits(1, 3).unwrap();
        assert!(w.put_slice(&[0]).is_err());
        assert!(w.finish().is_err());
    }
}
