//! Bounds-checked little-endian reads over a borrowed buffer.
use crate::error::{DecodeError, Result};

/// Read position into an immutable byte buffer. Only ever moves forward.
#[derive(Debug)]
pub struct Cursor<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    /// Start reading `buf` at `pos`, which may equal but not exceed its length.
    pub fn new(buf: &'a [u8], pos: usize) -> Result<Self> {
        if pos > buf.len() {
            return Err(DecodeError::Truncated { offset: pos, needed: 0, available: 0 });
        }
        Ok(Self { buf, pos })
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Fail with `Truncated` unless `n` more bytes are available.
    pub fn require(&self, n: usize) -> Result<()> {
        if n > self.remaining() {
            return Err(DecodeError::Truncated {
                offset: self.pos,
                needed: n,
                available: self.remaining(),
            });
        }
        Ok(())
    }

    /// Borrow the next `n` bytes and advance past them.
    pub fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        self.require(n)?;
        let out = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(out)
    }

    fn array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut tmp = [0u8; N];
        tmp.copy_from_slice(self.take(N)?);
        Ok(tmp)
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.array::<1>()?[0])
    }

    pub fn read_i8(&mut self) -> Result<i8> {
        Ok(i8::from_le_bytes(self.array()?))
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        Ok(u16::from_le_bytes(self.array()?))
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        Ok(u32::from_le_bytes(self.array()?))
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        Ok(i32::from_le_bytes(self.array()?))
    }

    pub fn read_mac(&mut self) -> Result<[u8; 6]> {
        self.array()
    }

    /// Read `len` bytes as UTF-8. `field` names the string in errors.
    pub fn read_str(&mut self, len: usize, field: &'static str) -> Result<String> {
        let offset = self.pos;
        let bytes = self.take(len)?;
        std::str::from_utf8(bytes)
            .map(str::to_owned)
            .map_err(|source| DecodeError::MalformedText { field, offset, source })
    }

    /// String with a one-byte length prefix.
    pub fn read_str_u8(&mut self, field: &'static str) -> Result<String> {
        let len = self.read_u8()? as usize;
        self.read_str(len, field)
    }

    /// String with a four-byte length prefix.
    pub fn read_str_u32(&mut self, field: &'static str) -> Result<String> {
        let len = self.read_u32()? as usize;
        self.read_str(len, field)
    }

    /// `n` samples, each one signed byte.
    pub fn read_samples(&mut self, n: usize) -> Result<Vec<i8>> {
        Ok(self.take(n)?.iter().map(|&b| b as i8).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_little_endian_and_advances() {
        let buf = [0x34, 0x12, 0x78, 0x56, 0x34, 0x12, 0xff, 0xff, 0xff, 0xff];
        let mut c = Cursor::new(&buf, 0).unwrap();
        assert_eq!(c.read_u16().unwrap(), 0x1234);
        assert_eq!(c.read_u32().unwrap(), 0x1234_5678);
        assert_eq!(c.read_i32().unwrap(), -1);
        assert!(c.is_empty());
        assert_eq!(c.position(), buf.len());
    }

    #[test]
    fn short_read_reports_offset_and_does_not_advance() {
        let buf = [1u8, 2, 3];
        let mut c = Cursor::new(&buf, 1).unwrap();
        let err = c.read_u32().unwrap_err();
        assert_eq!(err, DecodeError::Truncated { offset: 1, needed: 4, available: 2 });
        assert_eq!(c.position(), 1);
    }

    #[test]
    fn samples_are_twos_complement() {
        let buf = [0xce, 0x00, 0x7f, 0x80];
        let mut c = Cursor::new(&buf, 0).unwrap();
        assert_eq!(c.read_samples(4).unwrap(), vec![-50, 0, 127, -128]);
    }

    #[test]
    fn invalid_utf8_is_malformed_text() {
        let buf = [2u8, 0xc3, 0x28];
        let mut c = Cursor::new(&buf, 0).unwrap();
        match c.read_str_u8("timezone_name") {
            Err(DecodeError::MalformedText { field, offset, .. }) => {
                assert_eq!(field, "timezone_name");
                assert_eq!(offset, 1);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn start_past_end_is_rejected() {
        let buf = [0u8; 2];
        let err = Cursor::new(&buf, 10).unwrap_err();
        assert_eq!(err, DecodeError::Truncated { offset: 10, needed: 0, available: 0 });
        let at_end = Cursor::new(&buf, 2).unwrap();
        assert!(at_end.is_empty());
    }
}
