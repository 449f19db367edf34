use primitive_types::U256;

use crate::{Error, LengthWidth};

/// Accumulates the big-endian wire encoding of a value.
///
/// Fixed-width writes cannot fail. Length-prefixed writes fail with
/// [`Error::SequenceTooLarge`] when the length does not fit the prefix.
#[derive(Debug, Default, Clone)]
pub struct Writer {
    buf: Vec<u8>,
}

impl Writer {
    pub fn new() -> Self {
        Self::with_capacity(128)
    }

    pub fn with_capacity(cap: usize) -> Self {
        Self {
            buf: Vec::with_capacity(cap),
        }
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.buf
    }

    pub fn put_u8(&mut self, v: u8) {
        self.buf.push(v);
    }

    pub fn put_u16(&mut self, v: u16) {
        self.buf.extend_from_slice(&v.to_be_bytes());
    }

    pub fn put_u32(&mut self, v: u32) {
        self.buf.extend_from_slice(&v.to_be_bytes());
    }

    pub fn put_u64(&mut self, v: u64) {
        self.buf.extend_from_slice(&v.to_be_bytes());
    }

    pub fn put_u256(&mut self, v: &U256) {
        let mut bytes = [0u8; 32];
        v.to_big_endian(&mut bytes);
        self.buf.extend_from_slice(&bytes);
    }

    /// Appends `bytes` verbatim, without any length information.
    pub fn put_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Writes a count of `len` elements using the given prefix width.
    pub fn put_length(
        &mut self,
        what: &'static str,
        len: usize,
        width: LengthWidth,
    ) -> Result<(), Error> {
        if len > width.max() {
            return Err(Error::SequenceTooLarge {
                what,
                len,
                max: width.max(),
            });
        }

        // The bound check above makes these casts lossless.
        match width {
            LengthWidth::U8 => self.put_u8(len as u8),
            LengthWidth::U16 => self.put_u16(len as u16),
            LengthWidth::U32 => self.put_u32(len as u32),
        }

        Ok(())
    }

    /// Writes a length prefix followed by `bytes`.
    pub fn put_length_prefixed(
        &mut self,
        what: &'static str,
        bytes: &[u8],
        width: LengthWidth,
    ) -> Result<(), Error> {
        self.put_length(what, bytes.len(), width)?;
        self.put_bytes(bytes);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use hex_literal::hex;

    use super::*;

    #[test]
    fn big_endian() {
        let mut w = Writer::new();
        w.put_u8(0x7f);
        w.put_u16(0x2abc);
        w.put_u32(0x8e11_e4d9);
        w.put_u64(0x3d5f_0c1a_2b3c_4d5e);

        assert_eq!(
            hex!("7f 2abc 8e11e4d9 3d5f0c1a2b3c4d5e").to_vec(),
            w.into_inner()
        );
    }

    #[test]
    fn u256_is_32_bytes() {
        let mut w = Writer::new();
        w.put_u256(&U256::from(1000u64));

        let mut expected = [0u8; 32];
        expected[30] = 0x03;
        expected[31] = 0xe8;
        assert_eq!(expected.to_vec(), w.into_inner());
    }

    #[test]
    fn length_prefixed() {
        let mut w = Writer::new();
        w.put_length_prefixed("payload", &hex!("aabbcc"), LengthWidth::U32)
            .unwrap();
        w.put_length_prefixed("tag", &hex!("ddee"), LengthWidth::U8)
            .unwrap();

        assert_eq!(hex!("00000003 aabbcc 02 ddee").to_vec(), w.into_inner());
    }

    #[test]
    fn too_long_for_prefix() {
        let mut w = Writer::new();
        let err = w
            .put_length_prefixed("keys", &[0u8; 256], LengthWidth::U8)
            .unwrap_err();

        assert_eq!(
            Error::SequenceTooLarge {
                what: "keys",
                len: 256,
                max: 255
            },
            err
        );
        assert!(w.is_empty());
    }
}
