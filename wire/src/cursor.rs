use std::mem::size_of;

use primitive_types::U256;

use crate::Error;

/// Width of the big-endian length prefix in front of a variable-length field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthWidth {
    U8,
    U16,
    U32,
}

impl LengthWidth {
    /// Number of bytes the prefix occupies on the wire.
    pub const fn size(self) -> usize {
        match self {
            LengthWidth::U8 => 1,
            LengthWidth::U16 => 2,
            LengthWidth::U32 => 4,
        }
    }

    /// Largest length the prefix can express.
    pub const fn max(self) -> usize {
        match self {
            LengthWidth::U8 => u8::MAX as usize,
            LengthWidth::U16 => u16::MAX as usize,
            LengthWidth::U32 => u32::MAX as usize,
        }
    }
}

/// A read-only view over an input buffer.
///
/// The cursor does not track a position itself. Every read takes the offset to read from and
/// returns the value together with the offset just past it, so a decoder threads the offset
/// through its reads and the same cursor can be shared freely. No read ever panics: a read that
/// would run past the end of the input returns [`Error::OutOfBounds`].
#[derive(Debug, Clone, Copy)]
pub struct ByteCursor<'a> {
    buf: &'a [u8],
}

// `<type>::from_be_bytes` is not a trait function so there is no bound a generic reader could
// use; expand one reader per integer width instead.
macro_rules! read_be_number {
    ($name:ident, $ty:ty) => {
        #[doc = concat!("Reads a big-endian `", stringify!($ty), "` at `offset`.")]
        pub fn $name(&self, offset: usize) -> Result<($ty, usize), Error> {
            let (bytes, next) = self.read_array::<{ size_of::<$ty>() }>(offset)?;
            Ok((<$ty>::from_be_bytes(bytes), next))
        }
    };
}

impl<'a> ByteCursor<'a> {
    pub const fn new(buf: &'a [u8]) -> Self {
        Self { buf }
    }

    /// Total length of the underlying input.
    pub const fn len(&self) -> usize {
        self.buf.len()
    }

    pub const fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Number of bytes left after `offset`, or 0 if `offset` is already past the end.
    pub const fn remaining_length(&self, offset: usize) -> usize {
        self.buf.len().saturating_sub(offset)
    }

    /// Borrows `len` bytes starting at `offset`.
    pub fn read_bytes(&self, offset: usize, len: usize) -> Result<(&'a [u8], usize), Error> {
        let end = offset
            .checked_add(len)
            .filter(|end| *end <= self.buf.len())
            .ok_or(Error::OutOfBounds {
                offset,
                len,
                available: self.buf.len(),
            })?;

        Ok((&self.buf[offset..end], end))
    }

    /// Copies `N` bytes starting at `offset` into a fixed-size array.
    pub fn read_array<const N: usize>(&self, offset: usize) -> Result<([u8; N], usize), Error> {
        let (data, next) = self.read_bytes(offset, N)?;
        let mut out = [0u8; N];
        out.copy_from_slice(data);
        Ok((out, next))
    }

    read_be_number!(read_u8, u8);
    read_be_number!(read_u16, u16);
    read_be_number!(read_u32, u32);
    read_be_number!(read_u64, u64);

    /// Reads a 32-byte big-endian unsigned integer.
    pub fn read_u256(&self, offset: usize) -> Result<(U256, usize), Error> {
        let (bytes, next) = self.read_array::<32>(offset)?;
        Ok((U256::from_big_endian(&bytes), next))
    }

    pub fn read_bytes32(&self, offset: usize) -> Result<([u8; 32], usize), Error> {
        self.read_array::<32>(offset)
    }

    /// Reads a length prefix of the given width followed by that many bytes.
    pub fn read_length_prefixed_bytes(
        &self,
        offset: usize,
        width: LengthWidth,
    ) -> Result<(&'a [u8], usize), Error> {
        let (len, next) = match width {
            LengthWidth::U8 => self.read_u8(offset).map(|(l, n)| (usize::from(l), n))?,
            LengthWidth::U16 => self.read_u16(offset).map(|(l, n)| (usize::from(l), n))?,
            LengthWidth::U32 => {
                let (l, n) = self.read_u32(offset)?;
                // A length that does not fit in memory can never be satisfied by the input.
                let l = usize::try_from(l).map_err(|_| Error::OutOfBounds {
                    offset: n,
                    len: usize::MAX,
                    available: self.buf.len(),
                })?;
                (l, n)
            }
        };

        self.read_bytes(next, len)
    }

    /// Borrows everything from `offset` to the end of the input.
    pub fn read_remaining(&self, offset: usize) -> Result<(&'a [u8], usize), Error> {
        if offset > self.buf.len() {
            return Err(Error::OutOfBounds {
                offset,
                len: 0,
                available: self.buf.len(),
            });
        }

        Ok((&self.buf[offset..], self.buf.len()))
    }
}

#[cfg(test)]
mod tests {
    use hex_literal::hex;

    use super::*;

    #[test]
    fn empty_input() {
        let c = ByteCursor::new(&[]);
        assert!(c.is_empty());
        assert_eq!(0, c.remaining_length(0));
        assert!(matches!(
            c.read_u8(0),
            Err(Error::OutOfBounds {
                offset: 0,
                len: 1,
                available: 0
            })
        ));
    }

    #[test]
    fn integers() {
        let buf = hex!("7f 2abc 8e11e4d9 3d5f0c1a2b3c4d5e");
        let c = ByteCursor::new(&buf);

        let (a, off) = c.read_u8(0).unwrap();
        let (b, off) = c.read_u16(off).unwrap();
        let (d, off) = c.read_u32(off).unwrap();
        let (e, off) = c.read_u64(off).unwrap();

        assert_eq!(0x7f, a);
        assert_eq!(0x2abc, b);
        assert_eq!(0x8e11_e4d9, d);
        assert_eq!(0x3d5f_0c1a_2b3c_4d5e, e);
        assert_eq!(buf.len(), off);
        assert_eq!(0, c.remaining_length(off));
    }

    #[test]
    fn u256() {
        let mut buf = [0u8; 33];
        buf[30] = 0x03;
        buf[31] = 0xe8;
        let c = ByteCursor::new(&buf);

        let (v, off) = c.read_u256(0).unwrap();
        assert_eq!(U256::from(1000u64), v);
        assert_eq!(32, off);

        // The last 32 bytes of the buffer still fit.
        let (v, off) = c.read_u256(1).unwrap();
        assert_eq!(U256::from(1000u64 * 256), v);
        assert_eq!(33, off);

        assert!(matches!(c.read_u256(2), Err(Error::OutOfBounds { .. })));
    }

    #[test]
    fn short_reads_do_not_return_partial_data() {
        let buf = [0x01, 0x02, 0x03];
        let c = ByteCursor::new(&buf);

        assert!(matches!(c.read_u32(0), Err(Error::OutOfBounds { .. })));
        assert!(matches!(c.read_u16(2), Err(Error::OutOfBounds { .. })));
        assert!(matches!(c.read_bytes32(0), Err(Error::OutOfBounds { .. })));
        assert_eq!((0x0203, 3), c.read_u16(1).unwrap());
    }

    #[test]
    fn offset_overflow() {
        let c = ByteCursor::new(&[0u8; 4]);
        assert!(matches!(
            c.read_bytes(usize::MAX, 2),
            Err(Error::OutOfBounds { .. })
        ));
        assert_eq!(0, c.remaining_length(usize::MAX));
    }

    #[test]
    fn length_prefixed() {
        let buf = hex!("00000003 aabbcc 02 ddee 0001 ff");
        let c = ByteCursor::new(&buf);

        let (a, off) = c.read_length_prefixed_bytes(0, LengthWidth::U32).unwrap();
        let (b, off) = c.read_length_prefixed_bytes(off, LengthWidth::U8).unwrap();
        let (d, off) = c.read_length_prefixed_bytes(off, LengthWidth::U16).unwrap();

        assert_eq!(&hex!("aabbcc"), a);
        assert_eq!(&hex!("ddee"), b);
        assert_eq!(&hex!("ff"), d);
        assert_eq!(buf.len(), off);
    }

    #[test]
    fn length_prefix_past_end() {
        let buf = hex!("00000005 aabbcc");
        let c = ByteCursor::new(&buf);

        assert_eq!(
            Err(Error::OutOfBounds {
                offset: 4,
                len: 5,
                available: 7
            }),
            c.read_length_prefixed_bytes(0, LengthWidth::U32)
        );
    }

    #[test]
    fn remaining() {
        let buf = hex!("0102030405");
        let c = ByteCursor::new(&buf);

        assert_eq!((&buf[2..], 5), c.read_remaining(2).unwrap());
        assert!(c.read_remaining(5).unwrap().0.is_empty());
        assert!(c.read_remaining(6).is_err());
        assert_eq!(3, c.remaining_length(2));
    }
}
