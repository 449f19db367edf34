//! Read and write values in the Wormhole relayer wire format.
//!
//! The format is not self-describing. A reader has to know which type it expects before it looks
//! at the bytes, and every type documents its own layout. All types share the same building
//! blocks:
//!
//! ### Integers
//!
//! `u8`, `u16`, `u32` and `u64` are encoded as full-width big-endian integers. Amounts are 256-bit
//! unsigned integers, encoded as 32 big-endian bytes.
//!
//! ### Fixed-size byte arrays
//!
//! Addresses and hashes are 32 bytes written as-is, with no length information.
//!
//! ### Variable-length byte strings
//!
//! Encoded as a big-endian length prefix followed by that many bytes. The width of the prefix is
//! part of each type's layout (see [`LengthWidth`]); relayer payloads and execution parameters use
//! a `u32` prefix.
//!
//! ### Sequences
//!
//! A count prefix followed by the concatenation of the encoded elements.
//!
//! ### Tagged values
//!
//! Versioned structures start with a one byte version and tagged unions with a one byte variant
//! tag. A reader accepts exactly the versions and tags it knows and rejects anything else; there
//! is no skipping of unknown data.
//!
//! ### Trailing data
//!
//! [`from_slice`] requires that decoding consumes the whole input. Use
//! [`from_slice_with_payload`] when the remaining bytes are meaningful to the caller.
//!
//! ## Example
//!
//! ```
//! use wormhole_wire::{ByteCursor, Decode, Encode, Error, Writer};
//!
//! #[derive(Debug, PartialEq)]
//! struct Fee {
//!     chain: u16,
//!     amount: u64,
//! }
//!
//! impl Decode for Fee {
//!     fn decode_at(c: &ByteCursor<'_>, offset: usize) -> Result<(Self, usize), Error> {
//!         let (chain, offset) = c.read_u16(offset)?;
//!         let (amount, offset) = c.read_u64(offset)?;
//!         Ok((Fee { chain, amount }, offset))
//!     }
//! }
//!
//! impl Encode for Fee {
//!     fn encode_to(&self, w: &mut Writer) -> Result<(), Error> {
//!         w.put_u16(self.chain);
//!         w.put_u64(self.amount);
//!         Ok(())
//!     }
//! }
//!
//! let fee = Fee { chain: 2, amount: 1_000 };
//! let buf = fee.encode().unwrap();
//! assert_eq!(fee, Fee::decode(&buf).unwrap());
//!
//! let mut long = buf.clone();
//! long.push(0);
//! assert!(matches!(Fee::decode(&long), Err(Error::LengthMismatch { .. })));
//! ```

mod cursor;
mod error;
mod writer;

pub use cursor::{ByteCursor, LengthWidth};
pub use error::Error;
pub use writer::Writer;

/// A type that can be read from the wire format.
pub trait Decode: Sized {
    /// Reads a value starting at `offset`, returning it together with the offset just past it.
    fn decode_at(cursor: &ByteCursor<'_>, offset: usize) -> Result<(Self, usize), Error>;

    /// Decodes a value that must span all of `buf`.
    fn decode(buf: &[u8]) -> Result<Self, Error> {
        from_slice(buf)
    }
}

/// A type that can be written in the wire format.
pub trait Encode {
    fn encode_to(&self, writer: &mut Writer) -> Result<(), Error>;

    fn encode(&self) -> Result<Vec<u8>, Error> {
        to_vec(self)
    }
}

/// Deserialize an instance of type `T` from a byte slice. Fails with [`Error::LengthMismatch`]
/// unless every byte of `buf` was consumed.
pub fn from_slice<T: Decode>(buf: &[u8]) -> Result<T, Error> {
    let cursor = ByteCursor::new(buf);
    let (v, end) = T::decode_at(&cursor, 0)?;

    if end == buf.len() {
        Ok(v)
    } else {
        Err(Error::LengthMismatch {
            consumed: end,
            len: buf.len(),
        })
    }
}

/// Like `from_slice` but also returns any trailing data in the input buffer after decoding.
pub fn from_slice_with_payload<T: Decode>(buf: &[u8]) -> Result<(T, &[u8]), Error> {
    let cursor = ByteCursor::new(buf);
    let (v, end) = T::decode_at(&cursor, 0)?;
    let (rest, _) = cursor.read_remaining(end)?;

    Ok((v, rest))
}

/// Serialize `T` into a byte vector.
pub fn to_vec<T: ?Sized + Encode>(val: &T) -> Result<Vec<u8>, Error> {
    let mut writer = Writer::new();
    val.encode_to(&mut writer)?;
    Ok(writer.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq, Eq)]
    struct Pair {
        a: u8,
        b: u32,
    }

    impl Decode for Pair {
        fn decode_at(c: &ByteCursor<'_>, offset: usize) -> Result<(Self, usize), Error> {
            let (a, offset) = c.read_u8(offset)?;
            let (b, offset) = c.read_u32(offset)?;
            Ok((Pair { a, b }, offset))
        }
    }

    impl Encode for Pair {
        fn encode_to(&self, w: &mut Writer) -> Result<(), Error> {
            w.put_u8(self.a);
            w.put_u32(self.b);
            Ok(())
        }
    }

    #[test]
    fn trailing_data() {
        let buf = [0x05, 0x00, 0x00, 0x00, 0x09, 0xaa, 0xbb];

        assert_eq!(
            Err(Error::LengthMismatch {
                consumed: 5,
                len: 7
            }),
            from_slice::<Pair>(&buf)
        );

        let (p, rest) = from_slice_with_payload::<Pair>(&buf).unwrap();
        assert_eq!(Pair { a: 5, b: 9 }, p);
        assert_eq!(&[0xaa, 0xbb], rest);
    }

    #[test]
    fn truncated() {
        let buf = [0x05, 0x00, 0x00, 0x00];
        assert!(matches!(
            from_slice::<Pair>(&buf),
            Err(Error::OutOfBounds { .. })
        ));
    }

    #[test]
    fn encode_then_decode() {
        let p = Pair { a: 0xfe, b: 0x0102_0304 };
        let buf = p.encode().unwrap();

        assert_eq!(vec![0xfe, 0x01, 0x02, 0x03, 0x04], buf);
        assert_eq!(p, Pair::decode(&buf).unwrap());
    }
}
