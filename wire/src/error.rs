use thiserror::Error as ThisError;

/// Everything that can go wrong while reading or writing the relayer wire format.
///
/// Each variant names the invariant that was violated so callers can tell malformed input apart
/// from input that is well-formed but describes something unsupported.
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum Error {
    #[error("read of {len} bytes at offset {offset} exceeds input of {available} bytes")]
    OutOfBounds {
        offset: usize,
        len: usize,
        available: usize,
    },
    #[error("invalid {what} tag: expected {expected}, found {found}")]
    TagMismatch {
        what: &'static str,
        expected: u8,
        found: u8,
    },
    #[error("invalid {what} variant: {tag}")]
    InvalidVariant { what: &'static str, tag: u8 },
    #[error("decoding consumed {consumed} bytes of a {len} byte input")]
    LengthMismatch { consumed: usize, len: usize },
    #[error("too many signatures ({count}), max supported = {max}")]
    TooManySignatures { count: usize, max: usize },
    #[error("{what} is too large ({len} elements), max supported length = {max}")]
    SequenceTooLarge {
        what: &'static str,
        len: usize,
        max: usize,
    },
}
