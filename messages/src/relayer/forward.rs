use std::fmt;

use bstr::BString;
use primitive_types::U256;
use serde::{Deserialize, Serialize};
use wormhole_wire::{ByteCursor, Decode, Encode, Error, LengthWidth, Writer};

use crate::consts::{
    FORWARD_FAILURE_INSUFFICIENT_FUNDS, FORWARD_FAILURE_REVERTED,
    FORWARD_FAILURE_UNSUPPORTED_TARGET_CHAIN,
};

/// Why a forward requested by a receiver contract could not be made.
///
/// Reported in a delivery event's `additional_status_info` when the delivery status is
/// `ForwardRequestFailure`. The encoding is a one byte tag followed by the variant's fields.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
pub enum ForwardFailure {
    /// Tag 1. The leftover funds did not cover the forward's cost.
    InsufficientFunds {
        #[cfg_attr(feature = "schemars", schemars(with = "String"))]
        available: U256,
        #[cfg_attr(feature = "schemars", schemars(with = "String"))]
        required: U256,
    },
    /// Tag 2.
    UnsupportedTargetChain { target_chain: u16 },
    /// Tag 3. `reason` is the raw revert data, length prefixed with a u32.
    Reverted {
        #[cfg_attr(feature = "schemars", schemars(with = "String"))]
        reason: BString,
    },
}

impl fmt::Display for ForwardFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ForwardFailure::InsufficientFunds {
                available,
                required,
            } => write!(
                f,
                "insufficient funds for forward: available {available}, required {required}"
            ),
            ForwardFailure::UnsupportedTargetChain { target_chain } => {
                write!(f, "forward target chain {target_chain} is not supported")
            }
            ForwardFailure::Reverted { reason } => write!(f, "forward reverted: {reason}"),
        }
    }
}

impl Decode for ForwardFailure {
    fn decode_at(c: &ByteCursor<'_>, offset: usize) -> Result<(Self, usize), Error> {
        let (tag, offset) = c.read_u8(offset)?;
        match tag {
            FORWARD_FAILURE_INSUFFICIENT_FUNDS => {
                let (available, offset) = c.read_u256(offset)?;
                let (required, offset) = c.read_u256(offset)?;
                Ok((
                    ForwardFailure::InsufficientFunds {
                        available,
                        required,
                    },
                    offset,
                ))
            }
            FORWARD_FAILURE_UNSUPPORTED_TARGET_CHAIN => {
                let (target_chain, offset) = c.read_u16(offset)?;
                Ok((ForwardFailure::UnsupportedTargetChain { target_chain }, offset))
            }
            FORWARD_FAILURE_REVERTED => {
                let (reason, offset) = c.read_length_prefixed_bytes(offset, LengthWidth::U32)?;
                Ok((
                    ForwardFailure::Reverted {
                        reason: BString::from(reason),
                    },
                    offset,
                ))
            }
            tag => Err(Error::InvalidVariant {
                what: "ForwardFailure",
                tag,
            }),
        }
    }
}

impl Encode for ForwardFailure {
    fn encode_to(&self, w: &mut Writer) -> Result<(), Error> {
        match self {
            ForwardFailure::InsufficientFunds {
                available,
                required,
            } => {
                w.put_u8(FORWARD_FAILURE_INSUFFICIENT_FUNDS);
                w.put_u256(available);
                w.put_u256(required);
            }
            ForwardFailure::UnsupportedTargetChain { target_chain } => {
                w.put_u8(FORWARD_FAILURE_UNSUPPORTED_TARGET_CHAIN);
                w.put_u16(*target_chain);
            }
            ForwardFailure::Reverted { reason } => {
                w.put_u8(FORWARD_FAILURE_REVERTED);
                w.put_length_prefixed("forward revert reason", reason, LengthWidth::U32)?;
            }
        }

        Ok(())
    }
}
