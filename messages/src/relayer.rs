//! Parsers for Standardized Relayer VAAs.
//!
//! The Standardized Relayer uses VAA payloads for delivery and redelivery instructions. Each
//! payload starts with a one byte payload id; the structures nested inside it (VAA keys,
//! execution parameters, delivery overrides) carry their own one byte version so their layout can
//! change without touching the outer payload id.
//!
//! Decoding is strict. A payload id or version other than the one expected is rejected, unknown
//! variant tags are rejected and every byte of the input must be consumed.
//!
//! ```markdown
//! DeliveryInstruction:
//!     payload_id = 1                  u8
//!     target_chain                    u16
//!     target_address                  [u8; 32]
//!     payload                         u32 length, bytes
//!     requested_receiver_value        u256
//!     extra_receiver_value            u256
//!     execution_environment           u8
//!     encoded_execution_parameters    u32 length, bytes
//!     source_relay_provider           [u8; 32]
//!     sender_address                  [u8; 32]
//!     vaa_keys                        u8 count, VaaKey...
//!
//! RedeliveryInstruction:
//!     payload_id = 2                  u8
//!     delivery_vaa_key                VaaKey
//!     target_chain                    u16
//!     new_requested_receiver_value    u256
//!     new_extra_receiver_value        u256
//!     new_encoded_execution_params    u32 length, bytes
//!     new_source_relay_provider       [u8; 32]
//!     new_sender_address              [u8; 32]
//! ```

use serde::{Deserialize, Serialize};
use wormhole_wire::{ByteCursor, Decode, Encode, Error, Writer};

use crate::consts::{DELIVERY_INSTRUCTION_PAYLOAD_ID, REDELIVERY_INSTRUCTION_PAYLOAD_ID};

mod delivery;
mod execution;
mod forward;
mod redelivery;
mod vaa_key;

pub use delivery::DeliveryInstruction;
pub use execution::{DeliveryOverride, ExecutionParameters};
pub use forward::ForwardFailure;
pub use redelivery::RedeliveryInstruction;
pub use vaa_key::VaaKey;

/// Either kind of instruction a relayer VAA can carry.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
pub enum RelayerPayload {
    Delivery(DeliveryInstruction),
    Redelivery(RedeliveryInstruction),
}

impl RelayerPayload {
    pub fn payload_id(&self) -> u8 {
        match self {
            RelayerPayload::Delivery(_) => DELIVERY_INSTRUCTION_PAYLOAD_ID,
            RelayerPayload::Redelivery(_) => REDELIVERY_INSTRUCTION_PAYLOAD_ID,
        }
    }
}

impl Decode for RelayerPayload {
    fn decode_at(c: &ByteCursor<'_>, offset: usize) -> Result<(Self, usize), Error> {
        // Peek at the payload id; the instruction decoders read it again themselves.
        let (id, _) = c.read_u8(offset)?;
        match id {
            DELIVERY_INSTRUCTION_PAYLOAD_ID => DeliveryInstruction::decode_at(c, offset)
                .map(|(d, next)| (RelayerPayload::Delivery(d), next)),
            REDELIVERY_INSTRUCTION_PAYLOAD_ID => RedeliveryInstruction::decode_at(c, offset)
                .map(|(r, next)| (RelayerPayload::Redelivery(r), next)),
            tag => Err(Error::InvalidVariant {
                what: "relayer payload id",
                tag,
            }),
        }
    }
}

impl Encode for RelayerPayload {
    fn encode_to(&self, w: &mut Writer) -> Result<(), Error> {
        match self {
            RelayerPayload::Delivery(d) => d.encode_to(w),
            RelayerPayload::Redelivery(r) => r.encode_to(w),
        }
    }
}

/// Reads a one byte payload id or struct version and checks it against `expected`.
pub(crate) fn read_tag(
    c: &ByteCursor<'_>,
    offset: usize,
    what: &'static str,
    expected: u8,
) -> Result<usize, Error> {
    let (found, offset) = c.read_u8(offset)?;
    if found != expected {
        return Err(Error::TagMismatch {
            what,
            expected,
            found,
        });
    }

    Ok(offset)
}
