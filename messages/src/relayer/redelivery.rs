use primitive_types::U256;
use serde::{Deserialize, Serialize};
use wormhole_wire::{ByteCursor, Decode, Encode, Error, LengthWidth, Writer};

use crate::{
    consts::REDELIVERY_INSTRUCTION_PAYLOAD_ID,
    relayer::{read_tag, ExecutionParameters, VaaKey},
    Address,
};

/// Asks for a previously published delivery, named by `delivery_vaa_key`, to be attempted again
/// with new funding and execution parameters.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
pub struct RedeliveryInstruction {
    pub delivery_vaa_key: VaaKey,
    pub target_chain: u16,
    #[cfg_attr(feature = "schemars", schemars(with = "String"))]
    pub new_requested_receiver_value: U256,
    #[cfg_attr(feature = "schemars", schemars(with = "String"))]
    pub new_extra_receiver_value: U256,
    #[serde(with = "serde_bytes")]
    #[cfg_attr(feature = "schemars", schemars(with = "Vec<u8>"))]
    pub new_encoded_execution_parameters: Vec<u8>,
    pub new_source_relay_provider: Address,
    pub new_sender_address: Address,
}

impl RedeliveryInstruction {
    pub fn execution_parameters(&self) -> Result<ExecutionParameters, Error> {
        ExecutionParameters::decode(&self.new_encoded_execution_parameters)
    }
}

impl Decode for RedeliveryInstruction {
    fn decode_at(c: &ByteCursor<'_>, offset: usize) -> Result<(Self, usize), Error> {
        let offset = read_tag(
            c,
            offset,
            "RedeliveryInstruction payload id",
            REDELIVERY_INSTRUCTION_PAYLOAD_ID,
        )?;
        let (delivery_vaa_key, offset) = VaaKey::decode_at(c, offset)?;
        let (target_chain, offset) = c.read_u16(offset)?;
        let (new_requested_receiver_value, offset) = c.read_u256(offset)?;
        let (new_extra_receiver_value, offset) = c.read_u256(offset)?;
        let (new_encoded_execution_parameters, offset) =
            c.read_length_prefixed_bytes(offset, LengthWidth::U32)?;
        let _ = ExecutionParameters::decode(new_encoded_execution_parameters)?;
        let (new_source_relay_provider, offset) = c.read_bytes32(offset)?;
        let (new_sender_address, offset) = c.read_bytes32(offset)?;

        Ok((
            RedeliveryInstruction {
                delivery_vaa_key,
                target_chain,
                new_requested_receiver_value,
                new_extra_receiver_value,
                new_encoded_execution_parameters: new_encoded_execution_parameters.to_vec(),
                new_source_relay_provider: Address(new_source_relay_provider),
                new_sender_address: Address(new_sender_address),
            },
            offset,
        ))
    }
}

impl Encode for RedeliveryInstruction {
    fn encode_to(&self, w: &mut Writer) -> Result<(), Error> {
        w.put_u8(REDELIVERY_INSTRUCTION_PAYLOAD_ID);
        self.delivery_vaa_key.encode_to(w)?;
        w.put_u16(self.target_chain);
        w.put_u256(&self.new_requested_receiver_value);
        w.put_u256(&self.new_extra_receiver_value);
        w.put_length_prefixed(
            "new_encoded_execution_parameters",
            &self.new_encoded_execution_parameters,
            LengthWidth::U32,
        )?;
        w.put_bytes(&self.new_source_relay_provider.0);
        w.put_bytes(&self.new_sender_address.0);
        Ok(())
    }
}
