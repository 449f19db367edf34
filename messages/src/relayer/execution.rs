use primitive_types::U256;
use serde::{Deserialize, Serialize};
use wormhole_wire::{ByteCursor, Decode, Encode, Error, Writer};

use crate::{
    consts::{DELIVERY_OVERRIDE_VERSION, EXECUTION_PARAMETERS_VERSION},
    relayer::read_tag,
};

/// Parameters for executing a delivery on an EVM target chain.
///
/// Carried opaquely inside a [`DeliveryInstruction`](super::DeliveryInstruction) as
/// `version:u8 = 1 | gas_limit:u32`.
#[derive(
    Serialize, Deserialize, Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
pub struct ExecutionParameters {
    pub gas_limit: u32,
}

impl Decode for ExecutionParameters {
    fn decode_at(c: &ByteCursor<'_>, offset: usize) -> Result<(Self, usize), Error> {
        let offset = read_tag(
            c,
            offset,
            "ExecutionParameters version",
            EXECUTION_PARAMETERS_VERSION,
        )?;
        let (gas_limit, offset) = c.read_u32(offset)?;

        Ok((ExecutionParameters { gas_limit }, offset))
    }
}

impl Encode for ExecutionParameters {
    fn encode_to(&self, w: &mut Writer) -> Result<(), Error> {
        w.put_u8(EXECUTION_PARAMETERS_VERSION);
        w.put_u32(self.gas_limit);
        Ok(())
    }
}

/// Values the relayer actually used for a delivery when they differ from the instruction, as
/// reported in a delivery event's `overrides_info`.
#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
pub struct DeliveryOverride {
    pub gas_limit: u32,
    #[cfg_attr(feature = "schemars", schemars(with = "String"))]
    pub maximum_refund: U256,
    #[cfg_attr(feature = "schemars", schemars(with = "String"))]
    pub receiver_value: U256,
    pub redelivery_hash: [u8; 32],
}

impl Decode for DeliveryOverride {
    fn decode_at(c: &ByteCursor<'_>, offset: usize) -> Result<(Self, usize), Error> {
        let offset = read_tag(
            c,
            offset,
            "DeliveryOverride version",
            DELIVERY_OVERRIDE_VERSION,
        )?;
        let (gas_limit, offset) = c.read_u32(offset)?;
        let (maximum_refund, offset) = c.read_u256(offset)?;
        let (receiver_value, offset) = c.read_u256(offset)?;
        let (redelivery_hash, offset) = c.read_bytes32(offset)?;

        Ok((
            DeliveryOverride {
                gas_limit,
                maximum_refund,
                receiver_value,
                redelivery_hash,
            },
            offset,
        ))
    }
}

impl Encode for DeliveryOverride {
    fn encode_to(&self, w: &mut Writer) -> Result<(), Error> {
        w.put_u8(DELIVERY_OVERRIDE_VERSION);
        w.put_u32(self.gas_limit);
        w.put_u256(&self.maximum_refund);
        w.put_u256(&self.receiver_value);
        w.put_bytes(&self.redelivery_hash);
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use hex_literal::hex;

    use super::*;

    #[test]
    fn execution_parameters() {
        let buf = hex!("01 0007a120");
        let params = ExecutionParameters { gas_limit: 500_000 };

        assert_eq!(params, ExecutionParameters::decode(&buf).unwrap());
        assert_eq!(&buf[..], &params.encode().unwrap());
    }

    #[test]
    fn execution_parameters_version() {
        assert_eq!(
            Err(Error::TagMismatch {
                what: "ExecutionParameters version",
                expected: 1,
                found: 0
            }),
            ExecutionParameters::decode(&hex!("00 0007a120"))
        );
    }

    #[test]
    fn execution_parameters_truncated() {
        assert!(matches!(
            ExecutionParameters::decode(&hex!("01 07a120")),
            Err(Error::OutOfBounds { .. })
        ));
    }

    #[test]
    fn delivery_override() {
        let buf = hex!(
            "01"
            "000186a0"
            "00000000000000000000000000000000000000000000000000000000000003e8"
            "0000000000000000000000000000000000000000000000000de0b6b3a7640000"
            "9d8f1b3c2a7e6054b4e1c0d9f8a7b6c5d4e3f2a1b0c9d8e7f6a5b4c3d2e1f0a9"
        );

        let ov = DeliveryOverride::decode(&buf).unwrap();
        assert_eq!(100_000, ov.gas_limit);
        assert_eq!(U256::from(1000u64), ov.maximum_refund);
        assert_eq!(U256::from(1_000_000_000_000_000_000u64), ov.receiver_value);
        assert_eq!(buf[69..], ov.redelivery_hash);
        assert_eq!(&buf[..], &ov.encode().unwrap());
    }

    #[test]
    fn delivery_override_trailing_data() {
        let mut buf = DeliveryOverride::default().encode().unwrap();
        buf.push(0);

        assert_eq!(
            Err(Error::LengthMismatch {
                consumed: 101,
                len: 102
            }),
            DeliveryOverride::decode(&buf)
        );
    }
}
