use primitive_types::U256;
use serde::{Deserialize, Serialize};
use wormhole_wire::{ByteCursor, Decode, Encode, Error, LengthWidth, Writer};

use crate::{
    consts::{DELIVERY_INSTRUCTION_PAYLOAD_ID, MAX_VAA_KEYS},
    relayer::{read_tag, ExecutionParameters, VaaKey},
    Address,
};

/// Instructs a relay provider to deliver `payload`, along with the VAAs named by `vaa_keys`, to
/// `target_address` on `target_chain`.
#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
pub struct DeliveryInstruction {
    pub target_chain: u16,
    pub target_address: Address,
    #[serde(with = "serde_bytes")]
    #[cfg_attr(feature = "schemars", schemars(with = "Vec<u8>"))]
    pub payload: Vec<u8>,
    #[cfg_attr(feature = "schemars", schemars(with = "String"))]
    pub requested_receiver_value: U256,
    #[cfg_attr(feature = "schemars", schemars(with = "String"))]
    pub extra_receiver_value: U256,
    pub execution_environment: u8,
    #[serde(with = "serde_bytes")]
    #[cfg_attr(feature = "schemars", schemars(with = "Vec<u8>"))]
    pub encoded_execution_parameters: Vec<u8>,
    pub source_relay_provider: Address,
    pub sender_address: Address,
    pub vaa_keys: Vec<VaaKey>,
}

impl DeliveryInstruction {
    /// Decodes `encoded_execution_parameters` as EVM execution parameters.
    pub fn execution_parameters(&self) -> Result<ExecutionParameters, Error> {
        ExecutionParameters::decode(&self.encoded_execution_parameters)
    }
}

impl Decode for DeliveryInstruction {
    fn decode_at(c: &ByteCursor<'_>, offset: usize) -> Result<(Self, usize), Error> {
        let offset = read_tag(
            c,
            offset,
            "DeliveryInstruction payload id",
            DELIVERY_INSTRUCTION_PAYLOAD_ID,
        )?;
        let (target_chain, offset) = c.read_u16(offset)?;
        let (target_address, offset) = c.read_bytes32(offset)?;
        let (payload, offset) = c.read_length_prefixed_bytes(offset, LengthWidth::U32)?;
        let (requested_receiver_value, offset) = c.read_u256(offset)?;
        let (extra_receiver_value, offset) = c.read_u256(offset)?;
        let (execution_environment, offset) = c.read_u8(offset)?;
        let (encoded_execution_parameters, offset) =
            c.read_length_prefixed_bytes(offset, LengthWidth::U32)?;
        // Kept as raw bytes, but the version has to be one we understand.
        let _ = ExecutionParameters::decode(encoded_execution_parameters)?;
        let (source_relay_provider, offset) = c.read_bytes32(offset)?;
        let (sender_address, offset) = c.read_bytes32(offset)?;

        let (count, mut offset) = c.read_u8(offset)?;
        let mut vaa_keys = Vec::with_capacity(usize::from(count));
        for _ in 0..count {
            let (key, next) = VaaKey::decode_at(c, offset)?;
            vaa_keys.push(key);
            offset = next;
        }

        Ok((
            DeliveryInstruction {
                target_chain,
                target_address: Address(target_address),
                payload: payload.to_vec(),
                requested_receiver_value,
                extra_receiver_value,
                execution_environment,
                encoded_execution_parameters: encoded_execution_parameters.to_vec(),
                source_relay_provider: Address(source_relay_provider),
                sender_address: Address(sender_address),
                vaa_keys,
            },
            offset,
        ))
    }
}

impl Encode for DeliveryInstruction {
    fn encode_to(&self, w: &mut Writer) -> Result<(), Error> {
        if self.vaa_keys.len() > MAX_VAA_KEYS {
            return Err(Error::SequenceTooLarge {
                what: "vaa_keys",
                len: self.vaa_keys.len(),
                max: MAX_VAA_KEYS,
            });
        }

        w.put_u8(DELIVERY_INSTRUCTION_PAYLOAD_ID);
        w.put_u16(self.target_chain);
        w.put_bytes(&self.target_address.0);
        w.put_length_prefixed("payload", &self.payload, LengthWidth::U32)?;
        w.put_u256(&self.requested_receiver_value);
        w.put_u256(&self.extra_receiver_value);
        w.put_u8(self.execution_environment);
        w.put_length_prefixed(
            "encoded_execution_parameters",
            &self.encoded_execution_parameters,
            LengthWidth::U32,
        )?;
        w.put_bytes(&self.source_relay_provider.0);
        w.put_bytes(&self.sender_address.0);
        w.put_length("vaa_keys", self.vaa_keys.len(), LengthWidth::U8)?;
        for key in &self.vaa_keys {
            key.encode_to(w)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use hex_literal::hex;

    use super::*;

    fn instruction() -> DeliveryInstruction {
        DeliveryInstruction {
            target_chain: 2,
            target_address: Address(hex!(
                "000000000000000000000000a5b6c7d8e9f0a1b2c3d4e5f60718293a4b5c6d7e"
            )),
            payload: b"Hello".to_vec(),
            requested_receiver_value: U256::from(1000u64),
            extra_receiver_value: U256::zero(),
            execution_environment: 1,
            encoded_execution_parameters: hex!("01 0007a120").to_vec(),
            source_relay_provider: Address([0x11; 32]),
            sender_address: Address([0x22; 32]),
            vaa_keys: vec![VaaKey::EmitterSequence {
                chain: 5,
                emitter_address: Address([0; 32]),
                sequence: 42,
            }],
        }
    }

    #[test]
    fn encoding() {
        let expected = hex!(
            // payload id, target chain, target address
            "01 0002 000000000000000000000000a5b6c7d8e9f0a1b2c3d4e5f60718293a4b5c6d7e"
            // payload
            "00000005 48656c6c6f"
            // requested and extra receiver value
            "00000000000000000000000000000000000000000000000000000000000003e8"
            "0000000000000000000000000000000000000000000000000000000000000000"
            // execution environment, execution parameters
            "01 00000005 010007a120"
            // source relay provider, sender
            "1111111111111111111111111111111111111111111111111111111111111111"
            "2222222222222222222222222222222222222222222222222222222222222222"
            // vaa keys
            "01 01 00 0005 0000000000000000000000000000000000000000000000000000000000000000"
            "000000000000002a"
        );

        let ins = instruction();
        assert_eq!(&expected[..], &ins.encode().unwrap());
        assert_eq!(ins, DeliveryInstruction::decode(&expected).unwrap());
    }

    #[test]
    fn execution_parameters() {
        assert_eq!(
            ExecutionParameters { gas_limit: 500_000 },
            instruction().execution_parameters().unwrap()
        );

        let ins = DeliveryInstruction {
            encoded_execution_parameters: Vec::new(),
            ..instruction()
        };
        assert!(matches!(
            ins.execution_parameters(),
            Err(Error::OutOfBounds { .. })
        ));
    }

    #[test]
    fn no_vaa_keys() {
        let ins = DeliveryInstruction {
            vaa_keys: Vec::new(),
            payload: Vec::new(),
            ..instruction()
        };

        let buf = ins.encode().unwrap();
        assert_eq!(Some(&0), buf.last());
        assert_eq!(ins, DeliveryInstruction::decode(&buf).unwrap());
    }

    #[test]
    fn wrong_payload_id() {
        let mut buf = instruction().encode().unwrap();
        buf[0] = 2;

        assert_eq!(
            Err(Error::TagMismatch {
                what: "DeliveryInstruction payload id",
                expected: 1,
                found: 2
            }),
            DeliveryInstruction::decode(&buf)
        );
    }

    #[test]
    fn trailing_byte() {
        let mut buf = instruction().encode().unwrap();
        let len = buf.len();
        buf.push(0);

        assert_eq!(
            Err(Error::LengthMismatch {
                consumed: len,
                len: len + 1
            }),
            DeliveryInstruction::decode(&buf)
        );
    }

    #[test]
    fn truncated() {
        let buf = instruction().encode().unwrap();
        for end in 0..buf.len() {
            assert!(
                matches!(
                    DeliveryInstruction::decode(&buf[..end]),
                    Err(Error::OutOfBounds { .. })
                ),
                "prefix of {end} bytes decoded"
            );
        }
    }

    #[test]
    fn payload_length_past_end() {
        let mut buf = instruction().encode().unwrap();
        // Claim a payload far larger than the input.
        buf[35..39].copy_from_slice(&[0xff, 0xff, 0xff, 0xff]);

        assert!(matches!(
            DeliveryInstruction::decode(&buf),
            Err(Error::OutOfBounds { .. })
        ));
    }

    #[test]
    fn unknown_execution_parameters_version() {
        for version in [0, 7] {
            let ins = DeliveryInstruction {
                encoded_execution_parameters: vec![version, 0xde, 0xad, 0xbe, 0xef],
                ..instruction()
            };
            let buf = ins.encode().unwrap();

            assert_eq!(
                Err(Error::TagMismatch {
                    what: "ExecutionParameters version",
                    expected: 1,
                    found: version
                }),
                DeliveryInstruction::decode(&buf)
            );
        }
    }

    #[test]
    fn malformed_execution_parameters() {
        let empty = DeliveryInstruction {
            encoded_execution_parameters: Vec::new(),
            ..instruction()
        };
        assert!(matches!(
            DeliveryInstruction::decode(&empty.encode().unwrap()),
            Err(Error::OutOfBounds { .. })
        ));

        let long = DeliveryInstruction {
            encoded_execution_parameters: hex!("01 0007a120 00").to_vec(),
            ..instruction()
        };
        assert_eq!(
            Err(Error::LengthMismatch {
                consumed: 5,
                len: 6
            }),
            DeliveryInstruction::decode(&long.encode().unwrap())
        );
    }

    #[test]
    fn too_many_vaa_keys() {
        let ins = DeliveryInstruction {
            vaa_keys: vec![VaaKey::VaaHash { hash: [0; 32] }; MAX_VAA_KEYS + 1],
            ..instruction()
        };

        assert_eq!(
            Err(Error::SequenceTooLarge {
                what: "vaa_keys",
                len: 256,
                max: 255
            }),
            ins.encode()
        );
    }

    #[test]
    fn max_vaa_keys() {
        let ins = DeliveryInstruction {
            vaa_keys: vec![VaaKey::VaaHash { hash: [7; 32] }; MAX_VAA_KEYS],
            ..instruction()
        };

        let buf = ins.encode().unwrap();
        assert_eq!(ins, DeliveryInstruction::decode(&buf).unwrap());
    }

    #[test]
    fn json() {
        let ins = instruction();
        let encoded = serde_json::to_vec(&ins).unwrap();
        assert_eq!(ins, serde_json::from_slice(&encoded).unwrap());
    }
}
