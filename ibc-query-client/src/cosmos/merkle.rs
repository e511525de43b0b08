//! Conversion of Tendermint proof operations into ICS-23 Merkle proofs.

use ibc_proto::ibc::core::commitment::v1::MerkleProof as RawMerkleProof;
use ibc_proto::ics23::CommitmentProof;
use prost::{DecodeError, Message};
use tendermint::merkle::proof::ProofOps;

/// Converts the proof operations of an ABCI query response, one ICS-23
/// commitment proof per operation, into a protobuf encoded `MerkleProof`.
pub fn convert_tm_to_ics_merkle_proof(proof_ops: &ProofOps) -> Result<Vec<u8>, DecodeError> {
    let proofs = proof_ops
        .ops
        .iter()
        .map(|op| CommitmentProof::decode(op.data.as_slice()))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(RawMerkleProof { proofs }.encode_to_vec())
}

#[cfg(test)]
mod tests {
    use ibc_proto::ics23::commitment_proof::Proof;
    use ibc_proto::ics23::ExistenceProof;
    use tendermint::merkle::proof::ProofOp;

    use super::*;

    fn existence_op(field_type: &str, key: &[u8], value: &[u8]) -> (ProofOp, CommitmentProof) {
        let proof = CommitmentProof {
            proof: Some(Proof::Exist(ExistenceProof {
                key: key.to_vec(),
                value: value.to_vec(),
                leaf: None,
                path: vec![],
            })),
        };

        let op = ProofOp {
            field_type: field_type.to_string(),
            key: key.to_vec(),
            data: proof.encode_to_vec(),
        };

        (op, proof)
    }

    #[test]
    fn converts_every_op_in_order() {
        let (iavl_op, iavl_proof) = existence_op("ics23:iavl", b"nextSequenceRecv", &[0, 42]);
        let (simple_op, simple_proof) = existence_op("ics23:simple", b"ibc", &[7; 32]);

        let bytes = convert_tm_to_ics_merkle_proof(&ProofOps {
            ops: vec![iavl_op, simple_op],
        })
        .expect("valid proof ops");

        let merkle_proof = RawMerkleProof::decode(bytes.as_slice()).expect("valid merkle proof");
        assert_eq!(merkle_proof.proofs, vec![iavl_proof, simple_proof]);
    }

    #[test]
    fn malformed_op_is_rejected() {
        let op = ProofOp {
            field_type: "ics23:iavl".to_string(),
            key: b"key".to_vec(),
            data: vec![0xff, 0xff, 0xff],
        };

        assert!(convert_tm_to_ics_merkle_proof(&ProofOps { ops: vec![op] }).is_err());
    }
}
