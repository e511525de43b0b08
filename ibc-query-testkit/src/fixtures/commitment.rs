use ibc_query_types::commitment::PacketCommitment;
use ibc_query_types::identifiers::Sequence;
use sha2::{Digest, Sha256};

/// Returns the commitment of a dummy packet carrying `data`, for testing
/// purposes only!
///
/// Hashes the packet's timeout timestamp, timeout height and data hash the
/// way ICS-04 commits to a packet.
pub fn dummy_packet_commitment(sequence: Sequence, data: &[u8]) -> PacketCommitment {
    let timeout_timestamp: u64 = 0;
    let timeout_revision_number: u64 = 0;
    let timeout_revision_height = 1000 + sequence.value();

    let mut hash_input = timeout_timestamp.to_be_bytes().to_vec();
    hash_input.extend_from_slice(&timeout_revision_number.to_be_bytes());
    hash_input.extend_from_slice(&timeout_revision_height.to_be_bytes());
    hash_input.extend_from_slice(&Sha256::digest(data));

    Sha256::digest(&hash_input).to_vec().into()
}
