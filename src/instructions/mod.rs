pub mod cast_vote;
pub mod create_vote;

use crate::codec::{encode_le64, LE64_LEN};

// Re-export instruction builders
pub use cast_vote::*;
pub use create_vote::*;

/// Selector byte at the start of every vote program instruction
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VoteInstruction {
    CastVote = 1,
    CreateVote = 2,
}

impl VoteInstruction {
    /// Fixed payload size: opcode + vote id + one 64-bit argument.
    pub const DATA_LEN: usize = 1 + LE64_LEN + LE64_LEN;

    pub fn opcode(self) -> u8 {
        self as u8
    }
}

/// Opcode followed by the little-endian vote id and the raw argument bytes.
pub(crate) fn encode_payload(instruction: VoteInstruction, vote_id: u64, argument: &[u8]) -> Vec<u8> {
    let mut data = Vec::with_capacity(1 + LE64_LEN + argument.len());
    data.push(instruction.opcode());
    data.extend_from_slice(&encode_le64(vote_id));
    data.extend_from_slice(argument);
    data
}
