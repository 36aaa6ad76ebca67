use log::debug;
use solana_sdk::instruction::{AccountMeta, Instruction};
use solana_sdk::pubkey::Pubkey;
use solana_sdk::system_program;

use crate::codec::encode_le64;
use crate::config::ProgramIds;
use crate::errors::{VoteClientError, VoteResult};
use crate::instructions::{encode_payload, VoteInstruction};
use crate::pda::{metadata_address, proposal_address};
use crate::state::ProposalRecord;

/// What follows the vote id in a create-vote payload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CreateVotePayload {
    /// 8-byte little-endian parameter, giving the fixed 17-byte payload
    Parameter(u64),
    /// Raw descriptor URL, stored by the program as the proposal's URL field
    Uri(String),
}

#[derive(Clone, Debug)]
pub struct CreateVoteArgs {
    pub programs: ProgramIds,
    /// Fee payer and NFT owner
    pub payer: Pubkey,
    /// NFT proving membership of the collection
    pub mint: Pubkey,
    pub creator: Pubkey,
    pub token_account: Pubkey,
    pub vote_id: u64,
    pub payload: CreateVotePayload,
}

pub fn create_vote_data(vote_id: u64, payload: &CreateVotePayload) -> VoteResult<Vec<u8>> {
    match payload {
        CreateVotePayload::Parameter(parameter) => Ok(encode_payload(
            VoteInstruction::CreateVote,
            vote_id,
            &encode_le64(*parameter),
        )),
        CreateVotePayload::Uri(uri) => {
            if uri.len() >= ProposalRecord::URL_LEN {
                return Err(VoteClientError::UriTooLong(uri.len()));
            }
            Ok(encode_payload(VoteInstruction::CreateVote, vote_id, uri.as_bytes()))
        }
    }
}

pub fn create_vote(args: &CreateVoteArgs) -> VoteResult<Instruction> {
    let data = create_vote_data(args.vote_id, &args.payload)?;
    let metadata = metadata_address(&args.mint, &args.programs.metadata)?;
    let proposal = proposal_address(&args.creator, args.vote_id, &args.programs.vote)?;

    debug!(
        "create vote {} under creator {} (proposal {})",
        args.vote_id, args.creator, proposal
    );

    Ok(Instruction {
        program_id: args.programs.vote,
        accounts: vec![
            AccountMeta::new(args.payer, false),
            AccountMeta::new_readonly(args.mint, false),
            AccountMeta::new_readonly(args.token_account, false),
            AccountMeta::new_readonly(metadata, false),
            AccountMeta::new(proposal, false),
            AccountMeta::new_readonly(system_program::id(), false),
        ],
        data,
    })
}
