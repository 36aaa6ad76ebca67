use log::debug;
use solana_sdk::instruction::{AccountMeta, Instruction};
use solana_sdk::pubkey::Pubkey;
use solana_sdk::system_program;

use crate::codec::encode_le64;
use crate::config::ProgramIds;
use crate::errors::VoteResult;
use crate::instructions::{encode_payload, VoteInstruction};
use crate::pda::{authority_address, metadata_address, vote_authority_address};

/// Everything needed to build a cast-vote instruction once the mint's token
/// holder account has been resolved.
#[derive(Clone, Debug)]
pub struct CastVoteArgs {
    pub programs: ProgramIds,
    /// Fee payer and NFT owner
    pub payer: Pubkey,
    /// NFT mint casting the vote
    pub mint: Pubkey,
    /// Verified collection creator the proposal lives under
    pub creator: Pubkey,
    /// Token account currently holding the NFT
    pub token_account: Pubkey,
    pub vote_id: u64,
    pub option: u64,
}

/// `[1, vote_id (le64), option (le64)]`
pub fn cast_vote_data(vote_id: u64, option: u64) -> Vec<u8> {
    encode_payload(VoteInstruction::CastVote, vote_id, &encode_le64(option))
}

pub fn cast_vote(args: &CastVoteArgs) -> VoteResult<Instruction> {
    let metadata = metadata_address(&args.mint, &args.programs.metadata)?;
    let authority = authority_address(&args.mint, args.vote_id, &args.programs.vote)?;
    let vote_authority = vote_authority_address(&args.creator, args.vote_id, &args.programs.vote)?;

    debug!(
        "cast vote {} option {} with mint {} (metadata {}, authority {})",
        args.vote_id, args.option, args.mint, metadata, authority
    );

    Ok(Instruction {
        program_id: args.programs.vote,
        accounts: vec![
            AccountMeta::new(args.payer, false),
            AccountMeta::new_readonly(args.mint, false),
            AccountMeta::new_readonly(args.token_account, false),
            AccountMeta::new_readonly(metadata, false),
            AccountMeta::new(authority, false),
            AccountMeta::new_readonly(system_program::id(), false),
            AccountMeta::new_readonly(vote_authority, false),
        ],
        data: cast_vote_data(args.vote_id, args.option),
    })
}
