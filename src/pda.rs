use log::debug;
use solana_sdk::pubkey::{Pubkey, MAX_SEEDS, MAX_SEED_LEN};

use crate::codec::encode_le64;
use crate::errors::{VoteClientError, VoteResult};

/// Seed prefix of token metadata accounts
pub const METADATA_SEED: &[u8; 8] = b"metadata";

/// Finds the program address and bump for `seeds` under `program_id`.
///
/// Every seed must be at most 32 bytes and one seed slot is reserved for the
/// bump, so at most 15 seeds may be supplied.
pub fn derive_address_and_bump(seeds: &[&[u8]], program_id: &Pubkey) -> VoteResult<(Pubkey, u8)> {
    if seeds.len() >= MAX_SEEDS {
        return Err(VoteClientError::TooManySeeds(seeds.len()));
    }
    if let Some((index, seed)) = seeds
        .iter()
        .enumerate()
        .find(|(_, seed)| seed.len() > MAX_SEED_LEN)
    {
        return Err(VoteClientError::SeedTooLong {
            index,
            len: seed.len(),
            max: MAX_SEED_LEN,
        });
    }

    Pubkey::try_find_program_address(seeds, program_id)
        .ok_or(VoteClientError::DerivationFailed(*program_id))
}

pub fn derive_address(seeds: &[&[u8]], program_id: &Pubkey) -> VoteResult<Pubkey> {
    derive_address_and_bump(seeds, program_id).map(|(address, _bump)| address)
}

/// Per-NFT vote account: seeds `[mint, vote_id]`.
pub fn authority_address(mint: &Pubkey, vote_id: u64, program_id: &Pubkey) -> VoteResult<Pubkey> {
    let vote_seed = encode_le64(vote_id);
    let address = derive_address(&[mint.as_ref(), &vote_seed[..]], program_id)?;
    debug!("authority for mint {} vote {}: {}", mint, vote_id, address);
    Ok(address)
}

/// Collection-wide vote info account: seeds `[creator, vote_id]`.
pub fn vote_authority_address(
    creator: &Pubkey,
    vote_id: u64,
    program_id: &Pubkey,
) -> VoteResult<Pubkey> {
    let vote_seed = encode_le64(vote_id);
    let address = derive_address(&[creator.as_ref(), &vote_seed[..]], program_id)?;
    debug!("vote authority for creator {} vote {}: {}", creator, vote_id, address);
    Ok(address)
}

/// Proposal record lookup. The program stores the proposal in the account it
/// checks as the vote authority, so both share `[creator, vote_id]`.
pub fn proposal_address(creator: &Pubkey, vote_id: u64, program_id: &Pubkey) -> VoteResult<Pubkey> {
    vote_authority_address(creator, vote_id, program_id)
}

/// Token metadata account of `mint`, owned by the metadata program.
pub fn metadata_address(mint: &Pubkey, metadata_program_id: &Pubkey) -> VoteResult<Pubkey> {
    derive_address(
        &[
            &METADATA_SEED[..],
            metadata_program_id.as_ref(),
            mint.as_ref(),
        ],
        metadata_program_id,
    )
}
