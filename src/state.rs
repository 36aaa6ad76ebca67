use arrayref::{array_ref, array_refs};
use chrono::{DateTime, TimeZone, Utc};
use solana_sdk::pubkey::Pubkey;

use crate::codec::{decode_le, decode_le_u32};
use crate::errors::{VoteClientError, VoteResult};

/// A single NFT's vote, written by the program on cast.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VoteRecord {
    /// Mint of the NFT used to vote
    pub mint: Pubkey,
    /// Verified collection creator of the NFT
    pub creator: Pubkey,
    /// Wallet that signed the vote
    pub voter: Pubkey,
    /// Proposal the vote belongs to
    pub vote_id: u64,
    /// Unix timestamp of the cast, truncated to 32 bits by the program
    pub voted_at: u32,
    /// Chosen option
    pub option: u64,
}

impl VoteRecord {
    pub const LEN: usize = 32 + // mint
        32 + // creator
        32 + // voter
        8 + // vote_id
        4 + // voted_at
        8; // option

    pub const CREATOR_OFFSET: usize = 32;
    pub const VOTE_ID_OFFSET: usize = 96;
    pub const OPTION_OFFSET: usize = 108;

    pub fn decode(data: &[u8]) -> VoteResult<Self> {
        if data.len() != Self::LEN {
            return Err(VoteClientError::InvalidRecordSize(data.len()));
        }
        let fixed = array_ref![data, 0, VoteRecord::LEN];
        let (mint, creator, voter, vote_id, voted_at, _) = array_refs![fixed, 32, 32, 32, 8, 4, 8];

        Ok(Self {
            mint: Pubkey::new_from_array(*mint),
            creator: Pubkey::new_from_array(*creator),
            voter: Pubkey::new_from_array(*voter),
            vote_id: u64::from_le_bytes(*vote_id),
            voted_at: decode_le_u32(voted_at),
            option: decode_le(&data[Self::OPTION_OFFSET..])?,
        })
    }

    pub fn voted_at_utc(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_opt(i64::from(self.voted_at), 0).single()
    }
}

/// A proposal created under a collection creator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProposalRecord {
    /// Off-chain descriptor URL with the zero padding removed
    pub url: String,
    pub proposal_id: u64,
    /// Unix timestamp of creation, truncated to 32 bits by the program
    pub created_at: u32,
    /// Collection creator the proposal is scoped to
    pub creator: Pubkey,
}

impl ProposalRecord {
    pub const URL_LEN: usize = 100;

    pub const LEN: usize = Self::URL_LEN + // url
        8 + // proposal_id
        4 + // reserved
        4 + // created_at
        32; // creator

    pub const CREATOR_OFFSET: usize = 116;

    pub fn decode(data: &[u8]) -> VoteResult<Self> {
        if data.len() != Self::LEN {
            return Err(VoteClientError::InvalidRecordSize(data.len()));
        }
        let fixed = array_ref![data, 0, ProposalRecord::LEN];
        let (url, proposal_id, _reserved, created_at, creator) =
            array_refs![fixed, 100, 8, 4, 4, 32];

        Ok(Self {
            url: url.iter().filter(|&&b| b != 0).map(|&b| char::from(b)).collect(),
            proposal_id: u64::from_le_bytes(*proposal_id),
            created_at: decode_le_u32(created_at),
            creator: Pubkey::new_from_array(*creator),
        })
    }

    pub fn created_at_utc(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_opt(i64::from(self.created_at), 0).single()
    }
}

/// Any account owned by the vote program. The layouts carry no type tag, so
/// the data length is the only discriminator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AccountRecord {
    Vote(VoteRecord),
    Proposal(ProposalRecord),
}

impl AccountRecord {
    pub fn decode(data: &[u8]) -> VoteResult<Self> {
        match data.len() {
            VoteRecord::LEN => VoteRecord::decode(data).map(Self::Vote),
            ProposalRecord::LEN => ProposalRecord::decode(data).map(Self::Proposal),
            len => Err(VoteClientError::InvalidRecordSize(len)),
        }
    }
}
