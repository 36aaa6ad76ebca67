#![allow(dead_code)]

use borsh::BorshSerialize;
use mpl_token_metadata::accounts::Metadata;
use mpl_token_metadata::types::{Creator, Key};
use solana_sdk::pubkey::Pubkey;

/// Raw vote account bytes, laid out the way the program writes them.
pub fn vote_record_bytes(
    mint: &Pubkey,
    creator: &Pubkey,
    voter: &Pubkey,
    vote_id: u64,
    voted_at: u32,
    option: u64,
) -> Vec<u8> {
    let mut data = Vec::with_capacity(116);
    data.extend_from_slice(mint.as_ref());
    data.extend_from_slice(creator.as_ref());
    data.extend_from_slice(voter.as_ref());
    data.extend_from_slice(&vote_id.to_le_bytes());
    data.extend_from_slice(&voted_at.to_le_bytes());
    data.extend_from_slice(&option.to_le_bytes());
    data
}

/// Raw proposal account bytes with `url` zero padded to 100 bytes.
pub fn proposal_record_bytes(url: &str, proposal_id: u64, created_at: u32, creator: &Pubkey) -> Vec<u8> {
    let mut data = vec![0u8; 148];
    data[..url.len()].copy_from_slice(url.as_bytes());
    data[100..108].copy_from_slice(&proposal_id.to_le_bytes());
    data[112..116].copy_from_slice(&created_at.to_le_bytes());
    data[116..148].copy_from_slice(creator.as_ref());
    data
}

/// Borsh-encoded token metadata account for `mint`, with on-chain zero padding
/// on the name and uri.
pub fn metadata_bytes(mint: &Pubkey, creator: &Pubkey, verified: bool, uri: &str) -> Vec<u8> {
    let metadata = Metadata {
        key: Key::MetadataV1,
        update_authority: Pubkey::new_unique(),
        mint: *mint,
        name: zero_padded("Degen #12", 32),
        symbol: zero_padded("DGN", 10),
        uri: zero_padded(uri, 200),
        seller_fee_basis_points: 500,
        creators: Some(vec![Creator {
            address: *creator,
            verified,
            share: 100,
        }]),
        primary_sale_happened: true,
        is_mutable: true,
        edition_nonce: Some(255),
        token_standard: None,
        collection: None,
        uses: None,
        collection_details: None,
        programmable_config: None,
    };
    metadata.try_to_vec().unwrap()
}

fn zero_padded(value: &str, len: usize) -> String {
    let mut padded = value.to_string();
    padded.extend(std::iter::repeat('\0').take(len.saturating_sub(value.len())));
    padded
}
