use borsh::BorshDeserialize;
use futures::future::join_all;
use log::warn;
use mpl_token_metadata::accounts::Metadata;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::pubkey::Pubkey;

use crate::errors::{VoteClientError, VoteResult};
use crate::pda::metadata_address;

/// Off-chain JSON of an NFT, as far as vote listings need it.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
pub struct NftStorageData {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
}

/// One selectable answer of a proposal
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct VoteOption {
    pub label: String,
    pub value: u64,
    #[serde(default)]
    pub onchain_value: Option<u64>,
}

/// Off-chain proposal document referenced by a proposal record's URL.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProposalDescriptor {
    pub prompt: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub proposed_by: Option<String>,
    #[serde(default)]
    pub proposed_by_nft_mint_address: Option<String>,
    #[serde(default)]
    pub document_proposal_uri: Option<String>,
    #[serde(default)]
    pub total_votes_available: Option<u64>,
    #[serde(default)]
    pub vote_options: Vec<VoteOption>,
    #[serde(default)]
    pub proposal_date: Option<String>,
    #[serde(default)]
    pub proposal_end_date: Option<String>,
}

impl ProposalDescriptor {
    /// Label of the option recorded on chain as `option`.
    pub fn option_label(&self, option: u64) -> Option<&str> {
        self.vote_options
            .iter()
            .find(|vote_option| vote_option.onchain_value.unwrap_or(vote_option.value) == option)
            .map(|vote_option| vote_option.label.as_str())
    }
}

/// Result of one item of a batched lookup, keyed by the mint it was issued
/// for. Batches complete in any order.
#[derive(Debug)]
pub struct MintLookup<T> {
    pub mint: Pubkey,
    pub result: VoteResult<T>,
}

pub fn decode_metadata(data: &[u8]) -> VoteResult<Metadata> {
    let mut data = data;
    Ok(Metadata::deserialize(&mut data)?)
}

/// Metadata strings are zero padded to their maximum length on chain.
pub fn metadata_uri(metadata: &Metadata) -> &str {
    metadata.uri.trim_end_matches('\0')
}

pub fn has_verified_creator(metadata: &Metadata, creator: &Pubkey) -> bool {
    metadata
        .creators
        .as_ref()
        .map(|creators| {
            creators
                .iter()
                .any(|c| c.verified && c.address == *creator)
        })
        .unwrap_or(false)
}

pub async fn fetch_mint_metadata(
    rpc: &RpcClient,
    mint: &Pubkey,
    metadata_program_id: &Pubkey,
) -> VoteResult<Metadata> {
    let address = metadata_address(mint, metadata_program_id)?;
    let account = rpc
        .get_account_with_commitment(&address, rpc.commitment())
        .await?
        .value
        .ok_or(VoteClientError::AccountNotFound(address))?;
    decode_metadata(&account.data)
}

/// Plain GET of a JSON document.
pub async fn fetch_storage<T: DeserializeOwned>(http: &reqwest::Client, uri: &str) -> VoteResult<T> {
    let response = http.get(uri).send().await?.error_for_status()?;
    Ok(response.json::<T>().await?)
}

pub async fn fetch_nft_storage(
    rpc: &RpcClient,
    http: &reqwest::Client,
    mint: &Pubkey,
    metadata_program_id: &Pubkey,
) -> VoteResult<NftStorageData> {
    let metadata = fetch_mint_metadata(rpc, mint, metadata_program_id).await?;
    fetch_storage(http, metadata_uri(&metadata)).await
}

/// Looks up the off-chain data of every mint concurrently. A failed item is
/// reported in its own slot and never aborts the rest of the batch.
pub async fn lookup_storage_batch(
    rpc: &RpcClient,
    http: &reqwest::Client,
    mints: &[Pubkey],
    metadata_program_id: &Pubkey,
) -> Vec<MintLookup<NftStorageData>> {
    let lookups = mints.iter().map(|mint| async move {
        let result = fetch_nft_storage(rpc, http, mint, metadata_program_id).await;
        if let Err(err) = &result {
            warn!("no metadata available for {}: {}", mint, err);
        }
        MintLookup { mint: *mint, result }
    });
    join_all(lookups).await
}

/// Finds the successful lookup for `mint`, if any.
pub fn find_lookup<'a, T>(lookups: &'a [MintLookup<T>], mint: &Pubkey) -> Option<&'a T> {
    lookups
        .iter()
        .find(|lookup| lookup.mint == *mint)
        .and_then(|lookup| lookup.result.as_ref().ok())
}
