use std::str::FromStr;
use std::time::Duration;

use futures::future::join_all;
use log::{info, warn};
use mpl_token_metadata::accounts::Metadata;
use solana_account_decoder::{UiAccountData, UiAccountEncoding};
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_client::rpc_config::{
    RpcAccountInfoConfig, RpcProgramAccountsConfig, RpcSendTransactionConfig,
};
use solana_client::rpc_filter::{Memcmp, RpcFilterType};
use solana_client::rpc_request::TokenAccountsFilter;
use solana_client::rpc_response::RpcKeyedAccount;
use solana_program::program_pack::Pack;
use solana_sdk::account::Account;
use solana_sdk::hash::Hash;
use solana_sdk::instruction::Instruction;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::{Keypair, Signature, Signer};
use solana_sdk::transaction::Transaction;
use spl_token::state::Account as TokenAccount;
use tokio::time::sleep;

use crate::codec::encode_le64;
use crate::config::{ProgramIds, VoteConfig};
use crate::errors::{VoteClientError, VoteResult};
use crate::instructions::{
    cast_vote, create_vote, CastVoteArgs, CreateVoteArgs, CreateVotePayload,
};
use crate::metadata::{
    fetch_mint_metadata, fetch_storage, has_verified_creator, lookup_storage_batch, metadata_uri,
    MintLookup, NftStorageData, ProposalDescriptor,
};
use crate::pda::proposal_address;
use crate::state::{ProposalRecord, VoteRecord};
use crate::submit::{
    chunk_instructions, submit_concurrent, submit_sequential, ChunkOutcome, SubmissionMode,
    MAX_INSTRUCTIONS_PER_TRANSACTION,
};

const CONFIRM_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// An NFT in a wallet that belongs to the voting collection.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WalletNft {
    pub mint: Pubkey,
    pub token_account: Pubkey,
    /// On-chain metadata name
    pub name: String,
    pub uri: String,
    /// Off-chain JSON at `uri`; `None` when it could not be fetched
    pub storage: Option<NftStorageData>,
}

/// Connection, payer and program ids for every vote operation.
///
/// All ledger state a call needs is reached through this context; nothing is
/// held at process scope.
pub struct VoteClient {
    rpc: RpcClient,
    http: reqwest::Client,
    payer: Keypair,
    programs: ProgramIds,
    skip_preflight: bool,
}

impl VoteClient {
    pub fn new(rpc: RpcClient, payer: Keypair, programs: ProgramIds) -> Self {
        Self {
            rpc,
            http: reqwest::Client::new(),
            payer,
            programs,
            skip_preflight: true,
        }
    }

    pub fn from_config(config: &VoteConfig) -> VoteResult<Self> {
        let payer = config.load_payer()?;
        let rpc = RpcClient::new_with_commitment(config.json_rpc_url.clone(), config.commitment);
        let mut client = Self::new(rpc, payer, config.programs);
        client.skip_preflight = config.skip_preflight;
        Ok(client)
    }

    /// Builds a client and checks the cluster answers.
    pub async fn connect(config: &VoteConfig) -> VoteResult<Self> {
        let client = Self::from_config(config)?;
        let version = client.rpc.get_version().await?;
        info!(
            "Connection to cluster established: {} {}",
            config.json_rpc_url, version.solana_core
        );
        Ok(client)
    }

    /// A client for listing only. Its payer is an ephemeral keypair that is
    /// never funded, so submissions through it fail.
    pub async fn connect_read_only(config: &VoteConfig) -> VoteResult<Self> {
        let rpc = RpcClient::new_with_commitment(config.json_rpc_url.clone(), config.commitment);
        let version = rpc.get_version().await?;
        info!(
            "Connection to cluster established: {} {}",
            config.json_rpc_url, version.solana_core
        );
        Ok(Self::new(rpc, Keypair::new(), config.programs))
    }

    pub fn payer(&self) -> Pubkey {
        self.payer.pubkey()
    }

    /// Token account holding the most of `mint`, which for an NFT is its
    /// single holder.
    pub async fn resolve_token_holder(&self, mint: &Pubkey) -> VoteResult<Pubkey> {
        let balances = self.rpc.get_token_largest_accounts(mint).await?;
        let largest = balances
            .first()
            .ok_or(VoteClientError::NoTokenHolder(*mint))?;
        Pubkey::from_str(&largest.address)
            .map_err(|_| VoteClientError::InvalidAddress(largest.address.clone()))
    }

    pub async fn build_cast_vote(
        &self,
        mint: &Pubkey,
        creator: &Pubkey,
        vote_id: u64,
        option: u64,
    ) -> VoteResult<Instruction> {
        let token_account = self.resolve_token_holder(mint).await?;
        cast_vote(&CastVoteArgs {
            programs: self.programs,
            payer: self.payer(),
            mint: *mint,
            creator: *creator,
            token_account,
            vote_id,
            option,
        })
    }

    pub async fn build_create_vote(
        &self,
        mint: &Pubkey,
        creator: &Pubkey,
        vote_id: u64,
        payload: CreateVotePayload,
    ) -> VoteResult<Instruction> {
        let token_account = self.resolve_token_holder(mint).await?;
        create_vote(&CreateVoteArgs {
            programs: self.programs,
            payer: self.payer(),
            mint: *mint,
            creator: *creator,
            token_account,
            vote_id,
            payload,
        })
    }

    pub async fn cast_vote(
        &self,
        mint: &Pubkey,
        creator: &Pubkey,
        vote_id: u64,
        option: u64,
    ) -> VoteResult<Signature> {
        let instruction = self.build_cast_vote(mint, creator, vote_id, option).await?;
        self.send_instructions(vec![instruction]).await
    }

    pub async fn create_vote(
        &self,
        mint: &Pubkey,
        creator: &Pubkey,
        vote_id: u64,
        payload: CreateVotePayload,
    ) -> VoteResult<Signature> {
        let instruction = self.build_create_vote(mint, creator, vote_id, payload).await?;
        self.send_instructions(vec![instruction]).await
    }

    /// Casts the same vote with every mint in `mints`, up to five votes per
    /// transaction.
    ///
    /// Building fails as a whole if any mint cannot be resolved. Once
    /// submission starts every chunk stands on its own and its outcome is
    /// reported separately; confirmed chunks are never rolled back.
    pub async fn cast_votes(
        &self,
        mints: &[Pubkey],
        creator: &Pubkey,
        vote_id: u64,
        option: u64,
        mode: SubmissionMode,
    ) -> VoteResult<Vec<ChunkOutcome>> {
        let mut instructions = Vec::with_capacity(mints.len());
        for mint in mints {
            instructions.push(self.build_cast_vote(mint, creator, vote_id, option).await?);
        }
        self.submit_instructions(instructions, mode).await
    }

    /// Packs `instructions` into transactions of at most five and submits
    /// them, one outcome per transaction.
    pub async fn submit_instructions(
        &self,
        instructions: Vec<Instruction>,
        mode: SubmissionMode,
    ) -> VoteResult<Vec<ChunkOutcome>> {
        let chunks = chunk_instructions(&instructions, MAX_INSTRUCTIONS_PER_TRANSACTION);
        info!(
            "submitting {} votes in {} transactions ({:?})",
            instructions.len(),
            chunks.len(),
            mode
        );

        let outcomes = match mode {
            SubmissionMode::Sequential => {
                submit_sequential(chunks, move |_, chunk| self.send_instructions(chunk)).await
            }
            SubmissionMode::Batched => {
                let blockhash = self.rpc.get_latest_blockhash().await?;
                let transactions: Vec<Transaction> = chunks
                    .iter()
                    .map(|chunk| self.sign(chunk, blockhash))
                    .collect();
                let transactions = &transactions;
                submit_concurrent(chunks, move |index, _| {
                    self.send_unattended(&transactions[index])
                })
                .await
            }
        };
        Ok(outcomes)
    }

    fn sign(&self, instructions: &[Instruction], blockhash: Hash) -> Transaction {
        let payer = self.payer();
        Transaction::new_signed_with_payer(instructions, Some(&payer), &[&self.payer], blockhash)
    }

    pub async fn send_instructions(&self, instructions: Vec<Instruction>) -> VoteResult<Signature> {
        let blockhash = self.rpc.get_latest_blockhash().await?;
        let transaction = self.sign(&instructions, blockhash);
        self.send_signed(&transaction).await
    }

    async fn send_signed(&self, transaction: &Transaction) -> VoteResult<Signature> {
        let signature = self
            .rpc
            .send_and_confirm_transaction_with_spinner_and_config(
                transaction,
                self.rpc.commitment(),
                RpcSendTransactionConfig {
                    skip_preflight: self.skip_preflight,
                    ..RpcSendTransactionConfig::default()
                },
            )
            .await
            .map_err(VoteClientError::from_client_error)?;
        info!("Tx Id: {}", signature);
        Ok(signature)
    }

    /// Sends without a progress spinner and polls the signature status until
    /// it lands or its blockhash expires. Used when several transactions are
    /// in flight at once.
    async fn send_unattended(&self, transaction: &Transaction) -> VoteResult<Signature> {
        let commitment = self.rpc.commitment();
        let signature = self
            .rpc
            .send_transaction_with_config(
                transaction,
                RpcSendTransactionConfig {
                    skip_preflight: self.skip_preflight,
                    ..RpcSendTransactionConfig::default()
                },
            )
            .await
            .map_err(VoteClientError::from_client_error)?;

        loop {
            match self
                .rpc
                .get_signature_status_with_commitment(&signature, commitment)
                .await?
            {
                Some(Ok(())) => break,
                Some(Err(err)) => return Err(VoteClientError::from_client_error(err.into())),
                None => {
                    let blockhash = transaction.message.recent_blockhash;
                    if !self.rpc.is_blockhash_valid(&blockhash, commitment).await? {
                        return Err(VoteClientError::BlockhashExpired(signature));
                    }
                    sleep(CONFIRM_POLL_INTERVAL).await;
                }
            }
        }
        info!("Tx Id: {}", signature);
        Ok(signature)
    }

    /// Every vote cast under `creator`, optionally narrowed to one proposal.
    pub async fn fetch_votes(
        &self,
        creator: &Pubkey,
        vote_id: Option<u64>,
    ) -> VoteResult<Vec<VoteRecord>> {
        let mut filters = vec![RpcFilterType::Memcmp(Memcmp::new_base58_encoded(
            VoteRecord::CREATOR_OFFSET,
            creator.as_ref(),
        ))];
        if let Some(vote_id) = vote_id {
            filters.push(RpcFilterType::Memcmp(Memcmp::new_base58_encoded(
                VoteRecord::VOTE_ID_OFFSET,
                &encode_le64(vote_id),
            )));
        }
        filters.push(RpcFilterType::DataSize(VoteRecord::LEN as u64));

        let accounts = self.program_accounts(filters).await?;
        accounts
            .iter()
            .map(|(_, account)| VoteRecord::decode(&account.data))
            .collect()
    }

    async fn program_accounts(
        &self,
        filters: Vec<RpcFilterType>,
    ) -> VoteResult<Vec<(Pubkey, Account)>> {
        Ok(self
            .rpc
            .get_program_accounts_with_config(
                &self.programs.vote,
                RpcProgramAccountsConfig {
                    filters: Some(filters),
                    account_config: RpcAccountInfoConfig {
                        encoding: Some(UiAccountEncoding::Base64),
                        commitment: Some(self.rpc.commitment()),
                        ..RpcAccountInfoConfig::default()
                    },
                    ..RpcProgramAccountsConfig::default()
                },
            )
            .await?)
    }

    /// Proposal stored at the address derived from `creator` and `vote_id`.
    pub async fn fetch_proposal(&self, creator: &Pubkey, vote_id: u64) -> VoteResult<ProposalRecord> {
        let address = proposal_address(creator, vote_id, &self.programs.vote)?;
        let account = self
            .rpc
            .get_account_with_commitment(&address, self.rpc.commitment())
            .await?
            .value
            .ok_or(VoteClientError::AccountNotFound(address))?;
        ProposalRecord::decode(&account.data)
    }

    /// Every proposal created under `creator`.
    pub async fn fetch_proposals(&self, creator: &Pubkey) -> VoteResult<Vec<ProposalRecord>> {
        let filters = vec![
            RpcFilterType::Memcmp(Memcmp::new_base58_encoded(
                ProposalRecord::CREATOR_OFFSET,
                creator.as_ref(),
            )),
            RpcFilterType::DataSize(ProposalRecord::LEN as u64),
        ];
        let accounts = self.program_accounts(filters).await?;
        accounts
            .iter()
            .map(|(_, account)| ProposalRecord::decode(&account.data))
            .collect()
    }

    pub async fn fetch_proposal_descriptor(
        &self,
        proposal: &ProposalRecord,
    ) -> VoteResult<ProposalDescriptor> {
        fetch_storage(&self.http, &proposal.url).await
    }

    /// Off-chain data of each mint, one result per mint.
    pub async fn lookup_storage(&self, mints: &[Pubkey]) -> Vec<MintLookup<NftStorageData>> {
        lookup_storage_batch(&self.rpc, &self.http, mints, &self.programs.metadata).await
    }

    pub async fn mint_metadata(&self, mint: &Pubkey) -> VoteResult<Metadata> {
        fetch_mint_metadata(&self.rpc, mint, &self.programs.metadata).await
    }

    /// NFTs held by `owner` whose metadata lists `verified_creator` as a
    /// verified creator.
    pub async fn wallet_nfts(
        &self,
        owner: &Pubkey,
        verified_creator: &Pubkey,
    ) -> VoteResult<Vec<WalletNft>> {
        let accounts = self
            .rpc
            .get_token_accounts_by_owner(owner, TokenAccountsFilter::ProgramId(spl_token::id()))
            .await?;

        let held: Vec<(Pubkey, Pubkey)> = accounts.iter().filter_map(held_token).collect();
        let lookups = held.iter().map(|(token_account, mint)| async move {
            (*token_account, *mint, self.mint_metadata(mint).await)
        });

        let members: Vec<(Pubkey, Pubkey, Metadata)> = join_all(lookups)
            .await
            .into_iter()
            .filter_map(|(token_account, mint, metadata)| match metadata {
                Ok(metadata) if has_verified_creator(&metadata, verified_creator) => {
                    Some((token_account, mint, metadata))
                }
                Ok(_) => None,
                Err(err) => {
                    warn!("skipping {}: {}", mint, err);
                    None
                }
            })
            .collect();

        let nfts = members.into_iter().map(|(token_account, mint, metadata)| async move {
            let uri = metadata_uri(&metadata).to_string();
            let storage = if uri.is_empty() {
                None
            } else {
                fetch_storage::<NftStorageData>(&self.http, &uri)
                    .await
                    .map_err(|err| warn!("no off-chain data for {}: {}", mint, err))
                    .ok()
            };
            WalletNft {
                mint,
                token_account,
                name: metadata.name.trim_end_matches('\0').to_string(),
                uri,
                storage,
            }
        });
        Ok(join_all(nfts).await)
    }
}

/// `(token account, mint)` of a non-empty token account.
fn held_token(keyed: &RpcKeyedAccount) -> Option<(Pubkey, Pubkey)> {
    let token_account = Pubkey::from_str(&keyed.pubkey).ok()?;
    let mint = match &keyed.account.data {
        UiAccountData::Json(parsed) => {
            let info = parsed.parsed.get("info")?;
            let amount = info.get("tokenAmount")?.get("amount")?.as_str()?;
            if amount == "0" {
                return None;
            }
            Pubkey::from_str(info.get("mint")?.as_str()?).ok()?
        }
        _ => {
            let account: Account = keyed.account.decode()?;
            let token = TokenAccount::unpack(&account.data).ok()?;
            if token.amount == 0 {
                return None;
            }
            token.mint
        }
    };
    Some((token_account, mint))
}
