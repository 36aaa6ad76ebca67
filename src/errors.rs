use num_derive::FromPrimitive;
use num_traits::FromPrimitive as _;
use solana_client::client_error::ClientError;
use solana_sdk::instruction::InstructionError;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Signature;
use solana_sdk::transaction::TransactionError;
use thiserror::Error;

pub type VoteResult<T> = Result<T, VoteClientError>;

/// Custom error codes returned by the on-chain vote program.
///
/// Discriminants match the `ProgramError::Custom` codes the program emits.
#[derive(Clone, Copy, Debug, Eq, Error, FromPrimitive, PartialEq)]
pub enum VoteProgramError {
    #[error("Authority key mis-match")]
    AuthKeyFailure = 0,

    #[error("Your vote has already been recorded")]
    VoteCastAlready = 1,

    #[error("This vote ID has already been created")]
    VoteCreatedAlready = 2,

    #[error("Vote doesn't exist")]
    VoteDoesntExist = 3,

    #[error("This mint is wrong")]
    InvalidMint = 4,
}

impl VoteProgramError {
    pub fn from_code(code: u32) -> Option<Self> {
        Self::from_u32(code)
    }
}

#[derive(Debug, Error)]
pub enum VoteClientError {
    // Encoding
    #[error("Value {0} does not fit in an unsigned 64-bit integer")]
    OutOfRange(String),

    #[error("Little-endian field of {0} bytes is wider than 8 bytes")]
    IntegerTooWide(usize),

    #[error("Proposal URI is {0} bytes, must be shorter than 100")]
    UriTooLong(usize),

    // Derivation
    #[error("Seed {index} is {len} bytes, the limit is {max}")]
    SeedTooLong { index: usize, len: usize, max: usize },

    #[error("{0} seeds exceed the program address seed limit")]
    TooManySeeds(usize),

    #[error("No valid program address found under program {0}")]
    DerivationFailed(Pubkey),

    // Lookup
    #[error("Account {0} not found")]
    AccountNotFound(Pubkey),

    #[error("No token holder found for mint {0}")]
    NoTokenHolder(Pubkey),

    #[error("Invalid address {0}")]
    InvalidAddress(String),

    // Decoding
    #[error("Account data of {0} bytes is neither a vote record nor a proposal record")]
    InvalidRecordSize(usize),

    #[error("Metadata account could not be decoded: {0}")]
    MetadataDecode(#[from] std::io::Error),

    #[error("Storage fetch failed: {0}")]
    Storage(#[from] reqwest::Error),

    // Submission
    #[error("Vote program rejected the transaction: {0}")]
    Program(VoteProgramError),

    #[error(transparent)]
    Rpc(#[from] ClientError),

    #[error("Transaction {0} expired before it was confirmed")]
    BlockhashExpired(Signature),

    #[error("{confirmed} of {total} transactions confirmed")]
    PartialSubmission { confirmed: usize, total: usize },

    // Setup
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Keypair error: {0}")]
    Keypair(String),
}

impl VoteClientError {
    /// Unwraps a custom program error code out of a failed submission so the
    /// program's own message is reported instead of a bare code.
    pub fn from_client_error(err: ClientError) -> Self {
        if let Some(TransactionError::InstructionError(_, InstructionError::Custom(code))) =
            err.get_transaction_error()
        {
            if let Some(program_error) = VoteProgramError::from_code(code) {
                return Self::Program(program_error);
            }
        }
        Self::Rpc(err)
    }

    /// True for a missing account or token holder.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::AccountNotFound(_) | Self::NoTokenHolder(_))
    }
}
