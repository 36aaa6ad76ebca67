use std::path::Path;
use std::str::FromStr;

use solana_cli_config::{Config, CONFIG_FILE};
use solana_sdk::commitment_config::CommitmentConfig;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::{read_keypair_file, Keypair};

use crate::errors::{VoteClientError, VoteResult};

/// The on-chain programs a client talks to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProgramIds {
    /// DAO vote program
    pub vote: Pubkey,
    /// Token metadata program owning the NFT metadata accounts
    pub metadata: Pubkey,
}

impl Default for ProgramIds {
    fn default() -> Self {
        Self {
            vote: crate::id(),
            metadata: mpl_token_metadata::ID,
        }
    }
}

/// Connection and signing settings for a [`crate::VoteClient`].
#[derive(Clone, Debug)]
pub struct VoteConfig {
    pub json_rpc_url: String,
    pub keypair_path: String,
    pub commitment: CommitmentConfig,
    pub programs: ProgramIds,
    pub skip_preflight: bool,
}

impl VoteConfig {
    /// Loads the Solana CLI config at `config_file`, or the default location
    /// when `None`. A missing default file falls back to built-in defaults; a
    /// missing explicit file is an error.
    pub fn load(config_file: Option<&str>) -> VoteResult<Self> {
        let cli_config = match config_file {
            Some(path) if !Path::new(path).exists() => {
                return Err(VoteClientError::Config(format!("config file {path} not found")));
            }
            Some(path) => Config::load(path)
                .map_err(|err| VoteClientError::Config(format!("{path}: {err}")))?,
            None => match CONFIG_FILE.as_deref() {
                Some(path) if Path::new(path).exists() => Config::load(path)
                    .map_err(|err| VoteClientError::Config(format!("{path}: {err}")))?,
                _ => Config::default(),
            },
        };

        Ok(Self::from_cli_config(&cli_config))
    }

    pub fn from_cli_config(cli_config: &Config) -> Self {
        Self {
            json_rpc_url: cli_config.json_rpc_url.clone(),
            keypair_path: cli_config.keypair_path.clone(),
            // An empty commitment in the file means the CLI default.
            commitment: CommitmentConfig::from_str(&cli_config.commitment)
                .unwrap_or_else(|_| CommitmentConfig::confirmed()),
            programs: ProgramIds::default(),
            skip_preflight: true,
        }
    }

    pub fn set_commitment(&mut self, commitment: &str) -> VoteResult<()> {
        self.commitment = CommitmentConfig::from_str(commitment)
            .map_err(|_| VoteClientError::Config(format!("unknown commitment {commitment}")))?;
        Ok(())
    }

    pub fn load_payer(&self) -> VoteResult<Keypair> {
        read_keypair_file(&self.keypair_path)
            .map_err(|err| VoteClientError::Keypair(format!("{}: {}", self.keypair_path, err)))
    }
}
