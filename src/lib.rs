//! Client for the NFT-gated DAO vote program.
//!
//! The vote program itself lives on chain and is consumed here only through
//! its binary interface: two 17-byte instructions, four derived addresses and
//! two fixed-size account layouts. This crate builds the former, decodes the
//! latter and wraps the ledger round-trips needed in between.

pub mod cli;
pub mod client;
pub mod codec;
pub mod config;
pub mod errors;
pub mod instructions;
pub mod metadata;
pub mod pda;
pub mod state;
pub mod submit;
pub mod tally;

pub use client::*;
pub use config::*;
pub use errors::*;
pub use state::*;

solana_program::declare_id!("Daovoteq2Y28gJyme6TNUXT9TxXrePiouFuHezkiozci");
