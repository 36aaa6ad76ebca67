//! Argument handling shared by the `dao-vote-*` binaries.

use std::str::FromStr;

use clap::{App, Arg, ArgMatches};
use solana_clap_utils::input_parsers::{pubkey_of, value_of};
use solana_clap_utils::input_validators::{
    is_parsable, is_url_or_moniker, is_valid_pubkey, normalize_to_url_if_moniker,
};
use solana_sdk::pubkey::Pubkey;

use crate::config::VoteConfig;
use crate::errors::{VoteClientError, VoteResult};

/// Adds the connection and signer flags every binary accepts.
pub fn with_connection_args<'a, 'b>(app: App<'a, 'b>) -> App<'a, 'b> {
    app.arg(
        Arg::with_name("config_file")
            .short("C")
            .long("config")
            .takes_value(true)
            .value_name("FILEPATH")
            .global(true)
            .help("Solana CLI config file [default: ~/.config/solana/cli/config.yml]"),
    )
    .arg(
        Arg::with_name("json_rpc_url")
            .short("u")
            .long("url")
            .value_name("URL_OR_MONIKER")
            .takes_value(true)
            .global(true)
            .validator(is_url_or_moniker)
            .help(
                "URL for Solana's JSON RPC or moniker (or their first letter): \
                   [mainnet-beta, testnet, devnet, localhost]",
            ),
    )
    .arg(
        Arg::with_name("keypair")
            .short("k")
            .long("keypair")
            .value_name("KEYPAIR")
            .takes_value(true)
            .global(true)
            .help("Payer keypair file"),
    )
    .arg(
        Arg::with_name("program_id")
            .long("program-id")
            .value_name("PUBKEY")
            .takes_value(true)
            .global(true)
            .validator(is_valid_pubkey)
            .help("Vote program id"),
    )
    .arg(
        Arg::with_name("commitment")
            .long("commitment")
            .value_name("LEVEL")
            .takes_value(true)
            .global(true)
            .possible_values(&["processed", "confirmed", "finalized"])
            .help("Commitment level for reads and confirmation"),
    )
}

pub fn pubkey_arg<'a, 'b>(name: &'a str, value_name: &'a str, help: &'a str) -> Arg<'a, 'b> {
    Arg::with_name(name)
        .value_name(value_name)
        .takes_value(true)
        .required(true)
        .validator(is_valid_pubkey)
        .help(help)
}

pub fn u64_arg<'a, 'b>(name: &'a str, value_name: &'a str, help: &'a str) -> Arg<'a, 'b> {
    Arg::with_name(name)
        .value_name(value_name)
        .takes_value(true)
        .required(true)
        .validator(is_parsable::<u64>)
        .help(help)
}

/// Resolves the config file and applies command line overrides.
pub fn config_from_matches(matches: &ArgMatches<'_>) -> VoteResult<VoteConfig> {
    let mut config = VoteConfig::load(matches.value_of("config_file"))?;
    if let Some(url) = matches.value_of("json_rpc_url") {
        config.json_rpc_url = normalize_to_url_if_moniker(url);
    }
    if let Some(keypair) = matches.value_of("keypair") {
        config.keypair_path = keypair.to_string();
    }
    if let Some(program_id) = matches.value_of("program_id") {
        config.programs.vote = Pubkey::from_str(program_id)
            .map_err(|_| VoteClientError::InvalidAddress(program_id.to_string()))?;
    }
    if let Some(commitment) = matches.value_of("commitment") {
        config.set_commitment(commitment)?;
    }
    Ok(config)
}

pub fn required_pubkey(matches: &ArgMatches<'_>, name: &str) -> VoteResult<Pubkey> {
    pubkey_of(matches, name).ok_or_else(|| VoteClientError::Config(format!("missing {name}")))
}

pub fn required_u64(matches: &ArgMatches<'_>, name: &str) -> VoteResult<u64> {
    value_of(matches, name).ok_or_else(|| VoteClientError::Config(format!("missing {name}")))
}
