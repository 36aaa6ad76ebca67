use clap::{crate_version, App, Arg, ArgMatches};
use dao_vote_client::cli::{
    config_from_matches, pubkey_arg, required_pubkey, required_u64, u64_arg, with_connection_args,
};
use dao_vote_client::submit::{confirmed_count, SubmissionMode};
use dao_vote_client::{VoteClient, VoteClientError, VoteResult};
use solana_clap_utils::input_parsers::pubkeys_of;
use solana_clap_utils::input_validators::is_valid_pubkey;
use std::process;

fn app<'a, 'b>() -> App<'a, 'b> {
    with_connection_args(
        App::new("dao-vote-cast")
            .about("Cast a vote on a DAO proposal with an NFT")
            .version(crate_version!()),
    )
    .arg(pubkey_arg("mint", "MINT", "Mint of the NFT casting the vote").index(1))
    .arg(u64_arg("vote_id", "VOTE_ID", "Proposal id").index(2))
    .arg(pubkey_arg("creator", "CREATOR", "Verified collection creator").index(3))
    .arg(u64_arg("option", "OPTION", "Option to vote for").index(4))
    .arg(
        Arg::with_name("additional_mints")
            .long("also")
            .value_name("MINT")
            .takes_value(true)
            .multiple(true)
            .validator(is_valid_pubkey)
            .help("More NFTs casting the same vote, five per transaction"),
    )
    .arg(
        Arg::with_name("batched")
            .long("batched")
            .requires("additional_mints")
            .help("Sign every transaction first and send them concurrently"),
    )
}

async fn run(matches: &ArgMatches<'_>) -> VoteResult<()> {
    let config = config_from_matches(matches)?;
    let client = VoteClient::connect(&config).await?;

    let mint = required_pubkey(matches, "mint")?;
    let vote_id = required_u64(matches, "vote_id")?;
    let creator = required_pubkey(matches, "creator")?;
    let option = required_u64(matches, "option")?;

    let Some(additional) = pubkeys_of(matches, "additional_mints") else {
        let signature = client.cast_vote(&mint, &creator, vote_id, option).await?;
        println!("{signature}");
        return Ok(());
    };

    let mints: Vec<_> = std::iter::once(mint).chain(additional).collect();
    let mode = if matches.is_present("batched") {
        SubmissionMode::Batched
    } else {
        SubmissionMode::Sequential
    };
    let outcomes = client
        .cast_votes(&mints, &creator, vote_id, option, mode)
        .await?;
    for outcome in &outcomes {
        match &outcome.result {
            Ok(signature) => println!("{signature}"),
            Err(err) => eprintln!(
                "transaction {} ({} votes) failed: {}",
                outcome.index, outcome.instruction_count, err
            ),
        }
    }

    let confirmed = confirmed_count(&outcomes);
    if confirmed < outcomes.len() {
        return Err(VoteClientError::PartialSubmission {
            confirmed,
            total: outcomes.len(),
        });
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    solana_logger::setup_with_default("info");
    let matches = app().get_matches();
    if let Err(err) = run(&matches).await {
        eprintln!("{err}");
        process::exit(1);
    }
}
