use clap::{crate_version, App, Arg, ArgMatches};
use dao_vote_client::cli::{
    config_from_matches, pubkey_arg, required_pubkey, required_u64, u64_arg, with_connection_args,
};
use dao_vote_client::instructions::CreateVotePayload;
use dao_vote_client::{VoteClient, VoteResult};
use std::process;

fn app<'a, 'b>() -> App<'a, 'b> {
    with_connection_args(
        App::new("dao-vote-create")
            .about("Create a DAO proposal that NFTs of a collection can vote on")
            .version(crate_version!()),
    )
    .arg(pubkey_arg("mint", "MINT", "Mint of an NFT in the collection").index(1))
    .arg(u64_arg("vote_id", "VOTE_ID", "Id of the new proposal").index(2))
    .arg(pubkey_arg("creator", "CREATOR", "Verified collection creator").index(3))
    .arg(
        u64_arg("parameter", "PARAMETER", "64-bit proposal parameter")
            .index(4)
            .required(false)
            .required_unless("uri"),
    )
    .arg(
        Arg::with_name("uri")
            .long("uri")
            .value_name("URI")
            .takes_value(true)
            .conflicts_with("parameter")
            .help("Proposal descriptor URL stored on chain instead of a parameter (under 100 bytes)"),
    )
}

async fn run(matches: &ArgMatches<'_>) -> VoteResult<()> {
    let config = config_from_matches(matches)?;
    let client = VoteClient::connect(&config).await?;

    let mint = required_pubkey(matches, "mint")?;
    let vote_id = required_u64(matches, "vote_id")?;
    let creator = required_pubkey(matches, "creator")?;
    let payload = match matches.value_of("uri") {
        Some(uri) => CreateVotePayload::Uri(uri.to_string()),
        None => CreateVotePayload::Parameter(required_u64(matches, "parameter")?),
    };

    let signature = client.create_vote(&mint, &creator, vote_id, payload).await?;
    println!("{signature}");
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
