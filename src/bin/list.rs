use std::collections::BTreeMap;

use clap::{crate_version, App, Arg, ArgMatches};
use dao_vote_client::cli::{config_from_matches, pubkey_arg, required_pubkey, with_connection_args};
use dao_vote_client::metadata::{find_lookup, ProposalDescriptor};
use dao_vote_client::tally::tally;
use dao_vote_client::{VoteClient, VoteResult};
use log::warn;
use solana_clap_utils::input_parsers::value_of;
use solana_clap_utils::input_validators::is_parsable;
use std::process;

fn app<'a, 'b>() -> App<'a, 'b> {
    with_connection_args(
        App::new("dao-vote-list")
            .about("List the votes cast under a collection creator")
            .version(crate_version!()),
    )
    .arg(pubkey_arg("creator", "CREATOR", "Verified collection creator").index(1))
    .arg(
        Arg::with_name("vote_id")
            .long("vote-id")
            .value_name("VOTE_ID")
            .takes_value(true)
            .validator(is_parsable::<u64>)
            .help("Only list votes on this proposal"),
    )
    .arg(
        Arg::with_name("proposals")
            .long("proposals")
            .conflicts_with("vote_id")
            .help("List the proposals created under the creator instead of votes"),
    )
    .arg(
        Arg::with_name("with_metadata")
            .long("with-metadata")
            .help("Fetch the name of each voting NFT"),
    )
}

async fn run(matches: &ArgMatches<'_>) -> VoteResult<()> {
    let config = config_from_matches(matches)?;
    let client = VoteClient::connect_read_only(&config).await?;

    let creator = required_pubkey(matches, "creator")?;
    if matches.is_present("proposals") {
        for proposal in client.fetch_proposals(&creator).await? {
            let created = proposal
                .created_at_utc()
                .map(|time| time.to_rfc3339())
                .unwrap_or_else(|| proposal.created_at.to_string());
            println!("Proposal {} created={} url={}", proposal.proposal_id, created, proposal.url);
        }
        return Ok(());
    }

    let vote_id: Option<u64> = value_of(matches, "vote_id");
    let votes = client.fetch_votes(&creator, vote_id).await?;

    let mut descriptors: BTreeMap<u64, Option<ProposalDescriptor>> = BTreeMap::new();
    let mut urls: BTreeMap<u64, String> = BTreeMap::new();
    for vote in &votes {
        if urls.contains_key(&vote.vote_id) {
            continue;
        }
        let (url, descriptor) = match client.fetch_proposal(&vote.creator, vote.vote_id).await {
            Ok(proposal) => {
                let descriptor = if proposal.url.is_empty() {
                    None
                } else {
                    client
                        .fetch_proposal_descriptor(&proposal)
                        .await
                        .map_err(|err| warn!("no descriptor for proposal {}: {}", vote.vote_id, err))
                        .ok()
                };
                (proposal.url, descriptor)
            }
            Err(err) => {
                warn!("proposal {}: {}", vote.vote_id, err);
                (String::new(), None)
            }
        };
        urls.insert(vote.vote_id, url);
        descriptors.insert(vote.vote_id, descriptor);
    }

    let lookups = if matches.is_present("with_metadata") {
        let mints: Vec<_> = votes.iter().map(|vote| vote.mint).collect();
        client.lookup_storage(&mints).await
    } else {
        Vec::new()
    };

    for vote in &votes {
        let name = find_lookup(&lookups, &vote.mint)
            .and_then(|data| data.name.clone())
            .unwrap_or_default();
        let option = descriptors
            .get(&vote.vote_id)
            .and_then(Option::as_ref)
            .and_then(|descriptor| descriptor.option_label(vote.option))
            .map(str::to_string)
            .unwrap_or_else(|| vote.option.to_string());
        let time = vote
            .voted_at_utc()
            .map(|time| time.to_rfc3339())
            .unwrap_or_else(|| vote.voted_at.to_string());
        println!(
            "{} {} voter={} vote={} option={} time={} url={} {}",
            vote.mint,
            vote.creator,
            vote.voter,
            vote.vote_id,
            option,
            time,
            urls.get(&vote.vote_id).map(String::as_str).unwrap_or(""),
            name
        );
    }

    for proposal in tally(&votes) {
        println!("Proposal {}: {} votes", proposal.vote_id, proposal.total);
        for (option, count) in &proposal.options {
            println!("  Option {}: {}", option, count);
        }
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
