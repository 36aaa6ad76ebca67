mod common;

use dao_vote_client::metadata::{find_lookup, MintLookup, NftStorageData, ProposalDescriptor};
use dao_vote_client::tally::{tally, unvoted_mints};
use dao_vote_client::{VoteClientError, VoteRecord};
use solana_sdk::pubkey::Pubkey;

use common::vote_record_bytes;

fn vote(mint: &Pubkey, creator: &Pubkey, vote_id: u64, option: u64) -> VoteRecord {
    VoteRecord::decode(&vote_record_bytes(mint, creator, &Pubkey::new_unique(), vote_id, 0, option))
        .unwrap()
}

#[test]
fn test_tally_counts_per_proposal() {
    let creator = Pubkey::new_unique();
    let votes: Vec<VoteRecord> = [(2, 1), (2, 1), (2, 0), (5, 3)]
        .iter()
        .map(|&(vote_id, option)| vote(&Pubkey::new_unique(), &creator, vote_id, option))
        .collect();

    let tallies = tally(&votes);
    assert_eq!(tallies.len(), 2);

    assert_eq!(tallies[0].vote_id, 2);
    assert_eq!(tallies[0].total, 3);
    assert_eq!(tallies[0].options.get(&1), Some(&2));
    assert_eq!(tallies[0].options.get(&0), Some(&1));
    assert_eq!(tallies[0].leading_option(), Some((1, 2)));

    assert_eq!(tallies[1].vote_id, 5);
    assert_eq!(tallies[1].total, 1);
    assert_eq!(tallies[1].leading_option(), Some((3, 1)));

    let total: usize = tallies.iter().map(|t| t.total).sum();
    assert_eq!(total, votes.len());
}

#[test]
fn test_leading_option_tie_goes_to_lowest() {
    let creator = Pubkey::new_unique();
    let votes = vec![
        vote(&Pubkey::new_unique(), &creator, 1, 4),
        vote(&Pubkey::new_unique(), &creator, 1, 2),
    ];
    assert_eq!(tally(&votes)[0].leading_option(), Some((2, 1)));
    assert!(tally(Vec::<VoteRecord>::new().iter()).is_empty());
}

#[test]
fn test_unvoted_mints_filters_by_proposal() {
    let creator = Pubkey::new_unique();
    let wallet: Vec<Pubkey> = (0..3).map(|_| Pubkey::new_unique()).collect();
    let votes = vec![
        vote(&wallet[0], &creator, 2, 1),
        vote(&wallet[1], &creator, 3, 1),
    ];

    assert_eq!(unvoted_mints(&wallet, &votes, 2), vec![wallet[1], wallet[2]]);
    assert_eq!(unvoted_mints(&wallet, &votes, 3), vec![wallet[0], wallet[2]]);
    assert_eq!(unvoted_mints(&wallet, &votes, 9), wallet);
}

#[test]
fn test_lookups_are_matched_by_mint() {
    let named = Pubkey::new_unique();
    let failed = Pubkey::new_unique();
    // Completion order differs from request order.
    let lookups = vec![
        MintLookup {
            mint: failed,
            result: Err(VoteClientError::AccountNotFound(failed)),
        },
        MintLookup {
            mint: named,
            result: Ok(NftStorageData {
                name: Some("Degen #12".to_string()),
                image: None,
            }),
        },
    ];

    assert_eq!(
        find_lookup(&lookups, &named).and_then(|data| data.name.as_deref()),
        Some("Degen #12")
    );
    assert!(find_lookup(&lookups, &failed).is_none());
    assert!(find_lookup(&lookups, &Pubkey::new_unique()).is_none());
}

#[test]
fn test_proposal_descriptor_labels() {
    let descriptor: ProposalDescriptor = serde_json::from_str(
        r#"{
            "prompt": "Fund the community treasury?",
            "description": "Move 10% of royalties",
            "proposedBy": "council",
            "totalVotesAvailable": 10000,
            "voteOptions": [
                { "label": "Yes", "value": 1 },
                { "label": "No", "value": 2, "onchainValue": 0 }
            ],
            "proposalEndDate": "2022-06-01"
        }"#,
    )
    .unwrap();

    assert_eq!(descriptor.prompt, "Fund the community treasury?");
    assert_eq!(descriptor.total_votes_available, Some(10000));
    assert_eq!(descriptor.option_label(1), Some("Yes"));
    assert_eq!(descriptor.option_label(0), Some("No"));
    assert_eq!(descriptor.option_label(2), None);
    assert!(descriptor.document_proposal_uri.is_none());
}
