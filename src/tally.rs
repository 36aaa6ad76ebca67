use std::collections::{BTreeMap, HashSet};

use solana_sdk::pubkey::Pubkey;

use crate::state::VoteRecord;

/// Vote counts of one proposal.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProposalTally {
    pub vote_id: u64,
    /// Total number of votes cast
    pub total: usize,
    /// Votes per option, ordered by option value
    pub options: BTreeMap<u64, usize>,
}

impl ProposalTally {
    /// Option with the most votes; ties go to the lowest option value.
    pub fn leading_option(&self) -> Option<(u64, usize)> {
        self.options
            .iter()
            .fold(None, |best, (&option, &count)| match best {
                Some((_, best_count)) if best_count >= count => best,
                _ => Some((option, count)),
            })
    }
}

pub fn group_by_proposal<'a, I>(votes: I) -> BTreeMap<u64, Vec<&'a VoteRecord>>
where
    I: IntoIterator<Item = &'a VoteRecord>,
{
    let mut grouped: BTreeMap<u64, Vec<&VoteRecord>> = BTreeMap::new();
    for vote in votes {
        grouped.entry(vote.vote_id).or_default().push(vote);
    }
    grouped
}

/// One tally per proposal id present in `votes`, ordered by id.
pub fn tally<'a, I>(votes: I) -> Vec<ProposalTally>
where
    I: IntoIterator<Item = &'a VoteRecord>,
{
    group_by_proposal(votes)
        .into_iter()
        .map(|(vote_id, votes)| {
            let mut options = BTreeMap::new();
            for vote in &votes {
                *options.entry(vote.option).or_insert(0) += 1;
            }
            ProposalTally {
                vote_id,
                total: votes.len(),
                options,
            }
        })
        .collect()
}

/// Mints from `wallet_mints` that have not voted on `vote_id` yet.
pub fn unvoted_mints(wallet_mints: &[Pubkey], votes: &[VoteRecord], vote_id: u64) -> Vec<Pubkey> {
    let voted: HashSet<&Pubkey> = votes
        .iter()
        .filter(|vote| vote.vote_id == vote_id)
        .map(|vote| &vote.mint)
        .collect();
    wallet_mints
        .iter()
        .filter(|mint| !voted.contains(mint))
        .copied()
        .collect()
}
