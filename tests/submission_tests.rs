use std::sync::Mutex;

use assert_matches::assert_matches;
use dao_vote_client::submit::{
    chunk_instructions, confirmed_count, submit_concurrent, submit_sequential,
    MAX_INSTRUCTIONS_PER_TRANSACTION,
};
use dao_vote_client::{VoteClientError, VoteProgramError};
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Signature;

fn twelve_mints() -> Vec<Pubkey> {
    (0..12).map(|_| Pubkey::new_unique()).collect()
}

#[tokio::test]
async fn test_sequential_failure_leaves_other_chunks() {
    let mints = twelve_mints();
    let chunks = chunk_instructions(&mints, MAX_INSTRUCTIONS_PER_TRANSACTION);
    assert_eq!(chunks.len(), 3);

    let submitted = Mutex::new(Vec::new());
    let outcomes = submit_sequential(chunks, |index, chunk: Vec<Pubkey>| {
        submitted.lock().unwrap().push(chunk.clone());
        async move {
            if index == 1 {
                Err(VoteClientError::Program(VoteProgramError::VoteCastAlready))
            } else {
                Ok(Signature::new_unique())
            }
        }
    })
    .await;

    let counts: Vec<usize> = outcomes.iter().map(|o| o.instruction_count).collect();
    assert_eq!(counts, vec![5, 5, 2]);
    assert!(outcomes[0].is_confirmed());
    assert_matches!(
        outcomes[1].result,
        Err(VoteClientError::Program(VoteProgramError::VoteCastAlready))
    );
    assert!(outcomes[2].is_confirmed());
    assert_eq!(confirmed_count(&outcomes), 2);

    // Chunks are submitted in order and cover every mint exactly once.
    assert_eq!(submitted.into_inner().unwrap().concat(), mints);
}

#[tokio::test]
async fn test_concurrent_outcomes_keep_chunk_order() {
    let mints = twelve_mints();
    let chunks = chunk_instructions(&mints, MAX_INSTRUCTIONS_PER_TRANSACTION);

    let outcomes = submit_concurrent(chunks, |index, chunk: Vec<Pubkey>| async move {
        // The first chunk finishes last.
        if index == 0 {
            for _ in 0..3 {
                tokio::task::yield_now().await;
            }
        }
        if index == 1 {
            Err(VoteClientError::PartialSubmission {
                confirmed: 0,
                total: chunk.len(),
            })
        } else {
            Ok(Signature::new_unique())
        }
    })
    .await;

    let indices: Vec<usize> = outcomes.iter().map(|o| o.index).collect();
    assert_eq!(indices, vec![0, 1, 2]);
    assert!(outcomes[0].is_confirmed());
    assert!(!outcomes[1].is_confirmed());
    assert!(outcomes[2].is_confirmed());
    assert_eq!(outcomes[2].instruction_count, 2);
}

#[tokio::test]
async fn test_no_chunks_no_outcomes() {
    let outcomes = submit_sequential(Vec::<Vec<Pubkey>>::new(), |_, _| async {
        Ok(Signature::new_unique())
    })
    .await;
    assert!(outcomes.is_empty());
    assert_eq!(confirmed_count(&outcomes), 0);
}
