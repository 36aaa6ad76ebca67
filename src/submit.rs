use std::future::Future;

use futures::future::join_all;
use log::{info, warn};
use solana_sdk::signature::Signature;

use crate::errors::VoteResult;

/// Upper bound on vote instructions packed into one transaction
pub const MAX_INSTRUCTIONS_PER_TRANSACTION: usize = 5;

/// How chunks of a multi-NFT vote are sent.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SubmissionMode {
    /// Sign, send and confirm one chunk after the other
    #[default]
    Sequential,
    /// Sign every chunk up front, then dispatch them all at once
    Batched,
}

/// What happened to one chunk. Chunks are independent transactions: a failed
/// chunk leaves the chunks confirmed before or after it in place.
#[derive(Debug)]
pub struct ChunkOutcome {
    pub index: usize,
    pub instruction_count: usize,
    pub result: VoteResult<Signature>,
}

impl ChunkOutcome {
    pub fn is_confirmed(&self) -> bool {
        self.result.is_ok()
    }
}

/// Splits `items` into groups of at most `size`, preserving order.
pub fn chunk_instructions<T: Clone>(items: &[T], size: usize) -> Vec<Vec<T>> {
    items.chunks(size.max(1)).map(<[T]>::to_vec).collect()
}

fn record(index: usize, instruction_count: usize, result: VoteResult<Signature>) -> ChunkOutcome {
    match &result {
        Ok(signature) => info!("chunk {} ({} votes) confirmed: {}", index, instruction_count, signature),
        Err(err) => warn!("chunk {} ({} votes) failed: {}", index, instruction_count, err),
    }
    ChunkOutcome {
        index,
        instruction_count,
        result,
    }
}

/// Submits chunks in order, waiting for each before starting the next.
pub async fn submit_sequential<T, F, Fut>(chunks: Vec<Vec<T>>, mut submit: F) -> Vec<ChunkOutcome>
where
    F: FnMut(usize, Vec<T>) -> Fut,
    Fut: Future<Output = VoteResult<Signature>>,
{
    let mut outcomes = Vec::with_capacity(chunks.len());
    for (index, chunk) in chunks.into_iter().enumerate() {
        let instruction_count = chunk.len();
        let result = submit(index, chunk).await;
        outcomes.push(record(index, instruction_count, result));
    }
    outcomes
}

/// Submits every chunk concurrently. Outcomes are returned in chunk order.
pub async fn submit_concurrent<T, F, Fut>(chunks: Vec<Vec<T>>, submit: F) -> Vec<ChunkOutcome>
where
    F: Fn(usize, Vec<T>) -> Fut,
    Fut: Future<Output = VoteResult<Signature>>,
{
    let pending = chunks.into_iter().enumerate().map(|(index, chunk)| {
        let instruction_count = chunk.len();
        let fut = submit(index, chunk);
        async move { record(index, instruction_count, fut.await) }
    });
    join_all(pending).await
}

pub fn confirmed_count(outcomes: &[ChunkOutcome]) -> usize {
    outcomes.iter().filter(|outcome| outcome.is_confirmed()).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chunks_twelve_into_five_five_two() {
        let items: Vec<u32> = (0..12).collect();
        let chunks = chunk_instructions(&items, MAX_INSTRUCTIONS_PER_TRANSACTION);
        let sizes: Vec<usize> = chunks.iter().map(Vec::len).collect();
        assert_eq!(sizes, vec![5, 5, 2]);
        assert_eq!(chunks.concat(), items);
    }

    #[test]
    fn chunking_handles_edges() {
        assert!(chunk_instructions::<u8>(&[], 5).is_empty());
        assert_eq!(chunk_instructions(&[1, 2, 3, 4, 5], 5).len(), 1);
        // A zero size is treated as one per chunk.
        assert_eq!(chunk_instructions(&[1, 2], 0).len(), 2);
    }
}
