//! In-memory exact nearest-neighbor index over document chunks
//!
//! Every stored vector lives in the same record as its chunk, so the two can
//! never drift apart. A single `RwLock` guards the record list: inserts hold
//! the write lock for the whole append, searches hold the read lock for the
//! whole scan.

use parking_lot::RwLock;
use std::cmp::Ordering;

use crate::error::{Error, Result};

use super::distance::squared_l2;

/// A stored chunk together with its embedding
#[derive(Debug, Clone)]
struct IndexedChunk {
    vector: Vec<f32>,
    chunk: String,
}

/// Search hit with its position and distance
#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit {
    /// Insertion position of the chunk
    pub position: usize,
    /// The retrieved chunk
    pub chunk: String,
    /// Squared L2 distance to the query (lower is closer)
    pub distance: f32,
}

/// Flat brute-force L2 index
#[derive(Debug)]
pub struct VectorIndex {
    /// Required vector dimensionality
    dimensions: usize,
    /// Records in insertion order
    entries: RwLock<Vec<IndexedChunk>>,
}

impl VectorIndex {
    /// Create an empty index for vectors of the given dimensionality
    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions,
            entries: RwLock::new(Vec::new()),
        }
    }

    /// Configured dimensionality
    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    /// Append vectors and their chunks, in order.
    ///
    /// The whole batch is validated before anything is stored; a rejected
    /// batch leaves the index untouched.
    pub fn insert(&self, vectors: Vec<Vec<f32>>, chunks: Vec<String>) -> Result<()> {
        if vectors.len() != chunks.len() {
            return Err(Error::invalid_input(format!(
                "got {} vectors for {} chunks",
                vectors.len(),
                chunks.len()
            )));
        }

        if let Some((i, v)) = vectors
            .iter()
            .enumerate()
            .find(|(_, v)| v.len() != self.dimensions)
        {
            return Err(Error::invalid_input(format!(
                "vector {} has dimensionality {}, expected {}",
                i,
                v.len(),
                self.dimensions
            )));
        }

        if vectors.is_empty() {
            return Ok(());
        }

        let added = vectors.len();
        let mut entries = self.entries.write();
        entries.reserve(added);
        entries.extend(
            vectors
                .into_iter()
                .zip(chunks)
                .map(|(vector, chunk)| IndexedChunk { vector, chunk }),
        );

        tracing::debug!("Indexed {} chunks ({} total)", added, entries.len());
        Ok(())
    }

    /// Return the `k` chunks nearest to `query`, nearest first.
    ///
    /// `k` larger than the index size returns everything; an empty index
    /// returns an empty result.
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<String>> {
        Ok(self
            .search_with_distances(query, k)?
            .into_iter()
            .map(|hit| hit.chunk)
            .collect())
    }

    /// Like [`search`](Self::search) but keeps positions and distances.
    ///
    /// Ties on distance are broken by insertion order.
    pub fn search_with_distances(&self, query: &[f32], k: usize) -> Result<Vec<SearchHit>> {
        if query.len() != self.dimensions {
            return Err(Error::invalid_input(format!(
                "query has dimensionality {}, expected {}",
                query.len(),
                self.dimensions
            )));
        }

        let entries = self.entries.read();
        let k = k.min(entries.len());
        if k == 0 {
            return Ok(Vec::new());
        }

        let mut scored: Vec<(f32, usize)> = entries
            .iter()
            .enumerate()
            .map(|(position, entry)| (squared_l2(query, &entry.vector), position))
            .collect();

        if k < scored.len() {
            scored.select_nth_unstable_by(k, compare_scored);
            scored.truncate(k);
        }
        scored.sort_unstable_by(compare_scored);

        Ok(scored
            .into_iter()
            .map(|(distance, position)| SearchHit {
                position,
                chunk: entries[position].chunk.clone(),
                distance,
            })
            .collect())
    }

    /// Number of stored chunks
    pub fn count(&self) -> usize {
        self.entries.read().len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    /// Snapshot of all stored chunks in insertion order
    pub fn chunks(&self) -> Vec<String> {
        self.entries
            .read()
            .iter()
            .map(|entry| entry.chunk.clone())
            .collect()
    }
}

/// Order by distance, then by insertion position
fn compare_scored(a: &(f32, usize), b: &(f32, usize)) -> Ordering {
    a.0.total_cmp(&b.0).then(a.1.cmp(&b.1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::sync::Arc;

    fn chunks(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_empty_insert_keeps_count_zero() {
        let index = VectorIndex::new(3);
        index.insert(Vec::new(), Vec::new()).unwrap();
        assert_eq!(index.count(), 0);
        assert!(index.is_empty());
    }

    #[test]
    fn test_exact_match_is_nearest() {
        let index = VectorIndex::new(3);
        index
            .insert(
                vec![
                    vec![10.0, 0.0, 0.0],
                    vec![0.0, 10.0, 0.0],
                    vec![0.0, 0.0, 10.0],
                ],
                chunks(&["a", "b", "c"]),
            )
            .unwrap();

        let result = index.search(&[0.0, 10.0, 0.0], 1).unwrap();
        assert_eq!(result, vec!["b".to_string()]);
    }

    #[test]
    fn test_k_larger_than_count_returns_all_sorted() {
        let index = VectorIndex::new(1);
        index
            .insert(
                vec![vec![5.0], vec![1.0], vec![4.0], vec![2.0], vec![3.0]],
                chunks(&["five", "one", "four", "two", "three"]),
            )
            .unwrap();

        let result = index.search(&[0.0], 10).unwrap();
        assert_eq!(result, chunks(&["one", "two", "three", "four", "five"]));
    }

    #[test]
    fn test_ties_follow_insertion_order() {
        let index = VectorIndex::new(2);
        index
            .insert(
                vec![vec![1.0, 0.0], vec![-1.0, 0.0], vec![0.0, 1.0], vec![5.0, 5.0]],
                chunks(&["east", "west", "north", "far"]),
            )
            .unwrap();

        let result = index.search(&[0.0, 0.0], 3).unwrap();
        assert_eq!(result, chunks(&["east", "west", "north"]));

        let result = index.search(&[0.0, 0.0], 2).unwrap();
        assert_eq!(result, chunks(&["east", "west"]));
    }

    #[test]
    fn test_search_empty_index_returns_nothing() {
        let index = VectorIndex::new(2);
        assert!(index.search(&[0.0, 0.0], 3).unwrap().is_empty());
    }

    #[test]
    fn test_zero_k_returns_nothing() {
        let index = VectorIndex::new(1);
        index.insert(vec![vec![1.0]], chunks(&["a"])).unwrap();
        assert!(index.search(&[1.0], 0).unwrap().is_empty());
    }

    #[test]
    fn test_count_mismatch_rejected() {
        let index = VectorIndex::new(2);
        let err = index
            .insert(vec![vec![0.0, 0.0]], chunks(&["a", "b"]))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
        assert_eq!(index.count(), 0);
    }

    #[test]
    fn test_wrong_dimensionality_rejects_whole_batch() {
        let index = VectorIndex::new(2);
        let err = index
            .insert(vec![vec![0.0, 0.0], vec![0.0]], chunks(&["a", "b"]))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
        assert_eq!(index.count(), 0);
    }

    #[test]
    fn test_wrong_query_dimensionality_rejected() {
        let index = VectorIndex::new(2);
        index.insert(vec![vec![0.0, 0.0]], chunks(&["a"])).unwrap();
        assert!(matches!(
            index.search(&[0.0], 1),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_chunks_snapshot_in_insertion_order() {
        let index = VectorIndex::new(1);
        index.insert(vec![vec![3.0]], chunks(&["first"])).unwrap();
        index
            .insert(vec![vec![1.0], vec![2.0]], chunks(&["second", "third"]))
            .unwrap();
        assert_eq!(index.chunks(), chunks(&["first", "second", "third"]));
    }

    #[test]
    fn test_concurrent_inserts_keep_pairs_together() {
        let index = Arc::new(VectorIndex::new(1));

        let handles: Vec<_> = (0..8)
            .map(|t| {
                let index = Arc::clone(&index);
                std::thread::spawn(move || {
                    for i in 0..50 {
                        let value = (t * 1000 + i) as f32;
                        index
                            .insert(vec![vec![value]], vec![format!("{}", value)])
                            .unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(index.count(), 400);
        // Every vector must still be paired with the chunk it was inserted with
        for query in [0.0f32, 1049.0, 7025.0] {
            let hit = &index.search_with_distances(&[query], 1).unwrap()[0];
            assert_eq!(hit.distance, 0.0);
            assert_eq!(hit.chunk, format!("{}", query));
        }
    }

    fn batches() -> impl Strategy<Value = Vec<Vec<Vec<f32>>>> {
        prop::collection::vec(
            prop::collection::vec(prop::collection::vec(-100.0f32..100.0, 4), 0..10),
            0..5,
        )
    }

    proptest! {
        #[test]
        fn prop_count_matches_inserted(batches in batches()) {
            let index = VectorIndex::new(4);
            let mut expected = 0;
            for batch in batches {
                let names = (0..batch.len()).map(|i| format!("{}-{}", expected, i)).collect();
                expected += batch.len();
                index.insert(batch, names).unwrap();
            }
            prop_assert_eq!(index.count(), expected);
        }

        #[test]
        fn prop_search_is_sorted_and_clamped(
            vectors in prop::collection::vec(prop::collection::vec(-100.0f32..100.0, 4), 0..30),
            query in prop::collection::vec(-100.0f32..100.0, 4),
            k in 0usize..40,
        ) {
            let index = VectorIndex::new(4);
            let n = vectors.len();
            let names = (0..n).map(|i| i.to_string()).collect();
            index.insert(vectors, names).unwrap();

            let hits = index.search_with_distances(&query, k).unwrap();
            prop_assert_eq!(hits.len(), k.min(n));
            for pair in hits.windows(2) {
                prop_assert!(pair[0].distance <= pair[1].distance);
                if pair[0].distance == pair[1].distance {
                    prop_assert!(pair[0].position < pair[1].position);
                }
            }
        }
    }
}
