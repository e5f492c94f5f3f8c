//! Property tests for chunk store search ordering and filtering.

use std::collections::HashMap;

use chrono::Utc;
use proptest::prelude::*;
use ragkit_core::{
    Chunk, ChunkStore, DocumentMetadata, Provenance, SimilarityMetric, StoreConfig,
};

const DIM: usize = 16;

/// Generate a non-zero L2-normalized embedding of the given dimension.
fn arb_normalized_embedding(dim: usize) -> impl Strategy<Value = Vec<f32>> {
    proptest::collection::vec(-1.0f32..1.0f32, dim).prop_filter_map(
        "non-zero embedding",
        |mut v| {
            let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
            if norm < 1e-8 {
                return None;
            }
            for val in &mut v {
                *val /= norm;
            }
            Some(v)
        },
    )
}

/// Generate a chunk with a normalized embedding.
fn arb_chunk(dim: usize) -> impl Strategy<Value = Chunk> {
    ("[a-z]{3,8}", "[a-z ]{5,30}", arb_normalized_embedding(dim)).prop_map(
        |(id, content, embedding)| Chunk {
            id,
            content,
            embedding: Some(embedding),
            metadata: DocumentMetadata {
                url: None,
                title: None,
                provenance: Provenance::Manual,
                created_at: Utc::now(),
                chunk_index: Some(0),
                total_chunks: Some(1),
            },
        },
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// For any set of embedded chunks, search returns results ordered by
    /// descending score, bounded by top_k, with every score at or above
    /// the threshold.
    #[test]
    fn search_ordered_bounded_and_thresholded(
        chunks in proptest::collection::vec(arb_chunk(DIM), 1..20),
        query in arb_normalized_embedding(DIM),
        top_k in 1usize..25,
        threshold in -1.0f32..0.5f32,
    ) {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let results = rt.block_on(async {
            let store = ChunkStore::new(StoreConfig {
                dimensions: DIM,
                metric: SimilarityMetric::Cosine,
            })
            .unwrap();

            // Deduplicate by id so upserts don't shrink the set mid-test.
            let mut deduped: HashMap<String, Chunk> = HashMap::new();
            for chunk in &chunks {
                deduped.entry(chunk.id.clone()).or_insert_with(|| chunk.clone());
            }
            let unique: Vec<Chunk> = deduped.into_values().collect();
            let stored = unique.len();

            store.add_chunks(unique).await.unwrap();
            (store.search(&query, top_k, threshold).await.unwrap(), stored)
        });

        let (results, stored) = results;

        prop_assert!(results.len() <= top_k);
        prop_assert!(results.len() <= stored);
        for pair in results.windows(2) {
            prop_assert!(pair[0].score >= pair[1].score);
        }
        for result in &results {
            prop_assert!(result.score >= threshold);
        }
    }

    /// A batch containing one chunk of wrong dimensionality leaves the
    /// store exactly as it was before the call.
    #[test]
    fn failing_batch_is_all_or_nothing(
        good in proptest::collection::vec(arb_chunk(DIM), 1..10),
        bad_dim in 1usize..DIM,
    ) {
        let rt = tokio::runtime::Runtime::new().unwrap();
        rt.block_on(async {
            let store = ChunkStore::new(StoreConfig {
                dimensions: DIM,
                metric: SimilarityMetric::Cosine,
            })
            .unwrap();

            let mut batch = good.clone();
            let mut bad = good[0].clone();
            bad.id = "wrong_dims".to_string();
            bad.embedding = Some(vec![0.5; bad_dim]);
            batch.push(bad);

            assert!(store.add_chunks(batch).await.is_err());
            assert_eq!(store.stats().await.total_chunks, 0);
        });
    }
}
