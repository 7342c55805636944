use std::cmp::Ordering;

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::data::Datasets;
use crate::error::{AppError, AppResult};

/// Neighbor users considered for collaborative filtering.
const NEIGHBOR_COUNT: usize = 10;

/// Maximum entries returned by either recommender.
const TOP_N: usize = 5;

/// Catalog rows drawn for the content similarity comparison.
pub const DEFAULT_SAMPLE_SIZE: usize = 2000;

/// Fixed seed so the content recommendation for a given catalog never
/// changes between runs or between concurrent calls.
const SAMPLE_SEED: u64 = 42;

/// Recommends up to 5 items for a user via user-based collaborative
/// filtering over the precomputed similarity matrix.
///
/// An unknown user is a normal outcome and yields an empty list. Missing
/// neighbor ratings count as zero, which biases lesser-known items downward
/// on purpose. Items the target user already rated are dropped from the
/// final list.
pub fn recommend_for_user(data: &Datasets, user_id: &str) -> Vec<u32> {
    let Some(user_col) = data.ratings().user_col(user_id) else {
        return Vec::new();
    };

    let sims = data.similarity().row(user_col);

    // Rank every other user by similarity descending. Self is skipped by
    // position rather than by score so that ties at the maximum are safe.
    let mut order: Vec<usize> = (0..sims.len()).filter(|&col| col != user_col).collect();
    order.sort_by(|&a, &b| sims[b].partial_cmp(&sims[a]).unwrap_or(Ordering::Equal));
    let mut neighbors: Vec<usize> = order.into_iter().take(NEIGHBOR_COUNT).collect();
    // The positional filter above already removed the target user; keep the
    // guard in case the selection logic changes shape.
    neighbors.retain(|&col| col != user_col);

    if neighbors.is_empty() {
        return Vec::new();
    }

    // Mean rating per item across the neighbor columns, missing -> 0.
    let ratings = data.ratings();
    let mut scored: Vec<(usize, f64)> = (0..ratings.item_count())
        .map(|item_row| {
            let sum: f64 = neighbors
                .iter()
                .map(|&col| ratings.rating(item_row, col).unwrap_or(0.0))
                .sum();
            (item_row, sum / neighbors.len() as f64)
        })
        .collect();

    // Stable sort keeps the original catalog order on ties.
    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));

    let recommendations: Vec<u32> = scored
        .into_iter()
        .filter(|&(item_row, _)| !ratings.has_rating(item_row, user_col))
        .take(TOP_N)
        .map(|(item_row, _)| ratings.items()[item_row])
        .collect();

    tracing::debug!(user_id, ?recommendations, "User recommendations computed");
    recommendations
}

/// Recommends up to 5 titles similar to the given game by cosine
/// similarity over a seeded sample of the catalog.
///
/// Returns `Ok(None)` when the id is not in the catalog — distinguishable
/// from a game with no similar titles. `sample_size` larger than the
/// catalog is a configuration error, never a silent under-sample.
pub fn recommend_similar_items(
    data: &Datasets,
    item_id: u32,
    sample_size: usize,
) -> AppResult<Option<Vec<String>>> {
    let games = data.games();
    if sample_size > games.len() {
        return Err(AppError::Config(format!(
            "content sample size {} exceeds catalog size {}",
            sample_size,
            games.len()
        )));
    }

    let Some(query_row) = data.game_row(item_id) else {
        return Ok(None);
    };
    let query = &games[query_row].features;

    // A fresh RNG per call keeps concurrent requests order-independent.
    let mut rng = StdRng::seed_from_u64(SAMPLE_SEED);
    let sampled = rand::seq::index::sample(&mut rng, games.len(), sample_size);

    // `sampled` yields original catalog rows, so self-exclusion compares
    // against the query's catalog position, not its place in the sample.
    let mut scored: Vec<(usize, f64)> = sampled
        .iter()
        .filter(|&row| row != query_row)
        .map(|row| (row, cosine_similarity(query, &games[row].features)))
        .collect();

    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));

    let titles: Vec<String> = scored
        .into_iter()
        .take(TOP_N)
        .map(|(row, _)| games[row].title.clone())
        .collect();

    tracing::debug!(item_id, ?titles, "Content recommendations computed");
    Ok(Some(titles))
}

/// Cosine similarity between two feature vectors; 0 when either has no
/// magnitude.
fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    let dot: f64 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f64 = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let norm_b: f64 = b.iter().map(|x| x * x).sum::<f64>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{RatingMatrix, UserSimilarityMatrix};
    use crate::models::Game;

    fn game(id: u32, title: &str, features: Vec<f64>) -> Game {
        Game {
            id,
            title: title.to_string(),
            developer: "Dev".to_string(),
            release_year: 2015,
            price: 9.99,
            genres: vec!["Action".to_string()],
            features,
        }
    }

    fn users(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    /// Three users, two items: U2 is U1's closest neighbor, U3 second.
    /// U1 rated X but not Y.
    fn collaborative_fixture() -> Datasets {
        let games = vec![game(1, "X", vec![1.0]), game(2, "Y", vec![1.0])];
        let ratings = RatingMatrix::from_entries(
            users(&["u1", "u2", "u3"]),
            vec![1, 2],
            &[
                (1, "u1".to_string(), 5.0),
                (1, "u2".to_string(), 3.0),
                (2, "u2".to_string(), 4.0),
                (1, "u3".to_string(), 1.0),
                (2, "u3".to_string(), 5.0),
            ],
        )
        .unwrap();
        let similarity = UserSimilarityMatrix::new(
            users(&["u1", "u2", "u3"]),
            vec![
                vec![1.0, 0.9, 0.4],
                vec![0.9, 1.0, 0.5],
                vec![0.4, 0.5, 1.0],
            ],
        )
        .unwrap();
        Datasets::new(games, vec![], vec![], ratings, similarity).unwrap()
    }

    fn content_fixture() -> Datasets {
        let games = vec![
            game(1, "A", vec![1.0, 0.0]),
            game(2, "B", vec![1.0, 0.0]),
            game(3, "C", vec![0.0, 1.0]),
        ];
        let ratings = RatingMatrix::from_entries(vec![], vec![], &[]).unwrap();
        let similarity = UserSimilarityMatrix::new(vec![], vec![]).unwrap();
        Datasets::new(games, vec![], vec![], ratings, similarity).unwrap()
    }

    #[test]
    fn test_unknown_user_gets_empty_list() {
        let data = collaborative_fixture();
        assert!(recommend_for_user(&data, "nobody").is_empty());
    }

    #[test]
    fn test_neighbor_mean_ranking_with_missing_as_zero() {
        let data = collaborative_fixture();
        // Neighbors of u1 are {u2, u3}. Y: (4+5)/2 = 4.5, X: (3+1)/2 = 2.
        // u1's own rating of X plays no part in the aggregation, and X is
        // excluded from the output because u1 already rated it.
        let recs = recommend_for_user(&data, "u1");
        assert_eq!(recs, vec![2]);
    }

    #[test]
    fn test_user_recommendations_are_deterministic() {
        let data = collaborative_fixture();
        let first = recommend_for_user(&data, "u3");
        let second = recommend_for_user(&data, "u3");
        assert_eq!(first, second);
    }

    #[test]
    fn test_at_most_five_recommendations() {
        let games: Vec<Game> = (1..=8).map(|id| game(id, "G", vec![1.0])).collect();
        let items: Vec<u32> = (1..=8).collect();
        let entries: Vec<(u32, String, f64)> =
            items.iter().map(|&id| (id, "u2".to_string(), 5.0)).collect();
        let ratings =
            RatingMatrix::from_entries(users(&["u1", "u2"]), items, &entries).unwrap();
        let similarity = UserSimilarityMatrix::new(
            users(&["u1", "u2"]),
            vec![vec![1.0, 0.8], vec![0.8, 1.0]],
        )
        .unwrap();
        let data = Datasets::new(games, vec![], vec![], ratings, similarity).unwrap();

        let recs = recommend_for_user(&data, "u1");
        assert_eq!(recs.len(), 5);
        // Ties broken by catalog order.
        assert_eq!(recs, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_unknown_item_is_typed_not_found() {
        let data = content_fixture();
        let result = recommend_similar_items(&data, 999, 3).unwrap();
        assert_eq!(result, None);
    }

    #[test]
    fn test_identical_vector_outranks_orthogonal() {
        let data = content_fixture();
        let titles = recommend_similar_items(&data, 1, 3).unwrap().unwrap();
        assert_eq!(titles, vec!["B".to_string(), "C".to_string()]);
    }

    #[test]
    fn test_query_item_never_recommends_itself() {
        let data = content_fixture();
        for id in [1, 2, 3] {
            let query_title = data.game_by_id(id).unwrap().title.clone();
            let titles = recommend_similar_items(&data, id, 3).unwrap().unwrap();
            assert!(!titles.contains(&query_title));
        }
    }

    #[test]
    fn test_content_recommendations_are_deterministic() {
        let data = content_fixture();
        let first = recommend_similar_items(&data, 1, 3).unwrap();
        let second = recommend_similar_items(&data, 1, 3).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_oversized_sample_is_config_error() {
        let data = content_fixture();
        let result = recommend_similar_items(&data, 1, 50);
        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[test]
    fn test_cosine_similarity_handles_zero_vectors() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]), 0.0);
        assert!((cosine_similarity(&[1.0, 0.0], &[1.0, 0.0]) - 1.0).abs() < 1e-12);
    }
}
