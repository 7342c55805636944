use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::Context;
use serde::Deserialize;

use crate::models::{Game, LibraryFact, ReviewFact};

use super::store::{Datasets, RatingMatrix, UserSimilarityMatrix};

/// Persisted form of the sparse rating matrix.
#[derive(Debug, Deserialize)]
struct RatingsFile {
    users: Vec<String>,
    items: Vec<u32>,
    entries: Vec<RatingEntry>,
}

#[derive(Debug, Deserialize)]
struct RatingEntry {
    item_id: u32,
    user_id: String,
    rating: f64,
}

/// Persisted form of the dense user similarity matrix. Row order matches
/// `users`, as does the column order within each row.
#[derive(Debug, Deserialize)]
struct SimilarityFile {
    users: Vec<String>,
    scores: Vec<Vec<f64>>,
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("parsing {}", path.display()))
}

/// Loads every dataset from `dir` and assembles the validated store.
///
/// The exporter writes one JSON document per table: `games.json`,
/// `library.json`, `reviews.json`, `ratings.json`, `user_similarity.json`.
pub fn load_datasets(dir: &Path) -> anyhow::Result<Datasets> {
    let games: Vec<Game> = read_json(&dir.join("games.json"))?;
    let library: Vec<LibraryFact> = read_json(&dir.join("library.json"))?;
    let reviews: Vec<ReviewFact> = read_json(&dir.join("reviews.json"))?;
    let ratings_file: RatingsFile = read_json(&dir.join("ratings.json"))?;
    let similarity_file: SimilarityFile = read_json(&dir.join("user_similarity.json"))?;

    let entries: Vec<(u32, String, f64)> = ratings_file
        .entries
        .into_iter()
        .map(|e| (e.item_id, e.user_id, e.rating))
        .collect();

    let ratings = RatingMatrix::from_entries(ratings_file.users, ratings_file.items, &entries)
        .context("building rating matrix")?;
    let similarity = UserSimilarityMatrix::new(similarity_file.users, similarity_file.scores)
        .context("building user similarity matrix")?;

    let datasets = Datasets::new(games, library, reviews, ratings, similarity)
        .context("validating datasets")?;

    tracing::info!(
        games = datasets.games().len(),
        library_facts = datasets.library().len(),
        reviews = datasets.reviews().len(),
        users = datasets.ratings().users().len(),
        "Datasets loaded"
    );

    Ok(datasets)
}
