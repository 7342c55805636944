use serde::{Deserialize, Serialize};

/// A catalog entry for a single game.
///
/// `features` is the fixed-length numeric vector used for content
/// similarity (derived offline from tags/genres). It is the only part of
/// the record that participates in the cosine computation; the identifying
/// columns (id, title, year) never do.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Game {
    pub id: u32,
    pub title: String,
    pub developer: String,
    pub release_year: i32,
    pub price: f64,
    pub genres: Vec<String>,
    pub features: Vec<f64>,
}

/// Discretized review-text polarity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Negative,
    Neutral,
    Positive,
}

/// One review event: a user either recommends an owned game or not.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReviewFact {
    pub user_id: String,
    pub item_id: u32,
    pub recommend: bool,
    pub sentiment: Sentiment,
}

/// One owned game in a user's library.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LibraryFact {
    pub user_id: String,
    pub item_id: u32,
    pub playtime_hours: f64,
}
