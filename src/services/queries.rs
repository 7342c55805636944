use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use crate::data::Datasets;
use crate::models::Sentiment;

/// Per-year release stats for one developer.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DeveloperYearStats {
    #[serde(rename = "Items Released")]
    pub items_released: u64,
    #[serde(rename = "% of Free Content")]
    pub free_content_pct: f64,
}

/// Release count and free-content share per year for a developer, keyed
/// `"Year: {year}"`. Unknown developer yields an empty map.
pub fn developer_stats(data: &Datasets, developer: &str) -> BTreeMap<String, DeveloperYearStats> {
    let mut per_year: BTreeMap<i32, (u64, u64)> = BTreeMap::new();
    for game in data.games().iter().filter(|g| g.developer == developer) {
        let entry = per_year.entry(game.release_year).or_insert((0, 0));
        entry.0 += 1;
        if game.price == 0.0 {
            entry.1 += 1;
        }
    }

    per_year
        .into_iter()
        .map(|(year, (total, free))| {
            (
                format!("Year: {year}"),
                DeveloperYearStats {
                    items_released: total,
                    free_content_pct: free as f64 / total as f64 * 100.0,
                },
            )
        })
        .collect()
}

/// Spend, library size and recommend rate for one user.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct UserSummary {
    #[serde(rename = "user id")]
    pub user_id: String,
    #[serde(rename = "money spent")]
    pub money_spent: f64,
    #[serde(rename = "number of items")]
    pub item_count: u64,
    #[serde(rename = "recommend rate")]
    pub recommend_rate: f64,
}

/// Aggregates one user's library and reviews. An unknown user yields a
/// zero-valued record; a user with no items has recommend rate 0 rather
/// than a division error.
pub fn user_summary(data: &Datasets, user_id: &str) -> UserSummary {
    let mut money_spent = 0.0;
    let mut item_count = 0u64;
    for fact in data.library().iter().filter(|f| f.user_id == user_id) {
        item_count += 1;
        if let Some(game) = data.game_by_id(fact.item_id) {
            money_spent += game.price;
        }
    }

    let recommended = data
        .reviews()
        .iter()
        .filter(|r| r.user_id == user_id && r.recommend)
        .count() as f64;
    let recommend_rate = if item_count > 0 {
        recommended / item_count as f64
    } else {
        0.0
    };

    UserSummary {
        user_id: user_id.to_string(),
        money_spent: round_to(money_spent, 2),
        item_count,
        recommend_rate: round_to(recommend_rate, 3),
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct YearPlaytime {
    pub year: i32,
    pub hours: f64,
}

/// The user with the most playtime in a genre, with per-year hours.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct GenreTopUser {
    pub genre: String,
    pub user_id: Option<String>,
    #[serde(rename = "Hours played")]
    pub hours_played: Vec<YearPlaytime>,
}

/// Finds the user with the highest total playtime over games carrying the
/// genre, then breaks that user's hours down by release year. A genre with
/// no playtime yields a record with no user.
pub fn top_user_for_genre(data: &Datasets, genre: &str) -> GenreTopUser {
    // (user, year) -> hours, restricted to the requested genre.
    let mut totals: BTreeMap<&str, f64> = BTreeMap::new();
    let mut per_year: HashMap<(&str, i32), f64> = HashMap::new();
    for fact in data.library() {
        let Some(game) = data.game_by_id(fact.item_id) else {
            continue;
        };
        if !game.genres.iter().any(|g| g == genre) {
            continue;
        }
        *totals.entry(fact.user_id.as_str()).or_insert(0.0) += fact.playtime_hours;
        *per_year
            .entry((fact.user_id.as_str(), game.release_year))
            .or_insert(0.0) += fact.playtime_hours;
    }

    // BTreeMap iteration makes the winner deterministic on tied hours.
    let top_user = totals
        .iter()
        .max_by(|a, b| a.1.partial_cmp(b.1).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(user, _)| user.to_string());

    let hours_played = match &top_user {
        Some(user) => {
            let mut breakdown: BTreeMap<i32, f64> = BTreeMap::new();
            for ((fact_user, year), hours) in &per_year {
                if *fact_user == user.as_str() {
                    *breakdown.entry(*year).or_insert(0.0) += hours;
                }
            }
            breakdown
                .into_iter()
                .map(|(year, hours)| YearPlaytime {
                    year,
                    hours: round_to(hours, 2),
                })
                .collect()
        }
        None => Vec::new(),
    };

    GenreTopUser {
        genre: genre.to_string(),
        user_id: top_user,
        hours_played,
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DeveloperRank {
    pub developer: String,
    pub recommendations: u64,
}

/// Top 3 developers by recommended-review count for games released in
/// `year`, keyed `"1st place"` through `"3rd place"`. Ties break by
/// developer name so the ranking is stable.
pub fn best_developers_of_year(data: &Datasets, year: i32) -> BTreeMap<String, DeveloperRank> {
    let mut counts: BTreeMap<&str, u64> = BTreeMap::new();
    for review in data.reviews().iter().filter(|r| r.recommend) {
        let Some(game) = data.game_by_id(review.item_id) else {
            continue;
        };
        if game.release_year == year {
            *counts.entry(game.developer.as_str()).or_insert(0) += 1;
        }
    }

    let mut ranked: Vec<(&str, u64)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)));

    const PLACES: [&str; 3] = ["1st place", "2nd place", "3rd place"];
    ranked
        .into_iter()
        .take(PLACES.len())
        .enumerate()
        .map(|(i, (developer, recommendations))| {
            (
                PLACES[i].to_string(),
                DeveloperRank {
                    developer: developer.to_string(),
                    recommendations,
                },
            )
        })
        .collect()
}

/// Negative/positive review tally for one developer's games. Neutral
/// reviews are counted nowhere, matching the published payload shape.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SentimentBreakdown {
    #[serde(rename = "Negative")]
    pub negative: u64,
    #[serde(rename = "Positive")]
    pub positive: u64,
}

pub fn developer_reviews(data: &Datasets, developer: &str) -> SentimentBreakdown {
    let mut breakdown = SentimentBreakdown {
        negative: 0,
        positive: 0,
    };
    for review in data.reviews() {
        let Some(game) = data.game_by_id(review.item_id) else {
            continue;
        };
        if game.developer != developer {
            continue;
        }
        match review.sentiment {
            Sentiment::Negative => breakdown.negative += 1,
            Sentiment::Positive => breakdown.positive += 1,
            Sentiment::Neutral => {}
        }
    }
    breakdown
}

fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}
