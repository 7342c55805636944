use std::collections::HashMap;

use crate::error::{AppError, AppResult};
use crate::models::{Game, LibraryFact, ReviewFact};

/// Sparse item-by-user rating table.
///
/// Rows are items (in catalog order), columns are users. A missing entry
/// means the user never rated the item.
#[derive(Debug, Clone)]
pub struct RatingMatrix {
    users: Vec<String>,
    user_cols: HashMap<String, usize>,
    items: Vec<u32>,
    /// Per item row: user column index -> normalized rating.
    rows: Vec<HashMap<usize, f64>>,
}

impl RatingMatrix {
    /// Builds the matrix from sparse `(item_id, user_id, rating)` entries.
    ///
    /// Entries referencing a user outside `users` are rejected rather than
    /// silently dropped, since that points at a corrupted export.
    pub fn from_entries(
        users: Vec<String>,
        items: Vec<u32>,
        entries: &[(u32, String, f64)],
    ) -> AppResult<Self> {
        let user_cols: HashMap<String, usize> = users
            .iter()
            .enumerate()
            .map(|(col, user)| (user.clone(), col))
            .collect();
        if user_cols.len() != users.len() {
            return Err(AppError::Config(
                "rating matrix contains duplicate user columns".to_string(),
            ));
        }

        let item_rows: HashMap<u32, usize> = items
            .iter()
            .enumerate()
            .map(|(row, &id)| (id, row))
            .collect();
        if item_rows.len() != items.len() {
            return Err(AppError::Config(
                "rating matrix contains duplicate item rows".to_string(),
            ));
        }

        let mut rows = vec![HashMap::new(); items.len()];
        for (item_id, user_id, rating) in entries {
            let row = item_rows.get(item_id).ok_or_else(|| {
                AppError::Config(format!("rating entry for unknown item {item_id}"))
            })?;
            let col = user_cols.get(user_id.as_str()).ok_or_else(|| {
                AppError::Config(format!("rating entry for unknown user {user_id}"))
            })?;
            rows[*row].insert(*col, *rating);
        }

        Ok(Self {
            users,
            user_cols,
            items,
            rows,
        })
    }

    /// Column index for a user, or `None` when the user never appears.
    pub fn user_col(&self, user_id: &str) -> Option<usize> {
        self.user_cols.get(user_id).copied()
    }

    pub fn users(&self) -> &[String] {
        &self.users
    }

    pub fn items(&self) -> &[u32] {
        &self.items
    }

    /// Rating for `(item_row, user_col)`, `None` when unrated.
    pub fn rating(&self, item_row: usize, user_col: usize) -> Option<f64> {
        self.rows.get(item_row)?.get(&user_col).copied()
    }

    /// Whether the user rated the item at `item_row`.
    pub fn has_rating(&self, item_row: usize, user_col: usize) -> bool {
        self.rating(item_row, user_col).is_some()
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }
}

/// Dense symmetric user-by-user similarity table.
///
/// Shares the rating matrix's user ordering; the diagonal holds
/// self-similarity and is never a valid neighbor.
#[derive(Debug, Clone)]
pub struct UserSimilarityMatrix {
    users: Vec<String>,
    scores: Vec<Vec<f64>>,
}

impl UserSimilarityMatrix {
    pub fn new(users: Vec<String>, scores: Vec<Vec<f64>>) -> AppResult<Self> {
        if scores.len() != users.len() {
            return Err(AppError::Config(format!(
                "similarity matrix has {} rows for {} users",
                scores.len(),
                users.len()
            )));
        }
        if let Some(row) = scores.iter().find(|row| row.len() != users.len()) {
            return Err(AppError::Config(format!(
                "similarity matrix row has {} columns for {} users",
                row.len(),
                users.len()
            )));
        }
        Ok(Self { users, scores })
    }

    pub fn users(&self) -> &[String] {
        &self.users
    }

    /// Similarity scores of every user against the user at `row`.
    pub fn row(&self, row: usize) -> &[f64] {
        &self.scores[row]
    }
}

/// The immutable dataset context every query reads from.
///
/// Built once at startup, validated, then shared behind an `Arc`. Nothing
/// mutates it afterwards, so handlers can read without locking.
#[derive(Debug)]
pub struct Datasets {
    games: Vec<Game>,
    game_rows: HashMap<u32, usize>,
    library: Vec<LibraryFact>,
    reviews: Vec<ReviewFact>,
    ratings: RatingMatrix,
    similarity: UserSimilarityMatrix,
}

impl Datasets {
    pub fn new(
        games: Vec<Game>,
        library: Vec<LibraryFact>,
        reviews: Vec<ReviewFact>,
        ratings: RatingMatrix,
        similarity: UserSimilarityMatrix,
    ) -> AppResult<Self> {
        let mut game_rows = HashMap::with_capacity(games.len());
        for (row, game) in games.iter().enumerate() {
            if game_rows.insert(game.id, row).is_some() {
                return Err(AppError::Config(format!(
                    "duplicate game id {} in catalog",
                    game.id
                )));
            }
        }

        // Neighbor selection indexes the similarity matrix with rating
        // matrix columns, so the two user sets must line up exactly.
        if ratings.users() != similarity.users() {
            return Err(AppError::Config(
                "rating matrix and similarity matrix disagree on the user set".to_string(),
            ));
        }

        Ok(Self {
            games,
            game_rows,
            library,
            reviews,
            ratings,
            similarity,
        })
    }

    pub fn games(&self) -> &[Game] {
        &self.games
    }

    /// Catalog row position for a game id. Position is the join key for
    /// content similarity, not the id value itself.
    pub fn game_row(&self, id: u32) -> Option<usize> {
        self.game_rows.get(&id).copied()
    }

    pub fn game_by_id(&self, id: u32) -> Option<&Game> {
        self.game_row(id).map(|row| &self.games[row])
    }

    pub fn library(&self) -> &[LibraryFact] {
        &self.library
    }

    pub fn reviews(&self) -> &[ReviewFact] {
        &self.reviews
    }

    pub fn ratings(&self) -> &RatingMatrix {
        &self.ratings
    }

    pub fn similarity(&self) -> &UserSimilarityMatrix {
        &self.similarity
    }
}
