pub mod loader;
pub mod store;

pub use loader::load_datasets;
pub use store::{Datasets, RatingMatrix, UserSimilarityMatrix};
