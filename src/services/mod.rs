pub mod queries;
pub mod recommender;
