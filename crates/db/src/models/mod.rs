pub mod rating_stats;
pub mod recipe;
pub mod review;
pub mod review_vote;
