pub mod reviews;
pub mod similarity;
