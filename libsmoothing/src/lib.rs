pub mod config;
pub mod context;
pub mod counts;
pub mod error;
pub mod lm;
pub mod similarity_matrix;
pub mod vocab;
