pub mod additive;
pub mod base;
pub mod mle;
pub mod normalize;
pub mod similarity;
pub mod smoothed_lm;
