use anyhow::Result;

use crate::counts::WordCounts;
use crate::error::ConfigurationError;
use crate::lm::base::SmoothingStrategy;
use crate::vocab::Vocabulary;

pub const DEFAULT_K: f64 = 1.0;

/// add-k 平滑化。全ての語彙に k を足す。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdditiveSmoothing {
    k: f64,
}

impl Default for AdditiveSmoothing {
    fn default() -> Self {
        AdditiveSmoothing { k: DEFAULT_K }
    }
}

impl AdditiveSmoothing {
    /// k は有限の非負数であること。
    pub fn new(k: f64) -> Result<AdditiveSmoothing> {
        if !k.is_finite() || k < 0.0 {
            return Err(ConfigurationError::InvalidSmoothingConstant(k).into());
        }
        Ok(AdditiveSmoothing { k })
    }

    pub fn k(&self) -> f64 {
        self.k
    }
}

impl SmoothingStrategy for AdditiveSmoothing {
    type State = ();

    fn name(&self) -> &'static str {
        "additive"
    }

    fn prepare(&self, _vocab: &Vocabulary) -> Result<()> {
        Ok(())
    }

    fn count(&self, local: Option<&WordCounts>, word: &str) -> f64 {
        let raw = local
            .and_then(|counts| counts.get(word))
            .map(|cnt| *cnt as f64)
            .unwrap_or(0.0);
        raw + self.k
    }
}
