use anyhow::Result;

use crate::lm::base::SmoothingStrategy;
use crate::vocab::Vocabulary;

/// 平滑化なしの最尤推定。生のカウントをそのまま正規化する。
#[derive(Debug, Clone, Copy, Default)]
pub struct Mle;

impl SmoothingStrategy for Mle {
    type State = ();

    fn name(&self) -> &'static str {
        "mle"
    }

    fn prepare(&self, _vocab: &Vocabulary) -> Result<()> {
        Ok(())
    }
}
