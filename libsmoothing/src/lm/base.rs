use anyhow::Result;

use crate::counts::{CountTable, WordCounts};
use crate::vocab::Vocabulary;

/**
 * 平滑化戦略。
 * 「文脈に対する補正済みカウントベクトルを作る」ことだけを担当し、
 * 正規化は全戦略で共通のものを使う。
 */
pub trait SmoothingStrategy {
    /// 語彙に依存する状態 (類似度行列など)。語彙が作り直されるたびに prepare で作り直す。
    type State;

    fn name(&self) -> &'static str;

    fn prepare(&self, vocab: &Vocabulary) -> Result<Self::State>;

    /// 単語 1 つ分の補正済みカウント。local が None なら未知の文脈。
    fn count(&self, local: Option<&WordCounts>, word: &str) -> f64 {
        local
            .and_then(|counts| counts.get(word))
            .map(|cnt| *cnt as f64)
            .unwrap_or(0.0)
    }

    /// 語彙順に並べた補正済みカウントベクトル。
    fn adjusted_counts(
        &self,
        _state: &Self::State,
        vocab: &Vocabulary,
        local: Option<&WordCounts>,
    ) -> Vec<f64> {
        vocab
            .words()
            .iter()
            .map(|word| self.count(local, word))
            .collect()
    }
}

/// 文脈付きの条件付き確率モデル。値は log2 確率。
pub trait ConditionalLM {
    /// log2 P(word | context)。語彙外の単語は OOV として扱う。
    fn prob(&self, word: &str, context: &[&str]) -> f64;

    /// 語彙順に並んだ log2 確率ベクトル。
    fn probdist(&self, context: &[&str]) -> Vec<f64>;

    fn update_counts(&mut self, counts: CountTable) -> Result<()>;

    fn vocabulary(&self) -> &Vocabulary;
}
