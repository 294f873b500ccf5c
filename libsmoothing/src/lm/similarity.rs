use anyhow::Result;
use log::{debug, warn};

use crate::counts::WordCounts;
use crate::error::ConfigurationError;
use crate::lm::base::SmoothingStrategy;
use crate::lm::smoothed_lm::SmoothedLM;
use crate::similarity_matrix::{SimilarityMatrix, SimilarityProvider, SimilaritySource};
use crate::vocab::Vocabulary;

/**
 * 類似度による平滑化 (Erk, Pado & Pado 2010)。
 * 文脈での生カウント c に類似度行列 S を掛けた c · S を補正済みカウントとする。
 * ある文脈で未観測の単語でも、似た単語が観測されていれば確率が 0 にならない。
 */
#[derive(Debug)]
pub struct SimilaritySmoothing {
    source: SimilaritySource,
    normalize_rows: bool,
}

impl SimilaritySmoothing {
    pub fn new(source: SimilaritySource) -> SimilaritySmoothing {
        SimilaritySmoothing {
            source,
            normalize_rows: false,
        }
    }

    pub fn with_matrix(matrix: SimilarityMatrix) -> SimilaritySmoothing {
        Self::new(SimilaritySource::Matrix(matrix))
    }

    pub fn with_provider<P: SimilarityProvider + 'static>(provider: P) -> SimilaritySmoothing {
        Self::new(SimilaritySource::Provider(Box::new(provider)))
    }

    /// どちらも無ければ設定エラー。両方あるときは行列を使う。
    pub fn from_parts(
        matrix: Option<SimilarityMatrix>,
        provider: Option<Box<dyn SimilarityProvider>>,
    ) -> Result<SimilaritySmoothing> {
        match (matrix, provider) {
            (Some(matrix), provider) => {
                if provider.is_some() {
                    warn!("Both a similarity matrix and a provider were given; using the matrix");
                }
                Ok(Self::with_matrix(matrix))
            }
            (None, Some(provider)) => Ok(Self::new(SimilaritySource::Provider(provider))),
            (None, None) => Err(ConfigurationError::MissingSimilaritySource.into()),
        }
    }

    /// true にすると、語彙が変わって行列を作り直すたびに行正規化する。
    pub fn normalize_rows(mut self, normalize_rows: bool) -> SimilaritySmoothing {
        self.normalize_rows = normalize_rows;
        self
    }
}

impl SmoothingStrategy for SimilaritySmoothing {
    type State = SimilarityMatrix;

    fn name(&self) -> &'static str {
        "similarity"
    }

    fn prepare(&self, vocab: &Vocabulary) -> Result<SimilarityMatrix> {
        let mut matrix = match &self.source {
            SimilaritySource::Matrix(matrix) => matrix.clone(),
            SimilaritySource::Provider(provider) => {
                debug!("Requesting similarity matrix for {} words", vocab.len());
                provider.similarity_matrix(vocab.words())?
            }
        };
        matrix.check_dim(vocab.len())?;
        if self.normalize_rows {
            matrix.normalize_rows();
        }
        Ok(matrix)
    }

    fn adjusted_counts(
        &self,
        matrix: &SimilarityMatrix,
        vocab: &Vocabulary,
        local: Option<&WordCounts>,
    ) -> Vec<f64> {
        let raw: Vec<f64> = vocab
            .words()
            .iter()
            .map(|word| self.count(local, word))
            .collect();
        matrix.redistribute(&raw)
    }
}

impl SmoothedLM<SimilaritySmoothing> {
    pub fn similarity_matrix(&self) -> &SimilarityMatrix {
        self.state()
    }

    /// 現在の行列を一度だけ行正規化する。次の update_counts で作り直した行列には効かない。
    pub fn normalize_similarity_rows(&mut self) {
        self.state_mut().normalize_rows();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Context;
    use crate::counts::CountTable;
    use crate::lm::mle::Mle;
    use crate::vocab::OOV;

    // 語彙は [cat, dog, fish, OOV] の順になる
    fn sample() -> CountTable {
        let mut table = CountTable::new();
        table.insert(Context::empty(), "cat", 3);
        table.insert(Context::empty(), "dog", 2);
        table.insert(Context::empty(), "fish", 1);
        table.insert(Context::from(["feed", "the"]), "cat", 2);
        table.insert(Context::from(["feed", "the"]), "fish", 1);
        table.insert(Context::from(["walk", "the"]), "dog", 4);
        table
    }

    fn pets() -> Result<SimilarityMatrix> {
        SimilarityMatrix::from_rows(vec![
            vec![1.0, 0.5, 0.0, 0.0],
            vec![0.5, 1.0, 0.0, 0.0],
            vec![0.0, 0.0, 1.0, 0.0],
            vec![0.0, 0.0, 0.0, 1.0],
        ])
    }

    #[test]
    fn test_missing_source() {
        let err = SimilaritySmoothing::from_parts(None, None).unwrap_err();
        assert_eq!(
            err.downcast_ref::<ConfigurationError>(),
            Some(&ConfigurationError::MissingSimilaritySource)
        );
    }

    #[test]
    fn test_matrix_wins_over_provider() -> Result<()> {
        let provider: Box<dyn SimilarityProvider> =
            Box::new(|_: &[String]| -> Result<SimilarityMatrix> { anyhow::bail!("unused") });
        let strategy = SimilaritySmoothing::from_parts(Some(pets()?), Some(provider))?;
        let lm = SmoothedLM::new(strategy, sample())?;
        assert_eq!(lm.similarity_matrix(), &pets()?);
        Ok(())
    }

    #[test]
    fn test_redistributes_to_similar_words() -> Result<()> {
        let lm = SmoothedLM::new(SimilaritySmoothing::with_matrix(pets()?), sample())?;
        // c = [2, 0, 1, 0], c · S = [2, 1, 1, 0]
        let ctx = ["feed", "the"];
        assert_eq!(lm.prob("cat", &ctx), -1.0);
        assert_eq!(lm.prob("dog", &ctx), -2.0);
        assert_eq!(lm.prob("fish", &ctx), -2.0);
        assert_eq!(lm.prob(OOV, &ctx), f64::NEG_INFINITY);
        assert_eq!(lm.prob("hamster", &ctx), f64::NEG_INFINITY);

        // MLE では dog は 0
        let mle = SmoothedLM::new(Mle, sample())?;
        assert_eq!(mle.prob("dog", &ctx), f64::NEG_INFINITY);
        Ok(())
    }

    #[test]
    fn test_probdist_matches_prob() -> Result<()> {
        let lm = SmoothedLM::new(SimilaritySmoothing::with_matrix(pets()?), sample())?;
        let ctx = ["walk", "the"];
        let dist = lm.probdist(&ctx);
        for (word, p) in lm.vocabulary().words().iter().zip(&dist) {
            assert_eq!(lm.prob(word, &ctx), *p);
        }
        Ok(())
    }

    #[test]
    fn test_zero_normalizer() -> Result<()> {
        let lm = SmoothedLM::new(SimilaritySmoothing::with_matrix(pets()?), sample())?;
        assert_eq!(lm.prob("cat", &["never", "seen"]), f64::NEG_INFINITY);
        Ok(())
    }

    #[test]
    fn test_provider_receives_vocabulary() -> Result<()> {
        let provider = |vocab: &[String]| -> Result<SimilarityMatrix> {
            assert_eq!(vocab, &["cat", "dog", "fish", OOV]);
            Ok(SimilarityMatrix::identity(vocab.len()))
        };
        let lm = SmoothedLM::new(SimilaritySmoothing::with_provider(provider), sample())?;
        assert_eq!(lm.similarity_matrix().dim(), 4);
        Ok(())
    }

    #[test]
    fn test_provider_rebuilds_on_update() -> Result<()> {
        let provider = |vocab: &[String]| -> Result<SimilarityMatrix> {
            Ok(SimilarityMatrix::identity(vocab.len()))
        };
        let mut lm = SmoothedLM::new(SimilaritySmoothing::with_provider(provider), sample())?;

        let mut table = CountTable::new();
        table.insert(Context::empty(), "x", 1);
        table.insert(Context::empty(), "y", 1);
        lm.update_counts(table)?;
        assert_eq!(lm.similarity_matrix().dim(), 3);
        Ok(())
    }

    #[test]
    fn test_failed_update_keeps_previous_snapshot() -> Result<()> {
        let mut lm = SmoothedLM::new(SimilaritySmoothing::with_matrix(pets()?), sample())?;
        let before = lm.probdist(&["feed", "the"]);

        // 語彙が 3 になるので 4x4 の行列とは合わない
        let mut table = CountTable::new();
        table.insert(Context::empty(), "a", 1);
        table.insert(Context::empty(), "b", 1);
        let err = lm.update_counts(table).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ConfigurationError>(),
            Some(ConfigurationError::MatrixDimensionMismatch { expected: 3, actual: 4 })
        ));

        assert_eq!(lm.vocabulary().len(), 4);
        assert_eq!(lm.probdist(&["feed", "the"]), before);
        Ok(())
    }

    #[test]
    fn test_normalize_rows() -> Result<()> {
        let half = SimilarityMatrix::from_rows(vec![
            vec![0.5, 0.25, 0.0, 0.0],
            vec![0.0, 0.5, 0.0, 0.0],
            vec![0.0, 0.0, 0.5, 0.0],
            vec![0.0, 0.0, 0.0, 0.5],
        ])?;
        let mut lm = SmoothedLM::new(SimilaritySmoothing::with_matrix(half.clone()), sample())?;
        // 自動では正規化しない
        assert_eq!(lm.similarity_matrix(), &half);
        lm.normalize_similarity_rows();
        assert_eq!(lm.similarity_matrix().row(0), &[1.0, 0.5, 0.0, 0.0]);

        let lm = SmoothedLM::new(
            SimilaritySmoothing::with_matrix(half).normalize_rows(true),
            sample(),
        )?;
        assert_eq!(lm.similarity_matrix().get(1, 1), 1.0);
        Ok(())
    }
}
