use anyhow::Result;

use crate::error::ConfigurationError;

/**
 * 語彙サイズ x 語彙サイズ の類似度行列。
 * 行・列の並びは Vocabulary の並びと一致させる。値は [0, 1] で、1 が最大の類似度。
 */
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityMatrix {
    dim: usize,
    // row-major
    data: Vec<f64>,
}

impl SimilarityMatrix {
    pub fn new(dim: usize, data: Vec<f64>) -> Result<SimilarityMatrix> {
        if data.len() != dim * dim {
            return Err(ConfigurationError::MatrixNotSquare {
                rows: dim,
                cols: if dim == 0 { data.len() } else { data.len() / dim },
            }
            .into());
        }
        for (i, value) in data.iter().enumerate() {
            if !(0.0..=1.0).contains(value) {
                return Err(ConfigurationError::SimilarityOutOfRange {
                    row: i / dim,
                    col: i % dim,
                    value: *value,
                }
                .into());
            }
        }
        Ok(SimilarityMatrix { dim, data })
    }

    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<SimilarityMatrix> {
        let dim = rows.len();
        let mut data = Vec::with_capacity(dim * dim);
        for row in rows {
            if row.len() != dim {
                return Err(ConfigurationError::MatrixNotSquare {
                    rows: dim,
                    cols: row.len(),
                }
                .into());
            }
            data.extend(row);
        }
        SimilarityMatrix::new(dim, data)
    }

    /// 各単語が自分自身とだけ類似している行列。
    pub fn identity(dim: usize) -> SimilarityMatrix {
        let mut data = vec![0.0; dim * dim];
        for i in 0..dim {
            data[i * dim + i] = 1.0;
        }
        SimilarityMatrix { dim, data }
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[row * self.dim + col]
    }

    pub fn row(&self, row: usize) -> &[f64] {
        &self.data[row * self.dim..(row + 1) * self.dim]
    }

    /// 語彙サイズと一致しているか。
    pub fn check_dim(&self, vocab_size: usize) -> Result<()> {
        if self.dim != vocab_size {
            return Err(ConfigurationError::MatrixDimensionMismatch {
                expected: vocab_size,
                actual: self.dim,
            }
            .into());
        }
        Ok(())
    }

    /**
     * counts · S を計算する。
     * 観測された単語の質量を、類似度に比例して似た単語へ振り分ける。
     */
    pub fn redistribute(&self, counts: &[f64]) -> Vec<f64> {
        assert_eq!(counts.len(), self.dim);
        let mut adjusted = vec![0.0; self.dim];
        for (i, &count) in counts.iter().enumerate() {
            if count == 0.0 {
                continue;
            }
            for (dst, sim) in adjusted.iter_mut().zip(self.row(i)) {
                *dst += count * sim;
            }
        }
        adjusted
    }

    /// 各行を、その行の最大値が 1 になるようにスケールする。
    /// 全部 0 の行はそのまま。
    pub fn normalize_rows(&mut self) {
        let dim = self.dim;
        for row in self.data.chunks_mut(dim.max(1)) {
            let max = row.iter().copied().fold(0.0_f64, f64::max);
            if max > 0.0 {
                row.iter_mut().for_each(|v| *v /= max);
            }
        }
    }
}

/// 語彙を受け取って、それに並びを合わせた類似度行列を返すもの。
pub trait SimilarityProvider {
    fn similarity_matrix(&self, vocab: &[String]) -> Result<SimilarityMatrix>;
}

impl<F> SimilarityProvider for F
where
    F: Fn(&[String]) -> Result<SimilarityMatrix>,
{
    fn similarity_matrix(&self, vocab: &[String]) -> Result<SimilarityMatrix> {
        self(vocab)
    }
}

/// 類似度平滑化の入力。行列を直接渡すか、語彙から行列を作る provider を渡す。
pub enum SimilaritySource {
    Matrix(SimilarityMatrix),
    Provider(Box<dyn SimilarityProvider>),
}

impl std::fmt::Debug for SimilaritySource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SimilaritySource::Matrix(mat) => f.debug_tuple("Matrix").field(mat).finish(),
            SimilaritySource::Provider(_) => f.write_str("Provider(..)"),
        }
    }
}
