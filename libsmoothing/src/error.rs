use thiserror::Error;

/// 構築時にだけ発生する設定エラー。
/// クエリ時 (prob/probdist) にはエラーを返さない。-inf はデータとして返す。
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigurationError {
    #[error("similarity smoothing needs a similarity matrix or a similarity provider")]
    MissingSimilaritySource,
    #[error("smoothing constant must be a finite non-negative number: {0}")]
    InvalidSmoothingConstant(f64),
    #[error("similarity matrix is not square: {rows}x{cols}")]
    MatrixNotSquare { rows: usize, cols: usize },
    #[error("similarity matrix dimension {actual} does not match vocabulary size {expected}")]
    MatrixDimensionMismatch { expected: usize, actual: usize },
    #[error("similarity[{row}][{col}] = {value} is outside of [0, 1]")]
    SimilarityOutOfRange { row: usize, col: usize, value: f64 },
    #[error("cannot parse smoothing config: {0}")]
    Unparsable(String),
}
