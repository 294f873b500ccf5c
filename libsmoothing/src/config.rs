use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::{Context as _, Result};
use log::info;
use serde::{Deserialize, Serialize};

use crate::counts::CountTable;
use crate::error::ConfigurationError;
use crate::lm::additive::{AdditiveSmoothing, DEFAULT_K};
use crate::lm::base::ConditionalLM;
use crate::lm::mle::Mle;
use crate::lm::similarity::SimilaritySmoothing;
use crate::lm::smoothed_lm::SmoothedLM;
use crate::similarity_matrix::SimilaritySource;

fn default_k() -> f64 {
    DEFAULT_K
}

/**
 * 平滑化の設定。
 *
 * ```yaml
 * strategy: additive
 * k: 0.5
 * ```
 *
 * 類似度行列そのものは設定ファイルには書かない。build_lm に SimilaritySource として渡す。
 */
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "lowercase")]
pub enum SmoothingConfig {
    Mle,
    Additive {
        #[serde(default = "default_k")]
        k: f64,
    },
    Similarity {
        /// 行列を作るたびに各行の最大値を 1 にそろえる
        #[serde(default)]
        normalize_rows: bool,
    },
}

impl Default for SmoothingConfig {
    fn default() -> Self {
        SmoothingConfig::Additive { k: DEFAULT_K }
    }
}

impl SmoothingConfig {
    pub fn load_from_file(path: &Path) -> Result<SmoothingConfig> {
        info!("Loading smoothing config: {}", path.display());
        let file = File::open(path).with_context(|| format!("open {}", path.display()))?;
        let config: SmoothingConfig = serde_yaml::from_reader(BufReader::new(file))
            .map_err(|err| ConfigurationError::Unparsable(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml(yaml: &str) -> Result<SmoothingConfig> {
        let config: SmoothingConfig = serde_yaml::from_str(yaml)
            .map_err(|err| ConfigurationError::Unparsable(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        if let SmoothingConfig::Additive { k } = self {
            AdditiveSmoothing::new(*k)?;
        }
        Ok(())
    }
}

/**
 * 設定に従って言語モデルを作る。
 * similarity は Similarity のときだけ使う。Similarity なのに None なら設定エラー。
 */
pub fn build_lm(
    config: &SmoothingConfig,
    counts: CountTable,
    similarity: Option<SimilaritySource>,
) -> Result<Box<dyn ConditionalLM>> {
    let lm: Box<dyn ConditionalLM> = match config {
        SmoothingConfig::Mle => Box::new(SmoothedLM::new(Mle, counts)?),
        SmoothingConfig::Additive { k } => {
            Box::new(SmoothedLM::new(AdditiveSmoothing::new(*k)?, counts)?)
        }
        SmoothingConfig::Similarity { normalize_rows } => {
            let Some(source) = similarity else {
                return Err(ConfigurationError::MissingSimilaritySource.into());
            };
            let strategy = SimilaritySmoothing::new(source).normalize_rows(*normalize_rows);
            Box::new(SmoothedLM::new(strategy, counts)?)
        }
    };
    Ok(lm)
}
