use anyhow::Result;
use log::{info, warn};
use rustc_hash::FxHashMap;

use crate::context::Context;
use crate::counts::CountTable;
use crate::lm::base::{ConditionalLM, SmoothingStrategy};
use crate::lm::normalize::{log2_normalize, log2_normalize_at};
use crate::vocab::Vocabulary;

/// カウント・語彙・戦略の状態はいつも一緒に差し替える。
struct Snapshot<T> {
    counts: CountTable,
    vocab: Vocabulary,
    state: T,
}

/**
 * 平滑化された条件付き言語モデル。
 * update_counts は新しいスナップショットを作りきってから一度に差し替えるので、
 * 途中の状態が見えることはない。
 */
pub struct SmoothedLM<S: SmoothingStrategy> {
    strategy: S,
    snapshot: Snapshot<S::State>,
}

impl<S: SmoothingStrategy> SmoothedLM<S> {
    pub fn new(strategy: S, counts: CountTable) -> Result<SmoothedLM<S>> {
        let snapshot = Self::build_snapshot(&strategy, counts, &Vocabulary::default())?;
        Ok(SmoothedLM { strategy, snapshot })
    }

    fn build_snapshot(
        strategy: &S,
        counts: CountTable,
        previous: &Vocabulary,
    ) -> Result<Snapshot<S::State>> {
        let vocab = Vocabulary::resolve(&counts, previous);
        let state = strategy.prepare(&vocab)?;
        info!(
            "{}: vocabulary={} contexts={}",
            strategy.name(),
            vocab.len(),
            counts.len()
        );
        Ok(Snapshot {
            counts,
            vocab,
            state,
        })
    }

    /// 失敗したときは以前のスナップショットがそのまま残る。
    pub fn update_counts(&mut self, counts: CountTable) -> Result<()> {
        match Self::build_snapshot(&self.strategy, counts, &self.snapshot.vocab) {
            Ok(snapshot) => {
                self.snapshot = snapshot;
                Ok(())
            }
            Err(err) => {
                warn!("{}: rejected count update: {}", self.strategy.name(), err);
                Err(err)
            }
        }
    }

    pub fn prob<T: AsRef<str>>(&self, word: &str, context: &[T]) -> f64 {
        self.prob_in(word, &Context::new(context))
    }

    pub fn probdist<T: AsRef<str>>(&self, context: &[T]) -> Vec<f64> {
        self.probdist_in(&Context::new(context))
    }

    /// 単語 -> log2 確率。
    pub fn prob_map<T: AsRef<str>>(&self, context: &[T]) -> FxHashMap<String, f64> {
        self.vocabulary()
            .words()
            .iter()
            .cloned()
            .zip(self.probdist(context))
            .collect()
    }

    /// 戦略の count フックを通した、文脈における単語の補正済みカウント。
    pub fn count<T: AsRef<str>>(&self, context: &[T], word: &str) -> f64 {
        let local = self.snapshot.counts.local(&Context::new(context));
        self.strategy.count(local, word)
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.snapshot.vocab
    }

    pub fn counts(&self) -> &CountTable {
        &self.snapshot.counts
    }

    pub fn strategy(&self) -> &S {
        &self.strategy
    }

    pub(crate) fn state(&self) -> &S::State {
        &self.snapshot.state
    }

    pub(crate) fn state_mut(&mut self) -> &mut S::State {
        &mut self.snapshot.state
    }

    fn adjusted_counts(&self, context: &Context) -> Vec<f64> {
        let snapshot = &self.snapshot;
        self.strategy.adjusted_counts(
            &snapshot.state,
            &snapshot.vocab,
            snapshot.counts.local(context),
        )
    }

    fn prob_in(&self, word: &str, context: &Context) -> f64 {
        let idx = self.snapshot.vocab.resolve_index(word);
        log2_normalize_at(&self.adjusted_counts(context), idx)
    }

    fn probdist_in(&self, context: &Context) -> Vec<f64> {
        log2_normalize(&self.adjusted_counts(context))
    }
}

impl<S: SmoothingStrategy> ConditionalLM for SmoothedLM<S> {
    fn prob(&self, word: &str, context: &[&str]) -> f64 {
        self.prob_in(word, &Context::new(context))
    }

    fn probdist(&self, context: &[&str]) -> Vec<f64> {
        self.probdist_in(&Context::new(context))
    }

    fn update_counts(&mut self, counts: CountTable) -> Result<()> {
        SmoothedLM::update_counts(self, counts)
    }

    fn vocabulary(&self) -> &Vocabulary {
        &self.snapshot.vocab
    }
}
