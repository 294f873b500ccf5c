use log::debug;
use rustc_hash::FxHashMap;

use crate::counts::CountTable;

/// 語彙外の単語をまとめて表す記号。
pub const OOV: &str = "!OOV!";

/**
 * 確率ベクトルの添字を決める固定語彙。
 * OOV は常に含まれる。
 */
#[derive(Debug, Clone, PartialEq)]
pub struct Vocabulary {
    words: Vec<String>,
    index: FxHashMap<String, usize>,
}

impl Default for Vocabulary {
    fn default() -> Self {
        Vocabulary::from_words(Vec::<String>::new())
    }
}

impl Vocabulary {
    /// 重複を除き、OOV がなければ末尾に足す。順序はそのまま保持する。
    pub fn from_words<S: Into<String>>(words: Vec<S>) -> Vocabulary {
        let mut vocab = Vocabulary {
            words: Vec::with_capacity(words.len() + 1),
            index: FxHashMap::default(),
        };
        for word in words {
            vocab.push(word.into());
        }
        vocab.push(OOV.to_string());
        vocab
    }

    fn push(&mut self, word: String) {
        if self.index.contains_key(&word) {
            return;
        }
        self.index.insert(word.clone(), self.words.len());
        self.words.push(word);
    }

    /**
     * カウントテーブルの空文脈エントリから語彙を作る。
     * 空文脈がないときは previous をそのまま引き継ぐ。
     * ハッシュの列挙順は安定しないので、単語は辞書順に並べる。
     */
    pub fn resolve(counts: &CountTable, previous: &Vocabulary) -> Vocabulary {
        let Some(unigram) = counts.unigram() else {
            debug!(
                "No unigram entry; keeping previous vocabulary ({} words)",
                previous.len()
            );
            return previous.clone();
        };
        let mut words: Vec<&String> = unigram.keys().collect();
        words.sort();
        Vocabulary::from_words(words.into_iter().cloned().collect::<Vec<String>>())
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// OOV が常に入っているので空にはならない。
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn contains(&self, word: &str) -> bool {
        self.index.contains_key(word)
    }

    pub fn index_of(&self, word: &str) -> Option<usize> {
        self.index.get(word).copied()
    }

    pub fn oov_index(&self) -> usize {
        self.index[OOV]
    }

    /// 語彙外の単語は OOV の添字に読み替える。
    pub fn resolve_index(&self, word: &str) -> usize {
        self.index_of(word).unwrap_or_else(|| self.oov_index())
    }
}
