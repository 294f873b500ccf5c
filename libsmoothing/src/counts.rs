use rustc_hash::FxHashMap;

use crate::context::Context;

/// ある文脈での単語ごとの出現回数。
pub type WordCounts = FxHashMap<String, u32>;

/**
 * 文脈 -> 単語 -> 出現回数 の二段のテーブル。
 * 空の文脈のエントリが語彙全体を列挙する。
 */
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CountTable {
    table: FxHashMap<Context, WordCounts>,
}

impl CountTable {
    pub fn new() -> CountTable {
        CountTable::default()
    }

    /// 回数を上書きする。
    pub fn insert(&mut self, context: Context, word: &str, count: u32) {
        self.table
            .entry(context)
            .or_default()
            .insert(word.to_string(), count);
    }

    /// 回数を加算する。
    pub fn add(&mut self, context: Context, word: &str, count: u32) {
        let entry = self
            .table
            .entry(context)
            .or_default()
            .entry(word.to_string())
            .or_insert(0);
        *entry = entry.saturating_add(count);
    }

    /// 文脈ごとのサブテーブル。見つからなければ None。
    pub fn local(&self, context: &Context) -> Option<&WordCounts> {
        self.table.get(context)
    }

    /// 空の文脈 (unigram) のエントリ。
    pub fn unigram(&self) -> Option<&WordCounts> {
        self.table.get(&Context::empty())
    }

    /// 未知の文脈・未知の単語はどちらも 0 を返す。
    pub fn count(&self, context: &Context, word: &str) -> u32 {
        self.local(context)
            .and_then(|local| local.get(word))
            .copied()
            .unwrap_or(0)
    }

    pub fn contexts(&self) -> impl Iterator<Item = &Context> {
        self.table.keys()
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

impl FromIterator<(Context, String, u32)> for CountTable {
    fn from_iter<I: IntoIterator<Item = (Context, String, u32)>>(iter: I) -> Self {
        let mut table = CountTable::new();
        for (context, word, count) in iter {
            table.add(context, &word, count);
        }
        table
    }
}

impl From<FxHashMap<Context, WordCounts>> for CountTable {
    fn from(table: FxHashMap<Context, WordCounts>) -> Self {
        CountTable { table }
    }
}
