/**
 * 補正済みカウントを log2 確率に変換する。
 * 合計が 0 のときは正規化せずに log2 をそのまま返す (全要素 -inf。「情報なし」を表す)。
 */
pub fn log2_normalize(counts: &[f64]) -> Vec<f64> {
    let normalizer: f64 = counts.iter().sum();
    if normalizer == 0.0 {
        return counts.iter().map(|c| c.log2()).collect();
    }
    let log_normalizer = normalizer.log2();
    counts.iter().map(|c| c.log2() - log_normalizer).collect()
}

/// 1 要素だけ欲しいとき用。log2_normalize(counts)[idx] と同じ値を返す。
pub fn log2_normalize_at(counts: &[f64], idx: usize) -> f64 {
    let normalizer: f64 = counts.iter().sum();
    if normalizer == 0.0 {
        counts[idx].log2()
    } else {
        counts[idx].log2() - normalizer.log2()
    }
}
