//! 説明文の類似度計算
//!
//! 単語集合のJaccard係数をパーセントで返す。

use std::collections::HashSet;

/// 区切り文字: Unicode空白 + 情報分離文字 U+001C〜U+001F
fn is_separator(c: char) -> bool {
    c.is_whitespace() || ('\u{1c}'..='\u{1f}').contains(&c)
}

/// 大文字小文字を無視した空白区切りの単語集合
pub fn tokenize(text: &str) -> HashSet<String> {
    text.split(is_separator)
        .filter(|w| !w.is_empty())
        .map(|w| w.to_lowercase())
        .collect()
}

/// 類似度を計算（単語集合のJaccard係数、0〜100）
///
/// 両方とも空なら100、片方だけ空なら0。
pub fn similarity_score(a: &str, b: &str) -> f64 {
    let words_a = tokenize(a);
    let words_b = tokenize(b);

    if words_a.is_empty() && words_b.is_empty() {
        return 100.0;
    }
    if words_a.is_empty() || words_b.is_empty() {
        return 0.0;
    }

    let intersection = words_a.intersection(&words_b).count();
    let union = words_a.union(&words_b).count();

    intersection as f64 / union as f64 * 100.0
}
