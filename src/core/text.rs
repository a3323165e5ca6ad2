use jieba_rs::Jieba;
use std::collections::HashMap;
use std::sync::OnceLock;

/// Shared segmenter instance (loading the dictionary is expensive)
fn segmenter() -> &'static Jieba {
    static JIEBA: OnceLock<Jieba> = OnceLock::new();
    JIEBA.get_or_init(Jieba::new)
}

/// Split a title into comparable word units
///
/// Uses dictionary-based segmentation so that non-space-delimited CJK
/// titles break into words; space-delimited text falls out of the same
/// pass. Tokens are lowercased and pure-punctuation tokens dropped.
pub fn tokenize(text: &str) -> Vec<String> {
    segmenter()
        .cut(text, true)
        .into_iter()
        .filter(|t| t.chars().any(char::is_alphanumeric))
        .map(|t| t.to_lowercase())
        .collect()
}

fn term_counts(tokens: &[String]) -> HashMap<&str, usize> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for token in tokens {
        *counts.entry(token.as_str()).or_insert(0) += 1;
    }
    counts
}

/// Cosine similarity of TF-IDF vectors over the two titles
///
/// The pair of titles is the entire corpus, so IDF is computed over
/// exactly two documents with the smoothed form `ln((1+n)/(1+df)) + 1`.
/// Degenerate input (nothing left after tokenization) scores 0.0 rather
/// than raising; identical titles score 1.0.
pub fn text_similarity(a: &str, b: &str) -> f64 {
    let tokens_a = tokenize(a);
    let tokens_b = tokenize(b);
    if tokens_a.is_empty() || tokens_b.is_empty() {
        return 0.0;
    }

    let counts_a = term_counts(&tokens_a);
    let counts_b = term_counts(&tokens_b);

    let mut dot = 0.0;
    let mut norm_a = 0.0;
    let mut norm_b = 0.0;

    let mut terms: Vec<&str> = counts_a.keys().chain(counts_b.keys()).copied().collect();
    terms.sort_unstable();
    terms.dedup();

    for term in terms {
        let tf_a = counts_a.get(term).copied().unwrap_or(0) as f64;
        let tf_b = counts_b.get(term).copied().unwrap_or(0) as f64;

        let df = (tf_a > 0.0) as u32 + (tf_b > 0.0) as u32;
        let idf = ((1.0 + 2.0) / (1.0 + df as f64)).ln() + 1.0;

        let weight_a = tf_a * idf;
        let weight_b = tf_b * idf;

        dot += weight_a * weight_b;
        norm_a += weight_a * weight_a;
        norm_b += weight_b * weight_b;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    (dot / (norm_a.sqrt() * norm_b.sqrt())).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_cjk_title() {
        let tokens = tokenize("夏季新款连衣裙女2024");
        assert!(tokens.len() >= 3, "expected word units, got {:?}", tokens);
        assert!(tokens.iter().any(|t| t == "连衣裙"));
    }

    #[test]
    fn test_tokenize_drops_punctuation_and_lowercases() {
        let tokens = tokenize("Nike Air - Max! 2024");
        assert_eq!(tokens, vec!["nike", "air", "max", "2024"]);
    }

    #[test]
    fn test_identical_titles_score_one() {
        let sim = text_similarity("夏季连衣裙女长裙", "夏季连衣裙女长裙");
        assert!((sim - 1.0).abs() < 1e-9, "got {}", sim);
    }

    #[test]
    fn test_disjoint_titles_score_zero() {
        let sim = text_similarity("wireless bluetooth headphones", "夏季连衣裙");
        assert!(sim.abs() < 1e-9, "got {}", sim);
    }

    #[test]
    fn test_empty_title_scores_zero() {
        assert_eq!(text_similarity("", "连衣裙"), 0.0);
        assert_eq!(text_similarity("连衣裙", ""), 0.0);
        assert_eq!(text_similarity("!!!", "连衣裙"), 0.0);
    }

    #[test]
    fn test_overlapping_titles_score_between() {
        let sim = text_similarity(
            "夏季新款连衣裙女2024流行宽松显瘦气质长裙",
            "连衣裙女2024新款夏季显瘦气质长裙",
        );
        assert!(sim > 0.6 && sim < 1.0, "got {}", sim);
    }

    #[test]
    fn test_similarity_is_symmetric() {
        let a = "loose summer dress 2024";
        let b = "summer dress elegant long";
        assert!((text_similarity(a, b) - text_similarity(b, a)).abs() < 1e-12);
    }

    #[test]
    fn test_scores_within_unit_interval() {
        let pairs = [
            ("a b c", "a b c d e"),
            ("red shoes", "red red red shoes shoes"),
            ("x", "x"),
        ];
        for (a, b) in pairs {
            let sim = text_similarity(a, b);
            assert!((0.0..=1.0).contains(&sim), "{} vs {} -> {}", a, b, sim);
        }
    }
}
