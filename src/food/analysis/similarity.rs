use std::collections::HashSet;

/// Normalized edit-distance similarity in [0, 1]. Inputs are compared as given,
/// so callers lowercase first.
pub fn sequence_ratio(a: &str, b: &str) -> f64 {
    strsim::normalized_levenshtein(a, b).clamp(0.0, 1.0)
}

/// Splits on whitespace and commas, the separators FoodData Central uses in
/// descriptions like "Chicken, broilers or fryers, breast".
pub fn tokens(text: &str) -> HashSet<&str> {
    text.split(|c: char| c.is_whitespace() || c == ',')
        .map(|t| t.trim_matches(|c: char| c.is_ascii_punctuation() && c != '%'))
        .filter(|t| !t.is_empty())
        .collect()
}

/// Share of `needle` tokens that also occur in `haystack`. Zero for an empty needle.
pub fn token_overlap(needle: &HashSet<&str>, haystack: &HashSet<&str>) -> f64 {
    if needle.is_empty() {
        return 0.0;
    }
    needle.intersection(haystack).count() as f64 / needle.len() as f64
}

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequence_ratio_bounds() {
        assert_eq!(sequence_ratio("chicken", "chicken"), 1.0);
        assert!(sequence_ratio("chicken", "salmon") < 0.5);
        let r = sequence_ratio("鶏肉", "chicken");
        assert!((0.0..=1.0).contains(&r));
    }

    #[test]
    fn test_tokens_strip_description_commas() {
        let t = tokens("Chicken, broilers or fryers, breast".to_lowercase().as_str())
            .into_iter()
            .map(String::from)
            .collect::<HashSet<_>>();
        assert!(t.contains("chicken"));
        assert!(t.contains("breast"));
        assert!(!t.iter().any(|w| w.ends_with(',')));
    }

    #[test]
    fn test_token_overlap() {
        let query = tokens("chicken breast");
        let desc = tokens("chicken, breast, roasted");
        assert_eq!(token_overlap(&query, &desc), 1.0);
        assert_eq!(token_overlap(&tokens(""), &desc), 0.0);
        assert_eq!(token_overlap(&tokens("beef loin"), &desc), 0.0);
    }

    #[test]
    fn test_mean_of_empty_is_zero() {
        assert_eq!(mean(&[]), 0.0);
        assert_eq!(mean(&[0.5, 1.0]), 0.75);
    }
}
