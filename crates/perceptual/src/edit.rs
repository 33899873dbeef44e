//! Token-level edit distance.

/// Levenshtein distance between two token-hash sequences, using two rows of
/// dynamic programming state (O(min(n, m)) memory).
pub fn levenshtein(a: &[u64], b: &[u64]) -> usize {
    let (long, short) = if a.len() >= b.len() { (a, b) } else { (b, a) };
    if short.is_empty() {
        return long.len();
    }

    let mut prev: Vec<usize> = (0..=short.len()).collect();
    let mut curr = vec![0usize; short.len() + 1];

    for (i, x) in long.iter().enumerate() {
        curr[0] = i + 1;
        for (j, y) in short.iter().enumerate() {
            let substitution = prev[j] + usize::from(x != y);
            curr[j + 1] = substitution.min(prev[j + 1] + 1).min(curr[j] + 1);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[short.len()]
}

/// `1 - distance / max(len_a, len_b)`; two empty sequences score 1.0.
pub fn edit_similarity(a: &[u64], b: &[u64]) -> f64 {
    let max_len = a.len().max(b.len());
    if max_len == 0 {
        return 1.0;
    }
    1.0 - levenshtein(a, b) as f64 / max_len as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classic_distances() {
        // kitten -> sitting, one hash per character.
        let kitten: Vec<u64> = "kitten".bytes().map(u64::from).collect();
        let sitting: Vec<u64> = "sitting".bytes().map(u64::from).collect();
        assert_eq!(levenshtein(&kitten, &sitting), 3);
        assert_eq!(levenshtein(&sitting, &kitten), 3);
    }

    #[test]
    fn empty_sides() {
        assert_eq!(levenshtein(&[], &[1, 2, 3]), 3);
        assert_eq!(levenshtein(&[], &[]), 0);
        assert_eq!(edit_similarity(&[], &[]), 1.0);
        assert_eq!(edit_similarity(&[], &[1]), 0.0);
    }

    #[test]
    fn single_substitution() {
        let sim = edit_similarity(&[1, 2, 3, 4], &[1, 2, 9, 4]);
        assert!((sim - 0.75).abs() < f64::EPSILON);
    }
}
