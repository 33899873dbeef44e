use canonical::{tokenize, CanonicalizeConfig};

/// English function words, written the way the tokenizer emits them
/// (lower-case, apostrophes dropped).
const ENGLISH: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "all", "also", "am", "an", "and", "any",
    "are", "arent", "as", "at", "be", "because", "been", "before", "being", "below", "between",
    "both", "but", "by", "can", "cant", "could", "couldnt", "did", "didnt", "do", "does", "doesnt",
    "doing", "dont", "down", "during", "each", "few", "for", "from", "further", "had", "hadnt",
    "has", "hasnt", "have", "havent", "having", "he", "her", "here", "hers", "herself", "him",
    "himself", "his", "how", "i", "if", "im", "in", "into", "is", "isnt", "it", "its", "itself",
    "ive", "just", "me", "more", "most", "my", "myself", "no", "nor", "not", "now", "of", "off",
    "on", "once", "only", "or", "other", "our", "ours", "ourselves", "out", "over", "own", "same",
    "she", "should", "shouldnt", "so", "some", "such", "than", "that", "thats", "the", "their",
    "theirs", "them", "themselves", "then", "there", "these", "they", "this", "those", "through",
    "to", "too", "under", "until", "up", "us", "very", "was", "wasnt", "we", "were", "werent",
    "what", "when", "where", "which", "while", "who", "whom", "why", "will", "with", "wont",
    "would", "wouldnt", "you", "youre", "your", "yours", "yourself", "yourselves",
];

/// Sorted, deduplicated stop-word list queried by binary search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StopWords {
    words: Vec<String>,
}

impl StopWords {
    pub fn english() -> Self {
        Self::from_words(ENGLISH.iter().copied())
    }

    /// Normalizes each entry with the default tokenizer so `"Don't"` and
    /// `"dont"` name the same stop word. Multi-word entries add every word.
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let cfg = CanonicalizeConfig::default();
        let mut list: Vec<String> = words
            .into_iter()
            .flat_map(|w| tokenize(w.as_ref(), &cfg))
            .map(|t| t.text)
            .collect();
        list.sort_unstable();
        list.dedup();
        Self { words: list }
    }

    pub fn extend<I, S>(&mut self, words: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let extra = Self::from_words(words);
        self.words.extend(extra.words);
        self.words.sort_unstable();
        self.words.dedup();
    }

    pub fn contains(&self, term: &str) -> bool {
        self.words
            .binary_search_by(|w| w.as_str().cmp(term))
            .is_ok()
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl Default for StopWords {
    fn default() -> Self {
        Self::english()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn english_list_answers_lookups() {
        let sw = StopWords::english();
        for word in ["the", "and", "for", "dont", "yourselves", "a"] {
            assert!(sw.contains(word), "{word}");
        }
        for word in ["seo", "rust", "keywords", "The"] {
            assert!(!sw.contains(word), "{word}");
        }
    }

    #[test]
    fn custom_words_are_normalized() {
        let mut sw = StopWords::from_words(["Lorem", "IPSUM", "Don't"]);
        assert!(sw.contains("lorem"));
        assert!(sw.contains("ipsum"));
        assert!(sw.contains("dont"));
        assert_eq!(sw.len(), 3);

        sw.extend(["dolor sit", "lorem"]);
        assert!(sw.contains("dolor"));
        assert!(sw.contains("sit"));
        assert_eq!(sw.len(), 5);
    }

    #[test]
    fn empty_list_contains_nothing() {
        let sw = StopWords::from_words(Vec::<String>::new());
        assert!(sw.is_empty());
        assert!(!sw.contains("the"));
    }
}
