//! In-memory corpus with an inverted term index.
//!
//! Useful offline and in tests: documents are added under a stable key and
//! ranked by how many distinct query terms they contain.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::path::Path;
use std::sync::RwLock;

use async_trait::async_trait;
use canonical::{decode, tokenize, CanonicalizeConfig, MediaType, Token};
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::{Candidate, CandidateRetriever, RetrievalError};

#[derive(Debug, Default)]
struct CorpusIndex {
    docs: BTreeMap<String, String>,
    postings: HashMap<String, BTreeSet<String>>,
}

/// Corpus of known sources held in memory.
#[derive(Debug)]
pub struct CorpusRetriever {
    index: RwLock<CorpusIndex>,
    cfg: CanonicalizeConfig,
}

impl CorpusRetriever {
    pub fn new(cfg: CanonicalizeConfig) -> Self {
        Self {
            index: RwLock::new(CorpusIndex::default()),
            cfg,
        }
    }

    /// Adds or replaces the document stored under `key`.
    pub fn insert(&self, key: impl Into<String>, text: impl Into<String>) -> Result<(), RetrievalError> {
        let key = key.into();
        let text = text.into();
        let terms: HashSet<String> = tokenize(&text, &self.cfg)
            .into_iter()
            .map(|t| t.text)
            .collect();

        let mut guard = self
            .index
            .write()
            .map_err(|_| RetrievalError::unavailable("poisoned corpus lock"))?;
        if let Some(previous) = guard.docs.remove(&key) {
            for token in tokenize(&previous, &self.cfg) {
                if let Some(keys) = guard.postings.get_mut(&token.text) {
                    keys.remove(&key);
                }
            }
            guard.postings.retain(|_, keys| !keys.is_empty());
        }
        for term in terms {
            guard.postings.entry(term).or_default().insert(key.clone());
        }
        guard.docs.insert(key, text);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.index.read().map(|g| g.docs.len()).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Loads every decodable file under `root`, keyed by its path relative
    /// to `root`. Files of unsupported types are skipped; files that fail to
    /// decode are skipped with a warning.
    pub fn load_dir(root: impl AsRef<Path>, cfg: CanonicalizeConfig) -> Result<Self, RetrievalError> {
        let root = root.as_ref();
        if !root.is_dir() {
            return Err(RetrievalError::InvalidConfig(format!(
                "corpus directory {} does not exist",
                root.display()
            )));
        }

        let corpus = Self::new(cfg);
        for entry in WalkDir::new(root).sort_by_file_name() {
            let entry = entry.map_err(|e| RetrievalError::unavailable(e.to_string()))?;
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path();
            let media_type = MediaType::infer(path.file_name().and_then(|n| n.to_str()), None);
            if matches!(media_type, MediaType::Unsupported(_)) {
                continue;
            }
            let bytes = std::fs::read(path).map_err(|e| RetrievalError::unavailable(e.to_string()))?;
            let text = match decode(&bytes, &media_type) {
                Ok(text) => text,
                Err(err) => {
                    warn!(path = %path.display(), error = %err, "skipping undecodable corpus file");
                    continue;
                }
            };
            let key = path
                .strip_prefix(root)
                .unwrap_or(path)
                .to_string_lossy()
                .replace('\\', "/");
            corpus.insert(key, text)?;
        }
        debug!(root = %root.display(), documents = corpus.len(), "corpus loaded");
        Ok(corpus)
    }
}

#[async_trait]
impl CandidateRetriever for CorpusRetriever {
    async fn retrieve(&self, query: &[Token], k: usize) -> Result<Vec<Candidate>, RetrievalError> {
        let guard = self
            .index
            .read()
            .map_err(|_| RetrievalError::unavailable("poisoned corpus lock"))?;

        let terms: HashSet<&str> = query.iter().map(|t| t.text.as_str()).collect();
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for term in terms {
            if let Some(keys) = guard.postings.get(term) {
                for key in keys {
                    *counts.entry(key.as_str()).or_default() += 1;
                }
            }
        }

        let mut ranked: Vec<(&str, usize)> = counts.into_iter().collect();
        ranked.sort_unstable_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));

        Ok(ranked
            .into_iter()
            .take(k)
            .enumerate()
            .filter_map(|(rank, (key, _))| {
                guard.docs.get(key).map(|text| Candidate {
                    source: key.to_string(),
                    text: text.clone(),
                    rank,
                })
            })
            .collect())
    }

    fn name(&self) -> &str {
        "corpus"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(text: &str) -> Vec<Token> {
        tokenize(text, &CanonicalizeConfig::default())
    }

    fn corpus() -> CorpusRetriever {
        let corpus = CorpusRetriever::new(CanonicalizeConfig::default());
        corpus.insert("b-doc", "The quick brown fox.").unwrap();
        corpus.insert("a-doc", "A quick brown dog.").unwrap();
        corpus.insert("c-doc", "Nothing relevant here.").unwrap();
        corpus
    }

    #[tokio::test]
    async fn ranks_by_distinct_term_overlap_then_key() {
        let found = corpus().retrieve(&query("quick brown fox"), 5).await.unwrap();
        let keys: Vec<&str> = found.iter().map(|c| c.source.as_str()).collect();
        assert_eq!(keys, vec!["b-doc", "a-doc"]);
        assert_eq!(found[0].rank, 0);
        assert_eq!(found[1].rank, 1);
    }

    #[tokio::test]
    async fn ties_broken_by_key() {
        let found = corpus().retrieve(&query("quick brown"), 5).await.unwrap();
        let keys: Vec<&str> = found.iter().map(|c| c.source.as_str()).collect();
        assert_eq!(keys, vec!["a-doc", "b-doc"]);
    }

    #[tokio::test]
    async fn respects_k_and_empty_query() {
        let c = corpus();
        assert_eq!(c.retrieve(&query("quick"), 1).await.unwrap().len(), 1);
        assert!(c.retrieve(&[], 5).await.unwrap().is_empty());
        assert!(c.retrieve(&query("quick"), 0).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn insert_replaces_previous_text() {
        let c = corpus();
        c.insert("b-doc", "Completely different words.").unwrap();
        let found = c.retrieve(&query("fox"), 5).await.unwrap();
        assert!(found.is_empty());
        assert_eq!(c.len(), 3);
    }
}
