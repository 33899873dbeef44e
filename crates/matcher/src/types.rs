use canonical::Sentence;
use perceptual::SimilarityScore;
use retriever::Candidate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Report message when the input had no sentence to check.
pub const NO_SENTENCES_MESSAGE: &str = "No sentences found in the submitted text.";
/// Report message when no sentence cleared the match threshold.
pub const NO_MATCHES_MESSAGE: &str = "No plagiarism detected!";

/// Stage of a plagiarism check. Logged as the request moves through it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MatchPhase {
    Segmenting,
    Retrieving,
    Scoring,
    Aggregating,
    Done,
}

impl MatchPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchPhase::Segmenting => "segmenting",
            MatchPhase::Retrieving => "retrieving",
            MatchPhase::Scoring => "scoring",
            MatchPhase::Aggregating => "aggregating",
            MatchPhase::Done => "done",
        }
    }
}

/// Configuration for [`crate::PlagiarismMatcher`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MatchConfig {
    /// Candidates requested per sentence.
    #[serde(default = "MatchConfig::default_k")]
    pub k: usize,
    /// Minimum score for a candidate to count as the sentence's source.
    #[serde(default = "MatchConfig::default_match_threshold")]
    pub match_threshold: f64,
    /// Sentences evaluated concurrently.
    #[serde(default = "MatchConfig::default_max_concurrency")]
    pub max_concurrency: usize,
    /// Sentences past this many are not evaluated.
    #[serde(default = "MatchConfig::default_max_sentences")]
    pub max_sentences: usize,
    /// Also score against each sentence of a candidate and keep the best.
    ///
    /// A sentence copied out of a long page scores low against the page as a
    /// whole; windowing finds it.
    #[serde(default = "MatchConfig::default_window_candidates")]
    pub window_candidates: bool,
}

impl MatchConfig {
    pub const fn default_k() -> usize {
        5
    }

    pub const fn default_match_threshold() -> f64 {
        0.5
    }

    pub const fn default_max_concurrency() -> usize {
        8
    }

    pub const fn default_max_sentences() -> usize {
        20
    }

    pub const fn default_window_candidates() -> bool {
        true
    }

    pub fn with_k(mut self, k: usize) -> Self {
        self.k = k;
        self
    }

    pub fn with_match_threshold(mut self, threshold: f64) -> Self {
        self.match_threshold = threshold;
        self
    }

    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = max_concurrency;
        self
    }

    pub fn with_max_sentences(mut self, max_sentences: usize) -> Self {
        self.max_sentences = max_sentences;
        self
    }

    pub fn validate(&self) -> Result<(), MatchError> {
        if self.k == 0 {
            return Err(MatchError::InvalidConfig(
                "k must be greater than zero".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.match_threshold) {
            return Err(MatchError::InvalidConfig(
                "match_threshold must be between 0.0 and 1.0".into(),
            ));
        }
        if self.max_concurrency == 0 {
            return Err(MatchError::InvalidConfig(
                "max_concurrency must be greater than zero".into(),
            ));
        }
        if self.max_sentences == 0 {
            return Err(MatchError::InvalidConfig(
                "max_sentences must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            k: Self::default_k(),
            match_threshold: Self::default_match_threshold(),
            max_concurrency: Self::default_max_concurrency(),
            max_sentences: Self::default_max_sentences(),
            window_candidates: Self::default_window_candidates(),
        }
    }
}

/// How a sentence's evaluation ended.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SentenceStatus {
    /// A candidate cleared the threshold.
    Matched,
    /// Candidates were scored but none cleared the threshold.
    BelowThreshold,
    /// The retriever returned nothing.
    NoCandidates,
    /// The retriever failed or timed out.
    RetrievalFailed,
    /// The request deadline passed before retrieval finished.
    DeadlineExceeded,
}

/// Outcome for one evaluated sentence.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MatchResult {
    pub sentence: Sentence,
    /// Best candidate, only when its score cleared the threshold.
    pub candidate: Option<Candidate>,
    /// Best score observed, even below the threshold.
    pub score: Option<SimilarityScore>,
    pub status: SentenceStatus,
}

impl MatchResult {
    pub(crate) fn unmatched(sentence: Sentence, status: SentenceStatus) -> Self {
        Self {
            sentence,
            candidate: None,
            score: None,
            status,
        }
    }

    pub fn is_match(&self) -> bool {
        self.status == SentenceStatus::Matched
    }

    /// Best observed score, or 0.0 when nothing was scored.
    pub fn similarity(&self) -> f64 {
        self.score.as_ref().map_or(0.0, |s| s.value)
    }
}

/// Per-request plagiarism findings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlagiarismReport {
    /// One entry per evaluated sentence, in document order.
    pub results: Vec<MatchResult>,
    /// Sum of matched scores over `total_sentences`.
    pub aggregate_similarity: f64,
    pub total_sentences: usize,
    pub matched_sentences: usize,
    /// Set when nothing meaningful was found.
    pub message: Option<String>,
    /// The sentence cap dropped part of the input.
    pub truncated: bool,
}

impl PlagiarismReport {
    pub(crate) fn empty() -> Self {
        Self {
            results: Vec::new(),
            aggregate_similarity: 0.0,
            total_sentences: 0,
            matched_sentences: 0,
            message: Some(NO_SENTENCES_MESSAGE.to_string()),
            truncated: false,
        }
    }

    /// Folds per-sentence results into a report.
    pub fn from_results(results: Vec<MatchResult>, truncated: bool) -> Self {
        let total_sentences = results.len();
        let (matched_sentences, matched_sum) = results
            .iter()
            .filter(|r| r.is_match())
            .fold((0usize, 0.0f64), |(n, sum), r| (n + 1, sum + r.similarity()));
        let aggregate_similarity = if total_sentences == 0 {
            0.0
        } else {
            (matched_sum / total_sentences as f64).clamp(0.0, 1.0)
        };
        let message = if total_sentences == 0 {
            Some(NO_SENTENCES_MESSAGE.to_string())
        } else if matched_sentences == 0 {
            Some(NO_MATCHES_MESSAGE.to_string())
        } else {
            None
        };
        Self {
            results,
            aggregate_similarity,
            total_sentences,
            matched_sentences,
            message,
            truncated,
        }
    }

    /// Matched sentences only.
    pub fn matches(&self) -> impl Iterator<Item = &MatchResult> {
        self.results.iter().filter(|r| r.is_match())
    }
}

/// Errors produced by the matching layer.
#[derive(Debug, Error)]
pub enum MatchError {
    /// Invalid matcher configuration.
    #[error("invalid match config: {0}")]
    InvalidConfig(String),
    /// Segmentation settings rejected.
    #[error("canonical error: {0}")]
    Canonical(#[from] canonical::CanonicalError),
}
