use std::sync::Arc;

use canonical::{CanonicalizeConfig, Document, MediaType, SegmentConfig, Sentence};
use futures::stream::{self, StreamExt};
use perceptual::{SimilarityScore, SimilarityScorer, TokenProfile};
use retriever::{Candidate, CandidateRetriever};
use tokio::time::{timeout_at, Instant};
use tracing::{debug, error, info, warn};

use crate::metrics::metrics_recorder;
use crate::types::{
    MatchConfig, MatchError, MatchPhase, MatchResult, PlagiarismReport, SentenceStatus,
};

/// Checks each sentence of a document against candidate sources.
///
/// Sentences are independent: a failed or slow retrieval only costs the
/// sentence that issued it, and the report is folded once every sentence
/// has finished (or given up at the deadline).
pub struct PlagiarismMatcher {
    scoring: Arc<CandidateScoring>,
    retriever: Arc<dyn CandidateRetriever>,
}

/// The CPU-bound half of a sentence evaluation, shared with blocking tasks.
struct CandidateScoring {
    cfg: MatchConfig,
    segment: SegmentConfig,
    scorer: SimilarityScorer,
}

impl PlagiarismMatcher {
    pub fn new(
        cfg: MatchConfig,
        segment: SegmentConfig,
        scorer: SimilarityScorer,
        retriever: Arc<dyn CandidateRetriever>,
    ) -> Result<Self, MatchError> {
        cfg.validate()?;
        segment.validate()?;
        Ok(Self {
            scoring: Arc::new(CandidateScoring {
                cfg,
                segment,
                scorer,
            }),
            retriever,
        })
    }

    pub fn config(&self) -> &MatchConfig {
        &self.scoring.cfg
    }

    pub fn segment_config(&self) -> &SegmentConfig {
        &self.scoring.segment
    }

    pub fn retriever_name(&self) -> &str {
        self.retriever.name()
    }

    /// Runs a plagiarism check over `doc`.
    ///
    /// Never fails: retrieval problems degrade single sentences, and once
    /// `deadline` passes the remaining sentences are reported as
    /// [`SentenceStatus::DeadlineExceeded`] without issuing further calls.
    pub async fn check(&self, doc: &Document, deadline: Instant) -> PlagiarismReport {
        let started = std::time::Instant::now();
        log_phase(doc, MatchPhase::Segmenting);

        let cfg = self.config();
        let mut sentences = doc.sentences(self.segment_config());
        let evaluated: Vec<Sentence> = sentences.by_ref().take(cfg.max_sentences).collect();
        let truncated = sentences.next().is_some();

        if evaluated.is_empty() {
            debug!(doc_id = doc.id(), "no sentences; skipping retrieval");
            log_phase(doc, MatchPhase::Done);
            return PlagiarismReport::empty();
        }
        if truncated {
            info!(
                doc_id = doc.id(),
                max_sentences = cfg.max_sentences,
                "sentence cap reached; remaining sentences not checked"
            );
        }

        log_phase(doc, MatchPhase::Retrieving);
        // Unordered so a slow sentence never holds back the ones queued
        // behind it; document order is restored afterwards.
        let mut results: Vec<MatchResult> = stream::iter(evaluated)
            .map(|sentence| self.evaluate(sentence, doc.config(), deadline))
            .buffer_unordered(cfg.max_concurrency)
            .collect()
            .await;
        results.sort_by_key(|r| r.sentence.index);

        log_phase(doc, MatchPhase::Aggregating);
        let report = PlagiarismReport::from_results(results, truncated);
        let latency = started.elapsed();

        if let Some(recorder) = metrics_recorder() {
            recorder.record_check(
                self.retriever.name(),
                latency,
                report.total_sentences,
                report.matched_sentences,
            );
        }
        info!(
            doc_id = doc.id(),
            retriever = self.retriever.name(),
            total = report.total_sentences,
            matched = report.matched_sentences,
            aggregate = report.aggregate_similarity,
            latency_ms = latency.as_millis() as u64,
            "plagiarism check complete"
        );
        log_phase(doc, MatchPhase::Done);
        report
    }

    async fn evaluate(
        &self,
        sentence: Sentence,
        canonical: &CanonicalizeConfig,
        deadline: Instant,
    ) -> MatchResult {
        if Instant::now() >= deadline {
            return MatchResult::unmatched(sentence, SentenceStatus::DeadlineExceeded);
        }

        let retrieval = self.retriever.retrieve(&sentence.tokens, self.config().k);
        let candidates = match timeout_at(deadline, retrieval).await {
            Ok(Ok(candidates)) => candidates,
            Ok(Err(error)) => {
                if error.is_transient() {
                    warn!(sentence = sentence.index, %error, "retrieval failed");
                } else {
                    error!(sentence = sentence.index, %error, "retriever misconfigured");
                }
                return MatchResult::unmatched(sentence, SentenceStatus::RetrievalFailed);
            }
            Err(_) => {
                warn!(sentence = sentence.index, "request deadline reached during retrieval");
                return MatchResult::unmatched(sentence, SentenceStatus::DeadlineExceeded);
            }
        };
        if candidates.is_empty() {
            return MatchResult::unmatched(sentence, SentenceStatus::NoCandidates);
        }

        debug!(
            sentence = sentence.index,
            phase = MatchPhase::Scoring.as_str(),
            candidates = candidates.len(),
            "scoring candidates"
        );
        let index = sentence.index;
        let fallback = sentence.clone();
        let scoring = Arc::clone(&self.scoring);
        let canonical = canonical.clone();
        let scored = tokio::task::spawn_blocking(move || {
            scoring.score_candidates(sentence, candidates, &canonical)
        })
        .await;
        match scored {
            Ok(result) => result,
            Err(error) => {
                warn!(sentence = index, %error, "candidate scoring failed");
                MatchResult::unmatched(fallback, SentenceStatus::RetrievalFailed)
            }
        }
    }
}

impl CandidateScoring {
    fn score_candidates(
        &self,
        sentence: Sentence,
        candidates: Vec<Candidate>,
        canonical: &CanonicalizeConfig,
    ) -> MatchResult {
        let tokens: Vec<&str> = sentence.token_texts().collect();
        let profile = self.scorer.profile(&tokens);

        // Candidates arrive best-ranked first; ties keep the earlier one.
        let mut best: Option<(SimilarityScore, Candidate)> = None;
        for candidate in candidates.into_iter().take(self.cfg.k) {
            let Some(score) = self.candidate_score(&sentence, &profile, &candidate, canonical)
            else {
                continue;
            };
            let better = best
                .as_ref()
                .map_or(true, |(current, _)| score.value > current.value);
            if better {
                best = Some((score, candidate));
            }
        }

        match best {
            Some((score, candidate)) if score.value >= self.cfg.match_threshold => MatchResult {
                sentence,
                candidate: Some(candidate),
                score: Some(score),
                status: SentenceStatus::Matched,
            },
            Some((score, _)) => MatchResult {
                sentence,
                candidate: None,
                score: Some(score),
                status: SentenceStatus::BelowThreshold,
            },
            None => MatchResult::unmatched(sentence, SentenceStatus::NoCandidates),
        }
    }

    /// Best score of `profile` against the candidate as a whole and, when
    /// windowing is on, against each of its sentences.
    fn candidate_score(
        &self,
        sentence: &Sentence,
        profile: &TokenProfile,
        candidate: &Candidate,
        canonical: &CanonicalizeConfig,
    ) -> Option<SimilarityScore> {
        let doc = match Document::new(
            format!("candidate-{}", candidate.rank),
            candidate.text.as_str(),
            MediaType::PlainText,
            canonical.clone(),
        ) {
            Ok(doc) => doc,
            Err(error) => {
                debug!(source = %candidate.source, %error, "candidate skipped");
                return None;
            }
        };
        if doc.is_empty() {
            return None;
        }

        let whole: Vec<&str> = doc.tokens().iter().map(|t| t.text.as_str()).collect();
        let (mut value, mut metric) = self.scorer.compare(profile, &self.scorer.profile(&whole));

        if self.cfg.window_candidates && value < 1.0 {
            for window in doc.sentences(&self.segment) {
                let tokens: Vec<&str> = window.token_texts().collect();
                let (v, m) = self.scorer.compare(profile, &self.scorer.profile(&tokens));
                if v > value {
                    value = v;
                    metric = m;
                }
                if value >= 1.0 {
                    break;
                }
            }
        }

        Some(SimilarityScore {
            value,
            left: format!("sentence-{}", sentence.index),
            right: candidate.source.clone(),
            metric,
        })
    }
}

fn log_phase(doc: &Document, phase: MatchPhase) {
    debug!(doc_id = doc.id(), phase = phase.as_str(), "plagiarism check phase");
}
