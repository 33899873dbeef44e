use std::sync::{Arc, Mutex};
use std::time::Duration;

use canonical::{CanonicalizeConfig, Document, MediaType, SegmentConfig};
use matcher::{set_match_metrics, MatchConfig, MatchMetrics, PlagiarismMatcher};
use perceptual::{SimilarityConfig, SimilarityScorer};
use retriever::EmptyRetriever;

#[derive(Default)]
struct RecordingMetrics {
    checks: Mutex<Vec<(String, usize, usize)>>,
}

impl MatchMetrics for RecordingMetrics {
    fn record_check(&self, retriever: &str, _latency: Duration, total: usize, matched: usize) {
        self.checks
            .lock()
            .unwrap()
            .push((retriever.to_string(), total, matched));
    }
}

#[tokio::test]
async fn metrics_recorder_observes_checks() {
    let recorder = Arc::new(RecordingMetrics::default());
    set_match_metrics(Some(recorder.clone()));

    let scorer = SimilarityScorer::new(SimilarityConfig::default()).unwrap();
    let matcher = PlagiarismMatcher::new(
        MatchConfig::default(),
        SegmentConfig::default(),
        scorer,
        Arc::new(EmptyRetriever),
    )
    .unwrap();
    let doc = Document::new(
        "doc",
        "One sentence. Another sentence.",
        MediaType::PlainText,
        CanonicalizeConfig::default(),
    )
    .unwrap();
    let deadline = tokio::time::Instant::now() + Duration::from_secs(10);
    matcher.check(&doc, deadline).await;

    set_match_metrics(None);
    matcher.check(&doc, deadline).await;

    let checks = recorder.checks.lock().unwrap();
    assert_eq!(checks.as_slice(), &[("empty".to_string(), 2, 0)]);
}
