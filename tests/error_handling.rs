use std::time::Duration;

use simcheck::{
    Engine, EngineConfig, EngineError, FileInput, KeywordConfig, MatchConfig, PlagiarismInput,
    RetrieverConfig, RetrieverKind, SimilarityConfig,
};
use tokio::time::Instant;

fn engine() -> Engine {
    Engine::from_config(EngineConfig::default()).expect("default engine")
}

fn deadline() -> Instant {
    Instant::now() + Duration::from_secs(10)
}

#[tokio::test]
async fn plagiarism_requires_exactly_one_input() {
    let engine = engine();

    let both = PlagiarismInput {
        text: Some("Some text.".into()),
        // Not valid PDF; validation must reject before decoding is attempted.
        file: Some(FileInput::new("essay.pdf", vec![0u8, 1, 2])),
    };
    let err = engine.detect_plagiarism(both, deadline()).await.unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)), "{err:?}");

    let neither = PlagiarismInput::default();
    let err = engine.detect_plagiarism(neither, deadline()).await.unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));

    let empty_text = PlagiarismInput {
        text: Some(String::new()),
        file: None,
    };
    let err = engine.detect_plagiarism(empty_text, deadline()).await.unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));
}

#[tokio::test]
async fn empty_string_text_with_file_uses_the_file() {
    let engine = engine();
    let input = PlagiarismInput {
        text: Some(String::new()),
        file: Some(FileInput::new("essay.txt", "One sentence here.")),
    };
    let report = engine.detect_plagiarism(input, deadline()).await.unwrap();
    assert_eq!(report.total_sentences, 1);
}

#[tokio::test]
async fn undecodable_upload_is_a_decoding_error() {
    let engine = engine();
    let input = PlagiarismInput::file(FileInput::new("essay.txt", vec![0xC3u8, 0x28]));
    match engine.detect_plagiarism(input, deadline()).await.unwrap_err() {
        EngineError::Decoding { name, .. } => assert_eq!(name, "essay.txt"),
        other => panic!("unexpected error: {other:?}"),
    }

    let broken_pdf = FileInput::new("paper.pdf", b"not a pdf".to_vec());
    let ok = FileInput::new("b.txt", "text");
    assert!(matches!(
        engine.compare(&broken_pdf, &ok),
        Err(EngineError::Decoding { .. })
    ));
}

#[test]
fn unsupported_upload_type() {
    let engine = engine();
    let image = FileInput::new("photo.png", vec![0x89u8, 0x50, 0x4E, 0x47]);
    let text = FileInput::new("notes.txt", "hello");
    match engine.compare(&text, &image).unwrap_err() {
        EngineError::UnsupportedMediaType { name, media_type } => {
            assert_eq!(name, "photo.png");
            assert_eq!(media_type, ".png");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn keyword_errors() {
    let engine = engine();
    assert!(matches!(
        engine.extract_keywords(None),
        Err(EngineError::Validation(_))
    ));
    assert!(matches!(
        engine.extract_keywords(Some("")),
        Err(EngineError::Validation(_))
    ));
    assert!(matches!(
        engine.extract_keywords(Some("  ... !!! ")),
        Err(EngineError::EmptyInput(_))
    ));
    assert!(engine
        .extract_keywords(Some("the and of a to"))
        .unwrap()
        .is_empty());
}

#[test]
fn invalid_configs_are_config_errors() {
    let bad_similarity = EngineConfig {
        similarity: SimilarityConfig::default().with_shingle_size(0),
        ..Default::default()
    };
    assert!(matches!(
        Engine::from_config(bad_similarity),
        Err(EngineError::Config(_))
    ));

    let bad_matcher = EngineConfig {
        matcher: MatchConfig::default().with_k(0),
        ..Default::default()
    };
    assert!(matches!(
        Engine::from_config(bad_matcher),
        Err(EngineError::Config(_))
    ));

    let bad_keywords = EngineConfig {
        keywords: KeywordConfig::default().with_max_keywords(0),
        ..Default::default()
    };
    assert!(matches!(
        Engine::from_config(bad_keywords),
        Err(EngineError::Config(_))
    ));

    let missing_corpus = EngineConfig {
        retriever: RetrieverConfig {
            kind: RetrieverKind::Corpus,
            corpus_dir: Some("/no/such/corpus".into()),
            ..Default::default()
        },
        ..Default::default()
    };
    assert!(matches!(
        Engine::from_config(missing_corpus),
        Err(EngineError::Config(_))
    ));
}
