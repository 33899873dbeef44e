use std::sync::Arc;

use bytes::Bytes;
use canonical::{CanonicalizeConfig, Document, MediaType};
use keywords::{KeywordExtractor, KeywordScore};
use matcher::{PlagiarismMatcher, PlagiarismReport};
use perceptual::SimilarityScorer;
use retriever::{build_retriever, CandidateRetriever};
use serde::{Deserialize, Serialize};
use tokio::time::Instant;
use tracing::{debug, info};

use crate::config::EngineConfig;
use crate::error::EngineError;

/// An uploaded file: display name, raw bytes and the declared content type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileInput {
    pub name: String,
    pub bytes: Bytes,
    pub content_type: Option<String>,
}

impl FileInput {
    pub fn new(name: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
            content_type: None,
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Media type from the file name, then the declared content type.
    pub fn media_type(&self) -> MediaType {
        let name = Some(self.name.as_str()).filter(|n| !n.trim().is_empty());
        MediaType::infer(name, self.content_type.as_deref())
    }
}

/// Input of a plagiarism check: pasted text or an uploaded file, not both.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlagiarismInput {
    pub text: Option<String>,
    pub file: Option<FileInput>,
}

impl PlagiarismInput {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            file: None,
        }
    }

    pub fn file(file: FileInput) -> Self {
        Self {
            text: None,
            file: Some(file),
        }
    }
}

/// Similarity of two whole documents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comparison {
    pub similarity: f64,
    pub file1_name: String,
    pub file2_name: String,
}

/// Maps the three public operations onto the pipeline stages.
///
/// Stateless between requests; one instance is shared by every handler.
pub struct Engine {
    config: EngineConfig,
    scorer: SimilarityScorer,
    matcher: PlagiarismMatcher,
    keywords: KeywordExtractor,
}

impl Engine {
    /// Builds an engine, constructing the retriever `config` names.
    pub fn from_config(config: EngineConfig) -> Result<Self, EngineError> {
        config.validate()?;
        let retriever = build_retriever(&config.retriever, &config.canonical)?;
        Self::with_retriever(config, retriever)
    }

    /// Builds an engine around an already constructed retriever.
    pub fn with_retriever(
        config: EngineConfig,
        retriever: Arc<dyn CandidateRetriever>,
    ) -> Result<Self, EngineError> {
        config.validate()?;
        let scorer = SimilarityScorer::new(config.similarity.clone())?;
        let matcher = PlagiarismMatcher::new(
            config.matcher.clone(),
            config.segment.clone(),
            scorer.clone(),
            retriever,
        )?;
        let keywords = KeywordExtractor::new(config.keywords.clone())?;
        info!(
            retriever = matcher.retriever_name(),
            shingle_size = config.similarity.shingle_size,
            match_threshold = config.matcher.match_threshold,
            "engine ready"
        );
        Ok(Self {
            config,
            scorer,
            matcher,
            keywords,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn canonical(&self) -> CanonicalizeConfig {
        self.config.canonical.clone()
    }

    fn decode_file(&self, id: &str, file: &FileInput) -> Result<Document, EngineError> {
        decode_upload(id, file, self.canonical())
    }

    /// Whole-document similarity of two uploads.
    pub fn compare(&self, file1: &FileInput, file2: &FileInput) -> Result<Comparison, EngineError> {
        let left = self.decode_file("file1", file1)?;
        let right = self.decode_file("file2", file2)?;
        let score = self
            .scorer
            .score(left.id(), left.tokens(), right.id(), right.tokens());
        info!(
            file1 = %file1.name,
            file2 = %file2.name,
            similarity = score.value,
            metric = ?score.metric,
            "files compared"
        );
        Ok(Comparison {
            similarity: score.value,
            file1_name: file1.name.clone(),
            file2_name: file2.name.clone(),
        })
    }

    /// Sentence-level plagiarism check of pasted text or an uploaded file.
    ///
    /// Exactly one of `text` (non-empty) or `file` must be given; this is
    /// checked before anything is decoded. Sentences still pending when
    /// `deadline` passes are reported unmatched.
    pub async fn detect_plagiarism(
        &self,
        input: PlagiarismInput,
        deadline: Instant,
    ) -> Result<PlagiarismReport, EngineError> {
        let text = input.text.filter(|t| !t.is_empty());
        let doc = match (text, input.file) {
            (Some(_), Some(_)) => {
                return Err(EngineError::Validation(
                    "provide either text or a file, not both".into(),
                ))
            }
            (None, None) => {
                return Err(EngineError::Validation(
                    "no text provided for plagiarism check".into(),
                ))
            }
            (Some(text), None) => Document::new("text", text, MediaType::PlainText, self.canonical())
                .map_err(|e| EngineError::from_canonical("text", e))?,
            (None, Some(file)) => {
                let name = display_name(&file, "file").to_string();
                let canonical = self.canonical();
                // PDF and DOCX parsing can take a while; keep it off the async workers.
                tokio::task::spawn_blocking(move || decode_upload("file", &file, canonical))
                    .await
                    .map_err(|e| EngineError::Decoding {
                        name,
                        reason: format!("decoder failed: {e}"),
                    })??
            }
        };
        Ok(self.matcher.check(&doc, deadline).await)
    }

    /// Ranked keywords of `text`.
    pub fn extract_keywords(&self, text: Option<&str>) -> Result<Vec<KeywordScore>, EngineError> {
        let text = text
            .filter(|t| !t.is_empty())
            .ok_or_else(|| EngineError::Validation("text is required".into()))?;
        let doc = Document::new("text", text, MediaType::PlainText, self.canonical())
            .map_err(|e| EngineError::from_canonical("text", e))?;
        Ok(self.keywords.extract(doc.tokens())?)
    }
}

fn decode_upload(
    id: &str,
    file: &FileInput,
    canonical: CanonicalizeConfig,
) -> Result<Document, EngineError> {
    let media_type = file.media_type();
    debug!(file = %file.name, media_type = media_type.as_str(), bytes = file.bytes.len(), "decoding upload");
    Document::from_bytes(id, &file.bytes, media_type, canonical)
        .map_err(|e| EngineError::from_canonical(display_name(file, id), e))
}

fn display_name<'a>(file: &'a FileInput, fallback: &'a str) -> &'a str {
    if file.name.trim().is_empty() {
        fallback
    } else {
        &file.name
    }
}
