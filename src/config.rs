//! YAML configuration file support for simcheck.
//!
//! Every stage reads its section of a single YAML document. Sections that are
//! left out (and fields missing from a section) take their defaults, and the
//! whole document is validated on load.
//!
//! ## Example YAML Configuration
//!
//! ```yaml
//! version: "1.0"
//! name: "campus deployment"
//!
//! canonical:
//!   version: 1
//!   normalize_unicode: true
//!   strip_punctuation: true
//!   lowercase: true
//!
//! segment:
//!   terminals: [".", "!", "?"]
//!   abbreviations: ["mr.", "dr.", "e.g.", "i.e."]
//!
//! similarity:
//!   shingle_size: 3
//!   jaccard_weight: 0.6
//!   edit_weight: 0.4
//!   max_edit_tokens: 2000
//!
//! retriever:
//!   kind: web_search
//!   call_timeout_ms: 10000
//!   web:
//!     search_url: "https://search.internal/api"
//!     api_key: "..."
//!     excluded_hosts: ["youtube.com"]
//!     retry:
//!       max_retries: 2
//!       base_delay_ms: 500
//!
//! matcher:
//!   k: 5
//!   match_threshold: 0.5
//!   max_concurrency: 8
//!   max_sentences: 20
//!
//! keywords:
//!   max_keywords: 10
//!   extra_stop_words: ["lorem"]
//! ```

use std::fs;
use std::path::Path;

use canonical::{CanonicalizeConfig, SegmentConfig};
use keywords::KeywordConfig;
use matcher::MatchConfig;
use perceptual::SimilarityConfig;
use retriever::RetrieverConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when loading YAML configuration files
#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("unsupported config version: {0}")]
    UnsupportedVersion(String),
}

/// Top-level configuration for an [`crate::Engine`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct EngineConfig {
    /// Configuration format version
    #[serde(default = "default_format_version")]
    pub version: String,

    /// Optional configuration name/description
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub canonical: CanonicalizeConfig,

    #[serde(default)]
    pub segment: SegmentConfig,

    #[serde(default)]
    pub similarity: SimilarityConfig,

    #[serde(default)]
    pub retriever: RetrieverConfig,

    #[serde(default)]
    pub matcher: MatchConfig,

    #[serde(default)]
    pub keywords: KeywordConfig,
}

impl EngineConfig {
    /// Load a YAML configuration file from the given path
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigLoadError> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse YAML configuration from a string
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigLoadError> {
        let config: EngineConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks every stage section.
    pub fn validate(&self) -> Result<(), ConfigLoadError> {
        match self.version.as_str() {
            "1.0" | "1" => Ok(()),
            v => Err(ConfigLoadError::UnsupportedVersion(v.to_string())),
        }?;

        fn stage<E: std::fmt::Display>(
            name: &str,
            res: Result<(), E>,
        ) -> Result<(), ConfigLoadError> {
            res.map_err(|e| ConfigLoadError::Validation(format!("{name}: {e}")))
        }

        stage("canonical", self.canonical.validate())?;
        stage("segment", self.segment.validate())?;
        stage("similarity", self.similarity.validate())?;
        stage("retriever", self.retriever.validate())?;
        stage("matcher", self.matcher.validate())?;
        stage("keywords", self.keywords.validate())?;
        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            version: default_format_version(),
            name: None,
            canonical: CanonicalizeConfig::default(),
            segment: SegmentConfig::default(),
            similarity: SimilarityConfig::default(),
            retriever: RetrieverConfig::default(),
            matcher: MatchConfig::default(),
            keywords: KeywordConfig::default(),
        }
    }
}

fn default_format_version() -> String {
    "1.0".to_string()
}
