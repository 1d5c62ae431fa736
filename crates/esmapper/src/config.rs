//! Index configuration.
//!
//! [`IndexConfig`] names the index (and optional document type) an
//! [`IndexQuery`](crate::IndexQuery) targets, the hosts a client should
//! connect to, the model naming pattern, and a base query every builder
//! starts from. It loads from YAML or JSON:
//!
//! ```
//! use esmapper::IndexConfig;
//!
//! let config = IndexConfig::from_yaml_str(
//!     "index: people\ntype: user\nmodel_pattern: \"models::{type}\"\n",
//! )
//! .unwrap();
//! assert_eq!(config.index, "people");
//! assert_eq!(config.doc_type.as_deref(), Some("user"));
//! assert_eq!(config.hosts, vec!["http://localhost:9200/".to_string()]);
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{QueryError, Result};
use crate::result::ModelPattern;

/// The host used when none is configured.
pub const DEFAULT_HOST: &str = "http://localhost:9200/";

fn default_hosts() -> Vec<String> {
    vec![DEFAULT_HOST.to_string()]
}

/// Where and how to query one index.
///
/// `index` is required when loading; every other field has a default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexConfig {
    /// Index name.
    pub index: String,
    /// Document type, if the index uses typed documents.
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub doc_type: Option<String>,
    /// Cluster hosts.
    #[serde(default = "default_hosts")]
    pub hosts: Vec<String>,
    /// Naming pattern for models built from hits.
    #[serde(default)]
    pub model_pattern: ModelPattern,
    /// Seed document for every builder created from this config.
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub base_query: Map<String, Value>,
}

impl Default for IndexConfig {
    fn default() -> Self {
        IndexConfig {
            index: String::new(),
            doc_type: None,
            hosts: default_hosts(),
            model_pattern: ModelPattern::default(),
            base_query: Map::new(),
        }
    }
}

impl IndexConfig {
    /// A config for `index` with default hosts.
    pub fn new(index: impl Into<String>) -> Self {
        IndexConfig {
            index: index.into(),
            ..Self::default()
        }
    }

    /// Sets the document type.
    pub fn with_type(mut self, doc_type: impl Into<String>) -> Self {
        self.doc_type = Some(doc_type.into());
        self
    }

    /// Replaces the host list.
    pub fn with_hosts<I, S>(mut self, hosts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.hosts = hosts.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the model naming pattern; `{type}` marks where the type goes.
    pub fn with_model_pattern(mut self, pattern: impl Into<ModelPattern>) -> Self {
        self.model_pattern = pattern.into();
        self
    }

    /// Sets the seed document for builders.
    pub fn with_base_query(mut self, base_query: Map<String, Value>) -> Self {
        self.base_query = base_query;
        self
    }

    /// Parses a config from YAML.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: IndexConfig = serde_yaml::from_str(yaml)?;
        config.validated()
    }

    /// Parses a config from JSON.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: IndexConfig = serde_json::from_str(json)?;
        config.validated()
    }

    fn validated(self) -> Result<Self> {
        if self.index.trim().is_empty() {
            return Err(QueryError::InvalidConfig("index name is empty".into()));
        }
        Ok(self)
    }

    /// The model name for documents of `doc_type`, falling back to the
    /// configured type.
    pub fn model_name(&self, doc_type: Option<&str>) -> String {
        let doc_type = doc_type.or(self.doc_type.as_deref()).unwrap_or_default();
        self.model_pattern.resolve(doc_type)
    }
}
