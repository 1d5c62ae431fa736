//! Typed views over search and multi-get responses.
//!
//! The builder only shapes request bodies; these types read what comes
//! back. Raw responses stay available through [`SearchResult::fetch`] for
//! anything not modeled here (aggregations, suggestions, ...).

use std::ops::Deref;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::document;
use crate::error::Result;

/// One document record from a search or get response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hit {
    /// Index the document lives in.
    #[serde(rename = "_index", default, skip_serializing_if = "Option::is_none")]
    pub index: Option<String>,
    /// Document type, on clusters that still report one.
    #[serde(rename = "_type", default, skip_serializing_if = "Option::is_none")]
    pub doc_type: Option<String>,
    /// Document id.
    #[serde(rename = "_id")]
    pub id: String,
    /// Relevance score; absent on get responses and sorted searches.
    #[serde(rename = "_score", default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    /// Stored document body, `null` when the response omits it.
    #[serde(rename = "_source", default)]
    pub source: Value,
    /// Present on get and multi-get entries.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub found: Option<bool>,
}

impl Hit {
    /// Returns `false` only for get entries explicitly marked as not found.
    pub fn is_found(&self) -> bool {
        self.found.unwrap_or(true)
    }

    /// Deserializes `_source` into `T`.
    pub fn into_model<T: DeserializeOwned>(self) -> Result<Model<T>> {
        let source = serde_json::from_value(self.source)?;
        Ok(Model {
            id: self.id,
            doc_type: self.doc_type,
            index: self.index,
            score: self.score,
            source,
        })
    }

    /// Resolves the model name for this hit's type.
    pub fn model_name(&self, pattern: &ModelPattern) -> String {
        pattern.resolve(self.doc_type.as_deref().unwrap_or_default())
    }
}

/// A hit whose source has been deserialized into `T`.
///
/// Dereferences to the source, so model fields read directly:
///
/// ```
/// use esmapper::Hit;
/// use serde::Deserialize;
/// use serde_json::json;
///
/// #[derive(Deserialize)]
/// struct User {
///     name: String,
/// }
///
/// let hit: Hit = serde_json::from_value(json!({
///     "_id": "7",
///     "_source": {"name": "Muhannad"}
/// }))
/// .unwrap();
/// let user = hit.into_model::<User>().unwrap();
/// assert_eq!(user.id, "7");
/// assert_eq!(user.name, "Muhannad");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Model<T> {
    /// Document id.
    pub id: String,
    /// Document type, if reported.
    pub doc_type: Option<String>,
    /// Index the document came from.
    pub index: Option<String>,
    /// Relevance score, if reported.
    pub score: Option<f64>,
    /// Deserialized document body.
    pub source: T,
}

impl<T> Model<T> {
    /// Consumes the model, returning the source.
    pub fn into_source(self) -> T {
        self.source
    }
}

impl<T> Deref for Model<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.source
    }
}

/// The `hits.total` field: a plain count or `{value, relation}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Total {
    /// Older clusters report a bare number.
    Count(u64),
    /// Newer clusters report a count and how exact it is.
    Detailed {
        /// The hit count.
        value: u64,
        /// Whether `value` is exact.
        relation: Relation,
    },
}

impl Total {
    /// The hit count.
    pub fn value(self) -> u64 {
        match self {
            Total::Count(value) | Total::Detailed { value, .. } => value,
        }
    }
}

/// Whether a detailed total is exact or a lower bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Relation {
    /// The count is exact.
    Eq,
    /// The count is a lower bound.
    Gte,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct HitsSection {
    #[serde(default)]
    total: Option<Total>,
    #[serde(default)]
    max_score: Option<f64>,
    #[serde(default)]
    hits: Vec<Hit>,
}

#[derive(Debug, Clone, Deserialize)]
struct SearchEnvelope {
    #[serde(default)]
    took: Option<u64>,
    #[serde(default)]
    timed_out: Option<bool>,
    #[serde(default)]
    hits: HitsSection,
}

/// A search response.
#[derive(Debug, Clone)]
pub struct SearchResult {
    raw: Value,
    took: Option<u64>,
    timed_out: bool,
    total: Option<Total>,
    max_score: Option<f64>,
    hits: Vec<Hit>,
}

impl SearchResult {
    /// Reads a `{hits: {total, max_score, hits: [...]}}` response.
    pub fn from_value(raw: Value) -> Result<Self> {
        let envelope = SearchEnvelope::deserialize(&raw)?;
        Ok(SearchResult {
            raw,
            took: envelope.took,
            timed_out: envelope.timed_out.unwrap_or(false),
            total: envelope.hits.total,
            max_score: envelope.hits.max_score,
            hits: envelope.hits.hits,
        })
    }

    /// Total matching documents; falls back to the returned hit count when
    /// the response carries no total.
    pub fn total(&self) -> u64 {
        self.total
            .map(Total::value)
            .unwrap_or(self.hits.len() as u64)
    }

    /// The `hits.total` field as reported.
    pub fn total_detail(&self) -> Option<Total> {
        self.total
    }

    /// Highest score among the matches, if the response reports one.
    pub fn max_score(&self) -> Option<f64> {
        self.max_score
    }

    /// Server-side time spent on the search, in milliseconds.
    pub fn took(&self) -> Option<u64> {
        self.took
    }

    /// Whether the search hit its timeout and returned partial results.
    pub fn timed_out(&self) -> bool {
        self.timed_out
    }

    /// Hits in response order.
    pub fn hits(&self) -> &[Hit] {
        &self.hits
    }

    /// The first hit, if any.
    pub fn first(&self) -> Option<&Hit> {
        self.hits.first()
    }

    /// Number of hits in this page.
    pub fn len(&self) -> usize {
        self.hits.len()
    }

    /// Returns `true` when this page has no hits.
    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }

    /// Document ids in response order.
    pub fn ids(&self) -> Vec<&str> {
        self.hits.iter().map(|hit| hit.id.as_str()).collect()
    }

    /// Deserializes every hit source into `T`.
    pub fn models<T: DeserializeOwned>(&self) -> Result<Vec<Model<T>>> {
        self.hits.iter().cloned().map(Hit::into_model::<T>).collect()
    }

    /// Looks up a dot-separated path in the raw response, e.g.
    /// `"aggregations.alive.buckets"`.
    pub fn fetch(&self, path: &str) -> Option<&Value> {
        document::lookup(&self.raw, path)
    }

    /// The raw response.
    pub fn raw(&self) -> &Value {
        &self.raw
    }
}

#[derive(Debug, Clone, Deserialize)]
struct MultiGetEnvelope {
    #[serde(default)]
    docs: Vec<Hit>,
}

/// A multi-get response matched against the requested ids.
#[derive(Debug, Clone, PartialEq)]
pub struct MultiGetResult {
    requested: Vec<String>,
    docs: Vec<Hit>,
    missed: Vec<String>,
}

impl MultiGetResult {
    /// Reads a `{docs: [...]}` response for the `requested` ids.
    ///
    /// Entries marked `found: false` are dropped; their ids, and any
    /// requested id the response does not mention, are reported as missed
    /// in request order.
    pub fn from_value(raw: Value, requested: &[String]) -> Result<Self> {
        let envelope: MultiGetEnvelope = serde_json::from_value(raw)?;
        let docs: Vec<Hit> = envelope.docs.into_iter().filter(Hit::is_found).collect();
        let missed = requested
            .iter()
            .filter(|id| !docs.iter().any(|doc| &doc.id == *id))
            .cloned()
            .collect();
        Ok(MultiGetResult {
            requested: requested.to_vec(),
            docs,
            missed,
        })
    }

    /// Ids requested, in request order.
    pub fn requested(&self) -> &[String] {
        &self.requested
    }

    /// Ids found, in response order.
    pub fn found(&self) -> Vec<&str> {
        self.docs.iter().map(|doc| doc.id.as_str()).collect()
    }

    /// Requested ids with no found document, in request order.
    pub fn missed(&self) -> &[String] {
        &self.missed
    }

    /// Found documents in response order.
    pub fn docs(&self) -> &[Hit] {
        &self.docs
    }

    /// Number of found documents.
    pub fn len(&self) -> usize {
        self.docs.len()
    }

    /// Returns `true` when no requested document was found.
    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    /// Deserializes every found source into `T`.
    pub fn models<T: DeserializeOwned>(&self) -> Result<Vec<Model<T>>> {
        self.docs.iter().cloned().map(Hit::into_model::<T>).collect()
    }
}

/// A model naming pattern with an optional `{type}` placeholder.
///
/// The document type is converted to upper camel case before substitution;
/// a pattern without the placeholder gets the type name appended.
///
/// ```
/// use esmapper::ModelPattern;
///
/// let pattern = ModelPattern::new("app::models::{type}Model");
/// assert_eq!(pattern.resolve("blog_post"), "app::models::BlogPostModel");
/// assert_eq!(ModelPattern::new("models::").resolve("user"), "models::User");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModelPattern(String);

impl ModelPattern {
    const PLACEHOLDER: &'static str = "{type}";

    /// Wraps a pattern string.
    pub fn new(pattern: impl Into<String>) -> Self {
        ModelPattern(pattern.into())
    }

    /// The pattern as written.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The model name for documents of `doc_type`.
    pub fn resolve(&self, doc_type: &str) -> String {
        let name = upper_camel(doc_type);
        if self.0.contains(Self::PLACEHOLDER) {
            self.0.replace(Self::PLACEHOLDER, &name)
        } else {
            format!("{}{}", self.0, name)
        }
    }
}

impl From<&str> for ModelPattern {
    fn from(pattern: &str) -> Self {
        ModelPattern::new(pattern)
    }
}

fn upper_camel(name: &str) -> String {
    name.split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect()
}
