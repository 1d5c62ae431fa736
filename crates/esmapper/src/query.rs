//! The top-level query builder.
//!
//! [`QueryBuilder`] owns the query document and places every clause by
//! bucket and section:
//!
//! ```text
//! query section   query.bool.{must|should|must_not}
//! filter section  query.bool.filter.bool.{must|should|must_not}
//! ```
//!
//! Clause methods come from [`QueryDsl`](crate::QueryDsl); this module adds
//! sorting, paging, raw merges, and read-out.

use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use crate::document;
use crate::dsl::ClauseSink;
use crate::error::Result;
use crate::op::Bucket;
use crate::ordering::SortOrder;

/// Builds an Elasticsearch search body.
///
/// # Example
///
/// ```
/// use esmapper::{Dir, QueryBuilder, QueryDsl};
/// use serde_json::json;
///
/// # fn main() -> esmapper::Result<()> {
/// let mut query = QueryBuilder::new();
/// query
///     .term("name", "Muhannad Shelleh")?
///     .sort("age", Dir::Desc)?
///     .page(Some(10), Some(20));
///
/// assert_eq!(
///     query.to_value(),
///     json!({
///         "query": {"bool": {"must": [{"term": {"name": {"value": "Muhannad Shelleh"}}}]}},
///         "sort": [{"age": "desc"}],
///         "size": 10,
///         "from": 20
///     })
/// );
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryBuilder {
    document: Map<String, Value>,
}

impl QueryBuilder {
    /// Creates a builder with an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a builder seeded with a copy of `base`.
    pub fn with_base(base: &Map<String, Value>) -> Self {
        QueryBuilder {
            document: base.clone(),
        }
    }

    /// Creates a builder seeded from a JSON object.
    pub fn from_json(json: &str) -> Result<Self> {
        let document = serde_json::from_str(json)?;
        Ok(QueryBuilder { document })
    }

    /// Replaces the whole document with `base`, or with an empty one.
    pub fn empty_query(&mut self, base: Option<Map<String, Value>>) -> &mut Self {
        self.document = base.unwrap_or_default();
        self
    }

    /// Appends a `{field: order}` sort entry.
    pub fn sort(&mut self, field: &str, order: impl Into<SortOrder>) -> Result<&mut Self> {
        self.sort_with(field, order, false)
    }

    /// Appends a sort entry, first clearing existing ones when
    /// `override_existing` is set.
    pub fn sort_with(
        &mut self,
        field: &str,
        order: impl Into<SortOrder>,
        override_existing: bool,
    ) -> Result<&mut Self> {
        let entry = order.into().entry(field);
        let sort = document::array_at(&mut self.document, &["sort"])?;
        if override_existing {
            sort.clear();
        }
        sort.push(entry);
        Ok(self)
    }

    /// Sets `size` and `from`; `None` leaves the current value alone.
    pub fn page(&mut self, size: Option<u64>, from: Option<u64>) -> &mut Self {
        if let Some(size) = size {
            self.size(size);
        }
        if let Some(from) = from {
            self.from(from);
        }
        self
    }

    /// Sets the number of hits to return.
    pub fn size(&mut self, size: u64) -> &mut Self {
        self.document.insert("size".to_string(), Value::from(size));
        self
    }

    /// Sets the offset of the first hit.
    pub fn from(&mut self, from: u64) -> &mut Self {
        self.document.insert("from".to_string(), Value::from(from));
        self
    }

    /// Merges root-level keys into the document.
    ///
    /// Objects merge recursively, arrays append, anything else overwrites.
    /// Useful for sections the builder has no method for (`aggs`,
    /// `highlight`, `_source`, ...).
    pub fn raw(&mut self, fragment: Map<String, Value>) -> &mut Self {
        document::merge(&mut self.document, fragment);
        self
    }

    /// The document as built so far.
    pub fn document(&self) -> &Map<String, Value> {
        &self.document
    }

    /// A copy of the document as a JSON value.
    pub fn to_value(&self) -> Value {
        Value::Object(self.document.clone())
    }

    /// Consumes the builder, returning the document.
    pub fn into_document(self) -> Map<String, Value> {
        self.document
    }

    /// The document as compact JSON text.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.document)?)
    }

    /// The document as indented JSON text.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.document)?)
    }
}

impl ClauseSink for QueryBuilder {
    fn add_clause(&mut self, clause: Value, bucket: Bucket, filter: bool) -> Result<()> {
        let filter_path = ["query", "bool", "filter", "bool", bucket.as_str()];
        let query_path = ["query", "bool", bucket.as_str()];
        let path: &[&str] = if filter { &filter_path } else { &query_path };
        tracing::trace!(%bucket, filter, "adding clause");
        document::array_at(&mut self.document, path)?.push(clause);
        Ok(())
    }
}

impl Serialize for QueryBuilder {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.document.serialize(serializer)
    }
}
