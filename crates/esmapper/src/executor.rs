//! The seam to a search client.
//!
//! This crate does not talk to a cluster. A [`SearchExecutor`] runs search
//! and multi-get requests and hands back the raw JSON response;
//! [`IndexQuery`] pairs one with an [`IndexConfig`] and turns responses into
//! [`SearchResult`] and [`MultiGetResult`] views.
//!
//! [`IndexQuery::auto_builder`] hands out an [`AutoQueryBuilder`] that stays
//! bound to its index and runs itself with [`AutoQueryBuilder::execute`].
//!
//! ```
//! use esmapper::{IndexConfig, IndexQuery, QueryDsl, SearchExecutor};
//! use serde_json::{json, Value};
//!
//! struct Canned;
//!
//! impl SearchExecutor for Canned {
//!     fn search(&self, _index: &str, _doc_type: Option<&str>, _body: &Value) -> esmapper::Result<Value> {
//!         Ok(json!({"hits": {"total": 1, "hits": [{"_id": "1", "_source": {}}]}}))
//!     }
//!
//!     fn mget(&self, _index: &str, _doc_type: Option<&str>, _ids: &[String]) -> esmapper::Result<Value> {
//!         Ok(json!({"docs": []}))
//!     }
//! }
//!
//! # fn main() -> esmapper::Result<()> {
//! let people = IndexQuery::new(IndexConfig::new("people"), Canned);
//! let mut query = people.builder();
//! query.where_("age", 18, ">=")?;
//! assert_eq!(people.query(&query)?.total(), 1);
//!
//! let result = people.auto_builder().where_("age", 18, ">=")?.execute()?;
//! assert_eq!(result.ids(), vec!["1"]);
//! # Ok(())
//! # }
//! ```

use std::ops::{Deref, DerefMut};

use serde_json::{Map, Value};

use crate::config::IndexConfig;
use crate::dsl::ClauseSink;
use crate::error::Result;
use crate::op::Bucket;
use crate::query::QueryBuilder;
use crate::result::{Hit, MultiGetResult, SearchResult};

/// Runs requests against a search cluster.
pub trait SearchExecutor {
    /// Runs a search with `body` as the request body.
    fn search(&self, index: &str, doc_type: Option<&str>, body: &Value) -> Result<Value>;

    /// Fetches documents by id; the response is `{docs: [...]}`-shaped.
    fn mget(&self, index: &str, doc_type: Option<&str>, ids: &[String]) -> Result<Value>;
}

impl<E: SearchExecutor + ?Sized> SearchExecutor for &E {
    fn search(&self, index: &str, doc_type: Option<&str>, body: &Value) -> Result<Value> {
        (**self).search(index, doc_type, body)
    }

    fn mget(&self, index: &str, doc_type: Option<&str>, ids: &[String]) -> Result<Value> {
        (**self).mget(index, doc_type, ids)
    }
}

/// Queries one configured index through an executor.
#[derive(Debug, Clone)]
pub struct IndexQuery<E> {
    config: IndexConfig,
    executor: E,
}

impl<E: SearchExecutor> IndexQuery<E> {
    /// Pairs `config` with the executor that will run its requests.
    pub fn new(config: IndexConfig, executor: E) -> Self {
        IndexQuery { config, executor }
    }

    /// The index configuration.
    pub fn config(&self) -> &IndexConfig {
        &self.config
    }

    /// The executor requests go through.
    pub fn executor(&self) -> &E {
        &self.executor
    }

    /// A builder seeded with the configured base query.
    pub fn builder(&self) -> QueryBuilder {
        QueryBuilder::with_base(&self.config.base_query)
    }

    /// A seeded builder bound to this index, runnable with
    /// [`AutoQueryBuilder::execute`].
    pub fn auto_builder(&self) -> AutoQueryBuilder<'_, E> {
        AutoQueryBuilder {
            index: self,
            builder: self.builder(),
        }
    }

    /// Runs the base query alone (every document when it is empty).
    pub fn all(&self) -> Result<SearchResult> {
        self.query_value(&Value::Object(self.config.base_query.clone()))
    }

    /// Runs the document built by `builder`.
    pub fn query(&self, builder: &QueryBuilder) -> Result<SearchResult> {
        self.query_value(&builder.to_value())
    }

    /// Runs a hand-written request body.
    pub fn query_value(&self, body: &Value) -> Result<SearchResult> {
        tracing::debug!(index = %self.config.index, doc_type = ?self.config.doc_type, "search");
        let raw = self
            .executor
            .search(&self.config.index, self.config.doc_type.as_deref(), body)?;
        SearchResult::from_value(raw)
    }

    /// Fetches one document; `None` when it does not exist.
    pub fn find(&self, id: impl Into<String>) -> Result<Option<Hit>> {
        let result = self.find_many([id.into()])?;
        Ok(result.docs().first().cloned())
    }

    /// Fetches several documents, reporting which ids were missed.
    pub fn find_many<I, S>(&self, ids: I) -> Result<MultiGetResult>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let ids: Vec<String> = ids.into_iter().map(Into::into).collect();
        tracing::debug!(index = %self.config.index, count = ids.len(), "multi-get");
        let raw = self
            .executor
            .mget(&self.config.index, self.config.doc_type.as_deref(), &ids)?;
        MultiGetResult::from_value(raw, &ids)
    }

    /// The base query this index starts from.
    pub fn base_query(&self) -> &Map<String, Value> {
        &self.config.base_query
    }
}

/// A [`QueryBuilder`] that remembers which index it runs against.
///
/// The fluent [`QueryDsl`](crate::QueryDsl) methods return the bound builder
/// itself, so a chain can end in [`execute`](Self::execute). Document-level
/// methods (`sort`, `page`, ...) are reached through `Deref` to the inner
/// builder.
#[derive(Debug)]
pub struct AutoQueryBuilder<'a, E> {
    index: &'a IndexQuery<E>,
    builder: QueryBuilder,
}

impl<'a, E: SearchExecutor> AutoQueryBuilder<'a, E> {
    /// Runs the built document against the bound index.
    pub fn execute(&self) -> Result<SearchResult> {
        self.index.query(&self.builder)
    }

    /// The index this builder runs against.
    pub fn index(&self) -> &'a IndexQuery<E> {
        self.index
    }

    /// Unbinds the builder from its index.
    pub fn into_builder(self) -> QueryBuilder {
        self.builder
    }
}

impl<E: SearchExecutor> ClauseSink for AutoQueryBuilder<'_, E> {
    fn add_clause(&mut self, clause: Value, bucket: Bucket, filter: bool) -> Result<()> {
        self.builder.add_clause(clause, bucket, filter)
    }
}

impl<E> Deref for AutoQueryBuilder<'_, E> {
    type Target = QueryBuilder;

    fn deref(&self) -> &QueryBuilder {
        &self.builder
    }
}

impl<E> DerefMut for AutoQueryBuilder<'_, E> {
    fn deref_mut(&mut self) -> &mut QueryBuilder {
        &mut self.builder
    }
}
