//! esmapper - Fluent query building and hit mapping for Elasticsearch.
//!
//! esmapper assembles Elasticsearch search bodies through a chainable API
//! and reads responses back into typed models. It supports:
//!
//! - Comparison-token dispatch: `where_("age", 18, ">=")`, `"!like"`, `"?="`
//! - Leaf clauses: term, terms, match, multi_match, range, prefix, wildcard, regexp
//! - Automatic OR expansion over lists of keys and lists of values
//! - Nested `and`/`or` groups through sub-query builders
//! - Sorting, paging, and raw clause or document inserts
//! - Typed search and multi-get result views
//!
//! # Quick Start
//!
//! ```rust
//! use esmapper::{Bucket, Dir, Params, QueryBuilder, QueryDsl};
//! use serde_json::json;
//!
//! # fn main() -> esmapper::Result<()> {
//! let mut query = QueryBuilder::new();
//! query
//!     .where_("status", "published", "=")?
//!     .where_("title", "rust", "match")?
//!     .or_where_with(Bucket::Must, Params::new())
//!     .where_("tag", ["cli", "tui"], "=")?
//!     .where_("author", "mu", "=*")?
//!     .end_sub_query()?
//!     .sort("published_at", Dir::Desc)?
//!     .page(Some(20), Some(0));
//!
//! let body = query.to_value();
//! assert_eq!(body["size"], json!(20));
//! assert_eq!(
//!     body["query"]["bool"]["must"],
//!     json!([{"match": {"title": {"query": "rust"}}}])
//! );
//! # Ok(())
//! # }
//! ```
//!
//! # Document Layout
//!
//! Every clause lands in one of three buckets of one of two sections:
//!
//! ```text
//! {
//!   "query": {
//!     "bool": {
//!       "must": [..], "should": [..], "must_not": [..],      scoring
//!       "filter": {"bool": {
//!         "must": [..], "should": [..], "must_not": [..]     non-scoring
//!       }}
//!     }
//!   },
//!   "sort": [..], "size": n, "from": n
//! }
//! ```
//!
//! Scored clauses placed in the filter section are wrapped as
//! `{"query": clause}`; `term` and `range` are placed as-is.
//!
//! # Comparison Tokens
//!
//! | Tokens | Clause | Default section |
//! |--------|--------|-----------------|
//! | `=`, anything unrecognized | term | filter |
//! | `>`, `>=`, `<`, `<=`, `gt`, `gte`, `lt`, `lte` | range | filter |
//! | `><`, `between`, `>=<=`, `between_from_to`, ... | two-sided range | filter |
//! | `=*`, `starts_with`, `prefix` | prefix | filter |
//! | `*=`, `ends_with`, `suffix` | wildcard `*v` | query |
//! | `*=*`, `like`, `wildcard` | wildcard `*v*` | query |
//! | `**`, `rx`, `regexp` | regexp | filter |
//! | `*`, `match` | match | query |
//!
//! A leading `!` targets `must_not` and a leading `?` targets `should`.

mod clause;
mod config;
mod document;
mod dsl;
mod error;
mod executor;
mod op;
mod ordering;
mod query;
mod result;
mod sub_query;
mod value;

// Re-export public API
pub use clause::{ClauseOptions, Params};
pub use config::{IndexConfig, DEFAULT_HOST};
pub use document::lookup;
pub use dsl::{ClauseSink, QueryDsl};
pub use error::{QueryError, Result};
pub use executor::{AutoQueryBuilder, IndexQuery, SearchExecutor};
pub use op::{Bucket, Comparison, GroupKind, LeafKind, RangeOp, Tool};
pub use ordering::{Dir, SortOrder};
pub use query::QueryBuilder;
pub use result::{Hit, Model, ModelPattern, MultiGetResult, Relation, SearchResult, Total};
pub use sub_query::SubQueryBuilder;
pub use value::{Keys, OneOrMany, RangeOps, Scalar, Values};
