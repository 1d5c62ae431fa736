//! Nested `and`/`or` groups.
//!
//! A [`SubQueryBuilder`] collects clauses with the same fluent methods as
//! [`QueryBuilder`](crate::QueryBuilder) and folds them into its parent as a
//! single group node when [`end_sub_query`](SubQueryBuilder::end_sub_query)
//! is called. The group always lands in the filter section of the bucket
//! chosen when the sub-query was opened.
//!
//! ```
//! use esmapper::{QueryBuilder, QueryDsl};
//!
//! # fn main() -> esmapper::Result<()> {
//! let mut query = QueryBuilder::new();
//! query
//!     .or_where()
//!     .where_("status", "draft", "=")?
//!     .where_("status", "review", "=")?
//!     .end_sub_query()?
//!     .size(10);
//! # Ok(())
//! # }
//! ```
//!
//! The sub-query mutably borrows its parent, so the parent cannot be touched
//! until the sub-query is ended or dropped. A sub-query dropped without being
//! ended discards its clauses.

use serde_json::Value;

use crate::clause::{self, Params};
use crate::dsl::ClauseSink;
use crate::error::{QueryError, Result};
use crate::op::{Bucket, GroupKind};

/// Collects clauses for one `and`/`or` group of a parent builder.
///
/// Created by [`QueryDsl::and_where`](crate::QueryDsl::and_where),
/// [`QueryDsl::or_where`](crate::QueryDsl::or_where), and their `_with`
/// variants. Sub-queries nest: a sub-query is itself a [`ClauseSink`].
#[derive(Debug)]
pub struct SubQueryBuilder<'a, P: ClauseSink> {
    parent: &'a mut P,
    kind: GroupKind,
    bucket: Bucket,
    params: Params,
    clauses: Vec<Value>,
    consumed: bool,
}

impl<'a, P: ClauseSink> SubQueryBuilder<'a, P> {
    pub(crate) fn new(parent: &'a mut P, kind: GroupKind, bucket: Bucket, params: Params) -> Self {
        tracing::debug!(kind = kind.as_str(), %bucket, "sub-query opened");
        SubQueryBuilder {
            parent,
            kind,
            bucket,
            params,
            clauses: Vec::new(),
            consumed: false,
        }
    }

    /// The group type.
    pub fn kind(&self) -> GroupKind {
        self.kind
    }

    /// The bucket the group will be inserted into.
    pub fn bucket(&self) -> Bucket {
        self.bucket
    }

    /// Clauses collected so far, in insertion order.
    pub fn clauses(&self) -> &[Value] {
        &self.clauses
    }

    /// Returns `true` once the group has been folded into the parent.
    pub fn is_consumed(&self) -> bool {
        self.consumed
    }

    /// The group node as it would be inserted now.
    pub fn to_value(&self) -> Value {
        clause::group(self.kind, self.clauses.clone(), &self.params)
    }

    /// Folds the collected clauses into the parent as one group node and
    /// returns the parent for further chaining.
    ///
    /// An empty group is inserted as-is. Calling this a second time fails
    /// with [`QueryError::SubQueryConsumed`] and leaves the parent untouched.
    pub fn end_sub_query(&mut self) -> Result<&mut P> {
        if self.consumed {
            return Err(QueryError::SubQueryConsumed);
        }
        let group = self.to_value();
        self.parent.add_clause(group, self.bucket, true)?;
        tracing::debug!(
            kind = self.kind.as_str(),
            bucket = %self.bucket,
            clauses = self.clauses.len(),
            "sub-query ended"
        );
        self.consumed = true;
        self.clauses.clear();
        Ok(&mut *self.parent)
    }
}

impl<P: ClauseSink> ClauseSink for SubQueryBuilder<'_, P> {
    fn add_clause(&mut self, clause: Value, _bucket: Bucket, _filter: bool) -> Result<()> {
        if self.consumed {
            return Err(QueryError::SubQueryConsumed);
        }
        self.clauses.push(clause);
        Ok(())
    }
}

impl<P: ClauseSink> Drop for SubQueryBuilder<'_, P> {
    fn drop(&mut self) {
        if !self.consumed && !self.clauses.is_empty() {
            tracing::warn!(
                kind = self.kind.as_str(),
                clauses = self.clauses.len(),
                "sub-query dropped without end_sub_query; clauses discarded"
            );
        }
    }
}
