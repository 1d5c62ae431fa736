//! The fluent clause DSL shared by [`QueryBuilder`] and [`SubQueryBuilder`].
//!
//! Both builders implement [`ClauseSink`], the single insertion primitive.
//! [`QueryDsl`] is implemented for every sink and provides the clause
//! methods on top of it, so a sub-query accepts exactly the same calls as
//! the top-level builder.
//!
//! # Key/value fan-out
//!
//! `term`, `match_`, `prefix`, `wildcard`, and `regexp` accept one or many
//! keys and one or many values:
//!
//! | keys | values | result |
//! |------|--------|--------|
//! | one | one | the leaf clause |
//! | one | many | `or` group, one leaf per value |
//! | many | one | `or` group, one leaf per key |
//! | many | many | `or` group of per-key `or` groups (keys outer, values inner) |
//!
//! Groups always land in the filter section of the chosen bucket. An empty
//! key, value, or range operator list fails with
//! [`QueryError::EmptyList`](crate::QueryError::EmptyList) and inserts
//! nothing.
//!
//! [`QueryBuilder`]: crate::QueryBuilder
//! [`SubQueryBuilder`]: crate::SubQueryBuilder

use serde_json::Value;

use crate::clause::{self, ClauseOptions, FanOut, Params};
use crate::error::Result;
use crate::op::{Bucket, Comparison, GroupKind, LeafKind, RangeOp, Tool};
use crate::sub_query::SubQueryBuilder;
use crate::value::{Keys, OneOrMany, RangeOps, Scalar, Values};

/// Receives finished clause nodes.
pub trait ClauseSink {
    /// Inserts one clause into `bucket` of the filter (`filter == true`) or
    /// query section.
    fn add_clause(&mut self, clause: Value, bucket: Bucket, filter: bool) -> Result<()>;
}

/// Fluent clause methods available on every [`ClauseSink`].
///
/// Each method returns the builder again so calls chain with `?`:
///
/// ```
/// use esmapper::{QueryBuilder, QueryDsl};
///
/// # fn main() -> esmapper::Result<()> {
/// let mut query = QueryBuilder::new();
/// query
///     .where_("status", "published", "=")?
///     .where_("age", 18, ">=")?
///     .where_("title", "rust", "match")?;
/// # Ok(())
/// # }
/// ```
pub trait QueryDsl: ClauseSink + Sized {
    /// Adds a clause chosen from a comparison token.
    ///
    /// The token picks the clause tool (`"="`, `">"`, `"between"`, `"like"`,
    /// `"=*"`, `"rx"`, `"match"`, ...) and its sign picks the bucket: `!`
    /// for `must_not`, `?` for `should`, none for `must`. Exact-match tools
    /// default to the filter section and scored tools to the query section.
    fn where_(
        &mut self,
        key: impl Into<Keys>,
        value: impl Into<Values>,
        compare: &str,
    ) -> Result<&mut Self> {
        self.where_with(key, value, compare, None, Params::new())
    }

    /// [`where_`](QueryDsl::where_) with an explicit section and extra
    /// parameters. `filter: Some(_)` overrides the tool's default section.
    fn where_with(
        &mut self,
        key: impl Into<Keys>,
        value: impl Into<Values>,
        compare: &str,
        filter: Option<bool>,
        params: Params,
    ) -> Result<&mut Self> {
        let Comparison { bucket, tool } = Comparison::parse(compare);
        let opts = ClauseOptions {
            bucket,
            filter: filter.unwrap_or_else(|| tool.default_filter()),
            params,
        };

        let mut values = value.into();
        if let Some((prefix, suffix)) = tool.decoration() {
            values = values.map(|v| v.decorate(prefix, suffix));
        }

        match tool {
            Tool::Range(ops) => {
                let ops: RangeOps = match ops {
                    [op] => OneOrMany::One(*op),
                    ops => ops.into(),
                };
                self.range_with(key, ops, values, opts)
            }
            Tool::Term => self.term_with(key, values, opts),
            Tool::Match => self.match_with(key, values, opts),
            Tool::Prefix => self.prefix_with(key, values, opts),
            Tool::Suffix | Tool::Contains => self.wildcard_with(key, values, opts),
            Tool::Regexp => self.regexp_with(key, values, opts),
        }
    }

    /// Adds a `term` clause to `must` in the query section.
    fn term(&mut self, key: impl Into<Keys>, value: impl Into<Values>) -> Result<&mut Self> {
        self.term_with(key, value, ClauseOptions::default())
    }

    /// Adds `term` clauses with explicit options.
    fn term_with(
        &mut self,
        key: impl Into<Keys>,
        value: impl Into<Values>,
        opts: ClauseOptions,
    ) -> Result<&mut Self> {
        insert_leaves(self, LeafKind::Term, key.into(), value.into(), &opts)?;
        Ok(self)
    }

    /// Adds a single `terms` clause matching any of `values`.
    ///
    /// A list of keys yields an `or` group with one `terms` clause per key.
    fn terms(&mut self, key: impl Into<Keys>, values: impl Into<Values>) -> Result<&mut Self> {
        self.terms_with(key, values, ClauseOptions::default())
    }

    /// Adds `terms` clauses with explicit options.
    fn terms_with(
        &mut self,
        key: impl Into<Keys>,
        values: impl Into<Values>,
        opts: ClauseOptions,
    ) -> Result<&mut Self> {
        let keys = key.into();
        let values = values.into();
        clause::require_items(&keys, "key")?;
        clause::require_items(&values, "value")?;
        let values = values.into_vec();
        match keys {
            OneOrMany::One(key) => {
                let clause = clause::terms(&key, values, &opts.params);
                self.add_clause(clause, opts.bucket, opts.filter)?;
            }
            OneOrMany::Many(keys) => {
                let members = keys
                    .iter()
                    .map(|key| clause::terms(key, values.clone(), &opts.params))
                    .collect();
                insert_fan_out(self, FanOut::Group(members), &opts)?;
            }
        }
        Ok(self)
    }

    /// Adds a full-text `match` clause to `must` in the query section.
    fn match_(&mut self, key: impl Into<Keys>, value: impl Into<Values>) -> Result<&mut Self> {
        self.match_with(key, value, ClauseOptions::default())
    }

    /// Adds `match` clauses with explicit options.
    fn match_with(
        &mut self,
        key: impl Into<Keys>,
        value: impl Into<Values>,
        opts: ClauseOptions,
    ) -> Result<&mut Self> {
        insert_leaves(self, LeafKind::Match, key.into(), value.into(), &opts)?;
        Ok(self)
    }

    /// Adds one `multi_match` clause searching `value` across `keys`.
    fn multi_match(&mut self, keys: impl Into<Keys>, value: impl Into<Scalar>) -> Result<&mut Self> {
        self.multi_match_with(keys, value, ClauseOptions::default())
    }

    /// Adds a `multi_match` clause with explicit options.
    fn multi_match_with(
        &mut self,
        keys: impl Into<Keys>,
        value: impl Into<Scalar>,
        opts: ClauseOptions,
    ) -> Result<&mut Self> {
        let keys = keys.into();
        clause::require_items(&keys, "key")?;
        let clause = clause::multi_match(keys.into_vec(), value.into(), &opts.params);
        let clause = clause::for_section(clause, false, opts.filter);
        self.add_clause(clause, opts.bucket, opts.filter)?;
        Ok(self)
    }

    /// Adds an `or` group with one `multi_match` clause per value.
    fn multi_matches(
        &mut self,
        keys: impl Into<Keys>,
        values: impl Into<Values>,
    ) -> Result<&mut Self> {
        self.multi_matches_with(keys, values, ClauseOptions::default())
    }

    /// [`multi_matches`](QueryDsl::multi_matches) with explicit options.
    fn multi_matches_with(
        &mut self,
        keys: impl Into<Keys>,
        values: impl Into<Values>,
        opts: ClauseOptions,
    ) -> Result<&mut Self> {
        let keys = keys.into();
        let values = values.into();
        clause::require_items(&keys, "key")?;
        clause::require_items(&values, "value")?;
        let keys = keys.into_vec();
        match values {
            OneOrMany::One(value) => self.multi_match_with(keys, value, opts),
            OneOrMany::Many(values) => {
                let members = values
                    .into_iter()
                    .map(|value| {
                        let clause = clause::multi_match(keys.clone(), value, &opts.params);
                        clause::for_section(clause, false, true)
                    })
                    .collect();
                insert_fan_out(self, FanOut::Group(members), &opts)?;
                Ok(self)
            }
        }
    }

    /// Adds a `range` clause to `must` in the query section.
    ///
    /// `op` and `value` must both be single or both be lists of the same
    /// length; each operator pairs with the value at the same position, so
    /// `[Gte, Lte]` with `[10, 20]` yields one two-sided range.
    fn range(
        &mut self,
        key: impl Into<Keys>,
        op: impl Into<RangeOps>,
        value: impl Into<Values>,
    ) -> Result<&mut Self> {
        self.range_with(key, op, value, ClauseOptions::default())
    }

    /// Adds `range` clauses with explicit options.
    ///
    /// Fails with [`QueryError::InvalidRangeArity`] before inserting
    /// anything if operators and values do not pair up.
    ///
    /// [`QueryError::InvalidRangeArity`]: crate::QueryError::InvalidRangeArity
    fn range_with(
        &mut self,
        key: impl Into<Keys>,
        op: impl Into<RangeOps>,
        value: impl Into<Values>,
        opts: ClauseOptions,
    ) -> Result<&mut Self> {
        let keys = key.into();
        let ops = op.into();
        let values = value.into();
        clause::require_items(&keys, "key")?;
        clause::check_range_arity(&ops, &values)?;

        let ops: Vec<RangeOp> = ops.into_vec();
        let values: Vec<Scalar> = values.into_vec();
        let out = match keys {
            OneOrMany::One(key) => FanOut::Leaf(clause::range(&key, &ops, &values, &opts.params)),
            OneOrMany::Many(keys) => FanOut::Group(
                keys.iter()
                    .map(|key| clause::range(key, &ops, &values, &opts.params))
                    .collect(),
            ),
        };
        insert_fan_out(self, out, &opts)?;
        Ok(self)
    }

    /// Adds a `prefix` clause to `must` in the query section.
    fn prefix(&mut self, key: impl Into<Keys>, value: impl Into<Values>) -> Result<&mut Self> {
        self.prefix_with(key, value, ClauseOptions::default())
    }

    /// Adds `prefix` clauses with explicit options.
    fn prefix_with(
        &mut self,
        key: impl Into<Keys>,
        value: impl Into<Values>,
        opts: ClauseOptions,
    ) -> Result<&mut Self> {
        insert_leaves(self, LeafKind::Prefix, key.into(), value.into(), &opts)?;
        Ok(self)
    }

    /// Adds a `wildcard` clause to `must` in the query section.
    ///
    /// The value is used as given; `where_` with `"like"` or `"*="` adds
    /// the `*` decoration.
    fn wildcard(&mut self, key: impl Into<Keys>, value: impl Into<Values>) -> Result<&mut Self> {
        self.wildcard_with(key, value, ClauseOptions::default())
    }

    /// Adds `wildcard` clauses with explicit options.
    fn wildcard_with(
        &mut self,
        key: impl Into<Keys>,
        value: impl Into<Values>,
        opts: ClauseOptions,
    ) -> Result<&mut Self> {
        insert_leaves(self, LeafKind::Wildcard, key.into(), value.into(), &opts)?;
        Ok(self)
    }

    /// Adds a `regexp` clause to `must` in the query section.
    fn regexp(&mut self, key: impl Into<Keys>, value: impl Into<Values>) -> Result<&mut Self> {
        self.regexp_with(key, value, ClauseOptions::default())
    }

    /// Adds `regexp` clauses with explicit options.
    fn regexp_with(
        &mut self,
        key: impl Into<Keys>,
        value: impl Into<Values>,
        opts: ClauseOptions,
    ) -> Result<&mut Self> {
        insert_leaves(self, LeafKind::Regexp, key.into(), value.into(), &opts)?;
        Ok(self)
    }

    /// Opens an `and` group that lands in `must` when ended.
    fn and_where(&mut self) -> SubQueryBuilder<'_, Self> {
        self.and_where_with(Bucket::Must, Params::new())
    }

    /// Opens an `and` group for `bucket`, carrying extra group parameters.
    fn and_where_with(&mut self, bucket: Bucket, params: Params) -> SubQueryBuilder<'_, Self> {
        SubQueryBuilder::new(self, GroupKind::And, bucket, params)
    }

    /// Opens an `or` group that lands in `must` when ended.
    fn or_where(&mut self) -> SubQueryBuilder<'_, Self> {
        self.or_where_with(Bucket::Must, Params::new())
    }

    /// Opens an `or` group for `bucket`, carrying extra group parameters.
    fn or_where_with(&mut self, bucket: Bucket, params: Params) -> SubQueryBuilder<'_, Self> {
        SubQueryBuilder::new(self, GroupKind::Or, bucket, params)
    }

    /// Inserts a raw clause into `must` of the filter section.
    fn raw_must_filter(&mut self, clause: Value) -> Result<&mut Self> {
        self.add_clause(clause, Bucket::Must, true)?;
        Ok(self)
    }

    /// Inserts a raw clause into `must_not` of the filter section.
    fn raw_must_not_filter(&mut self, clause: Value) -> Result<&mut Self> {
        self.add_clause(clause, Bucket::MustNot, true)?;
        Ok(self)
    }

    /// Inserts a raw clause into `should` of the filter section.
    fn raw_should_filter(&mut self, clause: Value) -> Result<&mut Self> {
        self.add_clause(clause, Bucket::Should, true)?;
        Ok(self)
    }

    /// Inserts a raw clause into `must` of the query section.
    fn raw_must_query(&mut self, clause: Value) -> Result<&mut Self> {
        self.add_clause(clause, Bucket::Must, false)?;
        Ok(self)
    }

    /// Inserts a raw clause into `must_not` of the query section.
    fn raw_must_not_query(&mut self, clause: Value) -> Result<&mut Self> {
        self.add_clause(clause, Bucket::MustNot, false)?;
        Ok(self)
    }

    /// Inserts a raw clause into `should` of the query section.
    fn raw_should_query(&mut self, clause: Value) -> Result<&mut Self> {
        self.add_clause(clause, Bucket::Should, false)?;
        Ok(self)
    }
}

impl<S: ClauseSink> QueryDsl for S {}

/// Inserts a fan-out result: a lone leaf per `opts`, a group always into
/// the filter section.
fn insert_fan_out<S: ClauseSink>(sink: &mut S, out: FanOut, opts: &ClauseOptions) -> Result<()> {
    match out {
        FanOut::Leaf(clause) => sink.add_clause(clause, opts.bucket, opts.filter),
        group @ FanOut::Group(_) => sink.add_clause(group.into_clause(), opts.bucket, true),
    }
}

fn insert_leaves<S: ClauseSink>(
    sink: &mut S,
    kind: LeafKind,
    keys: Keys,
    values: Values,
    opts: &ClauseOptions,
) -> Result<()> {
    clause::require_items(&keys, "key")?;
    clause::require_items(&values, "value")?;
    let build = |key: &str, value: Scalar, opts: &ClauseOptions| {
        let leaf = clause::leaf(kind, key, value, &opts.params);
        clause::for_section(leaf, kind.is_native_filter(), opts.filter)
    };
    let out = clause::fan_out(keys, values, opts, &build);
    insert_fan_out(sink, out, opts)
}
