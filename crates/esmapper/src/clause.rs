//! Clause node construction.
//!
//! Every builder method ends up here to turn a key, a value, and the
//! caller's extra parameters into one JSON clause node. Extra parameters are
//! merged shallowly into the per-field body (`boost`, `analyzer`, `_name`,
//! ...) and never replace the structural fields a clause needs:
//!
//! ```text
//! term        {"term": {key: {"value": v, ..params}}}
//! terms       {"terms": {key: [v, ..], ..params}}
//! match       {"match": {key: {"query": v, ..params}}}
//! multi_match {"multi_match": {"query": v, "fields": [k, ..], ..params}}
//! range       {"range": {key: {op: v, .., ..params}}}
//! prefix      {"prefix": {key: {"value": v, ..params}}}
//! wildcard    {"wildcard": {key: {"wildcard": v, ..params}}}
//! regexp      {"regexp": {key: {"value": v, ..params}}}
//! group       {"and"|"or": [clause, ..]}
//! ```

use serde_json::{Map, Value};

use crate::error::{QueryError, Result};
use crate::op::{Bucket, GroupKind, LeafKind, RangeOp};
use crate::value::{Keys, OneOrMany, RangeOps, Scalar, Values};

/// Extra clause parameters, merged into the clause body.
pub type Params = Map<String, Value>;

/// Where a clause goes and what extra parameters it carries.
///
/// The default is the `must` bucket of the query (scoring) section with no
/// extra parameters.
///
/// ```
/// use esmapper::{Bucket, ClauseOptions};
///
/// let opts = ClauseOptions::should().with_filter(true).with_param("boost", 2);
/// assert_eq!(opts.bucket, Bucket::Should);
/// assert!(opts.filter);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClauseOptions {
    /// Target bucket.
    pub bucket: Bucket,
    /// `true` for the filter section, `false` for the query section.
    pub filter: bool,
    /// Extra parameters merged into the clause body.
    pub params: Params,
}

impl ClauseOptions {
    /// Options for the `must` bucket of the query section.
    pub fn new() -> Self {
        Self::default()
    }

    /// Options for the `must` bucket.
    pub fn must() -> Self {
        Self::in_bucket(Bucket::Must)
    }

    /// Options for the `should` bucket.
    pub fn should() -> Self {
        Self::in_bucket(Bucket::Should)
    }

    /// Options for the `must_not` bucket.
    pub fn must_not() -> Self {
        Self::in_bucket(Bucket::MustNot)
    }

    /// Options for the given bucket.
    pub fn in_bucket(bucket: Bucket) -> Self {
        ClauseOptions {
            bucket,
            ..Self::default()
        }
    }

    /// Selects the filter (`true`) or query (`false`) section.
    pub fn with_filter(mut self, filter: bool) -> Self {
        self.filter = filter;
        self
    }

    /// Adds one extra parameter.
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    /// Replaces the extra parameters.
    pub fn with_params(mut self, params: Params) -> Self {
        self.params = params;
        self
    }

    /// The options used for the members of an automatic OR group: same
    /// bucket and parameters, filter semantics.
    pub(crate) fn grouped(&self) -> Self {
        ClauseOptions {
            bucket: self.bucket,
            filter: true,
            params: self.params.clone(),
        }
    }
}

fn single(key: impl Into<String>, body: Value) -> Value {
    let mut map = Map::new();
    map.insert(key.into(), body);
    Value::Object(map)
}

/// Inserts params that do not collide with structural fields.
fn merge_params(body: &mut Map<String, Value>, params: &Params) {
    for (name, value) in params {
        if !body.contains_key(name) {
            body.insert(name.clone(), value.clone());
        }
    }
}

/// Wraps a scored clause as `{"query": clause}` when it goes to the filter
/// section.
pub(crate) fn for_section(clause: Value, native_filter: bool, filter: bool) -> Value {
    if filter && !native_filter {
        single("query", clause)
    } else {
        clause
    }
}

/// Builds one single-field leaf clause.
pub(crate) fn leaf(kind: LeafKind, key: &str, value: Scalar, params: &Params) -> Value {
    let mut body = Map::new();
    body.insert(kind.value_field().to_string(), value.into_value());
    merge_params(&mut body, params);
    single(kind.as_str(), single(key, Value::Object(body)))
}

/// Builds a `terms` clause matching any of `values`.
pub(crate) fn terms(key: &str, values: Vec<Scalar>, params: &Params) -> Value {
    let mut body = Map::new();
    body.insert(
        key.to_string(),
        Value::Array(values.into_iter().map(Scalar::into_value).collect()),
    );
    merge_params(&mut body, params);
    single("terms", Value::Object(body))
}

/// Builds a `multi_match` clause over `keys`.
pub(crate) fn multi_match(keys: Vec<String>, value: Scalar, params: &Params) -> Value {
    let mut body = Map::new();
    body.insert("query".to_string(), value.into_value());
    body.insert(
        "fields".to_string(),
        Value::Array(keys.into_iter().map(Value::String).collect()),
    );
    merge_params(&mut body, params);
    single("multi_match", Value::Object(body))
}

/// Fails with [`QueryError::EmptyList`] when `items` is an empty list.
pub(crate) fn require_items<T>(items: &OneOrMany<T>, side: &'static str) -> Result<()> {
    if items.is_empty() {
        return Err(QueryError::EmptyList(side));
    }
    Ok(())
}

/// Checks that range operators and values pair up one to one, with at
/// least one pair.
pub(crate) fn check_range_arity(ops: &RangeOps, values: &Values) -> Result<()> {
    let paired = match (ops, values) {
        (OneOrMany::One(_), OneOrMany::One(_)) => true,
        (OneOrMany::Many(ops), OneOrMany::Many(values)) => ops.len() == values.len(),
        _ => false,
    };
    if paired {
        require_items(ops, "range operator")
    } else {
        Err(QueryError::InvalidRangeArity {
            operators: ops.len(),
            values: values.len(),
        })
    }
}

/// Builds a `range` clause with one bound per operator/value pair.
///
/// Arity must already be checked with [`check_range_arity`].
pub(crate) fn range(key: &str, ops: &[RangeOp], values: &[Scalar], params: &Params) -> Value {
    let mut body = Map::new();
    for (op, value) in ops.iter().zip(values) {
        body.insert(op.as_str().to_string(), value.as_value().clone());
    }
    merge_params(&mut body, params);
    single("range", single(key, Value::Object(body)))
}

/// Builds an `and`/`or` group node.
///
/// Without params the group is the plain member list; with params the
/// members move under `filters` next to the params.
pub(crate) fn group(kind: GroupKind, clauses: Vec<Value>, params: &Params) -> Value {
    if params.is_empty() {
        return single(kind.as_str(), Value::Array(clauses));
    }
    let mut body = Map::new();
    body.insert("filters".to_string(), Value::Array(clauses));
    merge_params(&mut body, params);
    single(kind.as_str(), Value::Object(body))
}

/// Builds leaf clauses for every key/value combination.
///
/// A single key and value yield the leaf itself (placed per `opts.filter`).
/// Any list yields an `or` group whose members use filter semantics; a list
/// of keys with a list of values yields an `or` group of per-key `or`
/// groups, keys outer and values inner.
pub(crate) fn fan_out<F>(keys: Keys, values: Values, opts: &ClauseOptions, build: &F) -> FanOut
where
    F: Fn(&str, Scalar, &ClauseOptions) -> Value,
{
    match (keys, values) {
        (OneOrMany::One(key), OneOrMany::One(value)) => FanOut::Leaf(build(&key, value, opts)),
        (OneOrMany::One(key), OneOrMany::Many(values)) => {
            let inner = opts.grouped();
            let members = values
                .into_iter()
                .map(|value| build(&key, value, &inner))
                .collect();
            FanOut::Group(members)
        }
        (OneOrMany::Many(keys), values) => {
            let inner = opts.grouped();
            let members = keys
                .into_iter()
                .map(|key| fan_out(OneOrMany::One(key), values.clone(), &inner, build).into_clause())
                .collect();
            FanOut::Group(members)
        }
    }
}

/// Result of [`fan_out`]: a lone leaf or the members of an `or` group.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum FanOut {
    Leaf(Value),
    Group(Vec<Value>),
}

impl FanOut {
    /// The clause node this fan-out represents.
    pub(crate) fn into_clause(self) -> Value {
        match self {
            FanOut::Leaf(clause) => clause,
            FanOut::Group(members) => group(GroupKind::Or, members, &Params::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn term_leaf(key: &str, value: Scalar, opts: &ClauseOptions) -> Value {
        leaf(LeafKind::Term, key, value, &opts.params)
    }

    #[test]
    fn term_leaf_shape() {
        let clause = leaf(LeafKind::Term, "name", "bob".into(), &Params::new());
        assert_eq!(clause, json!({"term": {"name": {"value": "bob"}}}));
    }

    #[test]
    fn params_never_override_structure() {
        let opts = ClauseOptions::new()
            .with_param("boost", 2)
            .with_param("query", "hijack");
        let clause = leaf(LeafKind::Match, "title", "rust".into(), &opts.params);
        assert_eq!(
            clause,
            json!({"match": {"title": {"query": "rust", "boost": 2}}})
        );
    }

    #[test]
    fn wildcard_uses_wildcard_field() {
        let clause = leaf(LeafKind::Wildcard, "email", "*mail*".into(), &Params::new());
        assert_eq!(clause, json!({"wildcard": {"email": {"wildcard": "*mail*"}}}));
    }

    #[test]
    fn terms_shape_with_params() {
        let opts = ClauseOptions::new().with_param("boost", 1.5);
        let clause = terms("tag", vec!["a".into(), "b".into()], &opts.params);
        assert_eq!(clause, json!({"terms": {"tag": ["a", "b"], "boost": 1.5}}));
    }

    #[test]
    fn multi_match_shape() {
        let clause = multi_match(
            vec!["title".into(), "body".into()],
            "rust".into(),
            &Params::new(),
        );
        assert_eq!(
            clause,
            json!({"multi_match": {"query": "rust", "fields": ["title", "body"]}})
        );
    }

    #[test]
    fn range_pairs_bounds() {
        let clause = range(
            "age",
            &[RangeOp::Gte, RangeOp::Lte],
            &[10.into(), 20.into()],
            &Params::new(),
        );
        assert_eq!(clause, json!({"range": {"age": {"gte": 10, "lte": 20}}}));
    }

    #[test]
    fn range_arity() {
        let scalar_op: RangeOps = RangeOp::Gt.into();
        let pair_ops: RangeOps = [RangeOp::Gt, RangeOp::Lt].into();
        assert!(check_range_arity(&scalar_op, &1.into()).is_ok());
        assert!(check_range_arity(&pair_ops, &[1, 2].into()).is_ok());
        assert!(check_range_arity(&scalar_op, &[1, 2].into()).is_err());
        assert!(check_range_arity(&pair_ops, &1.into()).is_err());
        assert!(check_range_arity(&pair_ops, &[1, 2, 3].into()).is_err());

        let no_ops: RangeOps = OneOrMany::Many(vec![]);
        let no_values: Values = OneOrMany::Many(vec![]);
        assert!(matches!(
            check_range_arity(&no_ops, &no_values),
            Err(QueryError::EmptyList("range operator"))
        ));
    }

    #[test]
    fn require_items_rejects_only_empty_lists() {
        assert!(require_items(&Keys::from("a"), "key").is_ok());
        assert!(require_items(&Keys::from(["a", "b"]), "key").is_ok());
        assert!(matches!(
            require_items(&Keys::Many(vec![]), "key"),
            Err(QueryError::EmptyList("key"))
        ));
    }

    #[test]
    fn group_with_and_without_params() {
        let members = vec![json!({"term": {"a": {"value": 1}}})];
        assert_eq!(
            group(GroupKind::And, members.clone(), &Params::new()),
            json!({"and": [{"term": {"a": {"value": 1}}}]})
        );

        let opts = ClauseOptions::new().with_param("_cache", true);
        assert_eq!(
            group(GroupKind::Or, members, &opts.params),
            json!({"or": {"filters": [{"term": {"a": {"value": 1}}}], "_cache": true}})
        );
    }

    #[test]
    fn filter_section_wraps_scored_clauses() {
        let clause = json!({"match": {"a": {"query": "x"}}});
        assert_eq!(
            for_section(clause.clone(), false, true),
            json!({"query": {"match": {"a": {"query": "x"}}}})
        );
        assert_eq!(for_section(clause.clone(), false, false), clause);
        assert_eq!(for_section(clause.clone(), true, true), clause);
    }

    #[test]
    fn fan_out_single() {
        let out = fan_out("a".into(), 1.into(), &ClauseOptions::new(), &term_leaf);
        assert_eq!(out, FanOut::Leaf(json!({"term": {"a": {"value": 1}}})));
    }

    #[test]
    fn fan_out_cross_product_order() {
        let out = fan_out(
            ["k1", "k2"].into(),
            ["v1", "v2"].into(),
            &ClauseOptions::new(),
            &term_leaf,
        );
        assert_eq!(
            out.into_clause(),
            json!({"or": [
                {"or": [
                    {"term": {"k1": {"value": "v1"}}},
                    {"term": {"k1": {"value": "v2"}}}
                ]},
                {"or": [
                    {"term": {"k2": {"value": "v1"}}},
                    {"term": {"k2": {"value": "v2"}}}
                ]}
            ]})
        );
    }

    #[test]
    fn fan_out_members_use_filter_semantics() {
        let seen = std::cell::RefCell::new(Vec::new());
        let record = |key: &str, value: Scalar, opts: &ClauseOptions| {
            seen.borrow_mut().push(opts.filter);
            leaf(LeafKind::Term, key, value, &opts.params)
        };
        fan_out("a".into(), [1, 2].into(), &ClauseOptions::new(), &record);
        assert_eq!(*seen.borrow(), vec![true, true]);
    }
}
