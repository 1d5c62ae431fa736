//! Comparison tokens, clause tools, and boolean buckets.
//!
//! [`Comparison::parse`] turns the free-form comparison token accepted by
//! `where_` (`"="`, `">="`, `"!like"`, `"?between_from_to"`, ...) into a
//! [`Bucket`] and a [`Tool`]. Unrecognized tokens resolve to an exact `term`
//! match.

use std::str::FromStr;

use crate::error::QueryError;

/// The boolean role a clause plays in its `bool` query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Bucket {
    /// The clause must match.
    #[default]
    Must,
    /// The clause should match.
    Should,
    /// The clause must not match.
    MustNot,
}

impl Bucket {
    /// Returns the wire name of this bucket.
    pub fn as_str(self) -> &'static str {
        match self {
            Bucket::Must => "must",
            Bucket::Should => "should",
            Bucket::MustNot => "must_not",
        }
    }
}

impl std::fmt::Display for Bucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A bound in a `range` clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RangeOp {
    /// Greater than.
    Gt,
    /// Greater than or equal.
    Gte,
    /// Less than.
    Lt,
    /// Less than or equal.
    Lte,
}

impl RangeOp {
    /// Returns the wire name of this operator.
    pub fn as_str(self) -> &'static str {
        match self {
            RangeOp::Gt => "gt",
            RangeOp::Gte => "gte",
            RangeOp::Lt => "lt",
            RangeOp::Lte => "lte",
        }
    }
}

impl std::fmt::Display for RangeOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for RangeOp {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gt" => Ok(RangeOp::Gt),
            "gte" => Ok(RangeOp::Gte),
            "lt" => Ok(RangeOp::Lt),
            "lte" => Ok(RangeOp::Lte),
            _ => Err(QueryError::InvalidOperator(s.to_string())),
        }
    }
}

/// Wrapper key of a group node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GroupKind {
    /// Every member must match.
    And,
    /// At least one member must match.
    Or,
}

impl GroupKind {
    /// Returns the wire name of this group.
    pub fn as_str(self) -> &'static str {
        match self {
            GroupKind::And => "and",
            GroupKind::Or => "or",
        }
    }
}

/// Single-field leaf clauses that take part in key/value fan-out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LeafKind {
    /// Exact value, body field `value`.
    Term,
    /// Analyzed full-text match, body field `query`.
    Match,
    /// Leading-characters match, body field `value`.
    Prefix,
    /// Glob pattern, body field `wildcard`.
    Wildcard,
    /// Regular expression, body field `value`.
    Regexp,
}

impl LeafKind {
    /// Returns the wire name of this clause.
    pub fn as_str(self) -> &'static str {
        match self {
            LeafKind::Term => "term",
            LeafKind::Match => "match",
            LeafKind::Prefix => "prefix",
            LeafKind::Wildcard => "wildcard",
            LeafKind::Regexp => "regexp",
        }
    }

    /// Name of the body field that carries the searched value.
    pub(crate) fn value_field(self) -> &'static str {
        match self {
            LeafKind::Match => "query",
            LeafKind::Wildcard => "wildcard",
            LeafKind::Term | LeafKind::Prefix | LeafKind::Regexp => "value",
        }
    }

    /// `term` is accepted as a filter as-is; every other leaf needs a
    /// `query` wrapper when it is placed in the filter section.
    pub(crate) fn is_native_filter(self) -> bool {
        matches!(self, LeafKind::Term)
    }
}

const GT: &[RangeOp] = &[RangeOp::Gt];
const GTE: &[RangeOp] = &[RangeOp::Gte];
const LT: &[RangeOp] = &[RangeOp::Lt];
const LTE: &[RangeOp] = &[RangeOp::Lte];
const GT_LT: &[RangeOp] = &[RangeOp::Gt, RangeOp::Lt];
const GTE_LTE: &[RangeOp] = &[RangeOp::Gte, RangeOp::Lte];
const GTE_LT: &[RangeOp] = &[RangeOp::Gte, RangeOp::Lt];
const GT_LTE: &[RangeOp] = &[RangeOp::Gt, RangeOp::Lte];

/// The clause tool a comparison token resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tool {
    /// Exact match (`term`).
    Term,
    /// `range` with one or more bounds, paired positionally with the values.
    Range(&'static [RangeOp]),
    /// `wildcard` with the value prefixed by `*`.
    Suffix,
    /// `prefix`.
    Prefix,
    /// `wildcard` with the value wrapped in `*...*`.
    Contains,
    /// `regexp`.
    Regexp,
    /// Full-text `match`.
    Match,
}

impl Tool {
    /// Whether clauses of this tool go to the filter section when the
    /// caller does not say otherwise.
    pub fn default_filter(self) -> bool {
        !matches!(self, Tool::Suffix | Tool::Contains | Tool::Match)
    }

    /// The leaf clause this tool builds, or `None` for ranges.
    pub fn leaf_kind(self) -> Option<LeafKind> {
        match self {
            Tool::Term => Some(LeafKind::Term),
            Tool::Range(_) => None,
            Tool::Suffix | Tool::Contains => Some(LeafKind::Wildcard),
            Tool::Prefix => Some(LeafKind::Prefix),
            Tool::Regexp => Some(LeafKind::Regexp),
            Tool::Match => Some(LeafKind::Match),
        }
    }

    /// Text placed before and after string values.
    pub(crate) fn decoration(self) -> Option<(&'static str, &'static str)> {
        match self {
            Tool::Suffix => Some(("*", "")),
            Tool::Contains => Some(("*", "*")),
            _ => None,
        }
    }
}

/// A parsed comparison token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Comparison {
    pub bucket: Bucket,
    pub tool: Tool,
}

impl Comparison {
    /// Parses a comparison token.
    ///
    /// A leading `!` selects `must_not`, a leading `?` selects `should`.
    /// The rest is matched case-insensitively with `_` read as a space.
    pub fn parse(token: &str) -> Self {
        let token = token.trim();
        let (bucket, rest) = if let Some(rest) = token.strip_prefix('!') {
            (Bucket::MustNot, rest)
        } else if let Some(rest) = token.strip_prefix('?') {
            (Bucket::Should, rest)
        } else {
            (Bucket::Must, token)
        };

        let normalized = rest.trim().replace('_', " ").to_lowercase();
        let tool = match normalized.as_str() {
            ">" | "gt" => Tool::Range(GT),
            "<" | "lt" => Tool::Range(LT),
            "><" | "<>" | "between" => Tool::Range(GT_LT),
            ">=<=" | "<=>=" | "between from to" => Tool::Range(GTE_LTE),
            ">=<" | "<>=" | "between from" => Tool::Range(GTE_LT),
            "><=" | "<=>" | "between to" => Tool::Range(GT_LTE),
            ">=" | "gte" => Tool::Range(GTE),
            "<=" | "lte" => Tool::Range(LTE),
            "*=" | "suffix" | "suffixed" | "ends with" | "ends" => Tool::Suffix,
            "=*" | "starts" | "starts with" | "prefix" | "prefixed" => Tool::Prefix,
            "*=*" | "like" | "wildcard" => Tool::Contains,
            "**" | "r" | "regexp" | "regex" | "rx" => Tool::Regexp,
            "*" | "match" => Tool::Match,
            _ => Tool::Term,
        };

        Comparison { bucket, tool }
    }
}

impl From<&str> for Comparison {
    fn from(token: &str) -> Self {
        Comparison::parse(token)
    }
}
