//! Sort entries for the query document.
//!
//! Provides [`Dir`] for sort direction and [`SortOrder`] for the value of a
//! `{field: order}` sort entry.

use serde_json::{Map, Value};

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Dir {
    /// Ascending order (smallest first).
    #[default]
    Asc,
    /// Descending order (largest first).
    Desc,
}

impl Dir {
    /// Returns `true` if this is ascending order.
    pub fn is_asc(self) -> bool {
        matches!(self, Dir::Asc)
    }

    /// Returns `true` if this is descending order.
    pub fn is_desc(self) -> bool {
        matches!(self, Dir::Desc)
    }

    /// Returns the wire name of this direction.
    pub fn as_str(self) -> &'static str {
        match self {
            Dir::Asc => "asc",
            Dir::Desc => "desc",
        }
    }
}

impl std::fmt::Display for Dir {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The value side of a sort entry.
///
/// Either a plain direction (`{"age": "desc"}`) or an options object for
/// finer control (`{"price": {"order": "asc", "mode": "avg"}}`).
#[derive(Debug, Clone, PartialEq)]
pub enum SortOrder {
    /// `"asc"` or `"desc"`.
    Dir(Dir),
    /// A full options object, written as given.
    Options(Map<String, Value>),
}

impl SortOrder {
    /// Builds the `{field: order}` entry.
    pub(crate) fn entry(self, field: &str) -> Value {
        let order = match self {
            SortOrder::Dir(dir) => Value::String(dir.as_str().to_string()),
            SortOrder::Options(options) => Value::Object(options),
        };
        let mut entry = Map::new();
        entry.insert(field.to_string(), order);
        Value::Object(entry)
    }
}

impl Default for SortOrder {
    fn default() -> Self {
        SortOrder::Dir(Dir::Asc)
    }
}

impl From<Dir> for SortOrder {
    fn from(dir: Dir) -> Self {
        SortOrder::Dir(dir)
    }
}

impl From<Map<String, Value>> for SortOrder {
    fn from(options: Map<String, Value>) -> Self {
        SortOrder::Options(options)
    }
}
