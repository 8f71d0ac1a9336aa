//! Querystring filter adapter.
//!
//! Maps external field names (typically HTTP query parameters) to WHERE
//! conditions through a registry of per-field parsers. Keys with empty
//! values, keys with no registered parser, and parsers that decline are
//! all skipped silently, so a handler can pass its whole query map
//! through without pre-filtering.

use std::collections::HashMap;
use std::sync::Arc;

use crate::column::Col;
use crate::expr::{self, Expr};
use crate::op::LikeMatch;
use crate::param::Param;
use crate::parse;

/// Turns one raw query-value into a condition and its arguments, or
/// `None` to decline (for example when the value fails to parse).
pub type FilterParser = Arc<dyn Fn(&str) -> Option<(Expr, Vec<Param>)> + Send + Sync>;

/// Ordered mapping from external field names to [`FilterParser`]s.
///
/// Registration order is the order conditions and arguments appear in the
/// resulting [`Filter`], so generated SQL is stable across runs.
#[derive(Clone, Default)]
pub struct FilterRegistry {
    entries: Vec<(String, FilterParser)>,
}

impl FilterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a parser for an external field name. Re-registering a key
    /// keeps both entries; the first still wins the value lookup order.
    pub fn register(mut self, key: impl Into<String>, parser: FilterParser) -> Self {
        self.entries.push((key.into(), parser));
        self
    }
}

/// Conditions and arguments extracted from one query map.
#[derive(Clone)]
pub struct Filter {
    conditions: Vec<Expr>,
    args: Vec<Param>,
}

impl Filter {
    /// Run every registered parser against the query map.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let registry = FilterRegistry::new()
    ///     .register("name", like_filter(user.col("full_name"), LikeMatch::Substring))
    ///     .register("age", int_greater_than_equal_filter(user.col("age")));
    ///
    /// let filter = Filter::from_query(&query, &registry);
    /// let sql = select([user.col("*")])
    ///     .from(&user)
    ///     .where_(filter.condition())
    ///     .build();
    /// ```
    pub fn from_query(query: &HashMap<String, String>, registry: &FilterRegistry) -> Filter {
        let mut conditions = Vec::new();
        let mut args = Vec::new();
        for (key, parser) in &registry.entries {
            let Some(value) = query.get(key) else {
                continue;
            };
            if value.is_empty() {
                continue;
            }
            let Some((condition, mut parsed)) = parser(value) else {
                continue;
            };
            conditions.push(condition);
            args.append(&mut parsed);
        }
        Filter { conditions, args }
    }

    /// True when no query key produced a condition.
    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    /// All accepted conditions as one AND node. Empty filters yield an
    /// expression that renders to nothing, safe to pass to `where_`.
    pub fn condition(&self) -> Expr {
        expr::and(self.conditions.iter().cloned())
    }

    /// Arguments in placeholder order, matching [`condition`](Self::condition).
    pub fn args(&self) -> Vec<Param> {
        self.args.clone()
    }

    pub fn into_parts(self) -> (Expr, Vec<Param>) {
        (expr::and(self.conditions), self.args)
    }
}

// ==================== Parser factories ====================

/// Case-insensitive LIKE with the value padded per `mode`; the padded
/// pattern is the condition's single argument.
pub fn like_filter(column: Col, mode: LikeMatch) -> FilterParser {
    Arc::new(move |value| {
        let pattern = mode.pattern(value);
        Some((expr::ilike(column.clone()), vec![Param::new(pattern)]))
    })
}

/// Equality against the raw string value.
pub fn equal_filter(column: Col) -> FilterParser {
    Arc::new(move |value| {
        Some((
            expr::equal(column.clone()),
            vec![Param::new(value.to_string())],
        ))
    })
}

/// `>=` against a timestamp; declines when the value does not parse.
/// Extra chrono `formats` are tried after RFC 3339, see
/// [`parse_time`](crate::parse::parse_time).
pub fn time_greater_than_equal_filter(column: Col, formats: &[&str]) -> FilterParser {
    let formats: Vec<String> = formats.iter().map(|f| f.to_string()).collect();
    Arc::new(move |value| {
        let formats: Vec<&str> = formats.iter().map(String::as_str).collect();
        let t = parse::parse_time(value, &formats)?;
        Some((expr::greater_than_equal(column.clone()), vec![Param::new(t)]))
    })
}

/// `<=` against a timestamp; declines when the value does not parse.
pub fn time_less_than_equal_filter(column: Col, formats: &[&str]) -> FilterParser {
    let formats: Vec<String> = formats.iter().map(|f| f.to_string()).collect();
    Arc::new(move |value| {
        let formats: Vec<&str> = formats.iter().map(String::as_str).collect();
        let t = parse::parse_time(value, &formats)?;
        Some((expr::less_than_equal(column.clone()), vec![Param::new(t)]))
    })
}

/// `>=` against an integer; declines when the value does not parse.
pub fn int_greater_than_equal_filter(column: Col) -> FilterParser {
    Arc::new(move |value| {
        let i = parse::parse_int(value)?;
        Some((expr::greater_than_equal(column.clone()), vec![Param::new(i)]))
    })
}

/// `<=` against an integer; declines when the value does not parse.
pub fn int_less_than_equal_filter(column: Col) -> FilterParser {
    Arc::new(move |value| {
        let i = parse::parse_int(value)?;
        Some((expr::less_than_equal(column.clone()), vec![Param::new(i)]))
    })
}

/// `>=` against a float; declines when the value does not parse.
pub fn float_greater_than_equal_filter(column: Col) -> FilterParser {
    Arc::new(move |value| {
        let f = parse::parse_float(value)?;
        Some((expr::greater_than_equal(column.clone()), vec![Param::new(f)]))
    })
}

/// `<=` against a float; declines when the value does not parse.
pub fn float_less_than_equal_filter(column: Col) -> FilterParser {
    Arc::new(move |value| {
        let f = parse::parse_float(value)?;
        Some((expr::less_than_equal(column.clone()), vec![Param::new(f)]))
    })
}
