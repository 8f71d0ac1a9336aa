//! Operator vocabulary shared by the where tree and the statement builders.

/// Comparison operators supported by [`Expr::Compare`](crate::Expr) nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cmp {
    /// Equal (`=`)
    Eq,
    /// Not equal (`!=`)
    Ne,
    /// Greater than (`>`)
    Gt,
    /// Greater than or equal (`>=`)
    Gte,
    /// Less than (`<`)
    Lt,
    /// Less than or equal (`<=`)
    Lte,
    /// Pattern match (`LIKE`)
    Like,
    /// Negated pattern match (`NOT LIKE`)
    NotLike,
    /// Case-insensitive pattern match (`ILIKE`)
    ILike,
    /// Negated case-insensitive pattern match (`NOT ILIKE`)
    NotILike,
    /// Range test (`BETWEEN`)
    Between,
    /// Negated range test (`NOT BETWEEN`)
    NotBetween,
    /// Membership test (`IN`)
    In,
    /// Negated membership test (`NOT IN`)
    NotIn,
    /// Null test (`IS NULL`); the variable side renders nothing
    IsNull,
    /// Negated null test (`IS NOT NULL`); the variable side renders nothing
    IsNotNull,
}

impl Cmp {
    /// SQL text for this operator.
    pub fn sql(&self) -> &'static str {
        match self {
            Cmp::Eq => "=",
            Cmp::Ne => "!=",
            Cmp::Gt => ">",
            Cmp::Gte => ">=",
            Cmp::Lt => "<",
            Cmp::Lte => "<=",
            Cmp::Like => "LIKE",
            Cmp::NotLike => "NOT LIKE",
            Cmp::ILike => "ILIKE",
            Cmp::NotILike => "NOT ILIKE",
            Cmp::Between => "BETWEEN",
            Cmp::NotBetween => "NOT BETWEEN",
            Cmp::In => "IN",
            Cmp::NotIn => "NOT IN",
            Cmp::IsNull => "IS NULL",
            Cmp::IsNotNull => "IS NOT NULL",
        }
    }
}

/// Connectives for [`Expr::Logic`](crate::Expr) nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicOp {
    And,
    Or,
}

impl LogicOp {
    /// The separator rendered between child conditions, padding included.
    pub fn separator(&self) -> &'static str {
        match self {
            LogicOp::And => " AND ",
            LogicOp::Or => " OR ",
        }
    }
}

/// Join clause kinds. LEFT is the default used by `SelectBuilder::join`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinKind {
    Inner,
    Left,
    Right,
    Full,
}

impl JoinKind {
    /// SQL text for this join kind.
    pub fn sql(&self) -> &'static str {
        match self {
            JoinKind::Inner => "INNER JOIN",
            JoinKind::Left => "LEFT JOIN",
            JoinKind::Right => "RIGHT JOIN",
            JoinKind::Full => "FULL JOIN",
        }
    }
}

/// Sort direction for `ORDER BY` terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sort {
    Asc,
    Desc,
}

impl Sort {
    /// SQL text for this direction.
    pub fn sql(&self) -> &'static str {
        match self {
            Sort::Asc => "ASC",
            Sort::Desc => "DESC",
        }
    }
}

/// Placeholder style a mutation builder rebinds its WHERE clause to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarFormat {
    /// Positional placeholders (`?`)
    Bind,
    /// Named placeholders (`:column`)
    Named,
}

/// Wildcard placement used by the LIKE filter factory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LikeMatch {
    /// Match anywhere: value `v` becomes pattern `%v%`
    Substring,
    /// Match at the end: value `v` becomes pattern `%v`
    Prefix,
    /// Match at the start: value `v` becomes pattern `v%`
    Suffix,
}

impl LikeMatch {
    /// Wrap a raw filter value in this variant's wildcard placement.
    pub fn pattern(&self, value: &str) -> String {
        match self {
            LikeMatch::Substring => format!("%{value}%"),
            LikeMatch::Prefix => format!("%{value}"),
            LikeMatch::Suffix => format!("{value}%"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cmp_sql_text() {
        assert_eq!(Cmp::Eq.sql(), "=");
        assert_eq!(Cmp::Ne.sql(), "!=");
        assert_eq!(Cmp::ILike.sql(), "ILIKE");
        assert_eq!(Cmp::NotBetween.sql(), "NOT BETWEEN");
        assert_eq!(Cmp::IsNotNull.sql(), "IS NOT NULL");
    }

    #[test]
    fn like_match_patterns() {
        assert_eq!(LikeMatch::Substring.pattern("ann"), "%ann%");
        assert_eq!(LikeMatch::Prefix.pattern("ann"), "%ann");
        assert_eq!(LikeMatch::Suffix.pattern("ann"), "ann%");
    }

    #[test]
    fn logic_separators() {
        assert_eq!(LogicOp::And.separator(), " AND ");
        assert_eq!(LogicOp::Or.separator(), " OR ");
    }
}
