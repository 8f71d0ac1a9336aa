//! Variable writers: the right-hand side of a comparison.
//!
//! pgqb never renders values into SQL text. A [`Var`] renders the
//! placeholder (or column reference) standing in for the value; the caller
//! supplies the value itself at execution time, positionally for `?` style
//! or by key for `:name` style.

use crate::column::Col;
use crate::op::VarFormat;

/// The right-hand side of a comparison.
#[derive(Debug, Clone)]
pub enum Var {
    /// Positional placeholder: `?`
    Bind,
    /// Named placeholder: `:name`
    Named(String),
    /// Positional membership list with a fixed slot count: `(?, ?, ...)`
    In { count: usize },
    /// Named membership list: `(:name0, :name1, ...)`
    NamedIn { name: String, count: usize },
    /// Positional range pair: `? AND ?`
    Between,
    /// Named range pair: `:name0 AND :name1`
    NamedBetween(String),
    /// Nothing; `IS NULL` / `IS NOT NULL` carry the whole meaning
    Null,
    /// A column reference, used by join ON conditions
    Column(Col),
}

impl Var {
    /// Render this writer as SQL.
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.render_into(&mut out);
        out
    }

    pub(crate) fn render_into(&self, out: &mut String) {
        match self {
            Var::Bind => out.push('?'),
            Var::Named(name) => {
                out.push(':');
                out.push_str(name);
            }
            Var::In { count } => {
                out.push('(');
                for i in 0..*count {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    out.push('?');
                }
                out.push(')');
            }
            Var::NamedIn { name, count } => {
                out.push('(');
                for i in 0..*count {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    out.push(':');
                    out.push_str(name);
                    out.push_str(&i.to_string());
                }
                out.push(')');
            }
            Var::Between => out.push_str("? AND ?"),
            Var::NamedBetween(name) => {
                out.push(':');
                out.push_str(name);
                out.push_str("0 AND :");
                out.push_str(name);
                out.push('1');
            }
            Var::Null => {}
            Var::Column(column) => column.render_into(out),
        }
    }

    /// Rebind this writer to the given placeholder format, preserving its
    /// kind: an IN list stays an IN list (same slot count), a range pair
    /// stays a pair. Named placeholders derive their key from `name`, the
    /// column the comparison targets. Null and column writers are format
    /// independent and pass through unchanged.
    pub(crate) fn rebind(&mut self, format: VarFormat, name: &str) {
        *self = match (&*self, format) {
            (Var::Bind | Var::Named(_), VarFormat::Bind) => Var::Bind,
            (Var::Bind | Var::Named(_), VarFormat::Named) => Var::Named(name.to_string()),
            (Var::In { count } | Var::NamedIn { count, .. }, VarFormat::Bind) => {
                Var::In { count: *count }
            }
            (Var::In { count } | Var::NamedIn { count, .. }, VarFormat::Named) => Var::NamedIn {
                name: name.to_string(),
                count: *count,
            },
            (Var::Between | Var::NamedBetween(_), VarFormat::Bind) => Var::Between,
            (Var::Between | Var::NamedBetween(_), VarFormat::Named) => {
                Var::NamedBetween(name.to_string())
            }
            (Var::Null, _) => Var::Null,
            (Var::Column(_), _) => return,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Schema;

    #[test]
    fn render_bind_and_named() {
        assert_eq!(Var::Bind.render(), "?");
        assert_eq!(Var::Named("email".into()).render(), ":email");
    }

    #[test]
    fn render_in_lists() {
        assert_eq!(Var::In { count: 3 }.render(), "(?, ?, ?)");
        assert_eq!(
            Var::NamedIn { name: "id".into(), count: 2 }.render(),
            "(:id0, :id1)"
        );
    }

    #[test]
    fn render_between_pairs() {
        assert_eq!(Var::Between.render(), "? AND ?");
        assert_eq!(
            Var::NamedBetween("created_at".into()).render(),
            ":created_at0 AND :created_at1"
        );
    }

    #[test]
    fn render_null_is_empty() {
        assert_eq!(Var::Null.render(), "");
    }

    #[test]
    fn render_column_side() {
        let role = Schema::builder("role")
            .alias("role")
            .primary_key("id")
            .columns(["id", "name"])
            .build();
        assert_eq!(Var::Column(role.col("id")).render(), "\"role\".\"id\"");
    }

    #[test]
    fn rebind_preserves_kind() {
        let mut v = Var::In { count: 4 };
        v.rebind(VarFormat::Named, "status");
        assert_eq!(v.render(), "(:status0, :status1, :status2, :status3)");

        let mut v = Var::NamedBetween("age".into());
        v.rebind(VarFormat::Bind, "age");
        assert_eq!(v.render(), "? AND ?");

        let mut v = Var::Named("old".into());
        v.rebind(VarFormat::Named, "new");
        assert_eq!(v.render(), ":new");

        let mut v = Var::Null;
        v.rebind(VarFormat::Named, "x");
        assert_eq!(v.render(), "");
    }
}
