//! The where-clause tree.
//!
//! Conditions are a tree of two node kinds: logic nodes (AND/OR over
//! children) and comparison nodes (column, operator, variable). Statement
//! builders run resolution passes over an owned tree before rendering it,
//! so by the time SQL comes out every column knows its table and every
//! placeholder matches the statement's format.

use std::collections::HashMap;

use crate::column::{Binding, Col, push_quoted};
use crate::op::{Cmp, LogicOp, VarFormat};
use crate::schema::{Schema, SchemaKey};
use crate::variable::Var;

/// A WHERE (or join ON) condition tree.
#[derive(Debug, Clone)]
pub enum Expr {
    /// AND/OR over child conditions.
    Logic { op: LogicOp, children: Vec<Expr> },
    /// `<column> <operator> <variable>`, optionally aliased when used as a
    /// SELECT projection.
    Compare {
        column: Col,
        op: Cmp,
        variable: Var,
        alias: Option<String>,
    },
}

// ==================== Constructors ====================

/// AND over the given conditions. Children that render empty are skipped.
pub fn and(children: impl IntoIterator<Item = Expr>) -> Expr {
    Expr::Logic {
        op: LogicOp::And,
        children: children.into_iter().collect(),
    }
}

/// OR over the given conditions. Children that render empty are skipped.
pub fn or(children: impl IntoIterator<Item = Expr>) -> Expr {
    Expr::Logic {
        op: LogicOp::Or,
        children: children.into_iter().collect(),
    }
}

fn compare(column: Col, op: Cmp, variable: Var) -> Expr {
    Expr::Compare {
        column,
        op,
        variable,
        alias: None,
    }
}

/// `column = ?`
pub fn equal(column: Col) -> Expr {
    compare(column, Cmp::Eq, Var::Bind)
}

/// `column != ?`
pub fn not_equal(column: Col) -> Expr {
    compare(column, Cmp::Ne, Var::Bind)
}

/// `column > ?`
pub fn greater_than(column: Col) -> Expr {
    compare(column, Cmp::Gt, Var::Bind)
}

/// `column >= ?`
pub fn greater_than_equal(column: Col) -> Expr {
    compare(column, Cmp::Gte, Var::Bind)
}

/// `column < ?`
pub fn less_than(column: Col) -> Expr {
    compare(column, Cmp::Lt, Var::Bind)
}

/// `column <= ?`
pub fn less_than_equal(column: Col) -> Expr {
    compare(column, Cmp::Lte, Var::Bind)
}

/// `column LIKE ?`
pub fn like(column: Col) -> Expr {
    compare(column, Cmp::Like, Var::Bind)
}

/// `column NOT LIKE ?`
pub fn not_like(column: Col) -> Expr {
    compare(column, Cmp::NotLike, Var::Bind)
}

/// `column ILIKE ?`
pub fn ilike(column: Col) -> Expr {
    compare(column, Cmp::ILike, Var::Bind)
}

/// `column NOT ILIKE ?`
pub fn not_ilike(column: Col) -> Expr {
    compare(column, Cmp::NotILike, Var::Bind)
}

/// `column BETWEEN ? AND ?`
pub fn between(column: Col) -> Expr {
    compare(column, Cmp::Between, Var::Between)
}

/// `column NOT BETWEEN ? AND ?`
pub fn not_between(column: Col) -> Expr {
    compare(column, Cmp::NotBetween, Var::Between)
}

/// `column IN (?, ?, ...)` with `count` placeholder slots.
///
/// # Panics
///
/// Panics if `count` is zero; an empty IN list has no SQL rendering.
pub fn in_list(column: Col, count: usize) -> Expr {
    if count == 0 {
        panic!("IN list for column \"{}\" has zero slots", column.name());
    }
    compare(column, Cmp::In, Var::In { count })
}

/// `column NOT IN (?, ?, ...)` with `count` placeholder slots.
///
/// # Panics
///
/// Panics if `count` is zero; an empty IN list has no SQL rendering.
pub fn not_in(column: Col, count: usize) -> Expr {
    if count == 0 {
        panic!("IN list for column \"{}\" has zero slots", column.name());
    }
    compare(column, Cmp::NotIn, Var::In { count })
}

/// `column IS NULL`
pub fn is_null(column: Col) -> Expr {
    compare(column, Cmp::IsNull, Var::Null)
}

/// `column IS NOT NULL`
pub fn is_not_null(column: Col) -> Expr {
    compare(column, Cmp::IsNotNull, Var::Null)
}

// ==================== Node adjustment ====================

impl Expr {
    /// Replace this comparison's variable writer.
    ///
    /// # Panics
    ///
    /// Panics when called on a logic node.
    pub fn var(mut self, variable: Var) -> Expr {
        match &mut self {
            Expr::Compare { variable: v, .. } => *v = variable,
            Expr::Logic { .. } => panic!("var() requires a comparison node"),
        }
        self
    }

    /// Switch this comparison to a named placeholder derived from its
    /// column name, preserving the variable's kind (IN lists and BETWEEN
    /// pairs stay what they are).
    ///
    /// # Panics
    ///
    /// Panics when called on a logic node.
    pub fn named(mut self) -> Expr {
        match &mut self {
            Expr::Compare {
                column, variable, ..
            } => {
                let name = column.name().to_string();
                variable.rebind(VarFormat::Named, &name);
            }
            Expr::Logic { .. } => panic!("named() requires a comparison node"),
        }
        self
    }

    /// Compare against another column instead of a placeholder. This is the
    /// join ON shape: `equal(user.col("role_id")).to(on("id"))`.
    ///
    /// # Panics
    ///
    /// Panics when called on a logic node.
    pub fn to(self, column: Col) -> Expr {
        self.var(Var::Column(column))
    }

    /// Set a projection alias, rendered as a trailing `AS "alias"`.
    ///
    /// # Panics
    ///
    /// Panics when called on a logic node.
    pub fn alias(mut self, alias: impl Into<String>) -> Expr {
        match &mut self {
            Expr::Compare { alias: a, .. } => *a = Some(alias.into()),
            Expr::Logic { .. } => panic!("alias() requires a comparison node"),
        }
        self
    }

    /// Whether this node renders to nothing: a logic node whose children
    /// are all empty. Comparison nodes always render.
    pub fn is_empty(&self) -> bool {
        match self {
            Expr::Logic { children, .. } => children.iter().all(Expr::is_empty),
            Expr::Compare { .. } => false,
        }
    }

    // ==================== Rendering ====================

    /// Render this tree as SQL condition text.
    ///
    /// Logic nodes join their non-empty children with ` AND ` / ` OR `,
    /// wrapping parentheses around children that are themselves logic
    /// nodes, so nesting is preserved without redundant parens around
    /// single comparisons. An all-empty tree renders as the empty string.
    pub fn render(&self) -> String {
        match self {
            Expr::Logic { op, children } => {
                let mut out = String::new();
                for child in children {
                    let part = child.render();
                    if part.is_empty() {
                        continue;
                    }
                    if !out.is_empty() {
                        out.push_str(op.separator());
                    }
                    if matches!(child, Expr::Logic { .. }) {
                        out.push('(');
                        out.push_str(&part);
                        out.push(')');
                    } else {
                        out.push_str(&part);
                    }
                }
                out
            }
            Expr::Compare {
                column,
                op,
                variable,
                alias,
            } => {
                let mut out = String::new();
                column.render_into(&mut out);
                out.push(' ');
                out.push_str(op.sql());
                let var = variable.render();
                if !var.is_empty() {
                    out.push(' ');
                    out.push_str(&var);
                }
                if let Some(alias) = alias {
                    out.push_str(" AS ");
                    push_quoted(&mut out, alias);
                }
                out
            }
        }
    }

    // ==================== Resolution passes ====================

    /// Bind every FROM-deferred column (on either side of a comparison) to
    /// the statement's FROM schema.
    ///
    /// # Panics
    ///
    /// Panics if a deferred column is not declared in `from`.
    pub(crate) fn resolve_from(&mut self, from: &Schema) {
        match self {
            Expr::Logic { children, .. } => {
                for child in children {
                    child.resolve_from(from);
                }
            }
            Expr::Compare {
                column, variable, ..
            } => {
                if matches!(column.binding(), Binding::DeferToFrom) {
                    column.bind_to(from);
                }
                if let Var::Column(col) = variable {
                    if matches!(col.binding(), Binding::DeferToFrom) {
                        col.bind_to(from);
                    }
                }
            }
        }
    }

    /// Bind every join-deferred column (on either side) to the join's
    /// target schema.
    ///
    /// # Panics
    ///
    /// Panics if a deferred column is not declared in `join`.
    pub(crate) fn resolve_join(&mut self, join: &Schema) {
        match self {
            Expr::Logic { children, .. } => {
                for child in children {
                    child.resolve_join(join);
                }
            }
            Expr::Compare {
                column, variable, ..
            } => {
                if matches!(column.binding(), Binding::DeferToJoin) {
                    column.bind_to(join);
                }
                if let Var::Column(col) = variable {
                    if matches!(col.binding(), Binding::DeferToJoin) {
                        col.bind_to(join);
                    }
                }
            }
        }
    }

    /// Validate an ON condition: every column on either side must belong
    /// to the join's own schema or to a table already declared in the
    /// statement. This is the pass that catches query-author typos.
    ///
    /// # Panics
    ///
    /// Panics on a column bound to an undeclared table, a column missing
    /// from the table it claims, or a column with no table reference.
    pub(crate) fn qualify_join(
        &mut self,
        join: &Schema,
        join_index: usize,
        tables: &HashMap<SchemaKey, Schema>,
    ) {
        match self {
            Expr::Logic { children, .. } => {
                for child in children {
                    child.qualify_join(join, join_index, tables);
                }
            }
            Expr::Compare {
                column, variable, ..
            } => {
                qualify_col(column, join, join_index, tables);
                if let Var::Column(col) = variable {
                    qualify_col(col, join, join_index, tables);
                }
            }
        }
    }

    /// Rebind this tree for a single-table mutation: every column renders
    /// bare, is validated against `schema`, and every placeholder variable
    /// is rebound to `format` (kind preserved). Column-valued variables
    /// keep their shape, rendered bare.
    ///
    /// # Panics
    ///
    /// Panics if a column (other than an explicitly unbound one) is not
    /// declared in `schema`.
    pub(crate) fn rebind(&mut self, schema: &Schema, format: VarFormat) {
        match self {
            Expr::Logic { children, .. } => {
                for child in children {
                    child.rebind(schema, format);
                }
            }
            Expr::Compare {
                column, variable, ..
            } => {
                ensure_in_schema(column, schema);
                column.set_bare();
                let name = column.name().to_string();
                variable.rebind(format, &name);
                if let Var::Column(col) = variable {
                    ensure_in_schema(col, schema);
                    col.set_bare();
                }
            }
        }
    }

    /// Drop comparison nodes bound to tables this statement never declared.
    /// Returns `false` when the node itself should be dropped. Logic nodes
    /// survive with whatever children remain and render empty when none do.
    ///
    /// Pruning is what lets one shared filter registry serve both joined
    /// and unjoined query shapes: conditions against a table the query does
    /// not reference disappear instead of producing broken SQL.
    pub(crate) fn prune(&mut self, tables: &HashMap<SchemaKey, Schema>) -> bool {
        match self {
            Expr::Logic { children, .. } => {
                children.retain_mut(|child| child.prune(tables));
                true
            }
            Expr::Compare { column, .. } => match column.binding() {
                Binding::Table(schema) => tables.contains_key(&schema.key()),
                _ => true,
            },
        }
    }
}

fn ensure_in_schema(col: &Col, schema: &Schema) {
    if matches!(col.binding(), Binding::Unbound) || col.is_star() {
        return;
    }
    if !schema.has_column(col.name()) {
        panic!(
            "column \"{}\" is not declared in schema for table \"{}\"",
            col.name(),
            schema.table_name()
        );
    }
}

fn qualify_col(
    col: &mut Col,
    join: &Schema,
    join_index: usize,
    tables: &HashMap<SchemaKey, Schema>,
) {
    match col.binding() {
        Binding::Table(schema) => {
            let owner = if schema.key() == join.key() {
                join
            } else {
                match tables.get(&schema.key()) {
                    Some(declared) => declared,
                    None => panic!(
                        "join #{join_index} on table \"{}\": table \"{}\" is not declared in this query",
                        join.table_name(),
                        schema.table_name()
                    ),
                }
            };
            if !col.is_star() && !owner.has_column(col.name()) {
                panic!(
                    "join #{join_index} on table \"{}\": column \"{}\" is not declared in schema for table \"{}\"",
                    join.table_name(),
                    col.name(),
                    owner.table_name()
                );
            }
        }
        Binding::DeferToJoin => col.bind_to(join),
        Binding::DeferToFrom => panic!(
            "join #{join_index} on table \"{}\": column \"{}\" has an unresolved table reference",
            join.table_name(),
            col.name()
        ),
        Binding::Unbound => panic!(
            "join #{join_index} on table \"{}\": column \"{}\" has no table reference",
            join.table_name(),
            col.name()
        ),
    }
}
