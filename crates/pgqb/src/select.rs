//! SELECT statement builder.

use std::collections::HashMap;

use crate::column::{Binding, Col, col, push_table};
use crate::expr::{Expr, and};
use crate::join::Join;
use crate::op::{JoinKind, Sort};
use crate::schema::{Schema, SchemaKey};

/// SELECT statement builder.
///
/// Single shot: chain the clauses, then [`build`](Self::build) consumes the
/// builder and returns the SQL text. WHERE placeholders render positional
/// (`?`); the caller supplies values in tree order.
///
/// # Example
///
/// ```ignore
/// let sql = select([col("*")])
///     .from(&user)
///     .where_(equal(col("xid")))
///     .build();
/// assert_eq!(sql, "SELECT * FROM \"user\" AS \"user\" WHERE \"user\".\"xid\" = ?");
/// ```
#[derive(Debug, Clone)]
pub struct SelectBuilder {
    columns: Vec<Col>,
    from: Option<Schema>,
    joins: Vec<Join>,
    where_expr: Option<Expr>,
    order_by: Vec<(Col, Sort)>,
    limit: Option<i64>,
    offset: Option<i64>,
}

/// Start a SELECT over the given projection. An empty projection defaults
/// to `*`.
pub fn select(columns: impl IntoIterator<Item = Col>) -> SelectBuilder {
    SelectBuilder {
        columns: columns.into_iter().collect(),
        from: None,
        joins: Vec::new(),
        where_expr: None,
        order_by: Vec::new(),
        limit: None,
        offset: None,
    }
}

impl SelectBuilder {
    /// Set the FROM table. FROM-deferred columns anywhere in the statement
    /// resolve against it.
    pub fn from(mut self, schema: &Schema) -> Self {
        self.from = Some(schema.clone());
        self
    }

    /// Add a LEFT join (the default kind).
    pub fn join(self, schema: &Schema, on: Expr) -> Self {
        self.push_join(JoinKind::Left, schema, on)
    }

    /// Add an INNER join.
    pub fn inner_join(self, schema: &Schema, on: Expr) -> Self {
        self.push_join(JoinKind::Inner, schema, on)
    }

    /// Add a RIGHT join.
    pub fn right_join(self, schema: &Schema, on: Expr) -> Self {
        self.push_join(JoinKind::Right, schema, on)
    }

    /// Add a FULL join.
    pub fn full_join(self, schema: &Schema, on: Expr) -> Self {
        self.push_join(JoinKind::Full, schema, on)
    }

    fn push_join(mut self, kind: JoinKind, schema: &Schema, on: Expr) -> Self {
        let index = self.joins.len() + 1;
        self.joins.push(Join::new(kind, schema.clone(), on, index));
        self
    }

    /// Add a WHERE condition. Repeated calls AND together.
    pub fn where_(mut self, expr: Expr) -> Self {
        self.where_expr = Some(match self.where_expr.take() {
            Some(existing) => and([existing, expr]),
            None => expr,
        });
        self
    }

    /// Add an ORDER BY term. Repeated calls append.
    pub fn order_by(mut self, column: Col, direction: Sort) -> Self {
        self.order_by.push((column, direction));
        self
    }

    /// Set LIMIT.
    pub fn limit(mut self, n: i64) -> Self {
        self.limit = Some(n);
        self
    }

    /// Set OFFSET.
    pub fn offset(mut self, n: i64) -> Self {
        self.offset = Some(n);
        self
    }

    /// Resolve, validate, and render the statement.
    ///
    /// Join ON conditions are validated against the join's own table plus
    /// every table declared before it. WHERE conditions bound to tables
    /// this statement never declared are pruned, so a shared filter set
    /// works across joined and unjoined query shapes.
    ///
    /// # Panics
    ///
    /// Panics if no FROM table was set, a projection or ORDER BY column
    /// defers to a join or references an undeclared table or column, or a
    /// join ON condition fails validation.
    pub fn build(self) -> String {
        let SelectBuilder {
            mut columns,
            from,
            mut joins,
            where_expr,
            mut order_by,
            limit,
            offset,
        } = self;

        let from = match from {
            Some(schema) => schema,
            None => panic!("select has no FROM table"),
        };

        // Join ON passes run with the tables declared so far; the map is
        // complete once the loop ends and then serves WHERE and projection
        // validation.
        let mut tables: HashMap<SchemaKey, Schema> = HashMap::new();
        tables.insert(from.key(), from.clone());
        for join in &mut joins {
            let join_schema = join.schema().clone();
            let index = join.index();
            tables.insert(join_schema.key(), join_schema.clone());
            let on = join.on_mut();
            on.resolve_from(&from);
            on.resolve_join(&join_schema);
            on.qualify_join(&join_schema, index, &tables);
        }

        if columns.is_empty() {
            columns.push(col("*"));
        }
        for column in &mut columns {
            resolve_output_col(column, &from, &tables, "projection");
        }
        for (column, _) in &mut order_by {
            resolve_output_col(column, &from, &tables, "ORDER BY");
        }

        let where_sql = match where_expr {
            Some(mut expr) => {
                expr.resolve_from(&from);
                expr.prune(&tables);
                expr.render()
            }
            None => String::new(),
        };

        let mut sql = String::from("SELECT ");
        for (i, column) in columns.iter().enumerate() {
            if i > 0 {
                sql.push_str(", ");
            }
            column.render_into(&mut sql);
        }
        sql.push_str(" FROM ");
        push_table(&mut sql, &from);

        for join in &joins {
            sql.push(' ');
            sql.push_str(&join.render());
        }

        if !where_sql.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&where_sql);
        }

        if !order_by.is_empty() {
            sql.push_str(" ORDER BY ");
            for (i, (column, direction)) in order_by.iter().enumerate() {
                if i > 0 {
                    sql.push_str(", ");
                }
                column.render_into(&mut sql);
                sql.push(' ');
                sql.push_str(direction.sql());
            }
        }

        if let Some(limit) = limit {
            sql.push_str(&format!(" LIMIT {}", limit));
        }

        if let Some(offset) = offset {
            sql.push_str(&format!(" OFFSET {}", offset));
        }

        tracing::debug!(target: "pgqb.sql", sql = %sql, "built select");
        sql
    }
}

/// Resolve a projection or ORDER BY column against the statement's tables.
fn resolve_output_col(
    column: &mut Col,
    from: &Schema,
    tables: &HashMap<SchemaKey, Schema>,
    context: &str,
) {
    match column.binding() {
        Binding::DeferToFrom => column.bind_to(from),
        Binding::DeferToJoin => panic!(
            "{context} column \"{}\" cannot defer to a join table",
            column.name()
        ),
        Binding::Table(schema) => {
            if !tables.contains_key(&schema.key()) {
                panic!(
                    "{context} column \"{}\": table \"{}\" is not declared in this query",
                    column.name(),
                    schema.table_name()
                );
            }
        }
        Binding::Unbound => {}
    }
}
