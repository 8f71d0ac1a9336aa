//! DELETE statement builder.

use crate::column::push_quoted;
use crate::expr::{Expr, and, equal};
use crate::op::VarFormat;
use crate::schema::Schema;

/// DELETE statement builder. See [`delete`] and [`force_delete`].
#[derive(Debug, Clone)]
pub struct DeleteBuilder {
    schema: Schema,
    where_expr: Option<Expr>,
    format: VarFormat,
}

/// Start a hard DELETE.
///
/// # Panics
///
/// Panics if the schema has soft delete enabled: rows in such tables are
/// retired with `soft_delete`, and a hard delete must say so explicitly
/// through [`force_delete`].
pub fn delete(schema: &Schema) -> DeleteBuilder {
    if schema.soft_delete() {
        panic!(
            "table \"{}\" has soft delete enabled; use soft_delete() or force_delete()",
            schema.table_name()
        );
    }
    force_delete(schema)
}

/// Start a hard DELETE, bypassing the soft-delete guard.
pub fn force_delete(schema: &Schema) -> DeleteBuilder {
    DeleteBuilder {
        schema: schema.clone(),
        where_expr: None,
        format: VarFormat::Bind,
    }
}

impl DeleteBuilder {
    /// Add a WHERE condition. Repeated calls AND together. Without one,
    /// the statement targets a single row by primary-key equality.
    pub fn where_(mut self, expr: Expr) -> Self {
        self.where_expr = Some(match self.where_expr.take() {
            Some(existing) => and([existing, expr]),
            None => expr,
        });
        self
    }

    /// Switch the placeholder format. The default is positional.
    pub fn format(mut self, format: VarFormat) -> Self {
        self.format = format;
        self
    }

    /// Render the statement: `DELETE FROM "t" WHERE <cond>`.
    ///
    /// # Panics
    ///
    /// Panics if a WHERE column is not declared in the target schema.
    pub fn build(self) -> String {
        let mut where_expr = self
            .where_expr
            .unwrap_or_else(|| equal(self.schema.col(self.schema.primary_key())));
        where_expr.rebind(&self.schema, self.format);

        let mut sql = String::from("DELETE FROM ");
        push_quoted(&mut sql, self.schema.table_name());
        sql.push_str(" WHERE ");
        sql.push_str(&where_expr.render());

        tracing::debug!(target: "pgqb.sql", sql = %sql, "built delete");
        sql
    }
}
