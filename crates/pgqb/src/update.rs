//! UPDATE statement builder.

use crate::column::push_quoted;
use crate::expr::{Expr, and, equal};
use crate::op::VarFormat;
use crate::schema::Schema;

/// UPDATE statement builder.
///
/// Single-table: every WHERE column renders bare and is validated against
/// the target schema. Placeholders default to named (`:column`) on both the
/// SET and WHERE sides; [`format`](Self::format) switches the whole
/// statement to positional.
#[derive(Debug, Clone)]
pub struct UpdateBuilder {
    schema: Schema,
    columns: Vec<String>,
    where_expr: Option<Expr>,
    format: VarFormat,
}

/// Start an UPDATE setting the given columns. `&["*"]` means every
/// updatable column. Column names the schema does not declare (and the
/// primary key) are dropped silently.
pub fn update(schema: &Schema, columns: &[&str]) -> UpdateBuilder {
    let columns = if columns.first() == Some(&crate::ALL_COLUMNS) {
        schema.update_columns().iter().map(|c| c.to_string()).collect()
    } else {
        columns
            .iter()
            .filter(|c| schema.has_column(c))
            .filter(|c| **c != schema.primary_key())
            .map(|c| c.to_string())
            .collect()
    };
    UpdateBuilder {
        schema: schema.clone(),
        columns,
        where_expr: None,
        format: VarFormat::Named,
    }
}

impl UpdateBuilder {
    /// Add a WHERE condition. Repeated calls AND together. Without one,
    /// the statement targets a single row by primary-key equality.
    pub fn where_(mut self, expr: Expr) -> Self {
        self.where_expr = Some(match self.where_expr.take() {
            Some(existing) => and([existing, expr]),
            None => expr,
        });
        self
    }

    /// Switch the placeholder format for the whole statement.
    pub fn format(mut self, format: VarFormat) -> Self {
        self.format = format;
        self
    }

    /// Render the statement:
    /// `UPDATE "t" SET "a" = :a, "b" = :b WHERE <cond>`.
    ///
    /// # Panics
    ///
    /// Panics if no updatable columns remain, or a WHERE column is not
    /// declared in the target schema.
    pub fn build(self) -> String {
        if self.columns.is_empty() {
            panic!(
                "update on table \"{}\" has no columns",
                self.schema.table_name()
            );
        }

        let mut where_expr = self
            .where_expr
            .unwrap_or_else(|| equal(self.schema.col(self.schema.primary_key())));
        where_expr.rebind(&self.schema, self.format);

        let mut sql = String::from("UPDATE ");
        push_quoted(&mut sql, self.schema.table_name());
        sql.push_str(" SET ");
        for (i, column) in self.columns.iter().enumerate() {
            if i > 0 {
                sql.push_str(", ");
            }
            push_quoted(&mut sql, column);
            sql.push_str(" = ");
            match self.format {
                VarFormat::Bind => sql.push('?'),
                VarFormat::Named => {
                    sql.push(':');
                    sql.push_str(column);
                }
            }
        }
        sql.push_str(" WHERE ");
        sql.push_str(&where_expr.render());

        tracing::debug!(target: "pgqb.sql", sql = %sql, "built update");
        sql
    }
}
