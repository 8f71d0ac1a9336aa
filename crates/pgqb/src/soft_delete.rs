//! Soft-delete and restore statement builders.
//!
//! Soft deletion retires a row by stamping its tombstone column with the
//! database clock (`NOW()`); restoring clears the stamp back to `NULL`.
//! Both read and write nothing else, so they render as narrow UPDATEs.

use crate::column::push_quoted;
use crate::expr::{Expr, and, equal, is_not_null, is_null};
use crate::op::VarFormat;
use crate::schema::Schema;

/// Soft-delete (trash) statement builder. See [`soft_delete`].
#[derive(Debug, Clone)]
pub struct SoftDeleteBuilder {
    schema: Schema,
    where_expr: Option<Expr>,
    format: VarFormat,
}

/// Restore (un-trash) statement builder. See [`restore`].
#[derive(Debug, Clone)]
pub struct RestoreBuilder {
    schema: Schema,
    where_expr: Option<Expr>,
    format: VarFormat,
}

fn ensure_soft_delete(schema: &Schema) -> &str {
    match schema.soft_delete_column() {
        Some(column) => column,
        None => panic!(
            "table \"{}\" does not have soft delete enabled",
            schema.table_name()
        ),
    }
}

/// Start a soft DELETE: `UPDATE "t" SET "<tombstone>" = NOW() WHERE <cond>`.
///
/// # Panics
///
/// Panics if the schema does not have soft delete enabled.
pub fn soft_delete(schema: &Schema) -> SoftDeleteBuilder {
    ensure_soft_delete(schema);
    SoftDeleteBuilder {
        schema: schema.clone(),
        where_expr: None,
        format: VarFormat::Named,
    }
}

/// Start a restore: `UPDATE "t" SET "<tombstone>" = NULL WHERE <cond>`.
///
/// # Panics
///
/// Panics if the schema does not have soft delete enabled.
pub fn restore(schema: &Schema) -> RestoreBuilder {
    ensure_soft_delete(schema);
    RestoreBuilder {
        schema: schema.clone(),
        where_expr: None,
        format: VarFormat::Named,
    }
}

fn build_stamp(
    schema: Schema,
    where_expr: Option<Expr>,
    format: VarFormat,
    value: &str,
    what: &str,
) -> String {
    let column = match schema.soft_delete_column() {
        Some(column) => column.to_string(),
        None => unreachable!("checked at construction"),
    };
    let mut where_expr =
        where_expr.unwrap_or_else(|| equal(schema.col(schema.primary_key())));
    where_expr.rebind(&schema, format);

    let mut sql = String::from("UPDATE ");
    push_quoted(&mut sql, schema.table_name());
    sql.push_str(" SET ");
    push_quoted(&mut sql, &column);
    sql.push_str(" = ");
    sql.push_str(value);
    sql.push_str(" WHERE ");
    sql.push_str(&where_expr.render());

    tracing::debug!(target: "pgqb.sql", sql = %sql, "built {}", what);
    sql
}

impl SoftDeleteBuilder {
    /// Add a WHERE condition. Repeated calls AND together. Without one,
    /// the statement targets a single row by primary-key equality.
    pub fn where_(mut self, expr: Expr) -> Self {
        self.where_expr = Some(match self.where_expr.take() {
            Some(existing) => and([existing, expr]),
            None => expr,
        });
        self
    }

    /// Switch the placeholder format. The default is named.
    pub fn format(mut self, format: VarFormat) -> Self {
        self.format = format;
        self
    }

    /// Render the statement.
    ///
    /// # Panics
    ///
    /// Panics if a WHERE column is not declared in the target schema.
    pub fn build(self) -> String {
        build_stamp(self.schema, self.where_expr, self.format, "NOW()", "soft delete")
    }
}

impl RestoreBuilder {
    /// Add a WHERE condition. Repeated calls AND together. Without one,
    /// the statement targets a single row by primary-key equality.
    pub fn where_(mut self, expr: Expr) -> Self {
        self.where_expr = Some(match self.where_expr.take() {
            Some(existing) => and([existing, expr]),
            None => expr,
        });
        self
    }

    /// Switch the placeholder format. The default is named.
    pub fn format(mut self, format: VarFormat) -> Self {
        self.format = format;
        self
    }

    /// Render the statement.
    ///
    /// # Panics
    ///
    /// Panics if a WHERE column is not declared in the target schema.
    pub fn build(self) -> String {
        build_stamp(self.schema, self.where_expr, self.format, "NULL", "restore")
    }
}

/// A condition selecting only trashed rows (`"<tombstone>" IS NOT NULL`),
/// or `None` when the schema has no soft delete. Returning an option lets
/// callers splice it into a condition list unconditionally.
pub fn only_trashed(schema: &Schema) -> Option<Expr> {
    schema
        .soft_delete_column()
        .map(|column| is_not_null(schema.col(column)))
}

/// A condition hiding trashed rows (`"<tombstone>" IS NULL`), or `None`
/// when the schema has no soft delete.
pub fn exclude_trashed(schema: &Schema) -> Option<Expr> {
    schema
        .soft_delete_column()
        .map(|column| is_null(schema.col(column)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::col;
    use crate::expr::equal;

    fn user_schema() -> Schema {
        Schema::builder("user")
            .alias("user")
            .primary_key("id")
            .columns(["id", "xid", "deleted_at"])
            .soft_delete("deleted_at")
            .build()
    }

    fn plain_schema() -> Schema {
        Schema::builder("auth_session")
            .primary_key("id")
            .columns(["id", "token"])
            .build()
    }

    #[test]
    fn soft_delete_stamps_now() {
        let sql = soft_delete(&user_schema()).build();
        assert_eq!(
            sql,
            "UPDATE \"user\" SET \"deleted_at\" = NOW() WHERE \"id\" = :id"
        );
    }

    #[test]
    fn restore_clears_to_null() {
        let sql = restore(&user_schema())
            .where_(equal(col("xid")))
            .build();
        assert_eq!(
            sql,
            "UPDATE \"user\" SET \"deleted_at\" = NULL WHERE \"xid\" = :xid"
        );
    }

    #[test]
    fn positional_format() {
        let sql = soft_delete(&user_schema())
            .where_(equal(col("xid")))
            .format(VarFormat::Bind)
            .build();
        assert_eq!(sql, "UPDATE \"user\" SET \"deleted_at\" = NOW() WHERE \"xid\" = ?");
    }

    #[test]
    #[should_panic(expected = "does not have soft delete enabled")]
    fn soft_delete_requires_enablement() {
        soft_delete(&plain_schema());
    }

    #[test]
    #[should_panic(expected = "does not have soft delete enabled")]
    fn restore_requires_enablement() {
        restore(&plain_schema());
    }

    #[test]
    fn trash_visibility_helpers() {
        let user = user_schema();
        assert_eq!(
            only_trashed(&user).map(|e| e.render()),
            Some("\"user\".\"deleted_at\" IS NOT NULL".to_string())
        );
        assert_eq!(
            exclude_trashed(&user).map(|e| e.render()),
            Some("\"user\".\"deleted_at\" IS NULL".to_string())
        );
        assert!(only_trashed(&plain_schema()).is_none());
        assert!(exclude_trashed(&plain_schema()).is_none());
    }
}
