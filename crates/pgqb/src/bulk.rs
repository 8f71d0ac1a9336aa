//! Multi-row statement builders.
//!
//! Bulk statements address rows by index in their placeholder names
//! (`:row0_email`, `:pk1`, `:id2`), so one prepared statement carries any
//! number of rows without positional bookkeeping. Each builder exposes
//! [`named_args`](BulkInsertBuilder::named_args) producing the exact
//! `(placeholder, value)` pairs the execution layer must supply.

use std::collections::HashMap;

use crate::column::push_quoted;
use crate::insert::insertable;
use crate::param::Param;
use crate::schema::Schema;

/// One row of named values for the bulk builders.
pub type BulkRow = HashMap<String, Param>;

fn row_value(rows: &[BulkRow], index: usize, column: &str, table: &str, what: &str) -> Param {
    match rows[index].get(column) {
        Some(value) => value.clone(),
        None => panic!("{what} on table \"{table}\": row {index} is missing column \"{column}\""),
    }
}

// ==================== Bulk INSERT ====================

/// Multi-row INSERT builder. See [`bulk_insert`].
#[derive(Debug, Clone)]
pub struct BulkInsertBuilder {
    schema: Schema,
    columns: Vec<String>,
    rows: Vec<BulkRow>,
}

/// Start a multi-row INSERT writing the given columns. `&["*"]` means every
/// insertable column; unknown names and a database-generated primary key
/// are dropped silently, exactly as in [`insert`](crate::insert).
pub fn bulk_insert(schema: &Schema, columns: &[&str]) -> BulkInsertBuilder {
    BulkInsertBuilder {
        schema: schema.clone(),
        columns: insertable(schema, columns),
        rows: Vec::new(),
    }
}

impl BulkInsertBuilder {
    /// Append rows. Each row's values are looked up by column name when
    /// the argument list is produced.
    pub fn values(mut self, rows: impl IntoIterator<Item = BulkRow>) -> Self {
        self.rows.extend(rows);
        self
    }

    /// Render the statement:
    /// `INSERT INTO "t"("a") VALUES (:row0_a), (:row1_a) [RETURNING "pk"]`.
    ///
    /// # Panics
    ///
    /// Panics if no insertable columns remain or no rows were supplied.
    pub fn build(self) -> String {
        if self.columns.is_empty() {
            panic!(
                "bulk insert on table \"{}\" has no columns",
                self.schema.table_name()
            );
        }
        if self.rows.is_empty() {
            panic!(
                "bulk insert on table \"{}\" has no rows",
                self.schema.table_name()
            );
        }

        let mut sql = String::from("INSERT INTO ");
        push_quoted(&mut sql, self.schema.table_name());
        sql.push('(');
        for (i, column) in self.columns.iter().enumerate() {
            if i > 0 {
                sql.push_str(", ");
            }
            push_quoted(&mut sql, column);
        }
        sql.push_str(") VALUES ");
        for row in 0..self.rows.len() {
            if row > 0 {
                sql.push_str(", ");
            }
            sql.push('(');
            for (i, column) in self.columns.iter().enumerate() {
                if i > 0 {
                    sql.push_str(", ");
                }
                sql.push_str(&format!(":row{row}_{column}"));
            }
            sql.push(')');
        }

        if self.schema.generated_key() {
            sql.push_str(" RETURNING ");
            push_quoted(&mut sql, self.schema.primary_key());
        }

        tracing::debug!(target: "pgqb.sql", sql = %sql, rows = self.rows.len(), "built bulk insert");
        sql
    }

    /// The `(placeholder, value)` pairs the statement expects, row-major.
    ///
    /// # Panics
    ///
    /// Panics if a row lacks a value for one of the insert columns.
    pub fn named_args(&self) -> Vec<(String, Param)> {
        let mut args = Vec::with_capacity(self.rows.len() * self.columns.len());
        for row in 0..self.rows.len() {
            for column in &self.columns {
                let value = row_value(
                    &self.rows,
                    row,
                    column,
                    self.schema.table_name(),
                    "bulk insert",
                );
                args.push((format!("row{row}_{column}"), value));
            }
        }
        args
    }
}

// ==================== Bulk UPDATE ====================

/// Multi-row UPDATE builder. See [`bulk_update`].
#[derive(Debug, Clone)]
pub struct BulkUpdateBuilder {
    schema: Schema,
    columns: Vec<String>,
    rows: Vec<BulkRow>,
}

/// Start a multi-row UPDATE setting the given columns. `&["*"]` means
/// every updatable column; unknown names and the primary key are dropped
/// silently. Every row must carry the primary key, which routes each
/// row's values through a per-column CASE expression.
pub fn bulk_update(schema: &Schema, columns: &[&str]) -> BulkUpdateBuilder {
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
    BulkUpdateBuilder {
        schema: schema.clone(),
        columns,
        rows: Vec::new(),
    }
}

impl BulkUpdateBuilder {
    /// Append rows. Each row must include the primary key.
    pub fn values(mut self, rows: impl IntoIterator<Item = BulkRow>) -> Self {
        self.rows.extend(rows);
        self
    }

    /// Render the statement: one `CASE WHEN "pk" = :pkN THEN :rowN_col END`
    /// per column, and a `WHERE "pk" IN (:pk0, ...)` over all rows.
    ///
    /// # Panics
    ///
    /// Panics if no updatable columns remain, no rows were supplied, or a
    /// row is missing the primary key.
    pub fn build(self) -> String {
        let table = self.schema.table_name();
        let pk = self.schema.primary_key();
        if self.columns.is_empty() {
            panic!("bulk update on table \"{table}\" has no columns");
        }
        if self.rows.is_empty() {
            panic!("bulk update on table \"{table}\" has no rows");
        }
        for (i, row) in self.rows.iter().enumerate() {
            if !row.contains_key(pk) {
                panic!("bulk update on table \"{table}\": row {i} is missing primary key \"{pk}\"");
            }
        }

        let mut sql = String::from("UPDATE ");
        push_quoted(&mut sql, table);
        sql.push_str(" SET ");
        for (i, column) in self.columns.iter().enumerate() {
            if i > 0 {
                sql.push_str(", ");
            }
            push_quoted(&mut sql, column);
            sql.push_str(" = CASE");
            for row in 0..self.rows.len() {
                sql.push_str(" WHEN ");
                push_quoted(&mut sql, pk);
                sql.push_str(&format!(" = :pk{row} THEN :row{row}_{column}"));
            }
            sql.push_str(" END");
        }
        sql.push_str(" WHERE ");
        push_quoted(&mut sql, pk);
        sql.push_str(" IN (");
        for row in 0..self.rows.len() {
            if row > 0 {
                sql.push_str(", ");
            }
            sql.push_str(&format!(":pk{row}"));
        }
        sql.push(')');

        tracing::debug!(target: "pgqb.sql", sql = %sql, rows = self.rows.len(), "built bulk update");
        sql
    }

    /// The `(placeholder, value)` pairs the statement expects: per row, the
    /// `pkN` key followed by that row's column values.
    ///
    /// # Panics
    ///
    /// Panics if a row lacks the primary key or a column value.
    pub fn named_args(&self) -> Vec<(String, Param)> {
        let pk = self.schema.primary_key();
        let mut args = Vec::with_capacity(self.rows.len() * (self.columns.len() + 1));
        for row in 0..self.rows.len() {
            let key = row_value(&self.rows, row, pk, self.schema.table_name(), "bulk update");
            args.push((format!("pk{row}"), key));
            for column in &self.columns {
                let value = row_value(
                    &self.rows,
                    row,
                    column,
                    self.schema.table_name(),
                    "bulk update",
                );
                args.push((format!("row{row}_{column}"), value));
            }
        }
        args
    }
}

// ==================== Bulk DELETE / soft delete ====================

/// Multi-row DELETE builder. See [`bulk_delete`].
#[derive(Debug, Clone)]
pub struct BulkDeleteBuilder {
    schema: Schema,
    ids: Vec<Param>,
}

/// Start a multi-row hard DELETE keyed by primary key.
///
/// # Panics
///
/// Panics if the schema has soft delete enabled; use [`bulk_soft_delete`]
/// or say [`bulk_force_delete`] explicitly.
pub fn bulk_delete(schema: &Schema) -> BulkDeleteBuilder {
    if schema.soft_delete() {
        panic!(
            "table \"{}\" has soft delete enabled; use bulk_soft_delete() or bulk_force_delete()",
            schema.table_name()
        );
    }
    bulk_force_delete(schema)
}

/// Start a multi-row hard DELETE, bypassing the soft-delete guard.
pub fn bulk_force_delete(schema: &Schema) -> BulkDeleteBuilder {
    BulkDeleteBuilder {
        schema: schema.clone(),
        ids: Vec::new(),
    }
}

impl BulkDeleteBuilder {
    /// Append primary-key values to delete.
    pub fn ids(mut self, ids: impl IntoIterator<Item = Param>) -> Self {
        self.ids.extend(ids);
        self
    }

    /// Render the statement: `DELETE FROM "t" WHERE "pk" IN (:id0, ...)`.
    ///
    /// # Panics
    ///
    /// Panics if no ids were supplied.
    pub fn build(self) -> String {
        if self.ids.is_empty() {
            panic!(
                "bulk delete on table \"{}\" has no ids",
                self.schema.table_name()
            );
        }
        let mut sql = String::from("DELETE FROM ");
        push_quoted(&mut sql, self.schema.table_name());
        sql.push_str(" WHERE ");
        push_in_list(&mut sql, &self.schema, self.ids.len());

        tracing::debug!(target: "pgqb.sql", sql = %sql, rows = self.ids.len(), "built bulk delete");
        sql
    }

    /// The `(placeholder, value)` pairs the statement expects.
    pub fn named_args(&self) -> Vec<(String, Param)> {
        id_args(&self.ids)
    }
}

/// Multi-row soft-delete builder. See [`bulk_soft_delete`].
#[derive(Debug, Clone)]
pub struct BulkSoftDeleteBuilder {
    schema: Schema,
    ids: Vec<Param>,
}

/// Start a multi-row soft DELETE keyed by primary key.
///
/// # Panics
///
/// Panics if the schema does not have soft delete enabled.
pub fn bulk_soft_delete(schema: &Schema) -> BulkSoftDeleteBuilder {
    if !schema.soft_delete() {
        panic!(
            "table \"{}\" does not have soft delete enabled",
            schema.table_name()
        );
    }
    BulkSoftDeleteBuilder {
        schema: schema.clone(),
        ids: Vec::new(),
    }
}

impl BulkSoftDeleteBuilder {
    /// Append primary-key values to trash.
    pub fn ids(mut self, ids: impl IntoIterator<Item = Param>) -> Self {
        self.ids.extend(ids);
        self
    }

    /// Render the statement:
    /// `UPDATE "t" SET "<tombstone>" = NOW() WHERE "pk" IN (:id0, ...)`.
    ///
    /// # Panics
    ///
    /// Panics if no ids were supplied.
    pub fn build(self) -> String {
        if self.ids.is_empty() {
            panic!(
                "bulk soft delete on table \"{}\" has no ids",
                self.schema.table_name()
            );
        }
        let column = match self.schema.soft_delete_column() {
            Some(column) => column.to_string(),
            None => unreachable!("checked at construction"),
        };
        let mut sql = String::from("UPDATE ");
        push_quoted(&mut sql, self.schema.table_name());
        sql.push_str(" SET ");
        push_quoted(&mut sql, &column);
        sql.push_str(" = NOW() WHERE ");
        push_in_list(&mut sql, &self.schema, self.ids.len());

        tracing::debug!(target: "pgqb.sql", sql = %sql, rows = self.ids.len(), "built bulk soft delete");
        sql
    }

    /// The `(placeholder, value)` pairs the statement expects.
    pub fn named_args(&self) -> Vec<(String, Param)> {
        id_args(&self.ids)
    }
}

/// `"pk" IN (:id0, :id1, ...)`; the `id` prefix is fixed regardless of the
/// primary key's column name.
fn push_in_list(sql: &mut String, schema: &Schema, count: usize) {
    push_quoted(sql, schema.primary_key());
    sql.push_str(" IN (");
    for i in 0..count {
        if i > 0 {
            sql.push_str(", ");
        }
        sql.push_str(&format!(":id{i}"));
    }
    sql.push(')');
}

fn id_args(ids: &[Param]) -> Vec<(String, Param)> {
    ids.iter()
        .enumerate()
        .map(|(i, value)| (format!("id{i}"), value.clone()))
        .collect()
}
