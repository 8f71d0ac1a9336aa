//! INSERT statement builder.

use crate::column::push_quoted;
use crate::schema::Schema;

/// INSERT statement builder.
///
/// Renders named placeholders keyed by column name; the caller supplies one
/// value per key. A database-generated primary key is never in the column
/// list and comes back via `RETURNING` instead.
#[derive(Debug, Clone)]
pub struct InsertBuilder {
    schema: Schema,
    columns: Vec<String>,
}

/// Start an INSERT writing the given columns. `&["*"]` means every
/// insertable column. Column names the schema does not declare (and a
/// database-generated primary key) are dropped silently.
pub fn insert(schema: &Schema, columns: &[&str]) -> InsertBuilder {
    InsertBuilder {
        schema: schema.clone(),
        columns: insertable(schema, columns),
    }
}

pub(crate) fn insertable(schema: &Schema, columns: &[&str]) -> Vec<String> {
    if columns.first() == Some(&crate::ALL_COLUMNS) {
        return schema.insert_columns().iter().map(|c| c.to_string()).collect();
    }
    columns
        .iter()
        .filter(|c| schema.has_column(c))
        .filter(|c| !(schema.generated_key() && **c == schema.primary_key()))
        .map(|c| c.to_string())
        .collect()
}

impl InsertBuilder {
    /// Render the statement:
    /// `INSERT INTO "t"("a", "b") VALUES (:a, :b) [RETURNING "pk"]`.
    ///
    /// # Panics
    ///
    /// Panics if no insertable columns remain.
    pub fn build(self) -> String {
        if self.columns.is_empty() {
            panic!(
                "insert on table \"{}\" has no columns",
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
        sql.push_str(") VALUES (");
        for (i, column) in self.columns.iter().enumerate() {
            if i > 0 {
                sql.push_str(", ");
            }
            sql.push(':');
            sql.push_str(column);
        }
        sql.push(')');

        if self.schema.generated_key() {
            sql.push_str(" RETURNING ");
            push_quoted(&mut sql, self.schema.primary_key());
        }

        tracing::debug!(target: "pgqb.sql", sql = %sql, "built insert");
        sql
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user_schema() -> Schema {
        Schema::builder("user")
            .alias("user")
            .primary_key("id")
            .columns(["id", "xid", "full_name", "email"])
            .build()
    }

    #[test]
    fn all_columns_with_returning() {
        let sql = insert(&user_schema(), &["*"]).build();
        assert_eq!(
            sql,
            "INSERT INTO \"user\"(\"xid\", \"full_name\", \"email\") \
             VALUES (:xid, :full_name, :email) RETURNING \"id\""
        );
    }

    #[test]
    fn explicit_subset() {
        let sql = insert(&user_schema(), &["xid", "email"]).build();
        assert_eq!(
            sql,
            "INSERT INTO \"user\"(\"xid\", \"email\") VALUES (:xid, :email) RETURNING \"id\""
        );
    }

    #[test]
    fn unknown_and_generated_key_columns_drop_silently() {
        let sql = insert(&user_schema(), &["id", "xid", "nickname"]).build();
        assert_eq!(
            sql,
            "INSERT INTO \"user\"(\"xid\") VALUES (:xid) RETURNING \"id\""
        );
    }

    #[test]
    fn assigned_key_is_written_and_not_returned() {
        let country = Schema::builder("country")
            .assigned_primary_key("code")
            .columns(["code", "name"])
            .build();
        let sql = insert(&country, &["*"]).build();
        assert_eq!(
            sql,
            "INSERT INTO \"country\"(\"code\", \"name\") VALUES (:code, :name)"
        );
    }

    #[test]
    #[should_panic(expected = "insert on table \"user\" has no columns")]
    fn no_surviving_columns_panics() {
        insert(&user_schema(), &["nickname"]).build();
    }
}
