//! Table schema descriptors.
//!
//! A [`Schema`] is the single source of truth every builder validates
//! against: table name, rendered alias, ordered column list, primary key,
//! and the soft-delete / audit flags. Schemas are built once at startup,
//! are immutable afterwards, and clone cheaply (`Arc`-backed), so one value
//! can be shared across every query that touches the table.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::column::Col;

static NEXT_KEY: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of a built [`Schema`].
///
/// Two schemas describing the same table under different aliases (a
/// self-join) get distinct keys, so join resolution can tell them apart
/// where the table name alone could not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SchemaKey(u64);

/// Column names used for audit stamping.
#[derive(Debug, Clone)]
pub struct AuditColumns {
    pub created_at: String,
    pub created_by: String,
    pub updated_at: String,
    pub updated_by: String,
}

impl Default for AuditColumns {
    fn default() -> Self {
        Self {
            created_at: "created_at".to_string(),
            created_by: "created_by".to_string(),
            updated_at: "updated_at".to_string(),
            updated_by: "updated_by".to_string(),
        }
    }
}

#[derive(Debug)]
struct SchemaInner {
    table: String,
    alias: Option<String>,
    columns: Vec<String>,
    primary_key: String,
    generated_key: bool,
    soft_delete_column: Option<String>,
    audit: Option<AuditColumns>,
    key: SchemaKey,
}

/// An immutable table descriptor, shared by cheap clone.
///
/// # Example
///
/// ```ignore
/// let user = Schema::builder("user")
///     .alias("user")
///     .primary_key("id")
///     .columns(["id", "xid", "full_name", "email", "deleted_at"])
///     .soft_delete("deleted_at")
///     .build();
/// assert_eq!(user.insert_columns(), ["xid", "full_name", "email", "deleted_at"]);
/// ```
#[derive(Debug, Clone)]
pub struct Schema(Arc<SchemaInner>);

impl Schema {
    /// Start describing a table.
    pub fn builder(table: impl Into<String>) -> SchemaBuilder {
        SchemaBuilder {
            table: table.into(),
            alias: None,
            columns: Vec::new(),
            primary_key: None,
            generated_key: true,
            soft_delete_column: None,
            audit: None,
        }
    }

    /// The underlying table name.
    pub fn table_name(&self) -> &str {
        &self.0.table
    }

    /// The alias this table renders under, if one was declared.
    pub fn alias(&self) -> Option<&str> {
        self.0.alias.as_deref()
    }

    /// The primary key column.
    pub fn primary_key(&self) -> &str {
        &self.0.primary_key
    }

    /// Whether the primary key is database-generated (and therefore
    /// excluded from insert column lists and returned via RETURNING).
    pub fn generated_key(&self) -> bool {
        self.0.generated_key
    }

    /// All declared columns, in declaration order.
    pub fn columns(&self) -> &[String] {
        &self.0.columns
    }

    /// Whether `name` is a declared column.
    pub fn has_column(&self, name: &str) -> bool {
        self.0.columns.iter().any(|c| c == name)
    }

    /// Columns an INSERT writes: every declared column except a
    /// database-generated primary key.
    pub fn insert_columns(&self) -> Vec<&str> {
        self.0
            .columns
            .iter()
            .map(String::as_str)
            .filter(|c| !(self.0.generated_key && *c == self.0.primary_key))
            .collect()
    }

    /// Columns an UPDATE may set: every declared column except the
    /// primary key.
    pub fn update_columns(&self) -> Vec<&str> {
        self.0
            .columns
            .iter()
            .map(String::as_str)
            .filter(|c| *c != self.0.primary_key)
            .collect()
    }

    /// Whether soft deletion is enabled for this table.
    pub fn soft_delete(&self) -> bool {
        self.0.soft_delete_column.is_some()
    }

    /// The tombstone timestamp column, when soft deletion is enabled.
    pub fn soft_delete_column(&self) -> Option<&str> {
        self.0.soft_delete_column.as_deref()
    }

    /// Whether audit stamping is enabled for this table.
    pub fn audit_fields(&self) -> bool {
        self.0.audit.is_some()
    }

    /// The audit column set, when audit stamping is enabled.
    pub fn audit(&self) -> Option<&AuditColumns> {
        self.0.audit.as_ref()
    }

    /// Audit creation timestamp column, when audit stamping is enabled.
    pub fn created_at_column(&self) -> Option<&str> {
        self.0.audit.as_ref().map(|a| a.created_at.as_str())
    }

    /// Audit creation actor column, when audit stamping is enabled.
    pub fn created_by_column(&self) -> Option<&str> {
        self.0.audit.as_ref().map(|a| a.created_by.as_str())
    }

    /// Audit update timestamp column, when audit stamping is enabled.
    pub fn updated_at_column(&self) -> Option<&str> {
        self.0.audit.as_ref().map(|a| a.updated_at.as_str())
    }

    /// Audit update actor column, when audit stamping is enabled.
    pub fn updated_by_column(&self) -> Option<&str> {
        self.0.audit.as_ref().map(|a| a.updated_by.as_str())
    }

    /// This schema's identity token.
    pub fn key(&self) -> SchemaKey {
        self.0.key
    }

    /// A column writer bound to this schema.
    ///
    /// The `*` pseudo-column is accepted and renders as a bare star.
    ///
    /// # Panics
    ///
    /// Panics if `name` is not a declared column of this table.
    pub fn col(&self, name: &str) -> Col {
        if name != crate::ALL_COLUMNS && !self.has_column(name) {
            panic!(
                "column \"{name}\" is not declared in schema for table \"{}\"",
                self.0.table
            );
        }
        Col::bound(self.clone(), name)
    }
}

impl PartialEq for Schema {
    fn eq(&self, other: &Self) -> bool {
        self.0.key == other.0.key
    }
}

impl Eq for Schema {}

/// Builder for [`Schema`]. All validation happens in [`build`](Self::build).
#[derive(Debug)]
pub struct SchemaBuilder {
    table: String,
    alias: Option<String>,
    columns: Vec<String>,
    primary_key: Option<String>,
    generated_key: bool,
    soft_delete_column: Option<String>,
    audit: Option<AuditColumns>,
}

impl SchemaBuilder {
    /// Set the alias the table renders under (`FROM "t" AS "alias"`,
    /// `"alias"."column"`). Without one, references render bare.
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// Declare columns, in order. May be called repeatedly; later calls
    /// append.
    pub fn columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns.extend(columns.into_iter().map(Into::into));
        self
    }

    /// Declare a database-generated primary key (serial / identity).
    /// Excluded from insert column lists; INSERTs get `RETURNING` for it.
    pub fn primary_key(mut self, column: impl Into<String>) -> Self {
        self.primary_key = Some(column.into());
        self.generated_key = true;
        self
    }

    /// Declare a caller-assigned primary key. Included in insert column
    /// lists; INSERTs emit no `RETURNING`.
    pub fn assigned_primary_key(mut self, column: impl Into<String>) -> Self {
        self.primary_key = Some(column.into());
        self.generated_key = false;
        self
    }

    /// Enable soft deletion through the given tombstone timestamp column.
    pub fn soft_delete(mut self, column: impl Into<String>) -> Self {
        self.soft_delete_column = Some(column.into());
        self
    }

    /// Enable audit stamping through the given column set.
    pub fn audit(mut self, columns: AuditColumns) -> Self {
        self.audit = Some(columns);
        self
    }

    /// Finalize the descriptor.
    ///
    /// # Panics
    ///
    /// Panics if the table name or column list is empty, a column is
    /// declared twice, no primary key was declared, or the primary-key /
    /// soft-delete / audit columns name columns that were not declared.
    pub fn build(self) -> Schema {
        if self.table.is_empty() {
            panic!("schema has an empty table name");
        }
        if self.columns.is_empty() {
            panic!("schema for table \"{}\" declares no columns", self.table);
        }
        for (i, col) in self.columns.iter().enumerate() {
            if self.columns[..i].contains(col) {
                panic!(
                    "duplicate column \"{col}\" in schema for table \"{}\"",
                    self.table
                );
            }
        }
        let primary_key = self
            .primary_key
            .unwrap_or_else(|| panic!("schema for table \"{}\" declares no primary key", self.table));
        let declared = |col: &str, role: &str| {
            if !self.columns.contains(&col.to_string()) {
                panic!(
                    "{role} column \"{col}\" is not declared in schema for table \"{}\"",
                    self.table
                );
            }
        };
        declared(&primary_key, "primary key");
        if let Some(col) = &self.soft_delete_column {
            declared(col, "soft delete");
        }
        if let Some(audit) = &self.audit {
            declared(&audit.created_at, "audit");
            declared(&audit.created_by, "audit");
            declared(&audit.updated_at, "audit");
            declared(&audit.updated_by, "audit");
        }

        Schema(Arc::new(SchemaInner {
            table: self.table,
            alias: self.alias,
            columns: self.columns,
            primary_key,
            generated_key: self.generated_key,
            soft_delete_column: self.soft_delete_column,
            audit: self.audit,
            key: SchemaKey(NEXT_KEY.fetch_add(1, Ordering::Relaxed)),
        }))
    }
}
