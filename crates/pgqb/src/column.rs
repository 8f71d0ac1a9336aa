//! Column writers.
//!
//! A [`Col`] is one side of a rendered reference: a column name plus the
//! table it belongs to. The table side is usually not known at the call
//! site (`col("xid")` inside a WHERE clause says "whatever table this query
//! selects FROM"), so the binding is an explicit state machine the statement
//! builders drive to `Table` before rendering.

use crate::schema::Schema;

/// Where a column's table reference comes from.
#[derive(Debug, Clone)]
pub enum Binding {
    /// No table reference at all; renders bare and skips validation.
    Unbound,
    /// Bound to a concrete schema.
    Table(Schema),
    /// Resolved against the statement's FROM schema at build time.
    DeferToFrom,
    /// Resolved against the join's target schema at build time.
    DeferToJoin,
}

/// How a resolved column renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColFormat {
    /// `"alias"."column"` when the bound schema has an alias.
    Qualified,
    /// `"column"`, table reference suppressed. Forced by the
    /// single-table mutation builders.
    Bare,
}

/// A column reference: name, table binding, render format.
#[derive(Debug, Clone)]
pub struct Col {
    name: String,
    binding: Binding,
    format: ColFormat,
}

/// A column resolved against the statement's FROM table at build time.
///
/// This is the everyday constructor: `col("xid")` inside a WHERE clause
/// refers to the table the query selects FROM.
pub fn col(name: impl Into<String>) -> Col {
    Col {
        name: name.into(),
        binding: Binding::DeferToFrom,
        format: ColFormat::Qualified,
    }
}

/// A column resolved against the joined table, for join ON conditions.
///
/// # Example
///
/// ```ignore
/// select([col("*")])
///     .from(&user)
///     .join(&role, equal(user.col("role_id")).to(on("id")))
/// ```
pub fn on(name: impl Into<String>) -> Col {
    Col {
        name: name.into(),
        binding: Binding::DeferToJoin,
        format: ColFormat::Qualified,
    }
}

impl Col {
    pub(crate) fn bound(schema: Schema, name: &str) -> Col {
        Col {
            name: name.to_string(),
            binding: Binding::Table(schema),
            format: ColFormat::Qualified,
        }
    }

    /// A deliberately table-less reference. Skips schema validation and
    /// always renders bare. Escape hatch for expressions the schema does
    /// not describe.
    pub fn unbound(name: impl Into<String>) -> Col {
        Col {
            name: name.into(),
            binding: Binding::Unbound,
            format: ColFormat::Bare,
        }
    }

    /// The column name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The current table binding.
    pub fn binding(&self) -> &Binding {
        &self.binding
    }

    pub(crate) fn is_star(&self) -> bool {
        self.name == crate::ALL_COLUMNS
    }

    /// Bind this column to `schema`, validating the column exists there.
    ///
    /// # Panics
    ///
    /// Panics if the column is not declared in `schema`.
    pub(crate) fn bind_to(&mut self, schema: &Schema) {
        if !self.is_star() && !schema.has_column(&self.name) {
            panic!(
                "column \"{}\" is not declared in schema for table \"{}\"",
                self.name,
                schema.table_name()
            );
        }
        self.binding = Binding::Table(schema.clone());
    }

    pub(crate) fn set_bare(&mut self) {
        self.format = ColFormat::Bare;
    }

    /// Render this reference as SQL.
    ///
    /// The `*` pseudo-column always renders as a bare star. A column whose
    /// binding is still deferred renders bare; the statement builders
    /// resolve bindings before rendering, so that case only arises when a
    /// writer is rendered outside a builder.
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.render_into(&mut out);
        out
    }

    pub(crate) fn render_into(&self, out: &mut String) {
        if self.is_star() {
            out.push('*');
            return;
        }
        if self.format == ColFormat::Qualified {
            if let Binding::Table(schema) = &self.binding {
                match schema.alias() {
                    Some(alias) if !alias.is_empty() => {
                        push_quoted(out, alias);
                        out.push('.');
                    }
                    _ => {}
                }
            }
        }
        push_quoted(out, &self.name);
    }
}

/// Append `ident` wrapped in double quotes, escaping embedded quotes.
pub(crate) fn push_quoted(out: &mut String, ident: &str) {
    out.push('"');
    for ch in ident.chars() {
        if ch == '"' {
            out.push('"');
        }
        out.push(ch);
    }
    out.push('"');
}

/// Append `"table"` or `"table" AS "alias"` for FROM/JOIN clauses.
pub(crate) fn push_table(out: &mut String, schema: &Schema) {
    push_quoted(out, schema.table_name());
    match schema.alias() {
        Some(alias) if !alias.is_empty() => {
            out.push_str(" AS ");
            push_quoted(out, alias);
        }
        _ => {}
    }
}
