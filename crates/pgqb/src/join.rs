//! Join descriptors.

use crate::column::push_table;
use crate::expr::Expr;
use crate::op::JoinKind;
use crate::schema::Schema;

/// One join clause of a SELECT: kind, target table, ON condition, and the
/// 1-based position it was declared at. The index identifies the join in
/// panic messages when ON validation fails, which matters when the same
/// table is joined more than once.
#[derive(Debug, Clone)]
pub struct Join {
    kind: JoinKind,
    schema: Schema,
    on: Expr,
    index: usize,
}

impl Join {
    /// # Panics
    ///
    /// Panics if the ON condition is empty; a join without a condition has
    /// no SQL rendering.
    pub(crate) fn new(kind: JoinKind, schema: Schema, on: Expr, index: usize) -> Self {
        if on.is_empty() {
            panic!(
                "join #{index} on table \"{}\" has an empty ON condition",
                schema.table_name()
            );
        }
        Join {
            kind,
            schema,
            on,
            index,
        }
    }

    /// The joined table's schema.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// 1-based declaration position within the statement.
    pub fn index(&self) -> usize {
        self.index
    }

    pub(crate) fn on_mut(&mut self) -> &mut Expr {
        &mut self.on
    }

    /// Render `KIND JOIN "table" [AS "alias"] ON <condition>`.
    pub(crate) fn render(&self) -> String {
        let mut out = String::from(self.kind.sql());
        out.push(' ');
        push_table(&mut out, &self.schema);
        out.push_str(" ON ");
        out.push_str(&self.on.render());
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::on;
    use crate::expr::{and, equal};

    fn schemas() -> (Schema, Schema) {
        let user = Schema::builder("user")
            .alias("user")
            .primary_key("id")
            .columns(["id", "role_id"])
            .build();
        let role = Schema::builder("role")
            .alias("role")
            .primary_key("id")
            .columns(["id", "name"])
            .build();
        (user, role)
    }

    #[test]
    fn renders_kind_table_alias_and_condition() {
        let (user, role) = schemas();
        let mut cond = equal(user.col("role_id")).to(on("id"));
        cond.resolve_join(&role);
        let join = Join::new(JoinKind::Left, role.clone(), cond, 1);
        assert_eq!(
            join.render(),
            "LEFT JOIN \"role\" AS \"role\" ON \"user\".\"role_id\" = \"role\".\"id\""
        );
    }

    #[test]
    fn renders_without_alias() {
        let (user, _) = schemas();
        // no alias: the join table and its columns render bare
        let bare = Schema::builder("audit_log")
            .primary_key("id")
            .columns(["id", "user_id"])
            .build();
        let mut cond = equal(user.col("id")).to(on("user_id"));
        cond.resolve_join(&bare);
        let join = Join::new(JoinKind::Inner, bare, cond, 2);
        assert_eq!(
            join.render(),
            "INNER JOIN \"audit_log\" ON \"user\".\"id\" = \"user_id\""
        );
    }

    #[test]
    #[should_panic(expected = "empty ON condition")]
    fn empty_on_condition_panics() {
        let (_, role) = schemas();
        Join::new(JoinKind::Left, role, and([]), 1);
    }
}
