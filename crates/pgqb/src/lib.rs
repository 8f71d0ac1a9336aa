//! # pgqb
//!
//! A schema-first, validation-heavy SQL string builder for PostgreSQL.
//!
//! ## Features
//!
//! - **Schemas up front**: every table is declared once ([`Schema`]) and
//!   every column reference is checked against it while the query is
//!   built, so a typo fails at startup instead of in production
//! - **Plain strings out**: builders produce SQL text with `?` or
//!   `:name` placeholders and hold no connection state
//! - **Composable WHERE trees**: [`and`]/[`or`] over comparison nodes,
//!   with empty branches pruned so optional filters cost nothing
//! - **Soft-delete aware**: hard deletes on tombstoned tables are
//!   rejected at construction time
//! - **Bulk statements**: multi-row INSERT, CASE-based multi-row UPDATE,
//!   and IN-list DELETE with row-indexed named placeholders
//! - **Querystring filters**: declarative mapping from HTTP query
//!   parameters to WHERE conditions
//!
//! ## Building a query
//!
//! ```ignore
//! use pgqb::{Schema, equal, select};
//!
//! let user = Schema::builder("user")
//!     .alias("user")
//!     .primary_key("id")
//!     .columns(["id", "xid", "full_name", "email"])
//!     .build();
//!
//! let sql = select([user.col("*")])
//!     .from(&user)
//!     .where_(equal(user.col("xid")))
//!     .build();
//! assert_eq!(sql, r#"SELECT * FROM "user" AS "user" WHERE "user"."xid" = ?"#);
//!
//! // Drivers that want $n placeholders rebind once before preparing:
//! assert_eq!(
//!     pgqb::rebind(&sql),
//!     r#"SELECT * FROM "user" AS "user" WHERE "user"."xid" = $1"#,
//! );
//! ```

pub mod audit;
pub mod bind;
pub mod bulk;
pub mod column;
pub mod config;
pub mod delete;
pub mod error;
pub mod expr;
pub mod filter;
pub mod insert;
pub mod join;
pub mod op;
pub mod param;
pub mod parse;
pub mod schema;
pub mod select;
pub mod soft_delete;
pub mod update;
pub mod variable;

/// Column-list sentinel meaning "every applicable column".
pub const ALL_COLUMNS: &str = "*";

pub use column::{Col, col, on};
pub use error::{QbError, QbResult};
pub use op::{Cmp, JoinKind, LikeMatch, LogicOp, Sort, VarFormat};
pub use param::Param;
pub use schema::{AuditColumns, Schema, SchemaBuilder, SchemaKey};
pub use variable::Var;

pub use expr::{
    Expr, and, between, equal, greater_than, greater_than_equal, ilike, in_list, is_not_null,
    is_null, less_than, less_than_equal, like, not_between, not_equal, not_ilike, not_in, not_like,
    or,
};

pub use delete::{DeleteBuilder, delete, force_delete};
pub use insert::{InsertBuilder, insert};
pub use join::Join;
pub use select::{SelectBuilder, select};
pub use soft_delete::{
    RestoreBuilder, SoftDeleteBuilder, exclude_trashed, only_trashed, restore, soft_delete,
};
pub use update::{UpdateBuilder, update};

pub use bulk::{
    BulkDeleteBuilder, BulkInsertBuilder, BulkRow, BulkSoftDeleteBuilder, BulkUpdateBuilder,
    bulk_delete, bulk_force_delete, bulk_insert, bulk_soft_delete, bulk_update,
};

pub use filter::{
    Filter, FilterParser, FilterRegistry, equal_filter, float_greater_than_equal_filter,
    float_less_than_equal_filter, int_greater_than_equal_filter, int_less_than_equal_filter,
    like_filter, time_greater_than_equal_filter, time_less_than_equal_filter,
};

pub use audit::{AuditData, add_audit_to_insert, add_audit_to_update, prepare_audit_fields};
pub use bind::rebind;
pub use config::{ConnConfig, DRIVER_MYSQL, DRIVER_POSTGRES};
